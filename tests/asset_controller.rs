//! Asset handler flows end to end: sign in, resolve, guard, act.

use asset_guard::assets::{AssetField, AssetForm, AssetId, AssetRegistry, VersionEvent};
use asset_guard::audit::{AuditEventKind, AuditOutcome, AuditTrail};
use asset_guard::web::{AssetAction, AssetHandler, Body, FormView, RequestAdapter, SessionHandler};
use asset_guard::{
    GuardConfig, RememberTokenResolver, SessionGuard, SessionSigner, StatusCode, Tainted,
    UserDirectory,
};

struct App {
    signer: SessionSigner,
    users: UserDirectory,
    registry: AssetRegistry,
    guard: SessionGuard,
    config: GuardConfig,
    audit: AuditTrail,
    cookie: Option<String>,
    requests: usize,
}

impl App {
    fn new() -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let config = GuardConfig::default();
        Self {
            signer: SessionSigner::generate(),
            users: UserDirectory::new(),
            registry: AssetRegistry::new(),
            guard: SessionGuard::new(config.clone()),
            config,
            audit: AuditTrail::new(),
            cookie: None,
            requests: 0,
        }
    }

    fn login(&mut self) {
        let email = "dude@example.com";
        if self.users.find_by_email(email).is_none() {
            self.users.add("dude", "Mctalis", email);
        }
        let adapter = self.request(&[]);
        let sessions = SessionHandler::new(&self.signer, &self.users, &self.config, &self.audit);
        let response = sessions.create(adapter.context(), Tainted::new(email.to_string()));
        let cookie = response.cookies.into_iter().next().expect("sign-in cookie");
        self.cookie = cookie.value.map(|v| v.expose_secret().clone());
    }

    fn request(&mut self, params: &[(&str, &str)]) -> RequestAdapter {
        self.requests += 1;
        let mut adapter = RequestAdapter::new(format!("req-{}", self.requests));
        if let Some(cookie) = &self.cookie {
            adapter.add_cookie(self.config.cookie_name.clone(), cookie.clone());
        }
        for (k, v) in params {
            adapter.add_param(*k, *v);
        }
        let resolver = RememberTokenResolver::new(&self.signer, &self.users);
        adapter.resolve(&resolver, &self.config).expect("directory available");
        adapter
    }

    fn run(&mut self, adapter: &RequestAdapter, action: AssetAction) -> asset_guard::web::Response {
        let mut handler = AssetHandler::new(&self.guard, &mut self.registry, &self.users, &self.audit);
        handler.handle(adapter.context(), action)
    }

    fn seed_asset(&mut self, serial_no: &str) -> AssetId {
        let owner = self.users.add("Seed", "Owner", format!("{}@example.com", serial_no));
        let hv = self.registry.add_hardware_version("rev A", "blue");
        let changes = AssetForm::new()
            .serial_no(serial_no)
            .owner(self.users.get(owner).unwrap().full_name())
            .hardware_version_id(hv.to_string())
            .in_house("0")
            .validate_new(&self.users, &self.registry)
            .expect("seed asset");
        self.registry.create(changes, None)
    }
}

fn assert_sign_in_redirect(response: &asset_guard::web::Response) {
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location.as_deref(), Some("/signin"));
}

mod anonymous {
    use super::*;

    #[test]
    fn every_browser_action_shows_the_signin_page() {
        let mut app = App::new();
        let id = app.seed_asset("DEFAULT");
        let adapter = app.request(&[("serial_no", "TEST")]);

        let actions = vec![
            AssetAction::Index { page: 1 },
            AssetAction::Show { id },
            AssetAction::New,
            AssetAction::Edit { id },
            AssetAction::create_from(&adapter),
            AssetAction::update_from(id, &adapter),
            AssetAction::Versions { page: 1 },
        ];
        for action in actions {
            let response = app.run(&adapter, action);
            assert_sign_in_redirect(&response);
        }
        assert_eq!(app.registry.get(id).unwrap().serial_no, "DEFAULT");
    }

    #[test]
    fn api_update_is_unauthorized() {
        let mut app = App::new();
        let id = app.seed_asset("DEFAULT");
        let adapter = app.request(&[("serial_no", "TEST")]);
        let response = app.run(&adapter, AssetAction::api_update_from(id, &adapter));
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert!(response.location.is_none());
    }
}

mod edit {
    use super::*;

    #[test]
    fn missing_asset_is_not_found() {
        let mut app = App::new();
        let id = app.seed_asset("DEFAULT");
        app.login();
        let adapter = app.request(&[]);
        assert_eq!(app.run(&adapter, AssetAction::Edit { id: id + 1 }).status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn existing_asset_prefills_the_form() {
        let mut app = App::new();
        let id = app.seed_asset("DEFAULT");
        app.login();
        let adapter = app.request(&[]);
        let response = app.run(&adapter, AssetAction::Edit { id });
        match response.body {
            Body::Form { view, asset, errors, hardware_versions } => {
                assert_eq!(view, FormView::Edit);
                assert_eq!(asset.unwrap().serial_no, "DEFAULT");
                assert!(errors.is_empty());
                assert_eq!(hardware_versions.len(), 1);
            }
            other => panic!("expected edit form, got {:?}", other),
        }
    }
}

mod update {
    use super::*;

    fn setup() -> (App, AssetId) {
        let mut app = App::new();
        let id = app.seed_asset("DEFAULT");
        app.login();
        (app, id)
    }

    #[test]
    fn missing_asset_is_not_found() {
        let (mut app, id) = setup();
        let adapter = app.request(&[("serial_no", "TEST")]);
        let response = app.run(&adapter, AssetAction::update_from(id + 1, &adapter));
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn success_redirects_to_the_asset() {
        let (mut app, id) = setup();
        let adapter = app.request(&[("serial_no", "TEST")]);
        let response = app.run(&adapter, AssetAction::update_from(id, &adapter));
        assert_eq!(response.status, StatusCode::FOUND);
        assert_eq!(response.location, Some(format!("/assets/{}", id)));
        assert_eq!(response.notice.as_deref(), Some("Asset was successfully updated."));
    }

    fn rejected(params: &[(&str, &str)], field: AssetField) {
        let (mut app, id) = setup();
        let adapter = app.request(params);
        let response = app.run(&adapter, AssetAction::update_from(id, &adapter));
        assert_eq!(response.status, StatusCode::UNPROCESSABLE);
        match response.body {
            Body::Form { view, errors, .. } => {
                assert_eq!(view, FormView::Edit);
                assert!(errors.has(field), "{}", errors);
            }
            other => panic!("expected edit form, got {:?}", other),
        }
        assert_eq!(app.registry.get(id).unwrap().serial_no, "DEFAULT");
        assert_eq!(app.audit.of_kind(AuditEventKind::AssetUpdated)[0].outcome(), AuditOutcome::Rejected);
    }

    #[test]
    fn blank_serial_renders_edit() {
        rejected(&[("serial_no", "")], AssetField::SerialNo);
    }

    #[test]
    fn unknown_hardware_version_renders_edit() {
        rejected(
            &[("hardware_version[name]", "bla"), ("hardware_version[project]", "blue")],
            AssetField::HardwareVersion,
        );
    }

    #[test]
    fn unknown_user_renders_edit() {
        rejected(&[("user[full_name]", "bdsa dska")], AssetField::Owner);
    }

    #[test]
    fn every_attribute_is_updated() {
        let (mut app, id) = setup();
        let owner = app.users.add("User", "UPDATED", "updated@example.com");
        let hv = app.registry.add_hardware_version("name UPDATED", "Project UPDATED");
        let adapter = app.request(&[
            ("serial_no", "Serial Number UPDATED"),
            ("user[full_name]", "User UPDATED"),
            ("mac_address", "FF:FF:FF:FF:FF"),
            ("ipv4_address", "192.168.1.1"),
            ("notes", "Notes UPDATED"),
            ("in_house", "1"),
            ("hardware_version[name]", "name UPDATED"),
            ("hardware_version[project]", "Project UPDATED"),
        ]);
        let response = app.run(&adapter, AssetAction::update_from(id, &adapter));
        assert_eq!(response.status, StatusCode::FOUND);

        let asset = app.registry.get(id).unwrap();
        assert_eq!(asset.serial_no, "Serial Number UPDATED");
        assert_eq!(app.users.get(asset.owner.unwrap()).unwrap().full_name(), "User Updated");
        assert_eq!(asset.owner, Some(owner));
        assert_eq!(asset.mac_address.as_deref(), Some("FF:FF:FF:FF:FF"));
        assert_eq!(asset.ipv4_address.as_deref(), Some("192.168.1.1"));
        assert_eq!(asset.notes.as_deref(), Some("Notes UPDATED"));
        assert!(asset.in_house);
        let hardware = app.registry.hardware_version(asset.hardware_version.unwrap()).unwrap();
        assert_eq!(hardware.id, hv);
        assert_eq!(hardware.name, "name UPDATED");
        assert_eq!(hardware.project, "Project UPDATED");
    }

    #[test]
    fn blank_owner_unassigns_the_asset() {
        let (mut app, id) = setup();
        assert!(app.registry.get(id).unwrap().owner.is_some());

        let adapter = app.request(&[("user[full_name]", "")]);
        let response = app.run(&adapter, AssetAction::update_from(id, &adapter));
        assert_eq!(response.status, StatusCode::FOUND);
        assert!(app.registry.get(id).unwrap().owner.is_none());
    }

    #[test]
    fn history_records_the_signed_in_user() {
        let (mut app, id) = setup();
        let adapter = app.request(&[("serial_no", "ADDING-SOME-HISTORY")]);
        let whodunnit = adapter.context().principal().unwrap().id.clone();
        app.run(&adapter, AssetAction::update_from(id, &adapter));

        let adapter = app.request(&[]);
        match app.run(&adapter, AssetAction::Show { id }).body {
            Body::Asset { asset, history } => {
                assert_eq!(asset.serial_no, "ADDING-SOME-HISTORY");
                assert_eq!(history[0].event, VersionEvent::Update);
                assert_eq!(history[0].whodunnit.as_deref(), Some(whodunnit.as_str()));
                assert_eq!(history[1].event, VersionEvent::Create);
            }
            other => panic!("expected asset, got {:?}", other),
        }
    }

    #[test]
    fn api_update_returns_the_asset() {
        let (mut app, id) = setup();
        let adapter = app.request(&[("notes", "checked")]);
        let response = app.run(&adapter, AssetAction::api_update_from(id, &adapter));
        assert_eq!(response.status, StatusCode::OK);
        assert!(matches!(response.body, Body::Asset { ref asset, .. } if asset.notes.as_deref() == Some("checked")));

        let adapter = app.request(&[("mac_address", "1234")]);
        let response = app.run(&adapter, AssetAction::api_update_from(id, &adapter));
        assert_eq!(response.status, StatusCode::UNPROCESSABLE);
        assert!(matches!(response.body, Body::Errors(ref e) if e.has(AssetField::MacAddress)));
    }
}

mod create {
    use super::*;

    #[test]
    fn success_redirects_to_show_and_adds_an_asset() {
        let mut app = App::new();
        app.login();
        let hv = app.registry.add_hardware_version("rev A", "blue");
        let owner = app.users.add("Owner", "Person", "owner@example.com");
        let owner_name = app.users.get(owner).unwrap().full_name();
        let hv_id = hv.to_string();
        let adapter = app.request(&[
            ("serial_no", "DEV1234"),
            ("hardware_version_id", hv_id.as_str()),
            ("user[full_name]", owner_name.as_str()),
        ]);

        let response = app.run(&adapter, AssetAction::create_from(&adapter));
        assert_eq!(app.registry.len(), 1);
        let created = app.registry.page(1, 1).items.remove(0);
        assert_eq!(response.location, Some(format!("/assets/{}", created.id)));
        assert_eq!(response.notice.as_deref(), Some("Asset was successfully created."));
        assert_eq!(app.audit.of_kind(AuditEventKind::AssetCreated).len(), 1);
    }

    #[test]
    fn owner_is_optional() {
        let mut app = App::new();
        app.login();
        let hv = app.registry.add_hardware_version("rev A", "blue").to_string();
        let adapter = app.request(&[("serial_no", "DEV1234"), ("hardware_version_id", hv.as_str())]);

        let response = app.run(&adapter, AssetAction::create_from(&adapter));
        assert_eq!(response.status, StatusCode::FOUND);
        let created = app.registry.page(1, 1).items.remove(0);
        assert_eq!(created.serial_no, "DEV1234");
        assert!(created.owner.is_none());
    }

    #[test]
    fn failure_renders_new() {
        let mut app = App::new();
        app.login();
        let adapter = app.request(&[("serial_no", "DEV1234"), ("user[full_name]", "")]);
        let response = app.run(&adapter, AssetAction::create_from(&adapter));
        assert_eq!(response.status, StatusCode::UNPROCESSABLE);
        assert!(matches!(response.body, Body::Form { view: FormView::New, .. }));
        assert!(app.registry.is_empty());
    }
}

mod listings {
    use super::*;

    #[test]
    fn index_paginates_newest_first() {
        let mut app = App::new();
        app.seed_asset("TEST");
        app.seed_asset("B");
        app.seed_asset("C");
        app.login();

        let adapter = app.request(&[("page", "2")]);
        let page = adapter.page();
        match app.run(&adapter, AssetAction::Index { page }).body {
            Body::Assets(page) => {
                assert_eq!(page.items.len(), 1);
                assert_eq!(page.items[0].serial_no, "TEST");
                assert_eq!(page.total, 3);
            }
            other => panic!("expected assets, got {:?}", other),
        }
    }

    #[test]
    fn versions_paginate_newest_first() {
        let mut app = App::new();
        app.seed_asset("TEST");
        app.seed_asset("B");
        app.seed_asset("C");
        app.login();

        let adapter = app.request(&[("page", "2")]);
        let page = adapter.page();
        match app.run(&adapter, AssetAction::Versions { page }).body {
            Body::Versions(page) => {
                assert_eq!(page.items.len(), 1);
                assert_eq!(page.items[0].serial_no, "TEST");
            }
            other => panic!("expected versions, got {:?}", other),
        }
    }
}

mod sessions {
    use super::*;

    #[test]
    fn sign_out_drops_authentication() {
        let mut app = App::new();
        app.login();
        let adapter = app.request(&[]);
        assert!(app.guard.is_authenticated(adapter.context()));

        let sessions = SessionHandler::new(&app.signer, &app.users, &app.config, &app.audit);
        let response = sessions.destroy(adapter.context());
        assert_eq!(response.location.as_deref(), Some(app.config.sign_in_path.as_str()));
        assert!(response.cookies[0].value.is_none());
        app.cookie = None;

        let adapter = app.request(&[]);
        assert!(!app.guard.is_authenticated(adapter.context()));
    }

    #[test]
    fn current_user_is_recognized() {
        let mut app = App::new();
        app.login();
        let adapter = app.request(&[]);
        let dude = app.users.find_by_email("dude@example.com").unwrap().principal();
        assert!(adapter.context().is_current(&dude));
        assert_eq!(dude.name, "Dude Mctalis");
    }
}
