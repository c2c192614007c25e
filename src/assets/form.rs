//! Asset form input and validation.

use std::collections::BTreeMap;
use std::fmt;

use crate::resolver::{UserDirectory, UserId};
use crate::sanitizer::{
    Ipv4Sanitizer, MacAddressSanitizer, SanitizationError, SanitizationErrorKind, Sanitizer,
    SerialNumberSanitizer, TextSanitizer,
};
use crate::Tainted;

use super::{AssetRegistry, HardwareVersionId};

/// Raw asset fields as submitted. Absent fields are left unchanged on update.
///
/// # Examples
///
/// ```
/// use asset_guard::assets::AssetForm;
///
/// let form = AssetForm::new()
///     .serial_no("DEV1234")
///     .owner("Dude Mctalis")
///     .hardware_version_id("1");
/// assert!(!form.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct AssetForm {
    serial_no: Option<Tainted<String>>,
    owner: Option<Tainted<String>>,
    hardware_version_id: Option<Tainted<String>>,
    hardware_version_name: Option<Tainted<String>>,
    hardware_version_project: Option<Tainted<String>>,
    mac_address: Option<Tainted<String>>,
    ipv4_address: Option<Tainted<String>>,
    notes: Option<Tainted<String>>,
    in_house: Option<Tainted<String>>,
}

macro_rules! form_setters {
    ($($(#[$doc:meta])* $field:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $field(mut self, value: impl Into<String>) -> Self {
                self.$field = Some(Tainted::new(value.into()));
                self
            }
        )*
    };
}

impl AssetForm {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    form_setters! {
        /// Sets the serial number.
        serial_no,
        /// Sets the owner's full name. Blank unassigns the asset.
        owner,
        /// Selects a hardware version by id.
        hardware_version_id,
        /// Selects a hardware version by name, together with `hardware_version_project`.
        hardware_version_name,
        /// Selects a hardware version by project, together with `hardware_version_name`.
        hardware_version_project,
        /// Sets the MAC address. Blank clears it.
        mac_address,
        /// Sets the IPv4 address. Blank clears it.
        ipv4_address,
        /// Sets the notes. Blank clears them.
        notes,
        /// Sets the on-site flag: `1`/`true`/`on` or `0`/`false`/`off`/blank.
        in_house,
    }

    /// Builds a form from submitted `(name, value)` pairs.
    ///
    /// Recognizes the field names used by the asset form; others are ignored.
    pub fn from_params<'a, I>(params: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Tainted<String>)>,
    {
        let mut form = Self::new();
        for (name, value) in params {
            let slot = match name {
                "serial_no" => &mut form.serial_no,
                "owner" | "user[full_name]" => &mut form.owner,
                "hardware_version_id" => &mut form.hardware_version_id,
                "hardware_version[name]" => &mut form.hardware_version_name,
                "hardware_version[project]" => &mut form.hardware_version_project,
                "mac_address" => &mut form.mac_address,
                "ipv4_address" => &mut form.ipv4_address,
                "notes" => &mut form.notes,
                "in_house" => &mut form.in_house,
                _ => continue,
            };
            *slot = Some(value);
        }
        form
    }

    /// Returns true if no field was submitted.
    pub fn is_empty(&self) -> bool {
        self.serial_no.is_none()
            && self.owner.is_none()
            && self.hardware_version_id.is_none()
            && self.hardware_version_name.is_none()
            && self.hardware_version_project.is_none()
            && self.mac_address.is_none()
            && self.ipv4_address.is_none()
            && self.notes.is_none()
            && self.in_house.is_none()
    }

    /// Validates the form for a new asset.
    ///
    /// Serial number and hardware version are required; the owner is optional.
    ///
    /// # Errors
    ///
    /// Returns every failing field at once.
    pub fn validate_new(
        self,
        users: &UserDirectory,
        registry: &AssetRegistry,
    ) -> Result<AssetChanges, FieldErrors> {
        let (changes, mut errors) = self.collect(users, registry);
        let blank = SanitizationErrorKind::Empty.to_string();
        if changes.serial_no.is_none() {
            errors.add(AssetField::SerialNo, blank.clone());
        }
        if changes.hardware_version.is_none() {
            errors.add(AssetField::HardwareVersion, blank);
        }
        errors.into_result(changes)
    }

    /// Validates the submitted fields for an update.
    ///
    /// # Errors
    ///
    /// Returns every failing field at once.
    pub fn validate(
        self,
        users: &UserDirectory,
        registry: &AssetRegistry,
    ) -> Result<AssetChanges, FieldErrors> {
        let (changes, errors) = self.collect(users, registry);
        errors.into_result(changes)
    }

    fn collect(self, users: &UserDirectory, registry: &AssetRegistry) -> (AssetChanges, FieldErrors) {
        let mut errors = FieldErrors::default();
        let mut changes = AssetChanges::default();

        if let Some(raw) = self.serial_no {
            match SerialNumberSanitizer::default().sanitize(raw) {
                Ok(v) => changes.serial_no = Some(v.into_inner()),
                Err(e) => errors.reject(AssetField::SerialNo, &e),
            }
        }

        if let Some(raw) = self.owner {
            match clearable(raw, &TextSanitizer::new(128)) {
                Ok(None) => changes.owner = Some(None),
                Ok(Some(name)) => match users.find_by_full_name(&name) {
                    Some(user) => changes.owner = Some(Some(user.id)),
                    None => errors.add(AssetField::Owner, "does not match a known user"),
                },
                Err(e) => errors.reject(AssetField::Owner, &e),
            }
        }

        match hardware_version(
            self.hardware_version_id,
            self.hardware_version_name,
            self.hardware_version_project,
            registry,
        ) {
            Ok(hv) => changes.hardware_version = hv,
            Err(msg) => errors.add(AssetField::HardwareVersion, msg),
        }

        if let Some(raw) = self.mac_address {
            match clearable(raw, &MacAddressSanitizer) {
                Ok(v) => changes.mac_address = Some(v),
                Err(e) => errors.reject(AssetField::MacAddress, &e),
            }
        }

        if let Some(raw) = self.ipv4_address {
            match clearable(raw, &Ipv4Sanitizer) {
                Ok(v) => changes.ipv4_address = Some(v),
                Err(e) => errors.reject(AssetField::Ipv4Address, &e),
            }
        }

        if let Some(raw) = self.notes {
            match clearable(raw, &TextSanitizer::new(2048)) {
                Ok(v) => changes.notes = Some(v),
                Err(e) => errors.reject(AssetField::Notes, &e),
            }
        }

        if let Some(raw) = self.in_house {
            match checkbox(raw) {
                Ok(v) => changes.in_house = Some(v),
                Err(e) => errors.reject(AssetField::InHouse, &e),
            }
        }

        (changes, errors)
    }
}

/// Blank input clears an optional field; anything else must sanitize.
fn clearable<S>(raw: Tainted<String>, sanitizer: &S) -> Result<Option<String>, SanitizationError>
where
    S: Sanitizer<String>,
{
    match sanitizer.sanitize(raw) {
        Ok(v) => Ok(Some(v.into_inner())),
        Err(e) if e.kind() == SanitizationErrorKind::Empty => Ok(None),
        Err(e) => Err(e),
    }
}

fn checkbox(raw: Tainted<String>) -> Result<bool, SanitizationError> {
    let value = match TextSanitizer::new(8).sanitize(raw) {
        Ok(v) => v.into_inner().to_ascii_lowercase(),
        Err(e) if e.kind() == SanitizationErrorKind::Empty => return Ok(false),
        Err(e) => return Err(e),
    };
    match value.as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        _ => Err(SanitizationError::new(
            SanitizationErrorKind::MalformedInput,
            "expected a checkbox value",
        )),
    }
}

fn hardware_version(
    id: Option<Tainted<String>>,
    name: Option<Tainted<String>>,
    project: Option<Tainted<String>>,
    registry: &AssetRegistry,
) -> Result<Option<HardwareVersionId>, String> {
    let text = TextSanitizer::new(128);
    if let Some(raw) = id {
        let id: HardwareVersionId = text
            .sanitize(raw)
            .map_err(|e| e.kind().to_string())?
            .as_ref()
            .parse()
            .map_err(|_| SanitizationErrorKind::MalformedInput.to_string())?;
        return match registry.hardware_version(id) {
            Some(hv) => Ok(Some(hv.id)),
            None => Err("does not match a known hardware version".to_string()),
        };
    }
    match (name, project) {
        (None, None) => Ok(None),
        (Some(name), Some(project)) => {
            let name = text.sanitize(name).map_err(|e| e.kind().to_string())?;
            let project = text.sanitize(project).map_err(|e| e.kind().to_string())?;
            registry
                .find_hardware_version(name.as_ref(), project.as_ref())
                .map(|hv| Some(hv.id))
                .ok_or_else(|| "does not match a known hardware version".to_string())
        }
        _ => Err("needs both name and project".to_string()),
    }
}

/// Validated changes ready to apply. `None` means "leave unchanged";
/// `Some(None)` on optional fields means "clear".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetChanges {
    /// New serial number
    pub serial_no: Option<String>,
    /// New owner
    pub owner: Option<Option<UserId>>,
    /// New hardware version
    pub hardware_version: Option<HardwareVersionId>,
    /// New MAC address
    pub mac_address: Option<Option<String>>,
    /// New IPv4 address
    pub ipv4_address: Option<Option<String>>,
    /// New notes
    pub notes: Option<Option<String>>,
    /// New on-site flag
    pub in_house: Option<bool>,
}

/// Asset form fields, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AssetField {
    /// Serial number
    SerialNo,
    /// Owner
    Owner,
    /// Hardware version
    HardwareVersion,
    /// MAC address
    MacAddress,
    /// IPv4 address
    Ipv4Address,
    /// Notes
    Notes,
    /// On-site flag
    InHouse,
}

impl fmt::Display for AssetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AssetField::SerialNo => "Serial Number",
            AssetField::Owner => "Owner",
            AssetField::HardwareVersion => "Hardware Version",
            AssetField::MacAddress => "MAC Address",
            AssetField::Ipv4Address => "IPv4 Address",
            AssetField::Notes => "Notes",
            AssetField::InHouse => "In House",
        };
        f.write_str(label)
    }
}

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<AssetField, String>,
}

impl FieldErrors {
    /// Records a message for `field`, keeping the first one.
    pub fn add(&mut self, field: AssetField, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }

    fn reject(&mut self, field: AssetField, error: &SanitizationError) {
        self.add(field, error.kind().to_string());
    }

    /// Returns the message for `field`.
    pub fn get(&self, field: AssetField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Returns true if `field` failed.
    pub fn has(&self, field: AssetField) -> bool {
        self.errors.contains_key(&field)
    }

    /// Returns true if nothing failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of failing fields.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{} {}", field, message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures() -> (UserDirectory, AssetRegistry) {
        let mut users = UserDirectory::new();
        users.add("User", "UPDATED", "u@example.com");
        let mut registry = AssetRegistry::new();
        registry.add_hardware_version("name UPDATED", "Project UPDATED");
        (users, registry)
    }

    #[test]
    fn full_update_validates() {
        let (users, registry) = fixtures();
        let changes = AssetForm::new()
            .serial_no("Serial Number UPDATED")
            .owner("User UPDATED")
            .mac_address("FF:FF:FF:FF:FF")
            .ipv4_address("192.168.1.1")
            .notes("Notes UPDATED")
            .in_house("1")
            .hardware_version_name("name UPDATED")
            .hardware_version_project("Project UPDATED")
            .validate(&users, &registry)
            .expect("valid form");

        assert_eq!(changes.serial_no.as_deref(), Some("Serial Number UPDATED"));
        assert_eq!(changes.owner, Some(Some(1)));
        assert_eq!(changes.hardware_version, Some(1));
        assert_eq!(changes.mac_address, Some(Some("FF:FF:FF:FF:FF".to_string())));
        assert_eq!(changes.ipv4_address, Some(Some("192.168.1.1".to_string())));
        assert_eq!(changes.notes, Some(Some("Notes UPDATED".to_string())));
        assert_eq!(changes.in_house, Some(true));
    }

    #[test]
    fn empty_form_changes_nothing() {
        let (users, registry) = fixtures();
        let changes = AssetForm::new().validate(&users, &registry).unwrap();
        assert_eq!(changes, AssetChanges::default());
    }

    #[test]
    fn blank_serial_is_rejected() {
        let (users, registry) = fixtures();
        let errors = AssetForm::new().serial_no("").validate(&users, &registry).unwrap_err();
        assert_eq!(errors.get(AssetField::SerialNo), Some("can't be blank"));
    }

    #[test]
    fn unknown_owner_is_rejected() {
        let (users, registry) = fixtures();
        let errors = AssetForm::new().owner("bdsa dska").validate(&users, &registry).unwrap_err();
        assert!(errors.has(AssetField::Owner));
    }

    #[test]
    fn unknown_hardware_version_is_rejected() {
        let (users, registry) = fixtures();
        let errors = AssetForm::new()
            .hardware_version_name("bla")
            .hardware_version_project("blue")
            .validate(&users, &registry)
            .unwrap_err();
        assert!(errors.has(AssetField::HardwareVersion));
    }

    #[test]
    fn hardware_version_needs_name_and_project() {
        let (users, registry) = fixtures();
        let errors = AssetForm::new()
            .hardware_version_name("name UPDATED")
            .validate(&users, &registry)
            .unwrap_err();
        assert_eq!(errors.get(AssetField::HardwareVersion), Some("needs both name and project"));
    }

    #[test]
    fn hardware_version_by_id() {
        let (users, registry) = fixtures();
        let ok = AssetForm::new().hardware_version_id("1").validate(&users, &registry).unwrap();
        assert_eq!(ok.hardware_version, Some(1));

        let errors = AssetForm::new().hardware_version_id("x").validate(&users, &registry).unwrap_err();
        assert_eq!(errors.get(AssetField::HardwareVersion), Some("is invalid"));

        let errors = AssetForm::new().hardware_version_id("99").validate(&users, &registry).unwrap_err();
        assert!(errors.has(AssetField::HardwareVersion));
    }

    #[test]
    fn bad_input_reports_every_field() {
        let (users, registry) = fixtures();
        let errors = AssetForm::new()
            .serial_no("")
            .owner("asdssssf")
            .mac_address("1234")
            .ipv4_address("765rd")
            .validate(&users, &registry)
            .unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.to_string().contains("MAC Address is invalid"));
    }

    #[test]
    fn blank_optional_fields_clear() {
        let (users, registry) = fixtures();
        let changes = AssetForm::new()
            .mac_address(" ")
            .ipv4_address("")
            .notes("")
            .in_house("")
            .validate(&users, &registry)
            .unwrap();
        assert_eq!(changes.mac_address, Some(None));
        assert_eq!(changes.ipv4_address, Some(None));
        assert_eq!(changes.notes, Some(None));
        assert_eq!(changes.in_house, Some(false));
    }

    #[test]
    fn checkbox_rejects_nonsense() {
        let (users, registry) = fixtures();
        let errors = AssetForm::new().in_house("maybe").validate(&users, &registry).unwrap_err();
        assert!(errors.has(AssetField::InHouse));
    }

    #[test]
    fn new_asset_requires_core_fields() {
        let (users, registry) = fixtures();
        let errors = AssetForm::new()
            .serial_no("DEV1234")
            .validate_new(&users, &registry)
            .unwrap_err();
        assert!(!errors.has(AssetField::SerialNo));
        assert!(!errors.has(AssetField::Owner));
        assert!(errors.has(AssetField::HardwareVersion));
    }

    #[test]
    fn new_asset_without_owner_is_unassigned() {
        let (users, registry) = fixtures();
        let changes = AssetForm::new()
            .serial_no("DEV1")
            .hardware_version_id("1")
            .validate_new(&users, &registry)
            .unwrap();
        assert_eq!(changes.owner, None);

        let changes = AssetForm::new()
            .serial_no("DEV1")
            .owner("")
            .hardware_version_id("1")
            .validate_new(&users, &registry)
            .unwrap();
        assert_eq!(changes.owner, Some(None));
    }

    #[test]
    fn blank_owner_unassigns() {
        let (users, registry) = fixtures();
        let changes = AssetForm::new().owner("  ").validate(&users, &registry).unwrap();
        assert_eq!(changes.owner, Some(None));
    }

    #[test]
    fn from_params_maps_nested_names() {
        let (users, registry) = fixtures();
        let params = vec![
            ("serial_no", Tainted::new("DEV1".to_string())),
            ("user[full_name]", Tainted::new("user updated".to_string())),
            ("hardware_version_id", Tainted::new("1".to_string())),
            ("utf8", Tainted::new("✓".to_string())),
        ];
        let changes = AssetForm::from_params(params).validate_new(&users, &registry).unwrap();
        assert_eq!(changes.owner, Some(Some(1)));
    }
}
