//! In-memory asset records.

use std::collections::BTreeMap;

use crate::error::Error;

use super::{
    Asset, AssetChanges, AssetId, HardwareVersion, HardwareVersionId, Page, Version, VersionEvent,
};

/// Assets, hardware versions and the revision history of every asset.
///
/// Every create and update appends a [`Version`] attributed to the acting
/// principal, so history can be listed per asset or globally.
#[derive(Debug, Default)]
pub struct AssetRegistry {
    assets: BTreeMap<AssetId, Asset>,
    hardware_versions: BTreeMap<HardwareVersionId, HardwareVersion>,
    versions: Vec<Version>,
    next_asset_id: AssetId,
    next_hardware_version_id: HardwareVersionId,
    seq: u64,
}

impl AssetRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a hardware version and returns its id.
    pub fn add_hardware_version(
        &mut self,
        name: impl Into<String>,
        project: impl Into<String>,
    ) -> HardwareVersionId {
        self.next_hardware_version_id += 1;
        let id = self.next_hardware_version_id;
        self.hardware_versions.insert(
            id,
            HardwareVersion {
                id,
                name: name.into(),
                project: project.into(),
            },
        );
        id
    }

    /// Looks a hardware version up by id.
    pub fn hardware_version(&self, id: HardwareVersionId) -> Option<&HardwareVersion> {
        self.hardware_versions.get(&id)
    }

    /// Looks a hardware version up by exact name and project.
    pub fn find_hardware_version(&self, name: &str, project: &str) -> Option<&HardwareVersion> {
        self.hardware_versions
            .values()
            .find(|hv| hv.name == name && hv.project == project)
    }

    /// Returns all hardware versions ordered by id.
    pub fn hardware_versions(&self) -> Vec<HardwareVersion> {
        self.hardware_versions.values().cloned().collect()
    }

    /// Looks an asset up by id.
    pub fn get(&self, id: AssetId) -> Option<&Asset> {
        self.assets.get(&id)
    }

    /// Returns the number of assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Returns true if there are no assets.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Creates an asset from validated changes.
    ///
    /// Callers validate with [`AssetForm::validate_new`](super::AssetForm::validate_new),
    /// which guarantees a serial number.
    pub fn create(&mut self, changes: AssetChanges, whodunnit: Option<&str>) -> AssetId {
        self.next_asset_id += 1;
        let id = self.next_asset_id;
        let seq = self.tick();
        let mut asset = Asset {
            id,
            serial_no: String::new(),
            owner: None,
            hardware_version: None,
            mac_address: None,
            ipv4_address: None,
            notes: None,
            in_house: false,
            created_seq: seq,
        };
        apply(&mut asset, changes);
        self.versions.push(Version {
            seq,
            asset_id: id,
            event: VersionEvent::Create,
            whodunnit: whodunnit.map(str::to_string),
            serial_no: asset.serial_no.clone(),
        });
        self.assets.insert(id, asset);
        id
    }

    /// Applies validated changes to an existing asset.
    ///
    /// # Errors
    ///
    /// Returns `Error::AssetNotFound` if `id` is unknown.
    pub fn update(
        &mut self,
        id: AssetId,
        changes: AssetChanges,
        whodunnit: Option<&str>,
    ) -> Result<&Asset, Error> {
        let asset = self.assets.get_mut(&id).ok_or(Error::AssetNotFound(id))?;
        self.seq += 1;
        let seq = self.seq;
        apply(asset, changes);
        self.versions.push(Version {
            seq,
            asset_id: id,
            event: VersionEvent::Update,
            whodunnit: whodunnit.map(str::to_string),
            serial_no: asset.serial_no.clone(),
        });
        Ok(asset)
    }

    /// Lists assets newest first.
    pub fn page(&self, page: usize, per_page: usize) -> Page<Asset> {
        let mut assets: Vec<Asset> = self.assets.values().cloned().collect();
        assets.sort_by(|a, b| b.created_seq.cmp(&a.created_seq));
        Page::slice(assets, page, per_page)
    }

    /// Lists all versions newest first.
    pub fn versions_page(&self, page: usize, per_page: usize) -> Page<Version> {
        let versions: Vec<Version> = self.versions.iter().rev().cloned().collect();
        Page::slice(versions, page, per_page)
    }

    /// Returns one asset's versions newest first.
    pub fn history(&self, id: AssetId) -> Vec<Version> {
        self.versions
            .iter()
            .rev()
            .filter(|v| v.asset_id == id)
            .cloned()
            .collect()
    }

    fn tick(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }
}

fn apply(asset: &mut Asset, changes: AssetChanges) {
    if let Some(serial_no) = changes.serial_no {
        asset.serial_no = serial_no;
    }
    if let Some(owner) = changes.owner {
        asset.owner = owner;
    }
    if let Some(hv) = changes.hardware_version {
        asset.hardware_version = Some(hv);
    }
    if let Some(mac) = changes.mac_address {
        asset.mac_address = mac;
    }
    if let Some(ip) = changes.ipv4_address {
        asset.ipv4_address = ip;
    }
    if let Some(notes) = changes.notes {
        asset.notes = notes;
    }
    if let Some(in_house) = changes.in_house {
        asset.in_house = in_house;
    }
}
