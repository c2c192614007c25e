//! Asset records and their history.

use std::fmt;

use crate::resolver::UserId;

/// Identifier of an [`Asset`].
pub type AssetId = u64;

/// Identifier of a [`HardwareVersion`].
pub type HardwareVersionId = u64;

/// A hardware revision assets can be built against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareVersion {
    /// Registry-assigned identifier
    pub id: HardwareVersionId,
    /// Revision name
    pub name: String,
    /// Project the revision belongs to
    pub project: String,
}

impl HardwareVersion {
    /// Label used in selection lists: `"project - name"`.
    pub fn display(&self) -> String {
        format!("{} - {}", self.project, self.name)
    }
}

/// A tracked piece of hardware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Registry-assigned identifier
    pub id: AssetId,
    /// Serial number, never blank
    pub serial_no: String,
    /// Assigned owner
    pub owner: Option<UserId>,
    /// Hardware revision
    pub hardware_version: Option<HardwareVersionId>,
    /// MAC address, uppercase hex pairs
    pub mac_address: Option<String>,
    /// IPv4 address
    pub ipv4_address: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Whether the unit is on site
    pub in_house: bool,
    /// Registry sequence at creation; listings sort on it, newest first
    pub created_seq: u64,
}

/// What produced a [`Version`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionEvent {
    /// Asset created
    Create,
    /// Asset updated
    Update,
}

impl fmt::Display for VersionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionEvent::Create => write!(f, "create"),
            VersionEvent::Update => write!(f, "update"),
        }
    }
}

/// A point in an asset's revision history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    /// Registry sequence of the change
    pub seq: u64,
    /// Asset the change applies to
    pub asset_id: AssetId,
    /// Kind of change
    pub event: VersionEvent,
    /// Principal id that made the change, if known
    pub whodunnit: Option<String>,
    /// Serial number after the change
    pub serial_no: String,
}

/// One page of a newest-first listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// 1-based page number
    pub page: usize,
    /// Page size
    pub per_page: usize,
    /// Items across all pages
    pub total: usize,
}

impl<T> Page<T> {
    /// Slices `items` (already in display order) into page `page`.
    ///
    /// Page 0 is treated as page 1. Pages past the end are empty.
    pub(crate) fn slice(items: Vec<T>, page: usize, per_page: usize) -> Self {
        let page = page.max(1);
        let per_page = per_page.max(1);
        let total = items.len();
        let items = items
            .into_iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .collect();
        Self {
            items,
            page,
            per_page,
            total,
        }
    }

    /// Number of pages; at least 1.
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.per_page).max(1)
    }

    /// Returns true if a later page exists.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Returns true if an earlier page exists.
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}
