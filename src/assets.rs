//! Hardware asset records: model, form validation and the in-memory registry.

mod form;
mod model;
mod registry;

pub use form::{AssetChanges, AssetField, AssetForm, FieldErrors};
pub use model::{Asset, AssetId, HardwareVersion, HardwareVersionId, Page, Version, VersionEvent};
pub use registry::AssetRegistry;
