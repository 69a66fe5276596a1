//! External device/firmware and package-repository catalogs.
pub mod client;
pub mod model;
pub mod query;
pub mod snapshot;

pub use client::{CatalogService, DEFAULT_CATALOG_TTL};
pub use model::{DeviceGroup, FirmwareCatalog, FirmwareEntry, JailbreakApp, Repository};
