pub mod device;
pub mod firmware;
pub mod jailbreak;
pub mod repo;

use std::sync::Arc;

use bloo_catalog::FirmwareCatalog;
use bloo_core::{Context, Error};
use bloo_utils::error::UserError;

/// The firmware catalog, or a user-facing error when it cannot be loaded.
pub(crate) async fn firmware_catalog(ctx: Context<'_>) -> Result<Arc<FirmwareCatalog>, Error> {
    ctx.data().catalog.firmware().await.ok_or_else(|| {
        UserError::unavailable("The firmware catalog is unavailable right now. Try again later.")
            .into()
    })
}
