//! CLI command implementations.

pub mod formulate;
pub mod generate;
pub mod materials;
pub mod organs;

use std::borrow::Cow;
use std::path::PathBuf;

use bioreplica::ReferenceCatalog;

/// Load the catalog named on the command line, or fall back to the built-in one.
pub fn load_catalog(
    path: Option<PathBuf>,
) -> Result<Cow<'static, ReferenceCatalog>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let catalog = ReferenceCatalog::from_json_file(&path)?;
            tracing::info!(path = %path.display(), "loaded reference catalog");
            Ok(Cow::Owned(catalog))
        }
        None => Ok(Cow::Borrowed(ReferenceCatalog::builtin())),
    }
}
