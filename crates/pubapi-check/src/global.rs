//! Process-wide checker.
//!
//! Scanners that cannot thread an [`ApiChecker`] through their call graph
//! install one provider at startup and use these free functions afterwards.

use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::warn;

use pubapi_meta::TypeMetadataProvider;

use crate::checker::ApiChecker;
use crate::error::{CheckError, CheckResult};

static CHECKER: OnceLock<ApiChecker> = OnceLock::new();

/// Install the process-wide metadata provider.
///
/// Returns `false` if a provider was already installed; the first one stays.
pub fn install(provider: Arc<dyn TypeMetadataProvider>) -> bool {
    let installed = CHECKER
        .set(ApiChecker::with_shared_provider(provider))
        .is_ok();
    if !installed {
        warn!("Type metadata provider already installed, keeping the existing one");
    }
    installed
}

/// The process-wide checker.
///
/// # Errors
///
/// [`CheckError::ProviderNotInstalled`] before [`install`] has been called.
pub fn checker() -> CheckResult<&'static ApiChecker> {
    CHECKER.get().ok_or(CheckError::ProviderNotInstalled)
}

/// Load an allow-list directory into the process-wide checker.
pub fn load_config(dir: impl AsRef<Path>) -> CheckResult<()> {
    checker()?.load_config(dir)
}

/// Query the process-wide checker.
pub fn is_permitted(type_name: &str, method: &str, descriptor: &str) -> CheckResult<bool> {
    checker()?.is_permitted(type_name, method, descriptor)
}
