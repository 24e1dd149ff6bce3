//! Product backend commands.

use tracing::info;

use goodstock_storefront::backend::{ProductSource, RestProductSource};
use goodstock_storefront::config::BackendConfig;

/// Check that the backend configured in the environment answers.
///
/// # Errors
///
/// Returns an error if `BACKEND_URL`/`BACKEND_ANON_KEY` are missing or
/// invalid, or the backend request fails.
pub async fn probe() -> Result<(), Box<dyn std::error::Error>> {
    let config = BackendConfig::from_lookup(|name| std::env::var(name).ok())?
        .ok_or("BACKEND_URL and BACKEND_ANON_KEY not set")?;
    info!(url = %config.url, "Probing product backend");

    let source = RestProductSource::new(&config)?;
    source.probe().await?;

    info!("Product backend is reachable");
    Ok(())
}
