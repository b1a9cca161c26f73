use crate::cli::{actions::Context, globals::GlobalArgs};
use anyhow::Result;

/// Probes the configured API. The mock is never consulted unless running
/// offline.
///
/// # Errors
/// Returns an error if the API does not answer.
pub async fn execute(globals: &GlobalArgs) -> Result<()> {
    let mut ctx = Context::open(globals)?;
    let result = ctx.api.health_check().await;

    if let Ok(response) = &result {
        println!(
            "API {}: {} {} ({})",
            response.data.status, response.status, response.status_text, globals.api.base_url
        );
    }

    ctx.flush()?;
    result?;
    Ok(())
}
