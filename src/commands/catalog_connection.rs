// ABOUTME: Shared helper for authenticating against the image catalog.
// ABOUTME: Used by both the plan and run commands.

use image_retention::catalog::GlanceClient;
use image_retention::config::Config;
use image_retention::error::Result;
use image_retention::output::Output;
use image_retention::retention::AuthenticationSnafu;
use snafu::ResultExt;

/// Authenticate with the configured credentials and resolve the image endpoint.
pub async fn connect_to_catalog(config: &Config, output: &Output) -> Result<GlanceClient> {
    let (auth, connection) = config.connection_options()?;

    output.progress(&format!("  → Authenticating at {}...", auth.identity_endpoint));
    let client = GlanceClient::connect(auth, &connection)
        .await
        .context(AuthenticationSnafu)?;

    match client.project() {
        Some(project) => output.progress(&format!(
            "  → Using image service {} (project {project})",
            client.endpoint()
        )),
        None => output.progress(&format!("  → Using image service {}", client.endpoint())),
    }
    Ok(client)
}
