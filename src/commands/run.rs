// ABOUTME: Run command implementation.
// ABOUTME: Enforces the retention policy and reports what changed.

use super::catalog_connection::connect_to_catalog;
use image_retention::config::Config;
use image_retention::error::Result;
use image_retention::output::Output;
use image_retention::retention::post_process_until;

pub async fn run(config: Config, artifact: Option<String>, output: &mut Output) -> Result<()> {
    output.start_timer();

    let settings = config.settings();
    output.progress(&format!(
        "Enforcing retention for {} (keep {})",
        settings.filter, settings.policy.keep
    ));

    let catalog = connect_to_catalog(&config, output).await?;

    let shutdown = async {
        // If the handler cannot be installed, never cancel.
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    let outcome = post_process_until(&settings, artifact, &catalog, &*output, shutdown).await?;

    if outcome.report.attempted() == 0 {
        output.warning(&format!("no images named {} found", settings.filter));
    }

    if let Some(artifact) = &outcome.artifact {
        output.progress(&format!("  → Kept build artifact {artifact}"));
    }

    output.success(&format!(
        "{}: updated {}, deleted {}",
        settings.filter,
        outcome.report.updated.len(),
        outcome.report.deleted.len()
    ));
    Ok(())
}
