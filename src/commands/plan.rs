// ABOUTME: Plan command implementation.
// ABOUTME: Lists and classifies images without touching the catalog.

use super::catalog_connection::connect_to_catalog;
use image_retention::config::Config;
use image_retention::error::Result;
use image_retention::output::{Output, OutputMode};
use image_retention::retention;

pub async fn plan(config: Config, output: &Output) -> Result<()> {
    let catalog = connect_to_catalog(&config, output).await?;
    let settings = config.settings();
    let classification = retention::plan(&settings, &catalog).await?;

    if classification.is_empty() {
        output.warning(&format!("no images named {} found", settings.filter));
    }

    if output.mode() == OutputMode::Json {
        let lines = classification
            .retain
            .iter()
            .map(|image| ("retain", image))
            .chain(classification.purge.iter().map(|image| ("purge", image)));
        for (action, image) in lines {
            let line = serde_json::json!({
                "event": "plan",
                "action": action,
                "image_id": image.id.as_str(),
                "image_name": image.name,
                "created_at": image.created_at.to_rfc3339(),
                "verified": image.is_verified(),
            });
            println!("{line}");
        }
        return Ok(());
    }

    // Retained images lose the verification flag.
    for image in &classification.retain {
        let note = if image.is_verified() {
            "  (clears signature_verified)"
        } else {
            ""
        };
        output.progress(&format!(
            "RETAIN  {}  {}  {}{note}",
            image.created_at.to_rfc3339(),
            image.id,
            image.name
        ));
    }
    for image in &classification.purge {
        output.progress(&format!(
            "PURGE   {}  {}  {}",
            image.created_at.to_rfc3339(),
            image.id,
            image.name
        ));
    }

    output.success(&format!(
        "{}: {} to keep, {} to delete",
        settings.filter,
        classification.retain.len(),
        classification.purge.len()
    ));
    Ok(())
}
