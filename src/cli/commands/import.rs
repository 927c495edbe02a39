//! Single-URL import command.

use tokio_util::sync::CancellationToken;

use crate::cli::icons::{dim_arrow, error, success, warn};
use jobimport::config::Settings;
use jobimport::models::ImportStatus;
use jobimport::services::JobImporter;

/// Import one posting, print the result JSON to stdout and a summary to stderr.
/// Fails when the import status is `failed`.
pub async fn cmd_import(settings: &Settings, url: &str, pretty: bool) -> anyhow::Result<()> {
    let importer = JobImporter::new(settings)?;

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let result = importer.import_with_cancel(url, &cancel).await;
    ctrl_c.abort();

    let json = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", json);

    let fields = result
        .fields_extracted
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    match result.status {
        ImportStatus::Success => {
            eprintln!("{} Imported {}", success(), url);
            eprintln!("  {} Fields: {}", dim_arrow(), fields);
            Ok(())
        }
        ImportStatus::Partial => {
            eprintln!("{} Partially imported {}", warn(), url);
            eprintln!("  {} Fields: {}", dim_arrow(), fields);
            if let Some(ref message) = result.error {
                eprintln!("  {} {}", dim_arrow(), message);
            }
            Ok(())
        }
        ImportStatus::Failed => {
            let message = result.error.unwrap_or_default();
            eprintln!("{} {}", error(), message);
            anyhow::bail!("Import of {} failed", url)
        }
    }
}
