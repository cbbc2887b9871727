use crate::aggregate::AggregateResult;
use crate::config::BundleConfig;
use crate::controller::LoadOutcome;
use crate::errors::BundleError;
use crate::export::{export_text, ExportNotice, SystemClipboard};
use crate::model::ToggleOutcome;
use crate::reporting::print_stats;
use crate::session::Session;
use tracing::{debug, info, warn};

/// Loads one directory, drops the excluded files from the default
/// selection, builds the bundle, and hands it to the clipboard and/or
/// stdout.
pub async fn copy_bundle(config: BundleConfig) -> Result<AggregateResult, BundleError> {
    let mut session = Session::from_config(&config.session)?;

    debug!("Loading '{}'", config.session.initial_dir);
    session.reload();
    if let LoadOutcome::Failed { path, error } = session.wait_for_load().await {
        return Err(BundleError::DirectoryLoadError(format!("{}: {}", path, error)));
    }
    if session.model().is_empty() {
        warn!("'{}' has no listable entries", config.session.initial_dir);
    }

    for path in &config.exclude {
        match session.toggle(path) {
            ToggleOutcome::Deselected => debug!("Excluded {}", path),
            // Listed twice; keep it out.
            ToggleOutcome::Selected => {
                session.toggle(path);
            }
            ToggleOutcome::NotAFile => warn!("Cannot exclude directory '{}'", path),
            ToggleOutcome::Unknown => warn!("No such file in tree: '{}'", path),
        }
    }

    session.set_trailing_text(config.trailing_text.clone());
    let result = session.build().await.clone();

    if !config.no_stats {
        print_stats(&result);
    }

    if config.print {
        println!("{}", result.text);
    }

    if !config.no_copy {
        let mut clipboard = SystemClipboard::new()?;
        if let ExportNotice::Failed(reason) = export_text(&mut clipboard, &result.text) {
            return Err(BundleError::ClipboardWriteError(reason));
        }
        info!("Files copied to clipboard successfully.");
    }

    Ok(result)
}
