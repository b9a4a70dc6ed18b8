use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::finder::{FinderError, FixtureFinder};
use crate::fixture::{FixtureError, FixtureUpdater};
use crate::recording::{Recording, RecordingError, RewriteOptions};
use crate::report::{self, RunSummary};

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error(transparent)]
    Finder(#[from] FinderError),

    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error("{path}: {source}")]
    Recording {
        path: std::path::PathBuf,
        #[source]
        source: RecordingError,
    },

    #[error("Failed to write inspection output: {0}")]
    Output(#[from] std::io::Error),
}

/// What to do with every recording entry.
#[derive(Debug, Clone)]
pub enum Mode {
    /// Print each entry's request data, write nothing.
    Inspect,
    /// Rewrite the SDK version and save changed fixtures.
    Update {
        sdk_version: String,
        options: RewriteOptions,
    },
}

/// Walk every bundle → fixture → recording entry under the finder's root.
///
/// Processing is strictly sequential. A failure stops the run immediately;
/// fixtures saved before it stay saved.
pub fn run(finder: &FixtureFinder, mode: &Mode) -> Result<RunSummary, UpdateError> {
    let mut summary = RunSummary::default();

    let bundles = finder.get_all_bundles()?;
    info!(bundles = bundles.len(), "discovered bundles");
    summary.bundles = bundles.len();

    for bundle in &bundles {
        for plist in finder.get_fixtures(bundle)? {
            process_fixture(&plist, mode, &mut summary)?;
        }
    }

    Ok(summary)
}

#[instrument(skip_all, fields(fixture = %plist.display()))]
fn process_fixture(
    plist: &Path,
    mode: &Mode,
    summary: &mut RunSummary,
) -> Result<(), UpdateError> {
    let updater = FixtureUpdater::new(plist);
    let mut document = updater.get_plist_contents()?;
    summary.fixtures += 1;

    match mode {
        Mode::Inspect => {
            for (index, entry) in document.recording_entries_mut().enumerate() {
                summary.recordings += 1;
                let recording = Recording::new(entry);
                report::print_inspection(plist, index, recording.get_requests())?;
            }
        }
        Mode::Update {
            sdk_version,
            options,
        } => {
            let mut changed = false;
            for entry in document.recording_entries_mut() {
                summary.recordings += 1;
                let outcome = Recording::new(entry)
                    .replace_requests(sdk_version, options)
                    .map_err(|source| UpdateError::Recording {
                        path: plist.to_path_buf(),
                        source,
                    })?;
                summary.rewritten_urls += outcome.urls_rewritten;
                changed |= outcome.entry_changed;
            }

            if changed {
                updater.save(&document)?;
                summary.fixtures_written += 1;
                debug!("fixture updated");
            } else {
                debug!("fixture unchanged, not writing");
            }
        }
    }

    Ok(())
}
