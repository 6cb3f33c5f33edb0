/// Artifact reconciliation for expanded scripts
///
/// The expanded text is persisted as `.g.<name>` beside its source and only
/// rewritten when the source is newer or the stored content drifted, so the
/// toolchain's own compilation cache keys stay stable.
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::include::SourceUnit;

/// Prefix for generated artifacts
const ARTIFACT_PREFIX: &str = ".g.";

/// Outcome of a reconcile pass
#[derive(Debug, Clone)]
pub struct ReconcileResult {
    /// Artifact file, valid whether or not it was rewritten
    pub artifact: PathBuf,
    /// True when the artifact was written during this pass
    pub rewritten: bool,
}

/// Artifact path for a resolved root unit.
pub fn artifact_path(root: &SourceUnit) -> PathBuf {
    root.directory
        .join(format!("{}{}", ARTIFACT_PREFIX, root.base_name))
}

/// Compare the freshly expanded body against the stored artifact and rewrite
/// it when stale.
///
/// A missing artifact and a strictly newer source are the fast paths; when
/// timestamps say fresh, the stored bytes decide. A fresh artifact is left
/// completely untouched, its timestamp included.
pub fn reconcile(root: &SourceUnit) -> Result<ReconcileResult> {
    let artifact = artifact_path(root);
    let source = root.path();

    let source_time = fs::metadata(&source)
        .and_then(|meta| meta.modified())
        .with_context(|| format!("Failed to stat source: {}", source.display()))?;

    let stale = match artifact_mtime(&artifact) {
        None => {
            tracing::debug!("no cached artifact");
            true
        }
        Some(artifact_time) if source_time > artifact_time => {
            tracing::debug!("timestamp difference");
            true
        }
        Some(_) => {
            let stored = fs::read(&artifact)
                .with_context(|| format!("Failed to read artifact: {}", artifact.display()))?;
            let drifted = stored != root.body.as_bytes();
            if drifted {
                tracing::debug!("content difference");
            }
            drifted
        }
    };

    if stale {
        tracing::debug!("saving {}", artifact.display());
        fs::write(&artifact, &root.body)
            .with_context(|| format!("Failed to write artifact: {}", artifact.display()))?;
    }

    Ok(ReconcileResult {
        artifact,
        rewritten: stale,
    })
}

/// Modification time of the artifact, if it exists and is statable.
fn artifact_mtime(artifact: &Path) -> Option<SystemTime> {
    fs::metadata(artifact).and_then(|meta| meta.modified()).ok()
}
