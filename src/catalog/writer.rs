//! Persists the partition playlists and the run summary.
//!
//! Layout under the output directory:
//!
//! ```text
//! <output>/<playlists_dir>/<code>.m3u
//! <output>/<summary_file>
//! ```
//!
//! Any failure to create directories or write files is fatal for the run.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::catalog::{
    generator::render_partition, playlist_file_name, CatalogSummary, EpgLocatorTable,
    PartitionedCatalog,
};
use crate::config::OutputConfig;
use crate::errors::{AppError, AppResult};

/// Paths touched by one [`CatalogWriter::write`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrittenCatalog {
    pub playlists: Vec<PathBuf>,
    pub summary: PathBuf,
    pub pruned: Vec<PathBuf>,
}

pub struct CatalogWriter {
    output: OutputConfig,
    epg: EpgLocatorTable,
}

impl CatalogWriter {
    pub fn new(output: OutputConfig, epg: EpgLocatorTable) -> Self {
        Self { output, epg }
    }

    pub fn playlists_path(&self) -> PathBuf {
        self.output.path.join(&self.output.playlists_dir)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output.path.join(&self.output.summary_file)
    }

    /// Create the output directories. Called before any fetching so an unusable
    /// output location fails the run early.
    pub fn prepare(&self) -> AppResult<()> {
        let playlists_path = self.playlists_path();
        std::fs::create_dir_all(&playlists_path)
            .map_err(|e| AppError::output(&playlists_path, e))?;
        debug!("Output directory ready: {}", playlists_path.display());
        Ok(())
    }

    pub fn write(
        &self,
        catalog: &PartitionedCatalog,
        summary: &CatalogSummary,
    ) -> AppResult<WrittenCatalog> {
        self.prepare()?;
        let playlists_path = self.playlists_path();

        let mut written = WrittenCatalog::default();
        for (key, entries) in catalog.iter() {
            let file_path = playlists_path.join(playlist_file_name(key));
            let content = render_partition(key, entries, &self.epg);
            std::fs::write(&file_path, content).map_err(|e| AppError::output(&file_path, e))?;
            info!("Wrote {} playlist: {} channels -> {}", key, entries.len(), file_path.display());
            written.playlists.push(file_path);
        }

        if self.output.prune_stale {
            let keep: HashSet<String> = catalog.keys().map(playlist_file_name).collect();
            written.pruned = prune_stale_playlists(&playlists_path, &keep)?;
        }

        let summary_path = self.summary_path();
        let json = serde_json::to_string_pretty(summary)?;
        std::fs::write(&summary_path, json).map_err(|e| AppError::output(&summary_path, e))?;
        info!(
            "Summary written to {} ({} channels in {} partitions)",
            summary_path.display(),
            summary.total,
            summary.partition_count
        );
        written.summary = summary_path;

        Ok(written)
    }
}

/// Remove `*.m3u` files in `dir` whose name is not in `keep`.
///
/// Listing the directory is fatal; a file that cannot be removed is only logged.
fn prune_stale_playlists(dir: &Path, keep: &HashSet<String>) -> AppResult<Vec<PathBuf>> {
    let mut pruned = Vec::new();

    for entry in std::fs::read_dir(dir).map_err(|e| AppError::output(dir, e))? {
        let entry = entry.map_err(|e| AppError::output(dir, e))?;
        let file_name = entry.file_name().to_string_lossy().to_string();

        if !file_name.ends_with(".m3u") || keep.contains(&file_name) {
            continue;
        }

        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed stale playlist {}", path.display());
                pruned.push(path);
            }
            Err(e) => warn!("Failed to remove stale playlist {}: {}", path.display(), e),
        }
    }

    Ok(pruned)
}
