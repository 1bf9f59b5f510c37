//! One ingestion cycle: load the table set, normalize it, commit a snapshot.
//! A cycle either commits a complete snapshot or leaves the live one alone.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::data::normalize::{normalize, NormalizedDataset};
use crate::data::report::{IngestReport, Severity};
use crate::data::repository::{Provenance, Snapshot, SnapshotRepository};
use crate::data::tables::{load_tables, TableError, TableSource, TableSummary};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Normalized data ready to commit, with the table row counts it came from.
#[derive(Debug, Clone)]
pub struct PreparedDataset {
    pub dataset: NormalizedDataset,
    pub tables: Vec<TableSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReloadOutcome {
    pub generation: u64,
    pub characters: usize,
    pub warnings: usize,
    pub report: IngestReport,
}

/// Load and normalize without committing. Used by `validate` and by [run_cycle].
pub fn build_dataset(source: &dyn TableSource) -> Result<PreparedDataset, IngestError> {
    let tables = load_tables(source)?;
    let summary = tables.summary();
    let dataset = normalize(&tables);
    Ok(PreparedDataset {
        dataset,
        tables: summary,
    })
}

pub fn run_cycle(
    repo: &SnapshotRepository,
    source: &dyn TableSource,
) -> Result<ReloadOutcome, IngestError> {
    let started = Instant::now();
    let prepared = match build_dataset(source) {
        Ok(prepared) => prepared,
        Err(err) => {
            error!(
                source = %source.describe(),
                error = %err,
                generation = repo.current().generation,
                "ingestion aborted; keeping current snapshot"
            );
            return Err(err);
        }
    };

    let PreparedDataset { dataset, tables } = prepared;
    let NormalizedDataset {
        characters,
        lookups,
        report,
    } = dataset;
    let provenance = Provenance {
        source: source.describe(),
        tables,
    };
    let snapshot: Arc<Snapshot> = repo.load_with(characters, lookups, provenance);

    let warnings = report.count(Severity::Warning);
    if warnings > 0 {
        warn!(warnings, "ingestion finished with skipped data");
    }
    info!(
        generation = snapshot.generation,
        characters = snapshot.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "snapshot committed"
    );

    Ok(ReloadOutcome {
        generation: snapshot.generation,
        characters: snapshot.len(),
        warnings,
        report,
    })
}
