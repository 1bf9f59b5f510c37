pub mod character;
pub mod handbook;
pub mod lookups;
pub mod normalize;
pub mod raw;
pub mod report;
pub mod repository;
pub mod tables;

pub use character::CharacterRecord;
pub use normalize::{normalize, NormalizedDataset};
pub use report::{Diagnostic, IngestReport, Severity};
pub use repository::{Provenance, Snapshot, SnapshotRepository};
pub use tables::{load_tables, DirectorySource, MemorySource, TableError, TableId, TableSource};
