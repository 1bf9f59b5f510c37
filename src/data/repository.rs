//! Snapshot repository: the one shared mutable reference in the process.
//! Load once per ingestion cycle, hand out via Arc to handlers and the CLI.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};

use crate::data::character::CharacterRecord;
use crate::data::lookups::LookupTables;
use crate::data::tables::TableSummary;

/// Where a snapshot's data came from.
#[derive(Debug, Clone, Default)]
pub struct Provenance {
    pub source: String,
    pub tables: Vec<TableSummary>,
}

/// One committed, immutable entity collection.
#[derive(Debug)]
pub struct Snapshot {
    /// 0 for the empty startup snapshot, then +1 per commit.
    pub generation: u64,
    pub loaded_at: DateTime<Utc>,
    pub provenance: Provenance,
    pub lookups: LookupTables,
    characters: Vec<Arc<CharacterRecord>>,
    by_id: HashMap<String, usize>,
}

impl Snapshot {
    fn build(
        generation: u64,
        characters: Vec<CharacterRecord>,
        lookups: LookupTables,
        provenance: Provenance,
    ) -> Self {
        let characters: Vec<Arc<CharacterRecord>> = characters.into_iter().map(Arc::new).collect();
        let by_id = characters
            .iter()
            .enumerate()
            .map(|(slot, record)| (record.id.clone(), slot))
            .collect();
        Self {
            generation,
            loaded_at: Utc::now(),
            provenance,
            lookups,
            characters,
            by_id,
        }
    }

    pub fn characters(&self) -> &[Arc<CharacterRecord>] {
        &self.characters
    }

    pub fn get(&self, id: &str) -> Option<&Arc<CharacterRecord>> {
        self.by_id.get(id).map(|&slot| &self.characters[slot])
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn filter<P>(&self, predicate: P) -> Vec<Arc<CharacterRecord>>
    where
        P: Fn(&CharacterRecord) -> bool,
    {
        self.characters
            .iter()
            .filter(|record| predicate(record))
            .cloned()
            .collect()
    }
}

/// Readers load the current snapshot without locking. Commits are serialized
/// so generations stay strictly increasing.
#[derive(Debug)]
pub struct SnapshotRepository {
    current: ArcSwap<Snapshot>,
    commit: Mutex<()>,
}

impl Default for SnapshotRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotRepository {
    /// Starts with an empty generation-0 snapshot.
    pub fn new() -> Self {
        let empty = Snapshot::build(0, Vec::new(), LookupTables::default(), Provenance::default());
        Self {
            current: ArcSwap::from_pointee(empty),
            commit: Mutex::new(()),
        }
    }

    pub fn load(&self, characters: Vec<CharacterRecord>, lookups: LookupTables) -> Arc<Snapshot> {
        self.load_with(characters, lookups, Provenance::default())
    }

    /// Build the next snapshot outside the commit lock, then swap it in. Readers
    /// see either the previous snapshot or this one, never a mix.
    pub fn load_with(
        &self,
        characters: Vec<CharacterRecord>,
        lookups: LookupTables,
        provenance: Provenance,
    ) -> Arc<Snapshot> {
        let mut next = Snapshot::build(0, characters, lookups, provenance);
        let _commit = self.commit.lock().unwrap_or_else(PoisonError::into_inner);
        next.generation = self.current.load().generation + 1;
        let next = Arc::new(next);
        self.current.store(Arc::clone(&next));
        next
    }

    /// The committed snapshot. Holding the returned Arc pins it even across reloads.
    pub fn current(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    pub fn all(&self) -> Vec<Arc<CharacterRecord>> {
        self.current().characters().to_vec()
    }

    pub fn filter<P>(&self, predicate: P) -> Vec<Arc<CharacterRecord>>
    where
        P: Fn(&CharacterRecord) -> bool,
    {
        self.current().filter(predicate)
    }
}
