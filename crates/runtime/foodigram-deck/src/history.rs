//! Scrapped-history persistence
//!
//! Stores the scrapped list under [`SCRAPPED_ITEMS`] as a versioned JSON
//! record. Liked ids are session-scoped and are never written.

use chrono::Utc;
use foodigram_core::ContentItem;
use foodigram_storage::{KeyValueStore, SCRAPPED_ITEMS};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{Error, InteractionStore, Result, ScrappedEntry};

/// Current on-disk record version
pub const HISTORY_VERSION: u32 = 1;

/// Serializable scrapped history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Version for migration support
    pub version: u32,

    /// Oldest first
    pub entries: Vec<ScrappedEntry>,
}

impl Default for HistoryRecord {
    fn default() -> Self {
        Self {
            version: HISTORY_VERSION,
            entries: Vec::new(),
        }
    }
}

/// What may be found under the key: the current record, or the bare item
/// array older clients wrote
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredHistory {
    Record(HistoryRecord),
    Legacy(Vec<ContentItem>),
}

/// Moves scrapped history between an [`InteractionStore`] and a key/value store
pub struct HistorySync<S: KeyValueStore> {
    storage: S,
}

impl<S: KeyValueStore> HistorySync<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_inner(self) -> S {
        self.storage
    }

    /// Read the persisted record without touching any store
    pub fn load(&self) -> Result<HistoryRecord> {
        let stored: Option<StoredHistory> = self.storage.load_json(SCRAPPED_ITEMS)?;

        match stored {
            None => Ok(HistoryRecord::default()),
            Some(StoredHistory::Record(record)) if record.version > HISTORY_VERSION => {
                Err(Error::UnsupportedVersion(record.version))
            }
            Some(StoredHistory::Record(record)) => Ok(record),
            Some(StoredHistory::Legacy(items)) => {
                debug!(count = items.len(), "upgrading legacy scrapped history");
                let now = Utc::now();
                Ok(HistoryRecord {
                    version: HISTORY_VERSION,
                    entries: items
                        .into_iter()
                        .map(|item| ScrappedEntry {
                            item,
                            scrapped_at: now,
                        })
                        .collect(),
                })
            }
        }
    }

    /// Replace the store's scrapped list with the persisted one.
    /// Returns the number of entries restored.
    pub fn restore(&self, store: &mut InteractionStore) -> Result<usize> {
        let record = self.load()?;
        let restored = store.restore_scrapped(record.entries);
        info!(restored, "scrapped history restored");
        Ok(restored)
    }

    /// Write the store's scrapped list
    pub fn persist(&mut self, store: &InteractionStore) -> Result<()> {
        let record = HistoryRecord {
            version: HISTORY_VERSION,
            entries: store.scrapped_entries().to_vec(),
        };
        self.storage.save_json(SCRAPPED_ITEMS, &record)?;
        debug!(count = record.entries.len(), "scrapped history persisted");
        Ok(())
    }

    /// Forget the persisted history
    pub fn clear(&mut self) -> Result<()> {
        self.storage.remove(SCRAPPED_ITEMS)?;
        Ok(())
    }
}

/// Export scrapped history to markdown, most recent first
pub fn export_markdown(store: &InteractionStore) -> String {
    let mut md = String::new();

    md.push_str("# Scrapped\n\n");
    md.push_str(&format!(
        "_Exported: {}_\n\n",
        Utc::now().format("%Y-%m-%d %H:%M UTC")
    ));

    if store.scrapped_entries().is_empty() {
        md.push_str("Nothing scrapped yet.\n");
        return md;
    }

    for entry in store.scrapped_history() {
        md.push_str(&format!(
            "- **{}** ({}) {}\n",
            entry.item.name,
            entry.item.category,
            entry.scrapped_at.format("%Y-%m-%d")
        ));
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodigram_core::Category;
    use foodigram_storage::{FileStore, MemoryStore};

    fn item(id: u32, name: &str) -> ContentItem {
        ContentItem::new(id, name, Category::Korean)
    }

    #[test]
    fn test_missing_key_restores_nothing() {
        let sync = HistorySync::new(MemoryStore::new());
        let mut store = InteractionStore::new();
        assert_eq!(sync.restore(&mut store).unwrap(), 0);
    }

    #[test]
    fn test_persist_then_restore_keeps_order() {
        let mut sync = HistorySync::new(MemoryStore::new());
        let mut store = InteractionStore::new();
        store.toggle_scrapped(&item(1, "Japchae"));
        store.toggle_scrapped(&item(2, "Tteokbokki"));
        store.toggle_liked(1);
        sync.persist(&store).unwrap();

        let mut fresh = InteractionStore::new();
        assert_eq!(sync.restore(&mut fresh).unwrap(), 2);

        let ids: Vec<_> = fresh.scrapped_entries().iter().map(|e| e.item.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(!fresh.is_liked(1));
    }

    #[test]
    fn test_survives_reopen_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        {
            let mut sync = HistorySync::new(FileStore::open(&path).unwrap());
            let mut store = InteractionStore::new();
            store.toggle_scrapped(&item(7, "Galbi"));
            sync.persist(&store).unwrap();
        }

        let sync = HistorySync::new(FileStore::open(&path).unwrap());
        let mut store = InteractionStore::new();
        sync.restore(&mut store).unwrap();
        assert_eq!(store.scrapped_item(7).map(|i| i.name.as_str()), Some("Galbi"));
    }

    #[test]
    fn test_legacy_item_array_is_upgraded() {
        let mut storage = MemoryStore::new();
        let legacy = vec![item(3, "Naengmyeon")];
        storage.save_json(SCRAPPED_ITEMS, &legacy).unwrap();

        let sync = HistorySync::new(storage);
        let record = sync.load().unwrap();
        assert_eq!(record.version, HISTORY_VERSION);
        assert_eq!(record.entries[0].item.id, 3);
    }

    #[test]
    fn test_future_version_is_rejected() {
        let mut storage = MemoryStore::new();
        storage
            .save_string(SCRAPPED_ITEMS, r#"{"version": 99, "entries": []}"#)
            .unwrap();

        let sync = HistorySync::new(storage);
        let mut store = InteractionStore::new();
        assert!(matches!(
            sync.restore(&mut store),
            Err(Error::UnsupportedVersion(99))
        ));
    }

    #[test]
    fn test_garbage_is_a_storage_error() {
        let mut storage = MemoryStore::new();
        storage.save_string(SCRAPPED_ITEMS, "not json").unwrap();

        let sync = HistorySync::new(storage);
        assert!(matches!(sync.load(), Err(Error::Storage(_))));
    }

    #[test]
    fn test_clear() {
        let mut sync = HistorySync::new(MemoryStore::new());
        let mut store = InteractionStore::new();
        store.toggle_scrapped(&item(1, "Japchae"));
        sync.persist(&store).unwrap();

        sync.clear().unwrap();
        assert!(sync.storage().is_empty());
    }

    #[test]
    fn test_export_markdown() {
        let mut store = InteractionStore::new();
        assert!(export_markdown(&store).contains("Nothing scrapped yet."));

        store.toggle_scrapped(&item(1, "Japchae"));
        store.toggle_scrapped(&item(2, "Tteokbokki"));
        let md = export_markdown(&store);

        let first = md.find("Tteokbokki").unwrap();
        let second = md.find("Japchae").unwrap();
        assert!(first < second);
    }
}
