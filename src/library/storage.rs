// The whole library is one pretty-printed JSON array, rewritten on every
// update. Callers replace whole entries through `Repository`.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use uuid::Uuid;

use super::models::{LibraryItem, VocabularyEntry};
use crate::error::{GlanceError, Result};
use crate::session::SessionRecord;

/// Storage contract for library items.
///
/// Implementations must serialize writers; the helpers below assume no other
/// writer touches the same item between their load and save.
pub trait Repository {
    fn load_library(&self) -> Result<Vec<LibraryItem>>;
    fn save_library(&self, items: &[LibraryItem]) -> Result<()>;

    fn get_item(&self, id: Uuid) -> Result<LibraryItem> {
        self.load_library()?
            .into_iter()
            .find(|item| item.id == id)
            .ok_or(GlanceError::ItemNotFound(id))
    }

    fn add_item(&self, item: LibraryItem) -> Result<()> {
        let mut items = self.load_library()?;
        info!("adding {:?} to library", item.title);
        items.push(item);
        self.save_library(&items)
    }

    /// Replace the stored item with the same id
    fn replace_item(&self, item: LibraryItem) -> Result<()> {
        let mut items = self.load_library()?;
        let slot = items
            .iter_mut()
            .find(|existing| existing.id == item.id)
            .ok_or(GlanceError::ItemNotFound(item.id))?;
        *slot = item;
        self.save_library(&items)
    }

    /// Replace one vocabulary entry, located by its id, inside an item
    fn replace_vocabulary_entry(&self, item_id: Uuid, entry: VocabularyEntry) -> Result<()> {
        let mut item = self.get_item(item_id)?;
        let slot = item
            .vocabulary
            .iter_mut()
            .find(|existing| existing.id == entry.id)
            .ok_or(GlanceError::EntryNotFound(entry.id))?;
        debug!("replacing vocabulary entry {:?}", entry.word);
        *slot = entry;
        self.replace_item(item)
    }

    fn add_vocabulary(&self, item_id: Uuid, entry: VocabularyEntry) -> Result<()> {
        let mut item = self.get_item(item_id)?;
        item.vocabulary.push(entry);
        self.replace_item(item)
    }

    fn append_session(&self, item_id: Uuid, record: SessionRecord) -> Result<()> {
        let mut item = self.get_item(item_id)?;
        item.sessions.push(record);
        self.replace_item(item)
    }

    fn save_position(&self, item_id: Uuid, position: usize) -> Result<()> {
        let mut item = self.get_item(item_id)?;
        item.last_position = position;
        self.replace_item(item)
    }

    /// Every vocabulary entry in the library, paired with its item id
    fn all_vocabulary(&self) -> Result<Vec<(Uuid, VocabularyEntry)>> {
        Ok(self
            .load_library()?
            .into_iter()
            .flat_map(|item| {
                let id = item.id;
                item.vocabulary.into_iter().map(move |entry| (id, entry))
            })
            .collect())
    }
}

/// JSON file backed library
#[derive(Debug, Clone)]
pub struct JsonLibraryStore {
    path: PathBuf,
}

impl JsonLibraryStore {
    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Repository for JsonLibraryStore {
    fn load_library(&self) -> Result<Vec<LibraryItem>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        let items: Vec<LibraryItem> = serde_json::from_str(&content)?;
        Ok(items)
    }

    fn save_library(&self, items: &[LibraryItem]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(items)?)?;
        Ok(())
    }
}

/// In-process library, for hosts without persistence and for tests
#[derive(Debug, Default)]
pub struct MemoryRepository {
    items: RefCell<Vec<LibraryItem>>,
}

impl MemoryRepository {
    pub fn new(items: Vec<LibraryItem>) -> Self {
        Self {
            items: RefCell::new(items),
        }
    }
}

impl Repository for MemoryRepository {
    fn load_library(&self) -> Result<Vec<LibraryItem>> {
        Ok(self.items.borrow().clone())
    }

    fn save_library(&self, items: &[LibraryItem]) -> Result<()> {
        *self.items.borrow_mut() = items.to_vec();
        Ok(())
    }
}
