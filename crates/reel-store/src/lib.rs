use parking_lot::RwLock;
use reel_types::{Category, Group, HistoryRecord, Template, Video};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },
    #[error("{kind} {id} already exists")]
    AlreadyExists { kind: &'static str, id: String },
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// An entity a repository can hold.
pub trait Record: Clone + Send + Sync {
    const KIND: &'static str;

    fn id(&self) -> &str;

    /// Folds a second `create` for an existing id into the stored record.
    /// Returns false when duplicates are an error.
    fn absorb(&mut self, _incoming: Self) -> bool {
        false
    }
}

impl Record for Category {
    const KIND: &'static str = "category";

    fn id(&self) -> &str {
        &self.category_id
    }
}

impl Record for Group {
    const KIND: &'static str = "group";

    fn id(&self) -> &str {
        &self.group_id
    }
}

impl Record for Video {
    const KIND: &'static str = "video";

    fn id(&self) -> &str {
        &self.video_id
    }
}

impl Record for Template {
    const KIND: &'static str = "template";

    fn id(&self) -> &str {
        &self.template_id
    }
}

impl Record for HistoryRecord {
    const KIND: &'static str = "history";

    fn id(&self) -> &str {
        &self.video_id
    }

    fn absorb(&mut self, incoming: Self) -> bool {
        if incoming.last_seen > self.last_seen {
            self.last_seen = incoming.last_seen;
        }
        true
    }
}

pub trait Repository<T: Record>: Send + Sync {
    fn create(&self, item: T) -> Result<()>;
    fn update(&self, item: T) -> Result<()>;
    fn read(&self, id: &str) -> Result<T>;
    fn delete(&self, id: &str) -> Result<()>;
    /// All records in insertion order.
    fn list(&self) -> Result<Vec<T>>;
}

pub trait Storage: Send + Sync {
    fn categories(&self) -> &dyn Repository<Category>;
    fn groups(&self) -> &dyn Repository<Group>;
    fn videos(&self) -> &dyn Repository<Video>;
    fn templates(&self) -> &dyn Repository<Template>;
    fn history(&self) -> &dyn Repository<HistoryRecord>;
}

pub struct MemoryTable<T> {
    rows: RwLock<Vec<T>>,
}

impl<T> Default for MemoryTable<T> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Record> MemoryTable<T> {
    fn not_found(id: &str) -> StoreError {
        StoreError::NotFound {
            kind: T::KIND,
            id: id.to_string(),
        }
    }
}

impl<T: Record> Repository<T> for MemoryTable<T> {
    fn create(&self, item: T) -> Result<()> {
        let mut rows = self.rows.write();
        if let Some(existing) = rows.iter_mut().find(|row| row.id() == item.id()) {
            let id = item.id().to_string();
            if existing.absorb(item) {
                return Ok(());
            }
            return Err(StoreError::AlreadyExists { kind: T::KIND, id });
        }
        rows.push(item);
        Ok(())
    }

    fn update(&self, item: T) -> Result<()> {
        let mut rows = self.rows.write();
        let existing = rows
            .iter_mut()
            .find(|row| row.id() == item.id())
            .ok_or_else(|| Self::not_found(item.id()))?;
        *existing = item;
        Ok(())
    }

    fn read(&self, id: &str) -> Result<T> {
        self.rows
            .read()
            .iter()
            .find(|row| row.id() == id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    fn delete(&self, id: &str) -> Result<()> {
        let mut rows = self.rows.write();
        let idx = rows
            .iter()
            .position(|row| row.id() == id)
            .ok_or_else(|| Self::not_found(id))?;
        rows.remove(idx);
        Ok(())
    }

    fn list(&self) -> Result<Vec<T>> {
        Ok(self.rows.read().clone())
    }
}

/// Thread-safe in-memory catalogue, template and history store.
#[derive(Default)]
pub struct MemoryStore {
    categories: MemoryTable<Category>,
    groups: MemoryTable<Group>,
    videos: MemoryTable<Video>,
    templates: MemoryTable<Template>,
    history: MemoryTable<HistoryRecord>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStore {
    fn categories(&self) -> &dyn Repository<Category> {
        &self.categories
    }

    fn groups(&self) -> &dyn Repository<Group> {
        &self.groups
    }

    fn videos(&self) -> &dyn Repository<Video> {
        &self.videos
    }

    fn templates(&self) -> &dyn Repository<Template> {
        &self.templates
    }

    fn history(&self) -> &dyn Repository<HistoryRecord> {
        &self.history
    }
}
