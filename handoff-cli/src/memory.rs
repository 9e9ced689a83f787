//! In-process content store.

use crate::store::{ContentStore, Page, PageSummary, StoreError};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone)]
struct StoredPage {
    title: String,
    version: u64,
    storage: String,
    parent: Option<String>,
    space_key: String,
}

/// Pages kept in memory with optimistic versioning and parent/child links.
///
/// Ids are handed out sequentially as decimal strings. Pages marked with
/// [`MemoryStore::restrict`] reject every write.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    pages: BTreeMap<String, StoredPage>,
    order: Vec<String>,
    restricted: BTreeSet<String>,
    next_id: u64,
    user: String,
}

impl MemoryStore {
    pub fn new(user: impl Into<String>) -> Self {
        MemoryStore {
            pages: BTreeMap::new(),
            order: Vec::new(),
            restricted: BTreeSet::new(),
            next_id: 1,
            user: user.into(),
        }
    }

    /// Add a top-level page, e.g. the parent all handoffs hang off.
    pub fn insert_root(&mut self, space_key: &str, title: &str, storage: &str) -> String {
        self.insert(None, space_key, title, storage)
    }

    /// Mark a page read-only for the current user.
    pub fn restrict(&mut self, id: &str) {
        self.restricted.insert(id.to_string());
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    fn insert(&mut self, parent: Option<&str>, space_key: &str, title: &str, storage: &str) -> String {
        let id = self.next_id.to_string();
        self.next_id += 1;
        self.pages.insert(
            id.clone(),
            StoredPage {
                title: title.to_string(),
                version: 1,
                storage: storage.to_string(),
                parent: parent.map(str::to_string),
                space_key: space_key.to_string(),
            },
        );
        self.order.push(id.clone());
        id
    }

    fn writable(&self, id: &str) -> Result<(), StoreError> {
        if self.restricted.contains(id) {
            return Err(StoreError::PermissionDenied);
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("Local User")
    }
}

impl ContentStore for MemoryStore {
    fn fetch_page(&self, id: &str) -> Result<Page, StoreError> {
        let page = self.pages.get(id).ok_or(StoreError::NotFound)?;
        Ok(Page {
            id: id.to_string(),
            title: page.title.clone(),
            version: page.version,
            storage: page.storage.clone(),
            view: None,
            space_key: Some(page.space_key.clone()),
        })
    }

    fn update_page(
        &mut self,
        id: &str,
        storage: &str,
        title: &str,
        expected_version: u64,
    ) -> Result<u64, StoreError> {
        self.writable(id)?;
        let page = self.pages.get_mut(id).ok_or(StoreError::NotFound)?;
        if page.version != expected_version {
            return Err(StoreError::VersionConflict);
        }
        page.version += 1;
        page.title = title.to_string();
        page.storage = storage.to_string();
        Ok(page.version)
    }

    fn create_page(
        &mut self,
        parent_id: &str,
        space_key: &str,
        title: &str,
        storage: &str,
    ) -> Result<String, StoreError> {
        if !self.pages.contains_key(parent_id) {
            return Err(StoreError::NotFound);
        }
        self.writable(parent_id)?;
        if let Some(existing) = self.pages.iter().find(|(_, page)| {
            page.space_key == space_key && page.title == title
        }) {
            return Err(StoreError::AlreadyExists {
                id: existing.0.clone(),
                title: title.to_string(),
            });
        }
        Ok(self.insert(Some(parent_id), space_key, title, storage))
    }

    fn delete_page(&mut self, id: &str) -> Result<(), StoreError> {
        if !self.pages.contains_key(id) {
            return Err(StoreError::NotFound);
        }
        self.writable(id)?;
        self.pages.remove(id);
        self.order.retain(|other| other != id);
        Ok(())
    }

    fn list_child_pages(&self, parent_id: &str) -> Result<Vec<PageSummary>, StoreError> {
        if !self.pages.contains_key(parent_id) {
            return Err(StoreError::NotFound);
        }
        Ok(self
            .order
            .iter()
            .filter_map(|id| {
                let page = self.pages.get(id)?;
                (page.parent.as_deref() == Some(parent_id)).then(|| PageSummary {
                    id: id.clone(),
                    title: page.title.clone(),
                    version: page.version,
                })
            })
            .collect())
    }

    fn current_user(&self) -> Result<String, StoreError> {
        Ok(self.user.clone())
    }

    fn can_write(&self, page_id: &str) -> Result<bool, StoreError> {
        if !self.pages.contains_key(page_id) {
            return Err(StoreError::NotFound);
        }
        Ok(!self.restricted.contains(page_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_parent() -> (MemoryStore, String) {
        let mut store = MemoryStore::default();
        let parent = store.insert_root("NOC", "Handoffs", "");
        (store, parent)
    }

    #[test]
    fn updates_bump_the_version() {
        let (mut store, parent) = store_with_parent();
        let id = store.create_page(&parent, "NOC", "a", "<p>1</p>").unwrap();

        assert_eq!(store.update_page(&id, "<p>2</p>", "a", 1).unwrap(), 2);
        let page = store.fetch_page(&id).unwrap();
        assert_eq!(page.version, 2);
        assert_eq!(page.storage, "<p>2</p>");
    }

    #[test]
    fn stale_update_is_a_conflict() {
        let (mut store, parent) = store_with_parent();
        let id = store.create_page(&parent, "NOC", "a", "").unwrap();
        store.update_page(&id, "x", "a", 1).unwrap();

        let result = store.update_page(&id, "y", "a", 1);
        assert!(matches!(result, Err(StoreError::VersionConflict)));
        assert_eq!(store.fetch_page(&id).unwrap().storage, "x");
    }

    #[test]
    fn children_are_listed_in_creation_order() {
        let (mut store, parent) = store_with_parent();
        let other = store.insert_root("NOC", "Elsewhere", "");
        store.create_page(&parent, "NOC", "b", "").unwrap();
        store.create_page(&other, "NOC", "stray", "").unwrap();
        store.create_page(&parent, "NOC", "a", "").unwrap();

        let titles: Vec<_> = store
            .list_child_pages(&parent)
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["b", "a"]);
    }

    #[test]
    fn duplicate_titles_are_rejected_per_space() {
        let (mut store, parent) = store_with_parent();
        let id = store.create_page(&parent, "NOC", "same", "").unwrap();

        match store.create_page(&parent, "NOC", "same", "") {
            Err(StoreError::AlreadyExists { id: existing, .. }) => assert_eq!(existing, id),
            other => panic!("expected AlreadyExists, got {other:?}"),
        }
        assert!(store.create_page(&parent, "OPS", "same", "").is_ok());
    }

    #[test]
    fn restricted_pages_reject_writes() {
        let (mut store, parent) = store_with_parent();
        let id = store.create_page(&parent, "NOC", "locked", "").unwrap();
        store.restrict(&id);

        assert!(!store.can_write(&id).unwrap());
        assert!(matches!(
            store.update_page(&id, "", "locked", 1),
            Err(StoreError::PermissionDenied)
        ));
        assert!(matches!(
            store.delete_page(&id),
            Err(StoreError::PermissionDenied)
        ));
    }

    #[test]
    fn deleted_pages_are_gone() {
        let (mut store, parent) = store_with_parent();
        let id = store.create_page(&parent, "NOC", "tmp", "").unwrap();
        store.delete_page(&id).unwrap();

        assert!(matches!(store.fetch_page(&id), Err(StoreError::NotFound)));
        assert!(store.list_child_pages(&parent).unwrap().is_empty());
        assert!(matches!(store.delete_page(&id), Err(StoreError::NotFound)));
    }
}
