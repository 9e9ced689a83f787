//! The remote content store seam.
//!
//! Everything the tool needs from the wiki goes through [`ContentStore`]. The
//! Confluence implementation talks HTTP; [`crate::memory::MemoryStore`] keeps
//! pages in process.

use serde::Serialize;

/// A fully fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: String,
    pub title: String,
    pub version: u64,
    /// Body in storage markup, as saved.
    pub storage: String,
    /// Rendered body, when the store provides one.
    pub view: Option<String>,
    pub space_key: Option<String>,
}

/// One entry of a child page listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub id: String,
    pub title: String,
    pub version: u64,
}

impl From<&Page> for PageSummary {
    fn from(page: &Page) -> Self {
        PageSummary {
            id: page.id.clone(),
            title: page.title.clone(),
            version: page.version,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("page not found")]
    NotFound,
    #[error("version conflict, the page changed since it was loaded")]
    VersionConflict,
    #[error("permission denied")]
    PermissionDenied,
    #[error("page '{title}' already exists (id {id})")]
    AlreadyExists { id: String, title: String },
    #[error("invalid store url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response status {status}: {body}")]
    Unexpected { status: u16, body: String },
    #[error("could not decode response: {0}")]
    Decode(String),
}

/// Page-level operations against a remote content store.
///
/// Writes are optimistic: `update_page` names the version the caller loaded
/// and fails with [`StoreError::VersionConflict`] if the page moved on.
pub trait ContentStore {
    fn fetch_page(&self, id: &str) -> Result<Page, StoreError>;

    /// Replace a page's title and body. Returns the new version number.
    fn update_page(
        &mut self,
        id: &str,
        storage: &str,
        title: &str,
        expected_version: u64,
    ) -> Result<u64, StoreError>;

    /// Create a page under `parent_id`. Returns the new page id.
    fn create_page(
        &mut self,
        parent_id: &str,
        space_key: &str,
        title: &str,
        storage: &str,
    ) -> Result<String, StoreError>;

    fn delete_page(&mut self, id: &str) -> Result<(), StoreError>;

    /// Every direct child of `parent_id`, in store order.
    fn list_child_pages(&self, parent_id: &str) -> Result<Vec<PageSummary>, StoreError>;

    /// Display name of the authenticated user.
    fn current_user(&self) -> Result<String, StoreError>;

    /// Whether the authenticated user may edit `page_id`.
    fn can_write(&self, page_id: &str) -> Result<bool, StoreError>;
}
