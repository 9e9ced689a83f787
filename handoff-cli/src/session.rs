//! One editing session against a content store.
//!
//! A [`Session`] owns the loaded configuration, the store handle and at most
//! one open page. Opening a page replaces the editor wholesale; a successful
//! save discards it. Nothing is kept in process-wide state.

use crate::pages::{self, PageError};
use crate::store::{ContentStore, PageSummary, StoreError};
use chrono::NaiveDate;
use handoff_config::HandoffConfig;
use handoff_text::{from_storage, to_storage, Document, Editor, FormatError};

/// The page currently being edited.
#[derive(Debug, Clone)]
pub struct OpenPage {
    pub id: String,
    pub title: String,
    /// Version the editor contents were loaded from.
    pub version: u64,
    pub editor: Editor,
}

/// Outcome of [`Session::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub id: String,
    pub title: String,
    /// True when a child with that title was already there and nothing was written.
    pub existed: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no page is open")]
    NothingOpen,
    #[error("page content cannot be empty")]
    EmptyContent,
    #[error("could not determine the space key of parent page {0}")]
    NoSpaceKey(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Page(#[from] PageError),
    #[error(transparent)]
    Format(#[from] FormatError),
}

pub struct Session<S: ContentStore> {
    config: HandoffConfig,
    store: S,
    open: Option<OpenPage>,
}

impl<S: ContentStore> Session<S> {
    pub fn new(config: HandoffConfig, store: S) -> Self {
        Session {
            config,
            store,
            open: None,
        }
    }

    pub fn config(&self) -> &HandoffConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn open_page(&self) -> Option<&OpenPage> {
        self.open.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut Editor> {
        self.open.as_mut().map(|page| &mut page.editor)
    }

    fn parent_id(&self) -> &str {
        &self.config.confluence.parent_page_id
    }

    /// Load a page for editing, dropping whatever was open before.
    pub fn open(&mut self, id: &str) -> Result<&OpenPage, SessionError> {
        let page = self.store.fetch_page(id)?;
        log::info!("opened page {} '{}' at version {}", page.id, page.title, page.version);
        let page = OpenPage {
            editor: Editor::with_document(from_storage(&page.storage)),
            id: page.id,
            title: page.title,
            version: page.version,
        };
        Ok(self.open.insert(page))
    }

    /// Swap the open page's contents, e.g. for a body edited elsewhere.
    pub fn replace_document(&mut self, document: Document) -> Result<(), SessionError> {
        let page = self.open.as_mut().ok_or(SessionError::NothingOpen)?;
        page.editor = Editor::with_document(document);
        Ok(())
    }

    pub fn rename(&mut self, title: &str) -> Result<(), SessionError> {
        let page = self.open.as_mut().ok_or(SessionError::NothingOpen)?;
        page.title = title.to_string();
        Ok(())
    }

    /// Write the open page back against the version it was loaded from.
    ///
    /// On success the page is closed and the new version returned. On failure
    /// it stays open so the caller can retry or reload. A document holding
    /// only whitespace is refused.
    pub fn save(&mut self) -> Result<u64, SessionError> {
        let page = self.open.as_ref().ok_or(SessionError::NothingOpen)?;
        if page.editor.document().text().trim().is_empty() {
            return Err(SessionError::EmptyContent);
        }
        let markup = to_storage(page.editor.document())?;
        self.write(markup)
    }

    /// Write `markup` to the open page as is, bypassing the editor.
    ///
    /// Same versioning and close-on-success rules as [`Session::save`].
    pub fn save_markup(&mut self, markup: &str) -> Result<u64, SessionError> {
        let markup = markup.trim();
        if markup.is_empty() {
            return Err(SessionError::EmptyContent);
        }
        self.write(markup.to_string())
    }

    fn write(&mut self, markup: String) -> Result<u64, SessionError> {
        let page = self.open.as_ref().ok_or(SessionError::NothingOpen)?;
        let version = self
            .store
            .update_page(&page.id, &markup, &page.title, page.version)?;
        log::info!("saved page {} as version {version}", page.id);
        self.open = None;
        Ok(version)
    }

    /// Discard the open page without saving.
    pub fn close(&mut self) -> Option<OpenPage> {
        self.open.take()
    }

    /// Space for new pages: configured, or else the parent page's.
    pub fn space_key(&self) -> Result<String, SessionError> {
        if let Some(key) = self.config.confluence.space_key() {
            return Ok(key.to_string());
        }
        self.store
            .fetch_page(self.parent_id())?
            .space_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| SessionError::NoSpaceKey(self.parent_id().to_string()))
    }

    /// Create today's handoff under the parent page.
    ///
    /// `title` defaults to [`pages::handoff_title`] for `manager` (or the
    /// configured manager). An existing child with the same title is
    /// reported instead of creating a duplicate.
    pub fn create(
        &mut self,
        title: Option<&str>,
        manager: Option<&str>,
        today: NaiveDate,
    ) -> Result<Created, SessionError> {
        let manager = manager.or(self.config.handoff.manager());
        let title = match title.map(str::trim).filter(|t| !t.is_empty()) {
            Some(title) => title.to_string(),
            None => pages::handoff_title(&self.config.handoff, today, manager)?,
        };

        if let Some(existing) = self
            .store
            .list_child_pages(self.parent_id())?
            .into_iter()
            .find(|page| page.title == title)
        {
            log::info!("page '{title}' already exists as {}", existing.id);
            return Ok(Created {
                id: existing.id,
                title,
                existed: true,
            });
        }

        let space_key = self.space_key()?;
        let body = pages::initial_body(&self.config.handoff, today)?;
        let parent = self.parent_id().to_string();
        let id = match self.store.create_page(&parent, &space_key, &title, &body) {
            Ok(id) => id,
            Err(StoreError::AlreadyExists { id, .. }) => {
                return Ok(Created {
                    id,
                    title,
                    existed: true,
                })
            }
            Err(err) => return Err(err.into()),
        };
        log::info!("created page '{title}' as {id}");
        Ok(Created {
            id,
            title,
            existed: false,
        })
    }

    /// Delete a page. Closes it first if it is the open one.
    pub fn delete(&mut self, id: &str) -> Result<(), SessionError> {
        self.store.delete_page(id)?;
        if self.open.as_ref().is_some_and(|page| page.id == id) {
            self.open = None;
        }
        log::info!("deleted page {id}");
        Ok(())
    }

    /// Children of the parent page whose title contains `term`, ignoring case.
    pub fn search(&self, term: &str) -> Result<Vec<PageSummary>, SessionError> {
        let children = self.store.list_child_pages(self.parent_id())?;
        Ok(pages::filter_by_title(children, term))
    }

    /// Handoff pages dated the day before `today`.
    pub fn yesterdays_handoffs(
        &self,
        manager: Option<&str>,
        today: NaiveDate,
    ) -> Result<Vec<PageSummary>, SessionError> {
        let yesterday = today.pred_opt().unwrap_or(today);
        let prefix = pages::format_date(yesterday, &self.config.handoff.title_date_format)?;
        let candidates = self.search(&prefix)?;
        Ok(pages::handoffs_for(
            &self.config.handoff,
            candidates,
            yesterday,
            manager,
        )?)
    }

    pub fn page_url(&self, id: &str) -> String {
        pages::page_url(&self.config.confluence.base_url, id)
    }
}
