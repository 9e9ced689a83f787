//! Glue between the handoff editor and a remote content store.
//!
//! The `handoff` binary is a thin shell over this library:
//!
//! - [`store`]: the [`ContentStore`] trait and its error type
//! - [`confluence`] / [`transport`]: the REST implementation over HTTP
//! - [`memory`]: an in-process store
//! - [`pages`]: page titles, the initial page body, title matching
//! - [`session`]: the open page, its editor, and save/create/delete
//! - [`connectivity`]: waiting for the network to come up

pub mod confluence;
pub mod connectivity;
pub mod memory;
pub mod pages;
pub mod session;
pub mod store;
pub mod transport;

pub use confluence::ConfluenceStore;
pub use memory::MemoryStore;
pub use session::{Created, OpenPage, Session, SessionError};
pub use store::{ContentStore, Page, PageSummary, StoreError};
pub use transport::{Transport, UreqTransport};
