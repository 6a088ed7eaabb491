//! User administration dashboard library
//!
//! The data model, the fetch client for the remote member directory, and the
//! table-state controller that the `userboard-tui` crate renders.

pub mod api;
pub mod board;
pub mod error;
pub mod model;

pub use api::UserClient;
pub use board::EditDraft;
pub use board::PAGE_SIZE;
pub use board::UserBoard;
pub use error::ApiError;
pub use model::UserRecord;
