//! Data models for the flashcard backend.
//!
//! Documents (`User`, `Topic`, `Word`) are stored as-is in MongoDB; the
//! `*Response` types are what leaves the HTTP layer, with identifiers
//! rendered as hex strings.

mod patch;
mod topic;
mod user;
mod word;

pub use patch::*;
pub use topic::*;
pub use user::*;
pub use word::*;
