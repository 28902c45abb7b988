//! Trait definitions for Zaptec operations.
//!
//! Each record type implements the traits its endpoint supports: paginated
//! listing endpoints implement [`List`], single-resource endpoints [`Get`].

mod get;
mod list;

pub use get::Get;
pub use list::List;
