//! Notes system — saved chat notes in a flat JSON file
//!
//! `!save` appends entries through the [`NoteStore`]; `!load` reads them back
//! and renders them per author with [`format`].

pub mod entry;
pub mod file_ops;
pub mod format;
pub mod store;

pub use entry::{Entry, StoredRecord};
pub use format::DisplayZone;
pub use store::{NoteStore, StoreContents};
