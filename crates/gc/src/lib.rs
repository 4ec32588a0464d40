//! Trash retention garbage collector for Locker.
//!
//! Trashed files and folders remain recoverable for a retention window
//! (30 days by default). Once it elapses, the collector permanently
//! deletes them: dependent records first, then blobs, then the
//! metadata records themselves, cascading through folder contents.
//!
//! Every delete is idempotent, so a run interrupted partway can simply
//! be repeated.

pub mod cascade;
pub mod cleaner;
pub mod collector;
pub mod report;

pub use collector::TrashCollector;
pub use report::GcReport;
