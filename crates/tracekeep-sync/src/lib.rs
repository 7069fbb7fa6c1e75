//! Incremental sync: per-unit skip/write decisions over three sources
//!
//! Each pipeline loads its state file, feeds rendered units through a
//! [`SyncEngine`], and reports how many documents it wrote.

mod conversations;
mod distill;
mod engine;
mod error;
mod export;
mod sessions;
mod sink;
mod state_store;

pub use conversations::{load_conversation_index, sync_conversations};
pub use distill::{sync_distillations, DateRange};
pub use engine::{RunReport, SyncEngine, UnitOutcome};
pub use error::SyncError;
pub use sessions::{discover_session_files, sync_sessions};
pub use sink::{DirectorySink, DocumentSink, RenderedDocument};
pub use state_store::StateStore;
