//! Core reconciliation, aggregation and delta algorithms

pub mod aggregator;
mod config;
pub mod delta;
mod error;
pub mod normalizer;
pub mod reconciler;
pub mod session;
mod state;
mod summary;
pub mod time;
mod types;

pub use aggregator::aggregate_by_date;
pub use config::{Config, DistillConfig, GeminiConfig, SessionsConfig};
pub use delta::{compute_delta, Delta};
pub use error::{ConfigError, NormalizeError};
pub use normalizer::{load_export, normalize_export, parse_export};
pub use reconciler::{reconcile, PreviewLookup, DEFAULT_TIME_WINDOW_MINUTES};
pub use session::{parse_session_file, parse_session_str, ContentBlock, Message, Role, Session};
pub use state::{Fingerprint, SyncState, UnitRecord};
pub use summary::{Distillation, EnergyLevel};
pub use types::{
    Conversation, ConversationIndex, DayCohort, IndexedPrompt, InteractionEntry, Provenance,
};
