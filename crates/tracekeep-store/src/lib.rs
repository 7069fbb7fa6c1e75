//! Filesystem plumbing shared by the tracekeep crates: atomic writes,
//! JSON documents, default locations and content fingerprints

mod hash;
mod io;
mod paths;

pub use hash::content_hash;
pub use io::{atomic_write, read_json, write_json};
pub use paths::{expand_tilde, Paths};
