pub mod distill;
pub mod gemini;
pub mod status;
pub mod sync;
pub mod version;
