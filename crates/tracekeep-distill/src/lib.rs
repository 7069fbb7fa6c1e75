//! Per-day distillation through a local language model

mod client;
mod distiller;
mod error;
pub mod prompt;
pub mod response;

pub use client::{model_matches, OllamaClient};
pub use distiller::{Distiller, OllamaDistiller};
pub use error::DistillError;
pub use prompt::{build_user_prompt, SYSTEM_PROMPT};
pub use response::parse_distillation_response;
