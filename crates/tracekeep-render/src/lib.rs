//! Markdown documents for conversations, distillations and sessions

mod conversation;
mod distillation;
pub mod html;
mod session;

pub use conversation::{conversation_filename, render_conversation};
pub use distillation::{distillation_filename, render_distillation};
pub use html::html_to_markdown;
pub use session::{session_filename, render_session};
