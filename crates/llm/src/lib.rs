//! Chat-completions backed [`ContentSynthesizer`](tdm_core::synthesis::ContentSynthesizer).

pub mod api;
pub mod extract;
pub mod synthesizer;

pub use api::{ChatApi, ChatApiError};
pub use synthesizer::LlmSynthesizer;
