//! External text-transformation service clients.
//!
//! The pipeline only ever sees the [`TextTransformer`] trait: one formatted
//! instruction string in, one Markdown string out. Which service actually
//! answers — a local Ollama daemon or any OpenAI-compatible endpoint — is
//! decided by the caller at construction time via [`TransformerConfig`].
//!
//! Keeping model name and endpoint URL inside the client (instead of
//! reading environment variables deep in the pipeline) means two
//! conversions with different models can run side by side in one process.

mod ollama;
mod openai;
mod transformer;

pub use ollama::OllamaTransformer;
pub use openai::OpenAiTransformer;
pub use transformer::{TextTransformer, TransformerConfig};
