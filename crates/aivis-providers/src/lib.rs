//! Provider adapters for the AIVIS probe pipeline.
//!
//! Each adapter wraps one external text-generation capability behind the
//! uniform [`Provider`] contract: ask a question, get a [`ProviderAnswer`].
//! Adapters never let an error escape that boundary — transport, auth, and
//! parse failures all become an answer with `error` set and empty text.
//!
//! Gemini and Anthropic additionally carry a search-assisted fallback: when
//! their native grounding/tool capability is denied, the adapter fetches
//! top-k web results for the question and re-asks the model using only that
//! retrieved context. The rest of the pipeline cannot tell which path
//! produced the text.

pub mod anthropic;
pub mod error;
mod fallback;
pub mod gemini;
pub mod openai;
pub mod perplexity;
pub mod registry;
mod retry;
pub mod search;
pub mod traits;
pub mod types;

pub use anthropic::AnthropicProvider;
pub use error::ProviderError;
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use perplexity::PerplexityProvider;
pub use registry::ProviderRegistry;
pub use search::{SearchClient, SearchResult};
pub use traits::Provider;
pub use types::{ProbeContext, ProviderAnswer, Source, TokenUsage};
