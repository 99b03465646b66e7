use async_trait::async_trait;

use crate::types::{ProbeContext, ProviderAnswer};

/// The uniform contract every AI backend hides behind.
///
/// `answer` must not fail: any transport, auth, or parsing problem is
/// converted into a [`ProviderAnswer`] with `error` set and empty text.
/// Callers treat a present `error` as "no usable signal from this
/// platform", never as a reason to abort the run.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Stable platform identifier, e.g. `"openai"`.
    fn platform(&self) -> &str;

    /// Ask the platform one question.
    async fn answer(&self, prompt: &str, ctx: &ProbeContext) -> ProviderAnswer;
}
