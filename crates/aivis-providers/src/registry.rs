//! Ordered registry of provider adapters.
//!
//! The dispatcher fans out over whatever is registered here; adding a
//! platform (or a test double) is a registration, not a dispatch-logic
//! change. Registration order is the report's platform order.

use std::sync::Arc;

use crate::traits::Provider;

#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn Provider>>,
}

impl ProviderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter. A duplicate platform id replaces the earlier
    /// registration in place, keeping its position.
    #[must_use]
    pub fn register(mut self, provider: Arc<dyn Provider>) -> Self {
        if let Some(existing) = self
            .providers
            .iter_mut()
            .find(|p| p.platform() == provider.platform())
        {
            *existing = provider;
        } else {
            self.providers.push(provider);
        }
        self
    }

    #[must_use]
    pub fn providers(&self) -> &[Arc<dyn Provider>] {
        &self.providers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Platform identifiers in registration order.
    #[must_use]
    pub fn platforms(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.platform()).collect()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use crate::types::{ProbeContext, ProviderAnswer};

    use super::*;

    struct StubProvider {
        platform: &'static str,
        reply: &'static str,
    }

    #[async_trait]
    impl Provider for StubProvider {
        fn platform(&self) -> &str {
            self.platform
        }

        async fn answer(&self, _prompt: &str, _ctx: &ProbeContext) -> ProviderAnswer {
            ProviderAnswer::ok(
                self.platform,
                self.reply.to_string(),
                vec![],
                None,
                std::time::Duration::ZERO,
            )
        }
    }

    #[test]
    fn registration_order_is_preserved() {
        let registry = ProviderRegistry::new()
            .register(Arc::new(StubProvider {
                platform: "openai",
                reply: "a",
            }))
            .register(Arc::new(StubProvider {
                platform: "gemini",
                reply: "b",
            }));
        assert_eq!(registry.platforms(), vec!["openai", "gemini"]);
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn duplicate_platform_replaces_in_place() {
        let registry = ProviderRegistry::new()
            .register(Arc::new(StubProvider {
                platform: "openai",
                reply: "first",
            }))
            .register(Arc::new(StubProvider {
                platform: "gemini",
                reply: "b",
            }))
            .register(Arc::new(StubProvider {
                platform: "openai",
                reply: "second",
            }));

        assert_eq!(registry.platforms(), vec!["openai", "gemini"]);
        let ctx = ProbeContext::new(aivis_core::RunId::new(), "probe", "example.com");
        let answer = registry.providers()[0].answer("q", &ctx).await;
        assert_eq!(answer.text, "second");
    }

    #[test]
    fn empty_registry_reports_empty() {
        let registry = ProviderRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.platforms().is_empty());
    }
}
