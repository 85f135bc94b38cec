//! Shop assistant orchestrator
//!
//! One call to [`ShopAssistant::respond`] runs a user message end to end:
//!
//! ```text
//! history -> constraints -> textual pipeline ----------> prompt -> generator -> validator
//!                             | snapshot NotFound               |  failure / safety block / flagged
//!                             v                                 v
//!                           typed ranking ---------------->  template reply
//! ```
//!
//! Every error on the way is recovered here; the caller always gets text.

use std::sync::Arc;
use std::time::Duration;

use retail_agent_catalog::{CatalogEntry, CatalogStore, CatalogView, FilterPipeline};
use retail_agent_config::{GeneratorConfig, Settings};
use retail_agent_core::{
    CatalogSnapshot, ExtractedConstraints, GeneratorError, HistoryEntry, HistoryProvider,
    ReplyGenerator, ScoredProduct, SnapshotProvider,
};
use retail_agent_text_processing::ConstraintExtractor;

use crate::prompt::PromptBuilder;
use crate::templates::ResponseTemplates;
use crate::validator::{ResponseValidator, ValidationOutcome};

/// How a reply was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// Generator output accepted as is
    Generated,
    /// Generator output with prices or totals rewritten from the catalog
    Corrected,
    /// Named product above the budget; generator skipped
    BudgetExceeded,
    /// Template listing after a generator failure, safety block or flagged reply
    Fallback,
    NoMatch,
    NoCatalog,
}

/// Final reply for one user message
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantReply {
    pub text: String,
    pub kind: ReplyKind,
    /// Effective constraints the reply was built from
    pub constraints: ExtractedConstraints,
}

impl AssistantReply {
    fn new(text: String, kind: ReplyKind, constraints: ExtractedConstraints) -> Self {
        Self {
            text,
            kind,
            constraints,
        }
    }
}

/// Why a generation attempt produced no usable text
enum GenerationFailure {
    SafetyBlock,
    Generator(GeneratorError),
}

/// Request orchestrator
pub struct ShopAssistant {
    extractor: ConstraintExtractor,
    pipeline: FilterPipeline,
    validator: ResponseValidator,
    store: Arc<CatalogStore>,
    snapshots: Arc<dyn SnapshotProvider>,
    history: Arc<dyn HistoryProvider>,
    generator: Arc<dyn ReplyGenerator>,
    generator_config: GeneratorConfig,
    history_limit: usize,
    max_results: usize,
}

impl ShopAssistant {
    pub fn new(
        settings: &Settings,
        store: Arc<CatalogStore>,
        snapshots: Arc<dyn SnapshotProvider>,
        history: Arc<dyn HistoryProvider>,
        generator: Arc<dyn ReplyGenerator>,
    ) -> Self {
        Self {
            extractor: ConstraintExtractor::with_config(settings.extraction.clone()),
            pipeline: FilterPipeline::with_config(settings.filter.clone()),
            validator: ResponseValidator::new(settings.validator.clone()),
            store,
            snapshots,
            history,
            generator,
            generator_config: settings.generator.clone(),
            history_limit: settings.history.limit,
            max_results: settings.search.max_results,
        }
    }

    /// Answer one user message
    pub async fn respond(&self, user_id: &str, text: &str) -> AssistantReply {
        let history = self.load_history(user_id);
        let constraints = self.extractor.extract_with_history(text, &history);
        tracing::debug!(
            user_id,
            constraints = %constraints,
            history_turns = history.len(),
            "Constraints extracted"
        );

        let reply = match self.snapshots.text_snapshot() {
            Ok((snapshot, label)) => {
                self.respond_from_snapshot(text, &history, &snapshot, &label, constraints)
                    .await
            }
            Err(e) => {
                if !e.is_not_found() {
                    tracing::warn!(error = %e, "Snapshot provider failed, using typed catalog");
                }
                self.respond_from_store(text, &history, constraints).await
            }
        };

        tracing::info!(user_id, kind = ?reply.kind, "Reply ready");
        reply
    }

    fn load_history(&self, user_id: &str) -> Vec<HistoryEntry> {
        match self.history.get_history(user_id, self.history_limit) {
            Ok(entries) => entries,
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => {
                tracing::warn!(user_id, error = %e, "History unavailable");
                Vec::new()
            }
        }
    }

    async fn respond_from_snapshot(
        &self,
        text: &str,
        history: &[HistoryEntry],
        snapshot: &CatalogSnapshot,
        label: &str,
        constraints: ExtractedConstraints,
    ) -> AssistantReply {
        let prepared = self.pipeline.prepare(snapshot, &constraints, text);
        let constraints = prepared.constraints;

        let (catalog, entries) = match prepared.view {
            CatalogView::BudgetExceeded(exceeded) => {
                tracing::info!(
                    product = %exceeded.requested.name,
                    price = exceeded.requested.price,
                    ceiling = exceeded.ceiling,
                    "Requested product exceeds budget"
                );
                return AssistantReply::new(
                    ResponseTemplates::budget_exceeded(&exceeded),
                    ReplyKind::BudgetExceeded,
                    constraints,
                );
            }
            CatalogView::Empty { .. } => {
                return AssistantReply::new(
                    ResponseTemplates::no_match(),
                    ReplyKind::NoMatch,
                    constraints,
                );
            }
            CatalogView::Filtered {
                catalog, entries, ..
            } => (catalog, entries),
        };

        let prompt = PromptBuilder::new()
            .system_prompt()
            .with_constraints(&constraints)
            .with_catalog(label, &catalog)
            .user_message(text)
            .build();

        let fallback =
            || ResponseTemplates::safe_listing(&entries, &constraints, self.pipeline.config());
        self.generate_checked(&prompt, history, &entries, fallback, constraints.clone())
            .await
    }

    async fn respond_from_store(
        &self,
        text: &str,
        history: &[HistoryEntry],
        constraints: ExtractedConstraints,
    ) -> AssistantReply {
        if self.store.is_empty() {
            return AssistantReply::new(
                ResponseTemplates::no_catalog(),
                ReplyKind::NoCatalog,
                constraints,
            );
        }

        let results: Vec<ScoredProduct> = self
            .store
            .search(text, self.max_results)
            .into_iter()
            .filter(|r| {
                constraints
                    .budget
                    .map_or(true, |ceiling| r.product.price <= ceiling as f64)
            })
            .collect();
        tracing::debug!(results = results.len(), "Typed catalog search");

        if results.is_empty() {
            return AssistantReply::new(
                ResponseTemplates::no_match(),
                ReplyKind::NoMatch,
                constraints,
            );
        }

        let entries: Vec<CatalogEntry> = results
            .iter()
            .enumerate()
            .map(|(line, r)| CatalogEntry {
                name: r.product.name.clone(),
                price: r.product.price,
                category: (!r.product.category.is_empty()).then(|| r.product.category.clone()),
                line,
            })
            .collect();

        let prompt = PromptBuilder::new()
            .system_prompt()
            .with_constraints(&constraints)
            .with_ranked_products(&results)
            .user_message(text)
            .build();

        let fallback = || ResponseTemplates::ranked_listing(&results);
        self.generate_checked(&prompt, history, &entries, fallback, constraints.clone())
            .await
    }

    /// Generate, validate, and fall back to `fallback` on any doubt
    async fn generate_checked<F>(
        &self,
        prompt: &str,
        history: &[HistoryEntry],
        entries: &[CatalogEntry],
        fallback: F,
        constraints: ExtractedConstraints,
    ) -> AssistantReply
    where
        F: FnOnce() -> String,
    {
        let reply = match self.generate_with_retry(prompt, history).await {
            Ok(reply) => reply,
            Err(GenerationFailure::SafetyBlock) => {
                tracing::warn!(generator = self.generator.name(), "Generator safety block, using template");
                return AssistantReply::new(fallback(), ReplyKind::Fallback, constraints);
            }
            Err(GenerationFailure::Generator(e)) => {
                tracing::warn!(generator = self.generator.name(), error = %e, "Generation failed, using template");
                return AssistantReply::new(fallback(), ReplyKind::Fallback, constraints);
            }
        };

        match self.validator.validate(&reply, entries) {
            ValidationOutcome::Flagged { suspect_prices, .. } => {
                tracing::warn!(suspect_prices = ?suspect_prices, "Reply quotes untraceable prices, using template");
                AssistantReply::new(fallback(), ReplyKind::Fallback, constraints)
            }
            outcome => {
                let kind = if outcome.corrections().is_empty() {
                    ReplyKind::Generated
                } else {
                    ReplyKind::Corrected
                };
                AssistantReply::new(outcome.into_reply(), kind, constraints)
            }
        }
    }

    /// Bounded attempts with exponential backoff on retryable errors
    async fn generate_with_retry(
        &self,
        prompt: &str,
        history: &[HistoryEntry],
    ) -> Result<String, GenerationFailure> {
        let max_attempts = self.generator_config.max_attempts.max(1);
        let mut backoff = Duration::from_millis(self.generator_config.initial_backoff_ms);
        let mut last_error = None;

        for attempt in 0..max_attempts {
            if attempt > 0 {
                tracing::warn!(
                    "Generation failed, retrying in {:?} (attempt {}/{})",
                    backoff,
                    attempt + 1,
                    max_attempts
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }

            match self.generator.generate(prompt, history).await {
                Ok(reply) if reply.trim() == self.generator_config.safety_block_reply.trim() => {
                    return Err(GenerationFailure::SafetyBlock);
                }
                Ok(reply) if reply.trim().is_empty() => {
                    return Err(GenerationFailure::Generator(GeneratorError::InvalidResponse(
                        "empty reply".to_string(),
                    )));
                }
                Ok(reply) => return Ok(reply),
                Err(e) if e.is_retryable() => {
                    last_error = Some(e);
                }
                Err(e) => return Err(GenerationFailure::Generator(e)),
            }
        }

        Err(GenerationFailure::Generator(last_error.unwrap_or_else(|| {
            GeneratorError::Network("Max attempts exceeded".to_string())
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::InMemoryHistory;
    use crate::snapshot::InMemorySnapshotProvider;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    struct Scripted {
        replies: Mutex<Vec<Result<String, GeneratorError>>>,
        calls: Mutex<usize>,
    }

    impl Scripted {
        fn new(replies: Vec<Result<String, GeneratorError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies),
                calls: Mutex::new(0),
            })
        }
    }

    #[async_trait]
    impl ReplyGenerator for Scripted {
        async fn generate(
            &self,
            _prompt: &str,
            _history: &[HistoryEntry],
        ) -> Result<String, GeneratorError> {
            *self.calls.lock() += 1;
            let mut replies = self.replies.lock();
            if replies.is_empty() {
                return Err(GeneratorError::Api("script exhausted".to_string()));
            }
            replies.remove(0)
        }
    }

    fn assistant(generator: Arc<Scripted>) -> ShopAssistant {
        let mut settings = Settings::default();
        settings.generator.initial_backoff_ms = 1;
        let snapshots = InMemorySnapshotProvider::with_snapshot(
            CatalogSnapshot::from_lines(["CPU", "Intel i5 13400F,154.00", "Intel i7 13700K,340.00"]),
            "main",
        );
        ShopAssistant::new(
            &settings,
            Arc::new(CatalogStore::new()),
            Arc::new(snapshots),
            Arc::new(InMemoryHistory::default()),
            generator,
        )
    }

    #[tokio::test]
    async fn test_retryable_errors_are_retried() {
        let generator = Scripted::new(vec![
            Err(GeneratorError::Timeout),
            Ok("Intel i5 13400F - 154.00$".to_string()),
        ]);
        let reply = assistant(generator.clone()).respond("u1", "protsessor kerak").await;
        assert_eq!(reply.kind, ReplyKind::Generated);
        assert_eq!(*generator.calls.lock(), 2);
    }

    #[tokio::test]
    async fn test_non_retryable_error_falls_back_immediately() {
        let generator = Scripted::new(vec![Err(GeneratorError::Api("quota".to_string()))]);
        let reply = assistant(generator.clone()).respond("u1", "protsessor kerak").await;
        assert_eq!(reply.kind, ReplyKind::Fallback);
        assert!(reply.text.contains("Intel i5 13400F"));
        assert_eq!(*generator.calls.lock(), 1);
    }

    #[tokio::test]
    async fn test_empty_reply_falls_back() {
        let generator = Scripted::new(vec![Ok("   ".to_string())]);
        let reply = assistant(generator).respond("u1", "protsessor kerak").await;
        assert_eq!(reply.kind, ReplyKind::Fallback);
    }
}
