//! End-to-end flows through the shop assistant with scripted generators

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use retail_agent_agent::{InMemoryHistory, InMemorySnapshotProvider, ReplyKind, ShopAssistant};
use retail_agent_catalog::CatalogStore;
use retail_agent_config::Settings;
use retail_agent_core::{
    CatalogSnapshot, Category, GeneratorError, HistoryEntry, Product, ReplyGenerator,
};

/// Replays canned results and records what it was asked
#[derive(Default)]
struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, GeneratorError>>>,
    prompts: Mutex<Vec<String>>,
    history_lens: Mutex<Vec<usize>>,
}

impl ScriptedGenerator {
    fn new(replies: Vec<Result<String, GeneratorError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            ..Default::default()
        })
    }

    fn replying(text: &str) -> Arc<Self> {
        Self::new(vec![Ok(text.to_string())])
    }

    fn failing(times: usize, then: &str) -> Arc<Self> {
        let mut replies: Vec<_> = (0..times).map(|_| Err(GeneratorError::Timeout)).collect();
        replies.push(Ok(then.to_string()));
        Self::new(replies)
    }

    fn calls(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl ReplyGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        prompt: &str,
        history: &[HistoryEntry],
    ) -> Result<String, GeneratorError> {
        self.prompts.lock().push(prompt.to_string());
        self.history_lens.lock().push(history.len());
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(GeneratorError::Api("script exhausted".to_string())))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn scenario_a() -> CatalogSnapshot {
    CatalogSnapshot::from_lines([
        "CPU",
        "Intel i5 13400F,154.00",
        "Intel i5 10400F,100.00",
        "GPU",
        "RTX 4060,300.00",
    ])
}

struct Harness {
    assistant: ShopAssistant,
    generator: Arc<ScriptedGenerator>,
    history: Arc<InMemoryHistory>,
}

fn harness(
    snapshot: Option<CatalogSnapshot>,
    products: Vec<Product>,
    generator: Arc<ScriptedGenerator>,
) -> Harness {
    let settings = Settings::default();
    let snapshots = match snapshot {
        Some(snapshot) => InMemorySnapshotProvider::with_snapshot(snapshot, "narxlar.txt"),
        None => InMemorySnapshotProvider::new(),
    };
    let history = Arc::new(InMemoryHistory::new(&settings.history));
    let assistant = ShopAssistant::new(
        &settings,
        Arc::new(CatalogStore::with_products(products)),
        Arc::new(snapshots),
        history.clone(),
        generator.clone(),
    );
    Harness {
        assistant,
        generator,
        history,
    }
}

#[tokio::test]
async fn test_generated_reply_passes_through() {
    let h = harness(
        Some(scenario_a()),
        vec![],
        ScriptedGenerator::replying("Intel i5 13400F - 154$ sizga mos keladi."),
    );
    let reply = h.assistant.respond("u1", "13400f kerak").await;

    assert_eq!(reply.kind, ReplyKind::Generated);
    assert_eq!(reply.text, "Intel i5 13400F - 154$ sizga mos keladi.");
    assert_eq!(reply.constraints.category, Some(Category::Cpu));
    assert_eq!(reply.constraints.budget, None);

    let prompts = h.generator.prompts.lock();
    assert!(prompts[0].contains("## Catalog (narxlar.txt)"));
    assert!(prompts[0].contains("Intel i5 10400F,100.00"));
    assert!(!prompts[0].contains("RTX 4060"));
}

#[tokio::test]
async fn test_scenario_c_budget_exceeded_skips_generator() {
    let snapshot = CatalogSnapshot::from_lines([
        "CPU",
        "Intel i5 13400F,154.00",
        "Intel i7 13700K,340.00",
        "Intel i3 12100F,90.00",
    ]);
    let h = harness(Some(snapshot), vec![], ScriptedGenerator::replying("unused"));
    let reply = h
        .assistant
        .respond("u1", "13700k olsam bo'ladimi, byudjet 200$")
        .await;

    assert_eq!(reply.kind, ReplyKind::BudgetExceeded);
    assert_eq!(reply.constraints.budget, Some(200));
    assert!(reply.text.contains("Intel i7 13700K narxi 340.00$"));
    assert!(reply.text.contains("- Intel i5 13400F - 154.00$"));
    assert!(reply.text.contains("- Intel i3 12100F - 90.00$"));
    assert_eq!(h.generator.calls(), 0);
}

#[tokio::test]
async fn test_scenario_d_wrong_price_is_corrected() {
    let h = harness(
        Some(scenario_a()),
        vec![],
        ScriptedGenerator::replying("Intel i5 13400F atigi 200$ turadi."),
    );
    let reply = h.assistant.respond("u1", "13400f kerak").await;

    assert_eq!(reply.kind, ReplyKind::Corrected);
    assert_eq!(reply.text, "Intel i5 13400F atigi 154.00$ turadi.");
}

#[tokio::test]
async fn test_fabricated_price_falls_back_to_listing() {
    let h = harness(
        Some(scenario_a()),
        vec![],
        ScriptedGenerator::replying("AMD Ryzen 5 7600 ni 230$ ga olishingiz mumkin."),
    );
    let reply = h.assistant.respond("u1", "13400f kerak").await;

    assert_eq!(reply.kind, ReplyKind::Fallback);
    assert!(!reply.text.contains("230"));
    assert!(reply.text.contains("- Intel i5 13400F - 154.00$"));
    assert!(reply.text.contains("- Intel i5 10400F - 100.00$"));
}

#[tokio::test]
async fn test_safety_block_falls_back_without_retry() {
    let sentinel = Settings::default().generator.safety_block_reply;
    let h = harness(Some(scenario_a()), vec![], ScriptedGenerator::replying(&sentinel));
    let reply = h.assistant.respond("u1", "13400f kerak").await;

    assert_eq!(reply.kind, ReplyKind::Fallback);
    assert_ne!(reply.text, sentinel);
    assert_eq!(h.generator.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_transient_failures_are_retried() {
    let h = harness(
        Some(scenario_a()),
        vec![],
        ScriptedGenerator::failing(2, "Intel i5 13400F - 154.00$"),
    );
    let reply = h.assistant.respond("u1", "13400f kerak").await;

    assert_eq!(reply.kind, ReplyKind::Generated);
    assert_eq!(h.generator.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_attempts_are_bounded() {
    let attempts = Settings::default().generator.max_attempts as usize;
    let h = harness(
        Some(scenario_a()),
        vec![],
        ScriptedGenerator::failing(attempts, "too late"),
    );
    let reply = h.assistant.respond("u1", "13400f kerak").await;

    assert_eq!(reply.kind, ReplyKind::Fallback);
    assert_eq!(h.generator.calls(), attempts);
}

#[tokio::test]
async fn test_typed_catalog_used_without_snapshot() {
    let products = vec![
        Product::new("gpu-1", "RTX 4060", 300.0).with_category("GPU").with_stock(4),
        Product::new("gpu-2", "RTX 4070", 600.0).with_category("GPU").with_stock(2),
    ];
    let h = harness(None, products, ScriptedGenerator::replying("RTX 4060 - 300$ mavjud."));
    let reply = h.assistant.respond("u1", "rtx 4060 500$ gacha").await;

    assert_eq!(reply.kind, ReplyKind::Generated);
    assert_eq!(reply.constraints.budget, Some(500));

    let prompts = h.generator.prompts.lock();
    assert!(prompts[0].contains("## Matching Products"));
    assert!(prompts[0].contains("RTX 4060, 300.00$ [GPU]"));
    assert!(!prompts[0].contains("RTX 4070"));
}

#[tokio::test]
async fn test_no_catalog_reply() {
    let h = harness(None, vec![], ScriptedGenerator::replying("unused"));
    let reply = h.assistant.respond("u1", "videokarta kerak").await;

    assert_eq!(reply.kind, ReplyKind::NoCatalog);
    assert_eq!(h.generator.calls(), 0);
}

#[tokio::test]
async fn test_history_fills_ambiguous_follow_up() {
    let h = harness(
        Some(scenario_a()),
        vec![],
        ScriptedGenerator::replying("RTX 4060 - 300$ eng yaxshi tanlov."),
    );
    h.history
        .record("u1", "videokarta kerak 400$ gacha", "Qaysi maqsadda?");

    let reply = h.assistant.respond("u1", "qaysi biri yaxshi?").await;

    assert_eq!(reply.kind, ReplyKind::Generated);
    assert_eq!(reply.constraints.budget, Some(400));
    assert_eq!(reply.constraints.category, Some(Category::Gpu));
    assert_eq!(*h.generator.history_lens.lock(), vec![1]);

    // a different user has no history to borrow from
    let generator = ScriptedGenerator::replying("Qaysi turkum kerak?");
    let other = harness(Some(scenario_a()), vec![], generator);
    let reply = other.assistant.respond("u2", "qaysi biri yaxshi?").await;
    assert!(reply.constraints.is_empty());
}
