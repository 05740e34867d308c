//! End-to-end conversation turn scenarios.
//!
//! Drives the orchestration core through in-memory adapters and the
//! scripted language model: architecture requests, pricing follow-ups,
//! multi-intent ordering, and session expiry.

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;

use archway::adapters::memory::{
    InMemoryDiagramStore, InMemoryMessageStore, InMemoryPriceCache, InMemoryRequirementStore,
    InMemorySessionStore, PassthroughDiagramRenderer, ScriptedLanguageModel, StaticPriceSource,
};
use archway::application::handlers::conversation::{ContextManager, ConversationOrchestrator};
use archway::application::handlers::diagram::DiagramService;
use archway::application::handlers::intent::IntentClassifier;
use archway::application::handlers::pricing::CostEstimator;
use archway::application::handlers::recommendation::RecommendationEngine;
use archway::application::handlers::requirement::RequirementExtractor;
use archway::application::handlers::session::{CreateSessionHandler, SessionLifecycle};
use archway::domain::foundation::{MessageId, SessionId, Timestamp};
use archway::domain::intent::IntentCategory;
use archway::domain::pricing::PriceQuote;
use archway::domain::recommendation::ServiceCatalog;
use archway::domain::requirement::RequirementCategory;
use archway::domain::session::{Session, SESSION_TTL_DAYS};
use archway::ports::{RequirementStore, SessionStore};

struct World {
    model: Arc<ScriptedLanguageModel>,
    sessions: Arc<InMemorySessionStore>,
    requirements: Arc<InMemoryRequirementStore>,
    orchestrator: ConversationOrchestrator,
    lifecycle: SessionLifecycle,
    create_handler: CreateSessionHandler,
}

fn world() -> World {
    let model = Arc::new(ScriptedLanguageModel::new());
    let sessions = Arc::new(InMemorySessionStore::new());
    let messages = Arc::new(InMemoryMessageStore::new());
    let requirements = Arc::new(InMemoryRequirementStore::new());

    let context = Arc::new(ContextManager::new(
        sessions.clone(),
        messages.clone(),
        requirements.clone(),
    ));
    let estimator = Arc::new(CostEstimator::new(
        Arc::new(InMemoryPriceCache::new()),
        Arc::new(
            StaticPriceSource::new()
                .with_price(
                    "EC2",
                    PriceQuote::new(Decimal::from_str("0.10").unwrap(), "USD", "per hour"),
                )
                .with_price(
                    "RDS",
                    PriceQuote::new(Decimal::from_str("120.50").unwrap(), "USD", "per month"),
                )
                .with_price(
                    "S3",
                    PriceQuote::new(Decimal::from_str("23.00").unwrap(), "USD", "per month"),
                ),
        ),
    ));

    let orchestrator = ConversationOrchestrator::new(
        Arc::new(IntentClassifier::new(model.clone())),
        Arc::new(RequirementExtractor::new(model.clone())),
        Arc::new(RecommendationEngine::new(
            model.clone(),
            ServiceCatalog::embedded(),
        )),
        estimator,
        Arc::new(DiagramService::new(
            Arc::new(PassthroughDiagramRenderer::new()),
            Arc::new(InMemoryDiagramStore::new()),
        )),
        context.clone(),
        messages.clone(),
        requirements.clone(),
    );

    let lifecycle = SessionLifecycle::new(sessions.clone(), context);
    let create_handler = CreateSessionHandler::new(sessions.clone());

    World {
        model,
        sessions,
        requirements,
        orchestrator,
        lifecycle,
        create_handler,
    }
}

const SHOP_PROPOSAL: &str = r#"{
    "services": [
        {"name": "EC2", "role": "web server", "depends_on": ["ELB"]},
        {"name": "ELB", "role": "load balancer"},
        {"name": "RDS", "role": "primary database"},
        {"name": "S3", "role": "static assets"}
    ],
    "configurations": [
        {"service": "EC2", "config_type": "instance_type", "value": "t3.medium"}
    ],
    "explanation": "A small e-commerce stack sized for about a thousand users.",
    "alignment": {"security": "Security groups isolate the database tier."}
}"#;

async fn script_shop_turn(world: &World) {
    world
        .model
        .script_classification(
            r#"{"intents": [{"intent_type": "architecture_request", "confidence": 0.92,
                "extracted_entities": {"requirements": ["电商网站", "1000用户"]}}]}"#,
        )
        .await;
    world
        .model
        .script_extraction(
            r#"{"requirements": [
                {"requirement_type": "application_type", "requirement_value": "e-commerce website", "confidence": 0.95},
                {"requirement_type": "scale", "requirement_value": "1000 users", "confidence": 0.9}
            ]}"#,
        )
        .await;
    world.model.script_proposal(SHOP_PROPOSAL).await;
}

// Scenario A: a Chinese-language architecture request extracts an
// application_type and a scale requirement and yields a recommendation
// with a services section in the reply.
#[tokio::test]
async fn scenario_a_architecture_request_produces_recommendation() {
    let world = world();
    let session = world.create_handler.handle().await.unwrap();
    script_shop_turn(&world).await;

    let reply = world
        .orchestrator
        .process_message(
            *session.id(),
            MessageId::new(),
            "我需要一个小型电商网站架构，大概1000用户",
        )
        .await
        .unwrap();

    let stored = world
        .requirements
        .get_by_session(session.id())
        .await
        .unwrap();
    assert!(stored
        .iter()
        .any(|r| r.category() == RequirementCategory::ApplicationType));
    assert!(stored
        .iter()
        .any(|r| r.category() == RequirementCategory::Scale));

    assert_eq!(reply.recommendations.len(), 1);
    assert!(!reply.recommendations[0].services().is_empty());
    assert!(reply.content.contains("**Recommended services:**"));
    assert!(reply.content.contains("EC2"));
}

// Scenario B: a pricing follow-up in the same session classifies one
// pricing_query with priority 2 and populates the pricing field from
// that intent's result.
#[tokio::test]
async fn scenario_b_pricing_followup_populates_pricing() {
    let world = world();
    let session = world.create_handler.handle().await.unwrap();

    script_shop_turn(&world).await;
    world
        .orchestrator
        .process_message(
            *session.id(),
            MessageId::new(),
            "我需要一个小型电商网站架构，大概1000用户",
        )
        .await
        .unwrap();

    world
        .model
        .script_classification(
            r#"{"intents": [{"intent_type": "pricing_query", "confidence": 0.9}]}"#,
        )
        .await;
    world.model.script_extraction(r#"{"requirements": []}"#).await;

    let reply = world
        .orchestrator
        .process_message(*session.id(), MessageId::new(), "这个多少钱？")
        .await
        .unwrap();

    assert_eq!(reply.intents.len(), 1);
    assert_eq!(reply.intents[0].category(), IntentCategory::PricingQuery);
    assert_eq!(reply.intents[0].priority(), 2);

    let pricing = reply.pricing.expect("pricing should be populated");
    // EC2 0.10/h * 730 + RDS 120.50 + S3 23.00; ELB is unpriced and skipped.
    assert_eq!(
        pricing.total_monthly(),
        Decimal::from_str("216.50").unwrap()
    );
}

// Scenario C: a combined architecture + pricing utterance renders the
// architecture section before the pricing section regardless of the
// order the classifier returned the intents in.
#[tokio::test]
async fn scenario_c_two_intent_reply_orders_sections() {
    let world = world();
    let session = world.create_handler.handle().await.unwrap();

    world
        .model
        .script_classification(
            r#"{"intents": [
                {"intent_type": "pricing_query", "confidence": 0.88},
                {"intent_type": "architecture_request", "confidence": 0.93}
            ]}"#,
        )
        .await;
    world
        .model
        .script_extraction(
            r#"{"requirements": [
                {"requirement_type": "application_type", "requirement_value": "e-commerce website"},
                {"requirement_type": "scale", "requirement_value": "1000 users"}
            ]}"#,
        )
        .await;
    world.model.script_proposal(SHOP_PROPOSAL).await;

    let reply = world
        .orchestrator
        .process_message(
            *session.id(),
            MessageId::new(),
            "给我推荐一个电商架构，顺便告诉我要花多少钱",
        )
        .await
        .unwrap();

    let arch_at = reply
        .content
        .find("## Architecture Recommendation")
        .expect("architecture section present");
    let pricing_at = reply.content.find("## Pricing").expect("pricing section present");
    assert!(arch_at < pricing_at);

    // Classification order was pricing-first; processing order is not.
    assert_eq!(
        reply.intents[0].category(),
        IntentCategory::ArchitectureRequest
    );
    assert_eq!(reply.intents[1].category(), IntentCategory::PricingQuery);
}

// Scenario D: resuming a session whose expiry lies in the past returns
// absent even though the record still exists in the store.
#[tokio::test]
async fn scenario_d_expired_session_resume_returns_absent() {
    let world = world();

    let created = Timestamp::now().minus_days(SESSION_TTL_DAYS + 5);
    let expired = Session::reconstitute(
        SessionId::new(),
        created,
        created,
        created.add_days(SESSION_TTL_DAYS),
        None,
        None,
    );
    world.sessions.create(&expired).await.unwrap();

    assert!(world
        .lifecycle
        .resume(expired.id())
        .await
        .unwrap()
        .is_none());
    assert!(world
        .sessions
        .get(expired.id())
        .await
        .unwrap()
        .is_some());
}

// Merging the same turn twice leaves the requirement set unchanged;
// context updates are idempotent under the value-dedup rule.
#[tokio::test]
async fn repeated_turns_with_identical_extraction_do_not_duplicate() {
    let world = world();
    let session = world.create_handler.handle().await.unwrap();

    for _ in 0..2 {
        script_shop_turn(&world).await;
        world
            .orchestrator
            .process_message(
                *session.id(),
                MessageId::new(),
                "我需要一个小型电商网站架构，大概1000用户",
            )
            .await
            .unwrap();
    }

    let stored = world
        .requirements
        .get_by_session(session.id())
        .await
        .unwrap();
    assert_eq!(stored.len(), 2);

    let context = world
        .lifecycle
        .restore_context(session.id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(context.requirements().len(), 2);
}

// A turn on a live session after total understanding failure still
// answers decorously instead of erroring.
#[tokio::test]
async fn understanding_outage_still_produces_a_reply() {
    let world = world();
    let session = world.create_handler.handle().await.unwrap();
    world.model.fail_all().await;

    let reply = world
        .orchestrator
        .process_message(*session.id(), MessageId::new(), "你好")
        .await
        .unwrap();

    assert!(!reply.content.is_empty());
    assert!(reply.intents.is_empty());
    assert!(reply.recommendations.is_empty());
}
