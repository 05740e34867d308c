//! Archway server binary.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use archway::adapters::ai::{AnthropicConfig, AnthropicModel, OpenAiConfig, OpenAiModel};
use archway::adapters::diagram::{FsDiagramStore, HttpDiagramRenderer, HttpDiagramRendererConfig};
use archway::adapters::http::{
    conversation_router, health_router, ConversationHandlers, FixedWindowLimiter,
};
use archway::adapters::postgres::{
    PostgresMessageStore, PostgresRequirementStore, PostgresSessionStore,
};
use archway::adapters::pricing::{HttpPriceSource, HttpPriceSourceConfig};
use archway::adapters::redis::RedisPriceCache;
use archway::application::handlers::conversation::{ContextManager, ConversationOrchestrator};
use archway::application::handlers::diagram::DiagramService;
use archway::application::handlers::intent::IntentClassifier;
use archway::application::handlers::pricing::CostEstimator;
use archway::application::handlers::recommendation::RecommendationEngine;
use archway::application::handlers::requirement::RequirementExtractor;
use archway::application::handlers::session::{CreateSessionHandler, SessionLifecycle};
use archway::config::{AiProvider, AppConfig};
use archway::domain::recommendation::ServiceCatalog;
use archway::ports::{
    DiagramRenderer, DiagramStore, LanguageModel, MessageStore, PriceCache, PriceSource,
    RequirementStore, SessionStore,
};
use secrecy::ExposeSecret;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let sessions: Arc<dyn SessionStore> = Arc::new(PostgresSessionStore::new(pool.clone()));
    let messages: Arc<dyn MessageStore> = Arc::new(PostgresMessageStore::new(pool.clone()));
    let requirements: Arc<dyn RequirementStore> =
        Arc::new(PostgresRequirementStore::new(pool.clone()));

    let model: Arc<dyn LanguageModel> = match config.ai.provider {
        AiProvider::Anthropic => {
            let mut provider_config =
                AnthropicConfig::new(config.ai.api_key.expose_secret().clone());
            if let Some(model) = &config.ai.model {
                provider_config = provider_config.with_model(model.clone());
            }
            Arc::new(AnthropicModel::new(provider_config)?)
        }
        AiProvider::OpenAi => {
            let mut provider_config = OpenAiConfig::new(config.ai.api_key.expose_secret().clone());
            if let Some(model) = &config.ai.model {
                provider_config = provider_config.with_model(model.clone());
            }
            Arc::new(OpenAiModel::new(provider_config)?)
        }
    };

    let redis_client = redis::Client::open(config.redis.url.as_str())?;
    let price_cache: Arc<dyn PriceCache> = Arc::new(RedisPriceCache::new(
        redis_client,
        (config.pricing.cache_ttl_hours * 3600) as usize,
    ));
    let price_source: Arc<dyn PriceSource> = Arc::new(HttpPriceSource::new(
        HttpPriceSourceConfig::new(config.pricing.base_url.clone()),
    )?);

    let renderer: Arc<dyn DiagramRenderer> = Arc::new(HttpDiagramRenderer::new(
        HttpDiagramRendererConfig::new(config.diagram.renderer_url.clone()),
    )?);
    let diagram_store: Arc<dyn DiagramStore> =
        Arc::new(FsDiagramStore::new(config.diagram.output_dir.clone()));

    let context = Arc::new(ContextManager::new(
        sessions.clone(),
        messages.clone(),
        requirements.clone(),
    ));
    let estimator = Arc::new(
        CostEstimator::new(price_cache, price_source)
            .with_freshness(chrono::Duration::hours(config.pricing.freshness_hours)),
    );
    let orchestrator = Arc::new(ConversationOrchestrator::new(
        Arc::new(IntentClassifier::new(model.clone())),
        Arc::new(RequirementExtractor::new(model.clone())),
        Arc::new(RecommendationEngine::new(
            model.clone(),
            ServiceCatalog::embedded(),
        )),
        estimator,
        Arc::new(DiagramService::new(renderer, diagram_store)),
        context.clone(),
        messages.clone(),
        requirements.clone(),
    ));

    let handlers = ConversationHandlers::new(
        Arc::new(CreateSessionHandler::new(sessions.clone())),
        Arc::new(SessionLifecycle::new(sessions, context)),
        orchestrator,
        messages,
        Arc::new(FixedWindowLimiter::new(
            config.limits.messages_per_minute,
            Duration::from_secs(60),
        )),
    );

    let app = conversation_router(handlers)
        .merge(health_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_secs(120)));

    let addr = config.server.socket_addr()?;
    tracing::info!(%addr, "archway listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
