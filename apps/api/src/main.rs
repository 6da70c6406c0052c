use std::net::SocketAddr;
use std::sync::Arc;

use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use conversation_cell::{ConversationEngine, InMemoryConversationStore};
use messaging_cell::WhatsAppGateway;
use shared_config::AppConfig;
use webhook_cell::WebhookState;

#[tokio::main]
async fn main() {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting booking bot API server");

    // Load configuration
    let config = Arc::new(AppConfig::from_env());

    // Wire the conversation engine: in-memory store, WhatsApp gateway.
    // The store is an ephemeral cache; state does not survive restarts.
    let store = Arc::new(InMemoryConversationStore::new());
    let gateway = Arc::new(WhatsAppGateway::new(&config));
    let engine = Arc::new(ConversationEngine::new(store, gateway));

    let state = Arc::new(WebhookState {
        config: config.clone(),
        engine,
    });

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the application router
    let app = router::create_router(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors);

    // Run the server
    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
