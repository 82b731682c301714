use crate::factory::ClientFactory;
use crate::html;
use anyhow::Context;
use axum::{extract::State, response::Html, routing::get, Router};
use groundfact_core::{GroundfactConfig, QueryRequest, QueryResult};
use groundfact_reasoning::{query, RetryConfig};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared state for the gateway server. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    config: Arc<GroundfactConfig>,
    request: Arc<QueryRequest>,
    retry: RetryConfig,
    factory: Arc<dyn ClientFactory>,
}

impl AppState {
    /// Fails when the configured prompt cannot form a query.
    pub fn new(config: GroundfactConfig, factory: Arc<dyn ClientFactory>) -> anyhow::Result<Self> {
        let request =
            QueryRequest::grounded(&config.prompt.user_query, &config.prompt.system_instruction)
                .context("Invalid [prompt] user_query")?;
        let retry = RetryConfig::from(&config.retry);
        Ok(Self {
            config: Arc::new(config),
            request: Arc::new(request),
            retry,
            factory,
        })
    }
}

/// The gateway HTTP server.
///
/// - `GET /` — grounded answer page
/// - `GET /health` — health check
pub struct GatewayServer {
    state: AppState,
    addr: String,
}

impl GatewayServer {
    pub fn new(config: GroundfactConfig, factory: Arc<dyn ClientFactory>) -> anyhow::Result<Self> {
        let addr = config.server.addr();
        Ok(Self {
            state: AppState::new(config, factory)?,
            addr,
        })
    }

    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    /// Bind and serve until the process is stopped.
    pub async fn serve(self) -> anyhow::Result<()> {
        let app = self.router();
        let listener = tokio::net::TcpListener::bind(&self.addr)
            .await
            .with_context(|| format!("Gateway failed to bind {}", self.addr))?;
        tracing::info!("Gateway listening on {}", self.addr);
        axum::serve(listener, app).await?;
        Ok(())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Route handlers
// ============================================================================

async fn health() -> &'static str {
    "ok"
}

/// GET / — every outcome is a 200 with an HTML body.
async fn home(State(state): State<AppState>) -> Html<String> {
    Html(render_home(&state).await)
}

/// Build the page for one request.
pub async fn render_home(state: &AppState) -> String {
    let llm = &state.config.llm;
    let prompt = &state.config.prompt;

    if llm.api_key.is_empty() {
        tracing::warn!("{} is not set; skipping API call", llm.api_key_env);
        return html::render_missing_credential(&llm.api_key_env);
    }

    let client = match state.factory.build(llm, llm.api_key.expose()) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Client initialization failed: {}", e);
            return html::render_client_error(&e.to_string());
        }
    };

    match query(&*client, &state.request, &state.retry).await {
        QueryResult::Success {
            answer_text,
            citations,
        } => {
            tracing::info!("Rendering answer with {} source(s)", citations.len());
            html::render_answer(prompt, &answer_text, &citations)
        }
        QueryResult::Failure { reason } => html::render_call_failed(&reason),
    }
}
