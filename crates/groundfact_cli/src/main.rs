use clap::Parser;
use groundfact_core::{ApiKey, GroundfactConfig};
use groundfact_gateway::{ClientFactory, GatewayServer, GeminiFactory, SharedClientFactory};
use groundfact_reasoning::providers::MockProvider;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, env = "GROUNDFACT_CONFIG", default_value = "groundfact.toml")]
    config: String,

    /// Address to bind (overrides config and GROUNDFACT_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config and PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Gemini model to use
    #[arg(short, long)]
    model: Option<String>,

    /// Maximum attempts per query, including the first
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Answer from the built-in mock provider instead of Gemini
    #[arg(long)]
    mock: bool,

    /// Number of mock calls that fail before answers start
    #[arg(long, default_value_t = 0, requires = "mock")]
    mock_failures: u32,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

impl Args {
    /// Command-line flags win over file and environment.
    fn apply(&self, config: &mut GroundfactConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if let Some(n) = self.max_attempts {
            config.retry.max_attempts = n;
        }
        if self.mock && config.llm.api_key.is_empty() {
            config.llm.api_key = ApiKey::new("mock");
        }
    }

    fn factory(&self, config: &GroundfactConfig) -> Arc<dyn ClientFactory> {
        if self.mock {
            let provider = MockProvider::new(&config.llm.model).with_failures(self.mock_failures);
            Arc::new(SharedClientFactory(Arc::new(provider)))
        } else {
            Arc::new(GeminiFactory)
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.log_json);

    let mut config = GroundfactConfig::load_or_default(&args.config);
    args.apply(&mut config);

    info!(
        model = %config.llm.model,
        max_attempts = config.retry.max_attempts,
        mock = args.mock,
        "Starting groundfact on {}",
        config.server.addr()
    );
    if config.llm.api_key.is_empty() {
        info!(
            "{} is not set; pages will report the missing credential",
            config.llm.api_key_env
        );
    }

    let factory = args.factory(&config);
    GatewayServer::new(config, factory)?.serve().await
}
