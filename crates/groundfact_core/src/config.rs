use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are a friendly, witty, and highly helpful assistant running on a new web service. Your task is to greet the user and provide a single, fascinating, and up-to-date piece of information about the world of technology or science, grounded by Google Search.";

pub const DEFAULT_USER_QUERY: &str =
    "Give me one amazing fact about the current state of AI or space exploration.";

// ============================================================================
// Top-level config
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GroundfactConfig {
    pub llm: LlmConfig,
    pub retry: RetrySettings,
    pub server: ServerConfig,
    pub prompt: PromptConfig,
}

impl GroundfactConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    /// After loading, env var overrides are applied.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: GroundfactConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Try to load from path; if file doesn't exist, return defaults with env overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable source. The credential is
    /// always resolved here: an absent variable leaves it empty.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        self.llm.api_key = ApiKey::new(lookup(self.llm.api_key_env.as_str()).unwrap_or_default());

        if let Some(v) = lookup("GEMINI_MODEL") {
            self.llm.model = v;
        }
        if let Some(v) = lookup("GEMINI_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Some(v) = lookup("GROUNDFACT_HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("PORT") {
            match v.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid PORT value {:?}", v),
            }
        }
        if let Some(v) = lookup("GROUNDFACT_MAX_ATTEMPTS") {
            if let Ok(n) = v.parse() {
                self.retry.max_attempts = n;
            }
        }
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

/// Credential for the generation service. Never printed by `Debug`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("ApiKey(<unset>)")
        } else {
            f.write_str("ApiKey(<redacted>)")
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: String,
    /// Name of the environment variable holding the credential.
    pub api_key_env: String,
    pub timeout_secs: u64,
    #[serde(skip)]
    pub api_key: ApiKey,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash-preview-09-2025".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: 60,
            api_key: ApiKey::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    /// The backoff time unit. Waits are `base_delay_ms * 2^attempt`.
    pub base_delay_ms: u64,
    /// Retry fatal errors (auth, bad request) too, not only transient ones.
    pub retry_fatal: bool,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 1000,
            retry_fatal: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// The fixed prompt and the page text around its answer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub system_instruction: String,
    pub user_query: String,
    pub title: String,
    pub heading: String,
    pub footer: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            user_query: DEFAULT_USER_QUERY.to_string(),
            title: "Gemini Hello World App".to_string(),
            heading: "🤖 Gemini App Running on groundfact".to_string(),
            footer: "This application is served by groundfact (Rust, axum).".to_string(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
