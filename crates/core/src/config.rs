use std::env;

/// Where the backend lives and how the bridge identifies itself to it.
#[derive(Clone, Debug)]
pub struct EndpointConfig {
    /// Streaming generation endpoint.
    pub url: String,
    /// Model catalog endpoint.
    pub models_url: String,
    /// Value of the `Host` header.
    pub host: String,
    /// Value of the `User-Agent` header and of the envelope's `userAgent`.
    pub user_agent: String,
}

/// Fallback sampling parameters applied when the caller omits them.
#[derive(Clone, Copy, Debug)]
pub struct SamplingDefaults {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_tokens: u32,
}

/// Process-wide configuration, loaded once at startup and read-only after.
#[derive(Clone, Debug)]
pub struct BridgeConfig {
    pub api: EndpointConfig,
    pub defaults: SamplingDefaults,
    /// Text injected as the `systemInstruction` turn of every request.
    pub system_instruction: String,
}

const DEFAULT_API_URL: &str =
    "https://cloudcode-pa.googleapis.com/v1internal:streamGenerateContent?alt=sse";
const DEFAULT_MODELS_URL: &str =
    "https://cloudcode-pa.googleapis.com/v1internal:fetchAvailableModels";
const DEFAULT_HOST: &str = "cloudcode-pa.googleapis.com";
const DEFAULT_USER_AGENT: &str = "antigravity";
const DEFAULT_SYSTEM_INSTRUCTION: &str =
    "You are a helpful assistant. Answer the user directly and accurately.";

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            api: EndpointConfig {
                url: DEFAULT_API_URL.to_string(),
                models_url: DEFAULT_MODELS_URL.to_string(),
                host: DEFAULT_HOST.to_string(),
                user_agent: DEFAULT_USER_AGENT.to_string(),
            },
            defaults: SamplingDefaults {
                temperature: 1.0,
                top_p: 0.95,
                top_k: 64,
                max_tokens: 8192,
            },
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
        }
    }
}

impl BridgeConfig {
    /// Built-in defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(url) = env::var("ANTIGRAVITY_API_URL") {
            cfg.api.url = url;
        }
        if let Ok(url) = env::var("ANTIGRAVITY_MODELS_URL") {
            cfg.api.models_url = url;
        }
        if let Ok(host) = env::var("ANTIGRAVITY_HOST") {
            cfg.api.host = host;
        }
        if let Ok(text) = env::var("ANTIGRAVITY_SYSTEM_PROMPT") {
            cfg.system_instruction = text;
        }
        cfg
    }
}
