//! Runtime configuration, resolved once at startup from the environment.
//!
//! Every external collaborator (table detector, structure recognizer, OCR
//! service, chat-completions endpoint) is addressed by URL so deployments can
//! point at hosted inference or a local model server without a rebuild.

use std::env;

/// Default aggregate-confidence threshold for the normalization gate.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Default log filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    "info,labtab=debug".to_string()
}

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Object-detection endpoint for locating the table region.
    pub detection_url: String,
    /// Object-detection endpoint for row/column structure recognition.
    pub structure_url: String,
    /// Text-recognition endpoint for per-cell OCR.
    pub ocr_url: String,
    /// OpenAI-style chat-completions endpoint for generation and validation.
    pub llm_url: String,
    /// Model name sent with every chat-completions request.
    pub llm_model: String,
    /// Bearer token for the inference endpoints, if required.
    pub api_token: Option<String>,
    /// Aggregate confidence below which a document is rejected.
    pub confidence_threshold: f32,
    /// Per-request timeout for all outbound HTTP calls.
    pub http_timeout_secs: u64,
}

impl AppConfig {
    /// Build configuration from `LABTAB_*` environment variables,
    /// falling back to defaults suitable for local development.
    pub fn from_env() -> Self {
        Self {
            bind_addr: env_or("LABTAB_BIND_ADDR", "127.0.0.1:8080"),
            detection_url: env_or(
                "LABTAB_DETECTION_URL",
                "https://router.huggingface.co/hf-inference/models/microsoft/table-transformer-detection",
            ),
            structure_url: env_or(
                "LABTAB_STRUCTURE_URL",
                "https://router.huggingface.co/hf-inference/models/microsoft/table-structure-recognition-v1.1-all",
            ),
            ocr_url: env_or("LABTAB_OCR_URL", "http://localhost:8601/read-text"),
            llm_url: env_or(
                "LABTAB_LLM_URL",
                "https://router.huggingface.co/v1/chat/completions",
            ),
            llm_model: env_or("LABTAB_LLM_MODEL", "meta-llama/Llama-3.1-8B-Instruct"),
            api_token: env::var("LABTAB_API_TOKEN")
                .or_else(|_| env::var("HF_TOKEN"))
                .ok(),
            confidence_threshold: env::var("LABTAB_CONFIDENCE_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD),
            http_timeout_secs: env::var("LABTAB_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(120),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_threshold_is_half() {
        assert!((DEFAULT_CONFIDENCE_THRESHOLD - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn env_or_falls_back() {
        assert_eq!(env_or("LABTAB_SURELY_UNSET_VAR", "fallback"), "fallback");
    }

    #[test]
    fn from_env_has_sane_defaults() {
        let cfg = AppConfig::from_env();
        assert!(!cfg.bind_addr.is_empty());
        assert!(cfg.detection_url.starts_with("http"));
        assert!(cfg.llm_url.ends_with("/chat/completions"));
        assert!(cfg.confidence_threshold >= 0.0 && cfg.confidence_threshold <= 1.0);
    }
}
