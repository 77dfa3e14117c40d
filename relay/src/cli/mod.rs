//! CLI module for luau-audit-relay
//!
//! Most settings come from environment variables; flags override the bind address.

use clap::Parser;
use luau_audit_relay_common::config::RelayConfig;

/// Luau Audit Relay - forwards Luau scripts to an LLM for auditing
#[derive(Parser, Debug)]
#[command(name = "luau-audit-relay")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    AUDIT_RELAY_HOST                    Bind address (default: 0.0.0.0, legacy: HOST)
    AUDIT_RELAY_PORT                    Listen port (default: 3000, legacy: PORT)
    AUDIT_RELAY_OPENAI_API_KEY          Upstream API key (legacy: OPENAI_API_KEY)
    AUDIT_RELAY_SHARED_SECRET           Required x-auth-token value (legacy: AUDIT_SHARED_SECRET)
    AUDIT_RELAY_OPENAI_BASE_URL         Upstream base URL (default: https://api.openai.com)
    AUDIT_RELAY_MODEL                   Model name (default: gpt-4o-mini)
    AUDIT_RELAY_TEMPERATURE             Sampling temperature (default: 0.1)
    AUDIT_RELAY_MAX_BODY_BYTES          Request body limit (default: 1048576)
    AUDIT_RELAY_UPSTREAM_TIMEOUT_SECS   Upstream timeout (default: none)
    AUDIT_RELAY_LOG_LEVEL               Log level (default: info, fallback: RUST_LOG)
"#)]
pub struct Cli {
    /// Bind address (overrides AUDIT_RELAY_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port (overrides AUDIT_RELAY_PORT)
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl Cli {
    /// フラグで指定された値を設定に上書きする
    pub fn apply(&self, config: &mut RelayConfig) {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
    }
}
