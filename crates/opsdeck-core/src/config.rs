// ── Runtime connection configuration ──
//
// These types describe *how* to reach an opsdeck console. They carry
// credential data and connection tuning, but never touch disk. The CLI
// builds a `ConsoleConfig` from its profile store and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::flags::ConsoleFlags;

/// How to authenticate with a console.
#[derive(Debug, Clone)]
pub enum AuthMethod {
    /// Bearer token issued by the console (preferred).
    Token(SecretString),
    /// Username/password session login.
    Session {
        username: String,
        password: SecretString,
    },
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict). Consoles normally sit behind real certs.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed lab consoles).
    DangerAcceptInvalid,
}

/// Configuration for connecting to a single console.
///
/// Built by the CLI, passed to `Console` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Console URL (e.g., `https://ops.example.com`).
    pub url: Url,
    /// Authentication method and credentials.
    pub auth: AuthMethod,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// How often to re-pull all collections (seconds). 0 = never.
    pub refresh_interval_secs: u64,
    /// Section visibility at startup.
    pub flags: ConsoleFlags,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            url: "https://localhost:8443"
                .parse()
                .expect("default URL should parse"),
            auth: AuthMethod::Token(SecretString::from(String::new())),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            refresh_interval_secs: 60,
            flags: ConsoleFlags::default(),
        }
    }
}
