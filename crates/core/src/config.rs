use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub http: HttpConfig,
    #[serde(default)]
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub user_agent: String,
    pub connect_timeout_seconds: u64,
    pub request_timeout_seconds: u64,
}

/// Switches for verbose request/response dumping.
///
/// Passed explicitly into the pipeline; nothing reads these from
/// process-wide state, so tests can flip them per invocation.
#[derive(Debug, Deserialize, Clone, Copy, Default)]
pub struct Diagnostics {
    /// Dump headers of every solve-related exchange at debug level
    #[serde(default)]
    pub log_exchanges: bool,

    /// Include bodies in the dumps
    #[serde(default)]
    pub log_bodies: bool,
}
