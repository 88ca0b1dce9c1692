use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3333";
pub const DEFAULT_PUSH_PATH: &str = "/ws";

const BASE_URL_VAR: &str = "CARDASH_BASE_URL";
const PUSH_PATH_VAR: &str = "CARDASH_PUSH_PATH";
const ACK_TIMEOUT_VAR: &str = "CARDASH_ACK_TIMEOUT_MS";
const REQUEST_TIMEOUT_VAR: &str = "CARDASH_REQUEST_TIMEOUT_MS";
const RECONNECT_VAR: &str = "CARDASH_RECONNECT_MS";
const STALE_AFTER_VAR: &str = "CARDASH_STALE_AFTER_MS";

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Origin of the player server, e.g. `http://carpi.local:3333`.
    pub base_http: String,
    pub push_path: String,
    /// Upper bound on how long a surface waits for a command ack.
    pub ack_timeout: Duration,
    pub request_timeout: Duration,
    pub reconnect_delay: Duration,
    pub stale_after: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_http: DEFAULT_BASE_URL.to_string(),
            push_path: DEFAULT_PUSH_PATH.to_string(),
            ack_timeout: Duration::from_millis(3_000),
            request_timeout: Duration::from_millis(5_000),
            reconnect_delay: Duration::from_millis(800),
            stale_after: Duration::from_millis(5_000),
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let millis = |key: &str, default: Duration| {
            let Some(raw) = lookup(key) else {
                return default;
            };
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                _ => {
                    log::warn!("[CFG] ignoring {key}={raw:?}; using {}ms", default.as_millis());
                    default
                }
            }
        };

        let base_http = lookup(BASE_URL_VAR)
            .map(normalize_base_url)
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.base_http);

        let push_path = lookup(PUSH_PATH_VAR)
            .map(|p| {
                if p.starts_with('/') {
                    p
                } else {
                    format!("/{p}")
                }
            })
            .unwrap_or(defaults.push_path);

        Self {
            base_http,
            push_path,
            ack_timeout: millis(ACK_TIMEOUT_VAR, defaults.ack_timeout),
            request_timeout: millis(REQUEST_TIMEOUT_VAR, defaults.request_timeout),
            reconnect_delay: millis(RECONNECT_VAR, defaults.reconnect_delay),
            stale_after: millis(STALE_AFTER_VAR, defaults.stale_after),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let clean = normalize_base_url(url.into());
        if !clean.is_empty() {
            self.base_http = clean;
        }
        self
    }

    /// `ws://` / `wss://` counterpart of the base URL.
    pub fn base_ws(&self) -> String {
        let Ok(mut url) = Url::parse(&self.base_http) else {
            return self.base_http.replacen("http", "ws", 1);
        };
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        if url.set_scheme(scheme).is_err() {
            return self.base_http.replacen("http", "ws", 1);
        }
        url.as_str().trim_end_matches('/').to_string()
    }

    pub fn push_url(&self) -> String {
        format!("{}{}", self.base_ws(), self.push_path)
    }
}

/// Keep only scheme, host and port: drop any fragment, path or trailing `/`.
pub fn normalize_base_url(url: String) -> String {
    let trimmed = url.trim();
    if let Ok(mut parsed) = Url::parse(trimmed)
        && parsed.has_host()
    {
        parsed.set_fragment(None);
        parsed.set_query(None);
        parsed.set_path("");
        return parsed.as_str().trim_end_matches('/').to_string();
    }

    let mut url = trimmed.to_string();
    if let Some(idx) = url.find('#') {
        url.truncate(idx);
    }
    if let Some(scheme_end) = url.find("://") {
        let rest = &url[scheme_end + 3..];
        if let Some(slash) = rest.find('/') {
            url.truncate(scheme_end + 3 + slash);
        }
    }
    url.trim_end_matches('/').to_string()
}
