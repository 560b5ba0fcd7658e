// Configuration module: resolves the two backend-facing settings (plus an
// optional auth token) from the environment once at startup. Values are
// immutable for the lifetime of the process.

use std::env;

/// Fallback backend base URL when `BACKEND_URL` is unset.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";
/// Fallback user identifier when `USER_ID` is unset.
pub const DEFAULT_USER_ID: &str = "test-user";

/// Runtime configuration for the tester. The token is optional and only
/// ever supplied externally; there is no acquisition flow.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub user_id: String,
    pub token: Option<String>,
}

impl Config {
    /// Read `BACKEND_URL`, `USER_ID` and `AUTH_TOKEN` from the environment,
    /// falling back to the built-in defaults for the first two.
    pub fn from_env() -> Self {
        Self::from_vars(
            env::var("BACKEND_URL").ok(),
            env::var("USER_ID").ok(),
            env::var("AUTH_TOKEN").ok(),
        )
    }

    fn from_vars(
        base_url: Option<String>,
        user_id: Option<String>,
        token: Option<String>,
    ) -> Self {
        Config {
            base_url: base_url.unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()),
            user_id: user_id.unwrap_or_else(|| DEFAULT_USER_ID.to_string()),
            token,
        }
    }

    /// Websocket endpoint derived from the HTTP base URL by scheme
    /// substitution. A URL that already carries a non-HTTP scheme is
    /// passed through untouched.
    pub fn ws_url(&self) -> String {
        if let Some(rest) = self.base_url.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = self.base_url.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            self.base_url.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_env_absent() {
        let config = Config::from_vars(None, None, None);
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.user_id, "test-user");
        assert!(config.token.is_none());
    }

    #[test]
    fn overrides_are_honored() {
        let config = Config::from_vars(
            Some("http://backend:4000".into()),
            Some("alice".into()),
            Some("secret".into()),
        );
        assert_eq!(config.base_url, "http://backend:4000");
        assert_eq!(config.user_id, "alice");
        assert_eq!(config.token.as_deref(), Some("secret"));
    }

    #[test]
    fn ws_url_substitutes_scheme() {
        let http = Config::from_vars(Some("http://localhost:3000".into()), None, None);
        assert_eq!(http.ws_url(), "ws://localhost:3000");
        let https = Config::from_vars(Some("https://backend:443".into()), None, None);
        assert_eq!(https.ws_url(), "wss://backend:443");
        let other = Config::from_vars(Some("ws://already".into()), None, None);
        assert_eq!(other.ws_url(), "ws://already");
    }
}
