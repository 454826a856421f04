use std::path::PathBuf;
use time::Duration;

#[derive(Clone)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub app_name: String,
    pub auth: AuthConfig,
    /// Gate every management view behind a session, not only `/inicio`.
    pub require_login: bool,
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub key: String,
    pub token_ttl: Duration,
    pub cookie_name: String,
    pub cookie_secure: bool,
}

#[cfg(test)]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: std::env::temp_dir().join("cascos-default.json"),
            app_name: "Cascos".to_string(),
            auth: AuthConfig {
                // base64 of "cascos-test-secret"
                key: "Y2FzY29zLXRlc3Qtc2VjcmV0".to_string(),
                token_ttl: Duration::days(1),
                cookie_name: "cascos_auth".to_string(),
                cookie_secure: false,
            },
            require_login: false,
        }
    }
}
