use std::env;
use std::path::PathBuf;

/// Identity used for callers that send no identity header outside production.
pub const DEV_USER_ID: i64 = 12345;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeMode {
    Development,
    Production,
}

impl RuntimeMode {
    fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("production") {
            Self::Production
        } else {
            Self::Development
        }
    }

    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

/// Endpoint and credential of the hosted (multi-tenant) store.
#[derive(Debug, Clone)]
pub struct HostedConfig {
    pub url: String,
    pub service_key: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub runtime_mode: RuntimeMode,

    /// Present only when both the URL and the key are non-empty.
    pub hosted: Option<HostedConfig>,
    pub database_path: String,

    pub static_dir: PathBuf,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let hosted_url = non_empty_var("SUPABASE_URL");
        let hosted_key = non_empty_var("SUPABASE_SERVICE_ROLE_KEY");

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".into())
                .parse()
                .expect("PORT must be a number"),
            runtime_mode: RuntimeMode::parse(
                &env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            ),

            hosted: match (hosted_url, hosted_key) {
                (Some(url), Some(service_key)) => Some(HostedConfig { url, service_key }),
                _ => None,
            },
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "data.sqlite".into()),

            static_dir: env::var("STATIC_DIR")
                .unwrap_or_else(|_| "../frontend/dist".into())
                .into(),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
