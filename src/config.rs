use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::core::{CommuteModel, ScoringWeights, DEFAULT_MAX_REASONS};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    /// Empty or missing runs the in-process cache only
    pub redis_url: Option<String>,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

impl CacheSettings {
    pub fn redis_url(&self) -> Option<&str> {
        self.redis_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    /// Upper bound on rows fetched per search
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
    #[serde(default = "default_limit")]
    pub default_limit: u16,
    #[serde(default = "default_max_limit")]
    pub max_limit: u16,
    #[serde(default = "default_max_reasons")]
    pub max_reasons: usize,
    #[serde(default = "default_commute_speed")]
    pub commute_speed_kmh: f64,
    #[serde(default = "default_commute_overhead")]
    pub commute_overhead_minutes: f64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            max_candidates: default_max_candidates(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            max_reasons: default_max_reasons(),
            commute_speed_kmh: default_commute_speed(),
            commute_overhead_minutes: default_commute_overhead(),
        }
    }
}

impl MatchingSettings {
    pub fn commute_model(&self) -> CommuteModel {
        CommuteModel {
            average_speed_kmh: self.commute_speed_kmh,
            overhead_minutes: self.commute_overhead_minutes,
        }
    }
}

fn default_max_candidates() -> usize { 3000 }
fn default_limit() -> u16 { 30 }
fn default_max_limit() -> u16 { 100 }
fn default_max_reasons() -> usize { DEFAULT_MAX_REASONS }
fn default_commute_speed() -> f64 { CommuteModel::default().average_speed_kmh }
fn default_commute_overhead() -> f64 { CommuteModel::default().overhead_minutes }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: ScoringWeights,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SMART_MATCH)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SMART_MATCH__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("SMART_MATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize::<Self>()?.validated()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("SMART_MATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize::<Self>()?.validated()
    }

    /// Reject a scoring table that would break factor ordering
    fn validated(self) -> Result<Self, ConfigError> {
        self.scoring
            .weights
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;
        Ok(self)
    }
}

/// Apply the conventional platform variables on top of the layered config
///
/// `DATABASE_URL` and `REDIS_URL` are what Supabase-style hosting injects.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(redis_url) = env::var("REDIS_URL") {
        builder = builder.set_override("cache.redis_url", redis_url)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp_config(contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("smart-match-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).expect("Failed to write temp config");
        path
    }

    const BASE_CONFIG: &str = r#"
[server]
host = "127.0.0.1"
port = 8080

[database]
url = "postgres://localhost/crm"
"#;

    #[test]
    fn test_missing_scoring_section_uses_defaults() {
        let path = write_temp_config(BASE_CONFIG);
        let settings = Settings::load_from(&path).expect("config should parse");
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.scoring.weights, ScoringWeights::default());
    }

    #[test]
    fn test_partial_scoring_section_keeps_other_defaults() {
        let path = write_temp_config(&format!("{}\n[scoring.weights]\ntype_match = 8.0\n", BASE_CONFIG));
        let settings = Settings::load_from(&path).expect("config should parse");
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.scoring.weights.type_match, 8.0);
        assert_eq!(settings.scoring.weights.area_exact, ScoringWeights::default().area_exact);
    }

    #[test]
    fn test_inverted_weights_fail_to_load() {
        let path = write_temp_config(&format!(
            "{}\n[scoring.weights]\narea_exact = 5.0\narea_partial = 30.0\nbudget_penalty = -30.0\n",
            BASE_CONFIG
        ));
        let result = Settings::load_from(&path);
        std::fs::remove_file(&path).ok();

        let err = result.expect_err("inverted weights should be rejected");
        assert!(err.to_string().contains("invalid scoring weights"), "{}", err);
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }

    #[test]
    fn test_blank_redis_url_disables_l2() {
        let cache = CacheSettings {
            redis_url: Some("  ".to_string()),
            ttl_secs: None,
            l1_cache_size: None,
        };
        assert_eq!(cache.redis_url(), None);
    }

    #[test]
    fn test_load_shipped_config() {
        let settings = Settings::load_from(concat!(env!("CARGO_MANIFEST_DIR"), "/config/default.toml"))
            .expect("config/default.toml should parse");

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.matching.max_reasons, 3);
        assert_eq!(settings.scoring.weights, ScoringWeights::default());
    }
}
