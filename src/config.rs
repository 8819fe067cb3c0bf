use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::extract::LayoutPolicy;
use crate::models::Supplier;
use crate::utils::fingerprint::{default_fingerprints, Fingerprint};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub search: SearchConfig,
    pub fetch: FetchConfig,
    pub render: RenderConfig,
    pub suppliers: HashMap<String, SupplierConfig>,
    pub fingerprints: Vec<Fingerprint>,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Exact origins, or `https://*.example.app` for any subdomain.
    pub allowed_origins: Vec<String>,
    pub rate_limit_window_secs: u64,
    pub rate_limit_max_requests: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub default_max_results: usize,
    pub max_results_cap: usize,
    pub min_query_chars: usize,
    pub layout_policy: LayoutPolicy,
    /// Retry the cascade once with a sanitized query before falling back.
    pub retry_sanitized_query: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Upper bound for any single catalog request.
    pub timeout_secs: u64,
    /// Pause between attempts of a multi-attempt supplier.
    pub attempt_pause_ms: u64,
    pub human_delay_min_ms: u64,
    pub human_delay_max_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub enabled: bool,
    pub chrome_path: Option<PathBuf>,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub wait_per_locator_ms: u64,
    pub poll_interval_ms: u64,
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
    pub navigation_timeout_secs: u64,
    /// URL patterns the page is not allowed to load.
    pub blocked_url_patterns: Vec<String>,
    /// Where failed pages are dumped; nothing is written when unset.
    pub diagnostics_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierConfig {
    pub name: String,
    pub search_url: String,
    pub query_param: String,
    pub base_url: String,
    pub attempts: u32,
    pub human_delay: bool,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub json: bool,
}

impl Default for Config {
    fn default() -> Self {
        let mut suppliers = HashMap::new();

        suppliers.insert(
            Supplier::Grainger.key().to_string(),
            SupplierConfig {
                name: Supplier::Grainger.display_name().to_string(),
                search_url: "https://www.grainger.com/search".to_string(),
                query_param: "searchQuery".to_string(),
                base_url: Supplier::Grainger.default_origin().to_string(),
                attempts: 3,
                human_delay: true,
                timeout_secs: 20,
            },
        );

        suppliers.insert(
            Supplier::McMasterCarr.key().to_string(),
            SupplierConfig {
                name: Supplier::McMasterCarr.display_name().to_string(),
                search_url: "https://www.mcmaster.com/search".to_string(),
                query_param: "query".to_string(),
                base_url: Supplier::McMasterCarr.default_origin().to_string(),
                attempts: 1,
                human_delay: false,
                timeout_secs: 15,
            },
        );

        suppliers.insert(
            Supplier::Fastenal.key().to_string(),
            SupplierConfig {
                name: Supplier::Fastenal.display_name().to_string(),
                search_url: "https://www.fastenal.com/search".to_string(),
                query_param: "query".to_string(),
                base_url: Supplier::Fastenal.default_origin().to_string(),
                attempts: 1,
                human_delay: false,
                timeout_secs: 15,
            },
        );

        Config {
            server: ServerConfig::default(),
            search: SearchConfig::default(),
            fetch: FetchConfig::default(),
            render: RenderConfig::default(),
            suppliers,
            fingerprints: default_fingerprints(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "https://blue-collar-buddy-91j5.vercel.app".to_string(),
                "https://*.vercel.app".to_string(),
            ],
            rate_limit_window_secs: 15 * 60,
            rate_limit_max_requests: 100,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_max_results: 5,
            max_results_cap: 50,
            min_query_chars: 2,
            layout_policy: LayoutPolicy::default(),
            retry_sanitized_query: true,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            attempt_pause_ms: 2000,
            human_delay_min_ms: 1000,
            human_delay_max_ms: 5000,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            chrome_path: None,
            viewport_width: 1366,
            viewport_height: 900,
            wait_per_locator_ms: 8000,
            poll_interval_ms: 250,
            max_attempts: 3,
            backoff_base_ms: 1000,
            navigation_timeout_secs: 30,
            blocked_url_patterns: [
                "*.png", "*.jpg", "*.jpeg", "*.gif", "*.webp", "*.svg", "*.ico", "*.css",
                "*.woff", "*.woff2",
            ]
            .iter()
            .map(|p| p.to_string())
            .collect(),
            diagnostics_dir: None,
        }
    }
}

impl Config {
    /// Built-in defaults, overridden by `parts_finder.toml` (optional) and
    /// `PARTS_FINDER__SECTION__KEY` environment variables. `PORT` wins over
    /// `server.port`.
    pub fn load() -> Result<Self> {
        let defaults = config::Config::try_from(&Config::default())
            .context("Failed to serialize default configuration")?;

        let layered = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name("parts_finder").required(false))
            .add_source(
                config::Environment::with_prefix("PARTS_FINDER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let mut config: Config = layered
            .try_deserialize()
            .context("Invalid configuration")?;

        if let Ok(port) = std::env::var("PORT") {
            config.server.port = port
                .parse()
                .with_context(|| format!("PORT must be a port number, got {port}"))?;
        }

        Ok(config)
    }

    pub fn supplier(&self, supplier: Supplier) -> Result<&SupplierConfig> {
        self.suppliers
            .get(supplier.key())
            .with_context(|| format!("No configuration for supplier {}", supplier.key()))
    }

    pub fn supplier_origin(&self, supplier: Supplier) -> Result<Url> {
        let base = &self.supplier(supplier)?.base_url;
        Url::parse(base).with_context(|| format!("Invalid base URL for {}: {base}", supplier.key()))
    }
}

impl SupplierConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl FetchConfig {
    pub fn attempt_pause(&self) -> Duration {
        Duration::from_millis(self.attempt_pause_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_supplier() {
        let config = Config::default();
        for supplier in Supplier::ALL {
            let site = config.supplier(supplier).unwrap();
            assert_eq!(site.name, supplier.display_name());
            assert!(config.supplier_origin(supplier).is_ok());
        }
        assert_eq!(config.fingerprints.len(), 3);
        assert_eq!(config.search.default_max_results, 5);
    }

    #[test]
    fn defaults_survive_the_config_layer() {
        let layered = config::Config::try_from(&Config::default()).unwrap();
        let config: Config = layered.try_deserialize().unwrap();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.search.layout_policy, LayoutPolicy::FallThroughOnEmpty);
        assert_eq!(config.supplier(Supplier::Grainger).unwrap().attempts, 3);
        assert!(config.render.diagnostics_dir.is_none());
    }
}
