use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::cache::InvalidationPolicy;

/// Config file read when `HERALD_CONFIG` is not set.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.json";
pub const CONFIG_ENV: &str = "HERALD_CONFIG";
pub const DATA_DIR_ENV: &str = "HERALD_DATA_DIR";

// ---------------------------------------------------------------------------
// Source files
// ---------------------------------------------------------------------------

/// The four datasets, in load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFile {
    AdRevenue,
    CityReadiness,
    DigitalPilot,
    PrintSales,
}

impl SourceFile {
    pub const ALL: [SourceFile; 4] = [
        SourceFile::AdRevenue,
        SourceFile::CityReadiness,
        SourceFile::DigitalPilot,
        SourceFile::PrintSales,
    ];

    /// Human readable table name used in logs and the debug panel.
    pub fn label(self) -> &'static str {
        match self {
            SourceFile::AdRevenue => "Ad Revenue Data",
            SourceFile::CityReadiness => "City Readiness Data",
            SourceFile::DigitalPilot => "Digital Pilot Data",
            SourceFile::PrintSales => "Print Sales Data",
        }
    }
}

// ---------------------------------------------------------------------------
// DashboardConfig
// ---------------------------------------------------------------------------

/// Where the datasets live and how they are cached.
///
/// Every field is optional in `dashboard.json`; missing ones fall back to the
/// stock `Datasets/` layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub data_dir: PathBuf,
    pub ad_revenue: String,
    pub city_readiness: String,
    pub digital_pilot: String,
    pub print_sales: String,
    pub invalidation: InvalidationPolicy,
    /// Rows shown in the debug preview of each table.
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("Datasets"),
            ad_revenue: "fact_ad_revenue.csv".into(),
            city_readiness: "fact_city_readiness.csv".into(),
            digital_pilot: "fact_digital_pilot.csv".into(),
            print_sales: "fact_print_sales.xlsx".into(),
            invalidation: InvalidationPolicy::default(),
            preview_rows: 5,
        }
    }
}

impl DashboardConfig {
    /// Resolve the configuration from the environment.
    ///
    /// `HERALD_CONFIG` names the config file (which must then exist);
    /// otherwise `dashboard.json` is used when present. `HERALD_DATA_DIR`
    /// overrides `data_dir` either way.
    pub fn from_env() -> Result<Self> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let data_dir = std::env::var_os(DATA_DIR_ENV).map(PathBuf::from);
        Self::resolve(explicit.as_deref(), data_dir)
    }

    fn resolve(explicit: Option<&Path>, data_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                log::debug!("no {DEFAULT_CONFIG_FILE}, using built-in defaults");
                Self::default()
            }
        };

        if let Some(dir) = data_dir {
            log::info!("data directory overridden to {}", dir.display());
            config.data_dir = dir;
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: DashboardConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn file_name(&self, source: SourceFile) -> &str {
        match source {
            SourceFile::AdRevenue => &self.ad_revenue,
            SourceFile::CityReadiness => &self.city_readiness,
            SourceFile::DigitalPilot => &self.digital_pilot,
            SourceFile::PrintSales => &self.print_sales,
        }
    }

    pub fn source_path(&self, source: SourceFile) -> PathBuf {
        self.data_dir.join(self.file_name(source))
    }

    /// All four source paths in load order.
    pub fn source_paths(&self) -> Vec<PathBuf> {
        SourceFile::ALL
            .iter()
            .map(|s| self.source_path(*s))
            .collect()
    }
}
