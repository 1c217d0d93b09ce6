//! Dashboard configuration: input location, filter selections, projection
//! parameters and logging.

use crate::data::DataFiles;
use crate::filter::{ComponentFilter, IncidentFilter, MetricFilter, RiskFilter};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory holding the four CSV inputs
    pub data_dir: PathBuf,
    /// Input file names inside `data_dir`
    pub files: DataFiles,
    /// Global and per-page filter selections
    pub filters: FilterSelections,
    /// Loss trend projection parameters
    pub projection: ProjectionConfig,
    /// Logging
    pub log: LogConfig,
}

/// What the analyst selected. Absent fields mean "all".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSelections {
    /// Date range and categories; applies to every incident view
    pub incidents: IncidentFilter,
    /// Incident analysis page: subcategory, location, status
    pub incident_page: IncidentPageSelection,
    pub risks: RiskFilter,
    pub components: ComponentFilter,
    /// Financial page category selection
    pub metrics: MetricFilter,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncidentPageSelection {
    pub subcategory: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Months extrapolated past the last observed month
    pub horizon_months: usize,
    /// Fewer months than this yields no trend line
    pub min_points: usize,
    /// Months averaged at each end for the savings estimate
    pub savings_window: usize,
    /// Fewer months than this yields no savings estimate
    pub savings_min_points: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("dados"),
            files: DataFiles::default(),
            filters: FilterSelections::default(),
            projection: ProjectionConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            horizon_months: 6,
            min_points: 3,
            savings_window: 3,
            savings_min_points: 6,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl DashboardConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &std::path::Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|data| serde_json::from_str::<DashboardConfig>(&data).map_err(|e| e.to_string()))
        {
            Ok(c) => c,
            Err(error) => {
                // logging is not initialised yet
                eprintln!("ignoring config {}: {error}", path.display());
                Self::default()
            }
        }
    }
}
