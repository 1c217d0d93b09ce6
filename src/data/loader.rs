//! Wholesale CSV load of the four input files. Any missing or malformed file
//! fails the whole load; there is no partial dataset.

use super::{Component, Dataset, Incident, Metric, Risk};
use crate::error::LoadError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// File names of the four inputs, relative to the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataFiles {
    pub incidents: String,
    pub risks: String,
    pub metrics: String,
    pub components: String,
}

impl Default for DataFiles {
    fn default() -> Self {
        Self {
            incidents: "registro_incidentes.csv".to_string(),
            risks: "analise_riscos.csv".to_string(),
            metrics: "metricas_desempenho.csv".to_string(),
            components: "componentes_sistema.csv".to_string(),
        }
    }
}

fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    if !path.is_file() {
        return Err(LoadError::Missing {
            path: path.to_path_buf(),
        });
    }
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let rows = reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), rows = rows.len(), "csv loaded");
    Ok(rows)
}

/// Load incidents, risks, metrics and components from `dir`.
pub fn load_all(dir: &Path, files: &DataFiles) -> Result<Dataset, LoadError> {
    info!(data_dir = %dir.display(), "loading datasets");
    let dataset = Dataset {
        incidents: read_csv::<Incident>(&dir.join(&files.incidents))?,
        risks: read_csv::<Risk>(&dir.join(&files.risks))?,
        metrics: read_csv::<Metric>(&dir.join(&files.metrics))?,
        components: read_csv::<Component>(&dir.join(&files.components))?,
    };
    info!(
        incidents = dataset.incidents.len(),
        risks = dataset.risks.len(),
        metrics = dataset.metrics.len(),
        components = dataset.components.len(),
        "datasets loaded"
    );
    Ok(dataset)
}
