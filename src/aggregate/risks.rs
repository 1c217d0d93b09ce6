//! Risk tables: probability × impact matrix, inherent vs residual levels,
//! control efficacy.

use super::Mean;
use crate::data::{Risk, RiskLevel};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// 5×5 risk counts indexed `[probability - 1][impact - 1]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RiskMatrix {
    pub cells: [[u32; 5]; 5],
    /// Ids of risks whose probability or impact is off the 1..=5 scale.
    pub excluded: Vec<String>,
}

impl RiskMatrix {
    /// Count for 1-based probability and impact; out-of-scale axes read 0.
    pub fn get(&self, probability: usize, impact: usize) -> u32 {
        if !(1..=5).contains(&probability) || !(1..=5).contains(&impact) {
            return 0;
        }
        self.cells[probability - 1][impact - 1]
    }

    pub fn total(&self) -> u32 {
        self.cells.iter().flatten().sum()
    }
}

pub fn risk_count_matrix<'a, I>(risks: I) -> RiskMatrix
where
    I: IntoIterator<Item = &'a Risk>,
{
    let mut matrix = RiskMatrix::default();
    for r in risks {
        match r.matrix_cell() {
            Some((p, i)) => matrix.cells[p][i] += 1,
            None => matrix.excluded.push(r.id.clone()),
        }
    }
    matrix
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelComparisonRow {
    pub level: RiskLevel,
    pub inherent: usize,
    pub residual: usize,
}

/// Inherent and residual counts for each level, lowest level first.
pub fn risk_level_comparison<'a, I>(risks: I) -> Vec<LevelComparisonRow>
where
    I: IntoIterator<Item = &'a Risk>,
{
    let mut rows: Vec<LevelComparisonRow> = RiskLevel::ALL
        .iter()
        .map(|&level| LevelComparisonRow {
            level,
            inherent: 0,
            residual: 0,
        })
        .collect();
    for r in risks {
        if let Some(level) = r.inherent_level() {
            rows[level as usize].inherent += 1;
        }
        if let Some(level) = r.residual_level() {
            rows[level as usize].residual += 1;
        }
    }
    rows
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlEfficacyRow {
    pub category: String,
    pub risks: usize,
    pub mean_control_efficacy_pct: Option<f64>,
}

pub fn control_efficacy_by_category<'a, I>(risks: I) -> Vec<ControlEfficacyRow>
where
    I: IntoIterator<Item = &'a Risk>,
{
    let mut groups: BTreeMap<&str, (usize, Mean)> = BTreeMap::new();
    for r in risks {
        let entry = groups.entry(r.category.as_str()).or_default();
        entry.0 += 1;
        if r.is_valid() {
            entry.1.push(r.control_efficacy_pct);
        }
    }
    groups
        .into_iter()
        .map(|(category, (risks, mean))| ControlEfficacyRow {
            category: category.to_string(),
            risks,
            mean_control_efficacy_pct: mean.value(),
        })
        .collect()
}

/// Most severe first: inherent level, then probability, then impact.
/// Risks with an unrecognised level label go last.
pub fn risk_listing<'a, I>(risks: I) -> Vec<&'a Risk>
where
    I: IntoIterator<Item = &'a Risk>,
{
    let mut rows: Vec<&Risk> = risks.into_iter().collect();
    rows.sort_by_key(|r| Reverse((r.inherent_level(), r.probability, r.impact)));
    rows
}
