//! Out-of-domain record checks. Offending rows are reported, never clamped;
//! numeric aggregations skip them while counts keep them.

use super::Dataset;
use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    Incidents,
    Risks,
    Metrics,
    Components,
}

#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum IssueKind {
    #[error("probability {value} outside 1..=5")]
    ProbabilityOutOfRange { value: i32 },
    #[error("impact {value} outside 1..=5")]
    ImpactOutOfRange { value: i32 },
    #[error("negative loss amount {value}")]
    NegativeLoss { value: f64 },
    #[error("negative incident count {value}")]
    NegativeIncidentCount { value: i64 },
    #[error("precision rate {value} outside 0..=100")]
    PrecisionOutOfRange { value: f64 },
    #[error("unknown risk level {label:?}")]
    UnknownRiskLevel { label: String },
    #[error("unknown residual risk level {label:?}")]
    UnknownResidualLevel { label: String },
    #[error("{field} is not a finite number ({value})")]
    NonFinite { field: &'static str, value: f64 },
}

/// Push a [`IssueKind::NonFinite`] for NaN or infinite `value`.
pub(crate) fn check_finite(issues: &mut Vec<IssueKind>, field: &'static str, value: f64) {
    if !value.is_finite() {
        issues.push(IssueKind::NonFinite { field, value });
    }
}

/// A single offending record.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{dataset:?} record {record_id}: {kind}")]
pub struct QualityIssue {
    pub dataset: DatasetKind,
    pub record_id: String,
    #[serde(flatten)]
    pub kind: IssueKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QualityReport {
    pub issues: Vec<QualityIssue>,
}

impl QualityReport {
    pub fn check(data: &Dataset) -> Self {
        let mut issues = Vec::new();
        let mut push = |dataset, record_id: &str, kind| {
            issues.push(QualityIssue {
                dataset,
                record_id: record_id.to_string(),
                kind,
            })
        };

        for i in &data.incidents {
            for kind in i.issues() {
                push(DatasetKind::Incidents, &i.id, kind);
            }
        }
        for r in &data.risks {
            for kind in r.issues() {
                push(DatasetKind::Risks, &r.id, kind);
            }
        }
        for (row, m) in data.metrics.iter().enumerate() {
            let kinds = m.issues();
            if kinds.is_empty() {
                continue;
            }
            // metric rows have no id column
            let id = format!("{}/{}#{}", m.year_month, m.category, row + 1);
            for kind in kinds {
                push(DatasetKind::Metrics, &id, kind);
            }
        }
        for c in &data.components {
            for kind in c.issues() {
                push(DatasetKind::Components, &c.id, kind);
            }
        }

        Self { issues }
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Distinct offending ids for one dataset.
    pub fn offending_ids(&self, dataset: DatasetKind) -> BTreeSet<&str> {
        self.issues
            .iter()
            .filter(|i| i.dataset == dataset)
            .map(|i| i.record_id.as_str())
            .collect()
    }

    /// Emit one structured warning per dataset listing its offending ids.
    pub fn log(&self) {
        for dataset in [
            DatasetKind::Incidents,
            DatasetKind::Risks,
            DatasetKind::Metrics,
            DatasetKind::Components,
        ] {
            let ids = self.offending_ids(dataset);
            if ids.is_empty() {
                continue;
            }
            let ids: Vec<&str> = ids.into_iter().collect();
            warn!(dataset = ?dataset, count = ids.len(), ids = ?ids, "data quality issues; rows excluded from numeric aggregations");
        }
        for issue in &self.issues {
            tracing::debug!(%issue, "data quality issue");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::incidents::loss_by_category;
    use crate::aggregate::metrics::cost_benefit_by_category;
    use crate::testkit::{component, incident, metric, risk};

    #[test]
    fn nan_loss_is_reported_and_left_out_of_sums() {
        let data = Dataset {
            incidents: vec![
                incident("I1", "2024-01-01", "Cyber", f64::NAN),
                incident("I2", "2024-01-02", "Cyber", 5.0),
            ],
            ..Default::default()
        };
        let rows = loss_by_category(&data.incidents);
        assert_eq!(rows[0].incidents, 2);
        assert_eq!(rows[0].total_loss, 5.0);

        let report = data.quality_report();
        assert_eq!(
            report.offending_ids(DatasetKind::Incidents).into_iter().collect::<Vec<_>>(),
            ["I1"]
        );
        assert!(matches!(
            report.issues[0].kind,
            IssueKind::NonFinite { field: "loss_amount", .. }
        ));
    }

    #[test]
    fn every_excluded_metric_row_is_reported() {
        let mut bad_cost = metric("2024-02", "Theft", 100.0, 1.0);
        bad_cost.mitigation_cost = f64::INFINITY;
        let mut bad_roi = metric("2024-03", "Theft", 100.0, 1.0);
        bad_roi.security_roi_pct = f64::NAN;
        let data = Dataset {
            metrics: vec![metric("2024-01", "Theft", 100.0, 50.0), bad_cost, bad_roi],
            ..Default::default()
        };

        let excluded = data.metrics.iter().filter(|m| !m.is_valid()).count();
        let report = data.quality_report();
        assert_eq!(excluded, 2);
        assert_eq!(
            report.offending_ids(DatasetKind::Metrics).into_iter().collect::<Vec<_>>(),
            ["2024-02/Theft#2", "2024-03/Theft#3"]
        );

        let rows = cost_benefit_by_category(&data.metrics);
        assert_eq!(rows[0].rows, 3);
        assert_eq!(rows[0].ratio, Ok(2.0));
    }

    #[test]
    fn report_agrees_with_row_validity() {
        let mut nan_efficacy = risk("R2", 3, 3);
        nan_efficacy.control_efficacy_pct = f64::NAN;
        let data = Dataset {
            incidents: vec![incident("I1", "2024-01-01", "Cyber", -1.0)],
            risks: vec![risk("R1", 6, 2), nan_efficacy, risk("R3", 2, 2)],
            metrics: vec![],
            components: vec![component("C1", "Camera", f64::NAN), component("C2", "Camera", 90.0)],
        };
        let report = data.quality_report();

        let invalid_risks: BTreeSet<&str> = data
            .risks
            .iter()
            .filter(|r| !r.is_valid())
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(report.offending_ids(DatasetKind::Risks), invalid_risks);
        assert_eq!(invalid_risks, BTreeSet::from(["R1", "R2"]));
        assert_eq!(report.offending_ids(DatasetKind::Incidents), BTreeSet::from(["I1"]));
        assert_eq!(report.offending_ids(DatasetKind::Components), BTreeSet::from(["C1"]));
    }
}
