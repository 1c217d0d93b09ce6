//! Loss trend projection: a first-degree fit extrapolated past the last
//! month, plus the first-vs-last months savings heuristic.

mod linear;

pub use linear::LinearFit;

use crate::aggregate::metrics::LossPoint;
use crate::config::ProjectionConfig;
use crate::data::YearMonth;
use crate::error::{ratio, serialize_ratio, Ratio};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub year_month: YearMonth,
    pub value: f64,
}

/// In-sample fitted line followed by the extrapolated months.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LossProjection {
    pub fit: LinearFit,
    pub fitted: Vec<TrendPoint>,
    pub projected: Vec<TrendPoint>,
}

impl LossProjection {
    /// Historical and projected line as one series.
    pub fn line(&self) -> impl Iterator<Item = &TrendPoint> {
        self.fitted.iter().chain(self.projected.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsEstimate {
    pub mean_first: f64,
    pub mean_last: f64,
    /// (mean_first - mean_last) × 12
    pub annual_savings: f64,
    #[serde(serialize_with = "serialize_ratio")]
    pub percent_reduction: Ratio,
}

pub struct TrendProjector {
    config: ProjectionConfig,
}

impl TrendProjector {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Fit and extrapolate `horizon_months` ahead. `None` below `min_points`.
    pub fn project(&self, series: &[LossPoint]) -> Option<LossProjection> {
        if series.len() < self.config.min_points.max(2) {
            debug!(points = series.len(), "too few months to project");
            return None;
        }
        let series = chronological(series);
        let values: Vec<f64> = series.iter().map(|p| p.total_loss).collect();
        let fit = LinearFit::fit(&values)?;

        let fitted = series
            .iter()
            .enumerate()
            .map(|(x, p)| TrendPoint {
                year_month: p.year_month,
                value: fit.at(x as f64),
            })
            .collect();

        let n = series.len();
        let last = series[n - 1].year_month;
        let projected = (1..=self.config.horizon_months)
            .map(|step| TrendPoint {
                year_month: last.add_months(step as i32),
                value: fit.at((n - 1 + step) as f64),
            })
            .collect();

        Some(LossProjection {
            fit,
            fitted,
            projected,
        })
    }

    /// Compare the mean of the first and last `savings_window` months.
    /// `None` below `savings_min_points`.
    pub fn savings(&self, series: &[LossPoint]) -> Option<SavingsEstimate> {
        let window = self.config.savings_window.max(1);
        let min_points = self.config.savings_min_points.max(window);
        if series.len() < min_points {
            return None;
        }
        let series = chronological(series);
        let mean_of = |points: &[LossPoint]| {
            points.iter().map(|p| p.total_loss).sum::<f64>() / points.len() as f64
        };
        let mean_first = mean_of(&series[..window]);
        let mean_last = mean_of(&series[series.len() - window..]);
        let drop = mean_first - mean_last;

        Some(SavingsEstimate {
            mean_first,
            mean_last,
            annual_savings: drop * 12.0,
            percent_reduction: ratio(drop, mean_first, ("mean_first - mean_last", "mean_first"))
                .map(|r| r * 100.0),
        })
    }
}

fn chronological(series: &[LossPoint]) -> Vec<LossPoint> {
    let mut sorted = series.to_vec();
    sorted.sort_by_key(|p| p.year_month);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> Vec<LossPoint> {
        let start = YearMonth::new(2024, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| LossPoint {
                year_month: start.add_months(i as i32),
                total_loss: v,
            })
            .collect()
    }

    fn projector() -> TrendProjector {
        TrendProjector::new(ProjectionConfig::default())
    }

    #[test]
    fn linear_series_continues_exactly() {
        let p = projector()
            .project(&series(&[1000.0, 2000.0, 3000.0, 4000.0]))
            .unwrap();
        assert_eq!(p.fitted.len(), 4);
        assert_eq!(p.projected.len(), 6);
        for (k, point) in p.projected.iter().enumerate() {
            let expected = 5000.0 + 1000.0 * k as f64;
            assert!((point.value - expected).abs() < 1e-6, "{} vs {}", point.value, expected);
        }
        assert_eq!(p.projected[0].year_month.to_string(), "2024-05");
        assert_eq!(p.projected[5].year_month.to_string(), "2024-10");
        assert_eq!(p.line().count(), 10);
    }

    #[test]
    fn fewer_than_three_points_is_no_projection() {
        assert!(projector().project(&series(&[1.0, 2.0])).is_none());
        assert!(projector().project(&[]).is_none());
    }

    #[test]
    fn unsorted_input_is_projected_chronologically() {
        let mut s = series(&[10.0, 20.0, 30.0]);
        s.reverse();
        let p = projector().project(&s).unwrap();
        assert!((p.projected[0].value - 40.0).abs() < 1e-9);
    }

    #[test]
    fn savings_needs_six_months() {
        assert!(projector().savings(&series(&[1.0; 5])).is_none());
        let est = projector()
            .savings(&series(&[300.0, 300.0, 300.0, 200.0, 100.0, 150.0]))
            .unwrap();
        assert_eq!(est.mean_first, 300.0);
        assert_eq!(est.mean_last, 150.0);
        assert_eq!(est.annual_savings, 1800.0);
        assert_eq!(est.percent_reduction, Ok(50.0));
    }

    #[test]
    fn savings_from_zero_baseline_is_undefined() {
        let est = projector()
            .savings(&series(&[0.0, 0.0, 0.0, 10.0, 20.0, 30.0]))
            .unwrap();
        assert!(est.percent_reduction.is_err());
        assert_eq!(est.annual_savings, -240.0);
    }
}
