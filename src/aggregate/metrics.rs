//! Monthly metric tables: efficacy, ROI, losses, cost-benefit and the
//! month-over-month financial summary.
//!
//! Rows failing [`Metric::is_valid`] stay in the `rows` counts but are left
//! out of every sum and mean. A month with no valid row has no loss figure.

use super::Mean;
use crate::data::{Metric, YearMonth};
use crate::error::{ratio, serialize_ratio, Ratio};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
struct Accumulator {
    rows: usize,
    valid: usize,
    total_loss: f64,
    mitigation_cost: f64,
    incident_count: i64,
    roi: Mean,
    detection: Mean,
    response: Mean,
}

impl Accumulator {
    fn push(&mut self, m: &Metric) {
        self.rows += 1;
        if !m.is_valid() {
            return;
        }
        self.valid += 1;
        self.total_loss += m.total_loss_amount;
        self.mitigation_cost += m.mitigation_cost;
        self.incident_count += m.incident_count;
        self.roi.push(m.security_roi_pct);
        self.detection.push(m.detection_efficacy_pct);
        self.response.push(m.response_efficacy_pct);
    }
}

fn by_month<'a, I>(metrics: I) -> BTreeMap<YearMonth, Accumulator>
where
    I: IntoIterator<Item = &'a Metric>,
{
    let mut groups: BTreeMap<YearMonth, Accumulator> = BTreeMap::new();
    for m in metrics {
        groups.entry(m.year_month).or_default().push(m);
    }
    groups
}

fn by_category<'a, I>(metrics: I) -> BTreeMap<&'a str, Accumulator>
where
    I: IntoIterator<Item = &'a Metric>,
{
    let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();
    for m in metrics {
        groups.entry(m.category.as_str()).or_default().push(m);
    }
    groups
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficacyRow {
    pub year_month: YearMonth,
    pub rows: usize,
    pub detection_efficacy_pct: Option<f64>,
    pub response_efficacy_pct: Option<f64>,
}

/// Mean detection and response efficacy per month, computed independently.
pub fn efficacy_by_month<'a, I>(metrics: I) -> Vec<EfficacyRow>
where
    I: IntoIterator<Item = &'a Metric>,
{
    by_month(metrics)
        .into_iter()
        .map(|(year_month, acc)| EfficacyRow {
            year_month,
            rows: acc.rows,
            detection_efficacy_pct: acc.detection.value(),
            response_efficacy_pct: acc.response.value(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoiRow {
    pub year_month: YearMonth,
    pub rows: usize,
    pub mean_roi_pct: Option<f64>,
}

pub fn roi_by_month<'a, I>(metrics: I) -> Vec<RoiRow>
where
    I: IntoIterator<Item = &'a Metric>,
{
    by_month(metrics)
        .into_iter()
        .map(|(year_month, acc)| RoiRow {
            year_month,
            rows: acc.rows,
            mean_roi_pct: acc.roi.value(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthCategoryLossRow {
    pub year_month: YearMonth,
    pub category: String,
    pub total_loss: f64,
}

/// Loss pivot (month × category) in long form; only pairs with a valid row.
pub fn loss_by_month_category<'a, I>(metrics: I) -> Vec<MonthCategoryLossRow>
where
    I: IntoIterator<Item = &'a Metric>,
{
    let mut groups: BTreeMap<(YearMonth, &str), f64> = BTreeMap::new();
    for m in metrics.into_iter().filter(|m| m.is_valid()) {
        *groups.entry((m.year_month, m.category.as_str())).or_default() += m.total_loss_amount;
    }
    groups
        .into_iter()
        .map(|((year_month, category), total_loss)| MonthCategoryLossRow {
            year_month,
            category: category.to_string(),
            total_loss,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBenefitRow {
    pub category: String,
    pub rows: usize,
    pub total_loss: f64,
    pub mitigation_cost: f64,
    pub mean_roi_pct: Option<f64>,
    /// Loss over mitigation spend; undefined when nothing was spent.
    #[serde(serialize_with = "serialize_ratio")]
    pub ratio: Ratio,
}

pub fn cost_benefit_by_category<'a, I>(metrics: I) -> Vec<CostBenefitRow>
where
    I: IntoIterator<Item = &'a Metric>,
{
    by_category(metrics)
        .into_iter()
        .map(|(category, acc)| CostBenefitRow {
            category: category.to_string(),
            rows: acc.rows,
            total_loss: acc.total_loss,
            mitigation_cost: acc.mitigation_cost,
            mean_roi_pct: acc.roi.value(),
            ratio: ratio(
                acc.total_loss,
                acc.mitigation_cost,
                ("total_loss_amount", "mitigation_cost"),
            ),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyFinancialRow {
    pub year_month: YearMonth,
    pub rows: usize,
    pub incident_count: i64,
    pub total_loss: f64,
    #[serde(serialize_with = "serialize_ratio")]
    pub average_cost_per_incident: Ratio,
    pub mitigation_cost: f64,
    pub mean_roi_pct: Option<f64>,
}

pub fn monthly_financial_summary<'a, I>(metrics: I) -> Vec<MonthlyFinancialRow>
where
    I: IntoIterator<Item = &'a Metric>,
{
    by_month(metrics)
        .into_iter()
        .map(|(year_month, acc)| MonthlyFinancialRow {
            year_month,
            rows: acc.rows,
            incident_count: acc.incident_count,
            total_loss: acc.total_loss,
            average_cost_per_incident: ratio(
                acc.total_loss,
                acc.incident_count as f64,
                ("total_loss_amount", "incident_count"),
            ),
            mitigation_cost: acc.mitigation_cost,
            mean_roi_pct: acc.roi.value(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialKpis {
    pub total_loss: f64,
    pub mitigation_cost: f64,
    pub mean_roi_pct: Option<f64>,
}

pub fn financial_kpis<'a, I>(metrics: I) -> FinancialKpis
where
    I: IntoIterator<Item = &'a Metric>,
{
    let mut acc = Accumulator::default();
    metrics.into_iter().for_each(|m| acc.push(m));
    FinancialKpis {
        total_loss: acc.total_loss,
        mitigation_cost: acc.mitigation_cost,
        mean_roi_pct: acc.roi.value(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LossPoint {
    pub year_month: YearMonth,
    pub total_loss: f64,
}

/// Total loss per month, ascending: the projector's input series. Months
/// whose rows are all invalid are skipped rather than read as zero loss.
pub fn monthly_loss_series<'a, I>(metrics: I) -> Vec<LossPoint>
where
    I: IntoIterator<Item = &'a Metric>,
{
    by_month(metrics)
        .into_iter()
        .filter(|(_, acc)| acc.valid > 0)
        .map(|(year_month, acc)| LossPoint {
            year_month,
            total_loss: acc.total_loss,
        })
        .collect()
}
