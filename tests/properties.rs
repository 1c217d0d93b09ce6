//! Property-based tests for the aggregation layer:
//! - every grouped table's row counts sum to the number of input rows,
//!   malformed rows included
//! - the risk matrix counts exactly the in-scale risks
//! - inherent and residual level counts each partition the risks with a
//!   recognised label
//! - filtering is idempotent
//! - the loss series only carries months with a valid row
//! - a perfectly linear loss series projects onto the same line

use chrono::NaiveDate;
use proptest::prelude::*;
use risk_dashboard::aggregate::components::precision_by_component_type;
use risk_dashboard::aggregate::incidents::{
    incidents_by_location_category, loss_by_category, trend_by_month_category,
};
use risk_dashboard::aggregate::metrics::{
    cost_benefit_by_category, efficacy_by_month, monthly_financial_summary, monthly_loss_series,
    roi_by_month, LossPoint,
};
use risk_dashboard::aggregate::risks::{
    control_efficacy_by_category, risk_count_matrix, risk_level_comparison,
};
use risk_dashboard::config::ProjectionConfig;
use risk_dashboard::data::{Component, Incident, Metric, Risk, YearMonth};
use risk_dashboard::filter::{IncidentFilter, RecordFilter};
use risk_dashboard::projection::TrendProjector;
use std::collections::BTreeSet;

const CATEGORIES: [&str; 3] = ["Cyber", "Fraud", "Theft"];
const LEVELS: [&str; 5] = ["Baixo", "Médio", "Alto", "Extremo", "Crítico"];
const TYPES: [&str; 3] = ["Câmera", "Sensor", "Rastreador"];

fn day(month: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, d).unwrap()
}

/// Mostly ordinary values, with the odd negative or non-finite one.
fn amount() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => -100.0f64..10_000.0,
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
    ]
}

fn arb_incident() -> impl Strategy<Value = Incident> {
    (0usize..3, 1u32..=12, 1u32..=28, 0usize..3, amount()).prop_map(
        |(cat, month, d, loc, loss)| Incident {
            id: format!("I{month}-{d}"),
            timestamp: day(month, d).and_hms_opt(9, 0, 0).unwrap(),
            category: CATEGORIES[cat].to_string(),
            subcategory: "Carga".to_string(),
            location: format!("Site {loc}"),
            loss_amount: loss,
            detection_time_hours: 1.5,
            detection_method: "CCTV".to_string(),
            response_efficacy_pct: 75.0,
            status: "Aberto".to_string(),
        },
    )
}

fn arb_risk() -> impl Strategy<Value = Risk> {
    (-1i32..=7, -1i32..=7, 0usize..5, 0usize..5, 0usize..3, amount()).prop_map(
        |(p, i, lvl, res, cat, efficacy)| Risk {
            id: format!("R{p}{i}"),
            category: CATEGORIES[cat].to_string(),
            subcategory: "Carga".to_string(),
            description: String::new(),
            probability: p,
            impact: i,
            risk_level: LEVELS[lvl].to_string(),
            control_efficacy_pct: efficacy,
            residual_risk_level: LEVELS[res].to_string(),
            deadline_date: day(12, 31),
            plan_status: "Planejado".to_string(),
        },
    )
}

fn arb_metric() -> impl Strategy<Value = Metric> {
    (1u32..=12, 0usize..3, amount(), amount(), -2i64..10).prop_map(
        |(month, cat, loss, cost, count)| Metric {
            year_month: YearMonth::new(2023, month).unwrap(),
            category: CATEGORIES[cat].to_string(),
            detection_efficacy_pct: 70.0,
            response_efficacy_pct: 65.0,
            security_roi_pct: 120.0,
            total_loss_amount: loss,
            mitigation_cost: cost,
            incident_count: count,
        },
    )
}

fn arb_component() -> impl Strategy<Value = Component> {
    (0usize..3, prop_oneof![9 => -10.0f64..110.0, 1 => Just(f64::NAN)]).prop_map(
        |(t, precision)| Component {
            id: format!("C{t}"),
            component_type: TYPES[t].to_string(),
            location: "CD Norte".to_string(),
            operational_status: "Operacional".to_string(),
            incidents_detected: 4,
            false_positives: 1,
            false_negatives: 0,
            precision_rate_pct: precision,
            last_maintenance_date: day(1, 10),
            next_maintenance_date: day(7, 10),
        },
    )
}

proptest! {
    #[test]
    fn prop_incident_counts_sum_to_row_count(incidents in prop::collection::vec(arb_incident(), 0..60)) {
        let n = incidents.len();
        let trend: usize = trend_by_month_category(&incidents).iter().map(|r| r.count).sum();
        let by_cat: usize = loss_by_category(&incidents).iter().map(|r| r.incidents).sum();
        let by_loc: usize = incidents_by_location_category(&incidents).iter().map(|r| r.count).sum();
        prop_assert_eq!(trend, n);
        prop_assert_eq!(by_cat, n);
        prop_assert_eq!(by_loc, n);
    }

    #[test]
    fn prop_incident_sums_stay_finite(incidents in prop::collection::vec(arb_incident(), 0..60)) {
        prop_assert!(loss_by_category(&incidents).iter().all(|r| r.total_loss.is_finite()));
    }

    #[test]
    fn prop_trend_rows_are_month_ordered(incidents in prop::collection::vec(arb_incident(), 0..60)) {
        let rows = trend_by_month_category(&incidents);
        prop_assert!(rows.windows(2).all(|w| w[0].year_month <= w[1].year_month));
    }

    #[test]
    fn prop_metric_counts_sum_to_row_count(metrics in prop::collection::vec(arb_metric(), 0..60)) {
        let n = metrics.len();
        prop_assert_eq!(efficacy_by_month(&metrics).iter().map(|r| r.rows).sum::<usize>(), n);
        prop_assert_eq!(roi_by_month(&metrics).iter().map(|r| r.rows).sum::<usize>(), n);
        prop_assert_eq!(cost_benefit_by_category(&metrics).iter().map(|r| r.rows).sum::<usize>(), n);
        prop_assert_eq!(monthly_financial_summary(&metrics).iter().map(|r| r.rows).sum::<usize>(), n);

        for row in cost_benefit_by_category(&metrics) {
            prop_assert!(row.total_loss.is_finite() && row.mitigation_cost.is_finite());
        }
    }

    #[test]
    fn prop_loss_series_has_only_valid_months(metrics in prop::collection::vec(arb_metric(), 0..60)) {
        let valid_months: BTreeSet<YearMonth> = metrics
            .iter()
            .filter(|m| m.is_valid())
            .map(|m| m.year_month)
            .collect();
        let series = monthly_loss_series(&metrics);
        let months: BTreeSet<YearMonth> = series.iter().map(|p| p.year_month).collect();
        prop_assert_eq!(months, valid_months);
        prop_assert!(series.iter().all(|p| p.total_loss.is_finite() && p.total_loss >= 0.0));
    }

    #[test]
    fn prop_component_counts_sum_to_row_count(components in prop::collection::vec(arb_component(), 0..60)) {
        let rows = precision_by_component_type(&components);
        prop_assert_eq!(rows.iter().map(|r| r.components).sum::<usize>(), components.len());
        for row in rows {
            if let Some(mean) = row.mean_precision_pct {
                prop_assert!((-1e-9..=100.0 + 1e-9).contains(&mean));
            }
        }
    }

    #[test]
    fn prop_control_efficacy_counts_sum_to_row_count(risks in prop::collection::vec(arb_risk(), 0..60)) {
        let rows = control_efficacy_by_category(&risks);
        prop_assert_eq!(rows.iter().map(|r| r.risks).sum::<usize>(), risks.len());
        prop_assert!(rows
            .iter()
            .filter_map(|r| r.mean_control_efficacy_pct)
            .all(f64::is_finite));
    }

    #[test]
    fn prop_matrix_counts_in_scale_risks(risks in prop::collection::vec(arb_risk(), 0..60)) {
        let in_scale = risks
            .iter()
            .filter(|r| (1..=5).contains(&r.probability) && (1..=5).contains(&r.impact))
            .count();
        let m = risk_count_matrix(&risks);
        prop_assert_eq!(m.total() as usize, in_scale);
        prop_assert_eq!(m.excluded.len(), risks.len() - in_scale);
    }

    #[test]
    fn prop_level_counts_partition_recognised_risks(risks in prop::collection::vec(arb_risk(), 0..60)) {
        let rows = risk_level_comparison(&risks);
        prop_assert_eq!(rows.len(), 4);
        let inherent = risks.iter().filter(|r| r.inherent_level().is_some()).count();
        let residual = risks.iter().filter(|r| r.residual_level().is_some()).count();
        prop_assert_eq!(rows.iter().map(|r| r.inherent).sum::<usize>(), inherent);
        prop_assert_eq!(rows.iter().map(|r| r.residual).sum::<usize>(), residual);
    }

    #[test]
    fn prop_filter_is_idempotent(
        incidents in prop::collection::vec(arb_incident(), 0..60),
        cat in 0usize..3,
        loc in 0usize..3,
    ) {
        let filter = IncidentFilter {
            categories: [CATEGORIES[cat].to_string()].into(),
            location: Some(format!("Site {loc}")),
            ..Default::default()
        };
        let once = filter.apply(&incidents);
        let twice = filter.apply(once.iter().copied());
        prop_assert_eq!(once.len(), twice.len());
        prop_assert!(once.iter().zip(&twice).all(|(a, b)| std::ptr::eq(*a, *b)));
    }

    #[test]
    fn prop_linear_series_projects_linearly(
        start in -1_000.0f64..1_000.0,
        step in -500.0f64..500.0,
        len in 3usize..24,
    ) {
        let first = YearMonth::new(2022, 1).unwrap();
        let series: Vec<LossPoint> = (0..len)
            .map(|i| LossPoint {
                year_month: first.add_months(i as i32),
                total_loss: start + step * i as f64,
            })
            .collect();
        let projection = TrendProjector::new(ProjectionConfig::default())
            .project(&series)
            .unwrap();
        for (k, p) in projection.projected.iter().enumerate() {
            let expected = start + step * (len + k) as f64;
            prop_assert!((p.value - expected).abs() < 1e-6 * (1.0 + expected.abs()));
        }
    }
}
