//! Record builders for tests and benches. Enabled by the `testkit` feature.
//! Malformed date arguments panic.

use crate::data::{Component, Incident, Metric, Risk, YearMonth};
use chrono::NaiveDate;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("test date must be YYYY-MM-DD")
}

/// Incident on `day` (`YYYY-MM-DD`) with neutral defaults elsewhere.
pub fn incident(id: &str, day: &str, category: &str, loss: f64) -> Incident {
    Incident {
        id: id.to_string(),
        timestamp: date(day).and_hms_opt(12, 0, 0).expect("noon is a valid time"),
        category: category.to_string(),
        subcategory: "General".to_string(),
        location: "Warehouse".to_string(),
        loss_amount: loss,
        detection_time_hours: 2.0,
        detection_method: "CCTV".to_string(),
        response_efficacy_pct: 80.0,
        status: "Open".to_string(),
    }
}

pub fn risk(id: &str, probability: i32, impact: i32) -> Risk {
    Risk {
        id: id.to_string(),
        category: "Cyber".to_string(),
        subcategory: "Phishing".to_string(),
        description: String::new(),
        probability,
        impact,
        risk_level: "High".to_string(),
        control_efficacy_pct: 50.0,
        residual_risk_level: "Low".to_string(),
        deadline_date: date("2024-12-31"),
        plan_status: "In progress".to_string(),
    }
}

/// Metric row for `month` (`YYYY-MM`).
pub fn metric(month: &str, category: &str, loss: f64, mitigation_cost: f64) -> Metric {
    Metric {
        year_month: month.parse::<YearMonth>().expect("test month must be YYYY-MM"),
        category: category.to_string(),
        detection_efficacy_pct: 70.0,
        response_efficacy_pct: 60.0,
        security_roi_pct: 100.0,
        total_loss_amount: loss,
        mitigation_cost,
        incident_count: 1,
    }
}

pub fn component(id: &str, component_type: &str, precision: f64) -> Component {
    Component {
        id: id.to_string(),
        component_type: component_type.to_string(),
        location: "Dock A".to_string(),
        operational_status: "Operacional".to_string(),
        incidents_detected: 3,
        false_positives: 1,
        false_negatives: 0,
        precision_rate_pct: precision,
        last_maintenance_date: date("2024-01-10"),
        next_maintenance_date: date("2024-07-10"),
    }
}
