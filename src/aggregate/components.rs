//! Monitoring component tables.

use super::{count_by, CountRow, Mean};
use crate::data::Component;
use crate::error::{ratio, serialize_ratio, Ratio};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypePrecisionRow {
    pub component_type: String,
    pub components: usize,
    pub mean_precision_pct: Option<f64>,
}

/// Mean precision per component type; out-of-range rates are skipped.
pub fn precision_by_component_type<'a, I>(components: I) -> Vec<TypePrecisionRow>
where
    I: IntoIterator<Item = &'a Component>,
{
    let mut groups: BTreeMap<&str, (usize, Mean)> = BTreeMap::new();
    for c in components {
        let entry = groups.entry(c.component_type.as_str()).or_default();
        entry.0 += 1;
        if c.is_valid() {
            entry.1.push(c.precision_rate_pct);
        }
    }
    groups
        .into_iter()
        .map(|(component_type, (components, mean))| TypePrecisionRow {
            component_type: component_type.to_string(),
            components,
            mean_precision_pct: mean.value(),
        })
        .collect()
}

pub fn components_by_type<'a, I>(components: I) -> Vec<CountRow>
where
    I: IntoIterator<Item = &'a Component>,
{
    count_by(components, |c: &Component| c.component_type.as_str())
}

pub fn components_by_status<'a, I>(components: I) -> Vec<CountRow>
where
    I: IntoIterator<Item = &'a Component>,
{
    count_by(components, |c: &Component| c.operational_status.as_str())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentKpis {
    pub total_components: usize,
    pub operational: usize,
    #[serde(serialize_with = "serialize_ratio")]
    pub operational_pct: Ratio,
    pub incidents_detected: u64,
    pub mean_precision_pct: Option<f64>,
}

pub fn component_kpis<'a, I>(components: I) -> ComponentKpis
where
    I: IntoIterator<Item = &'a Component>,
{
    let mut total = 0usize;
    let mut operational = 0usize;
    let mut detected = 0u64;
    let mut precision = Mean::default();
    for c in components {
        total += 1;
        if c.is_operational() {
            operational += 1;
        }
        if c.is_valid() {
            detected += u64::from(c.incidents_detected);
            precision.push(c.precision_rate_pct);
        }
    }
    ComponentKpis {
        total_components: total,
        operational,
        operational_pct: ratio(operational as f64, total as f64, ("operational", "total_components"))
            .map(|r| r * 100.0),
        incidents_detected: detected,
        mean_precision_pct: precision.value(),
    }
}

/// Highest precision first.
pub fn component_listing<'a, I>(components: I) -> Vec<&'a Component>
where
    I: IntoIterator<Item = &'a Component>,
{
    let mut rows: Vec<&Component> = components.into_iter().collect();
    rows.sort_by(|a, b| b.precision_rate_pct.total_cmp(&a.precision_rate_pct));
    rows
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionErrorPoint<'a> {
    pub id: &'a str,
    pub component_type: &'a str,
    pub false_positives: u32,
    pub false_negatives: u32,
    pub incidents_detected: u32,
}

/// False positives against false negatives, one point per component.
pub fn detection_error_points<'a, I>(components: I) -> Vec<DetectionErrorPoint<'a>>
where
    I: IntoIterator<Item = &'a Component>,
{
    components
        .into_iter()
        .map(|c| DetectionErrorPoint {
            id: &c.id,
            component_type: &c.component_type,
            false_positives: c.false_positives,
            false_negatives: c.false_negatives,
            incidents_detected: c.incidents_detected,
        })
        .collect()
}
