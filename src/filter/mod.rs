//! Filter engine: record predicates built from the user's selections.
//!
//! Every field is optional; `None` (or an empty category set) means the
//! filter is inactive. Filtering never fails and keeps input order.

use crate::data::{Component, Incident, Metric, Risk, RiskLevel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A predicate over one record type.
pub trait RecordFilter<T> {
    fn matches(&self, record: &T) -> bool;

    /// Subsequence of `records` satisfying every active predicate.
    fn apply<'a, I>(&self, records: I) -> Vec<&'a T>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

/// Inclusive range on a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

fn in_set(set: &BTreeSet<String>, value: &str) -> bool {
    set.is_empty() || set.contains(value)
}

fn equals(selected: &Option<String>, value: &str) -> bool {
    selected.as_deref().map_or(true, |s| s == value)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncidentFilter {
    pub date_range: Option<DateRange>,
    pub categories: BTreeSet<String>,
    pub subcategory: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
}

impl IncidentFilter {
    /// Narrow a global filter with page-level exact matches.
    pub fn with_fields(
        &self,
        subcategory: Option<String>,
        location: Option<String>,
        status: Option<String>,
    ) -> Self {
        Self {
            subcategory,
            location,
            status,
            ..self.clone()
        }
    }
}

impl RecordFilter<Incident> for IncidentFilter {
    fn matches(&self, r: &Incident) -> bool {
        self.date_range.map_or(true, |d| d.contains(r.date()))
            && in_set(&self.categories, &r.category)
            && equals(&self.subcategory, &r.subcategory)
            && equals(&self.location, &r.location)
            && equals(&self.status, &r.status)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskFilter {
    pub category: Option<String>,
    pub risk_level: Option<RiskLevel>,
}

impl RecordFilter<Risk> for RiskFilter {
    fn matches(&self, r: &Risk) -> bool {
        equals(&self.category, &r.category)
            && self
                .risk_level
                .map_or(true, |level| r.inherent_level() == Some(level))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricFilter {
    pub categories: BTreeSet<String>,
}

impl RecordFilter<Metric> for MetricFilter {
    fn matches(&self, r: &Metric) -> bool {
        in_set(&self.categories, &r.category)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentFilter {
    pub component_type: Option<String>,
    pub location: Option<String>,
}

impl RecordFilter<Component> for ComponentFilter {
    fn matches(&self, r: &Component) -> bool {
        equals(&self.component_type, &r.component_type) && equals(&self.location, &r.location)
    }
}

/// Distinct values of a field in first-seen order, for building selection lists.
pub fn distinct<'a, T: 'a, I, F>(records: I, field: F) -> Vec<String>
where
    I: IntoIterator<Item = &'a T>,
    F: Fn(&T) -> &str,
{
    let mut seen = BTreeSet::new();
    records
        .into_iter()
        .map(|r| field(r))
        .filter(|v| seen.insert(v.to_string()))
        .map(str::to_string)
        .collect()
}
