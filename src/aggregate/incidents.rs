//! Incident tables: monthly trend, losses, location breakdown, KPIs.

use super::{count_by, CountRow, Mean};
use crate::data::{Incident, YearMonth};
use crate::filter::DateRange;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendRow {
    pub year_month: YearMonth,
    pub category: String,
    pub count: usize,
}

/// Incidents per (month, category) pair that actually occurs, month ascending.
pub fn trend_by_month_category<'a, I>(incidents: I) -> Vec<TrendRow>
where
    I: IntoIterator<Item = &'a Incident>,
{
    let mut groups: BTreeMap<(YearMonth, &str), usize> = BTreeMap::new();
    for i in incidents {
        *groups.entry((i.year_month(), i.category.as_str())).or_default() += 1;
    }
    groups
        .into_iter()
        .map(|((year_month, category), count)| TrendRow {
            year_month,
            category: category.to_string(),
            count,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryLossRow {
    pub category: String,
    pub incidents: usize,
    pub total_loss: f64,
}

/// Summed loss per category. Rows failing [`Incident::is_valid`] count as
/// incidents but add nothing to the total.
pub fn loss_by_category<'a, I>(incidents: I) -> Vec<CategoryLossRow>
where
    I: IntoIterator<Item = &'a Incident>,
{
    let mut groups: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for i in incidents {
        let entry = groups.entry(i.category.as_str()).or_default();
        entry.0 += 1;
        if i.is_valid() {
            entry.1 += i.loss_amount;
        }
    }
    groups
        .into_iter()
        .map(|(category, (incidents, total_loss))| CategoryLossRow {
            category: category.to_string(),
            incidents,
            total_loss,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationCategoryRow {
    pub location: String,
    pub category: String,
    pub count: usize,
}

pub fn incidents_by_location_category<'a, I>(incidents: I) -> Vec<LocationCategoryRow>
where
    I: IntoIterator<Item = &'a Incident>,
{
    let mut groups: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for i in incidents {
        *groups
            .entry((i.location.as_str(), i.category.as_str()))
            .or_default() += 1;
    }
    groups
        .into_iter()
        .map(|((location, category), count)| LocationCategoryRow {
            location: location.to_string(),
            category: category.to_string(),
            count,
        })
        .collect()
}

pub fn incidents_by_subcategory<'a, I>(incidents: I) -> Vec<CountRow>
where
    I: IntoIterator<Item = &'a Incident>,
{
    count_by(incidents, |i: &Incident| i.subcategory.as_str())
}

pub fn incidents_by_detection_method<'a, I>(incidents: I) -> Vec<CountRow>
where
    I: IntoIterator<Item = &'a Incident>,
{
    count_by(incidents, |i: &Incident| i.detection_method.as_str())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidentKpis {
    pub total_incidents: usize,
    pub total_loss: f64,
    pub mean_detection_hours: Option<f64>,
    pub mean_response_efficacy_pct: Option<f64>,
}

pub fn incident_kpis<'a, I>(incidents: I) -> IncidentKpis
where
    I: IntoIterator<Item = &'a Incident>,
{
    let mut total_incidents = 0;
    let mut total_loss = 0.0;
    let mut detection = Mean::default();
    let mut efficacy = Mean::default();
    for i in incidents {
        total_incidents += 1;
        if !i.is_valid() {
            continue;
        }
        total_loss += i.loss_amount;
        detection.push(i.detection_time_hours);
        efficacy.push(i.response_efficacy_pct);
    }
    IncidentKpis {
        total_incidents,
        total_loss,
        mean_detection_hours: detection.value(),
        mean_response_efficacy_pct: efficacy.value(),
    }
}

/// First and last incident dates; the default span of the date filter.
pub fn incident_date_bounds<'a, I>(incidents: I) -> Option<DateRange>
where
    I: IntoIterator<Item = &'a Incident>,
{
    incidents.into_iter().fold(None, |acc, i| {
        let d = i.date();
        Some(match acc {
            None => DateRange::new(d, d),
            Some(r) => DateRange::new(r.start.min(d), r.end.max(d)),
        })
    })
}

/// Most recent first.
pub fn incident_listing<'a, I>(incidents: I) -> Vec<&'a Incident>
where
    I: IntoIterator<Item = &'a Incident>,
{
    let mut rows: Vec<&Incident> = incidents.into_iter().collect();
    rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    rows
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponsePoint<'a> {
    pub id: &'a str,
    pub category: &'a str,
    pub detection_time_hours: f64,
    pub response_efficacy_pct: f64,
    pub loss_amount: f64,
}

/// Detection time against response efficacy, one point per valid incident.
pub fn detection_vs_response_points<'a, I>(incidents: I) -> Vec<ResponsePoint<'a>>
where
    I: IntoIterator<Item = &'a Incident>,
{
    incidents
        .into_iter()
        .filter(|i| i.is_valid())
        .map(|i| ResponsePoint {
            id: &i.id,
            category: &i.category,
            detection_time_hours: i.detection_time_hours,
            response_efficacy_pct: i.response_efficacy_pct,
            loss_amount: i.loss_amount,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::incident;

    fn scenario() -> Vec<Incident> {
        vec![
            incident("I1", "2024-01-10", "Cyber", 100.0),
            incident("I2", "2024-02-10", "Cyber", 200.0),
            incident("I3", "2024-01-20", "Fraud", 50.0),
        ]
    }

    #[test]
    fn loss_by_category_scenario() {
        let rows = loss_by_category(&scenario());
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].category.as_str(), rows[0].total_loss), ("Cyber", 300.0));
        assert_eq!((rows[1].category.as_str(), rows[1].total_loss), ("Fraud", 50.0));
    }

    #[test]
    fn trend_scenario_is_month_ordered() {
        let rows = trend_by_month_category(&scenario());
        let got: Vec<(String, &str, usize)> = rows
            .iter()
            .map(|r| (r.year_month.to_string(), r.category.as_str(), r.count))
            .collect();
        assert_eq!(
            got,
            vec![
                ("2024-01".to_string(), "Cyber", 1),
                ("2024-01".to_string(), "Fraud", 1),
                ("2024-02".to_string(), "Cyber", 1),
            ]
        );
    }

    #[test]
    fn negative_loss_is_counted_but_not_summed() {
        let data = vec![
            incident("I1", "2024-01-10", "Cyber", 100.0),
            incident("I2", "2024-01-11", "Cyber", -40.0),
        ];
        let rows = loss_by_category(&data);
        assert_eq!(rows[0].incidents, 2);
        assert_eq!(rows[0].total_loss, 100.0);

        let kpis = incident_kpis(&data);
        assert_eq!(kpis.total_incidents, 2);
        assert_eq!(kpis.total_loss, 100.0);
    }

    #[test]
    fn empty_input_gives_empty_tables_and_missing_means() {
        let none: Vec<Incident> = Vec::new();
        assert!(trend_by_month_category(&none).is_empty());
        assert!(loss_by_category(&none).is_empty());
        assert!(incidents_by_location_category(&none).is_empty());
        let kpis = incident_kpis(&none);
        assert_eq!(kpis.total_incidents, 0);
        assert_eq!(kpis.mean_detection_hours, None);
        assert_eq!(kpis.mean_response_efficacy_pct, None);
        assert_eq!(incident_date_bounds(&none), None);
    }

    #[test]
    fn listing_is_newest_first() {
        let data = scenario();
        let ids: Vec<&str> = incident_listing(&data).iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["I2", "I3", "I1"]);
    }

    #[test]
    fn date_bounds_span_all_incidents() {
        let bounds = incident_date_bounds(&scenario()).unwrap();
        assert_eq!(bounds.start.to_string(), "2024-01-10");
        assert_eq!(bounds.end.to_string(), "2024-02-10");
    }
}
