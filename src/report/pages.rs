use super::Dashboard;
use crate::aggregate::components::{
    component_kpis, component_listing, components_by_status, components_by_type,
    detection_error_points, precision_by_component_type, ComponentKpis, DetectionErrorPoint,
    TypePrecisionRow,
};
use crate::aggregate::incidents::{
    detection_vs_response_points, incident_date_bounds, incident_kpis, incident_listing,
    incidents_by_detection_method, incidents_by_location_category, incidents_by_subcategory,
    loss_by_category, trend_by_month_category, CategoryLossRow, IncidentKpis,
    LocationCategoryRow, ResponsePoint, TrendRow,
};
use crate::aggregate::metrics::{
    cost_benefit_by_category, efficacy_by_month, financial_kpis, loss_by_month_category,
    monthly_financial_summary, monthly_loss_series, roi_by_month, CostBenefitRow, EfficacyRow,
    FinancialKpis, MonthCategoryLossRow, MonthlyFinancialRow, RoiRow,
};
use crate::aggregate::risks::{
    control_efficacy_by_category, risk_count_matrix, risk_level_comparison, risk_listing,
    ControlEfficacyRow, LevelComparisonRow, RiskMatrix,
};
use crate::aggregate::CountRow;
use crate::data::{Component, Incident, Metric, Risk};
use crate::filter::{distinct, DateRange, RecordFilter};
use crate::projection::{LossProjection, SavingsEstimate};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Page<'a> {
    Overview(OverviewPage),
    IncidentAnalysis(IncidentAnalysisPage<'a>),
    RiskMatrix(RiskMatrixPage<'a>),
    SystemPerformance(SystemPerformancePage<'a>),
    FinancialAnalysis(FinancialAnalysisPage),
}

#[derive(Debug, Serialize)]
pub struct OverviewPage {
    /// Full incident date span; the default date filter
    pub date_bounds: Option<DateRange>,
    pub showing: usize,
    pub total: usize,
    pub kpis: IncidentKpis,
    pub trend: Vec<TrendRow>,
    pub loss_by_category: Vec<CategoryLossRow>,
    /// Unfiltered metrics
    pub efficacy_by_month: Vec<EfficacyRow>,
    pub by_location: Vec<LocationCategoryRow>,
}

/// Values available to the page's selectors.
#[derive(Debug, Serialize)]
pub struct IncidentOptions {
    pub subcategories: Vec<String>,
    pub locations: Vec<String>,
    pub statuses: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct IncidentAnalysisPage<'a> {
    pub options: IncidentOptions,
    pub by_subcategory: Vec<CountRow>,
    pub by_detection_method: Vec<CountRow>,
    pub incidents: Vec<&'a Incident>,
    pub detection_vs_response: Vec<ResponsePoint<'a>>,
}

#[derive(Debug, Serialize)]
pub struct RiskMatrixPage<'a> {
    pub categories: Vec<String>,
    pub matrix: RiskMatrix,
    pub risks: Vec<&'a Risk>,
    pub control_efficacy: Vec<ControlEfficacyRow>,
    pub level_comparison: Vec<LevelComparisonRow>,
}

#[derive(Debug, Serialize)]
pub struct SystemPerformancePage<'a> {
    pub component_types: Vec<String>,
    pub locations: Vec<String>,
    pub kpis: ComponentKpis,
    pub by_type: Vec<CountRow>,
    pub by_status: Vec<CountRow>,
    pub precision_by_type: Vec<TypePrecisionRow>,
    pub components: Vec<&'a Component>,
    pub detection_errors: Vec<DetectionErrorPoint<'a>>,
}

#[derive(Debug, Serialize)]
pub struct FinancialAnalysisPage {
    pub categories: Vec<String>,
    pub kpis: FinancialKpis,
    pub loss_by_month_category: Vec<MonthCategoryLossRow>,
    pub roi_by_month: Vec<RoiRow>,
    pub cost_benefit: Vec<CostBenefitRow>,
    pub monthly_summary: Vec<MonthlyFinancialRow>,
    pub savings: Option<SavingsEstimate>,
    pub projection: Option<LossProjection>,
}

impl<'a> Dashboard<'a> {
    pub fn overview(&self) -> OverviewPage {
        let incidents = self.filtered_incidents();
        OverviewPage {
            date_bounds: incident_date_bounds(&self.data.incidents),
            showing: incidents.len(),
            total: self.data.incidents.len(),
            kpis: incident_kpis(incidents.iter().copied()),
            trend: trend_by_month_category(incidents.iter().copied()),
            loss_by_category: loss_by_category(incidents.iter().copied()),
            efficacy_by_month: efficacy_by_month(&self.data.metrics),
            by_location: incidents_by_location_category(incidents.iter().copied()),
        }
    }

    pub fn incident_analysis(&self) -> IncidentAnalysisPage<'a> {
        let global = self.filtered_incidents();
        let options = IncidentOptions {
            subcategories: distinct(global.iter().copied(), |i: &Incident| i.subcategory.as_str()),
            locations: distinct(global.iter().copied(), |i: &Incident| i.location.as_str()),
            statuses: distinct(global.iter().copied(), |i: &Incident| i.status.as_str()),
        };
        let page = &self.selections.incident_page;
        let filter = self.selections.incidents.with_fields(
            page.subcategory.clone(),
            page.location.clone(),
            page.status.clone(),
        );
        let incidents = filter.apply(global);
        debug!(rows = incidents.len(), "incident analysis filtered");

        IncidentAnalysisPage {
            options,
            by_subcategory: incidents_by_subcategory(incidents.iter().copied()),
            by_detection_method: incidents_by_detection_method(incidents.iter().copied()),
            detection_vs_response: detection_vs_response_points(incidents.iter().copied()),
            incidents: incident_listing(incidents),
        }
    }

    pub fn risk_matrix(&self) -> RiskMatrixPage<'a> {
        let risks = self.selections.risks.apply(&self.data.risks);
        RiskMatrixPage {
            categories: distinct(&self.data.risks, |r: &Risk| r.category.as_str()),
            matrix: risk_count_matrix(risks.iter().copied()),
            control_efficacy: control_efficacy_by_category(risks.iter().copied()),
            level_comparison: risk_level_comparison(risks.iter().copied()),
            risks: risk_listing(risks),
        }
    }

    pub fn system_performance(&self) -> SystemPerformancePage<'a> {
        let all = &self.data.components;
        let components = self.selections.components.apply(all);
        SystemPerformancePage {
            component_types: distinct(all, |c: &Component| c.component_type.as_str()),
            locations: distinct(all, |c: &Component| c.location.as_str()),
            kpis: component_kpis(components.iter().copied()),
            by_type: components_by_type(components.iter().copied()),
            by_status: components_by_status(components.iter().copied()),
            precision_by_type: precision_by_component_type(components.iter().copied()),
            detection_errors: detection_error_points(components.iter().copied()),
            components: component_listing(components),
        }
    }

    pub fn financial_analysis(&self) -> FinancialAnalysisPage {
        let metrics: Vec<&Metric> = self.selections.metrics.apply(&self.data.metrics);
        let series = monthly_loss_series(metrics.iter().copied());
        FinancialAnalysisPage {
            categories: distinct(&self.data.metrics, |m: &Metric| m.category.as_str()),
            kpis: financial_kpis(metrics.iter().copied()),
            loss_by_month_category: loss_by_month_category(metrics.iter().copied()),
            roi_by_month: roi_by_month(metrics.iter().copied()),
            cost_benefit: cost_benefit_by_category(metrics.iter().copied()),
            monthly_summary: monthly_financial_summary(metrics.iter().copied()),
            savings: self.projector.savings(&series),
            projection: self.projector.project(&series),
        }
    }
}
