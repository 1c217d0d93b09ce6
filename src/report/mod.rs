//! The five dashboard pages, assembled from a loaded [`Dataset`] and the
//! analyst's [`FilterSelections`]. Pages are plain serializable tables; how
//! they are drawn is up to the caller.

mod pages;

pub use pages::{
    FinancialAnalysisPage, IncidentAnalysisPage, IncidentOptions, OverviewPage, Page,
    RiskMatrixPage, SystemPerformancePage,
};

use crate::config::FilterSelections;
use crate::data::{Dataset, Incident};
use crate::filter::RecordFilter;
use crate::projection::TrendProjector;

/// Per-interaction view over the data context; cheap to rebuild.
pub struct Dashboard<'a> {
    data: &'a Dataset,
    selections: &'a FilterSelections,
    projector: &'a TrendProjector,
}

impl<'a> Dashboard<'a> {
    pub fn new(
        data: &'a Dataset,
        selections: &'a FilterSelections,
        projector: &'a TrendProjector,
    ) -> Self {
        Self {
            data,
            selections,
            projector,
        }
    }

    /// Incidents passing the global date and category filters.
    pub fn filtered_incidents(&self) -> Vec<&'a Incident> {
        self.selections.incidents.apply(&self.data.incidents)
    }

    /// Every page, in navigation order.
    pub fn pages(&self) -> Vec<Page<'a>> {
        vec![
            Page::Overview(self.overview()),
            Page::IncidentAnalysis(self.incident_analysis()),
            Page::RiskMatrix(self.risk_matrix()),
            Page::SystemPerformance(self.system_performance()),
            Page::FinancialAnalysis(self.financial_analysis()),
        ]
    }
}
