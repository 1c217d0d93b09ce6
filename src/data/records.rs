//! Typed rows of the four input files. Headers of the source CSVs are the
//! canonical column names; English snake_case names are accepted too.

use super::quality::{check_finite, IssueKind};
use super::{datetime, RiskLevel, YearMonth};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A recorded security incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    #[serde(rename(deserialize = "ID_Incidente"), alias = "id")]
    pub id: String,
    #[serde(rename(deserialize = "Data_Hora"), alias = "timestamp", with = "datetime")]
    pub timestamp: NaiveDateTime,
    #[serde(rename(deserialize = "Categoria_Risco"), alias = "category")]
    pub category: String,
    #[serde(rename(deserialize = "Subcategoria"), alias = "subcategory")]
    pub subcategory: String,
    #[serde(rename(deserialize = "Local"), alias = "location")]
    pub location: String,
    #[serde(rename(deserialize = "Valor_Perda"), alias = "loss_amount")]
    pub loss_amount: f64,
    #[serde(rename(deserialize = "Tempo_Deteccao"), alias = "detection_time_hours")]
    pub detection_time_hours: f64,
    #[serde(rename(deserialize = "Metodo_Deteccao"), alias = "detection_method")]
    pub detection_method: String,
    #[serde(rename(deserialize = "Eficacia_Resposta"), alias = "response_efficacy_pct")]
    pub response_efficacy_pct: f64,
    #[serde(rename(deserialize = "Status"), alias = "status")]
    pub status: String,
}

impl Incident {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn year_month(&self) -> YearMonth {
        YearMonth::from_date(self.date())
    }

    /// Out-of-domain fields; empty for a usable row.
    pub fn issues(&self) -> Vec<IssueKind> {
        let mut issues = Vec::new();
        check_finite(&mut issues, "loss_amount", self.loss_amount);
        if self.loss_amount < 0.0 {
            issues.push(IssueKind::NegativeLoss { value: self.loss_amount });
        }
        check_finite(&mut issues, "detection_time_hours", self.detection_time_hours);
        check_finite(&mut issues, "response_efficacy_pct", self.response_efficacy_pct);
        issues
    }

    /// False for rows excluded from numeric aggregations.
    pub fn is_valid(&self) -> bool {
        self.issues().is_empty()
    }
}

/// An assessed risk with inherent and residual levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Risk {
    #[serde(rename(deserialize = "ID_Risco"), alias = "id")]
    pub id: String,
    #[serde(rename(deserialize = "Categoria_Risco"), alias = "category")]
    pub category: String,
    #[serde(rename(deserialize = "Subcategoria"), alias = "subcategory")]
    pub subcategory: String,
    #[serde(rename(deserialize = "Descricao_Risco"), alias = "description")]
    pub description: String,
    /// 1 (rare) to 5 (almost certain)
    #[serde(rename(deserialize = "Probabilidade"), alias = "probability")]
    pub probability: i32,
    /// 1 (insignificant) to 5 (catastrophic)
    #[serde(rename(deserialize = "Impacto"), alias = "impact")]
    pub impact: i32,
    #[serde(rename(deserialize = "Nivel_Risco"), alias = "risk_level")]
    pub risk_level: String,
    #[serde(rename(deserialize = "Eficacia_Controles"), alias = "control_efficacy_pct")]
    pub control_efficacy_pct: f64,
    #[serde(rename(deserialize = "Nivel_Risco_Residual"), alias = "residual_risk_level")]
    pub residual_risk_level: String,
    #[serde(rename(deserialize = "Prazo"), alias = "deadline_date", with = "datetime::date")]
    pub deadline_date: NaiveDate,
    #[serde(rename(deserialize = "Status_Plano"), alias = "plan_status")]
    pub plan_status: String,
}

impl Risk {
    pub fn inherent_level(&self) -> Option<RiskLevel> {
        RiskLevel::from_label(&self.risk_level)
    }

    pub fn residual_level(&self) -> Option<RiskLevel> {
        RiskLevel::from_label(&self.residual_risk_level)
    }

    /// Zero-based matrix cell, if both axes are on the 1..=5 scale.
    pub fn matrix_cell(&self) -> Option<(usize, usize)> {
        let axis = |v: i32| (1..=5).contains(&v).then(|| (v - 1) as usize);
        Some((axis(self.probability)?, axis(self.impact)?))
    }

    pub fn issues(&self) -> Vec<IssueKind> {
        let mut issues = Vec::new();
        if !(1..=5).contains(&self.probability) {
            issues.push(IssueKind::ProbabilityOutOfRange { value: self.probability });
        }
        if !(1..=5).contains(&self.impact) {
            issues.push(IssueKind::ImpactOutOfRange { value: self.impact });
        }
        if self.inherent_level().is_none() {
            issues.push(IssueKind::UnknownRiskLevel { label: self.risk_level.clone() });
        }
        if self.residual_level().is_none() {
            issues.push(IssueKind::UnknownResidualLevel {
                label: self.residual_risk_level.clone(),
            });
        }
        check_finite(&mut issues, "control_efficacy_pct", self.control_efficacy_pct);
        issues
    }

    pub fn is_valid(&self) -> bool {
        self.issues().is_empty()
    }
}

/// Monthly performance figures for one risk category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    #[serde(rename(deserialize = "Mes_Ano"), alias = "year_month")]
    pub year_month: YearMonth,
    #[serde(rename(deserialize = "Categoria_Risco"), alias = "category")]
    pub category: String,
    #[serde(rename(deserialize = "Eficacia_Deteccao"), alias = "detection_efficacy_pct")]
    pub detection_efficacy_pct: f64,
    #[serde(rename(deserialize = "Eficacia_Resposta"), alias = "response_efficacy_pct")]
    pub response_efficacy_pct: f64,
    #[serde(rename(deserialize = "ROI_Seguranca"), alias = "security_roi_pct")]
    pub security_roi_pct: f64,
    #[serde(rename(deserialize = "Valor_Total_Perdas"), alias = "total_loss_amount")]
    pub total_loss_amount: f64,
    #[serde(rename(deserialize = "Custo_Mitigacao"), alias = "mitigation_cost")]
    pub mitigation_cost: f64,
    #[serde(rename(deserialize = "Numero_Incidentes"), alias = "incident_count")]
    pub incident_count: i64,
}

impl Metric {
    pub fn issues(&self) -> Vec<IssueKind> {
        let mut issues = Vec::new();
        if self.incident_count < 0 {
            issues.push(IssueKind::NegativeIncidentCount { value: self.incident_count });
        }
        check_finite(&mut issues, "total_loss_amount", self.total_loss_amount);
        if self.total_loss_amount < 0.0 {
            issues.push(IssueKind::NegativeLoss { value: self.total_loss_amount });
        }
        check_finite(&mut issues, "mitigation_cost", self.mitigation_cost);
        check_finite(&mut issues, "security_roi_pct", self.security_roi_pct);
        check_finite(&mut issues, "detection_efficacy_pct", self.detection_efficacy_pct);
        check_finite(&mut issues, "response_efficacy_pct", self.response_efficacy_pct);
        issues
    }

    pub fn is_valid(&self) -> bool {
        self.issues().is_empty()
    }
}

/// A monitoring-system component (camera, sensor, tracker...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    #[serde(rename(deserialize = "ID_Componente"), alias = "id")]
    pub id: String,
    #[serde(rename(deserialize = "Tipo_Componente"), alias = "component_type")]
    pub component_type: String,
    #[serde(rename(deserialize = "Localizacao"), alias = "location")]
    pub location: String,
    #[serde(rename(deserialize = "Status_Operacional"), alias = "operational_status")]
    pub operational_status: String,
    #[serde(rename(deserialize = "Incidentes_Detectados"), alias = "incidents_detected")]
    pub incidents_detected: u32,
    #[serde(rename(deserialize = "Falsos_Positivos"), alias = "false_positives")]
    pub false_positives: u32,
    #[serde(rename(deserialize = "Falsos_Negativos"), alias = "false_negatives")]
    pub false_negatives: u32,
    #[serde(rename(deserialize = "Taxa_Precisao"), alias = "precision_rate_pct")]
    pub precision_rate_pct: f64,
    #[serde(
        rename(deserialize = "Ultima_Manutencao"),
        alias = "last_maintenance_date",
        with = "datetime::date"
    )]
    pub last_maintenance_date: NaiveDate,
    #[serde(
        rename(deserialize = "Proxima_Manutencao"),
        alias = "next_maintenance_date",
        with = "datetime::date"
    )]
    pub next_maintenance_date: NaiveDate,
}

impl Component {
    pub fn is_operational(&self) -> bool {
        matches!(
            self.operational_status.trim().to_lowercase().as_str(),
            "operacional" | "operational"
        )
    }

    /// NaN fails the range check too.
    pub fn issues(&self) -> Vec<IssueKind> {
        if (0.0..=100.0).contains(&self.precision_rate_pct) {
            Vec::new()
        } else {
            vec![IssueKind::PrecisionOutOfRange { value: self.precision_rate_pct }]
        }
    }

    pub fn is_valid(&self) -> bool {
        self.issues().is_empty()
    }
}
