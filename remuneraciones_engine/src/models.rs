//! Data models for the remuneraciones engine.
//!
//! The `models` module defines the serialisable input and output
//! structures of a payslip calculation: the worker's contractual data,
//! the manual adjustments for one period, the computed payslip and the
//! batch payroll run wrappers.  JSON field names follow the camelCase
//! Spanish names used by the payroll front end and its spreadsheet
//! exports, so results round-trip with existing tooling.

use crate::error::InvalidInputError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Contractual data for one worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerInput {
    /// Gross contractual base salary, CLP.
    #[serde(default)]
    pub base_salary: f64,
    /// AFP administrator name.  Unknown names fall back to Habitat.
    #[serde(default)]
    pub afp_name: String,
    /// Health affiliation.  Defaults to Fonasa.
    #[serde(default)]
    pub health: HealthPlan,
    pub contract_type: ContractType,
}

/// Health system affiliation.
///
/// Deserialized from an object tagged by `provider`.  Any provider other
/// than Fonasa or Isapre lands in [`HealthPlan::Unrecognized`], which the
/// engine treats as Fonasa and reports as a warning.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "provider")]
pub enum HealthPlan {
    /// Public system, flat 7% legal rate.
    #[default]
    #[serde(alias = "FONASA", alias = "fonasa")]
    Fonasa,
    /// Private insurer with a plan priced in UF.
    #[serde(alias = "ISAPRE", alias = "isapre")]
    Isapre {
        #[serde(rename = "ufAmount", default)]
        uf_amount: f64,
    },
    #[serde(other)]
    Unrecognized,
}

impl HealthPlan {
    /// Provider name for exports and audit fields.
    pub fn provider(&self) -> &'static str {
        match self {
            HealthPlan::Fonasa | HealthPlan::Unrecognized => "Fonasa",
            HealthPlan::Isapre { .. } => "Isapre",
        }
    }
}

/// Closed set of contract types.
///
/// Parsed once from text at the boundary.  Matching ignores case,
/// whitespace, `-` and `_`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ContractType {
    Indefinido,
    PlazoFijo,
    PorObra,
    Honorarios,
}

impl ContractType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractType::Indefinido => "Indefinido",
            ContractType::PlazoFijo => "Plazo Fijo",
            ContractType::PorObra => "Por Obra",
            ContractType::Honorarios => "Honorarios",
        }
    }

    /// Fixed-term and by-task contracts: exempt from the employee AFC
    /// share and charged the higher employer AFC rate.
    pub fn is_fixed_term(&self) -> bool {
        matches!(self, ContractType::PlazoFijo | ContractType::PorObra)
    }
}

impl FromStr for ContractType {
    type Err = InvalidInputError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "indefinido" | "plazoindefinido" => Ok(ContractType::Indefinido),
            "plazofijo" | "fijo" => Ok(ContractType::PlazoFijo),
            "porobra" | "obra" | "obraofaena" | "porobraofaena" => Ok(ContractType::PorObra),
            "honorarios" | "honorario" => Ok(ContractType::Honorarios),
            _ => Err(InvalidInputError::UnknownContractType(value.to_string())),
        }
    }
}

impl TryFrom<String> for ContractType {
    type Error = InvalidInputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ContractType> for String {
    fn from(value: ContractType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Manual additions and deductions for one period.  All default to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PeriodAdjustments {
    pub bonos_imponibles: f64,
    pub bonos_no_imponibles: f64,
    pub descuentos_varios: f64,
    /// Carried to the payslip unchanged.
    pub dias_vacaciones: f64,
}

/// Employer-paid contributions on top of gross pay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerContributions {
    pub afc: i64,
    pub sis: i64,
    pub mutual: i64,
    pub total: i64,
}

/// Non-fatal conditions noticed while computing a payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tipo", rename_all = "camelCase")]
pub enum CalculationWarning {
    /// The requested AFP was not in the rate table.
    AfpDesconocida { solicitada: String, aplicada: String },
    /// The health provider was neither Fonasa nor Isapre.
    SaludDesconocida { aplicada: String },
}

/// The computed payslip.  Every amount is an integer number of pesos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayslipResult {
    pub contrato: ContractType,
    pub sueldo_base: i64,
    pub gratificacion: i64,
    pub bonos_imponibles: i64,
    pub bonos_no_imponibles: i64,
    pub total_imponible: i64,
    pub afp: i64,
    pub salud: i64,
    pub afc: i64,
    pub total_leyes_sociales: i64,
    pub base_tributable: i64,
    pub impuesto_unico: i64,
    /// Honorarios withholding; zero for dependent workers.
    pub retencion_legal: i64,
    pub descuentos_varios: i64,
    pub total_haberes: i64,
    pub total_descuentos: i64,
    pub liquido_a_pagar: i64,
    pub dias_vacaciones: f64,
    pub aportes_patronales: EmployerContributions,
    pub costo_final_empresa: i64,
    /// Administrator whose rate was applied.  Absent for honorarios.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub afp_aplicada: Option<String>,
    /// Health provider applied.  Absent for honorarios.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salud_aplicada: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub avisos: Vec<CalculationWarning>,
}

/// A single payslip request: the worker plus this period's adjustments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayslipRequest {
    pub trabajador: WorkerInput,
    #[serde(default)]
    pub ajustes: PeriodAdjustments,
}

/// One worker in a payroll run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollEntry {
    /// Chilean RUT, e.g. `"12.345.678-5"`.
    pub rut: String,
    pub nombre: String,
    pub trabajador: WorkerInput,
    #[serde(default)]
    pub ajustes: PeriodAdjustments,
}

/// Input to a batch payroll run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRunInput {
    /// Period label, e.g. `"2026-03"`.
    pub periodo: String,
    pub trabajadores: Vec<PayrollEntry>,
}

/// A payslip tagged with the worker it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePayslip {
    pub rut: String,
    pub nombre: String,
    pub liquidacion: PayslipResult,
}

/// The aggregate result of a payroll run, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRunResult {
    pub periodo: String,
    /// Label of the parameter set used, if the overrides carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub resultados: Vec<EmployeePayslip>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn contract_type_parses_common_spellings() {
        assert_eq!("Indefinido".parse::<ContractType>(), Ok(ContractType::Indefinido));
        assert_eq!("Plazo Fijo".parse::<ContractType>(), Ok(ContractType::PlazoFijo));
        assert_eq!("plazo_fijo".parse::<ContractType>(), Ok(ContractType::PlazoFijo));
        assert_eq!("PlazoFijo".parse::<ContractType>(), Ok(ContractType::PlazoFijo));
        assert_eq!("Obra o Faena".parse::<ContractType>(), Ok(ContractType::PorObra));
        assert_eq!("por-obra".parse::<ContractType>(), Ok(ContractType::PorObra));
        assert_eq!("HONORARIOS".parse::<ContractType>(), Ok(ContractType::Honorarios));
    }

    #[test]
    fn contract_type_rejects_ambiguous_text() {
        let err = "Plazo Indefinido-Fijo".parse::<ContractType>().unwrap_err();
        assert!(matches!(err, InvalidInputError::UnknownContractType(_)));
    }

    #[test]
    fn worker_input_deserializes_isapre_plan() {
        let worker: WorkerInput = serde_json::from_value(json!({
            "baseSalary": 1200000,
            "afpName": "Cuprum",
            "health": {"provider": "Isapre", "ufAmount": 4.2},
            "contractType": "Plazo Fijo"
        }))
        .expect("worker parses");
        assert_eq!(worker.health, HealthPlan::Isapre { uf_amount: 4.2 });
        assert_eq!(worker.contract_type, ContractType::PlazoFijo);
    }

    #[test]
    fn unknown_health_provider_is_captured() {
        let worker: WorkerInput = serde_json::from_value(json!({
            "baseSalary": 600000,
            "afpName": "Uno",
            "health": {"provider": "Capredena"},
            "contractType": "Indefinido"
        }))
        .expect("worker parses");
        assert_eq!(worker.health, HealthPlan::Unrecognized);
        assert_eq!(worker.health.provider(), "Fonasa");
    }

    #[test]
    fn unknown_contract_type_fails_deserialization() {
        let result = serde_json::from_value::<WorkerInput>(json!({
            "baseSalary": 600000,
            "contractType": "Temporal"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn adjustments_default_to_zero() {
        let adjustments: PeriodAdjustments =
            serde_json::from_value(json!({"bonosImponibles": 50000})).expect("adjustments parse");
        assert_eq!(adjustments.bonos_imponibles, 50_000.0);
        assert_eq!(adjustments.descuentos_varios, 0.0);
        assert_eq!(adjustments.dias_vacaciones, 0.0);
    }
}
