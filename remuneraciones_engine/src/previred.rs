//! Flat payroll export in the shape consumed by Previred uploads.
//!
//! Each computed payslip becomes one row with a fixed column set.
//! Non-taxable allowances (asignaciones no imponibles) are not modelled
//! by the engine and are always exported as zero.

use crate::error::ExportError;
use crate::models::{EmployeePayslip, PayrollRunResult};
use serde::Serialize;
use std::io::Write;

/// One exported row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviredRecord {
    #[serde(rename = "RUT")]
    pub rut: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "BaseSalary")]
    pub base_salary: i64,
    #[serde(rename = "Gratification")]
    pub gratification: i64,
    #[serde(rename = "TaxableBonuses")]
    pub taxable_bonuses: i64,
    #[serde(rename = "TotalTaxableIncome")]
    pub total_taxable_income: i64,
    #[serde(rename = "NonTaxableBonuses")]
    pub non_taxable_bonuses: i64,
    #[serde(rename = "NonTaxableAllowances")]
    pub non_taxable_allowances: i64,
    #[serde(rename = "TotalEarnings")]
    pub total_earnings: i64,
    #[serde(rename = "AFP")]
    pub afp: String,
    #[serde(rename = "Health")]
    pub health: String,
    #[serde(rename = "TotalSocialSecurityDeductions")]
    pub total_social_security_deductions: i64,
    #[serde(rename = "NetPay")]
    pub net_pay: i64,
}

impl PreviredRecord {
    pub fn from_payslip(entry: &EmployeePayslip) -> Self {
        let payslip = &entry.liquidacion;
        Self {
            rut: entry.rut.clone(),
            name: entry.nombre.clone(),
            base_salary: payslip.sueldo_base,
            gratification: payslip.gratificacion,
            taxable_bonuses: payslip.bonos_imponibles,
            total_taxable_income: payslip.total_imponible,
            non_taxable_bonuses: payslip.bonos_no_imponibles,
            non_taxable_allowances: 0,
            total_earnings: payslip.total_haberes,
            afp: payslip.afp_aplicada.clone().unwrap_or_default(),
            health: payslip.salud_aplicada.clone().unwrap_or_default(),
            total_social_security_deductions: payslip.total_leyes_sociales,
            net_pay: payslip.liquido_a_pagar,
        }
    }
}

/// Rows for every payslip in a run, in run order.
pub fn records_for_run(run: &PayrollRunResult) -> Vec<PreviredRecord> {
    run.resultados.iter().map(PreviredRecord::from_payslip).collect()
}

/// Writes `records` as CSV with a header row.
pub fn write_previred_csv<W: Write>(
    writer: W,
    records: &[PreviredRecord],
) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    tracing::debug!(rows = records.len(), "previred export written");
    Ok(())
}
