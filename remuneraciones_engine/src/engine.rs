//! Payslip computation engine.
//!
//! The `engine` module turns a worker, their period adjustments and a
//! set of parameters into a [`PayslipResult`].  The single-worker
//! pipeline is pure and infallible once inputs are validated; a batch
//! run ([`run_payroll`]) uses the [`rayon`] crate to compute workers in
//! parallel, since every payslip is independent of the others.

use crate::contributions::{
    afp_contribution_at, disability_insurance, employee_unemployment_insurance,
    employer_unemployment_insurance, gratification, health_contribution, mutual_insurance,
    round_clp,
};
use crate::error::{InvalidInputError, PayrollError};
use crate::models::{
    CalculationWarning, ContractType, EmployeePayslip, EmployerContributions, HealthPlan,
    PayrollRunInput, PayrollRunResult, PayslipResult, PeriodAdjustments, WorkerInput,
};
use crate::params::{GlobalParameters, ParameterOverrides};
use crate::rut::validate_rut;
use crate::tax::income_tax;
use crate::validation::{validate_adjustments, validate_overrides, validate_worker};
use rayon::prelude::*;

/// Computes one payslip.
///
/// Validates the worker, the adjustments and the overrides, resolves
/// the overrides against the default parameter table and runs the
/// calculation.
pub fn compute_payslip(
    worker: &WorkerInput,
    adjustments: &PeriodAdjustments,
    overrides: &ParameterOverrides,
) -> Result<PayslipResult, InvalidInputError> {
    validate_overrides(overrides)?;
    compute_payslip_with(worker, adjustments, &overrides.resolve())
}

/// Computes one payslip against already resolved parameters.
pub fn compute_payslip_with(
    worker: &WorkerInput,
    adjustments: &PeriodAdjustments,
    params: &GlobalParameters,
) -> Result<PayslipResult, InvalidInputError> {
    validate_worker(worker)?;
    validate_adjustments(adjustments)?;

    let result = match worker.contract_type {
        ContractType::Honorarios => honorarios_payslip(worker, adjustments, params),
        contract => dependent_payslip(worker, contract, adjustments, params),
    };
    tracing::debug!(
        contrato = %result.contrato,
        total_haberes = result.total_haberes,
        total_descuentos = result.total_descuentos,
        liquido = result.liquido_a_pagar,
        "payslip computed"
    );
    Ok(result)
}

/// Invoice-based work: a flat withholding and nothing else.
fn honorarios_payslip(
    worker: &WorkerInput,
    adjustments: &PeriodAdjustments,
    params: &GlobalParameters,
) -> PayslipResult {
    let sueldo_base = round_clp(worker.base_salary);
    let bonos_imponibles = round_clp(adjustments.bonos_imponibles);
    let bonos_no_imponibles = round_clp(adjustments.bonos_no_imponibles);
    let descuentos_varios = round_clp(adjustments.descuentos_varios);

    let total_bruto = sueldo_base + bonos_imponibles + bonos_no_imponibles;
    let retencion_legal =
        round_clp(total_bruto as f64 * params.tasa_retencion_honorarios / 100.0);
    let total_descuentos = retencion_legal + descuentos_varios;

    PayslipResult {
        contrato: ContractType::Honorarios,
        sueldo_base,
        gratificacion: 0,
        bonos_imponibles,
        bonos_no_imponibles,
        total_imponible: 0,
        afp: 0,
        salud: 0,
        afc: 0,
        total_leyes_sociales: 0,
        base_tributable: total_bruto,
        impuesto_unico: 0,
        retencion_legal,
        descuentos_varios,
        total_haberes: total_bruto,
        total_descuentos,
        liquido_a_pagar: (total_bruto - total_descuentos).max(0),
        dias_vacaciones: adjustments.dias_vacaciones,
        aportes_patronales: EmployerContributions::default(),
        costo_final_empresa: total_bruto,
        afp_aplicada: None,
        salud_aplicada: None,
        avisos: Vec::new(),
    }
}

/// Dependent employment: gratification, social security, income tax
/// and employer contributions.
fn dependent_payslip(
    worker: &WorkerInput,
    contract: ContractType,
    adjustments: &PeriodAdjustments,
    params: &GlobalParameters,
) -> PayslipResult {
    let mut avisos = Vec::new();

    let sueldo_base = round_clp(worker.base_salary);
    let bonos_imponibles = round_clp(adjustments.bonos_imponibles);
    let bonos_no_imponibles = round_clp(adjustments.bonos_no_imponibles);
    let descuentos_varios = round_clp(adjustments.descuentos_varios);

    let gratificacion = gratification(worker.base_salary, params);
    let total_imponible = sueldo_base + gratificacion + bonos_imponibles;
    let imponible = total_imponible as f64;

    let afp_rate = params.afp_rate(&worker.afp_name);
    if afp_rate.fallback {
        avisos.push(CalculationWarning::AfpDesconocida {
            solicitada: worker.afp_name.clone(),
            aplicada: afp_rate.name.clone(),
        });
    }
    if worker.health == HealthPlan::Unrecognized {
        tracing::warn!("unrecognized health provider, applying Fonasa");
        avisos.push(CalculationWarning::SaludDesconocida {
            aplicada: worker.health.provider().to_string(),
        });
    }

    let afp = afp_contribution_at(imponible, afp_rate.rate, params);
    let salud = health_contribution(imponible, &worker.health, params);
    let afc = employee_unemployment_insurance(imponible, contract, params);
    let total_leyes_sociales = afp + salud + afc;

    let base_tributable = total_imponible - total_leyes_sociales;
    let impuesto_unico = income_tax(base_tributable as f64, params);

    let total_haberes = total_imponible + bonos_no_imponibles;
    let total_descuentos = total_leyes_sociales + impuesto_unico + descuentos_varios;
    let liquido_a_pagar = (total_haberes - total_descuentos).max(0);

    let afc_empleador = employer_unemployment_insurance(imponible, contract, params);
    let sis = disability_insurance(imponible, params);
    let mutual = mutual_insurance(imponible, params);
    let aportes_patronales = EmployerContributions {
        afc: afc_empleador,
        sis,
        mutual,
        total: afc_empleador + sis + mutual,
    };
    let costo_final_empresa = total_haberes + aportes_patronales.total;

    PayslipResult {
        contrato: contract,
        sueldo_base,
        gratificacion,
        bonos_imponibles,
        bonos_no_imponibles,
        total_imponible,
        afp,
        salud,
        afc,
        total_leyes_sociales,
        base_tributable,
        impuesto_unico,
        retencion_legal: 0,
        descuentos_varios,
        total_haberes,
        total_descuentos,
        liquido_a_pagar,
        dias_vacaciones: adjustments.dias_vacaciones,
        aportes_patronales,
        costo_final_empresa,
        afp_aplicada: Some(afp_rate.name),
        salud_aplicada: Some(worker.health.provider().to_string()),
        avisos,
    }
}

/// Runs a payroll for every worker in `input`.
///
/// Parameters are resolved once and shared by all workers.  Results
/// keep the input order.  The run fails on the first worker whose RUT
/// or amounts are rejected, naming that worker.
pub fn run_payroll(
    input: PayrollRunInput,
    overrides: &ParameterOverrides,
) -> Result<PayrollRunResult, PayrollError> {
    validate_overrides(overrides).map_err(PayrollError::Parameters)?;
    let params = overrides.resolve();
    tracing::info!(
        periodo = %input.periodo,
        trabajadores = input.trabajadores.len(),
        "starting payroll run"
    );

    let outcomes: Vec<Result<EmployeePayslip, PayrollError>> = input
        .trabajadores
        .into_par_iter()
        .map(|entry| -> Result<EmployeePayslip, PayrollError> {
            let worker_error = |source| PayrollError::Worker {
                rut: entry.rut.clone(),
                source,
            };
            let rut = validate_rut(&entry.rut).map_err(worker_error)?;
            let liquidacion = compute_payslip_with(&entry.trabajador, &entry.ajustes, &params)
                .map_err(worker_error)?;
            Ok(EmployeePayslip {
                rut,
                nombre: entry.nombre,
                liquidacion,
            })
        })
        .collect();
    // Indexed collect keeps input order; the first Err is the earliest entry.
    let resultados = outcomes.into_iter().collect::<Result<Vec<_>, _>>()?;

    let total_liquido: i64 = resultados
        .iter()
        .map(|r| r.liquidacion.liquido_a_pagar)
        .sum();
    tracing::info!(
        periodo = %input.periodo,
        trabajadores = resultados.len(),
        total_liquido,
        "payroll run finished"
    );

    Ok(PayrollRunResult {
        periodo: input.periodo,
        version: overrides.version.clone(),
        resultados,
    })
}
