//! Statutory deductions and employer contributions.
//!
//! Each calculator takes an imponible base, clamps it to the relevant
//! cap (recomputed from the current UF on every call) and applies one
//! legal rate.  Results are rounded to the peso independently, the same
//! way the accounting system rounds each payslip line, so totals
//! reconcile line by line.

use crate::models::{ContractType, HealthPlan};
use crate::params::GlobalParameters;

/// Legal gratification: 25% of base salary, capped at 4.75 minimum
/// wages per year.
pub const GRATIFICACION_RATE: f64 = 0.25;
pub const GRATIFICACION_TOPE_SUELDOS_MINIMOS: f64 = 4.75;

/// Legal health contribution, percent of the capped base.
pub const FONASA_RATE: f64 = 7.0;

/// Employee unemployment insurance, indefinite contracts only.
pub const AFC_TRABAJADOR_RATE: f64 = 0.6;

/// Employer unemployment insurance, indefinite contracts.
pub const AFC_EMPLEADOR_INDEFINIDO_RATE: f64 = 2.4;

/// Employer unemployment insurance, fixed-term and by-task contracts.
pub const AFC_EMPLEADOR_PLAZO_FIJO_RATE: f64 = 3.0;

/// Rounds to the nearest peso, halves rounding up.
pub fn round_clp(amount: f64) -> i64 {
    (amount + 0.5).floor() as i64
}

fn percent_of_capped(base: f64, cap: f64, rate: f64) -> i64 {
    round_clp(base.min(cap) * rate / 100.0)
}

/// Monthly legal gratification.
pub fn gratification(base_salary: f64, params: &GlobalParameters) -> i64 {
    let tope = GRATIFICACION_TOPE_SUELDOS_MINIMOS * params.sueldo_minimo / 12.0;
    round_clp((base_salary * GRATIFICACION_RATE).min(tope))
}

/// Employee pension contribution for the named AFP.
pub fn afp_contribution(imponible: f64, afp_name: &str, params: &GlobalParameters) -> i64 {
    afp_contribution_at(imponible, params.afp_rate(afp_name).rate, params)
}

/// Employee pension contribution at an already resolved `rate`.
pub fn afp_contribution_at(imponible: f64, rate: f64, params: &GlobalParameters) -> i64 {
    percent_of_capped(imponible, params.afp_cap(), rate)
}

/// Employee health contribution.
///
/// Health shares the pension cap.  Isapre affiliates pay the larger of
/// the 7% legal floor and their contracted plan converted from UF.
pub fn health_contribution(imponible: f64, health: &HealthPlan, params: &GlobalParameters) -> i64 {
    let legal = imponible.min(params.afp_cap()) * FONASA_RATE / 100.0;
    match health {
        HealthPlan::Isapre { uf_amount } => round_clp(legal.max(uf_amount * params.uf_value)),
        HealthPlan::Fonasa | HealthPlan::Unrecognized => round_clp(legal),
    }
}

/// Employee unemployment insurance (AFC).  Fixed-term and by-task
/// contracts pay nothing on the employee side.
pub fn employee_unemployment_insurance(
    imponible: f64,
    contract: ContractType,
    params: &GlobalParameters,
) -> i64 {
    if contract.is_fixed_term() {
        return 0;
    }
    percent_of_capped(imponible, params.afc_cap(), AFC_TRABAJADOR_RATE)
}

/// Employer unemployment insurance (AFC).  Always charged.
pub fn employer_unemployment_insurance(
    imponible: f64,
    contract: ContractType,
    params: &GlobalParameters,
) -> i64 {
    let rate = if contract.is_fixed_term() {
        AFC_EMPLEADOR_PLAZO_FIJO_RATE
    } else {
        AFC_EMPLEADOR_INDEFINIDO_RATE
    };
    percent_of_capped(imponible, params.afc_cap(), rate)
}

/// Disability and survivorship insurance (SIS), employer paid.
pub fn disability_insurance(imponible: f64, params: &GlobalParameters) -> i64 {
    percent_of_capped(imponible, params.afp_cap(), params.sis_rate)
}

/// Occupational accident mutual insurance, employer paid.
pub fn mutual_insurance(imponible: f64, params: &GlobalParameters) -> i64 {
    percent_of_capped(imponible, params.afp_cap(), params.mutual_base_rate)
}
