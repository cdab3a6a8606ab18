//! Remuneraciones Engine library crate.
//!
//! This crate exposes the Chilean payroll calculation engine as
//! reusable modules.  External applications may depend on the
//! `remuneraciones_engine` crate and call `engine::compute_payslip` for
//! a single worker, `engine::run_payroll` for a whole period, and
//! `previred::write_previred_csv` to export the results.

pub mod config;
pub mod contributions;
pub mod engine;
pub mod error;
pub mod models;
pub mod params;
pub mod previred;
pub mod rut;
pub mod tax;
pub mod telemetry;
pub mod validation;

pub use engine::{compute_payslip, compute_payslip_with, run_payroll};
pub use error::{ExportError, InvalidInputError, ParametersError, PayrollError};
pub use models::{
    ContractType, HealthPlan, PayrollRunInput, PayrollRunResult, PayslipRequest, PayslipResult,
    PeriodAdjustments, WorkerInput,
};
pub use params::{GlobalParameters, ParameterOverrides};
