//! Boundary validation for payslip input.
//!
//! Every number that enters the engine passes through here first.  A
//! NaN or a negative salary is rejected with an [`InvalidInputError`]
//! naming the field, so nothing downstream has to guard against
//! garbage propagating through the arithmetic.

use crate::error::InvalidInputError;
use crate::models::{HealthPlan, PeriodAdjustments, WorkerInput};
use crate::params::ParameterOverrides;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, InvalidInputError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Largest peso amount accepted anywhere in the input.
///
/// Far above any real monthly payroll, and small enough that every sum
/// and product the engine forms stays inside `i64`.
pub const MAX_AMOUNT: f64 = 1.0e12;

/// Largest quantity accepted for a UF-denominated field (Isapre plans
/// and the taxable caps).
pub const MAX_UF: f64 = 1.0e6;

/// Largest percentage accepted for a rate.
pub const MAX_RATE: f64 = 100.0;

fn validate_bounded(field: &'static str, value: f64, max: f64) -> ValidationResult<f64> {
    if !value.is_finite() {
        return Err(InvalidInputError::NonFinite { field });
    }
    if value < 0.0 {
        return Err(InvalidInputError::Negative { field, value });
    }
    if value > max {
        return Err(InvalidInputError::TooLarge { field, value, max });
    }
    Ok(value)
}

/// Validates a peso amount or a day count.
///
/// ## Rules
/// - Must be finite (no NaN, no infinity)
/// - Must be zero or positive
/// - Must not exceed [`MAX_AMOUNT`]
pub fn validate_amount(field: &'static str, value: f64) -> ValidationResult<f64> {
    validate_bounded(field, value, MAX_AMOUNT)
}

/// Validates a quantity expressed in UF, bounded by [`MAX_UF`].
pub fn validate_uf(field: &'static str, value: f64) -> ValidationResult<f64> {
    validate_bounded(field, value, MAX_UF)
}

/// Validates a percentage, bounded by [`MAX_RATE`].
pub fn validate_rate(field: &'static str, value: f64) -> ValidationResult<f64> {
    validate_bounded(field, value, MAX_RATE)
}

fn validate_optional(
    field: &'static str,
    value: Option<f64>,
    validate: fn(&'static str, f64) -> ValidationResult<f64>,
) -> ValidationResult<()> {
    if let Some(value) = value {
        validate(field, value)?;
    }
    Ok(())
}

// =============================================================================
// Input Validators
// =============================================================================

/// Validates the worker's contractual data.
pub fn validate_worker(worker: &WorkerInput) -> ValidationResult<()> {
    validate_amount("baseSalary", worker.base_salary)?;
    if let HealthPlan::Isapre { uf_amount } = worker.health {
        validate_uf("health.ufAmount", uf_amount)?;
    }
    Ok(())
}

/// Validates the manual period adjustments.
pub fn validate_adjustments(adjustments: &PeriodAdjustments) -> ValidationResult<()> {
    validate_amount("bonosImponibles", adjustments.bonos_imponibles)?;
    validate_amount("bonosNoImponibles", adjustments.bonos_no_imponibles)?;
    validate_amount("descuentosVarios", adjustments.descuentos_varios)?;
    validate_amount("diasVacaciones", adjustments.dias_vacaciones)?;
    Ok(())
}

/// Validates caller-supplied parameter overrides.  Absent fields are
/// not checked; they resolve to defaults.
pub fn validate_overrides(overrides: &ParameterOverrides) -> ValidationResult<()> {
    validate_optional("sueldoMinimo", overrides.sueldo_minimo, validate_amount)?;
    validate_optional("ufValue", overrides.uf_value, validate_amount)?;
    validate_optional("manualUfValue", overrides.manual_uf_value, validate_amount)?;
    validate_optional("utmValue", overrides.utm_value, validate_amount)?;
    validate_optional("manualUtmValue", overrides.manual_utm_value, validate_amount)?;
    validate_optional("topeImponibleAFP", overrides.tope_imponible_afp, validate_uf)?;
    validate_optional("topeImponibleAFC", overrides.tope_imponible_afc, validate_uf)?;
    validate_optional("sisRate", overrides.sis_rate, validate_rate)?;
    validate_optional("mutualBaseRate", overrides.mutual_base_rate, validate_rate)?;
    validate_optional(
        "tasaRetencionHonorarios",
        overrides.tasa_retencion_honorarios,
        validate_rate,
    )?;
    if let Some(rates) = &overrides.afp_rates {
        for rate in rates.values() {
            validate_rate("afpRates", *rate)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContractType;
    use std::collections::BTreeMap;

    fn worker(base_salary: f64) -> WorkerInput {
        WorkerInput {
            base_salary,
            afp_name: "Habitat".into(),
            health: HealthPlan::Fonasa,
            contract_type: ContractType::Indefinido,
        }
    }

    #[test]
    fn accepts_zero_and_positive_amounts() {
        assert_eq!(validate_amount("x", 0.0), Ok(0.0));
        assert_eq!(validate_amount("x", 800_000.0), Ok(800_000.0));
    }

    #[test]
    fn rejects_non_finite_salary() {
        assert_eq!(
            validate_worker(&worker(f64::NAN)),
            Err(InvalidInputError::NonFinite {
                field: "baseSalary"
            })
        );
        assert!(validate_worker(&worker(f64::INFINITY)).is_err());
    }

    #[test]
    fn rejects_negative_salary() {
        let err = validate_worker(&worker(-1.0)).unwrap_err();
        assert!(matches!(
            err,
            InvalidInputError::Negative {
                field: "baseSalary",
                ..
            }
        ));
    }

    #[test]
    fn rejects_negative_isapre_plan() {
        let mut input = worker(900_000.0);
        input.health = HealthPlan::Isapre { uf_amount: -3.0 };
        assert!(validate_worker(&input).is_err());
    }

    #[test]
    fn rejects_negative_discount() {
        let adjustments = PeriodAdjustments {
            descuentos_varios: -10.0,
            ..Default::default()
        };
        let err = validate_adjustments(&adjustments).unwrap_err();
        assert!(err.to_string().contains("descuentosVarios"));
    }

    #[test]
    fn rejects_nan_afp_rate_override() {
        let mut rates = BTreeMap::new();
        rates.insert("Habitat".to_string(), f64::NAN);
        let overrides = ParameterOverrides {
            afp_rates: Some(rates),
            ..Default::default()
        };
        assert!(validate_overrides(&overrides).is_err());
        assert!(validate_overrides(&ParameterOverrides::default()).is_ok());
    }

    #[test]
    fn rejects_amounts_beyond_the_supported_range() {
        let err = validate_worker(&worker(1.0e19)).unwrap_err();
        assert!(matches!(
            err,
            InvalidInputError::TooLarge {
                field: "baseSalary",
                ..
            }
        ));
        assert_eq!(validate_amount("x", MAX_AMOUNT), Ok(MAX_AMOUNT));

        let adjustments = PeriodAdjustments {
            bonos_no_imponibles: 9.0e18,
            ..Default::default()
        };
        let err = validate_adjustments(&adjustments).unwrap_err();
        assert!(err.to_string().contains("bonosNoImponibles"));
    }

    #[test]
    fn rejects_rates_above_one_hundred_percent() {
        let overrides = ParameterOverrides {
            tasa_retencion_honorarios: Some(1.0e15),
            ..Default::default()
        };
        assert!(validate_overrides(&overrides).is_err());
        assert_eq!(validate_rate("sisRate", 100.0), Ok(100.0));
    }

    #[test]
    fn rejects_oversized_isapre_plan() {
        let mut input = worker(900_000.0);
        input.health = HealthPlan::Isapre { uf_amount: 1.0e13 };
        assert!(validate_worker(&input).is_err());
    }
}
