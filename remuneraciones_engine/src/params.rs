//! Economic and legal parameters used by the payroll calculation.
//!
//! Chilean payroll depends on a handful of slowly changing values: the
//! minimum wage, the UF and UTM reference values, the imponible caps
//! expressed in UF, the AFP commission table and the employer insurance
//! rates.  Callers may supply any subset of these through
//! [`ParameterOverrides`]; whatever is missing is filled from the
//! versioned default constants defined here.  Resolution never fails.
//!
//! Parameter overrides are usually kept as JSON files, one per period,
//! and loaded with [`load_parameter_file`].

use crate::error::ParametersError;
use crate::validation::validate_overrides;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Label of the default parameter table below.
pub const PARAMETERS_VERSION: &str = "2026";

/// Monthly minimum wage (ingreso mínimo mensual), CLP.
pub const SUELDO_MINIMO: f64 = 539_000.0;

/// Reference UF value, CLP.
pub const UF_VALUE: f64 = 39_731.0;

/// Reference UTM value, CLP.
pub const UTM_VALUE: f64 = 68_000.0;

/// Imponible cap for pension and health contributions, in UF.
pub const TOPE_IMPONIBLE_AFP_UF: f64 = 87.8;

/// Imponible cap for unemployment insurance, in UF.
pub const TOPE_IMPONIBLE_AFC_UF: f64 = 131.9;

/// Disability and survivorship insurance rate (employer), percent.
pub const SIS_RATE: f64 = 1.88;

/// Base rate for the occupational accident mutual (Ley 16.744), percent.
pub const MUTUAL_BASE_RATE: f64 = 0.93;

/// Withholding applied to boletas de honorarios, percent.
pub const RETENCION_HONORARIOS_RATE: f64 = 13.75;

/// Administrator used when the requested AFP is not in the rate table.
pub const DEFAULT_AFP: &str = "Habitat";

/// Total employee contribution per AFP (10% mandatory savings plus the
/// administrator commission), percent.
pub const AFP_RATES: [(&str, f64); 7] = [
    ("Capital", 11.44),
    ("Cuprum", 11.44),
    ("Habitat", 11.27),
    ("Modelo", 10.58),
    ("PlanVital", 11.16),
    ("ProVida", 11.45),
    ("Uno", 10.46),
];

/// Habitat's rate from [`AFP_RATES`], used when a caller-supplied table
/// has neither the requested administrator nor Habitat.
const DEFAULT_AFP_RATE: f64 = 11.27;

/// Fully resolved parameters.  Every field holds a usable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalParameters {
    pub sueldo_minimo: f64,
    pub uf_value: f64,
    pub utm_value: f64,
    /// Pension and health cap, in UF.
    #[serde(rename = "topeImponibleAFP")]
    pub tope_imponible_afp: f64,
    /// Unemployment insurance cap, in UF.
    #[serde(rename = "topeImponibleAFC")]
    pub tope_imponible_afc: f64,
    /// AFP name to total contribution percentage.
    pub afp_rates: BTreeMap<String, f64>,
    pub sis_rate: f64,
    pub mutual_base_rate: f64,
    pub tasa_retencion_honorarios: f64,
}

/// Result of looking up an administrator in the AFP table.
#[derive(Debug, Clone, PartialEq)]
pub struct AfpRate {
    /// Name of the administrator whose rate was applied.
    pub name: String,
    /// Contribution percentage.
    pub rate: f64,
    /// True when the requested name was not found and the default
    /// administrator was used instead.
    pub fallback: bool,
}

impl GlobalParameters {
    /// The default parameter table.
    pub fn with_defaults() -> Self {
        Self {
            sueldo_minimo: SUELDO_MINIMO,
            uf_value: UF_VALUE,
            utm_value: UTM_VALUE,
            tope_imponible_afp: TOPE_IMPONIBLE_AFP_UF,
            tope_imponible_afc: TOPE_IMPONIBLE_AFC_UF,
            afp_rates: default_afp_rates(),
            sis_rate: SIS_RATE,
            mutual_base_rate: MUTUAL_BASE_RATE,
            tasa_retencion_honorarios: RETENCION_HONORARIOS_RATE,
        }
    }

    /// Pension and health cap converted to CLP at the current UF.
    pub fn afp_cap(&self) -> f64 {
        self.tope_imponible_afp * self.uf_value
    }

    /// Unemployment insurance cap converted to CLP at the current UF.
    pub fn afc_cap(&self) -> f64 {
        self.tope_imponible_afc * self.uf_value
    }

    /// Looks up `name` case-insensitively, falling back to Habitat.
    pub fn afp_rate(&self, name: &str) -> AfpRate {
        let requested = name.trim();
        if let Some((found, rate)) = self
            .afp_rates
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(requested))
        {
            return AfpRate {
                name: found.clone(),
                rate: *rate,
                fallback: false,
            };
        }

        let rate = self
            .afp_rates
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(DEFAULT_AFP))
            .map(|(_, rate)| *rate)
            .unwrap_or(DEFAULT_AFP_RATE);
        tracing::warn!(
            requested = %requested,
            applied = DEFAULT_AFP,
            "unknown AFP, applying default administrator"
        );
        AfpRate {
            name: DEFAULT_AFP.to_string(),
            rate,
            fallback: true,
        }
    }
}

impl Default for GlobalParameters {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn default_afp_rates() -> BTreeMap<String, f64> {
    AFP_RATES
        .iter()
        .map(|(name, rate)| (name.to_string(), *rate))
        .collect()
}

/// Caller-supplied parameters.  Any field left as `None` is resolved to
/// its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParameterOverrides {
    /// Free-form label for the parameter set, e.g. `"2026-03"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sueldo_minimo: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uf_value: Option<f64>,
    /// Operator-entered UF; wins over `uf_value` when both are present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_uf_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_value: Option<f64>,
    /// Operator-entered UTM; wins over `utm_value` when both are present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_utm_value: Option<f64>,
    #[serde(rename = "topeImponibleAFP", skip_serializing_if = "Option::is_none")]
    pub tope_imponible_afp: Option<f64>,
    #[serde(rename = "topeImponibleAFC", skip_serializing_if = "Option::is_none")]
    pub tope_imponible_afc: Option<f64>,
    /// Replaces the whole default AFP table when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub afp_rates: Option<BTreeMap<String, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sis_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mutual_base_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasa_retencion_honorarios: Option<f64>,
}

impl ParameterOverrides {
    /// Merges these overrides over the default table.
    pub fn resolve(&self) -> GlobalParameters {
        GlobalParameters {
            sueldo_minimo: self.sueldo_minimo.unwrap_or(SUELDO_MINIMO),
            uf_value: self.manual_uf_value.or(self.uf_value).unwrap_or(UF_VALUE),
            utm_value: self
                .manual_utm_value
                .or(self.utm_value)
                .unwrap_or(UTM_VALUE),
            tope_imponible_afp: self.tope_imponible_afp.unwrap_or(TOPE_IMPONIBLE_AFP_UF),
            tope_imponible_afc: self.tope_imponible_afc.unwrap_or(TOPE_IMPONIBLE_AFC_UF),
            afp_rates: self.afp_rates.clone().unwrap_or_else(default_afp_rates),
            sis_rate: self.sis_rate.unwrap_or(SIS_RATE),
            mutual_base_rate: self.mutual_base_rate.unwrap_or(MUTUAL_BASE_RATE),
            tasa_retencion_honorarios: self
                .tasa_retencion_honorarios
                .unwrap_or(RETENCION_HONORARIOS_RATE),
        }
    }
}

/// Reads a JSON parameter file.
///
/// The file holds a [`ParameterOverrides`] object; absent keys keep
/// their defaults.  Values are validated before being returned, so a
/// negative UF or a NaN rate never reaches the calculators.
pub fn load_parameter_file(path: &Path) -> Result<ParameterOverrides, ParametersError> {
    let shown = path.display().to_string();
    let data = std::fs::read_to_string(path).map_err(|source| ParametersError::Io {
        path: shown.clone(),
        source,
    })?;
    let overrides: ParameterOverrides =
        serde_json::from_str(&data).map_err(|source| ParametersError::Parse {
            path: shown.clone(),
            source,
        })?;
    validate_overrides(&overrides).map_err(|source| ParametersError::Invalid {
        path: shown.clone(),
        source,
    })?;
    tracing::info!(
        path = %shown,
        version = overrides.version.as_deref().unwrap_or("unversioned"),
        "loaded payroll parameters"
    );
    Ok(overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_overrides_resolve_to_defaults() {
        let resolved = ParameterOverrides::default().resolve();
        assert_eq!(resolved, GlobalParameters::with_defaults());
        assert_eq!(resolved.afp_rates.len(), 7);
    }

    #[test]
    fn supplied_fields_are_used_verbatim() {
        let overrides = ParameterOverrides {
            sueldo_minimo: Some(500_000.0),
            sis_rate: Some(1.5),
            ..Default::default()
        };
        let resolved = overrides.resolve();
        assert_eq!(resolved.sueldo_minimo, 500_000.0);
        assert_eq!(resolved.sis_rate, 1.5);
        assert_eq!(resolved.uf_value, UF_VALUE);
    }

    #[test]
    fn manual_values_take_precedence() {
        let overrides = ParameterOverrides {
            uf_value: Some(38_000.0),
            manual_uf_value: Some(39_000.0),
            manual_utm_value: Some(66_000.0),
            ..Default::default()
        };
        let resolved = overrides.resolve();
        assert_eq!(resolved.uf_value, 39_000.0);
        assert_eq!(resolved.utm_value, 66_000.0);
    }

    #[test]
    fn resolution_is_idempotent() {
        let overrides = ParameterOverrides {
            uf_value: Some(40_000.0),
            ..Default::default()
        };
        assert_eq!(overrides.resolve(), overrides.resolve());
    }

    #[test]
    fn afp_lookup_ignores_case() {
        let params = GlobalParameters::with_defaults();
        let rate = params.afp_rate("  modelo ");
        assert_eq!(rate.name, "Modelo");
        assert_eq!(rate.rate, 10.58);
        assert!(!rate.fallback);
    }

    #[test]
    fn unknown_afp_falls_back_to_habitat() {
        let params = GlobalParameters::with_defaults();
        let rate = params.afp_rate("Santa Maria");
        assert_eq!(rate.name, DEFAULT_AFP);
        assert_eq!(rate.rate, 11.27);
        assert!(rate.fallback);
    }

    #[test]
    fn custom_table_without_habitat_uses_default_rate() {
        let mut table = BTreeMap::new();
        table.insert("Uno".to_string(), 10.0);
        let params = ParameterOverrides {
            afp_rates: Some(table),
            ..Default::default()
        }
        .resolve();
        assert_eq!(params.afp_rate("Uno").rate, 10.0);
        let fallback = params.afp_rate("Capital");
        assert!(fallback.fallback);
        assert_eq!(fallback.rate, DEFAULT_AFP_RATE);
    }

    #[test]
    fn caps_scale_with_uf() {
        let params = ParameterOverrides {
            uf_value: Some(40_000.0),
            ..Default::default()
        }
        .resolve();
        assert!((params.afp_cap() - 87.8 * 40_000.0).abs() < 1e-6);
        assert!((params.afc_cap() - 131.9 * 40_000.0).abs() < 1e-6);
    }

    #[test]
    fn loads_partial_parameter_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"version": "2026-03", "manualUfValue": 39800.5, "topeImponibleAFP": 90.0}}"#
        )
        .expect("write parameters");

        let overrides = load_parameter_file(file.path()).expect("parameters load");
        assert_eq!(overrides.version.as_deref(), Some("2026-03"));
        let resolved = overrides.resolve();
        assert_eq!(resolved.uf_value, 39_800.5);
        assert_eq!(resolved.tope_imponible_afp, 90.0);
        assert_eq!(resolved.utm_value, UTM_VALUE);
    }

    #[test]
    fn rejects_negative_values_in_parameter_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"ufValue": -1}}"#).expect("write parameters");
        let err = load_parameter_file(file.path()).expect_err("negative UF rejected");
        assert!(matches!(err, ParametersError::Invalid { .. }));
    }

    #[test]
    fn missing_parameter_file_reports_io_error() {
        let err = load_parameter_file(Path::new("/nonexistent/parametros.json"))
            .expect_err("missing file");
        assert!(matches!(err, ParametersError::Io { .. }));
    }
}
