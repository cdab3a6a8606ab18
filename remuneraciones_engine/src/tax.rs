//! Impuesto único de segunda categoría.
//!
//! The monthly income tax on dependent work is read off an eight row
//! table expressed in UTM.  Each row carries a factor and an amount to
//! subtract (cantidad a rebajar), so the tax for a base inside a row is
//! `base * factor - rebaja`, matching the published SII tables to the
//! peso.  Marginal slices are never summed.

use crate::contributions::round_clp;
use crate::params::GlobalParameters;

/// One row of the tax table, in UTM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxBracket {
    /// Exclusive lower bound.
    pub from_utm: f64,
    /// Inclusive upper bound; infinite for the top row.
    pub to_utm: f64,
    pub factor: f64,
    /// Amount subtracted after applying the factor.
    pub rebaja_utm: f64,
}

const fn bracket(from_utm: f64, to_utm: f64, factor: f64, rebaja_utm: f64) -> TaxBracket {
    TaxBracket {
        from_utm,
        to_utm,
        factor,
        rebaja_utm,
    }
}

/// Monthly impuesto único table.
pub static TAX_BRACKETS: [TaxBracket; 8] = [
    bracket(0.0, 13.5, 0.0, 0.0),
    bracket(13.5, 30.0, 0.04, 0.54),
    bracket(30.0, 50.0, 0.08, 1.74),
    bracket(50.0, 70.0, 0.135, 4.49),
    bracket(70.0, 90.0, 0.23, 11.14),
    bracket(90.0, 120.0, 0.304, 17.80),
    bracket(120.0, 310.0, 0.35, 23.32),
    bracket(310.0, f64::INFINITY, 0.40, 38.82),
];

impl TaxBracket {
    fn contains(&self, base: f64, utm: f64) -> bool {
        base > self.from_utm * utm && base <= self.to_utm * utm
    }
}

/// Finds the row whose `(from, to]` range, scaled by `utm`, holds
/// `base`.
pub fn bracket_for(base: f64, utm: f64) -> Option<&'static TaxBracket> {
    TAX_BRACKETS.iter().find(|row| row.contains(base, utm))
}

/// Monthly income tax on `taxable_base`.
pub fn income_tax(taxable_base: f64, params: &GlobalParameters) -> i64 {
    if taxable_base <= 0.0 {
        return 0;
    }
    let utm = params.utm_value;
    match bracket_for(taxable_base, utm) {
        Some(row) if row.factor != 0.0 => {
            let tax = taxable_base * row.factor - row.rebaja_utm * utm;
            round_clp(tax.max(0.0))
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> GlobalParameters {
        GlobalParameters::with_defaults()
    }

    #[test]
    fn zero_and_negative_bases_pay_nothing() {
        assert_eq!(income_tax(0.0, &params()), 0);
        assert_eq!(income_tax(-5_000.0, &params()), 0);
    }

    #[test]
    fn exempt_bracket_pays_nothing() {
        // 13.5 UTM at 68000 = 918000
        assert_eq!(income_tax(811_300.0, &params()), 0);
        assert_eq!(income_tax(918_000.0, &params()), 0);
    }

    #[test]
    fn second_bracket_subtracts_rebaja() {
        // 1500000 * 0.04 - 0.54 * 68000 = 60000 - 36720
        assert_eq!(income_tax(1_500_000.0, &params()), 23_280);
    }

    #[test]
    fn upper_bound_is_inclusive() {
        // 30 UTM = 2040000 stays in the 4% row.
        let row = bracket_for(2_040_000.0, 68_000.0).expect("row");
        assert_eq!(row.factor, 0.04);
        assert_eq!(income_tax(2_040_000.0, &params()), 44_880);
        let next = bracket_for(2_040_001.0, 68_000.0).expect("row");
        assert_eq!(next.factor, 0.08);
    }

    #[test]
    fn top_bracket_is_open_ended() {
        let row = bracket_for(1.0e12, 68_000.0).expect("row");
        assert_eq!(row.factor, 0.40);
        // 30000000 * 0.4 - 38.82 * 68000
        assert_eq!(income_tax(30_000_000.0, &params()), 9_360_240);
    }

    #[test]
    fn brackets_are_contiguous_and_continuous() {
        for pair in TAX_BRACKETS.windows(2) {
            let (lower, upper) = (pair[0], pair[1]);
            assert_eq!(lower.to_utm, upper.from_utm);
            let at_edge_low = lower.to_utm * lower.factor - lower.rebaja_utm;
            let at_edge_high = upper.from_utm * upper.factor - upper.rebaja_utm;
            assert!((at_edge_low - at_edge_high).abs() < 1e-9);
        }
    }

    #[test]
    fn tax_scales_with_utm() {
        let params = GlobalParameters {
            utm_value: 70_000.0,
            ..GlobalParameters::with_defaults()
        };
        // 13.5 UTM at 70000 = 945000, still exempt.
        assert_eq!(income_tax(940_000.0, &params), 0);
    }
}
