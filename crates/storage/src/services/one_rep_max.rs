//! One-rep-max estimation.
//!
//! Brzycki: 1RM = weight / (1.0278 - 0.0278 × reps)
//! Epley:   1RM = weight × (1 + reps / 30)

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

const BRZYCKI_INTERCEPT: Decimal = Decimal::from_parts(10278, 0, 0, false, 4);
const BRZYCKI_SLOPE: Decimal = Decimal::from_parts(278, 0, 0, false, 4);
const EPLEY_DIVISOR: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OneRepMaxFormula {
    Brzycki,
    Epley,
}

impl OneRepMaxFormula {
    /// Formula used for every stored estimate unless configured otherwise.
    pub const DEFAULT: OneRepMaxFormula = OneRepMaxFormula::Brzycki;

    /// Estimated single-rep max, rounded to 2 decimal places.
    ///
    /// Falls back to the weight itself, still rounded, when `reps` is zero
    /// or the Brzycki denominator is not positive.
    pub fn estimate(self, weight: Decimal, reps: i32) -> Decimal {
        if reps == 0 {
            return round_estimate(weight);
        }

        let reps = Decimal::from(reps);
        let raw = match self {
            OneRepMaxFormula::Brzycki => {
                let denominator = BRZYCKI_INTERCEPT - BRZYCKI_SLOPE * reps;
                if denominator <= Decimal::ZERO {
                    return round_estimate(weight);
                }
                weight / denominator
            }
            OneRepMaxFormula::Epley => weight * (Decimal::ONE + reps / EPLEY_DIVISOR),
        };

        round_estimate(raw)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OneRepMaxFormula::Brzycki => "brzycki",
            OneRepMaxFormula::Epley => "epley",
        }
    }
}

impl Default for OneRepMaxFormula {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for OneRepMaxFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OneRepMaxFormula {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "brzycki" => Ok(OneRepMaxFormula::Brzycki),
            "epley" => Ok(OneRepMaxFormula::Epley),
            other => Err(format!(
                "Unknown 1RM formula '{}', expected 'brzycki' or 'epley'",
                other
            )),
        }
    }
}

/// Two decimal places, midpoint away from zero, trailing zeros dropped so
/// the stored text form is canonical.
pub fn round_estimate(value: Decimal) -> Decimal {
    value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

/// Estimate with the default formula.
pub fn estimate_one_rep_max(weight: Decimal, reps: i32) -> Decimal {
    OneRepMaxFormula::DEFAULT.estimate(weight, reps)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kg(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn test_brzycki_five_reps() {
        // 100 / (1.0278 - 0.139) = 100 / 0.8888
        assert_eq!(estimate_one_rep_max(kg("100"), 5), kg("112.51"));
    }

    #[test]
    fn test_brzycki_single_rep_is_the_weight() {
        assert_eq!(OneRepMaxFormula::Brzycki.estimate(kg("140"), 1), kg("140"));
    }

    #[test]
    fn test_epley_five_reps() {
        // 100 × (1 + 5/30) = 116.666…
        assert_eq!(OneRepMaxFormula::Epley.estimate(kg("100"), 5), kg("116.67"));
    }

    #[test]
    fn test_zero_reps_returns_weight() {
        assert_eq!(OneRepMaxFormula::Brzycki.estimate(kg("87.5"), 0), kg("87.5"));
        assert_eq!(OneRepMaxFormula::Epley.estimate(kg("87.5"), 0), kg("87.5"));
    }

    #[test]
    fn test_non_positive_denominator_returns_weight() {
        // 1.0278 - 0.0278 × 37 = 0
        assert_eq!(OneRepMaxFormula::Brzycki.estimate(kg("60"), 37), kg("60"));
        assert_eq!(OneRepMaxFormula::Brzycki.estimate(kg("60"), 40), kg("60"));
    }

    #[test]
    fn test_fallback_weight_is_rounded_too() {
        assert_eq!(OneRepMaxFormula::Brzycki.estimate(kg("87.555"), 0), kg("87.56"));
        assert_eq!(OneRepMaxFormula::Epley.estimate(kg("87.554"), 0), kg("87.55"));
        assert_eq!(OneRepMaxFormula::Brzycki.estimate(kg("60.125"), 40), kg("60.13"));
        assert_eq!(OneRepMaxFormula::Brzycki.estimate(kg("80.00"), 0).scale(), 0);
    }

    #[test]
    fn test_estimates_are_positive_and_stable() {
        for formula in [OneRepMaxFormula::Brzycki, OneRepMaxFormula::Epley] {
            for reps in 1..=30 {
                for weight in ["0.01", "2.5", "61.25", "100", "327.5"] {
                    let first = formula.estimate(kg(weight), reps);
                    assert!(first > Decimal::ZERO, "{formula} {weight}x{reps}");
                    assert!(first.scale() <= 2);
                    assert_eq!(first, formula.estimate(kg(weight), reps));
                    assert_eq!(first, round_estimate(first));
                }
            }
        }
    }

    #[test]
    fn test_estimate_grows_with_reps() {
        let weight = kg("100");
        let mut previous = Decimal::ZERO;
        for reps in 1..=30 {
            let estimate = OneRepMaxFormula::Brzycki.estimate(weight, reps);
            assert!(estimate > previous);
            previous = estimate;
        }
    }

    #[test]
    fn test_round_estimate_midpoint_goes_up() {
        assert_eq!(round_estimate(kg("112.505")), kg("112.51"));
        assert_eq!(round_estimate(kg("112.504")), kg("112.5"));
    }

    #[test]
    fn test_formula_parsing() {
        assert_eq!("Brzycki".parse::<OneRepMaxFormula>(), Ok(OneRepMaxFormula::Brzycki));
        assert_eq!(" epley ".parse::<OneRepMaxFormula>(), Ok(OneRepMaxFormula::Epley));
        assert!("lander".parse::<OneRepMaxFormula>().is_err());
    }
}
