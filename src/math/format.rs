//! Display formatting of results.
//!
//! Numbers print the way the calculator display has always shown them:
//! shortest round-trip digits, plain decimal between `1e-6` and `1e21`,
//! exponent notation (`1e+21`, `5e-7`) outside of it.

use crate::math::CalcError;

const EXPONENT_ABOVE: f64 = 1e21;
const EXPONENT_BELOW: f64 = 1e-6;

/// Formats a result for the display. NaN and infinities are failures.
pub fn format_number(value: f64) -> Result<String, CalcError> {
    if !value.is_finite() {
        return Err(CalcError::NotFinite(value));
    }
    if value == 0.0 {
        // Also covers -0
        return Ok("0".to_string());
    }

    let magnitude = value.abs();
    if (EXPONENT_BELOW..EXPONENT_ABOVE).contains(&magnitude) {
        return Ok(format!("{value}"));
    }

    let formatted = format!("{value:e}");
    Ok(match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn integers() {
        assert_eq!(format_number(14.0).as_deref(), Ok("14"));
        assert_eq!(format_number(-512.0).as_deref(), Ok("-512"));
        assert_eq!(format_number(1e20).as_deref(), Ok("100000000000000000000"));
    }

    #[test]
    fn decimals() {
        assert_eq!(format_number(0.5).as_deref(), Ok("0.5"));
        assert_eq!(format_number(0.1 + 0.2).as_deref(), Ok("0.30000000000000004"));
        assert_eq!(format_number(1.0 / 3.0).as_deref(), Ok("0.3333333333333333"));
        assert_eq!(format_number(0.000001).as_deref(), Ok("0.000001"));
    }

    #[test]
    fn zero() {
        assert_eq!(format_number(0.0).as_deref(), Ok("0"));
        assert_eq!(format_number(-0.0).as_deref(), Ok("0"));
    }

    #[test]
    fn exponent_notation() {
        assert_eq!(format_number(1e21).as_deref(), Ok("1e+21"));
        assert_eq!(format_number(-2.5e30).as_deref(), Ok("-2.5e+30"));
        assert_eq!(format_number(5e-7).as_deref(), Ok("5e-7"));
        assert_eq!(format_number(1.5e-10).as_deref(), Ok("1.5e-10"));
    }

    #[test]
    fn non_finite() {
        assert!(matches!(format_number(f64::NAN), Err(CalcError::NotFinite(v)) if v.is_nan()));
        assert_eq!(
            format_number(f64::INFINITY),
            Err(CalcError::NotFinite(f64::INFINITY))
        );
        assert_eq!(
            format_number(f64::NEG_INFINITY),
            Err(CalcError::NotFinite(f64::NEG_INFINITY))
        );
    }
}
