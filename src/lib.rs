//! Expression evaluator for a calculator display.
//!
//! ```
//! assert_eq!(simcalc::evaluate("2+3×4"), "14");
//! assert_eq!(simcalc::evaluate("5÷0"), "Error");
//! ```

pub mod math;
pub mod types;

pub use math::{CalcError, ERROR, evaluate, evaluate_with, try_display, try_evaluate};
pub use types::AngleMode;
