use clap::Parser;
use simcalc::AngleMode;

/// Evaluate calculator display expressions.
///
/// Reads one expression per line from stdin when no expression is given.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Expression to evaluate, e.g. "2×10^3 + sin(30)"
    pub input: Option<String>,

    /// Unit for trigonometric function arguments
    #[arg(short, long, value_enum, default_value_t = AngleMode::Radians)]
    pub angle: AngleMode,

    /// Print why an expression evaluated to "Error" on stderr
    #[arg(short, long)]
    pub explain: bool,
}
