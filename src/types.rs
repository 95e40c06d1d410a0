#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl Op {
    pub fn bp(&self) -> u8 {
        match self {
            Op::Add | Op::Sub => 1,
            Op::Mul | Op::Div | Op::Mod => 2,
            Op::Pow => 4,
        }
    }
}

pub const OP_UNARY_BP: u8 = 3; // Prefix signs bind looser than power: -2^2 = -(2^2)
pub const BIND_RIGHT_BP: u8 = 0; // Used for always bind right constructs like functions and parantheses

#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub enum UnaryOp {
    Neg,
    Plus,
    Factorial,
    Percent,
}

#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub enum Token {
    Val(f64),
    Op(Op),
    ParOpen,
    ParClose,
    Fun(Fun),
    Const(Const),
    Factorial,
    Percent,
    /// Scientific exponent entry, the calculator's `×10^` key.
    Exp10,
}

#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub enum Fun {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Ln,
    Log10,
    Sqrt,
    Cbrt,
    Exp,
    Abs,
}

impl Fun {
    /// Looks up a function by its (lower case) identifier.
    pub fn from_name(name: &str) -> Option<Fun> {
        Some(match name {
            "sin" => Fun::Sin,
            "cos" => Fun::Cos,
            "tan" => Fun::Tan,
            "asin" => Fun::Asin,
            "acos" => Fun::Acos,
            "atan" => Fun::Atan,
            "sinh" => Fun::Sinh,
            "cosh" => Fun::Cosh,
            "tanh" => Fun::Tanh,
            "ln" => Fun::Ln,
            "log" | "log10" => Fun::Log10,
            "sqrt" => Fun::Sqrt,
            "cbrt" => Fun::Cbrt,
            "exp" => Fun::Exp,
            "abs" => Fun::Abs,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Fun::Sin => "sin",
            Fun::Cos => "cos",
            Fun::Tan => "tan",
            Fun::Asin => "asin",
            Fun::Acos => "acos",
            Fun::Atan => "atan",
            Fun::Sinh => "sinh",
            Fun::Cosh => "cosh",
            Fun::Tanh => "tanh",
            Fun::Ln => "ln",
            Fun::Log10 => "log10",
            Fun::Sqrt => "sqrt",
            Fun::Cbrt => "cbrt",
            Fun::Exp => "exp",
            Fun::Abs => "abs",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub enum Const {
    Pi,
    E,
}

impl Const {
    pub fn value(&self) -> f64 {
        match self {
            Const::Pi => std::f64::consts::PI,
            Const::E => std::f64::consts::E,
        }
    }
}

/// Unit in which trigonometric functions take (and inverse ones return) angles.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum AngleMode {
    #[value(name = "deg", alias = "degrees")]
    Degrees,
    #[default]
    #[value(name = "rad", alias = "radians")]
    Radians,
}
