//! Tree walking evaluation in `f64`.

use miette::Diagnostic;
use thiserror::Error;

use crate::{
    math::ast::{Ast, Exp},
    types::{AngleMode, Fun, Op, UnaryOp},
};

/// Largest `n` whose factorial is finite in `f64`.
const MAX_FACTORIAL: f64 = 170.0;

#[derive(Debug, Diagnostic, Error, PartialEq)]
pub enum EvalError {
    #[error("{name}({arg}) is undefined")]
    #[diagnostic(help("{hint}"))]
    Domain {
        name: &'static str,
        arg: f64,
        hint: &'static str,
    },
}

fn domain(name: &'static str, arg: f64, hint: &'static str) -> EvalError {
    EvalError::Domain { name, arg, hint }
}

impl Ast {
    /// Evaluates the tree. Division by zero and overflow are not errors
    /// here, they come out as infinities or NaN.
    pub fn eval(&self, angle: AngleMode) -> Result<f64, EvalError> {
        eval(self.ast(), angle)
    }
}

pub fn eval(exp: &Exp, angle: AngleMode) -> Result<f64, EvalError> {
    Ok(match exp {
        Exp::Val(v) => *v,
        Exp::Op(op, lhs, rhs) => {
            let lhs = eval(lhs, angle)?;
            let rhs = eval(rhs, angle)?;
            match op {
                Op::Add => lhs + rhs,
                Op::Sub => lhs - rhs,
                Op::Mul => lhs * rhs,
                Op::Div => lhs / rhs,
                Op::Mod => modulo(lhs, rhs),
                Op::Pow => lhs.powf(rhs),
            }
        }
        Exp::Unary(op, operand) => {
            let x = eval(operand, angle)?;
            match op {
                UnaryOp::Neg => -x,
                UnaryOp::Plus => x,
                UnaryOp::Percent => x / 100.0,
                UnaryOp::Factorial => factorial(x)?,
            }
        }
        Exp::Fun(fun, arg) => apply(*fun, eval(arg, angle)?, angle)?,
    })
}

/// Floored remainder, takes the sign of the divisor: `-10 % 3 = 2`.
/// A zero divisor leaves the dividend unchanged.
fn modulo(lhs: f64, rhs: f64) -> f64 {
    if rhs == 0.0 {
        return lhs;
    }
    lhs - rhs * (lhs / rhs).floor()
}

fn factorial(n: f64) -> Result<f64, EvalError> {
    if n < 0.0 || n.fract() != 0.0 || n.is_nan() {
        return Err(domain("factorial", n, "factorial needs a non-negative integer"));
    }
    if n > MAX_FACTORIAL {
        return Ok(f64::INFINITY);
    }
    Ok((2..=n as u32).fold(1.0, |acc, k| acc * f64::from(k)))
}

fn apply(fun: Fun, x: f64, angle: AngleMode) -> Result<f64, EvalError> {
    let to_radians = |x: f64| match angle {
        AngleMode::Degrees => x.to_radians(),
        AngleMode::Radians => x,
    };
    let from_radians = |x: f64| match angle {
        AngleMode::Degrees => x.to_degrees(),
        AngleMode::Radians => x,
    };

    Ok(match fun {
        Fun::Sin => to_radians(x).sin(),
        Fun::Cos => to_radians(x).cos(),
        Fun::Tan => to_radians(x).tan(),
        Fun::Asin | Fun::Acos if !(-1.0..=1.0).contains(&x) => {
            return Err(domain(fun.name(), x, "argument must lie in [-1, 1]"));
        }
        Fun::Asin => from_radians(x.asin()),
        Fun::Acos => from_radians(x.acos()),
        Fun::Atan => from_radians(x.atan()),
        Fun::Sinh => x.sinh(),
        Fun::Cosh => x.cosh(),
        Fun::Tanh => x.tanh(),
        Fun::Ln | Fun::Log10 if x <= 0.0 => {
            return Err(domain(fun.name(), x, "logarithms need a positive argument"));
        }
        Fun::Ln => x.ln(),
        Fun::Log10 => x.log10(),
        Fun::Sqrt if x < 0.0 => {
            return Err(domain(fun.name(), x, "no real square root of a negative number"));
        }
        Fun::Sqrt => x.sqrt(),
        Fun::Cbrt => x.cbrt(),
        Fun::Exp => x.exp(),
        Fun::Abs => x.abs(),
    })
}
