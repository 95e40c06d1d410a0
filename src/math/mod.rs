//! The evaluation pipeline behind the calculator display.
//!
//! normalize -> tokenize -> parse -> eval -> format. Every stage is a pure
//! function. [`try_display`] reports why a buffer failed, [`evaluate`] and
//! [`evaluate_with`] collapse every failure into the [`ERROR`] sentinel.

pub mod ast;
pub mod eval;
pub mod format;
pub mod lexer;
pub mod normalize;

use miette::Diagnostic;
use thiserror::Error;
use tracing::debug;

use crate::types::AngleMode;
use ast::Ast;
use eval::EvalError;
use lexer::{Lexer, LexerError};

/// What the display shows for any failed evaluation.
pub const ERROR: &str = "Error";

#[derive(Debug, Diagnostic, Error, PartialEq)]
pub enum CalcError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lexer(#[from] LexerError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] ast::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] EvalError),

    #[error("Result is not a finite number ({0})")]
    #[diagnostic(help("division by zero or an overflowing result"))]
    NotFinite(f64),
}

/// Parses a display buffer. Spans in the error point into
/// [`normalize`](normalize::normalize)d text.
pub fn parse(input: &str) -> Result<Ast, CalcError> {
    let normalized = normalize::normalize(input);
    let tokens = Lexer::tokenize(&normalized)?;
    Ok(Ast::parse(tokens, normalized.len())?)
}

/// Parses and evaluates a display buffer. Division by zero and overflow come
/// back as infinities or NaN, only [`try_display`] rejects them.
pub fn try_evaluate(input: &str, angle: AngleMode) -> Result<f64, CalcError> {
    Ok(parse(input)?.eval(angle)?)
}

/// Runs the whole pipeline, keeping the reason for a failure.
pub fn try_display(input: &str, angle: AngleMode) -> Result<String, CalcError> {
    format::format_number(try_evaluate(input, angle)?)
}

/// Evaluates a display buffer with trigonometry in radians.
pub fn evaluate(input: &str) -> String {
    evaluate_with(input, AngleMode::Radians)
}

/// Evaluates a display buffer, returning the display text of the result or
/// [`ERROR`].
pub fn evaluate_with(input: &str, angle: AngleMode) -> String {
    try_display(input, angle).unwrap_or_else(|e| {
        debug!(input, error = %e, "evaluation failed");
        ERROR.to_string()
    })
}
