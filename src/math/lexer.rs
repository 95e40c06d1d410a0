use miette::{Diagnostic, SourceSpan};
use tracing::trace;

use crate::{
    math::normalize::EXP10_MARKER,
    types::{Const, Fun, Op, Token},
};

pub struct Lexer;

/// A token together with the source text it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    pub token: Token,
    pub text: String,
    /// Byte offset into the normalized input.
    pub offset: usize,
}

impl Lexeme {
    pub fn span(&self) -> SourceSpan {
        (self.offset, self.text.len()).into()
    }
}

#[derive(thiserror::Error, Diagnostic, Debug, PartialEq)]
pub enum LexerError {
    #[error("Unexpected character '{found}'")]
    UnexpectedChar {
        found: char,
        #[label("not part of any expression")]
        span: SourceSpan,
    },

    #[error("Unknown identifier '{name}'")]
    UnknownIdentifier {
        name: String,
        #[label("not a function or constant")]
        span: SourceSpan,
    },

    #[error("Malformed number '{text}'")]
    MalformedNumber {
        text: String,
        #[label("{reason}")]
        span: SourceSpan,
        reason: String,
    },
}

type Chars<'a> = std::iter::Peekable<std::str::CharIndices<'a>>;

impl Lexer {
    pub fn tokenize(input: &str) -> Result<Vec<Lexeme>, LexerError> {
        let mut tokens = Vec::new();
        let mut chars = input.char_indices().peekable();

        while let Some(&(offset, c)) = chars.peek() {
            if c.is_whitespace() {
                chars.next();
                continue;
            }

            if c.is_ascii_digit() || c == '.' {
                tokens.push(parse_value(input, offset, &mut chars)?);
                continue;
            }

            if c.is_ascii_alphabetic() {
                tokens.push(parse_alphabetic(input, offset, &mut chars)?);
                continue;
            }

            let token = match c {
                '(' => Token::ParOpen,
                ')' => Token::ParClose,
                '!' => Token::Factorial,
                '%' => Token::Percent,
                '+' => Token::Op(Op::Add),
                '-' => Token::Op(Op::Sub),
                '*' => Token::Op(Op::Mul),
                '/' => Token::Op(Op::Div),
                '^' => Token::Op(Op::Pow),
                EXP10_MARKER => Token::Exp10,
                _ => {
                    return Err(LexerError::UnexpectedChar {
                        found: c,
                        span: (offset, c.len_utf8()).into(),
                    });
                }
            };
            chars.next();
            tokens.push(Lexeme {
                token,
                text: c.to_string(),
                offset,
            });
        }

        trace!(count = tokens.len(), "tokenized {input:?}");
        Ok(tokens)
    }
}

/// Reads a decimal literal, `12`, `.5`, `1.5e10`, `2E-3`. The exponent part is
/// only taken when digits follow, so `2e` leaves the `e` for the constant.
fn parse_value(input: &str, start: usize, chars: &mut Chars) -> Result<Lexeme, LexerError> {
    let bytes = input.as_bytes();
    let mut end = start;
    while bytes
        .get(end)
        .is_some_and(|b| b.is_ascii_digit() || *b == b'.')
    {
        end += 1;
    }

    if let Some(b'e' | b'E') = bytes.get(end) {
        let mut exponent = end + 1;
        if let Some(b'+' | b'-') = bytes.get(exponent) {
            exponent += 1;
        }
        if bytes.get(exponent).is_some_and(u8::is_ascii_digit) {
            end = exponent;
            while bytes.get(end).is_some_and(u8::is_ascii_digit) {
                end += 1;
            }
        }
    }

    while chars.next_if(|&(i, _)| i < end).is_some() {}

    let text = &input[start..end];
    match text.parse::<f64>() {
        Ok(value) => Ok(Lexeme {
            token: Token::Val(value),
            text: text.to_string(),
            offset: start,
        }),
        Err(e) => Err(LexerError::MalformedNumber {
            text: text.to_string(),
            span: (start, text.len()).into(),
            reason: e.to_string(),
        }),
    }
}

fn parse_alphabetic(input: &str, start: usize, chars: &mut Chars) -> Result<Lexeme, LexerError> {
    let mut end = start;
    while let Some((i, c)) = chars.next_if(|(_, c)| c.is_ascii_alphanumeric()) {
        end = i + c.len_utf8();
    }

    let text = &input[start..end];
    let name = text.to_ascii_lowercase();
    let token = match name.as_str() {
        "pi" => Token::Const(Const::Pi),
        "e" => Token::Const(Const::E),
        _ => match Fun::from_name(&name) {
            Some(fun) => Token::Fun(fun),
            None => {
                return Err(LexerError::UnknownIdentifier {
                    name: text.to_string(),
                    span: (start, text.len()).into(),
                });
            }
        },
    };

    Ok(Lexeme {
        token,
        text: text.to_string(),
        offset: start,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn tokenize(input: &str) -> Result<Vec<Token>, LexerError> {
        Lexer::tokenize(input).map(|lexemes| lexemes.into_iter().map(|l| l.token).collect())
    }

    fn value(input: &str) -> Result<Lexeme, LexerError> {
        parse_value(input, 0, &mut input.char_indices().peekable())
    }

    #[test]
    fn can_parse_value() {
        assert_eq!(value("2").map(|l| l.token), Ok(Token::Val(2.0)));
        assert_eq!(value("22").map(|l| l.token), Ok(Token::Val(22.0)));
        assert_eq!(value("22.56").map(|l| l.token), Ok(Token::Val(22.56)));
        assert_eq!(value(".5").map(|l| l.token), Ok(Token::Val(0.5)));
    }

    #[test]
    fn can_parse_exponent_notation() {
        assert_eq!(value("1.5e10").map(|l| l.token), Ok(Token::Val(1.5e10)));
        assert_eq!(value("2E-3").map(|l| l.token), Ok(Token::Val(2e-3)));
        assert_eq!(value("1e+21").map(|l| l.token), Ok(Token::Val(1e21)));
    }

    #[test]
    fn parse_value_only_consumes_the_value() {
        let input = "2*pi";
        let iter = &mut input.char_indices().peekable();
        let lexeme = parse_value(input, 0, iter).unwrap();
        assert_eq!(lexeme.token, Token::Val(2.0));
        assert_eq!(lexeme.text, "2");
        assert_eq!(iter.next(), Some((1, '*')));
        assert_eq!(iter.next(), Some((2, 'p')));
    }

    #[test]
    fn dangling_exponent_is_left_alone() {
        assert_eq!(
            tokenize("2e"),
            Ok(vec![Token::Val(2.0), Token::Const(Const::E)])
        );
        assert_eq!(
            tokenize("2e+"),
            Ok(vec![
                Token::Val(2.0),
                Token::Const(Const::E),
                Token::Op(Op::Add)
            ])
        );
    }

    #[test]
    fn malformed_number() {
        let err = tokenize("1.2.3").unwrap_err();
        assert!(matches!(err, LexerError::MalformedNumber { ref text, .. } if text == "1.2.3"));
        assert!(matches!(
            tokenize("."),
            Err(LexerError::MalformedNumber { .. })
        ));
    }

    #[test]
    fn lexing_basic() {
        assert_eq!(
            tokenize("1+1"),
            Ok(vec![Token::Val(1.0), Token::Op(Op::Add), Token::Val(1.0)])
        );
    }

    #[test]
    fn lexing_all_operators() {
        assert_eq!(
            tokenize("1+2-3*4/5^6!%"),
            Ok(vec![
                Token::Val(1.0),
                Token::Op(Op::Add),
                Token::Val(2.0),
                Token::Op(Op::Sub),
                Token::Val(3.0),
                Token::Op(Op::Mul),
                Token::Val(4.0),
                Token::Op(Op::Div),
                Token::Val(5.0),
                Token::Op(Op::Pow),
                Token::Val(6.0),
                Token::Factorial,
                Token::Percent,
            ])
        );
    }

    #[test]
    fn lexing_exponent_entry() {
        assert_eq!(
            tokenize("1.5ᴇ-3"),
            Ok(vec![
                Token::Val(1.5),
                Token::Exp10,
                Token::Op(Op::Sub),
                Token::Val(3.0),
            ])
        );
    }

    #[test]
    fn lexing_all_functions() {
        assert_eq!(
            tokenize("sin cos tan asin acos atan sinh cosh tanh ln log log10 sqrt cbrt exp abs"),
            Ok(vec![
                Token::Fun(Fun::Sin),
                Token::Fun(Fun::Cos),
                Token::Fun(Fun::Tan),
                Token::Fun(Fun::Asin),
                Token::Fun(Fun::Acos),
                Token::Fun(Fun::Atan),
                Token::Fun(Fun::Sinh),
                Token::Fun(Fun::Cosh),
                Token::Fun(Fun::Tanh),
                Token::Fun(Fun::Ln),
                Token::Fun(Fun::Log10),
                Token::Fun(Fun::Log10),
                Token::Fun(Fun::Sqrt),
                Token::Fun(Fun::Cbrt),
                Token::Fun(Fun::Exp),
                Token::Fun(Fun::Abs),
            ])
        );
    }

    #[test]
    fn identifiers_ignore_case() {
        assert_eq!(
            tokenize("SIN(PI)"),
            Ok(vec![
                Token::Fun(Fun::Sin),
                Token::ParOpen,
                Token::Const(Const::Pi),
                Token::ParClose,
            ])
        );
    }

    #[test]
    fn lexing_all_constants() {
        assert_eq!(
            tokenize("pi * e"),
            Ok(vec![
                Token::Const(Const::Pi),
                Token::Op(Op::Mul),
                Token::Const(Const::E),
            ])
        );
    }

    #[test]
    fn lexemes_keep_text_and_offset() {
        let lexemes = Lexer::tokenize(" 12.50 + sqrt").unwrap();
        assert_eq!(lexemes[0].text, "12.50");
        assert_eq!(lexemes[0].offset, 1);
        assert_eq!(lexemes[1].offset, 7);
        assert_eq!(lexemes[2].text, "sqrt");
        assert_eq!(lexemes[2].span(), SourceSpan::from((9, 4)));
    }

    #[test]
    fn unknown_identifier() {
        assert_eq!(
            tokenize("2+x"),
            Err(LexerError::UnknownIdentifier {
                name: "x".to_string(),
                span: (2, 1).into(),
            })
        );
    }

    #[test]
    fn stray_symbol() {
        assert_eq!(
            tokenize("2#3"),
            Err(LexerError::UnexpectedChar {
                found: '#',
                span: (1, 1).into(),
            })
        );
        assert!(matches!(
            tokenize("2≈3"),
            Err(LexerError::UnexpectedChar { found: '≈', .. })
        ));
    }

    #[test]
    fn lexing_complex() {
        assert_eq!(
            tokenize("e^(2+sqrt(4))-log(10^3)/2"),
            Ok(vec![
                Token::Const(Const::E),
                Token::Op(Op::Pow),
                Token::ParOpen,
                Token::Val(2.0),
                Token::Op(Op::Add),
                Token::Fun(Fun::Sqrt),
                Token::ParOpen,
                Token::Val(4.0),
                Token::ParClose,
                Token::ParClose,
                Token::Op(Op::Sub),
                Token::Fun(Fun::Log10),
                Token::ParOpen,
                Token::Val(10.0),
                Token::Op(Op::Pow),
                Token::Val(3.0),
                Token::ParClose,
                Token::Op(Op::Div),
                Token::Val(2.0),
            ])
        );
    }
}
