use miette::{Diagnostic, SourceSpan};
use thiserror::Error;
use tracing::trace;

use crate::{
    math::lexer::Lexeme,
    types::{BIND_RIGHT_BP, Fun, OP_UNARY_BP, Op, Token, UnaryOp},
};

/// Deepest nesting of groups, calls and signs the parser will follow.
pub const MAX_DEPTH: usize = 256;

/// Tallest tree the parser builds. Flat chains like `1+1+...` or `5!!!...`
/// need no nesting in the input but still grow the tree one level per
/// operator, and evaluation recurses once per level.
pub const MAX_HEIGHT: usize = 1024;

#[derive(Debug, Diagnostic, Error, PartialEq)]
#[error("Unexpected token '{found}'")]
pub struct UnexpectedTokenError {
    found: String,

    #[label("{message}")]
    token: SourceSpan,

    message: String,
}

#[derive(Debug, Diagnostic, Error, PartialEq)]
pub enum Error {
    #[error("{0}")]
    #[diagnostic(transparent)]
    UnexpectedToken(Box<UnexpectedTokenError>),

    #[error("Unexpected end of input")]
    UnexpectedEnd {
        #[label("{expected}")]
        at: SourceSpan,
        expected: String,
    },

    #[error("Expression is nested deeper than {limit} levels")]
    TooDeep {
        limit: usize,
        #[label("here")]
        at: SourceSpan,
    },
}

#[derive(PartialEq, Debug)]
pub enum Exp {
    Val(f64),
    Fun(Fun, Box<Exp>),
    Op(Op, Box<Exp>, Box<Exp>),
    Unary(UnaryOp, Box<Exp>),
}

/// Subtree under construction, with its height.
struct Node {
    exp: Exp,
    height: usize,
}

impl Node {
    fn leaf(v: f64) -> Node {
        Node {
            exp: Exp::Val(v),
            height: 1,
        }
    }

    fn unary(op: UnaryOp, operand: Node) -> Node {
        Node {
            exp: Exp::Unary(op, Box::new(operand.exp)),
            height: operand.height + 1,
        }
    }

    fn fun(fun: Fun, arg: Node) -> Node {
        Node {
            exp: Exp::Fun(fun, Box::new(arg.exp)),
            height: arg.height + 1,
        }
    }

    fn op(op: Op, lhs: Node, rhs: Node) -> Node {
        Node {
            height: lhs.height.max(rhs.height) + 1,
            exp: Exp::Op(op, Box::new(lhs.exp), Box::new(rhs.exp)),
        }
    }
}

struct Parser {
    tokens: Vec<Lexeme>,
    index: usize,
    depth: usize,
    /// Length of the source, where "unexpected end" is reported.
    end: usize,
}

impl Parser {
    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index)?.token;
        self.index += 1;
        Some(token)
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.index).map(|lexeme| lexeme.token)
    }

    /// Consumes the next token, which must be present.
    fn expect_next(&mut self, expected: &str) -> Result<Token, Error> {
        self.next().ok_or_else(|| Error::UnexpectedEnd {
            at: (self.end, 0).into(),
            expected: expected.to_string(),
        })
    }

    fn unexpected_token_error(&self, message: &str) -> Error {
        // Use index - 1 because next() has already consumed the token
        let lexeme = &self.tokens[self.index.saturating_sub(1)];

        Error::UnexpectedToken(Box::new(UnexpectedTokenError {
            found: lexeme.text.clone(),
            token: lexeme.span(),
            message: message.to_string(),
        }))
    }

    /// Whether the token after the next one starts an operand.
    fn operand_follows(&self) -> bool {
        matches!(
            self.tokens.get(self.index + 1).map(|lexeme| lexeme.token),
            Some(Token::Val(_) | Token::Const(_) | Token::Fun(_) | Token::ParOpen)
        )
    }

    fn too_deep(&self, limit: usize) -> Error {
        let offset = self
            .tokens
            .get(self.index)
            .map_or(self.end, |lexeme| lexeme.offset);
        Error::TooDeep {
            limit,
            at: (offset, 0).into(),
        }
    }

    fn descend(&mut self) -> Result<(), Error> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.too_deep(MAX_DEPTH));
        }
        Ok(())
    }

    fn check_height(&self, node: Node) -> Result<Node, Error> {
        if node.height > MAX_HEIGHT {
            return Err(self.too_deep(MAX_HEIGHT));
        }
        Ok(node)
    }

    fn ascend(&mut self) {
        self.depth -= 1;
    }
}

#[derive(PartialEq, Debug)]
pub struct Ast {
    root: Exp,
}

impl Ast {
    /// Builds the tree for a whole token stream. `source_len` is the length of
    /// the text the tokens were read from.
    pub fn parse(tokens: Vec<Lexeme>, source_len: usize) -> Result<Ast, Error> {
        let mut parser = Parser {
            tokens,
            index: 0,
            depth: 0,
            end: source_len,
        };
        let root = parse_recurse(&mut parser, BIND_RIGHT_BP)?.exp;

        // Only a stray closing paren can stop the top level early
        if parser.next().is_some() {
            return Err(parser.unexpected_token_error("No matching opening paren"));
        }

        trace!(?root, "parsed");
        Ok(Ast { root })
    }

    pub fn ast(&self) -> &Exp {
        &self.root
    }
}

fn parse_atom(parser: &mut Parser) -> Result<Node, Error> {
    let node = match parser.expect_next("Expected a number, function or '('")? {
        Token::Val(v) => Node::leaf(v),
        Token::Const(c) => Node::leaf(c.value()),
        Token::Op(Op::Sub) => Node::unary(UnaryOp::Neg, parse_signed(parser)?),
        Token::Op(Op::Add) => Node::unary(UnaryOp::Plus, parse_signed(parser)?),
        Token::Op(op) => {
            return Err(parser.unexpected_token_error(&format!("Unexpected operator {:?}", op)));
        }
        Token::ParOpen => {
            let node = parse_group(parser)?;
            if parser.expect_next("Expected closing paren")? != Token::ParClose {
                return Err(parser.unexpected_token_error("Expected closing paren"));
            }
            node
        }
        Token::ParClose => {
            return Err(parser.unexpected_token_error("Unexpected closing paren"));
        }
        Token::Fun(fun) => {
            if parser.expect_next("Expected '(' after function")? != Token::ParOpen {
                return Err(parser
                    .unexpected_token_error("Function arguments must be enclosed in parentheses"));
            }
            let arg = parse_group(parser)?;
            if parser.expect_next("Expected closing paren for function")? != Token::ParClose {
                return Err(parser.unexpected_token_error("Expected closing paren for function"));
            }
            Node::fun(fun, arg)
        }
        Token::Factorial | Token::Percent | Token::Exp10 => {
            return Err(parser.unexpected_token_error("Postfix operator without an operand"));
        }
    };
    parser.check_height(node)
}

/// Operand of a prefix sign: `-x^2` negates the power, `--5` nests.
fn parse_signed(parser: &mut Parser) -> Result<Node, Error> {
    parser.descend()?;
    let node = parse_recurse(parser, OP_UNARY_BP);
    parser.ascend();
    node
}

/// Inside of a paren pair, which must not be empty.
fn parse_group(parser: &mut Parser) -> Result<Node, Error> {
    if parser.peek() == Some(Token::ParClose) {
        parser.next();
        return Err(parser.unexpected_token_error("Empty parentheses"));
    }
    parser.descend()?;
    let node = parse_recurse(parser, BIND_RIGHT_BP);
    parser.ascend();
    node
}

/// Exponent after the `×10^` marker: an atom with optional leading signs.
fn parse_exponent(parser: &mut Parser) -> Result<Node, Error> {
    match parser.peek() {
        Some(Token::Op(Op::Sub)) => {
            parser.next();
            parser.descend()?;
            let node = parse_exponent(parser);
            parser.ascend();
            parser.check_height(Node::unary(UnaryOp::Neg, node?))
        }
        Some(Token::Op(Op::Add)) => {
            parser.next();
            parser.descend()?;
            let node = parse_exponent(parser);
            parser.ascend();
            node
        }
        _ => parse_atom(parser),
    }
}

fn parse_recurse(parser: &mut Parser, min_bp: u8) -> Result<Node, Error> {
    let mut lhs = parse_atom(parser)?;

    loop {
        let Some(t) = parser.peek() else {
            break;
        };

        let op = match t {
            Token::Factorial => {
                parser.next();
                lhs = parser.check_height(Node::unary(UnaryOp::Factorial, lhs))?;
                continue;
            }
            // `a % b` is the remainder, a trailing `%` is a percentage
            Token::Percent if parser.operand_follows() => Op::Mod,
            Token::Percent => {
                parser.next();
                lhs = parser.check_height(Node::unary(UnaryOp::Percent, lhs))?;
                continue;
            }
            Token::Exp10 => {
                parser.next();
                let exponent = parse_exponent(parser)?;
                let scale = Node::op(Op::Pow, Node::leaf(10.0), exponent);
                lhs = parser.check_height(Node::op(Op::Mul, lhs, scale))?;
                continue;
            }
            // End of parentheses - opener will check and consume closer
            Token::ParClose => break,
            // Two operands in a row would need an implied multiplication
            Token::Val(_) | Token::Const(_) | Token::Fun(_) | Token::ParOpen => {
                parser.next();
                return Err(parser.unexpected_token_error("Expected an operator"));
            }
            Token::Op(op) => op,
        };

        let bp = op.bp();
        if bp <= min_bp {
            break;
        }

        parser.next();
        // Power is special with right associativity => x^y^z = x^(y^z)
        let bp = if op == Op::Pow { bp - 1 } else { bp };
        parser.descend()?;
        let rhs = parse_recurse(parser, bp);
        parser.ascend();
        lhs = parser.check_height(Node::op(op, lhs, rhs?))?;
    }
    Ok(lhs)
}
