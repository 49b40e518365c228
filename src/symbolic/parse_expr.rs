use crate::symbolic::symbolic_engine::Expr;
use log::debug;
use std::f64::consts::{E, PI};
use std::fmt;
/// a module turns a String expression into a symbolic expression
///# Example
/// ```
/// use RustedGraphTutor::symbolic::symbolic_engine::Expr;
/// let input = "(x)**2 - 3*sin(x)";
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// assert_eq!(parsed_expression.eval(0.0).unwrap(), 0.0);
/// ```
//                  recursive descent
//   expr    := term (('+' | '-') term)*
//   term    := unary (('*' | '/') unary)*
//   unary   := ('+' | '-') unary | power
//   power   := primary (('**' | '^') unary)?         right associative
//   primary := number | 'x' | 'pi' | 'e' | name '(' expr ')' | '(' expr ')'
//
// `-x**2` parses as `-(x**2)` and `2**-x` is legal, the same precedence Python gives these forms.

/// the free variable every exercise function is written in
pub const VARIABLE: &str = "x";

/// Error types for expression parsing
#[derive(Debug, Clone, PartialEq)]
pub enum ExprParseError {
    UnexpectedCharacter { position: usize, found: char },
    UnexpectedToken { position: usize, found: String, expected: &'static str },
    UnexpectedEnd { expected: &'static str },
    UnknownFunction { position: usize, name: String },
    UnknownVariable { position: usize, name: String },
    InvalidNumber { position: usize, text: String },
}

impl fmt::Display for ExprParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExprParseError::UnexpectedCharacter { position, found } => {
                write!(f, "Unexpected character '{}' at position {}", found, position)
            }
            ExprParseError::UnexpectedToken {
                position,
                found,
                expected,
            } => write!(
                f,
                "Unexpected '{}' at position {}, expected {}",
                found, position, expected
            ),
            ExprParseError::UnexpectedEnd { expected } => {
                write!(f, "Unexpected end of expression, expected {}", expected)
            }
            ExprParseError::UnknownFunction { position, name } => {
                write!(f, "Unknown function '{}' at position {}", name, position)
            }
            ExprParseError::UnknownVariable { position, name } => write!(
                f,
                "Unknown variable '{}' at position {}, only '{}' is allowed",
                name, position, VARIABLE
            ),
            ExprParseError::InvalidNumber { position, text } => {
                write!(f, "Invalid number '{}' at position {}", text, position)
            }
        }
    }
}

impl std::error::Error for ExprParseError {}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Power,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Ident(name) => write!(f, "{}", name),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Power => write!(f, "**"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<(usize, Token)>, ExprParseError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                i += 1;
            }
            '+' => {
                tokens.push((i, Token::Plus));
                i += 1;
            }
            '-' => {
                tokens.push((i, Token::Minus));
                i += 1;
            }
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    tokens.push((i, Token::Power));
                    i += 2;
                } else {
                    tokens.push((i, Token::Star));
                    i += 1;
                }
            }
            '^' => {
                tokens.push((i, Token::Power));
                i += 1;
            }
            '/' => {
                tokens.push((i, Token::Slash));
                i += 1;
            }
            '(' => {
                tokens.push((i, Token::LParen));
                i += 1;
            }
            ')' => {
                tokens.push((i, Token::RParen));
                i += 1;
            }
            _ if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // scientific notation only when the 'e' is really followed by an exponent,
                // otherwise "2*e" style input would be swallowed
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let next = chars.get(i + 1).copied();
                    let after_sign = chars.get(i + 2).copied();
                    let has_exponent = match next {
                        Some(d) if d.is_ascii_digit() => true,
                        Some('+') | Some('-') => after_sign.is_some_and(|d| d.is_ascii_digit()),
                        _ => false,
                    };
                    if has_exponent {
                        i += 2;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let text: String = chars[start..i].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| ExprParseError::InvalidNumber {
                        position: start,
                        text: text.clone(),
                    })?;
                tokens.push((start, Token::Number(value)));
            }
            _ if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let name: String = chars[start..i].iter().collect();
                tokens.push((start, Token::Ident(name)));
            }
            _ => {
                return Err(ExprParseError::UnexpectedCharacter {
                    position: i,
                    found: c,
                });
            }
        }
    }
    Ok(tokens)
}

/// maps a function name of the exercise grammar onto the Expr variant constructor
fn function_by_name(name: &str) -> Option<fn(Box<Expr>) -> Expr> {
    let constructor: fn(Box<Expr>) -> Expr = match name {
        "sin" => Expr::sin,
        "cos" => Expr::cos,
        "tan" | "tg" => Expr::tg,
        "asin" | "arcsin" => Expr::arcsin,
        "acos" | "arccos" => Expr::arccos,
        "log" | "ln" => Expr::Ln,
        "sqrt" => Expr::sqrt,
        "e" | "exp" => Expr::Exp,
        "cosh" => Expr::cosh,
        "sinh" => Expr::sinh,
        "abs" => Expr::abs,
        _ => return None,
    };
    Some(constructor)
}

struct ExprParser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
}

impl ExprParser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn next(&mut self) -> Option<(usize, Token)> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect_rparen(&mut self) -> Result<(), ExprParseError> {
        match self.next() {
            Some((_, Token::RParen)) => Ok(()),
            Some((position, token)) => Err(ExprParseError::UnexpectedToken {
                position,
                found: token.to_string(),
                expected: "')'",
            }),
            None => Err(ExprParseError::UnexpectedEnd { expected: "')'" }),
        }
    }

    fn parse_expr(&mut self) -> Result<Expr, ExprParseError> {
        let mut left = self.parse_term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    let right = self.parse_term()?;
                    left = Expr::Add(left.boxed(), right.boxed());
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    let right = self.parse_term()?;
                    left = Expr::Sub(left.boxed(), right.boxed());
                }
                _ => return Ok(left),
            }
        }
    }

    fn parse_term(&mut self) -> Result<Expr, ExprParseError> {
        let mut left = self.parse_unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    let right = self.parse_unary()?;
                    left = Expr::Mul(left.boxed(), right.boxed());
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let right = self.parse_unary()?;
                    left = Expr::Div(left.boxed(), right.boxed());
                }
                _ => return Ok(left),
            }
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, ExprParseError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                let operand = self.parse_unary()?;
                // fold literal negatives so "-3" stays a constant
                Ok(match operand {
                    Expr::Const(val) => Expr::Const(-val),
                    other => -other,
                })
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> Result<Expr, ExprParseError> {
        let base = self.parse_primary()?;
        if let Some(Token::Power) = self.peek() {
            self.pos += 1;
            let exponent = self.parse_unary()?;
            return Ok(Expr::Pow(base.boxed(), exponent.boxed()));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr, ExprParseError> {
        match self.next() {
            Some((_, Token::Number(value))) => Ok(Expr::Const(value)),
            Some((_, Token::LParen)) => {
                let inner = self.parse_expr()?;
                self.expect_rparen()?;
                Ok(inner)
            }
            Some((position, Token::Ident(name))) => {
                if let Some(Token::LParen) = self.peek() {
                    let constructor = function_by_name(&name)
                        .ok_or(ExprParseError::UnknownFunction { position, name })?;
                    self.pos += 1;
                    let argument = self.parse_expr()?;
                    self.expect_rparen()?;
                    return Ok(constructor(argument.boxed()));
                }
                match name.as_str() {
                    VARIABLE => Ok(Expr::Var(VARIABLE.to_string())),
                    "pi" => Ok(Expr::Const(PI)),
                    "e" => Ok(Expr::Const(E)),
                    _ => Err(ExprParseError::UnknownVariable { position, name }),
                }
            }
            Some((position, token)) => Err(ExprParseError::UnexpectedToken {
                position,
                found: token.to_string(),
                expected: "a number, 'x', a function or '('",
            }),
            None => Err(ExprParseError::UnexpectedEnd {
                expected: "a number, 'x', a function or '('",
            }),
        }
    }
}

/// Parses an exercise expression string into an `Expr` tree.
pub fn parse_expression_func(input: &str) -> Result<Expr, ExprParseError> {
    let tokens = tokenize(input)?;
    let mut parser = ExprParser { tokens, pos: 0 };
    let expr = parser.parse_expr()?;
    if let Some((position, token)) = parser.next() {
        return Err(ExprParseError::UnexpectedToken {
            position,
            found: token.to_string(),
            expected: "an operator or end of expression",
        });
    }
    debug!("parsed '{}' into {}", input, expr);
    Ok(expr)
}

impl Expr {
    /// turn a String expression of the exercise grammar into a symbolic expression
    pub fn parse_expression(input: &str) -> Result<Expr, ExprParseError> {
        parse_expression_func(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Box<Expr> {
        Box::new(Expr::Var("x".to_string()))
    }

    #[test]
    fn test_parse_constant() {
        let expr = parse_expression_func("42").unwrap();
        assert_eq!(expr, Expr::Const(42.0));
    }

    #[test]
    fn test_parse_negative_constant_is_folded() {
        let expr = parse_expression_func("-2.5").unwrap();
        assert_eq!(expr, Expr::Const(-2.5));
    }

    #[test]
    fn test_parse_variable() {
        let expr = parse_expression_func("x").unwrap();
        assert_eq!(expr, Expr::Var("x".to_string()));
    }

    #[test]
    fn test_parse_addition_is_left_associative() {
        let expr = parse_expression_func("x - 2 - 1").unwrap();
        assert_eq!(
            expr,
            Expr::Sub(
                Box::new(Expr::Sub(x(), Box::new(Expr::Const(2.0)))),
                Box::new(Expr::Const(1.0))
            )
        );
    }

    #[test]
    fn test_parse_python_power() {
        let expr = parse_expression_func("(x)**2").unwrap();
        assert_eq!(expr, Expr::Pow(x(), Box::new(Expr::Const(2.0))));
        let caret = parse_expression_func("x^2").unwrap();
        assert_eq!(expr, caret);
    }

    #[test]
    fn test_power_is_right_associative() {
        let expr = parse_expression_func("2**x**2").unwrap();
        assert_eq!(
            expr,
            Expr::Pow(
                Box::new(Expr::Const(2.0)),
                Box::new(Expr::Pow(x(), Box::new(Expr::Const(2.0))))
            )
        );
    }

    #[test]
    fn test_unary_minus_binds_looser_than_power() {
        let expr = parse_expression_func("-x**2").unwrap();
        assert_eq!(expr, -Expr::Pow(x(), Box::new(Expr::Const(2.0))));
        assert_eq!(expr.eval(3.0).unwrap(), -9.0);
    }

    #[test]
    fn test_negative_exponent() {
        let expr = parse_expression_func("2**-1").unwrap();
        assert_eq!(expr.eval(0.0).unwrap(), 0.5);
    }

    #[test]
    fn test_multiplication_before_addition() {
        let expr = parse_expression_func("1 + 2*x").unwrap();
        assert_eq!(
            expr,
            Expr::Add(
                Box::new(Expr::Const(1.0)),
                Box::new(Expr::Mul(Box::new(Expr::Const(2.0)), x()))
            )
        );
    }

    #[test]
    fn test_named_functions() {
        assert_eq!(parse_expression_func("sin(x)").unwrap(), Expr::sin(x()));
        assert_eq!(parse_expression_func("cos(x)").unwrap(), Expr::cos(x()));
        assert_eq!(parse_expression_func("tan(x)").unwrap(), Expr::tg(x()));
        assert_eq!(parse_expression_func("asin(x)").unwrap(), Expr::arcsin(x()));
        assert_eq!(parse_expression_func("acos(x)").unwrap(), Expr::arccos(x()));
        assert_eq!(parse_expression_func("log(x)").unwrap(), Expr::Ln(x()));
        assert_eq!(parse_expression_func("sqrt(x)").unwrap(), Expr::sqrt(x()));
        assert_eq!(parse_expression_func("e(x)").unwrap(), Expr::Exp(x()));
        assert_eq!(parse_expression_func("cosh(x)").unwrap(), Expr::cosh(x()));
        assert_eq!(parse_expression_func("sinh(x)").unwrap(), Expr::sinh(x()));
        assert_eq!(parse_expression_func("abs(x)").unwrap(), Expr::abs(x()));
    }

    #[test]
    fn test_bare_e_and_pi_are_constants() {
        assert_eq!(parse_expression_func("e").unwrap(), Expr::Const(E));
        assert_eq!(parse_expression_func("pi").unwrap(), Expr::Const(PI));
        let expr = parse_expression_func("e**x").unwrap();
        assert_eq!(expr, Expr::Pow(Box::new(Expr::Const(E)), x()));
    }

    #[test]
    fn test_scientific_notation_and_e_constant() {
        assert_eq!(parse_expression_func("1e-2").unwrap(), Expr::Const(0.01));
        let expr = parse_expression_func("2*e").unwrap();
        assert_eq!(
            expr,
            Expr::Mul(Box::new(Expr::Const(2.0)), Box::new(Expr::Const(E)))
        );
    }

    #[test]
    fn test_nested_functions() {
        let expr = parse_expression_func("sqrt(abs(sin(x)))").unwrap();
        assert_eq!(expr, Expr::sqrt(Box::new(Expr::abs(Box::new(Expr::sin(x()))))));
    }

    #[test]
    fn test_unknown_function_is_rejected() {
        let result = parse_expression_func("exec(x)");
        assert!(matches!(
            result,
            Err(ExprParseError::UnknownFunction { position: 0, .. })
        ));
    }

    #[test]
    fn test_unknown_variable_is_rejected() {
        let result = parse_expression_func("x + y");
        assert!(matches!(
            result,
            Err(ExprParseError::UnknownVariable { position: 4, .. })
        ));
    }

    #[test]
    fn test_unmatched_brackets() {
        assert!(matches!(
            parse_expression_func("(x + 1"),
            Err(ExprParseError::UnexpectedEnd { .. })
        ));
        assert!(matches!(
            parse_expression_func("x + 1)"),
            Err(ExprParseError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn test_dangling_operator() {
        assert!(parse_expression_func("x +").is_err());
        assert!(parse_expression_func("* x").is_err());
        assert!(parse_expression_func("").is_err());
    }

    #[test]
    fn test_python_code_cannot_sneak_in() {
        assert!(matches!(
            parse_expression_func("__import__('os')"),
            Err(ExprParseError::UnexpectedCharacter { found: '\'', .. })
        ));
        assert!(parse_expression_func("x; x").is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for input in ["(x)**2 - 3*sin(x)", "-x**2 + 1/x", "e(x) - log(abs(x))", "sqrt(4 - x**2)"] {
            let expr = parse_expression_func(input).unwrap();
            let reparsed = parse_expression_func(&expr.to_string()).unwrap();
            for x in [-1.5, -0.5, 0.25, 1.75] {
                assert_eq!(expr.eval(x).ok(), reparsed.eval(x).ok(), "{input} at {x}");
            }
        }
    }
}
