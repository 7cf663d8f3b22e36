//! modscript 解析器
//!
//! 按行解析：每行一条语句，`#` 之后是注释，行尾 `;` 可选。

use thiserror::Error;

use super::ast::{Expr, Line, Script, Stmt};

/// 语法错误
#[derive(Error, Debug, Clone, PartialEq)]
#[error("line {line}: {message}")]
pub struct ParseError {
    /// 从 1 开始的行号
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Number(f64),
    Str(String),
    Eq,
    Dot,
    LBrace,
    RBrace,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Ident(name) => format!("'{name}'"),
            Token::Number(n) => format!("number {n}"),
            Token::Str(s) => format!("string \"{s}\""),
            Token::Eq => "'='".to_string(),
            Token::Dot => "'.'".to_string(),
            Token::LBrace => "'{'".to_string(),
            Token::RBrace => "'}'".to_string(),
        }
    }
}

/// 解析整个模块源码
pub fn parse(source: &str) -> Result<Script, ParseError> {
    let mut lines = Vec::new();
    for (index, text) in source.lines().enumerate() {
        let line = index + 1;
        let tokens = tokenize(text).map_err(|message| ParseError { line, message })?;
        if tokens.is_empty() {
            continue;
        }
        let stmt = LineParser { tokens, pos: 0 }
            .statement()
            .map_err(|message| ParseError { line, message })?;
        lines.push(Line { line, stmt });
    }
    Ok(Script { lines })
}

fn tokenize(text: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            '#' => break,
            c if c.is_whitespace() => {
                chars.next();
            }
            ';' => {
                if !rest_is_comment(&text[start + 1..]) {
                    return Err("';' must end the statement".to_string());
                }
                break;
            }
            '=' => {
                chars.next();
                tokens.push(Token::Eq);
            }
            '.' => {
                chars.next();
                tokens.push(Token::Dot);
            }
            '{' => {
                chars.next();
                tokens.push(Token::LBrace);
            }
            '}' => {
                chars.next();
                tokens.push(Token::RBrace);
            }
            '"' => {
                chars.next();
                let mut value = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '"' {
                        closed = true;
                        break;
                    }
                    value.push(c);
                }
                if !closed {
                    return Err("unterminated string".to_string());
                }
                tokens.push(Token::Str(value));
            }
            c if c.is_ascii_digit() || c == '-' => {
                let mut end = start;
                while let Some(&(i, c)) = chars.peek() {
                    let part_of_number = c.is_ascii_digit() || (i == start && c == '-') || (c == '.' && is_digit_at(text, i + 1));
                    if !part_of_number {
                        break;
                    }
                    end = i + c.len_utf8();
                    chars.next();
                }
                let literal = &text[start..end];
                let number = literal
                    .parse::<f64>()
                    .map_err(|_| format!("invalid number '{literal}'"))?;
                tokens.push(Token::Number(number));
            }
            c if c.is_alphabetic() || c == '_' || c == '$' => {
                let mut end = start;
                while let Some(&(i, c)) = chars.peek() {
                    if !(c.is_alphanumeric() || c == '_' || c == '$') {
                        break;
                    }
                    end = i + c.len_utf8();
                    chars.next();
                }
                tokens.push(Token::Ident(text[start..end].to_string()));
            }
            other => return Err(format!("unexpected character '{other}'")),
        }
    }
    Ok(tokens)
}

fn is_digit_at(text: &str, index: usize) -> bool {
    text[index..].chars().next().is_some_and(|c| c.is_ascii_digit())
}

fn rest_is_comment(rest: &str) -> bool {
    let trimmed = rest.trim_start();
    trimmed.is_empty() || trimmed.starts_with('#')
}

struct LineParser {
    tokens: Vec<Token>,
    pos: usize,
}

impl LineParser {
    fn statement(mut self) -> Result<Stmt, String> {
        let stmt = match self.peek().cloned() {
            Some(Token::Ident(word)) if word == "let" => {
                self.pos += 1;
                let name = self.identifier()?;
                self.expect(Token::Eq)?;
                Stmt::Let {
                    name,
                    value: self.expression()?,
                }
            }
            Some(Token::Ident(word)) if word == "export" => {
                self.pos += 1;
                let key = self.identifier()?;
                self.expect(Token::Eq)?;
                Stmt::Export {
                    key,
                    value: self.expression()?,
                }
            }
            Some(Token::Ident(word)) if word == "exports" && self.tokens.get(1) == Some(&Token::Eq) => {
                self.pos += 2;
                Stmt::SetExports(self.expression()?)
            }
            Some(Token::Ident(word)) if word == "read" => {
                self.pos += 1;
                Stmt::Read(self.expression()?)
            }
            Some(Token::Ident(word)) if word == "require" => {
                self.pos += 1;
                Stmt::Require(self.string()?)
            }
            Some(token) => return Err(format!("unexpected {} at start of statement", token.describe())),
            None => return Err("empty statement".to_string()),
        };
        if let Some(token) = self.peek() {
            return Err(format!("unexpected {} after statement", token.describe()));
        }
        Ok(stmt)
    }

    fn expression(&mut self) -> Result<Expr, String> {
        let mut expr = self.primary()?;
        while self.peek() == Some(&Token::Dot) {
            self.pos += 1;
            let property = self.identifier()?;
            expr = Expr::Member {
                object: Box::new(expr),
                property,
            };
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr, String> {
        let token = self.advance().ok_or("expected an expression")?;
        let expr = match token {
            Token::Number(n) => Expr::Number(n),
            Token::Str(s) => Expr::Str(s),
            Token::LBrace => {
                self.expect(Token::RBrace)?;
                Expr::Object
            }
            Token::Ident(word) => match word.as_str() {
                "true" => Expr::Bool(true),
                "false" => Expr::Bool(false),
                "null" => Expr::Null,
                "undefined" => Expr::Undefined,
                "require" => Expr::Require(self.string()?),
                _ => Expr::Ident(word),
            },
            other => return Err(format!("unexpected {} in expression", other.describe())),
        };
        Ok(expr)
    }

    fn identifier(&mut self) -> Result<String, String> {
        match self.advance() {
            Some(Token::Ident(name)) => Ok(name),
            Some(other) => Err(format!("expected identifier, found {}", other.describe())),
            None => Err("expected identifier".to_string()),
        }
    }

    fn string(&mut self) -> Result<String, String> {
        match self.advance() {
            Some(Token::Str(s)) => Ok(s),
            Some(other) => Err(format!("expected a string specifier, found {}", other.describe())),
            None => Err("expected a string specifier".to_string()),
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), String> {
        match self.advance() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(format!("expected {}, found {}", expected.describe(), token.describe())),
            None => Err(format!("expected {}", expected.describe())),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stmt(source: &str) -> Stmt {
        parse(source).unwrap().lines.remove(0).stmt
    }

    #[test]
    fn test_statements() {
        assert_eq!(
            stmt("let b = require \"./b\""),
            Stmt::Let {
                name: "b".to_string(),
                value: Expr::Require("./b".to_string()),
            }
        );
        assert_eq!(
            stmt("export answer = 42;"),
            Stmt::Export {
                key: "answer".to_string(),
                value: Expr::Number(42.0),
            }
        );
        assert_eq!(stmt("exports = {}"), Stmt::SetExports(Expr::Object));
        assert_eq!(stmt("require \"./c\""), Stmt::Require("./c".to_string()));
    }

    #[test]
    fn test_member_chain() {
        assert_eq!(
            stmt("read x.a.b"),
            Stmt::Read(Expr::Member {
                object: Box::new(Expr::Member {
                    object: Box::new(Expr::Ident("x".to_string())),
                    property: "a".to_string(),
                }),
                property: "b".to_string(),
            })
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(stmt("export n = -1.5"), Stmt::Export { key: "n".into(), value: Expr::Number(-1.5) });
        assert_eq!(stmt("export s = \"hi there\""), Stmt::Export { key: "s".into(), value: Expr::Str("hi there".into()) });
        assert_eq!(stmt("export t = true"), Stmt::Export { key: "t".into(), value: Expr::Bool(true) });
        assert_eq!(stmt("export z = null"), Stmt::Export { key: "z".into(), value: Expr::Null });
        assert_eq!(stmt("export u = undefined"), Stmt::Export { key: "u".into(), value: Expr::Undefined });
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let script = parse("# header\n\nexport a = 1 # trailing\n  ;\nexport b = 2; # done\n").unwrap();
        assert_eq!(script.lines.len(), 2);
        assert_eq!(script.lines[0].line, 3);
        assert_eq!(script.lines[1].line, 5);
    }

    #[test]
    fn test_errors_carry_line() {
        let err = parse("export a = 1\nlet = 2\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("expected identifier"));

        let err = parse("\n\nrequire ./a").unwrap_err();
        assert_eq!(err.line, 3);

        let err = parse("export s = \"open").unwrap_err();
        assert_eq!(err.message, "unterminated string");

        let err = parse("export a = 1 2").unwrap_err();
        assert!(err.message.contains("after statement"));
    }

    #[test]
    fn test_requires_are_collected_in_order() {
        let script = parse("require \"./a\"\nlet b = require \"./b\"\nread require \"./c\".x\n").unwrap();
        assert_eq!(script.requires(), vec!["./a", "./b", "./c"]);
    }
}
