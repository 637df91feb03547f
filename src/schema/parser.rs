//! Parser for the `message name { ... }` schema syntax.

use super::error::SchemaError;
use super::types::{ConvertedType, Field, FieldKind, PhysicalType, Repetition};
use super::MAX_DEPTH;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    Symbol(char),
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Word(w) => format!("`{}`", w),
            Token::Symbol(c) => format!("`{}`", c),
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<(Token, usize)>, SchemaError> {
    let mut tokens = Vec::new();
    for (idx, raw_line) in text.lines().enumerate() {
        let line = idx + 1;
        let content = match raw_line.find("//") {
            Some(pos) => &raw_line[..pos],
            None => raw_line,
        };
        let content = match content.find('#') {
            Some(pos) => &content[..pos],
            None => content,
        };

        let mut chars = content.char_indices().peekable();
        while let Some(&(start, c)) = chars.peek() {
            if c.is_whitespace() {
                chars.next();
            } else if matches!(c, '{' | '}' | '(' | ')' | ';') {
                tokens.push((Token::Symbol(c), line));
                chars.next();
            } else if c.is_alphanumeric() || c == '_' {
                let mut end = start;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        end = i + c.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push((Token::Word(content[start..end].to_string()), line));
            } else {
                return Err(SchemaError::Syntax {
                    line,
                    message: format!("unexpected character `{}`", c),
                });
            }
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
}

impl Parser {
    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|(_, line)| *line)
            .unwrap_or(1)
    }

    fn error(&self, message: impl Into<String>) -> SchemaError {
        SchemaError::Syntax {
            line: self.line(),
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn found(&self) -> String {
        self.peek()
            .map(Token::describe)
            .unwrap_or_else(|| "end of input".to_string())
    }

    fn expect_symbol(&mut self, symbol: char) -> Result<(), SchemaError> {
        if self.peek() == Some(&Token::Symbol(symbol)) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected `{}`, found {}", symbol, self.found())))
        }
    }

    fn eat_symbol(&mut self, symbol: char) -> bool {
        if self.peek() == Some(&Token::Symbol(symbol)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_word(&mut self, what: &str) -> Result<String, SchemaError> {
        if let Some(Token::Word(w)) = self.peek() {
            let word = w.clone();
            self.pos += 1;
            return Ok(word);
        }
        Err(self.error(format!("expected {}, found {}", what, self.found())))
    }

    fn parse_message(&mut self) -> Result<(String, Vec<Field>), SchemaError> {
        let keyword = self.expect_word("`message`")?;
        if !keyword.eq_ignore_ascii_case("message") {
            self.pos -= 1;
            return Err(self.error(format!("expected `message`, found `{}`", keyword)));
        }
        let name = self.expect_word("message name")?;
        self.expect_symbol('{')?;
        let fields = self.parse_fields(1)?;
        self.expect_symbol('}')?;
        self.eat_symbol(';');
        if self.peek().is_some() {
            return Err(self.error(format!("unexpected {} after message", self.found())));
        }
        Ok((name, fields))
    }

    /// Fields of one group; `depth` is 1 for the message's own fields
    fn parse_fields(&mut self, depth: usize) -> Result<Vec<Field>, SchemaError> {
        let mut fields = Vec::new();
        while matches!(self.peek(), Some(Token::Word(_))) {
            if depth > MAX_DEPTH {
                return Err(self.error(format!("nesting deeper than {} levels", MAX_DEPTH)));
            }
            fields.push(self.parse_field(depth)?);
        }
        Ok(fields)
    }

    fn parse_field(&mut self, depth: usize) -> Result<Field, SchemaError> {
        let word = self.expect_word("repetition")?;
        let repetition = match Repetition::from_keyword(&word) {
            Some(r) => r,
            None => {
                self.pos -= 1;
                return Err(self.error(format!(
                    "expected `required`, `optional` or `repeated`, found `{}`",
                    word
                )));
            }
        };

        let type_word = self.expect_word("type or `group`")?;
        if type_word.eq_ignore_ascii_case("group") {
            let name = self.expect_word("group name")?;
            let converted_type = self.parse_annotation()?;
            self.expect_symbol('{')?;
            let children = self.parse_fields(depth + 1)?;
            self.expect_symbol('}')?;
            self.eat_symbol(';');
            return Ok(Field {
                name,
                repetition,
                converted_type,
                kind: FieldKind::Group(children),
            });
        }

        let physical = self.parse_physical(&type_word)?;
        let name = self.expect_word("field name")?;
        let converted_type = self.parse_annotation()?;
        self.expect_symbol(';')?;
        Ok(Field {
            name,
            repetition,
            converted_type,
            kind: FieldKind::Primitive(physical),
        })
    }

    fn parse_physical(&mut self, word: &str) -> Result<PhysicalType, SchemaError> {
        let physical = match word.to_ascii_lowercase().as_str() {
            "boolean" => PhysicalType::Boolean,
            "int32" => PhysicalType::Int32,
            "int64" => PhysicalType::Int64,
            "float" => PhysicalType::Float,
            "double" => PhysicalType::Double,
            "binary" | "byte_array" => PhysicalType::ByteArray,
            "fixed_len_byte_array" => {
                self.expect_symbol('(')?;
                let len_word = self.expect_word("fixed length")?;
                let len = len_word.parse::<i32>().map_err(|_| {
                    self.error(format!("invalid fixed length `{}`", len_word))
                })?;
                self.expect_symbol(')')?;
                PhysicalType::FixedLenByteArray(len)
            }
            _ => {
                self.pos -= 1;
                return Err(self.error(format!("unknown type `{}`", word)));
            }
        };
        Ok(physical)
    }

    fn parse_annotation(&mut self) -> Result<Option<ConvertedType>, SchemaError> {
        if !self.eat_symbol('(') {
            return Ok(None);
        }
        let word = self.expect_word("annotation")?;
        let converted = ConvertedType::from_keyword(&word).ok_or_else(|| {
            self.pos -= 1;
            self.error(format!("unknown annotation `{}`", word))
        })?;
        self.expect_symbol(')')?;
        Ok(Some(converted))
    }
}

/// Parse a message into its name and top-level fields, without validation
pub(super) fn parse(text: &str) -> Result<(String, Vec<Field>), SchemaError> {
    let tokens = tokenize(text)?;
    let mut parser = Parser { tokens, pos: 0 };
    parser.parse_message()
}
