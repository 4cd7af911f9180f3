// src/query/parser.rs
//! Recursive-descent parser for the query language.
//!
//! ```text
//! query     := statement (';' statement)*
//! statement := operation '(' args? ')' ('{' fields '}')?
//! args      := arg (',' arg)*
//! arg       := ident '=' value | value
//! value     := '"' (escaped | any)* '"' | bare
//! fields    := preset | field ((ws | ',') field)*
//! ```
//!
//! Field names are validated against a [`FieldSchema`] while parsing, so a
//! query naming an unknown field never reaches the network.

use super::ast::{Arg, Operation, Query, Statement};
use super::schema::FieldSchema;
use thiserror::Error;

/// Why a query string was rejected. Positions are byte offsets.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty query")]
    EmptyQuery,

    #[error("unknown operation '{name}' at position {position}")]
    UnknownOperation { name: String, position: usize },

    #[error("unknown field '{name}' at position {position}")]
    UnknownField { name: String, position: usize },

    #[error("empty field block at position {position}; name a preset or at least one field")]
    EmptyFieldBlock { position: usize },

    #[error("preset '{preset}' at position {position} must be the only entry in its field block")]
    PresetNotAlone { preset: String, position: usize },

    #[error("expected {expected} at position {position}, found {found}")]
    Unexpected {
        expected: String,
        found: String,
        position: usize,
    },

    #[error("unterminated string starting at position {position}")]
    UnterminatedString { position: usize },

    #[error("empty argument at position {position}")]
    EmptyArgument { position: usize },
}

/// Parses `input` into a [`Query`], validating field names against `schema`.
pub fn parse_query<E>(input: &str, schema: &FieldSchema<E>) -> Result<Query, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::EmptyQuery);
    }

    let mut parser = Parser {
        input,
        pos: 0,
        schema,
    };
    let mut statements = vec![parser.statement()?];

    loop {
        parser.skip_ws();
        match parser.peek() {
            None => break,
            Some(';') => {
                parser.bump();
                statements.push(parser.statement()?);
            }
            Some(_) => return Err(parser.unexpected("';' or end of query")),
        }
    }

    Ok(Query { statements })
}

struct Parser<'a, 's, E> {
    input: &'a str,
    pos: usize,
    schema: &'s FieldSchema<E>,
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl<'a, 's, E> Parser<'a, 's, E> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let found = match self.peek() {
            Some(c) => format!("'{}'", c),
            None => "end of query".to_string(),
        };
        ParseError::Unexpected {
            expected: expected.to_string(),
            found,
            position: self.pos,
        }
    }

    fn expect(&mut self, want: char) -> Result<(), ParseError> {
        self.skip_ws();
        if self.peek() == Some(want) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}'", want)))
        }
    }

    fn ident(&mut self) -> Option<&'a str> {
        let start = self.pos;
        if !self.peek().is_some_and(is_ident_start) {
            return None;
        }
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        Some(&self.input[start..self.pos])
    }

    fn statement(&mut self) -> Result<Statement, ParseError> {
        self.skip_ws();
        let start = self.pos;
        let name = self
            .ident()
            .ok_or_else(|| self.unexpected("operation name"))?;
        let operation: Operation = name.parse().map_err(|_| ParseError::UnknownOperation {
            name: name.to_string(),
            position: start,
        })?;

        let mut statement = Statement::new(operation);
        self.expect('(')?;
        statement.args = self.args()?;
        self.expect(')')?;

        self.skip_ws();
        if self.peek() == Some('{') {
            self.bump();
            let (fields, preset) = self.fields()?;
            statement.fields = Some(fields);
            statement.preset = preset;
        }
        Ok(statement)
    }

    fn args(&mut self) -> Result<Vec<Arg>, ParseError> {
        let mut args = Vec::new();
        self.skip_ws();
        if self.peek() == Some(')') {
            return Ok(args);
        }

        loop {
            args.push(self.arg()?);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                _ => return Ok(args),
            }
        }
    }

    fn arg(&mut self) -> Result<Arg, ParseError> {
        self.skip_ws();
        if self.peek() == Some('"') {
            return Ok(Arg::positional(self.quoted()?));
        }

        let checkpoint = self.pos;
        if let Some(key) = self.ident() {
            self.skip_ws();
            if self.peek() == Some('=') {
                self.bump();
                self.skip_ws();
                let value = if self.peek() == Some('"') {
                    self.quoted()?
                } else {
                    self.bare()?
                };
                return Ok(Arg::named(key, value));
            }
        }

        self.pos = checkpoint;
        Ok(Arg::positional(self.bare()?))
    }

    /// A double-quoted string. Backslash escapes are kept verbatim.
    fn quoted(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(ParseError::UnterminatedString { position: start }),
                Some('"') => return Ok(value),
                Some('\\') => {
                    value.push('\\');
                    match self.bump() {
                        Some(escaped) => value.push(escaped),
                        None => return Err(ParseError::UnterminatedString { position: start }),
                    }
                }
                Some(c) => value.push(c),
            }
        }
    }

    /// An unquoted run up to the next comma or parenthesis, trimmed.
    fn bare(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| !matches!(c, ',' | '(' | ')')) {
            self.bump();
        }
        let value = self.input[start..self.pos].trim();
        if value.is_empty() {
            return match self.peek() {
                Some(',') | Some(')') => Err(ParseError::EmptyArgument { position: start }),
                _ => Err(self.unexpected("argument value")),
            };
        }
        if self.peek() == Some('(') {
            return Err(self.unexpected("',' or ')'"));
        }
        Ok(value.to_string())
    }

    /// Body of a `{...}` block, after the opening brace.
    fn fields(&mut self) -> Result<(Vec<String>, Option<String>), ParseError> {
        let block_start = self.pos - 1;
        let mut tokens: Vec<(&'a str, usize)> = Vec::new();

        loop {
            while self
                .peek()
                .is_some_and(|c| c.is_whitespace() || c == ',')
            {
                self.bump();
            }
            match self.peek() {
                Some('}') => {
                    self.bump();
                    break;
                }
                None => return Err(self.unexpected("'}'")),
                Some(_) => {
                    let position = self.pos;
                    let name = self
                        .ident()
                        .ok_or_else(|| self.unexpected("field name or '}'"))?;
                    tokens.push((name, position));
                }
            }
        }

        if tokens.is_empty() {
            return Err(ParseError::EmptyFieldBlock {
                position: block_start,
            });
        }

        if let Some((preset, position)) = tokens
            .iter()
            .copied()
            .find(|(name, _)| self.schema.preset_fields(name).is_some())
        {
            if tokens.len() > 1 {
                return Err(ParseError::PresetNotAlone {
                    preset: preset.to_string(),
                    position,
                });
            }
            let fields = self
                .schema
                .preset_fields(preset)
                .unwrap_or(&[])
                .iter()
                .map(|f| f.to_string())
                .collect();
            return Ok((fields, Some(preset.to_string())));
        }

        let mut fields: Vec<String> = Vec::with_capacity(tokens.len());
        for (name, position) in tokens {
            if !self.schema.has_field(name) {
                return Err(ParseError::UnknownField {
                    name: name.to_string(),
                    position,
                });
            }
            if !fields.iter().any(|f| f == name) {
                fields.push(name.to_string());
            }
        }
        Ok((fields, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::schema::page_schema;
    use pretty_assertions::assert_eq;

    fn parse(input: &str) -> Result<Query, ParseError> {
        parse_query(input, &page_schema())
    }

    #[test]
    fn simple_get() {
        let query = parse("get(12345)").unwrap();
        assert_eq!(query.statements.len(), 1);
        let stmt = &query.statements[0];
        assert_eq!(stmt.operation, Operation::Get);
        assert_eq!(stmt.args, vec![Arg::positional("12345")]);
        assert_eq!(stmt.fields, None);
    }

    #[test]
    fn named_args_with_quoted_and_bare_values() {
        let query = parse(r#"get(space=DEV, title="My Page")"#).unwrap();
        assert_eq!(
            query.statements[0].args,
            vec![Arg::named("space", "DEV"), Arg::named("title", "My Page")]
        );
    }

    #[test]
    fn bare_values_are_trimmed() {
        let query = parse("tree( 12345 ,  depth = 5 )").unwrap();
        assert_eq!(
            query.statements[0].args,
            vec![Arg::positional("12345"), Arg::named("depth", "5")]
        );
    }

    #[test]
    fn batch_keeps_statement_order() {
        let query = parse("spaces(){minimal}; get(1); children(2){id title}").unwrap();
        let ops: Vec<Operation> = query.statements.iter().map(|s| s.operation).collect();
        assert_eq!(ops, vec![Operation::Spaces, Operation::Get, Operation::Children]);
    }

    #[test]
    fn every_operation_parses() {
        for op in Operation::ALL {
            let query = parse(&format!("{}(1)", op)).unwrap();
            assert_eq!(query.statements[0].operation, op);
        }
    }

    #[test]
    fn unknown_operation_is_named() {
        let err = parse("get(1); delete(1)").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownOperation {
                name: "delete".into(),
                position: 8
            }
        );
    }

    #[test]
    fn presets_expand_to_their_fields() {
        let query = parse("get(1){overview}").unwrap();
        let stmt = &query.statements[0];
        assert_eq!(stmt.preset.as_deref(), Some("overview"));
        assert_eq!(
            stmt.fields.as_deref().unwrap(),
            ["id", "title", "status", "spaceKey", "version", "ancestors", "labels", "url"]
        );
    }

    #[test]
    fn empty_args_are_allowed() {
        let query = parse("spaces()").unwrap();
        assert!(query.statements[0].args.is_empty());
    }

    #[test]
    fn quoted_cql_keeps_escapes() {
        let query = parse(r#"search("type=page AND text~\"api\""){default}"#).unwrap();
        assert_eq!(
            query.statements[0].args[0].value,
            r#"type=page AND text~\"api\""#
        );
    }

    #[test]
    fn quoted_values_may_contain_delimiters() {
        let query = parse(r#"search("title ~ \"a, (b)\" ; x")"#).unwrap();
        assert_eq!(query.statements.len(), 1);
        assert_eq!(query.statements[0].args[0].value, r#"title ~ \"a, (b)\" ; x"#);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(parse(""), Err(ParseError::EmptyQuery));
        assert_eq!(parse("   "), Err(ParseError::EmptyQuery));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = parse("get(1){bogusfield}").unwrap_err();
        assert!(matches!(err, ParseError::UnknownField { ref name, .. } if name == "bogusfield"));
    }

    #[test]
    fn duplicate_fields_collapse() {
        let query = parse("get(1){id title id}").unwrap();
        assert_eq!(query.statements[0].fields.as_deref().unwrap(), ["id", "title"]);

        let query = parse("get(1){id, title,version}").unwrap();
        assert_eq!(query.statements[0].fields.as_ref().unwrap().len(), 3);
    }

    #[test]
    fn empty_field_block_is_rejected() {
        assert!(matches!(
            parse("get(1){}"),
            Err(ParseError::EmptyFieldBlock { position: 6 })
        ));
        assert!(matches!(
            parse("get(1){ , }"),
            Err(ParseError::EmptyFieldBlock { .. })
        ));
    }

    #[test]
    fn preset_must_stand_alone() {
        assert!(matches!(
            parse("get(1){minimal body}"),
            Err(ParseError::PresetNotAlone { .. })
        ));
    }

    #[test]
    fn malformed_statements_are_rejected() {
        assert!(matches!(parse("get 1"), Err(ParseError::Unexpected { .. })));
        assert!(matches!(parse("get(1"), Err(ParseError::Unexpected { .. })));
        assert!(matches!(parse("get(1){id"), Err(ParseError::Unexpected { .. })));
        assert!(matches!(parse("get(1) x"), Err(ParseError::Unexpected { .. })));
        assert!(matches!(parse("get(1);"), Err(ParseError::Unexpected { .. })));
        assert!(matches!(
            parse(r#"search("open"#),
            Err(ParseError::UnterminatedString { position: 7 })
        ));
        assert!(matches!(parse("get(1,,2)"), Err(ParseError::EmptyArgument { .. })));
        assert!(matches!(parse("get(a(b))"), Err(ParseError::Unexpected { .. })));
    }
}
