use super::identifier::identifier;
use super::lexer::{Lexer, Token};
use crate::error::SchemaError;
use crate::schema::Stage;
use compact_str::CompactString;
use core::iter::Peekable;

/// Members of a `name:(...)` or `name:[...]` group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Members {
    /// `( stage, ... )`
    Stages(Vec<CompactString>),
    /// `[ level, ... ]`
    Levels(Vec<CompactString>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: CompactString,
    pub members: Members,
}

/// Recursive-descent parser over the tokens of one field value.
#[derive(Debug)]
struct Parser<'a> {
    field: &'static str,
    tokens: Peekable<Lexer<'a>>,
}

impl<'a> Parser<'a> {
    fn new(field: &'static str, source: &'a str) -> Self {
        Self {
            field,
            tokens: Lexer::new(source).peekable(),
        }
    }

    fn peek(&mut self) -> Option<Token<'a>> {
        self.tokens.peek().copied()
    }

    fn syntax(&self, expected: &'static str, found: Option<Token<'_>>) -> SchemaError {
        SchemaError::Syntax {
            field: self.field,
            expected,
            found: found.map_or_else(|| "end of input".into(), |token| token.to_string().into()),
        }
    }

    fn expect(&mut self, want: Token<'static>, expected: &'static str) -> Result<(), SchemaError> {
        match self.tokens.next() {
            Some(token) if token == want => Ok(()),
            other => Err(self.syntax(expected, other)),
        }
    }

    fn identifier(&mut self) -> Result<CompactString, SchemaError> {
        match self.tokens.next() {
            Some(Token::Word(word)) => identifier(self.field, word),
            other => Err(self.syntax("an identifier", other)),
        }
    }

    /// One or more items separated by commas.
    fn separated<T>(&mut self, mut item: impl FnMut(&mut Self) -> Result<T, SchemaError>) -> Result<Vec<T>, SchemaError> {
        let mut items = vec![item(self)?];
        while self.peek() == Some(Token::Comma) {
            let _ = self.tokens.next();
            items.push(item(self)?);
        }
        Ok(items)
    }

    fn finish(&mut self) -> Result<(), SchemaError> {
        match self.tokens.next() {
            None => Ok(()),
            other => Err(self.syntax("',' or end of input", other)),
        }
    }

    fn stage(&mut self) -> Result<Stage, SchemaError> {
        let name = self.identifier()?;
        if self.peek() != Some(Token::Colon) {
            return Ok(Stage::new(name, false));
        }

        let _ = self.tokens.next();
        match self.tokens.next() {
            Some(Token::Word("shared")) => Ok(Stage::new(name, true)),
            other => Err(self.syntax("'shared'", other)),
        }
    }

    fn group(&mut self) -> Result<Group, SchemaError> {
        let name = self.identifier()?;
        self.expect(Token::Colon, "':'")?;

        match self.tokens.next() {
            Some(Token::OpenParen) => {
                let stages = self.separated(Self::identifier)?;
                self.expect(Token::CloseParen, "',' or ')'")?;
                Ok(Group {
                    name,
                    members: Members::Stages(stages),
                })
            }
            Some(Token::OpenBracket) => {
                let levels = self.separated(Self::identifier)?;
                self.expect(Token::CloseBracket, "',' or ']'")?;
                Ok(Group {
                    name,
                    members: Members::Levels(levels),
                })
            }
            other => Err(self.syntax("'(' or '['", other)),
        }
    }

    fn is_empty(&mut self) -> bool {
        self.peek().is_none()
    }
}

/// `id[,id]*`, possibly empty.
pub fn identifier_list(field: &'static str, source: &str) -> Result<Vec<CompactString>, SchemaError> {
    let mut parser = Parser::new(field, source);
    if parser.is_empty() {
        return Ok(Vec::new());
    }

    let ids = parser.separated(Parser::identifier)?;
    parser.finish()?;
    Ok(ids)
}

/// `id[:shared][,id[:shared]]*`, at least one entry.
pub fn stage_list(field: &'static str, source: &str) -> Result<Vec<Stage>, SchemaError> {
    let mut parser = Parser::new(field, source);
    let stages = parser.separated(Parser::stage)?;
    parser.finish()?;
    Ok(stages)
}

/// `id:(...)` or `id:[...]` groups separated by commas, possibly empty.
pub fn group_list(field: &'static str, source: &str) -> Result<Vec<Group>, SchemaError> {
    let mut parser = Parser::new(field, source);
    if parser.is_empty() {
        return Ok(Vec::new());
    }

    let groups = parser.separated(Parser::group)?;
    parser.finish()?;
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<CompactString> {
        names.iter().map(|n| CompactString::from(*n)).collect()
    }

    #[test]
    fn test_identifier_list() {
        assert_eq!(identifier_list("attributes", " A , B,C ").unwrap(), ids(&["A", "B", "C"]));
        assert!(identifier_list("attributes", "").unwrap().is_empty());
    }

    #[test]
    fn test_identifier_list_rejects_trailing_comma() {
        let err = identifier_list("attributes", "A,").unwrap_err();
        assert_eq!(
            err.to_string(),
            "syntax error in field 'attributes': expected an identifier, found 'end of input'"
        );
    }

    #[test]
    fn test_identifier_list_rejects_malformed_name() {
        assert!(matches!(
            identifier_list("attributes", "A, 2B"),
            Err(SchemaError::MalformedIdentifier { field: "attributes", .. })
        ));
    }

    #[test]
    fn test_stage_list_with_shared_markers() {
        let stages = stage_list("stages", "Start : shared, Middle, End:shared").unwrap();
        assert_eq!(
            stages,
            [Stage::new("Start", true), Stage::new("Middle", false), Stage::new("End", true)]
        );
    }

    #[test]
    fn test_stage_list_rejects_unknown_modifier() {
        let err = stage_list("stages", "Start:common").unwrap_err();
        assert!(matches!(err, SchemaError::Syntax { expected: "'shared'", ref found, .. } if found == "common"));
    }

    #[test]
    fn test_stage_list_requires_an_entry() {
        assert!(matches!(stage_list("stages", "  "), Err(SchemaError::Syntax { .. })));
    }

    #[test]
    fn test_group_list() {
        let groups = group_list("phases", "Sorting:(Start,End), Merge:[One, Two]").unwrap();
        assert_eq!(
            groups,
            [
                Group {
                    name: "Sorting".into(),
                    members: Members::Stages(ids(&["Start", "End"])),
                },
                Group {
                    name: "Merge".into(),
                    members: Members::Levels(ids(&["One", "Two"])),
                },
            ]
        );
    }

    #[test]
    fn test_group_list_rejects_mismatched_close() {
        let err = group_list("levels", "One:(Start,End]").unwrap_err();
        assert!(matches!(err, SchemaError::Syntax { expected: "',' or ')'", .. }));
    }

    #[test]
    fn test_group_list_rejects_missing_colon() {
        assert!(matches!(group_list("levels", "One (Start)"), Err(SchemaError::Syntax { .. })));
    }

    #[test]
    fn test_group_list_rejects_empty_group() {
        assert!(matches!(group_list("levels", "One:()"), Err(SchemaError::Syntax { .. })));
    }

    #[test]
    fn test_group_list_rejects_trailing_tokens() {
        let err = group_list("phases", "A:(Start) B:(End)").unwrap_err();
        assert!(matches!(err, SchemaError::Syntax { ref found, .. } if found == "B"));
    }
}
