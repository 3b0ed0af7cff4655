use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Word(&'a str),
    Colon,
    Comma,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Word(word) => word,
            Self::Colon => ":",
            Self::Comma => ",",
            Self::OpenParen => "(",
            Self::CloseParen => ")",
            Self::OpenBracket => "[",
            Self::CloseBracket => "]",
        })
    }
}

const fn punctuation(c: char) -> Option<Token<'static>> {
    match c {
        ':' => Some(Token::Colon),
        ',' => Some(Token::Comma),
        '(' => Some(Token::OpenParen),
        ')' => Some(Token::CloseParen),
        '[' => Some(Token::OpenBracket),
        ']' => Some(Token::CloseBracket),
        _ => None,
    }
}

/// Splits a field value into words and punctuation, skipping whitespace.
///
/// A word is any maximal run of characters that are neither whitespace nor
/// punctuation; whether it is a valid identifier is up to the parser.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    rest: &'a str,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub const fn new(source: &'a str) -> Self {
        Self { rest: source }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rest = self.rest.trim_start();

        let mut chars = self.rest.chars();
        let first = chars.next()?;
        if let Some(token) = punctuation(first) {
            self.rest = chars.as_str();
            return Some(token);
        }

        let end = self
            .rest
            .find(|c: char| c.is_whitespace() || punctuation(c).is_some())
            .unwrap_or(self.rest.len());
        let (word, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(Token::Word(word))
    }
}
