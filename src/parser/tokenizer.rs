use super::error::{LexicalError, LexicalErrorKind};
use super::locations::Span;
use const_format::concatcp;
use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Clone, Default, Debug, PartialEq)]
pub struct Token {
    pub(crate) typ: TokenType,
    pub(crate) lexeme: String,
    pub(crate) span: Span,
}

impl Token {
    fn new(typ: TokenType, lexeme: &str, span: Span) -> Self {
        Self {
            typ,
            lexeme: lexeme.to_string(),
            span,
        }
    }

    fn end_marker(position: usize) -> Self {
        Self::new(TokenType::ENDMARKER, "", Span::at(position))
    }

    pub fn typ(&self) -> TokenType {
        self.typ
    }

    /// Literal text of the token; `None` for the end marker.
    pub fn value(&self) -> Option<&str> {
        match self.typ {
            TokenType::ENDMARKER => None,
            _ => Some(self.lexeme.as_str()),
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.value() {
            Some(lexeme) => write!(f, "{:?}({})", self.typ, lexeme),
            None => write!(f, "{:?}", self.typ),
        }
    }
}

#[allow(non_camel_case_types)]
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum TokenType {
    NUMBER,
    PLUS,
    MINUS,
    STAR,
    SLASH,
    CIRCUMFLEX,
    LPAR,
    RPAR,
    ENDMARKER,
    #[default]
    ERRORTOKEN,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let description = match self {
            Self::NUMBER => "number",
            Self::PLUS => "'+'",
            Self::MINUS => "'-'",
            Self::STAR => "'*'",
            Self::SLASH => "'/'",
            Self::CIRCUMFLEX => "'^'",
            Self::LPAR => "'('",
            Self::RPAR => "')'",
            Self::ENDMARKER => "end of input",
            Self::ERRORTOKEN => "invalid token",
        };
        f.write_str(description)
    }
}

const PLUS: (char, TokenType) = ('+', TokenType::PLUS);
const MINUS: (char, TokenType) = ('-', TokenType::MINUS);
const STAR: (char, TokenType) = ('*', TokenType::STAR);
const SLASH: (char, TokenType) = ('/', TokenType::SLASH);
const CIRCUMFLEX: (char, TokenType) = ('^', TokenType::CIRCUMFLEX);
const LPAR: (char, TokenType) = ('(', TokenType::LPAR);
const RPAR: (char, TokenType) = (')', TokenType::RPAR);

const SIMPLE_TOKENS: [(char, TokenType); 7] = [PLUS, MINUS, STAR, SLASH, CIRCUMFLEX, LPAR, RPAR];

macro_rules! alternative {
    ($t:expr) => {{
        $t
    }};
    ($t:expr, $($ts:expr),+) => {{
        concatcp!($t, "|", alternative!($($ts),+))
    }}
}

macro_rules! group {
    ($($ts:expr),+) => {{
        concatcp!(r"(?:", alternative!($($ts),+), ")")
    }}
}

const S_WHITESPACE: &str = r"^[ \t\n\r\x0B\x0C]+";
const S_DIGITS: &str = r"[0-9]+";
// At most one decimal point per literal, so "1.2.3" splits into "1.2" and ".3".
const S_POINTFLOAT: &str = concatcp!(S_DIGITS, r"\.[0-9]*");
const S_FRACTION: &str = concatcp!(r"\.", S_DIGITS);
const S_NUMBER: &str = concatcp!("^", group!(S_POINTFLOAT, S_FRACTION, S_DIGITS));

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(S_WHITESPACE).expect("Error compiling regex."));
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(S_NUMBER).expect("Error compiling regex."));

/// On-demand tokenizer over a borrowed input string.
///
/// `next_token` keeps returning `ENDMARKER` once the input is exhausted. Lexical
/// problems do not stop tokenization: they are recorded and surface as
/// `ERRORTOKEN`s in the stream.
pub struct Tokenizer<'a> {
    input: &'a str,
    position: usize,
    errors: Vec<LexicalError>,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            errors: vec![],
            finished: false,
        }
    }

    /// Byte offset of the next unconsumed character.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn errors(&self) -> &[LexicalError] {
        &self.errors
    }

    pub(crate) fn take_errors(&mut self) -> Vec<LexicalError> {
        std::mem::take(&mut self.errors)
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        let start = self.position;
        let Some(chr) = self.current() else {
            return Token::end_marker(start);
        };

        if let Some(m) = NUMBER.find(self.rest()) {
            self.advance(m.end());
            return self.emit(TokenType::NUMBER, start);
        }

        if let Some(&(_, typ)) = SIMPLE_TOKENS.iter().find(|(c, _)| *c == chr) {
            self.advance(chr.len_utf8());
            return self.emit(typ, start);
        }

        let kind = if chr == '.' {
            LexicalErrorKind::MalformedNumber
        } else {
            LexicalErrorKind::UnknownCharacter
        };
        let error = LexicalError::new(kind, start, chr);
        log::warn!("{error}");
        self.errors.push(error);
        self.advance(chr.len_utf8());
        self.emit(TokenType::ERRORTOKEN, start)
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn current(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance(&mut self, len: usize) {
        self.position = (self.position + len).min(self.input.len());
    }

    fn skip_whitespace(&mut self) {
        if let Some(m) = WHITESPACE.find(self.rest()) {
            self.advance(m.end());
        }
    }

    fn emit(&self, typ: TokenType, start: usize) -> Token {
        let token = Token::new(
            typ,
            &self.input[start..self.position],
            Span::new(start, self.position),
        );
        log::trace!("{token} at {}", token.span);
        token
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    /// Yields every token including a single trailing `ENDMARKER`.
    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        self.finished = token.typ == TokenType::ENDMARKER;
        Some(token)
    }
}

pub fn tokenize(input: &str) -> Vec<Token> {
    Tokenizer::new(input).collect()
}

/// Renders tokens as `[ NUMBER(3), PLUS(+), NUMBER(4) ]`, leaving out the end marker.
pub fn format_tokens(tokens: &[Token]) -> String {
    let body = tokens
        .iter()
        .filter(|t| t.typ != TokenType::ENDMARKER)
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("[ {body} ]")
}
