//! # Lexer for Ladder-Logic Text

use logos::Logos;

/// Tokens for one Ladder-Logic line
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")] // Skip whitespace (not newlines)
#[logos(skip r"//[^\n]*")] // Skip comments
pub enum Token {
    /// Identifier (mnemonics, operand names, kebab-case directive kinds)
    #[regex(r"[A-Za-z_][A-Za-z0-9_.\-]*", |lex| lex.slice().to_string())]
    Word(String),

    /// Signed integer operand, kept textual until a field needs the value
    #[regex(r"-?[0-9]+", |lex| lex.slice().to_string())]
    Number(String),

    /// Operator run (`&&`, `||`, `+=`, `>=`, ...)
    #[regex(r"[+\-*/%<>=!&|^~]+", |lex| lex.slice().to_string())]
    Symbol(String),

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[regex(r"\n")]
    Newline,
}

impl Token {
    /// The token's textual payload, if it carries one
    pub fn text(&self) -> Option<&str> {
        match self {
            Token::Word(s) | Token::Number(s) | Token::Symbol(s) => Some(s),
            _ => None,
        }
    }
}

/// Tokenize one line into its textual tokens, dropping parentheses.
/// Characters the lexer cannot classify are skipped; Ladder-Logic input is
/// whitespace-tokenized so this only discards stray punctuation.
pub fn tokenize_line(line: &str) -> Vec<String> {
    Token::lexer(line)
        .filter_map(|tok| tok.ok())
        .filter_map(|tok| tok.text().map(str::to_string))
        .collect()
}
