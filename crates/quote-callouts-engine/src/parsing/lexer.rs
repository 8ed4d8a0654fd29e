//! Tokenizer for the title directive `[!type|param|param]-`.
//!
//! Like every lexer in this codebase it is lossless: every byte of the
//! input ends up in exactly one token, so the parser can slice the source by
//! span instead of re-assembling token text.

use std::ops::Range;

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveToken {
    /// `[!` opens a directive
    #[token("[!")]
    Open,

    /// A `[` that does not open a directive
    #[token("[")]
    Bracket,

    /// `|` separates type and parameters
    #[token("|")]
    Pipe,

    /// `]` closes the directive
    #[token("]")]
    Close,

    /// `+` after `]` forces expanded
    #[token("+")]
    Plus,

    /// `-` after `]` forces collapsed
    #[token("-")]
    Minus,

    #[regex(r"[ \t]+")]
    Whitespace,

    /// Anything else, grouped into runs
    #[regex(r"[^\[\]|+\- \t]+")]
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: DirectiveToken,
    pub text: &'a str,
    pub span: Range<usize>,
}

/// Lex `input`; bytes logos cannot match become `Text`.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = DirectiveToken::lexer(input);

    while let Some(result) = lexer.next() {
        let kind = result.unwrap_or(DirectiveToken::Text);
        tokens.push(Token {
            kind,
            text: lexer.slice(),
            span: lexer.span(),
        });
    }

    tokens
}
