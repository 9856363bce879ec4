//! Nesting-aware character scanner.
//!
//! Every split the parser performs (arguments on `,`, chains on `.`, the
//! ternary on `?`/`:`) goes through this scanner, so all of them agree on
//! what counts as "inside" a string, an array or an argument list.

use crate::error::{QueryError, Result};

/// One scanned character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Byte offset into the scanned text
    pub offset: usize,
    pub ch: char,
    /// True when the character sits outside every quote, bracket and paren.
    /// Openers and closers of an outermost group count as top level.
    pub top_level: bool,
}

pub struct Lexer<'a> {
    source: &'a str,
    input: Vec<(usize, char)>,
    position: usize,
    groups: Vec<(usize, char)>,
    quote: Option<(usize, char)>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source,
            input: source.char_indices().collect(),
            position: 0,
            groups: Vec::new(),
            quote: None,
        }
    }

    fn current_char(&self) -> Option<(usize, char)> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn is_top_level(&self) -> bool {
        self.groups.is_empty() && self.quote.is_none()
    }

    /// Scans the next character, tracking quote and bracket state.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        let Some((offset, ch)) = self.current_char() else {
            return Ok(None);
        };
        self.advance();

        if let Some((_, quote)) = self.quote {
            if ch == quote {
                self.quote = None;
                return Ok(Some(Token {
                    offset,
                    ch,
                    top_level: self.groups.is_empty(),
                }));
            }
            return Ok(Some(Token {
                offset,
                ch,
                top_level: false,
            }));
        }

        let top_level = match ch {
            '\'' | '"' => {
                let top_level = self.is_top_level();
                self.quote = Some((offset, ch));
                top_level
            }
            '(' | '[' => {
                let top_level = self.is_top_level();
                self.groups.push((offset, ch));
                top_level
            }
            ')' | ']' => {
                let expected = if ch == ')' { '(' } else { '[' };
                match self.groups.pop() {
                    Some((_, open)) if open == expected => {}
                    _ => {
                        return Err(QueryError::MalformedArgument(format!(
                            "unexpected '{}' at position {} in \"{}\"",
                            ch, offset, self.source
                        )));
                    }
                }
                self.groups.is_empty()
            }
            _ => self.is_top_level(),
        };

        Ok(Some(Token {
            offset,
            ch,
            top_level,
        }))
    }

    /// Fails if a quote or group is still open.
    pub fn finish(&self) -> Result<()> {
        if let Some((offset, quote)) = self.quote {
            return Err(QueryError::MalformedArgument(format!(
                "unterminated {} string starting at position {} in \"{}\"",
                quote, offset, self.source
            )));
        }
        if let Some((offset, open)) = self.groups.last() {
            return Err(QueryError::MalformedArgument(format!(
                "unclosed '{}' at position {} in \"{}\"",
                open, offset, self.source
            )));
        }
        Ok(())
    }

    /// Scans the whole input, failing on unbalanced nesting.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::with_capacity(self.input.len());
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        self.finish()?;
        Ok(tokens)
    }
}

/// Splits `source` on every top-level occurrence of `delimiter`.
///
/// Pieces are returned untrimmed. An empty source yields a single empty
/// piece; callers decide what that means.
///
/// ```
/// use dotquery::lexer::split;
///
/// let parts = split("a, 'b, c', [d, e]", ',').unwrap();
/// assert_eq!(parts, vec!["a", " 'b, c'", " [d, e]"]);
/// ```
pub fn split(source: &str, delimiter: char) -> Result<Vec<&str>> {
    let mut parts = Vec::new();
    let mut start = 0;
    for token in Lexer::new(source).tokenize()? {
        if token.top_level && token.ch == delimiter {
            parts.push(&source[start..token.offset]);
            start = token.offset + delimiter.len_utf8();
        }
    }
    parts.push(&source[start..]);
    Ok(parts)
}

/// Byte offset of the first top-level occurrence of `ch`.
pub fn find_top_level(source: &str, ch: char) -> Result<Option<usize>> {
    Ok(Lexer::new(source)
        .tokenize()?
        .into_iter()
        .find(|t| t.top_level && t.ch == ch)
        .map(|t| t.offset))
}
