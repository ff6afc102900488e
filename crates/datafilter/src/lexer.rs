//! Lexer (tokenizer) for clause text.
//!
//! A clause is `field op value`. The lexer splits it into whitespace-separated
//! words and quoted strings, remembering where each token sits in the input
//! so the parser can slice the original text around the operator.

use std::iter::Peekable;
use std::str::CharIndices;

/// A token in a clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClauseToken {
    /// A run of non-whitespace characters.
    Word(String),

    /// A string in single or double quotes, with escapes resolved.
    Quoted {
        /// The unquoted contents.
        text: String,
        /// Whether the closing quote was found.
        closed: bool,
    },
}

/// A token with its byte span in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedToken {
    /// The token.
    pub token: ClauseToken,
    /// Byte offset where the token starts.
    pub start: usize,
    /// Byte offset just past the token.
    pub end: usize,
}

/// Lexer for clause text.
pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    /// Byte offset of the next unread character.
    fn offset(&mut self) -> usize {
        self.chars
            .peek()
            .map(|&(i, _)| i)
            .unwrap_or(self.input.len())
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(&(_, c)) = self.chars.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.chars.next();
        }
    }

    /// Reads a word up to the next whitespace.
    fn read_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_whitespace() {
                break;
            }
            word.push(c);
            self.chars.next();
        }
        word
    }

    /// Reads a quoted string. The opening quote has not been consumed yet.
    fn read_quoted_string(&mut self, quote_char: char) -> ClauseToken {
        self.chars.next();

        let mut text = String::new();
        while let Some((_, c)) = self.chars.next() {
            if c == quote_char {
                return ClauseToken::Quoted { text, closed: true };
            }
            if c == '\\' {
                if let Some((_, escaped)) = self.chars.next() {
                    text.push(escaped);
                }
            } else {
                text.push(c);
            }
        }
        ClauseToken::Quoted {
            text,
            closed: false,
        }
    }

    /// Tokenizes the whole input.
    pub fn tokenize(mut self) -> Vec<PositionedToken> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let start = self.offset();
            let Some(&(_, c)) = self.chars.peek() else {
                break;
            };
            let token = if c == '"' || c == '\'' {
                self.read_quoted_string(c)
            } else {
                ClauseToken::Word(self.read_word())
            };
            let end = self.offset();
            tokens.push(PositionedToken { token, start, end });
        }
        tokens
    }
}

/// Reads `raw` as a single quoted string if it is one.
///
/// Returns `None` when `raw` does not start with a quote, and
/// `Some((text, closed))` otherwise. A quoted string followed by more text is
/// not a single quoted string and also yields `None`.
pub fn read_whole_quoted(raw: &str) -> Option<(String, bool)> {
    let tokens = Lexer::new(raw).tokenize();
    match tokens.as_slice() {
        [PositionedToken {
            token: ClauseToken::Quoted { text, closed },
            start: 0,
            ..
        }] => Some((text.clone(), *closed)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<ClauseToken> {
        Lexer::new(input)
            .tokenize()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_words() {
        assert_eq!(
            tokens("uid eq alice"),
            vec![
                ClauseToken::Word("uid".into()),
                ClauseToken::Word("eq".into()),
                ClauseToken::Word("alice".into()),
            ]
        );
    }

    #[test]
    fn test_quoted_string_with_spaces() {
        assert_eq!(
            tokens(r#"cn eq "Jane Doe""#),
            vec![
                ClauseToken::Word("cn".into()),
                ClauseToken::Word("eq".into()),
                ClauseToken::Quoted {
                    text: "Jane Doe".into(),
                    closed: true
                },
            ]
        );
    }

    #[test]
    fn test_single_quotes_and_escapes() {
        assert_eq!(
            tokens(r"'it\'s'"),
            vec![ClauseToken::Quoted {
                text: "it's".into(),
                closed: true
            }]
        );
    }

    #[test]
    fn test_unterminated_quote() {
        assert_eq!(
            tokens("\"open"),
            vec![ClauseToken::Quoted {
                text: "open".into(),
                closed: false
            }]
        );
    }

    #[test]
    fn test_positions_are_byte_offsets() {
        let toks = Lexer::new("  né eq 1").tokenize();
        assert_eq!(toks[0].start, 2);
        assert_eq!(toks[0].end, 5);
        assert_eq!(toks[1].start, 6);
        assert_eq!(toks[2].start, 9);
    }

    #[test]
    fn test_read_whole_quoted() {
        assert_eq!(read_whole_quoted("\"abc\""), Some(("abc".into(), true)));
        assert_eq!(read_whole_quoted("\"abc"), Some(("abc".into(), false)));
        assert_eq!(read_whole_quoted("abc"), None);
        assert_eq!(read_whole_quoted("\"a\" b"), None);
    }
}
