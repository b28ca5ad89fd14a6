//! Span-based scanner turning a filter expression into a token stream.
//!
//! Tokenization never fails: an unterminated quoted literal simply yields
//! whatever was read before the input ran out, leaving the parser to
//! surface the resulting structural error (a dangling literal will not
//! satisfy whatever grammar rule expected something after it).

use crate::token::{Token, TokenKind};

const LOGICAL_WORDS: &[&str] = &["and", "or", "not"];
const OPERATOR_WORDS: &[&str] = &[
    "eq",
    "ne",
    "gt",
    "ge",
    "lt",
    "le",
    "contains",
    "startswith",
    "endswith",
];

pub fn tokenize(input: &str) -> Vec<Token> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let len = chars.len();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < len {
        let (pos, ch) = chars[i];

        if ch.is_whitespace() {
            i += 1;
            continue;
        }

        match ch {
            '(' => {
                tokens.push(Token::new(TokenKind::LParen, "(", pos));
                i += 1;
            }
            ')' => {
                tokens.push(Token::new(TokenKind::RParen, ")", pos));
                i += 1;
            }
            ',' => {
                tokens.push(Token::new(TokenKind::Comma, ",", pos));
                i += 1;
            }
            '\'' | '"' => {
                let (literal, next_i) = scan_string(&chars, i, ch);
                tokens.push(Token::new(TokenKind::Value, literal, pos));
                i = next_i;
            }
            _ => {
                let (word, next_i) = scan_word(&chars, i);
                tokens.push(classify_word(&word, pos));
                i = next_i;
            }
        }
    }

    let end_pos = chars.last().map(|(p, c)| p + c.len_utf8()).unwrap_or(0);
    tokens.push(Token::new(TokenKind::End, "", end_pos));
    tokens
}

/// Scans a quoted literal starting at the opening quote (index `start`).
/// Returns the decoded literal body and the index just past the closing
/// quote (or past the end of input, if unterminated).
fn scan_string(chars: &[(usize, char)], start: usize, quote: char) -> (String, usize) {
    let mut i = start + 1;
    let len = chars.len();
    let content_start = i;
    let mut has_escape = false;

    // Fast-path scan: find the matching quote, noting whether a backslash
    // appears before it.
    while i < len {
        let (_, c) = chars[i];
        if c == '\\' {
            has_escape = true;
        } else if c == quote {
            break;
        }
        i += 1;
    }

    if !has_escape {
        let literal: String = chars[content_start..i].iter().map(|(_, c)| *c).collect();
        let next_i = if i < len { i + 1 } else { i };
        return (literal, next_i);
    }

    // Slow path: re-walk the span, collapsing `\x` to `x` for any `x`.
    let mut out = String::new();
    let mut j = content_start;
    while j < len {
        let (_, c) = chars[j];
        if c == quote {
            return (out, j + 1);
        }
        if c == '\\' && j + 1 < len {
            let (_, escaped) = chars[j + 1];
            out.push(escaped);
            j += 2;
        } else {
            out.push(c);
            j += 1;
        }
    }
    (out, j)
}

/// Scans a run of non-whitespace, non-structural characters starting at
/// `start`. Returns the word and the index just past it.
fn scan_word(chars: &[(usize, char)], start: usize) -> (String, usize) {
    let len = chars.len();
    let mut i = start;
    while i < len {
        let (_, c) = chars[i];
        if c.is_whitespace() || matches!(c, '(' | ')' | ',') {
            break;
        }
        i += 1;
    }
    let word: String = chars[start..i].iter().map(|(_, c)| *c).collect();
    (word, i)
}

fn classify_word(word: &str, position: usize) -> Token {
    let lower = word.to_ascii_lowercase();
    if LOGICAL_WORDS.contains(&lower.as_str()) {
        Token::new(TokenKind::Logical, word, position)
    } else if OPERATOR_WORDS.contains(&lower.as_str()) {
        Token::new(TokenKind::Operator, word, position)
    } else if lower == "true" || lower == "false" || lower == "null" || looks_like_number(word) {
        Token::new(TokenKind::Value, word, position)
    } else {
        Token::new(TokenKind::Property, word, position)
    }
}

/// Optional sign, digits, optional `.`, optional digits, for classification
/// only; the coercer does the authoritative parse later.
fn looks_like_number(word: &str) -> bool {
    let mut chars = word.chars().peekable();
    match chars.peek() {
        Some('+') | Some('-') => {
            chars.next();
        }
        _ => {}
    }
    let mut saw_digit = false;
    let mut saw_dot = false;
    for c in chars {
        if c.is_ascii_digit() {
            saw_digit = true;
        } else if c == '.' && !saw_dot {
            saw_dot = true;
        } else {
            return false;
        }
    }
    saw_digit
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn simple_comparison() {
        let tokens = tokenize("Age eq 30");
        assert_eq!(
            kinds("Age eq 30"),
            vec![
                TokenKind::Property,
                TokenKind::Operator,
                TokenKind::Value,
                TokenKind::End
            ]
        );
        assert_eq!(tokens[0].lexeme, "Age");
        assert_eq!(tokens[2].lexeme, "30");
    }

    #[test]
    fn quoted_literal_fast_path() {
        let tokens = tokenize("FirstName eq 'John'");
        assert_eq!(tokens[2].lexeme, "John");
    }

    #[test]
    fn quoted_literal_with_escape() {
        let tokens = tokenize(r"Name eq 'O\'Brien'");
        assert_eq!(tokens[2].lexeme, "O'Brien");
    }

    #[test]
    fn preserves_internal_whitespace_in_quotes() {
        let tokens = tokenize("Name eq '  spaced  '");
        assert_eq!(tokens[2].lexeme, "  spaced  ");
    }

    #[test]
    fn function_call_shape() {
        let tokens = tokenize("contains(FirstName, 'oh')");
        assert_eq!(
            kinds("contains(FirstName, 'oh')"),
            vec![
                TokenKind::Operator,
                TokenKind::LParen,
                TokenKind::Property,
                TokenKind::Comma,
                TokenKind::Value,
                TokenKind::RParen,
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(kinds("Age EQ 30")[1], TokenKind::Operator);
        assert_eq!(kinds("Age eq TRUE")[2], TokenKind::Value);
    }

    #[test]
    fn unterminated_literal_yields_what_was_read() {
        let tokens = tokenize("Name eq 'unterminated");
        assert_eq!(tokens[2].lexeme, "unterminated");
        assert_eq!(tokens.last().unwrap().kind, TokenKind::End);
    }
}
