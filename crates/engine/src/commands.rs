//! Chat command grammar.
//!
//! Rules:
//! - `h` / `help` (any case) => Help
//! - `lf` or `l f` => the ten most recent expenses of category `F`
//! - `f 250` => record 250 under category `F`
//!
//! Parsing is purely lexical: category codes and amounts are validated by
//! the dispatcher against its category table.

use crate::categories::QUERY_PREFIX;

/// A classified command, borrowing its tokens from the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Help,
    Recent { code: &'a str },
    Record { code: &'a str, amount: &'a str },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Starts like a query but has the wrong shape.
    #[error("malformed query")]
    MalformedQuery,
    /// Not two tokens.
    #[error("malformed record")]
    MalformedRecord,
}

pub fn parse_command(input: &str) -> Result<Command<'_>, ParseError> {
    let trimmed = input.trim();

    if trimmed.eq_ignore_ascii_case("h") || trimmed.eq_ignore_ascii_case("help") {
        return Ok(Command::Help);
    }

    let starts_with_query = trimmed
        .chars()
        .next()
        .is_some_and(|ch| ch.to_ascii_uppercase() == QUERY_PREFIX);
    if starts_with_query {
        return parse_recent(trimmed);
    }

    let mut tokens = trimmed.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(code), Some(amount), None) => Ok(Command::Record { code, amount }),
        _ => Err(ParseError::MalformedRecord),
    }
}

fn parse_recent(trimmed: &str) -> Result<Command<'_>, ParseError> {
    let mut tokens = trimmed.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
        // Compact form: `lf`.
        (Some(token), None, None) if token.chars().count() == 2 => {
            let split = token
                .char_indices()
                .nth(1)
                .map(|(idx, _)| idx)
                .ok_or(ParseError::MalformedQuery)?;
            Ok(Command::Recent {
                code: &token[split..],
            })
        }
        // Spaced form: `l f`.
        (Some(prefix), Some(code), None)
            if prefix.chars().count() == 1 && code.chars().count() == 1 =>
        {
            Ok(Command::Recent { code })
        }
        _ => Err(ParseError::MalformedQuery),
    }
}
