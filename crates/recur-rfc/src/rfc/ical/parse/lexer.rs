//! Content line lexer for recurrence data (RFC 5545 §3.1).
//!
//! Handles line unfolding and splits each line into name, parameters and
//! raw value. Value interpretation happens in [`super::values`].

use super::error::{ParseError, ParseErrorKind, ParseResult};
use crate::rfc::ical::core::{ContentLine, Parameter};

/// Splits input into content lines, merging folded continuations.
///
/// Handles both CRLF and bare LF line endings. Lines starting with SP/HTAB
/// continue the previous line with the single whitespace character removed.
/// Blank lines are dropped. Each entry carries the 1-based number of the
/// physical line it started on.
#[must_use]
pub fn split_lines(input: &str) -> Vec<(usize, String)> {
    let mut lines: Vec<(usize, String)> = Vec::new();

    for (i, raw_line) in input.lines().enumerate() {
        let line = raw_line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        if let Some(continuation) = line.strip_prefix([' ', '\t']) {
            if let Some((_, prev)) = lines.last_mut() {
                prev.push_str(continuation);
                continue;
            }
        }
        lines.push((i + 1, line.trim_start().to_string()));
    }

    lines
}

/// Parses a single content line.
///
/// Format: `name *(";" param) ":" value`
///
/// ## Errors
/// Returns an error if the name or a parameter is malformed, a quoted
/// parameter value is never closed, or the colon separator is missing.
pub fn parse_content_line(line: &str, line_num: usize) -> ParseResult<ContentLine> {
    let colon = head_end(line)
        .map_err(|quote| ParseError::new(ParseErrorKind::UnclosedQuote, line_num, quote + 1))?
        .ok_or_else(|| ParseError::new(ParseErrorKind::MissingColon, line_num, line.len()))?;

    let head = &line[..colon];
    let raw_value = &line[colon + 1..];

    let mut segments = split_unquoted(head, ';').into_iter();
    let (_, name) = segments.next().unwrap_or((0, ""));
    if name.is_empty() {
        return Err(ParseError::new(
            ParseErrorKind::MissingPropertyName,
            line_num,
            1,
        ));
    }
    if let Some(bad) = name.find(|c: char| !is_name_char(c)) {
        return Err(ParseError::new(
            ParseErrorKind::InvalidPropertyName,
            line_num,
            bad + 1,
        ));
    }

    let params = segments
        .map(|(offset, segment)| parse_parameter(segment, offset, line_num))
        .collect::<ParseResult<Vec<_>>>()?;

    Ok(ContentLine {
        name: name.to_ascii_uppercase(),
        params,
        raw_value: raw_value.to_string(),
        value_offset: colon + 1,
    })
}

/// Parses `NAME=value[,value]` starting at byte `offset` of the line.
fn parse_parameter(segment: &str, offset: usize, line_num: usize) -> ParseResult<Parameter> {
    let invalid = |at: usize| ParseError::new(ParseErrorKind::InvalidParameter, line_num, at + 1);

    let (name, values) = segment.split_once('=').ok_or_else(|| invalid(offset))?;
    if name.is_empty() {
        return Err(invalid(offset));
    }
    if let Some(bad) = name.find(|c: char| !is_name_char(c)) {
        return Err(invalid(offset + bad));
    }

    let values_offset = offset + name.len() + 1;
    let values = split_unquoted(values, ',')
        .into_iter()
        .map(|(at, raw)| {
            unquote(raw).ok_or_else(|| {
                invalid(values_offset + at).with_context(format!("malformed value `{raw}`"))
            })
        })
        .collect::<ParseResult<Vec<_>>>()?;

    Ok(Parameter::with_values(name, values))
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

/// Finds the first colon outside double quotes.
///
/// Returns `Err` with the offset of a quote that is still open at the end of
/// the line.
fn head_end(line: &str) -> Result<Option<usize>, usize> {
    let mut open_quote = None;
    for (i, c) in line.char_indices() {
        match c {
            '"' => open_quote = if open_quote.is_some() { None } else { Some(i) },
            ':' if open_quote.is_none() => return Ok(Some(i)),
            _ => {}
        }
    }
    open_quote.map_or(Ok(None), Err)
}

/// Splits on `delim` outside double quotes, keeping each piece's offset.
fn split_unquoted(s: &str, delim: char) -> Vec<(usize, &str)> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    for (i, c) in s.char_indices() {
        if c == '"' {
            quoted = !quoted;
        } else if c == delim && !quoted {
            pieces.push((start, &s[start..i]));
            start = i + c.len_utf8();
        }
    }
    pieces.push((start, &s[start..]));
    pieces
}

/// Strips surrounding quotes and decodes RFC 6868 caret escapes.
///
/// Returns `None` for a value with a stray quote inside it.
fn unquote(raw: &str) -> Option<String> {
    let inner = match raw.strip_prefix('"') {
        Some(rest) => rest.strip_suffix('"')?,
        None => raw,
    };
    if inner.contains('"') {
        return None;
    }

    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '^' {
            value.push(c);
            continue;
        }
        match chars.peek() {
            Some('^') => value.push('^'),
            Some('n' | 'N') => value.push('\n'),
            Some('\'') => value.push('"'),
            _ => {
                value.push('^');
                continue;
            }
        }
        chars.next();
    }
    Some(value)
}
