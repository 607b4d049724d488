//! Placeholder scanning using `nom`.
//!
//! A placeholder is `$NAME$`, `$NAME|default:DEFAULT$` or
//! `$NAME|default:DEFAULT|TITLE$`, where none of the parts contain `$`, `|`
//! or `\`. A `$` directly preceded by `\` never opens a placeholder.
//! Anything that does not match is plain text.

use std::ops::Range;

use nom::{
    IResult, Parser,
    bytes::complete::{is_not, tag},
    character::complete::char,
    combinator::opt,
    sequence::{delimited, pair, preceded},
};

/// Characters that may not appear inside a name, default or title.
const RESERVED: &str = "$|\\";

/// One placeholder occurrence, borrowed from the scanned template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// Full occurrence text, delimiters included.
    pub text: &'a str,
    /// Field name.
    pub name: &'a str,
    /// Raw default, if declared.
    pub default: Option<&'a str>,
    /// Human label, if declared.
    pub title: Option<&'a str>,
    /// Byte offset of the opening `$`.
    pub start: usize,
}

impl Placeholder<'_> {
    /// Byte range of the occurrence within the template.
    #[must_use]
    pub const fn span(&self) -> Range<usize> {
        self.start..self.start + self.text.len()
    }
}

type Parts<'a> = (&'a str, Option<(&'a str, Option<&'a str>)>);

fn segment(input: &str) -> IResult<&str, &str> {
    is_not(RESERVED)(input)
}

/// Parses one placeholder starting at a `$`.
fn placeholder(input: &str) -> IResult<&str, Parts<'_>> {
    delimited(
        char('$'),
        pair(
            segment,
            opt(preceded(
                tag("|default:"),
                pair(segment, opt(preceded(char('|'), segment))),
            )),
        ),
        char('$'),
    )
    .parse(input)
}

/// Scans a template for placeholder occurrences.
///
/// Matches are non-overlapping and returned in document order. Malformed
/// placeholders are skipped silently and remain literal text.
pub fn scan(template: &str) -> Vec<Placeholder<'_>> {
    let bytes = template.as_bytes();
    let mut found = Vec::new();
    let mut pos = 0;

    while let Some(offset) = template[pos..].find('$') {
        let start = pos + offset;
        if start > 0 && bytes[start - 1] == b'\\' {
            pos = start + 1;
            continue;
        }

        match placeholder(&template[start..]) {
            Ok((rest, (name, tail))) => {
                let end = template.len() - rest.len();
                let (default, title) = tail.map_or((None, None), |(d, t)| (Some(d), t));
                found.push(Placeholder {
                    text: &template[start..end],
                    name,
                    default,
                    title,
                    start,
                });
                pos = end;
            }
            Err(_) => pos = start + 1,
        }
    }

    tracing::debug!(occurrences = found.len(), "scanned template placeholders");
    found
}
