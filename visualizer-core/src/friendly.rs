// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turning identifiers like `ReturnsZeroForOpposites` into readable labels.

/// Splits an identifier into words at camel-case boundaries.
///
/// A boundary is placed:
///
/// * before an uppercase letter that follows a lowercase letter (`getUser` -> `get`, `User`)
/// * between a digit and a letter, in either direction (`Version2` -> `Version`, `2`)
/// * before the last letter of an uppercase run when a lowercase letter follows it, so that
///   acronyms stay together (`HTTPServer` -> `HTTP`, `Server`)
///
/// Any other character (punctuation, whitespace, uncased letters) never starts a boundary and is
/// kept in the word it appears in, so concatenating the returned words always reproduces `name`.
/// An empty input produces no words.
pub fn split_words(name: &str) -> Vec<&str> {
    let chars: Vec<(usize, CharClass)> = name
        .char_indices()
        .map(|(idx, c)| (idx, CharClass::of(c)))
        .collect();

    let mut words = Vec::new();
    let mut start = 0;
    for (pos, window) in chars.windows(2).enumerate() {
        let (_, prev) = window[0];
        let (idx, current) = window[1];
        let next = chars.get(pos + 2).map(|&(_, class)| class);
        if is_boundary(prev, current, next) {
            words.push(&name[start..idx]);
            start = idx;
        }
    }
    if !name.is_empty() {
        words.push(&name[start..]);
    }

    words
}

/// Splits `name` into words and joins them with single spaces.
///
/// ```
/// use visualizer_core::friendly::friendly_name;
///
/// assert_eq!(friendly_name("GetUserById"), "Get User By Id");
/// ```
pub fn friendly_name(name: &str) -> String {
    split_words(name).join(" ")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CharClass {
    Lower,
    Upper,
    Digit,
    Other,
}

impl CharClass {
    fn of(c: char) -> Self {
        if c.is_lowercase() {
            Self::Lower
        } else if c.is_uppercase() {
            Self::Upper
        } else if c.is_numeric() {
            Self::Digit
        } else {
            Self::Other
        }
    }
}

fn is_boundary(prev: CharClass, current: CharClass, next: Option<CharClass>) -> bool {
    use CharClass::*;

    match (prev, current) {
        (Lower, Upper) => true,
        // The last letter of an acronym starts the next word: "HTTPServer".
        (Upper, Upper) => next == Some(Lower),
        (Digit, Lower | Upper) | (Lower | Upper, Digit) => true,
        _ => false,
    }
}
