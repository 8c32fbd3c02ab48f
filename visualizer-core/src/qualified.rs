// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsing nesting paths out of qualified test names.
//!
//! Test runners write the names of tests in nested classes with a `+` between the enclosing and
//! the nested type, for example `Shop.Tests.Cart+WhenEmpty.HasZeroTotal`. The nesting path of
//! that name is `[Cart, WhenEmpty]`.

use crate::errors::{MalformedTestName, MalformedTestNameKind};
use smallvec::SmallVec;

/// The delimiter between an enclosing type and a nested type.
pub const NESTING_DELIMITER: char = '+';

const NAMESPACE_DELIMITER: char = '.';

/// Returns true if `name` contains the nesting delimiter.
pub fn is_nested(name: &str) -> bool {
    name.contains(NESTING_DELIMITER)
}

/// Returns true if `name` is a display name supplied by the test framework.
///
/// Display names contain a space and are never decomposed into a nesting path.
pub fn has_display_name(name: &str) -> bool {
    name.contains(' ')
}

/// The type segments a nested test name decomposes into, outermost first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NestingPath<'a> {
    segments: SmallVec<[&'a str; 2]>,
}

impl<'a> NestingPath<'a> {
    /// Parses the nesting path of `name`, returning an error if any segment is missing its `.`
    /// delimiter.
    pub fn parse(name: &'a str) -> Result<Self, MalformedTestName> {
        match Self::parse_lenient(name) {
            (path, None) => Ok(path),
            (_, Some(error)) => Err(error),
        }
    }

    /// Parses the nesting path of `name`, falling back to whole substrings where a `.` delimiter
    /// is missing.
    ///
    /// The path has one segment per `+`-separated boundary:
    ///
    /// * the first segment is the short name of the outermost type: the part before the first `+`,
    ///   after its last `.`
    /// * types between two `+` delimiters are taken whole
    /// * the last segment is the innermost type: the part after the last `+`, before its first `.`
    ///
    /// If the first or last part does not contain a `.`, the whole part is used as the segment and
    /// the problem is returned alongside the path. A name without a `+` produces an empty path.
    pub fn parse_lenient(name: &'a str) -> (Self, Option<MalformedTestName>) {
        let mut parts = name.split(NESTING_DELIMITER);
        // split always yields at least one part.
        let outer = parts.next().unwrap_or(name);
        let rest: SmallVec<[&'a str; 2]> = parts.collect();
        let Some((&inner, middle)) = rest.split_last() else {
            return (
                Self {
                    segments: SmallVec::new(),
                },
                Some(MalformedTestName::new(name, MalformedTestNameKind::NotNested)),
            );
        };

        let (outer, has_namespace) = match outer.rsplit_once(NAMESPACE_DELIMITER) {
            Some((_, short_name)) => (short_name, true),
            None => (outer, false),
        };
        let (inner, has_member) = match inner.split_once(NAMESPACE_DELIMITER) {
            Some((type_name, _)) => (type_name, true),
            None => (inner, false),
        };

        let mut segments = SmallVec::with_capacity(rest.len() + 1);
        segments.push(outer);
        segments.extend_from_slice(middle);
        segments.push(inner);

        let kind = match (has_namespace, has_member) {
            (true, true) => None,
            (false, true) => Some(MalformedTestNameKind::NoNamespace),
            (true, false) => Some(MalformedTestNameKind::NoMember),
            (false, false) => Some(MalformedTestNameKind::NoDelimiters),
        };

        (
            Self { segments },
            kind.map(|kind| MalformedTestName::new(name, kind)),
        )
    }

    /// Returns the segments, outermost first.
    pub fn segments(&self) -> &[&'a str] {
        &self.segments
    }

    /// Returns the number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if there are no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Iterates over the segments, outermost first.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &'a str> + '_ {
        self.segments.iter().copied()
    }
}
