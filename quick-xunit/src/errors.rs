// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

/// An error that occurs while reading an xUnit report.
///
/// Returned by [`Assemblies::from_str`](crate::Assemblies::from_str) and
/// [`Assemblies::from_reader`](crate::Assemblies::from_reader).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeserializeError {
    /// The document is not well-formed XML.
    #[error("error reading xUnit report XML")]
    Xml {
        /// The underlying error.
        #[from]
        err: quick_xml::Error,
    },

    /// The document did not contain a root element.
    #[error("xUnit report is empty (expected an `<assemblies>` root element)")]
    MissingRoot,

    /// The root element was not `<assemblies>`.
    #[error("unexpected root element `<{found}>` (expected `<assemblies>`)")]
    UnexpectedRoot {
        /// The name of the root element that was found.
        found: String,
    },

    /// The document ended before an element was closed.
    #[error("unexpected end of document inside `<{element}>`")]
    UnexpectedEof {
        /// The element that was still open.
        element: &'static str,
    },

    /// A known attribute had a value that could not be parsed.
    #[error("invalid value `{value}` for attribute `{attribute}` on `<{element}>`")]
    InvalidAttribute {
        /// The element the attribute was found on.
        element: &'static str,
        /// The name of the attribute.
        attribute: &'static str,
        /// The raw attribute value.
        value: String,
    },
}

impl From<quick_xml::events::attributes::AttrError> for DeserializeError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml { err: err.into() }
    }
}
