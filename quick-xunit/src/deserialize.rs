// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deserialize an `Assemblies` report.

use crate::{
    Assemblies, Assembly, AssemblyError, Collection, DeserializeError, Failure, Test, Trait,
};
use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};

static ASSEMBLIES_TAG: &str = "assemblies";
static ASSEMBLY_TAG: &str = "assembly";
static COLLECTION_TAG: &str = "collection";
static TEST_TAG: &str = "test";
static TRAITS_TAG: &str = "traits";
static TRAIT_TAG: &str = "trait";
static FAILURE_TAG: &str = "failure";
static ERRORS_TAG: &str = "errors";
static ERROR_TAG: &str = "error";
static WARNINGS_TAG: &str = "warnings";
static TEXT_TAG: &str = "text";

type Result<T, E = DeserializeError> = std::result::Result<T, E>;

/// A child element that has just been opened.
struct Child<'a> {
    start: BytesStart<'a>,
    // True for self-closing elements, which have no content to read.
    empty: bool,
}

impl<'a> Child<'a> {
    fn is(&self, tag: &str) -> bool {
        self.start.local_name().as_ref() == tag.as_bytes()
    }

    fn skip(&self, reader: &mut Reader<&'a [u8]>) -> Result<()> {
        if !self.empty {
            reader.read_to_end(self.start.name())?;
        }
        Ok(())
    }

    fn text(&self, reader: &mut Reader<&'a [u8]>) -> Result<String> {
        if self.empty {
            Ok(String::new())
        } else {
            read_text(reader)
        }
    }
}

pub(crate) fn deserialize_report(input: &str) -> Result<Assemblies> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    loop {
        let (start, empty) = match reader.read_event()? {
            Event::Start(start) => (start, false),
            Event::Empty(start) => (start, true),
            Event::Eof => return Err(DeserializeError::MissingRoot),
            // Declarations, comments, doctypes and processing instructions before the root.
            _ => continue,
        };

        let root = Child { start, empty };
        if !root.is(ASSEMBLIES_TAG) {
            return Err(DeserializeError::UnexpectedRoot {
                found: String::from_utf8_lossy(root.start.local_name().as_ref()).into_owned(),
            });
        }

        return deserialize_assemblies(&mut reader, &root);
    }
}

fn deserialize_assemblies<'a>(reader: &mut Reader<&'a [u8]>, root: &Child<'a>) -> Result<Assemblies> {
    let mut report = Assemblies::default();
    for_each_attribute(&root.start, |key, value| {
        match key {
            b"computer" => report.computer = Some(value),
            b"user" => report.user = Some(value),
            b"start-rtf" => report.start_rtf = Some(value),
            b"finish-rtf" => report.finish_rtf = Some(value),
            b"timestamp" => report.timestamp = Some(value),
            b"id" => report.id = Some(value),
            b"schema-version" => report.schema_version = Some(value),
            _ => {}
        }
        Ok(())
    })?;

    if !root.empty {
        read_children(reader, ASSEMBLIES_TAG, |reader, child| {
            if child.is(ASSEMBLY_TAG) {
                report.assemblies.push(deserialize_assembly(reader, &child)?);
                Ok(())
            } else {
                child.skip(reader)
            }
        })?;
    }

    Ok(report)
}

fn deserialize_assembly<'a>(reader: &mut Reader<&'a [u8]>, child: &Child<'a>) -> Result<Assembly> {
    let mut assembly = Assembly::default();
    for_each_attribute(&child.start, |key, value| {
        match key {
            b"name" => assembly.name = value,
            b"config-file" => assembly.config_file = Some(value),
            b"environment" => assembly.environment = Some(value),
            b"id" => assembly.id = Some(value),
            b"run-date" => assembly.run_date = Some(value),
            b"run-time" => assembly.run_time = Some(value),
            b"target-framework" => assembly.target_framework = Some(value),
            b"test-framework" => assembly.test_framework = Some(value),
            b"start-rtf" => assembly.start_rtf = Some(value),
            b"finish-rtf" => assembly.finish_rtf = Some(value),
            b"time-rtf" => assembly.time_rtf = Some(value),
            b"time" => assembly.time = Some(parse_seconds(ASSEMBLY_TAG, "time", value)?),
            b"total" => assembly.total = parse_count(ASSEMBLY_TAG, "total", value)?,
            b"passed" => assembly.passed = parse_count(ASSEMBLY_TAG, "passed", value)?,
            b"failed" => assembly.failed = parse_count(ASSEMBLY_TAG, "failed", value)?,
            b"skipped" => assembly.skipped = parse_count(ASSEMBLY_TAG, "skipped", value)?,
            b"not-run" => assembly.not_run = parse_count(ASSEMBLY_TAG, "not-run", value)?,
            b"errors" => assembly.error_count = parse_count(ASSEMBLY_TAG, "errors", value)?,
            _ => {}
        }
        Ok(())
    })?;

    if !child.empty {
        read_children(reader, ASSEMBLY_TAG, |reader, child| {
            if child.is(COLLECTION_TAG) {
                assembly
                    .collections
                    .push(deserialize_collection(reader, &child)?);
            } else if child.is(ERRORS_TAG) && !child.empty {
                read_children(reader, ERRORS_TAG, |reader, child| {
                    if child.is(ERROR_TAG) {
                        assembly.errors.push(deserialize_error(reader, &child)?);
                        Ok(())
                    } else {
                        child.skip(reader)
                    }
                })?;
            } else {
                child.skip(reader)?;
            }
            Ok(())
        })?;
    }

    Ok(assembly)
}

fn deserialize_collection<'a>(
    reader: &mut Reader<&'a [u8]>,
    child: &Child<'a>,
) -> Result<Collection> {
    let mut collection = Collection::default();
    for_each_attribute(&child.start, |key, value| {
        match key {
            b"id" => collection.id = Some(value),
            b"name" => collection.name = value,
            b"time" => collection.time = Some(parse_seconds(COLLECTION_TAG, "time", value)?),
            b"total" => collection.total = parse_count(COLLECTION_TAG, "total", value)?,
            b"passed" => collection.passed = parse_count(COLLECTION_TAG, "passed", value)?,
            b"failed" => collection.failed = parse_count(COLLECTION_TAG, "failed", value)?,
            b"skipped" => collection.skipped = parse_count(COLLECTION_TAG, "skipped", value)?,
            b"not-run" => collection.not_run = parse_count(COLLECTION_TAG, "not-run", value)?,
            _ => {}
        }
        Ok(())
    })?;

    if !child.empty {
        read_children(reader, COLLECTION_TAG, |reader, child| {
            if child.is(TEST_TAG) {
                collection.tests.push(deserialize_test(reader, &child)?);
                Ok(())
            } else {
                child.skip(reader)
            }
        })?;
    }

    Ok(collection)
}

fn deserialize_test<'a>(reader: &mut Reader<&'a [u8]>, child: &Child<'a>) -> Result<Test> {
    let mut test = Test::default();
    for_each_attribute(&child.start, |key, value| {
        match key {
            b"id" => test.id = Some(value),
            b"name" => test.name = value,
            b"method" => test.method = Some(value),
            b"type" => test.type_name = Some(value),
            b"result" => test.result = value,
            b"time" => test.time = parse_seconds(TEST_TAG, "time", value)?,
            b"time-rtf" => test.time_rtf = Some(value),
            b"source-file" => test.source_file = Some(value),
            b"source-line" => test.source_line = Some(value),
            _ => {}
        }
        Ok(())
    })?;

    if !child.empty {
        read_children(reader, TEST_TAG, |reader, child| {
            match child.start.local_name().as_ref() {
                b"failure" => test.failure = Some(deserialize_failure(reader, &child)?),
                b"output" => test.output = Some(child.text(reader)?),
                b"reason" => test.reason = Some(child.text(reader)?),
                b"traits" if !child.empty => {
                    read_children(reader, TRAITS_TAG, |reader, child| {
                        if child.is(TRAIT_TAG) {
                            test.traits.push(deserialize_trait(&child)?);
                        }
                        // Traits are always self-closing, but tolerate content.
                        child.skip(reader)
                    })?;
                }
                b"warnings" if !child.empty => {
                    read_children(reader, WARNINGS_TAG, |reader, child| {
                        test.warnings.push(child.text(reader)?);
                        Ok(())
                    })?;
                }
                _ => child.skip(reader)?,
            }
            Ok(())
        })?;
    }

    Ok(test)
}

fn deserialize_trait(child: &Child<'_>) -> Result<Trait> {
    let mut xunit_trait = Trait::default();
    for_each_attribute(&child.start, |key, value| {
        match key {
            b"name" => xunit_trait.name = value,
            b"value" => xunit_trait.value = value,
            _ => {}
        }
        Ok(())
    })?;
    Ok(xunit_trait)
}

fn deserialize_failure<'a>(reader: &mut Reader<&'a [u8]>, child: &Child<'a>) -> Result<Failure> {
    let mut failure = Failure::default();
    for_each_attribute(&child.start, |key, value| {
        if key == b"exception-type" {
            failure.exception_type = Some(value);
        }
        Ok(())
    })?;

    if !child.empty {
        read_children(reader, FAILURE_TAG, |reader, child| {
            match child.start.local_name().as_ref() {
                b"message" => failure.message = Some(child.text(reader)?),
                b"stack-trace" => failure.stack_trace = Some(child.text(reader)?),
                _ => child.skip(reader)?,
            }
            Ok(())
        })?;
    }

    Ok(failure)
}

fn deserialize_error<'a>(reader: &mut Reader<&'a [u8]>, child: &Child<'a>) -> Result<AssemblyError> {
    let mut error = AssemblyError::default();
    for_each_attribute(&child.start, |key, value| {
        match key {
            b"name" => error.name = Some(value),
            b"type" => error.error_type = Some(value),
            _ => {}
        }
        Ok(())
    })?;

    if !child.empty {
        read_children(reader, ERROR_TAG, |reader, child| {
            if child.is(FAILURE_TAG) {
                error.failure = Some(deserialize_failure(reader, &child)?);
                Ok(())
            } else {
                child.skip(reader)
            }
        })?;
    }

    Ok(error)
}

// ---
// Helper methods
// ---

/// Calls `on_child` for every direct child element, until the end tag of the current element.
///
/// The reader checks that end tags match, so the first end tag seen at this level closes
/// `element`.
fn read_children<'a>(
    reader: &mut Reader<&'a [u8]>,
    element: &'static str,
    mut on_child: impl FnMut(&mut Reader<&'a [u8]>, Child<'a>) -> Result<()>,
) -> Result<()> {
    loop {
        match reader.read_event()? {
            Event::Start(start) => on_child(reader, Child { start, empty: false })?,
            Event::Empty(start) => on_child(reader, Child { start, empty: true })?,
            Event::End(_) => return Ok(()),
            Event::Eof => return Err(DeserializeError::UnexpectedEof { element }),
            _ => {}
        }
    }
}

/// Reads the text content of the current element, accepting both escaped text and CDATA.
///
/// Nested markup is skipped.
fn read_text(reader: &mut Reader<&[u8]>) -> Result<String> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(contents) => text.push_str(&contents.unescape()?),
            Event::CData(contents) => text.push_str(&String::from_utf8_lossy(&contents)),
            Event::Start(start) => {
                reader.read_to_end(start.name())?;
            }
            Event::End(_) => return Ok(text),
            Event::Eof => return Err(DeserializeError::UnexpectedEof { element: TEXT_TAG }),
            _ => {}
        }
    }
}

fn for_each_attribute(
    start: &BytesStart<'_>,
    mut f: impl FnMut(&[u8], String) -> Result<()>,
) -> Result<()> {
    for attribute in start.attributes() {
        let attribute = attribute?;
        let value = attribute.unescape_value()?.into_owned();
        f(attribute.key.as_ref(), value)?;
    }
    Ok(())
}

fn parse_count(element: &'static str, attribute: &'static str, value: String) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| DeserializeError::InvalidAttribute {
            element,
            attribute,
            value,
        })
}

fn parse_seconds(element: &'static str, attribute: &'static str, value: String) -> Result<f64> {
    match value.trim().parse::<f64>() {
        Ok(seconds) if seconds.is_finite() => Ok(seconds),
        _ => Err(DeserializeError::InvalidAttribute {
            element,
            attribute,
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn empty_root() {
        let report = deserialize_report("<assemblies/>").expect("empty root is valid");
        assert_eq!(report, Assemblies::default());
    }

    #[test]
    fn root_attributes() {
        let report = deserialize_report(indoc! {r#"
            <?xml version="1.0" encoding="utf-8"?>
            <!-- written by the console runner -->
            <assemblies computer="build-01" user="ci" start-rtf="2023-05-01T10:00:00.0000000+02:00"
                        timestamp="05/01/2023 10:00:03" schema-version="2" unknown="ignored">
            </assemblies>
        "#})
        .expect("report is valid");

        assert_eq!(report.computer.as_deref(), Some("build-01"));
        assert_eq!(report.user.as_deref(), Some("ci"));
        assert_eq!(
            report.start_rtf.as_deref(),
            Some("2023-05-01T10:00:00.0000000+02:00")
        );
        assert_eq!(report.finish_rtf, None);
        assert_eq!(report.timestamp.as_deref(), Some("05/01/2023 10:00:03"));
        assert_eq!(report.schema_version.as_deref(), Some("2"));
        assert!(report.assemblies.is_empty());
    }

    #[test]
    fn test_with_children() {
        let report = deserialize_report(indoc! {r#"
            <assemblies>
              <assembly name="/src/Tests.dll" total="1" failed="1" time="0.250">
                <collection name="Test collection for Tests.Math" total="1" failed="1">
                  <test name="Tests.Math+Adding.ShouldSum" type="Tests.Math+Adding" method="ShouldSum"
                        result="Fail" time="0.0123">
                    <traits>
                      <trait name="Category" value="Unit" />
                      <trait name="Owner" value="A &amp; B" />
                    </traits>
                    <failure exception-type="Xunit.Sdk.EqualException">
                      <message><![CDATA[Assert.Equal() Failure]]></message>
                      <stack-trace>at Tests.Math.Adding.ShouldSum() in Math.cs:line 12</stack-trace>
                    </failure>
                    <output>some &lt;output&gt;</output>
                    <warnings><warning>first</warning><warning>second</warning></warnings>
                  </test>
                </collection>
              </assembly>
            </assemblies>
        "#})
        .expect("report is valid");

        let assembly = &report.assemblies[0];
        assert_eq!(assembly.name, "/src/Tests.dll");
        assert_eq!(assembly.total, 1);
        assert_eq!(assembly.failed, 1);
        assert_eq!(assembly.time, Some(0.25));

        let test = &assembly.collections[0].tests[0];
        assert_eq!(
            test,
            &Test {
                id: None,
                name: "Tests.Math+Adding.ShouldSum".to_owned(),
                method: Some("ShouldSum".to_owned()),
                type_name: Some("Tests.Math+Adding".to_owned()),
                result: "Fail".to_owned(),
                time: 0.0123,
                time_rtf: None,
                source_file: None,
                source_line: None,
                failure: Some(Failure {
                    exception_type: Some("Xunit.Sdk.EqualException".to_owned()),
                    message: Some("Assert.Equal() Failure".to_owned()),
                    stack_trace: Some(
                        "at Tests.Math.Adding.ShouldSum() in Math.cs:line 12".to_owned()
                    ),
                }),
                output: Some("some <output>".to_owned()),
                reason: None,
                traits: vec![Trait::new("Category", "Unit"), Trait::new("Owner", "A & B")],
                warnings: vec!["first".to_owned(), "second".to_owned()],
            }
        );
    }

    #[test]
    fn assembly_errors() {
        let report = deserialize_report(indoc! {r#"
            <assemblies>
              <assembly name="Tests.dll" errors="1">
                <errors>
                  <error type="fixture-cleanup" name="Tests.DatabaseFixture">
                    <failure exception-type="System.InvalidOperationException">
                      <message>connection already closed</message>
                    </failure>
                  </error>
                </errors>
              </assembly>
            </assemblies>
        "#})
        .expect("report is valid");

        let assembly = &report.assemblies[0];
        assert_eq!(assembly.error_count, 1);
        assert_eq!(
            assembly.errors,
            vec![AssemblyError {
                name: Some("Tests.DatabaseFixture".to_owned()),
                error_type: Some("fixture-cleanup".to_owned()),
                failure: Some(Failure {
                    exception_type: Some("System.InvalidOperationException".to_owned()),
                    message: Some("connection already closed".to_owned()),
                    stack_trace: None,
                }),
            }]
        );
    }

    #[test]
    fn unknown_elements_are_skipped() {
        let report = deserialize_report(indoc! {r#"
            <assemblies>
              <metadata><nested attr="x">text</nested></metadata>
              <assembly name="Tests.dll">
                <collection name="c">
                  <properties><property name="a" value="b"/></properties>
                  <test name="Tests.A" result="Pass" time="0"/>
                </collection>
              </assembly>
            </assemblies>
        "#})
        .expect("report is valid");

        assert_eq!(report.assemblies.len(), 1);
        assert_eq!(report.assemblies[0].collections[0].tests.len(), 1);
        assert_eq!(report.assemblies[0].collections[0].tests[0].name, "Tests.A");
    }

    #[test_case("" ; "empty document")]
    #[test_case("<?xml version=\"1.0\"?>" ; "declaration only")]
    fn missing_root(input: &str) {
        let error = deserialize_report(input).expect_err("no root element");
        assert!(
            matches!(error, DeserializeError::MissingRoot),
            "unexpected error: {error:?}"
        );
    }

    #[test]
    fn unexpected_root() {
        let error = deserialize_report("<testsuites></testsuites>").expect_err("wrong root");
        match error {
            DeserializeError::UnexpectedRoot { found } => assert_eq!(found, "testsuites"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test_case(r#"<assembly name="a" total="many"/>"#, "assembly", "total", "many" ; "assembly count")]
    #[test_case(r#"<assembly name="a" time="soon"/>"#, "assembly", "time", "soon" ; "assembly time")]
    #[test_case(
        r#"<assembly name="a"><collection name="c" failed="-1"/></assembly>"#,
        "collection", "failed", "-1" ; "negative count"
    )]
    #[test_case(
        r#"<assembly name="a"><collection name="c"><test name="t" time="NaN"/></collection></assembly>"#,
        "test", "time", "NaN" ; "non-finite test time"
    )]
    fn invalid_attribute(
        inner: &str,
        expected_element: &str,
        expected_attribute: &str,
        expected_value: &str,
    ) {
        let input = format!("<assemblies>{inner}</assemblies>");
        let error = deserialize_report(&input).expect_err("attribute is invalid");
        match error {
            DeserializeError::InvalidAttribute {
                element,
                attribute,
                value,
            } => {
                assert_eq!(element, expected_element);
                assert_eq!(attribute, expected_attribute);
                assert_eq!(value, expected_value);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn mismatched_end_tag() {
        let error = deserialize_report("<assemblies><assembly name=\"a\"></collection></assemblies>")
            .expect_err("end tag does not match");
        assert!(
            matches!(error, DeserializeError::Xml { .. }),
            "unexpected error: {error:?}"
        );
    }
}
