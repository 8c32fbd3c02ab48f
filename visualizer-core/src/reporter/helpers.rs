// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{config::TestSpeed, record::TestOutcome};
use owo_colors::Style;

#[derive(Debug, Default, Clone)]
pub(super) struct Styles {
    pub(super) is_colorized: bool,
    pub(super) count: Style,
    pub(super) pass: Style,
    pub(super) fail: Style,
    pub(super) skip: Style,
    pub(super) heading: Style,
}

impl Styles {
    pub(super) fn colorize(&mut self) {
        self.is_colorized = true;
        self.count = Style::new().bold();
        self.pass = Style::new().green().bold();
        self.fail = Style::new().red().bold();
        self.skip = Style::new().yellow().bold();
        self.heading = Style::new().bold();
    }

    pub(super) fn outcome(&self, outcome: &TestOutcome) -> Style {
        match outcome {
            TestOutcome::Passed => self.pass,
            TestOutcome::Failed => self.fail,
            TestOutcome::Other(_) => self.skip,
        }
    }
}

/// Markers printed next to tests and assembly verdicts.
#[derive(Debug, Clone)]
pub(super) struct ThemeCharacters {
    pass: &'static str,
    fail: &'static str,
    other: &'static str,
    fast: &'static str,
    normal: &'static str,
    slow: &'static str,
}

impl Default for ThemeCharacters {
    fn default() -> Self {
        Self {
            pass: "PASS",
            fail: "FAIL",
            other: "SKIP",
            fast: "[fast]",
            normal: "[norm]",
            slow: "[slow]",
        }
    }
}

impl ThemeCharacters {
    pub(super) fn use_unicode(&mut self) {
        self.pass = "✓";
        self.fail = "⛌";
        self.other = "-";
        self.fast = "🚀";
        self.normal = "🕐";
        self.slow = "🐌";
    }

    pub(super) fn outcome(&self, outcome: &TestOutcome) -> &'static str {
        match outcome {
            TestOutcome::Passed => self.pass,
            TestOutcome::Failed => self.fail,
            TestOutcome::Other(_) => self.other,
        }
    }

    pub(super) fn speed(&self, speed: TestSpeed) -> &'static str {
        match speed {
            TestSpeed::Fast => self.fast,
            TestSpeed::Normal => self.normal,
            TestSpeed::Slow => self.slow,
        }
    }
}
