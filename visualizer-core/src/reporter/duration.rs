// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{fmt, time::Duration};

pub(super) struct DisplaySeconds(pub(super) Duration);

impl fmt::Display for DisplaySeconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // .3 means print three digits after the decimal point.
        write!(f, "{:.3} seconds", self.0.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Duration::ZERO, "0.000 seconds" ; "zero")]
    #[test_case(Duration::from_millis(1234), "1.234 seconds" ; "millis")]
    #[test_case(Duration::from_micros(12_300), "0.012 seconds" ; "rounded")]
    #[test_case(Duration::from_secs(90), "90.000 seconds" ; "whole")]
    fn display(duration: Duration, expected: &str) {
        assert_eq!(DisplaySeconds(duration).to_string(), expected);
    }
}
