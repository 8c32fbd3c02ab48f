// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Display configuration.
//!
//! ## Configuration hierarchy
//!
//! Settings are resolved in the following order (highest priority first):
//!
//! 1. CLI arguments (e.g. `--fast-threshold 20ms`)
//! 2. The config file: either passed in explicitly, or `.config/visualizo.toml` in the current
//!    directory if it exists
//! 3. Built-in defaults

use crate::{errors::ConfigError, group::GroupOrder};
use camino::Utf8Path;
use serde::Deserialize;
use std::{collections::BTreeSet, io, time::Duration};
use tracing::{debug, warn};

/// The path to the config file, relative to the directory visualizo is run in.
pub const CONFIG_FILE_PATH: &str = ".config/visualizo.toml";

/// Specifies where to load configuration from.
#[derive(Clone, Copy, Debug)]
pub enum ConfigLocation<'a> {
    /// Look for [`CONFIG_FILE_PATH`] within this directory, using built-in defaults if it does not
    /// exist.
    Default(&'a Utf8Path),

    /// Skip the config file entirely, using only built-in defaults.
    Isolated,

    /// Load the config file at this path.
    ///
    /// Returns an error if the file does not exist.
    Explicit(&'a Utf8Path),
}

/// Settings passed in on the command line, taking priority over the config file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Overrides `thresholds.fast`.
    pub fast_threshold: Option<Duration>,

    /// Overrides `thresholds.normal`.
    pub normal_threshold: Option<Duration>,

    /// Overrides `ui.group-order`.
    pub group_order: Option<GroupOrder>,
}

/// The resolved display configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisualizerConfig {
    thresholds: SpeedThresholds,
    group_order: GroupOrder,
}

impl VisualizerConfig {
    /// Loads the config file from `location`, then applies `overrides` on top.
    pub fn load(
        location: ConfigLocation<'_>,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        Self::load_with_warnings(location, overrides, &mut DefaultConfigWarnings)
    }

    fn load_with_warnings(
        location: ConfigLocation<'_>,
        overrides: &ConfigOverrides,
        warnings: &mut impl ConfigWarnings,
    ) -> Result<Self, ConfigError> {
        let user_config = DeserializedConfig::from_location_with_warnings(location, warnings)?;
        Self::resolve(DefaultConfig::from_embedded(), user_config, overrides)
    }

    fn resolve(
        defaults: DefaultConfig,
        user_config: Option<DeserializedConfig>,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let user_config = user_config.unwrap_or_default();

        let fast = overrides
            .fast_threshold
            .or(user_config.thresholds.fast)
            .unwrap_or(defaults.thresholds.fast);
        let normal = overrides
            .normal_threshold
            .or(user_config.thresholds.normal)
            .unwrap_or(defaults.thresholds.normal);
        let group_order = overrides
            .group_order
            .or(user_config.ui.group_order)
            .unwrap_or(defaults.ui.group_order);

        Ok(Self {
            thresholds: SpeedThresholds::new(fast, normal)?,
            group_order,
        })
    }

    /// Returns the speed thresholds.
    pub fn thresholds(&self) -> SpeedThresholds {
        self.thresholds
    }

    /// Returns the order in which trait groups are shown.
    pub fn group_order(&self) -> GroupOrder {
        self.group_order
    }
}

/// Thresholds for classifying how long a test took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpeedThresholds {
    fast: Duration,
    normal: Duration,
}

impl SpeedThresholds {
    /// Creates a new set of thresholds.
    ///
    /// Returns an error if `fast` is greater than `normal`.
    pub fn new(fast: Duration, normal: Duration) -> Result<Self, ConfigError> {
        if fast > normal {
            return Err(ConfigError::InvalidThresholds { fast, normal });
        }
        Ok(Self { fast, normal })
    }

    /// Tests that take at most this long are fast.
    pub fn fast(&self) -> Duration {
        self.fast
    }

    /// Tests that take at most this long, and longer than [`Self::fast`], are normal.
    pub fn normal(&self) -> Duration {
        self.normal
    }

    /// Classifies `time`. Both thresholds are inclusive.
    pub fn classify(&self, time: Duration) -> TestSpeed {
        if time <= self.fast {
            TestSpeed::Fast
        } else if time <= self.normal {
            TestSpeed::Normal
        } else {
            TestSpeed::Slow
        }
    }
}

/// How fast a test was, relative to [`SpeedThresholds`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TestSpeed {
    /// At or below the fast threshold.
    Fast,

    /// Above the fast threshold, at or below the normal threshold.
    Normal,

    /// Above the normal threshold.
    Slow,
}

/// Handles warnings produced while loading configuration.
trait ConfigWarnings {
    fn unknown_config_keys(&mut self, config_file: &Utf8Path, unknown: &BTreeSet<String>);
}

/// Logs warnings through `tracing`.
struct DefaultConfigWarnings;

impl ConfigWarnings for DefaultConfigWarnings {
    fn unknown_config_keys(&mut self, config_file: &Utf8Path, unknown: &BTreeSet<String>) {
        let noun = if unknown.len() == 1 { "key" } else { "keys" };
        let keys: Vec<&str> = unknown.iter().map(String::as_str).collect();
        warn!("ignoring unknown config {noun} in {config_file}: {}", keys.join(", "));
    }
}

/// The config file as written by the user. Every setting is optional.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DeserializedConfig {
    #[serde(default)]
    thresholds: DeserializedThresholds,

    #[serde(default)]
    ui: DeserializedUiConfig,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DeserializedThresholds {
    #[serde(default, with = "humantime_serde")]
    fast: Option<Duration>,

    #[serde(default, with = "humantime_serde")]
    normal: Option<Duration>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DeserializedUiConfig {
    #[serde(default)]
    group_order: Option<GroupOrder>,
}

impl DeserializedConfig {
    fn from_location_with_warnings(
        location: ConfigLocation<'_>,
        warnings: &mut impl ConfigWarnings,
    ) -> Result<Option<Self>, ConfigError> {
        match location {
            ConfigLocation::Isolated => {
                debug!("isolated config, using defaults");
                Ok(None)
            }
            ConfigLocation::Explicit(path) => match Self::from_path_with_warnings(path, warnings)? {
                Some(config) => Ok(Some(config)),
                None => Err(ConfigError::FileNotFound {
                    path: path.to_owned(),
                }),
            },
            ConfigLocation::Default(dir) => {
                Self::from_path_with_warnings(&dir.join(CONFIG_FILE_PATH), warnings)
            }
        }
    }

    /// Returns `Ok(None)` if the file does not exist.
    fn from_path_with_warnings(
        path: &Utf8Path,
        warnings: &mut impl ConfigWarnings,
    ) -> Result<Option<Self>, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!("no config file at {path}, using defaults");
                return Ok(None);
            }
            result => result.map_err(|error| ConfigError::Read {
                path: path.to_owned(),
                error,
            })?,
        };

        let (config, unknown) = Self::deserialize_toml(&contents)
            .map_err(|error| ConfigError::Parse {
                path: path.to_owned(),
                error,
            })?;
        if !unknown.is_empty() {
            warnings.unknown_config_keys(path, &unknown);
        }

        debug!("loaded config file at {path}");
        Ok(Some(config))
    }

    fn deserialize_toml(contents: &str) -> Result<(Self, BTreeSet<String>), toml::de::Error> {
        let deserializer = toml::Deserializer::parse(contents)?;
        let mut unknown = BTreeSet::new();
        let config: DeserializedConfig = serde_ignored::deserialize(deserializer, |path| {
            unknown.insert(path.to_string());
        })?;
        Ok((config, unknown))
    }
}

/// The embedded defaults. Every setting is required.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DefaultConfig {
    thresholds: DefaultThresholds,
    ui: DefaultUiConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DefaultThresholds {
    #[serde(with = "humantime_serde")]
    fast: Duration,

    #[serde(with = "humantime_serde")]
    normal: Duration,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DefaultUiConfig {
    group_order: GroupOrder,
}

impl DefaultConfig {
    const DEFAULT_CONFIG: &'static str = include_str!("../default-config.toml");

    /// Panics if the embedded TOML is invalid or contains unknown keys.
    fn from_embedded() -> Self {
        let deserializer = toml::Deserializer::parse(Self::DEFAULT_CONFIG)
            .expect("embedded default config should parse");
        let mut unknown = BTreeSet::new();
        let config: DefaultConfig =
            serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
                unknown.insert(path.to_string());
            })
            .expect("embedded default config should be valid");

        // The default config ships with the binary, so unknown keys are a bug.
        if !unknown.is_empty() {
            panic!(
                "found unknown keys in default config: {}",
                unknown.into_iter().collect::<Vec<_>>().join(", ")
            );
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use camino_tempfile::tempdir;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[derive(Default)]
    struct TestConfigWarnings {
        unknown_keys: Option<(Utf8PathBuf, BTreeSet<String>)>,
    }

    impl ConfigWarnings for TestConfigWarnings {
        fn unknown_config_keys(&mut self, config_file: &Utf8Path, unknown: &BTreeSet<String>) {
            self.unknown_keys = Some((config_file.to_owned(), unknown.clone()));
        }
    }

    #[test]
    fn default_config_is_valid() {
        // Panics if the TOML is missing any required fields or has unknown keys.
        let defaults = DefaultConfig::from_embedded();
        assert_eq!(defaults.thresholds.fast, Duration::from_millis(50));
        assert_eq!(defaults.thresholds.normal, Duration::from_millis(100));
        assert_eq!(defaults.ui.group_order, GroupOrder::Sorted);
    }

    #[test]
    fn isolated_uses_defaults() {
        let config = VisualizerConfig::load(ConfigLocation::Isolated, &ConfigOverrides::default())
            .expect("defaults are valid");
        assert_eq!(
            config.thresholds(),
            SpeedThresholds::new(Duration::from_millis(50), Duration::from_millis(100))
                .expect("thresholds are ordered")
        );
        assert_eq!(config.group_order(), GroupOrder::Sorted);
    }

    #[test]
    fn default_location() {
        let temp_dir = tempdir().unwrap();

        // No config file: defaults.
        let config = VisualizerConfig::load(
            ConfigLocation::Default(temp_dir.path()),
            &ConfigOverrides::default(),
        )
        .expect("missing default config file is fine");
        assert_eq!(config.thresholds().fast(), Duration::from_millis(50));

        std::fs::create_dir(temp_dir.path().join(".config")).unwrap();
        std::fs::write(
            temp_dir.path().join(CONFIG_FILE_PATH),
            indoc! {r#"
                [thresholds]
                fast = "10ms"
            "#},
        )
        .unwrap();

        let config = VisualizerConfig::load(
            ConfigLocation::Default(temp_dir.path()),
            &ConfigOverrides::default(),
        )
        .expect("config file is valid");
        assert_eq!(config.thresholds().fast(), Duration::from_millis(10));
        assert_eq!(config.thresholds().normal(), Duration::from_millis(100));
    }

    #[test]
    fn explicit_file_not_found() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("missing.toml");

        let error = VisualizerConfig::load(
            ConfigLocation::Explicit(&path),
            &ConfigOverrides::default(),
        )
        .expect_err("explicit config file must exist");
        assert!(
            matches!(&error, ConfigError::FileNotFound { path: error_path } if *error_path == path),
            "unexpected error: {error:?}"
        );
    }

    #[test]
    fn ignored_keys() {
        let config_contents = indoc! {r#"
            ignored1 = "test"

            [thresholds]
            fast = "20ms"
            slow = "1s"

            [ui]
            group-order = "first-seen"
        "#};

        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, config_contents).unwrap();

        let mut warnings = TestConfigWarnings::default();
        let config = VisualizerConfig::load_with_warnings(
            ConfigLocation::Explicit(&config_path),
            &ConfigOverrides::default(),
            &mut warnings,
        )
        .expect("config valid");

        assert_eq!(config.thresholds().fast(), Duration::from_millis(20));
        assert_eq!(config.group_order(), GroupOrder::FirstSeen);

        let (path, unknown) = warnings.unknown_keys.expect("should have unknown keys");
        assert_eq!(path, config_path, "path should match");
        assert_eq!(
            unknown,
            BTreeSet::from(["ignored1".to_owned(), "thresholds.slow".to_owned()]),
            "unknown keys should be detected"
        );
    }

    #[test]
    fn overrides_take_priority() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            indoc! {r#"
                [thresholds]
                fast = "20ms"
                normal = "2s"

                [ui]
                group-order = "first-seen"
            "#},
        )
        .unwrap();

        let overrides = ConfigOverrides {
            fast_threshold: Some(Duration::from_millis(5)),
            normal_threshold: None,
            group_order: Some(GroupOrder::Sorted),
        };
        let config = VisualizerConfig::load(ConfigLocation::Explicit(&config_path), &overrides)
            .expect("config valid");

        assert_eq!(config.thresholds().fast(), Duration::from_millis(5));
        assert_eq!(config.thresholds().normal(), Duration::from_secs(2));
        assert_eq!(config.group_order(), GroupOrder::Sorted);
    }

    #[test]
    fn invalid_thresholds() {
        let overrides = ConfigOverrides {
            fast_threshold: Some(Duration::from_secs(1)),
            ..Default::default()
        };
        let error = VisualizerConfig::load(ConfigLocation::Isolated, &overrides)
            .expect_err("fast above normal is invalid");
        assert_eq!(
            error.to_string(),
            "fast threshold (1s) must not exceed normal threshold (100ms)"
        );
    }

    #[test]
    fn parse_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "[thresholds]\nfast = \"soon\"\n").unwrap();

        let error = VisualizerConfig::load(
            ConfigLocation::Explicit(&config_path),
            &ConfigOverrides::default(),
        )
        .expect_err("invalid duration");
        assert!(
            matches!(error, ConfigError::Parse { .. }),
            "unexpected error: {error:?}"
        );
    }

    #[test_case(Duration::ZERO, TestSpeed::Fast ; "zero")]
    #[test_case(Duration::from_millis(50), TestSpeed::Fast ; "at fast")]
    #[test_case(Duration::from_millis(51), TestSpeed::Normal ; "above fast")]
    #[test_case(Duration::from_millis(100), TestSpeed::Normal ; "at normal")]
    #[test_case(Duration::from_millis(101), TestSpeed::Slow ; "above normal")]
    fn classify(time: Duration, expected: TestSpeed) {
        let thresholds =
            SpeedThresholds::new(Duration::from_millis(50), Duration::from_millis(100))
                .expect("thresholds are ordered");
        assert_eq!(thresholds.classify(time), expected);
    }
}
