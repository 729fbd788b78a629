use crate::growth::FirstIncrease;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Study configuration.
///
/// Loaded from a TOML file and validated before use.
/// Every section and key is optional. See [`Config::from_file`] for loading.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub growth: GrowthConfig,
    pub output: OutputConfig,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Records file (or glob pattern), relative to the study directory.
    pub records_file: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            records_file: "records.toml".to_string(),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    /// Treatment of each subject's first observation.
    pub first_increase: FirstIncrease,
    /// Also report growth split by diet.
    pub by_diet: bool,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            first_increase: FirstIncrease::Zero,
            by_diet: true,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON results.
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl Config {
    /// Load a [`Config`] from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        check_records_file(&self.input.records_file).context("invalid records file")?;
        Ok(())
    }
}

fn check_records_file(records_file: &str) -> Result<()> {
    if records_file.trim().is_empty() {
        bail!("records file must not be empty");
    }
    let ext = Path::new(records_file)
        .extension()
        .and_then(|ext| ext.to_str());
    if !matches!(ext, Some("toml" | "msgpack")) {
        bail!("records file must end in .toml or .msgpack, but is {records_file:?}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.input.records_file, "records.toml");
        assert_eq!(config.growth.first_increase, FirstIncrease::Zero);
        assert!(config.growth.by_diet);
        assert!(config.output.pretty);
    }

    #[test]
    fn parses_all_sections() {
        let config = Config::from_toml(
            r#"
[input]
records_file = "records-*.msgpack"

[growth]
first_increase = "drop"
by_diet = false

[output]
pretty = false
"#,
        )
        .unwrap();
        assert_eq!(config.input.records_file, "records-*.msgpack");
        assert_eq!(config.growth.first_increase, FirstIncrease::Drop);
        assert!(!config.growth.by_diet);
        assert!(!config.output.pretty);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(Config::from_toml("[input]\nrecords_file = \"\"\n").is_err());
        assert!(Config::from_toml("[input]\nrecords_file = \"records.csv\"\n").is_err());
        assert!(Config::from_toml("[growth]\nfirst_increase = \"mean\"\n").is_err());
    }
}
