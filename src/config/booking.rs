//! Configuration file parser for histogram booking
//!
//! ```toml
//! [[hist]]
//! name = "pt"
//! x = { column = "pt", bins = 10, min = 0.0, max = 100.0 }
//! weight = "w"
//!
//! [[hist]]
//! name = "eta_phi"
//! x = { column = "eta", edges = [-2.5, -1.0, 0.0, 1.0, 2.5] }
//! y = { column = "phi", bins = 8, min = -3.2, max = 3.2 }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::binning::{BinSpec, Binning};
use crate::{Error, Result};

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Histograms to fill, in the order in which they are reported
    #[serde(default, rename = "hist")]
    pub hists: Vec<HistConfig>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HistConfig {
    pub name: String,
    pub x: AxisConfig,
    pub y: Option<AxisConfig>,
    pub z: Option<AxisConfig>,
    /// Column holding the per-event weight; every event weighs 1 without it
    pub weight: Option<String>,
}

/// One axis: the column it reads and its binning, given either as
/// `bins`/`min`/`max` or as explicit `edges`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AxisConfig {
    pub column: String,
    pub bins: Option<usize>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub edges: Option<Vec<f64>>,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        fs::read_to_string(path)?.parse()
    }

    /// Reject anything that would only fail once filling has started.
    fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for hist in &self.hists {
            if !names.insert(hist.name.as_str()) {
                return Err(Error::Config(format!("histogram '{}' booked more than once", hist.name)));
            }
            for axis in hist.axes()? {
                Binning::try_from(&axis.bin_spec()?)?;
            }
        }
        Ok(())
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }
}

impl HistConfig {
    /// The configured axes, `x` first.
    pub fn axes(&self) -> Result<Vec<&AxisConfig>> {
        match (&self.y, &self.z) {
            (None   , None   ) => Ok(vec![&self.x]),
            (Some(y), None   ) => Ok(vec![&self.x, y]),
            (Some(y), Some(z)) => Ok(vec![&self.x, y, z]),
            (None   , Some(_)) => Err(Error::Config(format!("histogram '{}' has a z axis but no y axis", self.name))),
        }
    }

    pub fn dimension(&self) -> Result<usize> { Ok(self.axes()?.len()) }
}

impl AxisConfig {
    pub fn bin_spec(&self) -> Result<BinSpec> {
        match (self.bins, self.min, self.max, &self.edges) {
            (Some(bins), Some(min), Some(max), None       ) => Ok(BinSpec::Fixed { bins, min, max }),
            (None      , None     , None     , Some(edges)) => Ok(BinSpec::Edges(edges.clone())),
            _ => Err(Error::Config(format!(
                "axis on column '{}' needs either `bins`, `min` and `max`, or `edges`", self.column
            ))),
        }
    }
}
