//! Independent-randomness data for one `INDEP` block (spec §4.5, §3 `Indep`).
//!
//! An `Indep` holds exactly one distribution family and one modification rule for the duration of
//! its block; every data line in the block resolves to a `(variable, constraint)` key under that
//! family.

use crate::error::{Result, SmpsError};
use indexmap::IndexMap;

/// A distribution family recognized on an INDEP/BLOCKS/DISTRIB header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Family {
  Discrete,
  Uniform,
  Normal,
  Gamma,
  Beta,
  LogNorm,
}

impl TryFrom<&str> for Family {
  type Error = SmpsError;

  fn try_from(s: &str) -> Result<Self> {
    match s.trim().to_ascii_uppercase().as_str() {
      "DISCRETE" => Ok(Family::Discrete),
      "UNIFORM" => Ok(Family::Uniform),
      "NORMAL" => Ok(Family::Normal),
      "GAMMA" => Ok(Family::Gamma),
      "BETA" => Ok(Family::Beta),
      "LOGNORM" => Ok(Family::LogNorm),
      other => Err(SmpsError::Value(format!("unknown distribution family {other:?}"))),
    }
  }
}

/// How a scenario's values combine with the values already on the row, under BLOCKS/SCENARIOS.
/// `INDEP` itself never modifies a row it describes; the keyword is still parsed off its header
/// for symmetry with BLOCKS/DISTRIB (spec §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Modification {
  #[default]
  Replace,
  Add,
  Multiply,
}

impl TryFrom<&str> for Modification {
  type Error = SmpsError;

  fn try_from(s: &str) -> Result<Self> {
    match s.trim().to_ascii_uppercase().as_str() {
      "REPLACE" => Ok(Modification::Replace),
      "ADD" => Ok(Modification::Add),
      "MULTIPLY" => Ok(Modification::Multiply),
      other => Err(SmpsError::Value(format!("unknown modification keyword {other:?}"))),
    }
  }
}

/// A fully-specified distribution, as returned by [`Indep::get`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Distribution {
  Uniform { a: f64, b: f64 },
  Normal { mean: f64, variance: f64 },
  Gamma { shape: f64, scale: f64 },
  Beta { a: f64, b: f64 },
  LogNormal { mean: f64, variance: f64 },
  /// `(value, probability)` outcome pairs, in the order they were read. A variable/constraint key
  /// may accumulate several outcomes across several DISCRETE data lines.
  Discrete { outcomes: Vec<(f64, f64)> },
}

/// One INDEP block: a single distribution family plus the continuous or discrete values keyed by
/// `(variable, constraint)` (spec §3 `Indep`).
#[derive(Debug, Clone)]
pub struct Indep {
  family: Family,
  modification: Modification,
  continuous: IndexMap<(String, String), Distribution>,
  discrete: IndexMap<(String, String), Vec<(f64, f64)>>,
}

impl Indep {
  pub fn new(family: Family, modification: Modification) -> Self {
    Self {
      family,
      modification,
      continuous: IndexMap::new(),
      discrete: IndexMap::new(),
    }
  }

  pub fn family(&self) -> Family {
    self.family
  }

  pub fn modification(&self) -> Modification {
    self.modification
  }

  /// True when this block's family is DISCRETE (a finite outcome set rather than a continuous
  /// parametrized distribution).
  pub fn is_finite(&self) -> bool {
    self.family == Family::Discrete
  }

  /// Folds one data line's `(first, second)` value pair into the distribution keyed by
  /// `(variable, constraint)`, per this block's family (spec §4.5's per-family value table).
  pub fn add(&mut self, variable: String, constraint: String, first: f64, second: f64) {
    let key = (variable, constraint);
    match self.family {
      Family::Discrete => {
        self.discrete.entry(key).or_default().push((first, second));
      }
      Family::Uniform => {
        self.continuous.insert(key, Distribution::Uniform { a: first, b: second });
      }
      Family::Normal => {
        self.continuous.insert(key, Distribution::Normal { mean: first, variance: second });
      }
      Family::Gamma => {
        self.continuous.insert(key, Distribution::Gamma { scale: first, shape: second });
      }
      Family::Beta => {
        self.continuous.insert(key, Distribution::Beta { a: first, b: second });
      }
      Family::LogNorm => {
        self.continuous.insert(key, Distribution::LogNormal { mean: first, variance: second });
      }
    }
  }

  /// Looks up the distribution recorded for `(variable, constraint)`, if any.
  pub fn get(&self, variable: &str, constraint: &str) -> Option<Distribution> {
    let key = (variable.to_string(), constraint.to_string());
    if let Some(distribution) = self.continuous.get(&key) {
      return Some(distribution.clone());
    }
    self
      .discrete
      .get(&key)
      .map(|outcomes| Distribution::Discrete { outcomes: outcomes.clone() })
  }

  /// All `(variable, constraint)` keys this block has seen data for, in insertion order.
  pub fn keys(&self) -> impl Iterator<Item = &(String, String)> {
    self.continuous.keys().chain(self.discrete.keys())
  }
}
