//! `Scenario` and the root-to-node modification composition (spec §4.6, §3 `Scenario`).
//!
//! The registry is owned by the parser that built it rather than kept process-global; see
//! DESIGN.md for why this departs from the naive global-table reading of the original.

use indexmap::IndexMap;

/// The conventional name of the scenario tree's root, used as a parent sentinel.
pub const ROOT: &str = "ROOT";

/// One node of the scenario tree: a name, a parent (or [`ROOT`]), the period it branches at, an
/// unconditional probability, and the `(constraint, variable, value)` triples it overrides
/// relative to its parent.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Scenario {
  pub name: String,
  pub parent: String,
  pub branch_period: String,
  pub probability: f64,
  pub modifications: Vec<(String, String, f64)>,
}

impl Scenario {
  pub fn new(
    name: impl Into<String>,
    parent: impl Into<String>,
    branch_period: impl Into<String>,
    probability: f64,
  ) -> Self {
    Self {
      name: name.into(),
      parent: parent.into(),
      branch_period: branch_period.into(),
      probability,
      modifications: Vec::new(),
    }
  }
}

/// Walks the parent chain from `name` up to [`ROOT`], composing every scenario's modifications
/// along the way so a child's entry for a given `(constraint, variable)` overwrites its ancestor's
/// while preserving the ancestor's position in the result (spec §4.6 composition pseudocode).
/// Returns an empty vector if `name` is not in `registry`.
pub fn modifications_from_root(
  registry: &IndexMap<String, Scenario>,
  name: &str,
) -> Vec<(String, String, f64)> {
  let Some(scenario) = registry.get(name) else {
    return Vec::new();
  };

  if scenario.parent.eq_ignore_ascii_case(ROOT) {
    return scenario.modifications.clone();
  }

  let mut merged: IndexMap<(String, String), f64> = IndexMap::new();
  for (constraint, variable, value) in modifications_from_root(registry, &scenario.parent) {
    merged.insert((constraint, variable), value);
  }
  for (constraint, variable, value) in &scenario.modifications {
    merged.insert((constraint.clone(), variable.clone()), *value);
  }

  merged
    .into_iter()
    .map(|((constraint, variable), value)| (constraint, variable, value))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_root_scenario_returns_its_own_modifications() {
    let mut registry = IndexMap::new();
    let mut root_child = Scenario::new("SCEN01", ROOT, "PERIOD2", 0.5);
    root_child.modifications.push(("DEMAND".to_string(), "X1".to_string(), 100.0));
    registry.insert("SCEN01".to_string(), root_child);

    let result = modifications_from_root(&registry, "SCEN01");
    assert_eq!(result, vec![("DEMAND".to_string(), "X1".to_string(), 100.0)]);
  }

  #[test]
  fn test_child_overrides_parent_in_place() {
    let mut registry = IndexMap::new();
    let mut parent = Scenario::new("SCEN01", ROOT, "PERIOD2", 0.5);
    parent.modifications.push(("DEMAND".to_string(), "X1".to_string(), 100.0));
    parent.modifications.push(("SUPPLY".to_string(), "X2".to_string(), 50.0));
    registry.insert("SCEN01".to_string(), parent);

    let mut child = Scenario::new("SCEN02", "SCEN01", "PERIOD3", 0.25);
    child.modifications.push(("DEMAND".to_string(), "X1".to_string(), 120.0));
    registry.insert("SCEN02".to_string(), child);

    let result = modifications_from_root(&registry, "SCEN02");
    assert_eq!(
      result,
      vec![
        ("DEMAND".to_string(), "X1".to_string(), 120.0),
        ("SUPPLY".to_string(), "X2".to_string(), 50.0),
      ]
    );
  }

  #[test]
  fn test_unknown_scenario_returns_empty() {
    let registry: IndexMap<String, Scenario> = IndexMap::new();
    assert!(modifications_from_root(&registry, "NOPE").is_empty());
  }
}
