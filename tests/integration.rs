mod tests {
  use color_eyre::Result;
  use indexmap::IndexMap;
  use smps::core::{CoreParser, Sense};
  use smps::line::LexMode;
  use smps::stoch::StochParser;
  use smps::time::TimeParser;
  use std::io::Write;

  fn write_fixture(dir: &str, name: &str, content: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(dir);
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::File::create(&path).unwrap().write_all(content.as_bytes()).unwrap();
    path
  }

  /// A condensed LandS CORE file: nine constraint rows spanning all three senses, sixteen
  /// variables, an objective whose coefficients match the worked example verbatim.
  const LANDS_CORE: &str = "NAME LANDS
ROWS
 N OBJ
 G MINCAP
 L BUDGET
 L OPLIM1
 L OPLIM2
 L OPLIM3
 L OPLIM4
 E DEMAND1
 E DEMAND2
 E DEMAND3
COLUMNS
 X1 OBJ 10.0 MINCAP 1.0
 X2 OBJ 7.0 MINCAP 1.0
 X3 OBJ 16.0 BUDGET 1.0
 X4 OBJ 6.0 BUDGET 1.0
 X5 OBJ 40.0 OPLIM1 1.0
 X6 OBJ 24.0 OPLIM2 1.0
 X7 OBJ 4.0 OPLIM3 1.0
 X8 OBJ 45.0 OPLIM4 1.0
 X9 OBJ 27.0 DEMAND1 1.0
 X10 OBJ 4.5 DEMAND1 1.0
 X11 OBJ 32.0 DEMAND2 1.0
 X12 OBJ 19.2 DEMAND2 1.0
 X13 OBJ 3.2 DEMAND3 1.0
 X14 OBJ 55.0 DEMAND3 1.0
 X15 OBJ 33.0 DEMAND1 1.0
 X16 OBJ 5.5 DEMAND2 1.0
RHS
 RHS MINCAP 14.0
 RHS BUDGET 120.0
ENDATA
";

  /// The companion TIME file: variable/row PERIOD1 covers the first-stage investment decisions,
  /// PERIOD2 the recourse decisions.
  const LANDS_TIME: &str = "TIME LANDS
PERIODS
 X1 OBJ PERIOD1
 X9 DEMAND1 PERIOD2
ENDATA
";

  /// The companion STOCH file: three equiprobable demand scenarios, each overriding the same
  /// DEMAND1 right-hand side.
  const LANDS_STOCH: &str = "STOCH LANDS
SCENARIOS DISCRETE
 SC SCEN01 ROOT 0.333333 STAGE-2
 X9 DEMAND1 3.0
 SC SCEN02 ROOT 0.333333 STAGE-2
 X9 DEMAND1 5.0
 SC SCEN03 ROOT 0.333333 STAGE-2
 X9 DEMAND1 7.0
ENDATA
";

  #[test]
  fn test_lands_core_matches_worked_example() -> Result<()> {
    let path = write_fixture("smps_integration", "lands.cor", LANDS_CORE);
    let mut parser = CoreParser::new(&path, LexMode::Free)?;
    parser.parse()?;

    assert_eq!(parser.name(), Some("LANDS"));
    assert_eq!(parser.objective_name(), Some("OBJ"));
    assert_eq!(
      parser.constraint_names(),
      vec!["MINCAP", "BUDGET", "OPLIM1", "OPLIM2", "OPLIM3", "OPLIM4", "DEMAND1", "DEMAND2", "DEMAND3"]
    );
    assert_eq!(
      parser.senses(),
      [Sense::G, Sense::L, Sense::L, Sense::L, Sense::L, Sense::L, Sense::E, Sense::E, Sense::E]
    );
    assert_eq!(
      parser.objective_coefficients(),
      vec![10.0, 7.0, 16.0, 6.0, 40.0, 24.0, 4.0, 45.0, 27.0, 4.5, 32.0, 19.2, 3.2, 55.0, 33.0, 5.5]
    );
    assert_eq!(parser.rhs(), vec![14.0, 120.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    Ok(())
  }

  #[test]
  fn test_lands_time_assigns_stage_offsets() -> Result<()> {
    let path = write_fixture("smps_integration", "lands.tim", LANDS_TIME);
    let mut parser = TimeParser::new(&path, LexMode::Free)?;
    parser.parse()?;

    assert_eq!(parser.name(), Some("LANDS"));
    assert_eq!(parser.stage_names(), ["PERIOD1", "PERIOD2"]);
    assert_eq!(
      parser.implicit_offsets(),
      [
        ("X1".to_string(), "OBJ".to_string()),
        ("X9".to_string(), "DEMAND1".to_string()),
      ]
    );
    Ok(())
  }

  #[test]
  fn test_lands_stoch_three_scenarios_with_modifications() -> Result<()> {
    let path = write_fixture("smps_integration", "lands.sto", LANDS_STOCH);
    let mut parser = StochParser::new(&path, LexMode::Free)?;
    parser.parse()?;

    let scenarios = parser.scenarios();
    assert_eq!(scenarios.len(), 3);
    for scenario in &scenarios {
      assert_eq!(scenario.parent, "ROOT");
      assert_eq!(scenario.branch_period, "STAGE-2");
      assert!((scenario.probability - 0.333333).abs() < 1e-9);
      assert_eq!(scenario.modifications.len(), 1);
    }

    let by_name: IndexMap<&str, &smps::stoch::Scenario> =
      scenarios.iter().map(|s| (s.name.as_str(), *s)).collect();
    assert_eq!(by_name["SCEN01"].modifications, vec![("DEMAND1".to_string(), "X9".to_string(), 3.0)]);
    assert_eq!(by_name["SCEN02"].modifications, vec![("DEMAND1".to_string(), "X9".to_string(), 5.0)]);
    assert_eq!(by_name["SCEN03"].modifications, vec![("DEMAND1".to_string(), "X9".to_string(), 7.0)]);
    Ok(())
  }

  /// The spec §8 TESTPROB scenario, laid out in genuine fixed MPS columns (not whitespace-split
  /// tokens) so `LexMode::Fixed` itself — not just `LexMode::Free` — gets exercised end-to-end.
  const TESTPROB_FIXED: &str = "NAME          TESTPROB
ROWS
 N  COST
 L  LIM1
 G  LIM2
 E  MYEQN
COLUMNS
    XONE      COST      1.0            LIM1      1.0
    XONE      LIM2      1.0
    YTWO      COST      4.0            LIM1      1.0
    YTWO      MYEQN     -1.0
    ZTHREE    COST      9.0            LIM2      1.0
    ZTHREE    MYEQN     1.0
RHS
    RHS       LIM1      5.0            LIM2      10.0
    RHS       MYEQN     7.0
BOUNDS
 UP BND       XONE      4.0
 LO BND       YTWO      -1.0
 UP BND       YTWO      1.0
ENDATA
";

  #[test]
  fn test_testprob_genuine_fixed_columns() -> Result<()> {
    let path = write_fixture("smps_integration", "testprob_fixed.cor", TESTPROB_FIXED);
    let mut parser = CoreParser::new(&path, LexMode::Fixed)?;
    parser.parse()?;

    assert_eq!(parser.name(), Some("TESTPROB"));
    assert_eq!(parser.objective_name(), Some("COST"));
    assert_eq!(parser.constraint_names(), vec!["LIM1", "LIM2", "MYEQN"]);
    assert_eq!(parser.senses(), [Sense::L, Sense::G, Sense::E]);
    assert_eq!(parser.rhs(), vec![5.0, 10.0, 7.0]);
    assert_eq!(parser.variable_names(), vec!["XONE", "YTWO", "ZTHREE"]);
    assert_eq!(parser.objective_coefficients(), vec![1.0, 4.0, 9.0]);
    assert_eq!(parser.lower_bounds(), vec![0.0, -1.0, 0.0]);
    assert_eq!(parser.upper_bounds()[0], 4.0);
    assert_eq!(parser.upper_bounds()[1], 1.0);
    assert!(parser.upper_bounds()[2].is_infinite());

    let matrix = parser.coefficients();
    assert_eq!(matrix.shape, (3, 3));
    assert_eq!(matrix.values.len(), 6);
    Ok(())
  }

  #[test]
  fn test_scenario_child_overrides_same_key_as_parent() -> Result<()> {
    let content = "STOCH OVERRIDE
SCENARIOS DISCRETE
 SC SCEN01 ROOT 0.5 STAGE-2
 X1 C1 10.0
 SC SCEN02 SCEN01 0.5 STAGE-3
 X1 C1 20.0
ENDATA
";
    let path = write_fixture("smps_integration", "override.sto", content);
    let mut parser = StochParser::new(&path, LexMode::Free)?;
    parser.parse()?;

    let merged = parser.modifications_from_root("SCEN02");
    assert_eq!(merged, vec![("C1".to_string(), "X1".to_string(), 20.0)]);
    Ok(())
  }
}
