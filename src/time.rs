//! The TIME parser: `TIME`, `PERIODS` (spec §4.4).
//!
//! Assigns constraints and variables to stages, either implicitly (a PERIODS line marks the first
//! row/column of a new stage) or explicitly (every row and column is named under its own stage in
//! a dedicated `ROWS`/`COLUMNS` sub-section). `PERIODS`'s header line carries the mode keyword, so
//! this parser drives its own loop rather than `driver::parse_lines` — the generic driver skips a
//! newly-entered section's header line before a handler ever sees it, which would lose that
//! keyword (see DESIGN.md).

use crate::driver::{self, SectionTag};
use crate::error::Result;
use crate::line::{DataLine, LexMode, Line, ParseContext};
use std::path::{Path, PathBuf};

const EXTENSIONS: &[&str] = &["tim", "time", "TIM", "TIME"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
  Time,
  Periods,
  Rows,
  Columns,
  Skip,
  EndData,
}

impl SectionTag for Section {
  fn from_header(word: &str) -> Option<Self> {
    match word.trim().to_ascii_uppercase().as_str() {
      "TIME" => Some(Section::Time),
      "PERIODS" => Some(Section::Periods),
      "ROWS" => Some(Section::Rows),
      "COLUMNS" => Some(Section::Columns),
      "ENDATA" => Some(Section::EndData),
      _ => None,
    }
  }

  fn skip() -> Self {
    Section::Skip
  }

  fn end_data() -> Self {
    Section::EndData
  }
}

/// Whether a TIME file lists stage boundaries inline (`IMPLICIT`, the default) or in dedicated
/// `ROWS`/`COLUMNS` sub-sections (`EXPLICIT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TimeMode {
  #[default]
  Implicit,
  Explicit,
}

/// The TIME parser.
#[derive(Debug)]
pub struct TimeParser {
  path: PathBuf,
  lex_mode: LexMode,
  name: Option<String>,
  mode: TimeMode,
  stage_names: Vec<String>,
  implicit_offsets: Vec<(String, String)>,
  explicit_constraints: Vec<(String, String)>,
  explicit_variables: Vec<(String, String)>,
}

impl TimeParser {
  pub fn new(location: impl AsRef<Path>, lex_mode: LexMode) -> Result<Self> {
    let path = driver::resolve_location("TimeParser", location.as_ref(), EXTENSIONS)?;
    Ok(Self {
      path,
      lex_mode,
      name: None,
      mode: TimeMode::Implicit,
      stage_names: Vec::new(),
      implicit_offsets: Vec::new(),
      explicit_constraints: Vec::new(),
      explicit_variables: Vec::new(),
    })
  }

  pub fn parse(&mut self) -> Result<()> {
    let lines = driver::read_lines(&self.path)?;
    let mut state = Section::Time;

    for raw in &lines {
      let context = Self::context_for(state);
      let line = Line::new(raw, self.lex_mode, context);

      if line.is_comment() {
        continue;
      }

      if line.is_header() {
        let word = line.first_header_word();
        let skip = driver::transition(&mut state, word);
        if skip {
          if state == Section::Periods {
            self.handle_periods_header(line.second_header_word());
          }
          continue;
        }
      } else if state == Section::Skip {
        continue;
      }

      if state == Section::EndData {
        break;
      }

      self.dispatch(state, &line);
    }
    Ok(())
  }

  fn context_for(section: Section) -> ParseContext {
    match section {
      Section::Periods => ParseContext::new().first_name(0).second_name(1).third_name(2),
      Section::Rows | Section::Columns => ParseContext::new().first_name(0).second_name(1),
      Section::Time | Section::Skip | Section::EndData => ParseContext::new(),
    }
  }

  fn dispatch(&mut self, section: Section, line: &Line) {
    match section {
      Section::Time => self.handle_time_header(line),
      Section::Periods => match self.mode {
        TimeMode::Implicit => self.handle_periods_implicit(line),
        TimeMode::Explicit => self.handle_periods_explicit(line),
      },
      Section::Rows => self.handle_explicit_rows(line),
      Section::Columns => self.handle_explicit_columns(line),
      Section::Skip | Section::EndData => {}
    }
  }

  fn handle_time_header(&mut self, line: &Line) {
    self.name = driver::parse_problem_name(line, "TIME");
  }

  fn handle_periods_header(&mut self, second_word: &str) {
    let token = second_word.split_whitespace().next().unwrap_or("");
    self.mode = if token.eq_ignore_ascii_case("EXPLICIT") {
      TimeMode::Explicit
    } else {
      TimeMode::Implicit
    };
  }

  fn handle_periods_implicit(&mut self, line: &Line) {
    let variable = line.first_name();
    let constraint = line.second_name();
    let period = line.third_name();
    if variable.is_empty() || constraint.is_empty() || period.is_empty() {
      return;
    }
    self.stage_names.push(period.to_string());
    self.implicit_offsets.push((variable.to_string(), constraint.to_string()));
  }

  fn handle_periods_explicit(&mut self, line: &Line) {
    let period = line.first_name();
    if !period.is_empty() {
      self.stage_names.push(period.to_string());
    }
  }

  fn handle_explicit_rows(&mut self, line: &Line) {
    let constraint = line.first_name();
    let stage = line.second_name();
    if !constraint.is_empty() && !stage.is_empty() {
      self.explicit_constraints.push((constraint.to_string(), stage.to_string()));
    }
  }

  fn handle_explicit_columns(&mut self, line: &Line) {
    let variable = line.first_name();
    let stage = line.second_name();
    if !variable.is_empty() && !stage.is_empty() {
      self.explicit_variables.push((variable.to_string(), stage.to_string()));
    }
  }

  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  pub fn time_type(&self) -> TimeMode {
    self.mode
  }

  pub fn stage_names(&self) -> &[String] {
    &self.stage_names
  }

  pub fn num_stages(&self) -> usize {
    self.stage_names.len()
  }

  /// `(variable, constraint)` pairs marking the start of each stage, in IMPLICIT mode. Empty
  /// under EXPLICIT mode; see [`TimeParser::explicit_constraints`]/[`TimeParser::explicit_variables`].
  pub fn implicit_offsets(&self) -> &[(String, String)] {
    &self.implicit_offsets
  }

  /// `(constraint, stage)` assignments, in EXPLICIT mode.
  pub fn explicit_constraints(&self) -> &[(String, String)] {
    &self.explicit_constraints
  }

  /// `(variable, stage)` assignments, in EXPLICIT mode.
  pub fn explicit_variables(&self) -> &[(String, String)] {
    &self.explicit_variables
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  fn parse_fixture(name: &str, lines: &[&str]) -> TimeParser {
    let dir = std::env::temp_dir().join("smps_time_test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::File::create(&path).unwrap().write_all(lines.join("\n").as_bytes()).unwrap();
    let mut parser = TimeParser::new(&path, LexMode::Free).unwrap();
    parser.parse().unwrap();
    parser
  }

  #[test]
  fn test_implicit_time_landsish() {
    let lines = &[
      "TIME LANDS",
      "PERIODS",
      " X1 COST PERIOD1",
      " X1 OPLIM PERIOD2",
      "ENDATA",
    ];
    let parser = parse_fixture("lands.tim", lines);
    assert_eq!(parser.name(), Some("LANDS"));
    assert_eq!(parser.time_type(), TimeMode::Implicit);
    assert_eq!(parser.stage_names(), ["PERIOD1", "PERIOD2"]);
    assert_eq!(parser.num_stages(), 2);
    assert_eq!(
      parser.implicit_offsets(),
      [("X1".to_string(), "COST".to_string()), ("X1".to_string(), "OPLIM".to_string())]
    );
  }

  #[test]
  fn test_explicit_time() {
    let lines = &[
      "TIME EXPPROB",
      "PERIODS EXPLICIT",
      " PERIOD1",
      " PERIOD2",
      "ROWS",
      " COST PERIOD1",
      " LIM1 PERIOD1",
      " LIM2 PERIOD2",
      "COLUMNS",
      " X1 PERIOD1",
      " X2 PERIOD2",
      "ENDATA",
    ];
    let parser = parse_fixture("explicit.tim", lines);
    assert_eq!(parser.time_type(), TimeMode::Explicit);
    assert_eq!(parser.stage_names(), ["PERIOD1", "PERIOD2"]);
    assert_eq!(
      parser.explicit_constraints(),
      [
        ("COST".to_string(), "PERIOD1".to_string()),
        ("LIM1".to_string(), "PERIOD1".to_string()),
        ("LIM2".to_string(), "PERIOD2".to_string()),
      ]
    );
    assert_eq!(
      parser.explicit_variables(),
      [("X1".to_string(), "PERIOD1".to_string()), ("X2".to_string(), "PERIOD2".to_string())]
    );
  }
}
