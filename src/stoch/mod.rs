//! The STOCH parser: `STOCH`, `INDEP`, `BLOCKS`, `SCENARIOS`, `NODES`, `DISTRIB` (spec §4.5).
//!
//! Like [`crate::time::TimeParser`], this drives its own loop rather than
//! [`crate::driver::parse_lines`]: `INDEP`/`BLOCKS`/`DISTRIB`/`SCENARIOS` headers carry a
//! distribution-family/modification (or scenario-type) parameter that the generic driver would
//! otherwise skip past unseen.

pub mod indep;
pub mod scenario;

pub use indep::{Distribution, Family, Indep, Modification};
pub use scenario::Scenario;

use crate::driver::{self, SectionTag};
use crate::error::{Result, SmpsError};
use crate::line::{DataLine, LexMode, Line, ParseContext};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

const EXTENSIONS: &[&str] = &["sto", "stoch", "STO", "STOCH"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
  Stoch,
  Indep,
  Blocks,
  Scenarios,
  Nodes,
  Distrib,
  Skip,
  EndData,
}

impl SectionTag for Section {
  fn from_header(word: &str) -> Option<Self> {
    match word.trim().to_ascii_uppercase().as_str() {
      "STOCH" => Some(Section::Stoch),
      "INDEP" => Some(Section::Indep),
      "BLOCKS" => Some(Section::Blocks),
      "SCENARIOS" => Some(Section::Scenarios),
      "NODES" => Some(Section::Nodes),
      "DISTRIB" => Some(Section::Distrib),
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

/// The STOCH parser.
#[derive(Debug)]
pub struct StochParser {
  path: PathBuf,
  lex_mode: LexMode,
  name: Option<String>,
  indeps: Vec<Indep>,
  current_indep: Option<Indep>,
  registry: IndexMap<String, Scenario>,
  current_scenario: Option<String>,
}

impl StochParser {
  pub fn new(location: impl AsRef<Path>, lex_mode: LexMode) -> Result<Self> {
    let path = driver::resolve_location("StochParser", location.as_ref(), EXTENSIONS)?;
    Ok(Self {
      path,
      lex_mode,
      name: None,
      indeps: Vec::new(),
      current_indep: None,
      registry: IndexMap::new(),
      current_scenario: None,
    })
  }

  pub fn parse(&mut self) -> Result<()> {
    let lines = driver::read_lines(&self.path)?;
    let mut state = Section::Stoch;

    for raw in &lines {
      let context = self.context_for(state, raw);
      let line = Line::new(raw, self.lex_mode, context);

      if line.is_comment() {
        continue;
      }

      if line.is_header() {
        let word = line.first_header_word();
        let skip = driver::transition(&mut state, word);
        if skip {
          self.flush_indep();
          match state {
            Section::Indep => self.enter_indep(line.second_header_word())?,
            Section::Blocks => self.enter_blocks(line.second_header_word())?,
            Section::Distrib => self.enter_distrib(line.second_header_word())?,
            Section::Scenarios => self.enter_scenarios(line.second_header_word())?,
            _ => {}
          }
          continue;
        }
      } else if state == Section::Skip {
        continue;
      }

      if state == Section::EndData {
        break;
      }

      self.dispatch(state, &line)?;
    }
    self.flush_indep();
    Ok(())
  }

  /// Picks the free-form field layout for `section`. SCENARIOS mixes two line shapes (a new-node
  /// `SC` line vs. a plain modification line), which under free-form tokenizing only a peek at the
  /// line's own first token can disambiguate; fixed-width lines never need this (the indicator
  /// column is simply blank on a modification line).
  fn context_for(&self, section: Section, raw: &str) -> ParseContext {
    match section {
      Section::Indep => ParseContext::new().first_name(0).second_name(1).first_number(2).second_number(3),
      Section::Scenarios => {
        let is_sc = raw
          .split_whitespace()
          .next()
          .map(|token| token.eq_ignore_ascii_case("SC"))
          .unwrap_or(false);
        if is_sc {
          ParseContext::new()
            .indicator(0)
            .first_name(1)
            .second_name(2)
            .first_number(3)
            .third_name(4)
        } else {
          ParseContext::new()
            .first_name(0)
            .second_name(1)
            .first_number(2)
            .third_name(3)
            .second_number(4)
        }
      }
      Section::Stoch | Section::Blocks | Section::Nodes | Section::Distrib | Section::Skip | Section::EndData => {
        ParseContext::new()
      }
    }
  }

  fn dispatch(&mut self, section: Section, line: &Line) -> Result<()> {
    match section {
      Section::Stoch => {
        self.handle_stoch_header(line);
        Ok(())
      }
      Section::Indep => {
        self.handle_indep_line(line);
        Ok(())
      }
      Section::Blocks => {
        log::debug!("Discarding BLOCKS line (unimplemented): {}", line.raw());
        Ok(())
      }
      Section::Scenarios => self.handle_scenarios_line(line),
      Section::Nodes => {
        log::debug!("Discarding NODES line (unimplemented): {}", line.raw());
        Ok(())
      }
      Section::Distrib => {
        log::debug!("Discarding DISTRIB line (unimplemented): {}", line.raw());
        Ok(())
      }
      Section::Skip | Section::EndData => Ok(()),
    }
  }

  fn handle_stoch_header(&mut self, line: &Line) {
    self.name = driver::parse_problem_name(line, "STOCH");
  }

  fn flush_indep(&mut self) {
    if let Some(indep) = self.current_indep.take() {
      self.indeps.push(indep);
    }
  }

  fn enter_indep(&mut self, second_word: &str) -> Result<()> {
    let (family, modification) = parse_family_and_modification(second_word)?;
    self.current_indep = Some(Indep::new(family, modification));
    Ok(())
  }

  fn enter_blocks(&mut self, second_word: &str) -> Result<()> {
    let mut tokens = second_word.split_whitespace();
    let head = tokens.next().unwrap_or("");
    let head_upper = head.to_ascii_uppercase();
    if head_upper != "LINTR" && head_upper != "LINTRAN" {
      Family::try_from(head)?;
    }
    if let Some(token) = tokens.next() {
      Modification::try_from(token)?;
    }
    Ok(())
  }

  fn enter_distrib(&mut self, second_word: &str) -> Result<()> {
    parse_family_and_modification(second_word)?;
    Ok(())
  }

  fn enter_scenarios(&mut self, second_word: &str) -> Result<()> {
    let token = second_word.split_whitespace().next().unwrap_or("");
    if token.is_empty() || token.eq_ignore_ascii_case("DISCRETE") {
      Ok(())
    } else {
      Err(SmpsError::Value(format!(
        "unsupported scenario type {token:?}; only DISCRETE scenario trees are supported"
      )))
    }
  }

  fn handle_indep_line(&mut self, line: &Line) {
    let Some(indep) = self.current_indep.as_mut() else {
      log::warn!("INDEP data line seen with no active distribution family; discarding.");
      return;
    };
    let variable = line.first_name();
    let constraint = line.second_name();
    if variable.is_empty() || constraint.is_empty() {
      return;
    }
    indep.add(variable.to_string(), constraint.to_string(), line.first_number(), line.second_number());
  }

  fn handle_scenarios_line(&mut self, line: &Line) -> Result<()> {
    if line.indicator().trim().eq_ignore_ascii_case("SC") {
      let name = line.first_name().to_string();
      if name.is_empty() {
        return Ok(());
      }
      let raw_parent = line.second_name();
      let parent = if raw_parent.trim_matches(['\'', '"']).eq_ignore_ascii_case(scenario::ROOT) {
        scenario::ROOT.to_string()
      } else {
        raw_parent.to_string()
      };
      let branch_period = line.third_name().to_string();
      let probability = line.first_number();
      if !(probability > 0.0 && probability < 1.0) {
        return Err(SmpsError::Value(format!(
          "scenario {name} probability {probability} is outside (0, 1)"
        )));
      }
      self.registry.insert(name.clone(), Scenario::new(name.clone(), parent, branch_period, probability));
      self.current_scenario = Some(name);
      return Ok(());
    }

    let Some(current) = self.current_scenario.clone() else {
      log::warn!("SCENARIOS modification line seen with no active scenario; discarding.");
      return Ok(());
    };
    let variable = line.first_name().to_string();
    let constraint = line.second_name().to_string();
    let value = line.first_number();
    if !variable.is_empty() && !constraint.is_empty() {
      if let Some(scenario) = self.registry.get_mut(&current) {
        scenario.modifications.push((constraint, variable.clone(), value));
      }
    }
    if line.has_second_data_entry() && line.has_third_name() {
      let constraint2 = line.third_name().to_string();
      let value2 = line.second_number();
      if let Some(scenario) = self.registry.get_mut(&current) {
        scenario.modifications.push((constraint2, variable, value2));
      }
    }
    Ok(())
  }

  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  pub fn indeps(&self) -> &[Indep] {
    &self.indeps
  }

  pub fn scenarios(&self) -> Vec<&Scenario> {
    self.registry.values().collect()
  }

  /// See [`scenario::modifications_from_root`].
  pub fn modifications_from_root(&self, scenario_name: &str) -> Vec<(String, String, f64)> {
    scenario::modifications_from_root(&self.registry, scenario_name)
  }
}

fn parse_family_and_modification(second_word: &str) -> Result<(Family, Modification)> {
  let mut tokens = second_word.split_whitespace();
  let family = Family::try_from(tokens.next().unwrap_or(""))?;
  let modification = match tokens.next() {
    Some(token) => Modification::try_from(token)?,
    None => Modification::default(),
  };
  Ok((family, modification))
}
