//! The CORE/MPS parser: `NAME`, `ROWS`, `COLUMNS`, `RHS`, `BOUNDS`, `RANGES` (spec §4.3).
//!
//! Builds the deterministic mathematical program: the constraint and variable registers, the
//! sparse coefficient matrix, the objective vector, and the bound vectors. RANGES entries are
//! folded into an extra set of synthetic rows rather than mutating the original constraint.

use crate::driver::{self, SectionTag};
use crate::error::{Result, SmpsError};
use crate::line::{DataLine, LexMode, Line, ParseContext};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

const EXTENSIONS: &[&str] = &["mps", "cor", "core", "MPS", "COR", "CORE"];

/// Section tags for the CORE/MPS state machine. Declaration order of the non-sentinel variants
/// (`Name` first) defines the parser's initial state, per spec §4.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
  Name,
  Rows,
  Columns,
  Rhs,
  Bounds,
  Ranges,
  Skip,
  EndData,
}

impl SectionTag for Section {
  fn from_header(word: &str) -> Option<Self> {
    match word.trim().to_ascii_uppercase().as_str() {
      "NAME" => Some(Section::Name),
      "ROWS" => Some(Section::Rows),
      "COLUMNS" => Some(Section::Columns),
      "RHS" => Some(Section::Rhs),
      "BOUNDS" => Some(Section::Bounds),
      "RANGES" => Some(Section::Ranges),
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

/// The sense of an indexed constraint row. `N` rows never reach here: the first becomes the
/// objective, later ones are logged and dropped (spec §4.3 ROWS).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Sense {
  E,
  L,
  G,
}

impl Sense {
  /// Parses a ROWS indicator, returning `None` (rather than an error) for anything other than
  /// `E`/`L`/`G`. Unlike [`BoundType`], an unrecognized row indicator is not in the spec's Value
  /// error taxonomy (§7) — this crate logs and drops the row instead of aborting the parse.
  fn parse_opt(s: &str) -> Option<Self> {
    match s.trim().to_ascii_uppercase().as_str() {
      "E" => Some(Sense::E),
      "L" => Some(Sense::L),
      "G" => Some(Sense::G),
      _ => None,
    }
  }
}

/// A variable's declared type: continuous by default, integer inside a `MARKER`/`INTORG` block or
/// under an `LI`/`UI` bound, binary under `BV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum VariableType {
  C,
  I,
  B,
}

/// The nine BOUNDS keywords (spec §4.3). An unrecognized indicator is `SmpsError::Value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum BoundType {
  Lo,
  Up,
  Fx,
  Fr,
  Mi,
  Pl,
  Bv,
  Li,
  Ui,
}

impl TryFrom<&str> for BoundType {
  type Error = SmpsError;

  fn try_from(s: &str) -> Result<Self> {
    match s.trim().to_ascii_uppercase().as_str() {
      "LO" => Ok(BoundType::Lo),
      "UP" => Ok(BoundType::Up),
      "FX" => Ok(BoundType::Fx),
      "FR" => Ok(BoundType::Fr),
      "MI" => Ok(BoundType::Mi),
      "PL" => Ok(BoundType::Pl),
      "BV" => Ok(BoundType::Bv),
      "LI" => Ok(BoundType::Li),
      "UI" => Ok(BoundType::Ui),
      other => Err(SmpsError::Value(format!("unknown bound type {other:?}"))),
    }
  }
}

/// The coefficient matrix in coordinate-triple form, compressed lazily (spec §4.3, §9).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CompressedRows {
  pub row_ptr: Vec<usize>,
  pub col_idx: Vec<usize>,
  pub values: Vec<f64>,
  pub shape: (usize, usize),
}

/// The CORE/MPS parser: accumulates ROWS/COLUMNS/RHS/BOUNDS/RANGES state, then exposes it through
/// read-only accessors once [`CoreParser::parse`] has returned `Ok`.
#[derive(Debug)]
pub struct CoreParser {
  path: PathBuf,
  lex_mode: LexMode,
  name: Option<String>,
  objective_name: Option<String>,
  constraint_index: IndexMap<String, usize>,
  senses: Vec<Sense>,
  rhs: Option<Vec<f64>>,
  variable_index: IndexMap<String, usize>,
  types: Vec<VariableType>,
  lower_bounds: Option<Vec<f64>>,
  upper_bounds: Option<Vec<f64>>,
  integer_mode: bool,
  coefficients: Vec<(String, String, f64)>,
  objective_coefficients: Vec<(String, f64)>,
  ranges: IndexMap<String, (Sense, f64)>,
  compressed: Option<CompressedRows>,
}

impl CoreParser {
  /// Resolves `location` against `.mps`/`.cor`/`.core` (spec §6) and returns a fresh, unparsed
  /// instance. Call [`CoreParser::parse`] to populate it.
  pub fn new(location: impl AsRef<Path>, lex_mode: LexMode) -> Result<Self> {
    let path = driver::resolve_location("CoreParser", location.as_ref(), EXTENSIONS)?;
    Ok(Self {
      path,
      lex_mode,
      name: None,
      objective_name: None,
      constraint_index: IndexMap::new(),
      senses: Vec::new(),
      rhs: None,
      variable_index: IndexMap::new(),
      types: Vec::new(),
      lower_bounds: None,
      upper_bounds: None,
      integer_mode: false,
      coefficients: Vec::new(),
      objective_coefficients: Vec::new(),
      ranges: IndexMap::new(),
      compressed: None,
    })
  }

  /// Runs the section state machine over the resolved file, mutating `self` in place.
  pub fn parse(&mut self) -> Result<()> {
    let lines = driver::read_lines(&self.path)?;
    let lex_mode = self.lex_mode;
    driver::parse_lines(&lines, lex_mode, Section::Name, Self::context_for, |section, line| {
      self.dispatch(section, line)
    })
  }

  /// `raw` is consulted only for `Columns`: a `MARKER` row packs just (name, `'MARKER'`,
  /// `INTORG`/`INTEND`) rather than a full (variable, constraint, value[, constraint, value])
  /// tuple, so under free-form tokenizing it needs its own, shorter field layout — peeking at the
  /// line's second whitespace-delimited token (its would-be second-name field) is how
  /// [`Self::handle_columns`] and this layout agree on which shape a given COLUMNS line has.
  fn context_for(section: Section, raw: &str) -> ParseContext {
    match section {
      Section::Rows => ParseContext::new().indicator(0).first_name(1),
      Section::Columns => {
        let is_marker = raw
          .split_whitespace()
          .nth(1)
          .map(|token| token.to_ascii_uppercase().contains("MARKER"))
          .unwrap_or(false);
        if is_marker {
          ParseContext::new().first_name(0).second_name(1).third_name(2)
        } else {
          ParseContext::new()
            .first_name(0)
            .second_name(1)
            .first_number(2)
            .third_name(3)
            .second_number(4)
        }
      }
      Section::Rhs | Section::Ranges => ParseContext::new()
        .first_name(0)
        .second_name(1)
        .first_number(2)
        .third_name(3)
        .second_number(4),
      Section::Bounds => ParseContext::new()
        .indicator(0)
        .first_name(1)
        .second_name(2)
        .first_number(3),
      Section::Name | Section::Skip | Section::EndData => ParseContext::new(),
    }
  }

  fn dispatch(&mut self, section: Section, line: &Line) -> Result<()> {
    match section {
      Section::Name => {
        self.handle_name(line);
        Ok(())
      }
      Section::Rows => self.handle_rows(line),
      Section::Columns => {
        self.handle_columns(line);
        Ok(())
      }
      Section::Rhs => {
        self.handle_rhs(line);
        Ok(())
      }
      Section::Bounds => self.handle_bounds(line),
      Section::Ranges => {
        self.handle_ranges(line);
        Ok(())
      }
      Section::Skip | Section::EndData => Ok(()),
    }
  }

  fn handle_name(&mut self, line: &Line) {
    self.name = driver::parse_problem_name(line, "NAME");
  }

  fn handle_rows(&mut self, line: &Line) -> Result<()> {
    let indicator = line.indicator().trim().to_ascii_uppercase();
    let name = line.first_name();
    if name.is_empty() {
      return Ok(());
    }
    if indicator == "N" {
      if self.objective_name.is_none() {
        self.objective_name = Some(name.to_string());
      } else {
        log::info!(
          "Ignoring additional objective row {name}; objective is already {}.",
          self.objective_name.as_deref().unwrap_or_default()
        );
      }
      return Ok(());
    }
    match Sense::parse_opt(&indicator) {
      Some(sense) => {
        let index = self.constraint_index.len();
        self.constraint_index.insert(name.to_string(), index);
        self.senses.push(sense);
      }
      None => log::warn!("Unrecognized ROWS indicator {indicator:?} for row {name}; dropping."),
    }
    Ok(())
  }

  fn handle_columns(&mut self, line: &Line) {
    // A marker row is identified by the second-name field carrying 'MARKER' (spec §4.3); the
    // third-name field then carries 'INTORG'/'INTEND'. Scoping both checks to their named fields
    // (rather than scanning the raw line) keeps an ordinary variable or row name that merely
    // contains one of these substrings (e.g. `XINTORG1`) from falsely toggling integer mode.
    // `Self::context_for` gives free-form `MARKER` lines their own (shorter) field layout so
    // `second_name`/`third_name` land correctly here regardless of lexing mode.
    if line.second_name().to_ascii_uppercase().contains("MARKER") {
      let marker = line.third_name().to_ascii_uppercase();
      if marker.contains("INTORG") {
        self.integer_mode = true;
      } else if marker.contains("INTEND") {
        self.integer_mode = false;
      } else {
        log::warn!("MARKER line with neither INTORG nor INTEND: {:?}; ignoring.", line.raw());
      }
      return;
    }

    let variable = line.first_name();
    if variable.is_empty() {
      return;
    }
    if !self.variable_index.contains_key(variable) {
      let index = self.variable_index.len();
      self.variable_index.insert(variable.to_string(), index);
      self.types.push(if self.integer_mode { VariableType::I } else { VariableType::C });
    }

    self.apply_column_pair(variable, line.second_name(), line.first_number());
    if line.has_second_data_entry() && line.has_third_name() {
      self.apply_column_pair(variable, line.third_name(), line.second_number());
    }
  }

  fn apply_column_pair(&mut self, variable: &str, constraint: &str, value: f64) {
    if constraint.is_empty() || value.is_nan() {
      return;
    }
    if Some(constraint) == self.objective_name.as_deref() {
      self.objective_coefficients.push((variable.to_string(), value));
    } else if self.constraint_index.contains_key(constraint) {
      self.coefficients.push((constraint.to_string(), variable.to_string(), value));
    } else {
      log::info!("Dropping COLUMNS entry for {variable} against unrecognized row {constraint}.");
    }
  }

  fn ensure_rhs_allocated(&mut self) {
    if self.rhs.is_none() {
      self.rhs = Some(vec![0.0; self.constraint_index.len()]);
    }
  }

  fn ensure_bounds_allocated(&mut self) {
    if self.lower_bounds.is_none() {
      self.lower_bounds = Some(vec![0.0; self.variable_index.len()]);
    }
    if self.upper_bounds.is_none() {
      self.upper_bounds = Some(vec![f64::INFINITY; self.variable_index.len()]);
    }
  }

  fn handle_rhs(&mut self, line: &Line) {
    self.ensure_rhs_allocated();
    self.apply_rhs_pair(line.second_name(), line.first_number());
    if line.has_second_data_entry() && line.has_third_name() {
      self.apply_rhs_pair(line.third_name(), line.second_number());
    }
  }

  fn apply_rhs_pair(&mut self, constraint: &str, value: f64) {
    if constraint.is_empty() || value.is_nan() {
      return;
    }
    match self.constraint_index.get(constraint) {
      Some(&index) => self.rhs.as_mut().expect("allocated above")[index] = value,
      None => log::warn!("RHS entry references unknown constraint {constraint}; dropping."),
    }
  }

  fn handle_bounds(&mut self, line: &Line) -> Result<()> {
    self.ensure_bounds_allocated();
    let bound_type = BoundType::try_from(line.indicator())?;
    let variable = line.second_name();
    let Some(&index) = self.variable_index.get(variable) else {
      log::warn!("BOUNDS entry references unknown variable {variable}; dropping.");
      return Ok(());
    };
    let b = line.first_number();
    let lower = self.lower_bounds.as_mut().expect("allocated above");
    let upper = self.upper_bounds.as_mut().expect("allocated above");
    match bound_type {
      BoundType::Lo => lower[index] = b,
      BoundType::Up => upper[index] = b,
      BoundType::Fx => {
        lower[index] = b;
        upper[index] = b;
      }
      BoundType::Fr => {
        lower[index] = f64::NEG_INFINITY;
        upper[index] = f64::INFINITY;
      }
      BoundType::Mi => lower[index] = f64::NEG_INFINITY,
      BoundType::Pl => upper[index] = f64::INFINITY,
      BoundType::Bv => {
        lower[index] = 0.0;
        upper[index] = 1.0;
        self.types[index] = VariableType::B;
      }
      BoundType::Li => {
        lower[index] = b;
        self.types[index] = VariableType::I;
      }
      BoundType::Ui => {
        upper[index] = b;
        self.types[index] = VariableType::I;
      }
    }
    Ok(())
  }

  fn handle_ranges(&mut self, line: &Line) {
    // Spec §4.3: RANGES allocates the bound vectors "as in BOUNDS" on first entry, even though it
    // never writes to them itself.
    self.ensure_bounds_allocated();
    self.apply_ranges_pair(line.second_name(), line.first_number());
    if line.has_second_data_entry() && line.has_third_name() {
      self.apply_ranges_pair(line.third_name(), line.second_number());
    }
  }

  fn apply_ranges_pair(&mut self, constraint: &str, r: f64) {
    if constraint.is_empty() || r.is_nan() {
      return;
    }
    let Some(&index) = self.constraint_index.get(constraint) else {
      log::warn!("RANGES entry references unknown constraint {constraint}; dropping.");
      return;
    };
    let sense = self.senses[index];
    let b = self.rhs.as_ref().map(|v| v[index]).unwrap_or(0.0);
    self.ranges.insert(constraint.to_string(), derive_range(sense, b, r));
  }

  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  pub fn objective_name(&self) -> Option<&str> {
    self.objective_name.as_deref()
  }

  pub fn constraint_names(&self) -> Vec<&str> {
    self.constraint_index.keys().map(String::as_str).collect()
  }

  pub fn senses(&self) -> &[Sense] {
    &self.senses
  }

  pub fn rhs(&self) -> Vec<f64> {
    self.rhs.clone().unwrap_or_else(|| vec![0.0; self.constraint_index.len()])
  }

  pub fn variable_names(&self) -> Vec<&str> {
    self.variable_index.keys().map(String::as_str).collect()
  }

  pub fn types(&self) -> &[VariableType] {
    &self.types
  }

  pub fn lower_bounds(&self) -> Vec<f64> {
    self.lower_bounds.clone().unwrap_or_else(|| vec![0.0; self.variable_index.len()])
  }

  pub fn upper_bounds(&self) -> Vec<f64> {
    self
      .upper_bounds
      .clone()
      .unwrap_or_else(|| vec![f64::INFINITY; self.variable_index.len()])
  }

  pub fn objective_coefficients(&self) -> Vec<f64> {
    let mut dense = vec![0.0; self.variable_index.len()];
    for (variable, value) in &self.objective_coefficients {
      if let Some(&index) = self.variable_index.get(variable) {
        dense[index] = *value;
      }
    }
    dense
  }

  pub fn ranges(&self) -> impl Iterator<Item = (&str, Sense, f64)> {
    self.ranges.iter().map(|(name, &(sense, rhs))| (name.as_str(), sense, rhs))
  }

  /// Assembles (and caches) the sparse coefficient matrix, including the extra rows contributed
  /// by RANGES. Shape is `(constraint count + ranged count, variable count)` (spec §4.3, §8).
  pub fn coefficients(&mut self) -> &CompressedRows {
    if self.compressed.is_none() {
      self.compressed = Some(self.assemble_coefficients());
    }
    self.compressed.as_ref().expect("just populated")
  }

  fn assemble_coefficients(&self) -> CompressedRows {
    let base_rows = self.constraint_index.len();
    let variables = self.variable_index.len();
    let ranged_offset: IndexMap<&str, usize> =
      self.ranges.keys().enumerate().map(|(offset, name)| (name.as_str(), offset)).collect();

    let mut triples: Vec<(usize, usize, f64)> = Vec::with_capacity(self.coefficients.len());
    for (constraint, variable, value) in &self.coefficients {
      let (Some(&row), Some(&col)) =
        (self.constraint_index.get(constraint), self.variable_index.get(variable))
      else {
        continue;
      };
      triples.push((row, col, *value));
      if let Some(&offset) = ranged_offset.get(constraint.as_str()) {
        triples.push((base_rows + offset, col, *value));
      }
    }
    triples.sort_by_key(|&(row, col, _)| (row, col));

    let total_rows = base_rows + ranged_offset.len();
    let mut row_ptr = vec![0usize; total_rows + 1];
    for &(row, _, _) in &triples {
      row_ptr[row + 1] += 1;
    }
    for i in 0..total_rows {
      row_ptr[i + 1] += row_ptr[i];
    }
    let col_idx = triples.iter().map(|&(_, col, _)| col).collect();
    let values = triples.iter().map(|&(_, _, value)| value).collect();

    CompressedRows {
      row_ptr,
      col_idx,
      values,
      shape: (total_rows, variables),
    }
  }
}

fn derive_range(sense: Sense, b: f64, r: f64) -> (Sense, f64) {
  match sense {
    Sense::G => (Sense::L, b + r.abs()),
    Sense::L => (Sense::G, b - r.abs()),
    Sense::E if r >= 0.0 => (Sense::L, b + r),
    Sense::E => (Sense::G, b + r),
  }
}
