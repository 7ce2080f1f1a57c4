//! Positional and whitespace-tokenized views over a single physical line of SMPS input.
//!
//! Mirrors the column table used by the fixed MPS/SMPS dialect (Birge et al., *A Standard Input
//! Format for Multiperiod Stochastic Linear Programs*, WP-87-118) while also supporting a
//! free-form, whitespace-split variant for files that do not respect the column grid exactly (the
//! same looseness the `ommx` crate's MPS reader falls back to).

use fast_float2::parse;

/// Which lexing convention a parser uses for the whole of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexMode {
  /// Column-positioned fields, per the table in [`crate::line`].
  #[default]
  Fixed,
  /// Whitespace-tokenized fields, positions supplied per-section by a [`ParseContext`].
  Free,
}

/// Common operations over one physical line, independent of lexing convention.
///
/// Implemented by [`FixedDataLine`] and [`FreeDataLine`]; the driver holds either behind the
/// [`Line`] enum rather than a trait object, since exactly two concrete shapes exist and the
/// lexing mode for a parse never changes mid-file.
pub trait DataLine {
  /// The right-trimmed raw text of this line.
  fn raw(&self) -> &str;

  /// Blank ⟺ empty after trim, or lstripped text begins with `*`.
  fn is_comment(&self) -> bool {
    let trimmed = self.raw().trim_start();
    trimmed.is_empty() || trimmed.starts_with('*')
  }

  /// Header ⟺ non-empty and the first byte is neither a space nor `*`.
  fn is_header(&self) -> bool {
    match self.raw().as_bytes().first() {
      Some(b) => *b != b' ' && *b != b'*',
      None => false,
    }
  }

  /// First word of a header line (columns 1-14 fixed, or the first whitespace-delimited token).
  fn first_header_word(&self) -> &str;
  /// Second word of a header line (columns 15-72 fixed, or the second token).
  fn second_header_word(&self) -> &str;
  /// True when a second header word is present.
  fn has_second_header_word(&self) -> bool {
    !self.second_header_word().is_empty()
  }

  /// The indicator field (row/bound type keyword, or `SC` in SCENARIOS).
  fn indicator(&self) -> &str;
  /// The first name field.
  fn first_name(&self) -> &str;
  /// The second name field.
  fn second_name(&self) -> &str;
  /// The first numeric field; `f64::NAN` when blank.
  fn first_number(&self) -> f64;
  /// True when a third name field is present.
  fn has_third_name(&self) -> bool {
    !self.third_name().is_empty()
  }
  /// The third name field.
  fn third_name(&self) -> &str;
  /// True when a second numeric field is present (i.e. not the NaN sentinel).
  fn has_second_number(&self) -> bool {
    !self.second_number().is_nan()
  }
  /// The second numeric field; `f64::NAN` when blank.
  fn second_number(&self) -> f64;

  /// True when this data line carries a second (third-name, second-number) pair in addition to
  /// the first. The heuristic differs by lexing convention: see [`FixedDataLine`] and
  /// [`FreeDataLine`] for the rationale (recorded as an open-question resolution in DESIGN.md).
  fn has_second_data_entry(&self) -> bool;
}

/// Rounds `index` down to the nearest UTF-8 char boundary at or before it, so a fixed column
/// offset landing inside a multi-byte character never panics (the stable equivalent of the
/// nightly-only `str::floor_char_boundary`).
fn floor_char_boundary(raw: &str, mut index: usize) -> usize {
  while index > 0 && !raw.is_char_boundary(index) {
    index -= 1;
  }
  index
}

fn slice(raw: &str, start: usize, end: usize) -> &str {
  let len = raw.len();
  if start >= len {
    return "";
  }
  let start = floor_char_boundary(raw, start);
  let end = floor_char_boundary(raw, end.min(len)).max(start);
  raw[start..end].trim()
}

fn parse_number(s: &str) -> f64 {
  if s.is_empty() {
    f64::NAN
  } else {
    parse::<f64, _>(s).unwrap_or(f64::NAN)
  }
}

/// A data line lexed by fixed column position.
///
/// Field | Columns (1-indexed, inclusive)
/// ---|---
/// indicator | 2-3
/// first name | 5-12
/// second name | 15-22
/// first number | 25-36
/// third name | 40-47
/// second number | 50-61
/// first header word | 1-14
/// second header word | 15-72
#[derive(Debug, Clone, Copy)]
pub struct FixedDataLine<'a> {
  raw: &'a str,
}

impl<'a> FixedDataLine<'a> {
  pub fn new(raw: &'a str) -> Self {
    Self { raw: raw.trim_end() }
  }
}

impl<'a> DataLine for FixedDataLine<'a> {
  fn raw(&self) -> &str {
    self.raw
  }

  fn first_header_word(&self) -> &str {
    slice(self.raw, 0, 14)
  }

  fn second_header_word(&self) -> &str {
    slice(self.raw, 14, 72)
  }

  fn indicator(&self) -> &str {
    slice(self.raw, 1, 3)
  }

  fn first_name(&self) -> &str {
    slice(self.raw, 4, 12)
  }

  fn second_name(&self) -> &str {
    slice(self.raw, 14, 22)
  }

  fn first_number(&self) -> f64 {
    parse_number(slice(self.raw, 24, 36))
  }

  fn third_name(&self) -> &str {
    slice(self.raw, 39, 47)
  }

  fn second_number(&self) -> f64 {
    parse_number(slice(self.raw, 49, 61))
  }

  fn has_second_data_entry(&self) -> bool {
    // The only heuristic visible in the distilled source for the fixed format: a line that
    // reaches into the second-number field's column range (50-61) must extend past column 40.
    self.raw.len() > 40
  }
}

/// Names which whitespace-delimited token index holds each logical field for the current
/// section. Built once per section by the owning parser (see `core`/`time`/`stoch` for the
/// concrete layouts) and handed to every [`FreeDataLine`] constructed while that section is
/// active.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseContext {
  indicator_idx: Option<usize>,
  first_name_idx: Option<usize>,
  second_name_idx: Option<usize>,
  first_number_idx: Option<usize>,
  third_name_idx: Option<usize>,
  second_number_idx: Option<usize>,
}

impl ParseContext {
  pub const fn new() -> Self {
    Self {
      indicator_idx: None,
      first_name_idx: None,
      second_name_idx: None,
      first_number_idx: None,
      third_name_idx: None,
      second_number_idx: None,
    }
  }

  pub const fn indicator(mut self, idx: usize) -> Self {
    self.indicator_idx = Some(idx);
    self
  }

  pub const fn first_name(mut self, idx: usize) -> Self {
    self.first_name_idx = Some(idx);
    self
  }

  pub const fn second_name(mut self, idx: usize) -> Self {
    self.second_name_idx = Some(idx);
    self
  }

  pub const fn first_number(mut self, idx: usize) -> Self {
    self.first_number_idx = Some(idx);
    self
  }

  pub const fn third_name(mut self, idx: usize) -> Self {
    self.third_name_idx = Some(idx);
    self
  }

  pub const fn second_number(mut self, idx: usize) -> Self {
    self.second_number_idx = Some(idx);
    self
  }
}

/// A data line lexed by whitespace splitting, with field positions supplied by a
/// [`ParseContext`].
#[derive(Debug, Clone)]
pub struct FreeDataLine<'a> {
  raw: &'a str,
  parts: Vec<&'a str>,
  context: ParseContext,
}

impl<'a> FreeDataLine<'a> {
  pub fn new(raw: &'a str, context: ParseContext) -> Self {
    let parts = raw.split_whitespace().collect();
    Self {
      raw: raw.trim_end(),
      parts,
      context,
    }
  }

  fn token(&self, idx: Option<usize>) -> &str {
    idx.and_then(|i| self.parts.get(i).copied()).unwrap_or("")
  }
}

impl<'a> DataLine for FreeDataLine<'a> {
  fn raw(&self) -> &str {
    self.raw
  }

  fn first_header_word(&self) -> &str {
    self.parts.first().copied().unwrap_or("")
  }

  fn second_header_word(&self) -> &str {
    self.parts.get(1).copied().unwrap_or("")
  }

  fn indicator(&self) -> &str {
    self.token(self.context.indicator_idx)
  }

  fn first_name(&self) -> &str {
    self.token(self.context.first_name_idx)
  }

  fn second_name(&self) -> &str {
    self.token(self.context.second_name_idx)
  }

  fn first_number(&self) -> f64 {
    parse_number(self.token(self.context.first_number_idx))
  }

  fn third_name(&self) -> &str {
    self.token(self.context.third_name_idx)
  }

  fn second_number(&self) -> f64 {
    parse_number(self.token(self.context.second_number_idx))
  }

  fn has_second_data_entry(&self) -> bool {
    match self.context.second_number_idx {
      Some(idx) => self.parts.len() > idx,
      None => false,
    }
  }
}

/// Either lexing of a data line, used where the driver must hold "a line of either kind" in one
/// place (per the crate's preference for tagged-enum dispatch over trait objects).
#[derive(Debug, Clone)]
pub enum Line<'a> {
  Fixed(FixedDataLine<'a>),
  Free(FreeDataLine<'a>),
}

impl<'a> Line<'a> {
  pub fn new(raw: &'a str, mode: LexMode, context: ParseContext) -> Self {
    match mode {
      LexMode::Fixed => Line::Fixed(FixedDataLine::new(raw)),
      LexMode::Free => Line::Free(FreeDataLine::new(raw, context)),
    }
  }
}

impl<'a> DataLine for Line<'a> {
  fn raw(&self) -> &str {
    match self {
      Line::Fixed(l) => l.raw(),
      Line::Free(l) => l.raw(),
    }
  }

  fn first_header_word(&self) -> &str {
    match self {
      Line::Fixed(l) => l.first_header_word(),
      Line::Free(l) => l.first_header_word(),
    }
  }

  fn second_header_word(&self) -> &str {
    match self {
      Line::Fixed(l) => l.second_header_word(),
      Line::Free(l) => l.second_header_word(),
    }
  }

  fn indicator(&self) -> &str {
    match self {
      Line::Fixed(l) => l.indicator(),
      Line::Free(l) => l.indicator(),
    }
  }

  fn first_name(&self) -> &str {
    match self {
      Line::Fixed(l) => l.first_name(),
      Line::Free(l) => l.first_name(),
    }
  }

  fn second_name(&self) -> &str {
    match self {
      Line::Fixed(l) => l.second_name(),
      Line::Free(l) => l.second_name(),
    }
  }

  fn first_number(&self) -> f64 {
    match self {
      Line::Fixed(l) => l.first_number(),
      Line::Free(l) => l.first_number(),
    }
  }

  fn third_name(&self) -> &str {
    match self {
      Line::Fixed(l) => l.third_name(),
      Line::Free(l) => l.third_name(),
    }
  }

  fn second_number(&self) -> f64 {
    match self {
      Line::Fixed(l) => l.second_number(),
      Line::Free(l) => l.second_number(),
    }
  }

  fn has_second_data_entry(&self) -> bool {
    match self {
      Line::Fixed(l) => l.has_second_data_entry(),
      Line::Free(l) => l.has_second_data_entry(),
    }
  }
}
