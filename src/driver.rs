//! File-type-independent plumbing shared by the CORE, TIME, and STOCH parsers: extension
//! resolution and line reading. The section state machine itself is not generic here (each
//! family's `Section` enum and handler match live in its own module) because the three families
//! do not share a section vocabulary; what they share is how a location becomes a file and a
//! file becomes lines.

use crate::error::{Result, SmpsError};
use crate::line::{DataLine, Line, LexMode, ParseContext};
use std::path::{Path, PathBuf};

/// A section tag for one parser family (CORE, TIME, or STOCH). Declaration order of the
/// non-sentinel variants defines the state a parser starts in.
pub trait SectionTag: Copy + PartialEq {
  /// Maps a header's first word to the section it names, including the sentinel `ENDATA`.
  /// Returns `None` for an unrecognized header.
  fn from_header(word: &str) -> Option<Self>;
  /// The dedicated "unknown section, skip its entries" state.
  fn skip() -> Self;
  /// The terminal state reached on `ENDATA`.
  fn end_data() -> Self;
}

/// Runs the header-transition rule (spec §4.2) for one header line, mutating `state` in place.
/// Returns `true` when the header line itself should be skipped (it carried no body data);
/// `false` when the header line's own payload (e.g. a NAME/STOCH/TIME problem name) should still
/// be dispatched to the current section's handler.
pub fn transition<S: SectionTag>(state: &mut S, header_word: &str) -> bool {
  match S::from_header(header_word) {
    Some(next) if next == *state => false,
    Some(next) => {
      log::info!("Now parsing the {header_word} section.");
      *state = next;
      true
    }
    None => {
      log::warn!("Section {header_word} is not understood - skipping its entries.");
      *state = S::skip();
      true
    }
  }
}

/// Drives the shared main loop over already-read lines: classifies each line, runs the
/// header-transition rule, and dispatches data lines to `dispatch`. `context_for` supplies the
/// free-form field layout for the section `state` is currently in (ignored under
/// [`LexMode::Fixed`]); it also receives the line's own raw text, since a handful of sections
/// (e.g. a COLUMNS `MARKER` row) pack fewer logical fields than the section's usual shape and can
/// only be told apart by peeking at the line itself.
///
/// The header-transition check runs before the `Skip`-state short-circuit (see DESIGN.md): a
/// header line is always tested against `transition`, even while `state` is `Skip`, since
/// otherwise the state machine could never leave `Skip` upon meeting a later recognized section.
pub fn parse_lines<S: SectionTag>(
  lines: &[String],
  lex_mode: LexMode,
  mut state: S,
  mut context_for: impl FnMut(S, &str) -> ParseContext,
  mut dispatch: impl FnMut(S, &Line) -> Result<()>,
) -> Result<()> {
  for raw in lines {
    let context = context_for(state, raw);
    let line = Line::new(raw, lex_mode, context);

    if line.is_comment() {
      continue;
    }

    if line.is_header() {
      if transition(&mut state, line.first_header_word()) {
        continue;
      }
    } else if state == S::skip() {
      continue;
    }

    if state == S::end_data() {
      break;
    }

    dispatch(state, &line)?;
  }
  Ok(())
}

/// Reads a `NAME`/`TIME`/`STOCH` header's second word as the problem name, warning (rather than
/// failing) when it is blank. Shared by `CoreParser`, `TimeParser`, and `StochParser`, whose
/// opening header lines all carry the same "keyword, then problem name" shape.
pub fn parse_problem_name(line: &Line, section: &'static str) -> Option<String> {
  let word = line.second_header_word().trim();
  if word.is_empty() {
    log::warn!("{section} header is missing a problem name.");
    None
  } else {
    Some(word.to_string())
  }
}

/// Resolves `location` to an existing file, trying `location` itself first and then each
/// extension in `extensions` (in order) appended to `location`.
pub fn resolve_location(kind: &'static str, location: &Path, extensions: &[&str]) -> Result<PathBuf> {
  if location.exists() {
    log::debug!("Found existing file {}.", location.display());
    return Ok(location.to_path_buf());
  }

  for extension in extensions {
    let candidate = location.with_extension(extension.trim_start_matches('.'));
    if candidate.exists() {
      log::debug!("Found existing file {}.", candidate.display());
      return Ok(candidate);
    }
  }

  Err(SmpsError::FileNotFound {
    kind,
    location: location.display().to_string(),
  })
}

/// Reads a resolved file into a vector of owned lines, right-trimmed of line endings.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
  let content = std::fs::read_to_string(path)?;
  Ok(
    content
      .lines()
      .map(|line| line.trim_end().to_string())
      .collect(),
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  #[test]
  fn test_resolve_location_exact_match() -> Result<()> {
    let dir = std::env::temp_dir().join("smps_driver_test_exact");
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("problem.cor");
    std::fs::File::create(&path)?.write_all(b"NAME\n")?;

    let resolved = resolve_location("CoreParser", &path, &["cor", "core"])?;
    assert_eq!(resolved, path);
    Ok(())
  }

  #[test]
  fn test_resolve_location_by_extension() -> Result<()> {
    let dir = std::env::temp_dir().join("smps_driver_test_ext");
    std::fs::create_dir_all(&dir)?;
    let stem = dir.join("problem");
    std::fs::File::create(stem.with_extension("cor"))?.write_all(b"NAME\n")?;

    let resolved = resolve_location("CoreParser", &stem, &["cor", "core"])?;
    assert_eq!(resolved, stem.with_extension("cor"));
    Ok(())
  }

  #[test]
  fn test_resolve_location_not_found() {
    let missing = Path::new("/no/such/path/should/ever/exist");
    let err = resolve_location("CoreParser", missing, &["cor", "core"]).unwrap_err();
    assert!(matches!(err, SmpsError::FileNotFound { .. }));
  }
}
