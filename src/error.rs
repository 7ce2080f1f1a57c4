//! Typed error taxonomy for the SMPS parsers.
//!
//! Parsing fails only on the conditions the specification calls *value errors*; everything else
//! (missing problem names, unknown sections, dangling RANGES/RHS references) is a warning, logged
//! through the `log` facade and otherwise non-fatal. See the module-level docs in [`crate`] for
//! the full taxonomy.

use thiserror::Error;

/// Errors that can terminate an SMPS parse.
#[derive(Debug, Error)]
pub enum SmpsError {
  /// No file exists at the given location, nor at the location with any accepted extension
  /// appended.
  #[error("{kind}: {location} does not define an appropriate file")]
  FileNotFound {
    /// Which parser (CORE, TIME, STOCH) was looking for the file.
    kind: &'static str,
    /// The location that was probed.
    location: String,
  },

  /// A field carried a value outside the set this format recognizes: an unknown BOUNDS type, an
  /// unknown INDEP/BLOCKS/DISTRIB distribution family or modification keyword, an unsupported
  /// SCENARIOS parameter, or a scenario probability outside (0, 1).
  #[error("{0}")]
  Value(String),

  /// Wraps the underlying I/O failure from opening/reading a resolved file.
  #[error(transparent)]
  Io(#[from] std::io::Error),
}

pub(crate) type Result<T> = std::result::Result<T, SmpsError>;
