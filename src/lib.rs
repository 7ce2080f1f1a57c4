//! # smps
//!
//! `smps` parses the SMPS file family for stochastic linear programs: `CORE` (the deterministic
//! MPS matrix), `TIME` (the stage structure), and `STOCH` (the scenario tree or random-variable
//! distributions). The three files are independent; this crate exposes one parser per file and
//! leaves composing a triplet (matching problem names, cross-referencing stages and scenarios) to
//! the caller.
//!
//! ## Example
//!
//! ```
//! use smps::core::CoreParser;
//! use smps::line::LexMode;
//! use std::io::Write;
//!
//! let dir = std::env::temp_dir().join("smps_doctest");
//! std::fs::create_dir_all(&dir).unwrap();
//! let path = dir.join("example.cor");
//! // Genuine fixed-width MPS columns (see the field table in `smps::line`): the header word
//! // occupies columns 1-14, its argument columns 15-72; indicator/first name/second name/first
//! // number/third name/second number occupy columns 2-3/5-12/15-22/25-36/40-47/50-61.
//! std::fs::File::create(&path)
//!   .unwrap()
//!   .write_all(
//!     b"NAME          EXAMPLE
//! ROWS
//!  N  OBJ
//!  L  R1
//! COLUMNS
//!     X1        OBJ       -6.0           R1        2.0
//! RHS
//!     RHS       R1        18.0
//! BOUNDS
//!  LO BND       X1        0.0
//! ENDATA",
//!   )
//!   .unwrap();
//!
//! let mut parser = CoreParser::new(&path, LexMode::Fixed).unwrap();
//! parser.parse().unwrap();
//! assert_eq!(parser.name(), Some("EXAMPLE"));
//! assert_eq!(parser.objective_name(), Some("OBJ"));
//! assert_eq!(parser.constraint_names(), vec!["R1"]);
//! assert_eq!(parser.rhs(), vec![18.0]);
//! ```
//!
//! ## CLI
//!
//! ```bash
//! $ smps --input-path ./problem.cor
//! ```
//!
//! Built with the `cli` feature, which also installs `env_logger` as the diagnostic sink; the
//! library itself only emits `log` facade calls and never configures a logger.
//!
//! Supported feature flags:
//! - `cli` - command line interface (`smps` binary).
//! - `serde` - `Serialize` on the parsed data types.
//! - `insta` - implies `serde`; used by this crate's own snapshot tests.
//! - `located` - exposes [`span::Span`], a byte-offset-carrying text wrapper, for consumers that
//!   want to pair a diagnostic with a source location.
//!
//! ## References
//!
//! - [Mathematical Programming System format](https://lpsolve.sourceforge.net/5.5/mps-format.htm)
//! - [SMPS: A format for input of stochastic linear programs](https://sba.ici.ro/articles/SMPS_format.pdf)

#[cfg(feature = "cli")]
pub mod cli;
pub mod core;
pub mod driver;
pub mod error;
pub mod line;
pub mod span;
pub mod stoch;
pub mod time;

pub use crate::core::CoreParser;
pub use crate::error::SmpsError;
pub use crate::stoch::StochParser;
pub use crate::time::TimeParser;
