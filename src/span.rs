//! Optional byte-offset-carrying text wrapper, gated behind the `located` feature.
//!
//! Nothing in this crate parses through `nom`, so there is no combinator that threads a `Span`
//! implicitly; it is exposed for consumers who want to pair a diagnostic with a source location
//! without pulling in a whole diagnostics stack.

cfg_if::cfg_if! {
  if #[cfg(feature = "located")] {
    /// A string slice tagged with its line/column/byte offset in the original file.
    pub type Span<'a> = nom_locate::LocatedSpan<&'a str>;
  }
}
