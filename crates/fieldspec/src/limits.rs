//! Limits applied when building instances from untrusted input.

/// Maximum depth of a value below the top-level object.
///
/// Top-level attributes sit at depth 1; each list element, map entry or
/// nested object attribute adds one.
pub const MAX_NESTING_DEPTH: usize = 128;
