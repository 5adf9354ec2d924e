//! Error types for stylecast
//!
//! This module provides error types for both subsystems:
//! - Style errors (cascade construction, custom property registration)
//! - Paint errors (display list building, hit testing, table grids)
//!
//! All errors use the `thiserror` crate for minimal boilerplate and
//! proper error trait implementations.
//!
//! Note that CSS-level invalidity (cyclic custom properties, failed
//! registered-syntax validation, oversized substitutions) is *not* an error:
//! it computes to the guaranteed-invalid value and recovers to
//! initial/inherited values. The types here cover programmer-facing misuse
//! of the API surface.

use thiserror::Error;

/// Result type alias for stylecast operations
///
/// # Examples
///
/// ```
/// use stylecast::Result;
///
/// fn build_style() -> Result<()> {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for stylecast
#[derive(Error, Debug)]
pub enum Error {
  /// Cascade or custom property error
  #[error("Style error: {0}")]
  Style(#[from] StyleError),

  /// Display list building or hit testing error
  #[error("Paint error: {0}")]
  Paint(#[from] PaintError),

  /// Generic error for miscellaneous issues
  #[error("{0}")]
  Other(String),
}

/// Errors from the cascade resolver and custom property registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StyleError {
  /// A custom property registration used an invalid name
  ///
  /// Registered names must start with `--` and contain no whitespace.
  #[error("Invalid custom property name: {name}")]
  InvalidPropertyName { name: String },

  /// A registered custom property's initial value does not match its syntax
  #[error("Initial value '{value}' does not match syntax for {name}")]
  InvalidInitialValue { name: String, value: String },

  /// A registration with a non-universal syntax omitted its initial value
  ///
  /// Per CSS Properties and Values, `syntax` other than `*` requires a
  /// computationally-independent initial value.
  #[error("Registration of {name} requires an initial value")]
  MissingInitialValue { name: String },

  /// Declarations were added out of origin order
  #[error("Declaration added for origin {added} after origin {current} was sealed")]
  OriginOrder { added: &'static str, current: &'static str },
}

/// Errors from display list building and hit testing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaintError {
  /// A display list ended with unbalanced push/pop pairs
  #[error("Unbalanced display list: {pushes} pushes, {pops} pops")]
  UnbalancedList { pushes: usize, pops: usize },

  /// A table fragment referenced a grid slot outside the resolved grid
  #[error("Table grid position ({row}, {column}) out of bounds for {rows}x{columns} grid")]
  GridOutOfBounds {
    row: usize,
    column: usize,
    rows: usize,
    columns: usize,
  },

  /// A fragment tree contained no root fragment
  #[error("Fragment tree has no root")]
  EmptyTree,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn error_messages_include_context() {
    let err = Error::from(StyleError::InvalidPropertyName {
      name: "color".to_string(),
    });
    assert!(err.to_string().contains("color"));

    let err = Error::from(PaintError::GridOutOfBounds {
      row: 3,
      column: 1,
      rows: 2,
      columns: 2,
    });
    assert!(err.to_string().contains("(3, 1)"));
  }
}
