//! Cascade origins and declaration priority
//!
//! Every declaration enters the cascade with an origin, an importance flag,
//! a selector specificity, and a position (document/rule order). These fold
//! into a single totally-ordered [`CascadePriority`]; the cascade map keeps
//! the highest priority per property with last-writer-wins among equals.
//!
//! Reference: CSS Cascading and Inheritance Level 4, §6
//! <https://www.w3.org/TR/css-cascade-4/#cascading>

use std::fmt;

/// Ranked source of a style declaration
///
/// Declarations must be added to the cascade in this order. Presentational
/// hints are author-level declarations contributed by markup attributes;
/// animations and transitions are interpolated values sampled upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CascadeOrigin {
  UserAgent,
  User,
  AuthorPresentationalHint,
  Author,
  Animation,
  Transition,
}

impl CascadeOrigin {
  /// Short name for diagnostics
  pub fn name(self) -> &'static str {
    match self {
      CascadeOrigin::UserAgent => "user-agent",
      CascadeOrigin::User => "user",
      CascadeOrigin::AuthorPresentationalHint => "presentational-hint",
      CascadeOrigin::Author => "author",
      CascadeOrigin::Animation => "animation",
      CascadeOrigin::Transition => "transition",
    }
  }

  /// The origin group `revert` rolls back from
  ///
  /// Presentational hints, animations, and transitions all sit at the
  /// author level for revert purposes.
  pub fn revert_group(self) -> RevertGroup {
    match self {
      CascadeOrigin::UserAgent => RevertGroup::UserAgent,
      CascadeOrigin::User => RevertGroup::User,
      CascadeOrigin::AuthorPresentationalHint
      | CascadeOrigin::Author
      | CascadeOrigin::Animation
      | CascadeOrigin::Transition => RevertGroup::Author,
    }
  }
}

/// Origin grouping used by `revert`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RevertGroup {
  UserAgent,
  User,
  Author,
}

/// Priority band folding importance into origin ordering
///
/// Important declarations invert the origin order among themselves, and
/// transitions outrank everything.
fn band(origin: CascadeOrigin, important: bool) -> u8 {
  match (origin, important) {
    (CascadeOrigin::UserAgent, false) => 0,
    (CascadeOrigin::User, false) => 1,
    (CascadeOrigin::AuthorPresentationalHint, _) => 2,
    (CascadeOrigin::Author, false) => 3,
    (CascadeOrigin::Animation, _) => 4,
    (CascadeOrigin::Author, true) => 5,
    (CascadeOrigin::User, true) => 6,
    (CascadeOrigin::UserAgent, true) => 7,
    (CascadeOrigin::Transition, _) => 8,
  }
}

/// Totally-ordered priority of one declaration
///
/// Ordering is lexicographic over (band, specificity, position): the
/// importance/origin band dominates, then selector specificity, then
/// document order so later declarations win ties.
///
/// # Examples
///
/// ```
/// use stylecast::style::cascade_priority::{CascadeOrigin, CascadePriority};
///
/// let author = CascadePriority::new(CascadeOrigin::Author, false, 10, 0);
/// let important_ua = CascadePriority::new(CascadeOrigin::UserAgent, true, 0, 0);
/// assert!(important_ua > author);
///
/// let earlier = CascadePriority::new(CascadeOrigin::Author, false, 10, 1);
/// let later = CascadePriority::new(CascadeOrigin::Author, false, 10, 2);
/// assert!(later > earlier);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CascadePriority {
  band: u8,
  specificity: u32,
  position: u32,
}

impl CascadePriority {
  /// Creates a priority for a declaration
  pub fn new(origin: CascadeOrigin, important: bool, specificity: u32, position: u32) -> Self {
    Self {
      band: band(origin, important),
      specificity,
      position,
    }
  }

  /// The importance/origin band (higher wins)
  pub fn band(self) -> u8 {
    self.band
  }

  /// Selector specificity within the band
  pub fn specificity(self) -> u32 {
    self.specificity
  }

  /// Document-order position used as the final tie-break
  pub fn position(self) -> u32 {
    self.position
  }
}

impl fmt::Display for CascadePriority {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "band={} spec={} pos={}", self.band, self.specificity, self.position)
  }
}
