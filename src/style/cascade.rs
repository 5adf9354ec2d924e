//! CSS Cascade Resolution
//!
//! Implements the cascade: given every declaration that applies to an
//! element, tagged with origin, specificity, and importance, determine the
//! winning value per property and produce a [`ComputedStyle`].
//!
//! Declarations are added in strict origin order. The cascade map is updated
//! incrementally as declarations arrive: for each property it tracks the
//! highest [`CascadePriority`] seen so far, with last-writer-wins among
//! equal priorities. Application then resolves `var()` references lazily
//! through a [`CascadeResolver`] (with cycle detection), interprets CSS-wide
//! keywords, and applies each winning longhand.
//!
//! Reference: CSS Cascading and Inheritance Level 4
//! <https://www.w3.org/TR/css-cascade-4/>

use crate::css::properties::parse_property_value;
use crate::css::types::{CssWideKeyword, Declaration, PropertyValue};
use crate::error::StyleError;
use crate::geometry::Size;
use crate::style::cascade_priority::{CascadeOrigin, CascadePriority, RevertGroup};
use crate::style::computed::ComputedStyle;
use crate::style::custom_properties::{CustomPropertyRegistry, CustomPropertyStore};
use crate::style::properties::{ApplyContext, PropertyId};
use crate::style::var_resolution::{substitute, CascadeResolver, VariableEnv};
use lru::LruCache;
use rustc_hash::FxHashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Entries kept by the substitution cache
///
/// Sized for one element's worth of custom properties with headroom;
/// entries from earlier generations are overwritten lazily.
const SUBSTITUTION_CACHE_CAPACITY: NonZeroUsize = NonZeroUsize::new(512).unwrap();

/// A declaration recorded by the cascade together with its provenance
#[derive(Debug, Clone)]
pub struct SourceDeclaration {
  pub declaration: Declaration,
  pub origin: CascadeOrigin,
  pub priority: CascadePriority,
}

/// Reference to the current winner for one property
#[derive(Debug, Clone, Copy)]
pub struct CascadeEntry {
  /// Index into the cascade's declaration list
  pub index: usize,
  pub priority: CascadePriority,
}

/// Property → winning declaration map, updated incrementally
#[derive(Debug, Clone, Default)]
pub struct CascadeMap {
  native: FxHashMap<PropertyId, CascadeEntry>,
  custom: FxHashMap<String, CascadeEntry>,
}

impl CascadeMap {
  fn add_native(&mut self, id: PropertyId, entry: CascadeEntry) {
    match self.native.get_mut(&id) {
      Some(existing) if entry.priority < existing.priority => {}
      Some(existing) => *existing = entry,
      None => {
        self.native.insert(id, entry);
      }
    }
  }

  fn add_custom(&mut self, name: &str, entry: CascadeEntry) {
    match self.custom.get_mut(name) {
      Some(existing) if entry.priority < existing.priority => {}
      Some(existing) => *existing = entry,
      None => {
        self.custom.insert(name.to_string(), entry);
      }
    }
  }

  /// Current winner for a native property
  pub fn native_winner(&self, id: PropertyId) -> Option<CascadeEntry> {
    self.native.get(&id).copied()
  }

  /// Current winner for a custom property
  pub fn custom_winner(&self, name: &str) -> Option<CascadeEntry> {
    self.custom.get(name).copied()
  }

  fn clear(&mut self) {
    self.native.clear();
    self.custom.clear();
  }
}

/// The cascade for one element
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use stylecast::css::Declaration;
/// use stylecast::style::cascade::StyleCascade;
/// use stylecast::style::cascade_priority::CascadeOrigin;
/// use stylecast::style::custom_properties::CustomPropertyRegistry;
/// use stylecast::ComputedStyle;
/// use stylecast::Rgba;
///
/// let registry = Arc::new(CustomPropertyRegistry::new());
/// let mut cascade = StyleCascade::new(registry);
/// cascade
///     .add(Declaration::parse("--accent", "#ff0000", false), CascadeOrigin::Author, 10)
///     .unwrap();
/// cascade
///     .add(Declaration::parse("color", "var(--accent)", false), CascadeOrigin::Author, 10)
///     .unwrap();
///
/// let style = cascade.apply(&ComputedStyle::default());
/// assert_eq!(style.color, Rgba::RED);
/// ```
pub struct StyleCascade {
  registry: Arc<CustomPropertyRegistry>,
  declarations: Vec<SourceDeclaration>,
  map: CascadeMap,
  current_origin: Option<CascadeOrigin>,
  generation: u16,
  substitution_cache: LruCache<String, (u16, Option<Arc<str>>)>,
  root_font_size: f32,
  viewport: Size,
}

impl std::fmt::Debug for StyleCascade {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StyleCascade")
      .field("declarations", &self.declarations.len())
      .field("generation", &self.generation)
      .field("current_origin", &self.current_origin)
      .finish_non_exhaustive()
  }
}

impl StyleCascade {
  /// Creates an empty cascade using the given custom property registry
  pub fn new(registry: Arc<CustomPropertyRegistry>) -> Self {
    Self {
      registry,
      declarations: Vec::new(),
      map: CascadeMap::default(),
      current_origin: None,
      generation: 0,
      substitution_cache: LruCache::new(SUBSTITUTION_CACHE_CAPACITY),
      root_font_size: 16.0,
      viewport: Size::ZERO,
    }
  }

  /// Sets the root font size used to resolve rem units
  pub fn with_root_font_size(mut self, px: f32) -> Self {
    self.root_font_size = px;
    self
  }

  /// Sets the viewport size used to resolve vw/vh units
  pub fn with_viewport(mut self, viewport: Size) -> Self {
    self.viewport = viewport;
    self
  }

  /// Adds a declaration under the given origin and selector specificity
  ///
  /// Declarations must arrive in non-decreasing origin order; within an
  /// origin, call order is document order and breaks ties.
  pub fn add(&mut self, declaration: Declaration, origin: CascadeOrigin, specificity: u32) -> Result<(), StyleError> {
    if let Some(current) = self.current_origin {
      if origin < current {
        return Err(StyleError::OriginOrder {
          added: origin.name(),
          current: current.name(),
        });
      }
    }
    self.current_origin = Some(origin);

    let position = self.declarations.len() as u32;
    let priority = CascadePriority::new(origin, declaration.important, specificity, position);
    let entry = CascadeEntry {
      index: self.declarations.len(),
      priority,
    };

    if declaration.is_custom_property() {
      self.map.add_custom(&declaration.property, entry);
    } else if let Some(id) = PropertyId::parse(&declaration.property) {
      self.map.add_native(id, entry);
    }
    // Unknown native properties are recorded but never win anything.

    self.declarations.push(SourceDeclaration {
      declaration,
      origin,
      priority,
    });
    Ok(())
  }

  /// Clears all declarations and invalidates cached substitutions
  pub fn reset(&mut self) {
    self.declarations.clear();
    self.map.clear();
    self.current_origin = None;
    self.generation = self.generation.wrapping_add(1);
  }

  /// The current cache generation
  pub fn generation(&self) -> u16 {
    self.generation
  }

  /// Read access to the cascade map, for inspection
  pub fn map(&self) -> &CascadeMap {
    &self.map
  }

  /// The recorded declarations in add order
  pub fn declarations(&self) -> &[SourceDeclaration] {
    &self.declarations
  }

  /// Resolves the cascade into a computed style
  ///
  /// Bumps the generation counter first: substitution results cached by an
  /// earlier apply (or before a reset) are never reused.
  pub fn apply(&mut self, parent: &ComputedStyle) -> ComputedStyle {
    self.generation = self.generation.wrapping_add(1);

    // Baseline: inherited properties from the parent, initial values
    // elsewhere, custom properties filtered through inheritance rules and
    // seeded with registered initial values.
    let mut style = ComputedStyle::inherit_from(parent);
    let mut baseline_store = style.custom_properties.clone();
    baseline_store.retain_inherited(&self.registry);
    let seeds = self.registry.initial_values();
    for (name, value) in seeds.iter() {
      if !baseline_store.contains(name) {
        baseline_store.insert(name.to_string(), value);
      }
    }

    let ctx = ApplyContext {
      parent_font_size: parent.font_size,
      root_font_size: self.root_font_size,
      viewport: self.viewport,
    };

    let custom_names: Vec<String> = self.map.custom.keys().cloned().collect();
    let mut native_entries: Vec<(PropertyId, CascadeEntry)> = self.map.native.iter().map(|(k, v)| (*k, *v)).collect();
    // Color and font-size first so currentcolor/em in later declarations
    // resolve against this element; the remainder in add order for
    // deterministic application.
    native_entries.sort_by_key(|(id, entry)| (!id.is_high_priority(), entry.index));

    let mut final_store = baseline_store.clone();
    {
      let mut env = CascadeEnv {
        declarations: &self.declarations,
        map: &self.map,
        registry: &self.registry,
        baseline: &baseline_store,
        parent_store: &parent.custom_properties,
        cache: &mut self.substitution_cache,
        generation: self.generation,
      };
      let mut resolver = CascadeResolver::new();

      for name in &custom_names {
        match env.resolve_variable(name, &mut resolver) {
          Some(value) => final_store.insert(name.clone(), value),
          None => {
            final_store.remove(name);
          }
        }
      }

      for (id, entry) in native_entries {
        env.apply_native(&mut style, parent, &ctx, &mut resolver, id, entry);
      }
    }

    style.custom_properties = final_store;
    style
  }
}

/// Resolution environment for one apply pass
///
/// Borrows the cascade's declaration store and substitution cache, plus the
/// parent-derived custom property baselines.
struct CascadeEnv<'a> {
  declarations: &'a [SourceDeclaration],
  map: &'a CascadeMap,
  registry: &'a CustomPropertyRegistry,
  /// Parent store after inheritance filtering and initial-value seeding
  baseline: &'a CustomPropertyStore,
  /// The parent's actual store, for explicit `inherit`
  parent_store: &'a CustomPropertyStore,
  cache: &'a mut LruCache<String, (u16, Option<Arc<str>>)>,
  generation: u16,
}

impl VariableEnv for CascadeEnv<'_> {
  fn resolve_variable(&mut self, name: &str, resolver: &mut CascadeResolver) -> Option<Arc<str>> {
    if let Some((generation, cached)) = self.cache.get(name) {
      if *generation == self.generation {
        return cached.clone();
      }
    }

    let Some(entry) = self.map.custom_winner(name) else {
      // Not declared on this element: the inherited (or seeded initial)
      // value is already fully resolved.
      let value = self.baseline.get_arc(name);
      self.cache.put(name.to_string(), (self.generation, value.clone()));
      return value;
    };

    let resolved = self.resolve_custom_declaration(name, entry, resolver);
    self.cache.put(name.to_string(), (self.generation, resolved.clone()));
    resolved
  }
}

impl CascadeEnv<'_> {
  /// Resolves a declared custom property to its substituted value
  ///
  /// Returns `None` for guaranteed-invalid results (cycles, missing
  /// references, failed syntax validation without a registered initial).
  fn resolve_custom_declaration(
    &mut self,
    name: &str,
    entry: CascadeEntry,
    resolver: &mut CascadeResolver,
  ) -> Option<Arc<str>> {
    let source = &self.declarations[entry.index];

    if let Some(keyword) = source.declaration.css_wide_keyword() {
      return self.resolve_custom_keyword(name, source.origin.revert_group(), keyword, resolver);
    }

    let raw = source.declaration.raw_value.clone();
    if !crate::style::var_resolution::contains_var(&raw) {
      return self.validated(name, raw);
    }

    if resolver.detect_cycle(name) {
      return None;
    }
    resolver.push(name);
    let result = substitute(&raw, self, resolver);
    resolver.pop();

    match result {
      Ok(text) => self.validated(name, text),
      Err(_) => self.registered_initial(name),
    }
  }

  /// Applies a CSS-wide keyword declared on a custom property
  fn resolve_custom_keyword(
    &mut self,
    name: &str,
    group: RevertGroup,
    keyword: CssWideKeyword,
    resolver: &mut CascadeResolver,
  ) -> Option<Arc<str>> {
    match keyword {
      CssWideKeyword::Initial => self.registered_initial(name),
      CssWideKeyword::Inherit => self.parent_store.get_arc(name),
      CssWideKeyword::Unset => {
        if self.registry.is_non_inheriting(name) {
          self.registered_initial(name)
        } else {
          self.parent_store.get_arc(name)
        }
      }
      CssWideKeyword::Revert => match self.find_custom_below(name, group) {
        Some(entry) => {
          let source = &self.declarations[entry.index];
          let lower_group = source.origin.revert_group();
          if let Some(lower_keyword) = source.declaration.css_wide_keyword() {
            self.resolve_custom_keyword(name, lower_group, lower_keyword, resolver)
          } else {
            self.resolve_custom_declaration(name, entry, resolver)
          }
        }
        // Nothing below: unset semantics.
        None => {
          if self.registry.is_non_inheriting(name) {
            self.registered_initial(name)
          } else {
            self.parent_store.get_arc(name)
          }
        }
      },
    }
  }

  /// Validates a substituted value against any registered syntax
  fn validated(&self, name: &str, text: String) -> Option<Arc<str>> {
    if self.registry.validates(name, &text) {
      Some(Arc::from(text.as_str()))
    } else {
      self.registered_initial(name)
    }
  }

  fn registered_initial(&self, name: &str) -> Option<Arc<str>> {
    self
      .registry
      .get(name)
      .and_then(|rule| rule.initial_value.as_deref())
      .map(Arc::from)
  }

  /// Best declaration for a custom property strictly below `group`
  fn find_custom_below(&self, name: &str, group: RevertGroup) -> Option<CascadeEntry> {
    self.find_below(group, |decl| decl.property == name)
  }

  /// Best declaration for a native property strictly below `group`
  fn find_native_below(&self, id: PropertyId, group: RevertGroup) -> Option<CascadeEntry> {
    self.find_below(group, |decl| decl.property == id.name())
  }

  fn find_below(&self, group: RevertGroup, matches: impl Fn(&Declaration) -> bool) -> Option<CascadeEntry> {
    let mut best: Option<CascadeEntry> = None;
    for (index, source) in self.declarations.iter().enumerate() {
      if source.origin.revert_group() >= group || !matches(&source.declaration) {
        continue;
      }
      let entry = CascadeEntry {
        index,
        priority: source.priority,
      };
      match best {
        Some(existing) if entry.priority < existing.priority => {}
        _ => best = Some(entry),
      }
    }
    best
  }

  /// Applies the winning declaration for one native longhand
  fn apply_native(
    &mut self,
    style: &mut ComputedStyle,
    parent: &ComputedStyle,
    ctx: &ApplyContext,
    resolver: &mut CascadeResolver,
    id: PropertyId,
    entry: CascadeEntry,
  ) {
    let source = &self.declarations[entry.index];

    if let Some(keyword) = source.declaration.css_wide_keyword() {
      let group = source.origin.revert_group();
      self.apply_native_keyword(style, parent, ctx, resolver, id, group, keyword);
      return;
    }

    match &source.declaration.value {
      PropertyValue::Pending(raw) => {
        let raw = raw.clone();
        match substitute(&raw, self, resolver) {
          Ok(text) => {
            if let Some(value) = parse_property_value(id.name(), &text) {
              id.apply(style, &value, ctx);
            }
            // A substituted value the grammar rejects is invalid at
            // computed-value time: the defaulted baseline stands.
          }
          Err(_) => {}
        }
      }
      value => {
        id.apply(style, value, ctx);
      }
    }
  }

  fn apply_native_keyword(
    &mut self,
    style: &mut ComputedStyle,
    parent: &ComputedStyle,
    ctx: &ApplyContext,
    resolver: &mut CascadeResolver,
    id: PropertyId,
    group: RevertGroup,
    keyword: CssWideKeyword,
  ) {
    match keyword {
      CssWideKeyword::Initial => id.apply_initial(style),
      CssWideKeyword::Inherit => id.apply_inherit(style, parent),
      CssWideKeyword::Unset => {
        if id.is_inherited() {
          id.apply_inherit(style, parent);
        } else {
          id.apply_initial(style);
        }
      }
      CssWideKeyword::Revert => match self.find_native_below(id, group) {
        Some(entry) => {
          let source = &self.declarations[entry.index];
          let lower_group = source.origin.revert_group();
          if let Some(lower_keyword) = source.declaration.css_wide_keyword() {
            self.apply_native_keyword(style, parent, ctx, resolver, id, lower_group, lower_keyword);
          } else {
            self.apply_native(style, parent, ctx, resolver, id, entry);
          }
        }
        None => {
          if id.is_inherited() {
            id.apply_inherit(style, parent);
          } else {
            id.apply_initial(style);
          }
        }
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::style::color::Rgba;

  fn cascade() -> StyleCascade {
    StyleCascade::new(Arc::new(CustomPropertyRegistry::new()))
  }

  fn add(cascade: &mut StyleCascade, property: &str, value: &str, origin: CascadeOrigin, specificity: u32) {
    let important = value.trim_end().ends_with("!important");
    let value = value.trim_end().trim_end_matches("!important").trim_end();
    cascade
      .add(Declaration::parse(property, value, important), origin, specificity)
      .unwrap();
  }

  #[test]
  fn later_declaration_wins_at_equal_priority() {
    let mut c = cascade();
    add(&mut c, "color", "red", CascadeOrigin::Author, 1);
    add(&mut c, "color", "blue", CascadeOrigin::Author, 1);
    let style = c.apply(&ComputedStyle::default());
    assert_eq!(style.color, Rgba::rgb(0, 0, 255));
  }

  #[test]
  fn higher_specificity_wins_over_later_position() {
    let mut c = cascade();
    add(&mut c, "color", "red", CascadeOrigin::Author, 100);
    add(&mut c, "color", "blue", CascadeOrigin::Author, 1);
    let style = c.apply(&ComputedStyle::default());
    assert_eq!(style.color, Rgba::RED);
  }

  #[test]
  fn author_overrides_user_agent() {
    let mut c = cascade();
    add(&mut c, "color", "red", CascadeOrigin::UserAgent, 999);
    add(&mut c, "color", "blue", CascadeOrigin::Author, 0);
    let style = c.apply(&ComputedStyle::default());
    assert_eq!(style.color, Rgba::rgb(0, 0, 255));
  }

  #[test]
  fn important_user_agent_overrides_important_author() {
    let mut c = cascade();
    add(&mut c, "color", "red !important", CascadeOrigin::UserAgent, 0);
    add(&mut c, "color", "blue !important", CascadeOrigin::Author, 999);
    let style = c.apply(&ComputedStyle::default());
    assert_eq!(style.color, Rgba::RED);
  }

  #[test]
  fn origins_must_arrive_in_order() {
    let mut c = cascade();
    add(&mut c, "color", "red", CascadeOrigin::Author, 0);
    let err = c
      .add(Declaration::parse("color", "blue", false), CascadeOrigin::UserAgent, 0)
      .unwrap_err();
    assert!(matches!(err, StyleError::OriginOrder { .. }));
  }

  #[test]
  fn reset_clears_declarations_and_bumps_generation() {
    let mut c = cascade();
    add(&mut c, "color", "red", CascadeOrigin::Author, 0);
    let generation = c.generation();
    c.reset();
    assert!(c.declarations().is_empty());
    assert_ne!(c.generation(), generation);
    let style = c.apply(&ComputedStyle::default());
    assert_eq!(style.color, Rgba::BLACK);
  }

  #[test]
  fn unset_inherits_for_inherited_properties() {
    let mut parent = ComputedStyle::default();
    parent.color = Rgba::RED;
    let mut c = cascade();
    add(&mut c, "color", "unset", CascadeOrigin::Author, 0);
    let style = c.apply(&parent);
    assert_eq!(style.color, Rgba::RED);
  }

  #[test]
  fn unset_resets_non_inherited_properties() {
    let mut c = cascade();
    add(&mut c, "background-color", "green", CascadeOrigin::UserAgent, 0);
    add(&mut c, "background-color", "unset", CascadeOrigin::Author, 0);
    let style = c.apply(&ComputedStyle::default());
    assert_eq!(style.background_color, Rgba::TRANSPARENT);
  }

  #[test]
  fn inherit_copies_non_inherited_property_from_parent() {
    let mut parent = ComputedStyle::default();
    parent.background_color = Rgba::rgb(0, 128, 0);
    let mut c = cascade();
    add(&mut c, "background-color", "inherit", CascadeOrigin::Author, 0);
    let style = c.apply(&parent);
    assert_eq!(style.background_color, Rgba::rgb(0, 128, 0));
  }

  #[test]
  fn revert_rolls_back_to_lower_origin() {
    let mut c = cascade();
    add(&mut c, "color", "green", CascadeOrigin::UserAgent, 0);
    add(&mut c, "color", "blue", CascadeOrigin::User, 0);
    add(&mut c, "color", "revert", CascadeOrigin::Author, 0);
    let style = c.apply(&ComputedStyle::default());
    assert_eq!(style.color, Rgba::rgb(0, 0, 255));
  }

  #[test]
  fn revert_chains_through_multiple_origins() {
    let mut c = cascade();
    add(&mut c, "color", "green", CascadeOrigin::UserAgent, 0);
    add(&mut c, "color", "revert", CascadeOrigin::User, 0);
    add(&mut c, "color", "revert", CascadeOrigin::Author, 0);
    let style = c.apply(&ComputedStyle::default());
    assert_eq!(style.color, Rgba::rgb(0, 128, 0));
  }

  #[test]
  fn revert_with_nothing_below_acts_as_unset() {
    let mut parent = ComputedStyle::default();
    parent.color = Rgba::RED;
    let mut c = cascade();
    add(&mut c, "color", "revert", CascadeOrigin::Author, 0);
    let style = c.apply(&parent);
    assert_eq!(style.color, Rgba::RED);
  }

  #[test]
  fn animation_beats_normal_author_but_loses_to_important() {
    let mut c = cascade();
    add(&mut c, "opacity", "0.9 !important", CascadeOrigin::Author, 0);
    add(&mut c, "opacity", "0.1", CascadeOrigin::Animation, 0);
    let style = c.apply(&ComputedStyle::default());
    assert!((style.opacity - 0.9).abs() < f32::EPSILON);

    let mut c = cascade();
    add(&mut c, "opacity", "0.9", CascadeOrigin::Author, 0);
    add(&mut c, "opacity", "0.1", CascadeOrigin::Animation, 0);
    let style = c.apply(&ComputedStyle::default());
    assert!((style.opacity - 0.1).abs() < f32::EPSILON);
  }

  #[test]
  fn transition_beats_important() {
    let mut c = cascade();
    add(&mut c, "opacity", "0.9 !important", CascadeOrigin::Author, 0);
    add(&mut c, "opacity", "0.3", CascadeOrigin::Transition, 0);
    let style = c.apply(&ComputedStyle::default());
    assert!((style.opacity - 0.3).abs() < f32::EPSILON);
  }

  #[test]
  fn var_substitution_resolves_through_custom_property() {
    let mut c = cascade();
    add(&mut c, "--main", "#ff0000", CascadeOrigin::Author, 0);
    add(&mut c, "background-color", "var(--main)", CascadeOrigin::Author, 0);
    let style = c.apply(&ComputedStyle::default());
    assert_eq!(style.background_color, Rgba::RED);
    assert_eq!(style.custom_properties.get("--main"), Some("#ff0000"));
  }

  #[test]
  fn var_with_missing_reference_leaves_baseline() {
    let mut parent = ComputedStyle::default();
    parent.color = Rgba::RED;
    let mut c = cascade();
    add(&mut c, "color", "var(--missing)", CascadeOrigin::Author, 0);
    let style = c.apply(&parent);
    // Invalid at computed-value time: unset semantics, so color inherits.
    assert_eq!(style.color, Rgba::RED);
  }

  #[test]
  fn custom_properties_inherit_from_parent() {
    let mut parent = ComputedStyle::default();
    parent.custom_properties.insert("--theme", "dark");
    let mut c = cascade();
    add(&mut c, "color", "red", CascadeOrigin::Author, 0);
    let style = c.apply(&parent);
    assert_eq!(style.custom_properties.get("--theme"), Some("dark"));
  }

  #[test]
  fn cyclic_custom_properties_become_guaranteed_invalid() {
    let mut parent = ComputedStyle::default();
    parent.custom_properties.insert("--a", "from-parent");
    let mut c = cascade();
    add(&mut c, "--a", "var(--b)", CascadeOrigin::Author, 0);
    add(&mut c, "--b", "var(--a)", CascadeOrigin::Author, 0);
    let style = c.apply(&parent);
    // Cycle participants do not fall back to the inherited value.
    assert_eq!(style.custom_properties.get("--a"), None);
    assert_eq!(style.custom_properties.get("--b"), None);
  }

  #[test]
  fn cycle_adjacent_property_keeps_fallback() {
    let mut c = cascade();
    add(&mut c, "--a", "var(--b)", CascadeOrigin::Author, 0);
    add(&mut c, "--b", "var(--a)", CascadeOrigin::Author, 0);
    add(&mut c, "--c", "var(--a, 10px)", CascadeOrigin::Author, 0);
    let style = c.apply(&ComputedStyle::default());
    assert_eq!(style.custom_properties.get("--c"), Some("10px"));
  }

  #[test]
  fn registered_property_falls_back_to_initial_on_cycle() {
    let mut registry = CustomPropertyRegistry::new();
    registry
      .register(crate::style::custom_properties::PropertyRule {
        name: "--gap".to_string(),
        syntax: crate::style::custom_properties::CustomPropertySyntax::Length,
        inherits: true,
        initial_value: Some("4px".to_string()),
      })
      .unwrap();
    let mut c = StyleCascade::new(Arc::new(registry));
    add(&mut c, "--gap", "var(--gap)", CascadeOrigin::Author, 0);
    let style = c.apply(&ComputedStyle::default());
    assert_eq!(style.custom_properties.get("--gap"), Some("4px"));
  }

  #[test]
  fn registered_syntax_validation_rejects_bad_substitution() {
    let mut registry = CustomPropertyRegistry::new();
    registry
      .register(crate::style::custom_properties::PropertyRule {
        name: "--gap".to_string(),
        syntax: crate::style::custom_properties::CustomPropertySyntax::Length,
        inherits: true,
        initial_value: Some("4px".to_string()),
      })
      .unwrap();
    let mut c = StyleCascade::new(Arc::new(registry));
    add(&mut c, "--gap", "definitely-not-a-length", CascadeOrigin::Author, 0);
    let style = c.apply(&ComputedStyle::default());
    assert_eq!(style.custom_properties.get("--gap"), Some("4px"));
  }

  #[test]
  fn registered_non_inheriting_property_resets_to_initial() {
    let mut registry = CustomPropertyRegistry::new();
    registry
      .register(crate::style::custom_properties::PropertyRule {
        name: "--local".to_string(),
        syntax: crate::style::custom_properties::CustomPropertySyntax::Length,
        inherits: false,
        initial_value: Some("2px".to_string()),
      })
      .unwrap();
    let mut parent = ComputedStyle::default();
    parent.custom_properties.insert("--local", "100px");
    let mut c = StyleCascade::new(Arc::new(registry));
    add(&mut c, "color", "red", CascadeOrigin::Author, 0);
    let style = c.apply(&parent);
    assert_eq!(style.custom_properties.get("--local"), Some("2px"));
  }

  #[test]
  fn em_border_width_uses_declared_font_size() {
    let mut c = cascade();
    add(&mut c, "font-size", "20px", CascadeOrigin::Author, 0);
    add(&mut c, "border-top-width", "2em", CascadeOrigin::Author, 0);
    add(&mut c, "border-top-style", "solid", CascadeOrigin::Author, 0);
    let style = c.apply(&ComputedStyle::default());
    assert_eq!(style.border_top.width, 40.0);
  }

  #[test]
  fn currentcolor_border_uses_declared_color() {
    let mut c = cascade();
    add(&mut c, "color", "red", CascadeOrigin::Author, 0);
    add(&mut c, "border-top-color", "currentcolor", CascadeOrigin::Author, 0);
    let style = c.apply(&ComputedStyle::default());
    assert_eq!(style.border_top.color, Rgba::RED);
  }

  #[test]
  fn custom_property_inherit_keyword_takes_parent_value() {
    let mut registry = CustomPropertyRegistry::new();
    registry
      .register(crate::style::custom_properties::PropertyRule {
        name: "--local".to_string(),
        syntax: crate::style::custom_properties::CustomPropertySyntax::Universal,
        inherits: false,
        initial_value: Some("fallback".to_string()),
      })
      .unwrap();
    let mut parent = ComputedStyle::default();
    parent.custom_properties.insert("--local", "from-parent");
    let mut c = StyleCascade::new(Arc::new(registry));
    add(&mut c, "--local", "inherit", CascadeOrigin::Author, 0);
    let style = c.apply(&parent);
    assert_eq!(style.custom_properties.get("--local"), Some("from-parent"));
  }
}
