//! Custom property registration and storage
//!
//! Custom properties (`--x`) cascade like ordinary declarations but their
//! values are uninterpreted token streams until `var()` substitution. This
//! module provides:
//!
//! - [`CustomPropertyRegistry`]: `@property`-style registrations carrying a
//!   syntax, an inherits flag, and an initial value
//! - [`CustomPropertyStore`]: the per-element snapshot of resolved custom
//!   property values carried on `ComputedStyle`
//!
//! A value that fails its registered syntax, participates in a reference
//! cycle, or exceeds the substitution budget becomes *guaranteed invalid*:
//! it is absent from the store, and registered properties with an initial
//! value fall back to that initial value instead.
//!
//! Reference: CSS Properties and Values API Level 1
//! <https://www.w3.org/TR/css-properties-values-api-1/>

use crate::css::properties::parse_length;
use crate::error::StyleError;
use crate::style::types::LengthUnit;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Accepted value grammar for a registered custom property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomPropertySyntax {
  /// `*`: any token stream
  Universal,
  /// `<length>`
  Length,
  /// `<length-percentage>`
  LengthPercentage,
  /// `<percentage>`
  Percentage,
  /// `<number>`
  Number,
  /// `<integer>`
  Integer,
  /// `<color>`
  Color,
  /// A fixed set of identifiers, e.g. `small | large`
  Idents(Vec<String>),
}

impl CustomPropertySyntax {
  /// Parses a syntax descriptor string
  ///
  /// Only single-component syntaxes and ident lists are supported;
  /// multipliers (`+`, `#`) are not.
  pub fn parse(descriptor: &str) -> Option<Self> {
    let trimmed = descriptor.trim();
    match trimmed {
      "*" => return Some(CustomPropertySyntax::Universal),
      "<length>" => return Some(CustomPropertySyntax::Length),
      "<length-percentage>" => return Some(CustomPropertySyntax::LengthPercentage),
      "<percentage>" => return Some(CustomPropertySyntax::Percentage),
      "<number>" => return Some(CustomPropertySyntax::Number),
      "<integer>" => return Some(CustomPropertySyntax::Integer),
      "<color>" => return Some(CustomPropertySyntax::Color),
      _ => {}
    }

    let idents: Vec<String> = trimmed.split('|').map(|part| part.trim().to_string()).collect();
    if idents.is_empty() || idents.iter().any(|ident| ident.is_empty() || ident.starts_with('<')) {
      return None;
    }
    Some(CustomPropertySyntax::Idents(idents))
  }

  /// Returns true when `value` conforms to this syntax
  pub fn matches(&self, value: &str) -> bool {
    let value = value.trim();
    match self {
      CustomPropertySyntax::Universal => true,
      CustomPropertySyntax::Length => {
        matches!(parse_length(value), Some(len) if len.unit != LengthUnit::Percent)
      }
      CustomPropertySyntax::LengthPercentage => parse_length(value).is_some(),
      CustomPropertySyntax::Percentage => {
        matches!(parse_length(value), Some(len) if len.unit == LengthUnit::Percent)
      }
      CustomPropertySyntax::Number => value.parse::<f32>().is_ok(),
      CustomPropertySyntax::Integer => value.parse::<i32>().is_ok(),
      CustomPropertySyntax::Color => csscolorparser::parse(value).is_ok(),
      CustomPropertySyntax::Idents(idents) => idents.iter().any(|ident| ident == value),
    }
  }
}

/// Definition of a registered custom property
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRule {
  pub name: String,
  pub syntax: CustomPropertySyntax,
  /// Whether the property inherits (registered properties may opt out;
  /// unregistered ones always inherit)
  pub inherits: bool,
  /// Initial value, required for non-universal syntaxes
  pub initial_value: Option<String>,
}

/// Registry of custom property registrations
///
/// # Examples
///
/// ```
/// use stylecast::style::custom_properties::{CustomPropertyRegistry, CustomPropertySyntax, PropertyRule};
///
/// let mut registry = CustomPropertyRegistry::new();
/// registry
///     .register(PropertyRule {
///         name: "--gap".to_string(),
///         syntax: CustomPropertySyntax::Length,
///         inherits: false,
///         initial_value: Some("4px".to_string()),
///     })
///     .unwrap();
///
/// assert!(registry.get("--gap").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomPropertyRegistry {
  definitions: FxHashMap<String, PropertyRule>,
}

impl CustomPropertyRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register (or replace) a custom property definition
  ///
  /// Validates the name, and that non-universal syntaxes carry a conforming
  /// initial value.
  pub fn register(&mut self, rule: PropertyRule) -> Result<(), StyleError> {
    if !is_valid_custom_property_name(&rule.name) {
      return Err(StyleError::InvalidPropertyName { name: rule.name });
    }
    if !matches!(rule.syntax, CustomPropertySyntax::Universal) {
      let Some(initial) = rule.initial_value.as_deref() else {
        return Err(StyleError::MissingInitialValue { name: rule.name });
      };
      if !rule.syntax.matches(initial) {
        return Err(StyleError::InvalidInitialValue {
          name: rule.name.clone(),
          value: initial.to_string(),
        });
      }
    }
    self.definitions.insert(rule.name.clone(), rule);
    Ok(())
  }

  /// Look up a registered custom property definition by name
  pub fn get(&self, name: &str) -> Option<&PropertyRule> {
    self.definitions.get(name)
  }

  /// Returns true when `name` is registered as non-inheriting
  pub fn is_non_inheriting(&self, name: &str) -> bool {
    self.get(name).is_some_and(|rule| !rule.inherits)
  }

  /// Validate a value against a property's registered syntax
  ///
  /// Unregistered properties accept anything.
  pub fn validates(&self, name: &str, value: &str) -> bool {
    match self.get(name) {
      Some(rule) => rule.syntax.matches(value),
      None => true,
    }
  }

  /// Seed a store with the initial values of all registered properties
  pub fn initial_values(&self) -> CustomPropertyStore {
    let mut store = CustomPropertyStore::default();
    for (name, rule) in self.definitions.iter() {
      if let Some(value) = rule.initial_value.as_ref() {
        store.insert(name.clone(), value.as_str());
      }
    }
    store
  }

  pub fn len(&self) -> usize {
    self.definitions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.definitions.is_empty()
  }
}

/// Per-element snapshot of custom property values
///
/// Values are substituted token text. Guaranteed-invalid properties are
/// simply absent. Cloning is cheap-ish: values are shared `Arc<str>`s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomPropertyStore {
  values: FxHashMap<String, Arc<str>>,
}

impl CustomPropertyStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Sets a property value
  pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Arc<str>>) {
    self.values.insert(name.into(), value.into());
  }

  /// Removes a property (making it guaranteed-invalid / unset)
  pub fn remove(&mut self, name: &str) -> Option<Arc<str>> {
    self.values.remove(name)
  }

  /// Returns the value token text
  pub fn get(&self, name: &str) -> Option<&str> {
    self.values.get(name).map(|v| v.as_ref())
  }

  /// Returns the shared value
  pub fn get_arc(&self, name: &str) -> Option<Arc<str>> {
    self.values.get(name).cloned()
  }

  pub fn contains(&self, name: &str) -> bool {
    self.values.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  /// Iterates over (name, value) pairs in arbitrary order
  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.values.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
  }

  /// Drops every value registered as non-inheriting
  ///
  /// Called when building a child's inherited store: non-inheriting
  /// registered properties reset to their initial value instead.
  pub fn retain_inherited(&mut self, registry: &CustomPropertyRegistry) {
    self.values.retain(|name, _| !registry.is_non_inheriting(name));
    for (name, rule) in registry.definitions.iter() {
      if !rule.inherits {
        if let Some(initial) = rule.initial_value.as_ref() {
          self.values.insert(name.clone(), Arc::from(initial.as_str()));
        }
      }
    }
  }
}

/// Validates that a custom property name follows CSS naming rules
pub fn is_valid_custom_property_name(name: &str) -> bool {
  if !name.starts_with("--") {
    return false;
  }
  if name.len() <= 2 {
    return false; // Just "--" is not valid
  }
  !name[2..].chars().any(char::is_whitespace)
}
