//! CSS Custom Property (var()) Substitution
//!
//! Implements token-based substitution of `var()` references using
//! `cssparser` so that nested functions, fallbacks with commas, and repeated
//! substitutions are handled correctly.
//!
//! # Cycle detection
//!
//! Substitution runs against a [`CascadeResolver`], a stack of the custom
//! properties currently being resolved. Encountering a property that is
//! already on the stack marks every property from its first occurrence to
//! the stack top as part of a cycle; all participants resolve to the
//! guaranteed-invalid value. A property that merely *references* a cyclic
//! variable (cycle-adjacent) is not itself cyclic and may be rescued by a
//! `var()` fallback. Only actually-traversed edges count: a reference inside
//! an unused fallback branch creates no edge.
//!
//! Reference: CSS Custom Properties for Cascading Variables Level 1, §3
//! <https://www.w3.org/TR/css-variables-1/#cycles>

use cssparser::ParseError;
use cssparser::ParseErrorKind;
use cssparser::Parser;
use cssparser::ParserInput;
use cssparser::ToCss;
use cssparser::Token;
use std::sync::Arc;

/// Maximum resolution stack depth, independent of cycle detection
///
/// Deep non-cyclic chains (--a -> --b -> ... ) beyond this bound resolve to
/// invalid rather than recursing further.
pub const MAX_SUBSTITUTION_DEPTH: usize = 32;

/// Budget for one substituted value, in bytes
///
/// Exponential blowup (each variable referencing the previous one several
/// times) is cut off here; an oversized result is invalid at
/// computed-value time.
pub const MAX_SUBSTITUTION_LENGTH: usize = 64 * 1024;

const NO_CYCLE: usize = usize::MAX;

/// Why a substitution failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubstitutionFailure {
  /// A referenced variable was missing or invalid, with no usable fallback
  Missing(String),
  /// The value participates in a reference cycle
  Cyclic,
  /// The resolution stack exceeded [`MAX_SUBSTITUTION_DEPTH`]
  DepthLimit,
  /// The substituted value exceeded [`MAX_SUBSTITUTION_LENGTH`]
  Oversized,
  /// Malformed var() syntax
  InvalidSyntax(String),
}

/// Supplies resolved variable values during substitution
///
/// The cascade implements this: resolving a variable looks up the winning
/// declaration (or the inherited value), recursively substitutes it through
/// the same resolver, and caches the result for the current generation.
pub trait VariableEnv {
  /// Fully-substituted value for `name`, or `None` when the variable is
  /// missing or invalid at computed-value time.
  ///
  /// Implementations must route recursive substitution through `resolver`
  /// so that cycles spanning multiple properties are detected.
  fn resolve_variable(&mut self, name: &str, resolver: &mut CascadeResolver) -> Option<Arc<str>>;
}

/// Stack of properties currently being substituted
///
/// One resolver lives for the duration of a cascade apply; it tracks which
/// custom properties are on the resolution path and which turned out to be
/// cycle participants.
#[derive(Debug, Default)]
pub struct CascadeResolver {
  stack: Vec<String>,
  cycle_start: usize,
}

impl CascadeResolver {
  pub fn new() -> Self {
    Self {
      stack: Vec::new(),
      cycle_start: NO_CYCLE,
    }
  }

  /// Current resolution depth
  pub fn depth(&self) -> usize {
    self.stack.len()
  }

  /// Returns true while unwinding through cycle participants
  ///
  /// A frame at or above the first cycle occurrence is a participant and
  /// must resolve to invalid without consulting fallbacks.
  pub fn in_cycle(&self) -> bool {
    self.cycle_start != NO_CYCLE && self.stack.len() > self.cycle_start
  }

  /// Checks whether `name` is already being resolved
  ///
  /// If so, every property from its first occurrence to the stack top is a
  /// cycle participant and the watermark is lowered accordingly.
  pub fn detect_cycle(&mut self, name: &str) -> bool {
    let Some(position) = self.stack.iter().position(|entry| entry == name) else {
      return false;
    };
    self.cycle_start = self.cycle_start.min(position);
    true
  }

  /// Pushes a property onto the resolution stack
  pub fn push(&mut self, name: &str) {
    self.stack.push(name.to_string());
  }

  /// Pops the top frame, clearing cycle state once fully unwound
  pub fn pop(&mut self) {
    self.stack.pop();
    if self.stack.len() <= self.cycle_start && self.cycle_start != NO_CYCLE {
      self.cycle_start = NO_CYCLE;
    }
  }
}

/// Substitutes every var() reference in `raw`
///
/// Returns the substituted token text, or the failure that makes the value
/// invalid at computed-value time.
pub fn substitute(
  raw: &str,
  env: &mut dyn VariableEnv,
  resolver: &mut CascadeResolver,
) -> Result<String, SubstitutionFailure> {
  if resolver.depth() >= MAX_SUBSTITUTION_DEPTH {
    return Err(SubstitutionFailure::DepthLimit);
  }

  let mut input = ParserInput::new(raw);
  let mut parser = Parser::new(&mut input);
  let tokens = substitute_from_parser(&mut parser, env, resolver)?;
  let resolved = tokens.concat();
  if resolved.len() > MAX_SUBSTITUTION_LENGTH {
    return Err(SubstitutionFailure::Oversized);
  }
  Ok(resolved)
}

fn substitute_from_parser<'i>(
  parser: &mut Parser<'i, '_>,
  env: &mut dyn VariableEnv,
  resolver: &mut CascadeResolver,
) -> Result<Vec<String>, SubstitutionFailure> {
  let mut output = Vec::new();

  loop {
    let token = match parser.next_including_whitespace_and_comments() {
      Ok(token) => token.clone(),
      Err(_) => break,
    };
    match token {
      Token::Function(ref name) if name.eq_ignore_ascii_case("var") => {
        let nested = parser.parse_nested_block(|nested| {
          substitute_var_function(nested, env, resolver).map_err(|err| nested.new_custom_error(err))
        });
        let resolved = map_nested_result(nested, "var")?;
        output.extend(resolved);
      }
      Token::Function(ref name) => {
        let name = name.as_ref().to_string();
        let nested = parser.parse_nested_block(|nested| {
          substitute_from_parser(nested, env, resolver).map_err(|err| nested.new_custom_error(err))
        });
        let resolved = map_nested_result(nested, &name)?;
        let mut text = name;
        text.push('(');
        text.push_str(&resolved.concat());
        text.push(')');
        output.push(text);
      }
      Token::ParenthesisBlock => {
        let nested = parser.parse_nested_block(|nested| {
          substitute_from_parser(nested, env, resolver).map_err(|err| nested.new_custom_error(err))
        });
        let resolved = map_nested_result(nested, "()")?;
        output.push(format!("({})", resolved.concat()));
      }
      Token::SquareBracketBlock => {
        let nested = parser.parse_nested_block(|nested| {
          substitute_from_parser(nested, env, resolver).map_err(|err| nested.new_custom_error(err))
        });
        let resolved = map_nested_result(nested, "[]")?;
        output.push(format!("[{}]", resolved.concat()));
      }
      Token::CurlyBracketBlock => {
        let nested = parser.parse_nested_block(|nested| {
          substitute_from_parser(nested, env, resolver).map_err(|err| nested.new_custom_error(err))
        });
        let resolved = map_nested_result(nested, "{}")?;
        output.push(format!("{{{}}}", resolved.concat()));
      }
      ref other => output.push(token_to_css_string(other)),
    }
  }

  Ok(output)
}

fn map_nested_result<'i>(
  result: Result<Vec<String>, ParseError<'i, SubstitutionFailure>>,
  hint: &str,
) -> Result<Vec<String>, SubstitutionFailure> {
  match result {
    Ok(tokens) => Ok(tokens),
    Err(err) => match err.kind {
      ParseErrorKind::Custom(inner) => Err(inner),
      _ => Err(SubstitutionFailure::InvalidSyntax(hint.to_string())),
    },
  }
}

/// Substitutes the body of one var() function
///
/// The fallback branch is only traversed when the referenced variable is
/// missing or invalid *and* we are not unwinding a cycle: cycle
/// participants cannot be rescued by fallbacks, while cycle-adjacent
/// properties can.
fn substitute_var_function<'i>(
  parser: &mut Parser<'i, '_>,
  env: &mut dyn VariableEnv,
  resolver: &mut CascadeResolver,
) -> Result<Vec<String>, SubstitutionFailure> {
  let (var_name, fallback) = parse_var_function_arguments(parser)?;

  if let Some(value) = env.resolve_variable(&var_name, resolver) {
    return Ok(vec![value.as_ref().to_string()]);
  }

  if resolver.in_cycle() {
    return Err(SubstitutionFailure::Cyclic);
  }

  if let Some(fallback_value) = fallback {
    return substitute(&fallback_value, env, resolver)
      .map(|text| vec![text])
      .map_err(|err| match err {
        SubstitutionFailure::Missing(_) => SubstitutionFailure::Missing(var_name.clone()),
        other => other,
      });
  }

  Err(SubstitutionFailure::Missing(var_name))
}

fn parse_var_function_arguments<'i>(
  parser: &mut Parser<'i, '_>,
) -> Result<(String, Option<String>), SubstitutionFailure> {
  let mut var_name: Option<String> = None;

  loop {
    let token = match parser.next_including_whitespace_and_comments() {
      Ok(token) => token.clone(),
      Err(_) => break,
    };
    match token {
      Token::WhiteSpace(_) | Token::Comment(_) => continue,
      Token::Ident(ref ident) => {
        let name = ident.as_ref().to_string();
        if !name.starts_with("--") {
          return Err(SubstitutionFailure::InvalidSyntax(name));
        }
        var_name = Some(name);
        break;
      }
      ref other => return Err(SubstitutionFailure::InvalidSyntax(token_to_css_string(other))),
    }
  }

  let Some(name) = var_name else {
    return Err(SubstitutionFailure::InvalidSyntax(String::new()));
  };

  let fallback_start = loop {
    match parser.next_including_whitespace_and_comments() {
      Ok(Token::WhiteSpace(_) | Token::Comment(_)) => continue,
      Ok(Token::Comma) => break parser.position(),
      Ok(other) => {
        let text = token_to_css_string(other);
        return Err(SubstitutionFailure::InvalidSyntax(text));
      }
      Err(_) => return Ok((name, None)),
    }
  };

  while parser.next_including_whitespace_and_comments().is_ok() {}
  let fallback_slice = parser.slice_from(fallback_start);
  Ok((name, Some(fallback_slice.to_string())))
}

fn token_to_css_string(token: &Token) -> String {
  match token {
    Token::WhiteSpace(ws) => ws.to_string(),
    Token::Comment(text) => format!("/*{}*/", text),
    _ => token.to_css_string(),
  }
}

/// Checks if a string contains any var() references (case-insensitive)
pub fn contains_var(value: &str) -> bool {
  let mut input = ParserInput::new(value);
  let mut parser = Parser::new(&mut input);
  contains_var_in_parser(&mut parser)
}

fn contains_var_in_parser<'i>(parser: &mut Parser<'i, '_>) -> bool {
  let mut found = false;

  loop {
    let token = match parser.next_including_whitespace_and_comments() {
      Ok(token) => token.clone(),
      Err(_) => break,
    };
    match token {
      Token::Function(ref name) if name.eq_ignore_ascii_case("var") => {
        found = true;
        let _ = parser.parse_nested_block(|nested| Ok::<_, ParseError<'i, ()>>(contains_var_in_parser(nested)));
      }
      Token::Function(_) | Token::ParenthesisBlock | Token::SquareBracketBlock | Token::CurlyBracketBlock => {
        if let Ok(nested_found) =
          parser.parse_nested_block(|nested| Ok::<_, ParseError<'i, ()>>(contains_var_in_parser(nested)))
        {
          if nested_found {
            found = true;
          }
        }
      }
      _ => {}
    }
  }

  found
}

/// Extracts all custom property names referenced in a value
///
/// Fallback branches are included: this is the static edge set, used for
/// diagnostics rather than cycle detection (which only follows traversed
/// edges).
pub fn extract_var_references(value: &str) -> Vec<String> {
  let mut refs = Vec::new();
  let mut input = ParserInput::new(value);
  let mut parser = Parser::new(&mut input);
  collect_var_references_from_parser(&mut parser, &mut refs);
  refs
}

fn collect_var_references_from_parser<'i>(parser: &mut Parser<'i, '_>, refs: &mut Vec<String>) {
  loop {
    let token = match parser.next_including_whitespace_and_comments() {
      Ok(token) => token.clone(),
      Err(_) => break,
    };
    match token {
      Token::Function(ref name) if name.eq_ignore_ascii_case("var") => {
        let _ = parser.parse_nested_block(|nested| {
          if let Ok((name, fallback)) = parse_var_function_arguments(nested) {
            refs.push(name.clone());
            if let Some(fallback_value) = fallback {
              let mut input = ParserInput::new(&fallback_value);
              let mut nested_parser = Parser::new(&mut input);
              collect_var_references_from_parser(&mut nested_parser, refs);
            }
          }
          Ok::<_, ParseError<'i, ()>>(())
        });
      }
      Token::Function(_) | Token::ParenthesisBlock | Token::SquareBracketBlock | Token::CurlyBracketBlock => {
        let _ = parser.parse_nested_block(|nested| {
          collect_var_references_from_parser(nested, refs);
          Ok::<_, ParseError<'i, ()>>(())
        });
      }
      _ => {}
    }
  }
}
