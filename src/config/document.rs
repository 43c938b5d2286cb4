//! Typed field access over a parsed YAML document.
//!
//! [`DocumentReader`] pulls individual fields out of `serde_yaml` mappings,
//! converting them to Rust types and recording a [`ConfigIssue`] for every
//! field that is missing, mistyped, out of range or outside its closed set.
//! Accessors return `None` on failure so the caller can keep reading and
//! report every problem in one pass.

use serde_yaml::{Mapping, Value};

use crate::config::loader::LoadWarning;
use crate::config::schema::Choice;
use crate::error::ConfigIssue;

/// Maximum edit distance for "did you mean" suggestions.
const SUGGESTION_DISTANCE: usize = 3;

/// Joins a parent path and a key into a dotted field path.
#[must_use]
pub fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

/// Returns the candidate closest to `input`, if within the suggestion distance.
#[must_use]
pub fn suggest(input: &str, candidates: &[&'static str]) -> Option<&'static str> {
    candidates
        .iter()
        .map(|candidate| (*candidate, strsim::damerau_levenshtein(input, candidate)))
        .filter(|(_, dist)| *dist <= SUGGESTION_DISTANCE)
        .min_by_key(|(_, dist)| *dist)
        .map(|(candidate, _)| candidate)
}

/// Short name of a YAML value's type, for error messages.
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(n) if n.is_f64() => "a float",
        Value::Number(_) => "an integer",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Collects issues and warnings while reading fields out of a document.
#[derive(Debug, Default)]
pub struct DocumentReader {
    issues: Vec<ConfigIssue>,
    warnings: Vec<LoadWarning>,
}

impl DocumentReader {
    /// Creates an empty reader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the reader, returning collected issues and warnings.
    #[must_use]
    pub fn finish(self) -> (Vec<ConfigIssue>, Vec<LoadWarning>) {
        (self.issues, self.warnings)
    }

    /// Returns `true` if any issue has been recorded.
    #[must_use]
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Records an issue.
    pub fn issue(&mut self, issue: ConfigIssue) {
        self.issues.push(issue);
    }

    /// Records a non-fatal warning.
    pub fn warn(&mut self, location: &str, message: impl Into<String>) {
        self.warnings.push(LoadWarning {
            message: message.into(),
            location: Some(location.to_string()),
        });
    }

    fn schema(&mut self, field: &str, message: impl Into<String>) {
        self.issue(ConfigIssue::Schema {
            field: field.to_string(),
            message: message.into(),
        });
    }

    fn range(&mut self, field: &str, value: impl ToString, constraint: &str) {
        self.issue(ConfigIssue::Range {
            field: field.to_string(),
            value: value.to_string(),
            constraint: constraint.to_string(),
        });
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Looks up `key`, treating an explicit `null` as absent.
    #[must_use]
    pub fn lookup<'a>(map: &'a Mapping, key: &str) -> Option<&'a Value> {
        map.get(key).filter(|value| !value.is_null())
    }

    /// Reads a nested mapping that must be present.
    pub fn section<'a>(&mut self, map: &'a Mapping, key: &str, parent: &str) -> Option<&'a Mapping> {
        let path = join(parent, key);
        match Self::lookup(map, key) {
            None => {
                self.schema(&path, "missing required field");
                None
            }
            Some(value) => self.expect_mapping(value, &path),
        }
    }

    /// Reads a nested mapping that may be omitted.
    pub fn optional_section<'a>(
        &mut self,
        map: &'a Mapping,
        key: &str,
        parent: &str,
    ) -> Option<&'a Mapping> {
        Self::lookup(map, key).and_then(|value| self.expect_mapping(value, &join(parent, key)))
    }

    /// Requires `value` to be a mapping.
    pub fn expect_mapping<'a>(&mut self, value: &'a Value, path: &str) -> Option<&'a Mapping> {
        if let Some(mapping) = value.as_mapping() {
            Some(mapping)
        } else {
            self.schema(path, format!("expected a mapping, got {}", type_name(value)));
            None
        }
    }

    // ========================================================================
    // Scalars
    // ========================================================================

    /// Reads a required closed-choice field.
    pub fn choice<C: Choice>(&mut self, map: &Mapping, key: &str, parent: &str) -> Option<C> {
        let path = join(parent, key);
        let Some(value) = Self::lookup(map, key) else {
            self.schema(&path, "missing required field");
            return None;
        };
        let Some(text) = value.as_str() else {
            self.schema(&path, format!("expected a string, got {}", type_name(value)));
            return None;
        };
        let parsed = C::parse(text);
        if parsed.is_none() {
            let allowed = C::allowed();
            let suggestion = suggest(text, &allowed);
            self.issue(ConfigIssue::InvalidChoice {
                field: path,
                value: text.to_string(),
                allowed,
                suggestion,
            });
        }
        parsed
    }

    /// Reads a required strictly positive integer.
    pub fn positive_int(&mut self, map: &Mapping, key: &str, parent: &str) -> Option<u32> {
        let path = join(parent, key);
        match Self::lookup(map, key) {
            None => {
                self.schema(&path, "missing required field");
                None
            }
            Some(value) => self.positive_int_value(value, &path),
        }
    }

    /// Reads an optional strictly positive integer.
    ///
    /// The outer `Option` is `None` when the value was present but invalid.
    pub fn optional_positive_int(
        &mut self,
        map: &Mapping,
        key: &str,
        parent: &str,
    ) -> Option<Option<u32>> {
        match Self::lookup(map, key) {
            None => Some(None),
            Some(value) => self.positive_int_value(value, &join(parent, key)).map(Some),
        }
    }

    /// Converts a value to a strictly positive `u32`.
    pub fn positive_int_value(&mut self, value: &Value, path: &str) -> Option<u32> {
        let n = self.integer_value(value, path)?;
        if n <= 0 {
            self.range(path, n, "an integer > 0");
            return None;
        }
        if let Ok(n) = u32::try_from(n) {
            Some(n)
        } else {
            self.range(path, n, &format!("an integer <= {}", u32::MAX));
            None
        }
    }

    /// Reads an optional non-negative integer (e.g. a seed).
    pub fn optional_non_negative_int(
        &mut self,
        map: &Mapping,
        key: &str,
        parent: &str,
    ) -> Option<Option<u64>> {
        let Some(value) = Self::lookup(map, key) else {
            return Some(None);
        };
        let path = join(parent, key);
        if let Some(n) = value.as_u64() {
            return Some(Some(n));
        }
        let n = self.integer_value(value, &path)?;
        // as_u64 only fails on integers for negative values
        self.range(&path, n, "an integer >= 0");
        None
    }

    fn integer_value(&mut self, value: &Value, path: &str) -> Option<i64> {
        if let Some(n) = value.as_i64() {
            Some(n)
        } else if let Some(n) = value.as_u64() {
            self.range(path, n, &format!("an integer <= {}", i64::MAX));
            None
        } else {
            self.schema(path, format!("expected an integer, got {}", type_name(value)));
            None
        }
    }

    /// Reads a required finite float strictly greater than zero.
    pub fn positive_float(&mut self, map: &Mapping, key: &str, parent: &str) -> Option<f64> {
        let path = join(parent, key);
        let Some(value) = Self::lookup(map, key) else {
            self.schema(&path, "missing required field");
            return None;
        };
        self.positive_float_value(value, &path)
    }

    /// Converts a value to a finite float strictly greater than zero.
    pub fn positive_float_value(&mut self, value: &Value, path: &str) -> Option<f64> {
        let n = self.float_value(value, path)?;
        if n > 0.0 {
            Some(n)
        } else {
            self.range(path, n, "a finite value > 0");
            None
        }
    }

    /// Reads an optional finite float strictly greater than zero.
    ///
    /// The outer `Option` is `None` when the value was present but invalid.
    pub fn optional_positive_float(
        &mut self,
        map: &Mapping,
        key: &str,
        parent: &str,
    ) -> Option<Option<f64>> {
        match Self::lookup(map, key) {
            None => Some(None),
            Some(value) => self.positive_float_value(value, &join(parent, key)).map(Some),
        }
    }

    /// Reads an optional finite float `>= 0`.
    ///
    /// The outer `Option` is `None` when the value was present but invalid.
    pub fn optional_non_negative_float(
        &mut self,
        map: &Mapping,
        key: &str,
        parent: &str,
    ) -> Option<Option<f64>> {
        match Self::lookup(map, key) {
            None => Some(None),
            Some(value) => self.non_negative_float_value(value, &join(parent, key)).map(Some),
        }
    }

    /// Reads an optional finite float `>= 0`, falling back to `default`.
    pub fn non_negative_float_or(
        &mut self,
        map: &Mapping,
        key: &str,
        parent: &str,
        default: f64,
    ) -> Option<f64> {
        match Self::lookup(map, key) {
            None => Some(default),
            Some(value) => self.non_negative_float_value(value, &join(parent, key)),
        }
    }

    /// Converts a value to a finite float `>= 0`.
    pub fn non_negative_float_value(&mut self, value: &Value, path: &str) -> Option<f64> {
        let n = self.float_value(value, path)?;
        if n >= 0.0 {
            Some(n)
        } else {
            self.range(path, n, "a finite value >= 0");
            None
        }
    }

    fn float_value(&mut self, value: &Value, path: &str) -> Option<f64> {
        let Some(n) = value.as_f64() else {
            self.schema(path, format!("expected a number, got {}", type_name(value)));
            return None;
        };
        if n.is_finite() {
            Some(n)
        } else {
            self.range(path, n, "a finite number");
            None
        }
    }

    /// Reads an optional boolean, falling back to `default`.
    pub fn bool_or(&mut self, map: &Mapping, key: &str, parent: &str, default: bool) -> Option<bool> {
        match Self::lookup(map, key) {
            None => Some(default),
            Some(value) => {
                let flag = value.as_bool();
                if flag.is_none() {
                    self.schema(
                        &join(parent, key),
                        format!("expected a boolean, got {}", type_name(value)),
                    );
                }
                flag
            }
        }
    }

    /// Reads an optional string; empty strings are returned as-is.
    pub fn optional_str<'a>(
        &mut self,
        map: &'a Mapping,
        key: &str,
        parent: &str,
    ) -> Option<Option<&'a str>> {
        match Self::lookup(map, key) {
            None => Some(None),
            Some(value) => {
                let text = value.as_str();
                if text.is_none() {
                    self.schema(
                        &join(parent, key),
                        format!("expected a string, got {}", type_name(value)),
                    );
                }
                text.map(Some)
            }
        }
    }

    // ========================================================================
    // Key Checks
    // ========================================================================

    /// Warns about keys not in `known`, suggesting the closest known key.
    pub fn warn_unknown_keys(&mut self, map: &Mapping, known: &[&'static str], parent: &str) {
        for key in map.keys() {
            let name = key_name(key);
            if known.contains(&name.as_str()) {
                continue;
            }
            let message = suggest(&name, known).map_or_else(
                || format!("Unknown field '{name}' is ignored"),
                |s| format!("Unknown field '{name}' is ignored (did you mean '{s}'?)"),
            );
            self.warn(&join(parent, &name), message);
        }
    }

    /// Rejects keys not in `known`.
    pub fn reject_unknown_keys(&mut self, map: &Mapping, known: &[&'static str], parent: &str) {
        for key in map.keys() {
            let name = key_name(key);
            if known.contains(&name.as_str()) {
                continue;
            }
            let expected = if known.is_empty() {
                "no arguments are accepted".to_string()
            } else {
                format!("expected one of [{}]", known.join(", "))
            };
            let message = suggest(&name, known).map_or_else(
                || format!("unexpected field, {expected}"),
                |s| format!("unexpected field, {expected} (did you mean '{s}'?)"),
            );
            self.schema(&join(parent, &name), message);
        }
    }
}

fn key_name(key: &Value) -> String {
    key.as_str().map_or_else(
        || serde_yaml::to_string(key).map_or_else(|_| "?".to_string(), |s| s.trim().to_string()),
        str::to_string,
    )
}

// ============================================================================
// Tests
// ============================================================================
