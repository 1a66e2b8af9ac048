//! Chainable matchers over JSON values.
//!
//! `expect(&value)` wraps a present value, `expect_field(manifest.get("x"))`
//! wraps a possibly-absent one (the `undefined` case). Every matcher returns
//! the expectation back on success so calls chain with `?`:
//!
//! ```
//! use manifest_audit::expect::expect;
//! use serde_json::json;
//!
//! let pkg = json!({"version": "1.0.0"});
//! expect(&pkg)
//!     .to_have_property("version")?
//!     .to_match(r"^\d+\.\d+\.\d+")?;
//! # Ok::<(), manifest_audit::error::AssertionError>(())
//! ```

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::error::AssertionError;

/// Wrap a present value.
pub fn expect(actual: &Value) -> Expectation<'_> {
    Expectation {
        actual: Some(actual),
    }
}

/// Wrap a value that may be absent; `None` behaves like `undefined`.
pub fn expect_field(actual: Option<&Value>) -> Expectation<'_> {
    Expectation { actual }
}

/// Wrap a fallible procedure for `to_throw` style assertions.
pub fn expect_fn<F>(procedure: F) -> FnExpectation<F> {
    FnExpectation { procedure }
}

/// Render a value the way failure messages show it.
pub fn describe(value: Option<&Value>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "undefined".to_string(),
    }
}

/// JavaScript `typeof` of a JSON value.
pub fn type_of(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Null | Value::Array(_) | Value::Object(_)) => "object",
    }
}

/// JavaScript truthiness of a JSON value.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number
            .as_f64()
            .map_or(true, |float| float != 0.0 && !float.is_nan()),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

fn to_json(expected: impl Serialize) -> Result<Value, AssertionError> {
    serde_json::to_value(expected)
        .map_err(|err| AssertionError::violation(format!("expected value is not JSON: {err}")))
}

/// Strict equality; numbers compare by value so `1` and `1.0` are the same.
fn strictly_equal(actual: Option<&Value>, expected: &Value) -> bool {
    match (actual, expected) {
        (Some(Value::Number(a)), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        (Some(actual), expected) => actual == expected,
        (None, _) => false,
    }
}

/// Rewrite `1.0` as `1` so serialized forms match JavaScript's.
fn integral_floats_as_ints(value: Value) -> Value {
    match value {
        Value::Number(number) if number.is_f64() => match number.as_f64() {
            Some(float) if float.fract() == 0.0 && float.abs() < 9_007_199_254_740_992.0 => {
                Value::from(float as i64)
            }
            _ => Value::Number(number),
        },
        Value::Array(elements) => {
            Value::Array(elements.into_iter().map(integral_floats_as_ints).collect())
        }
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, integral_floats_as_ints(value)))
                .collect(),
        ),
        other => other,
    }
}

fn contains(actual: Option<&Value>, item: &Value) -> Result<bool, AssertionError> {
    match (actual, item) {
        (Some(Value::String(haystack)), Value::String(needle)) => {
            Ok(haystack.contains(needle.as_str()))
        }
        (Some(Value::Array(elements)), item) => {
            Ok(elements.iter().any(|element| strictly_equal(Some(element), item)))
        }
        (Some(Value::Object(map)), Value::String(key)) => Ok(map.contains_key(key)),
        (actual, item) => Err(AssertionError::violation(format!(
            "Cannot check whether {} contains {}",
            describe(actual),
            item
        ))),
    }
}

fn compile(pattern: &str) -> Result<Regex, AssertionError> {
    Regex::new(pattern)
        .map_err(|err| AssertionError::violation(format!("invalid pattern /{pattern}/: {err}")))
}

fn as_number(actual: Option<&Value>) -> Option<f64> {
    actual.and_then(Value::as_f64)
}

/// A wrapped actual value awaiting a matcher.
#[derive(Debug, Clone, Copy)]
pub struct Expectation<'a> {
    actual: Option<&'a Value>,
}

impl<'a> Expectation<'a> {
    pub fn actual(&self) -> Option<&'a Value> {
        self.actual
    }

    /// Invert the next matcher.
    pub fn not(self) -> Negated<'a> {
        Negated {
            actual: self.actual,
        }
    }

    pub fn to_be(self, expected: impl Serialize) -> Result<Self, AssertionError> {
        let expected = to_json(expected)?;
        if strictly_equal(self.actual, &expected) {
            Ok(self)
        } else {
            Err(AssertionError::NotEqual {
                expected: expected.to_string(),
                actual: describe(self.actual),
            })
        }
    }

    /// Deep equality by comparing serialized forms.
    pub fn to_equal(self, expected: impl Serialize) -> Result<Self, AssertionError> {
        let expected = integral_floats_as_ints(to_json(expected)?).to_string();
        let actual = self
            .actual
            .map(|value| integral_floats_as_ints(value.clone()).to_string())
            .unwrap_or_else(|| describe(None));
        if actual == expected {
            Ok(self)
        } else {
            Err(AssertionError::NotEqual { expected, actual })
        }
    }

    pub fn to_match(self, pattern: &str) -> Result<Self, AssertionError> {
        let regex = compile(pattern)?;
        match self.actual {
            Some(Value::String(text)) if regex.is_match(text) => Ok(self),
            _ => Err(AssertionError::PatternMismatch {
                pattern: pattern.to_string(),
                actual: describe(self.actual),
                negated: false,
            }),
        }
    }

    /// Require `key` on an object; the chain continues on the property value.
    pub fn to_have_property(self, key: &str) -> Result<Expectation<'a>, AssertionError> {
        match self.actual.and_then(|value| value.get(key)) {
            Some(property) => Ok(Expectation {
                actual: Some(property),
            }),
            None => Err(AssertionError::MissingProperty {
                key: key.to_string(),
                actual: describe(self.actual),
            }),
        }
    }

    pub fn to_be_truthy(self) -> Result<Self, AssertionError> {
        if is_truthy(self.actual) {
            Ok(self)
        } else {
            Err(AssertionError::NotTruthy {
                actual: describe(self.actual),
            })
        }
    }

    pub fn to_be_greater_than(self, expected: f64) -> Result<Self, AssertionError> {
        self.compare(">", expected, |actual, expected| actual > expected)
    }

    pub fn to_be_greater_than_or_equal(self, expected: f64) -> Result<Self, AssertionError> {
        self.compare(">=", expected, |actual, expected| actual >= expected)
    }

    pub fn to_contain(self, item: impl Serialize) -> Result<Self, AssertionError> {
        let item = to_json(item)?;
        if contains(self.actual, &item)? {
            Ok(self)
        } else {
            Err(AssertionError::violation(format!(
                "Expected {} to contain {}",
                describe(self.actual),
                item
            )))
        }
    }

    fn compare(
        self,
        operator: &'static str,
        expected: f64,
        holds: impl Fn(f64, f64) -> bool,
    ) -> Result<Self, AssertionError> {
        match as_number(self.actual) {
            Some(actual) if holds(actual, expected) => Ok(self),
            _ => Err(AssertionError::ComparisonFailed {
                operator,
                expected: expected.to_string(),
                actual: describe(self.actual),
            }),
        }
    }
}

/// Negated matchers produced by [`Expectation::not`].
#[derive(Debug, Clone, Copy)]
pub struct Negated<'a> {
    actual: Option<&'a Value>,
}

impl<'a> Negated<'a> {
    fn restore(self) -> Expectation<'a> {
        Expectation {
            actual: self.actual,
        }
    }

    pub fn to_be(self, expected: impl Serialize) -> Result<Expectation<'a>, AssertionError> {
        let expected = to_json(expected)?;
        if strictly_equal(self.actual, &expected) {
            Err(AssertionError::violation(format!(
                "Expected {} not to be {}",
                describe(self.actual),
                expected
            )))
        } else {
            Ok(self.restore())
        }
    }

    /// Fails when the value is a string matching `pattern`; non-strings pass.
    pub fn to_match(self, pattern: &str) -> Result<Expectation<'a>, AssertionError> {
        let regex = compile(pattern)?;
        match self.actual {
            Some(Value::String(text)) if regex.is_match(text) => {
                Err(AssertionError::PatternMismatch {
                    pattern: pattern.to_string(),
                    actual: describe(self.actual),
                    negated: true,
                })
            }
            _ => Ok(self.restore()),
        }
    }

    pub fn to_be_null(self) -> Result<Expectation<'a>, AssertionError> {
        match self.actual {
            Some(Value::Null) => Err(AssertionError::violation("Expected value not to be null")),
            _ => Ok(self.restore()),
        }
    }

    pub fn to_be_undefined(self) -> Result<Expectation<'a>, AssertionError> {
        match self.actual {
            None => Err(AssertionError::violation(
                "Expected value not to be undefined",
            )),
            Some(_) => Ok(self.restore()),
        }
    }

    pub fn to_contain(self, item: impl Serialize) -> Result<Expectation<'a>, AssertionError> {
        let item = to_json(item)?;
        if contains(self.actual, &item)? {
            Err(AssertionError::violation(format!(
                "Expected {} not to contain {}",
                describe(self.actual),
                item
            )))
        } else {
            Ok(self.restore())
        }
    }
}

/// A wrapped procedure awaiting `to_throw` or `not().to_throw()`.
pub struct FnExpectation<F> {
    procedure: F,
}

impl<F, T, E> FnExpectation<F>
where
    F: FnOnce() -> Result<T, E>,
    E: fmt::Display,
{
    pub fn not(self) -> NegatedFn<F> {
        NegatedFn {
            procedure: self.procedure,
        }
    }

    /// Fails when the procedure succeeds.
    pub fn to_throw(self) -> Result<(), AssertionError> {
        match (self.procedure)() {
            Ok(_) => Err(AssertionError::violation(
                "Expected procedure to fail, but it succeeded",
            )),
            Err(_) => Ok(()),
        }
    }
}

/// Negated procedure matchers produced by [`FnExpectation::not`].
pub struct NegatedFn<F> {
    procedure: F,
}

impl<F, T, E> NegatedFn<F>
where
    F: FnOnce() -> Result<T, E>,
    E: fmt::Display,
{
    /// Fails when the procedure returns an error, carrying its message.
    pub fn to_throw(self) -> Result<T, AssertionError> {
        (self.procedure)().map_err(|err| {
            AssertionError::violation(format!("Expected procedure not to fail, but got: {err}"))
        })
    }
}
