// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A setting value as read from or written to the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Bool(_) => ValueType::Boolean,
            Self::Integer(_) => ValueType::Integer,
            Self::Double(_) => ValueType::Double,
            Self::String(_) => ValueType::String,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Normalizes a decoded JSON value to `ty`.
    ///
    /// JSON does not distinguish integral doubles from integers, so an `Integer` is accepted
    /// where a `Double` is declared. Every other mismatch yields `None`.
    pub(crate) fn conform_to(self, ty: ValueType) -> Option<Self> {
        match (self, ty) {
            (Self::Integer(value), ValueType::Double) => Some(Self::Double(value as f64)),
            (value, ty) if value.value_type() == ty => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Double(value) => write!(f, "{value}"),
            Self::String(value) => f.write_str(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Boolean,
    Integer,
    Double,
    String,
}

impl ValueType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Double => "double",
            Self::String => "string",
        }
    }

    /// Parses user input (CLI arguments) into a value of this type.
    pub fn parse(self, raw: &str) -> Result<Value, ParseValueError> {
        let invalid = || ParseValueError {
            expected: self,
            raw: raw.to_owned(),
        };
        match self {
            Self::Boolean => match raw.trim() {
                "true" | "1" => Ok(Value::Bool(true)),
                "false" | "0" => Ok(Value::Bool(false)),
                _ => Err(invalid()),
            },
            Self::Integer => raw.trim().parse::<i64>().map(Value::Integer).map_err(|_| invalid()),
            Self::Double => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(Value::Double)
                .ok_or_else(invalid),
            Self::String => Ok(Value::String(raw.to_owned())),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = UnknownValueType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "boolean" => Ok(Self::Boolean),
            "integer" => Ok(Self::Integer),
            "double" => Ok(Self::Double),
            "string" => Ok(Self::String),
            other => Err(UnknownValueType(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownValueType(pub String);

impl fmt::Display for UnknownValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value type {:?}", self.0)
    }
}

impl std::error::Error for UnknownValueType {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseValueError {
    expected: ValueType,
    raw: String,
}

impl ParseValueError {
    pub fn expected(&self) -> ValueType {
        self.expected
    }
}

impl fmt::Display for ParseValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot parse {:?} as {}", self.raw, self.expected)
    }
}

impl std::error::Error for ParseValueError {}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Value, ValueType};

    #[rstest]
    #[case(ValueType::Boolean, "true", Value::Bool(true))]
    #[case(ValueType::Boolean, "0", Value::Bool(false))]
    #[case(ValueType::Integer, " 42 ", Value::Integer(42))]
    #[case(ValueType::Double, "0.5", Value::Double(0.5))]
    #[case(ValueType::String, "Classic", Value::String("Classic".to_owned()))]
    fn parse_accepts_typed_input(#[case] ty: ValueType, #[case] raw: &str, #[case] expected: Value) {
        assert_eq!(ty.parse(raw).expect("parse"), expected);
    }

    #[rstest]
    #[case(ValueType::Boolean, "yes")]
    #[case(ValueType::Integer, "1.5")]
    #[case(ValueType::Double, "NaN")]
    fn parse_rejects_mismatched_input(#[case] ty: ValueType, #[case] raw: &str) {
        let err = ty.parse(raw).expect_err("must fail");
        assert_eq!(err.expected(), ty);
    }

    #[test]
    fn untagged_decode_keeps_integers_and_doubles_apart() {
        let values: Vec<Value> = serde_json::from_str("[true, 3, 3.5, \"x\"]").expect("decode");
        assert_eq!(
            values,
            vec![
                Value::Bool(true),
                Value::Integer(3),
                Value::Double(3.5),
                Value::String("x".to_owned()),
            ]
        );
    }

    #[test]
    fn conform_only_widens_integer_to_double() {
        assert_eq!(
            Value::Integer(2).conform_to(ValueType::Double),
            Some(Value::Double(2.0))
        );
        assert_eq!(Value::Double(2.0).conform_to(ValueType::Integer), None);
        assert_eq!(Value::Integer(1).conform_to(ValueType::Boolean), None);
    }
}
