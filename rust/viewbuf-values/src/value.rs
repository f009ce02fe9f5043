//! Decoded item values.

use serde::Serialize;

use crate::{data_type::DataType, text::TextValue, time::DateTimeValue};

/// A decoded item value.
///
/// List variants produced from range-encoded items contain the plain list entries
/// first, followed by every range as its two bounds in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TypedValue {
    Text(TextValue),
    TextList(Vec<TextValue>),
    Number(f64),
    NumberList(Vec<f64>),
    Time(DateTimeValue),
    TimeList(Vec<DateTimeValue>),
    /// A zero-length item: the column exists but has no value for this entry.
    Absent,
    /// An item whose type code is not one of the known data types.
    Unrecognized { type_code: u16 },
}

impl TypedValue {
    /// Data type of the value, `None` for `Absent` and `Unrecognized`.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            TypedValue::Text(_) => Some(DataType::Text),
            TypedValue::TextList(_) => Some(DataType::TextList),
            TypedValue::Number(_) => Some(DataType::Number),
            TypedValue::NumberList(_) => Some(DataType::NumberRange),
            TypedValue::Time(_) => Some(DataType::Time),
            TypedValue::TimeList(_) => Some(DataType::TimeRange),
            TypedValue::Absent | TypedValue::Unrecognized { .. } => None,
        }
    }

    #[inline]
    pub fn is_absent(&self) -> bool {
        matches!(self, TypedValue::Absent)
    }

    #[inline]
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, TypedValue::Unrecognized { .. })
    }

    pub fn is_list(&self) -> bool {
        matches!(
            self,
            TypedValue::TextList(_) | TypedValue::NumberList(_) | TypedValue::TimeList(_)
        )
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            TypedValue::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            TypedValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<&DateTimeValue> {
        match self {
            TypedValue::Time(time) => Some(time),
            _ => None,
        }
    }

    /// Scalar string: the text itself, or the first element of a text list.
    pub fn coerce_string(&self) -> Option<String> {
        match self {
            TypedValue::Text(text) => Some(text.as_str().to_string()),
            TypedValue::TextList(list) => list.first().map(|text| text.as_str().to_string()),
            _ => None,
        }
    }

    /// String list: text values as they are, numbers and times in their display form.
    pub fn coerce_string_list(&self) -> Option<Vec<String>> {
        match self {
            TypedValue::Text(text) => Some(vec![text.as_str().to_string()]),
            TypedValue::TextList(list) => {
                Some(list.iter().map(|text| text.as_str().to_string()).collect())
            }
            TypedValue::Number(n) => Some(vec![n.to_string()]),
            TypedValue::NumberList(list) => Some(list.iter().map(f64::to_string).collect()),
            TypedValue::Time(time) => Some(vec![time.to_string()]),
            TypedValue::TimeList(list) => Some(list.iter().map(|t| t.to_string()).collect()),
            TypedValue::Absent | TypedValue::Unrecognized { .. } => None,
        }
    }

    /// Scalar number: the number itself, or the first element of a number list.
    pub fn coerce_number(&self) -> Option<f64> {
        match self {
            TypedValue::Number(n) => Some(*n),
            TypedValue::NumberList(list) => list.first().copied(),
            _ => None,
        }
    }

    /// Scalar integer, truncating toward zero (saturating at the `i32` bounds).
    pub fn coerce_integer(&self) -> Option<i32> {
        self.coerce_number().map(|n| n as i32)
    }

    pub fn coerce_number_list(&self) -> Option<Vec<f64>> {
        match self {
            TypedValue::Number(n) => Some(vec![*n]),
            TypedValue::NumberList(list) => Some(list.clone()),
            _ => None,
        }
    }

    pub fn coerce_integer_list(&self) -> Option<Vec<i32>> {
        self.coerce_number_list()
            .map(|list| list.into_iter().map(|n| n as i32).collect())
    }

    /// Scalar time: the time itself, or the first element of a time list.
    pub fn coerce_time(&self) -> Option<DateTimeValue> {
        match self {
            TypedValue::Time(time) => Some(*time),
            TypedValue::TimeList(list) => list.first().copied(),
            _ => None,
        }
    }

    pub fn coerce_time_list(&self) -> Option<Vec<DateTimeValue>> {
        match self {
            TypedValue::Time(time) => Some(vec![*time]),
            TypedValue::TimeList(list) => Some(list.clone()),
            _ => None,
        }
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        TypedValue::Text(TextValue::from(s))
    }
}

impl From<f64> for TypedValue {
    fn from(n: f64) -> Self {
        TypedValue::Number(n)
    }
}

impl From<DateTimeValue> for TypedValue {
    fn from(time: DateTimeValue) -> Self {
        TypedValue::Time(time)
    }
}
