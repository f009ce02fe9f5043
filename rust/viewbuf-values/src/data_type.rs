use serde::Serialize;
use viewbuf_common::error::Error;

/// Wire type codes of the item values that can appear in a lookup buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u16)]
pub enum DataType {
    Number = 0x0300,
    NumberRange = 0x0301,
    Time = 0x0400,
    TimeRange = 0x0401,
    Text = 0x0500,
    TextList = 0x0501,
}

impl DataType {
    /// Number of recognized data types.
    pub const COUNT: usize = 6;

    pub const ALL: [DataType; DataType::COUNT] = [
        DataType::Number,
        DataType::NumberRange,
        DataType::Time,
        DataType::TimeRange,
        DataType::Text,
        DataType::TextList,
    ];

    /// Dense index of the data type in `0..COUNT`, in the order of [`DataType::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            DataType::Number => 0,
            DataType::NumberRange => 1,
            DataType::Time => 2,
            DataType::TimeRange => 3,
            DataType::Text => 4,
            DataType::TextList => 5,
        }
    }

    #[inline]
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Returns `true` for the types whose values are lists.
    pub fn is_list(self) -> bool {
        matches!(
            self,
            DataType::NumberRange | DataType::TimeRange | DataType::TextList
        )
    }
}

impl TryFrom<u16> for DataType {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0x0300 => Ok(DataType::Number),
            0x0301 => Ok(DataType::NumberRange),
            0x0400 => Ok(DataType::Time),
            0x0401 => Ok(DataType::TimeRange),
            0x0500 => Ok(DataType::Text),
            0x0501 => Ok(DataType::TextList),
            _ => Err(Error::unsupported_type(value)),
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DataType::Number => "number",
            DataType::NumberRange => "number_range",
            DataType::Time => "time",
            DataType::TimeRange => "time_range",
            DataType::Text => "text",
            DataType::TextList => "text_list",
        };
        f.write_str(name)
    }
}
