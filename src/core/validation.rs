use crate::models::parse_flexible_date;
use serde::{Deserialize, Serialize};

/// Kinds of form input checked before a submission is forwarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputKind {
    Number,
    Text,
    Date,
    ObjectId,
    Url,
}

impl InputKind {
    #[inline]
    pub fn is_valid(self, value: &str) -> bool {
        match self {
            Self::Number => is_valid_number(value),
            Self::Text => true,
            Self::Date => is_valid_date(value),
            Self::ObjectId => is_valid_object_id(value),
            Self::Url => is_valid_url(value),
        }
    }
}

pub fn is_valid_number(value: &str) -> bool {
    value.trim().parse::<f64>().map(|n| !n.is_nan()).unwrap_or(false)
}

pub fn is_valid_date(value: &str) -> bool {
    parse_flexible_date(value.trim()).is_some()
}

/// 24 hexadecimal characters
pub fn is_valid_object_id(value: &str) -> bool {
    value.len() == 24 && value.chars().all(|c| c.is_ascii_hexdigit())
}

/// Loose check, a website needs at least a dot
pub fn is_valid_url(value: &str) -> bool {
    value.contains('.')
}
