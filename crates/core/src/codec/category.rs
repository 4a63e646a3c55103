use crate::model::TrussCategory;

use super::RawParam;

pub fn encode_category(category: Option<TrussCategory>) -> Option<String> {
    category.map(|c| c.as_str().to_string())
}

/// Absent or empty input is `None`; any other value is normalized and never
/// fails.
pub fn decode_category(raw: RawParam<'_>) -> Option<TrussCategory> {
    raw.value().map(TrussCategory::parse)
}
