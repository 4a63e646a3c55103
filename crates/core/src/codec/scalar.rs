use super::RawParam;

pub fn encode_bool(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

/// `1`/`true` and `0`/`false`; anything else is absent.
pub fn decode_bool(raw: RawParam<'_>) -> Option<bool> {
    match raw.value()? {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

/// A plain finite number, absent when unreadable.
pub fn decode_number(raw: RawParam<'_>) -> Option<f64> {
    raw.value()?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans() {
        assert_eq!(decode_bool(RawParam::One(encode_bool(true))), Some(true));
        assert_eq!(decode_bool(RawParam::One(encode_bool(false))), Some(false));
        assert_eq!(decode_bool(RawParam::One("yes")), None);
        assert_eq!(decode_bool(RawParam::Missing), None);
    }

    #[test]
    fn numbers() {
        assert_eq!(decode_number(RawParam::One("16")), Some(16.0));
        assert_eq!(decode_number(RawParam::One(" 4.5 ")), Some(4.5));
        assert_eq!(decode_number(RawParam::One("wide")), None);
        assert_eq!(decode_number(RawParam::One("NaN")), None);
    }
}
