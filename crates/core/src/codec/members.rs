use crate::model::Member;

use super::{
    CodecError, DecodePolicy, Decoded, ENTRY_DELIMITER, EntryProblem, FIELD_DELIMITER, RawParam,
    decode_list, format_number, parse_number, split_fields,
};

const PARAM: &str = "cmems";

/// `start~end~A~E` entries joined by `_`. A zero or NaN section value is
/// written as `1`.
pub fn encode_members(members: Option<&[Member]>) -> Option<String> {
    let members = members?;
    let entries: Vec<String> = members
        .iter()
        .map(|m| {
            [
                m.start.to_string(),
                m.end.to_string(),
                format_number(or_one(m.area)),
                format_number(or_one(m.elastic_modulus)),
            ]
            .join(&FIELD_DELIMITER.to_string())
        })
        .collect();
    Some(entries.join(&ENTRY_DELIMITER.to_string()))
}

fn or_one(value: f64) -> f64 {
    if value == 0.0 || value.is_nan() { 1.0 } else { value }
}

/// Absent or empty input is an empty member list. Endpoint indices are not
/// checked against any node list here.
pub fn decode_members(
    raw: RawParam<'_>,
    policy: DecodePolicy,
) -> Result<Decoded<Vec<Member>>, CodecError> {
    match raw.value() {
        None => Ok(Decoded::clean(Vec::new())),
        Some(token) => decode_list(
            PARAM,
            token,
            ENTRY_DELIMITER,
            policy,
            decode_member,
            Member::default,
        ),
    }
}

fn decode_member(entry: &str) -> Result<Member, EntryProblem> {
    let [start, end, area, modulus] = split_fields::<4>(entry, FIELD_DELIMITER)?;
    let member = Member {
        start: parse_index(start)?,
        end: parse_index(end)?,
        area: parse_number(area)?,
        elastic_modulus: parse_number(modulus)?,
    };
    if member.area <= 0.0 {
        return Err(EntryProblem::NonPositive("A"));
    }
    if member.elastic_modulus <= 0.0 {
        return Err(EntryProblem::NonPositive("E"));
    }
    Ok(member)
}

fn parse_index(field: &str) -> Result<usize, EntryProblem> {
    field
        .parse::<usize>()
        .map_err(|_| EntryProblem::NotAnIndex(field.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_entries() {
        let members = [Member::new(0, 1, 2.0, 29000.0), Member::new(1, 2, 0.5, 1e7)];
        assert_eq!(
            encode_members(Some(&members)).as_deref(),
            Some("0~1~2~29000_1~2~0.5~10000000")
        );
    }

    #[test]
    fn zero_section_encodes_as_one() {
        let member = Member::new(3, 4, 0.0, f64::NAN);
        assert_eq!(encode_members(Some(&[member])).as_deref(), Some("3~4~1~1"));
    }

    #[test]
    fn decodes_entries() {
        let decoded =
            decode_members(RawParam::One("0~1~2~29000_2~0~1.5~100"), DecodePolicy::Strict).unwrap();
        assert_eq!(
            decoded.value,
            vec![Member::new(0, 1, 2.0, 29000.0), Member::new(2, 0, 1.5, 100.0)]
        );
    }

    #[test]
    fn malformed_members_become_default() {
        let decoded = decode_members(
            RawParam::One("0~1~2~3_-1~2~1~1_0.5~1~1~1_4~5~0~1_7"),
            DecodePolicy::Lenient,
        )
        .unwrap();
        assert_eq!(decoded.value.len(), 5);
        assert_eq!(decoded.substituted, vec![1, 2, 3, 4]);
        assert!(decoded.value[1..].iter().all(|m| *m == Member::default()));
        assert_eq!(Member::default(), Member::new(0, 1, 1.0, 1.0));
    }

    #[test]
    fn strict_rejects_fractional_index() {
        let err = decode_members(RawParam::One("0~1.5~1~1"), DecodePolicy::Strict).unwrap_err();
        assert!(matches!(
            err,
            CodecError::MalformedEntry {
                index: 0,
                problem: EntryProblem::NotAnIndex(_),
                ..
            }
        ));
    }

    #[test]
    fn absent_decodes_empty() {
        assert_eq!(encode_members(None), None);
        let decoded = decode_members(RawParam::Many(&[]), DecodePolicy::Lenient).unwrap();
        assert!(decoded.value.is_empty() && decoded.is_clean());
    }
}
