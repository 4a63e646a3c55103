use crate::model::MemberGroupProps;

use super::{
    CodecError, DecodePolicy, Decoded, ENTRY_DELIMITER, EntryProblem, KEY_DELIMITER, RawParam,
    format_number, parse_number, substitute,
};

/// `top-5_bot-5_web-5`.
pub fn encode_group_props(props: Option<&MemberGroupProps>) -> Option<String> {
    let props = props?;
    let entries = [("top", props.top), ("bot", props.bot), ("web", props.web)]
        .map(|(key, value)| format!("{key}{KEY_DELIMITER}{}", format_number(value)));
    Some(entries.join(&ENTRY_DELIMITER.to_string()))
}

/// Decode a group-props object. Keys that are missing, unknown or
/// unreadable fall back to `default`.
pub fn decode_group_props(
    param: &'static str,
    raw: RawParam<'_>,
    default: f64,
    policy: DecodePolicy,
) -> Result<Decoded<Option<MemberGroupProps>>, CodecError> {
    let Some(token) = raw.value() else {
        return Ok(Decoded::clean(None));
    };
    let mut props = MemberGroupProps::uniform(default);
    let mut substituted = Vec::new();
    for (index, entry) in token.split(ENTRY_DELIMITER).enumerate() {
        let Some((key, value)) = entry.split_once(KEY_DELIMITER) else {
            substitute(
                param,
                index,
                EntryProblem::FieldCount {
                    expected: 2,
                    found: 1,
                },
                policy,
            )?;
            substituted.push(index);
            continue;
        };
        let slot = match key {
            "top" => &mut props.top,
            "bot" => &mut props.bot,
            "web" => &mut props.web,
            _ => continue,
        };
        match parse_number(value).and_then(|v| {
            if v > 0.0 {
                Ok(v)
            } else {
                Err(EntryProblem::NonPositive(param))
            }
        }) {
            Ok(v) => *slot = v,
            Err(problem) => {
                substitute(param, index, problem, policy)?;
                substituted.push(index);
            }
        }
    }
    Ok(Decoded {
        value: Some(props),
        substituted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_object_param() {
        let props = MemberGroupProps {
            top: 5.0,
            bot: 4.5,
            web: 2.0,
        };
        assert_eq!(
            encode_group_props(Some(&props)).as_deref(),
            Some("top-5_bot-4.5_web-2")
        );
        assert_eq!(encode_group_props(None), None);
    }

    #[test]
    fn decodes_partial_object_with_defaults() {
        let decoded =
            decode_group_props("area", RawParam::One("bot-3_extra-9"), 5.0, DecodePolicy::Strict)
                .unwrap();
        assert_eq!(
            decoded.value,
            Some(MemberGroupProps {
                top: 5.0,
                bot: 3.0,
                web: 5.0
            })
        );
        assert!(decoded.is_clean());
    }

    #[test]
    fn unreadable_values_fall_back() {
        let decoded = decode_group_props(
            "eMod",
            RawParam::One("top-abc_bot--1_web"),
            29000.0,
            DecodePolicy::Lenient,
        )
        .unwrap();
        assert_eq!(decoded.value, Some(MemberGroupProps::uniform(29000.0)));
        assert_eq!(decoded.substituted, vec![0, 1, 2]);

        let err = decode_group_props("eMod", RawParam::One("top-0"), 1.0, DecodePolicy::Strict)
            .unwrap_err();
        assert!(matches!(
            err,
            CodecError::MalformedEntry {
                param: "eMod",
                problem: EntryProblem::NonPositive("eMod"),
                ..
            }
        ));
    }

    #[test]
    fn absent_is_none() {
        let decoded =
            decode_group_props("area", RawParam::Missing, 5.0, DecodePolicy::Lenient).unwrap();
        assert_eq!(decoded.value, None);
    }
}
