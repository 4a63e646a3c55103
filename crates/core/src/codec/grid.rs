use super::{
    CodecError, DecodePolicy, Decoded, ENTRY_DELIMITER, ROW_DELIMITER, RawParam, format_number,
    parse_number, substitute,
};

const PARAM: &str = "zforces";

/// Rows joined by `,`, cells by `_`. `None` stays `None`.
pub fn encode_grid(rows: Option<&[Vec<f64>]>) -> Option<String> {
    let rows = rows?;
    let encoded: Vec<String> = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|&cell| format_number(cell))
                .collect::<Vec<_>>()
                .join(&ENTRY_DELIMITER.to_string())
        })
        .collect();
    Some(encoded.join(&ROW_DELIMITER.to_string()))
}

/// Absent or empty input is `None`. Unreadable cells become `0`; the
/// indices in `substituted` are row indices.
pub fn decode_grid(
    raw: RawParam<'_>,
    policy: DecodePolicy,
) -> Result<Decoded<Option<Vec<Vec<f64>>>>, CodecError> {
    let Some(token) = raw.value() else {
        return Ok(Decoded::clean(None));
    };
    let mut rows = Vec::new();
    let mut substituted = Vec::new();
    for (index, row) in token.split(ROW_DELIMITER).enumerate() {
        let mut cells = Vec::new();
        for cell in row.split(ENTRY_DELIMITER) {
            match parse_number(cell) {
                Ok(value) => cells.push(value),
                Err(problem) => {
                    substitute(PARAM, index, problem, policy)?;
                    cells.push(0.0);
                    if substituted.last() != Some(&index) {
                        substituted.push(index);
                    }
                }
            }
        }
        rows.push(cells);
    }
    Ok(Decoded {
        value: Some(rows),
        substituted,
    })
}
