use crate::model::{Node, SupportType};

use super::{
    CodecError, DecodePolicy, Decoded, ENTRY_DELIMITER, EntryProblem, FIELD_DELIMITER, RawParam,
    decode_list, format_number, parse_number, split_fields,
};

const PARAM: &str = "cnodes";

/// `x~y~code~Fx~Fy` entries joined by `_`. `None` stays `None`.
pub fn encode_nodes(nodes: Option<&[Node]>) -> Option<String> {
    let nodes = nodes?;
    let entries: Vec<String> = nodes.iter().map(encode_node).collect();
    Some(entries.join(&ENTRY_DELIMITER.to_string()))
}

fn encode_node(node: &Node) -> String {
    [
        format_number(node.x),
        format_number(node.y),
        node.support.code().to_string(),
        format_number(node.fx),
        format_number(node.fy),
    ]
    .join(&FIELD_DELIMITER.to_string())
}

/// Absent or empty input is an empty node list.
pub fn decode_nodes(
    raw: RawParam<'_>,
    policy: DecodePolicy,
) -> Result<Decoded<Vec<Node>>, CodecError> {
    match raw.value() {
        None => Ok(Decoded::clean(Vec::new())),
        Some(token) => decode_list(
            PARAM,
            token,
            ENTRY_DELIMITER,
            policy,
            decode_node,
            Node::default,
        ),
    }
}

fn decode_node(entry: &str) -> Result<Node, EntryProblem> {
    let [x, y, code, fx, fy] = split_fields::<5>(entry, FIELD_DELIMITER)?;
    Ok(Node {
        x: parse_number(x)?,
        y: parse_number(y)?,
        support: SupportType::from_code(code),
        fx: parse_number(fx)?,
        fy: parse_number(fy)?,
    })
}
