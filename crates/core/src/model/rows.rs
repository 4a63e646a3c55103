//! Bulk entry of nodes and members as comma separated rows.
//!
//! ```text
//! 0, 0, pin, 0, 0
//! 10, 0, roller, 0, 0
//! 5, 5, free, -1, 4
//! ```

use thiserror::Error;

use super::{Member, Node, SupportType};

#[derive(Debug, Clone, PartialEq, Error)]
#[error("row {row} of {total}: {problem}")]
pub struct RowError {
    /// 1-based.
    pub row: usize,
    pub total: usize,
    pub problem: RowProblem,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowProblem {
    #[error("no rows to add")]
    Empty,
    #[error("expected {expected} comma-separated values, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("{field} must be a number, got {value:?}")]
    NotANumber { field: &'static str, value: String },
    #[error("support type must be one of free, pin, roller, yroller; got {0:?}")]
    UnknownSupport(String),
    #[error("{field} must be a node index, got {value:?}")]
    NotAnIndex { field: &'static str, value: String },
    #[error("node {index} does not exist (there are {count} nodes)")]
    NodeOutOfRange { index: usize, count: usize },
    #[error("{field} must be greater than 0")]
    NonPositive { field: &'static str },
}

const NODE_FIELDS: usize = 5;
const MEMBER_FIELDS: usize = 4;

/// Parse `x, y, support, Fx, Fy` rows. Blank lines are skipped.
pub fn parse_node_rows(input: &str) -> Result<Vec<Node>, RowError> {
    let rows = split_rows(input);
    let total = rows.len();
    if total == 0 {
        return Err(RowError {
            row: 0,
            total,
            problem: RowProblem::Empty,
        });
    }
    rows.iter()
        .enumerate()
        .map(|(i, fields)| {
            parse_node_row(fields).map_err(|problem| RowError {
                row: i + 1,
                total,
                problem,
            })
        })
        .collect()
}

/// Parse `start, end, A, E` rows against a model holding `node_count`
/// nodes (including any added in the same batch).
pub fn parse_member_rows(input: &str, node_count: usize) -> Result<Vec<Member>, RowError> {
    let rows = split_rows(input);
    let total = rows.len();
    if total == 0 {
        return Err(RowError {
            row: 0,
            total,
            problem: RowProblem::Empty,
        });
    }
    rows.iter()
        .enumerate()
        .map(|(i, fields)| {
            parse_member_row(fields, node_count).map_err(|problem| RowError {
                row: i + 1,
                total,
                problem,
            })
        })
        .collect()
}

fn split_rows(input: &str) -> Vec<Vec<&str>> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.split(',').map(str::trim).collect())
        .collect()
}

fn parse_node_row(fields: &[&str]) -> Result<Node, RowProblem> {
    let [x, y, support, fx, fy] = fields else {
        return Err(RowProblem::FieldCount {
            expected: NODE_FIELDS,
            found: fields.len(),
        });
    };
    let support = SupportType::from_name(support)
        .ok_or_else(|| RowProblem::UnknownSupport((*support).to_string()))?;
    Ok(Node {
        x: number("x", x)?,
        y: number("y", y)?,
        support,
        fx: number("Fx", fx)?,
        fy: number("Fy", fy)?,
    })
}

fn parse_member_row(fields: &[&str], node_count: usize) -> Result<Member, RowProblem> {
    let [start, end, area, modulus] = fields else {
        return Err(RowProblem::FieldCount {
            expected: MEMBER_FIELDS,
            found: fields.len(),
        });
    };
    let start = node_index("start", start, node_count)?;
    let end = node_index("end", end, node_count)?;
    let area = number("A", area)?;
    if area <= 0.0 {
        return Err(RowProblem::NonPositive { field: "A" });
    }
    let elastic_modulus = number("E", modulus)?;
    if elastic_modulus <= 0.0 {
        return Err(RowProblem::NonPositive { field: "E" });
    }
    Ok(Member {
        start,
        end,
        area,
        elastic_modulus,
    })
}

fn number(field: &'static str, value: &str) -> Result<f64, RowProblem> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| RowProblem::NotANumber {
            field,
            value: value.to_string(),
        })
}

fn node_index(field: &'static str, value: &str, count: usize) -> Result<usize, RowProblem> {
    let index = value
        .parse::<usize>()
        .map_err(|_| RowProblem::NotAnIndex {
            field,
            value: value.to_string(),
        })?;
    if index >= count {
        return Err(RowProblem::NodeOutOfRange { index, count });
    }
    Ok(index)
}
