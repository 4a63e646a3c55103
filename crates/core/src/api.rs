//! JSON payloads exchanged with the remote geometry and analysis service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    EditError, ForceSummary, GeometryModel, Member, Node, ParametricParams, SupportType,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid payload JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("node id {0:?} is not a number")]
    NodeId(String),
    #[error(transparent)]
    Model(#[from] EditError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePayload {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub fixity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberPayload {
    pub start: u64,
    pub end: u64,
    /// Chord group assigned by the generator (`top`, `botChord`, `web`...).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub member_type: Option<String>,
}

/// Generated truss geometry, keyed by string ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryPayload {
    pub nodes: BTreeMap<String, NodePayload>,
    pub members: BTreeMap<String, MemberPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_node_ids: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_node_ids: Option<Vec<u64>>,
}

impl GeometryPayload {
    /// Convert into an ordered model.
    ///
    /// Nodes and members are ordered by numeric id, member endpoints are
    /// remapped to node positions and members naming an unknown node are
    /// dropped. When `params` is given, its load rows (indexed by node
    /// position) and member section overrides are merged in.
    pub fn into_model(&self, params: Option<&ParametricParams>) -> Result<GeometryModel, ApiError> {
        let mut nodes: Vec<(u64, &NodePayload)> = self
            .nodes
            .iter()
            .map(|(id, node)| Ok((parse_id(id)?, node)))
            .collect::<Result<_, ApiError>>()?;
        nodes.sort_by_key(|(id, _)| *id);
        let position: BTreeMap<u64, usize> = nodes
            .iter()
            .enumerate()
            .map(|(index, (id, _))| (*id, index))
            .collect();

        let mut model_nodes: Vec<Node> = nodes
            .iter()
            .map(|(_, n)| Node::new(n.x, n.y).with_support(SupportType::from_fixity(&n.fixity)))
            .collect();
        if let Some(params) = params {
            for (index, fx, fy) in params.load_rows() {
                match model_nodes.get_mut(index) {
                    Some(node) => {
                        node.fx = fx;
                        node.fy = fy;
                    }
                    None => log::warn!("load row names missing node {index}"),
                }
            }
        }

        let mut members: Vec<(u64, &MemberPayload)> = self
            .members
            .iter()
            .map(|(id, member)| Ok((parse_id(id)?, member)))
            .collect::<Result<_, ApiError>>()?;
        members.sort_by_key(|(id, _)| *id);

        let defaults = ParametricParams::default();
        let params = params.unwrap_or(&defaults);
        let model_members: Vec<Member> = members
            .iter()
            .filter_map(|(id, m)| {
                let endpoints = (position.get(&m.start), position.get(&m.end));
                let (Some(&start), Some(&end)) = endpoints else {
                    log::warn!(
                        "dropping member {id}: endpoint {} or {} is not a node",
                        m.start,
                        m.end
                    );
                    return None;
                };
                let (area, elastic_modulus) = params.section_for(m.member_type.as_deref());
                Some(Member {
                    start,
                    end,
                    area,
                    elastic_modulus,
                })
            })
            .collect();

        Ok(GeometryModel::from_parts(model_nodes, model_members)?)
    }

    /// Node positions of the top chord, remapped like [`into_model`](Self::into_model).
    pub fn top_chord(&self) -> Vec<usize> {
        self.remap_ids(self.top_node_ids.as_deref())
    }

    pub fn bottom_chord(&self) -> Vec<usize> {
        self.remap_ids(self.bot_node_ids.as_deref())
    }

    fn remap_ids(&self, ids: Option<&[u64]>) -> Vec<usize> {
        let mut sorted: Vec<u64> = self.nodes.keys().filter_map(|k| k.parse().ok()).collect();
        sorted.sort_unstable();
        ids.unwrap_or_default()
            .iter()
            .filter_map(|id| sorted.binary_search(id).ok())
            .collect()
    }
}

fn parse_id(id: &str) -> Result<u64, ApiError> {
    id.trim().parse().map_err(|_| ApiError::NodeId(id.to_string()))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberResult {
    pub index: usize,
    pub start: usize,
    pub end: usize,
    pub length: f64,
    pub axial: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    pub index: usize,
    pub x: f64,
    pub y: f64,
}

/// Solver output. Only `success` and `isStable` are always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPayload {
    pub success: bool,
    #[serde(default)]
    pub is_stable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub member_results: Vec<MemberResult>,
    /// Parametric responses carry `[id, start, end, length, axial]` rows
    /// instead of `memberResults`.
    #[serde(default)]
    pub member_forces: Vec<Vec<f64>>,
    #[serde(default)]
    pub displacements: Vec<f64>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    #[serde(default)]
    pub member0_stiffness_matrix: Vec<Vec<f64>>,
    #[serde(default)]
    pub structure_stiffness_matrix: Vec<Vec<f64>>,
    #[serde(default)]
    pub structure_reduced_stiffness_matrix: Vec<Vec<f64>>,
    #[serde(default)]
    pub reduced_force_matrix: Vec<f64>,
}

impl AnalysisPayload {
    pub fn is_usable(&self) -> bool {
        self.success && self.is_stable
    }

    /// Axial force per member, ordered by member index.
    ///
    /// Parametric rows are ordered by their numeric member id, matching the
    /// member order [`GeometryPayload::into_model`] produces.
    pub fn axial_forces(&self) -> Vec<f64> {
        if !self.member_results.is_empty() {
            let mut results: Vec<&MemberResult> = self.member_results.iter().collect();
            results.sort_by_key(|r| r.index);
            return results.iter().map(|r| r.axial).collect();
        }
        let mut rows: Vec<(f64, f64)> = self
            .member_forces
            .iter()
            .filter_map(|row| Some((*row.first()?, *row.last()?)))
            .collect();
        rows.sort_by(|(a, _), (b, _)| a.total_cmp(b));
        rows.into_iter().map(|(_, axial)| axial).collect()
    }

    /// `None` for a failed or unstable solve.
    pub fn force_summary(&self) -> Option<ForceSummary> {
        if !self.is_usable() {
            return None;
        }
        ForceSummary::from_forces(self.axial_forces())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRequest {
    pub x: f64,
    pub y: f64,
    pub support: SupportType,
    #[serde(rename = "Fx")]
    pub fx: f64,
    #[serde(rename = "Fy")]
    pub fy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberRequest {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "A")]
    pub area: f64,
    #[serde(rename = "E")]
    pub elastic_modulus: f64,
}

/// Body of a custom-analysis request, loads in the solver's convention.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRequest {
    pub nodes: Vec<NodeRequest>,
    pub members: Vec<MemberRequest>,
}

impl AnalysisRequest {
    pub fn from_model(model: &GeometryModel) -> Self {
        Self {
            nodes: model
                .solver_nodes()
                .into_iter()
                .map(|n| NodeRequest {
                    x: n.x,
                    y: n.y,
                    support: n.support,
                    fx: n.fx,
                    fy: n.fy,
                })
                .collect(),
            members: model
                .members()
                .iter()
                .map(|m| MemberRequest {
                    start: m.start,
                    end: m.end,
                    area: m.area,
                    elastic_modulus: m.elastic_modulus,
                })
                .collect(),
        }
    }
}

pub fn parse_geometry(json: &str) -> Result<GeometryPayload, ApiError> {
    Ok(serde_json::from_str(json)?)
}

pub fn parse_analysis(json: &str) -> Result<AnalysisPayload, ApiError> {
    Ok(serde_json::from_str(json)?)
}
