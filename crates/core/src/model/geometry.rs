use serde::Serialize;
use thiserror::Error;

use super::{Bounds, Member, Node};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("node {index} has a non-finite coordinate or load")]
    NonFiniteNode { index: usize },
    #[error("node {index} does not exist (model has {count} nodes)")]
    UnknownNode { index: usize, count: usize },
    #[error("member {index} does not exist (model has {count} members)")]
    UnknownMember { index: usize, count: usize },
    #[error("member {index} references node {node} but the model has {count} nodes")]
    DanglingMember {
        index: usize,
        node: usize,
        count: usize,
    },
    #[error("member {index} has non-positive area {area}")]
    NonPositiveArea { index: usize, area: f64 },
    #[error("member {index} has non-positive elastic modulus {modulus}")]
    NonPositiveModulus { index: usize, modulus: f64 },
}

/// Ordered node and member arenas. A node's position in the list is its
/// identity, and every member endpoint is guaranteed to reference an
/// existing node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeometryModel {
    nodes: Vec<Node>,
    members: Vec<Member>,
}

impl GeometryModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(nodes: Vec<Node>, members: Vec<Member>) -> Result<Self, EditError> {
        let model = Self { nodes, members };
        model.validate()?;
        Ok(model)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn member(&self, index: usize) -> Option<&Member> {
        self.members.get(index)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Both endpoint nodes of `member`.
    pub fn endpoints(&self, member: &Member) -> Option<(&Node, &Node)> {
        Some((self.nodes.get(member.start)?, self.nodes.get(member.end)?))
    }

    pub fn add_node(&mut self, node: Node) -> Result<usize, EditError> {
        let index = self.nodes.len();
        check_node(index, &node)?;
        self.nodes.push(node);
        Ok(index)
    }

    /// Append several nodes. Nothing is added if any of them is invalid.
    pub fn add_nodes<I>(&mut self, nodes: I) -> Result<(), EditError>
    where
        I: IntoIterator<Item = Node>,
    {
        let base = self.nodes.len();
        let nodes: Vec<Node> = nodes.into_iter().collect();
        for (offset, node) in nodes.iter().enumerate() {
            check_node(base + offset, node)?;
        }
        self.nodes.extend(nodes);
        Ok(())
    }

    pub fn edit_node(&mut self, index: usize, node: Node) -> Result<(), EditError> {
        check_node(index, &node)?;
        let count = self.nodes.len();
        let slot = self
            .nodes
            .get_mut(index)
            .ok_or(EditError::UnknownNode { index, count })?;
        *slot = node;
        Ok(())
    }

    /// Remove a node, drop every member attached to it and shift the
    /// endpoints of the remaining members down past the gap.
    pub fn remove_node(&mut self, index: usize) -> Result<Node, EditError> {
        if index >= self.nodes.len() {
            return Err(EditError::UnknownNode {
                index,
                count: self.nodes.len(),
            });
        }
        let removed = self.nodes.remove(index);
        let before = self.members.len();
        self.members.retain(|member| !member.references(index));
        for member in &mut self.members {
            if member.start > index {
                member.start -= 1;
            }
            if member.end > index {
                member.end -= 1;
            }
        }
        log::debug!(
            "removed node {index}, dropped {} attached members",
            before - self.members.len()
        );
        Ok(removed)
    }

    pub fn add_member(&mut self, member: Member) -> Result<usize, EditError> {
        let index = self.members.len();
        check_member(index, &member, self.nodes.len())?;
        self.members.push(member);
        Ok(index)
    }

    /// Append several members. Nothing is added if any of them is invalid.
    pub fn add_members<I>(&mut self, members: I) -> Result<(), EditError>
    where
        I: IntoIterator<Item = Member>,
    {
        let base = self.members.len();
        let members: Vec<Member> = members.into_iter().collect();
        for (offset, member) in members.iter().enumerate() {
            check_member(base + offset, member, self.nodes.len())?;
        }
        self.members.extend(members);
        Ok(())
    }

    pub fn edit_member(&mut self, index: usize, member: Member) -> Result<(), EditError> {
        check_member(index, &member, self.nodes.len())?;
        let count = self.members.len();
        let slot = self
            .members
            .get_mut(index)
            .ok_or(EditError::UnknownMember { index, count })?;
        *slot = member;
        Ok(())
    }

    pub fn remove_member(&mut self, index: usize) -> Result<Member, EditError> {
        if index >= self.members.len() {
            return Err(EditError::UnknownMember {
                index,
                count: self.members.len(),
            });
        }
        Ok(self.members.remove(index))
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.members.clear();
    }

    /// Report the first node or member that breaks the model's invariants.
    pub fn validate(&self) -> Result<(), EditError> {
        for (index, node) in self.nodes.iter().enumerate() {
            check_node(index, node)?;
        }
        for (index, member) in self.members.iter().enumerate() {
            check_member(index, member, self.nodes.len())?;
        }
        Ok(())
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::of_points(self.nodes.iter().map(|n| (n.x, n.y)))
    }

    /// Nodes in the solver's sign convention.
    pub fn solver_nodes(&self) -> Vec<Node> {
        self.nodes.iter().map(Node::to_solver).collect()
    }
}

fn check_node(index: usize, node: &Node) -> Result<(), EditError> {
    if node.is_finite() {
        Ok(())
    } else {
        Err(EditError::NonFiniteNode { index })
    }
}

fn check_member(index: usize, member: &Member, node_count: usize) -> Result<(), EditError> {
    for node in [member.start, member.end] {
        if node >= node_count {
            return Err(EditError::DanglingMember {
                index,
                node,
                count: node_count,
            });
        }
    }
    if !(member.area > 0.0 && member.area.is_finite()) {
        return Err(EditError::NonPositiveArea {
            index,
            area: member.area,
        });
    }
    if !(member.elastic_modulus > 0.0 && member.elastic_modulus.is_finite()) {
        return Err(EditError::NonPositiveModulus {
            index,
            modulus: member.elastic_modulus,
        });
    }
    Ok(())
}
