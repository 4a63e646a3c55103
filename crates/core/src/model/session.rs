use crate::color_scale::ForceGradient;

use super::{EditError, ForceOverlay, ForceSummary, GeometryModel, Member, Node};

/// A geometry model together with the analysis overlay computed for it.
///
/// Every successful edit drops the overlay, so force colors are never shown
/// for a structure they were not computed on.
#[derive(Debug, Clone, Default)]
pub struct TrussSession {
    model: GeometryModel,
    overlay: Option<ForceOverlay>,
}

impl TrussSession {
    pub fn new(model: GeometryModel) -> Self {
        Self {
            model,
            overlay: None,
        }
    }

    pub fn model(&self) -> &GeometryModel {
        &self.model
    }

    pub fn overlay(&self) -> Option<&ForceOverlay> {
        self.overlay.as_ref()
    }

    pub fn force_summary(&self) -> Option<&ForceSummary> {
        self.overlay.as_ref().map(ForceOverlay::summary)
    }

    pub fn into_model(self) -> GeometryModel {
        self.model
    }

    /// Attach per-member axial forces from a solve of the current model.
    ///
    /// Results whose length does not match the member count belong to a
    /// different structure and are discarded.
    pub fn attach_forces(
        &mut self,
        forces: &[f64],
        gradient: ForceGradient,
    ) -> Option<&ForceSummary> {
        if forces.len() != self.model.member_count() {
            log::warn!(
                "discarding {} member forces for a model with {} members",
                forces.len(),
                self.model.member_count()
            );
            self.overlay = None;
            return None;
        }
        self.overlay = ForceOverlay::from_forces(forces, gradient);
        self.force_summary()
    }

    pub fn invalidate(&mut self) {
        self.overlay = None;
    }

    pub fn replace_model(&mut self, model: GeometryModel) {
        self.model = model;
        self.invalidate();
    }

    pub fn add_node(&mut self, node: Node) -> Result<usize, EditError> {
        let index = self.model.add_node(node)?;
        self.invalidate();
        Ok(index)
    }

    pub fn add_nodes<I>(&mut self, nodes: I) -> Result<(), EditError>
    where
        I: IntoIterator<Item = Node>,
    {
        self.model.add_nodes(nodes)?;
        self.invalidate();
        Ok(())
    }

    pub fn edit_node(&mut self, index: usize, node: Node) -> Result<(), EditError> {
        self.model.edit_node(index, node)?;
        self.invalidate();
        Ok(())
    }

    pub fn remove_node(&mut self, index: usize) -> Result<Node, EditError> {
        let node = self.model.remove_node(index)?;
        self.invalidate();
        Ok(node)
    }

    pub fn add_member(&mut self, member: Member) -> Result<usize, EditError> {
        let index = self.model.add_member(member)?;
        self.invalidate();
        Ok(index)
    }

    pub fn add_members<I>(&mut self, members: I) -> Result<(), EditError>
    where
        I: IntoIterator<Item = Member>,
    {
        self.model.add_members(members)?;
        self.invalidate();
        Ok(())
    }

    pub fn edit_member(&mut self, index: usize, member: Member) -> Result<(), EditError> {
        self.model.edit_member(index, member)?;
        self.invalidate();
        Ok(())
    }

    pub fn remove_member(&mut self, index: usize) -> Result<Member, EditError> {
        let member = self.model.remove_member(index)?;
        self.invalidate();
        Ok(member)
    }

    pub fn clear(&mut self) {
        self.model.clear();
        self.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solved() -> TrussSession {
        let model = GeometryModel::from_parts(
            vec![Node::new(0.0, 0.0), Node::new(10.0, 5.0), Node::new(10.0, 0.0)],
            vec![Member::new(0, 1, 2.0, 29000.0), Member::new(1, 2, 2.0, 29000.0)],
        )
        .unwrap();
        let mut session = TrussSession::new(model);
        let summary = session
            .attach_forces(&[-3.0, 4.5], ForceGradient::default())
            .copied();
        assert_eq!(summary, Some(ForceSummary { min: -3.0, max: 4.5 }));
        session
    }

    #[test]
    fn load_edit_clears_overlay() {
        let mut session = solved();
        session
            .edit_node(1, Node::new(10.0, 5.0).with_load(0.0, -1.0))
            .unwrap();
        assert!(session.overlay().is_none());
        assert!(session.force_summary().is_none());
    }

    #[test]
    fn failed_edit_keeps_overlay() {
        let mut session = solved();
        assert!(session.add_member(Member::new(0, 7, 1.0, 1.0)).is_err());
        assert!(session.overlay().is_some());
    }

    #[test]
    fn removal_and_clear_invalidate() {
        let mut session = solved();
        session.remove_member(0).unwrap();
        assert!(session.overlay().is_none());

        let mut session = solved();
        session.clear();
        assert!(session.overlay().is_none());
        assert!(session.model().is_empty());
    }

    #[test]
    fn mismatched_results_are_discarded() {
        let mut session = solved();
        assert!(session
            .attach_forces(&[1.0], ForceGradient::default())
            .is_none());
        assert!(session.overlay().is_none());
    }
}
