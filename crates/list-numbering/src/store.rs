//! The numbering store the engine mutates in place.

use log::trace;

use crate::model::{AbstractNum, AbstractNumId, NumId, NumInstance, NumberingNode, NumberingPart};
use crate::Result;

/// A document numbering part as seen by the engine.
///
/// Every mutation must be visible to the next enumeration, since the engine
/// reads back what it allocated while the conversion is still running.
pub trait NumberingStore {
    /// The children of the part in document order.
    fn nodes(&self) -> &[NumberingNode];

    /// Inserts a child at the given position.
    fn insert_at(&mut self, index: usize, node: NumberingNode);

    /// Adds a numbering instance after the existing definitions and
    /// instances.
    ///
    /// Trailing children such as `w:numIdMacAtCleanup` must stay last.
    fn append(&mut self, node: NumberingNode);

    /// Gets a definition for in-place modification.
    fn definition_mut(&mut self, id: AbstractNumId) -> Option<&mut AbstractNum>;

    /// Persists the pending changes.
    fn save(&mut self) -> Result<()> {
        Ok(())
    }

    /// Reloads the part from its backing storage.
    fn reload(&mut self) -> Result<()> {
        Ok(())
    }

    /// Persists a mutation and reads the part back.
    fn commit(&mut self) -> Result<()> {
        self.save()?;
        self.reload()
    }

    /// Enumerates the abstract numbering definitions.
    fn definitions(&self) -> impl Iterator<Item = &AbstractNum> {
        self.nodes().iter().filter_map(|node| match node {
            NumberingNode::Abstract(def) => Some(def),
            _ => None,
        })
    }

    /// Enumerates the numbering instances.
    fn instances(&self) -> impl Iterator<Item = &NumInstance> {
        self.nodes().iter().filter_map(|node| match node {
            NumberingNode::Instance(inst) => Some(inst),
            _ => None,
        })
    }

    /// Finds a definition by id.
    fn definition(&self, id: AbstractNumId) -> Option<&AbstractNum> {
        self.definitions().find(|def| def.id == id)
    }

    /// Finds the first definition carrying a symbolic name, ignoring case.
    fn definition_by_name(&self, name: &str) -> Option<&AbstractNum> {
        self.definitions().find(|def| def.is_named(name))
    }

    /// The highest definition id in the store.
    fn max_definition_id(&self) -> Option<AbstractNumId> {
        self.definitions().map(|def| def.id).max()
    }

    /// The highest instance id in the store.
    fn max_instance_id(&self) -> Option<NumId> {
        self.instances().map(|inst| inst.id).max()
    }

    /// The position right after the last definition, or `0` without any.
    ///
    /// Renderers apply the "NoList" style to existing instances when the
    /// definitions are not stored consecutively, so new definitions go here.
    fn after_last_definition(&self) -> usize {
        self.nodes()
            .iter()
            .rposition(|node| matches!(node, NumberingNode::Abstract(_)))
            .map_or(0, |index| index + 1)
    }

    /// The position right after the last definition or instance.
    ///
    /// Without either, this is the end of the part.
    fn after_last_instance(&self) -> usize {
        let nodes = self.nodes();
        nodes
            .iter()
            .rposition(|node| !matches!(node, NumberingNode::Opaque(_)))
            .map_or(nodes.len(), |index| index + 1)
    }
}

impl NumberingStore for NumberingPart {
    fn nodes(&self) -> &[NumberingNode] {
        &self.nodes
    }

    fn insert_at(&mut self, index: usize, node: NumberingNode) {
        let index = index.min(self.nodes.len());
        trace!("numbering part: insert child at {index}: {node:?}");
        self.nodes.insert(index, node);
    }

    fn append(&mut self, node: NumberingNode) {
        let index = self.after_last_instance();
        trace!("numbering part: append child at {index}: {node:?}");
        self.nodes.insert(index, node);
    }

    fn definition_mut(&mut self, id: AbstractNumId) -> Option<&mut AbstractNum> {
        self.nodes.iter_mut().find_map(|node| match node {
            NumberingNode::Abstract(def) if def.id == id => Some(def),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MultiLevelKind;

    fn def(id: AbstractNumId, name: &str) -> NumberingNode {
        NumberingNode::Abstract(AbstractNum {
            id,
            name: Some(name.into()),
            kind: MultiLevelKind::Single,
            levels: vec![],
            extras: vec![],
        })
    }

    fn inst(id: NumId, abstract_id: AbstractNumId) -> NumberingNode {
        NumberingNode::Instance(NumInstance {
            id,
            abstract_id,
            level_overrides: vec![],
        })
    }

    #[test]
    fn test_after_last_definition() {
        let mut part = NumberingPart::new();
        assert_eq!(part.after_last_definition(), 0);

        part.append(inst(1, 0));
        assert_eq!(part.after_last_definition(), 0);

        part.nodes = vec![def(3, "a"), def(7, "b"), inst(1, 3), inst(4, 7)];
        assert_eq!(part.after_last_definition(), 2);
        assert_eq!(part.max_definition_id(), Some(7));
        assert_eq!(part.max_instance_id(), Some(4));
    }

    #[test]
    fn test_append_keeps_trailing_children() {
        let cleanup = || NumberingNode::Opaque(r#"<w:numIdMacAtCleanup w:val="0"/>"#.into());
        let mut part = NumberingPart {
            nodes: vec![def(0, "a"), inst(1, 0), cleanup()],
            ..Default::default()
        };

        part.append(inst(2, 0));
        assert_eq!(part.nodes, vec![def(0, "a"), inst(1, 0), inst(2, 0), cleanup()]);
    }

    #[test]
    fn test_lookup_ignores_case() {
        let part = NumberingPart {
            nodes: vec![def(0, "Decimal"), def(1, "disc")],
            ..Default::default()
        };
        assert_eq!(part.definition_by_name("DECIMAL").map(|d| d.id), Some(0));
        assert_eq!(part.definition_by_name("square"), None);
    }
}
