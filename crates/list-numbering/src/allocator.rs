//! Issues ids and materializes new instances and definitions.

use log::debug;

use crate::model::{
    AbstractNum, AbstractNumId, LevelOverride, MultiLevelKind, NumId, NumInstance, NumberingNode,
};
use crate::store::NumberingStore;
use crate::Result;

/// Mints numbering instances and cloned definitions.
#[derive(Debug, Clone)]
pub struct NumberingInstanceAllocator {
    last_instance_id: NumId,
    rng: fastrand::Rng,
}

impl NumberingInstanceAllocator {
    /// Creates an allocator continuing after the instances of the store.
    pub fn new<S: NumberingStore>(store: &S, name_seed: Option<u64>) -> Self {
        // `w:numId` 0 means that numbering was removed from the paragraph.
        // The seed is the store's maximum or 0, so the first instance of an
        // empty part is 1 and not 2.
        let last_instance_id = store.max_instance_id().unwrap_or(0);
        let rng = match name_seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };

        Self {
            last_instance_id,
            rng,
        }
    }

    /// The most recently issued instance id, or the store's maximum.
    pub fn last_instance_id(&self) -> NumId {
        self.last_instance_id
    }

    /// Issues the next instance id.
    pub fn next_instance_id(&mut self) -> NumId {
        self.last_instance_id += 1;
        self.last_instance_id
    }

    /// Appends a new instance bound to `definition`.
    ///
    /// With a `restart_level`, the counter of that level restarts at 1.
    pub fn create_instance<S: NumberingStore>(
        &mut self,
        store: &mut S,
        definition: AbstractNumId,
        restart_level: Option<usize>,
    ) -> Result<NumId> {
        if store.definition(definition).is_none() {
            return Err(format!("cannot bind instance to unknown abstract numbering {definition}").into());
        }

        let id = self.next_instance_id();
        store.append(NumberingNode::Instance(NumInstance {
            id,
            abstract_id: definition,
            level_overrides: restart_level.into_iter().map(LevelOverride::restart).collect(),
        }));
        store.commit()?;

        debug!("created numbering instance {id} for abstract numbering {definition}");
        Ok(id)
    }

    /// Copies the first level of `definition` into a new single-level
    /// definition under a fresh id and a unique name.
    ///
    /// The copied level is re-indexed to `level_index`, the level the list
    /// items are rendered at. The clone joins the block of definitions.
    pub fn clone_definition<S: NumberingStore>(
        &mut self,
        store: &mut S,
        definition: AbstractNumId,
        level_index: usize,
    ) -> Result<AbstractNumId> {
        let source = store
            .definition(definition)
            .ok_or_else(|| format!("cannot clone unknown abstract numbering {definition}"))?;
        let mut level = source
            .levels
            .first()
            .cloned()
            .ok_or_else(|| format!("cannot clone abstract numbering {definition} without level"))?;

        level.index = level_index;
        if !level.format.is_bullet() {
            level.start = Some(1);
        }

        let base = source.name.as_deref().unwrap_or("list");
        let name = format!("{base}-{:016x}", self.rng.u64(..));
        let id = store.max_definition_id().map_or(0, |max| max + 1);

        let clone = AbstractNum {
            id,
            name: Some(name.into()),
            kind: MultiLevelKind::Single,
            levels: vec![level],
            extras: Vec::new(),
        };

        let at = store.after_last_definition();
        store.insert_at(at, NumberingNode::Abstract(clone));
        store.commit()?;

        debug!("cloned abstract numbering {definition} as {id}");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NumberingFeat;
    use crate::model::NumberingPart;
    use crate::registry::AbstractNumberingRegistry;

    fn prepared() -> NumberingPart {
        let mut part = NumberingPart::new();
        AbstractNumberingRegistry::new(NumberingFeat::default())
            .initialize(&mut part)
            .unwrap();
        part
    }

    #[test]
    fn test_instance_ids_start_at_one() {
        let mut part = prepared();
        let mut allocator = NumberingInstanceAllocator::new(&part, None);
        assert_eq!(allocator.last_instance_id(), 0);

        assert_eq!(allocator.create_instance(&mut part, 0, Some(0)).unwrap(), 1);
        assert_eq!(allocator.create_instance(&mut part, 1, None).unwrap(), 2);

        let inst = part.instances().next().unwrap();
        assert_eq!(inst.level_overrides, [LevelOverride::restart(0)]);
    }

    #[test]
    fn test_instance_ids_follow_store() {
        let mut part = prepared();
        part.append(NumberingNode::Instance(NumInstance {
            id: 41,
            abstract_id: 0,
            level_overrides: Vec::new(),
        }));

        let mut allocator = NumberingInstanceAllocator::new(&part, None);
        assert_eq!(allocator.create_instance(&mut part, 0, None).unwrap(), 42);
    }

    #[test]
    fn test_unknown_definition() {
        let mut part = prepared();
        let mut allocator = NumberingInstanceAllocator::new(&part, None);
        let err = allocator.create_instance(&mut part, 99, None).unwrap_err();
        assert!(!err.is_unbalanced());
        assert_eq!(part.instances().count(), 0);
    }

    #[test]
    fn test_clone_joins_definition_block() {
        let mut part = prepared();
        let mut allocator = NumberingInstanceAllocator::new(&part, Some(7));
        allocator.create_instance(&mut part, 5, Some(0)).unwrap();

        let clone = allocator.clone_definition(&mut part, 5, 2).unwrap();
        assert_eq!(clone, 9);

        // the clone comes before the instance
        assert!(matches!(&part.nodes[9], NumberingNode::Abstract(def) if def.id == 9));
        assert!(matches!(&part.nodes[10], NumberingNode::Instance(_)));

        let def = part.definition(clone).unwrap();
        assert!(def.name.as_deref().unwrap().starts_with("lower-alpha-"));
        assert_ne!(def.name, part.definition(5).unwrap().name);
        assert_eq!(def.levels.len(), 1);
        assert_eq!(def.levels[0].index, 2);
        assert_eq!(def.levels[0].text, "%1.");
    }
}
