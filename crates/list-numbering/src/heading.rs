//! Numbering of document headings.
//!
//! Headings share one instance of the reserved heading definition, whose
//! levels cascade (`1.`, `1.1.`, `1.1.1.`). They are not part of the list
//! hierarchy, so applying heading numbering resets the list nesting.

use log::debug;

use crate::allocator::NumberingInstanceAllocator;
use crate::controller::ListNestingController;
use crate::model::{NumId, ParagraphNumbering};
use crate::registry::{AbstractNumberingRegistry, HEADING_NUMBERING_NAME};
use crate::store::NumberingStore;
use crate::Result;

/// A paragraph that can carry numbering properties.
pub trait NumberedParagraph {
    /// Attaches `w:numPr` to the paragraph.
    fn set_numbering(&mut self, numbering: ParagraphNumbering);
}

impl NumberedParagraph for ParagraphNumbering {
    fn set_numbering(&mut self, numbering: ParagraphNumbering) {
        *self = numbering;
    }
}

impl NumberedParagraph for Option<ParagraphNumbering> {
    fn set_numbering(&mut self, numbering: ParagraphNumbering) {
        *self = Some(numbering);
    }
}

/// Binds headings to the heading definition.
#[derive(Debug, Default, Clone)]
pub struct HeadingNumberingAdapter {
    instance: Option<NumId>,
}

impl HeadingNumberingAdapter {
    /// Creates an adapter that has not resolved its instance yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The heading instance, if it was already resolved.
    pub fn cached(&self) -> Option<NumId> {
        self.instance
    }

    /// Gets the heading instance, allocating it on first use.
    ///
    /// An instance already bound to the heading definition, left by a
    /// previous conversion of the same document, is picked up.
    pub fn get_or_create<S: NumberingStore>(
        &mut self,
        store: &mut S,
        registry: &AbstractNumberingRegistry,
        allocator: &mut NumberingInstanceAllocator,
        controller: &mut ListNestingController,
    ) -> Result<NumId> {
        if let Some(instance) = self.instance {
            return Ok(instance);
        }

        let definition = registry.lookup(store, Some(HEADING_NUMBERING_NAME), true)?.id;
        let existing = store
            .instances()
            .find(|inst| inst.abstract_id == definition)
            .map(|inst| inst.id);

        let instance = match existing {
            Some(instance) => instance,
            None => {
                // Cascading levels go in first, the list path then finds a
                // multi-level definition and leaves it alone.
                registry.promote(store, definition, true)?;
                controller.begin_list(
                    store,
                    registry,
                    allocator,
                    Some(HEADING_NUMBERING_NAME),
                    true,
                    Vec::new(),
                )?
            }
        };

        debug!("heading numbering instance: {instance}");
        self.instance = Some(instance);
        Ok(instance)
    }

    /// Numbers a heading paragraph. `indent_level` starts at 1.
    pub fn apply<S: NumberingStore, P: NumberedParagraph + ?Sized>(
        &mut self,
        store: &mut S,
        registry: &AbstractNumberingRegistry,
        allocator: &mut NumberingInstanceAllocator,
        controller: &mut ListNestingController,
        paragraph: &mut P,
        indent_level: usize,
    ) -> Result<ParagraphNumbering> {
        let num_id = self.get_or_create(store, registry, allocator, controller)?;
        let numbering = ParagraphNumbering {
            num_id,
            level: indent_level.saturating_sub(1),
        };
        paragraph.set_numbering(numbering);

        // Make sure we reset everything for upcoming lists
        if controller.depth() > 0 {
            controller.end_list(false)?;
        }
        controller.set_depth(0)?;

        Ok(numbering)
    }
}
