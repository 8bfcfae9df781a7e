//! The numbering engine driven by the HTML walker.

use ecow::EcoString;
use log::debug;

use crate::allocator::NumberingInstanceAllocator;
use crate::config::NumberingFeat;
use crate::controller::{ListNestingController, NestingContext};
use crate::events::ListEvent;
use crate::heading::{HeadingNumberingAdapter, NumberedParagraph};
use crate::model::{AbstractNum, NumId, NumberingPart, ParagraphNumbering};
use crate::registry::{is_ordered_type, AbstractNumberingRegistry};
use crate::store::NumberingStore;
use crate::style::Length;
use crate::Result;

/// Maps the lists and headings of one output document onto its numbering
/// part.
///
/// A fresh engine is attached per conversion pass. Attaching twice to the
/// same part continues the lists of the previous pass without installing
/// the canonical definitions again.
pub struct NumberingEngine<'a, S: NumberingStore = NumberingPart> {
    store: &'a mut S,
    feat: NumberingFeat,
    registry: AbstractNumberingRegistry,
    allocator: NumberingInstanceAllocator,
    controller: ListNestingController,
    heading: HeadingNumberingAdapter,
}

impl<'a, S: NumberingStore + Default> NumberingEngine<'a, S> {
    /// Attaches to the numbering part of a document, creating the part if
    /// the document has none.
    pub fn attach(slot: &'a mut Option<S>) -> Result<Self> {
        Self::attach_with(slot, NumberingFeat::default())
    }

    /// Attaches with explicit features.
    pub fn attach_with(slot: &'a mut Option<S>, feat: NumberingFeat) -> Result<Self> {
        if slot.is_none() {
            debug!("document has no numbering part, creating one");
        }
        Self::with_feature(slot.get_or_insert_with(S::default), feat)
    }
}

impl<'a, S: NumberingStore> NumberingEngine<'a, S> {
    /// Creates an engine on an existing numbering part.
    pub fn new(store: &'a mut S) -> Result<Self> {
        Self::with_feature(store, NumberingFeat::default())
    }

    /// Creates an engine with explicit features.
    pub fn with_feature(store: &'a mut S, feat: NumberingFeat) -> Result<Self> {
        let registry = AbstractNumberingRegistry::new(feat.clone());
        registry.initialize(store)?;

        let allocator = NumberingInstanceAllocator::new(store, feat.name_seed);
        let controller = ListNestingController::new(allocator.last_instance_id());

        Ok(Self {
            store,
            feat,
            registry,
            allocator,
            controller,
            heading: HeadingNumberingAdapter::new(),
        })
    }

    /// The features of the engine.
    pub fn feature(&self) -> &NumberingFeat {
        &self.feat
    }

    /// The numbering part.
    pub fn store(&self) -> &S {
        self.store
    }

    /// The list nesting state.
    pub fn controller(&self) -> &ListNestingController {
        &self.controller
    }

    /// The current nesting depth. Items are rendered at level `depth - 1`.
    pub fn level_index(&self) -> usize {
        self.controller.depth()
    }

    /// The innermost nesting context.
    pub fn current(&self) -> NestingContext {
        self.controller.current()
    }

    /// The classes of the innermost open list.
    pub fn current_list_classes(&self) -> &[EcoString] {
        self.controller.current_list_classes()
    }

    /// Enters a list element.
    ///
    /// The list counts as ordered when it is an `<ol>` or when its
    /// list-style-type is an ordered one.
    pub fn begin_list(&mut self, list_style_type: Option<&str>, ordered: bool) -> Result<NumId> {
        self.begin_list_with_classes(list_style_type, ordered, Vec::new())
    }

    /// Enters a list element, remembering its classes.
    pub fn begin_list_with_classes(
        &mut self,
        list_style_type: Option<&str>,
        ordered: bool,
        classes: Vec<EcoString>,
    ) -> Result<NumId> {
        let ordered = ordered || list_style_type.is_some_and(is_ordered_type);
        self.controller.begin_list(
            self.store,
            &self.registry,
            &mut self.allocator,
            list_style_type,
            ordered,
            classes,
        )
    }

    /// Resolves `list_style_type` and opens a list with it as is.
    pub fn create_list(&mut self, list_style_type: Option<&str>, ordered: bool) -> Result<NumId> {
        self.controller.begin_list(
            self.store,
            &self.registry,
            &mut self.allocator,
            list_style_type,
            ordered,
            Vec::new(),
        )
    }

    /// Leaves the innermost list.
    pub fn end_list(&mut self, pop_context: bool) -> Result<()> {
        self.controller.end_list(pop_context)
    }

    /// Resets the nesting depth.
    pub fn set_depth(&mut self, depth: usize) -> Result<()> {
        self.controller.set_depth(depth)
    }

    /// Enters a list item and returns the instance it refers to.
    pub fn process_item(&mut self, margin_left: Option<&Length>) -> Result<NumId> {
        self.controller
            .process_item(self.store, &mut self.allocator, margin_left)
    }

    /// Resolves a list-style-type to a definition, with the default fallback.
    pub fn lookup_definition(
        &self,
        list_style_type: Option<&str>,
        ordered: bool,
    ) -> Result<&AbstractNum> {
        self.registry.lookup(self.store, list_style_type, ordered)
    }

    /// Gets the instance shared by all numbered headings.
    pub fn heading_instance(&mut self) -> Result<NumId> {
        self.heading.get_or_create(
            self.store,
            &self.registry,
            &mut self.allocator,
            &mut self.controller,
        )
    }

    /// Numbers a heading paragraph. `indent_level` starts at 1.
    pub fn apply_to_heading<P: NumberedParagraph + ?Sized>(
        &mut self,
        paragraph: &mut P,
        indent_level: usize,
    ) -> Result<ParagraphNumbering> {
        self.heading.apply(
            self.store,
            &self.registry,
            &mut self.allocator,
            &mut self.controller,
            paragraph,
            indent_level,
        )
    }

    /// Replays one walker event.
    ///
    /// Returns the numbering of the paragraph the event produces, if any.
    pub fn apply(&mut self, event: &ListEvent) -> Result<Option<ParagraphNumbering>> {
        let numbering = match event {
            ListEvent::Begin {
                list_style_type,
                ordered,
                classes,
            } => {
                let classes = classes.iter().map(|it| it.as_str().into()).collect();
                let num_id =
                    self.begin_list_with_classes(list_style_type.as_deref(), *ordered, classes)?;
                Some(self.paragraph(num_id))
            }
            ListEvent::End { pop_context } => {
                self.end_list(*pop_context)?;
                None
            }
            ListEvent::SetDepth { depth } => {
                self.set_depth(*depth)?;
                None
            }
            ListEvent::Item { margin_left } => {
                let num_id = self.process_item(margin_left.as_ref())?;
                Some(self.paragraph(num_id))
            }
            ListEvent::Heading { level } => {
                let mut paragraph = ParagraphNumbering::default();
                Some(self.apply_to_heading(&mut paragraph, *level)?)
            }
        };

        Ok(numbering)
    }

    fn paragraph(&self, num_id: NumId) -> ParagraphNumbering {
        ParagraphNumbering {
            num_id,
            level: self.controller.depth().saturating_sub(1),
        }
    }
}
