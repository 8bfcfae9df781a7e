//! The list nesting state machine.
//!
//! The walker reports lists depth-first and without lookahead, so each
//! decision to reuse or allocate an instance is taken from the state kept
//! here:
//!
//! - a nested ordered list of the same type continues the instance of its
//!   parent, whose definition is promoted to multi-level;
//! - any other ordered list gets its own instance so that its counter
//!   restarts;
//! - unordered lists share one instance per depth and definition, since
//!   renderers do not cope well with hundreds of identical instances.

use ecow::EcoString;
use log::debug;
use rustc_hash::FxHashMap;

use crate::allocator::NumberingInstanceAllocator;
use crate::model::{AbstractNumId, NumId};
use crate::registry::AbstractNumberingRegistry;
use crate::store::NumberingStore;
use crate::style::Length;
use crate::{Error, Result};

/// The instance and definition active at one nesting depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NestingContext {
    /// The instance list items at this depth refer to.
    pub instance: NumId,
    /// The bound definition, `None` for the base entry.
    pub definition: Option<AbstractNumId>,
}

/// Tracks open lists and decides which instance their items use.
#[derive(Debug, Clone)]
pub struct ListNestingController {
    depth: usize,
    max_depth: usize,
    first_item: bool,
    contexts: Vec<NestingContext>,
    classes: Vec<Vec<EcoString>>,
    unordered: FxHashMap<(usize, AbstractNumId), NumId>,
}

impl ListNestingController {
    /// Creates a controller whose base entry refers to `base_instance`.
    pub fn new(base_instance: NumId) -> Self {
        Self {
            depth: 0,
            max_depth: 0,
            first_item: false,
            contexts: vec![NestingContext {
                instance: base_instance,
                definition: None,
            }],
            classes: Vec::new(),
            unordered: FxHashMap::default(),
        }
    }

    /// The current nesting depth, `0` outside of any list.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The deepest nesting reached so far.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Whether the next item is the first of the current list.
    pub fn is_first_item(&self) -> bool {
        self.first_item
    }

    /// The innermost nesting context.
    pub fn current(&self) -> NestingContext {
        // The base entry is never popped.
        self.contexts[self.contexts.len() - 1]
    }

    /// All open nesting contexts, starting with the base entry.
    pub fn contexts(&self) -> &[NestingContext] {
        &self.contexts
    }

    /// The classes of the innermost open list.
    pub fn current_list_classes(&self) -> &[EcoString] {
        self.classes.last().map(Vec::as_slice).unwrap_or_default()
    }

    /// Opens a list and returns the instance its items use.
    pub fn begin_list<S: NumberingStore>(
        &mut self,
        store: &mut S,
        registry: &AbstractNumberingRegistry,
        allocator: &mut NumberingInstanceAllocator,
        list_style_type: Option<&str>,
        ordered: bool,
        classes: Vec<EcoString>,
    ) -> Result<NumId> {
        let definition = registry.lookup(store, list_style_type, ordered)?.id;
        let parent = self.current();

        self.first_item = true;
        self.depth += 1;
        let unseen_depth = self.depth > self.max_depth;
        if unseen_depth {
            self.max_depth = self.depth;
        }

        let instance = if self.depth > 1 && parent.definition == Some(definition) && ordered {
            // save an instance when the nested list has the style of its
            // parent. This allows nesting <ol> with restarting levels.
            registry.promote(store, definition, false)?;
            parent.instance
        } else if ordered {
            registry.promote(store, definition, false)?;
            allocator.create_instance(store, definition, Some(self.depth - 1))?
        } else {
            let key = (self.depth, definition);
            match self.unordered.get(&key) {
                Some(&instance) if !unseen_depth => instance,
                _ => {
                    let instance = allocator.create_instance(store, definition, Some(0))?;
                    self.unordered.insert(key, instance);
                    instance
                }
            }
        };

        self.contexts.push(NestingContext {
            instance,
            definition: Some(definition),
        });
        self.classes.push(classes);

        debug!(
            "begin list: depth {} / instance {instance} / abstract numbering {definition}",
            self.depth
        );
        Ok(instance)
    }

    /// Closes the innermost list.
    ///
    /// Without `pop_context` the nesting context stays in place, which is
    /// how headings leave list-like state behind. Closing more lists than
    /// were opened fails and leaves the state untouched.
    pub fn end_list(&mut self, pop_context: bool) -> Result<()> {
        if self.depth == 0 || (pop_context && self.contexts.len() <= 1) {
            return Err(Error::unbalanced(self.depth, self.contexts.len() - 1));
        }

        self.depth -= 1;
        self.first_item = true;
        if pop_context {
            self.contexts.pop();
        }
        self.classes.pop();

        debug!("end list: depth {} / pop context: {pop_context}", self.depth);
        Ok(())
    }

    /// Moves the nesting depth to `depth`, dropping the contexts above it.
    pub fn set_depth(&mut self, depth: usize) -> Result<()> {
        if depth >= self.contexts.len() {
            return Err(Error::unbalanced(depth, self.contexts.len() - 1));
        }

        self.depth = depth;
        self.contexts.truncate(depth + 1);
        self.classes.truncate(depth);
        Ok(())
    }

    /// Returns the instance of a list item.
    ///
    /// The first item of a list carrying an explicit left margin in pixels
    /// switches its list to a cloned definition, so that the margin does not
    /// leak into other lists sharing the original one.
    pub fn process_item<S: NumberingStore>(
        &mut self,
        store: &mut S,
        allocator: &mut NumberingInstanceAllocator,
        margin_left: Option<&Length>,
    ) -> Result<NumId> {
        if !self.first_item {
            return Ok(self.current().instance);
        }
        self.first_item = false;

        let has_margin = margin_left.is_some_and(Length::is_positive_pixels);
        if let (true, Some(definition)) = (has_margin, self.current().definition) {
            let level = self.depth.saturating_sub(1);
            let clone = allocator.clone_definition(store, definition, level)?;
            let instance = allocator.create_instance(store, clone, None)?;

            let last = self.contexts.len() - 1;
            self.contexts[last] = NestingContext {
                instance,
                definition: Some(clone),
            };
            debug!("list item with margin: instance {instance} / abstract numbering {clone}");
        }

        Ok(self.current().instance)
    }
}
