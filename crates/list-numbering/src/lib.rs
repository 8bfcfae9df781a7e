//! # List Numbering
//!
//! Maps nested HTML lists (`<ol>`, `<ul>`) and numbered headings onto the
//! numbering model of a WordprocessingML document: a catalog of abstract
//! numbering definitions and the numbering instances paragraphs refer to.
//!
//! The engine is driven by a depth-first walker reporting begin-list,
//! end-list, item and heading events in document order:
//!
//! ```
//! use list_numbering::{NumberingEngine, NumberingPart};
//!
//! let mut part = None::<NumberingPart>;
//! let mut engine = NumberingEngine::attach(&mut part).unwrap();
//!
//! let outer = engine.begin_list(None, true).unwrap();
//! let inner = engine.begin_list(Some("decimal"), true).unwrap();
//! assert_eq!(outer, inner);
//! engine.end_list(true).unwrap();
//! engine.end_list(true).unwrap();
//! ```

pub mod allocator;
pub mod config;
pub mod controller;
#[cfg(feature = "docx")]
pub mod docx;
mod engine;
mod error;
pub mod events;
pub mod heading;
pub mod model;
pub mod registry;
pub mod store;
pub mod style;
pub mod xml;

pub use engine::NumberingEngine;
pub use error::*;

pub use crate::config::NumberingFeat;
pub use crate::events::ListEvent;
pub use crate::heading::NumberedParagraph;
pub use crate::model::{AbstractNumId, NumId, NumberingPart, ParagraphNumbering};
pub use crate::registry::HEADING_NUMBERING_NAME;
pub use crate::store::NumberingStore;
pub use crate::style::{Length, UnitMetric};

/// The result type for list numbering.
pub type Result<T, Err = Error> = std::result::Result<T, Err>;
