//! The catalog of abstract numbering definitions installed by the engine.

use log::{debug, warn};

use crate::config::NumberingFeat;
use crate::model::{
    AbstractNum, AbstractNumId, Indent, Level, MultiLevelKind, NumberFormat, NumberingNode,
};
use crate::store::NumberingStore;
use crate::Result;

/// The symbolic name of the definition reserved for headings.
pub const HEADING_NUMBERING_NAME: &str = "decimal-heading-multi";

const DECIMAL: &str = "decimal";
const DISC: &str = "disc";
const SQUARE: &str = "square";
const CIRCLE: &str = "circle";
const UPPER_ALPHA: &str = "upper-alpha";
const LOWER_ALPHA: &str = "lower-alpha";
const UPPER_ROMAN: &str = "upper-roman";
const LOWER_ROMAN: &str = "lower-roman";

/// The list-style-types that make a list ordered.
pub const ORDERED_TYPES: [&str; 6] = [
    DECIMAL,
    UPPER_ALPHA,
    LOWER_ALPHA,
    UPPER_ROMAN,
    LOWER_ROMAN,
    HEADING_NUMBERING_NAME,
];

/// Whether a list-style-type denotes an ordered list.
pub fn is_ordered_type(list_style_type: &str) -> bool {
    ORDERED_TYPES
        .iter()
        .any(|name| name.eq_ignore_ascii_case(list_style_type))
}

/// Owns the canonical definitions and resolves list types to them.
#[derive(Debug, Clone)]
pub struct AbstractNumberingRegistry {
    feat: NumberingFeat,
}

impl AbstractNumberingRegistry {
    /// Creates a new registry
    pub fn new(feat: NumberingFeat) -> Self {
        Self { feat }
    }

    fn create_level(&self, format: NumberFormat, text: &str, index: usize) -> Level {
        let start = (!format.is_bullet()).then_some(1);
        Level {
            start,
            justification: Some("left".into()),
            indent: Some(Indent {
                left: self.feat.indent_unit * (index as i32 + 1),
                hanging: self.feat.hanging_indent,
            }),
            ..Level::new(index, format, text)
        }
    }

    fn single(&self, id: AbstractNumId, name: &str, format: NumberFormat, text: &str) -> AbstractNum {
        AbstractNum {
            id,
            name: Some(name.into()),
            kind: MultiLevelKind::Single,
            levels: vec![self.create_level(format, text, 0)],
            extras: Vec::new(),
        }
    }

    /// Builds the canonical catalog with consecutive ids starting at `first`.
    pub fn canonical_catalog(&self, first: AbstractNumId) -> Vec<AbstractNum> {
        // WARNING: the heading definition must only be used for headings
        let heading = AbstractNum {
            id: first + 8,
            name: Some(HEADING_NUMBERING_NAME.into()),
            kind: MultiLevelKind::Single,
            levels: vec![Level {
                start: Some(1),
                justification: Some("left".into()),
                indent: Some(Indent::default()),
                ..Level::new(0, NumberFormat::Decimal, "%1.")
            }],
            extras: Vec::new(),
        };

        vec![
            self.single(first, DECIMAL, NumberFormat::Decimal, "%1."),
            self.single(first + 1, DISC, NumberFormat::Bullet, "•"),
            self.single(first + 2, SQUARE, NumberFormat::Bullet, "▪"),
            self.single(first + 3, CIRCLE, NumberFormat::Bullet, "o"),
            self.single(first + 4, UPPER_ALPHA, NumberFormat::UpperLetter, "%1."),
            self.single(first + 5, LOWER_ALPHA, NumberFormat::LowerLetter, "%1."),
            self.single(first + 6, UPPER_ROMAN, NumberFormat::UpperRoman, "%1."),
            self.single(first + 7, LOWER_ROMAN, NumberFormat::LowerRoman, "%1."),
            heading,
        ]
    }

    /// Installs the canonical catalog unless the store already holds it.
    ///
    /// Returns whether the catalog was inserted.
    pub fn initialize<S: NumberingStore>(&self, store: &mut S) -> Result<bool> {
        let first = store.max_definition_id().map_or(0, |max| max + 1);
        let catalog = self.canonical_catalog(first);

        let installed = catalog.iter().all(|def| {
            def.name
                .as_deref()
                .is_some_and(|name| store.definition_by_name(name).is_some())
        });
        if installed {
            debug!("numbering catalog already installed, skipping");
            return Ok(false);
        }

        let at = store.after_last_definition();
        debug!("installing numbering catalog at {at} with ids starting at {first}");
        for (offset, def) in catalog.into_iter().enumerate() {
            store.insert_at(at + offset, NumberingNode::Abstract(def));
        }
        store.commit()?;

        Ok(true)
    }

    /// Resolves a list-style-type to a definition.
    ///
    /// Unknown or absent names fall back to `decimal` for ordered lists and
    /// to `disc` otherwise.
    pub fn lookup<'s, S: NumberingStore>(
        &self,
        store: &'s S,
        list_style_type: Option<&str>,
        ordered: bool,
    ) -> Result<&'s AbstractNum> {
        if let Some(def) = list_style_type.and_then(|name| store.definition_by_name(name)) {
            return Ok(def);
        }

        let fallback = if ordered { DECIMAL } else { DISC };
        if let Some(name) = list_style_type {
            warn!("unknown list-style-type {name:?}, falling back to {fallback}");
        }

        store
            .definition_by_name(fallback)
            .ok_or_else(|| format!("numbering catalog is missing the {fallback} definition").into())
    }

    /// Turns a single-level definition into a multi-level one.
    ///
    /// In cascading mode every level repeats the markers of its ancestors
    /// (`%1.%2.%3.`) and carries no indentation. Returns whether the
    /// definition was changed.
    pub fn promote<S: NumberingStore>(
        &self,
        store: &mut S,
        id: AbstractNumId,
        cascading: bool,
    ) -> Result<bool> {
        let def = store
            .definition_mut(id)
            .ok_or_else(|| format!("unknown abstract numbering {id}"))?;
        if def.kind != MultiLevelKind::Single {
            return Ok(false);
        }
        let Some(first) = def.levels.first().cloned() else {
            return Err(format!("abstract numbering {id} has no level").into());
        };

        def.kind = MultiLevelKind::Multi;
        // skip the first level, starts to 2
        for ordinal in 2..=self.feat.level_count {
            let index = ordinal - 1;
            let level = if cascading {
                let text: String = (1..=ordinal).map(|it| format!("%{it}.")).collect();
                Level {
                    indent: Some(Indent::default()),
                    ..self.create_level(first.format.clone(), &text, index)
                }
            } else if first.format.is_bullet() {
                // the glyph font lives in the run properties
                let extras = first.extras.iter().filter(|it| !it.is_any(&["pPr"]));
                Level {
                    extras: extras.cloned().collect(),
                    ..self.create_level(first.format.clone(), &first.text, index)
                }
            } else {
                self.create_level(first.format.clone(), &format!("%{ordinal}."), index)
            };
            def.levels.push(level);
        }

        debug!(
            "promoted abstract numbering {id} to {} levels (cascading: {cascading})",
            def.levels.len()
        );
        store.commit()?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NumberingPart, RawChild};

    fn registry() -> AbstractNumberingRegistry {
        AbstractNumberingRegistry::new(NumberingFeat::default())
    }

    #[test]
    fn test_ordered_types() {
        assert!(is_ordered_type("decimal"));
        assert!(is_ordered_type("Upper-Roman"));
        assert!(!is_ordered_type("disc"));
        assert!(!is_ordered_type("none"));
    }

    #[test]
    fn test_lookup_fallback() {
        let registry = registry();
        let mut part = NumberingPart::new();
        registry.initialize(&mut part).unwrap();

        let lookup = |name, ordered| registry.lookup(&part, name, ordered).unwrap().id;
        assert_eq!(lookup(Some("square"), false), 2);
        assert_eq!(lookup(Some("LOWER-ALPHA"), true), 5);
        assert_eq!(lookup(None, true), 0);
        assert_eq!(lookup(None, false), 1);
        assert_eq!(lookup(Some("armenian"), true), 0);
        assert_eq!(lookup(Some("armenian"), false), 1);
    }

    #[test]
    fn test_partial_catalog_is_installed_again() {
        let registry = registry();
        let mut part = NumberingPart::new();
        part.nodes.push(NumberingNode::Abstract(registry.canonical_catalog(0).remove(0)));

        assert!(registry.initialize(&mut part).unwrap());
        assert!(!registry.initialize(&mut part).unwrap());

        let ids: Vec<_> = part.definitions().map(|def| def.id).collect();
        assert_eq!(ids, (0..10).collect::<Vec<_>>());
        // the first match wins
        assert_eq!(registry.lookup(&part, Some("decimal"), true).unwrap().id, 0);
        assert_eq!(registry.lookup(&part, Some("disc"), false).unwrap().id, 2);
        assert_eq!(
            registry.lookup(&part, Some(HEADING_NUMBERING_NAME), true).unwrap().id,
            9
        );
    }

    #[test]
    fn test_promote_is_not_repeated() {
        let registry = registry();
        let mut part = NumberingPart::new();
        registry.initialize(&mut part).unwrap();

        assert!(registry.promote(&mut part, 0, false).unwrap());
        assert!(!registry.promote(&mut part, 0, true).unwrap());

        let def = part.definition(0).unwrap();
        assert_eq!(def.kind, MultiLevelKind::Multi);
        assert_eq!(def.levels.len(), 10);
        assert_eq!(def.level(2).unwrap().text, "%3.");
        assert_eq!(def.level(2).unwrap().indent.unwrap().left, 2160);
    }

    #[test]
    fn test_promote_bullet_keeps_glyph() {
        let registry = registry();
        let mut part = NumberingPart::new();
        registry.initialize(&mut part).unwrap();

        let fonts = RawChild {
            name: "rPr".into(),
            source: r#"<w:rPr><w:rFonts w:ascii="Wingdings"/></w:rPr>"#.into(),
        };
        part.definition_mut(2).unwrap().levels[0].extras.push(fonts.clone());

        registry.promote(&mut part, 2, false).unwrap();
        let def = part.definition(2).unwrap();
        assert!(def.levels.iter().all(|level| level.text == "▪"));
        assert!(def.levels.iter().all(|level| level.start.is_none()));
        assert!(def.levels.iter().all(|level| level.extras == [fonts.clone()]));
    }
}
