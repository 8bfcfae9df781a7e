//! The object model of a WordprocessingML numbering part.
//!
//! Only the subset used for list rendering is modelled. Elements of the part
//! that are not understood are kept as [`NumberingNode::Opaque`] so that
//! their position among the definitions survives a rewrite.

use ecow::EcoString;

/// The id of an abstract numbering definition (`w:abstractNumId`).
pub type AbstractNumId = usize;
/// The id of a numbering instance (`w:numId`). `0` means "no numbering".
pub type NumId = usize;

/// The format of the number or bullet of a level (`w:numFmt`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NumberFormat {
    /// `1, 2, 3`
    Decimal,
    /// A literal glyph taken from the level text.
    Bullet,
    /// `A, B, C`
    UpperLetter,
    /// `a, b, c`
    LowerLetter,
    /// `I, II, III`
    UpperRoman,
    /// `i, ii, iii`
    LowerRoman,
    /// Any other format found in an existing document.
    Other(EcoString),
}

impl NumberFormat {
    /// The spelling used by `w:numFmt/@w:val`.
    pub fn as_str(&self) -> &str {
        match self {
            NumberFormat::Decimal => "decimal",
            NumberFormat::Bullet => "bullet",
            NumberFormat::UpperLetter => "upperLetter",
            NumberFormat::LowerLetter => "lowerLetter",
            NumberFormat::UpperRoman => "upperRoman",
            NumberFormat::LowerRoman => "lowerRoman",
            NumberFormat::Other(name) => name.as_str(),
        }
    }

    /// Parses the value of `w:numFmt/@w:val`.
    pub fn parse(value: &str) -> Self {
        match value {
            "decimal" => NumberFormat::Decimal,
            "bullet" => NumberFormat::Bullet,
            "upperLetter" => NumberFormat::UpperLetter,
            "lowerLetter" => NumberFormat::LowerLetter,
            "upperRoman" => NumberFormat::UpperRoman,
            "lowerRoman" => NumberFormat::LowerRoman,
            other => NumberFormat::Other(other.into()),
        }
    }

    /// Whether the level shows a glyph instead of a counter.
    pub fn is_bullet(&self) -> bool {
        matches!(self, NumberFormat::Bullet)
    }
}

/// The value of `w:multiLevelType`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MultiLevelKind {
    /// One level only. Such a definition can be promoted.
    #[default]
    Single,
    /// A full set of levels.
    Multi,
    /// A full set of levels with per-level templates.
    Hybrid,
}

impl MultiLevelKind {
    /// The spelling used by `w:multiLevelType/@w:val`.
    pub fn as_str(self) -> &'static str {
        match self {
            MultiLevelKind::Single => "singleLevel",
            MultiLevelKind::Multi => "multilevel",
            MultiLevelKind::Hybrid => "hybridMultilevel",
        }
    }

    /// Parses the value of `w:multiLevelType/@w:val`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "singleLevel" => Some(MultiLevelKind::Single),
            "multilevel" => Some(MultiLevelKind::Multi),
            "hybridMultilevel" => Some(MultiLevelKind::Hybrid),
            _ => None,
        }
    }
}

/// A child element that is not modelled and is written back as it was read.
///
/// The source keeps the prefixes of the original part, whose root
/// declarations are written back as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChild {
    /// The local name of the element, e.g. `rPr`.
    pub name: EcoString,
    /// The source text of the element.
    pub source: EcoString,
}

impl RawChild {
    /// Whether the element has one of the given local names.
    pub fn is_any(&self, names: &[&str]) -> bool {
        names.contains(&self.name.as_str())
    }
}

/// Paragraph indentation of a level, in twips.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Indent {
    /// `w:ind/@w:left`
    pub left: i32,
    /// `w:ind/@w:hanging`
    pub hanging: i32,
}

/// One indentation tier of an abstract numbering definition (`w:lvl`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    /// The zero based level index (`w:ilvl`).
    pub index: usize,
    /// The counter format.
    pub format: NumberFormat,
    /// The level text pattern, e.g. `%1.` or a bullet glyph.
    pub text: EcoString,
    /// The first counter value (`w:start`).
    pub start: Option<u32>,
    /// Restart the counter after this level (`w:lvlRestart`).
    pub restart: Option<u32>,
    /// The paragraph indentation applied to items of this level.
    pub indent: Option<Indent>,
    /// The alignment of the number (`w:lvlJc`).
    pub justification: Option<EcoString>,
    /// Children kept verbatim, such as the bullet fonts in `w:rPr`.
    ///
    /// A verbatim `w:pPr` replaces the one written from [`Level::indent`].
    pub extras: Vec<RawChild>,
}

impl Level {
    /// Creates a level with no start value, restart rule or indentation.
    pub fn new(index: usize, format: NumberFormat, text: impl Into<EcoString>) -> Self {
        Self {
            index,
            format,
            text: text.into(),
            start: None,
            restart: None,
            indent: None,
            justification: None,
            extras: Vec::new(),
        }
    }
}

/// A reusable template for a class of lists (`w:abstractNum`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbstractNum {
    /// The definition id.
    pub id: AbstractNumId,
    /// The symbolic name (`w:name`), e.g. `decimal` or `disc`.
    pub name: Option<EcoString>,
    /// Whether the definition holds one or all levels.
    pub kind: MultiLevelKind,
    /// The level templates, ordered by index.
    pub levels: Vec<Level>,
    /// Children kept verbatim, such as `w:nsid` or `w:numStyleLink`.
    pub extras: Vec<RawChild>,
}

impl AbstractNum {
    /// Whether the definition carries the given symbolic name, ignoring case.
    pub fn is_named(&self, name: &str) -> bool {
        self.name
            .as_deref()
            .is_some_and(|own| own.eq_ignore_ascii_case(name))
    }

    /// Gets the template of a level by index.
    pub fn level(&self, index: usize) -> Option<&Level> {
        self.levels.iter().find(|level| level.index == index)
    }
}

/// Overrides one level of an instance (`w:lvlOverride`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelOverride {
    /// The overridden level index.
    pub level: usize,
    /// The value the counter restarts with (`w:startOverride`).
    pub start: Option<u32>,
    /// A replacement level template (`w:lvl`), kept verbatim.
    pub template: Option<RawChild>,
}

impl LevelOverride {
    /// Restarts the counter of `level` at 1.
    pub fn restart(level: usize) -> Self {
        Self {
            level,
            start: Some(1),
            template: None,
        }
    }
}

/// A concrete numbered list referenced by paragraphs (`w:num`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumInstance {
    /// The instance id, never `0`.
    pub id: NumId,
    /// The definition the instance is bound to.
    pub abstract_id: AbstractNumId,
    /// The level overrides, in document order.
    pub level_overrides: Vec<LevelOverride>,
}

/// A direct child of `w:numbering`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumberingNode {
    /// An abstract numbering definition.
    Abstract(AbstractNum),
    /// A numbering instance.
    Instance(NumInstance),
    /// A child that is kept verbatim, such as `w:numPicBullet`.
    Opaque(EcoString),
}

/// The numbering metadata of a paragraph (`w:numPr`).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParagraphNumbering {
    /// The referenced instance (`w:numId`).
    pub num_id: NumId,
    /// The zero based level (`w:ilvl`).
    pub level: usize,
}

/// An in-memory numbering part.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NumberingPart {
    /// Namespace declarations of the root element other than `w`.
    pub namespaces: Vec<(EcoString, EcoString)>,
    /// The children of the root element, in document order.
    pub nodes: Vec<NumberingNode>,
}

impl NumberingPart {
    /// Creates an empty part.
    pub fn new() -> Self {
        Self::default()
    }
}
