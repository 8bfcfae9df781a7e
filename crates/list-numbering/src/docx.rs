//! Exports numbering into a `docx-rs` document.

use docx_rs::{
    AbstractNumbering, Docx, IndentLevel, LevelJc, LevelOverride, LevelText, Numbering,
    NumberingId, Paragraph, SpecialIndentType, Start,
};

use crate::heading::NumberedParagraph;
use crate::model::{
    AbstractNum, Level, NumInstance, NumberingNode, NumberingPart, ParagraphNumbering,
};

fn to_level(level: &Level) -> docx_rs::Level {
    let mut lvl = docx_rs::Level::new(
        level.index,
        Start::new(level.start.unwrap_or(1) as usize),
        docx_rs::NumberFormat::new(level.format.as_str()),
        LevelText::new(level.text.as_str()),
        LevelJc::new(level.justification.as_deref().unwrap_or("left")),
    );

    if let Some(indent) = level.indent {
        lvl = lvl.indent(
            Some(indent.left),
            Some(SpecialIndentType::Hanging(indent.hanging)),
            None,
            None,
        );
    }
    if let Some(restart) = level.restart {
        lvl = lvl.level_restart(restart);
    }

    lvl
}

fn to_abstract_numbering(def: &AbstractNum) -> AbstractNumbering {
    def.levels
        .iter()
        .fold(AbstractNumbering::new(def.id), |abs, level| {
            abs.add_level(to_level(level))
        })
}

fn to_numbering(inst: &NumInstance) -> Numbering {
    // verbatim level templates have no `docx-rs` counterpart
    inst.level_overrides
        .iter()
        .filter_map(|lvl| Some(LevelOverride::new(lvl.level).start(lvl.start? as usize)))
        .fold(Numbering::new(inst.id, inst.abstract_id), |numbering, lvl| {
            numbering.add_override(lvl)
        })
}

impl NumberingPart {
    /// Adds the definitions and instances of the part to a document.
    ///
    /// Opaque and verbatim children have no `docx-rs` counterpart and are
    /// skipped.
    pub fn to_docx(&self, docx: Docx) -> Docx {
        self.nodes.iter().fold(docx, |docx, node| match node {
            NumberingNode::Abstract(def) => docx.add_abstract_numbering(to_abstract_numbering(def)),
            NumberingNode::Instance(inst) => docx.add_numbering(to_numbering(inst)),
            NumberingNode::Opaque(_) => docx,
        })
    }
}

impl NumberedParagraph for Paragraph {
    fn set_numbering(&mut self, numbering: ParagraphNumbering) {
        let para = std::mem::replace(self, Paragraph::new());
        *self = para.numbering(
            NumberingId::new(numbering.num_id),
            IndentLevel::new(numbering.level),
        );
    }
}
