//! Reads and writes `word/numbering.xml`.

use std::fmt::Write;

use ecow::EcoString;
use roxmltree::{Document, Node};

use crate::model::{
    AbstractNum, Indent, Level, LevelOverride, MultiLevelKind, NumInstance, NumberFormat,
    NumberingNode, NumberingPart, RawChild,
};
use crate::{Error, Result};

/// The WordprocessingML main namespace.
pub const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

fn wml<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.has_tag_name((WML_NS, name)))
}

fn wml_val<'a>(node: Node<'a, '_>, child: &str) -> Option<&'a str> {
    wml(node, child)?.attribute((WML_NS, "val"))
}

fn wml_num<T: std::str::FromStr>(node: Node, attr: &str) -> Option<T> {
    node.attribute((WML_NS, attr))?.trim().parse().ok()
}

fn required<T: std::str::FromStr>(node: Node, attr: &str) -> Result<T> {
    wml_num(node, attr).ok_or_else(|| {
        Error::invalid_xml(format!(
            "<w:{}> has no valid w:{attr}",
            node.tag_name().name()
        ))
    })
}

/// Children of `w:lvl` written between `w:lvlRestart` and `w:lvlText`.
const BEFORE_LEVEL_TEXT: &[&str] = &["pStyle", "isLgl", "suff"];
/// Children of `w:lvl` written between `w:lvlText` and `w:lvlJc`.
const BEFORE_LEVEL_JC: &[&str] = &["lvlPicBulletId", "legacy"];
/// Children of `w:abstractNum` written before `w:multiLevelType`.
const BEFORE_KIND: &[&str] = &["nsid"];
/// Children of `w:abstractNum` written between `w:multiLevelType` and `w:name`.
const BEFORE_NAME: &[&str] = &["tmpl"];
/// Children of `w:abstractNum` written between `w:name` and the levels.
const BEFORE_LEVELS: &[&str] = &["styleLink", "numStyleLink"];

fn raw(node: Node) -> RawChild {
    RawChild {
        name: node.tag_name().name().into(),
        source: node.document().input_text()[node.range()].into(),
    }
}

/// Whether `w:pPr` holds nothing but an indentation that [`Indent`] models.
fn is_plain_indent(ppr: Node) -> bool {
    ppr.children().filter(Node::is_element).all(|child| {
        child.has_tag_name((WML_NS, "ind"))
            && child.attributes().all(|attr| {
                attr.namespace() == Some(WML_NS)
                    && matches!(attr.name(), "left" | "start" | "hanging")
            })
    })
}

fn parse_level(node: Node) -> Result<Level> {
    let format = wml_val(node, "numFmt").map_or(NumberFormat::Decimal, NumberFormat::parse);
    let text = wml_val(node, "lvlText").unwrap_or_default();
    let indent = wml(node, "pPr").and_then(|ppr| wml(ppr, "ind")).map(|ind| Indent {
        left: wml_num(ind, "left")
            .or_else(|| wml_num(ind, "start"))
            .unwrap_or(0),
        hanging: wml_num(ind, "hanging").unwrap_or(0),
    });

    let extras = node
        .children()
        .filter(Node::is_element)
        .filter(|child| {
            let tag = child.tag_name();
            if tag.namespace() != Some(WML_NS) {
                return true;
            }
            match tag.name() {
                "start" | "numFmt" | "lvlRestart" | "lvlText" | "lvlJc" => false,
                "pPr" => !is_plain_indent(*child),
                _ => true,
            }
        })
        .map(raw)
        .collect();

    Ok(Level {
        start: wml(node, "start").and_then(|it| wml_num(it, "val")),
        restart: wml(node, "lvlRestart").and_then(|it| wml_num(it, "val")),
        indent,
        justification: wml_val(node, "lvlJc").map(EcoString::from),
        extras,
        ..Level::new(required(node, "ilvl")?, format, text)
    })
}

fn parse_abstract_num(node: Node) -> Result<AbstractNum> {
    let mut levels = Vec::new();
    let mut extras = Vec::new();
    for child in node.children().filter(Node::is_element) {
        if child.has_tag_name((WML_NS, "lvl")) {
            levels.push(parse_level(child)?);
        } else if !child.has_tag_name((WML_NS, "multiLevelType"))
            && !child.has_tag_name((WML_NS, "name"))
        {
            extras.push(raw(child));
        }
    }

    let kind = match wml_val(node, "multiLevelType").and_then(MultiLevelKind::parse) {
        Some(kind) => kind,
        None if levels.len() > 1 => MultiLevelKind::Multi,
        None => MultiLevelKind::Single,
    };

    Ok(AbstractNum {
        id: required(node, "abstractNumId")?,
        name: wml_val(node, "name").map(EcoString::from),
        kind,
        levels,
        extras,
    })
}

fn parse_level_override(node: Node) -> Result<LevelOverride> {
    Ok(LevelOverride {
        level: required(node, "ilvl")?,
        start: wml(node, "startOverride").and_then(|it| wml_num(it, "val")),
        template: wml(node, "lvl").map(raw),
    })
}

fn parse_num(node: Node) -> Result<NumInstance> {
    let abstract_id = wml(node, "abstractNumId")
        .and_then(|it| wml_num(it, "val"))
        .ok_or_else(|| Error::invalid_xml("<w:num> has no w:abstractNumId"))?;

    let level_overrides = node
        .children()
        .filter(|child| child.has_tag_name((WML_NS, "lvlOverride")))
        .map(parse_level_override)
        .collect::<Result<Vec<_>>>()?;

    Ok(NumInstance {
        id: required(node, "numId")?,
        abstract_id,
        level_overrides,
    })
}

impl NumberingPart {
    /// Parses the content of a numbering part.
    pub fn from_xml(text: &str) -> Result<Self> {
        let doc = Document::parse(text)?;
        let root = doc.root_element();
        if !root.has_tag_name((WML_NS, "numbering")) {
            return Err(Error::invalid_xml(format!(
                "unexpected root element <{}>",
                root.tag_name().name()
            )));
        }

        let namespaces = root
            .namespaces()
            .filter(|ns| ns.uri() != WML_NS && ns.uri() != XML_NS)
            .filter_map(|ns| Some((ns.name()?.into(), ns.uri().into())))
            .collect();

        let mut nodes = Vec::new();
        for child in root.children().filter(Node::is_element) {
            let node = if child.has_tag_name((WML_NS, "abstractNum")) {
                NumberingNode::Abstract(parse_abstract_num(child)?)
            } else if child.has_tag_name((WML_NS, "num")) {
                NumberingNode::Instance(parse_num(child)?)
            } else {
                NumberingNode::Opaque(raw(child).source)
            };
            nodes.push(node);
        }

        Ok(Self { namespaces, nodes })
    }

    /// Serializes the part as `word/numbering.xml`.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        // Writing into a `String` cannot fail.
        let _ = self.write_xml(&mut out);
        out
    }

    fn write_xml(&self, out: &mut String) -> std::fmt::Result {
        writeln!(
            out,
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#
        )?;
        write!(out, r#"<w:numbering xmlns:w="{WML_NS}""#)?;
        for (prefix, uri) in &self.namespaces {
            write!(out, r#" xmlns:{prefix}="{}""#, attr(uri))?;
        }
        writeln!(out, ">")?;

        for node in &self.nodes {
            match node {
                NumberingNode::Abstract(def) => write_abstract_num(out, def)?,
                NumberingNode::Instance(inst) => write_num(out, inst)?,
                NumberingNode::Opaque(raw) => writeln!(out, "  {raw}")?,
            }
        }

        writeln!(out, "</w:numbering>")
    }
}

fn attr(value: &str) -> std::borrow::Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}

fn write_raw<'a>(
    out: &mut String,
    extras: impl IntoIterator<Item = &'a RawChild>,
    pad: &str,
) -> std::fmt::Result {
    for child in extras {
        writeln!(out, "{pad}{}", child.source)?;
    }
    Ok(())
}

fn write_abstract_num(out: &mut String, def: &AbstractNum) -> std::fmt::Result {
    let extras = |names: &'static [&'static str]| {
        def.extras.iter().filter(move |it| it.is_any(names))
    };
    let pad = "    ";

    writeln!(out, r#"  <w:abstractNum w:abstractNumId="{}">"#, def.id)?;
    write_raw(out, extras(BEFORE_KIND), pad)?;
    writeln!(out, r#"    <w:multiLevelType w:val="{}"/>"#, def.kind.as_str())?;
    write_raw(out, extras(BEFORE_NAME), pad)?;
    if let Some(name) = &def.name {
        writeln!(out, r#"    <w:name w:val="{}"/>"#, attr(name))?;
    }
    write_raw(out, extras(BEFORE_LEVELS), pad)?;
    for level in &def.levels {
        write_level(out, level)?;
    }
    let ordered = [BEFORE_KIND, BEFORE_NAME, BEFORE_LEVELS].concat();
    write_raw(out, def.extras.iter().filter(|it| !it.is_any(&ordered)), pad)?;
    writeln!(out, "  </w:abstractNum>")
}

fn write_level(out: &mut String, level: &Level) -> std::fmt::Result {
    let extras = |names: &'static [&'static str]| {
        level.extras.iter().filter(move |it| it.is_any(names))
    };
    let pad = "      ";

    writeln!(out, r#"    <w:lvl w:ilvl="{}">"#, level.index)?;
    if let Some(start) = level.start {
        writeln!(out, r#"      <w:start w:val="{start}"/>"#)?;
    }
    writeln!(out, r#"      <w:numFmt w:val="{}"/>"#, attr(level.format.as_str()))?;
    if let Some(restart) = level.restart {
        writeln!(out, r#"      <w:lvlRestart w:val="{restart}"/>"#)?;
    }
    write_raw(out, extras(BEFORE_LEVEL_TEXT), pad)?;
    writeln!(out, r#"      <w:lvlText w:val="{}"/>"#, attr(&level.text))?;
    write_raw(out, extras(BEFORE_LEVEL_JC), pad)?;
    if let Some(jc) = &level.justification {
        writeln!(out, r#"      <w:lvlJc w:val="{}"/>"#, attr(jc))?;
    }

    let mut paragraph = extras(&["pPr"]).peekable();
    if paragraph.peek().is_some() {
        write_raw(out, paragraph, pad)?;
    } else if let Some(indent) = level.indent {
        writeln!(
            out,
            r#"      <w:pPr><w:ind w:left="{}" w:hanging="{}"/></w:pPr>"#,
            indent.left, indent.hanging
        )?;
    }

    let ordered = [BEFORE_LEVEL_TEXT, BEFORE_LEVEL_JC, &["pPr"]].concat();
    write_raw(out, level.extras.iter().filter(|it| !it.is_any(&ordered)), pad)?;
    writeln!(out, "    </w:lvl>")
}

fn write_num(out: &mut String, inst: &NumInstance) -> std::fmt::Result {
    writeln!(out, r#"  <w:num w:numId="{}">"#, inst.id)?;
    writeln!(out, r#"    <w:abstractNumId w:val="{}"/>"#, inst.abstract_id)?;
    for lvl in &inst.level_overrides {
        match (lvl.start, &lvl.template) {
            (None, None) => writeln!(out, r#"    <w:lvlOverride w:ilvl="{}"/>"#, lvl.level)?,
            (Some(start), None) => writeln!(
                out,
                r#"    <w:lvlOverride w:ilvl="{}"><w:startOverride w:val="{start}"/></w:lvlOverride>"#,
                lvl.level
            )?,
            (start, Some(template)) => {
                writeln!(out, r#"    <w:lvlOverride w:ilvl="{}">"#, lvl.level)?;
                if let Some(start) = start {
                    writeln!(out, r#"      <w:startOverride w:val="{start}"/>"#)?;
                }
                writeln!(out, "      {}", template.source)?;
                writeln!(out, "    </w:lvlOverride>")?;
            }
        }
    }
    writeln!(out, "  </w:num>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NumberingStore;

    const EXISTING: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:w14="http://schemas.microsoft.com/office/word/2010/wordml">
  <w:numPicBullet w:numPicBulletId="0"><w:pict/></w:numPicBullet>
  <w:abstractNum w:abstractNumId="3">
    <w:multiLevelType w:val="hybridMultilevel"/>
    <w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1)"/><w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr></w:lvl>
    <w:lvl w:ilvl="1"><w:start w:val="1"/><w:numFmt w:val="lowerLetter"/><w:lvlText w:val="%2)"/></w:lvl>
  </w:abstractNum>
  <w:num w:numId="5"><w:abstractNumId w:val="3"/></w:num>
  <w:num w:numId="6"><w:abstractNumId w:val="3"/><w:lvlOverride w:ilvl="1"><w:startOverride w:val="4"/></w:lvlOverride></w:num>
</w:numbering>"#;

    #[test]
    fn test_parse_existing_part() {
        let part = NumberingPart::from_xml(EXISTING).unwrap();
        assert_eq!(part.nodes.len(), 4);
        assert_eq!(
            part.namespaces,
            vec![(
                "w14".into(),
                "http://schemas.microsoft.com/office/word/2010/wordml".into()
            )]
        );
        assert!(matches!(&part.nodes[0], NumberingNode::Opaque(raw) if raw.starts_with("<w:numPicBullet")));

        let def = part.definition(3).unwrap();
        assert_eq!(def.kind, MultiLevelKind::Hybrid);
        assert_eq!(def.name, None);
        assert_eq!(def.levels[1].format, NumberFormat::LowerLetter);
        assert_eq!(def.levels[0].indent, Some(Indent { left: 720, hanging: 360 }));

        assert_eq!(part.max_instance_id(), Some(6));
        let inst = part.instances().last().unwrap();
        assert_eq!(
            inst.level_overrides,
            [LevelOverride {
                level: 1,
                start: Some(4),
                template: None,
            }]
        );
    }

    const WORD_SAVED: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:abstractNum w:abstractNumId="0">
    <w:nsid w:val="1A2B3C4D"/>
    <w:multiLevelType w:val="hybridMultilevel"/>
    <w:tmpl w:val="04090001"/>
    <w:lvl w:ilvl="0">
      <w:start w:val="1"/>
      <w:numFmt w:val="bullet"/>
      <w:lvlText w:val=""/>
      <w:lvlJc w:val="left"/>
      <w:pPr><w:tabs><w:tab w:val="num" w:pos="720"/></w:tabs><w:ind w:left="720" w:hanging="360"/></w:pPr>
      <w:rPr><w:rFonts w:ascii="Symbol" w:hAnsi="Symbol" w:hint="default"/></w:rPr>
    </w:lvl>
  </w:abstractNum>
  <w:num w:numId="1">
    <w:abstractNumId w:val="0"/>
    <w:lvlOverride w:ilvl="0"><w:lvl w:ilvl="0"><w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/></w:lvl></w:lvlOverride>
    <w:lvlOverride w:ilvl="1"><w:startOverride w:val="5"/></w:lvlOverride>
  </w:num>
  <w:numIdMacAtCleanup w:val="0"/>
</w:numbering>"#;

    #[test]
    fn test_parse_level_overrides() {
        let part = NumberingPart::from_xml(WORD_SAVED).unwrap();
        let inst = part.instances().next().unwrap();

        assert_eq!(inst.level_overrides.len(), 2);
        let redefined = &inst.level_overrides[0];
        assert_eq!(redefined.start, None);
        assert!(redefined.template.as_ref().unwrap().source.starts_with(r#"<w:lvl w:ilvl="0">"#));
        assert_eq!(inst.level_overrides[1].start, Some(5));
        assert_eq!(inst.level_overrides[1].template, None);
    }

    #[test]
    fn test_parse_keeps_unknown_level_children() {
        let part = NumberingPart::from_xml(WORD_SAVED).unwrap();
        let def = part.definition(0).unwrap();

        let names: Vec<_> = def.extras.iter().map(|it| it.name.as_str()).collect();
        assert_eq!(names, ["nsid", "tmpl"]);
        let level = &def.levels[0];
        let names: Vec<_> = level.extras.iter().map(|it| it.name.as_str()).collect();
        assert_eq!(names, ["pPr", "rPr"]);
        assert_eq!(level.indent, Some(Indent { left: 720, hanging: 360 }));
        assert_eq!(level.justification.as_deref(), Some("left"));
    }

    #[test]
    fn test_rewrite_keeps_word_content() {
        let part = NumberingPart::from_xml(WORD_SAVED).unwrap();
        let xml = part.to_xml();
        assert_eq!(NumberingPart::from_xml(&xml).unwrap(), part);

        insta::assert_snapshot!(xml, @r#"
        <?xml version="1.0" encoding="UTF-8" standalone="yes"?>
        <w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
          <w:abstractNum w:abstractNumId="0">
            <w:nsid w:val="1A2B3C4D"/>
            <w:multiLevelType w:val="hybridMultilevel"/>
            <w:tmpl w:val="04090001"/>
            <w:lvl w:ilvl="0">
              <w:start w:val="1"/>
              <w:numFmt w:val="bullet"/>
              <w:lvlText w:val=""/>
              <w:lvlJc w:val="left"/>
              <w:pPr><w:tabs><w:tab w:val="num" w:pos="720"/></w:tabs><w:ind w:left="720" w:hanging="360"/></w:pPr>
              <w:rPr><w:rFonts w:ascii="Symbol" w:hAnsi="Symbol" w:hint="default"/></w:rPr>
            </w:lvl>
          </w:abstractNum>
          <w:num w:numId="1">
            <w:abstractNumId w:val="0"/>
            <w:lvlOverride w:ilvl="0">
              <w:lvl w:ilvl="0"><w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/></w:lvl>
            </w:lvlOverride>
            <w:lvlOverride w:ilvl="1"><w:startOverride w:val="5"/></w:lvlOverride>
          </w:num>
          <w:numIdMacAtCleanup w:val="0"/>
        </w:numbering>
        "#);
    }

    #[test]
    fn test_rewrite_is_stable() {
        let part = NumberingPart::from_xml(EXISTING).unwrap();
        let reparsed = NumberingPart::from_xml(&part.to_xml()).unwrap();
        assert_eq!(part, reparsed);
    }

    #[test]
    fn test_reject_foreign_root() {
        let err = NumberingPart::from_xml("<styles/>").unwrap_err();
        assert_eq!(err.to_string(), "invalid numbering part: unexpected root element <styles>");
    }

    #[test]
    fn test_reject_num_without_definition() {
        let text = format!(r#"<w:numbering xmlns:w="{WML_NS}"><w:num w:numId="1"/></w:numbering>"#);
        assert!(NumberingPart::from_xml(&text).is_err());
    }

    #[test]
    fn test_write_escapes_names() {
        let part = NumberingPart {
            nodes: vec![NumberingNode::Abstract(AbstractNum {
                id: 0,
                name: Some("a\"b".into()),
                kind: MultiLevelKind::Single,
                extras: Vec::new(),
                levels: vec![Level::new(0, NumberFormat::Bullet, "<")],
            })],
            ..Default::default()
        };

        insta::assert_snapshot!(part.to_xml(), @r#"
        <?xml version="1.0" encoding="UTF-8" standalone="yes"?>
        <w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
          <w:abstractNum w:abstractNumId="0">
            <w:multiLevelType w:val="singleLevel"/>
            <w:name w:val="a&quot;b"/>
            <w:lvl w:ilvl="0">
              <w:numFmt w:val="bullet"/>
              <w:lvlText w:val="&lt;"/>
            </w:lvl>
          </w:abstractNum>
        </w:numbering>
        "#);
    }
}
