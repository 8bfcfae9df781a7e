//! The event stream emitted by a depth-first HTML walker.

use serde::{Deserialize, Serialize};

use crate::style::Length;

/// An event reported while visiting lists and headings in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListEvent {
    /// An `<ol>` or `<ul>` was entered.
    Begin {
        /// The resolved `list-style-type` of the list.
        #[serde(default)]
        list_style_type: Option<String>,
        /// Whether the list is an `<ol>`.
        #[serde(default)]
        ordered: bool,
        /// The classes of the list element.
        #[serde(default)]
        classes: Vec<String>,
    },
    /// The innermost list was left.
    End {
        /// Whether the nesting context is dropped.
        #[serde(default = "pop_by_default")]
        pop_context: bool,
    },
    /// The nesting depth is reset.
    SetDepth {
        /// The new depth.
        depth: usize,
    },
    /// An `<li>` was entered.
    Item {
        /// The resolved `margin-left` of the item.
        #[serde(default)]
        margin_left: Option<Length>,
    },
    /// A numbered heading was rendered.
    Heading {
        /// The heading level, starting at 1.
        level: usize,
    },
}

fn pop_by_default() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let events: Vec<ListEvent> = serde_json::from_str(
            r#"[
                {"begin": {"ordered": true}},
                {"item": {"margin_left": {"value": 12.0, "unit": "px"}}},
                {"end": {}},
                {"heading": {"level": 2}}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            events,
            vec![
                ListEvent::Begin {
                    list_style_type: None,
                    ordered: true,
                    classes: vec![],
                },
                ListEvent::Item {
                    margin_left: Some(Length::px(12.)),
                },
                ListEvent::End { pop_context: true },
                ListEvent::Heading { level: 2 },
            ]
        );
    }
}
