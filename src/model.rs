//! Wire types for the subset of the Notion API this crate consumes.
//!
//! Only the fields the pipeline reads are modelled; everything else in the
//! JSON (ids of rich-text runs, colours, user objects, …) is ignored by serde.
//! Property and block variants the pipeline does not understand deserialise
//! into an `Unsupported` / `Other` catch-all instead of failing, so a new
//! column type added in the workspace never breaks a sync run.

use serde::Deserialize;
use std::collections::HashMap;

/// One page of a cursor-paginated list response.
#[derive(Debug, Clone, Deserialize)]
pub struct Paginated<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// A database row: its id and its property bag.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
}

/// A type-tagged property value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title {
        #[serde(default)]
        title: Vec<RichText>,
    },
    RichText {
        #[serde(default)]
        rich_text: Vec<RichText>,
    },
    Number {
        #[serde(default)]
        number: Option<f64>,
    },
    Select {
        #[serde(default)]
        select: Option<SelectOption>,
    },
    Checkbox {
        #[serde(default)]
        checkbox: bool,
    },
    Url {
        #[serde(default)]
        url: Option<String>,
    },
    Email {
        #[serde(default)]
        email: Option<String>,
    },
    Date {
        #[serde(default)]
        date: Option<DateValue>,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SelectOption {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DateValue {
    #[serde(default)]
    pub start: Option<String>,
}

/// A run of text with its annotations.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,
    #[serde(default)]
    pub annotations: Annotations,
}

impl RichText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            plain_text: text.into(),
            annotations: Annotations::default(),
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            plain_text: text.into(),
            annotations: Annotations { bold: true },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Annotations {
    #[serde(default)]
    pub bold: bool,
}

/// Text payload shared by every text-bearing block type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
}

/// A content block from a page body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum Block {
    #[serde(rename = "paragraph")]
    Paragraph { paragraph: TextBlock },
    #[serde(rename = "heading_1")]
    Heading1 { heading_1: TextBlock },
    #[serde(rename = "heading_2")]
    Heading2 { heading_2: TextBlock },
    #[serde(rename = "heading_3")]
    Heading3 { heading_3: TextBlock },
    #[serde(rename = "bulleted_list_item")]
    BulletedListItem { bulleted_list_item: TextBlock },
    #[serde(rename = "numbered_list_item")]
    NumberedListItem { numbered_list_item: TextBlock },
    /// Dividers, images, toggles, callouts, …
    #[serde(other)]
    Other,
}

impl Block {
    pub fn paragraph(runs: Vec<RichText>) -> Self {
        Block::Paragraph {
            paragraph: TextBlock { rich_text: runs },
        }
    }

    pub fn heading(level: u8, runs: Vec<RichText>) -> Self {
        let text = TextBlock { rich_text: runs };
        match level {
            1 => Block::Heading1 { heading_1: text },
            2 => Block::Heading2 { heading_2: text },
            _ => Block::Heading3 { heading_3: text },
        }
    }

    pub fn bullet(runs: Vec<RichText>) -> Self {
        Block::BulletedListItem {
            bulleted_list_item: TextBlock { rich_text: runs },
        }
    }

    pub fn numbered(runs: Vec<RichText>) -> Self {
        Block::NumberedListItem {
            numbered_list_item: TextBlock { rich_text: runs },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_with_mixed_properties_deserialises() {
        let page: Page = serde_json::from_value(json!({
            "object": "page",
            "id": "abc",
            "properties": {
                "Title": {"id": "title", "type": "title", "title": [{"plain_text": "Hello"}]},
                "Year": {"id": "x1", "type": "number", "number": 2024},
                "Journal": {"id": "x2", "type": "select", "select": null},
                "People": {"id": "x3", "type": "people", "people": []}
            }
        }))
        .unwrap();

        assert_eq!(page.id, "abc");
        assert_eq!(
            page.properties["Year"],
            PropertyValue::Number {
                number: Some(2024.0)
            }
        );
        assert_eq!(
            page.properties["Journal"],
            PropertyValue::Select { select: None }
        );
        assert_eq!(page.properties["People"], PropertyValue::Unsupported);
    }

    #[test]
    fn unknown_block_type_is_other() {
        let blocks: Vec<Block> = serde_json::from_value(json!([
            {"type": "divider", "divider": {}},
            {"type": "heading_3", "heading_3": {"rich_text": [
                {"plain_text": "Topic", "annotations": {"bold": true, "italic": false}}
            ]}}
        ]))
        .unwrap();

        assert_eq!(blocks[0], Block::Other);
        assert_eq!(blocks[1], Block::heading(3, vec![RichText::bold("Topic")]));
    }

    #[test]
    fn paginated_defaults() {
        let page: Paginated<Page> = serde_json::from_value(json!({"results": []})).unwrap();
        assert!(!page.has_more);
        assert!(page.next_cursor.is_none());
    }
}
