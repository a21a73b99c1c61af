//! Typed extraction from a page's property bag.
//!
//! Every extractor is total: a missing field, a `null` value, or a field of
//! an unexpected type yields the documented default (`""`, `None`, `false`)
//! instead of an error. Databases are edited by hand and rows are often only
//! partially filled in.

use crate::model::{Page, PropertyValue, RichText};
use std::collections::HashMap;

/// Read-only view over one page's properties.
#[derive(Debug, Clone, Copy)]
pub struct PropertyBag<'a> {
    props: &'a HashMap<String, PropertyValue>,
}

impl<'a> PropertyBag<'a> {
    pub fn new(props: &'a HashMap<String, PropertyValue>) -> Self {
        Self { props }
    }

    fn get(&self, field: &str) -> Option<&'a PropertyValue> {
        self.props.get(field)
    }

    /// Concatenated plain text of a title or rich-text property. Default `""`.
    pub fn text(&self, field: &str) -> String {
        match self.get(field) {
            Some(PropertyValue::Title { title: runs })
            | Some(PropertyValue::RichText { rich_text: runs }) => concat_plain(runs),
            _ => String::new(),
        }
    }

    /// Number value. Default `None`.
    pub fn number(&self, field: &str) -> Option<f64> {
        match self.get(field) {
            Some(PropertyValue::Number { number }) => *number,
            _ => None,
        }
    }

    /// Label of the selected option. Default `""`.
    pub fn select(&self, field: &str) -> String {
        match self.get(field) {
            Some(PropertyValue::Select {
                select: Some(option),
            }) => option.name.clone(),
            _ => String::new(),
        }
    }

    /// Checkbox state. Default `false`.
    pub fn checkbox(&self, field: &str) -> bool {
        matches!(
            self.get(field),
            Some(PropertyValue::Checkbox { checkbox: true })
        )
    }

    /// URL value. Default `""`.
    pub fn url(&self, field: &str) -> String {
        match self.get(field) {
            Some(PropertyValue::Url { url: Some(u) }) => u.clone(),
            _ => String::new(),
        }
    }

    /// Email value. Default `""`.
    pub fn email(&self, field: &str) -> String {
        match self.get(field) {
            Some(PropertyValue::Email { email: Some(e) }) => e.clone(),
            _ => String::new(),
        }
    }

    /// Start date as `YYYY-MM-DD`. Default `""`.
    ///
    /// Date-time values are cut down to their date part.
    pub fn date(&self, field: &str) -> String {
        match self.get(field) {
            Some(PropertyValue::Date { date: Some(d) }) => d
                .start
                .as_deref()
                .and_then(|s| s.split('T').next())
                .unwrap_or_default()
                .to_string(),
            _ => String::new(),
        }
    }
}

impl Page {
    pub fn bag(&self) -> PropertyBag<'_> {
        PropertyBag::new(&self.properties)
    }
}

fn concat_plain(runs: &[RichText]) -> String {
    runs.iter().map(|r| r.plain_text.as_str()).collect()
}
