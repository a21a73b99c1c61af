//! Typed records and run results.
//!
//! Record field names on the wire match the data files the site templates
//! already read (`Title`, `Paper_Number`, …), so they are renamed explicitly
//! rather than derived from the Rust field names.

use crate::config::Collection;
use crate::error::SectionWarning;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Serialise integral numbers as JSON integers (`2024`, not `2024.0`).
fn serialize_number<S: Serializer>(value: &Option<f64>, s: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() < 9.0e15 => s.serialize_i64(*v as i64),
        Some(v) => s.serialize_f64(*v),
        None => s.serialize_none(),
    }
}

/// Format an optional number for display, dropping a zero fraction.
pub fn format_number(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() < 9.0e15 => format!("{}", v as i64),
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Authors")]
    pub authors: String,
    #[serde(rename = "Year", serialize_with = "serialize_number")]
    pub year: Option<f64>,
    #[serde(rename = "Journal")]
    pub journal: String,
    #[serde(rename = "Volume_Pages")]
    pub volume_pages: String,
    #[serde(rename = "DOI")]
    pub doi: String,
    #[serde(rename = "PDF_Link")]
    pub pdf_link: String,
    #[serde(rename = "Is_First_Author")]
    pub is_first_author: bool,
    #[serde(rename = "Featured_on_Cover")]
    pub featured_on_cover: bool,
    #[serde(rename = "Paper_Number", serialize_with = "serialize_number")]
    pub paper_number: Option<f64>,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Notes")]
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    #[serde(rename = "Headline")]
    pub headline: String,
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Year", serialize_with = "serialize_number")]
    pub year: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Role")]
    pub role: String,
    #[serde(rename = "Bio")]
    pub bio: String,
    #[serde(rename = "Start_Date")]
    pub start_date: String,
    #[serde(rename = "End_Date")]
    pub end_date: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "LinkedIn")]
    pub linkedin: String,
    #[serde(rename = "Google_Scholar")]
    pub google_scholar: String,
    #[serde(rename = "Personal_Site")]
    pub personal_site: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Honor {
    #[serde(rename = "Award")]
    pub award: String,
    /// Display date, `MM/YYYY`.
    #[serde(rename = "Date")]
    pub date: String,
    /// ISO date the display date was derived from; the sort key.
    #[serde(rename = "Date_raw")]
    pub date_raw: String,
    #[serde(rename = "Description")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(rename = "Degree")]
    pub degree: String,
    #[serde(rename = "Institution")]
    pub institution: String,
    #[serde(rename = "Years")]
    pub years: String,
    #[serde(rename = "Advisor")]
    pub advisor: String,
    #[serde(rename = "Order", serialize_with = "serialize_number")]
    pub order: Option<f64>,
}

/// A titled sub-unit of a project body. All four fields are always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtopic {
    pub title: String,
    pub image: String,
    pub caption: String,
    pub link: String,
}

impl Subtopic {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "Project")]
    pub project: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Order", serialize_with = "serialize_number")]
    pub order: Option<f64>,
    #[serde(rename = "Slug")]
    pub slug: String,
    #[serde(rename = "Hero_Image")]
    pub hero_image: String,
    #[serde(rename = "Full_Description")]
    pub full_description: String,
    #[serde(rename = "Media_Highlights")]
    pub media_highlights: String,
    #[serde(rename = "Subtopics")]
    pub subtopics: Vec<Subtopic>,
}

/// A free-form section that only appears in the typeset CV.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CvSection {
    #[serde(rename = "Name")]
    pub name: String,
    /// Layout key, matched against [`crate::config::CvSectionSpec::key`].
    #[serde(rename = "Section")]
    pub section: String,
    /// Reconstructed body text.
    #[serde(rename = "Content")]
    pub content: String,
    #[serde(rename = "Order", serialize_with = "serialize_number")]
    pub order: Option<f64>,
}

/// Every normalised, sorted record of a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    pub publications: Vec<Publication>,
    pub news: Vec<NewsItem>,
    pub team: Vec<TeamMember>,
    pub honors: Vec<Honor>,
    pub education: Vec<EducationEntry>,
    pub projects: Vec<Project>,
    pub cv_sections: Vec<CvSection>,
}

impl Catalog {
    pub fn total_records(&self) -> usize {
        self.publications.len()
            + self.news.len()
            + self.team.len()
            + self.honors.len()
            + self.education.len()
            + self.projects.len()
            + self.cv_sections.len()
    }
}

/// Summary statistics for a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncStats {
    /// Records written per collection.
    pub records: BTreeMap<Collection, usize>,
    pub files_written: Vec<PathBuf>,
    pub cv_path: Option<PathBuf>,
    pub warnings: Vec<SectionWarning>,
    pub total_duration_ms: u64,
}

/// The full result of a run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutput {
    pub catalog: Catalog,
    pub cv_document: String,
    pub stats: SyncStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numbers_serialise_as_integers() {
        let p = Publication {
            year: Some(2024.0),
            paper_number: None,
            ..Default::default()
        };
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["Year"], serde_json::json!(2024));
        assert!(v["Paper_Number"].is_null());
        assert_eq!(v["Is_First_Author"], serde_json::json!(false));
    }

    #[test]
    fn fractional_numbers_keep_their_fraction() {
        let e = EducationEntry {
            order: Some(1.5),
            ..Default::default()
        };
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v["Order"], serde_json::json!(1.5));
    }

    #[test]
    fn format_number_variants() {
        assert_eq!(format_number(Some(2021.0)), "2021");
        assert_eq!(format_number(Some(2.5)), "2.5");
        assert_eq!(format_number(None), "");
    }

    #[test]
    fn subtopic_always_has_four_fields() {
        let v = serde_json::to_value(Subtopic::titled("T")).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), 4);
        assert_eq!(obj["image"], "");
        assert_eq!(obj["link"], "");
    }
}
