//! Per-collection record normalisation.
//!
//! Each function maps one raw page to one typed record through a fixed table
//! of property names. Property names are the column names in the workspace
//! (`Volume Pages`, `Is First Author`); the record field names are the ones
//! the site templates read (`Volume_Pages`, `Is_First_Author`).
//!
//! Normalisation never fails. A missing or mistyped column yields the
//! extractor's default.

use crate::model::Page;
use crate::output::{CvSection, EducationEntry, Honor, NewsItem, Project, Publication, TeamMember};
use crate::pipeline::properties::PropertyBag;
use crate::pipeline::subtopics::extract_subtopics;
use crate::pipeline::tidy::tidy_body;
use chrono::NaiveDate;

pub fn publication(page: &Page) -> Publication {
    let p = page.bag();
    Publication {
        title: p.text("Title"),
        authors: p.text("Authors"),
        year: p.number("Year"),
        journal: p.select("Journal"),
        volume_pages: p.text("Volume Pages"),
        doi: p.url("DOI"),
        pdf_link: p.url("PDF Link"),
        is_first_author: p.checkbox("Is First Author"),
        featured_on_cover: p.checkbox("Featured on Cover"),
        paper_number: p.number("Paper Number"),
        category: p.select("Category"),
        notes: p.text("Notes"),
    }
}

pub fn news_item(page: &Page) -> NewsItem {
    let p = page.bag();
    NewsItem {
        headline: p.text("Headline"),
        source: p.text("Source"),
        date: p.date("Date"),
        url: p.url("URL"),
        kind: p.select("Type"),
        year: p.number("Year"),
    }
}

pub fn team_member(page: &Page) -> TeamMember {
    let p = page.bag();
    TeamMember {
        name: p.text("Name"),
        role: p.select("Role"),
        bio: p.text("Bio"),
        start_date: p.date("Start Date"),
        end_date: p.date("End Date"),
        status: p.select("Status"),
        email: p.email("Email"),
        linkedin: p.url("LinkedIn"),
        google_scholar: p.url("Google Scholar"),
        personal_site: p.url("Personal Site"),
    }
}

pub fn honor(page: &Page) -> Honor {
    let p = page.bag();
    let date_raw = p.date("Date");
    Honor {
        award: p.text("Award"),
        date: display_month(&date_raw),
        date_raw,
        description: p.text("Description"),
    }
}

pub fn education_entry(page: &Page) -> EducationEntry {
    let p = page.bag();
    EducationEntry {
        degree: p.text("Degree"),
        institution: p.text("Institution"),
        years: p.text("Years"),
        advisor: p.text("Advisor"),
        order: p.number("Order"),
    }
}

/// Normalise a project. `block_text` is the flattened page body; when it is
/// blank the flat `Body` column is parsed instead.
pub fn project(page: &Page, block_text: &str) -> Project {
    let p = page.bag();
    let body = body_or_fallback(block_text, &p, "Body");
    let parsed = extract_subtopics(&body);
    Project {
        project: p.text("Project"),
        description: p.text("Description"),
        category: p.select("Category"),
        order: p.number("Order"),
        slug: p.text("Slug"),
        hero_image: p.text("Hero_Image"),
        full_description: parsed.intro,
        media_highlights: parsed.media_highlights,
        subtopics: parsed.subtopics,
    }
}

/// Normalise a CV-only section, falling back to the `Content` column.
pub fn cv_section(page: &Page, block_text: &str) -> CvSection {
    let p = page.bag();
    CvSection {
        name: p.text("Name"),
        section: p.select("Section"),
        content: body_or_fallback(block_text, &p, "Content"),
        order: p.number("Order"),
    }
}

fn body_or_fallback(block_text: &str, bag: &PropertyBag<'_>, field: &str) -> String {
    if block_text.trim().is_empty() {
        tidy_body(&bag.text(field))
    } else {
        tidy_body(block_text)
    }
}

/// `2023-05-17` → `05/2023`. Anything unparsable passes through unchanged.
fn display_month(iso: &str) -> String {
    match NaiveDate::parse_from_str(iso, "%Y-%m-%d") {
        Ok(date) => date.format("%m/%Y").to_string(),
        Err(_) => iso.to_string(),
    }
}
