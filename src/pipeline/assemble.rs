//! Record ordering and CV document composition.
//!
//! ## Document layout
//!
//! ```text
//! preamble
//! header (name, header lines, scholar link)
//! Education                 tabular
//! ── sections placed BeforeHonors
//! Honors & Awards           itemize
//! ── sections placed BeforePublications
//! Selected Publications     summary line + enumerate
//! Other Publications        enumerate
//! ── sections placed AfterPublications
//! ```
//!
//! Free-form sections appear in the order the [`CvProfile`] lists them. A
//! section with no record, or with an empty body, is left out and reported as
//! a [`SectionWarning`].

use crate::config::{CvProfile, CvSectionSpec, Placement};
use crate::error::SectionWarning;
use crate::output::{format_number, Catalog, CvSection, Publication};
use crate::pipeline::cv::render_section;
use crate::pipeline::escape::escape_latex;
use crate::pipeline::tidy::finish_document;
use chrono::NaiveDate;
use std::cmp::Ordering;
use tracing::warn;

// ── Sorting ──────────────────────────────────────────────────────────────────

fn by_paper_number(a: &Publication, b: &Publication) -> Ordering {
    match (a.paper_number, b.paper_number) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Descending by paper number; records without one go last.
pub fn sort_publications(pubs: &mut [Publication]) {
    pubs.sort_by(by_paper_number);
}

/// Descending by ISO date string; empty dates sort last.
pub fn sort_by_date_desc<T>(items: &mut [T], date: impl Fn(&T) -> &str) {
    items.sort_by(|a, b| date(b).cmp(date(a)));
}

/// Ascending by order field; a missing order counts as 0.
pub fn sort_by_order<T>(items: &mut [T], order: impl Fn(&T) -> Option<f64>) {
    items.sort_by(|a, b| order(a).unwrap_or(0.0).total_cmp(&order(b).unwrap_or(0.0)));
}

// ── Document ─────────────────────────────────────────────────────────────────

const PREAMBLE: &[&str] = &[
    r"\documentclass[11pt,a4paper]{article}",
    r"\usepackage[margin=0.75in]{geometry}",
    r"\usepackage{enumitem}",
    r"\usepackage{hyperref}",
    r"\usepackage[T1]{fontenc}",
    r"\usepackage{charter}",
    r"\usepackage{titlesec}",
    r"\usepackage{array}",
    r"\titleformat{\section}{\large\bfseries}{}{0em}{}[\titlerule]",
    r"\titlespacing{\section}{0pt}{10pt}{4pt}",
    r"\setlength{\parindent}{0pt}",
    r"\setlength{\parskip}{0pt}",
    r"\begin{document}",
];

const EDUCATION_TABLE: &str =
    r"\begin{tabular}{@{} >{\bfseries}p{2.2cm} p{\dimexpr\textwidth-2.5cm\relax} @{}}";
const HONORS_LIST: &str = r"\begin{itemize}[leftmargin=*, itemsep=1pt, parsep=0pt, topsep=2pt]";
const PUBLICATION_LIST: &str =
    r"\begin{enumerate}[leftmargin=*, itemsep=2pt, parsep=0pt, topsep=2pt]";

/// The category value that puts a publication in the selected list.
pub const SELECTED_CATEGORY: &str = "Selected";

/// A composed CV and the content anomalies met while building it.
#[derive(Debug, Clone, Default)]
pub struct CvDocument {
    pub text: String,
    pub warnings: Vec<SectionWarning>,
}

/// Compose the CV from a sorted catalog.
///
/// `generated_on` supplies the month printed in the publication summary.
pub fn render_cv(catalog: &Catalog, profile: &CvProfile, generated_on: NaiveDate) -> CvDocument {
    let mut doc = DocumentWriter {
        lines: PREAMBLE.iter().map(|l| l.to_string()).collect(),
        warnings: Vec::new(),
    };
    doc.blank();

    doc.header(profile);
    doc.education(catalog);
    doc.free_sections(catalog, profile, Placement::BeforeHonors);
    doc.honors(catalog);
    doc.free_sections(catalog, profile, Placement::BeforePublications);
    doc.publications(catalog, profile, generated_on);
    doc.free_sections(catalog, profile, Placement::AfterPublications);
    doc.push(r"\end{document}");

    CvDocument {
        text: finish_document(&doc.lines.join("\n")),
        warnings: doc.warnings,
    }
}

struct DocumentWriter {
    lines: Vec<String>,
    warnings: Vec<SectionWarning>,
}

impl DocumentWriter {
    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn header(&mut self, profile: &CvProfile) {
        if !profile.name.trim().is_empty() {
            self.push(format!(
                "{{\\LARGE \\textbf{{{}}}}} \\\\[4pt]",
                escape_latex(&profile.name)
            ));
        }
        for line in &profile.header_lines {
            self.push(format!("{} \\\\", escape_latex(line)));
        }
        if let Some(url) = profile.scholar_url.as_deref().filter(|u| !u.is_empty()) {
            self.push(format!("\\href{{{}}}{{Google Scholar}}", escape_url(url)));
        }
        self.blank();
    }

    fn education(&mut self, catalog: &Catalog) {
        self.push(r"\section{Education}");
        self.push(EDUCATION_TABLE);
        let count = catalog.education.len();
        for (idx, edu) in catalog.education.iter().enumerate() {
            self.push(format!(
                "{} & {} \\\\",
                escape_latex(&edu.years),
                escape_latex(&edu.degree)
            ));
            self.push(format!(" & {} \\\\", escape_latex(&edu.institution)));
            if !edu.advisor.is_empty() {
                self.push(format!(" & \\textit{{{}}} \\\\", escape_latex(&edu.advisor)));
            }
            if idx + 1 < count {
                self.push(r" & \\[4pt]");
            }
        }
        self.push(r"\end{tabular}");
        self.blank();
    }

    fn honors(&mut self, catalog: &Catalog) {
        if catalog.honors.is_empty() {
            return;
        }
        self.push(r"\section{Honors \& Awards}");
        self.push(HONORS_LIST);
        for honor in &catalog.honors {
            self.push(format!(
                "  \\item {}. {}",
                escape_latex(&honor.date),
                escape_latex(&honor.award)
            ));
        }
        self.push(r"\end{itemize}");
        self.blank();
    }

    fn free_sections(&mut self, catalog: &Catalog, profile: &CvProfile, placement: Placement) {
        for layout in profile.sections.iter().filter(|s| s.placement == placement) {
            self.free_section(&catalog.cv_sections, layout, &profile.emphasis);
        }
    }

    fn free_section(&mut self, records: &[CvSection], layout: &CvSectionSpec, emphasis: &[String]) {
        let Some(record) = records.iter().find(|r| r.section == layout.key) else {
            warn!("No record for CV section '{}'; omitting it", layout.key);
            self.warnings.push(SectionWarning::MissingSection {
                section: layout.key.clone(),
            });
            return;
        };

        let rendered = render_section(&record.content, emphasis);
        if rendered.is_empty() {
            warn!("CV section '{}' has an empty body; omitting it", layout.key);
            self.warnings.push(SectionWarning::EmptySection {
                section: layout.key.clone(),
            });
            return;
        }

        self.push(format!("\\section{{{}}}", escape_latex(&layout.heading)));
        self.lines.extend(rendered.lines);
        self.blank();
    }

    fn publications(&mut self, catalog: &Catalog, profile: &CvProfile, generated_on: NaiveDate) {
        let pubs = &catalog.publications;
        let highlight = profile.highlight_author.as_deref();

        let mut selected: Vec<&Publication> = Vec::new();
        let mut other: Vec<&Publication> = Vec::new();
        for p in pubs {
            if p.category == SELECTED_CATEGORY {
                selected.push(p);
            } else {
                other.push(p);
            }
        }
        selected.sort_by(|a, b| by_paper_number(a, b));
        other.sort_by(|a, b| by_paper_number(a, b));

        let first_author = pubs.iter().filter(|p| p.is_first_author).count();
        let metrics = profile
            .citation_metrics
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .map(|m| format!("{m}, "))
            .unwrap_or_default();

        self.push(r"\section{Selected Publications}");
        self.push(format!(
            "({} papers with {} as first/co-first author, {}updated {})",
            pubs.len(),
            first_author,
            metrics,
            generated_on.format("%m/%Y")
        ));
        self.push(r"$\dagger$ indicates equal contributions");
        self.blank();
        if !selected.is_empty() {
            self.publication_list(&selected, highlight);
        }

        if !other.is_empty() {
            self.push(r"\section{Other Publications}");
            self.publication_list(&other, highlight);
        }
    }

    fn publication_list(&mut self, pubs: &[&Publication], highlight: Option<&str>) {
        self.push(PUBLICATION_LIST);
        for p in pubs {
            self.push(format!("  \\item {}", format_publication(p, highlight)));
        }
        self.push(r"\end{enumerate}");
        self.blank();
    }
}

/// One publication entry:
/// `Authors (Year). Title. \textbf{\textit{Journal}}, Vol. Notes`.
pub fn format_publication(p: &Publication, highlight: Option<&str>) -> String {
    let mut authors = escape_latex(&p.authors);
    if let Some(name) = highlight.filter(|n| !n.is_empty()) {
        let escaped = escape_latex(name);
        authors = authors.replace(&escaped, &format!("\\textbf{{{escaped}}}"));
    }
    let authors = authors.replace('†', r"$\dagger$");

    let mut entry = format!(
        "{} ({}). {}. \\textbf{{\\textit{{{}}}}}",
        authors,
        format_number(p.year),
        escape_latex(&p.title),
        escape_latex(&p.journal)
    );
    if !p.volume_pages.is_empty() {
        entry.push_str(", ");
        entry.push_str(&escape_latex(&p.volume_pages));
    }
    entry.push('.');
    if !p.notes.is_empty() {
        let notes = escape_latex(&p.notes).replace(
            "Featured on Journal Cover",
            r"\textbf{Featured on Journal Cover}",
        );
        entry.push(' ');
        entry.push_str(&notes);
    }
    entry
}

/// `%` and `#` would end or break the `\href` argument.
fn escape_url(url: &str) -> String {
    url.replace('%', r"\%").replace('#', r"\#")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{EducationEntry, Honor, NewsItem};

    fn pub_numbered(n: Option<f64>) -> Publication {
        Publication {
            paper_number: n,
            ..Default::default()
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()
    }

    fn profile() -> CvProfile {
        CvProfile {
            name: "Ada Lovelace".into(),
            header_lines: vec!["Analytical Engines & Co.".into()],
            scholar_url: Some("https://scholar.example/citations?user=X".into()),
            highlight_author: Some("Lovelace, A.".into()),
            citation_metrics: Some("$>$100 citations".into()),
            ..CvProfile::default()
        }
    }

    fn section(key: &str, content: &str, order: f64) -> CvSection {
        CvSection {
            name: key.into(),
            section: key.into(),
            content: content.into(),
            order: Some(order),
        }
    }

    #[test]
    fn publications_sort_descending_missing_last() {
        let mut pubs: Vec<_> = [Some(5.0), None, Some(10.0), Some(3.0)]
            .into_iter()
            .map(pub_numbered)
            .collect();
        sort_publications(&mut pubs);
        let order: Vec<_> = pubs.iter().map(|p| p.paper_number).collect();
        assert_eq!(order, vec![Some(10.0), Some(5.0), Some(3.0), None]);
    }

    #[test]
    fn order_sort_is_stable_and_treats_missing_as_zero() {
        let mut entries = vec![
            EducationEntry {
                degree: "PhD".into(),
                order: Some(2.0),
                ..Default::default()
            },
            EducationEntry {
                degree: "none-a".into(),
                order: None,
                ..Default::default()
            },
            EducationEntry {
                degree: "BSc".into(),
                order: Some(1.0),
                ..Default::default()
            },
            EducationEntry {
                degree: "none-b".into(),
                order: None,
                ..Default::default()
            },
        ];
        sort_by_order(&mut entries, |e| e.order);
        let degrees: Vec<_> = entries.iter().map(|e| e.degree.as_str()).collect();
        assert_eq!(degrees, vec!["none-a", "none-b", "BSc", "PhD"]);
    }

    #[test]
    fn dates_sort_descending_with_empty_last() {
        let mut news = vec![
            NewsItem {
                date: "2023-01-01".into(),
                ..Default::default()
            },
            NewsItem::default(),
            NewsItem {
                date: "2025-06-30".into(),
                ..Default::default()
            },
        ];
        sort_by_date_desc(&mut news, |n| n.date.as_str());
        let dates: Vec<_> = news.iter().map(|n| n.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-06-30", "2023-01-01", ""]);
    }

    #[test]
    fn publication_entry_format() {
        let p = Publication {
            authors: "Smith, B.†, Lovelace, A.†".into(),
            year: Some(2024.0),
            title: "Notes on R&D".into(),
            journal: "Nature Electronics".into(),
            volume_pages: "7, 1-9".into(),
            notes: "Featured on Journal Cover".into(),
            ..Default::default()
        };
        assert_eq!(
            format_publication(&p, Some("Lovelace, A.")),
            r"Smith, B.$\dagger$, \textbf{Lovelace, A.}$\dagger$ (2024). Notes on R\&D. \textbf{\textit{Nature Electronics}}, 7, 1-9. \textbf{Featured on Journal Cover}"
        );
    }

    #[test]
    fn publication_entry_without_volume_or_notes() {
        let p = Publication {
            authors: "Doe, J.".into(),
            year: Some(2020.0),
            title: "T".into(),
            journal: "J".into(),
            ..Default::default()
        };
        assert_eq!(
            format_publication(&p, None),
            r"Doe, J. (2020). T. \textbf{\textit{J}}."
        );
    }

    #[test]
    fn document_follows_fixed_section_order() {
        let catalog = Catalog {
            education: vec![
                EducationEntry {
                    degree: "PhD".into(),
                    institution: "MIT".into(),
                    years: "2015–2020".into(),
                    advisor: "Advisor: Prof. X".into(),
                    order: Some(1.0),
                },
                EducationEntry {
                    degree: "BSc".into(),
                    institution: "KAIST".into(),
                    years: "2011–2015".into(),
                    ..Default::default()
                },
            ],
            honors: vec![Honor {
                award: "Young Investigator".into(),
                date: "05/2023".into(),
                date_raw: "2023-05-01".into(),
                ..Default::default()
            }],
            publications: vec![
                Publication {
                    title: "Selected one".into(),
                    category: "Selected".into(),
                    is_first_author: true,
                    paper_number: Some(2.0),
                    ..Default::default()
                },
                Publication {
                    title: "Other one".into(),
                    category: "Other".into(),
                    paper_number: Some(1.0),
                    ..Default::default()
                },
            ],
            cv_sections: vec![
                section("Research Experience", "**2020–** Professor\n- Lab", 1.0),
                section("Patents", "- US 1", 2.0),
                section("Academic Service", "   ", 3.0),
            ],
            ..Default::default()
        };

        let doc = render_cv(&catalog, &profile(), date());
        let text = &doc.text;

        let pos = |needle: &str| {
            text.find(needle)
                .unwrap_or_else(|| panic!("missing {needle:?} in:\n{text}"))
        };
        let order = [
            r"\begin{document}",
            r"{\LARGE \textbf{Ada Lovelace}} \\[4pt]",
            r"Analytical Engines \& Co. \\",
            r"\href{https://scholar.example/citations?user=X}{Google Scholar}",
            r"\section{Education}",
            r"2015–2020 & PhD \\",
            r" & \textit{Advisor: Prof. X} \\",
            r" & \\[4pt]",
            r"2011–2015 & BSc \\",
            r"\section{Research \& Work Experience}",
            r"\section{Honors \& Awards}",
            r"  \item 05/2023. Young Investigator",
            r"\section{Patents}",
            r"\section{Selected Publications}",
            r"(2 papers with 1 as first/co-first author, $>$100 citations, updated 03/2026)",
            r"\section{Other Publications}",
            r"\end{document}",
        ];
        for pair in order.windows(2) {
            assert!(pos(pair[0]) < pos(pair[1]), "{:?} before {:?}", pair[0], pair[1]);
        }

        assert!(text.ends_with("\\end{document}\n"));
        assert!(!text.ends_with("\n\n"));
        assert!(!text.contains(r"\section{Academic Service}"));

        assert!(doc.warnings.contains(&SectionWarning::EmptySection {
            section: "Academic Service".into()
        }));
        assert!(doc.warnings.contains(&SectionWarning::MissingSection {
            section: "Teaching & Mentoring".into()
        }));
        assert!(!doc
            .warnings
            .iter()
            .any(|w| matches!(w, SectionWarning::MissingSection { section } if section == "Patents")));
    }

    #[test]
    fn after_publications_placement() {
        let mut profile = profile();
        profile.sections = vec![CvSectionSpec::new(
            "Outreach",
            "Outreach",
            Placement::AfterPublications,
        )];
        let catalog = Catalog {
            publications: vec![Publication {
                category: "Other".into(),
                ..Default::default()
            }],
            cv_sections: vec![section("Outreach", "School visits", 1.0)],
            ..Default::default()
        };
        let doc = render_cv(&catalog, &profile, date());
        let other = doc.text.find(r"\section{Other Publications}").unwrap();
        let outreach = doc.text.find(r"\section{Outreach}").unwrap();
        assert!(other < outreach);
        assert!(doc.text.contains(r"School visits \\"));
        assert!(doc.warnings.is_empty());
    }

    #[test]
    fn empty_lists_emit_no_environments() {
        let mut profile = profile();
        profile.sections.clear();
        let doc = render_cv(&Catalog::default(), &profile, date());
        assert!(!doc.text.contains(r"\begin{enumerate}"));
        assert!(!doc.text.contains(r"\begin{itemize}"));
        assert!(!doc.text.contains(r"\section{Honors"));
        assert!(doc.text.contains(
            r"(0 papers with 0 as first/co-first author, $>$100 citations, updated 03/2026)"
        ));
    }
}
