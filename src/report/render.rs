//! Plain-text report rendering for the terminal
use std::fmt::Write;

use super::icons::IconTable;
use crate::rule::DetectionResult;
use crate::summarizer::AnalysisText;

/// `frontend_frameworks` → `Frontend Frameworks`.
///
/// A letter is upper-cased when it starts a run of letters, other letters are lower-cased.
pub fn category_title(category: &str) -> String {
    let mut out = String::with_capacity(category.len());
    let mut prev_is_letter = false;
    for ch in category.replace('_', " ").chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}

/// Report renderer
pub struct ReportRenderer<'a> {
    icons: &'a IconTable,
}

impl<'a> ReportRenderer<'a> {
    pub fn new(icons: &'a IconTable) -> Self {
        Self { icons }
    }

    /// Technologies grouped under title-cased category headings
    pub fn render_detection(&self, url: &str, detection: &DetectionResult) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Detected technologies on {}", url);

        if detection.is_empty() {
            let _ = writeln!(out, "\nNo known technologies detected.");
            return out;
        }

        for (category, technologies) in detection.iter() {
            let _ = writeln!(out, "\n{}:", category_title(category));
            for tech in technologies {
                match self.icons.get(tech) {
                    Some(icon) => {
                        let _ = writeln!(out, "  - {}  [{}]", tech, icon);
                    }
                    None => {
                        let _ = writeln!(out, "  - {}", tech);
                    }
                }
            }
        }
        out
    }

    /// Analysis prose, paragraph by paragraph
    pub fn render_analysis(&self, analysis: &AnalysisText) -> String {
        let mut out = String::from("AI analysis\n");
        for paragraph in analysis.paragraphs() {
            let _ = write!(out, "\n{}\n", paragraph);
        }
        out
    }
}
