//! Scan surface of one fetched page

use super::html_extractor::{ExtractedTags, HtmlExtractor};

/// Lower-cased body plus its serialized script/link/meta tags.
/// Lives only for the duration of one detection.
#[derive(Debug, Clone)]
pub struct PageContent {
    body: String,
    tags: ExtractedTags,
}

impl PageContent {
    /// Lower-case the raw body and pull out its tags
    pub fn parse(raw_html: &str) -> Self {
        let body = raw_html.to_lowercase();
        let mut tags = HtmlExtractor::new().extract(&body);

        // Entity decoding can reintroduce upper-case characters
        for tag in tags
            .scripts
            .iter_mut()
            .chain(tags.links.iter_mut())
            .chain(tags.metas.iter_mut())
        {
            if tag.chars().any(char::is_uppercase) {
                *tag = tag.to_lowercase();
            }
        }

        Self { body, tags }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn scripts(&self) -> &[String] {
        &self.tags.scripts
    }

    pub fn links(&self) -> &[String] {
        &self.tags.links
    }

    pub fn metas(&self) -> &[String] {
        &self.tags.metas
    }

    /// Every serialized tag, scripts first
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags
            .scripts
            .iter()
            .chain(&self.tags.links)
            .chain(&self.tags.metas)
            .map(String::as_str)
    }

    /// Substring test against the tags, then the whole body.
    /// `keyword` must already be lower-case.
    pub fn contains(&self, keyword: &str) -> bool {
        self.tags().any(|tag| tag.contains(keyword)) || self.body.contains(keyword)
    }
}
