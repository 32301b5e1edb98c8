//! Extraction module: turns a fetched page into its scan surface
pub mod html_extractor;
pub mod page_content;

pub use self::html_extractor::{ExtractedTags, HtmlExtractor};
pub use self::page_content::PageContent;
