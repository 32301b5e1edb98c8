//! HTML tag extractor
//! Collects script, link and meta tags from a page, each serialized back to text

use std::cell::RefCell;

use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use markup5ever::interface::Attribute;
use tendril::StrTendril;

/// Serialized tags found in one document
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractedTags {
    /// `<script ...>inline code</script>`
    pub scripts: Vec<String>,
    /// `<link ...>`
    pub links: Vec<String>,
    /// `<meta ...>`
    pub metas: Vec<String>,
}

#[derive(Debug, Default, Clone)]
pub struct HtmlExtractor {
    tags: RefCell<ExtractedTags>,
    // Script whose end tag has not been seen yet
    open_script: RefCell<Option<String>>,
}

impl TokenSink for HtmlExtractor {
    type Handle = ();

    fn process_token(&self, token: Token, _line: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(Tag {
                kind: TagKind::StartTag,
                name,
                attrs,
                ..
            }) => match name.as_ref() {
                "script" => {
                    self.close_script();
                    *self.open_script.borrow_mut() = Some(serialize_start_tag("script", &attrs));
                    // Script bodies are raw text, not markup
                    return TokenSinkResult::RawData(RawKind::ScriptData);
                }
                "link" => self.tags.borrow_mut().links.push(serialize_start_tag("link", &attrs)),
                "meta" => self.tags.borrow_mut().metas.push(serialize_start_tag("meta", &attrs)),
                _ => {}
            },
            Token::TagToken(Tag {
                kind: TagKind::EndTag,
                name,
                ..
            }) if name.as_ref() == "script" => self.close_script(),
            Token::CharacterTokens(text) => {
                if let Some(script) = self.open_script.borrow_mut().as_mut() {
                    script.push_str(&text);
                }
            }
            Token::EOFToken => self.close_script(),
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

impl HtmlExtractor {
    /// Create a new extractor
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract tags from an HTML string
    pub fn extract(&self, html: &str) -> ExtractedTags {
        let tokenizer = Tokenizer::new(self.clone(), TokenizerOpts::default());
        let queue = BufferQueue::default();
        queue.push_back(StrTendril::from(html));

        let _ = tokenizer.feed(&queue);
        tokenizer.end();

        let sink = tokenizer.sink;
        // Unterminated script at end of input
        sink.close_script();
        sink.tags.into_inner()
    }

    fn close_script(&self) {
        if let Some(mut script) = self.open_script.borrow_mut().take() {
            script.push_str("</script>");
            self.tags.borrow_mut().scripts.push(script);
        }
    }
}

/// `<name a="b" c="d">`, attributes in source order
fn serialize_start_tag(name: &str, attrs: &[Attribute]) -> String {
    let mut out = format!("<{}", name);
    for attr in attrs {
        out.push(' ');
        out.push_str(attr.name.local.as_ref());
        out.push_str("=\"");
        out.push_str(&attr.value);
        out.push('"');
    }
    out.push('>');
    out
}
