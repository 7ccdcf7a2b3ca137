//! Pre- and post-parse extension points.

use crate::ast::Document;

/// Receives the raw input and returns the content to parse.
pub type PreParseHook = Box<dyn Fn(&str) -> String>;

/// Observes the finished document.
pub type PostParseHook = Box<dyn Fn(&Document)>;

/// The two hooks a parser fires around each parse.
#[derive(Default)]
pub struct ParseHooks {
    pre_parse: Option<PreParseHook>,
    post_parse: Option<PostParseHook>,
}

impl ParseHooks {
    /// No hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the pre-parse hook, replacing any previous one.
    pub fn set_pre_parse(&mut self, hook: impl Fn(&str) -> String + 'static) {
        self.pre_parse = Some(Box::new(hook));
    }

    /// Install the post-parse hook, replacing any previous one.
    pub fn set_post_parse(&mut self, hook: impl Fn(&Document) + 'static) {
        self.post_parse = Some(Box::new(hook));
    }

    /// Run the pre-parse hook, or pass the content through unchanged.
    pub fn pre_parse(&self, content: &str) -> String {
        match &self.pre_parse {
            Some(hook) => hook(content),
            None => content.to_string(),
        }
    }

    /// Run the post-parse hook if one is installed.
    pub fn post_parse(&self, document: &Document) {
        if let Some(hook) = &self.post_parse {
            hook(document);
        }
    }
}

impl std::fmt::Debug for ParseHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseHooks")
            .field("pre_parse", &self.pre_parse.is_some())
            .field("post_parse", &self.post_parse.is_some())
            .finish()
    }
}
