//! Inline `{@link Foo}` style references inside descriptions.

use crate::types::InlineTag;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fmt;
use std::sync::Arc;

static INLINE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{@([A-Za-z][\w.-]*)(?:\s+([^{}]*?))?\s*\}").unwrap());

/// How inline tags are rewritten in descriptions.
#[derive(Clone)]
pub enum InlineTagReplacer {
    /// `{@link Foo}` becomes `{{link "Foo"}}`
    Handlebars,
    Custom(Arc<dyn Fn(&InlineTag) -> String + Send + Sync>),
}

impl InlineTagReplacer {
    pub fn custom(f: impl Fn(&InlineTag) -> String + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    /// Replacer selected by name in configuration.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "handlebars" => Some(Self::Handlebars),
            _ => None,
        }
    }

    pub fn replace(&self, tag: &InlineTag) -> String {
        match self {
            Self::Handlebars if tag.value.is_empty() => format!("{{{{{}}}}}", tag.name),
            Self::Handlebars => format!(
                "{{{{{} \"{}\"}}}}",
                tag.name,
                tag.value.replace('"', "\\\"")
            ),
            Self::Custom(f) => f(tag),
        }
    }
}

impl fmt::Debug for InlineTagReplacer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handlebars => f.write_str("Handlebars"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

fn inline_tag(caps: &Captures) -> InlineTag {
    InlineTag {
        raw: caps[0].to_string(),
        name: caps[1].to_string(),
        value: caps.get(2).map_or("", |m| m.as_str()).trim().to_string(),
    }
}

/// All inline tags in `text`, in order of appearance.
pub fn collect_inline_tags(text: &str) -> Vec<InlineTag> {
    INLINE_TAG.captures_iter(text).map(|c| inline_tag(&c)).collect()
}

pub fn replace_inline_tags(text: &str, replacer: &InlineTagReplacer) -> String {
    INLINE_TAG
        .replace_all(text, |caps: &Captures| replacer.replace(&inline_tag(caps)))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_inline_tags() {
        let tags = collect_inline_tags("See {@link Foo#bar} and {@inheritDoc}.");
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name, "link");
        assert_eq!(tags[0].value, "Foo#bar");
        assert_eq!(tags[0].raw, "{@link Foo#bar}");
        assert_eq!(tags[1].name, "inheritDoc");
        assert_eq!(tags[1].value, "");
    }

    #[test]
    fn test_value_with_spaces() {
        let tags = collect_inline_tags("{@link https://example.com  The docs }");
        assert_eq!(tags[0].value, "https://example.com  The docs");
    }

    #[test]
    fn test_handlebars_replacement() {
        let out = replace_inline_tags("Use {@link Foo} here.", &InlineTagReplacer::Handlebars);
        assert_eq!(out, "Use {{link \"Foo\"}} here.");

        let out = replace_inline_tags("{@inheritDoc}", &InlineTagReplacer::Handlebars);
        assert_eq!(out, "{{inheritDoc}}");
    }

    #[test]
    fn test_custom_replacement() {
        let replacer = InlineTagReplacer::custom(|tag| format!("[{}]({})", tag.value, tag.name));
        let out = replace_inline_tags("a {@link Foo} b {@see Bar}", &replacer);
        assert_eq!(out, "a [Foo](link) b [Bar](see)");
    }

    #[test]
    fn test_text_without_inline_tags_is_unchanged() {
        let text = "An email@example.com and {braces}";
        assert!(collect_inline_tags(text).is_empty());
        assert_eq!(replace_inline_tags(text, &InlineTagReplacer::Handlebars), text);
    }

    #[test]
    fn test_from_name() {
        assert!(matches!(
            InlineTagReplacer::from_name("handlebars"),
            Some(InlineTagReplacer::Handlebars)
        ));
        assert!(InlineTagReplacer::from_name("mustache").is_none());
    }
}
