//! Front-matter parsing for markdown posts.
//!
//! A post starts with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: Dynamic Routing and Static Generation
//! date: '2020-03-16T05:35:07.322Z'
//! author:
//!   name: JJ Kasper
//!   picture: /assets/blog/authors/jj.jpeg
//! coverImage: /assets/blog/dynamic-routing/cover.jpg
//! ogImage:
//!   url: /assets/blog/dynamic-routing/cover.jpg
//! ---
//! Lorem ipsum dolor sit amet...
//! ```
//!
//! The body is everything after the closing fence, returned as a slice of
//! the input so no byte is altered.

use crate::types::Author;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Front-matter block is not closed by a `---` line")]
    Unterminated,
}

static OPENING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A---[ \t]*\r?\n").expect("valid regex"));

static CLOSING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^---[ \t]*(?:\r?\n|\z)").expect("valid regex"));

/// Author as written in front-matter: a bare name or a `{ name, picture }` map.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AuthorValue {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        picture: Option<String>,
    },
}

impl From<AuthorValue> for Author {
    fn from(value: AuthorValue) -> Self {
        match value {
            AuthorValue::Name(name) => Author {
                name,
                picture: None,
            },
            AuthorValue::Full { name, picture } => Author { name, picture },
        }
    }
}

/// Open-graph image as written in front-matter: a path or a `{ url }` map.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OgImageValue {
    Url(String),
    Map { url: String },
}

impl OgImageValue {
    pub fn into_url(self) -> String {
        match self {
            OgImageValue::Url(url) | OgImageValue::Map { url } => url,
        }
    }
}

/// Recognized front-matter keys. Anything else in the block is ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    /// Parsed for completeness; the filename stem stays authoritative.
    pub slug: Option<String>,
    pub author: Option<AuthorValue>,
    pub cover_image: Option<String>,
    pub og_image: Option<OgImageValue>,
}

/// Split `content` into its front-matter and body.
///
/// Content without an opening fence has empty front-matter and is all body.
/// A leading byte-order mark is dropped before looking for the fence.
pub fn parse(content: &str) -> Result<(FrontMatter, &str), FrontMatterError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let Some(open) = OPENING_FENCE.find(content) else {
        return Ok((FrontMatter::default(), content));
    };

    let rest = &content[open.end()..];
    let close = CLOSING_FENCE
        .find(rest)
        .ok_or(FrontMatterError::Unterminated)?;

    let yaml = &rest[..close.start()];
    let body = &rest[close.end()..];

    let front_matter = if yaml.trim().is_empty() {
        FrontMatter::default()
    } else {
        serde_yaml::from_str(yaml)?
    };

    Ok((front_matter, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_recognized_keys() {
        let content = "---\ntitle: Hello\ndate: '2020-03-16T05:35:07.322Z'\ncoverImage: /assets/cover.jpg\n---\n# Body\n";
        let (fm, body) = parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hello"));
        assert_eq!(fm.date.as_deref(), Some("2020-03-16T05:35:07.322Z"));
        assert_eq!(fm.cover_image.as_deref(), Some("/assets/cover.jpg"));
        assert_eq!(body, "# Body\n");
    }

    #[test]
    fn body_is_preserved_byte_for_byte() {
        let body = "\n\n  indented\r\ntrailing spaces   \n\n---\nnot a fence for us\n";
        let content = format!("---\ntitle: x\n---\n{body}");
        let (_, parsed) = parse(&content).unwrap();
        assert_eq!(parsed, body);
    }

    #[test]
    fn no_front_matter_means_whole_content_is_body() {
        let content = "# Just markdown\n\n![a](/cat.png)\n";
        let (fm, body) = parse(content).unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, content);
    }

    #[test]
    fn empty_block_is_default() {
        let (fm, body) = parse("---\n---\nbody").unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, "body");
    }

    #[test]
    fn closing_fence_at_end_of_file() {
        let (fm, body) = parse("---\ntitle: Only meta\n---").unwrap();
        assert_eq!(fm.title.as_deref(), Some("Only meta"));
        assert_eq!(body, "");
    }

    #[test]
    fn crlf_fences() {
        let (fm, body) = parse("---\r\ntitle: Windows\r\n---\r\nbody\r\n").unwrap();
        assert_eq!(fm.title.as_deref(), Some("Windows"));
        assert_eq!(body, "body\r\n");
    }

    #[test]
    fn author_as_name_or_map() {
        let (fm, _) = parse("---\nauthor: Tim Neutkens\n---\n").unwrap();
        assert_eq!(
            Author::from(fm.author.unwrap()),
            Author {
                name: "Tim Neutkens".to_string(),
                picture: None
            }
        );

        let (fm, _) =
            parse("---\nauthor:\n  name: JJ Kasper\n  picture: /assets/jj.jpeg\n---\n").unwrap();
        assert_eq!(
            Author::from(fm.author.unwrap()),
            Author {
                name: "JJ Kasper".to_string(),
                picture: Some("/assets/jj.jpeg".to_string())
            }
        );
    }

    #[test]
    fn og_image_as_path_or_map() {
        let (fm, _) = parse("---\nogImage: /assets/og.jpg\n---\n").unwrap();
        assert_eq!(fm.og_image.unwrap().into_url(), "/assets/og.jpg");

        let (fm, _) = parse("---\nogImage:\n  url: /assets/og.jpg\n---\n").unwrap();
        assert_eq!(fm.og_image.unwrap().into_url(), "/assets/og.jpg");
    }

    #[test]
    fn unknown_keys_ignored() {
        let (fm, _) = parse("---\ntitle: T\nexcerpt: something\ntags: [a, b]\n---\n").unwrap();
        assert_eq!(fm.title.as_deref(), Some("T"));
    }

    #[test]
    fn unterminated_block_is_error() {
        let result = parse("---\ntitle: never closed\n\nbody text\n");
        assert!(matches!(result, Err(FrontMatterError::Unterminated)));
    }

    #[test]
    fn malformed_yaml_is_error() {
        let result = parse("---\ntitle: [unclosed\n---\nbody\n");
        assert!(matches!(result, Err(FrontMatterError::Yaml(_))));
    }

    #[test]
    fn non_mapping_yaml_is_error() {
        let result = parse("---\njust a sentence\n---\nbody\n");
        assert!(matches!(result, Err(FrontMatterError::Yaml(_))));
    }

    #[test]
    fn bom_before_fence() {
        let (fm, body) = parse("\u{feff}---\ntitle: Hello\n---\nbody\n").unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hello"));
        assert_eq!(body, "body\n");
    }

    #[test]
    fn bom_without_front_matter_is_not_body() {
        let (fm, body) = parse("\u{feff}# Plain\n").unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, "# Plain\n");
    }

    #[test]
    fn four_dashes_do_not_close_block() {
        let result = parse("---\ntitle: x\n----\nbody\n");
        assert!(matches!(result, Err(FrontMatterError::Unterminated)));
    }
}
