//! Inline element sequences
//!
//! An OSC payload terminated by BEL may carry an application-defined element.
//! Three commands are understood:
//!
//! - `1337;File=name=<b64>;inline=1;width=..;height=..:<b64 content>` (inline image)
//! - `1338;url=..;alt=..;width=..;height=..` (external image)
//! - `1339;url=..;content=..` (link)
//!
//! Anything else is not an element and is ignored.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

const ITERM_IMAGE_PREFIX: &str = "1337;File=";
const EXTERNAL_IMAGE_PREFIX: &str = "1338;";
const LINK_PREFIX: &str = "1339;";

/// Errors produced while parsing an element payload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ElementError {
    #[error("missing required argument `{0}`")]
    MissingArgument(&'static str),

    #[error("expected `key=value`, got `{0}`")]
    MalformedArgument(String),

    #[error("invalid {field} `{value}`")]
    InvalidDimension { field: &'static str, value: String },

    #[error("unsupported image type for `{0}`")]
    UnsupportedImageType(String),

    #[error("`{0}` is not valid base64")]
    InvalidBase64(&'static str),

    #[error("inline image has no content")]
    MissingContent,
}

/// A structured element inserted into the screen as a single unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Link(Link),
    Image(Image),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub url: String,
    /// Visible text; the url when the payload gives none
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub source: ImageSource,
    pub alt: Option<String>,
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Image referenced by url
    Url(String),

    /// Image carried in the payload, `data` still base64 encoded
    Inline {
        name: String,
        content_type: &'static str,
        data: String,
    },
}

/// Image dimension as given in the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Auto,
    Cells(u32),
    Pixels(u32),
    Percent(u32),
}

impl Element {
    /// Whether the element flows with the surrounding text
    pub fn is_inline(&self) -> bool {
        matches!(self, Element::Link(_))
    }

    /// Plain-text stand-in used by text renderers
    pub fn fallback_text(&self) -> String {
        match self {
            Element::Link(link) => link.content.clone(),
            Element::Image(image) => {
                let label = match (&image.alt, &image.source) {
                    (Some(alt), _) => alt.as_str(),
                    (None, ImageSource::Inline { name, .. }) => name.as_str(),
                    (None, ImageSource::Url(url)) => url.as_str(),
                };
                format!("[image: {label}]")
            }
        }
    }
}

/// Parse a captured OSC payload.
///
/// Returns `Ok(None)` when the payload is not an element sequence at all.
pub fn parse_element_sequence(sequence: &str) -> Result<Option<Element>, ElementError> {
    if let Some(rest) = sequence.strip_prefix(ITERM_IMAGE_PREFIX) {
        parse_iterm_image(rest)
    } else if let Some(rest) = sequence.strip_prefix(EXTERNAL_IMAGE_PREFIX) {
        parse_external_image(rest).map(Some)
    } else if let Some(rest) = sequence.strip_prefix(LINK_PREFIX) {
        parse_link(rest).map(Some)
    } else {
        Ok(None)
    }
}

fn parse_iterm_image(sequence: &str) -> Result<Option<Element>, ElementError> {
    let (arguments, content) = sequence
        .split_once(':')
        .ok_or(ElementError::MissingContent)?;
    let args = Arguments::parse(arguments)?;

    // Downloads (inline=0) are not rendered
    if args.get("inline") != Some("1") {
        return Ok(None);
    }

    let encoded_name = args.require("name")?;
    let name = STANDARD
        .decode(encoded_name)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or(ElementError::InvalidBase64("name"))?;
    let content_type = content_type_for(&name)
        .ok_or_else(|| ElementError::UnsupportedImageType(name.clone()))?;

    if content.is_empty() {
        return Err(ElementError::MissingContent);
    }
    if STANDARD.decode(content).is_err() {
        return Err(ElementError::InvalidBase64("content"));
    }

    Ok(Some(Element::Image(Image {
        source: ImageSource::Inline {
            name,
            content_type,
            data: content.to_string(),
        },
        alt: None,
        width: args.dimension("width")?,
        height: args.dimension("height")?,
    })))
}

fn parse_external_image(sequence: &str) -> Result<Element, ElementError> {
    let args = Arguments::parse(sequence)?;
    let url = args.require("url")?;

    Ok(Element::Image(Image {
        source: ImageSource::Url(url.to_string()),
        alt: args.get("alt").map(str::to_string),
        width: args.dimension("width")?,
        height: args.dimension("height")?,
    }))
}

fn parse_link(sequence: &str) -> Result<Element, ElementError> {
    let args = Arguments::parse(sequence)?;
    let url = args.require("url")?;
    let content = args.get("content").unwrap_or(url);

    Ok(Element::Link(Link {
        url: url.to_string(),
        content: content.to_string(),
    }))
}

/// `key=value` pairs separated by `;`
struct Arguments<'a> {
    pairs: Vec<(&'a str, &'a str)>,
}

impl<'a> Arguments<'a> {
    fn parse(sequence: &'a str) -> Result<Self, ElementError> {
        let mut pairs = Vec::new();
        for argument in sequence.split(';').filter(|arg| !arg.is_empty()) {
            let (key, value) = argument
                .split_once('=')
                .ok_or_else(|| ElementError::MalformedArgument(argument.to_string()))?;
            pairs.push((key, value));
        }
        Ok(Self { pairs })
    }

    /// Last value given for `key`
    fn get(&self, key: &str) -> Option<&'a str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }

    fn require(&self, key: &'static str) -> Result<&'a str, ElementError> {
        self.get(key)
            .filter(|value| !value.is_empty())
            .ok_or(ElementError::MissingArgument(key))
    }

    fn dimension(&self, key: &'static str) -> Result<Option<Dimension>, ElementError> {
        self.get(key).map(|value| parse_dimension(key, value)).transpose()
    }
}

fn parse_dimension(field: &'static str, value: &str) -> Result<Dimension, ElementError> {
    let invalid = || ElementError::InvalidDimension {
        field,
        value: value.to_string(),
    };

    if value == "auto" {
        return Ok(Dimension::Auto);
    }

    let (digits, unit): (&str, fn(u32) -> Dimension) = if let Some(d) = value.strip_suffix("px")
    {
        (d, Dimension::Pixels)
    } else if let Some(d) = value.strip_suffix('%') {
        (d, Dimension::Percent)
    } else {
        (value, Dimension::Cells)
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    digits.parse().map(unit).map_err(|_| invalid())
}

fn content_type_for(name: &str) -> Option<&'static str> {
    let (_, extension) = name.rsplit_once('.')?;
    let content_type = match extension.to_ascii_lowercase().as_str() {
        "gif" => "image/gif",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        _ => return None,
    };
    Some(content_type)
}
