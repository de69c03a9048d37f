//! Layout templates rendered against log events.
//!
//! A layout mixes literal text with `${renderer:option=value}` placeholders:
//!
//! ```text
//! ${logger}|${message:withException=true:exceptionSeparator=|}
//! ```
//!
//! Supported renderers:
//!
//! | renderer | options |
//! |---|---|
//! | `message` | `withException`, `exceptionSeparator` (default `\|`) |
//! | `logger` | `shortName` |
//! | `level` | `uppercase` |
//! | `exception` | `format` = `message` (default), `type`, `shortType`, `toString` |
//! | `event-properties` / `event-property` | `item` (or a bare key) |
//! | `longdate` | |
//! | `newline` | |
//! | `literal` | `text` |
//!
//! A backslash escapes the next character inside a placeholder, so `\:`
//! and `\}` can appear in option values.

use std::fmt;
use std::iter::Peekable;
use std::str::{Chars, FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::event::LogEvent;
use crate::string_dictionary::value_to_string;

/// A parsed layout template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Layout {
    text: String,
    parts: Vec<LayoutPart>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LayoutPart {
    Literal(String),
    Renderer(Renderer),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Renderer {
    Message {
        with_exception: bool,
        separator: String,
    },
    Logger {
        short_name: bool,
    },
    Level {
        uppercase: bool,
    },
    Exception(ExceptionFormat),
    EventProperty(String),
    LongDate,
    NewLine,
    Literal(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExceptionFormat {
    Message,
    Type,
    ShortType,
    ToString,
}

const DEFAULT_EXCEPTION_SEPARATOR: &str = "|";

impl Layout {
    /// Parse a layout template.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::LayoutParse`] for unterminated placeholders,
    /// unknown renderers or invalid options.
    pub fn parse(text: &str) -> CoreResult<Self> {
        let err = |message: String| CoreError::LayoutParse {
            layout: text.to_owned(),
            message,
        };

        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next();
                let segments = read_segments(&mut chars)
                    .ok_or_else(|| err("unterminated '${' placeholder".to_owned()))?;
                if !literal.is_empty() {
                    parts.push(LayoutPart::Literal(std::mem::take(&mut literal)));
                }
                parts.push(LayoutPart::Renderer(
                    Renderer::from_segments(&segments).map_err(err)?,
                ));
            } else {
                literal.push(c);
            }
        }
        if !literal.is_empty() {
            parts.push(LayoutPart::Literal(literal));
        }

        Ok(Self {
            text: text.to_owned(),
            parts,
        })
    }

    /// A layout that renders `text` verbatim, without placeholder parsing.
    #[must_use]
    pub fn literal(text: impl Into<String>) -> Self {
        let text = text.into();
        let parts = if text.is_empty() {
            Vec::new()
        } else {
            vec![LayoutPart::Literal(text.clone())]
        };
        Self { text, parts }
    }

    /// The source template.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether the layout renders nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Render the layout against an event.
    #[must_use]
    pub fn render(&self, event: &LogEvent) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                LayoutPart::Literal(text) => out.push_str(text),
                LayoutPart::Renderer(renderer) => renderer.append(event, &mut out),
            }
        }
        out
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for Layout {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Layout {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Layout {
    type Error = CoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Layout> for String {
    fn from(layout: Layout) -> Self {
        layout.text
    }
}

/// Read placeholder segments up to the closing `}`.
///
/// Segments are separated by unescaped `:`. Returns `None` if the input
/// ends before the placeholder is closed.
fn read_segments(chars: &mut Peekable<Chars<'_>>) -> Option<Vec<String>> {
    let mut segments = Vec::new();
    let mut current = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\\' => current.push(chars.next()?),
            ':' => segments.push(std::mem::take(&mut current)),
            '}' => {
                segments.push(current);
                return Some(segments);
            },
            other => current.push(other),
        }
    }
    None
}

/// Options of a single placeholder, keys lowercased.
struct Options(Vec<(String, String)>);

impl Options {
    fn parse(segments: &[String]) -> Self {
        Self(
            segments
                .iter()
                .map(|segment| match segment.split_once('=') {
                    Some((key, value)) => (key.trim().to_ascii_lowercase(), value.to_owned()),
                    None => (String::new(), segment.clone()),
                })
                .collect(),
        )
    }

    fn take(&mut self, key: &str) -> Option<String> {
        let index = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(index).1)
    }

    fn take_bool(&mut self, key: &str) -> Result<bool, String> {
        match self.take(key) {
            None => Ok(false),
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                other => Err(format!("option '{key}' expects true or false, got '{other}'")),
            },
        }
    }

    fn finish(self, renderer: &str) -> Result<(), String> {
        match self.0.first() {
            None => Ok(()),
            Some((key, value)) if key.is_empty() => Err(format!(
                "renderer '{renderer}' does not take a default option ('{value}')"
            )),
            Some((key, _)) => Err(format!("renderer '{renderer}' has no option '{key}'")),
        }
    }
}

impl Renderer {
    fn from_segments(segments: &[String]) -> Result<Self, String> {
        let (name, rest) = segments
            .split_first()
            .ok_or_else(|| "empty placeholder".to_owned())?;
        let name = name.trim().to_ascii_lowercase();
        let mut options = Options::parse(rest);

        let renderer = match name.as_str() {
            "message" => Self::Message {
                with_exception: options.take_bool("withexception")?,
                separator: options
                    .take("exceptionseparator")
                    .unwrap_or_else(|| DEFAULT_EXCEPTION_SEPARATOR.to_owned()),
            },
            "logger" => Self::Logger {
                short_name: options.take_bool("shortname")?,
            },
            "level" => Self::Level {
                uppercase: options.take_bool("uppercase")?,
            },
            "exception" => {
                let format = match options.take("format") {
                    None => ExceptionFormat::Message,
                    Some(format) => match format.trim().to_ascii_lowercase().as_str() {
                        "message" => ExceptionFormat::Message,
                        "type" => ExceptionFormat::Type,
                        "shorttype" => ExceptionFormat::ShortType,
                        "tostring" => ExceptionFormat::ToString,
                        other => return Err(format!("unknown exception format '{other}'")),
                    },
                };
                Self::Exception(format)
            },
            "event-properties" | "event-property" => {
                let item = options
                    .take("item")
                    .or_else(|| options.take(""))
                    .ok_or_else(|| format!("renderer '{name}' requires an item"))?;
                Self::EventProperty(item)
            },
            "longdate" => Self::LongDate,
            "newline" => Self::NewLine,
            "literal" => Self::Literal(options.take("text").unwrap_or_default()),
            "" => return Err("empty renderer name".to_owned()),
            other => return Err(format!("unknown renderer '{other}'")),
        };

        options.finish(&name)?;
        Ok(renderer)
    }

    fn append(&self, event: &LogEvent, out: &mut String) {
        match self {
            Self::Message {
                with_exception,
                separator,
            } => {
                out.push_str(&event.message);
                if *with_exception {
                    if let Some(exception) = &event.exception {
                        if !event.message.is_empty() {
                            out.push_str(separator);
                        }
                        out.push_str(&exception.to_string());
                    }
                }
            },
            Self::Logger { short_name } => {
                let name = event.logger_name.as_str();
                if *short_name {
                    out.push_str(short_name_of(name));
                } else {
                    out.push_str(name);
                }
            },
            Self::Level { uppercase } => {
                if *uppercase {
                    out.push_str(&event.level.as_str().to_ascii_uppercase());
                } else {
                    out.push_str(event.level.as_str());
                }
            },
            Self::Exception(format) => {
                if let Some(exception) = &event.exception {
                    match format {
                        ExceptionFormat::Message => out.push_str(&exception.message),
                        ExceptionFormat::Type => out.push_str(&exception.type_name),
                        ExceptionFormat::ShortType => {
                            out.push_str(short_name_of(&exception.type_name));
                        },
                        ExceptionFormat::ToString => out.push_str(&exception.to_string()),
                    }
                }
            },
            Self::EventProperty(item) => {
                if let Some(value) = event.properties.get(item) {
                    out.push_str(&value_to_string(value));
                }
            },
            Self::LongDate => {
                out.push_str(&event.timestamp.format("%Y-%m-%d %H:%M:%S%.3f").to_string());
            },
            Self::NewLine => out.push_str(if cfg!(windows) { "\r\n" } else { "\n" }),
            Self::Literal(text) => out.push_str(text),
        }
    }
}

/// Last segment of a `.` or `::` separated name.
fn short_name_of(name: &str) -> &str {
    let after_path = name.rsplit("::").next().unwrap_or(name);
    after_path.rsplit('.').next().unwrap_or(after_path)
}
