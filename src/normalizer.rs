//! Recovers one JSON object from free-form model output
//!
//! Model text passes through a fixed sequence of pure stages:
//!
//! ```text
//! Raw -> FenceStripped -> BraceBounded -> CommentStripped -> Parsed
//!                                                        \-> permissive parse -> Parsed
//!                                                        \-> comment lines dropped -> Parsed
//!                                                        \-> Failed
//! ```
//!
//! Each stage is a public function so it can be exercised on its own.
//! [`Normalizer::extract`] never fails; unrecoverable text becomes an
//! [`ErrorResult`] carrying the untouched input.

use log::{debug, trace, warn};
use serde_json::{Map, Value};

use crate::request::{ErrorResult, StructuredResult, ERROR_MARKER};

pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse AI response";

const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";

/// Pipeline states, used for tracing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage
{   Raw
  , FenceStripped
  , BraceBounded
  , CommentStripped
  , Parsed
  , Failed
}

/// Content of the fenced block, if the text has one.
///
/// A fence tagged `json` wins over an earlier untagged one. The block
/// runs to the next fence, or to the end of the text when unclosed.
pub fn strip_fence(text: &str) -> &str
{   let start = match text.find(JSON_FENCE).or_else(|| text.find(FENCE))
    {   Some(start) => start
      , None => return text
    };
    let after = &text[start + FENCE.len()..];
    let body = match after.find(FENCE)
    {   Some(end) => &after[..end]
      , None => after
    };
    strip_language_tag(body).trim()
}

/// Drop a bare info-string line (`json`, `JSON`, `json5`, ...) at the
/// top of a fenced block
fn strip_language_tag(body: &str) -> &str
{   let Some(newline) = body.find('\n')
    else
    {   return body;
    };
    let tag = body[..newline].trim();
    let is_tag = !tag.is_empty()
      && tag.chars().all(|c| {
           c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.')
         });
    if is_tag
    {   &body[newline + 1..]
    } else
    {   body
    }
}

/// Narrow to the span from the first `{` to the last `}`, discarding
/// prose around the object. Text without such a span is unchanged.
pub fn bound_braces(text: &str) -> &str
{   match (text.find('{'), text.rfind('}'))
    {   (Some(start), Some(end)) if start < end => &text[start..=end]
      , _ => text
    }
}

/// Remove `//` line comments and `/* */` block comments outside of
/// double-quoted strings. Line comments keep their terminating newline;
/// an unterminated block comment swallows the rest of the text.
///
/// Apostrophes are plain text here: prose such as `it's` must not hide
/// the comments after it. Single-quoted strings are the permissive
/// pass's business, and it reads comments itself.
pub fn strip_comments(text: &str) -> String
{   let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next()
    {   if in_string
        {   out.push(c);
            if escaped
            {   escaped = false;
            } else if c == '\\'
            {   escaped = true;
            } else if c == '"'
            {   in_string = false;
            }
            continue;
        }

        match c
        {   '"' => {
              in_string = true;
              out.push(c);
            }
          , '/' if chars.peek() == Some(&'/') => {
              while let Some(&next) = chars.peek()
              {   if next == '\n'
                  {   break;
                  }
                  chars.next();
              }
            }
          , '/' if chars.peek() == Some(&'*') => {
              chars.next();
              let mut prev = '\0';
              for next in chars.by_ref()
              {   if prev == '*' && next == '/'
                  {   break;
                  }
                  prev = next;
              }
            }
          , _ => out.push(c)
        }
    }

    out
}

/// Keep only the lines free of any comment marker
pub fn drop_comment_lines(text: &str) -> String
{   text.lines()
      .filter(|line| {
        !line.contains("//")
          && !line.contains("/*")
          && !line.contains("*/")
      })
      .collect::<Vec<_>>()
      .join("\n")
}

fn into_object(value: Value) -> Option<Map<String, Value>>
{   match value
    {   Value::Object(map) => Some(map)
      , other => {
          debug!("Parsed JSON is not an object: {}", other);
          None
        }
    }
}

/// Standard JSON parse, accepting only a top-level object
pub fn parse_strict(text: &str) -> Option<Map<String, Value>>
{   match serde_json::from_str::<Value>(text)
    {   Ok(value) => into_object(value)
      , Err(e) => {
          debug!("JSON decode error: {}", e);
          None
        }
    }
}

/// JSON5 parse (trailing commas, unquoted keys, single quotes)
#[cfg(feature = "permissive")]
pub fn parse_permissive(text: &str) -> Option<Map<String, Value>>
{   match json5::from_str::<Value>(text)
    {   Ok(value) => into_object(value)
      , Err(e) => {
          debug!("Flexible JSON parsing failed: {}", e);
          None
        }
    }
}

#[cfg(not(feature = "permissive"))]
pub fn parse_permissive(_text: &str) -> Option<Map<String, Value>>
{   None
}

/// Response normalizer. Stateless; `extract` is idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer
{   permissive: bool
}

impl Default for Normalizer
{   fn default() -> Self
    {   Normalizer::new()
    }
}

impl Normalizer
{   /// Normalizer with the permissive pass enabled when the crate is
    /// built with the `permissive` feature
    pub fn new() -> Self
    {   Normalizer
        {   permissive: cfg!(feature = "permissive")
        }
    }

    /// Normalizer that skips the permissive pass
    pub fn strict() -> Self
    {   Normalizer { permissive: false }
    }

    pub fn is_permissive(&self) -> bool
    {   self.permissive
    }

    pub fn extract(&self, raw: &str) -> StructuredResult
    {   if raw.starts_with(ERROR_MARKER)
        {   return StructuredResult::error(raw);
        }
        trace!("{:?}: {} bytes", Stage::Raw, raw.len());

        let fenced = strip_fence(raw);
        trace!("{:?}: {} bytes", Stage::FenceStripped, fenced.len());

        let bounded = bound_braces(fenced);
        trace!("{:?}: {} bytes", Stage::BraceBounded, bounded.len());

        let cleaned = strip_comments(bounded);
        trace!(
          "{:?}: {}...",
          Stage::CommentStripped,
          cleaned.chars().take(200).collect::<String>()
        );

        if let Some(map) = parse_strict(&cleaned)
        {   trace!("{:?} on strict pass", Stage::Parsed);
            return StructuredResult::Payload(map);
        }

        if self.permissive
        {   if let Some(map) = parse_permissive(bounded)
            {   trace!("{:?} on permissive pass", Stage::Parsed);
                return StructuredResult::Payload(map);
            }
        }

        if let Some(map) = parse_strict(&drop_comment_lines(bounded))
        {   trace!("{:?} after dropping comment lines", Stage::Parsed);
            return StructuredResult::Payload(map);
        }

        warn!("{:?}: could not recover JSON from model output", Stage::Failed);
        StructuredResult::Error(ErrorResult
        {   error: PARSE_FAILURE_MESSAGE.to_string()
          , raw_response: Some(raw.to_string())
        })
    }
}

/// Extract with the default [`Normalizer`]
pub fn extract(raw: &str) -> StructuredResult
{   Normalizer::new().extract(raw)
}
