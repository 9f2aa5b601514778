//! Caption request text and parsing of the model's free-text answer.
//!
//! The model is asked for three lines (caption, hashtags, keywords). Nothing enforces that
//! shape, so parsing accepts a JSON object first. Otherwise each line may carry a list number
//! and a `Caption:`/`Hashtags:`/`Keywords:` label; labeled lines go to their field (a label alone
//! on a line claims the next line) and unlabeled lines fill the remaining fields in order.
//! Missing lines become empty values; parsing never fails.

use serde::Deserialize;

/// Used when the model returns no usable caption text.
pub const NO_CAPTION: &str = "No caption generated.";

/// Caption plus optional hashtags and keywords, in the order the model produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CaptionData {
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Builds the system instruction sent with the user's prompt.
pub fn caption_instruction() -> &'static str {
    "You write short social media captions for videos. \
     Answer with exactly three lines and nothing else:\n\
     line 1: the caption\n\
     line 2: 3 to 6 hashtags separated by spaces\n\
     line 3: 3 to 6 keywords separated by commas"
}

/// Parses a raw completion into [`CaptionData`].
pub fn parse_caption_response(raw: &str) -> CaptionData {
    let trimmed = raw.trim();
    if trimmed.starts_with('{') {
        if let Ok(data) = serde_json::from_str::<CaptionData>(trimmed) {
            return normalize(data);
        }
    }

    let mut fields: [Option<&str>; 3] = [None; 3];
    // Field named by a label that stood alone on its line; the next unlabeled line fills it.
    let mut pending: Option<Field> = None;

    for line in trimmed.lines() {
        let (label, text) = split_label(strip_numbering(line.trim()));
        match (label, text.is_empty()) {
            (Some(field), true) => pending = Some(field),
            (None, true) => {}
            (Some(field), false) => {
                if fields[field as usize].is_none() {
                    fields[field as usize] = Some(text);
                }
                pending = None;
            }
            (None, false) => {
                let target = pending
                    .take()
                    .filter(|f| fields[*f as usize].is_none())
                    .or_else(|| Field::ALL.into_iter().find(|f| fields[*f as usize].is_none()));
                if let Some(field) = target {
                    fields[field as usize] = Some(text);
                }
            }
        }
    }

    let [caption, hashtags, keywords] = fields;
    normalize(CaptionData {
        caption: caption.unwrap_or_default().to_string(),
        hashtags: hashtags.map(split_hashtags).unwrap_or_default(),
        keywords: keywords.map(split_keywords).unwrap_or_default(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Caption = 0,
    Hashtags = 1,
    Keywords = 2,
}

impl Field {
    const ALL: [Field; 3] = [Field::Caption, Field::Hashtags, Field::Keywords];

    fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "caption" => Some(Field::Caption),
            "hashtags" | "hashtag" => Some(Field::Hashtags),
            "keywords" | "keyword" => Some(Field::Keywords),
            _ => None,
        }
    }
}

/// Drops a leading list marker such as `1.` or `2)`.
fn strip_numbering(line: &str) -> &str {
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return line;
    }
    let rest = &line[digits..];
    match rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
        Some(after) if after.is_empty() || after.starts_with(char::is_whitespace) => after.trim_start(),
        _ => line,
    }
}

/// Splits a leading `Caption:` / `Hashtags:` / `Keywords:` label (case-insensitive) off the line.
fn split_label(line: &str) -> (Option<Field>, &str) {
    match line.split_once(':') {
        Some((head, rest)) => match Field::from_label(head) {
            Some(field) => (Some(field), rest.trim()),
            None => (None, line),
        },
        None => (None, line),
    }
}

fn normalize(data: CaptionData) -> CaptionData {
    let caption = data.caption.trim().trim_matches('"').trim().to_string();
    CaptionData {
        caption: if caption.is_empty() {
            NO_CAPTION.to_string()
        } else {
            caption
        },
        hashtags: data
            .hashtags
            .iter()
            .flat_map(|h| split_hashtags(h))
            .collect(),
        keywords: data
            .keywords
            .iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect(),
    }
}

fn split_hashtags(line: &str) -> Vec<String> {
    line.split(|c: char| c.is_whitespace() || c == ',')
        .map(|t| t.trim_start_matches('#'))
        .filter(|t| !t.is_empty())
        .map(|t| format!("#{}", t))
        .collect()
}

fn split_keywords(line: &str) -> Vec<String> {
    line.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}
