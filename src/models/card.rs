use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maximum title length accepted by [`CardRequest::validate`]
pub const MAX_TITLE_CHARS: usize = 200;
/// Maximum length of the short labels (category, duration, location)
pub const MAX_LABEL_CHARS: usize = 100;
/// Maximum description length accepted by [`CardRequest::validate`]
pub const MAX_DESCRIPTION_CHARS: usize = 2000;

/// Suffix appended to every suggested file name
const FILENAME_SUFFIX: &str = "-story.png";

/// An experience record to be rendered as a story card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardRequest {
    /// Experience title (wrapped over as many lines as needed)
    pub title: String,
    /// Category label shown in the top pill
    pub category: String,
    /// Duration label, e.g. "2 Hours"
    pub duration: String,
    /// Location label, e.g. "Virtual"
    pub location_type: String,
    /// Description prose (at most four lines are drawn)
    pub description: String,
    /// Optional background image; a gradient is drawn when absent
    #[serde(default, alias = "image_url", skip_serializing_if = "Option::is_none")]
    pub background_image_url: Option<String>,
}

/// Request field that failed validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be less than {max} characters")]
    TooLong { field: &'static str, max: usize },
}

impl CardRequest {
    /// Suggested download name: whitespace runs become single hyphens.
    pub fn suggested_filename(&self) -> String {
        suggested_filename(&self.title)
    }

    /// Check the record against the limits the marketplace enforces on
    /// experiences. Rendering itself never calls this.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::Required { field: "title" });
        }
        check_len("title", self.title.trim(), MAX_TITLE_CHARS)?;
        for (field, value) in [
            ("category", &self.category),
            ("duration", &self.duration),
            ("locationType", &self.location_type),
        ] {
            if value.is_empty() {
                return Err(ValidationError::Required { field });
            }
            check_len(field, value, MAX_LABEL_CHARS)?;
        }
        check_len("description", self.description.trim(), MAX_DESCRIPTION_CHARS)?;
        Ok(())
    }

    /// Background URL, ignoring blank values
    pub fn background_url(&self) -> Option<&str> {
        self.background_image_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        Err(ValidationError::TooLong { field, max })
    } else {
        Ok(())
    }
}

/// Derive a download file name from a card title.
///
/// Every run of whitespace (including leading and trailing runs) is replaced
/// by a single hyphen.
pub fn suggested_filename(title: &str) -> String {
    let mut name = String::with_capacity(title.len() + FILENAME_SUFFIX.len());
    let mut in_whitespace = false;
    for ch in title.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                name.push('-');
                in_whitespace = true;
            }
        } else {
            name.push(ch);
            in_whitespace = false;
        }
    }
    name.push_str(FILENAME_SUFFIX);
    name
}

/// A rendered story card
#[derive(Debug, Clone)]
pub struct RenderedCard {
    /// Encoded PNG bytes
    pub png_bytes: Vec<u8>,
    /// Pixel width of the encoded image
    pub width: u32,
    /// Pixel height of the encoded image
    pub height: u32,
    /// Suggested file name for the download
    pub filename: String,
}
