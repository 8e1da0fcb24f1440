//! Greedy word wrapping for the title and description blocks.
//!
//! Words are split on whitespace and appended to the current line one at a
//! time, each followed by a single space. When the measured candidate line
//! is wider than the block and the current line already holds something,
//! the current line is committed and the word starts a new one. There is no
//! hyphenation and no rebalancing; a single word wider than the block stays
//! on its own line and overflows.

use serde::Serialize;

use super::measure::{TextMeasurer, TextStyle};
use crate::models::CardRequest;

/// Geometry and font of one wrapped text block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapParams {
    /// Left edge of every line
    pub x: f32,
    /// Baseline of the first line
    pub start_y: f32,
    pub max_width: f32,
    pub line_height: f32,
    pub style: TextStyle,
    /// Hard cap on committed lines; words past the cap are dropped
    pub max_lines: Option<usize>,
}

/// Title block: bold 72px from (80, 280), uncapped
pub const TITLE_BLOCK: WrapParams = WrapParams {
    x: 80.0,
    start_y: 280.0,
    max_width: 920.0,
    line_height: 90.0,
    style: TextStyle::bold(72.0),
    max_lines: None,
};

/// Gap between the last title baseline and the first description baseline
pub const DESCRIPTION_GAP: f32 = 120.0;

/// Description block: regular 32px, at most four lines.
/// `start_y` is replaced with the position below the title.
pub const DESCRIPTION_BLOCK: WrapParams = WrapParams {
    x: 80.0,
    start_y: 0.0,
    max_width: 920.0,
    line_height: 50.0,
    style: TextStyle::regular(32.0),
    max_lines: Some(4),
};

/// A committed line and its baseline origin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

/// Result of wrapping one block
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedBlock {
    pub lines: Vec<TextLine>,
    /// Cursor position after wrapping (baseline of the last line written
    /// or of the line that would have been written next)
    pub last_y: f32,
}

impl WrappedBlock {
    /// Text of each committed line
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }
}

/// Wrap `text` into lines no wider than `params.max_width`.
pub fn wrap_greedy(text: &str, params: &WrapParams, measurer: &dyn TextMeasurer) -> WrappedBlock {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut y = params.start_y;

    for word in text.split_whitespace() {
        if params.max_lines.is_some_and(|max| lines.len() >= max) {
            // Cap reached: every remaining word is dropped unmeasured
            break;
        }

        let candidate = format!("{line}{word} ");
        if measurer.measure(&candidate, params.style) > params.max_width && !line.is_empty() {
            lines.push(TextLine {
                text: std::mem::take(&mut line),
                x: params.x,
                y,
            });
            line = format!("{word} ");
            y += params.line_height;
        } else {
            line = candidate;
        }
    }

    if params.max_lines.map_or(true, |max| lines.len() < max) {
        lines.push(TextLine {
            text: line,
            x: params.x,
            y,
        });
    }

    WrappedBlock { lines, last_y: y }
}

/// Positioned text for a whole card
#[derive(Debug, Clone, PartialEq)]
pub struct CardLayout {
    pub title: WrappedBlock,
    pub description: WrappedBlock,
}

impl CardLayout {
    pub fn compute(request: &CardRequest, measurer: &dyn TextMeasurer) -> Self {
        let title = wrap_greedy(&request.title, &TITLE_BLOCK, measurer);

        let description_params = WrapParams {
            start_y: title.last_y + DESCRIPTION_GAP,
            ..DESCRIPTION_BLOCK
        };
        let description = wrap_greedy(&request.description, &description_params, measurer);

        tracing::debug!(
            title_lines = title.lines.len(),
            description_lines = description.lines.len(),
            "Computed card layout"
        );

        Self { title, description }
    }
}
