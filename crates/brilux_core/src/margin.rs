//! CSS-style root margins
//!
//! Visibility observers grow or shrink the viewport by a root margin before
//! testing intersections. The syntax follows CSS shorthand: one to four
//! lengths in `px` or `%` (`"-100px"`, `"-30% 0px -30% 0px"`). Positive values
//! grow the root, negative values shrink it. Percentages resolve against the
//! viewport height for top/bottom and the viewport width for left/right.

use crate::geometry::{Rect, Size};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced while parsing a root margin
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarginParseError {
    #[error("root margin is empty")]
    Empty,

    #[error("root margin has {0} components, expected 1 to 4")]
    TooManyComponents(usize),

    #[error("invalid margin length `{0}`: expected a number followed by px or %")]
    InvalidLength(String),
}

/// One margin component
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MarginLength {
    Px(f32),
    Percent(f32),
}

impl MarginLength {
    /// Resolve to pixels given the reference dimension
    pub fn resolve(&self, reference: f32) -> f32 {
        match *self {
            MarginLength::Px(px) => px,
            MarginLength::Percent(pct) => reference * pct / 100.0,
        }
    }
}

impl FromStr for MarginLength {
    type Err = MarginParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MarginParseError::InvalidLength(s.to_string());

        if let Some(number) = s.strip_suffix("px") {
            number.parse().map(MarginLength::Px).map_err(|_| invalid())
        } else if let Some(number) = s.strip_suffix('%') {
            number.parse().map(MarginLength::Percent).map_err(|_| invalid())
        } else if s.parse::<f32>().map(|v| v == 0.0).unwrap_or(false) {
            // Unitless zero is valid CSS
            Ok(MarginLength::Px(0.0))
        } else {
            Err(invalid())
        }
    }
}

impl fmt::Display for MarginLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarginLength::Px(v) => write!(f, "{}px", v),
            MarginLength::Percent(v) => write!(f, "{}%", v),
        }
    }
}

/// Margin applied around the viewport before intersection tests
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RootMargin {
    pub top: MarginLength,
    pub right: MarginLength,
    pub bottom: MarginLength,
    pub left: MarginLength,
}

impl RootMargin {
    pub const ZERO: RootMargin = RootMargin::uniform(MarginLength::Px(0.0));

    pub const fn uniform(length: MarginLength) -> Self {
        Self {
            top: length,
            right: length,
            bottom: length,
            left: length,
        }
    }

    /// Parse a CSS margin shorthand
    pub fn parse(input: &str) -> Result<Self, MarginParseError> {
        input.parse()
    }

    /// Apply the margin to a viewport rectangle
    ///
    /// The resulting rectangle never has a negative size.
    pub fn apply(&self, viewport: Rect) -> Rect {
        let size = Size::new(viewport.width, viewport.height);
        let top = self.top.resolve(size.height);
        let bottom = self.bottom.resolve(size.height);
        let left = self.left.resolve(size.width);
        let right = self.right.resolve(size.width);

        Rect::new(
            viewport.x - left,
            viewport.y - top,
            (viewport.width + left + right).max(0.0),
            (viewport.height + top + bottom).max(0.0),
        )
    }
}

impl Default for RootMargin {
    fn default() -> Self {
        Self::ZERO
    }
}

impl FromStr for RootMargin {
    type Err = MarginParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split_whitespace()
            .map(MarginLength::from_str)
            .collect::<Result<Vec<_>, _>>()?;

        match parts.as_slice() {
            [] => Err(MarginParseError::Empty),
            [all] => Ok(Self::uniform(*all)),
            [vertical, horizontal] => Ok(Self {
                top: *vertical,
                right: *horizontal,
                bottom: *vertical,
                left: *horizontal,
            }),
            [top, horizontal, bottom] => Ok(Self {
                top: *top,
                right: *horizontal,
                bottom: *bottom,
                left: *horizontal,
            }),
            [top, right, bottom, left] => Ok(Self {
                top: *top,
                right: *right,
                bottom: *bottom,
                left: *left,
            }),
            more => Err(MarginParseError::TooManyComponents(more.len())),
        }
    }
}

impl TryFrom<String> for RootMargin {
    type Error = MarginParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RootMargin> for String {
    fn from(margin: RootMargin) -> Self {
        margin.to_string()
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}
