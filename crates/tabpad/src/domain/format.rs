//! Font and color choices applied to every document of a window.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Terminal rendition of a font choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextFont {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
}

impl TextFont {
    /// Parse a whitespace or comma separated list such as `bold italic`.
    /// `regular` (or an empty list) clears every flag.
    pub fn parse_flags(input: &str) -> Result<Self, FormatParseError> {
        let mut font = TextFont::default();
        for flag in input
            .split(|ch: char| ch.is_whitespace() || ch == ',')
            .filter(|flag| !flag.is_empty())
        {
            match flag.to_ascii_lowercase().as_str() {
                "bold" | "b" => font.bold = true,
                "italic" | "i" => font.italic = true,
                "underline" | "u" => font.underline = true,
                "regular" | "plain" | "normal" => font = TextFont::default(),
                other => return Err(FormatParseError::UnknownFontFlag(other.to_string())),
            }
        }
        Ok(font)
    }
}

impl fmt::Display for TextFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.bold {
            flags.push("bold");
        }
        if self.italic {
            flags.push("italic");
        }
        if self.underline {
            flags.push("underline");
        }
        if flags.is_empty() {
            f.write_str("regular")
        } else {
            f.write_str(&flags.join(" "))
        }
    }
}

/// Named foreground colors available to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextColor {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    Gray,
    White,
}

impl TextColor {
    pub const ALL: [TextColor; 10] = [
        TextColor::Default,
        TextColor::Black,
        TextColor::Red,
        TextColor::Green,
        TextColor::Yellow,
        TextColor::Blue,
        TextColor::Magenta,
        TextColor::Cyan,
        TextColor::Gray,
        TextColor::White,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TextColor::Default => "default",
            TextColor::Black => "black",
            TextColor::Red => "red",
            TextColor::Green => "green",
            TextColor::Yellow => "yellow",
            TextColor::Blue => "blue",
            TextColor::Magenta => "magenta",
            TextColor::Cyan => "cyan",
            TextColor::Gray => "gray",
            TextColor::White => "white",
        }
    }
}

impl fmt::Display for TextColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextColor {
    type Err = FormatParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        let normalized = if normalized == "grey" {
            "gray".to_string()
        } else {
            normalized
        };
        TextColor::ALL
            .into_iter()
            .find(|color| color.as_str() == normalized)
            .ok_or(FormatParseError::UnknownColor(normalized))
    }
}

/// Formatting shared by all documents of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextFormat {
    pub font: TextFont,
    pub color: TextColor,
}

/// Error returned when a font flag or color name is not recognised.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum FormatParseError {
    #[error("unknown font flag '{0}'")]
    UnknownFontFlag(String),
    #[error("unknown color '{0}'")]
    UnknownColor(String),
}
