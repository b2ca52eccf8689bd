//! Presentation of the displayed caption.
//!
//! One [`Style`] applies to every caption of a video, whatever the language
//! track. [`Style::resolve`] turns it into the [`RenderAttributes`] used to
//! draw the active caption over the video.
mod color;

pub use color::{BackgroundColor, Color};

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Error for style handling.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StyleError {
    /// Not a `#RRGGBB` (or `#RRGGBBAA` for backgrounds) color.
    #[error("Invalid color '{0}'")]
    InvalidColor(String),

    /// Font family not supported.
    #[error("Unsupported font '{0}'")]
    UnknownFont(String),

    /// Not one of `small`, `medium`, `large`.
    #[error("Unknown caption size '{0}'")]
    UnknownSize(String),

    /// Not one of `top`, `middle`, `bottom`.
    #[error("Unknown caption position '{0}'")]
    UnknownPosition(String),
}

/// Supported font families.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFamily {
    /// Arial
    #[default]
    Arial,
    /// Helvetica
    Helvetica,
    /// Georgia
    Georgia,
    /// Verdana
    Verdana,
    /// Tahoma
    Tahoma,
    /// Trebuchet MS
    #[serde(rename = "Trebuchet MS")]
    TrebuchetMs,
}

impl FontFamily {
    /// Every supported font, in the order they are offered.
    pub const ALL: [Self; 6] = [
        Self::Arial,
        Self::Helvetica,
        Self::Georgia,
        Self::Verdana,
        Self::Tahoma,
        Self::TrebuchetMs,
    ];

    /// Family name, as understood by the renderer.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Arial => "Arial",
            Self::Helvetica => "Helvetica",
            Self::Georgia => "Georgia",
            Self::Verdana => "Verdana",
            Self::Tahoma => "Tahoma",
            Self::TrebuchetMs => "Trebuchet MS",
        }
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FontFamily {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|font| font.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| StyleError::UnknownFont(s.into()))
    }
}

/// Caption text size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    /// 16 pixels.
    Small,
    /// 24 pixels.
    #[default]
    Medium,
    /// 32 pixels.
    Large,
}

impl FontSize {
    /// Every size, from the smallest.
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    /// Font size in pixels.
    #[must_use]
    pub const fn px(self) -> u32 {
        match self {
            Self::Small => 16,
            Self::Medium => 24,
            Self::Large => 32,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FontSize {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|size| size.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| StyleError::UnknownSize(s.into()))
    }
}

/// Vertical placement of the caption over the video.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Near the top edge.
    Top,
    /// Vertically centered.
    Middle,
    /// Near the bottom edge.
    #[default]
    Bottom,
}

impl Position {
    /// Every position, from the top.
    pub const ALL: [Self; 3] = [Self::Top, Self::Middle, Self::Bottom];

    const fn name(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Middle => "middle",
            Self::Bottom => "bottom",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Position {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|position| position.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| StyleError::UnknownPosition(s.into()))
    }
}

/// Distance between the caption box and the closest video edge, in percent of
/// the video height.
pub const EDGE_OFFSET_PERCENT: u8 = 10;

/// Where the caption box is anchored. Horizontally it is always centered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    /// Box top at [`EDGE_OFFSET_PERCENT`] from the top edge.
    Top,
    /// Box center at the video center.
    Middle,
    /// Box bottom at [`EDGE_OFFSET_PERCENT`] from the bottom edge.
    Bottom,
}

impl Anchor {
    /// Anchor of the caption box for `position`.
    #[must_use]
    pub const fn of(position: Position) -> Self {
        match position {
            Position::Top => Self::Top,
            Position::Middle => Self::Middle,
            Position::Bottom => Self::Bottom,
        }
    }

    /// CSS positioning rules of the caption box.
    #[must_use]
    pub fn css(self) -> String {
        match self {
            Self::Top => format!(
                "left: 50%; top: {EDGE_OFFSET_PERCENT}%; bottom: auto; transform: translateX(-50%);"
            ),
            Self::Middle => "left: 50%; top: 50%; transform: translate(-50%, -50%);".to_owned(),
            Self::Bottom => format!(
                "left: 50%; bottom: {EDGE_OFFSET_PERCENT}%; top: auto; transform: translateX(-50%);"
            ),
        }
    }
}

impl From<Position> for Anchor {
    fn from(value: Position) -> Self {
        Self::of(value)
    }
}

/// Everything a renderer needs to draw the active caption.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderAttributes {
    /// Font family name.
    pub font_family: &'static str,
    /// Font size in pixels.
    pub font_size_px: u32,
    /// Text color.
    pub color: Color,
    /// Box color, with alpha.
    pub background_color: BackgroundColor,
    /// Box placement.
    pub anchor: Anchor,
}

impl RenderAttributes {
    /// Inner spacing of the caption box.
    pub const PADDING: &'static str = "8px 16px";
    /// Corner radius of the caption box.
    pub const BORDER_RADIUS: &'static str = "4px";
    /// Maximum width of the caption box, relative to the video width.
    pub const MAX_WIDTH: &'static str = "80%";

    /// CSS positioning rules of the caption box.
    #[must_use]
    pub fn anchor_css(&self) -> String {
        self.anchor.css()
    }

    /// Full CSS declaration block of the caption box.
    #[must_use]
    pub fn to_css(&self) -> String {
        let family = if self.font_family.contains(' ') {
            format!("\"{}\"", self.font_family)
        } else {
            self.font_family.to_owned()
        };
        format!(
            "font-family: {family}; font-size: {}px; color: {}; background-color: {}; \
             position: absolute; {} padding: {}; border-radius: {}; max-width: {}; \
             text-align: center;",
            self.font_size_px,
            self.color,
            self.background_color,
            self.anchor_css(),
            Self::PADDING,
            Self::BORDER_RADIUS,
            Self::MAX_WIDTH,
        )
    }
}

/// A style attribute, for edits coming as text from a form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleProperty {
    /// [`Style::font`]
    Font,
    /// [`Style::size`]
    Size,
    /// [`Style::color`]
    Color,
    /// [`Style::background_color`]
    BackgroundColor,
    /// [`Style::position`]
    Position,
}

/// Presentation of the captions of a video.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Style {
    /// Font family.
    pub font: FontFamily,
    /// Text size.
    pub size: FontSize,
    /// Text color.
    pub color: Color,
    /// Box color, with alpha.
    pub background_color: BackgroundColor,
    /// Vertical placement.
    pub position: Position,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            font: FontFamily::Arial,
            size: FontSize::Medium,
            color: Color::WHITE,
            background_color: BackgroundColor::new(Color::BLACK, 0xaa),
            position: Position::Bottom,
        }
    }
}

impl Style {
    /// Resolve the render attributes of the style.
    #[must_use]
    pub const fn resolve(&self) -> RenderAttributes {
        RenderAttributes {
            font_family: self.font.name(),
            font_size_px: self.size.px(),
            color: self.color,
            background_color: self.background_color,
            anchor: Anchor::of(self.position),
        }
    }

    /// Set `property` from its textual value.
    ///
    /// A `#RRGGBB` value for [`StyleProperty::BackgroundColor`] only changes
    /// the base color and keeps the alpha; `#RRGGBBAA` changes both.
    ///
    /// # Errors
    ///
    /// Will return the matching `StyleError` if `value` can't be parsed; the
    /// style is left unchanged.
    pub fn apply(&mut self, property: StyleProperty, value: &str) -> Result<(), StyleError> {
        match property {
            StyleProperty::Font => self.font = value.parse()?,
            StyleProperty::Size => self.size = value.parse()?,
            StyleProperty::Color => self.color = value.parse()?,
            StyleProperty::BackgroundColor => {
                self.background_color = match value.parse::<Color>() {
                    Ok(color) => self.background_color.with_color(color),
                    Err(_) => value.parse()?,
                };
            }
            StyleProperty::Position => self.position = value.parse()?,
        }
        Ok(())
    }
}
