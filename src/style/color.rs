//! Hexadecimal colors of the caption style.
use nom::{
    bytes::complete::take_while_m_n,
    character::complete::char,
    combinator::{all_consuming, map_res, opt},
    error::Error,
    sequence::preceded,
    IResult, Parser,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::StyleError;

/// Parse a single byte hexadecimal byte.
fn hex_primary(input: &str) -> IResult<&str, u8> {
    map_res(
        take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()),
        |hex: &str| u8::from_str_radix(hex, 16),
    )
    .parse(input)
}

/// Parse a 3-byte hexadecimal `RGB` color.
fn hex_rgb(input: &str) -> IResult<&str, Color> {
    let (input, (r, g, b)) = (hex_primary, hex_primary, hex_primary).parse(input)?;
    Ok((input, Color { r, g, b }))
}

/// Parse a `RGB` color followed by an optional alpha byte.
fn hex_rgba(input: &str) -> IResult<&str, BackgroundColor> {
    let (input, (color, alpha)) = (hex_rgb, opt(hex_primary)).parse(input)?;
    Ok((
        input,
        BackgroundColor {
            color,
            alpha: alpha.unwrap_or(u8::MAX),
        },
    ))
}

/// Parse `#` followed by `parser`, rejecting any leftover.
fn parse_hash_prefixed<'a, O, P>(input: &'a str, parser: P) -> Result<O, StyleError>
where
    P: Parser<&'a str, Output = O, Error = Error<&'a str>>,
{
    all_consuming(preceded(char('#'), parser))
        .parse(input.trim())
        .map(|(_, color)| color)
        .map_err(|_err| StyleError::InvalidColor(input.into()))
}

/// An opaque color, written `#RRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// `#FFFFFF`
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);
    /// `#000000`
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Create a color from its channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hash_prefixed(s, hex_rgb)
    }
}

impl TryFrom<String> for Color {
    type Error = StyleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_string()
    }
}

/// A translucent color, written `#RRGGBBAA`: a `#RRGGBB` base color with the
/// alpha appended as two hexadecimal digits.
///
/// The base color and the alpha are edited independently, so a color picker
/// that only knows `#RRGGBB` doesn't reset the transparency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BackgroundColor {
    color: Color,
    alpha: u8,
}

impl BackgroundColor {
    /// Create a background color from a base color and an alpha value.
    #[must_use]
    pub const fn new(color: Color, alpha: u8) -> Self {
        Self { color, alpha }
    }

    /// The base color, without alpha.
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// The alpha value, `0xFF` is opaque.
    #[must_use]
    pub const fn alpha(&self) -> u8 {
        self.alpha
    }

    /// The alpha as the two hexadecimal digits suffix (`AA`).
    #[must_use]
    pub fn alpha_suffix(&self) -> String {
        format!("{:02X}", self.alpha)
    }

    /// Change the base color, keeping the alpha.
    #[must_use]
    pub const fn with_color(self, color: Color) -> Self {
        Self { color, ..self }
    }

    /// Change the alpha, keeping the base color.
    #[must_use]
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self { alpha, ..self }
    }
}

impl fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02X}", self.color, self.alpha)
    }
}

impl FromStr for BackgroundColor {
    type Err = StyleError;

    /// Accept `#RRGGBBAA`, or `#RRGGBB` for an opaque color.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hash_prefixed(s, hex_rgba)
    }
}

impl TryFrom<String> for BackgroundColor {
    type Error = StyleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BackgroundColor> for String {
    fn from(value: BackgroundColor) -> Self {
        value.to_string()
    }
}
