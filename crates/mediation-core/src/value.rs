//! Scalar literals used by page attributes: lengths, text sizes, colors and
//! shapes.
//!
//! Every parser here is pure. Inputs outside the accepted grammar produce a
//! [`ValueParseError`] naming the literal, never a panic. Map-shaped forms
//! (`{r: 255, g: 0, b: 0}`, `{topLeft: 4.dp}`) are assembled by the decoder
//! from the constructors exposed here.

use crate::error::ValueParseError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

// ─── Density ─────────────────────────────────────────────────────────────

/// Scale factor converting pixel lengths into native layout units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Density(pub f32);

impl Default for Density {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Strip an ASCII suffix without caring about case: `"10.DP"` → `"10"`.
fn strip_suffix_ignore_case<'a>(input: &'a str, suffix: &str) -> Option<&'a str> {
    let split = input.len().checked_sub(suffix.len())?;
    if !input.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = input.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}

// ─── Length ──────────────────────────────────────────────────────────────

/// Unit of a [`Length`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LengthUnit {
    /// Native density-independent unit (`15.dp`, or a bare number).
    Unit,
    /// Physical pixels (`15.px`), divided by density on conversion.
    Pixel,
    /// "Not set": consumers must fall back to their own default.
    Unspecified,
}

/// A length with its unit, e.g. `12.dp`, `3.5.px` or `Unspecified`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Length {
    pub value: f32,
    pub unit: LengthUnit,
}

impl Length {
    pub const ZERO: Self = Self::units(0.0);
    pub const UNSPECIFIED: Self = Self {
        value: 0.0,
        unit: LengthUnit::Unspecified,
    };

    pub const fn units(value: f32) -> Self {
        Self {
            value,
            unit: LengthUnit::Unit,
        }
    }

    pub const fn pixels(value: f32) -> Self {
        Self {
            value,
            unit: LengthUnit::Pixel,
        }
    }

    /// Parse `unspecified` (any case), `<float>.dp`, `<float>.px` or a bare
    /// float (taken as units).
    pub fn parse(input: &str) -> Result<Self, ValueParseError> {
        let trimmed = input.trim();
        let invalid = || ValueParseError::InvalidLength {
            literal: input.to_string(),
        };

        if trimmed.eq_ignore_ascii_case("unspecified") {
            return Ok(Self::UNSPECIFIED);
        }
        if let Some(number) = strip_suffix_ignore_case(trimmed, ".dp") {
            return number.parse().map(Self::units).map_err(|_| invalid());
        }
        if let Some(number) = strip_suffix_ignore_case(trimmed, ".px") {
            return number.parse().map(Self::pixels).map_err(|_| invalid());
        }
        trimmed.parse().map(Self::units).map_err(|_| invalid())
    }

    pub fn is_unspecified(&self) -> bool {
        self.unit == LengthUnit::Unspecified
    }

    /// Convert to native units. `None` means "not set".
    pub fn to_units(self, density: Density) -> Option<f32> {
        match self.unit {
            LengthUnit::Unit => Some(self.value),
            LengthUnit::Pixel => Some(self.value / density.0),
            LengthUnit::Unspecified => None,
        }
    }
}

impl FromStr for Length {
    type Err = ValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            LengthUnit::Unit => write!(f, "{}.dp", self.value),
            LengthUnit::Pixel => write!(f, "{}.px", self.value),
            LengthUnit::Unspecified => f.write_str("Unspecified"),
        }
    }
}

// ─── Text size ───────────────────────────────────────────────────────────

/// Unit of a [`TextSize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextUnit {
    Sp,
    Pixel,
    Unspecified,
}

/// Font-relative size used by `font-size` and `line-height`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextSize {
    pub value: f32,
    pub unit: TextUnit,
}

impl TextSize {
    pub const UNSPECIFIED: Self = Self {
        value: 0.0,
        unit: TextUnit::Unspecified,
    };

    pub const fn sp(value: f32) -> Self {
        Self {
            value,
            unit: TextUnit::Sp,
        }
    }

    /// Parse `unspecified`, `<float>.sp`, `<float>.px` or a bare float (sp).
    pub fn parse(input: &str) -> Result<Self, ValueParseError> {
        let trimmed = input.trim();
        let invalid = || ValueParseError::InvalidTextSize {
            literal: input.to_string(),
        };

        if trimmed.eq_ignore_ascii_case("unspecified") {
            return Ok(Self::UNSPECIFIED);
        }
        if let Some(number) = strip_suffix_ignore_case(trimmed, ".sp") {
            return number.parse().map(Self::sp).map_err(|_| invalid());
        }
        if let Some(number) = strip_suffix_ignore_case(trimmed, ".px") {
            return number
                .parse()
                .map(|value| Self {
                    value,
                    unit: TextUnit::Pixel,
                })
                .map_err(|_| invalid());
        }
        trimmed.parse().map(Self::sp).map_err(|_| invalid())
    }

    pub fn to_sp(self, density: Density) -> Option<f32> {
        match self.unit {
            TextUnit::Sp => Some(self.value),
            TextUnit::Pixel => Some(self.value / density.0),
            TextUnit::Unspecified => None,
        }
    }
}

impl Default for TextSize {
    /// The body text size, `14.sp`.
    fn default() -> Self {
        Self::sp(14.0)
    }
}

impl fmt::Display for TextSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            TextUnit::Sp => write!(f, "{}.sp", self.value),
            TextUnit::Pixel => write!(f, "{}.px", self.value),
            TextUnit::Unspecified => f.write_str("Unspecified"),
        }
    }
}

// ─── Color ───────────────────────────────────────────────────────────────

/// 8-bit RGBA color.
///
/// [`Color::UNSPECIFIED`] is all-zero with the `unspecified` flag set and
/// means "no color", which is not the same as transparent black.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
    pub unspecified: bool,
}

/// Helper to parse a single hex digit.
fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);
    pub const RED: Self = Self::rgba(255, 0, 0, 255);
    pub const UNSPECIFIED: Self = Self {
        red: 0,
        green: 0,
        blue: 0,
        alpha: 0,
        unspecified: true,
    };

    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
            unspecified: false,
        }
    }

    /// Parse a scalar color: a name from the fixed table or a `#` hex form.
    pub fn parse(input: &str) -> Result<Self, ValueParseError> {
        let name = input.trim();
        match name.to_ascii_lowercase().as_str() {
            "white" => return Ok(Self::WHITE),
            "black" => return Ok(Self::BLACK),
            "red" => return Ok(Self::RED),
            "green" => return Ok(Self::rgba(0, 128, 0, 255)),
            "blue" => return Ok(Self::rgba(0, 0, 255, 255)),
            _ => {}
        }
        if name.starts_with('#') {
            return Self::from_hex(name);
        }
        Err(ValueParseError::UnknownColor {
            literal: input.to_string(),
        })
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA`. A 3-digit channel is expanded
    /// by duplicating its nibble.
    pub fn from_hex(hex: &str) -> Result<Self, ValueParseError> {
        let invalid = || ValueParseError::InvalidHexColor {
            literal: hex.to_string(),
        };
        let digits = hex.trim().strip_prefix('#').ok_or_else(invalid)?;
        let bytes = digits.as_bytes();
        let nibble = |i: usize| hex_val(bytes[i]).ok_or_else(invalid);
        let byte = |i: usize| Ok::<u8, ValueParseError>(nibble(i)? << 4 | nibble(i + 1)?);

        match bytes.len() {
            3 => Ok(Self::rgba(
                nibble(0)? * 17,
                nibble(1)? * 17,
                nibble(2)? * 17,
                255,
            )),
            6 => Ok(Self::rgba(byte(0)?, byte(2)?, byte(4)?, 255)),
            8 => Ok(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(invalid()),
        }
    }

    pub fn is_unspecified(&self) -> bool {
        self.unspecified
    }

    /// Normalized `[r, g, b, a]`, or `None` for [`Color::UNSPECIFIED`].
    pub fn to_rgba_f32(&self) -> Option<[f32; 4]> {
        if self.unspecified {
            return None;
        }
        Some([
            f32::from(self.red) / 255.0,
            f32::from(self.green) / 255.0,
            f32::from(self.blue) / 255.0,
            f32::from(self.alpha) / 255.0,
        ])
    }
}

impl FromStr for Color {
    type Err = ValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unspecified {
            return f.write_str("Unspecified");
        }
        write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)?;
        if self.alpha != 255 {
            write!(f, "{:02X}", self.alpha)?;
        }
        Ok(())
    }
}

// ─── Shape ───────────────────────────────────────────────────────────────

/// Per-corner radii of a rounded rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CornerRadii {
    pub top_left: Length,
    pub top_right: Length,
    pub bottom_right: Length,
    pub bottom_left: Length,
}

impl CornerRadii {
    pub const ZERO: Self = Self::uniform(Length::ZERO);

    pub const fn uniform(radius: Length) -> Self {
        Self {
            top_left: radius,
            top_right: radius,
            bottom_right: radius,
            bottom_left: radius,
        }
    }
}

/// Outline used by `background`, `border` and `clip`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub enum Shape {
    #[default]
    Rectangle,
    Circle,
    RoundedCorner(CornerRadii),
}

impl Shape {
    /// Parse a scalar shape: `rectangle`, `circle` (any case) or a length
    /// used as a uniform corner radius.
    pub fn parse(input: &str) -> Result<Self, ValueParseError> {
        match input.trim().to_ascii_lowercase().as_str() {
            "rectangle" => Ok(Self::Rectangle),
            "circle" => Ok(Self::Circle),
            _ => Length::parse(input)
                .map(|radius| Self::RoundedCorner(CornerRadii::uniform(radius)))
                .map_err(|_| ValueParseError::UnknownShape {
                    literal: input.to_string(),
                }),
        }
    }
}
