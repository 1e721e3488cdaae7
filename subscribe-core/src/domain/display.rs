//! Display value objects: card color and currency formatting

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::result::Error;

/// RGBA card color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const RED: Color = Color::rgb(0xFF, 0x3B, 0x30);
    pub const ORANGE: Color = Color::rgb(0xFF, 0x95, 0x00);
    pub const YELLOW: Color = Color::rgb(0xFF, 0xCC, 0x00);
    pub const GREEN: Color = Color::rgb(0x34, 0xC7, 0x59);
    pub const BLUE: Color = Color::rgb(0x00, 0x7A, 0xFF);
    pub const PURPLE: Color = Color::rgb(0xAF, 0x52, 0xDE);
    pub const PINK: Color = Color::rgb(0xFF, 0x2D, 0x55);
    pub const GRAY: Color = Color::rgb(0x8E, 0x8E, 0x93);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);

    fn named(name: &str) -> Option<Self> {
        let color = match name {
            "red" => Self::RED,
            "orange" => Self::ORANGE,
            "yellow" => Self::YELLOW,
            "green" => Self::GREEN,
            "blue" => Self::BLUE,
            "purple" => Self::PURPLE,
            "pink" => Self::PINK,
            "gray" | "grey" => Self::GRAY,
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            _ => return None,
        };
        Some(color)
    }

    /// Hex form without alpha, for terminals and previews
    pub fn to_rgb_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLUE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Color {
    type Err = Error;

    /// Parses `#RGB`, `#RRGGBB`, `#RRGGBBAA` (leading `#` optional) or a
    /// color name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_lowercase();
        if let Some(color) = Self::named(&trimmed) {
            return Ok(color);
        }

        let invalid = || Error::validation(format!("Invalid color '{}'", s.trim()));
        let hex = trimmed.strip_prefix('#').unwrap_or(&trimmed);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        match hex.len() {
            3 => {
                let nibble = |i: usize| {
                    u8::from_str_radix(&hex[i..i + 1], 16)
                        .map(|v| v * 0x11)
                        .map_err(|_| invalid())
                };
                Ok(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(invalid()),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Where the currency unit goes relative to the amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitPosition {
    Prefix,
    Suffix,
}

/// How amounts (in minor units) are rendered for people
///
/// Missing fields take their default when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CurrencyFormat {
    pub unit: String,
    pub position: UnitPosition,
    pub grouping_separator: String,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            unit: "원".to_string(),
            position: UnitPosition::Suffix,
            grouping_separator: ",".to_string(),
        }
    }
}

impl CurrencyFormat {
    /// Format an amount, e.g. `13900` -> `13,900원`
    pub fn format(&self, amount: i64) -> String {
        let digits = amount.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push_str(&self.grouping_separator);
            }
            grouped.push(ch);
        }

        let sign = if amount < 0 { "-" } else { "" };
        match self.position {
            UnitPosition::Prefix => format!("{}{}{}", sign, self.unit, grouped),
            UnitPosition::Suffix => format!("{}{}{}", sign, grouped, self.unit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parse_forms() {
        assert_eq!("#FF0000".parse::<Color>().unwrap(), Color::rgb(255, 0, 0));
        assert_eq!("0f0".parse::<Color>().unwrap(), Color::rgb(0, 255, 0));
        assert_eq!("#00000080".parse::<Color>().unwrap(), Color::rgba(0, 0, 0, 0x80));
        assert_eq!("Blue".parse::<Color>().unwrap(), Color::BLUE);
    }

    #[test]
    fn test_color_rejects_garbage() {
        assert!("#12345".parse::<Color>().is_err());
        assert!("#GGGGGG".parse::<Color>().is_err());
        assert!("teal-ish".parse::<Color>().is_err());
    }

    #[test]
    fn test_color_serializes_as_hex_string() {
        let json = serde_json::to_string(&Color::BLUE).unwrap();
        assert_eq!(json, "\"#007AFFFF\"");
    }

    #[test]
    fn test_currency_default_format() {
        let fmt = CurrencyFormat::default();
        assert_eq!(fmt.format(13900), "13,900원");
        assert_eq!(fmt.format(0), "0원");
        assert_eq!(fmt.format(1_234_567), "1,234,567원");
    }

    #[test]
    fn test_currency_partial_json_fills_defaults() {
        let fmt: CurrencyFormat = serde_json::from_str(r#"{ "unit": "$" }"#).unwrap();
        assert_eq!(fmt.unit, "$");
        assert_eq!(fmt.position, UnitPosition::Suffix);
        assert_eq!(fmt.grouping_separator, ",");
    }

    #[test]
    fn test_currency_prefix_format() {
        let fmt = CurrencyFormat {
            unit: "$".to_string(),
            position: UnitPosition::Prefix,
            grouping_separator: ",".to_string(),
        };
        assert_eq!(fmt.format(999), "$999");
        assert_eq!(fmt.format(-1000), "-$1,000");
    }
}
