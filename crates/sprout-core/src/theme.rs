//! # Theme Palette Derivation
//!
//! Derives a full, consistent theme color set from a small set of input
//! colors: dark variants, contrast text, and tinted neutrals, written into
//! a fixed set of named slots.
//!
//! Colors are a fixed-size numeric triple ([`Rgb`]) internally; strings are
//! only parsed/formatted at the boundary. Derivation is pure and total: it
//! never fails, only falls back to documented defaults on unparseable
//! input.
//!
//! ## Determinism Note
//!
//! Relative luminance is computed in integer ten-thousandths
//! (`2126·R + 7152·G + 722·B`) so the strict `< 140` dark-background
//! cutoff is exact — a grayscale `140 140 140` card is light, `139 139
//! 139` is dark, with no floating-point drift at the boundary.

use crate::types::CustomTheme;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// PALETTE CONSTANTS
// =============================================================================

/// Fallback for unparseable primary colors.
pub const DEFAULT_PRIMARY: Rgb = Rgb([16, 185, 129]);

/// Fallback for unparseable accent colors.
pub const DEFAULT_ACCENT: Rgb = Rgb([245, 158, 11]);

/// Fallback for unparseable background colors.
pub const DEFAULT_BACKGROUND: Rgb = Rgb([255, 255, 255]);

/// Muted text on dark card backgrounds (fixed palette constant).
pub const MUTED_ON_DARK: Rgb = Rgb([156, 163, 175]);

/// Muted text on light card backgrounds (fixed palette constant).
pub const MUTED_ON_LIGHT: Rgb = Rgb([107, 114, 128]);

/// Signed per-channel delta for the `-dark` variants.
pub const DARKEN_DELTA: i16 = -30;

/// Luminance cutoff (in ten-thousandths) below which a card background
/// counts as dark. Strict comparison: exactly 140 is light.
pub const DARK_LUMINANCE_CUTOFF: u32 = 140 * 10_000;

/// Per-channel deltas for the three tinted neutrals, dark backgrounds.
const TINTS_ON_DARK: [i16; 3] = [20, 30, 40];

/// Per-channel deltas for the three tinted neutrals, light backgrounds.
const TINTS_ON_LIGHT: [i16; 3] = [-10, -20, -30];

// =============================================================================
// RGB TRIPLE
// =============================================================================

/// An sRGB color as three 0–255 channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    /// Parse a color string into a triple.
    ///
    /// Accepted forms:
    /// - canonical `"R G B"` (space-separated decimal channels)
    /// - comma-separated, optionally wrapped: `"16,185,129"`,
    ///   `"[16, 185, 129]"`, `"rgb(16, 185, 129)"`
    /// - hex with or without `#`, 3- or 6-digit: `"#10b981"`, `"fff"`
    ///
    /// Returns `None` if the input fits none of these.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim();
        let s = s
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(s);
        let s = s
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(s);
        let s = s.trim();

        if s.contains(',') {
            return Self::parse_channels(s.split(','));
        }
        if s.contains(char::is_whitespace) {
            return Self::parse_channels(s.split_whitespace());
        }
        Self::parse_hex(s)
    }

    /// Parse a color string, falling back to `default` on failure.
    #[must_use]
    pub fn parse_or(input: &str, default: Self) -> Self {
        Self::parse(input).unwrap_or(default)
    }

    fn parse_channels<'a>(parts: impl Iterator<Item = &'a str>) -> Option<Self> {
        let channels: Vec<u8> = parts
            .map(|p| p.trim().parse::<u8>())
            .collect::<Result<_, _>>()
            .ok()?;
        match channels.as_slice() {
            [r, g, b] => Some(Self([*r, *g, *b])),
            _ => None,
        }
    }

    fn parse_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        let expanded: String = match digits.len() {
            // 3-digit shorthand doubles each digit: "1af" -> "11aaff".
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return None,
        };
        let r = u8::from_str_radix(expanded.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(expanded.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(expanded.get(4..6)?, 16).ok()?;
        Some(Self([r, g, b]))
    }

    /// Format as the canonical `"R G B"` triple.
    #[must_use]
    pub fn triple(&self) -> String {
        format!("{} {} {}", self.0[0], self.0[1], self.0[2])
    }

    /// Add a signed delta to each channel, clamped to `[0, 255]`.
    #[must_use]
    pub fn adjust_brightness(self, delta: i16) -> Self {
        let mut out = [0u8; 3];
        for (slot, channel) in out.iter_mut().zip(self.0) {
            *slot = (i16::from(channel) + delta).clamp(0, 255) as u8;
        }
        Self(out)
    }

    /// Relative luminance in integer ten-thousandths
    /// (`2126·R + 7152·G + 722·B`; coefficients sum to 10000).
    #[must_use]
    pub fn luminance_ten_thousandths(self) -> u32 {
        2126 * u32::from(self.0[0]) + 7152 * u32::from(self.0[1]) + 722 * u32::from(self.0[2])
    }

    /// Whether this color counts as a dark background.
    #[must_use]
    pub fn is_dark(self) -> bool {
        self.luminance_ten_thousandths() < DARK_LUMINANCE_CUTOFF
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.triple())
    }
}

// =============================================================================
// BACKGROUND SPEC
// =============================================================================

/// The app background: a solid color or an image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackgroundSpec {
    /// A solid color in any form [`Rgb::parse`] accepts.
    Solid { color: String },
    /// An image reference, emitted as a CSS `url(...)` cover value.
    Image { reference: String },
}

impl BackgroundSpec {
    /// Format into the app-background slot value.
    #[must_use]
    fn slot_value(&self) -> String {
        match self {
            BackgroundSpec::Solid { color } => {
                let rgb = Rgb::parse_or(color, DEFAULT_BACKGROUND);
                format!("rgb({})", rgb.triple())
            }
            BackgroundSpec::Image { reference } => {
                format!("url('{reference}') center center / cover no-repeat fixed")
            }
        }
    }
}

// =============================================================================
// DERIVATION
// =============================================================================

/// Derive a full theme from input colors.
///
/// The id is injected by the caller (time-based at the app boundary) so
/// this stays a pure function of its arguments. Unparseable inputs fall
/// back to [`DEFAULT_PRIMARY`] / [`DEFAULT_ACCENT`] / [`DEFAULT_BACKGROUND`].
#[must_use]
pub fn derive_theme(
    id: impl Into<String>,
    name: impl Into<String>,
    primary: &str,
    accent: &str,
    card_background: &str,
    background: &BackgroundSpec,
) -> CustomTheme {
    let primary = Rgb::parse_or(primary, DEFAULT_PRIMARY);
    let accent = Rgb::parse_or(accent, DEFAULT_ACCENT);
    let card = Rgb::parse_or(card_background, DEFAULT_BACKGROUND);

    let card_is_dark = card.is_dark();
    let contrast = if card_is_dark {
        Rgb([255, 255, 255])
    } else {
        Rgb([0, 0, 0])
    };
    let muted = if card_is_dark {
        MUTED_ON_DARK
    } else {
        MUTED_ON_LIGHT
    };
    let tints = if card_is_dark {
        TINTS_ON_DARK
    } else {
        TINTS_ON_LIGHT
    };

    let mut colors = BTreeMap::new();
    colors.insert("--color-primary".to_string(), primary.triple());
    colors.insert(
        "--color-primary-dark".to_string(),
        primary.adjust_brightness(DARKEN_DELTA).triple(),
    );
    colors.insert("--color-accent".to_string(), accent.triple());
    colors.insert(
        "--color-accent-dark".to_string(),
        accent.adjust_brightness(DARKEN_DELTA).triple(),
    );
    colors.insert("--color-light-bg".to_string(), card.triple());
    colors.insert("--color-white".to_string(), card.triple());
    colors.insert("--color-dark-text".to_string(), contrast.triple());
    colors.insert("--color-secondary-gray".to_string(), muted.triple());
    colors.insert(
        "--color-gray-50".to_string(),
        card.adjust_brightness(tints[0]).triple(),
    );
    colors.insert(
        "--color-gray-100".to_string(),
        card.adjust_brightness(tints[1]).triple(),
    );
    colors.insert(
        "--color-gray-200".to_string(),
        card.adjust_brightness(tints[2]).triple(),
    );
    colors.insert("--color-app-background".to_string(), background.slot_value());

    CustomTheme {
        id: id.into(),
        name: name.into(),
        colors,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_canonical_triple_is_idempotent() {
        let rgb = Rgb::parse("16 185 129").expect("parse");
        assert_eq!(rgb.triple(), "16 185 129");
        // Feeding the output back in yields the same string.
        assert_eq!(Rgb::parse(&rgb.triple()).expect("reparse").triple(), "16 185 129");
    }

    #[test]
    fn parse_hex_forms() {
        assert_eq!(Rgb::parse("#10b981"), Some(Rgb([16, 185, 129])));
        assert_eq!(Rgb::parse("10b981"), Some(Rgb([16, 185, 129])));
        assert_eq!(Rgb::parse("#fff"), Some(Rgb([255, 255, 255])));
        assert_eq!(Rgb::parse("1af"), Some(Rgb([0x11, 0xaa, 0xff])));
    }

    #[test]
    fn parse_array_forms() {
        assert_eq!(Rgb::parse("16,185,129"), Some(Rgb([16, 185, 129])));
        assert_eq!(Rgb::parse("[16, 185, 129]"), Some(Rgb([16, 185, 129])));
        assert_eq!(Rgb::parse("rgb(16, 185, 129)"), Some(Rgb([16, 185, 129])));
    }

    #[test]
    fn parse_garbage_returns_none() {
        assert_eq!(Rgb::parse(""), None);
        assert_eq!(Rgb::parse("not-a-color"), None);
        assert_eq!(Rgb::parse("300 0 0"), None);
        assert_eq!(Rgb::parse("#12345"), None);
    }

    #[test]
    fn adjust_brightness_clamps_low() {
        let rgb = Rgb([10, 10, 10]).adjust_brightness(-30);
        assert_eq!(rgb.triple(), "0 0 0");
    }

    #[test]
    fn adjust_brightness_clamps_high() {
        let rgb = Rgb([250, 250, 250]).adjust_brightness(30);
        assert_eq!(rgb.triple(), "255 255 255");
    }

    #[test]
    fn luminance_cutoff_is_strict() {
        // Grayscale 140: luminance is exactly 140.0000 -> light.
        assert!(!Rgb([140, 140, 140]).is_dark());
        assert!(Rgb([139, 139, 139]).is_dark());
    }

    #[test]
    fn dark_card_gets_white_text_and_lighter_tints() {
        let theme = derive_theme(
            "t1",
            "Night",
            "16 185 129",
            "245 158 11",
            "30 41 59",
            &BackgroundSpec::Solid {
                color: "15 23 42".to_string(),
            },
        );
        assert_eq!(theme.colors["--color-dark-text"], "255 255 255");
        assert_eq!(theme.colors["--color-secondary-gray"], "156 163 175");
        assert_eq!(theme.colors["--color-gray-50"], "50 61 79");
        assert_eq!(theme.colors["--color-app-background"], "rgb(15 23 42)");
    }

    #[test]
    fn light_card_gets_black_text_and_darker_tints() {
        let theme = derive_theme(
            "t2",
            "Day",
            "#10b981",
            "#f59e0b",
            "#ffffff",
            &BackgroundSpec::Solid {
                color: "#f3f4f6".to_string(),
            },
        );
        assert_eq!(theme.colors["--color-dark-text"], "0 0 0");
        assert_eq!(theme.colors["--color-secondary-gray"], "107 114 128");
        assert_eq!(theme.colors["--color-gray-50"], "245 245 245");
        assert_eq!(theme.colors["--color-gray-200"], "225 225 225");
    }

    #[test]
    fn unparseable_inputs_fall_back() {
        let theme = derive_theme(
            "t3",
            "Fallback",
            "??",
            "??",
            "??",
            &BackgroundSpec::Solid {
                color: "??".to_string(),
            },
        );
        assert_eq!(theme.colors["--color-primary"], DEFAULT_PRIMARY.triple());
        assert_eq!(theme.colors["--color-accent"], DEFAULT_ACCENT.triple());
        assert_eq!(theme.colors["--color-light-bg"], "255 255 255");
        assert_eq!(theme.colors["--color-app-background"], "rgb(255 255 255)");
    }

    #[test]
    fn image_background_slot() {
        let theme = derive_theme(
            "t4",
            "Scenic",
            "#10b981",
            "#f59e0b",
            "#ffffff",
            &BackgroundSpec::Image {
                reference: "assets/bg/forest.jpg".to_string(),
            },
        );
        assert_eq!(
            theme.colors["--color-app-background"],
            "url('assets/bg/forest.jpg') center center / cover no-repeat fixed"
        );
    }

    #[test]
    fn derivation_includes_full_slot_set() {
        let theme = derive_theme(
            "t5",
            "Slots",
            "#10b981",
            "#f59e0b",
            "#ffffff",
            &BackgroundSpec::Solid {
                color: "#ffffff".to_string(),
            },
        );
        for slot in [
            "--color-primary",
            "--color-primary-dark",
            "--color-accent",
            "--color-accent-dark",
            "--color-light-bg",
            "--color-dark-text",
            "--color-secondary-gray",
            "--color-app-background",
            "--color-white",
            "--color-gray-50",
            "--color-gray-100",
            "--color-gray-200",
        ] {
            assert!(theme.colors.contains_key(slot), "missing slot {slot}");
        }
        assert_eq!(theme.colors.len(), 12);
    }
}
