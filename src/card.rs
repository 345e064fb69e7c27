//! # Card Model
//!
//! Serde types mirroring the declarative JSON payload an embedding host
//! pushes through [`crate::host::CardSession::draw_new_content`].
//!
//! All positional and size fields are expressed in the fixed 1200-unit-wide
//! design space (see [`crate::layout`]). The spec is owned by the host:
//! rendering takes a shared reference for one cycle and never mutates it.
//! Missing or malformed optional fields are not validated here — behavior
//! degrades to documented defaults, matching the trust model of the host
//! boundary.

use serde::{Deserialize, Serialize};

/// Top-level card description.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSpec {
    /// The variable content: profile image URI, barcode payload, name text.
    pub data: CardData,
    /// Hex color (solid fill) or image URI — [`crate::color::is_hex_color`]
    /// decides which.
    pub background: String,
    /// Placement and styling of the barcode symbol.
    pub barcode: BarcodeBox,
    /// Placement and styling of the profile photo. Absent = hidden.
    #[serde(default)]
    pub image: Option<ImageBox>,
    /// Placement and typography of the name text.
    pub name: NameBox,
}

impl CardSpec {
    /// Parse a card spec from the host's JSON payload.
    pub fn from_json(json: &str) -> Result<Self, crate::CardError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Per-card content values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardData {
    /// Profile image URI.
    pub image: String,
    /// Barcode payload string.
    pub barcode: String,
    /// Display name text.
    pub name: String,
}

/// Barcode placement box, in design units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Bar ink color (default `#000000`).
    #[serde(default)]
    pub color: Option<String>,
    /// Quiet-zone fill behind the bars (default `#ffffff`).
    #[serde(default)]
    pub background: Option<String>,
}

/// Profile photo box, in design units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Corner radius (default 0 = square corners).
    #[serde(default)]
    pub border_radius: Option<f64>,
    /// Border ring thickness (default 0 = no border).
    #[serde(default)]
    pub border_width: Option<f64>,
    /// Border ring color; only consulted when `border_width` is set.
    #[serde(default)]
    pub border_color: Option<String>,
}

/// Name text box, in design units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    /// Absent = auto height (as many lines as the text wraps to).
    #[serde(default)]
    pub height: Option<f64>,
    pub color: String,
    pub font_size: f64,
    /// Advisory only — the raster pipeline ships one bitmap face.
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default)]
    pub text_align: TextAlign,
    #[serde(default)]
    pub text_vertical_align: VerticalAlign,
    #[serde(default)]
    pub text_shadow_color: Option<String>,
    #[serde(default)]
    pub text_shadow_offset: Option<ShadowOffset>,
    #[serde(default)]
    pub text_shadow_radius: Option<f64>,
    /// Wrapped lines beyond this count are dropped.
    #[serde(default)]
    pub max_number_lines: Option<usize>,
}

/// Shadow offset, in design units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct ShadowOffset {
    pub width: f64,
    pub height: f64,
}

/// Font weight keywords and the numeric CSS ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontWeight {
    #[serde(rename = "bold")]
    Bold,
    #[default]
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "100")]
    W100,
    #[serde(rename = "200")]
    W200,
    #[serde(rename = "300")]
    W300,
    #[serde(rename = "400")]
    W400,
    #[serde(rename = "500")]
    W500,
    #[serde(rename = "600")]
    W600,
    #[serde(rename = "700")]
    W700,
    #[serde(rename = "800")]
    W800,
    #[serde(rename = "900")]
    W900,
}

impl FontWeight {
    /// Weights 600 and up render with a bold double-strike.
    pub fn is_bold(self) -> bool {
        matches!(
            self,
            FontWeight::Bold | FontWeight::W600 | FontWeight::W700 | FontWeight::W800 | FontWeight::W900
        )
    }
}

/// Horizontal text alignment. `auto` and `justify` fall back to left in the
/// raster pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Auto,
    Center,
    Left,
    Right,
    Justify,
}

/// Vertical text alignment within the name box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    #[default]
    Top,
    Center,
    Bottom,
}
