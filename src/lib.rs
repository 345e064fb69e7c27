//! # Credencial - ID-Card Rendering Library
//!
//! Credencial renders a styled "ID-card" visual (background, profile photo,
//! name text, 1D barcode) from a declarative JSON description and exports it
//! as a PNG snapshot for an embedding host. It provides:
//!
//! - **Layout scaling**: a fixed 1200-unit design space mapped to any
//!   viewport width
//! - **Barcode encoding**: symbology module strings turned into vector bar
//!   geometry
//! - **Raster rendering**: pixel-buffer compositing of the full card
//! - **Host bridge**: the two-entry-point contract an embedding host calls
//!
//! ## Quick Start
//!
//! ```no_run
//! use credencial::{CardSpec, CardSession, host::NullSink};
//!
//! # async fn example() -> Result<(), credencial::CardError> {
//! let spec: CardSpec = serde_json::from_str(r##"{
//!     "data": { "image": "", "barcode": "12345", "name": "Ada Lovelace" },
//!     "background": "#112233",
//!     "barcode": { "x": 100, "y": 520, "width": 1000, "height": 247 },
//!     "name": { "x": 100, "y": 420, "width": 1000, "color": "#ffffff", "fontSize": 48 }
//! }"##)?;
//!
//! let mut session = CardSession::new(600.0, Box::new(NullSink));
//! session.draw_new_content(spec);
//! let data_uri = session.get_node_image().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`layout`] | Viewport scale factor and design-unit conversion |
//! | [`color`] | Hex-color classification and parsing |
//! | [`card`] | The declarative `CardSpec` data model |
//! | [`barcode`] | Bar run-length encoder and memo cache |
//! | [`render`] | Raster compositing and PNG export |
//! | [`resolve`] | Background/profile image resolution |
//! | [`host`] | Host-facing session and event channel |
//! | [`server`] | HTTP embedding surface |
//! | [`error`] | Error types |

pub mod barcode;
pub mod card;
pub mod color;
pub mod error;
pub mod host;
pub mod layout;
pub mod render;
pub mod resolve;
pub mod server;

// Re-exports for convenience
pub use card::CardSpec;
pub use error::CardError;
pub use host::CardSession;
pub use layout::ScaleContext;
