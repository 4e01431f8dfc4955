//! This library reads and writes the [AAMVA DL/ID card design standard][aamva]
//! transcripts carried by the PDF417 barcode of North American driver's
//! licenses.
//!
//! [aamva]: <https://www.aamva.org/identity/issuing-standards>
//!
//! Transcripts are built from element maps with
//! [`aamva::build_from_fields`] and interpreted with [`aamva::decode`], which
//! grades its confidence instead of failing. Barcode images are handled by
//! external collaborators, see [`barcode`].
pub use chrono::{DateTime, NaiveDate, Utc};

pub mod aamva;
pub mod barcode;
pub mod telemetry;

pub use aamva::{
    build_from_fields, build_from_legacy_form, decode, CustomField, Element, FieldMap,
    LegacyForm, ParsedResult, Transcript, ValidationError,
};
pub use barcode::{generate, generate_aamva, scan, DecodeResult, DecodeSource, SymbolOptions};
