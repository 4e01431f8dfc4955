//! PDF417 collaborators.
//!
//! Image decoding and rendering happen outside of this crate. The traits
//! below describe those collaborators; [`scan`] and [`generate`] wire them to
//! the AAMVA codec.
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aamva::{self, CustomField, FieldMap, ParsedResult, ValidationError};

/// Barcode format reported for every decoded symbol.
pub const PDF_417: &str = "PDF_417";

pub const MIN_SCALE: u32 = 1;
pub const MAX_SCALE: u32 = 12;

pub const MIN_HEIGHT: u32 = 3;
pub const MAX_HEIGHT: u32 = 40;

pub const MIN_PADDING: u32 = 0;
pub const MAX_PADDING: u32 = 30;

/// Rendering options handed to a [`BarcodeEncoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SymbolOptions {
    /// Module width, in pixels.
    pub scale: u32,

    /// Row height, in modules.
    pub height: u32,

    /// Quiet zone, in pixels.
    pub padding: u32,

    pub columns: Option<u32>,
    pub rows: Option<u32>,
    pub error_correction_level: Option<u8>,
    pub compact: bool,
}

impl Default for SymbolOptions {
    fn default() -> Self {
        Self {
            scale: 3,
            height: 9,
            padding: 8,
            columns: None,
            rows: None,
            error_correction_level: None,
            compact: false,
        }
    }
}

impl SymbolOptions {
    /// Brings the dimensions back into their supported ranges.
    pub fn clamped(self) -> Self {
        Self {
            scale: self.scale.clamp(MIN_SCALE, MAX_SCALE),
            height: self.height.clamp(MIN_HEIGHT, MAX_HEIGHT),
            padding: self.padding.clamp(MIN_PADDING, MAX_PADDING),
            ..self
        }
    }
}

/// Recovers the text carried by a barcode image.
pub trait BarcodeDecoder<I: ?Sized> {
    type Error: fmt::Display;

    fn decode_text(&self, input: &I) -> Result<String, Self::Error>;
}

/// Renders a payload as a PDF417 symbol.
pub trait BarcodeEncoder {
    type Image;
    type Error: fmt::Display;

    fn encode(&self, payload: &str, options: &SymbolOptions) -> Result<Self::Image, Self::Error>;
}

/// Where a decoded symbol came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecodeSource {
    Camera,
    ImageUpload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodeResult {
    pub raw_text: String,
    pub format: String,
    pub source: DecodeSource,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed: Option<ParsedResult>,
}

/// Failure reported by an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct CollaboratorError(pub String);

impl CollaboratorError {
    fn from_display(e: impl fmt::Display) -> Self {
        Self(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error("payload is empty")]
    EmptyPayload,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("barcode encoder failed: {0}")]
    Encoder(CollaboratorError),
}

/// Decodes `input` and interprets the recovered text.
pub fn scan<I, D>(
    decoder: &D,
    input: &I,
    source: DecodeSource,
) -> Result<DecodeResult, CollaboratorError>
where
    I: ?Sized,
    D: BarcodeDecoder<I>,
{
    scan_at(decoder, input, source, Utc::now())
}

/// Same as [`scan`], stamping the result with `timestamp`.
pub fn scan_at<I, D>(
    decoder: &D,
    input: &I,
    source: DecodeSource,
    timestamp: DateTime<Utc>,
) -> Result<DecodeResult, CollaboratorError>
where
    I: ?Sized,
    D: BarcodeDecoder<I>,
{
    let raw_text = decoder
        .decode_text(input)
        .map_err(CollaboratorError::from_display)?;
    let parsed = aamva::decode(&raw_text);
    debug!(?source, likely = parsed.is_likely_aamva, "scanned symbol");

    Ok(DecodeResult {
        raw_text,
        format: PDF_417.to_owned(),
        source,
        timestamp,
        parsed: Some(parsed),
    })
}

/// Renders `payload` with clamped `options`.
pub fn generate<E: BarcodeEncoder>(
    encoder: &E,
    payload: &str,
    options: &SymbolOptions,
) -> Result<E::Image, GenerateError> {
    if payload.trim().is_empty() {
        return Err(GenerateError::EmptyPayload);
    }

    encoder
        .encode(payload, &options.clamped())
        .map_err(|e| GenerateError::Encoder(CollaboratorError::from_display(e)))
}

/// Builds an AAMVA transcript and renders it.
///
/// Validation failures are reported before the encoder is called.
pub fn generate_aamva<E: BarcodeEncoder>(
    encoder: &E,
    issuer_id: &str,
    fields: &FieldMap,
    custom_fields: &[CustomField],
    options: &SymbolOptions,
) -> Result<E::Image, GenerateError> {
    let transcript = aamva::build_from_fields(issuer_id, fields, custom_fields)?;
    generate(encoder, transcript.as_str(), options)
}
