use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::license;

/// Fields whose presence alone marks a payload as likely AAMVA.
const SIGNAL_FIELDS: [&str; 5] = [
    "firstName",
    "lastName",
    "driversLicenseId",
    "dateOfBirth",
    "expirationDate",
];

pub const EMPTY_PAYLOAD: &str = "payload is empty";

pub const NO_MARKERS: &str = "no AAMVA markers found";

pub const NO_FIELDS: &str = "no recognizable fields";

lazy_static! {
    static ref AAMVA_HINT: Regex =
        Regex::new(r"ANSI\s+\d{6}\d{2}|\bDCS\b|\bDAC\b|\bDAQ\b").unwrap();
}

/// Best-effort interpretation of scanned text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedResult {
    pub is_likely_aamva: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub fields: BTreeMap<String, String>,
    pub warnings: Vec<String>,
}

impl ParsedResult {
    fn rejected(warning: String) -> Self {
        Self {
            warnings: vec![warning],
            ..Self::default()
        }
    }
}

/// Whether `text` carries an AAMVA header or one of the core element codes.
pub fn has_aamva_hints(text: &str) -> bool {
    AAMVA_HINT.is_match(text)
}

/// Interprets arbitrary text as AAMVA data.
///
/// Never fails: structural problems are reported as warnings on a
/// low-confidence result.
pub fn decode(text: &str) -> ParsedResult {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ParsedResult::rejected(EMPTY_PAYLOAD.to_owned());
    }

    let has_hints = has_aamva_hints(trimmed);

    let license = match license::parse(trimmed) {
        Ok(license) => license,
        Err(e) => {
            warn!(error = %e, "AAMVA parse failed");
            return ParsedResult::rejected(format!("parse failed: {e}"));
        }
    };

    let fields = license.display_fields();
    let has_signal_fields = SIGNAL_FIELDS.iter().any(|key| fields.contains_key(*key));

    let mut warnings = Vec::new();
    if !has_hints {
        warnings.push(NO_MARKERS.to_owned());
    }

    if fields.is_empty() {
        warnings.push(NO_FIELDS.to_owned());
    }

    for element in &license.unreadable_dates {
        warnings.push(format!("unreadable date in {}", element.code()));
    }

    let result = ParsedResult {
        is_likely_aamva: has_hints || has_signal_fields,
        version: license.version,
        fields,
        warnings,
    };

    debug!(
        likely = result.is_likely_aamva,
        version = result.version.as_deref(),
        fields = result.fields.len(),
        "decoded payload"
    );

    result
}
