//! AAMVA DL/ID transcript codec.
//!
//! The encoder turns a [`FieldMap`] into a version 08 [`Transcript`]; the
//! decoder interprets arbitrary scanned text and always produces a
//! [`ParsedResult`].
use std::{collections::BTreeMap, io};

use serde::{Deserialize, Serialize};

mod macros;
pub(crate) use macros::*;

pub mod catalog;
pub mod date;
pub mod decoder;
pub mod encoder;
pub mod license;
pub mod transcript;

pub use catalog::Element;
pub use decoder::{decode, ParsedResult};
pub use encoder::{
    build_from_fields, build_from_fields_on, build_from_legacy_form, LegacyForm, ValidationError,
};
pub use license::ParsedLicense;
pub use transcript::Transcript;

/// Element values indexed by three letter element code.
pub type FieldMap = BTreeMap<String, String>;

/// Caller supplied element, possibly outside of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    pub code: String,
    pub value: String,
}

impl CustomField {
    pub fn new(code: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            value: value.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.code.trim().is_empty() && self.value.trim().is_empty()
    }
}

/// Returns a copy of `base` with every entry of `layer` written over it.
pub fn overlay<K, V>(base: &FieldMap, layer: impl IntoIterator<Item = (K, V)>) -> FieldMap
where
    K: Into<String>,
    V: Into<String>,
{
    let mut result = base.clone();
    result.extend(layer.into_iter().map(|(k, v)| (k.into(), v.into())));
    result
}

/// Reads `code,value` rows.
pub fn read_custom_fields(reader: impl io::Read) -> Result<Vec<CustomField>, csv::Error> {
    csv::Reader::from_reader(reader).deserialize().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_is_last_write_wins() {
        let base: FieldMap = [("DAJ", "WA"), ("DCG", "USA")]
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();

        let merged = overlay(&base, [("DAJ", "OR"), ("DAQ", "X1")]);
        assert_eq!(merged["DAJ"], "OR");
        assert_eq!(merged["DAQ"], "X1");
        assert_eq!(merged["DCG"], "USA");

        // The base map is left untouched.
        assert_eq!(base["DAJ"], "WA");
        assert!(!base.contains_key("DAQ"));
    }

    #[test]
    fn custom_fields_from_csv() {
        let input = "code,value\nZVA,CR01\nzwb, extra \n";
        let fields = read_custom_fields(input.as_bytes()).unwrap();
        assert_eq!(
            fields,
            [CustomField::new("ZVA", "CR01"), CustomField::new("zwb", " extra ")]
        );
    }

    #[test]
    fn blank_custom_field() {
        assert!(CustomField::new(" ", "").is_blank());
        assert!(!CustomField::new("", "X").is_blank());
    }
}
