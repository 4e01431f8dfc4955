use std::{fs, path::Path};

use dlid_barcodes::{aamva::LegacyForm, FieldMap, NaiveDate};

pub const ISSUER_ID: &str = "636026";

pub fn load_transcript(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).unwrap()
}

pub fn load_form(path: impl AsRef<Path>) -> LegacyForm {
    let content = fs::read_to_string(path).unwrap();
    serde_json::from_str(&content).unwrap()
}

pub fn fields<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> FieldMap {
    entries
        .into_iter()
        .map(|(code, value)| (code.to_owned(), value.to_owned()))
        .collect()
}

/// Every required element, without the ones filled by catalog defaults.
pub fn jane_doe() -> FieldMap {
    fields([
        ("DAQ", "X1234"),
        ("DCS", "Doe"),
        ("DAC", "Jane"),
        ("DBB", "1992-06-14"),
        ("DBA", "2030-09-01"),
        ("DAJ", "WA"),
    ])
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
}

/// Element codes of the transcript body, in order.
pub fn element_codes(transcript: &str) -> Vec<&str> {
    transcript
        .lines()
        .skip(2)
        .filter_map(|line| line.get(..3))
        .collect()
}
