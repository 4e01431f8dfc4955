use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{
    catalog,
    date::{self, DateLayout},
    overlay,
    transcript::{Header, AAMVA_VERSION},
    CustomField, Element, FieldMap, Transcript,
};

const ISSUER_ID_LEN: usize = 6;

const CODE_LEN: usize = 3;

/// Legacy form default jurisdiction.
const DEFAULT_JURISDICTION: &str = "WA";

const DEFAULT_COUNTRY: &str = "USA";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("missing required element `{0}`")]
    MissingElement(String),

    #[error("issuer id must be exactly 6 digits, found `{0}`")]
    InvalidIssuerId(String),

    #[error("element `{code}` must use YYYY-MM-DD or MMDDYYYY format, found `{value}`")]
    InvalidDate { code: String, value: String },

    #[error("element code `{0}` must be exactly 3 letters or digits")]
    InvalidFieldCode(String),
}

impl ValidationError {
    /// Name of the offending field, or code of the offending element.
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField(name) => name,
            Self::MissingElement(code) => code,
            Self::InvalidIssuerId(_) => "issuer id",
            Self::InvalidDate { code, .. } => code,
            Self::InvalidFieldCode(code) => code,
        }
    }
}

/// Flat generator form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyForm {
    pub first_name: String,
    pub last_name: String,
    pub dob: String,
    pub expiry: String,
    pub document_number: String,
    #[serde(alias = "issuerIIN")]
    pub issuer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jurisdiction_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

/// Strips everything but letters and digits, then checks for six digits.
pub fn normalize_issuer_id(issuer_id: &str) -> Result<u32, ValidationError> {
    let normalized: String = issuer_id
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if normalized.len() != ISSUER_ID_LEN || !normalized.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidIssuerId(normalized));
    }

    normalized
        .parse()
        .map_err(|_| ValidationError::InvalidIssuerId(normalized))
}

pub fn normalize_code(code: &str) -> Result<String, ValidationError> {
    let normalized = code.trim().to_ascii_uppercase();
    if normalized.len() != CODE_LEN || !normalized.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidFieldCode(normalized));
    }

    Ok(normalized)
}

/// Normalizes one element value, or returns `None` when it must be omitted.
///
/// Dates are packed with `layout`.
pub fn normalize_value(
    code: &str,
    value: &str,
    layout: DateLayout,
) -> Result<Option<String>, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    if catalog::is_date_code(code) {
        return date::to_packed(value, layout)
            .map(Some)
            .ok_or_else(|| ValidationError::InvalidDate {
                code: code.to_owned(),
                value: value.to_owned(),
            });
    }

    Ok(Some(value.to_uppercase()))
}

/// Maps free-form sex values onto `1` (male), `2` (female) or `9`.
pub fn normalize_sex(value: Option<&str>) -> &'static str {
    let normalized = value.unwrap_or_default().trim().to_ascii_uppercase();
    match normalized.as_str() {
        "1" | "M" | "MALE" => "1",
        "2" | "F" | "FEMALE" => "2",
        _ => "9",
    }
}

fn normalize_codes<'a>(
    entries: impl IntoIterator<Item = (&'a String, &'a String)>,
) -> Result<Vec<(String, String)>, ValidationError> {
    entries
        .into_iter()
        .map(|(code, value)| Ok((normalize_code(code)?, value.clone())))
        .collect()
}

/// Builds a version 08 transcript, using today's date (UTC) as the default
/// issue date.
pub fn build_from_fields(
    issuer_id: &str,
    fields: &FieldMap,
    custom_fields: &[CustomField],
) -> Result<Transcript, ValidationError> {
    build_from_fields_on(Utc::now().date_naive(), issuer_id, fields, custom_fields)
}

/// Builds a version 08 transcript.
///
/// Values are layered over the catalog defaults, caller fields first and
/// custom fields last. Empty values are omitted, dates are packed and every
/// other value is uppercased. When no issue date (`DBD`) is given, `today` is
/// used.
pub fn build_from_fields_on(
    today: NaiveDate,
    issuer_id: &str,
    fields: &FieldMap,
    custom_fields: &[CustomField],
) -> Result<Transcript, ValidationError> {
    encode_fields(today, issuer_id, fields, custom_fields)
        .inspect_err(|e| warn!(error = %e, "rejected AAMVA fields"))
}

fn encode_fields(
    today: NaiveDate,
    issuer_id: &str,
    fields: &FieldMap,
    custom_fields: &[CustomField],
) -> Result<Transcript, ValidationError> {
    let issuer_id = normalize_issuer_id(issuer_id)?;

    let fields = normalize_codes(fields)?;
    let custom_fields = normalize_codes(
        custom_fields
            .iter()
            .filter(|f| !f.is_blank())
            .map(|f| (&f.code, &f.value)),
    )?;
    let merged = overlay(&overlay(&catalog::defaults(), fields), custom_fields);

    let country = merged
        .get(Element::Country.code())
        .map(|v| v.trim().to_uppercase());
    let layout = DateLayout::for_document(Some(AAMVA_VERSION), country.as_deref());

    let mut normalized = FieldMap::new();
    for (code, value) in &merged {
        if let Some(value) = normalize_value(code, value, layout)? {
            normalized.insert(code.clone(), value);
        }
    }

    normalized
        .entry(Element::IssueDate.code().to_owned())
        .or_insert_with(|| date::format_packed(today, layout));

    if let Some(missing) = catalog::required_codes()
        .iter()
        .find(|code| !normalized.contains_key(**code))
    {
        return Err(ValidationError::MissingElement((*missing).to_owned()));
    }

    let order = catalog::canonical_order(normalized.keys().cloned());
    let transcript = Transcript::encode(
        &Header::new(issuer_id),
        order
            .iter()
            .map(|code| (code.as_str(), normalized[code].as_str())),
    );

    debug!(issuer_id, elements = order.len(), "built AAMVA transcript");
    Ok(transcript)
}

fn require<'a>(name: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::MissingField(name));
    }

    Ok(value)
}

/// Builds a transcript from the flat generator form.
pub fn build_from_legacy_form(form: &LegacyForm) -> Result<Transcript, ValidationError> {
    let first_name = require("first name", &form.first_name)?;
    let last_name = require("last name", &form.last_name)?;
    let document_number = require("document number", &form.document_number)?;

    let jurisdiction = form
        .jurisdiction_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .unwrap_or(DEFAULT_JURISDICTION);

    let fields: FieldMap = [
        (Element::GivenName, first_name),
        (Element::LastName, last_name),
        (Element::DateOfBirth, form.dob.as_str()),
        (Element::ExpirationDate, form.expiry.as_str()),
        (Element::DocumentNumber, document_number),
        (Element::DocumentDiscriminator, document_number),
        (Element::Sex, normalize_sex(form.sex.as_deref())),
        (
            Element::MailingStreet1,
            form.address1.as_deref().unwrap_or_default(),
        ),
        (Element::MailingCity, form.city.as_deref().unwrap_or_default()),
        (Element::MailingJurisdictionCode, jurisdiction),
        (
            Element::MailingPostalCode,
            form.postal_code.as_deref().unwrap_or_default(),
        ),
        (Element::Country, DEFAULT_COUNTRY),
    ]
    .into_iter()
    .map(|(e, v)| (e.code().to_owned(), v.to_owned()))
    .collect();

    build_from_fields(&form.issuer_id, &fields, &[])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(entries: &[(&str, &str)]) -> FieldMap {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    fn jane_doe() -> FieldMap {
        fields(&[
            ("DAQ", "X1234"),
            ("DCS", "Doe"),
            ("DAC", "Jane"),
            ("DBB", "1992-06-14"),
            ("DBA", "2030-09-01"),
            ("DAJ", "WA"),
        ])
    }

    #[test]
    fn issuer_id_normalization() {
        assert_eq!(normalize_issuer_id(" 636-026 "), Ok(636026));
        assert_eq!(
            normalize_issuer_id("ABC123"),
            Err(ValidationError::InvalidIssuerId("ABC123".to_owned()))
        );
        assert!(normalize_issuer_id("63602").is_err());
        assert!(normalize_issuer_id("6360261").is_err());
    }

    #[test]
    fn code_normalization() {
        assert_eq!(normalize_code(" zva ").unwrap(), "ZVA");
        assert_eq!(normalize_code("z1b").unwrap(), "Z1B");
        assert!(normalize_code("ZV").is_err());
        assert!(normalize_code("ZV-").is_err());
        assert!(normalize_code("ZVAA").is_err());
    }

    #[test]
    fn value_normalization() {
        let us = DateLayout::MonthDayYear;
        assert_eq!(normalize_value("DCS", "  doe ", us), Ok(Some("DOE".to_owned())));
        assert_eq!(normalize_value("DCS", "   ", us), Ok(None));
        assert_eq!(
            normalize_value("DBB", "1992-06-14", us),
            Ok(Some("06141992".to_owned()))
        );
        assert_eq!(
            normalize_value("DBB", "1992-06-14", DateLayout::YearMonthDay),
            Ok(Some("19920614".to_owned()))
        );
        assert_eq!(
            normalize_value("DBB", "14-06-1992", us),
            Err(ValidationError::InvalidDate {
                code: "DBB".to_owned(),
                value: "14-06-1992".to_owned()
            })
        );
    }

    #[test]
    fn sex_normalization() {
        assert_eq!(normalize_sex(Some("m")), "1");
        assert_eq!(normalize_sex(Some(" Female ")), "2");
        assert_eq!(normalize_sex(Some("2")), "2");
        assert_eq!(normalize_sex(Some("X")), "9");
        assert_eq!(normalize_sex(None), "9");
    }

    #[test]
    fn transcript_layout() {
        let transcript = build_from_fields_on(today(), "636026", &jane_doe(), &[]).unwrap();
        assert_eq!(
            transcript.as_str(),
            "@\n\
             ANSI 636026080102DL00410288ZA03290015DL\n\
             DACJANE\n\
             DAJWA\n\
             DAOWA\n\
             DAQX1234\n\
             DBA09012030\n\
             DBB06141992\n\
             DBC9\n\
             DBD03052024\n\
             DCGUSA\n\
             DCSDOE\n"
        );
    }

    #[test]
    fn canadian_dates_are_year_first() {
        let mut input = jane_doe();
        input.insert("DAJ".to_owned(), "ON".to_owned());
        input.insert("DCG".to_owned(), "can".to_owned());
        let transcript = build_from_fields_on(today(), "636012", &input, &[]).unwrap();
        let lines: Vec<_> = transcript.lines().collect();
        assert!(lines.contains(&"DBB19920614"));
        assert!(lines.contains(&"DBA20300901"));
        assert!(lines.contains(&"DBD20240305"));
        assert!(lines.contains(&"DCGCAN"));
    }

    #[test]
    fn custom_fields_win() {
        let custom = [
            CustomField::new("dcs", "Roe"),
            CustomField::new("zwa", "extra"),
            CustomField::new("", " "),
        ];
        let transcript = build_from_fields_on(today(), "636026", &jane_doe(), &custom).unwrap();
        let lines: Vec<_> = transcript.lines().collect();
        assert!(lines.contains(&"DCSROE"));
        assert!(!lines.contains(&"DCSDOE"));
        assert_eq!(lines.last(), Some(&"ZWAEXTRA"));
    }

    #[test]
    fn invalid_custom_code() {
        let custom = [CustomField::new("Z!", "x")];
        assert_eq!(
            build_from_fields_on(today(), "636026", &jane_doe(), &custom),
            Err(ValidationError::InvalidFieldCode("Z!".to_owned()))
        );
    }

    #[test]
    fn explicit_issue_date_is_kept() {
        let mut input = jane_doe();
        input.insert("DBD".to_owned(), "2022-08-24".to_owned());
        let transcript = build_from_fields_on(today(), "636026", &input, &[]).unwrap();
        assert!(transcript.lines().any(|l| l == "DBD08242022"));
    }

    #[test]
    fn empty_values_clear_defaults() {
        let mut input = jane_doe();
        input.insert("DCG".to_owned(), " ".to_owned());
        let err = build_from_fields_on(today(), "636026", &input, &[]).unwrap_err();
        assert_eq!(err, ValidationError::MissingElement("DCG".to_owned()));
        assert_eq!(err.field(), "DCG");
    }

    #[test]
    fn legacy_form_requires_names_first() {
        let form = LegacyForm {
            last_name: "Doe".to_owned(),
            dob: "1992-06-14".to_owned(),
            expiry: "2030-09-01".to_owned(),
            issuer_id: "636026".to_owned(),
            ..Default::default()
        };

        assert_eq!(
            build_from_legacy_form(&form),
            Err(ValidationError::MissingField("first name"))
        );

        let form = LegacyForm {
            first_name: "Jane".to_owned(),
            ..form
        };
        assert_eq!(
            build_from_legacy_form(&form),
            Err(ValidationError::MissingField("document number"))
        );
    }

    #[test]
    fn legacy_form_mapping() {
        let form = LegacyForm {
            first_name: "Jane".to_owned(),
            last_name: "Doe".to_owned(),
            dob: "1992-06-14".to_owned(),
            expiry: "2030-09-01".to_owned(),
            document_number: "X1234".to_owned(),
            issuer_id: "636026".to_owned(),
            sex: Some("F".to_owned()),
            address1: Some("12 Main St".to_owned()),
            city: Some("Albany".to_owned()),
            jurisdiction_code: None,
            postal_code: Some("12207".to_owned()),
        };

        let transcript = build_from_legacy_form(&form).unwrap();
        let lines: Vec<_> = transcript.lines().collect();
        for expected in [
            "DACJANE",
            "DCSDOE",
            "DBB06141992",
            "DBA09012030",
            "DAQX1234",
            "DCFX1234",
            "DBC2",
            "DAG12 MAIN ST",
            "DAIALBANY",
            "DAJWA",
            "DAK12207",
            "DCGUSA",
        ] {
            assert!(lines.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn legacy_form_from_json() {
        let form: LegacyForm = serde_json::from_str(
            r#"{"firstName":"Jane","lastName":"Doe","dob":"1992-06-14","expiry":"2030-09-01","documentNumber":"X1234","issuerIIN":"636026"}"#,
        )
        .unwrap();
        assert_eq!(form.issuer_id, "636026");
        assert_eq!(form.sex, None);
    }
}
