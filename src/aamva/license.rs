//! Typed view over a decoded transcript.
use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::{
    date::{self, DateLayout},
    transcript::{ParseError, RawTranscript},
    Element,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
    Unspecified,
    Unknown,
}

impl Sex {
    fn from_value(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "1" | "M" => Self::Male,
            "2" | "F" => Self::Female,
            "9" => Self::Unspecified,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Unspecified => "unspecified",
            Self::Unknown => "unknown",
        }
    }
}

/// Name truncation indicator (`DDE`, `DDF`, `DDG`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truncation {
    Truncated,
    None,
    Unknown,
}

impl Truncation {
    fn from_value(value: &str) -> Self {
        match value.trim() {
            "T" => Self::Truncated,
            "N" => Self::None,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Truncated => "truncated",
            Self::None => "none",
            Self::Unknown => "unknown",
        }
    }
}

/// Value of a license field, before display formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseValue<'a> {
    Text(&'a str),
    Date(NaiveDate),
    Flag(bool),
    Number(u32),
}

impl LicenseValue<'_> {
    /// Display string, or `None` when the value carries no information.
    pub fn display(&self) -> Option<String> {
        match self {
            Self::Text(value) => {
                let value = value.trim();
                if value.is_empty() || value.eq_ignore_ascii_case("unknown") {
                    None
                } else {
                    Some(value.to_owned())
                }
            }
            Self::Date(date) => Some(date.format("%Y-%m-%d").to_string()),
            Self::Flag(true) => Some("true".to_owned()),
            Self::Flag(false) => None,
            Self::Number(n) => Some(n.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLicense {
    pub issuer_id: Option<u32>,
    pub version: Option<String>,
    pub jurisdiction_version: Option<u8>,

    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub suffix: Option<String>,
    pub first_name_truncation: Option<Truncation>,
    pub middle_name_truncation: Option<Truncation>,
    pub last_name_truncation: Option<Truncation>,
    pub first_name_alias: Option<String>,
    pub last_name_alias: Option<String>,
    pub suffix_alias: Option<String>,

    pub drivers_license_id: Option<String>,
    pub document_id: Option<String>,

    pub date_of_birth: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub issue_date: Option<NaiveDate>,
    pub card_revision_date: Option<NaiveDate>,
    pub hazmat_endorsement_expiration_date: Option<NaiveDate>,
    pub under_18_until: Option<NaiveDate>,
    pub under_19_until: Option<NaiveDate>,
    pub under_21_until: Option<NaiveDate>,

    pub gender: Option<Sex>,
    pub eye_color: Option<String>,
    pub hair_color: Option<String>,
    pub height: Option<String>,
    pub weight_pounds: Option<u32>,
    pub weight_kilograms: Option<u32>,
    pub weight_range: Option<u32>,
    pub race: Option<String>,

    pub street_address: Option<String>,
    pub street_address_supplement: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub place_of_birth: Option<String>,

    pub audit_information: Option<String>,
    pub inventory_control_number: Option<String>,
    pub vehicle_class: Option<String>,
    pub restriction_codes: Option<String>,
    pub endorsement_codes: Option<String>,
    pub standard_vehicle_classification: Option<String>,
    pub standard_endorsement_code: Option<String>,
    pub standard_restriction_code: Option<String>,
    pub compliance_type: Option<String>,

    pub limited_duration_document: bool,
    pub organ_donor: bool,
    pub veteran: bool,

    /// Date elements whose value could not be interpreted.
    pub unreadable_dates: Vec<Element>,
}

/// Parses `text` into a license.
pub fn parse(text: &str) -> Result<ParsedLicense, ParseError> {
    RawTranscript::parse(text).map(|raw| ParsedLicense::from_transcript(&raw))
}

/// Splits a full name (`DAA`) into its comma or space separated components.
fn split_full_name(value: &str) -> Vec<&str> {
    let separator = if value.contains(',') { ',' } else { ' ' };
    value
        .split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Splits given names (`DCT`) into the first name and the remaining names.
fn split_given_names(value: &str) -> (Option<String>, Option<String>) {
    let value = value.trim();
    let is_separator = |c: char| c == ',' || c == ' ';
    let (first, rest) = match value.find(is_separator) {
        Some(i) => (&value[..i], value[i + 1..].trim_matches(is_separator)),
        None => (value, ""),
    };

    let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_owned());
    (non_empty(first), non_empty(rest))
}

fn is_set(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("1" | "Y"))
}

impl ParsedLicense {
    pub fn from_transcript(raw: &RawTranscript) -> Self {
        let text = |e: Element| raw.get(e.code()).map(str::to_owned);
        let number = |e: Element| raw.get(e.code()).and_then(|v| v.trim().parse().ok());

        let country = text(Element::Country);
        let layout = DateLayout::for_document(raw.version(), country.as_deref());

        let mut unreadable_dates = Vec::new();
        let mut read_date = |e: Element| {
            let value = raw.get(e.code())?;
            let result = date::parse_packed(value, layout);
            if result.is_none() {
                unreadable_dates.push(e);
            }
            result
        };

        let full_name = raw.get(Element::FullName.code()).map(split_full_name);
        let full_name_part = |i: usize| {
            full_name
                .as_ref()
                .and_then(|parts| parts.get(i))
                .map(|s| (*s).to_owned())
        };
        let (given_first, given_rest) = raw
            .get(Element::FirstName.code())
            .map(split_given_names)
            .unwrap_or_default();

        let mut license = Self {
            issuer_id: raw.header.map(|h| h.issuer_id),
            version: raw.header.map(|h| h.version_token()),
            jurisdiction_version: raw.header.and_then(|h| h.jurisdiction_version),

            first_name: text(Element::GivenName)
                .or(given_first)
                .or_else(|| full_name_part(1)),
            middle_name: text(Element::MiddleName)
                .or(given_rest)
                .or_else(|| full_name_part(2)),
            last_name: text(Element::LastName)
                .or_else(|| text(Element::FamilyName))
                .or_else(|| full_name_part(0)),
            suffix: text(Element::Suffix).or_else(|| text(Element::NameSuffix)),
            first_name_truncation: raw
                .get(Element::FirstNameTruncation.code())
                .map(Truncation::from_value),
            middle_name_truncation: raw
                .get(Element::MiddleNameTruncation.code())
                .map(Truncation::from_value),
            last_name_truncation: raw
                .get(Element::FamilyNameTruncation.code())
                .map(Truncation::from_value),
            first_name_alias: text(Element::AliasGivenName),
            last_name_alias: text(Element::AliasFamilyName),
            suffix_alias: text(Element::AliasSuffix),

            drivers_license_id: text(Element::DocumentNumber),
            document_id: text(Element::DocumentDiscriminator),

            gender: raw.get(Element::Sex.code()).map(Sex::from_value),
            eye_color: text(Element::EyeColor),
            hair_color: text(Element::HairColor),
            height: text(Element::HeightFeetInches).or_else(|| text(Element::HeightCentimeters)),
            weight_pounds: number(Element::WeightPounds),
            weight_kilograms: number(Element::WeightKilograms),
            weight_range: number(Element::WeightRange),
            race: text(Element::RaceEthnicity),

            street_address: text(Element::MailingStreet1),
            street_address_supplement: text(Element::MailingStreet2),
            city: text(Element::MailingCity),
            state: text(Element::MailingJurisdictionCode),
            postal_code: text(Element::MailingPostalCode),
            place_of_birth: text(Element::PlaceOfBirth),

            audit_information: text(Element::AuditInformation),
            inventory_control_number: text(Element::InventoryControlNumber),
            vehicle_class: text(Element::VehicleClass),
            restriction_codes: text(Element::RestrictionCodes),
            endorsement_codes: text(Element::EndorsementCodes),
            standard_vehicle_classification: text(Element::StandardVehicleClass),
            standard_endorsement_code: text(Element::StandardEndorsementCode),
            standard_restriction_code: text(Element::StandardRestrictionCode),
            compliance_type: text(Element::ComplianceType),

            limited_duration_document: is_set(raw.get(Element::LimitedDurationDocument.code())),
            organ_donor: is_set(raw.get(Element::OrganDonorIndicator.code()))
                || is_set(raw.get(Element::OrganDonor.code())),
            veteran: is_set(raw.get(Element::VeteranIndicator.code())),

            country,
            ..Self::default()
        };

        license.date_of_birth = read_date(Element::DateOfBirth);
        license.expiration_date = read_date(Element::ExpirationDate);
        license.issue_date = read_date(Element::IssueDate);
        license.card_revision_date = read_date(Element::CardRevisionDate);
        license.hazmat_endorsement_expiration_date =
            read_date(Element::HazmatEndorsementExpirationDate);
        license.under_18_until = read_date(Element::Under18Until);
        license.under_19_until = read_date(Element::Under19Until);
        license.under_21_until = read_date(Element::Under21Until);
        license.unreadable_dates = unreadable_dates;

        license
    }

    /// Every field with its display key.
    pub fn entries(&self) -> Vec<(&'static str, Option<LicenseValue<'_>>)> {
        fn text(v: &Option<String>) -> Option<LicenseValue<'_>> {
            v.as_deref().map(LicenseValue::Text)
        }
        let date = |v: Option<NaiveDate>| v.map(LicenseValue::Date);
        let number = |v: Option<u32>| v.map(LicenseValue::Number);

        vec![
            ("issuerId", self.issuer_id.map(LicenseValue::Number)),
            ("version", text(&self.version)),
            (
                "jurisdictionVersion",
                self.jurisdiction_version
                    .map(|v| LicenseValue::Number(v.into())),
            ),
            ("firstName", text(&self.first_name)),
            ("middleName", text(&self.middle_name)),
            ("lastName", text(&self.last_name)),
            ("suffix", text(&self.suffix)),
            (
                "firstNameTruncation",
                self.first_name_truncation
                    .map(|t| LicenseValue::Text(t.as_str())),
            ),
            (
                "middleNameTruncation",
                self.middle_name_truncation
                    .map(|t| LicenseValue::Text(t.as_str())),
            ),
            (
                "lastNameTruncation",
                self.last_name_truncation
                    .map(|t| LicenseValue::Text(t.as_str())),
            ),
            ("firstNameAlias", text(&self.first_name_alias)),
            ("lastNameAlias", text(&self.last_name_alias)),
            ("suffixAlias", text(&self.suffix_alias)),
            ("driversLicenseId", text(&self.drivers_license_id)),
            ("documentId", text(&self.document_id)),
            ("dateOfBirth", date(self.date_of_birth)),
            ("expirationDate", date(self.expiration_date)),
            ("issueDate", date(self.issue_date)),
            ("cardRevisionDate", date(self.card_revision_date)),
            (
                "hazmatEndorsementExpirationDate",
                date(self.hazmat_endorsement_expiration_date),
            ),
            ("under18Until", date(self.under_18_until)),
            ("under19Until", date(self.under_19_until)),
            ("under21Until", date(self.under_21_until)),
            ("gender", self.gender.map(|s| LicenseValue::Text(s.as_str()))),
            ("eyeColor", text(&self.eye_color)),
            ("hairColor", text(&self.hair_color)),
            ("height", text(&self.height)),
            ("weightPounds", number(self.weight_pounds)),
            ("weightKilograms", number(self.weight_kilograms)),
            ("weightRange", number(self.weight_range)),
            ("race", text(&self.race)),
            ("streetAddress", text(&self.street_address)),
            ("streetAddressSupplement", text(&self.street_address_supplement)),
            ("city", text(&self.city)),
            ("state", text(&self.state)),
            ("postalCode", text(&self.postal_code)),
            ("country", text(&self.country)),
            ("placeOfBirth", text(&self.place_of_birth)),
            ("auditInformation", text(&self.audit_information)),
            ("inventoryControlNumber", text(&self.inventory_control_number)),
            ("vehicleClass", text(&self.vehicle_class)),
            ("restrictionCodes", text(&self.restriction_codes)),
            ("endorsementCodes", text(&self.endorsement_codes)),
            (
                "standardVehicleClassification",
                text(&self.standard_vehicle_classification),
            ),
            ("standardEndorsementCode", text(&self.standard_endorsement_code)),
            ("standardRestrictionCode", text(&self.standard_restriction_code)),
            ("complianceType", text(&self.compliance_type)),
            (
                "limitedDurationDocument",
                Some(LicenseValue::Flag(self.limited_duration_document)),
            ),
            ("organDonor", Some(LicenseValue::Flag(self.organ_donor))),
            ("veteran", Some(LicenseValue::Flag(self.veteran))),
        ]
    }

    /// Display strings of every informative field.
    pub fn display_fields(&self) -> BTreeMap<String, String> {
        self.entries()
            .into_iter()
            .filter_map(|(key, value)| Some((key.to_owned(), value?.display()?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_eight_us_dates() {
        let license =
            parse("@\nANSI 636000080102DL\nDAQA123\nDCSDOE\nDBB06141992\nDBC2\nDCGUSA\n").unwrap();
        assert_eq!(license.version.as_deref(), Some("08"));
        assert_eq!(license.date_of_birth, NaiveDate::from_ymd_opt(1992, 6, 14));
        assert_eq!(license.gender, Some(Sex::Female));
        assert_eq!(license.drivers_license_id.as_deref(), Some("A123"));
    }

    #[test]
    fn canadian_dates_are_year_first() {
        let license = parse("@\nANSI 636012080102DL\nDCGCAN\nDBB19920614\n").unwrap();
        assert_eq!(license.date_of_birth, NaiveDate::from_ymd_opt(1992, 6, 14));
        assert!(license.unreadable_dates.is_empty());
    }

    #[test]
    fn version_one_full_name() {
        let license =
            parse("@\n\x1e\rAAMVA6360000101DL00290182DLDAAPUBLIC,JOHN,Q\nDBB19700131\r").unwrap();
        assert_eq!(license.last_name.as_deref(), Some("PUBLIC"));
        assert_eq!(license.first_name.as_deref(), Some("JOHN"));
        assert_eq!(license.middle_name.as_deref(), Some("Q"));
        assert_eq!(license.date_of_birth, NaiveDate::from_ymd_opt(1970, 1, 31));
    }

    #[test]
    fn version_three_given_names() {
        let license = parse("ANSI 636000030101DL\nDCTJOHN QUINCY\nDCSPUBLIC\n").unwrap();
        assert_eq!(license.first_name.as_deref(), Some("JOHN"));
        assert_eq!(license.middle_name.as_deref(), Some("QUINCY"));
    }

    #[test]
    fn unreadable_dates_are_reported() {
        let license = parse("DAQA1\nDBA13452030\nDBBXX\n").unwrap();
        assert_eq!(license.expiration_date, None);
        assert_eq!(
            license.unreadable_dates,
            [Element::DateOfBirth, Element::ExpirationDate]
        );
    }

    #[test]
    fn display_rules() {
        let license =
            parse("DAQA1\nDBC9\nDDEU\nDDFT\nDAYUNKNOWN\nDDK1\nDDL0\nDAW180\nDBPJACK\n").unwrap();
        let fields = license.display_fields();
        assert_eq!(fields["driversLicenseId"], "A1");
        assert_eq!(fields["gender"], "unspecified");
        assert_eq!(fields["firstNameTruncation"], "truncated");
        assert!(!fields.contains_key("lastNameTruncation"));
        assert!(!fields.contains_key("eyeColor"));
        assert_eq!(fields["organDonor"], "true");
        assert!(!fields.contains_key("veteran"));
        assert_eq!(fields["weightPounds"], "180");
        assert_eq!(fields["firstNameAlias"], "JACK");
        assert!(!fields.contains_key("version"));
    }
}
