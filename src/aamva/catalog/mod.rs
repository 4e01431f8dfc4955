//! AAMVA DL/ID element catalog.
//!
//! See: <https://www.aamva.org/assets/best-practices,-guides,-standards,-manuals,-whitepapers/aamva-dl-id-card-design-standard-(2020)>
use std::{collections::HashMap, io::Cursor};

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use super::{field_catalog, FieldMap};

field_catalog! {
    /// Known data element.
    ///
    /// Variants are declared in canonical transcript order.
    pub enum Element {
        FullName: b"DAA" => "Full Name" ("Full legal name"),
        FamilyName: b"DAB" => "Family Name" ("Family name"),
        GivenName: b"DAC" => "Given Name" ("First name"),
        MiddleName: b"DAD" => "Middle Name" ("Middle name"),
        NameSuffix: b"DAE" => "Name Suffix",
        NamePrefix: b"DAF" => "Name Prefix",
        MailingStreet1: b"DAG" => "Mailing Street Address1" ("Mailing address line 1"),
        MailingStreet2: b"DAH" => "Mailing Street Address2" ("Mailing address line 2"),
        MailingCity: b"DAI" => "Mailing City" ("Mailing city"),
        MailingJurisdictionCode: b"DAJ" => "Mailing Jurisdiction Code (State)" ("Mailing state (WA)"),
        MailingPostalCode: b"DAK" => "Mailing Postal Code" ("Mailing ZIP"),
        ResidenceStreet1: b"DAL" => "Residence Street Address1",
        ResidenceStreet2: b"DAM" => "Residence Street Address2",
        ResidenceCity: b"DAN" => "Residence City",
        ResidenceJurisdictionCode: b"DAO" => "Residence Jurisdiction Code",
        ResidencePostalCode: b"DAP" => "Residence Postal Code",
        DocumentNumber: b"DAQ" => "License or ID Number" ("Washington license or ID number"),
        LicenseClass: b"DAR" => "License Classification Code" ("Washington class code"),
        LicenseRestrictions: b"DAS" => "License Restriction Code" ("Washington restrictions"),
        LicenseEndorsements: b"DAT" => "License Endorsements Code" ("Washington endorsements"),
        HeightFeetInches: b"DAU" => "Height in FT_IN",
        HeightCentimeters: b"DAV" => "Height in CM",
        WeightPounds: b"DAW" => "Weight in LBS",
        WeightKilograms: b"DAX" => "Weight in KG",
        EyeColor: b"DAY" => "Eye Color",
        HairColor: b"DAZ" => "Hair Color",
        ExpirationDate: b"DBA" => "License Expiration Date",
        DateOfBirth: b"DBB" => "Date of Birth",
        Sex: b"DBC" => "Sex",
        IssueDate: b"DBD" => "License or ID Document Issue Date",
        IssueTimestamp: b"DBE" => "Issue Timestamp",
        DuplicateCount: b"DBF" => "Number of Duplicates",
        MedicalIndicatorCodes: b"DBG" => "Medical Indicator Codes",
        OrganDonor: b"DBH" => "Organ Donor",
        NonResidentIndicator: b"DBI" => "Non-Resident Indicator",
        UniqueCustomerIdentifier: b"DBJ" => "Unique Customer Identifier",
        SocialSecurityNumber: b"DBK" => "Social Security Number",
        AliasDateOfBirth: b"DBL" => "Date of Birth",
        AliasSocialSecurityNumber: b"DBM" => "Social Security Number",
        AliasFullName: b"DBN" => "Full Name",
        AliasFamilyName: b"DBO" => "Family Name",
        AliasGivenName: b"DBP" => "Given Name",
        AliasMiddleName: b"DBQ" => "Middle Name or Initial",
        AliasSuffix: b"DBR" => "Suffix",
        AliasPrefix: b"DBS" => "Prefix",
        VehicleClass: b"DCA" => "Specific Class" ("Washington specific class"),
        RestrictionCodes: b"DCB" => "Specific Restrictions" ("Washington specific restrictions"),
        EndorsementCodes: b"DCD" => "Specific Endorsements" ("Washington specific endorsements"),
        WeightRange: b"DCE" => "Physical Description Weight Range",
        DocumentDiscriminator: b"DCF" => "Document Discriminator",
        Country: b"DCG" => "Country territory of issuance",
        FederalCommercialVehicleCodes: b"DCH" => "Federal Commercial Vehicle Codes",
        PlaceOfBirth: b"DCI" => "Place of birth",
        AuditInformation: b"DCJ" => "Audit information",
        InventoryControlNumber: b"DCK" => "Inventory Control Number",
        RaceEthnicity: b"DCL" => "Race Ethnicity",
        StandardVehicleClass: b"DCM" => "Standard vehicle classification",
        StandardEndorsementCode: b"DCN" => "Standard endorsement code",
        StandardRestrictionCode: b"DCO" => "Standard restriction code",
        VehicleClassDescription: b"DCP" => "Jurisdiction specific vehicle classification description",
        EndorsementCodeDescription: b"DCQ" => "Jurisdiction-specific",
        RestrictionCodeDescription: b"DCR" => "Jurisdiction specific restriction code description",
        LastName: b"DCS" => "Last Name",
        FirstName: b"DCT" => "First Name",
        Suffix: b"DCU" => "Suffix",
        ComplianceType: b"DDA" => "Compliance Type",
        CardRevisionDate: b"DDB" => "Card Revision Date",
        HazmatEndorsementExpirationDate: b"DDC" => "HazMat Endorsement Expiry Date",
        LimitedDurationDocument: b"DDD" => "Limited Duration Document Indicator",
        FamilyNameTruncation: b"DDE" => "Family Name Truncation",
        FirstNameTruncation: b"DDF" => "First Names Truncation",
        MiddleNameTruncation: b"DDG" => "Middle Names Truncation",
        Under18Until: b"DDH" => "Under 18 Until",
        Under19Until: b"DDI" => "Under 19 Until",
        Under21Until: b"DDJ" => "Under 21 Until",
        OrganDonorIndicator: b"DDK" => "Organ Donor Indicator",
        VeteranIndicator: b"DDL" => "Veteran Indicator",
        PermitClass: b"PAA" => "Permit Classification Code",
        PermitExpirationDate: b"PAB" => "Permit Expiration Date",
        PermitIdentifier: b"PAC" => "Permit Identifier",
        PermitIssueDate: b"PAD" => "Permit IssueDate",
        PermitRestrictions: b"PAE" => "Permit Restriction Code",
        PermitEndorsements: b"PAF" => "Permit Endorsement Code",
        CourtRestrictionCode: b"ZVA" => "Court Restriction Code" ("Washington court restriction")
    }
}

impl Element {
    pub fn definition(&self) -> FieldDefinition {
        FieldDefinition {
            code: self.code(),
            label: self.label(),
            jurisdiction_label: self.jurisdiction_label(),
        }
    }

    pub fn is_date(&self) -> bool {
        DATE_ELEMENTS.contains(self)
    }

    pub fn is_required(&self) -> bool {
        REQUIRED_ELEMENTS.contains(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub code: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jurisdiction_label: Option<&'static str>,
}

/// Elements that must be present in every generated transcript.
pub const REQUIRED_ELEMENTS: [Element; 9] = [
    Element::DocumentNumber,
    Element::LastName,
    Element::GivenName,
    Element::DateOfBirth,
    Element::ExpirationDate,
    Element::IssueDate,
    Element::Sex,
    Element::MailingJurisdictionCode,
    Element::Country,
];

/// Elements holding a packed date.
pub const DATE_ELEMENTS: [Element; 11] = [
    Element::ExpirationDate,
    Element::DateOfBirth,
    Element::IssueDate,
    Element::AliasDateOfBirth,
    Element::CardRevisionDate,
    Element::HazmatEndorsementExpirationDate,
    Element::Under18Until,
    Element::Under19Until,
    Element::Under21Until,
    Element::PermitExpirationDate,
    Element::PermitIssueDate,
];

/// Washington defaults applied beneath caller supplied fields.
const JURISDICTION_DEFAULTS: [(Element, &str); 4] = [
    (Element::MailingJurisdictionCode, "WA"),
    (Element::ResidenceJurisdictionCode, "WA"),
    (Element::Country, "USA"),
    (Element::Sex, "9"),
];

lazy_static! {
    static ref ELEMENT_POSITIONS: HashMap<&'static str, usize> = {
        let mut map = HashMap::new();

        for (i, e) in Element::LIST.iter().enumerate() {
            map.insert(e.code(), i);
        }

        map
    };
    static ref REQUIRED_CODES: [&'static str; 9] = REQUIRED_ELEMENTS.map(|e| e.code());
    static ref FIELD_HELP: HashMap<String, FieldHelp> = {
        let cursor = Cursor::new(include_str!("field-help.csv"));
        let mut reader = csv::Reader::from_reader(cursor);
        let mut map = HashMap::new();

        for result in reader.deserialize() {
            let help: FieldHelp = result.unwrap();
            map.insert(help.code.clone(), help);
        }

        map
    };
}

/// Sorts `codes` in canonical transcript order.
///
/// Codes missing from the catalog are appended after every known code, in
/// lexicographic order. Duplicates are kept.
pub fn canonical_order<I, S>(codes: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut codes: Vec<String> = codes.into_iter().map(Into::into).collect();
    codes.sort_by(|a, b| {
        let pa = ELEMENT_POSITIONS.get(a.as_str());
        let pb = ELEMENT_POSITIONS.get(b.as_str());
        match (pa, pb) {
            (Some(pa), Some(pb)) => pa.cmp(pb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.cmp(b),
        }
    });
    codes
}

pub fn is_required(code: &str) -> bool {
    Element::from_code(code).is_some_and(|e| e.is_required())
}

pub fn required_codes() -> &'static [&'static str] {
    &*REQUIRED_CODES
}

pub fn is_date_code(code: &str) -> bool {
    Element::from_code(code).is_some_and(|e| e.is_date())
}

pub fn defaults() -> FieldMap {
    JURISDICTION_DEFAULTS
        .iter()
        .map(|(e, v)| (e.code().to_owned(), (*v).to_owned()))
        .collect()
}

pub fn definition(code: &str) -> Option<FieldDefinition> {
    Element::from_code(code).map(|e| e.definition())
}

pub fn definitions() -> impl Iterator<Item = FieldDefinition> {
    Element::LIST.into_iter().map(|e| e.definition())
}

/// Data entry guidance for a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct FieldHelp {
    pub code: String,
    pub what: String,
    pub jurisdiction_use: String,
    pub example: String,
}

pub fn help(code: &str) -> Option<&'static FieldHelp> {
    FIELD_HELP.get(code)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn option(value: &'static str, label: &'static str) -> SelectOption {
    SelectOption { value, label }
}

const JURISDICTION_OPTIONS: &[SelectOption] = &[
    option("WA", "WA - Washington"),
    option("OR", "OR - Oregon"),
    option("ID", "ID - Idaho"),
    option("CA", "CA - California"),
];

const SEX_OPTIONS: &[SelectOption] = &[
    option("1", "1 - Male"),
    option("2", "2 - Female"),
    option("9", "9 - Not Specified"),
];

const CLASS_OPTIONS: &[SelectOption] = &[
    option("D", "D - Standard Passenger"),
    option("C", "C - Commercial"),
    option("B", "B - Commercial Heavy"),
    option("A", "A - Combination Commercial"),
    option("ID", "ID - Identification Card"),
];

const RESTRICTION_OPTIONS: &[SelectOption] = &[
    option("A", "A - Corrective Lenses"),
    option("B", "B - Daylight Only"),
    option("C", "C - Mechanical Aid"),
    option("D", "D - Prosthetic Aid"),
    option("E", "E - Automatic Transmission Only"),
];

const ENDORSEMENT_OPTIONS: &[SelectOption] = &[
    option("H", "H - Hazardous Materials"),
    option("N", "N - Tank Vehicle"),
    option("P", "P - Passenger"),
    option("S", "S - School Bus"),
    option("T", "T - Doubles/Triples"),
    option("X", "X - Tank + HazMat"),
];

const EYE_COLOR_OPTIONS: &[SelectOption] = &[
    option("BLK", "Black"),
    option("BLU", "Blue"),
    option("BRO", "Brown"),
    option("GRY", "Gray"),
    option("GRN", "Green"),
    option("HAZ", "Hazel"),
    option("MAR", "Maroon"),
    option("PNK", "Pink"),
];

const HAIR_COLOR_OPTIONS: &[SelectOption] = &[
    option("BAL", "Bald"),
    option("BLK", "Black"),
    option("BLN", "Blond"),
    option("BRO", "Brown"),
    option("GRY", "Gray"),
    option("RED", "Red"),
    option("SDY", "Sandy"),
    option("WHI", "White"),
];

const COUNTRY_OPTIONS: &[SelectOption] = &[
    option("USA", "USA - United States"),
    option("CAN", "CAN - Canada"),
];

const ORGAN_DONOR_OPTIONS: &[SelectOption] = &[
    option("1", "1 - Organ Donor"),
    option("0", "0 - Not Organ Donor"),
];

const ORGAN_DONOR_INDICATOR_OPTIONS: &[SelectOption] = &[
    option("1", "1 - Organ Donor Indicator True"),
    option("0", "0 - Organ Donor Indicator False"),
];

const VETERAN_OPTIONS: &[SelectOption] = &[
    option("1", "1 - Veteran Indicator True"),
    option("0", "0 - Veteran Indicator False"),
];

/// Suggested values for fields with a closed vocabulary.
pub fn select_options(code: &str) -> &'static [SelectOption] {
    match code {
        "DAJ" | "DAO" => JURISDICTION_OPTIONS,
        "DBC" => SEX_OPTIONS,
        "DAR" => CLASS_OPTIONS,
        "DAS" => RESTRICTION_OPTIONS,
        "DAT" => ENDORSEMENT_OPTIONS,
        "DAY" => EYE_COLOR_OPTIONS,
        "DAZ" => HAIR_COLOR_OPTIONS,
        "DCG" => COUNTRY_OPTIONS,
        "DBH" => ORGAN_DONOR_OPTIONS,
        "DDK" => ORGAN_DONOR_INDICATOR_OPTIONS,
        "DDL" => VETERAN_OPTIONS,
        _ => &[],
    }
}
