mod common;

use common::*;
use dlid_barcodes::aamva::decode;
use proptest::prelude::*;

#[test]
fn plain_text_is_not_aamva() {
    let result = decode("HELLO WORLD");
    assert!(!result.is_likely_aamva);
    assert!(result.fields.is_empty());
    assert!(!result.warnings.is_empty());
}

#[test]
fn partial_transcript() {
    let result = decode("@\nANSI 636000080102DL\nDAQA123\nDCSDOE\n");
    assert!(result.is_likely_aamva);
    assert_eq!(result.version.as_deref(), Some("08"));
    assert_eq!(result.fields["lastName"], "DOE");
    assert_eq!(result.fields["driversLicenseId"], "A123");
    assert!(result.warnings.is_empty());
}

#[test]
fn noisy_text_around_elements() {
    let result = decode("ANSI X-RAY LABEL\nDAQA123\nDCSDOE\nDACJANE\n");
    assert!(result.is_likely_aamva);
    assert_eq!(result.version, None);
    assert_eq!(result.fields["lastName"], "DOE");
    assert_eq!(result.fields["driversLicenseId"], "A123");
}

#[test]
fn empty_input() {
    let result = decode("");
    assert!(!result.is_likely_aamva);
    assert_eq!(result.warnings, ["payload is empty"]);
}

#[test]
fn washington_license() {
    let result = decode(&load_transcript("tests/fixtures/washington.txt"));
    assert!(result.is_likely_aamva);
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    assert_eq!(result.version.as_deref(), Some("08"));

    let fields = &result.fields;
    assert_eq!(fields["issuerId"], "636045");
    assert_eq!(fields["jurisdictionVersion"], "1");
    assert_eq!(fields["driversLicenseId"], "WDLX7RT4C91B");
    assert_eq!(fields["firstName"], "JANE");
    assert_eq!(fields["middleName"], "MARIE");
    assert_eq!(fields["lastName"], "SAMPLE");
    assert_eq!(fields["lastNameTruncation"], "none");
    assert_eq!(fields["dateOfBirth"], "1992-06-14");
    assert_eq!(fields["expirationDate"], "2030-06-14");
    assert_eq!(fields["issueDate"], "2024-03-05");
    assert_eq!(fields["cardRevisionDate"], "2021-11-16");
    assert_eq!(fields["gender"], "female");
    assert_eq!(fields["height"], "065 IN");
    assert_eq!(fields["eyeColor"], "BLU");
    assert_eq!(fields["hairColor"], "BRO");
    assert_eq!(fields["streetAddress"], "123 MAIN ST");
    assert_eq!(fields["city"], "OLYMPIA");
    assert_eq!(fields["state"], "WA");
    assert_eq!(fields["postalCode"], "985010000");
    assert_eq!(fields["country"], "USA");
    assert_eq!(fields["documentId"], "2024065WA0001");
    assert_eq!(fields["complianceType"], "F");
    assert_eq!(fields["organDonor"], "true");
    assert!(!fields.contains_key("veteran"));
}

#[test]
fn ontario_license() {
    let result = decode(&load_transcript("tests/fixtures/ontario.txt"));
    assert!(result.is_likely_aamva);
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);

    let fields = &result.fields;
    assert_eq!(fields["issuerId"], "636012");
    assert_eq!(fields["vehicleClass"], "G");
    assert_eq!(fields["driversLicenseId"], "T1234-56789-50301");
    assert_eq!(fields["dateOfBirth"], "1985-03-01");
    assert_eq!(fields["expirationDate"], "2029-03-01");
    assert_eq!(fields["issueDate"], "2024-03-01");
    assert_eq!(fields["gender"], "male");
    assert_eq!(fields["postalCode"], "M5H 1A1");
    assert_eq!(fields["country"], "CAN");
}

#[test]
fn truncated_transcripts() {
    let transcript = load_transcript("tests/fixtures/washington.txt");
    let header_end = transcript.find("DLDAQ").unwrap();
    for (i, _) in transcript.char_indices() {
        let result = decode(&transcript[..i]);
        assert!(result.is_likely_aamva || !result.warnings.is_empty());
        if i > header_end {
            assert_eq!(result.version.as_deref(), Some("08"));
        }
    }
}

#[test]
fn decoding_is_deterministic() {
    let transcript = load_transcript("tests/fixtures/ontario.txt");
    assert_eq!(decode(&transcript), decode(&transcript));
}

proptest! {
    #[test]
    fn never_fails_on_arbitrary_text(text in any::<String>()) {
        let result = decode(&text);
        prop_assert!(result.is_likely_aamva || !result.warnings.is_empty());
    }

    #[test]
    fn never_fails_on_element_like_lines(
        lines in prop::collection::vec("[A-Z@ ][A-Z0-9]{0,3}[ -~]{0,12}", 0..12),
        separator in prop::sample::select(vec!["\n", "\r", "\u{1e}", "\u{1d}", "\r\n"]),
    ) {
        let text = format!("@\nANSI 636000080102DL\n{}", lines.join(separator));
        let result = decode(&text);
        prop_assert!(result.is_likely_aamva);
        prop_assert_eq!(result.version.as_deref(), Some("08"));
    }
}
