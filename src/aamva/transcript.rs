use std::fmt;

use super::Element;

pub const COMPLIANCE_INDICATOR: &str = "@";

const HEADER_KEYWORD: &str = "ANSI";

/// Header keyword used by pre-standard transcripts.
const LEGACY_HEADER_KEYWORD: &str = "AAMVA";

const DATA_ELEMENT_SEPARATOR: char = '\n';

const SEGMENT_TERMINATOR: char = '\r';

const RECORD_SEPARATOR: char = '\x1e';

const GROUP_SEPARATOR: char = '\x1d';

/// AAMVA version written by the encoder.
pub const AAMVA_VERSION: u8 = 8;

pub const JURISDICTION_VERSION: u8 = 1;

/// Newest AAMVA version understood by the decoder.
pub const MAX_AAMVA_VERSION: u8 = 10;

/// Subfile designators written after the encoder header.
const SUBFILE_DESIGNATORS: [SubfileDesignator; 2] = [
    SubfileDesignator {
        subfile_type: *b"DL",
        offset: 41,
        length: 288,
    },
    SubfileDesignator {
        subfile_type: *b"ZA",
        offset: 329,
        length: 15,
    },
];

const SUBFILE_TYPE: &str = "DL";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("malformed header")]
    MalformedHeader,

    #[error("unsupported AAMVA version {0:02}")]
    UnsupportedVersion(u8),

    #[error("payload contains binary data")]
    BinaryData,
}

/// Serialized AAMVA payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transcript(String);

impl Transcript {
    /// Writes the compliance indicator, the header and one line per entry.
    pub fn encode<'a>(
        header: &Header,
        entries: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let mut result = String::new();
        result.push_str(COMPLIANCE_INDICATOR);
        result.push(DATA_ELEMENT_SEPARATOR);
        header.encode_to(&mut result);
        for designator in &SUBFILE_DESIGNATORS {
            designator.encode_to(&mut result);
        }
        result.push_str(SUBFILE_TYPE);
        result.push(DATA_ELEMENT_SEPARATOR);

        for (code, value) in entries {
            result.push_str(code);
            result.push_str(value);
            result.push(DATA_ELEMENT_SEPARATOR);
        }

        Self(result)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.0.lines()
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Transcript {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Transcript> for String {
    fn from(value: Transcript) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub issuer_id: u32,
    pub version: u8,
    pub jurisdiction_version: Option<u8>,
    pub entry_count: Option<u8>,
}

impl Header {
    pub fn new(issuer_id: u32) -> Self {
        Self {
            issuer_id,
            version: AAMVA_VERSION,
            jurisdiction_version: Some(JURISDICTION_VERSION),
            entry_count: Some(SUBFILE_DESIGNATORS.len() as u8),
        }
    }

    /// Two digit version token.
    pub fn version_token(&self) -> String {
        format!("{:02}", self.version)
    }

    fn encode_to(&self, buffer: &mut String) {
        buffer.push_str(HEADER_KEYWORD);
        buffer.push(' ');
        buffer.push_str(&format!("{:06}{:02}", self.issuer_id, self.version));
        if let Some(v) = self.jurisdiction_version {
            buffer.push_str(&format!("{v:02}"));
        }
        if let Some(n) = self.entry_count {
            buffer.push_str(&format!("{n:02}"));
        }
    }

    /// Decodes the header fields following the keyword.
    ///
    /// Returns the header and whatever is left on the line once subfile
    /// designators have been skipped.
    fn decode(input: &str) -> Result<(Self, &str), ParseError> {
        let rest = input.trim_start();
        let (issuer_id, rest) = take_digits(rest, 6).ok_or(ParseError::MalformedHeader)?;
        let (version, rest) = take_digits(rest, 2).ok_or(ParseError::MalformedHeader)?;
        let version = version as u8;

        if version > MAX_AAMVA_VERSION {
            return Err(ParseError::UnsupportedVersion(version));
        }

        // Version 01 headers have no jurisdiction version.
        let (jurisdiction_version, rest) = if version >= 2 {
            match take_digits(rest, 2) {
                Some((v, rest)) => (Some(v as u8), rest),
                None => (None, rest),
            }
        } else {
            (None, rest)
        };

        let (entry_count, mut rest) = match take_digits(rest, 2) {
            Some((n, rest)) => (Some(n as u8), rest),
            None => (None, rest),
        };

        while let Some(next) = skip_designator(rest) {
            rest = next;
        }

        Ok((
            Self {
                issuer_id,
                version,
                jurisdiction_version,
                entry_count,
            },
            rest,
        ))
    }
}

pub struct SubfileDesignator {
    pub subfile_type: [u8; 2],
    pub offset: u16,
    pub length: u16,
}

impl SubfileDesignator {
    fn encode_to(&self, buffer: &mut String) {
        buffer.extend(self.subfile_type.iter().map(|b| *b as char));
        buffer.push_str(&format!("{:04}{:04}", self.offset, self.length));
    }
}

fn take_digits(input: &str, n: usize) -> Option<(u32, &str)> {
    let digits = input.get(..n)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some((digits.parse().ok()?, &input[n..]))
}

fn is_subfile_type(bytes: &[u8]) -> bool {
    bytes.len() == 2 && bytes.iter().all(u8::is_ascii_uppercase)
}

fn skip_designator(input: &str) -> Option<&str> {
    let bytes = input.as_bytes();
    if bytes.len() >= 10
        && is_subfile_type(&bytes[..2])
        && bytes[2..10].iter().all(u8::is_ascii_digit)
    {
        Some(&input[10..])
    } else {
        None
    }
}

fn is_known_code(code: Option<&str>) -> bool {
    code.and_then(Element::from_code).is_some()
}

/// Removes a subfile type glued in front of an element (`DLDAQ…`, `ZCZCA…`).
fn strip_subfile_type(line: &str) -> &str {
    let bytes = line.as_bytes();
    if bytes.len() >= 5 && is_subfile_type(&bytes[..2]) && !is_known_code(line.get(..3)) {
        let inner = &line[2..];
        if is_known_code(inner.get(..3)) || bytes[2..4] == bytes[..2] {
            return inner;
        }
    }

    line
}

fn strip_header_keyword(line: &str) -> Option<&str> {
    let line = line.trim_start_matches(COMPLIANCE_INDICATOR);
    let rest = line
        .strip_prefix(HEADER_KEYWORD)
        .or_else(|| line.strip_prefix(LEGACY_HEADER_KEYWORD))?;

    // A header carries digits right after the keyword, possibly spaced out.
    if !rest.starts_with(|c: char| c.is_whitespace() || c.is_ascii_digit()) {
        return None;
    }

    rest.trim_start()
        .starts_with(|c: char| c.is_ascii_digit())
        .then_some(rest)
}

/// Element line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEntry {
    pub code: String,
    pub value: String,
}

impl RecordEntry {
    fn decode(line: &str) -> Option<Self> {
        let line = strip_subfile_type(line);
        let code = line.get(..3)?;
        let bytes = code.as_bytes();
        if !bytes[0].is_ascii_uppercase()
            || !bytes
                .iter()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            return None;
        }

        Some(Self {
            code: code.to_owned(),
            value: line[3..].trim_end().to_owned(),
        })
    }
}

/// Header and element lines recovered from scanned text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTranscript {
    pub header: Option<Header>,
    pub entries: Vec<RecordEntry>,
}

impl RawTranscript {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let is_separator = |c: char| {
            matches!(
                c,
                DATA_ELEMENT_SEPARATOR | SEGMENT_TERMINATOR | RECORD_SEPARATOR | GROUP_SEPARATOR
            )
        };

        if text
            .chars()
            .any(|c| c.is_control() && c != '\t' && !is_separator(c))
        {
            return Err(ParseError::BinaryData);
        }

        let mut result = Self::default();

        for line in text.split(is_separator) {
            let line = line.trim_start();
            if line.is_empty() || line == COMPLIANCE_INDICATOR {
                continue;
            }

            let line = match strip_header_keyword(line) {
                Some(rest) if result.header.is_none() => {
                    let (header, rest) = Header::decode(rest)?;
                    result.header = Some(header);

                    // The subfile type may be followed by the first element.
                    let rest = rest.trim_start();
                    match rest.as_bytes() {
                        [a, b, ..]
                            if is_subfile_type(&[*a, *b]) && !is_known_code(rest.get(..3)) =>
                        {
                            &rest[2..]
                        }
                        _ => rest,
                    }
                }
                _ => line,
            };

            if let Some(entry) = RecordEntry::decode(line) {
                result.entries.push(entry);
            }
        }

        Ok(result)
    }

    /// First non-empty value of `code`.
    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.code == code && !e.value.is_empty())
            .map(|e| e.value.as_str())
    }

    pub fn version(&self) -> Option<u8> {
        self.header.map(|h| h.version)
    }
}
