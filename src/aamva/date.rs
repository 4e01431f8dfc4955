//! Packed dates.
//!
//! AAMVA stores dates as eight digits. United States documents use
//! `MMDDYYYY`; version 01 transcripts and Canadian documents use `YYYYMMDD`.
use chrono::NaiveDate;

pub const PACKED_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateLayout {
    /// `MMDDYYYY`.
    MonthDayYear,

    /// `YYYYMMDD`.
    YearMonthDay,
}

impl DateLayout {
    /// Layout used by a document of the given AAMVA version and country
    /// (`DCG`).
    pub fn for_document(version: Option<u8>, country: Option<&str>) -> Self {
        if version == Some(1) || country.map(str::trim) == Some("CAN") {
            Self::YearMonthDay
        } else {
            Self::MonthDayYear
        }
    }

    fn format(&self) -> &'static str {
        match self {
            Self::MonthDayYear => "%m%d%Y",
            Self::YearMonthDay => "%Y%m%d",
        }
    }
}

fn is_digits(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_digit())
}

/// Converts `YYYY-MM-DD` into the packed `layout`, passing eight digit values
/// through.
///
/// Only the shape of the input is checked.
pub fn to_packed(value: &str, layout: DateLayout) -> Option<String> {
    if value.len() == PACKED_LEN && is_digits(value) {
        return Some(value.to_owned());
    }

    let mut parts = value.split('-');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(year), Some(month), Some(day), None)
            if year.len() == 4
                && month.len() == 2
                && day.len() == 2
                && is_digits(year)
                && is_digits(month)
                && is_digits(day) =>
        {
            Some(match layout {
                DateLayout::MonthDayYear => format!("{month}{day}{year}"),
                DateLayout::YearMonthDay => format!("{year}{month}{day}"),
            })
        }
        _ => None,
    }
}

pub fn format_packed(date: NaiveDate, layout: DateLayout) -> String {
    date.format(layout.format()).to_string()
}

/// Interprets a packed date stored with the given layout.
pub fn parse_packed(value: &str, layout: DateLayout) -> Option<NaiveDate> {
    let value = value.trim();
    if value.len() != PACKED_LEN || !is_digits(value) {
        return None;
    }

    NaiveDate::parse_from_str(value, layout.format()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_dates_are_packed() {
        use DateLayout::*;
        assert_eq!(to_packed("1992-06-14", MonthDayYear).as_deref(), Some("06141992"));
        assert_eq!(to_packed("06141992", MonthDayYear).as_deref(), Some("06141992"));
        assert_eq!(to_packed("1992-06-14", YearMonthDay).as_deref(), Some("19920614"));
    }

    #[test]
    fn other_shapes_are_rejected() {
        assert_eq!(to_packed("14-06-1992", DateLayout::MonthDayYear), None);
        assert_eq!(to_packed("1992-6-14", DateLayout::MonthDayYear), None);
        assert_eq!(to_packed("1992/06/14", DateLayout::MonthDayYear), None);
        assert_eq!(to_packed("0614199", DateLayout::MonthDayYear), None);
        assert_eq!(to_packed("1992-06-14-01", DateLayout::MonthDayYear), None);
        assert_eq!(to_packed("", DateLayout::MonthDayYear), None);
    }

    #[test]
    fn packed_dates_follow_layout() {
        let date = NaiveDate::from_ymd_opt(1992, 6, 14).unwrap();
        assert_eq!(parse_packed("06141992", DateLayout::MonthDayYear), Some(date));
        assert_eq!(parse_packed("19920614", DateLayout::YearMonthDay), Some(date));
        assert_eq!(parse_packed("19920614", DateLayout::MonthDayYear), None);
        assert_eq!(parse_packed("1992-06-14", DateLayout::YearMonthDay), None);
        assert_eq!(format_packed(date, DateLayout::MonthDayYear), "06141992");
        assert_eq!(format_packed(date, DateLayout::YearMonthDay), "19920614");
    }

    #[test]
    fn layout_follows_document() {
        assert_eq!(DateLayout::for_document(Some(8), Some("USA")), DateLayout::MonthDayYear);
        assert_eq!(DateLayout::for_document(Some(8), Some("CAN")), DateLayout::YearMonthDay);
        assert_eq!(DateLayout::for_document(Some(1), None), DateLayout::YearMonthDay);
        assert_eq!(DateLayout::for_document(None, None), DateLayout::MonthDayYear);
    }
}
