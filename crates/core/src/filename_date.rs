use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

const PREFIX_LEN: usize = 4;
const SHORT_DATE_LEN: usize = 6;
const LONG_DATE_LEN: usize = 8;

/// Recovers a date from camera-style stems such as `IMG_230405_100000` or
/// `20230405_100000`. Only the leading `yyMMdd` / `yyyyMMdd` block followed by
/// `_` or `-` is considered; anything else is a miss.
pub fn parse_filename_date(stem: &str, dcim_prefixes: &[String]) -> Option<NaiveDate> {
    let chars: Vec<char> = strip_dcim_prefix(stem, dcim_prefixes).chars().collect();

    if chars.get(SHORT_DATE_LEN).copied().is_some_and(is_separator) {
        return parse_short_date(&chars[..SHORT_DATE_LEN]);
    }
    if chars.get(LONG_DATE_LEN).copied().is_some_and(is_separator) {
        return parse_long_date(&chars[..LONG_DATE_LEN]);
    }

    None
}

/// Midnight local time on the date found in the stem.
pub fn filename_timestamp(stem: &str, dcim_prefixes: &[String]) -> Option<DateTime<Local>> {
    let date = parse_filename_date(stem, dcim_prefixes)?;
    local_from_naive(date.and_hms_opt(0, 0, 0)?)
}

/// True when the first ten characters of `file_name` form a `YYYY-MM-DD` date.
pub fn has_iso_date_prefix(file_name: &str) -> bool {
    let head: Vec<char> = file_name.chars().take(10).collect();
    if head.len() < 10 || head[4] != '-' || head[7] != '-' {
        return false;
    }
    let all_digits = [0..4, 5..7, 8..10]
        .into_iter()
        .all(|range| head[range].iter().all(char::is_ascii_digit));
    all_digits
        && NaiveDate::parse_from_str(&head.iter().collect::<String>(), "%Y-%m-%d").is_ok()
}

pub(crate) fn local_from_naive(naive: NaiveDateTime) -> Option<DateTime<Local>> {
    Local
        .from_local_datetime(&naive)
        .single()
        .or_else(|| Local.from_local_datetime(&naive).earliest())
}

fn strip_dcim_prefix<'a>(stem: &'a str, dcim_prefixes: &[String]) -> &'a str {
    let Some((cut, _)) = stem.char_indices().nth(PREFIX_LEN) else {
        return stem;
    };
    let head = stem[..cut].to_uppercase();
    if dcim_prefixes.iter().any(|prefix| prefix == &head) {
        &stem[cut..]
    } else {
        stem
    }
}

fn is_separator(ch: char) -> bool {
    ch == '_' || ch == '-'
}

fn parse_short_date(digits: &[char]) -> Option<NaiveDate> {
    let yy = parse_number(&digits[0..2])?;
    let year = if yy < 69 { 2000 + yy } else { 1900 + yy };
    ymd(year, &digits[2..4], &digits[4..6])
}

fn parse_long_date(digits: &[char]) -> Option<NaiveDate> {
    let year = parse_number(&digits[0..4])?;
    ymd(year, &digits[4..6], &digits[6..8])
}

fn ymd(year: u32, month: &[char], day: &[char]) -> Option<NaiveDate> {
    let year = i32::try_from(year).ok()?;
    NaiveDate::from_ymd_opt(year, parse_number(month)?, parse_number(day)?)
}

fn parse_number(digits: &[char]) -> Option<u32> {
    digits.iter().try_fold(0u32, |acc, ch| {
        ch.to_digit(10).map(|d| acc * 10 + d)
    })
}
