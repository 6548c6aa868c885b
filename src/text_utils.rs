use std::ops::Index;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::Regex;

fn to_int<T: std::str::FromStr>(num_str: &str, date_str: &str) -> Result<T, String> {
    match num_str.parse::<T>() {
        Ok(x) => Ok(x),
        Err(_) => Err(format!("Error parsing {} from the date {}", num_str, date_str)),
    }
}

/// Parses the `date` field of a post. Accepts `2024-03-01`, `2024-03-01T10:20`,
/// `2024-03-01 10:20:30.000` and RFC 3339 strings; any zone suffix is ignored.
pub fn parse_post_date(buf: &str) -> Result<NaiveDateTime, String> {
    lazy_static! {
        static ref DATE_REGEX: Regex = Regex::new(
            r"^(\d{4})-(\d{1,2})-(\d{1,2})(?:[T ](\d{1,2}):(\d{1,2})(?::(\d{1,2}))?(?:\.\d+)?)?"
        ).unwrap();
    }

    let buf = buf.trim();
    let Some(caps) = DATE_REGEX.captures(buf) else {
        return Err(format!("Unable to parse date {}", buf));
    };

    let to_i32 = |num_str: &str| to_int::<i32>(num_str, buf);
    let to_u32 = |num_str: &str| to_int::<u32>(num_str, buf);
    let opt_u32 = |idx: usize| caps.get(idx).map_or(Ok(0), |m| to_u32(m.as_str()));

    let y: i32 = to_i32(caps.index(1))?;
    let m: u32 = to_u32(caps.index(2))?;
    let d: u32 = to_u32(caps.index(3))?;
    let h: u32 = opt_u32(4)?;
    let mn: u32 = opt_u32(5)?;
    let s: u32 = opt_u32(6)?;

    let date = NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| format!("Invalid calendar date {}", buf))?;
    let time = NaiveTime::from_hms_opt(h, mn, s)
        .ok_or_else(|| format!("Invalid time of day {}", buf))?;

    Ok(NaiveDateTime::new(date, time))
}

pub fn format_rfc2822(date_time: &NaiveDateTime) -> String {
    Utc.from_utc_datetime(date_time).to_rfc2822()
}

/// Heading anchor: lowercase, every run of non-alphanumeric characters collapsed
/// into one hyphen, no leading or trailing hyphen. Ids are ASCII-folded with
/// `unidecode` first, so "Café" becomes `cafe`.
pub fn anchor_id(text: &str) -> String {
    let ascii = unidecode::unidecode(text).to_lowercase();

    let mut id = String::with_capacity(ascii.len());
    let mut pending_hyphen = false;
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !id.is_empty() {
                id.push('-');
            }
            pending_hyphen = false;
            id.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    id
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_post_date() {
        let date_time = parse_post_date("2024-03-15").unwrap();
        assert_eq!(date_time.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-03-15 00:00:00");

        let date_time = parse_post_date("2024-03-15T10:42:32Z").unwrap();
        assert_eq!(date_time.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-03-15 10:42:32");

        let date_time = parse_post_date("2017-09-10 10:42:32.123").unwrap();
        assert_eq!(date_time.format("%Y-%m-%d %H:%M:%S").to_string(), "2017-09-10 10:42:32");

        let date_time = parse_post_date("2024-03-15T08:30").unwrap();
        assert_eq!(date_time.format("%H:%M:%S").to_string(), "08:30:00");
    }

    #[test]
    fn test_parse_invalid_date() {
        assert!(parse_post_date("March 15th").is_err());
        assert!(parse_post_date("2024-02-31").is_err());
        assert!(parse_post_date("").is_err());
    }

    #[test]
    fn test_rfc2822() {
        let date_time = parse_post_date("2024-01-02 05:06:07").unwrap();
        assert_eq!(format_rfc2822(&date_time), "Tue, 2 Jan 2024 05:06:07 +0000");
    }

    #[test]
    fn test_anchor_id() {
        assert_eq!(anchor_id("Getting Started"), "getting-started");
        assert_eq!(anchor_id("  What's new in v2.0?  "), "what-s-new-in-v2-0");
        assert_eq!(anchor_id("**Bold** -- heading"), "bold-heading");
        assert_eq!(anchor_id("Café Rendering"), "cafe-rendering");
        assert_eq!(anchor_id("???"), "");
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("one two\nthree\t four  "), 4);
        assert_eq!(word_count("   "), 0);
    }
}
