//! Checks behind the `date` and `email` formats.
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Longest accepted local part (before `@`) and whole address, in bytes.
const EMAIL_MAX_LOCAL_LEN: usize = 64;
const EMAIL_MAX_LEN: usize = 320;

/// Dot-atom local part, then a dotted host name whose labels are
/// alphanumeric with inner hyphens. Quoted local parts and address literals
/// are not accepted.
static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*",
        r"@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+",
        r"[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$",
    ))
    .expect("email pattern compiles")
});

/// Strict calendar date: must parse as `YYYY-MM-DD` and print back to the
/// exact same text, so `2021-02-29`, `2021-2-01` and `2021-13-40` all fail.
pub fn is_date(s: &str) -> bool {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .is_ok_and(|date| date.format(DATE_FORMAT).to_string() == s)
}

pub fn is_email(s: &str) -> bool {
    if s.len() > EMAIL_MAX_LEN {
        return false;
    }
    match s.split_once('@') {
        Some((local, _)) if local.len() <= EMAIL_MAX_LOCAL_LEN => EMAIL.is_match(s),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leap_days() {
        assert!(is_date("2020-02-29"));
        assert!(!is_date("2021-02-29"));
    }

    #[test]
    fn non_canonical_dates() {
        assert!(is_date("1999-12-31"));
        for s in ["2021-13-40", "2021-2-01", "2021-02-1", "21-02-01", "2021/02/01", "2021-02-01T00:00", " 2021-02-01", ""] {
            assert!(!is_date(s), "{s:?}");
        }
    }

    #[test]
    fn valid_emails() {
        for s in ["user@example.com", "first.last+tag@mail.example.org", "x@a-b.io", "o'neil@example.ie"] {
            assert!(is_email(s), "{s:?}");
        }
    }

    #[test]
    fn invalid_emails() {
        for s in ["foo", "bad", "@example.com", "user@", "user@localhost", "user@@example.com", ".user@example.com",
                  "us..er@example.com", "user@-example.com", "user@example-.com", "user name@example.com"] {
            assert!(!is_email(s), "{s:?}");
        }
        let long_local = format!("{}@example.com", "a".repeat(65));
        assert!(!is_email(&long_local));
    }
}
