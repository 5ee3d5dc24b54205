use std::sync::OnceLock;

use regex::Regex;

static YEAR: OnceLock<Regex> = OnceLock::new();

/// First run of four digits in free-form date text, e.g. `1988` from `October 1, 1988`.
pub(crate) fn extract_year(text: &str) -> Option<u32> {
    YEAR.get_or_init(|| Regex::new("[0-9]{4}").expect("Year pattern should always be valid"))
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::extract_year;

    #[test]
    fn year_is_found_anywhere_in_the_text() {
        assert_eq!(Some(1988), extract_year("October 1, 1988"));
        assert_eq!(Some(2007), extract_year("2007-09-13"));
        assert_eq!(Some(1974), extract_year("c1974"));
    }

    #[test]
    fn first_four_digit_run_wins() {
        assert_eq!(Some(1999), extract_year("1999, reprinted 2004"));
        assert_eq!(Some(1234), extract_year("123456"));
    }

    #[test]
    fn text_without_year() {
        assert_eq!(None, extract_year("Unknown"));
        assert_eq!(None, extract_year("May 98"));
    }
}
