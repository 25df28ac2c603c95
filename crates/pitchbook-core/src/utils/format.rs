use chrono::NaiveDate;

/// Format a mobile number for display.
/// Normalizes 11-digit numbers to `0912 345 6789`; anything else is returned as-is.
pub fn format_phone(phone: &str) -> String {
    // Extract just the digits
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.len() {
        11 if digits.starts_with('0') => format!(
            "{} {} {}",
            &digits[0..4],
            &digits[4..7],
            &digits[7..11]
        ),
        // International form without the leading zero
        12 if digits.starts_with("98") => format!(
            "0{} {} {}",
            &digits[2..5],
            &digits[5..8],
            &digits[8..12]
        ),
        _ => phone.to_string(),
    }
}

/// Truncate a string to a maximum number of characters, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    let cleaned = s.replace('\t', " ");
    let cleaned = cleaned.trim();
    if cleaned.chars().count() <= max_len {
        cleaned.to_string()
    } else if max_len <= 3 {
        cleaned.chars().take(max_len).collect()
    } else {
        let truncated: String = cleaned.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Case-insensitive substring match. An empty needle matches everything.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Chart axis date: `2024/02/15`
pub fn format_date_slashed(date: NaiveDate) -> String {
    date.format("%Y/%m/%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_phone() {
        assert_eq!(format_phone("09123456789"), "0912 345 6789");
        assert_eq!(format_phone("0912-345-6789"), "0912 345 6789");
        assert_eq!(format_phone("+98 912 345 6789"), "0912 345 6789");
        assert_eq!(format_phone("123"), "123"); // Too short, return as-is
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("\tpadded\t", 10), "padded");
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Ali Mohammadi", "mohammadi"));
        assert!(contains_ignore_case("Ali Mohammadi", ""));
        assert!(!contains_ignore_case("Ali Mohammadi", "rezaei"));
    }

    #[test]
    fn test_format_date_slashed() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 5).unwrap();
        assert_eq!(format_date_slashed(date), "2024/02/05");
    }
}
