//! Name generation from numbering patterns
//!
//! A pattern is literal text with placeholders:
//! - `{n}` is replaced by the index without padding
//! - `{0}`, `{00}`, `{000}`... are replaced by the index zero-padded to the number of zeros
//!
//! Examples: "{n}" -> "1.jpg", "IMG_{000}" -> "IMG_005.png", "{00}" with index 10 -> "10.jpg"

use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashSet;

use crate::types::{FileRecord, IMAGE_EXTENSIONS};

static ZERO_PAD_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(0+)\}").expect("zero padding token regex"));

static ANY_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(n|0+)\}").expect("placeholder token regex"));

/// Generate a file name for a 1-based index
///
/// The source extension is appended unless the result already ends with a
/// recognized image extension, so an explicit extension in the pattern wins.
pub fn generate(index: usize, pattern: &str, extension: &str) -> String {
    let padded = ZERO_PAD_TOKEN.replace_all(pattern, |caps: &Captures| {
        let width = caps[1].len();
        format!("{:0width$}", index, width = width)
    });

    let mut result = padded.replace("{n}", &index.to_string());

    if !has_image_extension(&result) {
        result.push_str(extension);
    }

    result
}

/// Case-sensitive suffix match against the image extensions
fn has_image_extension(name: &str) -> bool {
    IMAGE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// A usable pattern is non-blank, has at least one placeholder and names a
/// file inside the target folder (no path separators)
pub fn validate_pattern(pattern: &str) -> bool {
    if pattern.trim().is_empty() || pattern.contains(['/', '\\']) {
        return false;
    }
    ANY_TOKEN.is_match(pattern)
}

/// True if any generated name occurs more than once
pub fn check_duplicates<S: AsRef<str>>(names: &[S]) -> bool {
    let unique: HashSet<&str> = names.iter().map(|n| n.as_ref()).collect();
    unique.len() != names.len()
}

/// Fill `new_name` on every record by its position in the slice
pub fn apply_pattern(records: &mut [FileRecord], pattern: &str) {
    for (i, record) in records.iter_mut().enumerate() {
        record.new_name = generate(i + 1, pattern, &record.extension);
    }

    debug!(
        "Generated {} names with pattern {:?}",
        records.len(),
        pattern
    );
}

/// Short help text for pattern input fields
pub fn pattern_examples() -> &'static str {
    "Examples: {n} → 1, 2, 3 | {000} → 001, 002 | IMG_{00} → IMG_01, IMG_02"
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use std::path::PathBuf;

    // ========== generate tests ==========

    #[test]
    fn test_generate_plain_index() {
        assert_eq!(generate(1, "{n}", ".jpg"), "1.jpg");
    }

    #[test]
    fn test_generate_zero_padding() {
        assert_eq!(generate(5, "{000}", ".png"), "005.png");
    }

    #[test]
    fn test_generate_padding_width_exceeded() {
        assert_eq!(generate(10, "{00}", ".jpg"), "10.jpg");
        assert_eq!(generate(1234, "{0}", ".jpg"), "1234.jpg");
    }

    #[test]
    fn test_generate_prefix_and_padding() {
        assert_eq!(generate(5, "IMG_{000}", ".png"), "IMG_005.png");
    }

    #[test]
    fn test_generate_multiple_widths() {
        assert_eq!(generate(7, "{0}-{000}-{n}", ".gif"), "7-007-7.gif");
    }

    #[test]
    fn test_generate_explicit_extension_wins() {
        assert_eq!(generate(2, "img_{00}.jpg", ".png"), "img_02.jpg");
        assert_eq!(generate(3, "shot_{n}.png", ".jpg"), "shot_3.png");
    }

    #[test]
    fn test_generate_extension_match_is_case_sensitive() {
        assert_eq!(generate(1, "a_{n}.JPG", ".jpg"), "a_1.JPG.jpg");
    }

    #[test]
    fn test_generate_unknown_suffix_gets_extension() {
        assert_eq!(generate(1, "scan_{n}.raw", ".tif"), "scan_1.raw.tif");
    }

    #[test]
    fn test_generate_literal_pattern() {
        assert_eq!(generate(4, "cover", ".webp"), "cover.webp");
    }

    #[test]
    fn test_generate_is_deterministic() {
        let a = generate(42, "x_{0000}_{n}", ".bmp");
        let b = generate(42, "x_{0000}_{n}", ".bmp");
        assert_eq!(a, b);
        assert_eq!(a, "x_0042_42.bmp");
    }

    // ========== validate_pattern tests ==========

    #[test]
    fn test_validate_pattern_empty() {
        assert!(!validate_pattern(""));
        assert!(!validate_pattern("   "));
    }

    #[test]
    fn test_validate_pattern_without_placeholder() {
        assert!(!validate_pattern("holiday"));
        assert!(!validate_pattern("{x}"));
        assert!(!validate_pattern("{}"));
    }

    #[test]
    fn test_validate_pattern_with_placeholder() {
        assert!(validate_pattern("{n}"));
        assert!(validate_pattern("IMG_{000}"));
        assert!(validate_pattern("  trip_{0} "));
    }

    #[test]
    fn test_validate_pattern_rejects_path_separators() {
        assert!(!validate_pattern("../{n}"));
        assert!(!validate_pattern("sub/{000}"));
        assert!(!validate_pattern("..\\{n}"));
        assert!(validate_pattern("..{n}"));
    }

    // ========== check_duplicates tests ==========

    #[test]
    fn test_check_duplicates_found() {
        assert!(check_duplicates(&["1.jpg", "2.jpg", "1.jpg"]));
    }

    #[test]
    fn test_check_duplicates_none() {
        assert!(!check_duplicates(&["1.jpg", "2.jpg"]));
        assert!(!check_duplicates::<String>(&[]));
    }

    // ========== apply_pattern tests ==========

    #[test]
    fn test_apply_pattern_uses_position_and_extension() {
        let mut records = vec![
            FileRecord::new(PathBuf::from("/p/b.PNG"), Local::now()),
            FileRecord::new(PathBuf::from("/p/a.jpg"), Local::now()),
        ];
        apply_pattern(&mut records, "img_{00}");
        assert_eq!(records[0].new_name, "img_01.png");
        assert_eq!(records[1].new_name, "img_02.jpg");
    }
}
