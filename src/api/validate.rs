//! Input validation for the shorten endpoint.

use url::Url;

pub const MAX_URL_LEN: usize = 2048;

/// Validate a submitted URL. Surrounding whitespace is trimmed before
/// any check and the trimmed form is what gets stored. Returns the list
/// of violated rules on failure.
pub fn shorten_url(input: &str) -> Result<String, Vec<String>> {
    let trimmed = input.trim();
    let mut issues = Vec::new();

    if trimmed.is_empty() {
        issues.push("URL is required".to_string());
        return Err(issues);
    }

    if trimmed.len() > MAX_URL_LEN {
        issues.push("URL is too long".to_string());
    }

    match Url::parse(trimmed) {
        Ok(parsed) => {
            if !matches!(parsed.scheme(), "http" | "https") {
                issues.push("Only HTTP and HTTPS URLs are allowed".to_string());
            }
        }
        Err(_) => issues.push("Invalid URL format".to_string()),
    }

    if issues.is_empty() {
        Ok(trimmed.to_string())
    } else {
        Err(issues)
    }
}
