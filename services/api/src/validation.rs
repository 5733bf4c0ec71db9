//! Input validation for redirect rules

use regex::Regex;
use std::sync::OnceLock;

use crate::middleware::is_excluded_path;

/// Validate a redirect source path
pub fn validate_source_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("Source path is required".to_string());
    }

    if path.len() > 2048 {
        return Err("Source path must be at most 2048 characters long".to_string());
    }

    static SOURCE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = SOURCE_REGEX
        .get_or_init(|| Regex::new(r"^/[^\s?#]*$").expect("Failed to compile source path regex"));

    if !regex.is_match(path) {
        return Err(
            "Source path must start with '/' and contain no whitespace, query or fragment"
                .to_string(),
        );
    }

    if is_excluded_path(path) {
        return Err("Source path is reserved and is never redirected".to_string());
    }

    Ok(())
}

/// Validate a redirect destination: a site path or an absolute http(s) URL
pub fn validate_destination(destination: &str) -> Result<(), String> {
    if destination.is_empty() {
        return Err("Destination path is required".to_string());
    }

    if destination.len() > 2048 {
        return Err("Destination must be at most 2048 characters long".to_string());
    }

    static DESTINATION_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = DESTINATION_REGEX.get_or_init(|| {
        Regex::new(r"^(/[^/\\\s]\S*|/|https?://[^/\\\s]+\S*)$")
            .expect("Failed to compile destination regex")
    });

    if !regex.is_match(destination) {
        return Err("Destination must be a path starting with '/' or an http(s) URL".to_string());
    }

    Ok(())
}
