//! Version extraction from raw command output

use crate::platform::Platform;

/// Result of extracting a version from command output
///
/// "No rule for this platform" and "rule matched nothing" both leave the
/// device without a recorded version, but they are kept distinct so the
/// run report can tell an operator which one happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// Version token found
    Found(String),
    /// Platform is supported but the pattern did not match
    NoMatch,
    /// No extraction rule exists for this platform slug
    UnsupportedPlatform,
}

/// Extract a version string for a platform slug
#[must_use]
pub fn extract(slug: &str, output: &str) -> ExtractOutcome {
    let Some(platform) = Platform::from_slug(slug) else {
        return ExtractOutcome::UnsupportedPlatform;
    };

    match extract_version(platform, output) {
        Some(version) => ExtractOutcome::Found(version),
        None => ExtractOutcome::NoMatch,
    }
}

/// Apply a platform's pattern and return the first capture group, trimmed
#[must_use]
pub fn extract_version(platform: Platform, output: &str) -> Option<String> {
    platform
        .version_pattern()
        .captures(output)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim().to_string())
}
