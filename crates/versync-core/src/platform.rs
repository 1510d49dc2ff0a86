//! Platform rule table
//!
//! Maps a NetBox platform slug to the CLI command that prints the running
//! version and the pattern that pulls the version token out of its output.
//! Output formats differ per platform, so each row carries its own capture
//! semantics. Slugs outside this table are skipped, never erred.

use std::sync::LazyLock;

use regex::Regex;

static IOS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Version\s+([\w\.]+[\w\(\)]+)").unwrap());
static NXOS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"NXOS.*version\s+(\S+)").unwrap());
static ASA_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Version\s+(\S+)").unwrap());
static PANOS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"sw-version:\s*(.*)").unwrap());
static ARUBA_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Version\s+:\s+([\w\.]+)").unwrap());

/// A device platform with version extraction rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Cisco IOS / IOS-XE
    CiscoIos,
    /// Cisco Nexus NX-OS
    CiscoNxos,
    /// Cisco ASA
    CiscoAsa,
    /// ArubaOS controllers
    ArubaOs,
    /// Palo Alto PAN-OS
    PaloaltoPanos,
}

impl Platform {
    /// All supported platforms
    pub const ALL: [Platform; 5] = [
        Platform::CiscoIos,
        Platform::CiscoNxos,
        Platform::CiscoAsa,
        Platform::ArubaOs,
        Platform::PaloaltoPanos,
    ];

    /// Look up a platform by its NetBox slug
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "cisco_ios" => Some(Platform::CiscoIos),
            "cisco_nxos" => Some(Platform::CiscoNxos),
            "cisco_asa" => Some(Platform::CiscoAsa),
            "aruba_os" => Some(Platform::ArubaOs),
            "paloalto_panos" => Some(Platform::PaloaltoPanos),
            _ => None,
        }
    }

    /// NetBox slug for this platform
    #[must_use]
    pub fn slug(&self) -> &'static str {
        match self {
            Platform::CiscoIos => "cisco_ios",
            Platform::CiscoNxos => "cisco_nxos",
            Platform::CiscoAsa => "cisco_asa",
            Platform::ArubaOs => "aruba_os",
            Platform::PaloaltoPanos => "paloalto_panos",
        }
    }

    /// CLI command that prints the running version
    #[must_use]
    pub fn version_command(&self) -> &'static str {
        match self {
            Platform::CiscoIos => "show version | include Version",
            Platform::CiscoNxos => "show version | include \"NXOS: version\" ",
            Platform::CiscoAsa => "show version | include Version",
            Platform::ArubaOs => "show version | include Version ",
            Platform::PaloaltoPanos => "show system info | match sw-version",
        }
    }

    /// Pattern whose first capture group is the version token
    #[must_use]
    pub fn version_pattern(&self) -> &'static Regex {
        match self {
            Platform::CiscoIos => &IOS_PATTERN,
            Platform::CiscoNxos => &NXOS_PATTERN,
            Platform::CiscoAsa => &ASA_PATTERN,
            Platform::ArubaOs => &ARUBA_PATTERN,
            Platform::PaloaltoPanos => &PANOS_PATTERN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_roundtrip() {
        for platform in Platform::ALL {
            assert_eq!(Platform::from_slug(platform.slug()), Some(platform));
        }
    }

    #[test]
    fn test_unknown_slug() {
        assert_eq!(Platform::from_slug("juniper_junos"), None);
        assert_eq!(Platform::from_slug(""), None);
    }

    #[test]
    fn test_every_platform_has_rules() {
        for platform in Platform::ALL {
            assert!(!platform.version_command().is_empty());
            assert!(platform.version_pattern().captures_len() >= 2);
        }
    }
}
