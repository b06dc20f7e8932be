//! API version discovery and compatibility gating.
//!
//! The unauthenticated `/info` endpoint reports a product name and a
//! preferred API version string such as `v310.51`. Operations that were only
//! verified against newer server builds refuse to proceed when the reported
//! minor version is below their threshold; the thresholds are fixed
//! per-operation constants, not derived.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Major API version every operation in this workspace targets.
pub const MAJOR_VERSION: &str = "v310";

/// Product name reported by a VMstore appliance.
pub const PRODUCT_VMSTORE: &str = "Tintri VMstore";

/// Product name reported by a Global Center management server.
pub const PRODUCT_GLOBAL_CENTER: &str = "Tintri Global Center";

/// Parsed form of a preferred-version string like `v310.51`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiVersion {
    /// Major version, e.g. `v310`.
    pub major: String,
    /// Minor version number.
    pub minor: u32,
}

impl FromStr for ApiVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || Error::Unsupported(format!("malformed API version string `{s}`"));
        let (major, minor) = s.split_once('.').ok_or_else(malformed)?;
        if major.is_empty() {
            return Err(malformed());
        }
        let minor = minor.parse().map_err(|_| malformed())?;
        Ok(Self {
            major: major.to_string(),
            minor,
        })
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Response of the unauthenticated `/info` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    /// Product name, e.g. `Tintri VMstore` or `Tintri Global Center`.
    pub product_name: String,
    /// Preferred API version string, e.g. `v310.51`.
    pub preferred_version: String,
    /// Remaining fields the endpoint reports (supported versions, build).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl VersionInfo {
    /// Parse the preferred version string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] when the string is malformed.
    pub fn preferred(&self) -> Result<ApiVersion> {
        self.preferred_version.parse()
    }

    /// Refuse servers this operation was not verified against.
    ///
    /// Checks the product name, the major version, and a per-operation
    /// minimum minor version, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] naming the first failed check.
    pub fn check(&self, product: &str, min_minor: u32) -> Result<()> {
        if self.product_name != product {
            return Err(Error::Unsupported(format!(
                "server is a {}, not a {product}",
                self.product_name
            )));
        }
        let version = self.preferred()?;
        if version.major != MAJOR_VERSION {
            return Err(Error::Unsupported(format!(
                "incorrect major version {}, should be {MAJOR_VERSION}",
                version.major
            )));
        }
        if version.minor < min_minor {
            return Err(Error::Unsupported(format!(
                "incorrect minor version {}, should be {min_minor} or greater",
                version.minor
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn info(product: &str, version: &str) -> VersionInfo {
        serde_json::from_value(json!({
            "productName": product,
            "preferredVersion": version
        }))
        .unwrap()
    }

    #[test]
    fn parses_preferred_version() {
        let version: ApiVersion = "v310.51".parse().unwrap();
        assert_eq!(version.major, "v310");
        assert_eq!(version.minor, 51);
        assert_eq!(version.to_string(), "v310.51");
    }

    #[test]
    fn rejects_malformed_versions() {
        for bad in ["v310", "", ".51", "v310.x"] {
            let err = bad.parse::<ApiVersion>().unwrap_err();
            assert!(matches!(err, Error::Unsupported(_)), "{bad}");
        }
    }

    #[test]
    fn vmstore_at_minor_51_passes_gate_of_31() {
        let info = info(PRODUCT_VMSTORE, "v310.51");
        assert!(info.check(PRODUCT_VMSTORE, 31).is_ok());
    }

    #[test]
    fn global_center_is_rejected_when_vmstore_required() {
        let info = info(PRODUCT_GLOBAL_CENTER, "v310.51");
        let err = info.check(PRODUCT_VMSTORE, 31).unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
        assert!(err.to_string().contains("Tintri Global Center"));
    }

    #[test]
    fn old_minor_version_is_rejected() {
        let info = info(PRODUCT_VMSTORE, "v310.21");
        let err = info.check(PRODUCT_VMSTORE, 31).unwrap_err();
        assert!(err.to_string().contains("should be 31 or greater"));
    }

    #[test]
    fn wrong_major_version_is_rejected() {
        let info = info(PRODUCT_VMSTORE, "v200.51");
        let err = info.check(PRODUCT_VMSTORE, 31).unwrap_err();
        assert!(err.to_string().contains("should be v310"));
    }

    #[test]
    fn extra_info_fields_are_preserved() {
        let info: VersionInfo = serde_json::from_value(json!({
            "productName": "Tintri VMstore",
            "preferredVersion": "v310.51",
            "supportedVersions": ["v310.51", "v310.31"]
        }))
        .unwrap();
        assert!(info.extra.contains_key("supportedVersions"));
    }
}
