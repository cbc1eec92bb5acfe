//! Platform definitions for the supported Fujitsu families.
//!
//! Each family is described by data only: prompt patterns, privilege
//! levels, error strings, command templates and fact tables. The
//! [`Platform`] enum selects one.

mod definition;
mod privilege_level;
pub mod vendors;

use std::fmt;
use std::str::FromStr;

pub use definition::{CommandSet, DeviceInfoPatterns, PlatformDefinition};
pub use privilege_level::{PrivilegeLevel, SessionMode};

use crate::error::PlatformError;

/// Supported device families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Fujitsu Si-R routers.
    FujitsuSir,
    /// Fujitsu SR-S switches.
    FujitsuSrs,
    /// Fujitsu IPCOM.
    FujitsuIpcom,
}

impl Platform {
    /// All supported platforms.
    pub const ALL: [Platform; 3] = [
        Platform::FujitsuSir,
        Platform::FujitsuSrs,
        Platform::FujitsuIpcom,
    ];

    /// Platform name, e.g. `fujitsu_sir`.
    pub fn name(&self) -> &'static str {
        match self {
            Platform::FujitsuSir => vendors::fujitsu_sir::PLATFORM_NAME,
            Platform::FujitsuSrs => vendors::fujitsu_srs::PLATFORM_NAME,
            Platform::FujitsuIpcom => vendors::fujitsu_ipcom::PLATFORM_NAME,
        }
    }

    /// Build the platform definition.
    pub fn definition(&self) -> PlatformDefinition {
        match self {
            Platform::FujitsuSir => vendors::fujitsu_sir::platform(),
            Platform::FujitsuSrs => vendors::fujitsu_srs::platform(),
            Platform::FujitsuIpcom => vendors::fujitsu_ipcom::platform(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fujitsu_sir" | "sir" | "si-r" => Ok(Platform::FujitsuSir),
            "fujitsu_srs" | "srs" | "sr-s" => Ok(Platform::FujitsuSrs),
            "fujitsu_ipcom" | "ipcom" => Ok(Platform::FujitsuIpcom),
            _ => Err(PlatformError::UnknownPlatform {
                name: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_names_round_trip() {
        for platform in Platform::ALL {
            assert_eq!(platform.name().parse::<Platform>().unwrap(), platform);
            assert_eq!(platform.definition().name, platform.name());
        }
    }

    #[test]
    fn test_platform_aliases() {
        assert_eq!("Si-R".parse::<Platform>().unwrap(), Platform::FujitsuSir);
        assert_eq!("SRS".parse::<Platform>().unwrap(), Platform::FujitsuSrs);
        assert!("cisco_ios".parse::<Platform>().is_err());
    }
}
