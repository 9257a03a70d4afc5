//! Time-zone lookup
//!
//! Zone data comes from the environment: named zones resolve against the
//! bundled IANA database, and the system zone is detected once at first
//! use and cached for the process lifetime. Detection failure degrades to
//! UTC with a warning; it is an environment condition, not a call error.

use std::sync::OnceLock;

use chrono_tz::Tz;
use tracing::warn;

use tempora_host::{HostError, HostResult};

/// Resolve a zone by IANA name
pub fn locate(name: &str) -> HostResult<Tz> {
    name.parse::<Tz>().map_err(|_| HostError::InvalidZone {
        name: name.to_string(),
    })
}

/// The host system's current zone, detected once per process
pub fn system() -> Tz {
    static SYSTEM_ZONE: OnceLock<Tz> = OnceLock::new();
    *SYSTEM_ZONE.get_or_init(|| match iana_time_zone::get_timezone() {
        Ok(name) => match name.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                warn!(zone = %name, "system zone not in the bundled database, using UTC");
                Tz::UTC
            }
        },
        Err(err) => {
            warn!(error = %err, "could not detect the system zone, using UTC");
            Tz::UTC
        }
    })
}

/// Name of the system zone
pub fn system_name() -> &'static str {
    system().name()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_known_zone() {
        assert_eq!(locate("America/New_York").unwrap(), chrono_tz::America::New_York);
        assert_eq!(locate("UTC").unwrap(), Tz::UTC);
    }

    #[test]
    fn test_locate_unknown_zone_names_offender() {
        let err = locate("Atlantis/Central").unwrap_err();
        assert_eq!(
            err,
            HostError::InvalidZone {
                name: "Atlantis/Central".to_string(),
            }
        );
        assert!(err.to_string().contains("Atlantis/Central"));
    }

    #[test]
    fn test_system_zone_is_stable() {
        assert_eq!(system(), system());
        assert_eq!(system().name(), system_name());
    }
}
