//! Error types for ipmatch.

use std::fmt;

use thiserror::Error;

use crate::address::IpFamily;

/// Error type for ipmatch operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Query string is not an IPv4 or IPv6 literal
    #[error("invalid IP address: {0}")]
    InvalidAddress(String),

    /// A configured rule entry failed to parse
    #[error("invalid rule '{name}': {source}")]
    InvalidRuleConfiguration {
        name: String,
        #[source]
        source: RuleError,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for ipmatch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Which address of a rule failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Lower bound of a range
    First,
    /// Upper bound of a range
    Second,
    /// Base address of a subnet
    Base,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Endpoint::First => "First IP",
            Endpoint::Second => "Second IP",
            Endpoint::Base => "IP",
        };
        f.write_str(label)
    }
}

/// Error type for rule parsing.
///
/// The `Display` output of each variant is the human-readable reason
/// reported to callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// One side of a range, or the base of a subnet, is not an IP literal
    #[error("{0} is invalid")]
    InvalidAddress(Endpoint),

    /// Nothing recognisable as a rule
    #[error("Badly constructed rule")]
    BadlyConstructedRule,

    /// Range endpoints belong to different address families
    #[error("Both IP must be the same version")]
    MismatchedFamily,

    /// Range minimum is above its maximum
    #[error("First IP higher than the second")]
    InvertedRange,

    /// Subnet prefix length does not fit the address family
    #[error("Mask must be between 0 and {}", .family.max_prefix_len())]
    PrefixOutOfBounds { family: IpFamily, prefix: String },
}

/// Error type for address parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// Not an IPv4 or IPv6 literal
    #[error("invalid IP address: {0}")]
    InvalidAddress(String),
}

impl From<AddressError> for Error {
    fn from(err: AddressError) -> Self {
        match err {
            AddressError::InvalidAddress(s) => Error::InvalidAddress(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_error_reasons() {
        assert_eq!(
            RuleError::InvalidAddress(Endpoint::First).to_string(),
            "First IP is invalid"
        );
        assert_eq!(
            RuleError::InvalidAddress(Endpoint::Second).to_string(),
            "Second IP is invalid"
        );
        assert_eq!(
            RuleError::InvalidAddress(Endpoint::Base).to_string(),
            "IP is invalid"
        );
        assert_eq!(
            RuleError::PrefixOutOfBounds {
                family: IpFamily::V4,
                prefix: "33".to_string()
            }
            .to_string(),
            "Mask must be between 0 and 32"
        );
        assert_eq!(
            RuleError::PrefixOutOfBounds {
                family: IpFamily::V6,
                prefix: "129".to_string()
            }
            .to_string(),
            "Mask must be between 0 and 128"
        );
    }

    #[test]
    fn test_configuration_error_carries_name() {
        let err = Error::InvalidRuleConfiguration {
            name: "Work".to_string(),
            source: RuleError::InvertedRange,
        };
        assert_eq!(
            err.to_string(),
            "invalid rule 'Work': First IP higher than the second"
        );
    }
}
