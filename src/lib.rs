//! ipmatch - IP whitelist/blacklist rule matching.
//!
//! This crate decides whether an IP address is covered by a list of rules.
//! Each rule is one of:
//!
//! - **Single address**: `10.0.0.1`, `2001:db8::1`
//! - **Inclusive range**: `10.0.0.10 - 10.0.0.15`, `2001::1-2001::ff`
//! - **CIDR subnet**: `10.0.0.0/24`, `4000::1100/120`
//!
//! IPv4 and IPv6 are both supported. Addresses of one family never match
//! rules of the other.
//!
//! # Quick Start
//!
//! ```
//! use ipmatch::{contains, parse_rule, RuleEntry};
//!
//! // Validate a single rule
//! assert!(parse_rule("10.0.0.1 - 10.0.0.2").is_ok());
//! assert_eq!(
//!     parse_rule("10.0.0.2 - 10.0.0.1").unwrap_err().to_string(),
//!     "First IP higher than the second"
//! );
//!
//! // Check an address against a list of named rules
//! let whitelist = [
//!     RuleEntry::new("Work", "10.0.0.10 - 10.0.0.15"),
//!     RuleEntry::new("Lab", "10.0.1.0/24"),
//! ];
//! assert!(contains(&whitelist, "10.0.1.7").unwrap());
//! assert!(!contains(&whitelist, "10.0.0.16").unwrap());
//! ```
//!
//! # Rule Sets
//!
//! For lists that are queried repeatedly, [`RuleSet`] parses every entry
//! once. It can be loaded from YAML, JSON or a plain line format, and
//! either rejects invalid entries ([`ValidationMode::Strict`], the default)
//! or skips them ([`ValidationMode::Permissive`]).
//!
//! ```
//! use ipmatch::RuleSet;
//!
//! let ruleset = RuleSet::from_yaml_str(r#"
//! name: office
//! rules:
//!   - name: Work
//!     value: 10.0.0.10 - 10.0.0.15
//! "#).unwrap();
//! assert!(ruleset.contains("10.0.0.12").unwrap());
//! ```

mod address;
mod error;

pub mod rule;
pub mod ruleset;

// Re-export core types
pub use address::{Address, IpFamily};
pub use error::{AddressError, Endpoint, Error, Result, RuleError};

// Re-export rule parsing and matching
pub use rule::{
    address_matches_rule, check_rule, parse_rule, AddressMatcher, AddressRange, Rule, RuleCheck,
    RuleKind, Subnet,
};

// Re-export ruleset types
pub use ruleset::{contains, CompiledEntry, RuleEntry, RuleSet, RuleSetConfig, ValidationMode};
