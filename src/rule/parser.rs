//! Rule text parser.
//!
//! A rule is classified by trying, in order:
//! 1. a single address (`10.0.0.1`, `2001:db8::1`)
//! 2. an inclusive range (`10.0.0.1 - 10.0.0.9`)
//! 3. a CIDR subnet (`10.0.0.0/24`)
//!
//! Once the text has the shape of a range or a subnet, the verdict of that
//! shape is final even when it is semantically invalid.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::{AddressRange, Rule, Subnet};
use crate::address::Address;
use crate::error::{Endpoint, RuleError};

/// `<address-like>-<address-like>`
static RANGE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9A-Fa-f:.]+)-([0-9A-Fa-f:.]+)$").unwrap());

/// `<anything>/<digits>`; the base is validated afterwards
static SUBNET_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.+)/([0-9]+)$").unwrap());

/// Parse a rule string into a typed [`Rule`].
///
/// All whitespace is removed first, so `" 10.0.0.1 - 10.0.0.2 "` is a
/// valid range. A range whose endpoints are equal becomes a
/// [`Rule::Single`].
///
/// # Examples
/// ```
/// use ipmatch::{parse_rule, Rule, RuleError};
///
/// assert!(matches!(parse_rule("10.0.0.1-10.0.0.2"), Ok(Rule::Range(_))));
/// assert_eq!(parse_rule("10.0.0.2-10.0.0.1"), Err(RuleError::InvertedRange));
/// ```
pub fn parse_rule(raw: &str) -> Result<Rule, RuleError> {
    let rule: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    if let Ok(addr) = Address::parse(&rule) {
        return Ok(Rule::Single(addr));
    }

    if let Some(caps) = RANGE_PATTERN.captures(&rule) {
        return parse_range(&caps[1], &caps[2]);
    }

    if let Some(caps) = SUBNET_PATTERN.captures(&rule) {
        return parse_subnet(&caps[1], &caps[2]);
    }

    Err(RuleError::BadlyConstructedRule)
}

fn parse_range(first: &str, second: &str) -> Result<Rule, RuleError> {
    let minimum =
        Address::parse(first).map_err(|_| RuleError::InvalidAddress(Endpoint::First))?;
    let maximum =
        Address::parse(second).map_err(|_| RuleError::InvalidAddress(Endpoint::Second))?;

    let range = AddressRange::new(minimum, maximum)?;
    if range.minimum() == range.maximum() {
        return Ok(Rule::Single(range.minimum()));
    }

    Ok(Rule::Range(range))
}

fn parse_subnet(base: &str, prefix: &str) -> Result<Rule, RuleError> {
    let base_address =
        Address::parse(base).map_err(|_| RuleError::InvalidAddress(Endpoint::Base))?;

    // Too many digits for u8 is out of bounds for either family
    let prefix_length: u8 = prefix.parse().map_err(|_| RuleError::PrefixOutOfBounds {
        family: base_address.family(),
        prefix: prefix.to_string(),
    })?;

    Subnet::new(base_address, prefix_length).map(Rule::Subnet)
}

/// Validation report for a rule string.
///
/// Serializes as `{"is_valid": true, "rule": "10.0.0.0/24", "reason": null}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleCheck {
    /// Whether the rule parsed
    pub is_valid: bool,
    /// The parsed rule, present iff valid
    pub rule: Option<Rule>,
    /// Why the rule was rejected, present iff invalid
    pub reason: Option<String>,
}

impl From<Result<Rule, RuleError>> for RuleCheck {
    fn from(result: Result<Rule, RuleError>) -> Self {
        match result {
            Ok(rule) => Self {
                is_valid: true,
                rule: Some(rule),
                reason: None,
            },
            Err(err) => Self {
                is_valid: false,
                rule: None,
                reason: Some(err.to_string()),
            },
        }
    }
}

/// Validate a rule string and report the outcome.
pub fn check_rule(raw: &str) -> RuleCheck {
    RuleCheck::from(parse_rule(raw))
}
