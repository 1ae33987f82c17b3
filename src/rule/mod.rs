//! Rule types and trait definitions.

mod matcher;
mod parser;

pub use matcher::address_matches_rule;
pub use parser::{check_rule, parse_rule, RuleCheck};

use ipnet::IpNet;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::address::{Address, IpFamily};
use crate::error::RuleError;

/// AddressMatcher defines the interface shared by every rule shape.
pub trait AddressMatcher {
    /// Check whether `addr` is covered by this rule.
    ///
    /// An address of the other family never matches.
    fn matches(&self, addr: &Address) -> bool;

    /// Get the kind of rule.
    fn kind(&self) -> RuleKind;
}

/// RuleKind names the three rule shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Exactly one address
    Single,
    /// Inclusive `first-last` range
    Range,
    /// CIDR block `base/prefix`
    Subnet,
}

impl RuleKind {
    /// Get the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Single => "SINGLE",
            RuleKind::Range => "RANGE",
            RuleKind::Subnet => "SUBNET",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An inclusive range of addresses of one family.
///
/// Both endpoints share a family and `minimum <= maximum`; the only way
/// to obtain a range is through [`AddressRange::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressRange {
    minimum: Address,
    maximum: Address,
}

impl AddressRange {
    /// Create a range, validating family and ordering.
    pub fn new(minimum: Address, maximum: Address) -> Result<Self, RuleError> {
        if !minimum.same_family(&maximum) {
            return Err(RuleError::MismatchedFamily);
        }
        if minimum.numeric_value() > maximum.numeric_value() {
            return Err(RuleError::InvertedRange);
        }
        Ok(Self { minimum, maximum })
    }

    /// Get the lower bound.
    pub fn minimum(&self) -> Address {
        self.minimum
    }

    /// Get the upper bound.
    pub fn maximum(&self) -> Address {
        self.maximum
    }

    /// Get the address family of the range.
    pub fn family(&self) -> IpFamily {
        self.minimum.family()
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.minimum, self.maximum)
    }
}

/// A CIDR subnet.
///
/// The base address is kept as written; host bits below the prefix are
/// ignored when matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subnet {
    net: IpNet,
}

impl Subnet {
    /// Create a subnet, validating the prefix length against the family.
    pub fn new(base_address: Address, prefix_length: u8) -> Result<Self, RuleError> {
        IpNet::new(base_address.ip(), prefix_length)
            .map(|net| Self { net })
            .map_err(|_| RuleError::PrefixOutOfBounds {
                family: base_address.family(),
                prefix: prefix_length.to_string(),
            })
    }

    /// Get the base address as written in the rule.
    pub fn base_address(&self) -> Address {
        Address::from(self.net.addr())
    }

    /// Get the prefix length.
    pub fn prefix_length(&self) -> u8 {
        self.net.prefix_len()
    }

    /// Get the first address of the block (host bits cleared).
    pub fn network(&self) -> Address {
        Address::from(self.net.network())
    }

    /// Get the address family of the subnet.
    pub fn family(&self) -> IpFamily {
        self.base_address().family()
    }

    pub(crate) fn net(&self) -> &IpNet {
        &self.net
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.net)
    }
}

/// A parsed whitelist/blacklist rule.
///
/// # Examples
/// ```
/// use ipmatch::{parse_rule, Address, AddressMatcher, Rule};
///
/// let rule = parse_rule("10.0.0.0/24").unwrap();
/// assert!(matches!(rule, Rule::Subnet(_)));
/// assert!(rule.matches(&Address::parse("10.0.0.255").unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Single(Address),
    Range(AddressRange),
    Subnet(Subnet),
}

impl Rule {
    /// Get the address family every matching address must have.
    pub fn family(&self) -> IpFamily {
        match self {
            Rule::Single(addr) => addr.family(),
            Rule::Range(range) => range.family(),
            Rule::Subnet(subnet) => subnet.family(),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Single(addr) => write!(f, "{}", addr),
            Rule::Range(range) => write!(f, "{}", range),
            Rule::Subnet(subnet) => write!(f, "{}", subnet),
        }
    }
}

impl FromStr for Rule {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_rule(s)
    }
}

impl Serialize for Rule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_rule(&raw).map_err(de::Error::custom)
    }
}
