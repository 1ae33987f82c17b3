//! Validated IP addresses with a canonical numeric value.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::error::AddressError;

/// Address family of an [`Address`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpFamily {
    V4,
    V6,
}

impl IpFamily {
    /// Width of an address of this family, in bits.
    pub fn bits(&self) -> u8 {
        match self {
            IpFamily::V4 => 32,
            IpFamily::V6 => 128,
        }
    }

    /// Largest prefix length a subnet of this family accepts.
    pub fn max_prefix_len(&self) -> u8 {
        self.bits()
    }
}

impl fmt::Display for IpFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpFamily::V4 => f.write_str("IPv4"),
            IpFamily::V6 => f.write_str("IPv6"),
        }
    }
}

/// A validated IPv4 or IPv6 address.
///
/// Every textual spelling of the same address (`2001:db8::1`,
/// `2001:0DB8:0:0:0:0:0:1`, ...) produces an equal `Address`.
/// Ordering and range checks go through [`Address::numeric_value`].
///
/// # Examples
/// ```
/// use ipmatch::{Address, IpFamily};
///
/// let addr = Address::parse("10.0.0.1").unwrap();
/// assert_eq!(addr.family(), IpFamily::V4);
/// assert_eq!(addr.numeric_value(), 0x0A00_0001);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    ip: IpAddr,
}

impl Address {
    /// Parse an IP literal. The input is expected to be trimmed.
    pub fn parse(s: &str) -> Result<Self, AddressError> {
        s.parse::<IpAddr>()
            .map(Self::from)
            .map_err(|_| AddressError::InvalidAddress(s.to_string()))
    }

    /// Get the address family.
    pub fn family(&self) -> IpFamily {
        match self.ip {
            IpAddr::V4(_) => IpFamily::V4,
            IpAddr::V6(_) => IpFamily::V6,
        }
    }

    /// Get the big-endian numeric value of the address.
    ///
    /// IPv4 values occupy the low 32 bits.
    pub fn numeric_value(&self) -> u128 {
        match self.ip {
            IpAddr::V4(v4) => u128::from(u32::from(v4)),
            IpAddr::V6(v6) => u128::from(v6),
        }
    }

    /// Get the underlying standard library address.
    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    /// Check whether two addresses belong to the same family.
    pub fn same_family(&self, other: &Address) -> bool {
        self.family() == other.family()
    }
}

impl From<IpAddr> for Address {
    fn from(ip: IpAddr) -> Self {
        Self { ip }
    }
}

impl From<Ipv4Addr> for Address {
    fn from(ip: Ipv4Addr) -> Self {
        Self { ip: IpAddr::V4(ip) }
    }
}

impl From<Ipv6Addr> for Address {
    fn from(ip: Ipv6Addr) -> Self {
        Self { ip: IpAddr::V6(ip) }
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ip)
    }
}
