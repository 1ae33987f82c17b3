//! Address matching for each rule shape.

use super::{AddressMatcher, AddressRange, Rule, RuleKind, Subnet};
use crate::address::Address;
use crate::error::Result;

impl AddressMatcher for Address {
    fn matches(&self, addr: &Address) -> bool {
        self == addr
    }

    fn kind(&self) -> RuleKind {
        RuleKind::Single
    }
}

impl AddressMatcher for AddressRange {
    fn matches(&self, addr: &Address) -> bool {
        if !self.minimum.same_family(addr) {
            return false;
        }
        let value = addr.numeric_value();
        self.minimum.numeric_value() <= value && value <= self.maximum.numeric_value()
    }

    fn kind(&self) -> RuleKind {
        RuleKind::Range
    }
}

impl AddressMatcher for Subnet {
    fn matches(&self, addr: &Address) -> bool {
        // IpNet::contains is false across families
        self.net().contains(&addr.ip())
    }

    fn kind(&self) -> RuleKind {
        RuleKind::Subnet
    }
}

impl AddressMatcher for Rule {
    fn matches(&self, addr: &Address) -> bool {
        match self {
            Rule::Single(single) => single.matches(addr),
            Rule::Range(range) => range.matches(addr),
            Rule::Subnet(subnet) => subnet.matches(addr),
        }
    }

    fn kind(&self) -> RuleKind {
        match self {
            Rule::Single(_) => RuleKind::Single,
            Rule::Range(_) => RuleKind::Range,
            Rule::Subnet(_) => RuleKind::Subnet,
        }
    }
}

/// Check whether the address written in `query` is covered by `rule`.
///
/// Fails only when `query` is not an IP literal; an address of the other
/// family simply does not match.
pub fn address_matches_rule(query: &str, rule: &Rule) -> Result<bool> {
    let addr = Address::parse(query.trim())?;
    Ok(rule.matches(&addr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::parse_rule;
    use crate::Error;

    fn addr(s: &str) -> Address {
        Address::parse(s).unwrap()
    }

    fn rule(s: &str) -> Rule {
        parse_rule(s).unwrap()
    }

    #[test]
    fn test_single_match() {
        let r = rule("2001:0000:0000:0000:0000:0000:0000:0001");
        assert!(r.matches(&addr("2001::1")));
        assert!(r.matches(&addr("2001:0:0:0:0:0:0:1")));
        assert!(!r.matches(&addr("2001::2")));
        assert_eq!(r.kind(), RuleKind::Single);
    }

    #[test]
    fn test_range_match_inclusive() {
        let r = rule("90.88.0.1 - 90.88.254.254");
        assert!(r.matches(&addr("90.88.118.79")));
        assert!(r.matches(&addr("90.88.0.1")));
        assert!(r.matches(&addr("90.88.254.254")));
        assert!(!r.matches(&addr("90.88.0.0")));
        assert!(!r.matches(&addr("90.88.254.255")));
        assert_eq!(r.kind(), RuleKind::Range);
    }

    #[test]
    fn test_range_compares_numerically() {
        // Lexically "10.0.0.9" > "10.0.0.10"
        let r = rule("10.0.0.9-10.0.0.10");
        assert!(r.matches(&addr("10.0.0.9")));
        assert!(r.matches(&addr("10.0.0.10")));
        assert!(!r.matches(&addr("10.0.0.100")));

        let r = rule("2001:0000:0000:0000:0000:0000:0001:0001-2001:0000:0000:0000:0000:0001:0000:0001");
        assert!(r.matches(&addr("2001::1111:1")));
        assert!(r.matches(&addr("2001::1:0000:1")));
        assert!(!r.matches(&addr("2001::1:0000:2")));
    }

    #[test]
    fn test_range_upper_half_of_ipv6() {
        let r = rule("8000::-ffff::");
        assert!(r.matches(&addr("9000::1")));
        assert!(!r.matches(&addr("7fff::1")));
    }

    #[test]
    fn test_subnet_match() {
        let r = rule("10.0.0.0/24");
        assert!(r.matches(&addr("10.0.0.0")));
        assert!(r.matches(&addr("10.0.0.255")));
        assert!(!r.matches(&addr("10.0.1.0")));
        assert_eq!(r.kind(), RuleKind::Subnet);

        let r = rule("4000::1100/120");
        assert!(r.matches(&addr("4000::1101")));
        assert!(r.matches(&addr("4000::11FF")));
        assert!(!r.matches(&addr("4000::1200")));
    }

    #[test]
    fn test_subnet_ignores_base_host_bits() {
        let r = rule("::1/120");
        assert!(r.matches(&addr("::")));
        assert!(r.matches(&addr("::ff")));
        assert!(!r.matches(&addr("::100")));
    }

    #[test]
    fn test_subnet_bit_boundaries() {
        let base = addr("192.168.128.0");
        let r = rule("192.168.128.0/17");
        for bit in 0..32u32 {
            let flipped = Address::from(std::net::Ipv4Addr::from(
                base.numeric_value() as u32 ^ (1 << bit),
            ));
            assert_eq!(r.matches(&flipped), bit < 32 - 17, "bit {}", bit);
        }
    }

    #[test]
    fn test_subnet_bit_boundaries_ipv4_edges() {
        let base: u32 = 0xC0A8_8001;
        for prefix in [0u8, 1, 31, 32] {
            let r = rule(&format!("192.168.128.1/{}", prefix));
            assert!(r.matches(&addr("192.168.128.1")));
            for bit in 0..32u32 {
                let flipped = Address::from(std::net::Ipv4Addr::from(base ^ (1 << bit)));
                assert_eq!(
                    r.matches(&flipped),
                    bit < 32 - u32::from(prefix),
                    "/{} bit {}",
                    prefix,
                    bit
                );
            }
        }
    }

    #[test]
    fn test_subnet_bit_boundaries_ipv6() {
        let base: u128 = 0x2001_0db8_85a3_0000_8a2e_0370_7334_00ff;
        let base_text = std::net::Ipv6Addr::from(base).to_string();
        for prefix in [0u8, 1, 48, 64, 65, 120, 127, 128] {
            let r = rule(&format!("{}/{}", base_text, prefix));
            assert!(r.matches(&Address::from(std::net::Ipv6Addr::from(base))));
            for bit in 0..128u32 {
                let flipped = Address::from(std::net::Ipv6Addr::from(base ^ (1u128 << bit)));
                assert_eq!(
                    r.matches(&flipped),
                    bit < 128 - u32::from(prefix),
                    "/{} bit {}",
                    prefix,
                    bit
                );
            }
        }
    }

    #[test]
    fn test_zero_prefix_matches_whole_family() {
        let r = rule("0.0.0.0/0");
        assert!(r.matches(&addr("255.255.255.255")));
        assert!(!r.matches(&addr("::1")));

        let r = rule("::/0");
        assert!(r.matches(&addr("ffff::1")));
        assert!(!r.matches(&addr("10.0.0.1")));
    }

    #[test]
    fn test_family_mismatch_is_no_match() {
        assert!(!rule("0.0.0.0-0.0.0.9").matches(&addr("::1")));
        assert!(!rule("::-::9").matches(&addr("0.0.0.1")));
        assert!(!rule("0.0.0.1").matches(&addr("::1")));
        assert!(!rule("::ffff:10.0.0.0/104").matches(&addr("10.0.0.1")));
    }

    #[test]
    fn test_ipv4_mapped_ipv6_stays_ipv6() {
        let mapped = addr("::ffff:10.0.0.1");
        assert_eq!(mapped.family(), crate::address::IpFamily::V6);

        assert!(!rule("10.0.0.0/8").matches(&mapped));
        assert!(!rule("10.0.0.0-10.0.0.9").matches(&mapped));
        assert!(!rule("10.0.0.1").matches(&mapped));
        assert!(!address_matches_rule("::ffff:10.0.0.1", &rule("10.0.0.0/8")).unwrap());

        // Mapped rules cover mapped queries
        assert!(rule("::ffff:10.0.0.0/104").matches(&mapped));
        assert!(rule("::ffff:10.0.0.1").matches(&mapped));
    }

    #[test]
    fn test_address_matches_rule() {
        let r = rule("10.0.0.0/24");
        assert!(address_matches_rule("10.0.0.255", &r).unwrap());
        assert!(!address_matches_rule("10.0.1.0", &r).unwrap());
        assert!(!address_matches_rule("::1", &r).unwrap());
        assert!(matches!(
            address_matches_rule("10.0.0.256", &r),
            Err(Error::InvalidAddress(_))
        ));
    }
}
