//! Range-to-CIDR normalization.
//!
//! IPv4 delegation records carry a start address and a host count; the count
//! is not guaranteed to be a power of two, so one record can decompose into
//! several CIDR blocks. IPv6 records already carry a prefix length and only
//! need validation.

use std::net::{Ipv4Addr, Ipv6Addr};

use ipnet::{Ipv4Net, Ipv6Net};

use crate::error::GenerateError;
use crate::feed::DelegationRecord;

const IPV4_SPACE: u64 = 1 << 32;

/// Decompose `[start, start + count - 1]` into the minimal set of CIDR
/// blocks.
///
/// Each step emits the largest power-of-two block that is aligned at the
/// current address and no larger than the remaining count, then advances
/// past it.
pub fn range_to_cidrs(start: Ipv4Addr, count: u64) -> Result<Vec<Ipv4Net>, GenerateError> {
    if count == 0 {
        return Ok(Vec::new());
    }
    if count > IPV4_SPACE {
        return Err(GenerateError::Validation(format!(
            "host count {} exceeds the IPv4 address space",
            count
        )));
    }

    let mut cursor = u64::from(u32::from(start));
    if cursor + count > IPV4_SPACE {
        return Err(GenerateError::Validation(format!(
            "range {} + {} hosts runs past the end of the IPv4 address space",
            start, count
        )));
    }

    let mut remaining = count;
    let mut blocks = Vec::new();
    while remaining > 0 {
        // Largest block aligned at the cursor. The cursor is 0 only before
        // the first emission, where the whole space is aligned.
        let aligned = if cursor == 0 {
            IPV4_SPACE
        } else {
            1u64 << cursor.trailing_zeros()
        };
        // Largest power of two not exceeding what remains.
        let fitting = 1u64 << (63 - remaining.leading_zeros());
        let size = aligned.min(fitting);
        let prefix = (32 - size.trailing_zeros()) as u8;

        let net = Ipv4Net::new(Ipv4Addr::from(cursor as u32), prefix)
            .expect("prefix is within 0..=32 by construction");
        blocks.push(net);

        cursor += size;
        remaining -= size;
    }

    Ok(blocks)
}

/// Normalize an IPv4 delegation record (start address + host count).
pub fn record_to_v4_nets(record: &DelegationRecord) -> Result<Vec<Ipv4Net>, GenerateError> {
    let start: Ipv4Addr = record.start.parse().map_err(|_| {
        GenerateError::Validation(format!(
            "unparsable IPv4 start address {:?}",
            record.start
        ))
    })?;
    range_to_cidrs(start, record.extent)
}

/// Normalize an IPv6 delegation record (prefix address + prefix length).
/// Host bits below the prefix are masked off.
pub fn record_to_v6_net(record: &DelegationRecord) -> Result<Ipv6Net, GenerateError> {
    let addr: Ipv6Addr = record.start.parse().map_err(|_| {
        GenerateError::Validation(format!(
            "unparsable IPv6 prefix address {:?}",
            record.start
        ))
    })?;
    let prefix = u8::try_from(record.extent)
        .ok()
        .filter(|p| *p <= 128)
        .ok_or_else(|| {
            GenerateError::Validation(format!("invalid IPv6 prefix length {}", record.extent))
        })?;
    let net = Ipv6Net::new(addr, prefix).expect("prefix is within 0..=128 by construction");
    Ok(net.trunc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::AddressFamily;

    fn v4(s: &str) -> Ipv4Net {
        s.parse().unwrap()
    }

    #[test]
    fn test_power_of_two_count() {
        let blocks = range_to_cidrs("1.0.1.0".parse().unwrap(), 256).unwrap();
        assert_eq!(blocks, vec![v4("1.0.1.0/24")]);
    }

    #[test]
    fn test_non_power_of_two_count() {
        // 768 = 256 + 512; alignment at 1.0.1.0 only allows a /24 first
        let blocks = range_to_cidrs("1.0.1.0".parse().unwrap(), 768).unwrap();
        assert_eq!(blocks, vec![v4("1.0.1.0/24"), v4("1.0.2.0/23")]);
    }

    #[test]
    fn test_unaligned_start() {
        // A /24-sized count starting mid-block splits into two /25s
        let blocks = range_to_cidrs("1.0.1.128".parse().unwrap(), 256).unwrap();
        assert_eq!(blocks, vec![v4("1.0.1.128/25"), v4("1.0.2.0/25")]);
    }

    #[test]
    fn test_single_host() {
        let blocks = range_to_cidrs("10.1.2.3".parse().unwrap(), 1).unwrap();
        assert_eq!(blocks, vec![v4("10.1.2.3/32")]);
    }

    #[test]
    fn test_zero_count_yields_nothing() {
        let blocks = range_to_cidrs("1.0.1.0".parse().unwrap(), 0).unwrap();
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_whole_space() {
        let blocks = range_to_cidrs("0.0.0.0".parse().unwrap(), IPV4_SPACE).unwrap();
        assert_eq!(blocks, vec![v4("0.0.0.0/0")]);
    }

    #[test]
    fn test_count_too_large_fails() {
        let result = range_to_cidrs("0.0.0.0".parse().unwrap(), IPV4_SPACE + 1);
        assert!(matches!(result, Err(GenerateError::Validation(_))));
    }

    #[test]
    fn test_range_past_end_of_space_fails() {
        let result = range_to_cidrs("255.255.255.0".parse().unwrap(), 512);
        assert!(matches!(result, Err(GenerateError::Validation(_))));
    }

    #[test]
    fn test_record_with_bad_start_fails() {
        let record = DelegationRecord {
            registry: "apnic".to_string(),
            country: "CN".to_string(),
            family: AddressFamily::V4,
            start: "not-an-address".to_string(),
            extent: 256,
        };
        assert!(matches!(
            record_to_v4_nets(&record),
            Err(GenerateError::Validation(_))
        ));
    }

    #[test]
    fn test_v6_record() {
        let record = DelegationRecord {
            registry: "apnic".to_string(),
            country: "CN".to_string(),
            family: AddressFamily::V6,
            start: "2001:250::".to_string(),
            extent: 32,
        };
        let net = record_to_v6_net(&record).unwrap();
        assert_eq!(net, "2001:250::/32".parse::<Ipv6Net>().unwrap());
    }

    #[test]
    fn test_v6_record_masks_host_bits() {
        let record = DelegationRecord {
            registry: "apnic".to_string(),
            country: "CN".to_string(),
            family: AddressFamily::V6,
            start: "2001:250::1".to_string(),
            extent: 32,
        };
        let net = record_to_v6_net(&record).unwrap();
        assert_eq!(net, "2001:250::/32".parse::<Ipv6Net>().unwrap());
    }

    #[test]
    fn test_v6_record_bad_prefix_fails() {
        let record = DelegationRecord {
            registry: "apnic".to_string(),
            country: "CN".to_string(),
            family: AddressFamily::V6,
            start: "2001:250::".to_string(),
            extent: 129,
        };
        assert!(matches!(
            record_to_v6_net(&record),
            Err(GenerateError::Validation(_))
        ));
    }
}
