//! CIDR range collapsing.
//!
//! Reduces a collection of blocks to the minimal sorted, non-overlapping set
//! covering the same addresses: contained blocks are dropped and aligned
//! sibling pairs merge into their parent block, recursively.

use std::net::{Ipv4Addr, Ipv6Addr};

use ipnet::{Ipv4Net, Ipv6Net};

/// Network bits left-aligned in a u128, plus prefix length. IPv4 networks
/// occupy the top 32 bits, which makes one sweep serve both families.
type Unit = (u128, u8);

fn mask(prefix: u8) -> u128 {
    if prefix == 0 {
        0
    } else {
        u128::MAX << (128 - prefix)
    }
}

fn covers(outer: Unit, inner: Unit) -> bool {
    outer.1 <= inner.1 && inner.0 & mask(outer.1) == outer.0
}

/// Sort by (network, prefix) and sweep left to right: a block covered by
/// the last emitted block is dropped; otherwise it is emitted and then
/// folded upward with its sibling for as long as the pair forms a valid
/// parent block.
fn collapse_units(mut units: Vec<Unit>) -> Vec<Unit> {
    units.sort_unstable();

    let mut out: Vec<Unit> = Vec::with_capacity(units.len());
    for unit in units {
        if let Some(&last) = out.last() {
            if covers(last, unit) {
                continue;
            }
        }
        out.push(unit);

        while out.len() >= 2 {
            let (a, b) = (out[out.len() - 2], out[out.len() - 1]);
            let merged = a.1 == b.1 && a.1 > 0 && a.0 ^ b.0 == 1u128 << (128 - a.1);
            if !merged {
                break;
            }
            out.truncate(out.len() - 2);
            out.push((a.0, a.1 - 1));
        }
    }
    out
}

/// Collapse IPv4 blocks into the minimal covering set. Host bits of the
/// inputs are masked off first; the result is strictly increasing by
/// network address regardless of input order.
pub fn collapse_v4(blocks: &[Ipv4Net]) -> Vec<Ipv4Net> {
    let units = blocks
        .iter()
        .map(|net| {
            let net = net.trunc();
            (u128::from(u32::from(net.network())) << 96, net.prefix_len())
        })
        .collect();

    collapse_units(units)
        .into_iter()
        .map(|(value, prefix)| {
            Ipv4Net::new(Ipv4Addr::from((value >> 96) as u32), prefix)
                .expect("prefix is within 0..=32 by construction")
        })
        .collect()
}

/// Collapse IPv6 blocks into the minimal covering set.
pub fn collapse_v6(blocks: &[Ipv6Net]) -> Vec<Ipv6Net> {
    let units = blocks
        .iter()
        .map(|net| {
            let net = net.trunc();
            (u128::from(net.network()), net.prefix_len())
        })
        .collect();

    collapse_units(units)
        .into_iter()
        .map(|(value, prefix)| {
            Ipv6Net::new(Ipv6Addr::from(value), prefix)
                .expect("prefix is within 0..=128 by construction")
        })
        .collect()
}
