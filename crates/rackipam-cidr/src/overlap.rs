use crate::parse::{parse_block, IpVersion};
use std::net::IpAddr;

/// Whether two CIDR blocks share at least one address.
///
/// Blocks of different families never overlap, and neither does malformed
/// input. Both families use an inclusive numeric range comparison.
pub fn check_overlap(a: &str, b: &str) -> bool {
    let (Some((a, _)), Some((b, _))) = (parse_block(a), parse_block(b)) else {
        return false;
    };
    if a.version() != b.version() {
        return false;
    }

    let (a_start, a_end) = a.bounds();
    let (b_start, b_end) = b.bounds();
    !(a_end < b_start || b_end < a_start)
}

/// Whether `ip` lies inside `cidr`. The address family must match.
pub fn is_ip_in_cidr(ip: &str, cidr: &str) -> bool {
    let Ok(ip) = ip.trim().parse::<IpAddr>() else {
        return false;
    };
    let Some((block, _)) = parse_block(cidr) else {
        return false;
    };

    let value = match (ip, block.version()) {
        (IpAddr::V4(v4), IpVersion::Ipv4) => u32::from(v4) as u128,
        (IpAddr::V6(v6), IpVersion::Ipv6) => u128::from(v6),
        _ => return false,
    };
    let (start, end) = block.bounds();
    value >= start && value <= end
}
