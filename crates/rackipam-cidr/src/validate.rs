use crate::format::format_ip_count;
use crate::generate::{FULL_ENUMERATION_LIMIT, SYNC_GENERATION_LIMIT};
use crate::parse::{parse_block, CidrInfo, IpVersion};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Outcome of checking user-supplied CIDR notation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            errors: vec![error.into()],
            warnings: Vec::new(),
        }
    }
}

/// Check CIDR notation before a subnet is created or provisioned.
///
/// Host bits are not an error: the canonical network is adopted and a
/// warning says so. Size warnings tell the caller how expensive address
/// generation will be.
pub fn validate_cidr(input: &str) -> ValidationResult {
    let input = input.trim();
    if input.is_empty() {
        return ValidationResult::invalid("CIDR is required");
    }
    if !input.contains('/') {
        return ValidationResult::invalid(
            "CIDR must include a prefix length, e.g. 192.168.1.0/24",
        );
    }
    let Some((block, literal)) = parse_block(input) else {
        return ValidationResult::invalid("Invalid CIDR format");
    };

    let info = CidrInfo::from_block(&block);
    let mut warnings = Vec::new();

    if info.network_address.parse::<IpAddr>().ok() != Some(literal) {
        warnings.push(format!(
            "{literal} is not a network address, corrected to {}",
            info.cidr
        ));
    }

    match info.version {
        IpVersion::Ipv4 if info.total_addresses > SYNC_GENERATION_LIMIT => {
            warnings.push(format!(
                "Network is too large ({} addresses), generation will be asynchronous",
                format_ip_count(info.total_addresses)
            ));
        }
        IpVersion::Ipv4 if info.total_addresses > FULL_ENUMERATION_LIMIT => {
            warnings.push(format!(
                "Large network ({} addresses), generation may take seconds",
                info.total_addresses
            ));
        }
        IpVersion::Ipv4 => {}
        IpVersion::Ipv6 => {
            warnings.push(
                "Automatic address generation is not supported for IPv6 networks at this scale"
                    .to_string(),
            );
        }
    }

    ValidationResult {
        valid: true,
        errors: Vec::new(),
        warnings,
    }
}
