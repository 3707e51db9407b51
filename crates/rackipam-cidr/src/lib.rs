//! CIDR address-space computation for rackipam.
//!
//! Everything in this crate is pure and synchronous. Malformed input never
//! panics: parsing yields `None`, predicates yield `false`, generators yield
//! an empty `Vec` and validation reports errors in its result.

pub mod format;
pub mod generate;
pub mod overlap;
pub mod parse;
pub mod validate;

pub use format::format_ip_count;
pub use generate::{
    generate_ip_records, generate_ipv4_addresses, GenerateOptions, GeneratedRecord, IpStatus,
    IpType, DEFAULT_GATEWAY_NAME, FULL_ENUMERATION_LIMIT, SYNC_GENERATION_LIMIT,
};
pub use overlap::{check_overlap, is_ip_in_cidr};
pub use parse::{parse_cidr, CidrInfo, IpVersion, IPV6_COUNT_CEILING};
pub use validate::{validate_cidr, ValidationResult};
