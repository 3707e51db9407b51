use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("database error: {0}")]
    Database(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("subnet not found: {0}")]
    SubnetNotFound(String),

    #[error("vlan not found: {0}")]
    VlanNotFound(String),

    #[error("ip address not found: {0}")]
    IpNotFound(String),

    #[error("duplicate subnet: {0}")]
    DuplicateSubnet(String),

    #[error("duplicate vlan: {0}")]
    DuplicateVlan(String),

    #[error("vlan number {0} is outside 1-4094")]
    InvalidVlanNumber(u16),

    #[error("duplicate ip address: {0}")]
    DuplicateIp(String),

    #[error("invalid cidr: {0}")]
    InvalidCidr(String),

    #[error("{new} overlaps existing subnet {existing}")]
    SubnetOverlap { new: String, existing: String },

    #[error("{ip} is outside subnet {cidr}")]
    AddressOutOfRange { ip: String, cidr: String },

    #[error("ip address not available: {0}")]
    AddressUnavailable(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

}

pub type Result<T> = std::result::Result<T, Error>;

// Blanket From impls for redb error types
impl From<redb::Error> for Error {
    fn from(e: redb::Error) -> Self {
        Error::Database(e.to_string())
    }
}

impl From<redb::StorageError> for Error {
    fn from(e: redb::StorageError) -> Self {
        Error::Database(e.to_string())
    }
}

impl From<redb::TableError> for Error {
    fn from(e: redb::TableError) -> Self {
        Error::Database(e.to_string())
    }
}

impl From<redb::TransactionError> for Error {
    fn from(e: redb::TransactionError) -> Self {
        Error::Database(e.to_string())
    }
}

impl From<redb::CommitError> for Error {
    fn from(e: redb::CommitError) -> Self {
        Error::Database(e.to_string())
    }
}

impl From<redb::DatabaseError> for Error {
    fn from(e: redb::DatabaseError) -> Self {
        Error::Database(e.to_string())
    }
}
