use std::net::Ipv4Addr;

use thiserror::Error;

/// Failures while reading or writing the DNS wire format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("truncated input: needed {needed} bytes, {remaining} remaining")]
    TruncatedInput { needed: usize, remaining: usize },

    #[error("label too long: {0} bytes (max 63)")]
    LabelTooLong(usize),

    #[error("compression pointers nested too deeply")]
    PointerLoop,

    #[error("type {rtype} record declares {declared} bytes of rdata, expected {expected}")]
    RdataLength {
        rtype: u16,
        declared: u16,
        expected: usize,
    },

    #[error("type {rtype} record cannot carry {data} data")]
    DataMismatch { rtype: u16, data: &'static str },

    #[error("reserved label type in length byte {0:#04x}")]
    ReservedLabelType(u8),

    #[error("section holds {0} entries, more than a header count can express")]
    SectionTooLarge(usize),

    #[error("failed to pack header: {0}")]
    Header(String),
}

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("malformed message: {0}")]
    Codec(#[from] CodecError),

    #[error("network error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dead end: {server} returned neither an answer nor a referral")]
    DeadEnd { server: Ipv4Addr },

    #[error("{server} referred to {nameserver} without a glue address")]
    NoGlue { server: Ipv4Addr, nameserver: String },

    #[error("gave up after {hops} referrals")]
    MaxHopsExceeded { hops: usize },
}

impl ResolveError {
    /// True for outcomes that mean "no address found" rather than a fault.
    pub fn is_unresolved(&self) -> bool {
        matches!(
            self,
            ResolveError::NoGlue { .. } | ResolveError::MaxHopsExceeded { .. }
        )
    }
}
