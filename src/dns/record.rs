use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::buffer::{PacketReader, PacketWriter};
use crate::error::CodecError;

use super::question::{QueryType, CLASS_IN};

/// Resource data, decoded according to the record's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    A(Ipv4Addr),
    NS(String),
    AAAA(Ipv6Addr),
    // any other type, kept as the raw rdata bytes
    Opaque(Vec<u8>),
}

impl fmt::Display for RecordData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordData::A(addr) => write!(f, "{}", addr),
            RecordData::NS(ns) => f.write_str(ns),
            RecordData::AAAA(addr) => write!(f, "{}", addr),
            RecordData::Opaque(bytes) => {
                for byte in bytes {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    pub domain: String,
    pub qtype: QueryType,
    pub class: u16,
    pub ttl: u32,
    pub data: RecordData,
}

impl DnsRecord {
    pub fn a(domain: impl Into<String>, addr: Ipv4Addr, ttl: u32) -> Self {
        DnsRecord {
            domain: domain.into(),
            qtype: QueryType::A,
            class: CLASS_IN,
            ttl,
            data: RecordData::A(addr),
        }
    }

    pub fn aaaa(domain: impl Into<String>, addr: Ipv6Addr, ttl: u32) -> Self {
        DnsRecord {
            domain: domain.into(),
            qtype: QueryType::AAAA,
            class: CLASS_IN,
            ttl,
            data: RecordData::AAAA(addr),
        }
    }

    pub fn ns(domain: impl Into<String>, ns: impl Into<String>, ttl: u32) -> Self {
        DnsRecord {
            domain: domain.into(),
            qtype: QueryType::NS,
            class: CLASS_IN,
            ttl,
            data: RecordData::NS(ns.into()),
        }
    }

    /// Length of the rdata as this record encodes it (names uncompressed).
    pub fn rdlength(&self) -> usize {
        match &self.data {
            RecordData::A(_) => 4,
            RecordData::AAAA(_) => 16,
            RecordData::NS(ns) => {
                ns.split('.')
                    .filter(|label| !label.is_empty())
                    .map(|label| label.len() + 1)
                    .sum::<usize>()
                    + 1
            }
            RecordData::Opaque(bytes) => bytes.len(),
        }
    }

    pub fn read(buf: &mut PacketReader) -> Result<Self, CodecError> {
        let domain = buf.read_qname()?;
        let qtype = QueryType::from_u16(buf.read_u16()?);
        let class = buf.read_u16()?;
        let ttl = buf.read_u32()?;
        let data_len = buf.read_u16()?;

        let data = match qtype {
            QueryType::A => {
                check_len(qtype, data_len, 4)?;
                RecordData::A(Ipv4Addr::from(buf.read_array::<4>()?))
            }
            QueryType::AAAA => {
                check_len(qtype, data_len, 16)?;
                RecordData::AAAA(Ipv6Addr::from(buf.read_array::<16>()?))
            }
            QueryType::NS => {
                let start = buf.pos();
                let ns = buf.read_qname()?;
                // a compressed name is shorter than its text, so measure what was consumed
                check_len(qtype, data_len, buf.pos() - start)?;
                RecordData::NS(ns)
            }
            QueryType::UNKNOWN(_) => RecordData::Opaque(buf.take(data_len as usize)?.to_vec()),
        };

        Ok(DnsRecord {
            domain,
            qtype,
            class,
            ttl,
            data,
        })
    }

    pub fn write(&self, buf: &mut PacketWriter) -> Result<usize, CodecError> {
        // the type code decides how rdata is read back, so it must fit the payload
        let data = match (&self.data, self.qtype) {
            (RecordData::A(_), QueryType::A)
            | (RecordData::AAAA(_), QueryType::AAAA)
            | (RecordData::NS(_), QueryType::NS)
            | (RecordData::Opaque(_), QueryType::UNKNOWN(_)) => None,
            (RecordData::A(_), _) => Some("A"),
            (RecordData::AAAA(_), _) => Some("AAAA"),
            (RecordData::NS(_), _) => Some("NS"),
            (RecordData::Opaque(_), _) => Some("opaque"),
        };
        if let Some(data) = data {
            return Err(CodecError::DataMismatch {
                rtype: self.qtype.to_u16(),
                data,
            });
        }

        let start_pos = buf.pos();

        buf.write_qname(&self.domain)?;
        buf.write_u16(self.qtype.to_u16());
        buf.write_u16(self.class);
        buf.write_u32(self.ttl);

        let len_pos = buf.pos();
        buf.write_u16(0); // data_len, patched below

        match &self.data {
            RecordData::A(addr) => buf.write_bytes(&addr.octets()),
            RecordData::AAAA(addr) => buf.write_bytes(&addr.octets()),
            RecordData::NS(ns) => buf.write_qname(ns)?,
            RecordData::Opaque(bytes) => buf.write_bytes(bytes),
        }

        let len = buf.pos() - len_pos - 2;
        let declared = u16::try_from(len).map_err(|_| CodecError::RdataLength {
            rtype: self.qtype.to_u16(),
            declared: u16::MAX,
            expected: len,
        })?;
        buf.set_u16(len_pos, declared)?;

        Ok(buf.pos() - start_pos)
    }
}

fn check_len(qtype: QueryType, declared: u16, expected: usize) -> Result<(), CodecError> {
    if declared as usize != expected {
        return Err(CodecError::RdataLength {
            rtype: qtype.to_u16(),
            declared,
            expected,
        });
    }
    Ok(())
}
