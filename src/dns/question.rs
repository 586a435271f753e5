use crate::buffer::{PacketReader, PacketWriter};
use crate::error::CodecError;

/// The Internet class, the only one this resolver ever asks for.
pub const CLASS_IN: u16 = 1;

#[derive(PartialEq, Eq, Debug, Clone, Hash, Copy)]
pub enum QueryType {
    UNKNOWN(u16),
    A,    // 1
    NS,   // 2
    AAAA, // 28
}

impl QueryType {
    #[inline]
    pub fn from_u16(val: u16) -> QueryType {
        match val {
            1 => QueryType::A,
            2 => QueryType::NS,
            28 => QueryType::AAAA,
            _ => QueryType::UNKNOWN(val),
        }
    }

    #[inline]
    pub fn to_u16(&self) -> u16 {
        match self {
            QueryType::A => 1,
            QueryType::NS => 2,
            QueryType::AAAA => 28,
            QueryType::UNKNOWN(val) => *val,
        }
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Hash)]
pub struct DnsQuestion {
    pub qname: String,
    pub qtype: QueryType,
    pub qclass: u16,
}

impl DnsQuestion {
    pub fn new(qname: impl Into<String>, qtype: QueryType) -> Self {
        DnsQuestion {
            qname: qname.into(),
            qtype,
            qclass: CLASS_IN,
        }
    }

    pub fn read(buf: &mut PacketReader) -> Result<Self, CodecError> {
        let qname = buf.read_qname()?;
        let qtype = QueryType::from_u16(buf.read_u16()?);
        let qclass = buf.read_u16()?;

        Ok(DnsQuestion {
            qname,
            qtype,
            qclass,
        })
    }

    pub fn write(&self, buf: &mut PacketWriter) -> Result<(), CodecError> {
        buf.write_qname(&self.qname)?;
        buf.write_u16(self.qtype.to_u16());
        buf.write_u16(self.qclass);
        Ok(())
    }
}
