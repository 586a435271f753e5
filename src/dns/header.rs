use packed_struct::prelude::*;

use crate::buffer::{PacketReader, PacketWriter};
use crate::error::CodecError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResultCode {
    NOERROR,  // no error condition
    FORMERR,  // format error - the name server was unable to interpret the query
    SERVFAIL, // server failure - the name server was unable to process this query due to a problem with the name server
    NXDOMAIN, // name error - meaningful only for responses from an authoritative name server, this code signifies that the domain name referenced in the query does not exist
    NOTIMP,   // not implemented - the name server does not support the requested kind of query
    REFUSED,  // refused - the name server refuses to perform the specified operation for policy reasons
    OTHER(u8),
}

impl ResultCode {
    #[inline]
    pub fn from_u8(val: u8) -> ResultCode {
        match val {
            0 => ResultCode::NOERROR,
            1 => ResultCode::FORMERR,
            2 => ResultCode::SERVFAIL,
            3 => ResultCode::NXDOMAIN,
            4 => ResultCode::NOTIMP,
            5 => ResultCode::REFUSED,
            _ => ResultCode::OTHER(val),
        }
    }
}

#[derive(PackedStruct, Clone, Copy, Debug, PartialEq, Eq)]
#[packed_struct(bit_numbering = "msb0")]
pub struct DnsHeader {
    #[packed_field(bits = "0..=15", endian = "msb")]
    pub id: u16, // identification number; 16 bits

    #[packed_field(bits = "16")]
    pub qr: bool, // query (0) or response (1); 1 bit

    #[packed_field(bits = "17..=20")]
    pub opcode: Integer<u8, packed_bits::Bits<4>>, // operation code; 4 bits

    #[packed_field(bits = "21")]
    pub aa: bool, // authoritative answer; 1 bit
    #[packed_field(bits = "22")]
    pub tc: bool, // truncated; 1 bit
    #[packed_field(bits = "23")]
    pub rd: bool, // recursion desired; 1 bit
    #[packed_field(bits = "24")]
    pub ra: bool, // recursion available; 1 bit

    #[packed_field(bits = "25..=27")]
    pub z: Integer<u8, packed_bits::Bits<3>>, // reserved for future use; 3 bits

    #[packed_field(bits = "28..=31")]
    pub rcode: Integer<u8, packed_bits::Bits<4>>, // response code; 4 bits

    #[packed_field(bits = "32..=47", endian = "msb")]
    pub qdcount: u16, // number of entries in the question section; 16 bits
    #[packed_field(bits = "48..=63", endian = "msb")]
    pub ancount: u16, // number of resource records in the answer section; 16 bits
    #[packed_field(bits = "64..=79", endian = "msb")]
    pub nscount: u16, // number of name server resource records in the authority records section; 16 bits
    #[packed_field(bits = "80..=95", endian = "msb")]
    pub arcount: u16, // number of resource records in the additional records section; 16 bits
}

impl Default for DnsHeader {
    fn default() -> Self {
        DnsHeader::new()
    }
}

impl DnsHeader {
    pub fn new() -> Self {
        DnsHeader {
            id: 0,
            qr: false,
            opcode: 0.into(),
            aa: false,
            tc: false,
            rd: false,
            ra: false,

            z: 0.into(),

            rcode: 0.into(),
            qdcount: 0,
            ancount: 0,
            nscount: 0,
            arcount: 0,
        }
    }

    #[inline]
    pub fn result_code(&self) -> ResultCode {
        ResultCode::from_u8(*self.rcode)
    }

    pub fn read(buf: &mut PacketReader) -> Result<Self, CodecError> {
        let raw = buf.read_array::<12>()?;
        DnsHeader::unpack(&raw).map_err(|e| CodecError::Header(format!("{:?}", e)))
    }

    pub fn write(&self, buf: &mut PacketWriter) -> Result<(), CodecError> {
        let packed = self
            .pack()
            .map_err(|e| CodecError::Header(format!("{:?}", e)))?;
        buf.write_bytes(&packed);
        Ok(())
    }
}
