//! DNS message model and its wire codec.
//!
//! A message is a 12 byte [`DnsHeader`] followed by four sections: questions,
//! answers, authorities and additionals. Each type reads itself from a
//! [`PacketReader`](crate::buffer::PacketReader) and writes itself to a
//! [`PacketWriter`](crate::buffer::PacketWriter).

mod header;
mod packet;
mod question;
mod record;

pub use header::{DnsHeader, ResultCode};
pub use packet::DnsPacket;
pub use question::{DnsQuestion, QueryType, CLASS_IN};
pub use record::{DnsRecord, RecordData};
