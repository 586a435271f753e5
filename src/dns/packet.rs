use std::net::Ipv4Addr;

use crate::buffer::{PacketReader, PacketWriter};
use crate::error::CodecError;

use super::{header::DnsHeader, question::DnsQuestion, record::DnsRecord, record::RecordData};

/// A complete DNS message.
///
/// The sections are private so the header counts can never drift from the
/// number of entries actually held: every constructor and `add_*` method
/// recomputes them, and `write` always takes them from the sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsPacket {
    header: DnsHeader,
    questions: Vec<DnsQuestion>,
    answers: Vec<DnsRecord>,
    authorities: Vec<DnsRecord>,
    additionals: Vec<DnsRecord>,
}

impl Default for DnsPacket {
    fn default() -> Self {
        DnsPacket::new(DnsHeader::new(), Vec::new(), Vec::new(), Vec::new(), Vec::new())
    }
}

impl DnsPacket {
    pub fn new(
        header: DnsHeader,
        questions: Vec<DnsQuestion>,
        answers: Vec<DnsRecord>,
        authorities: Vec<DnsRecord>,
        additionals: Vec<DnsRecord>,
    ) -> Self {
        let mut packet = DnsPacket {
            header,
            questions,
            answers,
            authorities,
            additionals,
        };
        packet.sync_counts();
        packet
    }

    /// An iterative (recursion not desired) query for a single question.
    pub fn query(id: u16, question: DnsQuestion) -> Self {
        let mut header = DnsHeader::new();
        header.id = id;
        header.rd = false;
        DnsPacket::new(header, vec![question], Vec::new(), Vec::new(), Vec::new())
    }

    fn sync_counts(&mut self) {
        let count = |len: usize| u16::try_from(len).unwrap_or(u16::MAX);
        self.header.qdcount = count(self.questions.len());
        self.header.ancount = count(self.answers.len());
        self.header.nscount = count(self.authorities.len());
        self.header.arcount = count(self.additionals.len());
    }

    #[inline]
    pub fn header(&self) -> &DnsHeader {
        &self.header
    }

    #[inline]
    pub fn questions(&self) -> &[DnsQuestion] {
        &self.questions
    }

    #[inline]
    pub fn answers(&self) -> &[DnsRecord] {
        &self.answers
    }

    #[inline]
    pub fn authorities(&self) -> &[DnsRecord] {
        &self.authorities
    }

    #[inline]
    pub fn additionals(&self) -> &[DnsRecord] {
        &self.additionals
    }

    pub fn first_answer(&self) -> Option<&DnsRecord> {
        self.answers.first()
    }

    pub fn first_authority(&self) -> Option<&DnsRecord> {
        self.authorities.first()
    }

    // get the address of the first A record in the additionals
    // whose name is exactly the given nameserver
    pub fn glue_for(&self, nameserver: &str) -> Option<Ipv4Addr> {
        self.additionals.iter().find_map(|record| match &record.data {
            RecordData::A(addr) if record.domain == nameserver => Some(*addr),
            _ => None,
        })
    }

    pub fn read(buf: &mut PacketReader) -> Result<Self, CodecError> {
        let header = DnsHeader::read(buf)?;

        // counts come off the wire, so nothing is reserved up front
        let mut questions = Vec::new();
        for _ in 0..header.qdcount {
            questions.push(DnsQuestion::read(buf)?);
        }

        let mut answers = Vec::new();
        for _ in 0..header.ancount {
            answers.push(DnsRecord::read(buf)?);
        }

        let mut authorities = Vec::new();
        for _ in 0..header.nscount {
            authorities.push(DnsRecord::read(buf)?);
        }

        let mut additionals = Vec::new();
        for _ in 0..header.arcount {
            additionals.push(DnsRecord::read(buf)?);
        }

        Ok(DnsPacket {
            header,
            questions,
            answers,
            authorities,
            additionals,
        })
    }

    pub fn write(&self, buf: &mut PacketWriter) -> Result<(), CodecError> {
        let count = |len: usize| u16::try_from(len).map_err(|_| CodecError::SectionTooLarge(len));

        let mut header = self.header;
        header.qdcount = count(self.questions.len())?;
        header.ancount = count(self.answers.len())?;
        header.nscount = count(self.authorities.len())?;
        header.arcount = count(self.additionals.len())?;
        header.write(buf)?;

        for q in &self.questions {
            q.write(buf)?;
        }

        for a in &self.answers {
            a.write(buf)?;
        }

        for a in &self.authorities {
            a.write(buf)?;
        }

        for a in &self.additionals {
            a.write(buf)?;
        }

        Ok(())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        DnsPacket::read(&mut PacketReader::new(bytes))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut buf = PacketWriter::new();
        self.write(&mut buf)?;
        Ok(buf.into_inner())
    }

    pub fn add_question(&mut self, question: DnsQuestion) {
        self.questions.push(question);
        self.sync_counts();
    }

    pub fn add_answer(&mut self, answer: DnsRecord) {
        self.answers.push(answer);
        self.sync_counts();
    }

    pub fn add_authority(&mut self, authority: DnsRecord) {
        self.authorities.push(authority);
        self.sync_counts();
    }

    pub fn add_additional(&mut self, additional: DnsRecord) {
        self.additionals.push(additional);
        self.sync_counts();
    }
}
