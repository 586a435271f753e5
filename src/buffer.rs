use crate::error::CodecError;

// compression pointers followed before a name is rejected
const MAX_JUMPS: usize = 16;

// labels are capped at 63 bytes, the top two length bits are tag bits
const MAX_LABEL_LEN: usize = 63;

/// Read position saved by [`PacketReader::seek_to`].
#[must_use = "a jump must be undone with PacketReader::restore"]
#[derive(Debug)]
pub struct Restore(usize);

/// Sequential reader over a complete DNS message.
///
/// The whole message is kept as the base buffer so compression pointers,
/// which are offsets from the start of the message, can be followed from
/// anywhere inside it.
#[derive(Debug, Clone)]
pub struct PacketReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> PacketReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        PacketReader { buf, pos: 0 }
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    // take the next n bytes and step forward
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if n > self.remaining() {
            return Err(CodecError::TruncatedInput {
                needed: n,
                remaining: self.remaining(),
            });
        }

        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    #[inline]
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut arr = [0; N];
        arr.copy_from_slice(self.take(N)?);
        Ok(arr)
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    #[inline]
    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    #[inline]
    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    /// Moves the read position to an absolute offset in the message.
    ///
    /// The returned token must be handed back to [`restore`](Self::restore)
    /// once the jump is done.
    pub fn seek_to(&mut self, offset: usize) -> Result<Restore, CodecError> {
        if offset >= self.buf.len() {
            return Err(CodecError::TruncatedInput {
                needed: offset + 1,
                remaining: self.buf.len(),
            });
        }

        let saved = Restore(self.pos);
        self.pos = offset;
        Ok(saved)
    }

    #[inline]
    pub fn restore(&mut self, saved: Restore) {
        self.pos = saved.0;
    }

    // read a name from the buffer
    // a name is a series of labels, each prefixed with a length byte, and
    // ends with either a zero length byte or a compression pointer
    // after a pointer the position is left just past the 2 pointer bytes
    pub fn read_qname(&mut self) -> Result<String, CodecError> {
        self.read_qname_nested(0)
    }

    fn read_qname_nested(&mut self, depth: usize) -> Result<String, CodecError> {
        if depth > MAX_JUMPS {
            return Err(CodecError::PointerLoop);
        }

        let mut labels: Vec<String> = Vec::new();
        loop {
            let len = self.read_u8()?;

            if (len & 0xC0) == 0xC0 {
                let b2 = self.read_u8()?;
                let offset = (((len & 0x3F) as usize) << 8) | b2 as usize;

                let saved = self.seek_to(offset)?;
                let rest = self.read_qname_nested(depth + 1);
                self.restore(saved);

                let rest = rest?;
                if !rest.is_empty() {
                    labels.push(rest);
                }
                break;
            }

            // 01 and 10 tag bits are reserved label types
            if (len & 0xC0) != 0 {
                return Err(CodecError::ReservedLabelType(len));
            }

            if len == 0 {
                break;
            }

            let label = self.take(len as usize)?;
            labels.push(String::from_utf8_lossy(label).into_owned());
        }

        Ok(labels.join("."))
    }
}

/// Append-only builder for an outgoing message.
#[derive(Debug, Clone, Default)]
pub struct PacketWriter {
    buf: Vec<u8>,
}

impl PacketWriter {
    pub fn new() -> Self {
        PacketWriter {
            buf: Vec::with_capacity(512),
        }
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    #[inline]
    pub fn write_u8(&mut self, val: u8) {
        self.buf.push(val);
    }

    #[inline]
    pub fn write_u16(&mut self, val: u16) {
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn write_u32(&mut self, val: u32) {
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn write_bytes(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    // overwrite 2 bytes that were already written, used for rdata lengths
    pub fn set_u16(&mut self, pos: usize, val: u16) -> Result<(), CodecError> {
        if pos + 2 > self.buf.len() {
            return Err(CodecError::TruncatedInput {
                needed: pos + 2,
                remaining: self.buf.len(),
            });
        }

        self.buf[pos..pos + 2].copy_from_slice(&val.to_be_bytes());
        Ok(())
    }

    pub fn write_label(&mut self, label: &[u8]) -> Result<(), CodecError> {
        if label.len() > MAX_LABEL_LEN {
            return Err(CodecError::LabelTooLong(label.len()));
        }

        self.write_u8(label.len() as u8);
        self.write_bytes(label);
        Ok(())
    }

    // names are never compressed on the way out
    // a trailing dot already marks the root, so it does not add a second terminator
    pub fn write_qname(&mut self, qname: &str) -> Result<(), CodecError> {
        for label in qname.split('.').filter(|label| !label.is_empty()) {
            self.write_label(label.as_bytes())?;
        }

        self.write_u8(0);
        Ok(())
    }
}
