use crate::errors::{BitError, BitResult};
use byteorder::{BigEndian, ReadBytesExt};
use bytes::Bytes;
use flate2::{Decompress, FlushDecompress, Status};

const INFLATE_CHUNK: usize = 64 * 1024;

/// Read cursor over an in-memory pack
///
/// Offsets reported in errors are relative to the start of the pack including
/// its signature, even when the transport already stripped it.
#[derive(Debug)]
pub struct PackReader<'p> {
    data: &'p [u8],
    position: usize,
    origin: usize,
}

impl<'p> PackReader<'p> {
    pub fn new(data: &'p [u8]) -> Self {
        Self::with_origin(data, 0)
    }

    /// Reader over a buffer that starts `origin` bytes into the pack
    pub fn with_origin(data: &'p [u8], origin: usize) -> Self {
        PackReader {
            data,
            position: 0,
            origin,
        }
    }

    pub fn offset(&self) -> usize {
        self.origin + self.position
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> &'p [u8] {
        &self.data[self.position..]
    }

    fn truncated(&self, what: &'static str) -> BitError {
        BitError::TruncatedPack {
            offset: self.offset(),
            what,
        }
    }

    pub fn read_u8(&mut self, what: &'static str) -> BitResult<u8> {
        let byte = *self
            .data
            .get(self.position)
            .ok_or_else(|| self.truncated(what))?;
        self.position += 1;
        Ok(byte)
    }

    pub fn read_u32(&mut self, what: &'static str) -> BitResult<u32> {
        let value = self
            .remaining()
            .read_u32::<BigEndian>()
            .map_err(|_| self.truncated(what))?;
        self.position += 4;
        Ok(value)
    }

    pub fn read_bytes(&mut self, len: usize, what: &'static str) -> BitResult<&'p [u8]> {
        let end = self
            .position
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| self.truncated(what))?;
        let bytes = &self.data[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    /// Read an entry's type tag and declared (inflated) size
    ///
    /// The first byte holds a continuation bit, a 3-bit type tag and the low 4
    /// size bits; every continuation byte adds 7 more size bits.
    pub fn read_entry_header(&mut self) -> BitResult<(u8, u64)> {
        let mut byte = self.read_u8("entry header")?;
        let tag = (byte & 0x70) >> 4;
        let mut size = u64::from(byte & 0x0f);
        let mut shift = 4;

        while byte & 0x80 != 0 {
            if shift > 57 {
                return Err(BitError::MalformedObject(format!(
                    "entry size varint too long at offset {}",
                    self.offset()
                )));
            }
            byte = self.read_u8("entry size")?;
            size |= u64::from(byte & 0x7f) << shift;
            shift += 7;
        }

        Ok((tag, size))
    }

    /// Inflate exactly one zlib stream, leaving the cursor on the byte after it
    ///
    /// `size_hint` is the size the entry header declared; the stream must reach
    /// its end marker regardless of how much output it produced.
    pub fn inflate(&mut self, size_hint: usize) -> BitResult<Bytes> {
        let start = self.offset();
        let input = self.remaining();
        let mut inflater = Decompress::new(true);
        let mut inflated = Vec::with_capacity(size_hint.clamp(64, INFLATE_CHUNK));

        loop {
            if inflated.len() == inflated.capacity() {
                inflated.reserve(INFLATE_CHUNK);
            }
            let (before_in, before_out) = (inflater.total_in(), inflater.total_out());
            let consumed = before_in as usize;

            let status = inflater
                .decompress_vec(&input[consumed..], &mut inflated, FlushDecompress::None)
                .map_err(|e| {
                    BitError::MalformedObject(format!("invalid zlib stream at offset {start}: {e}"))
                })?;

            if status == Status::StreamEnd {
                break;
            }

            let stalled = inflater.total_in() == before_in && inflater.total_out() == before_out;
            let drained = inflater.total_in() as usize == input.len();
            if (drained || stalled) && inflated.len() < inflated.capacity() {
                return Err(BitError::TruncatedPack {
                    offset: start,
                    what: "zlib stream",
                });
            }
        }

        self.position += inflater.total_in() as usize;
        Ok(inflated.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::ZlibEncoder;
    use std::io::Write;

    fn zlib(data: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn single_byte_header() {
        // blob (3), size 5
        let data = [0b0011_0101];
        let mut reader = PackReader::new(&data);
        assert_eq!(reader.read_entry_header().unwrap(), (3, 5));
    }

    #[test]
    fn multi_byte_header_shifts_by_four_then_seven() {
        // commit (1), size = 0xf | (0x7f << 4) | (0x01 << 11)
        let data = [0b1001_1111, 0b1111_1111, 0b0000_0001];
        let mut reader = PackReader::new(&data);
        assert_eq!(
            reader.read_entry_header().unwrap(),
            (1, 0xf | (0x7f << 4) | (1 << 11))
        );
        assert_eq!(reader.position(), 3);
    }

    #[test]
    fn inflate_consumes_exactly_one_stream() {
        let mut data = zlib(b"first");
        let first_len = data.len();
        data.extend(zlib(b"second"));

        let mut reader = PackReader::new(&data);
        assert_eq!(&reader.inflate(5).unwrap()[..], b"first");
        assert_eq!(reader.position(), first_len);
        assert_eq!(&reader.inflate(6).unwrap()[..], b"second");
        assert!(reader.remaining().is_empty());
    }

    #[test]
    fn stream_missing_its_end_is_truncated() {
        let mut data = zlib(b"hello world");
        data.truncate(data.len() - 4);

        let mut reader = PackReader::with_origin(&data, 12);
        assert!(matches!(
            reader.inflate(11),
            Err(BitError::TruncatedPack { offset: 12, .. })
        ));
    }

    #[test]
    fn truncated_reads_report_offset() {
        let data = [0, 0, 0];
        let mut reader = PackReader::with_origin(&data, 4);
        assert!(matches!(
            reader.read_u32("version"),
            Err(BitError::TruncatedPack {
                offset: 4,
                what: "version"
            })
        ));
    }
}
