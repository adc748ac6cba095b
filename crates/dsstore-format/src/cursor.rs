use crate::error::{ParseResult, ParsingError};

/// Sequential big-endian reader over a borrowed buffer.
///
/// The position is a plain `usize`; callers snapshot it with
/// [`position`](Self::position) and restore it with [`seek`](Self::seek).
/// Reads past the end fail with [`ParsingError::Truncated`] and leave the
/// position unchanged.
#[derive(Clone, Copy, Debug)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Start reading at offset 0.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current absolute offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move to an absolute offset. Seeking past the end is allowed; the next
    /// read reports the truncation.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Length of the whole buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left after the current position.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Borrow the next `n` bytes.
    pub fn read_bytes(&mut self, n: usize) -> ParseResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.data.len())
            .ok_or(ParsingError::Truncated {
                offset: self.pos,
                needed: n,
                available: self.remaining(),
            })?;
        let data: &'a [u8] = self.data;
        let bytes = &data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Copy the next `N` bytes.
    pub fn read_array<const N: usize>(&mut self) -> ParseResult<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Read one byte.
    pub fn read_u8(&mut self) -> ParseResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Read a big-endian u32.
    pub fn read_u32_be(&mut self) -> ParseResult<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    /// Read a big-endian u64.
    pub fn read_u64_be(&mut self) -> ParseResult<u64> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    /// Read `chars` UTF-16BE code units. Unpaired surrogates are replaced.
    pub fn read_utf16_be(&mut self, chars: u32) -> ParseResult<String> {
        let byte_len = (chars as usize).checked_mul(2).ok_or(ParsingError::Truncated {
            offset: self.pos,
            needed: usize::MAX,
            available: self.remaining(),
        })?;
        let bytes = self.read_bytes(byte_len)?;
        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        Ok(String::from_utf16_lossy(&units))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_reads() {
        let data = [0x01, 0x00, 0x00, 0x00, 0x2a, 0, 0, 0, 0, 0, 0, 0x01, 0x00];
        let mut cur = ByteCursor::new(&data);
        assert_eq!(cur.read_u8().unwrap(), 1);
        assert_eq!(cur.read_u32_be().unwrap(), 0x2a);
        assert_eq!(cur.read_u64_be().unwrap(), 0x100);
        assert_eq!(cur.position(), 13);
        assert_eq!(cur.remaining(), 0);
    }

    #[test]
    fn seek_and_restore() {
        let data = [0, 0, 0, 1, 0, 0, 0, 2];
        let mut cur = ByteCursor::new(&data);
        let saved = cur.position();
        cur.seek(4);
        assert_eq!(cur.read_u32_be().unwrap(), 2);
        cur.seek(saved);
        assert_eq!(cur.read_u32_be().unwrap(), 1);
    }

    #[test]
    fn read_past_end_is_truncation() {
        let data = [0, 0, 1];
        let mut cur = ByteCursor::new(&data);
        let err = cur.read_u32_be().unwrap_err();
        assert!(matches!(
            err,
            ParsingError::Truncated { offset: 0, needed: 4, available: 3 }
        ));
        assert_eq!(cur.position(), 0);
    }

    #[test]
    fn seek_beyond_end_then_read() {
        let data = [0u8; 4];
        let mut cur = ByteCursor::new(&data);
        cur.seek(100);
        assert_eq!(cur.remaining(), 0);
        assert!(matches!(cur.read_u8(), Err(ParsingError::Truncated { .. })));
    }

    #[test]
    fn huge_length_does_not_overflow() {
        let data = [0u8; 4];
        let mut cur = ByteCursor::new(&data);
        cur.seek(2);
        assert!(cur.read_bytes(usize::MAX).is_err());
    }

    #[test]
    fn utf16_text() {
        let data = [0x00, 0x61, 0x00, 0x2e, 0x00, 0x67, 0x00, 0x6c, 0x00, 0x62];
        let mut cur = ByteCursor::new(&data);
        assert_eq!(cur.read_utf16_be(5).unwrap(), "a.glb");
    }

    #[test]
    fn utf16_non_ascii() {
        // "é" then U+1F600 as a surrogate pair
        let data = [0x00, 0xe9, 0xd8, 0x3d, 0xde, 0x00];
        let mut cur = ByteCursor::new(&data);
        assert_eq!(cur.read_utf16_be(3).unwrap(), "é\u{1F600}");
    }

    #[test]
    fn borrowed_slices_outlive_cursor() {
        let data = b"Bud1rest".to_vec();
        let slice = {
            let mut cur = ByteCursor::new(&data);
            cur.read_bytes(4).unwrap()
        };
        assert_eq!(slice, b"Bud1");
    }
}
