use crate::error::{Error, Result};

/// Position-tracked, bounds-checked access to a byte buffer.
///
/// All multi-byte values are big-endian. A cursor over a `Vec<u8>` created with
/// [`ByteCursor::with_capacity`] has a fixed capacity; writes never grow it.
#[derive(Debug, Clone)]
pub struct ByteCursor<B> {
    buf: B,
    pos: usize,
}

impl<B: AsRef<[u8]>> ByteCursor<B> {
    pub fn new(buf: B) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.buf.as_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn remaining(&self) -> usize {
        self.len() - self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.len()
    }

    pub fn into_inner(self) -> B {
        self.buf
    }

    fn check(&self, requested: usize) -> Result<()> {
        if requested > self.remaining() {
            return Err(Error::OutOfBounds {
                position: self.pos,
                requested,
                len: self.len(),
            });
        }
        Ok(())
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.check(N)?;
        let mut bytes = [0; N];
        bytes.copy_from_slice(&self.buf.as_ref()[self.pos..self.pos + N]);
        self.pos += N;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let [b] = self.take::<1>()?;
        Ok(b)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.take()?))
    }

    pub fn read_u24(&mut self) -> Result<u32> {
        let [b0, b1, b2] = self.take::<3>()?;
        Ok(u32::from_be_bytes([0, b0, b1, b2]))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.take()?))
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> ByteCursor<B> {
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.check(bytes.len())?;
        self.buf.as_mut()[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
        Ok(())
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_bytes(&[value])
    }

    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.write_bytes(&value.to_be_bytes())
    }

    /// Writes the low 24 bits of `value`.
    pub fn write_u24(&mut self, value: u32) -> Result<()> {
        self.write_bytes(&value.to_be_bytes()[1..])
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.write_bytes(&value.to_be_bytes())
    }

    /// Writes the ASCII code of `c`.
    pub fn write_char(&mut self, c: char) -> Result<()> {
        debug_assert!(c.is_ascii(), "{c:?} is not ASCII");
        self.write_u8(c as u8)
    }
}

impl ByteCursor<Vec<u8>> {
    /// A zero-filled buffer of exactly `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(vec![0; capacity])
    }

    /// The bytes written so far, dropping unused capacity.
    pub fn into_written(self) -> Vec<u8> {
        let mut buf = self.buf;
        buf.truncate(self.pos);
        buf
    }
}
