use nom::{
    bytes::complete::take,
    number::complete::{be_u32, u8},
    sequence::tuple,
    IResult,
};

use crate::{
    cursor::ByteCursor,
    error::{Error, Result},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub width: u32,
    pub height: u32,
    pub channels: Channels,
    /// Opaque tag, carried through unmodified.
    pub color_space: u8,
}
impl Header {
    pub const MAGIC: &'static [u8; 4] = b"qoif";
    pub const SIZE: usize = 14;

    pub fn new(width: u32, height: u32, channels: Channels, color_space: u8) -> Self {
        Self {
            width,
            height,
            channels,
            color_space,
        }
    }

    /// `width * height`, or `TooLarge` if that does not fit in `usize`.
    pub fn pixel_count(&self) -> Result<usize> {
        usize::try_from(self.width)
            .ok()
            .zip(usize::try_from(self.height).ok())
            .and_then(|(w, h)| w.checked_mul(h))
            .ok_or(Error::TooLarge {
                width: self.width,
                height: self.height,
            })
    }

    /// Parses the 14-byte header, returning it with the bytes that follow.
    pub fn parse(input: &[u8]) -> Result<(&[u8], Self)> {
        let (rest, (magic, width, height, channels, color_space)) = header_fields(input)
            .map_err(|_| {
                Error::MalformedHeader(format!(
                    "expected {} bytes, found {}",
                    Self::SIZE,
                    input.len()
                ))
            })?;
        if magic != Self::MAGIC {
            return Err(Error::MalformedHeader(format!(
                "unexpected magic {:?}",
                String::from_utf8_lossy(magic)
            )));
        }
        Ok((
            rest,
            Header {
                width,
                height,
                channels: channels.try_into()?,
                color_space,
            },
        ))
    }

    pub fn write<B: AsRef<[u8]> + AsMut<[u8]>>(&self, cursor: &mut ByteCursor<B>) -> Result<()> {
        for &c in Self::MAGIC {
            cursor.write_char(char::from(c))?;
        }
        cursor.write_u32(self.width)?;
        cursor.write_u32(self.height)?;
        cursor.write_u8(self.channels as u8)?;
        cursor.write_u8(self.color_space)
    }
}

fn header_fields(input: &[u8]) -> IResult<&[u8], (&[u8], u32, u32, u8, u8)> {
    tuple((take(4usize), be_u32, be_u32, u8, u8))(input)
}

/// Channel count declared in the header. Decoded pixels are always RGBA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    Rgb = 3,
    Rgba = 4,
}
impl Channels {
    pub fn count(&self) -> u8 {
        *self as u8
    }
}
impl TryFrom<u8> for Channels {
    type Error = Error;
    fn try_from(value: u8) -> Result<Self> {
        match value {
            3 => Ok(Self::Rgb),
            4 => Ok(Self::Rgba),
            n => Err(Error::UnsupportedChannels(n)),
        }
    }
}
