use log::debug;

use crate::{
    cache::ColorCache,
    cursor::ByteCursor,
    error::{Error, Result},
    header::Header,
    image::Image,
    limits::Limits,
    ops::{disassemble, Op, MAX_RUN},
    pixel::Pixel,
};

/// Decodes a whole stream into RGBA pixels.
pub fn decode(stream: &[u8]) -> Result<Image> {
    decode_with_limits(stream, &Limits::default())
}

pub fn decode_with_limits(stream: &[u8], limits: &Limits) -> Result<Image> {
    let (header, ops) = disassemble(stream)?;
    limits.check(&header)?;
    let expected = header.pixel_count()?;

    // No opcode yields more than MAX_RUN pixels per two bytes, so a stream
    // this short cannot hold the declared image.
    if expected > ops.remaining().saturating_mul(usize::from(MAX_RUN) / 2) {
        return Err(Error::TruncatedStream {
            offset: stream.len(),
        });
    }

    let mut decoder = Decoder::new(header, expected)?;
    let mut count = 0;
    for op in ops {
        let (_, op) = op?;
        decoder.apply(op)?;
        count += 1;
    }
    let image = decoder.finish()?;
    debug!(
        "decoded {}x{} image from {} bytes with {} opcodes",
        header.width,
        header.height,
        stream.len(),
        count
    );
    Ok(image)
}

/// State for a single decode call. Mirrors the encoder's cache discipline.
struct Decoder {
    header: Header,
    out: ByteCursor<Vec<u8>>,
    expected: usize,
    prev: Pixel,
    cache: ColorCache,
}

impl Decoder {
    fn new(header: Header, expected: usize) -> Result<Self> {
        let capacity = expected.checked_mul(4).ok_or(Error::TooLarge {
            width: header.width,
            height: header.height,
        })?;
        Ok(Self {
            header,
            out: ByteCursor::with_capacity(capacity),
            expected,
            prev: Pixel::START,
            cache: ColorCache::default(),
        })
    }

    fn written(&self) -> usize {
        self.out.position() / 4
    }

    fn mismatch(&self, actual: usize) -> Error {
        Error::DimensionMismatch {
            width: self.header.width,
            height: self.header.height,
            expected: self.expected,
            actual,
        }
    }

    fn emit(&mut self, pixel: Pixel, count: usize) -> Result<()> {
        if self.written() + count > self.expected {
            return Err(self.mismatch(self.written() + count));
        }
        for _ in 0..count {
            self.out.write_u32(pixel.into())?;
        }
        Ok(())
    }

    fn apply(&mut self, op: Op) -> Result<()> {
        let pixel = match op {
            Op::Run8(_) | Op::Run16(_) => return self.emit(self.prev, op.pixel_count()),
            Op::Index(slot) => self.cache.get(slot),
            _ => {
                let pixel = op.apply(&self.prev).unwrap_or(self.prev);
                self.cache.insert(pixel);
                pixel
            }
        };
        self.prev = pixel;
        self.emit(pixel, 1)
    }

    fn finish(self) -> Result<Image> {
        if self.written() != self.expected {
            return Err(self.mismatch(self.written()));
        }
        Image::new(self.header, self.out.into_inner())
    }
}
