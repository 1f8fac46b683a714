use log::{debug, trace};

use crate::{
    cache::ColorCache,
    cursor::ByteCursor,
    error::{Error, Result},
    header::{Channels, Header},
    limits::Limits,
    ops::{Op, MAX_RUN, PADDING},
    pixel::Pixel,
    utils::encoded_size_limit,
};

/// Encodes packed `r << 24 | g << 16 | b << 8 | a` pixels in row-major order.
pub fn encode(
    pixels: &[u32],
    width: u32,
    height: u32,
    channels: Channels,
    color_space: u8,
) -> Result<Vec<u8>> {
    encode_with_limits(pixels, width, height, channels, color_space, &Limits::default())
}

pub fn encode_with_limits(
    pixels: &[u32],
    width: u32,
    height: u32,
    channels: Channels,
    color_space: u8,
    limits: &Limits,
) -> Result<Vec<u8>> {
    let header = Header::new(width, height, channels, color_space);
    encode_pixels(&header, pixels.iter().copied().map(Pixel::from), limits)
}

pub(crate) fn encode_pixels<I>(header: &Header, pixels: I, limits: &Limits) -> Result<Vec<u8>>
where
    I: ExactSizeIterator<Item = Pixel>,
{
    limits.check(header)?;
    let expected = header.pixel_count()?;
    if pixels.len() != expected {
        return Err(Error::DimensionMismatch {
            width: header.width,
            height: header.height,
            expected,
            actual: pixels.len(),
        });
    }

    let mut encoder = Encoder::new(header)?;
    for pixel in pixels {
        encoder.push(pixel)?;
    }
    let ops = encoder.ops;
    let bytes = encoder.finish()?;
    debug!(
        "encoded {}x{} image into {} bytes with {} opcodes",
        header.width,
        header.height,
        bytes.len(),
        ops
    );
    Ok(bytes)
}

/// State for a single encode call.
struct Encoder {
    out: ByteCursor<Vec<u8>>,
    prev: Pixel,
    run: u16,
    cache: ColorCache,
    ops: usize,
}

impl Encoder {
    fn new(header: &Header) -> Result<Self> {
        let mut encoder = Self {
            out: ByteCursor::with_capacity(encoded_size_limit(header)?),
            prev: Pixel::START,
            run: 0,
            cache: ColorCache::default(),
            ops: 0,
        };
        let result = header.write(&mut encoder.out);
        encoder.overflow(result)?;
        Ok(encoder)
    }

    fn overflow(&self, result: Result<()>) -> Result<()> {
        result.map_err(|_| Error::BufferOverflow {
            capacity: self.out.len(),
        })
    }

    fn emit(&mut self, op: Op) -> Result<()> {
        let result = op.write(&mut self.out);
        self.overflow(result)?;
        self.ops += 1;
        Ok(())
    }

    fn flush_run(&mut self) -> Result<()> {
        if self.run > 0 {
            self.emit(Op::run(self.run))?;
            self.run = 0;
        }
        Ok(())
    }

    fn push(&mut self, pixel: Pixel) -> Result<()> {
        if pixel == self.prev {
            self.run += 1;
            if self.run == MAX_RUN {
                trace!("run reached {MAX_RUN} pixels, splitting");
                self.flush_run()?;
            }
            return Ok(());
        }
        self.flush_run()?;

        // Index hits leave the cache alone; it already holds this color.
        let op = match self.cache.lookup(&pixel) {
            Some(slot) => Op::Index(slot),
            None => {
                self.cache.insert(pixel);
                Op::between(&self.prev, &pixel)
            }
        };
        self.emit(op)?;
        self.prev = pixel;
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>> {
        self.flush_run()?;
        let result = self.out.write_bytes(&[0; PADDING]);
        self.overflow(result)?;
        Ok(self.out.into_written())
    }
}
