use crate::{
    cursor::ByteCursor,
    error::{Error, Result},
    header::Header,
    pixel::Pixel,
};

const INDEX: u8 = 0x00; // 00xxxxxx
const RUN_8: u8 = 0x40; // 010xxxxx
const RUN_16: u8 = 0x60; // 011xxxxx
const DIFF_8: u8 = 0x80; // 10xxxxxx
const DIFF_16: u8 = 0xc0; // 110xxxxx
const DIFF_24: u8 = 0xe0; // 1110xxxx
const COLOR: u8 = 0xf0; // 1111xxxx

const MASK_2: u8 = 0xc0;
const MASK_3: u8 = 0xe0;
const MASK_4: u8 = 0xf0;

/// Longest run a single opcode can carry.
pub const MAX_RUN: u16 = 0x2020;
/// Zero bytes closing every stream.
pub const PADDING: usize = 4;

/// One opcode, with its payload already un-biased.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Cache slot, 0..64.
    Index(u8),
    /// Run of 1..=32 repeats of the previous pixel.
    Run8(u8),
    /// Run of 33..=8224 repeats of the previous pixel.
    Run16(u16),
    Diff8 { dr: i8, dg: i8, db: i8 },
    Diff16 { dr: i8, dg: i8, db: i8 },
    Diff24 { dr: i8, dg: i8, db: i8, da: i8 },
    /// Literal channels; `None` reuses the previous pixel's value.
    Color {
        red: Option<u8>,
        green: Option<u8>,
        blue: Option<u8>,
        alpha: Option<u8>,
    },
}

impl Op {
    /// Run opcode for `len` repeats, `1..=MAX_RUN`.
    pub fn run(len: u16) -> Self {
        debug_assert!((1..=MAX_RUN).contains(&len), "run of {len}");
        if len < 33 {
            Op::Run8(len as u8)
        } else {
            Op::Run16(len)
        }
    }

    /// Smallest diff opcode taking `prev` to `next`, falling back to a
    /// literal when any channel moves by more than 16.
    pub fn between(prev: &Pixel, next: &Pixel) -> Self {
        let delta = next.delta(prev);
        if !delta.iter().all(|d| (-16..=15).contains(d)) {
            let changed = |d: i16, value: u8| (d != 0).then_some(value);
            return Op::Color {
                red: changed(delta[0], next.red),
                green: changed(delta[1], next.green),
                blue: changed(delta[2], next.blue),
                alpha: changed(delta[3], next.alpha),
            };
        }

        let [dr, dg, db, da] = delta.map(|d| d as i8);
        let within = |d: i8, lo: i8, hi: i8| (lo..=hi).contains(&d);
        if da == 0 && [dr, dg, db].into_iter().all(|d| within(d, -2, 1)) {
            Op::Diff8 { dr, dg, db }
        } else if da == 0 && within(dr, -16, 15) && within(dg, -8, 7) && within(db, -8, 7) {
            Op::Diff16 { dr, dg, db }
        } else {
            Op::Diff24 { dr, dg, db, da }
        }
    }

    /// Number of pixels this opcode produces.
    pub fn pixel_count(&self) -> usize {
        match *self {
            Op::Run8(len) => usize::from(len),
            Op::Run16(len) => usize::from(len),
            _ => 1,
        }
    }

    /// Size of this opcode in the stream.
    pub fn encoded_len(&self) -> usize {
        match *self {
            Op::Index(_) | Op::Run8(_) | Op::Diff8 { .. } => 1,
            Op::Run16(_) | Op::Diff16 { .. } => 2,
            Op::Diff24 { .. } => 3,
            Op::Color {
                red,
                green,
                blue,
                alpha,
            } => 1 + [red, green, blue, alpha].iter().flatten().count(),
        }
    }

    pub fn write<B: AsRef<[u8]> + AsMut<[u8]>>(&self, cursor: &mut ByteCursor<B>) -> Result<()> {
        match *self {
            Op::Index(slot) => cursor.write_u8(INDEX | (slot & 0x3f)),
            Op::Run8(len) => cursor.write_u8(RUN_8 | (len.wrapping_sub(1) & 0x1f)),
            Op::Run16(len) => {
                cursor.write_u16(u16::from(RUN_16) << 8 | (len.wrapping_sub(33) & 0x1fff))
            }
            Op::Diff8 { dr, dg, db } => cursor.write_u8(
                DIFF_8 | biased(dr, 2, 0x03) << 4 | biased(dg, 2, 0x03) << 2 | biased(db, 2, 0x03),
            ),
            Op::Diff16 { dr, dg, db } => cursor.write_u16(
                u16::from(DIFF_16) << 8
                    | u16::from(biased(dr, 16, 0x1f)) << 8
                    | u16::from(biased(dg, 8, 0x0f)) << 4
                    | u16::from(biased(db, 8, 0x0f)),
            ),
            Op::Diff24 { dr, dg, db, da } => cursor.write_u24(
                u32::from(DIFF_24) << 16
                    | u32::from(biased(dr, 16, 0x1f)) << 15
                    | u32::from(biased(dg, 16, 0x1f)) << 10
                    | u32::from(biased(db, 16, 0x1f)) << 5
                    | u32::from(biased(da, 16, 0x1f)),
            ),
            Op::Color {
                red,
                green,
                blue,
                alpha,
            } => {
                let flag = |channel: Option<u8>, bit: u8| if channel.is_some() { bit } else { 0 };
                cursor.write_u8(
                    COLOR | flag(red, 8) | flag(green, 4) | flag(blue, 2) | flag(alpha, 1),
                )?;
                for value in [red, green, blue, alpha].into_iter().flatten() {
                    cursor.write_u8(value)?;
                }
                Ok(())
            }
        }
    }

    /// Reads one opcode. Missing continuation bytes are reported as
    /// `TruncatedStream` at the opcode's first byte.
    pub fn read(cursor: &mut ByteCursor<&[u8]>) -> Result<Self> {
        let start = cursor.position();
        read_op(cursor).map_err(|err| match err {
            Error::OutOfBounds { .. } => Error::TruncatedStream { offset: start },
            err => err,
        })
    }

    /// Pixel produced by applying this opcode after `prev`, or `None` for
    /// index and run opcodes, which don't compute a new color.
    pub(crate) fn apply(&self, prev: &Pixel) -> Option<Pixel> {
        match *self {
            Op::Index(_) | Op::Run8(_) | Op::Run16(_) => None,
            Op::Diff8 { dr, dg, db } | Op::Diff16 { dr, dg, db } => Some(prev.offset(dr, dg, db, 0)),
            Op::Diff24 { dr, dg, db, da } => Some(prev.offset(dr, dg, db, da)),
            Op::Color {
                red,
                green,
                blue,
                alpha,
            } => Some(Pixel::new(
                red.unwrap_or(prev.red),
                green.unwrap_or(prev.green),
                blue.unwrap_or(prev.blue),
                alpha.unwrap_or(prev.alpha),
            )),
        }
    }
}

fn biased(delta: i8, bias: i8, mask: u8) -> u8 {
    (delta.wrapping_add(bias) as u8) & mask
}

fn unbiased(field: u8, bias: i8) -> i8 {
    (field as i8).wrapping_sub(bias)
}

// Shorter tags are prefixes of longer ones, so test 2-bit tags before 3-bit
// before 4-bit.
fn read_op(cursor: &mut ByteCursor<&[u8]>) -> Result<Op> {
    let b1 = cursor.read_u8()?;
    let op = match b1 {
        b if b & MASK_2 == INDEX => Op::Index(b & 0x3f),
        b if b & MASK_2 == DIFF_8 => Op::Diff8 {
            dr: unbiased((b >> 4) & 0x03, 2),
            dg: unbiased((b >> 2) & 0x03, 2),
            db: unbiased(b & 0x03, 2),
        },
        b if b & MASK_3 == RUN_8 => Op::Run8((b & 0x1f) + 1),
        b if b & MASK_3 == RUN_16 => {
            let b2 = cursor.read_u8()?;
            Op::Run16((u16::from(b & 0x1f) << 8 | u16::from(b2)) + 33)
        }
        b if b & MASK_3 == DIFF_16 => {
            let b2 = cursor.read_u8()?;
            Op::Diff16 {
                dr: unbiased(b & 0x1f, 16),
                dg: unbiased(b2 >> 4, 8),
                db: unbiased(b2 & 0x0f, 8),
            }
        }
        b if b & MASK_4 == DIFF_24 => {
            let word = u32::from(b) << 16 | u32::from(cursor.read_u16()?);
            let field = |shift: u32| unbiased(((word >> shift) & 0x1f) as u8, 16);
            Op::Diff24 {
                dr: field(15),
                dg: field(10),
                db: field(5),
                da: field(0),
            }
        }
        b => {
            let mut literal = |bit: u8| -> Result<Option<u8>> {
                if b & bit != 0 {
                    cursor.read_u8().map(Some)
                } else {
                    Ok(None)
                }
            };
            Op::Color {
                red: literal(8)?,
                green: literal(4)?,
                blue: literal(2)?,
                alpha: literal(1)?,
            }
        }
    };
    Ok(op)
}

/// Splits a stream into its header and an iterator over its opcodes.
///
/// The trailing padding is never interpreted as an opcode.
pub fn disassemble(stream: &[u8]) -> Result<(Header, OpIter<'_>)> {
    let (body, header) = Header::parse(stream)?;
    let body = body
        .len()
        .checked_sub(PADDING)
        .map(|end| &body[..end])
        .ok_or(Error::TruncatedStream {
            offset: stream.len(),
        })?;
    Ok((
        header,
        OpIter {
            cursor: ByteCursor::new(body),
            finished: false,
        },
    ))
}

/// Yields each opcode with its byte offset in the full stream.
pub struct OpIter<'a> {
    cursor: ByteCursor<&'a [u8]>,
    finished: bool,
}

impl OpIter<'_> {
    /// Bytes left before the padding trailer.
    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }
}

impl<'a> Iterator for OpIter<'a> {
    type Item = Result<(usize, Op)>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.cursor.is_at_end() {
            return None;
        }
        let offset = Header::SIZE + self.cursor.position();
        match Op::read(&mut self.cursor) {
            Ok(op) => Some(Ok((offset, op))),
            Err(Error::TruncatedStream { offset: at }) => {
                self.finished = true;
                Some(Err(Error::TruncatedStream {
                    offset: Header::SIZE + at,
                }))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
