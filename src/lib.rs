//! Lossless RGBA image codec built from runs, a 64-entry color cache and
//! delta-coded pixel transitions.
//!
//! ```
//! use simple_qoi::{decode, encode, Channels};
//!
//! let pixels = [0x0a14_1eff, 0x0a14_1eff, 0x0b15_1fff];
//! let stream = encode(&pixels, 3, 1, Channels::Rgba, 0)?;
//! let image = decode(&stream)?;
//! assert_eq!(image.packed(), pixels);
//! # Ok::<(), simple_qoi::Error>(())
//! ```

mod cache;
mod cursor;
mod decoder;
mod encoder;
mod error;
mod header;
mod image;
mod limits;
mod ops;
mod pixel;
mod utils;

pub use cursor::ByteCursor;
pub use decoder::{decode, decode_with_limits};
pub use encoder::{encode, encode_with_limits};
pub use error::{Error, Result};
pub use header::{Channels, Header};
pub use image::Image;
pub use limits::Limits;
pub use ops::{disassemble, Op, OpIter, MAX_RUN, PADDING};
pub use pixel::Pixel;
pub use utils::encoded_size_limit;
