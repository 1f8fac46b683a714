use crate::{
    error::{Error, Result},
    header::Header,
    ops::PADDING,
};

/// Worst-case encoded size: header, one tag byte plus `channels` literals per
/// pixel, and the padding trailer.
pub fn encoded_size_limit(header: &Header) -> Result<usize> {
    header
        .pixel_count()?
        .checked_mul(usize::from(header.channels.count()) + 1)
        .and_then(|n| n.checked_add(Header::SIZE + PADDING))
        .ok_or(Error::TooLarge {
            width: header.width,
            height: header.height,
        })
}
