use crate::{
    decoder,
    encoder::encode_pixels,
    error::{Error, Result},
    header::Header,
    limits::Limits,
    pixel::Pixel,
};

/// A decoded image: header metadata plus row-major RGBA bytes.
///
/// Pixels are always stored with four bytes each, whatever channel count the
/// header declares. The declared count only travels through to the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    header: Header,
    data: Vec<u8>,
}

impl Image {
    pub fn new(header: Header, data: Vec<u8>) -> Result<Self> {
        let expected = header.pixel_count()?;
        if data.len() % 4 != 0 || data.len() / 4 != expected {
            return Err(Error::DimensionMismatch {
                width: header.width,
                height: header.height,
                expected,
                actual: data.len() / 4,
            });
        }
        Ok(Self { header, data })
    }

    pub fn from_pixels(header: Header, pixels: &[Pixel]) -> Result<Self> {
        Self::new(header, pixels.iter().flat_map(|p| p.to_rgba()).collect())
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        decoder::decode(bytes)
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        self.encode_with_limits(&Limits::default())
    }

    pub fn encode_with_limits(&self, limits: &Limits) -> Result<Vec<u8>> {
        encode_pixels(&self.header, self.pixels(), limits)
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn width(&self) -> u32 {
        self.header.width
    }

    pub fn height(&self) -> u32 {
        self.header.height
    }

    pub fn as_rgba(&self) -> &[u8] {
        &self.data
    }

    pub fn into_rgba(self) -> Vec<u8> {
        self.data
    }

    pub fn pixels(&self) -> impl ExactSizeIterator<Item = Pixel> + '_ {
        self.data
            .chunks_exact(4)
            .map(|c| Pixel::new(c[0], c[1], c[2], c[3]))
    }

    /// Pixels as `r << 24 | g << 16 | b << 8 | a` words, ready for
    /// [`encode`](crate::encode).
    pub fn packed(&self) -> Vec<u32> {
        self.pixels().map(u32::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Image;
    use crate::{Channels, Error, Header, Pixel};

    #[test]
    fn data_must_cover_every_pixel() {
        let header = Header::new(2, 2, Channels::Rgba, 0);
        assert!(matches!(
            Image::new(header, vec![0; 12]),
            Err(Error::DimensionMismatch {
                expected: 4,
                actual: 3,
                ..
            })
        ));
        assert!(Image::new(header, vec![0; 15]).is_err());
        assert!(Image::new(header, vec![0; 16]).is_ok());
    }

    #[test]
    fn rgb_header_still_holds_rgba_pixels() {
        let header = Header::new(1, 2, Channels::Rgb, 0);
        let pixels = [Pixel::new(1, 2, 3, 255), Pixel::new(4, 5, 6, 255)];
        let image = Image::from_pixels(header, &pixels).unwrap();
        assert_eq!(image.as_rgba(), [1, 2, 3, 255, 4, 5, 6, 255]);
        assert_eq!(image.packed(), [0x0102_03ff, 0x0405_06ff]);

        let decoded = Image::decode(&image.encode().unwrap()).unwrap();
        assert_eq!(decoded, image);
    }
}
