use crate::pixel::Pixel;

/// 64-slot direct-mapped table of recently seen colors.
///
/// Encoder and decoder each own one and must update it under the same rule:
/// every pixel that is neither a run repeat nor an index hit is stored at its
/// hash slot, overwriting whatever was there.
#[derive(Debug, Clone)]
pub(crate) struct ColorCache([Pixel; 64]);

impl Default for ColorCache {
    fn default() -> Self {
        Self([Pixel::default(); 64])
    }
}

impl ColorCache {
    pub(crate) fn get(&self, slot: u8) -> Pixel {
        self.0[usize::from(slot) % 64]
    }

    /// Returns the slot if `pixel` is already cached there.
    pub(crate) fn lookup(&self, pixel: &Pixel) -> Option<u8> {
        let slot = pixel.hash();
        (self.0[slot] == *pixel).then_some(slot as u8)
    }

    pub(crate) fn insert(&mut self, pixel: Pixel) {
        self.0[pixel.hash()] = pixel;
    }
}
