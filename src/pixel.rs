#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Hash)]
pub struct Pixel {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}
impl Pixel {
    /// The "previous pixel" both sides start from.
    pub const START: Pixel = Pixel::new(0, 0, 0, u8::MAX);

    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Slot of this pixel in the 64-entry color cache.
    pub const fn hash(&self) -> usize {
        ((self.red ^ self.green ^ self.blue ^ self.alpha) % 64) as usize
    }

    pub const fn to_rgba(self) -> [u8; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }

    /// Signed per-channel difference `self - prev`, in r, g, b, a order.
    pub(crate) fn delta(&self, prev: &Pixel) -> [i16; 4] {
        [
            i16::from(self.red) - i16::from(prev.red),
            i16::from(self.green) - i16::from(prev.green),
            i16::from(self.blue) - i16::from(prev.blue),
            i16::from(self.alpha) - i16::from(prev.alpha),
        ]
    }

    /// Applies signed deltas with 8-bit wraparound.
    pub(crate) fn offset(&self, dr: i8, dg: i8, db: i8, da: i8) -> Self {
        Self {
            red: self.red.wrapping_add_signed(dr),
            green: self.green.wrapping_add_signed(dg),
            blue: self.blue.wrapping_add_signed(db),
            alpha: self.alpha.wrapping_add_signed(da),
        }
    }
}

impl From<[u8; 4]> for Pixel {
    fn from([red, green, blue, alpha]: [u8; 4]) -> Self {
        Self::new(red, green, blue, alpha)
    }
}

/// Unpacks `r << 24 | g << 16 | b << 8 | a`.
impl From<u32> for Pixel {
    fn from(value: u32) -> Self {
        value.to_be_bytes().into()
    }
}

impl From<Pixel> for u32 {
    fn from(pixel: Pixel) -> Self {
        u32::from_be_bytes(pixel.to_rgba())
    }
}
