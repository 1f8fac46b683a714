use crate::{
    error::{Error, Result},
    header::Header,
};

/// Caps checked against a header before any pixel buffer is allocated.
///
/// `None` means no limit. The default has no limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limits {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub max_pixels: Option<u64>,
}

impl Limits {
    pub fn with_max_width(mut self, max: u32) -> Self {
        self.max_width = Some(max);
        self
    }

    pub fn with_max_height(mut self, max: u32) -> Self {
        self.max_height = Some(max);
        self
    }

    pub fn with_max_pixels(mut self, max: u64) -> Self {
        self.max_pixels = Some(max);
        self
    }

    pub fn check(&self, header: &Header) -> Result<()> {
        let checks = [
            ("width", u64::from(header.width), self.max_width.map(u64::from)),
            ("height", u64::from(header.height), self.max_height.map(u64::from)),
            (
                "pixel count",
                u64::from(header.width) * u64::from(header.height),
                self.max_pixels,
            ),
        ];
        for (what, actual, max) in checks {
            if let Some(max) = max {
                if actual > max {
                    return Err(Error::LimitExceeded { what, actual, max });
                }
            }
        }
        Ok(())
    }
}
