#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };

    #[must_use]
    pub fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Brightest channel, i.e. the HSB brightness scaled to `0..=255`.
    #[must_use]
    pub fn max_channel(self) -> u8 {
        self.r.max(self.g).max(self.b)
    }
}
