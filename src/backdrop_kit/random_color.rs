use image::Rgb;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Source of replacement colors for background recoloring.
///
/// Recoloring draws exactly one color per call, so any implementation that
/// returns a valid `Rgb<u8>` works. Swap in a seeded or fixed source to make
/// results reproducible.
pub trait ColorSource {
    /// Draws the next color.
    fn next_color(&mut self) -> Rgb<u8>;
}

/// Color source backed by a `rand` generator.
///
/// Each channel is drawn independently and uniformly from `0..=255`.
#[derive(Debug, Clone)]
pub struct RngColorSource<R> {
    rng: R,
}

impl<R: Rng> RngColorSource<R> {
    /// Wraps an existing generator.
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Returns the wrapped generator.
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl RngColorSource<StdRng> {
    /// Deterministic source for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl RngColorSource<rand::rngs::ThreadRng> {
    /// Source backed by the thread-local generator.
    pub fn thread_local() -> Self {
        Self::new(rand::rng())
    }
}

impl<R: Rng> ColorSource for RngColorSource<R> {
    fn next_color(&mut self) -> Rgb<u8> {
        Rgb([
            self.rng.random_range(0..=255),
            self.rng.random_range(0..=255),
            self.rng.random_range(0..=255),
        ])
    }
}

/// Color source that always returns the same color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedColorSource(pub Rgb<u8>);

impl ColorSource for FixedColorSource {
    fn next_color(&mut self) -> Rgb<u8> {
        self.0
    }
}

impl<C: ColorSource + ?Sized> ColorSource for &mut C {
    fn next_color(&mut self) -> Rgb<u8> {
        (**self).next_color()
    }
}
