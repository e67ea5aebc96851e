/// Source of randomness for every randomized branch in the simulation.
///
/// Implemented for `fastrand::Rng` so a scene can run from a seed; tests
/// swap in [`Scripted`] to force a particular branch.
pub trait Random {
    /// Uniform value in `[0, 1)`.
    fn f32(&mut self) -> f32;

    /// Uniform value in `[min, max)`.
    fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.f32() as f64 * (max - min)
    }

    /// Fair coin flip.
    fn coin(&mut self) -> bool {
        self.f32() < 0.5
    }

    /// `1.0` or `-1.0` with equal probability.
    fn sign(&mut self) -> f64 {
        if self.coin() {
            1.0
        } else {
            -1.0
        }
    }

    /// Whole tick count in `[min, max]` (inclusive).
    fn ticks(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as f32;
        min + ((self.f32() * span) as u32).min(max - min)
    }

    /// Index into a slice of length `len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        ((self.f32() * len as f32) as usize).min(len.saturating_sub(1))
    }
}

impl Random for fastrand::Rng {
    fn f32(&mut self) -> f32 {
        fastrand::Rng::f32(self)
    }

    fn ticks(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        self.u32(min..=max)
    }

    fn index(&mut self, len: usize) -> usize {
        self.usize(..len.max(1))
    }
}

/// Replays a fixed sequence of values, then repeats `fallback` forever.
#[cfg(test)]
pub struct Scripted {
    values: std::collections::VecDeque<f32>,
    fallback: f32,
}

#[cfg(test)]
impl Scripted {
    pub fn new(values: &[f32], fallback: f32) -> Self {
        Self {
            values: values.iter().copied().collect(),
            fallback,
        }
    }

    /// Always returns `value`.
    pub fn constant(value: f32) -> Self {
        Self::new(&[], value)
    }
}

#[cfg(test)]
impl Random for Scripted {
    fn f32(&mut self) -> f32 {
        self.values.pop_front().unwrap_or(self.fallback)
    }
}
