//! The two labelled samples under test.

/// A single non-negative integer observation, bounded by `2^63 - 1`.
///
/// The bound isn't cosmetic: [`crate::kernel::sort::encode`] packs a class
/// bit into the low bit of a `u64`, which only round-trips losslessly when
/// the observation fits in 63 bits.
pub type Observation = u64;

/// The largest observation this crate can encode (`2^63 - 1`).
pub const MAX_OBSERVATION: Observation = (1u64 << 63) - 1;

/// Two labelled samples, immutable for the duration of a run.
///
/// `a` holds class-A observations, `b` holds class-B observations. Combined
/// buffers built from a `Sample` place `a` first, `b` second, matching the
/// "first `m` belong to class A" convention from the data model.
#[derive(Debug, Clone)]
pub struct Sample {
    a: Vec<Observation>,
    b: Vec<Observation>,
}

impl Sample {
    /// Builds a sample, validating that every observation fits in 63 bits.
    pub fn new(a: Vec<Observation>, b: Vec<Observation>) -> anyhow::Result<Self> {
        for &x in a.iter().chain(b.iter()) {
            anyhow::ensure!(
                x <= MAX_OBSERVATION,
                "observation {x} exceeds the 2^63 - 1 bound"
            );
        }
        Ok(Self { a, b })
    }

    pub fn a(&self) -> &[Observation] {
        &self.a
    }

    pub fn b(&self) -> &[Observation] {
        &self.b
    }

    /// Size of class A.
    pub fn m(&self) -> usize {
        self.a.len()
    }

    /// Size of class B.
    pub fn n(&self) -> usize {
        self.b.len()
    }

    /// The combined `m + n` buffer, A observations first, B observations
    /// second — the layout every kernel primitive expects.
    pub fn combined(&self) -> Vec<Observation> {
        let mut buf = Vec::with_capacity(self.a.len() + self.b.len());
        buf.extend_from_slice(&self.a);
        buf.extend_from_slice(&self.b);
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_places_a_before_b() {
        let sample = Sample::new(vec![1, 2, 3], vec![4, 5]).unwrap();
        assert_eq!(sample.combined(), vec![1, 2, 3, 4, 5]);
        assert_eq!(sample.m(), 3);
        assert_eq!(sample.n(), 2);
    }

    #[test]
    fn rejects_observation_over_the_bound() {
        let err = Sample::new(vec![MAX_OBSERVATION + 1], vec![0]).unwrap_err();
        assert!(err.to_string().contains("2^63"));
    }

    #[test]
    fn accepts_the_bound_itself() {
        Sample::new(vec![MAX_OBSERVATION], vec![0]).unwrap();
    }
}
