use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The memory weight exceeds the fixed point scale.
    #[error("numerator exceeds the fixed point scale")]
    InvalidCoefficient,
}

/// One-pole lowpass filter in 32 bit fixed point arithmetic.
///
/// This is a first order IIR smoothing stage computing the weighted average
/// of the previous output and the new input sample,
/// `y = (y1*k + x*(2^d - k)) / 2^d`, with the memory weight `k = numerator`
/// in units of the scale `2^d = 1 << denominator`. It is the integer
/// equivalent of an exponentially weighted moving average and is intended for
/// noise reduction on quantized data (ADC readings, timer captures) on
/// targets without an FPU.
///
/// The divisions are arithmetic right shifts, i.e. floor divisions by the
/// scale. Quantization therefore truncates toward negative infinity, not
/// toward zero, and the steady state output can rest up to one code below
/// the exact average. This is the conventional fixed point behavior and it
/// is deterministic and bit-exact across targets.
///
/// All math is wrapping 32 bit integer. The products `y1*k` and `x*(2^d - k)`
/// are only meaningful while they stay within the i32 range; keeping sample
/// magnitude and scale small enough for that is the caller's responsibility.
#[derive(Copy, Clone, Default, Debug, Deserialize, Serialize)]
pub struct OnePoleFilter {
    // last output sample
    previous: i32,
    // weight of the last output, in units of 1 << denominator
    numerator: i32,
    // log2 of the fixed point scale
    denominator: i32,
}

impl OnePoleFilter {
    /// Create a filter with the given memory weight.
    ///
    /// Args:
    /// * `numerator`: Weight of the previous output, `numerator <= 1 << denominator`.
    ///   `0` disables the memory entirely, `1 << denominator` freezes the output.
    /// * `denominator`: Fixed point scale exponent, small and non-negative
    ///   (at most 30 so that the scale itself fits i32).
    ///
    /// Returns:
    /// The filter with cleared state, or [`Error::InvalidCoefficient`] if the
    /// weight exceeds the scale.
    pub fn new(numerator: i32, denominator: i32) -> Result<Self, Error> {
        let mut filter = Self::default();
        filter.set_ratio(numerator, denominator)?;
        Ok(filter)
    }

    /// Replace the coefficients, keeping the filter memory.
    ///
    /// The validity check is the same as in [`OnePoleFilter::new`]. On error
    /// the filter is left untouched.
    pub fn set_ratio(
        &mut self,
        numerator: i32,
        denominator: i32,
    ) -> Result<(), Error> {
        debug_assert!((0..=30).contains(&denominator));
        if numerator > 1i32 << denominator {
            return Err(Error::InvalidCoefficient);
        }
        self.numerator = numerator;
        self.denominator = denominator;
        Ok(())
    }

    /// Update the filter with a new sample.
    ///
    /// Args:
    /// * `x`: New input sample.
    ///
    /// Returns:
    /// The new output sample, also stored as the filter memory for the next
    /// update.
    pub fn update(&mut self, x: i32) -> i32 {
        let ratio1 = self.numerator;
        let ratio2 = (1i32 << self.denominator) - ratio1;
        let y = (self.previous.wrapping_mul(ratio1) >> self.denominator)
            .wrapping_add(x.wrapping_mul(ratio2) >> self.denominator);
        self.previous = y;
        y
    }

    /// Clear the filter memory without touching the coefficients.
    pub fn reset(&mut self) {
        self.previous = 0;
    }

    /// The last output sample.
    pub fn output(&self) -> i32 {
        self.previous
    }

    /// The coefficients as given, `(numerator, denominator)`.
    pub fn ratio(&self) -> (i32, i32) {
        (self.numerator, self.denominator)
    }
}
