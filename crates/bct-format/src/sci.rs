//! Fixed-width scientific notation (`[-]D.DDDDDDDe±EEE`).

use crate::{FormatError, Result};

/// What to do with NaN values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NanPolicy {
    /// Write NaN as `0.0`. Dry cells then read as zero water level.
    #[default]
    SubstituteZero,
    /// Fail with [`FormatError::NotANumber`].
    Reject,
}

/// Largest mantissa precision accepted by [`SciFormatter::new`].
pub const MAX_PRECISION: usize = 17;
/// Largest exponent width accepted by [`SciFormatter::new`].
pub const MAX_EXP_DIGITS: usize = 5;

/// Formats floats as a mantissa with a fixed number of decimals and a signed,
/// zero-padded exponent.
///
/// ```
/// use bct_format::SciFormatter;
///
/// let f = SciFormatter::default();
/// assert_eq!(f.format(1234.5).unwrap(), "1.2345000e+003");
/// assert_eq!(f.format(-0.02).unwrap(), "-2.0000000e-002");
/// assert_eq!(f.format_padded(20.0).unwrap(), " 2.0000000e+001");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SciFormatter {
    precision: usize,
    exp_digits: usize,
    nan_policy: NanPolicy,
}

impl Default for SciFormatter {
    fn default() -> Self {
        Self {
            precision: 7,
            exp_digits: 3,
            nan_policy: NanPolicy::SubstituteZero,
        }
    }
}

impl SciFormatter {
    /// Create a formatter; fails if either setting is out of range.
    pub fn new(precision: usize, exp_digits: usize, nan_policy: NanPolicy) -> Result<Self> {
        if precision > MAX_PRECISION {
            return Err(FormatError::InvalidFormatter(format!(
                "precision {} exceeds {}",
                precision, MAX_PRECISION
            )));
        }
        if exp_digits == 0 || exp_digits > MAX_EXP_DIGITS {
            return Err(FormatError::InvalidFormatter(format!(
                "exponent digits must be 1..={}, got {}",
                MAX_EXP_DIGITS, exp_digits
            )));
        }
        Ok(Self {
            precision,
            exp_digits,
            nan_policy,
        })
    }

    /// Same formatter with a different NaN policy.
    pub fn with_nan_policy(mut self, nan_policy: NanPolicy) -> Self {
        self.nan_policy = nan_policy;
        self
    }

    /// Digits after the decimal point of the mantissa.
    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Minimum number of exponent digits.
    pub fn exp_digits(&self) -> usize {
        self.exp_digits
    }

    /// How NaN inputs are handled.
    pub fn nan_policy(&self) -> NanPolicy {
        self.nan_policy
    }

    /// Format one value.
    ///
    /// Exponents that need more than `exp_digits` digits are written in full.
    pub fn format(&self, value: f64) -> Result<String> {
        let value = if value.is_nan() {
            match self.nan_policy {
                NanPolicy::SubstituteZero => 0.0,
                NanPolicy::Reject => return Err(FormatError::NotANumber),
            }
        } else {
            value
        };
        if value.is_infinite() {
            return Err(FormatError::NonFinite(value));
        }

        // Rust renders `1.2345000e3`; rebuild the exponent signed and padded
        let raw = format!("{:.*e}", self.precision, value);
        let (mantissa, exponent) = raw
            .split_once('e')
            .ok_or(FormatError::NonFinite(value))?;
        let exponent: i32 = exponent
            .parse()
            .map_err(|_| FormatError::NonFinite(value))?;

        Ok(format!(
            "{}e{:+0width$}",
            mantissa,
            exponent,
            width = self.exp_digits + 1
        ))
    }

    /// [`format`](Self::format) followed by [`pad_positive`].
    pub fn format_padded(&self, value: f64) -> Result<String> {
        self.format(value).map(|s| pad_positive(&s))
    }
}

/// Prefix a space unless the text starts with `-`, so that signed and
/// unsigned values line up in columns.
pub fn pad_positive(text: &str) -> String {
    if text.starts_with('-') {
        text.to_string()
    } else {
        format!(" {}", text)
    }
}
