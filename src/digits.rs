use std::fmt;

use thiserror::Error;

/// The first 500 fractional digits of pi, i.e. everything after "3.".
const PI_FRACTION: &str = concat!(
    "1415926535897932384626433832795028841971693993751058209749445923078164062862089986280348253421170679",
    "8214808651328230664709384460955058223172535940812848111745028410270193852110555964462294885493038196",
    "4428810975665933446128475648233786783165271201909145648566923460348610454326648213393607260249141273",
    "7245870066063155881748815209209628292540917153643678925903600113305305488204665213841469519415116094",
    "3305727036575959195309218611738193261179310511854807446237996274956735188575272489122793818301194912",
);

/// A single decimal digit, 0 through 9
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digit(u8);

impl Digit {
    pub fn value(self) -> u8 {
        self.0
    }

    pub fn as_char(self) -> char {
        char::from(b'0' + self.0)
    }
}

impl TryFrom<char> for Digit {
    type Error = InvalidDigit;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        c.to_digit(10)
            .map(|d| Digit(d as u8))
            .ok_or(InvalidDigit(c))
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("'{0}' is not a decimal digit")]
pub struct InvalidDigit(pub char);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("digit index {index} is out of range for a sequence of {len} digits")]
pub struct OutOfRange {
    pub index: usize,
    pub len: usize,
}

/// Fixed, ordered reference digits. Index 0 is the first digit after the
/// decimal point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PiSequence {
    digits: Vec<Digit>,
}

impl PiSequence {
    /// The built-in 500 digit sequence
    pub fn new() -> Self {
        let digits = PI_FRACTION.bytes().map(|b| Digit(b - b'0')).collect();
        Self { digits }
    }

    /// Build a sequence from an arbitrary run of decimal digits
    pub fn from_digits(s: &str) -> Result<Self, InvalidDigit> {
        let digits = s
            .chars()
            .map(Digit::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { digits })
    }

    pub fn digit_at(&self, index: usize) -> Result<Digit, OutOfRange> {
        self.digits.get(index).copied().ok_or(OutOfRange {
            index,
            len: self.digits.len(),
        })
    }

    /// Up to `count` digits starting at `start`, truncated at the end of the
    /// sequence.
    pub fn slice(&self, start: usize, count: usize) -> &[Digit] {
        if start >= self.digits.len() {
            return &[];
        }
        let end = start.saturating_add(count).min(self.digits.len());
        &self.digits[start..end]
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }
}

impl Default for PiSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a run of digits as a compact string, e.g. "14159"
pub fn digits_to_string(digits: &[Digit]) -> String {
    digits.iter().map(|d| d.as_char()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_sequence_has_500_digits() {
        let pi = PiSequence::new();
        assert_eq!(pi.len(), 500);
        assert!(!pi.is_empty());
    }

    #[test]
    fn index_zero_is_first_fractional_digit() {
        let pi = PiSequence::new();
        assert_eq!(pi.digit_at(0), Ok(Digit(1)));
        assert_eq!(pi.digit_at(1), Ok(Digit(4)));
        assert_eq!(digits_to_string(pi.slice(0, 10)), "1415926535");
        assert_eq!(pi.digit_at(499), Ok(Digit(2)));
    }

    #[test]
    fn digit_at_is_stable_across_calls() {
        let pi = PiSequence::new();
        for i in 0..pi.len() {
            assert_eq!(pi.digit_at(i), pi.digit_at(i));
        }
    }

    #[test]
    fn digit_at_out_of_range() {
        let pi = PiSequence::new();
        assert_eq!(pi.digit_at(500), Err(OutOfRange { index: 500, len: 500 }));
    }

    #[test]
    fn slice_truncates_at_end() {
        let pi = PiSequence::new();
        assert_eq!(pi.slice(497, 5).len(), 3);
        assert_eq!(pi.slice(495, 5).len(), 5);
        assert!(pi.slice(500, 5).is_empty());
        assert!(pi.slice(usize::MAX, usize::MAX).is_empty());
        assert_eq!(pi.slice(10, usize::MAX).len(), 490);
    }

    #[test]
    fn from_digits_rejects_non_digits() {
        assert_eq!(PiSequence::from_digits("14a"), Err(InvalidDigit('a')));
        let short = PiSequence::from_digits("141").unwrap();
        assert_eq!(short.len(), 3);
    }

    #[test]
    fn digit_from_char() {
        assert_eq!(Digit::try_from('7').map(Digit::value), Ok(7));
        assert_eq!(Digit::try_from('x'), Err(InvalidDigit('x')));
        assert_eq!(Digit::try_from('٣'), Err(InvalidDigit('٣')));
        assert_eq!(Digit(3).to_string(), "3");
        assert_eq!(Digit(0).as_char(), '0');
    }
}
