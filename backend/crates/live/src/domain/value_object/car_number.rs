use serde::{Deserialize, Serialize};
use std::fmt;

/// Permanent race number, 1..=99
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct CarNumber(u8);

impl CarNumber {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 99;

    #[inline]
    pub fn new(number: u32) -> Option<Self> {
        (Self::MIN..=Self::MAX)
            .contains(&number)
            .then_some(Self(number as u8))
    }

    #[inline]
    pub const fn get(&self) -> u32 {
        self.0 as u32
    }
}

impl TryFrom<u32> for CarNumber {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("car number out of range: {value}"))
    }
}

impl From<CarNumber> for u32 {
    fn from(car: CarNumber) -> Self {
        car.get()
    }
}

impl fmt::Display for CarNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range() {
        assert!(CarNumber::new(0).is_none());
        assert_eq!(CarNumber::new(1).map(|c| c.get()), Some(1));
        assert_eq!(CarNumber::new(99).map(|c| c.get()), Some(99));
        assert!(CarNumber::new(100).is_none());
    }

    #[test]
    fn test_serde_as_plain_number() {
        let car = CarNumber::new(44).unwrap();
        assert_eq!(serde_json::to_string(&car).unwrap(), "44");
        assert!(serde_json::from_str::<CarNumber>("0").is_err());
    }
}
