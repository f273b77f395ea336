//! Postal address value object.

use serde::{Deserialize, Serialize};

/// A postal address used for warehouses and delivery destinations.
///
/// Equality is field-wise: two addresses are the same place only when every
/// field matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Address {
    pub country: String,
    pub city: String,
    pub street: String,
    #[serde(default)]
    pub house: String,
    #[serde(default)]
    pub flat: String,
}

impl Address {
    /// Creates an address from its parts.
    pub fn new(
        country: impl Into<String>,
        city: impl Into<String>,
        street: impl Into<String>,
        house: impl Into<String>,
        flat: impl Into<String>,
    ) -> Self {
        Self {
            country: country.into(),
            city: city.into(),
            street: street.into(),
            house: house.into(),
            flat: flat.into(),
        }
    }

    /// Creates an address whose every field is `marker`.
    ///
    /// Warehouses are addressed this way (`ADDRESS_1`, `ADDRESS_2`, ...).
    pub fn marker(marker: &str) -> Self {
        Self::new(marker, marker, marker, marker, marker)
    }

    /// Returns true if country, city and street all equal `marker`.
    pub fn is_marker(&self, marker: &str) -> bool {
        self.country == marker && self.city == marker && self.street == marker
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}, {}", self.country, self.city, self.street)?;
        if !self.house.is_empty() {
            write!(f, " {}", self.house)?;
        }
        if !self.flat.is_empty() {
            write!(f, "-{}", self.flat)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_address_matches_its_marker() {
        let address = Address::marker("ADDRESS_2");
        assert!(address.is_marker("ADDRESS_2"));
        assert!(!address.is_marker("ADDRESS_1"));
    }

    #[test]
    fn partial_marker_match_is_not_a_match() {
        let address = Address::new("ADDRESS_2", "ADDRESS_2", "Main st", "1", "");
        assert!(!address.is_marker("ADDRESS_2"));
    }

    #[test]
    fn equality_is_field_wise() {
        let a = Address::new("RU", "Moscow", "Tverskaya", "1", "10");
        let mut b = a.clone();
        assert_eq!(a, b);
        b.flat = "11".to_string();
        assert_ne!(a, b);
    }

    #[test]
    fn display() {
        let a = Address::new("RU", "Moscow", "Tverskaya", "1", "10");
        assert_eq!(a.to_string(), "RU, Moscow, Tverskaya 1-10");
    }
}
