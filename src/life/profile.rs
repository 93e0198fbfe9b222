//! Player-chosen background for a simulated life
//!
//! All fields are opaque strings as far as the core is concerned; they are
//! forwarded to the generator verbatim and never validated here.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub country: String,
    pub education: String,
    pub personality: String,
    pub career: String,
    pub risk_tolerance: String,
}

impl Profile {
    pub fn new(
        country: impl Into<String>,
        education: impl Into<String>,
        personality: impl Into<String>,
        career: impl Into<String>,
        risk_tolerance: impl Into<String>,
    ) -> Self {
        Self {
            country: country.into(),
            education: education.into(),
            personality: personality.into(),
            career: career.into(),
            risk_tolerance: risk_tolerance.into(),
        }
    }
}
