use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: String,
    pub industry: String,
    pub location: String,
    pub founded_year: i32,
}

impl CompanyProfile {
    pub fn new(
        name: impl Into<String>,
        industry: impl Into<String>,
        location: impl Into<String>,
        founded_year: i32,
    ) -> Self {
        Self {
            name: name.into(),
            industry: industry.into(),
            location: location.into(),
            founded_year,
        }
    }
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: "New Company".to_string(),
            industry: "Software".to_string(),
            location: "Unknown".to_string(),
            founded_year: 2025,
        }
    }
}
