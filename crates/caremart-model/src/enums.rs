//! Derived-value vocabularies.
//!
//! Every categorical column produced by the staging and mart layers is backed
//! by one of these enums. The string returned by `as_str` is what consumers
//! (dashboards, reports) read, so the spelling is part of the output contract.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Patient age bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    /// Under 18 years.
    Pediatric,
    /// 18 through 64 years.
    Adult,
    /// 65 years and older.
    Senior,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 3] = [AgeGroup::Pediatric, AgeGroup::Adult, AgeGroup::Senior];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Pediatric => "Pediatric",
            AgeGroup::Adult => "Adult",
            AgeGroup::Senior => "Senior",
        }
    }
}

/// Care category derived from the visit type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CareCategory {
    #[serde(rename = "Urgent Care")]
    UrgentCare,
    #[serde(rename = "Routine Care")]
    RoutineCare,
    Other,
}

impl CareCategory {
    pub const ALL: [CareCategory; 3] = [
        CareCategory::UrgentCare,
        CareCategory::RoutineCare,
        CareCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CareCategory::UrgentCare => "Urgent Care",
            CareCategory::RoutineCare => "Routine Care",
            CareCategory::Other => "Other",
        }
    }
}

/// Visit duration bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisitLengthCategory {
    /// Under 30 minutes.
    Short,
    /// 30 through 60 minutes.
    Standard,
    /// Over 60 minutes.
    Extended,
}

impl VisitLengthCategory {
    pub const ALL: [VisitLengthCategory; 3] = [
        VisitLengthCategory::Short,
        VisitLengthCategory::Standard,
        VisitLengthCategory::Extended,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VisitLengthCategory::Short => "Short",
            VisitLengthCategory::Standard => "Standard",
            VisitLengthCategory::Extended => "Extended",
        }
    }
}

/// Lab result category mapped from the free-text interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultCategory {
    High,
    Low,
    Normal,
    Critical,
    Unknown,
}

impl ResultCategory {
    pub const ALL: [ResultCategory; 5] = [
        ResultCategory::High,
        ResultCategory::Low,
        ResultCategory::Normal,
        ResultCategory::Critical,
        ResultCategory::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResultCategory::High => "High",
            ResultCategory::Low => "Low",
            ResultCategory::Normal => "Normal",
            ResultCategory::Critical => "Critical",
            ResultCategory::Unknown => "Unknown",
        }
    }

    /// Collapse the category into the coarser status vocabulary.
    pub fn status(&self) -> ResultStatus {
        match self {
            ResultCategory::High | ResultCategory::Low => ResultStatus::Abnormal,
            ResultCategory::Critical => ResultStatus::Critical,
            ResultCategory::Normal => ResultStatus::Normal,
            ResultCategory::Unknown => ResultStatus::Unknown,
        }
    }
}

/// Coarse lab result status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultStatus {
    Abnormal,
    Critical,
    Normal,
    Unknown,
}

impl ResultStatus {
    pub const ALL: [ResultStatus; 4] = [
        ResultStatus::Abnormal,
        ResultStatus::Critical,
        ResultStatus::Normal,
        ResultStatus::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResultStatus::Abnormal => "Abnormal",
            ResultStatus::Critical => "Critical",
            ResultStatus::Normal => "Normal",
            ResultStatus::Unknown => "Unknown",
        }
    }
}

/// Patient visit-frequency bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UtilizationCategory {
    #[serde(rename = "High Utilizer")]
    HighUtilizer,
    #[serde(rename = "Moderate Utilizer")]
    ModerateUtilizer,
    #[serde(rename = "Low Utilizer")]
    LowUtilizer,
    #[serde(rename = "No Visits")]
    NoVisits,
}

impl UtilizationCategory {
    pub const ALL: [UtilizationCategory; 4] = [
        UtilizationCategory::HighUtilizer,
        UtilizationCategory::ModerateUtilizer,
        UtilizationCategory::LowUtilizer,
        UtilizationCategory::NoVisits,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UtilizationCategory::HighUtilizer => "High Utilizer",
            UtilizationCategory::ModerateUtilizer => "Moderate Utilizer",
            UtilizationCategory::LowUtilizer => "Low Utilizer",
            UtilizationCategory::NoVisits => "No Visits",
        }
    }
}

/// Patient-level lab outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabStatus {
    #[serde(rename = "Has Abnormal Results")]
    HasAbnormalResults,
    #[serde(rename = "All Normal Results")]
    AllNormalResults,
    #[serde(rename = "No Lab Tests")]
    NoLabTests,
}

impl LabStatus {
    pub const ALL: [LabStatus; 3] = [
        LabStatus::HasAbnormalResults,
        LabStatus::AllNormalResults,
        LabStatus::NoLabTests,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LabStatus::HasAbnormalResults => "Has Abnormal Results",
            LabStatus::AllNormalResults => "All Normal Results",
            LabStatus::NoLabTests => "No Lab Tests",
        }
    }
}

/// Department efficiency bucket from the average visit duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EfficiencyCategory {
    Efficient,
    Standard,
    Extended,
}

impl EfficiencyCategory {
    pub const ALL: [EfficiencyCategory; 3] = [
        EfficiencyCategory::Efficient,
        EfficiencyCategory::Standard,
        EfficiencyCategory::Extended,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EfficiencyCategory::Efficient => "Efficient",
            EfficiencyCategory::Standard => "Standard",
            EfficiencyCategory::Extended => "Extended",
        }
    }
}

/// Department emergency load bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmergencyCategory {
    #[serde(rename = "High Emergency")]
    HighEmergency,
    #[serde(rename = "Moderate Emergency")]
    ModerateEmergency,
    #[serde(rename = "Low Emergency")]
    LowEmergency,
}

impl EmergencyCategory {
    pub const ALL: [EmergencyCategory; 3] = [
        EmergencyCategory::HighEmergency,
        EmergencyCategory::ModerateEmergency,
        EmergencyCategory::LowEmergency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmergencyCategory::HighEmergency => "High Emergency",
            EmergencyCategory::ModerateEmergency => "Moderate Emergency",
            EmergencyCategory::LowEmergency => "Low Emergency",
        }
    }
}

macro_rules! impl_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

impl_display!(
    AgeGroup,
    CareCategory,
    VisitLengthCategory,
    ResultCategory,
    ResultStatus,
    UtilizationCategory,
    LabStatus,
    EfficiencyCategory,
    EmergencyCategory,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_names_match_display() {
        let json = serde_json::to_string(&UtilizationCategory::HighUtilizer).unwrap();
        assert_eq!(json, "\"High Utilizer\"");
        let json = serde_json::to_string(&LabStatus::NoLabTests).unwrap();
        assert_eq!(json, "\"No Lab Tests\"");
        assert_eq!(EmergencyCategory::LowEmergency.to_string(), "Low Emergency");
    }

    #[test]
    fn category_collapses_to_status() {
        assert_eq!(ResultCategory::High.status(), ResultStatus::Abnormal);
        assert_eq!(ResultCategory::Low.status(), ResultStatus::Abnormal);
        assert_eq!(ResultCategory::Critical.status(), ResultStatus::Critical);
        assert_eq!(ResultCategory::Normal.status(), ResultStatus::Normal);
        assert_eq!(ResultCategory::Unknown.status(), ResultStatus::Unknown);
    }
}
