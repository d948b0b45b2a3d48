//! Bucketing and vocabulary mapping.
//!
//! Free-text inputs are compared after trimming and ASCII case folding, so
//! `" emergency "` and `"Emergency"` map the same way.

use caremart_model::{
    AgeGroup, CareCategory, EfficiencyCategory, EmergencyCategory, LabStatus, ResultCategory,
    UtilizationCategory, VisitLengthCategory,
};

fn folded(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty())
}

/// Pediatric below 18, Adult 18-64, Senior from 65.
pub fn age_group(age: i64) -> AgeGroup {
    match age {
        a if a < 18 => AgeGroup::Pediatric,
        18..=64 => AgeGroup::Adult,
        _ => AgeGroup::Senior,
    }
}

/// Short below 30 minutes, Standard 30-60, Extended above 60.
pub fn visit_length_category(duration_minutes: Option<i64>) -> Option<VisitLengthCategory> {
    duration_minutes.map(|minutes| match minutes {
        m if m < 30 => VisitLengthCategory::Short,
        30..=60 => VisitLengthCategory::Standard,
        _ => VisitLengthCategory::Extended,
    })
}

/// Map a visit type onto the care category vocabulary.
pub fn care_category(visit_type: Option<&str>) -> CareCategory {
    match folded(visit_type).as_deref() {
        Some("emergency" | "urgent care") => CareCategory::UrgentCare,
        Some(
            "routine checkup" | "annual physical" | "follow-up" | "consultation" | "routine",
        ) => CareCategory::RoutineCare,
        _ => CareCategory::Other,
    }
}

pub fn is_emergency_visit(visit_type: Option<&str>) -> bool {
    folded(visit_type).as_deref() == Some("emergency")
}

pub fn is_completed_status(visit_status: Option<&str>) -> bool {
    folded(visit_status).as_deref() == Some("completed")
}

pub fn is_cancelled_status(visit_status: Option<&str>) -> bool {
    matches!(
        folded(visit_status).as_deref(),
        Some("cancelled" | "canceled")
    )
}

/// Map a free-text result interpretation onto [`ResultCategory`].
pub fn interpret_result(interpretation: Option<&str>) -> ResultCategory {
    match folded(interpretation).as_deref() {
        Some("high" | "elevated" | "above normal") => ResultCategory::High,
        Some("low" | "decreased" | "below normal") => ResultCategory::Low,
        Some("normal" | "within normal limits" | "wnl" | "negative") => ResultCategory::Normal,
        Some("critical" | "critical high" | "critical low" | "panic") => ResultCategory::Critical,
        _ => ResultCategory::Unknown,
    }
}

/// High above 10 visits, Moderate 5-10, Low 1-4, otherwise No Visits.
pub fn utilization_category(total_visits: i64) -> UtilizationCategory {
    match total_visits {
        v if v > 10 => UtilizationCategory::HighUtilizer,
        5..=10 => UtilizationCategory::ModerateUtilizer,
        1..=4 => UtilizationCategory::LowUtilizer,
        _ => UtilizationCategory::NoVisits,
    }
}

pub fn lab_status(total_lab_tests: i64, abnormal_results: i64) -> LabStatus {
    if abnormal_results > 0 {
        LabStatus::HasAbnormalResults
    } else if total_lab_tests > 0 {
        LabStatus::AllNormalResults
    } else {
        LabStatus::NoLabTests
    }
}

/// Efficient below 30 minutes on average, Standard 30-60, Extended above 60.
pub fn efficiency_category(avg_duration_minutes: Option<f64>) -> Option<EfficiencyCategory> {
    avg_duration_minutes.map(|avg| {
        if avg < 30.0 {
            EfficiencyCategory::Efficient
        } else if avg <= 60.0 {
            EfficiencyCategory::Standard
        } else {
            EfficiencyCategory::Extended
        }
    })
}

/// High above 20%, Moderate 10-20%, anything else (including no data) Low.
pub fn emergency_category(emergency_percentage: Option<f64>) -> EmergencyCategory {
    match emergency_percentage {
        Some(pct) if pct > 20.0 => EmergencyCategory::HighEmergency,
        Some(pct) if pct >= 10.0 => EmergencyCategory::ModerateEmergency,
        _ => EmergencyCategory::LowEmergency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caremart_model::ResultStatus;
    use proptest::prelude::*;

    #[test]
    fn test_age_group_boundaries() {
        assert_eq!(age_group(-2), AgeGroup::Pediatric);
        assert_eq!(age_group(17), AgeGroup::Pediatric);
        assert_eq!(age_group(18), AgeGroup::Adult);
        assert_eq!(age_group(64), AgeGroup::Adult);
        assert_eq!(age_group(65), AgeGroup::Senior);
    }

    #[test]
    fn test_visit_length_boundaries() {
        assert_eq!(visit_length_category(None), None);
        assert_eq!(
            visit_length_category(Some(29)),
            Some(VisitLengthCategory::Short)
        );
        assert_eq!(
            visit_length_category(Some(30)),
            Some(VisitLengthCategory::Standard)
        );
        assert_eq!(
            visit_length_category(Some(60)),
            Some(VisitLengthCategory::Standard)
        );
        assert_eq!(
            visit_length_category(Some(61)),
            Some(VisitLengthCategory::Extended)
        );
    }

    #[test]
    fn test_care_category_mapping() {
        assert_eq!(care_category(Some("Emergency")), CareCategory::UrgentCare);
        assert_eq!(care_category(Some("urgent care")), CareCategory::UrgentCare);
        assert_eq!(care_category(Some("Follow-up")), CareCategory::RoutineCare);
        assert_eq!(care_category(Some(" Annual Physical ")), CareCategory::RoutineCare);
        assert_eq!(care_category(Some("Surgery")), CareCategory::Other);
        assert_eq!(care_category(None), CareCategory::Other);
    }

    #[test]
    fn test_visit_status_flags() {
        assert!(is_emergency_visit(Some("EMERGENCY")));
        assert!(!is_emergency_visit(Some("Urgent Care")));
        assert!(is_completed_status(Some("Completed")));
        assert!(is_cancelled_status(Some("Canceled")));
        assert!(!is_cancelled_status(None));
    }

    #[test]
    fn test_interpretation_vocabulary() {
        let cases = [
            ("Elevated", ResultCategory::High, ResultStatus::Abnormal),
            ("Below Normal", ResultCategory::Low, ResultStatus::Abnormal),
            ("WNL", ResultCategory::Normal, ResultStatus::Normal),
            ("Negative", ResultCategory::Normal, ResultStatus::Normal),
            ("Panic", ResultCategory::Critical, ResultStatus::Critical),
            ("see note", ResultCategory::Unknown, ResultStatus::Unknown),
        ];
        for (text, category, status) in cases {
            let mapped = interpret_result(Some(text));
            assert_eq!(mapped, category, "{text}");
            assert_eq!(mapped.status(), status, "{text}");
        }
        assert_eq!(interpret_result(None), ResultCategory::Unknown);
    }

    #[test]
    fn test_utilization_boundaries() {
        assert_eq!(utilization_category(0), UtilizationCategory::NoVisits);
        assert_eq!(utilization_category(1), UtilizationCategory::LowUtilizer);
        assert_eq!(utilization_category(4), UtilizationCategory::LowUtilizer);
        assert_eq!(utilization_category(5), UtilizationCategory::ModerateUtilizer);
        assert_eq!(utilization_category(10), UtilizationCategory::ModerateUtilizer);
        assert_eq!(utilization_category(11), UtilizationCategory::HighUtilizer);
    }

    #[test]
    fn test_lab_status() {
        assert_eq!(lab_status(3, 1), LabStatus::HasAbnormalResults);
        assert_eq!(lab_status(3, 0), LabStatus::AllNormalResults);
        assert_eq!(lab_status(0, 0), LabStatus::NoLabTests);
    }

    #[test]
    fn test_department_buckets() {
        assert_eq!(efficiency_category(None), None);
        assert_eq!(
            efficiency_category(Some(29.9)),
            Some(EfficiencyCategory::Efficient)
        );
        assert_eq!(
            efficiency_category(Some(60.0)),
            Some(EfficiencyCategory::Standard)
        );
        assert_eq!(emergency_category(None), EmergencyCategory::LowEmergency);
        assert_eq!(emergency_category(Some(10.0)), EmergencyCategory::ModerateEmergency);
        assert_eq!(emergency_category(Some(20.0)), EmergencyCategory::ModerateEmergency);
        assert_eq!(emergency_category(Some(20.01)), EmergencyCategory::HighEmergency);
        assert_eq!(emergency_category(Some(9.99)), EmergencyCategory::LowEmergency);
    }

    proptest! {
        #[test]
        fn age_group_matches_age(age in -10i64..130) {
            let group = age_group(age);
            let expected = if age < 18 {
                AgeGroup::Pediatric
            } else if age < 65 {
                AgeGroup::Adult
            } else {
                AgeGroup::Senior
            };
            prop_assert_eq!(group, expected);
        }
    }
}
