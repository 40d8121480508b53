use crate::entities::classification::{BloodPressureCategory, BmiCategory, FALLBACK_COLOR};
use crate::entities::Reading;

/// Classify a blood pressure pair.
///
/// Tiers are checked in order and the first match wins. From tier 3 on,
/// either value alone is enough to land in a tier.
pub fn classify_blood_pressure(systolic: u16, diastolic: u16) -> BloodPressureCategory {
    if systolic < 90 || diastolic < 60 {
        BloodPressureCategory::Hypotension
    } else if systolic < 120 && diastolic < 80 {
        BloodPressureCategory::Normal
    } else if (120..130).contains(&systolic) || (80..85).contains(&diastolic) {
        BloodPressureCategory::PreHypertension
    } else if (130..140).contains(&systolic) || (85..90).contains(&diastolic) {
        BloodPressureCategory::HypertensionStage1
    } else if (140..180).contains(&systolic) || (90..120).contains(&diastolic) {
        BloodPressureCategory::HypertensionStage2
    } else {
        BloodPressureCategory::HypertensiveCrisis
    }
}

/// Classify a single stored reading
pub fn classify_reading(reading: &Reading) -> BloodPressureCategory {
    classify_blood_pressure(reading.systolic, reading.diastolic)
}

/// Check if a pressure pair classifies as a hypertensive crisis
pub fn is_hypertensive_crisis(systolic: u16, diastolic: u16) -> bool {
    classify_blood_pressure(systolic, diastolic) == BloodPressureCategory::HypertensiveCrisis
}

/// Body Mass Index: weight in kg over height in meters squared. Not rounded.
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Classify a Body Mass Index value
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::NormalWeight
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else if bmi < 35.0 {
        BmiCategory::ObesityClass1
    } else if bmi < 40.0 {
        BmiCategory::ObesityClass2
    } else {
        // Also catches non-finite values from a zero height
        BmiCategory::ObesityClass3
    }
}

/// Color for any classification label. Unknown labels get the fallback gray.
pub fn color_for_classification(label: &str) -> &'static str {
    if let Ok(category) = label.parse::<BloodPressureCategory>() {
        return category.color();
    }
    if let Ok(category) = label.parse::<BmiCategory>() {
        return category.color();
    }
    FALLBACK_COLOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bp_category_hypotension() {
        assert_eq!(classify_blood_pressure(89, 60), BloodPressureCategory::Hypotension);
        assert_eq!(classify_blood_pressure(110, 59), BloodPressureCategory::Hypotension);
        // Low diastolic wins even with a crisis-level systolic
        assert_eq!(classify_blood_pressure(200, 50), BloodPressureCategory::Hypotension);
    }

    #[test]
    fn test_bp_category_normal() {
        assert_eq!(classify_blood_pressure(90, 60), BloodPressureCategory::Normal);
        assert_eq!(classify_blood_pressure(119, 79), BloodPressureCategory::Normal);
    }

    #[test]
    fn test_bp_category_pre_hypertension() {
        // Systolic boundary
        assert_eq!(classify_blood_pressure(120, 79), BloodPressureCategory::PreHypertension);
        // Diastolic boundary
        assert_eq!(classify_blood_pressure(119, 80), BloodPressureCategory::PreHypertension);
        // Tier 3 matches before a higher diastolic is considered
        assert_eq!(classify_blood_pressure(125, 95), BloodPressureCategory::PreHypertension);
        assert_eq!(classify_blood_pressure(150, 84), BloodPressureCategory::PreHypertension);
    }

    #[test]
    fn test_bp_category_hypertension_stage1() {
        assert_eq!(classify_blood_pressure(130, 70), BloodPressureCategory::HypertensionStage1);
        assert_eq!(classify_blood_pressure(110, 85), BloodPressureCategory::HypertensionStage1);
        assert_eq!(classify_blood_pressure(139, 89), BloodPressureCategory::HypertensionStage1);
    }

    #[test]
    fn test_bp_category_hypertension_stage2() {
        assert_eq!(classify_blood_pressure(140, 70), BloodPressureCategory::HypertensionStage2);
        assert_eq!(classify_blood_pressure(115, 90), BloodPressureCategory::HypertensionStage2);
        assert_eq!(classify_blood_pressure(179, 119), BloodPressureCategory::HypertensionStage2);
        // A stage 2 diastolic keeps a crisis-level systolic in stage 2
        assert_eq!(classify_blood_pressure(185, 95), BloodPressureCategory::HypertensionStage2);
    }

    #[test]
    fn test_bp_category_crisis() {
        assert_eq!(classify_blood_pressure(180, 70), BloodPressureCategory::HypertensiveCrisis);
        assert_eq!(classify_blood_pressure(115, 120), BloodPressureCategory::HypertensiveCrisis);
        assert_eq!(classify_blood_pressure(180, 120), BloodPressureCategory::HypertensiveCrisis);
        assert!(is_hypertensive_crisis(200, 130));
        assert!(!is_hypertensive_crisis(120, 80));
    }

    #[test]
    fn test_bp_classification_is_total_and_stable() {
        for systolic in 50..=250u16 {
            for diastolic in 30..=150u16 {
                let first = classify_blood_pressure(systolic, diastolic);
                assert!(BloodPressureCategory::ALL.contains(&first));
                assert_eq!(first, classify_blood_pressure(systolic, diastolic));
            }
        }
    }

    #[test]
    fn test_bp_classification_matches_tier_rules() {
        for systolic in 50..=250u16 {
            for diastolic in 30..=150u16 {
                let expected = if systolic < 90 || diastolic < 60 {
                    BloodPressureCategory::Hypotension
                } else if systolic < 120 && diastolic < 80 {
                    BloodPressureCategory::Normal
                } else if (systolic >= 120 && systolic < 130) || (diastolic >= 80 && diastolic < 85) {
                    BloodPressureCategory::PreHypertension
                } else if (systolic >= 130 && systolic < 140) || (diastolic >= 85 && diastolic < 90) {
                    BloodPressureCategory::HypertensionStage1
                } else if (systolic >= 140 && systolic < 180) || (diastolic >= 90 && diastolic < 120) {
                    BloodPressureCategory::HypertensionStage2
                } else {
                    BloodPressureCategory::HypertensiveCrisis
                };
                assert_eq!(classify_blood_pressure(systolic, diastolic), expected, "({}, {})", systolic, diastolic);
            }
        }
    }

    #[test]
    fn test_calculate_bmi() {
        let bmi = calculate_bmi(70.0, 175.0);
        assert!((bmi - 22.857142857142858).abs() < 1e-9);

        // No rounding inside the calculation
        assert_ne!(bmi, (bmi * 10.0).round() / 10.0);
    }

    #[test]
    fn test_classify_bmi_boundaries() {
        assert_eq!(classify_bmi(18.49999), BmiCategory::Underweight);
        assert_eq!(classify_bmi(18.5), BmiCategory::NormalWeight);
        assert_eq!(classify_bmi(24.99), BmiCategory::NormalWeight);
        assert_eq!(classify_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(classify_bmi(30.0), BmiCategory::ObesityClass1);
        assert_eq!(classify_bmi(35.0), BmiCategory::ObesityClass2);
        assert_eq!(classify_bmi(39.99), BmiCategory::ObesityClass2);
        assert_eq!(classify_bmi(40.0), BmiCategory::ObesityClass3);
    }

    #[test]
    fn test_classify_bmi_zero_height() {
        let bmi = calculate_bmi(70.0, 0.0);
        assert!(bmi.is_infinite());
        assert_eq!(classify_bmi(bmi), BmiCategory::ObesityClass3);
    }

    #[test]
    fn test_classify_reading() {
        let reading = Reading {
            id: 1,
            person_id: 1,
            systolic: 135,
            diastolic: 82,
            heart_rate: 70,
            timestamp: chrono::Utc::now(),
            notes: None,
        };
        assert_eq!(classify_reading(&reading), BloodPressureCategory::PreHypertension);
    }

    #[test]
    fn test_color_for_classification() {
        assert_eq!(color_for_classification("Hypotension"), "#3498db");
        assert_eq!(color_for_classification("Normal"), "#2ecc71");
        assert_eq!(color_for_classification("Pre-Hypertension"), "#f39c12");
        assert_eq!(color_for_classification("Hypertension Stage 1"), "#e67e22");
        assert_eq!(color_for_classification("Hypertension Stage 2"), "#e74c3c");
        assert_eq!(color_for_classification("Hypertensive Crisis"), "#c0392b");
        assert_eq!(color_for_classification("Obesity Class II"), "#e74c3c");
        assert_eq!(color_for_classification("normal"), FALLBACK_COLOR);
        assert_eq!(color_for_classification(""), FALLBACK_COLOR);
    }

    #[test]
    fn test_every_category_has_distinct_color_within_its_table() {
        let bp: std::collections::HashSet<_> = BloodPressureCategory::ALL.iter().map(|c| c.color()).collect();
        let bmi: std::collections::HashSet<_> = BmiCategory::ALL.iter().map(|c| c.color()).collect();
        assert_eq!(bp.len(), 6);
        assert_eq!(bmi.len(), 6);
        assert!(!bp.contains(FALLBACK_COLOR));
    }

    #[test]
    fn test_labels_parse_back() {
        for category in BloodPressureCategory::ALL {
            assert_eq!(category.label().parse::<BloodPressureCategory>(), Ok(category));
        }
        for category in BmiCategory::ALL {
            assert_eq!(category.to_string().parse::<BmiCategory>(), Ok(category));
        }
        assert!("Elevated".parse::<BloodPressureCategory>().is_err());
    }
}
