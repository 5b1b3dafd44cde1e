//! Crop prediction pipeline tests
//!
//! Tests for the prediction service including:
//! - Outcome classification of well-formed, malformed and unrealistic input
//! - Feature order and transform order through the pipeline
//! - Repeatability of predictions

use proptest::prelude::*;
use shared::{
    Classifier, Crop, Feature, FeatureVector, PredictionOutcome, PredictionService, Transformer,
    FEATURE_COUNT, INVALID_FORMAT_MESSAGE, INVALID_RANGE_MESSAGE, VALIDATION_RANGES,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ============================================================================
// Test Doubles
// ============================================================================

/// One pipeline call, in the order it happened
#[derive(Debug, Clone, PartialEq)]
enum Call {
    MinMax(FeatureVector),
    Standard(FeatureVector),
    Classify(FeatureVector),
}

#[derive(Debug, Clone, Default)]
struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }
}

/// Adds a stage-specific offset so each stage leaves a visible mark
struct RecordingMinMax(CallLog);

impl Transformer for RecordingMinMax {
    fn transform(&self, features: &FeatureVector) -> FeatureVector {
        self.0.push(Call::MinMax(*features));
        features.map_indexed(|_, x| x + 1000.0)
    }
}

struct RecordingStandard(CallLog);

impl Transformer for RecordingStandard {
    fn transform(&self, features: &FeatureVector) -> FeatureVector {
        self.0.push(Call::Standard(*features));
        features.map_indexed(|_, x| x * 2.0)
    }
}

struct RecordingClassifier {
    log: CallLog,
    class_id: i64,
}

impl Classifier for RecordingClassifier {
    fn predict(&self, features: &FeatureVector) -> i64 {
        self.log.push(Call::Classify(*features));
        self.class_id
    }
}

struct Identity;

impl Transformer for Identity {
    fn transform(&self, features: &FeatureVector) -> FeatureVector {
        *features
    }
}

/// Deterministic classifier that always lands inside the catalog
struct CatalogHash;

impl Classifier for CatalogHash {
    fn predict(&self, features: &FeatureVector) -> i64 {
        let sum: f64 = features.iter().map(|x| x.abs()).sum();
        (sum.floor() as i64).rem_euclid(22) + 1
    }
}

/// Always answers the same class id
struct Fixed(i64);

impl Classifier for Fixed {
    fn predict(&self, _features: &FeatureVector) -> i64 {
        self.0
    }
}

fn recording_service(class_id: i64) -> (PredictionService, CallLog) {
    let log = CallLog::default();
    let service = PredictionService::new(
        RecordingMinMax(log.clone()),
        RecordingStandard(log.clone()),
        RecordingClassifier {
            log: log.clone(),
            class_id,
        },
    );
    (service, log)
}

fn catalog_service() -> PredictionService {
    PredictionService::new(Identity, Identity, CatalogHash)
}

// ============================================================================
// Form Helpers
// ============================================================================

fn form(values: [&str; FEATURE_COUNT]) -> HashMap<String, String> {
    Feature::ALL
        .iter()
        .zip(values)
        .map(|(feature, value)| (feature.field_name().to_string(), value.to_string()))
        .collect()
}

fn numeric_form(values: [f64; FEATURE_COUNT]) -> HashMap<String, String> {
    Feature::ALL
        .iter()
        .zip(values)
        .map(|(feature, value)| (feature.field_name().to_string(), value.to_string()))
        .collect()
}

const TYPICAL_READING: [f64; FEATURE_COUNT] = [90.0, 42.0, 43.0, 20.9, 82.0, 6.5, 202.9];

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Realistic reading yields a crop from the catalog
    #[test]
    fn test_typical_reading_succeeds() {
        let outcome = catalog_service().predict(&form(["90", "42", "43", "20.9", "82.0", "6.5", "202.9"]));
        let crop = outcome.crop().expect("expected a crop");
        assert!(Crop::ALL.contains(&crop));
    }

    /// Temperature of 100 is rejected as unrealistic
    #[test]
    fn test_hot_reading_is_invalid_range() {
        let outcome = catalog_service().predict(&form(["10", "10", "10", "100", "50", "6", "100"]));
        assert_eq!(outcome, PredictionOutcome::invalid_range());
        assert_eq!(outcome.message(), INVALID_RANGE_MESSAGE);
    }

    /// Non-numeric phosphorus is a format error
    #[test]
    fn test_text_reading_is_invalid_format() {
        let outcome = catalog_service().predict(&form(["10", "abc", "10", "25", "50", "6", "100"]));
        assert_eq!(outcome, PredictionOutcome::invalid_format());
        assert_eq!(outcome.message(), INVALID_FORMAT_MESSAGE);
    }

    /// Class id without a catalog entry is reported, not dropped
    #[test]
    fn test_unmapped_class_is_unknown() {
        let service = PredictionService::new(Identity, Identity, Fixed(99));
        let outcome = service.predict(&numeric_form(TYPICAL_READING));
        assert_eq!(outcome, PredictionOutcome::UnknownClass { class_id: 99 });
    }

    #[test]
    fn test_fixed_classifier_maps_to_catalog_name() {
        let service = PredictionService::new(Identity, Identity, Fixed(22));
        let outcome = service.predict(&numeric_form(TYPICAL_READING));
        assert_eq!(outcome.message(), "Coffee is the best crop to be cultivated right there.");
    }

    /// Vector handed to min-max scaling is [N, P, K, temp, humidity, pH, rainfall]
    #[test]
    fn test_min_max_receives_fields_in_order() {
        let (service, log) = recording_service(1);
        service.predict(&form(["1", "2", "3", "4", "5", "6", "7"]));

        let calls = log.calls();
        assert_eq!(
            calls[0],
            Call::MinMax(FeatureVector::new([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]))
        );
    }

    /// Min-max output feeds standard scaling, whose output feeds the classifier
    #[test]
    fn test_stages_run_min_max_then_standard_then_classify() {
        let (service, log) = recording_service(1);
        service.predict(&numeric_form(TYPICAL_READING));

        let input = FeatureVector::new(TYPICAL_READING);
        let after_min_max = input.map_indexed(|_, x| x + 1000.0);
        let after_standard = after_min_max.map_indexed(|_, x| x * 2.0);
        assert_eq!(
            log.calls(),
            vec![
                Call::MinMax(input),
                Call::Standard(after_min_max),
                Call::Classify(after_standard),
            ]
        );
    }

    #[test]
    fn test_rejected_input_never_reaches_the_pipeline() {
        let (service, log) = recording_service(1);
        service.predict(&form(["10", "abc", "10", "25", "50", "6", "100"]));
        service.predict(&form(["10", "10", "10", "100", "50", "6", "100"]));
        assert!(log.calls().is_empty());
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let service = catalog_service();
        for (index, value) in [(3, -50.0), (3, 60.0), (4, 0.0), (4, 100.0), (5, 0.0), (5, 14.0)] {
            let mut values = TYPICAL_READING;
            values[index] = value;
            assert!(
                service.predict(&numeric_form(values)).is_success(),
                "{} = {} should be accepted",
                Feature::ALL[index],
                value
            );
        }
    }

    #[test]
    fn test_just_outside_boundaries_is_rejected() {
        let service = catalog_service();
        for (index, value) in [
            (3, -50.0001),
            (3, 60.0001),
            (4, -0.0001),
            (4, 100.0001),
            (5, -0.0001),
            (5, 14.0001),
        ] {
            let mut values = TYPICAL_READING;
            values[index] = value;
            assert_eq!(
                service.predict(&numeric_form(values)),
                PredictionOutcome::invalid_range(),
                "{} = {} should be rejected",
                Feature::ALL[index],
                value
            );
        }
    }

    #[test]
    fn test_field_names_are_case_sensitive() {
        let mut fields = numeric_form(TYPICAL_READING);
        let value = fields.remove("pH").unwrap();
        fields.insert("PH".to_string(), value);
        assert_eq!(catalog_service().predict(&fields), PredictionOutcome::invalid_format());
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let mut fields = numeric_form(TYPICAL_READING);
        fields.insert("Comment".to_string(), "north paddock".to_string());
        assert!(catalog_service().predict(&fields).is_success());
    }

    fn with_field(name: &str, raw: &str) -> HashMap<String, String> {
        let mut fields = numeric_form(TYPICAL_READING);
        fields.insert(name.to_string(), raw.to_string());
        fields
    }

    #[test]
    fn test_nan_is_invalid_format() {
        for name in ["Nitrogen", "Temperature", "Rainfall"] {
            let fields = with_field(name, "NaN");
            assert_eq!(catalog_service().predict(&fields), PredictionOutcome::invalid_format());
        }
    }

    #[test]
    fn test_infinity_on_unbounded_feature_is_invalid_format() {
        let fields = with_field("Nitrogen", "inf");
        assert_eq!(catalog_service().predict(&fields), PredictionOutcome::invalid_format());
    }

    #[test]
    fn test_infinity_past_a_bound_is_invalid_range() {
        for (name, raw) in [("Nitrogen", "-inf"), ("Temperature", "+inf"), ("pH", "infinity")] {
            let fields = with_field(name, raw);
            assert_eq!(
                catalog_service().predict(&fields),
                PredictionOutcome::invalid_range(),
                "{name}={raw}"
            );
        }
    }

    #[test]
    fn test_nan_does_not_hide_a_range_error() {
        let mut fields = with_field("Nitrogen", "nan");
        fields.insert("Humidity".to_string(), "120".to_string());
        assert_eq!(catalog_service().predict(&fields), PredictionOutcome::invalid_range());
    }

    #[test]
    fn test_digit_separators_are_accepted() {
        let fields = with_field("Nitrogen", "1_000");
        assert!(catalog_service().predict(&fields).is_success());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating readings inside every realistic range
    fn valid_reading_strategy() -> impl Strategy<Value = [f64; FEATURE_COUNT]> {
        (
            0.0f64..=500.0,
            0.0f64..=500.0,
            0.0f64..=500.0,
            -50.0f64..=60.0,
            0.0f64..=100.0,
            0.0f64..=14.0,
            0.0f64..=5000.0,
        )
            .prop_map(|(n, p, k, temp, humidity, ph, rainfall)| {
                [n, p, k, temp, humidity, ph, rainfall]
            })
    }

    /// Strategy for pushing one field outside its range
    fn invalid_reading_strategy() -> impl Strategy<Value = [f64; FEATURE_COUNT]> {
        (
            valid_reading_strategy(),
            0usize..FEATURE_COUNT,
            0.001f64..=1000.0,
            any::<bool>(),
        )
            .prop_map(|(mut values, index, delta, above)| {
                let range = VALIDATION_RANGES[index];
                values[index] = match (above, range.max) {
                    (true, Some(max)) => max + delta,
                    _ => range.min - delta,
                };
                values
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Readings inside every range always produce a catalog crop
        #[test]
        fn prop_valid_reading_succeeds(values in valid_reading_strategy()) {
            let outcome = catalog_service().predict(&numeric_form(values));
            prop_assert!(outcome.is_success(), "unexpected outcome {:?}", outcome);
        }

        /// Any field outside its range yields the range outcome
        #[test]
        fn prop_out_of_range_reading_rejected(values in invalid_reading_strategy()) {
            let outcome = catalog_service().predict(&numeric_form(values));
            prop_assert_eq!(outcome, PredictionOutcome::invalid_range());
        }

        /// A non-numeric field yields the format outcome, whatever the others hold
        #[test]
        fn prop_non_numeric_field_rejected(
            values in prop_oneof![valid_reading_strategy(), invalid_reading_strategy()],
            index in 0usize..FEATURE_COUNT,
            text in "[a-zA-Z ,;]{1,10}"
        ) {
            prop_assume!(text.trim().parse::<f64>().is_err());
            let mut fields = numeric_form(values);
            fields.insert(Feature::ALL[index].field_name().to_string(), text);
            prop_assert_eq!(catalog_service().predict(&fields), PredictionOutcome::invalid_format());
        }

        /// A missing field yields the format outcome
        #[test]
        fn prop_missing_field_rejected(
            values in valid_reading_strategy(),
            index in 0usize..FEATURE_COUNT
        ) {
            let mut fields = numeric_form(values);
            fields.remove(Feature::ALL[index].field_name());
            prop_assert_eq!(catalog_service().predict(&fields), PredictionOutcome::invalid_format());
        }

        /// Same input, same output
        #[test]
        fn prop_prediction_is_repeatable(values in valid_reading_strategy()) {
            let service = catalog_service();
            let fields = numeric_form(values);
            prop_assert_eq!(service.predict(&fields), service.predict(&fields));
        }

        /// Min-max always runs first and sees the submitted order
        #[test]
        fn prop_pipeline_order_holds(values in valid_reading_strategy()) {
            let (service, log) = recording_service(5);
            service.predict(&numeric_form(values));
            let calls = log.calls();
            prop_assert_eq!(calls.len(), 3);
            prop_assert_eq!(&calls[0], &Call::MinMax(FeatureVector::new(values)));
            prop_assert!(matches!(calls[1], Call::Standard(_)));
            prop_assert!(matches!(calls[2], Call::Classify(_)));
        }
    }
}
