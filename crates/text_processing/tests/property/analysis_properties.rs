use proptest::prelude::*;
use rectifai_core::ProviderKind;
use rectifai_text_processing::{
    assess, char_len, levenshtein_distance, ClassifierProfile, ConfidenceCalibration,
    RuleBasedCorrector,
};

fn any_provider() -> impl Strategy<Value = ProviderKind> {
    prop::sample::select(ProviderKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn distance_is_symmetric(a in "(?s).{0,60}", b in "(?s).{0,60}") {
        prop_assert_eq!(levenshtein_distance(&a, &b), levenshtein_distance(&b, &a));
    }

    #[test]
    fn distance_bounded_by_longer_input(a in "(?s).{0,60}", b in "(?s).{0,60}") {
        let distance = levenshtein_distance(&a, &b);
        let longer = char_len(&a).max(char_len(&b));
        let shorter = char_len(&a).min(char_len(&b));
        prop_assert!(distance <= longer, "{} > {}", distance, longer);
        prop_assert!(distance >= longer - shorter);
    }

    #[test]
    fn distance_to_self_is_zero(s in "(?s).{0,100}") {
        prop_assert_eq!(levenshtein_distance(&s, &s), 0);
    }

    #[test]
    fn classification_never_empty(
        kind in any_provider(),
        original in "(?s).{0,80}",
        corrected in "(?s).{0,80}",
    ) {
        let labels = ClassifierProfile::for_provider(kind).classify(&original, &corrected);
        prop_assert!(!labels.is_empty());
    }

    #[test]
    fn estimate_within_unit_interval(
        kind in any_provider(),
        original in "(?s).{0,80}",
        corrected in "(?s).{0,80}",
        label_count in 0usize..8,
    ) {
        let labels = vec!["label"; label_count];
        for calibration in [
            ConfidenceCalibration::for_provider(kind),
            ConfidenceCalibration::RULE_BASED,
        ] {
            let confidence = calibration.estimate(&original, &corrected, &labels);
            prop_assert!((0.0..=1.0).contains(&confidence), "{}", confidence);
        }
    }

    #[test]
    fn assessment_is_consistent(
        kind in any_provider(),
        original in "(?s).{0,80}",
        corrected in "(?s).{0,80}",
    ) {
        let result = assess(kind, &original, &corrected);
        prop_assert_eq!(&result.corrected, &corrected);
        prop_assert_eq!(result.changes.total, levenshtein_distance(&original, &corrected));
        prop_assert!(!result.changes.types.is_empty());
        prop_assert!((0.0..=1.0).contains(&result.confidence));
    }

    #[test]
    fn fallback_total_for_non_blank_input(
        input in "(?s).{1,150}",
        professional_tone in any::<bool>(),
    ) {
        prop_assume!(!input.trim().is_empty());

        let corrector = RuleBasedCorrector::new(professional_tone);
        let result = corrector.correct(&input);
        prop_assert!(result.is_ok());

        let result = result.unwrap();
        prop_assert!(!result.changes.types.is_empty());
        prop_assert!((0.0..=1.0).contains(&result.confidence));
        prop_assert_eq!(result.changes.total, levenshtein_distance(&input, &result.corrected));
    }

    #[test]
    fn fallback_rejects_blank_input(input in "[ \t\n\r]{0,20}") {
        prop_assert!(RuleBasedCorrector::default().correct(&input).is_err());
    }
}
