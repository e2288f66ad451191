// End-to-end scenario tests for the signal pipeline
//
// Each test feeds a raw transcript through SignalPipeline::extract and checks
// the externally visible ExtractedSignals.

use storyscan_extract::types::{Category, UrgencyLevel};
use storyscan_extract::{SignalPipeline, TranscriptInput};

fn extract(text: &str) -> storyscan_extract::ExtractedSignals {
    SignalPipeline::default().extract(&TranscriptInput::new(text))
}

#[test]
fn introduction_and_rent_request() {
    let signals = extract("Hi, my name is Sarah Johnson. I need help with rent money.");

    assert_eq!(signals.name_candidate.as_deref(), Some("Sarah Johnson"));
    assert!(signals.name_confidence > 0.7, "name confidence {}", signals.name_confidence);
    assert!(signals
        .needs_categories
        .iter()
        .any(|c| c.category == Category::Housing));
    assert_eq!(signals.primary_category, Some(Category::Housing));
}

#[test]
fn empty_transcript_is_maximally_uncertain() {
    let signals = extract("");

    assert_eq!(signals.name_candidate, None);
    assert!(signals.contact_candidates.emails.is_empty());
    assert!(signals.contact_candidates.phones.is_empty());
    assert!(signals.location_candidates.is_empty());
    assert!(signals.needs_categories.is_empty());
    assert_eq!(signals.goal_amount, None);
    assert!(!signals.missing_fields.is_empty());
    assert_eq!(signals.normalization.incompleteness_penalty, 1.0);
    assert_eq!(signals.missing_fields, signals.data_validation.missing_fields);
}

#[test]
fn phone_formats_collapse_to_one_number() {
    let signals = extract("Call me at 5551234567 or (555) 123-4567 or 555-123-4567");
    assert_eq!(signals.contact_candidates.phones, vec!["(555) 123-4567"]);
}

#[test]
fn safety_with_low_urgency_is_promoted() {
    let signals =
        extract("My husband is abusive and he made a threat against me. It's not urgent, no rush.");

    assert_eq!(signals.primary_category, Some(Category::Safety));
    assert!(signals.urgency_level >= UrgencyLevel::High);
    assert!(signals
        .coordination
        .adjustments
        .iter()
        .any(|a| a.starts_with("urgencyLevel: LOW -> HIGH")));
    assert!(signals.urgency_score >= UrgencyLevel::High.floor_score());
}

#[test]
fn spelled_amount_resolves() {
    let signals = extract("I need fifteen hundred dollars to fix my car");
    assert_eq!(signals.goal_amount, Some(1500.0));
}

#[test]
fn noisy_transcript_full_profile() {
    let text = "Um, hi, my name is... Maria Lopez. I live in Austin, TX. \
                I was laid off last month and I can't pay my rent, uh, the landlord says \
                we'll be evicted by friday. We need about $2,400. \
                You can email me at maria.lopez@example.com.";
    let signals = extract(text);

    assert_eq!(signals.name_candidate.as_deref(), Some("Maria Lopez"));
    assert_eq!(signals.location_candidates, vec!["Austin, TX"]);
    assert_eq!(signals.contact_candidates.emails, vec!["maria.lopez@example.com"]);
    assert_eq!(signals.goal_amount, Some(2400.0));
    // job loss plus "can't pay" outranks the housing keywords
    assert_eq!(signals.primary_category, Some(Category::Employment));
    assert!(signals
        .needs_categories
        .iter()
        .any(|c| c.category == Category::Housing));
    assert!(!signals.key_points.is_empty());
    assert!(signals.key_points.len() <= 7);
    assert!(!signals.missing_fields.contains(&"contact".to_string()));
    assert!(!signals.missing_fields.contains(&"name".to_string()));
    assert!(signals.normalization.removed_fillers.contains(&"um".to_string()));
}

#[test]
fn healthcare_amount_recovery_is_logged() {
    let signals = extract("I need surgery on my knee and the hospital wants 300 dollars up front.");

    assert_eq!(signals.primary_category, Some(Category::Healthcare));
    assert_eq!(signals.goal_amount, Some(3000.0));
    assert!(signals
        .coordination
        .adjustments
        .iter()
        .any(|a| a.starts_with("goalAmount: 300 -> 3000")));
}

#[test]
fn output_serializes_to_camel_case_json() {
    let signals = extract("Hi, my name is Sarah Johnson. I need help with rent money.");
    let json = serde_json::to_value(&signals).unwrap();

    assert_eq!(json["nameCandidate"], "Sarah Johnson");
    assert_eq!(json["primaryCategory"], "HOUSING");
    assert!(json["contactCandidates"]["phones"].is_array());
    assert!(json["dataValidation"]["storyWordCount"].is_number());
    assert!(json["coordination"]["consistencyScore"].is_number());
    assert!(json["engines"]["category"].is_string());
}

#[test]
fn emergency_room_abbreviation_is_kept() {
    let signals =
        extract("Er, I was rushed to the ER last night and the doctor says I owe three hundred fifty dollars.");

    assert!(signals.normalization.cleaned_text.contains("the ER last night"));
    assert_eq!(signals.normalization.removed_fillers, vec!["er"]);
    assert_eq!(signals.primary_category, Some(Category::Healthcare));
    assert!(signals.needs_categories[0].keywords.contains(&"er".to_string()));
    assert!(!signals.missing_fields.contains(&"medicalContext".to_string()));
}

#[test]
fn spelled_amount_with_tail_resolves() {
    let signals = extract("I need about one hundred fifty dollars for my electric bill");
    assert_eq!(signals.goal_amount, Some(150.0));
}

#[test]
fn urgency_word_is_not_accepted_as_name() {
    let signals = extract("My name is Critical. I need help with rent money.");
    assert!(signals.missing_fields.contains(&"name".to_string()));
}
