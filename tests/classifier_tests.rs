use symptomscope::classifier::{
    self, KeywordPredicate, ResponseCategory, Rule, RuleSet, RuleSetError, BREAST_RESPONSE,
    DEFAULT_RESPONSE, EMOTIONAL_SUPPORT_RESPONSE, FATIGUE_RESPONSE, LUMP_RESPONSE,
    NAUSEA_RESPONSE, PAIN_RESPONSE, PREVENTION_RESPONSE,
};

fn category(msg: &str) -> Option<ResponseCategory> {
    classifier::classify_message(msg).matched_category
}

#[test]
fn each_rule_matches_its_keywords() {
    assert_eq!(classifier::classify("My knee hurts"), PAIN_RESPONSE);
    assert_eq!(classifier::classify("I am so tired lately"), FATIGUE_RESPONSE);
    assert_eq!(classifier::classify("Constant nausea after meals"), NAUSEA_RESPONSE);
    assert_eq!(classifier::classify("I found a bump on my arm"), LUMP_RESPONSE);
    assert_eq!(classifier::classify("I noticed a change in my breast"), BREAST_RESPONSE);
    assert_eq!(classifier::classify("I'm anxious about my results"), EMOTIONAL_SUPPORT_RESPONSE);
    assert_eq!(classifier::classify("How do I stay healthy?"), PREVENTION_RESPONSE);
    assert_eq!(classifier::classify("Hello there"), DEFAULT_RESPONSE);
}

#[test]
fn breast_pain_gets_generic_pain_response() {
    let res = classifier::classify_message("I have breast pain");
    assert_eq!(res.matched_category, Some(ResponseCategory::Pain));
    assert_eq!(res.response_text, PAIN_RESPONSE);
}

#[test]
fn earlier_rule_wins_when_several_match() {
    // fatigue (2) before nausea (3)
    assert_eq!(category("I'm tired and I feel sick"), Some(ResponseCategory::Fatigue));
    // lump (4) before breast (5)
    assert_eq!(category("a lump in my breast, some change too"), Some(ResponseCategory::Lump));
    // pain (1) before emotional support (6)
    assert_eq!(category("I'm scared because it hurts"), Some(ResponseCategory::Pain));
    // emotional support (6) before prevention (7)
    assert_eq!(category("worried about how to prevent it"), Some(ResponseCategory::EmotionalSupport));
}

#[test]
fn breast_rule_needs_both_conditions() {
    assert_eq!(category("question about breast feeding"), None);
    assert_eq!(category("any change in my breast tissue"), Some(ResponseCategory::Breast));
}

#[test]
fn matching_is_case_insensitive_substring() {
    assert_eq!(category("IT HURTS"), Some(ResponseCategory::Pain));
    assert_eq!(category("Fatigue"), Some(ResponseCategory::Fatigue));
    // containment, not word match
    assert_eq!(category("I was painting all day"), Some(ResponseCategory::Pain));
    assert_eq!(category("unhealthy habits"), Some(ResponseCategory::Prevention));
}

#[test]
fn empty_message_gets_default() {
    let res = classifier::classify_message("");
    assert_eq!(res.matched_category, None);
    assert_eq!(res.response_text, DEFAULT_RESPONSE);
}

#[test]
fn standard_rules_end_with_fallback() {
    let rules = RuleSet::standard();
    assert_eq!(rules.rules().len(), 8);
    let last = rules.rules().last().unwrap();
    assert!(last.when.is_unconditional());
    assert_eq!(last.category, None);
}

#[test]
fn rule_set_loads_from_json() {
    let json = r#"[
        {"category": "fatigue", "when": {"all_of": [["Exhausted"]]}, "response": "rest up"},
        {"when": {"all_of": []}, "response": "fallback"}
    ]"#;
    let rules = RuleSet::from_json(json).unwrap();
    let res = rules.classify("I'm exhausted");
    assert_eq!(res.matched_category, Some(ResponseCategory::Fatigue));
    assert_eq!(res.response_text, "rest up");
    assert_eq!(rules.classify("fine thanks").response_text, "fallback");
}

#[test]
fn rule_set_without_fallback_is_rejected() {
    let rules = vec![Rule::new(Some(ResponseCategory::Pain), KeywordPredicate::any(&["pain"]), "p")];
    assert!(matches!(RuleSet::new(rules), Err(RuleSetError::NoFallback)));
    assert!(matches!(RuleSet::new(vec![]), Err(RuleSetError::NoFallback)));
    assert!(matches!(RuleSet::from_json("not json"), Err(RuleSetError::Parse(_))));
}

#[test]
fn standard_rules_survive_json_export() {
    let json = RuleSet::standard().to_json().unwrap();
    let rules = RuleSet::from_json(&json).unwrap();
    assert_eq!(rules, RuleSet::standard());
}

#[test]
fn rule_set_loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.json");
    std::fs::write(
        &path,
        r#"[{"category": "fatigue", "when": {"all_of": [["sleepy"]]}, "response": "rest up"},
            {"response": "noted"}]"#,
    )
    .unwrap();
    let rules = RuleSet::load(&path).unwrap();
    assert_eq!(rules.rules().len(), 2);
    let hit = rules.classify("So SLEEPY today");
    assert_eq!(hit.matched_category, Some(ResponseCategory::Fatigue));
    assert_eq!(hit.response_text, "rest up");
    assert_eq!(rules.classify("hello").response_text, "noted");
}

#[test]
fn rule_set_load_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = RuleSet::load(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, RuleSetError::Io(_)));
}
