use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const PAIN_RESPONSE: &str = "I understand you're experiencing pain. Can you tell me more about the location, intensity (1-10), and when it started? Pain can have many causes, and it's important to track these details. If the pain is severe or sudden, please consider contacting your healthcare provider immediately.";
pub const FATIGUE_RESPONSE: &str = "Fatigue is a common concern. It can be related to many factors including treatment, stress, sleep quality, or underlying conditions. Are you getting adequate rest? Have you noticed any patterns with your fatigue? I'd recommend discussing persistent fatigue with your healthcare team.";
pub const NAUSEA_RESPONSE: &str = "Nausea can be challenging to deal with. Some helpful strategies include eating small, frequent meals, staying hydrated, and avoiding strong odors. Ginger tea or crackers might help. If nausea is severe or persistent, your doctor may be able to prescribe anti-nausea medication.";
pub const LUMP_RESPONSE: &str = "Finding a lump can be concerning. While many lumps are benign, it's important to have any new or changing lumps evaluated by a healthcare professional. Please schedule an appointment with your doctor as soon as possible for proper examination and assessment.";
pub const BREAST_RESPONSE: &str = "Breast changes should always be taken seriously. This could include lumps, pain, skin changes, or nipple discharge. I strongly recommend scheduling a clinical breast exam with your healthcare provider. Early detection is key for the best outcomes.";
pub const EMOTIONAL_SUPPORT_RESPONSE: &str = "It's completely normal to feel scared or anxious about health concerns. These feelings are valid and shared by many people. Consider reaching out to our community support groups, speaking with a counselor, or practicing relaxation techniques. Remember, you're not alone in this journey.";
pub const PREVENTION_RESPONSE: &str = "Great question about prevention! Key strategies include regular screenings, maintaining a healthy diet rich in fruits and vegetables, staying physically active, limiting alcohol, not smoking, and managing stress. Regular check-ups with your healthcare provider are also essential.";
pub const DEFAULT_RESPONSE: &str = "Thank you for sharing that with me. Based on what you've described, I'd recommend keeping track of your symptoms and discussing them with your healthcare provider. They can provide personalized advice based on your medical history. Is there anything specific you'd like to know more about?";

/// Opening message shown before the user has said anything.
pub const GREETING: &str = "Hello! I'm your AI health companion. I'm here to help you understand your symptoms and guide you to appropriate care. Please remember that I'm not a replacement for professional medical advice. How are you feeling today?";

#[derive(Debug, Error)]
pub enum RuleSetError {
    #[error("rule set parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("rule set io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("rule set must end with an unconditional fallback rule")]
    NoFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseCategory {
    Pain,
    Fatigue,
    Nausea,
    Lump,
    Breast,
    EmotionalSupport,
    Prevention,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub matched_category: Option<ResponseCategory>,
    pub response_text: String,
}

/// Conjunction of keyword groups. A group holds when any of its keywords
/// occurs in the lower-cased message; no groups means always true.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordPredicate {
    #[serde(default)]
    pub all_of: Vec<Vec<String>>,
}

impl KeywordPredicate {
    pub fn always() -> Self {
        Self { all_of: Vec::new() }
    }

    pub fn any(words: &[&str]) -> Self {
        Self::always().and(words)
    }

    pub fn and(mut self, words: &[&str]) -> Self {
        self.all_of.push(words.iter().map(|w| w.to_lowercase()).collect());
        self
    }

    pub fn is_unconditional(&self) -> bool {
        self.all_of.is_empty()
    }

    pub fn matches(&self, lowered: &str) -> bool {
        self.all_of
            .iter()
            .all(|group| group.iter().any(|w| lowered.contains(w.as_str())))
    }

    fn normalize(&mut self) {
        for group in &mut self.all_of {
            for w in group.iter_mut() {
                *w = w.to_lowercase();
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub category: Option<ResponseCategory>,
    #[serde(default)]
    pub when: KeywordPredicate,
    pub response: String,
}

impl Rule {
    pub fn new(category: Option<ResponseCategory>, when: KeywordPredicate, response: &str) -> Self {
        Self { category, when, response: response.to_string() }
    }
}

/// Ordered rule cascade: rules are tried top-down and the first match wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

static STANDARD_RULES: Lazy<RuleSet> = Lazy::new(|| {
    use ResponseCategory::*;
    // Order is precedence. "pain" is tested before the breast rule, so
    // "breast pain" gets the generic pain guidance.
    RuleSet {
        rules: vec![
            Rule::new(Some(Pain), KeywordPredicate::any(&["pain", "hurt"]), PAIN_RESPONSE),
            Rule::new(Some(Fatigue), KeywordPredicate::any(&["tired", "fatigue"]), FATIGUE_RESPONSE),
            Rule::new(Some(Nausea), KeywordPredicate::any(&["nausea", "sick"]), NAUSEA_RESPONSE),
            Rule::new(Some(Lump), KeywordPredicate::any(&["lump", "bump"]), LUMP_RESPONSE),
            Rule::new(
                Some(Breast),
                KeywordPredicate::any(&["breast"]).and(&["pain", "change"]),
                BREAST_RESPONSE,
            ),
            Rule::new(
                Some(EmotionalSupport),
                KeywordPredicate::any(&["scared", "worried", "anxious"]),
                EMOTIONAL_SUPPORT_RESPONSE,
            ),
            Rule::new(Some(Prevention), KeywordPredicate::any(&["prevent", "healthy"]), PREVENTION_RESPONSE),
            Rule::new(None, KeywordPredicate::always(), DEFAULT_RESPONSE),
        ],
    }
});

impl RuleSet {
    pub fn new(mut rules: Vec<Rule>) -> Result<Self, RuleSetError> {
        match rules.last() {
            Some(r) if r.when.is_unconditional() => {}
            _ => return Err(RuleSetError::NoFallback),
        }
        for r in &mut rules {
            r.when.normalize();
        }
        Ok(Self { rules })
    }

    pub fn standard() -> Self {
        STANDARD_RULES.clone()
    }

    pub fn from_json(s: &str) -> Result<Self, RuleSetError> {
        let rules: Vec<Rule> = serde_json::from_str(s)?;
        Self::new(rules)
    }

    pub fn load(path: &Path) -> Result<Self, RuleSetError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String, RuleSetError> {
        Ok(serde_json::to_string_pretty(&self.rules)?)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn classify(&self, message: &str) -> ClassificationResult {
        let lowered = message.to_lowercase();
        for rule in &self.rules {
            if rule.when.matches(&lowered) {
                tracing::debug!(category = ?rule.category, "message classified");
                return ClassificationResult {
                    matched_category: rule.category,
                    response_text: rule.response.clone(),
                };
            }
        }
        // Only reachable for a cascade built without RuleSet::new.
        ClassificationResult { matched_category: None, response_text: DEFAULT_RESPONSE.to_string() }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

pub fn classify_message(message: &str) -> ClassificationResult {
    STANDARD_RULES.classify(message)
}

pub fn classify(message: &str) -> String {
    classify_message(message).response_text
}
