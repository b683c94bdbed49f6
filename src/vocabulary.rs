/// Symptom terms recognized in free text, in output order.
///
/// Terms are matched independently, so a message mentioning "chest pain"
/// yields both "pain" and "chest pain".
pub const SYMPTOM_VOCABULARY: [&str; 16] = [
    "pain",
    "headache",
    "nausea",
    "fatigue",
    "tired",
    "dizzy",
    "fever",
    "cough",
    "shortness of breath",
    "chest pain",
    "abdominal pain",
    "back pain",
    "joint pain",
    "muscle pain",
    "sore throat",
    "runny nose",
];

/// Labels offered by the manual tracking form.
pub const TRACKER_SYMPTOMS: [&str; 15] = [
    "Fatigue",
    "Nausea",
    "Pain",
    "Headache",
    "Dizziness",
    "Fever",
    "Cough",
    "Shortness of breath",
    "Chest pain",
    "Abdominal pain",
    "Back pain",
    "Joint pain",
    "Muscle pain",
    "Sleep issues",
    "Anxiety",
];

pub fn extract_symptoms(message: &str) -> Vec<String> {
    extract_with(message, &SYMPTOM_VOCABULARY)
}

pub fn extract_with(message: &str, vocabulary: &[&str]) -> Vec<String> {
    let lowered = message.to_lowercase();
    let found: Vec<String> = vocabulary
        .iter()
        .filter(|term| lowered.contains(*term))
        .map(|term| term.to_string())
        .collect();
    tracing::debug!(count = found.len(), "symptoms extracted");
    found
}
