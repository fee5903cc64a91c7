pub mod engine;
mod listing;

pub use engine::{match_score, DiagnosisEngine, SIMILARITY_CONFIDENCE_CAP};
pub use listing::{questions, system_info, KNOWLEDGE_BASE_LABEL, STATUS_READY};

use schemars::{json_schema, JsonSchema, Schema, SchemaGenerator};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// Key under which older front-ends nest their answers: `{"symptoms": {...}}`.
const WRAPPED_KEY: &str = "symptoms";

/// Symptom answers from the caller, in the order they appeared in the request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagnosisRequest {
    answers: Vec<(String, bool)>,
}

impl DiagnosisRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer. A repeated name overwrites the earlier answer in place.
    pub fn set(&mut self, name: impl Into<String>, present: bool) {
        let name = name.into();
        match self.answers.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = present,
            None => self.answers.push((name, present)),
        }
    }

    pub fn answers(&self) -> &[(String, bool)] {
        &self.answers
    }

    /// Names answered `true`, in request order.
    pub fn present_symptoms(&self) -> Vec<String> {
        self.answers
            .iter()
            .filter(|(_, present)| *present)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for DiagnosisRequest {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        let mut request = Self::new();
        for (name, present) in iter {
            request.set(name, present);
        }
        request
    }
}

impl Serialize for DiagnosisRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.answers.len()))?;
        for (name, present) in &self.answers {
            map.serialize_entry(name, present)?;
        }
        map.end()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Answer {
    Flag(bool),
    Wrapped(DiagnosisRequest),
}

struct AnswersVisitor;

impl<'de> Visitor<'de> for AnswersVisitor {
    type Value = DiagnosisRequest;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping symptom names to booleans")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut request = DiagnosisRequest::new();
        while let Some(name) = map.next_key::<String>()? {
            match map.next_value::<Answer>()? {
                Answer::Flag(present) => request.set(name, present),
                Answer::Wrapped(inner) if name == WRAPPED_KEY => {
                    for (n, present) in inner.answers {
                        request.set(n, present);
                    }
                }
                Answer::Wrapped(_) => {
                    return Err(de::Error::custom(format!(
                        "expected a boolean for symptom `{name}`"
                    )));
                }
            }
        }
        Ok(request)
    }
}

impl<'de> Deserialize<'de> for DiagnosisRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(AnswersVisitor)
    }
}

impl JsonSchema for DiagnosisRequest {
    fn schema_name() -> Cow<'static, str> {
        "DiagnosisRequest".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "description": "Symptom name mapped to whether the symptom is present, optionally wrapped under `symptoms`",
            "anyOf": [
                {
                    "type": "object",
                    "additionalProperties": { "type": "boolean" }
                },
                {
                    "type": "object",
                    "required": ["symptoms"],
                    "properties": {
                        "symptoms": {
                            "type": "object",
                            "additionalProperties": { "type": "boolean" }
                        }
                    }
                }
            ]
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisResult {
    pub disease: String,
    pub description: String,
    pub treatment: String,
    /// Percentage in [0, 100]
    pub confidence: f64,
    /// Every symptom the caller reported present, in request order
    pub matched_symptoms: Vec<String>,
    pub recommendation: String,
}

impl DiagnosisResult {
    /// Returned when the caller reported no symptoms at all.
    pub fn insufficient_symptoms() -> Self {
        Self {
            disease: "No specific disease".to_string(),
            description: "Insufficient symptoms for diagnosis".to_string(),
            treatment: "Please provide more symptoms".to_string(),
            confidence: 0.0,
            matched_symptoms: vec![],
            recommendation: "Consult a healthcare professional for accurate diagnosis".to_string(),
        }
    }

    /// Returned when no rule fired and no disease shares a reported symptom.
    pub fn unknown_condition(present: Vec<String>) -> Self {
        Self {
            disease: "Unknown Condition".to_string(),
            description: "No specific disease pattern matched your symptoms".to_string(),
            treatment: "Please consult a healthcare professional".to_string(),
            confidence: 0.0,
            matched_symptoms: present,
            recommendation: "Seek medical advice for accurate diagnosis".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub symptom_name: String,
    pub question: String,
    /// 1-based position in the question flow
    pub question_number: usize,
    pub total_questions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub symptoms_count: usize,
    pub diseases_count: usize,
    pub rules_count: usize,
    pub knowledge_base: String,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_keeps_body_order() {
        let req: DiagnosisRequest =
            serde_json::from_str(r#"{"nausea": true, "fever": false, "cough": true}"#).unwrap();
        assert_eq!(req.present_symptoms(), ["nausea", "cough"]);
        assert_eq!(req.answers().len(), 3);
    }

    #[test]
    fn repeated_key_overwrites_in_place() {
        let req: DiagnosisRequest =
            serde_json::from_str(r#"{"fever": true, "cough": true, "fever": false}"#).unwrap();
        assert_eq!(req.answers(), [("fever".to_string(), false), ("cough".to_string(), true)]);
    }

    #[test]
    fn accepts_wrapped_answers() {
        let req: DiagnosisRequest =
            serde_json::from_str(r#"{"symptoms": {"fever": true, "cough": false}}"#).unwrap();
        assert_eq!(req.present_symptoms(), ["fever"]);
    }

    #[test]
    fn rejects_non_boolean_answers() {
        assert!(serde_json::from_str::<DiagnosisRequest>(r#"{"fever": "yes"}"#).is_err());
        assert!(serde_json::from_str::<DiagnosisRequest>(r#"{"fever": {"cough": true}}"#).is_err());
        assert!(serde_json::from_str::<DiagnosisRequest>(r#"["fever"]"#).is_err());
    }

    #[test]
    fn request_serializes_as_flat_object() {
        let req: DiagnosisRequest = [("fever", true), ("cough", false)].into_iter().collect();
        assert_eq!(serde_json::to_value(&req).unwrap(), json!({"fever": true, "cough": false}));
    }

    #[test]
    fn result_uses_camel_case_fields() {
        let json = serde_json::to_value(DiagnosisResult::unknown_condition(vec!["x".into()])).unwrap();
        assert_eq!(json["matchedSymptoms"], json!(["x"]));
        assert_eq!(json["disease"], "Unknown Condition");
        assert_eq!(json["confidence"], 0.0);
    }
}
