use thiserror::Error;

/// Reasons a knowledge base fails to load.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KnowledgeBaseError {
    #[error("Duplicate symptom in catalog: {0}")]
    DuplicateSymptom(String),

    #[error("Rule '{rule}' has an empty condition term in \"{condition}\"")]
    EmptyCondition { rule: String, condition: String },

    #[error("Disease '{disease}' references unknown symptom '{symptom}'")]
    UnknownDiseaseSymptom { disease: String, symptom: String },

    #[error("Rule '{rule}' references unknown symptom '{symptom}'")]
    UnknownRuleSymptom { rule: String, symptom: String },

    #[error("Rule '{rule}' has confidence {confidence} outside [0, 1]")]
    ConfidenceOutOfRange { rule: String, confidence: f64 },
}
