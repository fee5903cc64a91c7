use triage_core::KnowledgeBase;

use crate::{Question, SystemInfo};

pub const KNOWLEDGE_BASE_LABEL: &str = "In-Memory (No Database)";
pub const STATUS_READY: &str = "Ready";

/// One question per catalogued symptom, numbered from 1 in catalog order.
pub fn questions(kb: &KnowledgeBase) -> Vec<Question> {
    let total = kb.symptoms().len();
    kb.symptoms()
        .iter()
        .enumerate()
        .map(|(i, symptom)| Question {
            symptom_name: symptom.name.clone(),
            question: symptom.question.clone(),
            question_number: i + 1,
            total_questions: total,
        })
        .collect()
}

pub fn system_info(kb: &KnowledgeBase) -> SystemInfo {
    SystemInfo {
        symptoms_count: kb.symptoms().len(),
        diseases_count: kb.diseases().len(),
        rules_count: kb.rules().len(),
        knowledge_base: KNOWLEDGE_BASE_LABEL.to_string(),
        status: STATUS_READY.to_string(),
    }
}
