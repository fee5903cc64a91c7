use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};
use triage_core::{Disease, KnowledgeBase, Rule};

use crate::{DiagnosisRequest, DiagnosisResult, Question, SystemInfo};

/// Similarity-based matches are never reported above this confidence.
pub const SIMILARITY_CONFIDENCE_CAP: f64 = 95.0;

/// Diagnoses symptom answers against a shared, read-only knowledge base.
///
/// Holds no mutable state, so one engine can serve any number of concurrent callers.
#[derive(Debug, Clone)]
pub struct DiagnosisEngine {
    kb: Arc<KnowledgeBase>,
}

impl DiagnosisEngine {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }

    pub fn diagnose(&self, request: &DiagnosisRequest) -> DiagnosisResult {
        self.diagnose_symptoms(&request.present_symptoms())
    }

    /// Produce exactly one diagnosis for the given present symptoms.
    ///
    /// Expert rules take precedence; when none applies, the disease whose symptom
    /// set is best covered by `present` is reported with capped confidence.
    pub fn diagnose_symptoms(&self, present: &[String]) -> DiagnosisResult {
        debug!(symptoms = ?present, "diagnosing");

        if present.is_empty() {
            return DiagnosisResult::insufficient_symptoms();
        }

        let present_set: HashSet<&str> = present.iter().map(String::as_str).collect();

        let result = self
            .diagnose_by_rule(&present_set, present)
            .or_else(|| self.diagnose_by_similarity(&present_set, present))
            .unwrap_or_else(|| DiagnosisResult::unknown_condition(present.to_vec()));

        info!(
            disease = %result.disease,
            confidence = result.confidence,
            "diagnosis complete"
        );
        result
    }

    /// Rules whose conditions are fully satisfied, highest confidence first.
    /// Equal confidences keep catalog order.
    pub fn matching_rules(&self, present: &HashSet<&str>) -> Vec<&Rule> {
        let mut matched: Vec<&Rule> = self
            .kb
            .rules()
            .iter()
            .filter(|rule| rule.condition.is_satisfied_by(present))
            .collect();
        matched.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        matched
    }

    fn diagnose_by_rule(
        &self,
        present_set: &HashSet<&str>,
        present: &[String],
    ) -> Option<DiagnosisResult> {
        let matched = self.matching_rules(present_set);
        debug!(
            rules = ?matched.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            "matched expert rules"
        );

        let best = matched.first()?;
        let Some(disease) = self.kb.disease(&best.conclusion) else {
            debug!(rule = %best.name, conclusion = %best.conclusion, "skipping rule with unknown conclusion");
            return None;
        };

        Some(DiagnosisResult {
            disease: disease.name.clone(),
            description: disease.description.clone(),
            treatment: disease.treatment.clone(),
            confidence: best.confidence * 100.0,
            matched_symptoms: present.to_vec(),
            recommendation: format!("Based on expert rule: {}", best.name),
        })
    }

    fn diagnose_by_similarity(
        &self,
        present_set: &HashSet<&str>,
        present: &[String],
    ) -> Option<DiagnosisResult> {
        let (disease, score) = self.best_match(present_set)?;

        Some(DiagnosisResult {
            disease: disease.name.clone(),
            description: disease.description.clone(),
            treatment: disease.treatment.clone(),
            confidence: (score * 100.0).min(SIMILARITY_CONFIDENCE_CAP),
            matched_symptoms: present.to_vec(),
            recommendation: "Based on symptom pattern matching".to_string(),
        })
    }

    /// Highest-scoring disease sharing at least one present symptom.
    /// Ties go to the disease listed first in the catalog.
    fn best_match(&self, present: &HashSet<&str>) -> Option<(&Disease, f64)> {
        let mut best: Option<(&Disease, f64)> = None;

        for disease in self.kb.diseases() {
            if !disease.symptoms().iter().any(|s| present.contains(s.as_str())) {
                continue;
            }
            let score = match_score(disease, present);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((disease, score)),
            }
        }

        best
    }

    pub fn questions(&self) -> Vec<Question> {
        crate::questions(&self.kb)
    }

    pub fn system_info(&self) -> SystemInfo {
        crate::system_info(&self.kb)
    }
}

/// Fraction of the disease's symptoms that are present. An empty symptom set scores 0.
pub fn match_score(disease: &Disease, present: &HashSet<&str>) -> f64 {
    let total = disease.symptoms().len();
    if total == 0 {
        return 0.0;
    }
    let matched = disease
        .symptoms()
        .iter()
        .filter(|s| present.contains(s.as_str()))
        .count();
    matched as f64 / total as f64
}
