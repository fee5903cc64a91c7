pub mod catalog;
mod error;
mod parse;

pub use error::KnowledgeBaseError;
pub use parse::parse_condition;

use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, warn};

// --- Types ---

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Symptom {
    pub name: String,
    /// Yes/no question shown to the user for this symptom
    pub question: String,
}

impl Symptom {
    pub fn new(name: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            question: question.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Disease {
    pub name: String,
    pub description: String,
    pub treatment: String,
    /// Associated symptom names, in authored order, without repeats
    symptoms: Vec<String>,
}

impl Disease {
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        description: impl Into<String>,
        treatment: impl Into<String>,
        symptoms: impl IntoIterator<Item = S>,
    ) -> Self {
        let mut unique: Vec<String> = Vec::new();
        for symptom in symptoms {
            let symptom = symptom.into();
            if !unique.contains(&symptom) {
                unique.push(symptom);
            }
        }
        Self {
            name: name.into(),
            description: description.into(),
            treatment: treatment.into(),
            symptoms: unique,
        }
    }

    pub fn symptoms(&self) -> &[String] {
        &self.symptoms
    }

    pub fn has_symptom(&self, name: &str) -> bool {
        self.symptoms.iter().any(|s| s == name)
    }
}

/// Conjunction of required symptom names. Names are trimmed and lowercased on construction.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
#[serde(transparent)]
pub struct RuleCondition(Vec<String>);

impl RuleCondition {
    pub fn all_of<S: AsRef<str>>(symptoms: impl IntoIterator<Item = S>) -> Self {
        let mut terms: Vec<String> = Vec::new();
        for symptom in symptoms {
            let term = symptom.as_ref().trim().to_lowercase();
            if !terms.contains(&term) {
                terms.push(term);
            }
        }
        Self(terms)
    }

    pub fn symptoms(&self) -> &[String] {
        &self.0
    }

    /// True when every required symptom is in `present`.
    pub fn is_satisfied_by(&self, present: &HashSet<&str>) -> bool {
        self.0.iter().all(|s| present.contains(s.as_str()))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Rule {
    pub name: String,
    pub condition: RuleCondition,
    /// Disease name this rule concludes, matched exactly against the disease catalog
    pub conclusion: String,
    /// Fraction in [0, 1]
    pub confidence: f64,
}

impl Rule {
    pub fn new(
        name: impl Into<String>,
        condition: RuleCondition,
        conclusion: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            name: name.into(),
            condition,
            conclusion: conclusion.into(),
            confidence,
        }
    }
}

// --- Knowledge base ---

/// Validated, read-only catalogs of symptoms, diseases, and rules.
///
/// Built once at startup and shared by reference for the life of the process.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    symptoms: Vec<Symptom>,
    diseases: Vec<Disease>,
    rules: Vec<Rule>,
}

impl KnowledgeBase {
    /// Validate caller-supplied catalogs. Fails on the first inconsistency found.
    pub fn new(
        symptoms: Vec<Symptom>,
        diseases: Vec<Disease>,
        rules: Vec<Rule>,
    ) -> Result<Self, KnowledgeBaseError> {
        let mut known: HashSet<&str> = HashSet::with_capacity(symptoms.len());
        for symptom in &symptoms {
            if !known.insert(symptom.name.as_str()) {
                return Err(KnowledgeBaseError::DuplicateSymptom(symptom.name.clone()));
            }
        }

        for disease in &diseases {
            if let Some(missing) = disease.symptoms().iter().find(|s| !known.contains(s.as_str())) {
                return Err(KnowledgeBaseError::UnknownDiseaseSymptom {
                    disease: disease.name.clone(),
                    symptom: missing.clone(),
                });
            }
        }

        for rule in &rules {
            let terms = rule.condition.symptoms();
            if terms.is_empty() || terms.iter().any(|s| s.is_empty()) {
                return Err(KnowledgeBaseError::EmptyCondition {
                    rule: rule.name.clone(),
                    condition: terms.join(" && "),
                });
            }
            if let Some(missing) = rule
                .condition
                .symptoms()
                .iter()
                .find(|s| !known.contains(s.as_str()))
            {
                return Err(KnowledgeBaseError::UnknownRuleSymptom {
                    rule: rule.name.clone(),
                    symptom: missing.clone(),
                });
            }
            if !rule.confidence.is_finite() || !(0.0..=1.0).contains(&rule.confidence) {
                return Err(KnowledgeBaseError::ConfidenceOutOfRange {
                    rule: rule.name.clone(),
                    confidence: rule.confidence,
                });
            }
            if !diseases.iter().any(|d| d.name == rule.conclusion) {
                warn!(
                    rule = %rule.name,
                    conclusion = %rule.conclusion,
                    "rule concludes a disease missing from the catalog; it will never fire"
                );
            }
        }

        info!(
            symptoms = symptoms.len(),
            diseases = diseases.len(),
            rules = rules.len(),
            "knowledge base initialized"
        );

        Ok(Self {
            symptoms,
            diseases,
            rules,
        })
    }

    /// Load the built-in catalog from [`catalog`].
    pub fn builtin() -> Result<Self, KnowledgeBaseError> {
        let symptoms = catalog::SYMPTOMS
            .iter()
            .map(|(name, question)| Symptom::new(*name, *question))
            .collect();

        let diseases = catalog::DISEASES
            .iter()
            .map(|d| Disease::new(d.name, d.description, d.treatment, d.symptoms.iter().copied()))
            .collect();

        let rules = catalog::RULES
            .iter()
            .map(|r| {
                let condition = parse_condition(r.name, r.condition)?;
                Ok(Rule::new(r.name, condition, r.conclusion, r.confidence))
            })
            .collect::<Result<Vec<_>, KnowledgeBaseError>>()?;

        Self::new(symptoms, diseases, rules)
    }

    pub fn symptoms(&self) -> &[Symptom] {
        &self.symptoms
    }

    pub fn diseases(&self) -> &[Disease] {
        &self.diseases
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Find a disease by exact name.
    pub fn disease(&self, name: &str) -> Option<&Disease> {
        self.diseases.iter().find(|d| d.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symptoms(names: &[&str]) -> Vec<Symptom> {
        names.iter().map(|n| Symptom::new(*n, format!("{n}?"))).collect()
    }

    #[test]
    fn builtin_catalog_loads() {
        let kb = KnowledgeBase::builtin().unwrap();
        assert_eq!(kb.symptoms().len(), 12);
        assert_eq!(kb.diseases().len(), 5);
        assert_eq!(kb.rules().len(), 5);
        assert_eq!(kb.symptoms()[0].name, "fever");
        assert_eq!(kb.symptoms()[11].name, "shortness_of_breath");
        assert_eq!(
            kb.rules()[0].condition.symptoms(),
            ["fever", "cough", "shortness_of_breath", "fatigue"]
        );
    }

    #[test]
    fn every_builtin_rule_concludes_a_known_disease() {
        let kb = KnowledgeBase::builtin().unwrap();
        for rule in kb.rules() {
            assert!(kb.disease(&rule.conclusion).is_some(), "{}", rule.name);
        }
    }

    #[test]
    fn disease_lookup_is_exact() {
        let kb = KnowledgeBase::builtin().unwrap();
        assert!(kb.disease("COVID-19").is_some());
        assert!(kb.disease("covid-19").is_none());
        assert!(kb.disease("Flu").is_none());
    }

    #[test]
    fn rejects_duplicate_symptoms() {
        let err = KnowledgeBase::new(symptoms(&["fever", "cough", "fever"]), vec![], vec![])
            .unwrap_err();
        assert_eq!(err, KnowledgeBaseError::DuplicateSymptom("fever".to_string()));
    }

    #[test]
    fn rejects_disease_with_unknown_symptom() {
        let disease = Disease::new("Cold", "d", "t", ["fever", "sneezing"]);
        let err = KnowledgeBase::new(symptoms(&["fever"]), vec![disease], vec![]).unwrap_err();
        assert_eq!(
            err,
            KnowledgeBaseError::UnknownDiseaseSymptom {
                disease: "Cold".to_string(),
                symptom: "sneezing".to_string(),
            }
        );
    }

    #[test]
    fn rejects_rule_with_unknown_symptom() {
        let rule = Rule::new("R", RuleCondition::all_of(["fever", "rash"]), "X", 0.5);
        let err = KnowledgeBase::new(symptoms(&["fever"]), vec![], vec![rule]).unwrap_err();
        assert_eq!(
            err,
            KnowledgeBaseError::UnknownRuleSymptom {
                rule: "R".to_string(),
                symptom: "rash".to_string(),
            }
        );
    }

    #[test]
    fn rejects_rule_with_empty_condition() {
        let rule = Rule::new("Empty", RuleCondition::all_of(Vec::<String>::new()), "X", 0.9);
        let err = KnowledgeBase::new(symptoms(&["fever"]), vec![], vec![rule]).unwrap_err();
        assert_eq!(
            err,
            KnowledgeBaseError::EmptyCondition {
                rule: "Empty".to_string(),
                condition: String::new(),
            }
        );

        let rule = Rule::new("Blank", RuleCondition::all_of(["fever", "  "]), "X", 0.9);
        let err = KnowledgeBase::new(symptoms(&["fever"]), vec![], vec![rule]).unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::EmptyCondition { ref rule, .. } if rule == "Blank"));
    }

    #[test]
    fn rejects_confidence_outside_unit_interval() {
        for confidence in [-0.1, 1.5, f64::NAN] {
            let rule = Rule::new("R", RuleCondition::all_of(["fever"]), "X", confidence);
            let err = KnowledgeBase::new(symptoms(&["fever"]), vec![], vec![rule]).unwrap_err();
            assert!(matches!(err, KnowledgeBaseError::ConfidenceOutOfRange { .. }));
        }
    }

    #[test]
    fn rule_with_unknown_conclusion_still_loads() {
        let rule = Rule::new("R", RuleCondition::all_of(["fever"]), "Nowhere", 0.5);
        let kb = KnowledgeBase::new(symptoms(&["fever"]), vec![], vec![rule]).unwrap();
        assert_eq!(kb.rules().len(), 1);
    }

    #[test]
    fn condition_normalizes_names() {
        let cond = RuleCondition::all_of([" Fever ", "COUGH", "fever"]);
        assert_eq!(cond.symptoms(), ["fever", "cough"]);

        let present: HashSet<&str> = ["fever", "cough", "nausea"].into_iter().collect();
        assert!(cond.is_satisfied_by(&present));
        let partial: HashSet<&str> = ["fever"].into_iter().collect();
        assert!(!cond.is_satisfied_by(&partial));
    }

    #[test]
    fn disease_symptoms_keep_order_without_repeats() {
        let d = Disease::new("D", "d", "t", ["b", "a", "b"]);
        assert_eq!(d.symptoms(), ["b", "a"]);
        assert!(d.has_symptom("a"));
        assert!(!d.has_symptom("c"));
    }

    #[test]
    fn rule_serializes_condition_as_list() {
        let rule = Rule::new("R", RuleCondition::all_of(["fever", "cough"]), "X", 0.5);
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["condition"], serde_json::json!(["fever", "cough"]));
        assert_eq!(json["conclusion"], "X");
    }
}
