//! Built-in knowledge base tables, the single source of truth for `KnowledgeBase::builtin`.
//!
//! Conditions are kept in their authored `a && b && c` form and parsed once at load.

pub struct DiseaseEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub treatment: &'static str,
    pub symptoms: &'static [&'static str],
}

pub struct RuleEntry {
    pub name: &'static str,
    pub condition: &'static str,
    pub conclusion: &'static str,
    pub confidence: f64,
}

/// Symptom name and the question shown to the user, in question order.
pub const SYMPTOMS: &[(&str, &str)] = &[
    ("fever", "Do you have a fever?"),
    ("cough", "Do you have a persistent cough?"),
    ("headache", "Are you experiencing headaches?"),
    ("fatigue", "Do you feel unusually tired?"),
    ("sore_throat", "Do you have a sore throat?"),
    ("runny_nose", "Do you have a runny nose?"),
    ("body_aches", "Do you have body aches?"),
    ("nausea", "Are you feeling nauseous?"),
    ("vomiting", "Have you been vomiting?"),
    ("diarrhea", "Do you have diarrhea?"),
    ("chest_pain", "Are you experiencing chest pain?"),
    ("shortness_of_breath", "Do you have shortness of breath?"),
];

pub const DISEASES: &[DiseaseEntry] = &[
    DiseaseEntry {
        name: "Common Cold",
        description: "Viral infection of the nose and throat",
        treatment: "Rest, fluids, over-the-counter cold medicine",
        symptoms: &["fever", "cough", "headache", "runny_nose", "sore_throat"],
    },
    DiseaseEntry {
        name: "Flu (Influenza)",
        description: "Respiratory illness caused by influenza viruses",
        treatment: "Rest, fluids, antiviral medication if early",
        symptoms: &["fever", "cough", "headache", "fatigue", "body_aches"],
    },
    DiseaseEntry {
        name: "COVID-19",
        description: "Respiratory illness caused by coronavirus",
        treatment: "Isolation, rest, medical consultation",
        symptoms: &["fever", "cough", "fatigue", "chest_pain", "shortness_of_breath"],
    },
    DiseaseEntry {
        name: "Stomach Flu",
        description: "Viral infection causing stomach inflammation",
        treatment: "Hydration, bland diet, rest",
        symptoms: &["nausea", "vomiting", "diarrhea", "fever"],
    },
    DiseaseEntry {
        name: "Strep Throat",
        description: "Bacterial throat infection",
        treatment: "Antibiotics, rest, pain relief",
        symptoms: &["fever", "sore_throat", "headache"],
    },
];

pub const RULES: &[RuleEntry] = &[
    RuleEntry {
        name: "COVID Rule",
        condition: "fever && cough && shortness_of_breath && fatigue",
        conclusion: "COVID-19",
        confidence: 0.90,
    },
    RuleEntry {
        name: "Flu Rule",
        condition: "fever && cough && body_aches && fatigue",
        conclusion: "Flu (Influenza)",
        confidence: 0.85,
    },
    RuleEntry {
        name: "Cold Rule",
        condition: "runny_nose && sore_throat && cough",
        conclusion: "Common Cold",
        confidence: 0.80,
    },
    RuleEntry {
        name: "Stomach Flu Rule",
        condition: "nausea && vomiting && diarrhea",
        conclusion: "Stomach Flu",
        confidence: 0.75,
    },
    RuleEntry {
        name: "Strep Throat Rule",
        condition: "sore_throat && fever && headache",
        conclusion: "Strep Throat",
        confidence: 0.70,
    },
];
