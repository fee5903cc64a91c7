use crate::{KnowledgeBaseError, RuleCondition};

/// Parse an authored condition like `"fever && cough"` into its required symptoms.
/// Terms are trimmed and lowercased; an empty term anywhere rejects the whole condition.
pub fn parse_condition(rule: &str, condition: &str) -> Result<RuleCondition, KnowledgeBaseError> {
    let mut terms = Vec::new();

    for term in condition.split("&&") {
        let term = term.trim();
        if term.is_empty() {
            return Err(KnowledgeBaseError::EmptyCondition {
                rule: rule.to_string(),
                condition: condition.to_string(),
            });
        }
        terms.push(term);
    }

    Ok(RuleCondition::all_of(terms))
}
