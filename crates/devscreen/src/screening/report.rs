use serde::{Deserialize, Serialize};

use super::domain::{Category, QuestionId, UnitId};
use super::explain::SkillGap;

/// Final decision for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryVerdict {
    pub category: Category,
    /// Performance-weighted at-risk probability in `[0, 1]`.
    pub risk_probability: f64,
    pub at_risk: bool,
    /// Answers inconsistent with the expected healthy pattern. Empty unless `at_risk`.
    pub implicated_questions: Vec<QuestionId>,
    pub contributing_units: Vec<UnitId>,
}

impl CategoryVerdict {
    pub fn summary(&self) -> String {
        let percent = self.risk_probability * 100.0;
        if !self.at_risk {
            return format!("{}: no risk signal ({percent:.1}%)", self.category);
        }

        if self.implicated_questions.is_empty() {
            format!("{}: at risk ({percent:.1}%)", self.category)
        } else {
            let ids: Vec<&str> = self
                .implicated_questions
                .iter()
                .map(QuestionId::as_str)
                .collect();
            format!(
                "{}: at risk ({percent:.1}%), inconsistent answers: {}",
                self.category,
                ids.join(", ")
            )
        }
    }
}

/// A unit that was skipped for this evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitWarning {
    pub unit: UnitId,
    pub category: Category,
    pub reason: String,
}

/// Outcome of one evaluation. Categories with no usable evidence are listed in
/// `omitted_categories` and never appear in `verdicts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub any_risk: bool,
    pub verdicts: Vec<CategoryVerdict>,
    pub omitted_categories: Vec<Category>,
    pub warnings: Vec<UnitWarning>,
    pub skill_gaps: Vec<SkillGap>,
}

impl EvaluationReport {
    /// Merge the per-category results. Input order is preserved.
    pub fn assemble(
        verdicts: Vec<CategoryVerdict>,
        omitted_categories: Vec<Category>,
        warnings: Vec<UnitWarning>,
        skill_gaps: Vec<SkillGap>,
    ) -> Self {
        let any_risk = verdicts.iter().any(|verdict| verdict.at_risk);
        Self {
            any_risk,
            verdicts,
            omitted_categories,
            warnings,
            skill_gaps,
        }
    }

    pub fn verdict(&self, category: &Category) -> Option<&CategoryVerdict> {
        self.verdicts
            .iter()
            .find(|verdict| &verdict.category == category)
    }

    pub fn flagged(&self) -> impl Iterator<Item = &CategoryVerdict> {
        self.verdicts.iter().filter(|verdict| verdict.at_risk)
    }

    pub fn is_omitted(&self, category: &Category) -> bool {
        self.omitted_categories.contains(category)
    }

    pub fn summary(&self) -> String {
        let mut lines = Vec::with_capacity(self.verdicts.len() + 1);
        lines.push(if self.any_risk {
            "risk signals detected".to_string()
        } else {
            "no risk signals detected".to_string()
        });
        lines.extend(self.verdicts.iter().map(CategoryVerdict::summary));
        for category in &self.omitted_categories {
            lines.push(format!("{category}: not evaluated (no usable classifier output)"));
        }
        lines.join("\n")
    }
}
