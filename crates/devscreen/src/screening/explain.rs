use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::domain::{AnswerSet, Category, QuestionId};
use super::questions::QuestionCatalogue;

/// Questions whose answer differs from the expected healthy answer.
///
/// Candidates are taken in the order given (unit declaration order, then feature order) and
/// deduplicated. Unanswered questions and questions without reference data are skipped. The
/// result lists co-occurring deviations; it does not attribute the flag to them.
pub fn implicated_questions<'a, I>(
    features: I,
    answers: &AnswerSet,
    questions: &QuestionCatalogue,
) -> Vec<QuestionId>
where
    I: IntoIterator<Item = &'a QuestionId>,
{
    let mut seen = HashSet::new();
    features
        .into_iter()
        .filter(|question| seen.insert(*question))
        .filter(|question| deviates(question, answers, questions))
        .cloned()
        .collect()
}

fn deviates(question: &QuestionId, answers: &AnswerSet, questions: &QuestionCatalogue) -> bool {
    match (answers.get(question), questions.expected_answer(question)) {
        (Some(given), Some(expected)) => given != expected,
        _ => false,
    }
}

/// Count of deviating answers per tagged skill area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGap {
    pub category: Category,
    pub count: usize,
    pub questions: Vec<QuestionId>,
}

/// Descriptive skill analysis independent of any classifier: every answered question that
/// deviates from its expected answer counts once toward each category it is tagged with.
/// Ordered by the question sheet's category columns; categories without gaps are omitted.
pub fn skill_gaps(answers: &AnswerSet, questions: &QuestionCatalogue) -> Vec<SkillGap> {
    questions
        .categories()
        .iter()
        .filter_map(|category| {
            let deviating: Vec<QuestionId> = questions
                .questions()
                .iter()
                .filter(|question| question.is_tagged(category))
                .filter(|question| deviates(&question.id, answers, questions))
                .map(|question| question.id.clone())
                .collect();

            (!deviating.is_empty()).then(|| SkillGap {
                category: category.clone(),
                count: deviating.len(),
                questions: deviating,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn catalogue() -> QuestionCatalogue {
        let sheet = "id;text;expected;Social;Language\n\
Q2;Loses words;no;no;yes\n\
Q5;Uses three words;yes;no;yes\n\
Q9;Imitates clapping;yes;yes;no\n\
Q11;Flaps hands;no;yes;no\n";
        QuestionCatalogue::from_reader(Cursor::new(sheet)).expect("sheet parses")
    }

    fn ids(raw: &[&str]) -> Vec<QuestionId> {
        raw.iter().map(|id| QuestionId::from(*id)).collect()
    }

    #[test]
    fn only_deviating_answers_are_implicated() {
        let answers = AnswerSet::new().with("Q2", true).with("Q9", true);
        let features = ids(&["Q2", "Q9"]);

        let implicated = implicated_questions(&features, &answers, &catalogue());
        assert_eq!(implicated, ids(&["Q2"]));
    }

    #[test]
    fn unanswered_and_unknown_questions_are_not_mismatches() {
        let answers = AnswerSet::new().with("Q77", true).with("Q11", true);
        let features = ids(&["Q5", "Q77", "Q11"]);

        let implicated = implicated_questions(&features, &answers, &catalogue());
        assert_eq!(implicated, ids(&["Q11"]));
    }

    #[test]
    fn implicated_list_is_deduplicated_in_first_seen_order() {
        let answers = AnswerSet::new()
            .with("Q2", true)
            .with("Q5", false)
            .with("Q11", true);
        let features = ids(&["Q11", "Q5", "Q11", "Q2", "Q5"]);

        let implicated = implicated_questions(&features, &answers, &catalogue());
        assert_eq!(implicated, ids(&["Q11", "Q5", "Q2"]));
    }

    #[test]
    fn skill_gaps_count_deviations_per_tag_in_column_order() {
        let answers = AnswerSet::new()
            .with("Q2", true)
            .with("Q5", true)
            .with("Q9", false)
            .with("Q11", true);

        let gaps = skill_gaps(&answers, &catalogue());
        assert_eq!(
            gaps,
            vec![
                SkillGap {
                    category: Category::from("Social"),
                    count: 2,
                    questions: ids(&["Q9", "Q11"]),
                },
                SkillGap {
                    category: Category::from("Language"),
                    count: 1,
                    questions: ids(&["Q2"]),
                },
            ]
        );
    }

    #[test]
    fn healthy_answers_leave_no_gaps() {
        let answers = AnswerSet::new()
            .with("Q2", false)
            .with("Q5", true)
            .with("Q9", true)
            .with("Q11", false);
        assert!(skill_gaps(&answers, &catalogue()).is_empty());
    }
}
