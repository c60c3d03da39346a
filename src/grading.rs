use std::collections::BTreeSet;

use crate::bank::{Choice, QuestionId};
use crate::session::Session;

/// One wrongly answered question, with everything the review screen shows.
#[derive(Debug, Clone)]
pub struct Mismatch {
    pub id: QuestionId,
    pub question: String,
    /// Full option list in original order, for review.
    pub options: Vec<Choice>,
    /// Sorted original labels of the authoritative answer, e.g. "AC".
    pub correct: String,
    /// Sorted original labels the user's selection maps to; empty when the
    /// question was left unanswered.
    pub chosen: String,
}

#[derive(Debug, Clone)]
pub struct GradeReport {
    pub total: usize,
    /// Mismatches sorted by question id, not session display order.
    pub mismatches: Vec<Mismatch>,
}

impl GradeReport {
    pub fn wrong(&self) -> usize {
        self.mismatches.len()
    }

    pub fn correct(&self) -> usize {
        self.total - self.mismatches.len()
    }

    pub fn all_correct(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Grade a session. Pure and total: selections in displayed-label space are
/// mapped through the session's stored permutations back to original option
/// labels and compared against each question's answer by set equality.
pub fn grade(session: &Session) -> GradeReport {
    let mut mismatches = Vec::new();

    for (index, question) in session.questions().iter().enumerate() {
        let permutation = session.permutation(index);
        let mut chosen = BTreeSet::new();
        for &label in session.selection(index) {
            let position = (label as u8 - b'A') as usize;
            let original = permutation[position];
            chosen.insert(question.options[original].label);
        }

        if chosen != question.answer {
            mismatches.push(Mismatch {
                id: question.id.clone(),
                question: question.text.clone(),
                options: question.options.clone(),
                correct: question.answer.iter().collect(),
                chosen: chosen.iter().collect(),
            });
        }
    }

    mismatches.sort_by(|a, b| a.id.cmp(&b.id));
    GradeReport {
        total: session.len(),
        mismatches,
    }
}
