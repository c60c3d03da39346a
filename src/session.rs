use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::bank::{Question, QuestionBank};

/// Lifecycle of one quiz attempt. `Submitting` means a confirmation is
/// pending because some questions are still unanswered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Active,
    Submitting,
    Graded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Every question has a selection; the session moved straight to `Graded`.
    Graded,
    /// This many questions are unanswered; the session is now `Submitting`
    /// and waits for `confirm_submit` or `cancel_submit`.
    NeedsConfirmation(usize),
}

/// An option as presented on screen: the positional label (A, B, C, ...)
/// plus the text of whichever original option the shuffle put there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayedOption<'a> {
    pub label: char,
    pub text: &'a str,
}

/// One attempt at the quiz. Holds the session-shuffled question order, the
/// per-question option permutations, and every selection the user has made,
/// all of which stay fixed until a new session replaces this one.
pub struct Session {
    questions: Vec<Question>,
    option_perms: Vec<Vec<usize>>,
    user_answers: Vec<BTreeSet<char>>,
    current_index: usize,
    started_at: Instant,
    finished_at: Option<Instant>,
    phase: Phase,
}

pub fn display_label(position: usize) -> char {
    debug_assert!(position < 26);
    (b'A' + position as u8) as char
}

fn display_position(label: char) -> usize {
    (label as u8 - b'A') as usize
}

impl Session {
    pub fn new(bank: &QuestionBank) -> Self {
        Self::with_rng(bank, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(bank: &QuestionBank, rng: &mut R) -> Self {
        let mut questions = bank.questions.clone();
        questions.shuffle(rng);

        let option_perms = questions
            .iter()
            .map(|q| {
                let mut indices: Vec<usize> = (0..q.options.len()).collect();
                indices.shuffle(rng);
                indices
            })
            .collect();

        let user_answers = vec![BTreeSet::new(); questions.len()];
        log::debug!("started session with {} questions", questions.len());

        Session {
            questions,
            option_perms,
            user_answers,
            current_index: 0,
            started_at: Instant::now(),
            finished_at: None,
            phase: Phase::Active,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    /// Displayed position -> original option index, for one question.
    pub fn permutation(&self, index: usize) -> &[usize] {
        &self.option_perms[index]
    }

    /// The options of a question in displayed order, relabeled positionally.
    pub fn displayed_options(&self, index: usize) -> Vec<DisplayedOption<'_>> {
        let question = &self.questions[index];
        self.option_perms[index]
            .iter()
            .enumerate()
            .map(|(position, &original)| DisplayedOption {
                label: display_label(position),
                text: &question.options[original].text,
            })
            .collect()
    }

    /// Selected displayed labels for one question. Empty means unanswered.
    pub fn selection(&self, index: usize) -> &BTreeSet<char> {
        &self.user_answers[index]
    }

    pub fn is_answered(&self, index: usize) -> bool {
        !self.user_answers[index].is_empty()
    }

    pub fn unanswered_count(&self) -> usize {
        self.user_answers.iter().filter(|s| s.is_empty()).count()
    }

    /// Switch the displayed question. Stored answers are untouched.
    pub fn go_to(&mut self, index: usize) {
        assert!(index < self.questions.len());
        self.current_index = index;
    }

    /// Flip membership of a displayed label in the question's selection set.
    pub fn toggle_option(&mut self, index: usize, label: char) {
        let position = display_position(label);
        assert!(position < self.questions[index].options.len());

        let selection = &mut self.user_answers[index];
        if !selection.remove(&label) {
            selection.insert(label);
        }
    }

    /// Wall-clock time since the session started, frozen once graded.
    pub fn elapsed(&self) -> Duration {
        let end = self.finished_at.unwrap_or_else(Instant::now);
        end.duration_since(self.started_at)
    }

    pub fn try_submit(&mut self) -> SubmitOutcome {
        assert!(self.phase == Phase::Active);
        let unanswered = self.unanswered_count();
        if unanswered > 0 {
            self.phase = Phase::Submitting;
            SubmitOutcome::NeedsConfirmation(unanswered)
        } else {
            self.finish();
            SubmitOutcome::Graded
        }
    }

    pub fn confirm_submit(&mut self) {
        assert!(self.phase == Phase::Submitting);
        self.finish();
    }

    pub fn cancel_submit(&mut self) {
        assert!(self.phase == Phase::Submitting);
        self.phase = Phase::Active;
    }

    fn finish(&mut self) {
        self.finished_at = Some(Instant::now());
        self.phase = Phase::Graded;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::QuestionBank;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const BANK: &str = r#"{
        "questions": [
            {
                "id": 1,
                "question": "first",
                "options": ["A.x", "B.y"],
                "answer": ["A"]
            },
            {
                "id": 2,
                "question": "second",
                "options": ["A.p", "B.q", "C.r"],
                "answer": ["B", "C"]
            }
        ]
    }"#;

    fn session(seed: u64) -> Session {
        let bank = QuestionBank::parse(BANK).expect("test bank should parse");
        Session::with_rng(&bank, &mut StdRng::seed_from_u64(seed))
    }

    #[test]
    fn permutations_are_bijections() {
        for seed in 0..20 {
            let session = session(seed);
            for index in 0..session.len() {
                let mut perm = session.permutation(index).to_vec();
                perm.sort_unstable();
                let expected: Vec<usize> =
                    (0..session.questions()[index].options.len()).collect();
                assert_eq!(perm, expected, "seed {} question {}", seed, index);
            }
        }
    }

    #[test]
    fn displayed_options_round_trip_to_originals() {
        let session = session(7);
        for index in 0..session.len() {
            let question = &session.questions()[index];
            let displayed = session.displayed_options(index);
            assert_eq!(displayed.len(), question.options.len());
            for (position, shown) in displayed.iter().enumerate() {
                assert_eq!(shown.label, display_label(position));
                let original = session.permutation(index)[position];
                assert_eq!(shown.text, question.options[original].text);
            }
        }
    }

    #[test]
    fn toggling_flips_membership() {
        let mut session = session(3);
        assert!(!session.is_answered(0));

        session.toggle_option(0, 'A');
        assert!(session.selection(0).contains(&'A'));
        assert!(session.is_answered(0));

        session.toggle_option(0, 'A');
        assert!(session.selection(0).is_empty());
        assert!(!session.is_answered(0));
    }

    #[test]
    fn toggling_never_reshuffles() {
        let mut session = session(11);
        let wide = (0..session.len())
            .find(|&i| session.questions()[i].options.len() == 3)
            .expect("bank has a three-option question");
        let before: Vec<Vec<usize>> = (0..session.len())
            .map(|i| session.permutation(i).to_vec())
            .collect();

        for _ in 0..10 {
            session.toggle_option(0, 'A');
            session.toggle_option(1, 'B');
            session.toggle_option(wide, 'C');
        }

        let after: Vec<Vec<usize>> = (0..session.len())
            .map(|i| session.permutation(i).to_vec())
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn navigation_keeps_answers() {
        let mut session = session(5);
        session.toggle_option(0, 'B');
        session.go_to(1);
        session.go_to(0);
        assert_eq!(session.current_index(), 0);
        assert!(session.selection(0).contains(&'B'));
    }

    #[test]
    fn unanswered_count_tracks_empty_selections() {
        let mut session = session(9);
        assert_eq!(session.unanswered_count(), 2);
        session.toggle_option(1, 'A');
        assert_eq!(session.unanswered_count(), 1);
        session.toggle_option(1, 'A');
        assert_eq!(session.unanswered_count(), 2);
    }

    #[test]
    fn submit_with_gaps_needs_confirmation() {
        let mut session = session(2);
        session.toggle_option(0, 'A');

        assert_eq!(session.try_submit(), SubmitOutcome::NeedsConfirmation(1));
        assert_eq!(session.phase(), Phase::Submitting);

        session.cancel_submit();
        assert_eq!(session.phase(), Phase::Active);

        assert_eq!(session.try_submit(), SubmitOutcome::NeedsConfirmation(1));
        session.confirm_submit();
        assert_eq!(session.phase(), Phase::Graded);
    }

    #[test]
    fn submit_with_all_answered_grades_directly() {
        let mut session = session(4);
        for index in 0..session.len() {
            session.toggle_option(index, 'A');
        }
        assert_eq!(session.try_submit(), SubmitOutcome::Graded);
        assert_eq!(session.phase(), Phase::Graded);
    }
}
