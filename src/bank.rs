use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use thiserror::Error;

/// Questions may carry more options than there are letters to label them with.
const MAX_OPTIONS: usize = 26;

#[derive(Debug, Error)]
pub enum BankError {
    #[error("failed to read question bank {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("question bank is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("question bank has no `questions` field")]
    MissingQuestions,
    #[error("question bank contains no questions")]
    Empty,
    #[error("question {position}: {problem}")]
    Invalid { position: usize, problem: String },
}

/// Question identifier as stored in the bank file, either numeric or textual.
/// Numeric ids order numerically and sort before textual ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionId {
    Number(i64),
    Text(String),
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionId::Number(n) => write!(f, "{}", n),
            QuestionId::Text(s) => f.write_str(s),
        }
    }
}

impl Ord for QuestionId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (QuestionId::Number(a), QuestionId::Number(b)) => a.cmp(b),
            (QuestionId::Text(a), QuestionId::Text(b)) => a.cmp(b),
            (QuestionId::Number(_), QuestionId::Text(_)) => Ordering::Less,
            (QuestionId::Text(_), QuestionId::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for QuestionId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'de> Deserialize<'de> for QuestionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl<'de> Visitor<'de> for IdVisitor {
            type Value = QuestionId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number or a string")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<QuestionId, E> {
                Ok(QuestionId::Number(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<QuestionId, E> {
                i64::try_from(v)
                    .map(QuestionId::Number)
                    .map_err(|_| E::custom("question id out of range"))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<QuestionId, E> {
                Ok(QuestionId::Text(v.to_owned()))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// One option of a question. `label` is the original identity used for
/// grading; `text` is what gets shown next to the checkbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: char,
    pub text: String,
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.label, self.text)
    }
}

#[derive(Debug, Clone)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<Choice>,
    pub answer: BTreeSet<char>,
}

/// The loaded bank, in file order. Shuffling is session business.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    pub questions: Vec<Question>,
}

#[derive(Deserialize)]
struct RawBank {
    questions: Option<Vec<RawQuestion>>,
}

#[derive(Deserialize)]
struct RawQuestion {
    id: Option<QuestionId>,
    question: Option<String>,
    options: Option<Vec<String>>,
    answer: Option<Vec<String>>,
}

impl QuestionBank {
    pub fn load(path: &Path) -> Result<Self, BankError> {
        let contents = fs::read_to_string(path).map_err(|source| BankError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let bank = Self::parse(&contents)?;
        log::info!("loaded {} questions from {}", bank.len(), path.display());
        Ok(bank)
    }

    pub fn parse(input: &str) -> Result<Self, BankError> {
        let raw: RawBank = serde_json::from_str(input)?;
        let raw_questions = raw.questions.ok_or(BankError::MissingQuestions)?;

        let mut questions = Vec::with_capacity(raw_questions.len());
        for (i, raw_question) in raw_questions.into_iter().enumerate() {
            questions.push(validate_question(i + 1, raw_question)?);
        }
        if questions.is_empty() {
            return Err(BankError::Empty);
        }

        Ok(QuestionBank { questions })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }
}

fn validate_question(position: usize, raw: RawQuestion) -> Result<Question, BankError> {
    let invalid = |problem: String| BankError::Invalid { position, problem };
    let missing = |field: &str| BankError::Invalid {
        position,
        problem: format!("missing required field `{}`", field),
    };

    let id = raw.id.ok_or_else(|| missing("id"))?;
    let text = raw.question.ok_or_else(|| missing("question"))?;
    let raw_options = raw.options.ok_or_else(|| missing("options"))?;
    let raw_answer = raw.answer.ok_or_else(|| missing("answer"))?;

    if raw_options.is_empty() {
        return Err(invalid("`options` is empty".to_string()));
    }
    if raw_options.len() > MAX_OPTIONS {
        return Err(invalid(format!(
            "has {} options, at most {} are supported",
            raw_options.len(),
            MAX_OPTIONS
        )));
    }

    let mut options = Vec::with_capacity(raw_options.len());
    let mut labels = BTreeSet::new();
    for raw_option in &raw_options {
        let choice = parse_option(raw_option).map_err(&invalid)?;
        if !labels.insert(choice.label) {
            return Err(invalid(format!("duplicate option label `{}`", choice.label)));
        }
        options.push(choice);
    }

    if raw_answer.is_empty() {
        return Err(invalid("`answer` is empty".to_string()));
    }
    let mut answer = BTreeSet::new();
    for entry in &raw_answer {
        let mut chars = entry.chars();
        match (chars.next(), chars.next()) {
            (Some(label), None) if labels.contains(&label) => {
                answer.insert(label);
            }
            _ => {
                return Err(invalid(format!(
                    "answer label {:?} does not match any option",
                    entry
                )))
            }
        }
    }

    Ok(Question {
        id,
        text,
        options,
        answer,
    })
}

fn parse_option(raw: &str) -> Result<Choice, String> {
    let bytes = raw.as_bytes();
    if bytes.len() < 3 || !bytes[0].is_ascii_uppercase() || bytes[1] != b'.' {
        return Err(format!(
            "option {:?} must start with a label prefix like \"A.\"",
            raw
        ));
    }
    Ok(Choice {
        label: bytes[0] as char,
        text: raw[2..].to_string(),
    })
}
