//! Static quiz catalog
//!
//! The nine orientation quizzes, their deterministic link ids, and lookups.
//! A broken catalog (duplicate ids, gaps in the numbering) is a configuration
//! error and is rejected when the catalog is built.

use crate::types::{Quiz, QuizLink, QuizNumber, TOTAL_QUIZZES};

/// Options offered per question
pub const OPTIONS_PER_QUIZ: usize = 4;

/// Maximum length of a generated quiz id
const HASH_MAX_LEN: usize = 12;

/// Passphrase announced at every station after the first
const STATION_PASSPHRASE: &str = "nishant";

/// Errors detected while building a catalog
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CatalogError {
    #[error("Quiz id {id} is shared by quizzes {first} and {second}")]
    DuplicateId {
        id: String,
        first: QuizNumber,
        second: QuizNumber,
    },

    #[error("Quiz at position {position} has number {found}, expected {expected}")]
    OutOfOrder {
        position: usize,
        expected: QuizNumber,
        found: QuizNumber,
    },

    #[error("Quiz {0} must have exactly 4 options")]
    OptionCount(QuizNumber),

    #[error("Quiz {0} has a correct answer index outside its options")]
    AnswerOutOfRange(QuizNumber),

    #[error("Catalog is empty")]
    Empty,
}

/// Deterministic, non-cryptographic quiz id.
///
/// Folds every UTF-16 code unit into a wrapping 32-bit signed accumulator
/// (`hash * 31 + unit`), takes the absolute value and renders it in base 36,
/// truncated to 12 characters.
pub fn generate_hash(input: &str) -> String {
    let hash = input.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_mul(31).wrapping_add(i32::from(unit))
    });
    let mut hash = i64::from(hash).unsigned_abs();

    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut out = Vec::new();
    loop {
        out.push(DIGITS[(hash % 36) as usize]);
        hash /= 36;
        if hash == 0 {
            break;
        }
    }
    out.reverse();
    out.truncate(HASH_MAX_LEN);
    // base-36 digits are ASCII
    String::from_utf8_lossy(&out).into_owned()
}

#[derive(Debug, Clone)]
pub struct Catalog {
    quizzes: Vec<Quiz>,
}

impl Catalog {
    /// Build a catalog, checking that ids are unique and quiz numbers run
    /// 1..=N in array order.
    pub fn new(quizzes: Vec<Quiz>) -> Result<Self, CatalogError> {
        if quizzes.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen: Vec<(&str, QuizNumber)> = Vec::with_capacity(quizzes.len());
        for (position, quiz) in quizzes.iter().enumerate() {
            let expected = position as QuizNumber + 1;
            if quiz.quiz_number != expected {
                return Err(CatalogError::OutOfOrder {
                    position,
                    expected,
                    found: quiz.quiz_number,
                });
            }
            if quiz.options.len() != OPTIONS_PER_QUIZ {
                return Err(CatalogError::OptionCount(quiz.quiz_number));
            }
            if quiz.correct_answer >= quiz.options.len() {
                return Err(CatalogError::AnswerOutOfRange(quiz.quiz_number));
            }
            if let Some((_, first)) = seen.iter().find(|(id, _)| *id == quiz.id) {
                return Err(CatalogError::DuplicateId {
                    id: quiz.id.clone(),
                    first: *first,
                    second: quiz.quiz_number,
                });
            }
            seen.push((quiz.id.as_str(), quiz.quiz_number));
        }

        Ok(Self { quizzes })
    }

    /// The built-in orientation hunt
    pub fn orientation() -> Result<Self, CatalogError> {
        Self::new(orientation_quizzes())
    }

    pub fn quizzes(&self) -> &[Quiz] {
        &self.quizzes
    }

    pub fn len(&self) -> usize {
        self.quizzes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quizzes.is_empty()
    }

    /// Exact-match lookup by opaque id
    pub fn get_quiz_by_id(&self, id: &str) -> Option<&Quiz> {
        self.quizzes.iter().find(|q| q.id == id)
    }

    pub fn get_quiz_by_number(&self, quiz_number: QuizNumber) -> Option<&Quiz> {
        self.quizzes.iter().find(|q| q.quiz_number == quiz_number)
    }

    /// One link per quiz, in catalog order
    pub fn get_all_quiz_links(&self) -> Vec<QuizLink> {
        self.quizzes
            .iter()
            .map(|quiz| QuizLink {
                quiz_number: quiz.quiz_number,
                id: quiz.id.clone(),
                link: quiz.link(),
            })
            .collect()
    }
}

struct QuizSeed {
    question: &'static str,
    options: [&'static str; OPTIONS_PER_QUIZ],
    correct_answer: usize,
    hint: &'static str,
    next_qr_location: &'static str,
}

const ORIENTATION: [QuizSeed; TOTAL_QUIZZES] = [
    QuizSeed {
        question: "What year was our college founded?",
        options: ["1995", "2000", "1985", "2005"],
        correct_answer: 2,
        hint: "Find the statue near the main entrance",
        next_qr_location: "Main Entrance Statue",
    },
    QuizSeed {
        question: "How many buildings are in the main campus?",
        options: ["12", "15", "18", "20"],
        correct_answer: 1,
        hint: "Check the library information desk",
        next_qr_location: "Library Information Desk",
    },
    QuizSeed {
        question: "What is the name of our college magazine?",
        options: ["Campus Voice", "The Chronicle", "Student Times", "College Pulse"],
        correct_answer: 0,
        hint: "Visit the student center bulletin board",
        next_qr_location: "Student Center Bulletin Board",
    },
    QuizSeed {
        question: "In which year did the college get accreditation?",
        options: ["2010", "2012", "2015", "2018"],
        correct_answer: 2,
        hint: "Look near the principal's office",
        next_qr_location: "Principal's Office Area",
    },
    QuizSeed {
        question: "What is the college's motto?",
        options: [
            "Excellence in Education",
            "Knowledge is Power",
            "Unity and Progress",
            "Wisdom and Virtue",
        ],
        correct_answer: 2,
        hint: "Check the main auditorium entrance",
        next_qr_location: "Main Auditorium Entrance",
    },
    QuizSeed {
        question: "How many sports facilities does the college have?",
        options: ["5", "7", "9", "11"],
        correct_answer: 1,
        hint: "Visit the sports complex office",
        next_qr_location: "Sports Complex Office",
    },
    QuizSeed {
        question: "What is the capacity of the main auditorium?",
        options: ["500", "750", "1000", "1250"],
        correct_answer: 2,
        hint: "Check the cafeteria notice board",
        next_qr_location: "Cafeteria Notice Board",
    },
    QuizSeed {
        question: "How many clubs are active in the college?",
        options: ["20", "25", "30", "35"],
        correct_answer: 2,
        hint: "Visit the student activities office",
        next_qr_location: "Student Activities Office",
    },
    QuizSeed {
        question: "What is the name of the college's annual fest?",
        options: ["Techfest", "Culturefest", "Innovate", "Spectrum"],
        correct_answer: 3,
        hint: "Return to the orientation hall with all pieces",
        next_qr_location: "Orientation Hall",
    },
];

fn orientation_quizzes() -> Vec<Quiz> {
    ORIENTATION
        .iter()
        .enumerate()
        .map(|(i, seed)| {
            let quiz_number = i as QuizNumber + 1;
            Quiz {
                id: generate_hash(&format!("quiz-{}-orientation-2025", quiz_number)),
                quiz_number,
                question: seed.question.to_string(),
                options: seed.options.iter().map(|o| o.to_string()).collect(),
                correct_answer: seed.correct_answer,
                puzzle_image_url: format!(
                    "/puzzle-piece-{}-of-{}.jpg",
                    quiz_number, TOTAL_QUIZZES
                ),
                hint: seed.hint.to_string(),
                next_qr_location: seed.next_qr_location.to_string(),
                unlock_password: if quiz_number == 1 {
                    String::new()
                } else {
                    STATION_PASSPHRASE.to_string()
                },
            }
        })
        .collect()
}
