use crate::models::{Answer, QuestionDescriptor};
use crate::quiz::question::QuestionState;
use crate::quiz::QuizError;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    Completed,
    Skipped,
}

/// Linear walk through the onboarding questions.
#[derive(Debug, Clone)]
pub struct QuizFlow {
    questions: Vec<QuestionDescriptor>,
    index: usize,
    answers: BTreeMap<String, Answer>,
    current: QuestionState,
    outcome: Option<FlowOutcome>,
}

impl QuizFlow {
    /// Numbers the questions and opens the first one, seeded from `prior`.
    ///
    /// Prior answers to known questions are coerced to the current question
    /// set first, and dropped when nothing valid is left, so skipping never
    /// records an answer the questions would reject.
    pub fn new(
        mut questions: Vec<QuestionDescriptor>,
        mut prior: BTreeMap<String, Answer>,
    ) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }

        let total = questions.len();
        for (i, question) in questions.iter_mut().enumerate() {
            question.question_number = i + 1;
            question.total_questions = total;
        }

        for question in &questions {
            let Some(answer) = prior.remove(&question.id) else {
                continue;
            };
            let seeded = QuestionState::seed(question, Some(&answer));
            if seeded.is_valid() {
                prior.insert(question.id.clone(), seeded.answer().clone());
            }
        }

        let current = QuestionState::seed(&questions[0], prior.get(&questions[0].id));

        Ok(Self {
            questions,
            index: 0,
            answers: prior,
            current,
            outcome: None,
        })
    }

    pub fn current(&self) -> &QuestionState {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut QuestionState {
        &mut self.current
    }

    pub fn descriptor(&self) -> &QuestionDescriptor {
        &self.questions[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[QuestionDescriptor] {
        &self.questions
    }

    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    pub fn can_advance(&self) -> bool {
        self.outcome.is_none() && self.current.is_valid()
    }

    pub fn outcome(&self) -> Option<FlowOutcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn answers(&self) -> &BTreeMap<String, Answer> {
        &self.answers
    }

    pub fn into_answers(self) -> BTreeMap<String, Answer> {
        self.answers
    }

    /// Records the current answer and moves on. Returns `false` without
    /// touching anything when the answer is not valid yet.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }

        let id = self.descriptor().id.clone();
        self.answers.insert(id, self.current.answer().clone());

        if self.index + 1 >= self.questions.len() {
            self.outcome = Some(FlowOutcome::Completed);
        } else {
            self.index += 1;
            self.open_current();
        }
        true
    }

    /// Goes back one question, discarding unsubmitted edits on this one.
    pub fn retreat(&mut self) -> bool {
        if !self.has_previous() || self.is_finished() {
            return false;
        }
        self.index -= 1;
        self.open_current();
        true
    }

    pub fn skip(&mut self) {
        self.outcome = Some(FlowOutcome::Skipped);
    }

    fn open_current(&mut self) {
        let descriptor = &self.questions[self.index];
        self.current = QuestionState::seed(descriptor, self.answers.get(&descriptor.id));
    }
}
