use crate::models::{Answer, AnswerKind, QuestionDescriptor};

/// Fine step for kilogram sliders (one 100 g notch of the weight wheel).
pub const KG_FINE_STEP: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    Rejected,
}

/// Answer being edited for the question currently on screen.
#[derive(Debug, Clone)]
pub struct QuestionState {
    descriptor: QuestionDescriptor,
    answer: Answer,
    /// Byte offset into a free-text answer.
    pub cursor_position: usize,
    /// Option under the cursor for choice questions.
    pub highlighted: usize,
    pub input_scroll_y: u16,
}

impl QuestionState {
    /// Seeds the editable answer from a previously recorded one, coercing it
    /// to the shape the question expects.
    pub fn seed(descriptor: &QuestionDescriptor, prior: Option<&Answer>) -> Self {
        let answer = match (&descriptor.kind, prior) {
            (AnswerKind::Slider { min, max, .. }, Some(Answer::Number(n))) if !n.is_nan() => {
                Answer::Number(n.max(*min).min(*max))
            }
            (AnswerKind::Slider { min, .. }, _) => Answer::Number(*min),
            (
                AnswerKind::Multiple {
                    options,
                    max_selections,
                },
                Some(Answer::Selections(values)),
            ) => {
                let mut kept: Vec<String> = Vec::new();
                for value in values {
                    if options.iter().any(|o| &o.value == value) && !kept.contains(value) {
                        kept.push(value.clone());
                    }
                }
                if let Some(max) = max_selections {
                    kept.truncate(*max);
                }
                Answer::Selections(kept)
            }
            (AnswerKind::Multiple { .. }, _) => Answer::Selections(Vec::new()),
            (AnswerKind::Single { options }, Some(Answer::Text(value)))
                if options.iter().any(|o| &o.value == value) =>
            {
                Answer::Text(value.clone())
            }
            (AnswerKind::Text | AnswerKind::Input, Some(Answer::Text(text))) => {
                Answer::Text(text.clone())
            }
            (AnswerKind::Single { .. } | AnswerKind::Text | AnswerKind::Input, _) => {
                Answer::Text(String::new())
            }
        };

        let cursor_position = match &answer {
            Answer::Text(text) if descriptor.kind.is_free_text() => text.len(),
            _ => 0,
        };

        let highlighted = match &answer {
            Answer::Text(value) => descriptor
                .kind
                .options()
                .iter()
                .position(|o| &o.value == value)
                .unwrap_or(0),
            _ => 0,
        };

        Self {
            descriptor: descriptor.clone(),
            answer,
            cursor_position,
            highlighted,
            input_scroll_y: 0,
        }
    }

    pub fn descriptor(&self) -> &QuestionDescriptor {
        &self.descriptor
    }

    pub fn answer(&self) -> &Answer {
        &self.answer
    }

    pub fn into_answer(self) -> Answer {
        self.answer
    }

    pub fn text(&self) -> &str {
        match &self.answer {
            Answer::Text(text) => text,
            Answer::Selections(_) | Answer::Number(_) => "",
        }
    }

    pub fn number(&self) -> Option<f64> {
        match self.answer {
            Answer::Number(n) => Some(n),
            Answer::Text(_) | Answer::Selections(_) => None,
        }
    }

    pub fn is_selected(&self, value: &str) -> bool {
        match &self.answer {
            Answer::Text(selected) => self.descriptor.kind.is_choice() && selected == value,
            Answer::Selections(values) => values.iter().any(|v| v == value),
            Answer::Number(_) => false,
        }
    }

    pub fn selection_count(&self) -> usize {
        match &self.answer {
            Answer::Selections(values) => values.len(),
            Answer::Text(_) | Answer::Number(_) => 0,
        }
    }

    /// Replaces a single-choice answer. Unknown values and other question
    /// kinds are ignored.
    pub fn select(&mut self, value: &str) -> bool {
        let AnswerKind::Single { options } = &self.descriptor.kind else {
            return false;
        };
        if !options.iter().any(|o| o.value == value) {
            return false;
        }
        self.answer = Answer::Text(value.to_string());
        true
    }

    pub fn toggle(&mut self, value: &str) -> ToggleOutcome {
        let AnswerKind::Multiple {
            options,
            max_selections,
        } = &self.descriptor.kind
        else {
            return ToggleOutcome::Rejected;
        };
        if !options.iter().any(|o| o.value == value) {
            return ToggleOutcome::Rejected;
        }
        let Answer::Selections(values) = &mut self.answer else {
            return ToggleOutcome::Rejected;
        };

        if let Some(pos) = values.iter().position(|v| v == value) {
            values.remove(pos);
            return ToggleOutcome::Removed;
        }

        if let Some(max) = max_selections
            && values.len() >= *max
        {
            return ToggleOutcome::Rejected;
        }

        values.push(value.to_string());
        ToggleOutcome::Added
    }

    /// Selects (single) or toggles (multiple) the highlighted option.
    pub fn activate_highlighted(&mut self) -> Option<ToggleOutcome> {
        let value = self
            .descriptor
            .kind
            .options()
            .get(self.highlighted)?
            .value
            .clone();
        match self.descriptor.kind {
            AnswerKind::Single { .. } => self.select(&value).then_some(ToggleOutcome::Added),
            AnswerKind::Multiple { .. } => Some(self.toggle(&value)),
            AnswerKind::Text | AnswerKind::Input | AnswerKind::Slider { .. } => None,
        }
    }

    pub fn highlight_next(&mut self) {
        let len = self.descriptor.kind.options().len();
        if self.highlighted + 1 < len {
            self.highlighted += 1;
        }
    }

    pub fn highlight_previous(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(1);
    }

    pub fn set_text(&mut self, text: &str) {
        if !self.descriptor.kind.is_free_text() {
            return;
        }
        self.answer = Answer::Text(text.to_string());
        self.cursor_position = text.len();
    }

    pub fn insert_char(&mut self, c: char) {
        if !self.descriptor.kind.is_free_text() {
            return;
        }
        if let Answer::Text(text) = &mut self.answer {
            let at = self.cursor_position.min(text.len());
            text.insert(at, c);
            self.cursor_position = at + c.len_utf8();
        }
    }

    pub fn backspace(&mut self) {
        if !self.descriptor.kind.is_free_text() {
            return;
        }
        if let Answer::Text(text) = &mut self.answer {
            let at = self.cursor_position.min(text.len());
            let previous = text[..at].char_indices().next_back().map(|(idx, _)| idx);
            if let Some(idx) = previous {
                text.remove(idx);
                self.cursor_position = idx;
            }
        }
    }

    pub fn cursor_left(&mut self) {
        let text = self.text();
        let at = self.cursor_position.min(text.len());
        self.cursor_position = text[..at]
            .char_indices()
            .next_back()
            .map(|(idx, _)| idx)
            .unwrap_or(0);
    }

    pub fn cursor_right(&mut self) {
        let text = self.text();
        let at = self.cursor_position.min(text.len());
        self.cursor_position = text[at..]
            .chars()
            .next()
            .map(|c| at + c.len_utf8())
            .unwrap_or(text.len());
    }

    pub fn cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor_position = self.text().len();
    }

    /// Sets a slider value, clamped to the question's bounds.
    pub fn set_number(&mut self, value: f64) {
        if let AnswerKind::Slider { min, max, .. } = self.descriptor.kind
            && !value.is_nan()
        {
            self.answer = Answer::Number(round_to_step_precision(value.max(min).min(max)));
        }
    }

    /// Moves a slider by `steps` notches. Kilogram sliders support a fine
    /// 0.1 kg notch.
    pub fn step_number(&mut self, steps: i32, fine: bool) {
        let AnswerKind::Slider { min, step, unit, .. } = &self.descriptor.kind else {
            return;
        };
        let notch = if fine && unit.as_deref() == Some("kg") {
            KG_FINE_STEP
        } else {
            *step
        };
        let current = self.number().unwrap_or(*min);
        self.set_number(current + notch * f64::from(steps));
    }

    pub fn set_to_min(&mut self) {
        if let AnswerKind::Slider { min, .. } = self.descriptor.kind {
            self.set_number(min);
        }
    }

    pub fn set_to_max(&mut self) {
        if let AnswerKind::Slider { max, .. } = self.descriptor.kind {
            self.set_number(max);
        }
    }

    /// Whether the current answer may be submitted.
    pub fn is_valid(&self) -> bool {
        match (&self.descriptor.kind, &self.answer) {
            (AnswerKind::Multiple { .. }, Answer::Selections(values)) => !values.is_empty(),
            (AnswerKind::Slider { .. }, Answer::Number(n)) => !n.is_nan(),
            (AnswerKind::Single { .. } | AnswerKind::Text | AnswerKind::Input, Answer::Text(text)) => {
                !text.trim().is_empty()
            }
            _ => false,
        }
    }
}

fn round_to_step_precision(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

/// Hint shown next to the question counter, e.g. "pick up to 2 answers".
pub fn selection_hint(descriptor: &QuestionDescriptor) -> Option<String> {
    let hint = match &descriptor.kind {
        AnswerKind::Slider { .. } => return None,
        AnswerKind::Single { .. } => "pick one answer".to_string(),
        AnswerKind::Multiple {
            max_selections: Some(1),
            ..
        } => "pick one answer".to_string(),
        AnswerKind::Multiple {
            max_selections: Some(max),
            ..
        } => format!("pick up to {} answers", max),
        AnswerKind::Multiple {
            max_selections: None,
            ..
        } => "pick all that apply".to_string(),
        AnswerKind::Text | AnswerKind::Input => String::new(),
    };

    let most_present = descriptor
        .description
        .as_deref()
        .is_some_and(|d| d.contains("most present"));

    match (hint.is_empty(), most_present) {
        (true, false) => None,
        (true, true) => Some("that are the most present".to_string()),
        (false, true) => Some(format!("{} that are the most present", hint)),
        (false, false) => Some(hint),
    }
}

/// Share of the flow completed when this question is shown, in percent.
pub fn progress_percent(descriptor: &QuestionDescriptor) -> f64 {
    if descriptor.question_number > 0 && descriptor.total_questions > 0 {
        descriptor.question_number as f64 / descriptor.total_questions as f64 * 100.0
    } else {
        10.0
    }
}
