use crate::models::{AnswerKind, ChoiceOption, QuestionDescriptor};
use crate::quiz::QuizError;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

fn question(id: &str, title: &str, kind: AnswerKind) -> QuestionDescriptor {
    QuestionDescriptor {
        id: id.to_string(),
        title: title.to_string(),
        description: None,
        placeholder: None,
        next_button_text: None,
        kind,
        question_number: 0,
        total_questions: 0,
    }
}

fn options(pairs: &[(&str, &str)]) -> Vec<ChoiceOption> {
    pairs
        .iter()
        .map(|(value, label)| ChoiceOption::new(value, label))
        .collect()
}

/// Built-in onboarding questionnaire.
pub fn default_questions() -> Vec<QuestionDescriptor> {
    let mut name = question("name", "What should we call you?", AnswerKind::Input);
    name.placeholder = Some("Enter your name".to_string());

    let mut goals = question(
        "goals",
        "What are your main health goals?",
        AnswerKind::Multiple {
            options: options(&[
                ("sleep", "Sleep better"),
                ("stress", "Reduce stress"),
                ("weight", "Manage my weight"),
                ("strength", "Build strength"),
                ("nutrition", "Eat healthier"),
                ("mindfulness", "Be more mindful"),
            ]),
            max_selections: Some(2),
        },
    );
    goals.description = Some("Choose what matters most to you right now.".to_string());

    let activity = question(
        "activity_level",
        "How active are you on a typical day?",
        AnswerKind::Single {
            options: options(&[
                ("sedentary", "Mostly sitting"),
                ("light", "Lightly active"),
                ("moderate", "Moderately active"),
                ("very", "Very active"),
            ]),
        },
    );

    let weight = question(
        "weight",
        "What is your current weight?",
        AnswerKind::Slider {
            min: 40.0,
            max: 150.0,
            step: 1.0,
            unit: Some("kg".to_string()),
        },
    );

    let height = question(
        "height",
        "How tall are you?",
        AnswerKind::Slider {
            min: 120.0,
            max: 220.0,
            step: 1.0,
            unit: Some("cm".to_string()),
        },
    );

    let mut symptoms = question(
        "stress_symptoms",
        "How does stress show up for you?",
        AnswerKind::Multiple {
            options: options(&[
                ("sleep", "Trouble sleeping"),
                ("focus", "Difficulty focusing"),
                ("tension", "Muscle tension"),
                ("irritability", "Irritability"),
                ("fatigue", "Fatigue"),
            ]),
            max_selections: None,
        },
    );
    symptoms.description = Some("Select the symptoms most present in your daily life.".to_string());

    let experience = question(
        "mindfulness_experience",
        "Have you practiced mindfulness before?",
        AnswerKind::Single {
            options: options(&[
                ("never", "Never"),
                ("tried", "I have tried it"),
                ("regular", "I practice regularly"),
            ]),
        },
    );

    let mut notes = question("notes", "Anything else we should know?", AnswerKind::Text);
    notes.placeholder = Some("Type your answer...".to_string());
    notes.next_button_text = Some("Finish".to_string());

    vec![
        name, goals, activity, weight, height, symptoms, experience, notes,
    ]
}

/// Reads a JSON array of question descriptors.
pub fn load_questions(path: &Path) -> Result<Vec<QuestionDescriptor>, QuizError> {
    let content = fs::read_to_string(path)?;
    let questions: Vec<QuestionDescriptor> = serde_json::from_str(&content)?;
    validate_questions(&questions)?;
    Ok(questions)
}

pub fn validate_questions(questions: &[QuestionDescriptor]) -> Result<(), QuizError> {
    if questions.is_empty() {
        return Err(QuizError::NoQuestions);
    }

    let mut seen = HashSet::new();
    for q in questions {
        if !seen.insert(q.id.as_str()) {
            return Err(QuizError::DuplicateId(q.id.clone()));
        }

        match &q.kind {
            AnswerKind::Single { options } if options.is_empty() => {
                return Err(QuizError::MissingOptions(q.id.clone()));
            }
            AnswerKind::Multiple {
                options,
                max_selections,
            } => {
                if options.is_empty() {
                    return Err(QuizError::MissingOptions(q.id.clone()));
                }
                if *max_selections == Some(0) {
                    return Err(QuizError::InvalidMaxSelections(q.id.clone()));
                }
            }
            AnswerKind::Slider { min, max, step, .. } => {
                if min.is_nan() || max.is_nan() || min > max {
                    return Err(QuizError::InvalidBounds(q.id.clone()));
                }
                if step.is_nan() || *step <= 0.0 {
                    return Err(QuizError::InvalidStep(q.id.clone()));
                }
            }
            AnswerKind::Single { .. } | AnswerKind::Text | AnswerKind::Input => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_questions_are_valid() {
        let questions = default_questions();
        assert!(validate_questions(&questions).is_ok());
        assert!(questions.iter().any(|q| q.id == "weight"));
    }

    #[test]
    fn test_load_questions_from_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("questions.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"[
                {{"id": "goals", "title": "Goals?", "type": "multiple", "maxSelections": 2,
                  "options": [{{"value": "a", "label": "A"}}, {{"value": "b", "label": "B"}}]}},
                {{"id": "weight", "title": "Weight?", "type": "slider", "min": 40, "max": 150, "unit": "kg"}},
                {{"id": "notes", "title": "Notes?", "type": "text", "nextButtonText": "Done"}}
            ]"#
        )
        .unwrap();

        let questions = load_questions(&path).unwrap();
        assert_eq!(questions.len(), 3);
        assert_eq!(
            questions[0].kind,
            AnswerKind::Multiple {
                options: vec![ChoiceOption::new("a", "A"), ChoiceOption::new("b", "B")],
                max_selections: Some(2),
            }
        );
        assert_eq!(
            questions[1].kind,
            AnswerKind::Slider {
                min: 40.0,
                max: 150.0,
                step: 1.0,
                unit: Some("kg".to_string()),
            }
        );
        assert_eq!(questions[2].next_button_text.as_deref(), Some("Done"));
    }

    #[test]
    fn test_validation_errors() {
        let mut dup = default_questions();
        dup[1].id = dup[0].id.clone();
        assert!(matches!(
            validate_questions(&dup),
            Err(QuizError::DuplicateId(_))
        ));

        let no_options = vec![question("q", "Q?", AnswerKind::Single { options: vec![] })];
        assert!(matches!(
            validate_questions(&no_options),
            Err(QuizError::MissingOptions(_))
        ));

        let bad_bounds = vec![question(
            "q",
            "Q?",
            AnswerKind::Slider {
                min: 10.0,
                max: 1.0,
                step: 1.0,
                unit: None,
            },
        )];
        assert!(matches!(
            validate_questions(&bad_bounds),
            Err(QuizError::InvalidBounds(_))
        ));

        let bad_step = vec![question(
            "q",
            "Q?",
            AnswerKind::Slider {
                min: 1.0,
                max: 10.0,
                step: 0.0,
                unit: None,
            },
        )];
        assert!(matches!(
            validate_questions(&bad_step),
            Err(QuizError::InvalidStep(_))
        ));

        assert!(matches!(validate_questions(&[]), Err(QuizError::NoQuestions)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = load_questions(&temp_dir.path().join("missing.json"));
        assert!(matches!(result, Err(QuizError::Io(_))));
    }
}
