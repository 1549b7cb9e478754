use crate::app::App;
use crate::models::{Answer, QuestionDescriptor};
use crate::ui::key_hint;
use crate::utils::truncate_string;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Answer text as the user saw it: option values become their labels.
fn answer_label(question: &QuestionDescriptor, answer: &Answer) -> String {
    let options = question.kind.options();
    match answer {
        Answer::Selections(values) if !options.is_empty() => values
            .iter()
            .map(|value| {
                options
                    .iter()
                    .find(|o| &o.value == value)
                    .map(|o| o.label.clone())
                    .unwrap_or_else(|| value.clone())
            })
            .collect::<Vec<_>>()
            .join(", "),
        Answer::Number(_) => match &question.kind {
            crate::models::AnswerKind::Slider { unit: Some(unit), .. } => {
                format!("{} {}", answer.display(), unit)
            }
            _ => answer.display(),
        },
        _ => answer.display(),
    }
}

pub fn draw_onboarding_summary(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new("You're all set!")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let width = chunks[1].width.saturating_sub(4) as usize;
    let answers = &app.profile().answers;
    let mut text = Text::default();
    for question in app.questions() {
        let value = answers
            .get(&question.id)
            .map(|answer| answer_label(question, answer))
            .filter(|value| !value.trim().is_empty());

        text.push_line(Line::from(Span::styled(
            truncate_string(&question.title, width),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        match value {
            Some(value) => text.push_line(Line::from(format!("  {}", value))),
            None => text.push_line(Line::from(Span::styled(
                "  (no answer)",
                Style::default().fg(Color::DarkGray),
            ))),
        }
    }

    let body = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Your answers"));
    f.render_widget(body, chunks[1]);

    let help = Paragraph::new(Line::from(
        [key_hint("Enter", "Continue  "), key_hint("r", "Redo onboarding")].concat(),
    ))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnswerKind, ChoiceOption};

    fn question(kind: AnswerKind) -> QuestionDescriptor {
        QuestionDescriptor {
            id: "q".to_string(),
            title: "Q".to_string(),
            description: None,
            placeholder: None,
            next_button_text: None,
            kind,
            question_number: 1,
            total_questions: 1,
        }
    }

    #[test]
    fn test_answer_label_maps_option_values() {
        let q = question(AnswerKind::Multiple {
            options: vec![
                ChoiceOption::new("sleep", "Sleep better"),
                ChoiceOption::new("stress", "Reduce stress"),
            ],
            max_selections: Some(2),
        });
        let answer = Answer::Selections(vec!["stress".to_string(), "sleep".to_string()]);
        assert_eq!(answer_label(&q, &answer), "Reduce stress, Sleep better");
    }

    #[test]
    fn test_answer_label_appends_unit() {
        let q = question(AnswerKind::Slider {
            min: 40.0,
            max: 150.0,
            step: 0.5,
            unit: Some("kg".to_string()),
        });
        assert_eq!(answer_label(&q, &Answer::Number(72.5)), "72.5 kg");
    }
}
