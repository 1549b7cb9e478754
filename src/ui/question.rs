use crate::models::{format_number, AnswerKind};
use crate::quiz::{progress_percent, selection_hint, QuizFlow};
use crate::ui::layout::calculate_question_chunks;
use crate::ui::{key_hint, key_style};
use crate::utils::{calculate_wrapped_cursor_position, filled_cells};
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn draw_question(f: &mut Frame, flow: &mut QuizFlow) {
    let layout = calculate_question_chunks(f.area());
    let descriptor = flow.descriptor().clone();

    let mut label = format!(
        "Question {} of {}",
        descriptor.question_number, descriptor.total_questions
    );
    if let Some(hint) = selection_hint(&descriptor) {
        label.push_str(" · ");
        label.push_str(&hint);
    }
    let percent = progress_percent(&descriptor).clamp(0.0, 100.0);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Onboarding"))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(percent / 100.0)
        .label(label);
    f.render_widget(gauge, layout.header_area);

    let mut prompt = Text::default();
    prompt.push_line(Line::from(Span::styled(
        descriptor.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    if let Some(description) = &descriptor.description {
        prompt.push_line(Line::from(Span::styled(
            description.clone(),
            Style::default().fg(Color::DarkGray),
        )));
    }
    let prompt = Paragraph::new(prompt)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(prompt, layout.prompt_area);

    match &descriptor.kind {
        AnswerKind::Single { .. } | AnswerKind::Multiple { .. } => {
            draw_choices(f, flow, layout.answer_area)
        }
        AnswerKind::Text | AnswerKind::Input => draw_free_text(f, flow, layout.answer_area),
        AnswerKind::Slider {
            min, max, unit, ..
        } => draw_slider(f, flow, *min, *max, unit.as_deref(), layout.answer_area),
    }

    let next_label = descriptor
        .next_button_text
        .clone()
        .unwrap_or_else(|| "Continue".to_string());
    let next_style = if flow.can_advance() {
        key_style()
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut first = vec![Span::styled("Enter", next_style), Span::from(format!(" {}  ", next_label))];
    if flow.has_previous() {
        first.extend(key_hint("Esc", "Back  "));
    }
    first.extend(key_hint("Ctrl+S", "Skip"));

    let second = match descriptor.kind {
        AnswerKind::Single { .. } => [key_hint("↑/↓", "Move  "), key_hint("Space/1-9", "Select")].concat(),
        AnswerKind::Multiple { .. } => [key_hint("↑/↓", "Move  "), key_hint("Space/1-9", "Toggle")].concat(),
        AnswerKind::Text => [key_hint("←/→", "Move cursor  "), key_hint("Alt+Enter", "New line")].concat(),
        AnswerKind::Input => key_hint("←/→", "Move cursor"),
        AnswerKind::Slider { .. } => [
            key_hint("←/→", "Adjust  "),
            key_hint("Shift", "Fine  "),
            key_hint("PgUp/PgDn", "Jump"),
        ]
        .concat(),
    };

    let help = Paragraph::new(vec![Line::from(first), Line::from(second)])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

fn draw_choices(f: &mut Frame, flow: &QuizFlow, area: ratatui::layout::Rect) {
    let state = flow.current();
    let multiple = matches!(state.descriptor().kind, AnswerKind::Multiple { .. });

    let items: Vec<ListItem> = state
        .descriptor()
        .kind
        .options()
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let selected = state.is_selected(&option.value);
            let marker = match (multiple, selected) {
                (true, true) => "[x]",
                (true, false) => "[ ]",
                (false, true) => "(•)",
                (false, false) => "( )",
            };
            let mut style = if selected {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            if i == state.highlighted {
                style = style.add_modifier(Modifier::REVERSED);
            }

            let mut lines = vec![Line::from(Span::styled(
                format!("{} {}. {}", marker, i + 1, option.label),
                style,
            ))];
            if let Some(description) = &option.description {
                lines.push(Line::from(Span::styled(
                    format!("       {}", description),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Your Answer"));
    f.render_widget(list, area);
}

fn draw_free_text(f: &mut Frame, flow: &mut QuizFlow, area: ratatui::layout::Rect) {
    let state = flow.current_mut();
    let placeholder = state
        .descriptor()
        .placeholder
        .clone()
        .unwrap_or_else(|| "Type your answer...".to_string());

    let content = if state.text().is_empty() {
        Text::from(Span::styled(placeholder, Style::default().fg(Color::DarkGray)))
    } else {
        Text::from(state.text().to_string())
    };

    let visible_height = area.height.saturating_sub(2) as usize;
    let text_width = area.width.saturating_sub(2).max(1) as usize;
    let (cursor_line, cursor_col) =
        calculate_wrapped_cursor_position(state.text(), state.cursor_position, text_width);

    let mut scroll = state.input_scroll_y as usize;
    if cursor_line < scroll {
        scroll = cursor_line;
    } else if visible_height > 0 && cursor_line >= scroll + visible_height {
        scroll = cursor_line + 1 - visible_height;
    }
    state.input_scroll_y = scroll as u16;

    let input = Paragraph::new(content)
        .wrap(Wrap { trim: true })
        .scroll((state.input_scroll_y, 0))
        .block(Block::default().borders(Borders::ALL).title("Your Answer"));
    f.render_widget(input, area);

    let cursor_x = area.x + 1 + (cursor_col as u16).min(area.width.saturating_sub(3));
    let cursor_y = area.y + 1 + (cursor_line as u16).saturating_sub(state.input_scroll_y);
    f.set_cursor_position((cursor_x, cursor_y));
}

fn draw_slider(
    f: &mut Frame,
    flow: &QuizFlow,
    min: f64,
    max: f64,
    unit: Option<&str>,
    area: ratatui::layout::Rect,
) {
    let value = flow.current().number().unwrap_or(min);
    let unit = unit.map(|u| format!(" {}", u)).unwrap_or_default();

    let track_width = area.width.saturating_sub(4) as usize;
    let percent = if max > min {
        (value - min) / (max - min) * 100.0
    } else {
        100.0
    };
    let filled = filled_cells(percent, track_width);
    let track = format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(track_width.saturating_sub(filled))
    );

    let bounds = format!("{}{}", format_number(min), unit);
    let upper = format!("{}{}", format_number(max), unit);
    let gap = track_width.saturating_sub(bounds.chars().count() + upper.chars().count());

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{}{}", format_number(value), unit),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        Line::from(""),
        Line::from(Span::styled(track, Style::default().fg(Color::Cyan))),
        Line::from(format!("{}{}{}", bounds, " ".repeat(gap), upper)),
    ];

    let slider = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Your Answer"));
    f.render_widget(slider, area);
}
