use crate::tracker::MindfulnessTracker;
use crate::ui::{key_hint, key_style};
use crate::utils::{filled_cells, format_entry_time};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph},
    Frame,
};

pub fn draw_mindfulness(f: &mut Frame, tracker: &MindfulnessTracker, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(8),
            Constraint::Min(3),
        ])
        .split(area);

    draw_progress(f, tracker, chunks[0]);
    draw_form(f, tracker, chunks[1]);
    draw_history(f, tracker, chunks[2]);
}

fn draw_progress(f: &mut Frame, tracker: &MindfulnessTracker, area: Rect) {
    let label = if tracker.is_loading() {
        "Loading...".to_string()
    } else {
        format!(
            "{} / {} minutes",
            tracker.total_minutes(),
            tracker.daily_goal()
        )
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Daily Progress"))
        .gauge_style(Style::default().fg(Color::Indexed(99)))
        .ratio(tracker.progress_percent().clamp(0.0, 100.0) / 100.0)
        .label(label);
    f.render_widget(gauge, area);
}

fn draw_form(f: &mut Frame, tracker: &MindfulnessTracker, area: Rect) {
    let activity = tracker
        .activity()
        .map(|a| a.label.clone())
        .unwrap_or_else(|| "-".to_string());

    let slider_width = 20;
    let percent = f64::from(tracker.minutes()) / f64::from(tracker.max_minutes()) * 100.0;
    let filled = filled_cells(percent, slider_width);
    let slider = format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(slider_width - filled)
    );

    let mut picks = vec![Span::from("Quick:    ")];
    for (i, minutes) in tracker.quick_picks().iter().enumerate() {
        let style = if *minutes == tracker.minutes() {
            Style::default()
                .fg(Color::Indexed(99))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        picks.push(Span::styled(format!("[{}] {} min", i + 1, minutes), style));
        picks.push(Span::from("  "));
    }

    let button = if tracker.is_saving() {
        Span::styled("  Saving...  ", Style::default().fg(Color::DarkGray))
    } else if tracker.can_log() {
        Span::styled(
            "[ Log Practice ]",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Indexed(99))
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled("[ Log Practice ]", Style::default().fg(Color::DarkGray))
    };

    let mut action = vec![button, Span::from("  ")];
    action.extend(
        [
            key_hint("Enter", "Log  "),
            key_hint("←/→", "Minutes  "),
            key_hint("↑/↓", "Activity  "),
            key_hint("Esc", "Back"),
        ]
        .concat(),
    );

    let mut lines = vec![
        Line::from(vec![
            Span::from("Activity: "),
            Span::styled(format!("◂ {} ▸", activity), key_style()),
        ]),
        Line::from(vec![
            Span::from("Duration: "),
            Span::styled(
                format!("{:>3} min ", tracker.minutes()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(slider, Style::default().fg(Color::Indexed(99))),
        ]),
        Line::from(picks),
        Line::from(""),
        Line::from(action),
    ];

    if let Some(error) = tracker.last_error() {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )));
    }

    let form = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Log Practice"));
    f.render_widget(form, area);
}

fn draw_history(f: &mut Frame, tracker: &MindfulnessTracker, area: Rect) {
    let items: Vec<ListItem> = tracker
        .history()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    tracker.activity_label(&entry.activity),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::from(format!("  {} minutes  ", entry.minutes)),
                Span::styled(
                    format_entry_time(&entry.timestamp),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let block = Block::default().borders(Borders::ALL).title("Today's Practices");
    if items.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No practices logged yet today.",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        f.render_widget(empty, area);
    } else {
        f.render_widget(List::new(items).block(block), area);
    }
}
