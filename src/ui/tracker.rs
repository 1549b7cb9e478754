use crate::tracker::MindfulnessTracker;
use crate::ui::key_hint;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw_tracker_index(f: &mut Frame, tracker: &MindfulnessTracker, area: Rect) {
    let lines = vec![
        Line::from(vec![
            Span::styled("Mindfulness", Style::default().add_modifier(Modifier::BOLD)),
            Span::from(format!(
                "  {} / {} minutes",
                tracker.total_minutes(),
                tracker.daily_goal()
            )),
        ]),
        Line::from(""),
        Line::from([key_hint("Enter", "Open  "), key_hint("m", "Mindfulness")].concat()),
    ];

    let body = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Trackers"));
    f.render_widget(body, area);
}
