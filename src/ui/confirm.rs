use crate::ui::key_style;
use crate::ui::layout::centered_rect;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn draw_quit_confirmation(f: &mut Frame) {
    let area = centered_rect(44, 7, f.area());
    f.render_widget(Clear, area);

    let text = vec![
        Line::from(""),
        Line::from("Your progress is saved."),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "y",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::from(" Yes  "),
            Span::styled(
                "n",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::from(" No  "),
            Span::styled("Ctrl+C", key_style()),
            Span::from(" Exit"),
        ]),
    ];

    let dialog = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Quit Health Tracker?")
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(dialog, area);
}
