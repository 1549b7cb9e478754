use crate::nav::{is_active, NAVIGATION_ITEMS};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Bottom navigation bar. At most one item lights up.
pub fn draw_nav_bar(f: &mut Frame, pathname: &str, area: Rect) {
    let block = Block::default().borders(Borders::TOP);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let constraints = vec![Constraint::Ratio(1, NAVIGATION_ITEMS.len() as u32); NAVIGATION_ITEMS.len()];
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(inner);

    for (item, cell) in NAVIGATION_ITEMS.iter().zip(cells.iter()) {
        let style = if is_active(item, pathname) {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(Color::Gray)
        };
        let label = format!("{} {} ({})", item.icon.glyph(), item.name, item.shortcut);
        f.render_widget(
            Paragraph::new(label).style(style).alignment(Alignment::Center),
            *cell,
        );
    }
}
