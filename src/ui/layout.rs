use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct QuestionLayout {
    pub header_area: Rect,
    pub prompt_area: Rect,
    pub answer_area: Rect,
    pub help_area: Rect,
}

pub struct MainLayout {
    pub header_area: Rect,
    pub body_area: Rect,
    pub status_area: Rect,
    pub nav_area: Rect,
}

pub fn calculate_question_chunks(area: Rect) -> QuestionLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(5),
            Constraint::Length(4),
        ])
        .split(area);

    QuestionLayout {
        header_area: chunks[0],
        prompt_area: chunks[1],
        answer_area: chunks[2],
        help_area: chunks[3],
    }
}

pub fn calculate_main_chunks(area: Rect) -> MainLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(area);

    MainLayout {
        header_area: chunks[0],
        body_area: chunks[1],
        status_area: chunks[2],
        nav_area: chunks[3],
    }
}

/// Centered box of the given size, shrunk to fit `area`.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
