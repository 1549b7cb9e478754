use crate::app::App;
use crate::models::{Answer, OnboardingStatus};
use crate::ui::{key_hint, key_style};
use crate::utils::format_day;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw_dashboard(f: &mut Frame, app: &App, area: Rect) {
    let profile = app.profile();
    let tracker = app.mindfulness();

    let greeting = match profile.answers.get("name") {
        Some(Answer::Text(name)) if !name.trim().is_empty() => format!("Welcome back, {}!", name.trim()),
        _ => "Welcome back!".to_string(),
    };

    let mut text = Text::default();
    text.push_line(Line::from(Span::styled(
        greeting,
        Style::default().add_modifier(Modifier::BOLD),
    )));
    text.push_line(Line::from(Span::styled(
        format_day(tracker.date()),
        Style::default().fg(Color::DarkGray),
    )));
    text.push_line(Line::from(""));

    let mindful = if tracker.is_loading() {
        "Mindfulness: loading...".to_string()
    } else {
        format!(
            "Mindfulness: {} / {} minutes today ({:.0}%)",
            tracker.total_minutes(),
            tracker.daily_goal(),
            tracker.progress_percent()
        )
    };
    text.push_line(Line::from(mindful));

    if let Some(code) = profile
        .referral
        .as_ref()
        .and_then(|r| r.referral_code.as_deref())
    {
        text.push_line(Line::from(vec![
            Span::from("Referral code: "),
            Span::styled(code.to_string(), key_style()),
        ]));
    }

    text.push_line(Line::from(""));
    match profile.onboarding {
        OnboardingStatus::Completed => {
            text.push_line(Line::from(key_hint("o", "Update your onboarding answers")));
        }
        OnboardingStatus::Skipped | OnboardingStatus::NotStarted => {
            text.push_line(Line::from(Span::styled(
                "You skipped onboarding. Personalize your plan any time.",
                Style::default().fg(Color::Yellow),
            )));
            text.push_line(Line::from(key_hint("o", "Start onboarding")));
        }
    }

    let body = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Today"));
    f.render_widget(body, area);
}
