pub mod layout;
mod confirm;
mod dashboard;
mod mindfulness;
mod nav;
mod question;
mod referral;
mod summary;
mod tracker;

use crate::app::App;
use crate::models::AppState;
use crate::nav as routes;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::time::Instant;

pub use confirm::draw_quit_confirmation;
pub use layout::{calculate_main_chunks, calculate_question_chunks};
pub use question::draw_question;
pub use summary::draw_onboarding_summary;

pub fn key_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// A highlighted key followed by what it does.
pub fn key_hint(key: &'static str, label: &'static str) -> Vec<Span<'static>> {
    vec![Span::styled(key, key_style()), Span::from(format!(" {}", label))]
}

pub fn draw_app(f: &mut Frame, app: &mut App) {
    match app.state() {
        AppState::Onboarding => {
            if let Some(flow) = app.quiz_mut() {
                draw_question(f, flow);
            }
        }
        AppState::OnboardingSummary => draw_onboarding_summary(f, app),
        AppState::Main => draw_main(f, app),
        AppState::QuitConfirm => {
            draw_main(f, app);
            draw_quit_confirmation(f);
        }
    }
}

fn draw_main(f: &mut Frame, app: &App) {
    let layout = calculate_main_chunks(f.area());

    let title = match app.pathname() {
        routes::DASHBOARD => "Health Tracker",
        routes::TRACKER => "Trackers",
        routes::MINDFULNESS => "Mindfulness Tracker",
        routes::PROFILE => "Profile",
        _ => "Health Tracker",
    };
    let header = Paragraph::new(title)
        .style(key_style())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    match app.pathname() {
        routes::DASHBOARD => dashboard::draw_dashboard(f, app, layout.body_area),
        routes::TRACKER => tracker::draw_tracker_index(f, app.mindfulness(), layout.body_area),
        routes::MINDFULNESS => {
            mindfulness::draw_mindfulness(f, app.mindfulness(), layout.body_area)
        }
        routes::PROFILE => {
            referral::draw_referral(f, app.referral(), Instant::now(), layout.body_area)
        }
        _ => {}
    }

    let status = match app.status() {
        Some(message) => Paragraph::new(message.to_string()).style(Style::default().fg(Color::Yellow)),
        None => Paragraph::new(Line::from(
            [key_hint("Tab", "Next  "), key_hint("h/t/p", "Jump  "), key_hint("q", "Quit")]
                .concat(),
        )),
    };
    f.render_widget(status.alignment(Alignment::Center), layout.status_area);

    nav::draw_nav_bar(f, app.pathname(), layout.nav_area);
}


#[cfg(test)]
mod tests {
    use super::test_support::render;
    use super::*;
    use crate::app::AppSettings;
    use crate::config::MindfulnessConfig;
    use crate::models::{OnboardingStatus, UserProfile};
    use crate::quiz::questions::default_questions;
    use crate::tracker::{Clipboard, ShareError};
    use chrono::NaiveDate;

    struct NoClipboard;

    impl Clipboard for NoClipboard {
        fn set_text(&mut self, _text: &str) -> Result<(), ShareError> {
            Ok(())
        }
    }

    fn app(onboarding: OnboardingStatus) -> App {
        let mut profile = UserProfile::new("u1");
        profile.onboarding = onboarding;
        App::new(
            profile,
            default_questions(),
            AppSettings {
                today: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
                mindfulness: MindfulnessConfig::default(),
                referral_base_url: "https://example.test".to_string(),
            },
            Box::new(NoClipboard),
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_draw_onboarding_first_question() {
        let mut app = app(OnboardingStatus::NotStarted);
        let screen = render(80, 30, |f| draw_app(f, &mut app));
        assert!(screen.contains("Question 1 of 8"));
        assert!(screen.contains("What should we call you?"));
        assert!(screen.contains("Enter your name"));
        assert!(!screen.contains("Back"));
    }

    #[test]
    fn test_draw_dashboard_with_nav() {
        let mut app = app(OnboardingStatus::Completed);
        let screen = render(80, 24, |f| draw_app(f, &mut app));
        assert!(screen.contains("Health Tracker"));
        assert!(screen.contains("Home"));
        assert!(screen.contains("Tracker"));
        assert!(screen.contains("Profile"));
    }

    #[test]
    fn test_draw_quit_overlay() {
        let mut app = app(OnboardingStatus::Completed);
        app.handle_key(crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('q'),
            crossterm::event::KeyModifiers::empty(),
        ));
        let screen = render(80, 24, |f| draw_app(f, &mut app));
        assert!(screen.contains("Quit Health Tracker?"));
    }
}
