use crate::tracker::ReferralSection;
use crate::ui::{key_hint, key_style};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::time::Instant;

pub fn draw_referral(f: &mut Frame, section: &ReferralSection, now: Instant, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(5)])
        .split(area);

    draw_link_card(f, section, now, chunks[0]);
    draw_stats(f, section, chunks[1]);
}

fn draw_link_card(f: &mut Frame, section: &ReferralSection, now: Instant, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Invite friends to join Health Tracker and earn rewards.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    match section.referral_link() {
        Some(link) => {
            lines.push(Line::from(vec![
                Span::from("Your link: "),
                Span::styled(link, Style::default().add_modifier(Modifier::UNDERLINED)),
            ]));
            lines.push(Line::from(""));

            let mut actions = if section.is_copied(now) {
                vec![
                    Span::styled("✓ Copied!", Style::default().fg(Color::Green)),
                    Span::from("  "),
                ]
            } else {
                key_hint("c", "Copy  ")
            };
            actions.extend(key_hint("s", "Share Your Link"));
            lines.push(Line::from(actions));
        }
        None if section.is_loading() || section.is_generating() => {
            lines.push(Line::from(Span::styled(
                "Generating your referral code...",
                Style::default().fg(Color::Yellow),
            )));
        }
        None => {
            lines.push(Line::from(Span::styled(
                "No referral code yet.",
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    if let Some(error) = section.last_error() {
        lines.push(Line::from(vec![
            Span::styled(error.to_string(), Style::default().fg(Color::Red)),
            Span::from("  "),
            Span::styled("r", key_style()),
            Span::from(" Retry"),
        ]));
    }

    let card = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Referrals"));
    f.render_widget(card, area);
}

fn draw_stats(f: &mut Frame, section: &ReferralSection, area: Rect) {
    let code = match section.referral_code() {
        "" => "-",
        code => code,
    };

    let mut lines = vec![
        Line::from(vec![
            Span::from("Your Referral Code:   "),
            Span::styled(code.to_string(), key_style()),
        ]),
        Line::from(vec![
            Span::from("Successful Referrals: "),
            Span::styled(
                section.referral_count().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    if let Some(referrer) = section.referred_by() {
        lines.push(Line::from(vec![
            Span::from("You were referred by: "),
            Span::styled(referrer.to_string(), Style::default().fg(Color::Green)),
        ]));
    }

    let stats = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Stats"));
    f.render_widget(stats, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReferralRecord;
    use crate::tracker::{Clipboard, ShareError};
    use crate::ui::test_support::render;

    struct OkClipboard;

    impl Clipboard for OkClipboard {
        fn set_text(&mut self, _text: &str) -> Result<(), ShareError> {
            Ok(())
        }
    }

    fn section_with_code() -> ReferralSection {
        let mut section = ReferralSection::new(
            "u1",
            "https://example.test",
            Some(ReferralRecord {
                referral_code: Some("ABCD1234".to_string()),
                referral_count: 3,
                referrals: Vec::new(),
                referred_by: Some("FRIEND01".to_string()),
            }),
        );
        section.mount();
        let save = section.apply_loaded(Ok(None));
        assert!(save.is_none());
        section
    }

    #[test]
    fn test_renders_link_and_stats() {
        let section = section_with_code();
        let screen = render(90, 16, |f| {
            let area = f.area();
            draw_referral(f, &section, Instant::now(), area);
        });
        assert!(screen.contains("https://example.test/sign-up?ref=ABCD1234"));
        assert!(screen.contains("Successful Referrals: 3"));
        assert!(screen.contains("You were referred by: FRIEND01"));
        assert!(screen.contains("Share Your Link"));
        assert!(!screen.contains("Copied!"));
    }

    #[test]
    fn test_copied_feedback_shows() {
        let mut section = section_with_code();
        let now = Instant::now();
        section.copy_link(&mut OkClipboard, now).unwrap();
        let screen = render(90, 16, |f| {
            let area = f.area();
            draw_referral(f, &section, now, area);
        });
        assert!(screen.contains("Copied!"));
    }

    #[test]
    fn test_pending_code_shows_generating() {
        let mut section = ReferralSection::new("u1", "https://example.test", None);
        section.mount();
        let screen = render(90, 16, |f| {
            let area = f.area();
            draw_referral(f, &section, Instant::now(), area);
        });
        assert!(screen.contains("Generating your referral code..."));
        assert!(!screen.contains("referred by"));
    }
}
