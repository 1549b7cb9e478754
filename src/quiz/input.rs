use crate::models::AnswerKind;
use crate::quiz::flow::QuizFlow;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Slider notches moved by PageUp/PageDown.
const PAGE_STEPS: i32 = 10;

/// Applies one key press to the onboarding flow. Returns whether anything
/// changed.
pub fn handle_quiz_input(flow: &mut QuizFlow, key: KeyEvent) -> bool {
    if flow.is_finished() {
        return false;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('s') => {
                flow.skip();
                true
            }
            _ => false,
        };
    }

    // Multi-line answers take a newline on Alt+Enter or Shift+Enter; plain
    // Enter still advances.
    if key.code == KeyCode::Enter
        && key.modifiers.intersects(KeyModifiers::ALT | KeyModifiers::SHIFT)
        && matches!(flow.descriptor().kind, AnswerKind::Text)
    {
        flow.current_mut().insert_char('\n');
        return true;
    }

    match key.code {
        KeyCode::Esc => return flow.retreat(),
        KeyCode::Enter => return flow.advance(),
        _ => {}
    }

    match flow.descriptor().kind {
        AnswerKind::Single { .. } | AnswerKind::Multiple { .. } => handle_choice_key(flow, key),
        AnswerKind::Text | AnswerKind::Input => handle_text_key(flow, key),
        AnswerKind::Slider { .. } => handle_slider_key(flow, key),
    }
}

fn handle_choice_key(flow: &mut QuizFlow, key: KeyEvent) -> bool {
    let state = flow.current_mut();
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => {
            state.highlight_next();
            true
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.highlight_previous();
            true
        }
        KeyCode::Char(' ') => state.activate_highlighted().is_some(),
        KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
            let index = c as usize - '1' as usize;
            if index >= state.descriptor().kind.options().len() {
                return false;
            }
            state.highlighted = index;
            state.activate_highlighted().is_some()
        }
        _ => false,
    }
}

fn handle_text_key(flow: &mut QuizFlow, key: KeyEvent) -> bool {
    let state = flow.current_mut();
    match key.code {
        KeyCode::Char(c) => state.insert_char(c),
        KeyCode::Backspace => state.backspace(),
        KeyCode::Left => state.cursor_left(),
        KeyCode::Right => state.cursor_right(),
        KeyCode::Home => state.cursor_home(),
        KeyCode::End => state.cursor_end(),
        _ => return false,
    }
    true
}

fn handle_slider_key(flow: &mut QuizFlow, key: KeyEvent) -> bool {
    let state = flow.current_mut();
    let fine = key.modifiers.contains(KeyModifiers::SHIFT);
    match key.code {
        KeyCode::Left | KeyCode::Down => state.step_number(-1, fine),
        KeyCode::Right | KeyCode::Up => state.step_number(1, fine),
        KeyCode::PageDown => state.step_number(-PAGE_STEPS, false),
        KeyCode::PageUp => state.step_number(PAGE_STEPS, false),
        KeyCode::Home => state.set_to_min(),
        KeyCode::End => state.set_to_max(),
        _ => return false,
    }
    true
}
