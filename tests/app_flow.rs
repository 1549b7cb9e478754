use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use health_tracker::config::MindfulnessConfig;
use health_tracker::nav;
use health_tracker::quiz::questions::default_questions;
use health_tracker::tracker::{Clipboard, ShareError};
use health_tracker::{
    spawn_store_worker, App, AppSettings, AppState, HealthStore, OnboardingStatus, SqliteStore,
    StoreHandle, UserProfile,
};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Default)]
struct SharedClipboard(Arc<Mutex<Vec<String>>>);

impl Clipboard for SharedClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ShareError> {
        self.0.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 5, 1).unwrap()
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::empty()));
}

fn build_app(db_path: &Path, clipboard: SharedClipboard) -> (App, StoreHandle, std::thread::JoinHandle<()>) {
    let store = SqliteStore::open(db_path).unwrap();
    let profile = store
        .load_profile("u1")
        .unwrap()
        .unwrap_or_else(|| UserProfile::new("u1"));
    let app = App::new(
        profile,
        default_questions(),
        AppSettings {
            today: today(),
            mindfulness: MindfulnessConfig::default(),
            referral_base_url: "https://example.test".to_string(),
        },
        Box::new(clipboard),
        None,
    )
    .unwrap();
    let (handle, join) = spawn_store_worker(Box::new(store)).unwrap();
    (app, handle, join)
}

/// Ships queued requests to the worker and applies responses until both
/// sides are quiet.
fn settle(app: &mut App, handle: &StoreHandle) {
    let mut pending = 0usize;
    loop {
        for request in app.take_requests() {
            handle.send(request).unwrap();
            pending += 1;
        }
        if pending == 0 {
            return;
        }
        let response = handle
            .recv_timeout(Duration::from_secs(5))
            .expect("store worker did not answer");
        pending -= 1;
        app.apply_store_response(response);
    }
}

#[test]
fn test_new_user_journey() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("health.db");
    let clipboard = SharedClipboard::default();

    let (mut app, handle, join) = build_app(&db_path, clipboard.clone());
    assert_eq!(app.state(), AppState::Onboarding);

    for c in "Sam".chars() {
        press(&mut app, KeyCode::Char(c));
    }
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.quiz().unwrap().index(), 1);

    app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
    assert_eq!(app.state(), AppState::Main);
    assert_eq!(app.pathname(), nav::DASHBOARD);
    settle(&mut app, &handle);
    assert!(app.status().is_none());

    press(&mut app, KeyCode::Char('t'));
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.pathname(), nav::MINDFULNESS);
    settle(&mut app, &handle);

    press(&mut app, KeyCode::Char('3'));
    press(&mut app, KeyCode::Enter);
    settle(&mut app, &handle);
    press(&mut app, KeyCode::Char('2'));
    press(&mut app, KeyCode::Enter);
    settle(&mut app, &handle);
    assert_eq!(app.mindfulness().total_minutes(), 25);
    assert!(app.mindfulness().last_error().is_none());

    press(&mut app, KeyCode::Char('p'));
    settle(&mut app, &handle);
    let code = app.referral().referral_code().to_string();
    assert_eq!(code.len(), 8);
    assert_eq!(
        app.profile().referral.as_ref().and_then(|r| r.referral_code.clone()),
        Some(code.clone())
    );

    press(&mut app, KeyCode::Char('c'));
    assert_eq!(
        clipboard.0.lock().unwrap().as_slice(),
        [format!("https://example.test/sign-up?ref={}", code)]
    );

    press(&mut app, KeyCode::Char('r'));
    settle(&mut app, &handle);
    assert_eq!(app.referral().referral_code(), code);

    drop(handle);
    join.join().unwrap();

    let store = SqliteStore::open(&db_path).unwrap();
    let profile = store.load_profile("u1").unwrap().unwrap();
    assert_eq!(profile.onboarding, OnboardingStatus::Skipped);
    assert_eq!(
        profile.referral.and_then(|r| r.referral_code),
        Some(code)
    );
    let metrics = store.get_daily_metrics("u1", today()).unwrap().unwrap();
    assert_eq!(metrics.mindfulness.len(), 2);
}

#[test]
fn test_returning_user_skips_onboarding_and_sees_history() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("health.db");

    {
        let mut store = SqliteStore::open(&db_path).unwrap();
        let mut profile = UserProfile::new("u1");
        profile.onboarding = OnboardingStatus::Completed;
        store.save_profile(&profile).unwrap();
    }

    let (mut app, handle, join) = build_app(&db_path, SharedClipboard::default());
    assert_eq!(app.state(), AppState::Main);
    settle(&mut app, &handle);

    app.navigate(nav::MINDFULNESS);
    settle(&mut app, &handle);
    press(&mut app, KeyCode::Enter);
    settle(&mut app, &handle);
    assert_eq!(app.mindfulness().total_minutes(), 10);

    app.navigate(nav::DASHBOARD);
    settle(&mut app, &handle);
    assert_eq!(app.mindfulness().total_minutes(), 10);
    assert_eq!(app.mindfulness().entries().len(), 1);

    drop(handle);
    join.join().unwrap();
}
