use chrono::{NaiveDate, TimeZone, Utc};
use health_tracker::models::{Answer, MindfulnessEntry, OnboardingStatus, ReferralRecord, UserProfile};
use health_tracker::{HealthStore, SqliteStore, StoreError};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 5, 1).unwrap()
}

fn entry(minutes: u32, hour: u32) -> MindfulnessEntry {
    MindfulnessEntry {
        minutes,
        activity: "breathing".to_string(),
        timestamp: Utc.with_ymd_and_hms(2026, 5, 1, hour, 0, 0).unwrap(),
    }
}

fn with_code(code: &str) -> ReferralRecord {
    ReferralRecord {
        referral_code: Some(code.to_string()),
        ..ReferralRecord::default()
    }
}

#[test]
fn test_data_survives_reopen() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("health.db");

    {
        let mut store = SqliteStore::open(&db_path).unwrap();
        store.add_mindfulness("u1", today(), &entry(15, 8)).unwrap();
        store.add_mindfulness("u1", today(), &entry(10, 9)).unwrap();

        let mut profile = UserProfile::new("u1");
        profile.onboarding = OnboardingStatus::Completed;
        profile
            .answers
            .insert("name".to_string(), Answer::Text("Sam".to_string()));
        store.save_profile(&profile).unwrap();
        store.save_referral_data("u1", &with_code("ABCD1234")).unwrap();
    }

    let store = SqliteStore::open(&db_path).unwrap();
    let metrics = store.get_daily_metrics("u1", today()).unwrap().unwrap();
    let minutes: Vec<u32> = metrics.mindfulness.iter().map(|e| e.minutes).collect();
    assert_eq!(minutes, vec![15, 10]);

    let profile = store.load_profile("u1").unwrap().unwrap();
    assert_eq!(profile.onboarding, OnboardingStatus::Completed);
    assert_eq!(profile.answers.get("name"), Some(&Answer::Text("Sam".to_string())));
    assert_eq!(
        profile.referral.and_then(|r| r.referral_code),
        Some("ABCD1234".to_string())
    );
}

#[test]
fn test_other_days_and_users_are_separate() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    store.add_mindfulness("u1", today(), &entry(15, 8)).unwrap();

    let tomorrow = today().succ_opt().unwrap();
    assert!(store.get_daily_metrics("u1", tomorrow).unwrap().is_none());
    assert!(store.get_daily_metrics("u2", today()).unwrap().is_none());
}

#[test]
fn test_referral_code_cannot_change_once_saved() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    store.save_referral_data("u1", &with_code("FIRST001")).unwrap();

    match store.save_referral_data("u1", &with_code("SECOND02")) {
        Err(StoreError::ReferralCodeImmutable { existing, .. }) => assert_eq!(existing, "FIRST001"),
        other => panic!("unexpected result: {:?}", other),
    }

    let mut bumped = with_code("FIRST001");
    bumped.referral_count = 2;
    store.save_referral_data("u1", &bumped).unwrap();
    assert_eq!(
        store.get_user_referral_data("u1").unwrap().unwrap().referral_count,
        2
    );
}

#[test]
fn test_redeem_credits_referrer_once() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    store.save_referral_data("u1", &with_code("ABCD1234")).unwrap();

    assert_eq!(store.redeem_referral_code("u2", "abcd1234").unwrap(), "u1");

    let referrer = store.get_user_referral_data("u1").unwrap().unwrap();
    assert_eq!(referrer.referral_count, 1);
    assert_eq!(referrer.referrals, vec!["u2".to_string()]);
    let referred = store.get_user_referral_data("u2").unwrap().unwrap();
    assert_eq!(referred.referred_by.as_deref(), Some("u1"));

    assert!(matches!(
        store.redeem_referral_code("u2", "ABCD1234"),
        Err(StoreError::AlreadyReferred(_))
    ));
    assert!(matches!(
        store.redeem_referral_code("u1", "ABCD1234"),
        Err(StoreError::SelfReferral)
    ));
    assert!(matches!(
        store.redeem_referral_code("u3", "NOPE0000"),
        Err(StoreError::UnknownReferralCode(_))
    ));
}

#[test]
fn test_reset_onboarding_clears_answers() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let mut profile = UserProfile::new("u1");
    profile.onboarding = OnboardingStatus::Skipped;
    profile
        .answers
        .insert("weight".to_string(), Answer::Number(70.0));
    store.save_profile(&profile).unwrap();

    store.reset_onboarding("u1").unwrap();
    let profile = store.load_profile("u1").unwrap().unwrap();
    assert_eq!(profile.onboarding, OnboardingStatus::NotStarted);
    assert!(profile.answers.is_empty());
}
