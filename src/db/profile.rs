use crate::db::now;
use crate::models::{Answer, OnboardingStatus, UserProfile};
use crate::store::StoreError;
use rusqlite::{Connection, OptionalExtension};
use std::collections::BTreeMap;

pub fn save_profile(conn: &Connection, profile: &UserProfile) -> Result<(), StoreError> {
    let answers_json = serde_json::to_string(&profile.answers)?;
    let ts = now();

    conn.execute(
        "INSERT INTO profiles (user_id, onboarding_status, answers, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT(user_id) DO UPDATE SET
             onboarding_status = excluded.onboarding_status,
             answers = excluded.answers,
             updated_at = excluded.updated_at",
        rusqlite::params![
            profile.user_id,
            profile.onboarding.as_str(),
            answers_json,
            ts,
            ts
        ],
    )?;

    Ok(())
}

/// Loads onboarding state only; the referral snapshot is attached by the store.
pub fn load_profile(conn: &Connection, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
    let row: Option<(String, String)> = conn
        .query_row(
            "SELECT onboarding_status, answers FROM profiles WHERE user_id = ?",
            [user_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    let Some((status, answers_json)) = row else {
        return Ok(None);
    };

    let answers: BTreeMap<String, Answer> = serde_json::from_str(&answers_json)?;

    Ok(Some(UserProfile {
        user_id: user_id.to_string(),
        onboarding: OnboardingStatus::parse(&status),
        answers,
        referral: None,
    }))
}

pub fn reset_onboarding(conn: &Connection, user_id: &str) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE profiles SET onboarding_status = ?, answers = '{}', updated_at = ? WHERE user_id = ?",
        rusqlite::params![OnboardingStatus::NotStarted.as_str(), now(), user_id],
    )?;
    Ok(())
}
