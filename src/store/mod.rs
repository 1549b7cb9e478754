//! Persistence boundary for everything the widgets mirror.
//!
//! Widgets never touch the database directly: they emit [`StoreRequest`]s,
//! the worker runs them through [`execute`] against a [`HealthStore`], and
//! the resulting [`StoreResponse`]s are applied back on the UI thread.

pub mod worker;

use crate::db;
use crate::models::{
    DailyHealthMetrics, MindfulnessEntry, ReferralRecord, StoreRequest, StoreResponse, UserProfile,
};
use chrono::NaiveDate;
use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

pub use worker::{spawn_store_worker, StoreHandle};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("failed to encode record: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("referral code {0} does not exist")]
    UnknownReferralCode(String),
    #[error("you cannot redeem your own referral code")]
    SelfReferral,
    #[error("user {0} has already been referred")]
    AlreadyReferred(String),
    #[error("user {user_id} already owns referral code {existing}")]
    ReferralCodeImmutable { user_id: String, existing: String },
    #[error("referral code {0} is already taken")]
    ReferralCodeTaken(String),
    #[error("timestamp {0} cannot be stored")]
    TimestampOutOfRange(chrono::DateTime<chrono::Utc>),
    #[error("store worker is not running")]
    Disconnected,
}

pub trait HealthStore: Send {
    fn add_mindfulness(
        &mut self,
        user_id: &str,
        date: NaiveDate,
        entry: &MindfulnessEntry,
    ) -> Result<(), StoreError>;

    fn get_daily_metrics(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyHealthMetrics>, StoreError>;

    fn get_user_referral_data(&self, user_id: &str) -> Result<Option<ReferralRecord>, StoreError>;

    /// Full replacement of the user's referral record.
    fn save_referral_data(&mut self, user_id: &str, record: &ReferralRecord)
    -> Result<(), StoreError>;

    fn redeem_referral_code(&mut self, user_id: &str, code: &str) -> Result<String, StoreError>;

    fn load_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError>;

    fn save_profile(&mut self, profile: &UserProfile) -> Result<(), StoreError>;

    fn reset_onboarding(&mut self, user_id: &str) -> Result<(), StoreError>;
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            conn: db::init_db(path)?,
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        db::run_migrations(&conn)?;
        Ok(Self { conn })
    }
}

impl HealthStore for SqliteStore {
    fn add_mindfulness(
        &mut self,
        user_id: &str,
        date: NaiveDate,
        entry: &MindfulnessEntry,
    ) -> Result<(), StoreError> {
        db::mindfulness::add_entry(&self.conn, user_id, date, entry)?;
        Ok(())
    }

    fn get_daily_metrics(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyHealthMetrics>, StoreError> {
        db::mindfulness::load_daily_metrics(&self.conn, user_id, date)
    }

    fn get_user_referral_data(&self, user_id: &str) -> Result<Option<ReferralRecord>, StoreError> {
        db::referral::get_referral(&self.conn, user_id)
    }

    fn save_referral_data(
        &mut self,
        user_id: &str,
        record: &ReferralRecord,
    ) -> Result<(), StoreError> {
        db::referral::save_referral(&self.conn, user_id, record)
    }

    fn redeem_referral_code(&mut self, user_id: &str, code: &str) -> Result<String, StoreError> {
        db::referral::redeem_code(&mut self.conn, user_id, code)
    }

    fn load_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        let Some(mut profile) = db::profile::load_profile(&self.conn, user_id)? else {
            return Ok(None);
        };
        profile.referral = db::referral::get_referral(&self.conn, user_id)?;
        Ok(Some(profile))
    }

    fn save_profile(&mut self, profile: &UserProfile) -> Result<(), StoreError> {
        db::profile::save_profile(&self.conn, profile)
    }

    fn reset_onboarding(&mut self, user_id: &str) -> Result<(), StoreError> {
        db::profile::reset_onboarding(&self.conn, user_id)
    }
}

/// Runs one request to completion. Failures travel inside the response.
pub fn execute(store: &mut dyn HealthStore, request: StoreRequest) -> StoreResponse {
    match request {
        StoreRequest::AddMindfulness {
            user_id,
            date,
            entry,
        } => {
            let result = store.add_mindfulness(&user_id, date, &entry);
            StoreResponse::MindfulnessAdded { entry, result }
        }
        StoreRequest::LoadDailyMetrics { user_id, date } => {
            StoreResponse::DailyMetricsLoaded(store.get_daily_metrics(&user_id, date))
        }
        StoreRequest::LoadReferral { user_id } => {
            StoreResponse::ReferralLoaded(store.get_user_referral_data(&user_id))
        }
        StoreRequest::SaveReferral { user_id, record } => {
            let result = store.save_referral_data(&user_id, &record);
            StoreResponse::ReferralSaved { record, result }
        }
        StoreRequest::SaveProfile { profile } => {
            StoreResponse::ProfileSaved(store.save_profile(&profile))
        }
    }
}
