use crate::db::now;
use crate::models::ReferralRecord;
use crate::store::StoreError;
use rusqlite::{Connection, OptionalExtension};

pub fn get_referral(conn: &Connection, user_id: &str) -> Result<Option<ReferralRecord>, StoreError> {
    let row: Option<(Option<String>, u32, String, Option<String>)> = conn
        .query_row(
            "SELECT referral_code, referral_count, referrals, referred_by
             FROM referrals WHERE user_id = ?",
            [user_id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )
        .optional()?;

    let Some((referral_code, referral_count, referrals_json, referred_by)) = row else {
        return Ok(None);
    };

    Ok(Some(ReferralRecord {
        referral_code,
        referral_count,
        referrals: serde_json::from_str(&referrals_json)?,
        referred_by,
    }))
}

pub fn find_code_owner(conn: &Connection, code: &str) -> Result<Option<String>, StoreError> {
    let owner = conn
        .query_row(
            "SELECT user_id FROM referrals WHERE referral_code = ?",
            [code],
            |row| row.get(0),
        )
        .optional()?;
    Ok(owner)
}

fn upsert_referral(conn: &Connection, user_id: &str, record: &ReferralRecord) -> Result<(), StoreError> {
    let code = record
        .referral_code
        .as_deref()
        .filter(|code| !code.is_empty());
    let referrals_json = serde_json::to_string(&record.referrals)?;
    let ts = now();

    conn.execute(
        "INSERT INTO referrals (user_id, referral_code, referral_count, referrals, referred_by, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(user_id) DO UPDATE SET
             referral_code = excluded.referral_code,
             referral_count = excluded.referral_count,
             referrals = excluded.referrals,
             referred_by = excluded.referred_by,
             updated_at = excluded.updated_at",
        rusqlite::params![
            user_id,
            code,
            record.referral_count,
            referrals_json,
            record.referred_by,
            ts,
            ts
        ],
    )?;

    Ok(())
}

/// Replaces the user's referral record. A code that has already been
/// persisted for the user can never be changed or cleared.
pub fn save_referral(conn: &Connection, user_id: &str, record: &ReferralRecord) -> Result<(), StoreError> {
    if let Some(existing) = get_referral(conn, user_id)?
        && let Some(existing_code) = existing.referral_code.filter(|c| !c.is_empty())
        && record.referral_code.as_deref() != Some(existing_code.as_str())
    {
        return Err(StoreError::ReferralCodeImmutable {
            user_id: user_id.to_string(),
            existing: existing_code,
        });
    }

    if let Some(code) = record.referral_code.as_deref().filter(|c| !c.is_empty())
        && let Some(owner) = find_code_owner(conn, code)?
        && owner != user_id
    {
        return Err(StoreError::ReferralCodeTaken(code.to_string()));
    }

    upsert_referral(conn, user_id, record)
}

/// Credits the owner of `code` with referring `user_id`. Returns the
/// referrer's user id.
pub fn redeem_code(conn: &mut Connection, user_id: &str, code: &str) -> Result<String, StoreError> {
    let code = code.trim().to_uppercase();
    let tx = conn.transaction()?;

    let referrer = find_code_owner(&tx, &code)?
        .ok_or_else(|| StoreError::UnknownReferralCode(code.clone()))?;
    if referrer == user_id {
        return Err(StoreError::SelfReferral);
    }

    let mut referred = get_referral(&tx, user_id)?.unwrap_or_default();
    if referred.referred_by.is_some() {
        return Err(StoreError::AlreadyReferred(user_id.to_string()));
    }

    let mut referrer_record = get_referral(&tx, &referrer)?.unwrap_or_default();
    if !referrer_record.referrals.iter().any(|id| id == user_id) {
        referrer_record.referrals.push(user_id.to_string());
        referrer_record.referral_count += 1;
    }
    upsert_referral(&tx, &referrer, &referrer_record)?;

    referred.referred_by = Some(referrer.clone());
    upsert_referral(&tx, user_id, &referred)?;

    tx.commit()?;
    Ok(referrer)
}
