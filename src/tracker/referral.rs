use crate::models::{ReferralRecord, StoreRequest};
use crate::store::StoreError;
use crate::tracker::share::{Clipboard, ShareError, SharePayload, ShareTarget};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::time::{Duration, Instant};

pub const REFERRAL_CODE_LEN: usize = 8;
const COPIED_FEEDBACK: Duration = Duration::from_secs(2);

pub fn generate_referral_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(REFERRAL_CODE_LEN)
        .map(char::from)
        .collect::<String>()
        .to_uppercase()
}

pub fn create_referral_link(base_url: &str, code: &str) -> String {
    format!("{}/sign-up?ref={}", base_url.trim_end_matches('/'), code)
}

/// What the caller should do after a referral save settles.
#[derive(Debug)]
pub enum ReferralUpdate {
    /// The store accepted the record; mirror it into the shared profile.
    Saved(ReferralRecord),
    /// Someone else already persisted a code; fetch it instead.
    Reload(StoreRequest),
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareMethod {
    Shared,
    Copied,
}

/// Local mirror of the user's referral record.
#[derive(Debug, Clone)]
pub struct ReferralSection {
    user_id: String,
    base_url: String,
    record: ReferralRecord,
    fallback: Option<ReferralRecord>,
    loading: bool,
    generating: bool,
    generated_this_mount: bool,
    copied_at: Option<Instant>,
    last_error: Option<String>,
}

impl ReferralSection {
    /// `snapshot` is the referral data already known from the profile.
    pub fn new(user_id: &str, base_url: &str, snapshot: Option<ReferralRecord>) -> Self {
        Self {
            user_id: user_id.to_string(),
            base_url: base_url.to_string(),
            record: snapshot.clone().unwrap_or_default(),
            fallback: snapshot,
            loading: false,
            generating: false,
            generated_this_mount: false,
            copied_at: None,
            last_error: None,
        }
    }

    pub fn mount(&mut self) -> Option<StoreRequest> {
        if self.user_id.is_empty() {
            return None;
        }
        self.loading = true;
        self.generated_this_mount = false;
        self.last_error = None;
        Some(StoreRequest::LoadReferral {
            user_id: self.user_id.clone(),
        })
    }

    /// Applies the fetched record and, when the user still has no code,
    /// returns the save that creates one. A failed fetch never generates.
    pub fn apply_loaded(
        &mut self,
        result: Result<Option<ReferralRecord>, StoreError>,
    ) -> Option<StoreRequest> {
        self.loading = false;
        match result {
            Ok(Some(record)) => self.record = record,
            Ok(None) => {
                if let Some(fallback) = self.fallback.as_ref().filter(|f| f.has_code()) {
                    self.record = fallback.clone();
                }
            }
            Err(e) => {
                tracing::error!(error = %e, user_id = %self.user_id, "failed to load referral data");
                self.last_error = Some(format!("Could not load referral data: {}", e));
                return None;
            }
        }
        self.ensure_referral_code()
    }

    /// Generates a code at most once per mount, and only when none exists
    /// and nothing is in flight.
    pub fn ensure_referral_code(&mut self) -> Option<StoreRequest> {
        if self.record.has_code()
            || self.user_id.is_empty()
            || self.loading
            || self.generating
            || self.generated_this_mount
        {
            return None;
        }

        let code = generate_referral_code();
        tracing::info!(user_id = %self.user_id, %code, "generating referral code");

        let record = ReferralRecord {
            referral_code: Some(code),
            referral_count: 0,
            referrals: Vec::new(),
            referred_by: self.record.referred_by.clone(),
        };
        self.generating = true;
        self.generated_this_mount = true;

        Some(StoreRequest::SaveReferral {
            user_id: self.user_id.clone(),
            record,
        })
    }

    /// The generated code only becomes visible once the store confirmed it.
    pub fn apply_saved(
        &mut self,
        record: ReferralRecord,
        result: Result<(), StoreError>,
    ) -> ReferralUpdate {
        self.generating = false;
        match result {
            Ok(()) => {
                self.record = record.clone();
                self.last_error = None;
                ReferralUpdate::Saved(record)
            }
            Err(StoreError::ReferralCodeImmutable { existing, .. }) => {
                tracing::warn!(user_id = %self.user_id, %existing, "referral code already exists, reloading");
                self.loading = true;
                ReferralUpdate::Reload(StoreRequest::LoadReferral {
                    user_id: self.user_id.clone(),
                })
            }
            Err(e) => {
                tracing::error!(error = %e, user_id = %self.user_id, "failed to save referral data");
                self.last_error = Some(format!("Could not create referral code: {}", e));
                ReferralUpdate::Failed
            }
        }
    }

    pub fn record(&self) -> &ReferralRecord {
        &self.record
    }

    pub fn referral_code(&self) -> &str {
        self.record.referral_code.as_deref().unwrap_or("")
    }

    pub fn referral_link(&self) -> Option<String> {
        self.record
            .has_code()
            .then(|| create_referral_link(&self.base_url, self.referral_code()))
    }

    pub fn referral_count(&self) -> u32 {
        self.record.referral_count
    }

    pub fn referred_by(&self) -> Option<&str> {
        self.record.referred_by.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_copied(&self, now: Instant) -> bool {
        self.copied_at
            .is_some_and(|at| now.saturating_duration_since(at) < COPIED_FEEDBACK)
    }

    pub fn copy_link(
        &mut self,
        clipboard: &mut dyn Clipboard,
        now: Instant,
    ) -> Result<(), ShareError> {
        let result = self
            .referral_link()
            .ok_or(ShareError::NoLink)
            .and_then(|link| clipboard.set_text(&link));
        match result {
            Ok(()) => {
                self.copied_at = Some(now);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to copy referral link");
                self.last_error = Some(format!("Could not copy link: {}", e));
                Err(e)
            }
        }
    }

    /// Uses the share target when there is one, the clipboard otherwise.
    pub fn share_link(
        &mut self,
        target: Option<&mut dyn ShareTarget>,
        clipboard: &mut dyn Clipboard,
        now: Instant,
    ) -> Result<ShareMethod, ShareError> {
        let Some(target) = target else {
            return self.copy_link(clipboard, now).map(|()| ShareMethod::Copied);
        };
        let Some(link) = self.referral_link() else {
            self.last_error = Some(ShareError::NoLink.to_string());
            return Err(ShareError::NoLink);
        };

        match target.share(&SharePayload::referral(&link)) {
            Ok(()) => Ok(ShareMethod::Shared),
            Err(e) => {
                self.share_failed(&e);
                Err(e)
            }
        }
    }

    /// Records a share that failed, including one that failed after
    /// `share_link` had already returned.
    pub fn share_failed(&mut self, error: &ShareError) {
        tracing::error!(%error, "failed to share referral link");
        self.last_error = Some(format!("Could not share link: {}", error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MockClipboard {
        contents: Vec<String>,
        fail: bool,
    }

    impl Clipboard for MockClipboard {
        fn set_text(&mut self, text: &str) -> Result<(), ShareError> {
            if self.fail {
                return Err(ShareError::CommandFailed("mock".to_string()));
            }
            self.contents.push(text.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockShare {
        shared: Vec<SharePayload>,
    }

    impl ShareTarget for MockShare {
        fn share(&mut self, payload: &SharePayload) -> Result<(), ShareError> {
            self.shared.push(payload.clone());
            Ok(())
        }
    }

    fn with_code(code: &str) -> ReferralRecord {
        ReferralRecord {
            referral_code: Some(code.to_string()),
            referral_count: 2,
            referrals: vec!["a".to_string(), "b".to_string()],
            referred_by: None,
        }
    }

    fn section() -> ReferralSection {
        ReferralSection::new("u1", "https://example.test", None)
    }

    fn save_of(request: Option<StoreRequest>) -> ReferralRecord {
        match request {
            Some(StoreRequest::SaveReferral { record, .. }) => record,
            other => panic!("expected a referral save, got {:?}", other),
        }
    }

    #[test]
    fn test_generated_code_shape() {
        for _ in 0..20 {
            let code = generate_referral_code();
            assert_eq!(code.len(), REFERRAL_CODE_LEN);
            assert!(code
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_link_format() {
        assert_eq!(
            create_referral_link("https://example.test/", "ABCD1234"),
            "https://example.test/sign-up?ref=ABCD1234"
        );
    }

    #[test]
    fn test_no_generation_when_code_exists() {
        let mut section = section();
        section.mount();
        assert!(section.apply_loaded(Ok(Some(with_code("EXIST001")))).is_none());
        assert!(section.ensure_referral_code().is_none());
        assert_eq!(section.referral_code(), "EXIST001");
        assert_eq!(section.referral_count(), 2);
    }

    #[test]
    fn test_exactly_one_code_generated_without_record() {
        let mut section = section();
        section.mount();
        let pending = save_of(section.apply_loaded(Ok(None)));
        assert!(pending.has_code());
        assert_eq!(pending.referral_count, 0);

        assert!(section.ensure_referral_code().is_none());
        assert_eq!(section.referral_code(), "");

        match section.apply_saved(pending.clone(), Ok(())) {
            ReferralUpdate::Saved(record) => assert_eq!(record, pending),
            other => panic!("unexpected update: {:?}", other),
        }
        assert_eq!(section.record(), &pending);
        assert!(section.ensure_referral_code().is_none());
    }

    #[test]
    fn test_failed_save_does_not_regenerate_in_same_mount() {
        let mut section = section();
        section.mount();
        let pending = save_of(section.apply_loaded(Ok(None)));
        assert!(matches!(
            section.apply_saved(pending, Err(StoreError::Disconnected)),
            ReferralUpdate::Failed
        ));
        assert!(!section.record().has_code());
        assert!(section.last_error().is_some());
        assert!(section.ensure_referral_code().is_none());

        section.mount();
        assert!(section.apply_loaded(Ok(None)).is_some());
    }

    #[test]
    fn test_immutable_code_triggers_reload() {
        let mut section = section();
        section.mount();
        let pending = save_of(section.apply_loaded(Ok(None)));
        let update = section.apply_saved(
            pending,
            Err(StoreError::ReferralCodeImmutable {
                user_id: "u1".to_string(),
                existing: "EXIST001".to_string(),
            }),
        );
        assert!(matches!(
            update,
            ReferralUpdate::Reload(StoreRequest::LoadReferral { .. })
        ));
        assert!(section.is_loading());
        assert!(section.apply_loaded(Ok(Some(with_code("EXIST001")))).is_none());
        assert_eq!(section.referral_code(), "EXIST001");
    }

    #[test]
    fn test_failed_load_skips_generation() {
        let mut section = section();
        section.mount();
        assert!(section.apply_loaded(Err(StoreError::Disconnected)).is_none());
        assert!(!section.is_loading());
        assert!(section.last_error().is_some());
    }

    #[test]
    fn test_store_data_wins_over_snapshot() {
        let mut section =
            ReferralSection::new("u1", "https://example.test", Some(with_code("SNAP0001")));
        assert_eq!(section.referral_code(), "SNAP0001");

        section.mount();
        section.apply_loaded(Ok(Some(with_code("STORE001"))));
        assert_eq!(section.referral_code(), "STORE001");

        section.mount();
        assert!(section.apply_loaded(Ok(None)).is_none());
        assert_eq!(section.referral_code(), "SNAP0001");
    }

    #[test]
    fn test_copy_sets_feedback_for_two_seconds() {
        let mut section = ReferralSection::new("u1", "https://example.test", Some(with_code("ABCD1234")));
        let mut clipboard = MockClipboard::default();
        let now = Instant::now();

        section.copy_link(&mut clipboard, now).unwrap();
        assert_eq!(clipboard.contents, vec!["https://example.test/sign-up?ref=ABCD1234"]);
        assert!(section.is_copied(now + Duration::from_millis(1999)));
        assert!(!section.is_copied(now + Duration::from_secs(2)));
    }

    #[test]
    fn test_copy_without_code_fails() {
        let mut section = section();
        let mut clipboard = MockClipboard::default();
        assert!(matches!(
            section.copy_link(&mut clipboard, Instant::now()),
            Err(ShareError::NoLink)
        ));
        assert!(clipboard.contents.is_empty());
    }

    #[test]
    fn test_clipboard_failure_surfaces_error() {
        let mut section = ReferralSection::new("u1", "https://example.test", Some(with_code("ABCD1234")));
        let mut clipboard = MockClipboard {
            fail: true,
            ..MockClipboard::default()
        };
        let now = Instant::now();
        assert!(section.copy_link(&mut clipboard, now).is_err());
        assert!(!section.is_copied(now));
        assert!(section.last_error().is_some());
    }

    #[test]
    fn test_share_prefers_target_and_falls_back_to_clipboard() {
        let mut section = ReferralSection::new("u1", "https://example.test", Some(with_code("ABCD1234")));
        let mut clipboard = MockClipboard::default();
        let mut target = MockShare::default();
        let now = Instant::now();

        let method = section
            .share_link(Some(&mut target), &mut clipboard, now)
            .unwrap();
        assert_eq!(method, ShareMethod::Shared);
        assert_eq!(target.shared.len(), 1);
        assert!(clipboard.contents.is_empty());

        let method = section.share_link(None, &mut clipboard, now).unwrap();
        assert_eq!(method, ShareMethod::Copied);
        assert_eq!(clipboard.contents.len(), 1);
    }
}
