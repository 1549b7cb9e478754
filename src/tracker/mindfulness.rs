use crate::config::{MeditationType, MindfulnessConfig};
use crate::models::{DailyHealthMetrics, MindfulnessEntry, StoreRequest};
use crate::store::StoreError;
use chrono::{DateTime, NaiveDate, Utc};

/// Entries and total as they were before an optimistic append.
#[derive(Debug, Clone)]
struct Snapshot {
    entries: Vec<MindfulnessEntry>,
    total_minutes: u32,
}

/// Local mirror of today's mindfulness log for one user.
#[derive(Debug, Clone)]
pub struct MindfulnessTracker {
    user_id: String,
    date: NaiveDate,
    config: MindfulnessConfig,
    fallback: Option<DailyHealthMetrics>,
    minutes: u32,
    activity_index: usize,
    entries: Vec<MindfulnessEntry>,
    total_minutes: u32,
    daily_goal: u32,
    loading: bool,
    pending_loads: usize,
    saving: bool,
    snapshot: Option<Snapshot>,
    last_error: Option<String>,
}

impl MindfulnessTracker {
    pub fn new(
        user_id: &str,
        date: NaiveDate,
        config: MindfulnessConfig,
        fallback: Option<DailyHealthMetrics>,
    ) -> Self {
        let daily_goal = (f64::from(config.weekly_goal) / 7.0).round() as u32;
        let mut tracker = Self {
            user_id: user_id.to_string(),
            date,
            minutes: 0,
            activity_index: 0,
            entries: Vec::new(),
            total_minutes: 0,
            daily_goal,
            loading: false,
            pending_loads: 0,
            saving: false,
            snapshot: None,
            last_error: None,
            fallback: None,
            config,
        };
        tracker.set_minutes(tracker.config.default_duration);
        if let Some(metrics) = &fallback {
            tracker.replace_entries(metrics.mindfulness.clone());
        }
        tracker.fallback = fallback;
        tracker
    }

    /// Starts a fetch. Returns `None` when there is no user to fetch for.
    ///
    /// Mounting again before earlier fetches answer is allowed; the tracker
    /// stays loading until every one of them has come back.
    pub fn mount(&mut self) -> Option<StoreRequest> {
        if self.user_id.is_empty() {
            return None;
        }
        self.pending_loads += 1;
        self.loading = true;
        Some(StoreRequest::LoadDailyMetrics {
            user_id: self.user_id.clone(),
            date: self.date,
        })
    }

    /// Applies a fetch result. Only the answer to the most recent fetch
    /// replaces the entries, and never while a write is in flight, so an
    /// older snapshot cannot wipe a practice logged after it was taken.
    pub fn apply_loaded(&mut self, result: Result<Option<DailyHealthMetrics>, StoreError>) {
        self.pending_loads = self.pending_loads.saturating_sub(1);
        self.loading = self.pending_loads > 0;
        if result.is_ok() && (self.loading || self.saving) {
            tracing::debug!(
                pending_loads = self.pending_loads,
                saving = self.saving,
                "ignoring superseded mindfulness load"
            );
            return;
        }
        match result {
            Ok(Some(metrics)) => self.replace_entries(metrics.mindfulness),
            Ok(None) => {
                if let Some(fallback) = &self.fallback {
                    let entries = fallback.mindfulness.clone();
                    self.replace_entries(entries);
                }
            }
            Err(e) => {
                tracing::error!(error = %e, user_id = %self.user_id, "failed to load mindfulness data");
                self.last_error = Some(format!("Could not load today's practices: {}", e));
            }
        }
    }

    /// Appends a practice with the selected duration and activity and returns
    /// the write to send to the store.
    pub fn log_practice(&mut self, now: DateTime<Utc>) -> Option<StoreRequest> {
        if !self.can_log() {
            return None;
        }

        let entry = MindfulnessEntry {
            minutes: self.minutes,
            activity: self.activity().map(|a| a.id.clone()).unwrap_or_default(),
            timestamp: now,
        };

        self.snapshot = Some(Snapshot {
            entries: self.entries.clone(),
            total_minutes: self.total_minutes,
        });
        self.entries.push(entry.clone());
        self.total_minutes += entry.minutes;
        self.saving = true;
        self.last_error = None;

        Some(StoreRequest::AddMindfulness {
            user_id: self.user_id.clone(),
            date: self.date,
            entry,
        })
    }

    /// Settles the in-flight write. A failure rolls back to the state before
    /// the append.
    pub fn apply_write_result(&mut self, entry: &MindfulnessEntry, result: Result<(), StoreError>) {
        self.saving = false;
        let snapshot = self.snapshot.take();
        match result {
            Ok(()) => {
                tracing::info!(minutes = entry.minutes, activity = %entry.activity, "mindfulness practice saved");
            }
            Err(e) => {
                tracing::error!(error = %e, user_id = %self.user_id, "failed to save mindfulness data");
                if let Some(snapshot) = snapshot {
                    self.entries = snapshot.entries;
                    self.total_minutes = snapshot.total_minutes;
                }
                self.last_error = Some(format!("Could not save practice: {}", e));
            }
        }
    }

    pub fn can_log(&self) -> bool {
        self.minutes > 0 && !self.user_id.is_empty() && !self.saving && !self.loading
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn total_minutes(&self) -> u32 {
        self.total_minutes
    }

    pub fn daily_goal(&self) -> u32 {
        self.daily_goal
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Chronological order, as stored.
    pub fn entries(&self) -> &[MindfulnessEntry] {
        &self.entries
    }

    pub fn history(&self) -> impl Iterator<Item = &MindfulnessEntry> {
        self.entries.iter().rev()
    }

    pub fn progress_percent(&self) -> f64 {
        if self.daily_goal == 0 {
            return if self.total_minutes > 0 { 100.0 } else { 0.0 };
        }
        (f64::from(self.total_minutes) / f64::from(self.daily_goal) * 100.0).min(100.0)
    }

    /// Upper bound of the duration slider.
    pub fn max_minutes(&self) -> u32 {
        self.config
            .duration_options
            .last()
            .copied()
            .unwrap_or(self.config.default_duration)
            .max(1)
    }

    pub fn set_minutes(&mut self, minutes: u32) {
        self.minutes = minutes.clamp(1, self.max_minutes());
    }

    pub fn adjust_minutes(&mut self, delta: i32) {
        let target = i64::from(self.minutes) + i64::from(delta);
        self.set_minutes(target.clamp(0, i64::from(u32::MAX)) as u32);
    }

    pub fn quick_picks(&self) -> &[u32] {
        let n = self.config.duration_options.len().min(3);
        &self.config.duration_options[..n]
    }

    pub fn pick_quick(&mut self, index: usize) -> bool {
        match self.quick_picks().get(index).copied() {
            Some(minutes) => {
                self.set_minutes(minutes);
                true
            }
            None => false,
        }
    }

    pub fn activity(&self) -> Option<&MeditationType> {
        self.config.meditation_types.get(self.activity_index)
    }

    pub fn next_activity(&mut self) {
        let len = self.config.meditation_types.len();
        if len > 0 {
            self.activity_index = (self.activity_index + 1) % len;
        }
    }

    pub fn previous_activity(&mut self) {
        let len = self.config.meditation_types.len();
        if len > 0 {
            self.activity_index = (self.activity_index + len - 1) % len;
        }
    }

    /// Display label for a stored activity id.
    pub fn activity_label(&self, id: &str) -> String {
        self.config
            .meditation_types
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.label.clone())
            .unwrap_or_else(|| capitalize(id))
    }

    fn replace_entries(&mut self, entries: Vec<MindfulnessEntry>) {
        self.total_minutes = entries.iter().map(|e| e.minutes).sum();
        self.entries = entries;
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
