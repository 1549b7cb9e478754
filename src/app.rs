use crate::config::MindfulnessConfig;
use crate::models::{
    AppState, OnboardingStatus, QuestionDescriptor, StoreRequest, StoreResponse, UserProfile,
};
use crate::nav;
use crate::quiz::input::handle_quiz_input;
use crate::quiz::{FlowOutcome, QuizError, QuizFlow};
use crate::tracker::{
    Clipboard, MindfulnessTracker, ReferralSection, ReferralUpdate, ShareMethod, ShareTarget,
};
use chrono::{NaiveDate, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;

/// Everything the application needs besides the stored profile.
pub struct AppSettings {
    pub today: NaiveDate,
    pub mindfulness: MindfulnessConfig,
    pub referral_base_url: String,
}

/// Owns all UI state. Store traffic leaves through [`App::take_requests`]
/// and comes back through [`App::apply_store_response`].
pub struct App {
    state: AppState,
    state_before_quit: AppState,
    pathname: String,
    profile: UserProfile,
    questions: Vec<QuestionDescriptor>,
    quiz: Option<QuizFlow>,
    mindfulness: MindfulnessTracker,
    referral: ReferralSection,
    outbox: Vec<StoreRequest>,
    status: Option<String>,
    clipboard: Box<dyn Clipboard>,
    share_target: Option<Box<dyn ShareTarget>>,
    should_quit: bool,
}

impl App {
    pub fn new(
        profile: UserProfile,
        questions: Vec<QuestionDescriptor>,
        settings: AppSettings,
        clipboard: Box<dyn Clipboard>,
        share_target: Option<Box<dyn ShareTarget>>,
    ) -> Result<Self, QuizError> {
        let mindfulness = MindfulnessTracker::new(
            &profile.user_id,
            settings.today,
            settings.mindfulness,
            None,
        );
        let referral = ReferralSection::new(
            &profile.user_id,
            &settings.referral_base_url,
            profile.referral.clone(),
        );

        let mut app = Self {
            state: AppState::Main,
            state_before_quit: AppState::Main,
            pathname: nav::DASHBOARD.to_string(),
            profile,
            questions,
            quiz: None,
            mindfulness,
            referral,
            outbox: Vec::new(),
            status: None,
            clipboard,
            share_target,
            should_quit: false,
        };

        if app.profile.onboarding == OnboardingStatus::NotStarted {
            app.start_onboarding()?;
        } else {
            app.navigate(nav::DASHBOARD);
        }

        Ok(app)
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn pathname(&self) -> &str {
        &self.pathname
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn quiz(&self) -> Option<&QuizFlow> {
        self.quiz.as_ref()
    }

    pub fn quiz_mut(&mut self) -> Option<&mut QuizFlow> {
        self.quiz.as_mut()
    }

    pub fn mindfulness(&self) -> &MindfulnessTracker {
        &self.mindfulness
    }

    pub fn referral(&self) -> &ReferralSection {
        &self.referral
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn questions(&self) -> &[QuestionDescriptor] {
        &self.questions
    }

    /// Requests queued since the last call, in the order they were issued.
    pub fn take_requests(&mut self) -> Vec<StoreRequest> {
        std::mem::take(&mut self.outbox)
    }

    fn send(&mut self, request: Option<StoreRequest>) {
        if let Some(request) = request {
            self.outbox.push(request);
        }
    }

    fn start_onboarding(&mut self) -> Result<(), QuizError> {
        let flow = QuizFlow::new(self.questions.clone(), self.profile.answers.clone())?;
        tracing::info!(questions = flow.len(), "starting onboarding");
        self.quiz = Some(flow);
        self.state = AppState::Onboarding;
        Ok(())
    }

    fn restart_onboarding(&mut self) {
        if let Err(e) = self.start_onboarding() {
            tracing::error!(error = %e, "cannot start onboarding");
            self.status = Some(format!("Cannot start onboarding: {}", e));
        }
    }

    fn finish_onboarding(&mut self, outcome: FlowOutcome) {
        let Some(flow) = self.quiz.take() else {
            return;
        };

        self.profile.answers = flow.into_answers();
        self.profile.onboarding = match outcome {
            FlowOutcome::Completed => OnboardingStatus::Completed,
            FlowOutcome::Skipped => OnboardingStatus::Skipped,
        };
        tracing::info!(status = self.profile.onboarding.as_str(), "onboarding finished");

        self.outbox.push(StoreRequest::SaveProfile {
            profile: self.profile.clone(),
        });

        match outcome {
            FlowOutcome::Completed => self.state = AppState::OnboardingSummary,
            FlowOutcome::Skipped => {
                self.state = AppState::Main;
                self.navigate(nav::DASHBOARD);
            }
        }
    }

    /// Changes route and mounts the widgets that route shows.
    pub fn navigate(&mut self, path: &str) {
        self.pathname = path.to_string();
        match path {
            nav::PROFILE => {
                if !self.referral.is_generating() {
                    let request = self.referral.mount();
                    self.send(request);
                }
            }
            nav::DASHBOARD | nav::TRACKER | nav::MINDFULNESS => {
                if !self.mindfulness.is_saving() {
                    let request = self.mindfulness.mount();
                    self.send(request);
                }
            }
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.state {
            AppState::Onboarding => self.handle_onboarding_key(key),
            AppState::OnboardingSummary => match key.code {
                KeyCode::Enter => {
                    self.state = AppState::Main;
                    self.navigate(nav::DASHBOARD);
                }
                KeyCode::Char('r') => self.restart_onboarding(),
                _ => {}
            },
            AppState::QuitConfirm => match key.code {
                KeyCode::Char('y') => self.should_quit = true,
                KeyCode::Char('n') | KeyCode::Esc => self.state = self.state_before_quit,
                _ => {}
            },
            AppState::Main => self.handle_main_key(key),
        }
    }

    fn handle_onboarding_key(&mut self, key: KeyEvent) {
        let Some(flow) = self.quiz.as_mut() else {
            return;
        };
        handle_quiz_input(flow, key);
        if let Some(outcome) = flow.outcome() {
            self.finish_onboarding(outcome);
        }
    }

    fn handle_main_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => {
                self.state_before_quit = self.state;
                self.state = AppState::QuitConfirm;
                return;
            }
            KeyCode::Tab => {
                self.navigate(nav::cycle(&self.pathname, true));
                return;
            }
            KeyCode::BackTab => {
                self.navigate(nav::cycle(&self.pathname, false));
                return;
            }
            KeyCode::Char(c) => {
                if let Some(item) = nav::item_for_shortcut(c) {
                    self.navigate(item.path);
                    return;
                }
            }
            _ => {}
        }

        match self.pathname.as_str() {
            nav::DASHBOARD => {
                if key.code == KeyCode::Char('o') {
                    self.restart_onboarding();
                }
            }
            nav::TRACKER => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char('m')) {
                    self.navigate(nav::MINDFULNESS);
                }
            }
            nav::MINDFULNESS => self.handle_mindfulness_key(key),
            nav::PROFILE => self.handle_profile_key(key),
            _ => {}
        }
    }

    fn handle_mindfulness_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.navigate(nav::TRACKER),
            KeyCode::Left => self.mindfulness.adjust_minutes(-1),
            KeyCode::Right => self.mindfulness.adjust_minutes(1),
            KeyCode::Up => self.mindfulness.previous_activity(),
            KeyCode::Down => self.mindfulness.next_activity(),
            KeyCode::Char(c @ '1'..='9') => {
                self.mindfulness.pick_quick(c as usize - '1' as usize);
            }
            KeyCode::Enter => {
                let request = self.mindfulness.log_practice(Utc::now());
                self.send(request);
            }
            _ => {}
        }
    }

    fn handle_profile_key(&mut self, key: KeyEvent) {
        let now = Instant::now();
        match key.code {
            KeyCode::Char('c') => {
                if self.referral.copy_link(self.clipboard.as_mut(), now).is_ok() {
                    self.status = Some("Referral link copied to clipboard".to_string());
                }
            }
            KeyCode::Char('s') => {
                let target = self
                    .share_target
                    .as_deref_mut()
                    .map(|target| -> &mut dyn ShareTarget { target });
                match self.referral.share_link(target, self.clipboard.as_mut(), now) {
                    Ok(ShareMethod::Shared) => {
                        self.status = Some("Sharing referral link...".to_string());
                    }
                    Ok(ShareMethod::Copied) => {
                        self.status = Some("Referral link copied to clipboard".to_string());
                    }
                    Err(e) => {
                        self.status = Some(format!("Could not share link: {}", e));
                    }
                }
            }
            KeyCode::Char('r') => {
                if !self.referral.is_generating() {
                    let request = self.referral.mount();
                    self.send(request);
                }
            }
            _ => {}
        }
    }

    /// Picks up the result of a share that finished in the background.
    pub fn poll_share(&mut self) {
        let Some(outcome) = self.share_target.as_mut().and_then(|t| t.take_outcome()) else {
            return;
        };
        match outcome {
            Ok(()) => self.status = Some("Referral link shared".to_string()),
            Err(e) => {
                self.referral.share_failed(&e);
                self.status = Some(format!("Could not share link: {}", e));
            }
        }
    }

    pub fn apply_store_response(&mut self, response: StoreResponse) {
        match response {
            StoreResponse::MindfulnessAdded { entry, result } => {
                self.mindfulness.apply_write_result(&entry, result);
            }
            StoreResponse::DailyMetricsLoaded(result) => self.mindfulness.apply_loaded(result),
            StoreResponse::ReferralLoaded(result) => {
                let request = self.referral.apply_loaded(result);
                self.send(request);
            }
            StoreResponse::ReferralSaved { record, result } => {
                match self.referral.apply_saved(record, result) {
                    ReferralUpdate::Saved(record) => self.profile.referral = Some(record),
                    ReferralUpdate::Reload(request) => self.outbox.push(request),
                    ReferralUpdate::Failed => {}
                }
            }
            StoreResponse::ProfileSaved(Ok(())) => {
                tracing::info!(user_id = %self.profile.user_id, "profile saved");
            }
            StoreResponse::ProfileSaved(Err(e)) => {
                tracing::error!(error = %e, user_id = %self.profile.user_id, "failed to save profile");
                self.status = Some(format!("Could not save your answers: {}", e));
            }
        }
    }
}
