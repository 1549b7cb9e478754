pub mod app;
pub mod config;
pub mod db;
pub mod logger;
pub mod models;
pub mod nav;
pub mod quiz;
pub mod store;
pub mod tracker;
pub mod ui;
pub mod utils;

// Re-exports for convenience
pub use app::{App, AppSettings};
pub use config::{load_config, save_config, AppConfig};
pub use models::{
    Answer, AnswerKind, AppState, DailyHealthMetrics, MindfulnessEntry, OnboardingStatus,
    QuestionDescriptor, ReferralRecord, StoreRequest, StoreResponse, UserProfile,
};
pub use quiz::{FlowOutcome, QuizError, QuizFlow};
pub use store::{execute, spawn_store_worker, HealthStore, SqliteStore, StoreError, StoreHandle};
pub use tracker::{MindfulnessTracker, ReferralSection};
pub use ui::draw_app;
