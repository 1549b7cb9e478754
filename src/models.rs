use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One selectable option of a choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ChoiceOption {
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            description: None,
        }
    }
}

/// Input shape of a question, together with the constraints that only make
/// sense for that shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnswerKind {
    Single {
        options: Vec<ChoiceOption>,
    },
    Multiple {
        options: Vec<ChoiceOption>,
        #[serde(default, rename = "maxSelections", alias = "max_selections")]
        max_selections: Option<usize>,
    },
    Text,
    Input,
    Slider {
        min: f64,
        max: f64,
        #[serde(default = "default_step")]
        step: f64,
        #[serde(default)]
        unit: Option<String>,
    },
}

fn default_step() -> f64 {
    1.0
}

impl AnswerKind {
    pub fn options(&self) -> &[ChoiceOption] {
        match self {
            AnswerKind::Single { options } | AnswerKind::Multiple { options, .. } => options,
            AnswerKind::Text | AnswerKind::Input | AnswerKind::Slider { .. } => &[],
        }
    }

    pub fn is_choice(&self) -> bool {
        matches!(self, AnswerKind::Single { .. } | AnswerKind::Multiple { .. })
    }

    pub fn is_free_text(&self) -> bool {
        matches!(self, AnswerKind::Text | AnswerKind::Input)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionDescriptor {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default, rename = "nextButtonText", alias = "next_button_text")]
    pub next_button_text: Option<String>,
    #[serde(flatten)]
    pub kind: AnswerKind,
    /// 1-based position; stamped by the flow.
    #[serde(default)]
    pub question_number: usize,
    #[serde(default)]
    pub total_questions: usize,
}

/// A recorded quiz answer. The variant must agree with the question's
/// `AnswerKind`; a mismatching prior answer counts as no answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Answer {
    Text(String),
    Selections(Vec<String>),
    Number(f64),
}

impl Answer {
    pub fn display(&self) -> String {
        match self {
            Answer::Text(text) => text.clone(),
            Answer::Selections(values) => values.join(", "),
            Answer::Number(n) => format_number(*n),
        }
    }
}

/// Formats slider values without a trailing `.0` for whole numbers.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        format!("{:.1}", n)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStatus {
    NotStarted,
    Completed,
    Skipped,
}

impl OnboardingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OnboardingStatus::NotStarted => "not_started",
            OnboardingStatus::Completed => "completed",
            OnboardingStatus::Skipped => "skipped",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "completed" => OnboardingStatus::Completed,
            "skipped" => OnboardingStatus::Skipped,
            _ => OnboardingStatus::NotStarted,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub user_id: String,
    pub onboarding: OnboardingStatus,
    pub answers: BTreeMap<String, Answer>,
    pub referral: Option<ReferralRecord>,
}

impl UserProfile {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            onboarding: OnboardingStatus::NotStarted,
            answers: BTreeMap::new(),
            referral: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindfulnessEntry {
    pub minutes: u32,
    pub activity: String,
    pub timestamp: DateTime<Utc>,
}

/// Everything logged by one user on one calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyHealthMetrics {
    pub user_id: String,
    pub date: NaiveDate,
    pub mindfulness: Vec<MindfulnessEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferralRecord {
    pub referral_code: Option<String>,
    pub referral_count: u32,
    pub referrals: Vec<String>,
    pub referred_by: Option<String>,
}

impl ReferralRecord {
    pub fn has_code(&self) -> bool {
        self.referral_code
            .as_deref()
            .is_some_and(|code| !code.is_empty())
    }
}

#[derive(Debug)]
pub enum StoreRequest {
    AddMindfulness {
        user_id: String,
        date: NaiveDate,
        entry: MindfulnessEntry,
    },
    LoadDailyMetrics {
        user_id: String,
        date: NaiveDate,
    },
    LoadReferral {
        user_id: String,
    },
    SaveReferral {
        user_id: String,
        record: ReferralRecord,
    },
    SaveProfile {
        profile: UserProfile,
    },
}

#[derive(Debug)]
pub enum StoreResponse {
    MindfulnessAdded {
        entry: MindfulnessEntry,
        result: Result<(), crate::store::StoreError>,
    },
    DailyMetricsLoaded(Result<Option<DailyHealthMetrics>, crate::store::StoreError>),
    ReferralLoaded(Result<Option<ReferralRecord>, crate::store::StoreError>),
    ReferralSaved {
        record: ReferralRecord,
        result: Result<(), crate::store::StoreError>,
    },
    ProfileSaved(Result<(), crate::store::StoreError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Onboarding,
    OnboardingSummary,
    Main,
    QuitConfirm,
}
