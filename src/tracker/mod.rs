//! Tracker widgets. Each one mirrors a store record locally: it fetches on
//! mount, mutates optimistically on user action and emits the matching
//! [`StoreRequest`](crate::models::StoreRequest) for the worker.

pub mod mindfulness;
pub mod referral;
pub mod share;

pub use mindfulness::MindfulnessTracker;
pub use referral::{
    create_referral_link, generate_referral_code, ReferralSection, ReferralUpdate, ShareMethod,
};
pub use share::{Clipboard, CommandShareTarget, ShareError, SharePayload, ShareTarget, SystemClipboard};
