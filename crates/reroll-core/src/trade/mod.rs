//! Offer capture, acceptance and scoring.

pub mod capture;
pub mod catalog;
pub mod evaluator;
pub mod judge;

pub use capture::TradeCapture;
pub use catalog::PropertyInfo;
pub use evaluator::{Grade, TradeEvaluator, TradeScore};
pub use judge::TradeJudge;
