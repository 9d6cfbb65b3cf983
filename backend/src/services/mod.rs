//! Business logic services
//!
//! Services pull records through the [`RecordStore`](crate::repositories::RecordStore),
//! run the pure engine and persist its results.

pub mod advice;
pub mod aggregator;
pub mod analysis;
pub mod member;
pub mod plan;
pub mod text_generation;

pub use advice::AdviceService;
pub use aggregator::WindowAggregator;
pub use analysis::AnalysisService;
pub use member::MemberService;
pub use plan::PlanService;
pub use text_generation::{DisabledTextGenerator, OllamaTextGenerator, TextGenerator};
