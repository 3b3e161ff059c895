pub mod generator;
pub mod prompt;

pub use generator::{OpenAiPlanGenerator, PlanGenerator};
pub use prompt::{build_plan_prompt, HistoryEntry, PlanPromptInput, SessionHistory, SYSTEM_PERSONA};
