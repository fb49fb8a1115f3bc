pub mod error;
pub mod io;
pub mod llm;
pub mod models;
pub mod stages;

pub use error::StoryError;
pub use io::{format_report, prompt_for_request, read_story_file, verdict_json};
pub use llm::{
    AnthropicClient, AnthropicConfig, ChatMessage, GenerationRequest, RetryPolicy,
    RetryingService, Role, ServiceError, TextService,
};
pub use models::{Candidate, LoopResult, LoopState, RubricDimension, UserRequest, Verdict};
pub use stages::{draft, evaluate, judge_only, revise, run_story_loop, LoopConfig};
