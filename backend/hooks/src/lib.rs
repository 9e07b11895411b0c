pub mod builtin;
pub mod pipeline;
pub mod registry;
pub mod types;

pub use builtin::{ExcludeUsersHook, LoggingHook, LookBackOverrideHook, SqlConditionHook};
pub use pipeline::HookPipeline;
pub use registry::{Hook, HookRegistry};
pub use types::{DisplayPayload, HookPayload, HookPhase, HookResult};
