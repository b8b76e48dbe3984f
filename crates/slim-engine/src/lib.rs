//! The SLIM instruction engine: turns one decoded batch into typed
//! instructions, executes each against an [`slim_context::ExecutionContext`],
//! and appends a `[id, outcome]` row to a [`Results`] collector for every
//! one of them.

mod engine;
mod instruction;
mod results;

pub use engine::execute_batch;
pub use instruction::{parse as parse_instruction, Instruction};
pub use results::{is_abort_kind, Results, OK, VOID};
