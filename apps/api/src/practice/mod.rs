//! Practice content: vocabulary tasks, discussion contexts and custom missions.

pub mod handlers;
pub mod prompts;
pub mod scenarios;
pub mod tasks;
