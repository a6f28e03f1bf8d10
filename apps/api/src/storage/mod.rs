//! Persistence-backed routes: island practice attempts and library sync.

pub mod attempts;
pub mod handlers;
pub mod sync;
