pub mod attempt;
pub mod feedback;
pub mod language;
pub mod library;
