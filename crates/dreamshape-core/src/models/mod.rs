pub mod exercise;
pub mod profile;
pub mod template;
pub mod workout;
