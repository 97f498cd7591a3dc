pub mod clip_query;
pub mod format;
pub mod log;
