// crates/aiva-core/src/helpers/mod.rs

pub mod time;
