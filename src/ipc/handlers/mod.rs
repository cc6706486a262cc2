pub mod assigner;
pub mod core;
pub mod history;
pub mod picker;
pub mod shuffler;
