pub mod config;
pub mod console;
pub mod dashboard;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod interaction;
pub mod push;
pub mod runtime;
