pub mod chat;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod prompt;
pub mod sanitize;
