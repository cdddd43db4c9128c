pub mod cors;
pub mod panic;
pub mod security_headers;
