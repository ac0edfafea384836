pub mod responses;
pub mod runtime;
