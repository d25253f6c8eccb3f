pub mod notify;
pub mod repository;
pub mod types;
