pub mod alert;
pub mod auth;
pub mod import;
pub mod user;
pub mod vehicle;
