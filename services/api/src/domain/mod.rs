pub mod dealership;
pub mod de;
pub mod repository;
pub mod types;
