pub mod alerts;
pub mod users;
pub mod vehicles;
