pub mod db;
pub mod marketcheck;
pub mod places;
pub mod realtime;
pub mod sms;
