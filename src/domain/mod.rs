pub mod detail;
pub mod message;
pub mod notification;
