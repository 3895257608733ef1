pub mod audit;
pub mod catalog;
pub mod dispatch;
pub mod init;
pub mod schema;
pub mod shared;
pub mod user;
