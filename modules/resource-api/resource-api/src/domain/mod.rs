pub mod access;
pub mod context;
pub mod controller;
pub mod error;
pub mod messages;
