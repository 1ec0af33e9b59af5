pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod problem;
pub mod routes;
pub mod state;
