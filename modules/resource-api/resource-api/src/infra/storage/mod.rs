pub mod entity;
pub mod mapper;
pub mod memory_repo;
pub mod migrations;
pub mod rules;
pub mod sea_orm_repo;

pub use memory_repo::InMemoryResourceModel;
pub use sea_orm_repo::SeaOrmResourceModel;

#[cfg(test)]
mod mapper_test;
