pub mod handler;
pub mod models;
pub mod service;

mod budget_repository;
mod repository;
