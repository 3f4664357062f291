pub mod models;
pub mod plan_service;
