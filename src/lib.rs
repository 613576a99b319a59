pub mod codec;
pub mod config;
pub mod entities;
pub mod error;
pub mod models;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
