pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod employers;
pub mod error;
pub mod extract;
pub mod memory;
pub mod state;
pub mod validation;
