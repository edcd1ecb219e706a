pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod pages;
pub mod render;
pub mod routes;
pub mod services;
pub mod shell;
pub mod state;
