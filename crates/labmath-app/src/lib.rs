pub mod app;
pub mod auth_handler;
pub mod config;
pub mod db_handler;
pub mod error;
pub mod middleware;
pub mod mirror_handler;
