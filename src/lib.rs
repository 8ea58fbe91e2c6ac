// Library exports for Inkstand
// This allows integration tests and external code to use Inkstand modules

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;
