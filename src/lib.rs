pub mod authz;
pub mod config;
pub mod consts;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
