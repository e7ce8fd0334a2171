//! Ward administration service: sacrament meeting programs.

pub mod audit;
pub mod auth;
pub mod composer;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod templates_structs;
