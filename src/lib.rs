#[macro_use]
extern crate rocket;
#[macro_use]
extern crate diesel;

pub mod bound_port;
pub mod catchers;
pub mod configuration;
pub mod domain;
pub mod email;
pub mod engine;
pub mod guards;
pub mod models;
pub mod routes;
pub mod schema;
pub mod startup;
pub mod storage;
pub mod telemetry;
