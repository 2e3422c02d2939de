// Library crate shared by the binary and the integration tests.

pub mod api;
pub mod charts;
pub mod columns;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod formatters;
pub mod model;
pub mod page;
pub mod panels;
pub mod render;
pub mod routes;
pub mod server;
pub mod settings;
pub mod state;
pub mod table;
pub mod view;
