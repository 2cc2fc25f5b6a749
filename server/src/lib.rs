pub mod config;
pub mod ingest;
pub mod listing;
pub mod rating;
pub mod server;
pub mod slots;

mod handlers;
mod http_types;
mod server_state;
