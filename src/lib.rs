pub mod server;

pub use server::config::configure_app;
