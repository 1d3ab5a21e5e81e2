pub mod jwt;
pub mod lineup_client;
pub mod settings;
