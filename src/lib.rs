pub mod checks;
pub mod db;
pub mod server;
pub mod version;
pub mod web;
