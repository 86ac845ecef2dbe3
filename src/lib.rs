pub mod config;
pub mod i18n;
pub mod pages;
pub mod server;
pub mod session;
