pub mod auth;
pub mod http_client;
pub mod sheets_client;
pub mod value_range_factory;
