pub mod auth;
pub mod role_gateway;
