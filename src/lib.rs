pub mod auction;
pub mod bidding;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod money;
pub mod query;
pub mod routes;
pub mod store;
pub mod users;
