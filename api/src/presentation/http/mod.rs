pub mod auth;
pub mod graphql;
pub mod health;
