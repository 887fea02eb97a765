pub mod health;
pub mod remove;
