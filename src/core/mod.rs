pub mod auth;
pub mod backend;
pub mod calculator;
pub mod chat;
pub mod essay;
pub mod expr;
pub mod timer;
pub mod tips;
pub mod todo;
