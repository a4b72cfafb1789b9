//! Entity Module

pub mod auth_session;
