//! Command-line front end for quotation pricing and the saved-quote store.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod export;
pub mod logging;
