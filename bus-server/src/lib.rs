//! Bus arrival server.
//!
//! Scrapes live arrival tables from a list of bus route pages, picks out
//! the configured stations in their configured directions, and answers a
//! chat message with one arrival summary per station.

pub mod aggregate;
pub mod config;
pub mod document;
pub mod domain;
pub mod fetch;
pub mod normalize;
pub mod notify;
pub mod parser;
pub mod report;
pub mod service;
pub mod web;
