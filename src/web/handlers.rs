//! HTTP request handlers, one module per endpoint group

pub mod epg;
pub mod health;
pub mod index;
pub mod lineup;
pub mod status;
