//! Clients - HTTP Clients for External APIs
//!
//! Este módulo contiene el cliente HTTP del backend CMMS.

pub mod cmms_client;

pub use cmms_client::CmmsApiClient;
