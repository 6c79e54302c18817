//! Async client for the Rituals cloud API behind the Perfume Genie
//! smart diffusers.
//!
//! An [`Account`] authenticates against the vendor cloud and lists the
//! diffusers linked to it; each [`Diffuser`] exposes the device's last
//! reported state and posts attribute changes back. The server is the
//! sole source of truth: mutations never touch the local snapshot, so
//! call [`Diffuser::update_data`] afterwards to observe confirmed state.

pub mod account;
pub mod diffuser;
pub mod error;
pub mod models;
mod session;

pub use account::Account;
pub use diffuser::Diffuser;
pub use error::{Error, Result};
pub use models::{Attributes, DeviceSnapshot, Hub, LoginResponse, Sensor, Sensors};

/// Login endpoint (form-encoded `email` + `password`).
pub const AUTH_URL: &str = "https://rituals.sense-company.com/ocapi/login";
/// Device-listing endpoint; the account hash is appended to the path.
pub const ACCOUNT_URL: &str = "https://rituals.sense-company.com/api/account/hubs";
/// Single-device fetch endpoint; the device hash is appended to the path.
pub const HUB_URL: &str = "https://rituals.sense-company.com/api/account/hub";
/// Shared attribute-update endpoint (form-encoded `hub` + `json`).
pub const UPDATE_URL: &str = "https://rituals.sense-company.com/api/hub/update/attr";
