//! Lunchdesk Core - Shared types library.
//!
//! This crate provides the types shared by every Lunchdesk component:
//! - `client` - HTTP client, query cache and mutation lifecycle
//! - `cli` - Command-line surface over the admin API
//!
//! # Architecture
//!
//! The core crate contains only types, validation and input state - no I/O,
//! no HTTP clients. Everything here can be exercised synchronously.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails, prices, weekdays and statuses
//! - [`models`] - Entity records returned by the admin API
//! - [`forms`] - Client-side validation that runs before any request is sent
//! - [`otp`] - Six-cell one-time-password input

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod forms;
pub mod models;
pub mod otp;
pub mod types;

pub use forms::ValidationError;
pub use models::*;
pub use otp::{OTP_LENGTH, Otp, OtpInput};
pub use types::*;
