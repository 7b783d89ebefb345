//! Lunchdesk Client - admin API access layer.
//!
//! Talks to the catering admin REST API on behalf of the dashboard:
//!
//! - [`ApiClient`] - one configured HTTP client; attaches the session's
//!   bearer token to every request and maps failures to [`ApiError`]
//! - [`resources`] - one async method per remote action
//! - [`QueryCache`] - cached reads keyed by resource, filter and page, with
//!   prefix invalidation
//! - [`Mutation`] - single-flight write handle that invalidates on success
//! - [`Console`] - the action layer screens call, publishing [`Notice`]s
//!
//! # Example
//!
//! ```rust,ignore
//! use lunchdesk_client::{ClientConfig, Console};
//! use lunchdesk_core::forms::LoginForm;
//!
//! let console = Console::new(&ClientConfig::from_env()?)?;
//! console.sign_in(LoginForm { email, password }).await?;
//! let stats = console.dashboard_stats().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
mod client;
pub mod config;
mod console;
pub mod error;
mod mutation;
mod notice;
pub mod resources;
mod session;

pub use cache::{Invalidation, QueryCache, QueryKey, QueryWatch};
pub use client::ApiClient;
pub use config::{ClientConfig, ConfigError};
pub use console::{
    CONFIRM_DELETE_LOCATION, CONFIRM_DELETE_MEAL, CONFIRM_DELETE_USER, Console, DeleteOutcome,
};
pub use error::{ActionError, ApiError, MutationError};
pub use mutation::Mutation;
pub use notice::{Notice, NoticeLevel, Notices};
pub use resources::OrderQuery;
pub use session::{Session, SessionStore};
