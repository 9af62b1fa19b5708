//! backport - cherry-pick merged GitHub pull requests onto release branches
//!
//! The library finds recently merged pull requests, checks whether their
//! commits apply cleanly to a target branch by probing GitHub's own
//! mergeability computation, and after explicit confirmation opens a
//! cherry-pick pull request against the target.
//!
//! # Modules
//!
//! - [`cherry_pick`] - discovery, conflict probing and materialization
//! - [`inspect`] - read-only summaries and diffs of a single PR
//! - [`platform`] - GitHub gateway behind the [`platform::PlatformService`] trait
//! - [`auth`] - token discovery
//! - [`config`] - layered settings
//! - [`types`] - shared data types
//! - [`error`] - error type and result alias

pub mod auth;
pub mod cherry_pick;
pub mod config;
pub mod error;
pub mod inspect;
pub mod platform;
pub mod types;

pub use error::{Error, Result};
