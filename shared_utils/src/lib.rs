//! Shared configuration and environment helpers used across the workspace.

pub mod config;
pub mod env;
