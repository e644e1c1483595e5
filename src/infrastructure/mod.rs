//! Infrastructure layer module
//!
//! This module contains all infrastructure adapters and external integrations:
//! - Balance config file storage
//! - Godot headless simulator
//! - Claude API client and analyst
//! - Run recording
//! - Configuration management
//! - Logging infrastructure
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod claude;
pub mod config;
pub mod logging;
pub mod recording;
pub mod simulator;
pub mod storage;
