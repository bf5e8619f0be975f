//! # Connect Four
//!
//! A two-player Connect Four engine with save/load, cumulative win totals
//! and a history ledger, played through a terminal UI built with Ratatui.
//!
//! ## Modules
//!
//! - [`game`] — Core game logic: board, win detection, opponents, match state machine
//! - [`ai`] — Agent trait and the random computer opponent
//! - [`persistence`] — Text formats for saves, win totals and history, and their storage
//! - [`session`] — A match bound to its persistent records
//! - [`ui`] — Terminal UI for playing a match
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod persistence;
pub mod session;
pub mod ui;
