//! AlphaLab Core — price panel, strategy trait, per-asset ledger, forward-pass loop.
//!
//! This crate contains the simulation engine:
//! - Domain types (OHLCV cells, ledger entries, trade events, integer ids)
//! - Panel builder: flat price rows into a dense `date × asset` matrix + validity mask
//! - Strategy trait with a moving-average crossover reference implementation
//! - Execution engine: all-or-nothing buy/sell against isolated per-asset cash
//! - Forward-pass orchestrator producing the portfolio value series

pub mod data;
pub mod domain;
pub mod engine;
pub mod strategy;
