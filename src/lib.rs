//! Neuro Snake - a wrap-around Snake game with a learned steering policy
//!
//! This library provides:
//! - Core game logic on a toroidal grid (game module)
//! - Frame-driven stepping with pluggable steering (driver module)
//! - Sensors, exploration and a trainable predictor (policy module)
//! - TUI rendering and keyboard input (render, input modules)
//! - Play, watch and headless training modes (modes module)

pub mod config;
pub mod driver;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod policy;
pub mod render;
