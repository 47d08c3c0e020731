// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // stage implementations
pub mod config;     // config loading + runtime builder
pub mod engine;     // pipeline executors
pub mod errors;     // error handling
pub mod observability;
pub mod pipeline;   // build states + frozen plans
pub mod ports;      // ports, values, units, naming conventions
pub mod traits;     // unified abstractions
pub mod wiring;     // port resolution
