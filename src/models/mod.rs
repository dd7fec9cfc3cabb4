// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data structures shared by the client and its callers.

pub mod bbox;
pub mod config;
pub mod placement;
pub mod selector;
pub mod shapes;
