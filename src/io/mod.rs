// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for figures and configuration files.

pub mod figure;
pub mod serialization;
