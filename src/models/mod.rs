// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod config;
pub mod error;
pub mod ogp;
pub mod proxy;
pub mod target;
pub mod version;
