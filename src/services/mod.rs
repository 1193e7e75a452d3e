// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod extractor;
pub mod fetcher;
pub mod headers;
pub mod hero;
pub mod logging;
pub mod matcher;
pub mod resolver;
