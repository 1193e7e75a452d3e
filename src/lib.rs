// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! CORS proxy and Open Graph preview service.
//!
//! The extraction core (`services::matcher`, `services::extractor`,
//! `services::hero`, `services::resolver`) and the header policy
//! (`services::headers`) are pure and do no I/O; `app` wires them behind
//! axum handlers and `services::fetcher` does the outbound HTTP.

pub mod app;
pub mod models;
pub mod services;
