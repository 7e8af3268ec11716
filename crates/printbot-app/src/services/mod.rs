// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer: bridges the chat handlers to the printbot backend crates.
//
// `AppServices` opens storage and builds one `PrinterBot` per configured
// printer; handlers only ever talk to those.

pub mod app_services;
pub mod data_dir;
pub mod printer_bot;
