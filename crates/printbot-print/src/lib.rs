// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printbot Print: the printer collaborator.  `PrinterClient` is the narrow
// interface the bot talks to; `IppClient` implements it over IPP.

pub mod ipp_client;
pub mod printer;

pub use ipp_client::IppClient;
pub use printer::PrinterClient;
