// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printbot Bridge: the outside world as seen by a printer instance.
//
// `traits` names what the bot needs from the chat platform and from file
// hosting.  `telegram` implements it with teloxide and reqwest; `stub`
// records calls in memory for tests.

pub mod http;
pub mod stub;
pub mod telegram;
pub mod traits;

pub use telegram::{TelegramFiles, TelegramTransport};
pub use traits::{ChatTransport, FileResolver};
