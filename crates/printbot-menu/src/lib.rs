// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printbot Menu: the two-level settings keyboard.
//
// A button press arrives as a short callback token (`codec`), is applied to
// the chat's stored settings (`dispatcher`), and the next keyboard is built
// from the configured options and the printer's advertised values
// (`keyboard`).  Navigation depth is never stored: every token says where to
// go next.

pub mod codec;
pub mod dispatcher;
pub mod keyboard;
pub mod summary;

pub use codec::{ActionKind, CallbackCodec, Decoded, DecodeError, EncodeError, MAX_CALLBACK_LEN, MenuAction};
pub use dispatcher::{Dispatcher, Outcome, Render, View};
pub use keyboard::{Button, Keyboard, MenuBuilder};
pub use summary::settings_summary;
