// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Leitwerk — Application-facing surface: typed single-shot commands and the
// single-hook adapter that forwards relayed host events into one
// externally-set callback.

pub mod commands;
pub mod hook;

pub use commands::{Home, User, get_user, hello};
pub use hook::EventHook;
