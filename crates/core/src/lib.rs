// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ml-core: value model, deep merge and override-token flattening for mlaunch

pub mod clock;
pub mod encode;
pub mod flatten;
pub mod merge;
pub mod token;
pub mod value;

#[cfg(any(test, feature = "test-support"))]
pub use clock::FakeClock;
pub use clock::{Clock, SystemClock, STAMP_FORMAT};
pub use encode::encode;
pub use flatten::flatten;
pub use merge::merge;
pub use token::{join_tokens, OverrideToken};
pub use value::{Number, Table, Value, MARKER_KEY};
