// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod fixtures;
mod stub_backend;
mod stub_wallet;

pub use fixtures::*;
pub use stub_backend::*;
pub use stub_wallet::*;
