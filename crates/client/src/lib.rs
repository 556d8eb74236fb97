// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

pub mod address;
mod attempts;
pub mod backend;
pub mod clear_values;
mod client;
pub mod dev;
pub mod encrypt;
mod error;
mod handle;
pub mod keypair;
pub mod public_decrypt;
pub mod session;
pub mod typed_data;
pub mod user_decrypt;
pub mod wallet;

pub use address::{normalize, normalize_strict};
pub use attempts::*;
pub use backend::*;
pub use clear_values::DecryptResponse;
pub use client::VeilClient;
pub use encrypt::encrypt_value;
pub use error::*;
pub use handle::*;
pub use keypair::{Keypair, KeypairGenerator, LocalKeypairGenerator};
pub use public_decrypt::public_decrypt;
pub use session::{Session, SessionState};
pub use user_decrypt::{user_decrypt, DEFAULT_DURATION_DAYS};
pub use wallet::{LocalWallet, Wallet};
