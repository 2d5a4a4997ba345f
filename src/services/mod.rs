// SPDX-License-Identifier: MIT

//! Services module - external collaborators.

pub mod chat;

pub use chat::{ChatProvider, ChatUserProfile};
