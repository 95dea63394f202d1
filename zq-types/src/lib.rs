//! # ZQ Types
//!
//! Plain data types shared between the ZQ core and anything that talks to it.
//!
//! - [`keycode`] - HID keycodes and the keycode classes the mouse layer cares about
//! - [`modifier`] - Modifier key combinations
//! - [`action`] - What a keymap position does when it is pressed

#![no_std]

pub mod action;
pub mod keycode;
pub mod modifier;
