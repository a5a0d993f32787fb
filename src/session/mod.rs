//! Analysis session management module
//!
//! This module contains:
//! - Session state (image, ROI, midline, scale bar, joints, view)
//! - Message types for pointer, touch, keyboard and sidebar interactions
//! - Message handlers implementing the stage workflow
//! - Keyboard shortcuts

pub mod handlers;
pub mod messages;
pub mod shortcuts;
pub mod state;

pub use messages::{
    Command, EditMsg, Key, KeyMsg, Modifiers, Msg, Named, PointerMsg, TouchMsg, ViewMsg,
};
pub use state::{GestureState, Session, Viewport};
