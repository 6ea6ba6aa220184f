//! Reminder signalling
//!
//! The store never talks to a notification system directly. Writes publish
//! [`ReminderEvent`]s on a [`ReminderBus`] and whoever owns local
//! notifications consumes them.

mod bus;
mod event;

pub use bus::*;
pub use event::*;
