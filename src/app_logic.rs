/*
 * This module provides the application logic layer, centered around
 * `ScratchAppLogic` which turns host events into host commands. The event
 * and command vocabulary lives in `ports.rs` so hosts depend only on that
 * contract. Unit tests for `ScratchAppLogic` are in `handler_tests.rs`.
 */
pub mod handler;
pub mod ports;


pub use handler::ScratchAppLogic;
pub use ports::{HostCommand, MessageSeverity, PopupRow, ScratchEvent, ScratchEventHandler};
