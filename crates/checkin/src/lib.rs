//! `checkin` - attendance check-in client
//!
//! Scans QR codes, reports each one to the attendance service, and drives the
//! small screen flow around it (login, home menu, scanner).

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod menu;
pub mod navigation;
pub mod notification;
pub mod permission;
pub mod scan;
pub mod screen;
pub mod source;

pub use client::{CheckInClient, CheckInResult};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use menu::{MenuDispatcher, MenuEntry};
pub use navigation::{NavigationShell, Screen};
pub use notification::{DialogAction, Notification};
pub use permission::{PermissionGate, PermissionProvider, ScanPermission};
pub use scan::{LatchState, ScanEvent, ScanLatch};
pub use screen::{AttendanceScreen, DecodeOutcome, ScannerView};
