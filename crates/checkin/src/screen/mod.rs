//! Screen controllers.
//!
//! - **Login**: no credentials are checked; submitting moves to Home.
//! - **Home**: the menu of features.
//! - **Attendance**: the QR scanner and check-in exchange.

mod attendance;

pub use attendance::{AttendanceScreen, DecodeOutcome, Ignored, ScannerView};

use crate::error::Result;
use crate::menu::{MenuDispatcher, MenuEntry};
use crate::navigation::{NavigationShell, Screen};

/// The entry screen.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoginScreen;

impl LoginScreen {
    /// Submit the login form.
    ///
    /// # Errors
    ///
    /// Returns an error if the shell has no Home screen registered.
    pub fn submit(self, shell: &mut NavigationShell) -> Result<Screen> {
        shell.navigate(Screen::Home.name())
    }
}

/// The home menu screen.
#[derive(Debug, Default, Clone, Copy)]
pub struct HomeScreen {
    menu: MenuDispatcher,
}

impl HomeScreen {
    /// Greeting shown above the tiles.
    pub const WELCOME: &'static str = "Welcome!";

    /// Tiles in display order.
    #[must_use]
    pub fn tiles(&self) -> &'static [MenuEntry] {
        self.menu.entries()
    }

    /// Tap the tile matching `key` (label or destination).
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnknownScreen`] if no tile matches or the tile's
    /// destination is not registered.
    pub fn tap(&self, key: &str, shell: &mut NavigationShell) -> Result<Screen> {
        let entry = self
            .menu
            .find(key)
            .ok_or_else(|| crate::Error::unknown_screen(key))?;
        self.menu.activate(entry, shell)
    }
}
