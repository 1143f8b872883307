//! Home menu tiles and their dispatch.
//!
//! Destinations are route names, forwarded to the navigation shell without
//! validation; an unregistered name fails there.

use serde::Serialize;

use crate::error::Result;
use crate::navigation::{NavigationShell, Screen};

/// One tile of the home menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    /// Tile caption.
    pub label: &'static str,
    /// Tile icon.
    pub glyph: &'static str,
    /// Route name requested on activation.
    pub destination: &'static str,
}

/// The home menu, in display order.
pub const HOME_MENU: [MenuEntry; 3] = [
    MenuEntry {
        label: "Attendance",
        glyph: "📋",
        destination: "Attendance",
    },
    MenuEntry {
        label: "Activities",
        glyph: "🎯",
        destination: "Activities",
    },
    MenuEntry {
        label: "Messages",
        glyph: "💬",
        destination: "Messages",
    },
];

/// Renders the menu and forwards tile activations to navigation.
#[derive(Debug, Clone, Copy)]
pub struct MenuDispatcher {
    entries: &'static [MenuEntry],
}

impl Default for MenuDispatcher {
    fn default() -> Self {
        Self::new(&HOME_MENU)
    }
}

impl MenuDispatcher {
    /// Create a dispatcher over a static list of entries.
    #[must_use]
    pub fn new(entries: &'static [MenuEntry]) -> Self {
        Self { entries }
    }

    /// Entries in display order.
    #[must_use]
    pub fn entries(&self) -> &'static [MenuEntry] {
        self.entries
    }

    /// Find a tile by label or destination, ignoring ASCII case.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&'static MenuEntry> {
        self.entries.iter().find(|entry| {
            entry.label.eq_ignore_ascii_case(key) || entry.destination.eq_ignore_ascii_case(key)
        })
    }

    /// Activate `entry`, requesting a transition to its destination.
    ///
    /// # Errors
    ///
    /// Propagates the navigation error when the destination is not registered.
    pub fn activate(&self, entry: &MenuEntry, shell: &mut NavigationShell) -> Result<Screen> {
        tracing::debug!(label = entry.label, destination = entry.destination, "menu tile activated");
        shell.navigate(entry.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn shell_at_home() -> NavigationShell {
        let mut shell = NavigationShell::default();
        shell.navigate("Home").unwrap();
        shell
    }

    #[test]
    fn test_menu_order() {
        let labels: Vec<_> = MenuDispatcher::default()
            .entries()
            .iter()
            .map(|e| e.label)
            .collect();
        assert_eq!(labels, ["Attendance", "Activities", "Messages"]);
    }

    #[test]
    fn test_activate_attendance() {
        let menu = MenuDispatcher::default();
        let mut shell = shell_at_home();
        let entry = menu.find("attendance").unwrap();

        assert_eq!(menu.activate(entry, &mut shell).unwrap(), Screen::Attendance);
        assert_eq!(shell.current(), Screen::Attendance);
    }

    #[test]
    fn test_activate_unregistered_destination_errors() {
        let menu = MenuDispatcher::default();
        let mut shell = shell_at_home();

        for key in ["Activities", "Messages"] {
            let entry = menu.find(key).unwrap();
            let err = menu.activate(entry, &mut shell).unwrap_err();
            assert!(matches!(err, Error::UnknownScreen { .. }));
            assert_eq!(shell.current(), Screen::Home);
        }
    }

    #[test]
    fn test_find_unknown() {
        assert!(MenuDispatcher::default().find("Stocks").is_none());
    }
}
