//! Minimal navigation shell: named screens on a stack.

use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};

/// Screen names known to the application.
///
/// `Activities` and `Messages` are reachable from the home menu but have no
/// registered screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Screen {
    /// Entry screen.
    Login,
    /// Menu of features.
    Home,
    /// QR attendance scanner.
    Attendance,
    /// Activity list.
    Activities,
    /// Messaging.
    Messages,
}

impl Screen {
    /// Route name, as used by menu entries.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Home => "Home",
            Self::Attendance => "Attendance",
            Self::Activities => "Activities",
            Self::Messages => "Messages",
        }
    }

    /// Header title.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Login => "Log in",
            Self::Home => "Home",
            Self::Attendance => "Attendance",
            Self::Activities => "Activities",
            Self::Messages => "Messages",
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Screen {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Login" => Ok(Self::Login),
            "Home" => Ok(Self::Home),
            "Attendance" => Ok(Self::Attendance),
            "Activities" => Ok(Self::Activities),
            "Messages" => Ok(Self::Messages),
            other => Err(Error::unknown_screen(other)),
        }
    }
}

/// The screens that actually have an implementation.
pub const REGISTERED_SCREENS: [Screen; 3] = [Screen::Login, Screen::Home, Screen::Attendance];

/// Ordered stack of screens.
#[derive(Debug, Clone)]
pub struct NavigationShell {
    registered: Vec<Screen>,
    stack: Vec<Screen>,
}

impl Default for NavigationShell {
    fn default() -> Self {
        Self::new(REGISTERED_SCREENS.to_vec(), Screen::Login)
    }
}

impl NavigationShell {
    /// Create a shell with the given registered screens, starting at `initial`.
    #[must_use]
    pub fn new(registered: Vec<Screen>, initial: Screen) -> Self {
        Self {
            registered,
            stack: vec![initial],
        }
    }

    /// Whether a screen with this route name is registered.
    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        name.parse::<Screen>()
            .is_ok_and(|screen| self.registered.contains(&screen))
    }

    /// The active screen.
    #[must_use]
    pub fn current(&self) -> Screen {
        // The stack is never emptied: `back` refuses to pop the root.
        self.stack[self.stack.len() - 1]
    }

    /// All screens on the stack, root first.
    #[must_use]
    pub fn stack(&self) -> &[Screen] {
        &self.stack
    }

    /// Navigate to the screen named `name`.
    ///
    /// Navigating to a screen already on the stack pops back to it rather than
    /// pushing a duplicate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownScreen`] if no screen is registered under `name`.
    pub fn navigate(&mut self, name: &str) -> Result<Screen> {
        let screen = name
            .parse::<Screen>()
            .ok()
            .filter(|screen| self.registered.contains(screen))
            .ok_or_else(|| Error::unknown_screen(name))?;

        if let Some(pos) = self.stack.iter().position(|s| *s == screen) {
            self.stack.truncate(pos + 1);
        } else {
            self.stack.push(screen);
        }
        tracing::debug!(screen = %screen, depth = self.stack.len(), "navigated");
        Ok(screen)
    }

    /// Pop the active screen.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AtRoot`] when only the root screen remains.
    pub fn back(&mut self) -> Result<Screen> {
        if self.stack.len() <= 1 {
            return Err(Error::AtRoot);
        }
        self.stack.pop();
        Ok(self.current())
    }
}
