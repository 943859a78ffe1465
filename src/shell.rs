// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Toggle state for the navigation shell (sidebar and navbar dropdowns).

/// Viewport width below which the sidebar starts closed.
pub const SIDEBAR_BREAKPOINT_PX: u32 = 1024;

/// Navbar dropdowns. At most one is open at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dropdown {
    User,
    Social,
}

/// Sidebar and dropdown open/closed flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellState {
    sidebar_open: bool,
    open_dropdown: Option<Dropdown>,
}

impl Default for ShellState {
    fn default() -> Self {
        Self {
            sidebar_open: true,
            open_dropdown: None,
        }
    }
}

impl ShellState {
    /// Initial state for a viewport `width` pixels wide.
    pub fn for_width(width: u32) -> Self {
        let mut shell = Self::default();
        shell.on_resize(width);
        shell
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    pub fn close_sidebar(&mut self) {
        self.sidebar_open = false;
    }

    /// Narrow viewports hide the sidebar, wide ones show it.
    pub fn on_resize(&mut self, width: u32) {
        self.sidebar_open = width >= SIDEBAR_BREAKPOINT_PX;
    }

    pub fn is_open(&self, dropdown: Dropdown) -> bool {
        self.open_dropdown == Some(dropdown)
    }

    /// Open or close `dropdown`. Opening it closes the other one.
    pub fn toggle_dropdown(&mut self, dropdown: Dropdown) {
        self.open_dropdown = if self.is_open(dropdown) {
            None
        } else {
            Some(dropdown)
        };
    }

    pub fn close_dropdowns(&mut self) {
        self.open_dropdown = None;
    }

    /// A click landed somewhere. `inside` is the dropdown whose container
    /// contains the click target, if any; any other open dropdown closes.
    pub fn on_document_click(&mut self, inside: Option<Dropdown>) {
        if self.open_dropdown != inside {
            self.open_dropdown = None;
        }
    }
}
