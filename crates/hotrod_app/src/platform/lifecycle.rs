/// What to do once the last window is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllClosed {
    Quit,
    StayAlive,
}

/// Owner of the shell's zero-or-one window.
#[derive(Debug)]
pub struct Lifecycle<W> {
    window: Option<W>,
    keep_alive: bool,
}

impl<W> Lifecycle<W> {
    pub fn new(keep_alive: bool) -> Self {
        Self {
            window: None,
            keep_alive,
        }
    }

    pub fn window(&self) -> Option<&W> {
        self.window.as_ref()
    }

    /// Records a new window and hands back the one it replaces.
    pub fn window_created(&mut self, window: W) -> Option<W> {
        self.window.replace(window)
    }

    pub fn window_closed(&mut self) -> Option<W> {
        self.window.take()
    }

    pub fn all_windows_closed(&self) -> AllClosed {
        if self.keep_alive {
            AllClosed::StayAlive
        } else {
            AllClosed::Quit
        }
    }

    pub fn should_recreate_on_activate(&self) -> bool {
        self.window.is_none()
    }
}
