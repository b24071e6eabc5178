use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    MouseMove { x: i32, y: i32 },
    MouseButton { button: MouseButton, down: bool },
    MouseWheel { delta: i32 },
    Key { virtual_key: u16, scan_code: u16, down: bool, extended: bool },
}

/// Injects decoded input events into the local OS input stack.
pub trait InputInjector: Send {
    fn inject(&mut self, event: InputEvent) -> Result<()>;

    /// Releases every modifier key the injector believes is held, guarding
    /// against a stuck-modifier state after a focus change mid-keypress.
    fn release_all_modifiers(&mut self) -> Result<()>;

    /// Re-synchronizes the injector's notion of modifier state with the
    /// actual OS state (e.g. after reconnect).
    fn sync_modifier_state(&mut self) -> Result<()>;
}

/// An injector that records events instead of touching the OS input stack;
/// used by tests and headless builds.
#[derive(Default)]
pub struct NullInputInjector {
    pub events: Vec<InputEvent>,
}

impl InputInjector for NullInputInjector {
    fn inject(&mut self, event: InputEvent) -> Result<()> {
        self.events.push(event);
        Ok(())
    }

    fn release_all_modifiers(&mut self) -> Result<()> {
        Ok(())
    }

    fn sync_modifier_state(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_injector_records_events_in_order() {
        let mut injector = NullInputInjector::default();
        injector.inject(InputEvent::MouseMove { x: 10, y: 20 }).unwrap();
        injector.inject(InputEvent::MouseButton { button: MouseButton::Left, down: true }).unwrap();
        assert_eq!(injector.events.len(), 2);
    }
}
