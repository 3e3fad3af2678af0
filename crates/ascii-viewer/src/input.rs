use glyphtrail::PointerSignal;
use winit::{
    dpi::PhysicalPosition,
    event::{TouchPhase, WindowEvent},
};

/// Feeds window pointer events into the scene's [`PointerSignal`].
///
/// Once a touch has been seen, cursor motion is ignored.
pub struct PointerInput {
    signal: PointerSignal,
    touch_seen: bool,
}

impl PointerInput {
    pub fn new(signal: PointerSignal) -> Self {
        Self {
            signal,
            touch_seen: false,
        }
    }

    /// Surface size in physical pixels, as the positions winit reports.
    pub fn handle_event(&mut self, event: &WindowEvent, width: u32, height: u32) {
        match event {
            WindowEvent::CursorMoved { position, .. } if !self.touch_seen => {
                self.write(*position, width, height);
            }
            WindowEvent::Touch(touch) => {
                self.touch_seen = true;
                if matches!(touch.phase, TouchPhase::Started | TouchPhase::Moved) {
                    self.write(touch.location, width, height);
                }
            }
            _ => {}
        }
    }

    fn write(&self, pos: PhysicalPosition<f64>, width: u32, height: u32) {
        self.signal.write_pixels(pos.x, pos.y, width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use winit::event::{DeviceId, Touch};

    fn device() -> DeviceId {
        // SAFETY: only compared, never handed back to the platform.
        unsafe { DeviceId::dummy() }
    }

    fn cursor(x: f64, y: f64) -> WindowEvent {
        WindowEvent::CursorMoved {
            device_id: device(),
            position: PhysicalPosition::new(x, y),
        }
    }

    fn touch(x: f64, y: f64, phase: TouchPhase) -> WindowEvent {
        WindowEvent::Touch(Touch {
            device_id: device(),
            phase,
            location: PhysicalPosition::new(x, y),
            force: None,
            id: 0,
        })
    }

    #[test]
    fn cursor_is_normalized_with_y_up() {
        let signal = PointerSignal::new();
        let mut input = PointerInput::new(signal.clone());
        input.handle_event(&cursor(600.0, 150.0), 800, 600);
        assert_eq!(signal.read(), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn touch_takes_precedence_over_cursor() {
        let signal = PointerSignal::new();
        let mut input = PointerInput::new(signal.clone());
        input.handle_event(&touch(0.0, 0.0, TouchPhase::Started), 800, 600);
        assert_eq!(signal.read(), Vec2::new(-1.0, 1.0));

        input.handle_event(&cursor(400.0, 300.0), 800, 600);
        assert_eq!(signal.read(), Vec2::new(-1.0, 1.0));

        input.handle_event(&touch(800.0, 600.0, TouchPhase::Moved), 800, 600);
        assert_eq!(signal.read(), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn lifted_touch_keeps_last_position() {
        let signal = PointerSignal::new();
        let mut input = PointerInput::new(signal.clone());
        input.handle_event(&touch(400.0, 300.0, TouchPhase::Moved), 800, 600);
        input.handle_event(&touch(0.0, 0.0, TouchPhase::Ended), 800, 600);
        assert_eq!(signal.read(), Vec2::ZERO);
    }
}
