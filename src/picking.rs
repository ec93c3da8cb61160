// Mouse picking state machine for BoxPick-3D

use winit::event::{ElementState, MouseButton};

use crate::scene::{RenderMode, Scene};

/// Where the controller is in a click-and-drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickState {
    /// Button up, frames render normally.
    #[default]
    Idle,
    /// Button went down; the next frame renders id colors and samples `at`.
    /// `held` is cleared if the button is released before that frame runs.
    Picking { at: (i32, i32), held: bool },
    /// Selection resolved, button still held; drags rotate the selection.
    Dragging,
}

/// Turns mouse callbacks into render mode switches and drag rotations.
#[derive(Debug, Default)]
pub struct PickingController {
    state: PickState,
    cursor: (i32, i32),
}

impl PickingController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PickState {
        self.state
    }

    /// Select only while a pick is pending.
    pub fn mode(&self) -> RenderMode {
        match self.state {
            PickState::Picking { .. } => RenderMode::Select,
            PickState::Idle | PickState::Dragging => RenderMode::Display,
        }
    }

    /// Last cursor position seen by a button or drag event.
    pub fn cursor(&self) -> (i32, i32) {
        self.cursor
    }

    pub fn is_button_down(&self) -> bool {
        match self.state {
            PickState::Idle => false,
            PickState::Picking { held, .. } => held,
            PickState::Dragging => true,
        }
    }

    /// Pixel the pending select frame must sample.
    pub fn pick_position(&self) -> Option<(i32, i32)> {
        match self.state {
            PickState::Picking { at, .. } => Some(at),
            PickState::Idle | PickState::Dragging => None,
        }
    }

    /// Handles a button press or release. Returns whether a redraw is needed.
    pub fn on_mouse_button(&mut self, button: MouseButton, state: ElementState, x: i32, y: i32) -> bool {
        if button != MouseButton::Left {
            return false;
        }
        self.cursor = (x, y);

        self.state = match (state, self.state) {
            (ElementState::Pressed, _) => PickState::Picking {
                at: (x, y),
                held: true,
            },
            // The pick still has to run so a quick click selects.
            (ElementState::Released, PickState::Picking { at, .. }) => {
                PickState::Picking { at, held: false }
            }
            (ElementState::Released, PickState::Idle | PickState::Dragging) => PickState::Idle,
        };
        true
    }

    /// Handles cursor motion with a button held. Returns whether a redraw is
    /// needed.
    pub fn on_mouse_drag(&mut self, x: i32, y: i32, scene: &mut Scene) -> bool {
        let (last_x, last_y) = self.cursor;
        self.cursor = (x, y);

        if self.state != PickState::Dragging || !scene.any_selected() {
            return false;
        }

        let (delta_x, delta_y) = (x - last_x, y - last_y);
        if delta_x == 0 && delta_y == 0 {
            return false;
        }
        log::debug!("drag by ({delta_x}, {delta_y})");
        scene.apply_drag(delta_x, delta_y);
        true
    }

    /// Called once by the frame driver after the select frame resolved the
    /// selection. Further frames render in display mode.
    pub fn pick_resolved(&mut self) {
        if let PickState::Picking { held, .. } = self.state {
            self.state = if held {
                PickState::Dragging
            } else {
                PickState::Idle
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::IdColor;
    use approx::assert_relative_eq;

    fn press(controller: &mut PickingController, x: i32, y: i32) -> bool {
        controller.on_mouse_button(MouseButton::Left, ElementState::Pressed, x, y)
    }

    fn release(controller: &mut PickingController, x: i32, y: i32) -> bool {
        controller.on_mouse_button(MouseButton::Left, ElementState::Released, x, y)
    }

    #[test]
    fn starts_idle_in_display_mode() {
        let controller = PickingController::new();
        assert_eq!(controller.state(), PickState::Idle);
        assert_eq!(controller.mode(), RenderMode::Display);
        assert!(!controller.is_button_down());
        assert_eq!(controller.pick_position(), None);
    }

    #[test]
    fn press_switches_next_frame_to_select() {
        let mut controller = PickingController::new();
        assert!(press(&mut controller, 120, 80));
        assert_eq!(controller.mode(), RenderMode::Select);
        assert!(controller.is_button_down());
        assert_eq!(controller.pick_position(), Some((120, 80)));
        assert_eq!(controller.cursor(), (120, 80));
    }

    #[test]
    fn other_buttons_are_ignored() {
        let mut controller = PickingController::new();
        assert!(!controller.on_mouse_button(MouseButton::Right, ElementState::Pressed, 3, 4));
        assert_eq!(controller.state(), PickState::Idle);
        assert_eq!(controller.cursor(), (0, 0));
    }

    #[test]
    fn pick_resolves_once_then_displays() {
        let mut controller = PickingController::new();
        press(&mut controller, 10, 10);
        controller.pick_resolved();
        assert_eq!(controller.state(), PickState::Dragging);
        assert_eq!(controller.mode(), RenderMode::Display);

        controller.pick_resolved();
        assert_eq!(controller.state(), PickState::Dragging);
    }

    #[test]
    fn release_returns_to_idle() {
        let mut controller = PickingController::new();
        press(&mut controller, 10, 10);
        controller.pick_resolved();
        assert!(release(&mut controller, 12, 10));
        assert_eq!(controller.state(), PickState::Idle);
        assert_eq!(controller.mode(), RenderMode::Display);
        assert!(!controller.is_button_down());
    }

    #[test]
    fn quick_click_still_picks_before_going_idle() {
        let mut controller = PickingController::new();
        press(&mut controller, 40, 50);
        release(&mut controller, 40, 50);
        assert_eq!(controller.mode(), RenderMode::Select);
        assert!(!controller.is_button_down());

        controller.pick_resolved();
        assert_eq!(controller.state(), PickState::Idle);
    }

    #[test]
    fn motion_before_the_pick_keeps_the_pick_position() {
        let mut scene = Scene::stacked_boxes(IdColor::WHITE).unwrap();
        let mut controller = PickingController::new();
        press(&mut controller, 100, 100);
        assert!(!controller.on_mouse_drag(130, 90, &mut scene));
        assert_eq!(controller.pick_position(), Some((100, 100)));
        assert_eq!(controller.cursor(), (130, 90));
    }

    #[test]
    fn drag_rotates_the_selected_box() {
        let mut scene = Scene::stacked_boxes(IdColor::WHITE).unwrap();
        let mut controller = PickingController::new();
        press(&mut controller, 100, 100);
        scene.resolve_selection(IdColor::new(0, 255, 0));
        controller.pick_resolved();

        assert!(controller.on_mouse_drag(104, 100, &mut scene));
        assert!(controller.on_mouse_drag(103, 102, &mut scene));

        let rotation = scene.rotation(1).unwrap();
        assert_relative_eq!(rotation.angle_x, 3.0);
        assert_relative_eq!(rotation.angle_y, 2.0);
        assert_eq!(controller.mode(), RenderMode::Display);
    }

    #[test]
    fn drag_without_selection_only_tracks_the_cursor() {
        let mut scene = Scene::stacked_boxes(IdColor::WHITE).unwrap();
        let mut controller = PickingController::new();
        press(&mut controller, 0, 0);
        scene.resolve_selection(scene.background());
        controller.pick_resolved();

        assert!(!controller.on_mouse_drag(50, 20, &mut scene));
        assert_eq!(controller.cursor(), (50, 20));
        for i in 0..3 {
            assert_eq!(scene.rotation(i), Some(Default::default()));
        }
    }

    #[test]
    fn tracked_cursor_avoids_a_jump_on_later_drags() {
        let mut scene = Scene::stacked_boxes(IdColor::WHITE).unwrap();
        let mut controller = PickingController::new();
        press(&mut controller, 0, 0);
        scene.resolve_selection(IdColor::new(255, 0, 0));
        controller.pick_resolved();

        // Motion while a pick is pending must not leak into the rotation.
        press(&mut controller, 10, 0);
        controller.on_mouse_drag(60, 0, &mut scene);
        controller.pick_resolved();
        controller.on_mouse_drag(62, 0, &mut scene);

        assert_relative_eq!(scene.rotation(0).unwrap().angle_x, 2.0);
    }
}
