// Application context and frame driver for BoxPick-3D

use glam::Mat4;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

use crate::config::AppConfig;
use crate::error::RenderResult;
use crate::math::Camera;
use crate::picking::PickingController;
use crate::scene::{Canvas, IdColor, RenderMode, Scene};

/// What the windowing layer should do after an input callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Ignored,
    Redraw,
    Exit,
}

/// Drawable area in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Rendering collaborator driven once per frame.
pub trait FrameTarget: Canvas {
    /// Clears color to `clear` and depth, and sets up the target for `mode`.
    fn begin_frame(&mut self, mode: RenderMode, viewport: Viewport, clear: IdColor);

    fn set_lighting(&mut self, enabled: bool);

    fn apply_camera(&mut self, projection: Mat4, view: Mat4);

    /// Reads back the id-color pixel at window coordinates `(x, y)`.
    /// `None` when the position lies outside the rendered area.
    fn read_pixel(&mut self, x: i32, y: i32) -> RenderResult<Option<IdColor>>;

    /// Shows the finished display frame.
    fn present(&mut self) -> RenderResult<()>;

    fn request_redraw(&mut self);
}

/// Entry points the windowing layer calls.
pub trait WindowCallbacks {
    fn on_key(&mut self, key: KeyCode, x: i32, y: i32) -> Response;

    fn on_resize(&mut self, width: u32, height: u32) -> Response;

    fn on_display<T: FrameTarget>(&mut self, target: &mut T) -> RenderResult<()>;

    fn on_mouse_button(&mut self, button: MouseButton, state: ElementState, x: i32, y: i32) -> Response;

    fn on_mouse_drag(&mut self, x: i32, y: i32) -> Response;
}

/// Owns everything the callbacks touch.
#[derive(Debug)]
pub struct App {
    scene: Scene,
    controller: PickingController,
    camera: Camera,
    viewport: Viewport,
}

impl App {
    pub fn new(config: &AppConfig, scene: Scene) -> Self {
        Self {
            scene,
            controller: PickingController::new(),
            camera: config.camera,
            viewport: Viewport {
                width: config.window.width,
                height: config.window.height,
            },
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn controller(&self) -> &PickingController {
        &self.controller
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

impl WindowCallbacks for App {
    fn on_key(&mut self, key: KeyCode, _x: i32, _y: i32) -> Response {
        match key {
            KeyCode::KeyA => {
                self.scene.toggle_axes();
                log::info!("axes {}", if self.scene.axes_enabled() { "on" } else { "off" });
                Response::Redraw
            }
            KeyCode::Escape => Response::Exit,
            _ => Response::Ignored,
        }
    }

    fn on_resize(&mut self, width: u32, height: u32) -> Response {
        self.viewport = Viewport { width, height };
        Response::Redraw
    }

    fn on_display<T: FrameTarget>(&mut self, target: &mut T) -> RenderResult<()> {
        let mode = self.controller.mode();
        let background = self.scene.background();

        target.begin_frame(mode, self.viewport, background);
        if mode == RenderMode::Select {
            target.set_lighting(false);
        }
        target.apply_camera(self.camera.projection_matrix(), self.camera.view_matrix());

        self.scene.render(mode, target);

        match (mode, self.controller.pick_position()) {
            (RenderMode::Select, Some((x, y))) => {
                target.set_lighting(true);
                let sampled = target.read_pixel(x, y)?.unwrap_or(background);
                self.scene.resolve_selection(sampled);
                self.controller.pick_resolved();
                target.request_redraw();
                Ok(())
            }
            _ => target.present(),
        }
    }

    fn on_mouse_button(&mut self, button: MouseButton, state: ElementState, x: i32, y: i32) -> Response {
        if self.controller.on_mouse_button(button, state, x, y) {
            Response::Redraw
        } else {
            Response::Ignored
        }
    }

    fn on_mouse_drag(&mut self, x: i32, y: i32) -> Response {
        if self.controller.on_mouse_drag(x, y, &mut self.scene) {
            Response::Redraw
        } else {
            Response::Ignored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picking::PickState;
    use crate::scene::Paint;
    use approx::assert_relative_eq;
    use glam::Vec3;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Begin(RenderMode, Viewport),
        Lighting(bool),
        Camera,
        Cube(Paint),
        Line,
        Read(i32, i32),
        Present,
        Redraw,
    }

    /// Records frame calls and answers reads from a fixed pixel.
    struct FakeTarget {
        calls: Vec<Call>,
        pixel: Option<IdColor>,
        clear: Option<IdColor>,
    }

    impl FakeTarget {
        fn showing(pixel: Option<IdColor>) -> Self {
            Self {
                calls: Vec::new(),
                pixel,
                clear: None,
            }
        }

        fn count(&self, wanted: &Call) -> usize {
            self.calls.iter().filter(|c| *c == wanted).count()
        }
    }

    impl Canvas for FakeTarget {
        fn draw_cube(&mut self, _model: Mat4, paint: Paint) {
            self.calls.push(Call::Cube(paint));
        }

        fn draw_line(&mut self, _from: Vec3, _to: Vec3, _color: [f32; 3]) {
            self.calls.push(Call::Line);
        }
    }

    impl FrameTarget for FakeTarget {
        fn begin_frame(&mut self, mode: RenderMode, viewport: Viewport, clear: IdColor) {
            self.clear = Some(clear);
            self.calls.push(Call::Begin(mode, viewport));
        }

        fn set_lighting(&mut self, enabled: bool) {
            self.calls.push(Call::Lighting(enabled));
        }

        fn apply_camera(&mut self, _projection: Mat4, _view: Mat4) {
            self.calls.push(Call::Camera);
        }

        fn read_pixel(&mut self, x: i32, y: i32) -> RenderResult<Option<IdColor>> {
            self.calls.push(Call::Read(x, y));
            Ok(self.pixel)
        }

        fn present(&mut self) -> RenderResult<()> {
            self.calls.push(Call::Present);
            Ok(())
        }

        fn request_redraw(&mut self) {
            self.calls.push(Call::Redraw);
        }
    }

    fn app() -> App {
        App::new(&AppConfig::default(), Scene::stacked_boxes(IdColor::WHITE).unwrap())
    }

    #[test]
    fn display_frame_presents_without_sampling() {
        let mut app = app();
        let mut target = FakeTarget::showing(None);
        app.on_display(&mut target).unwrap();

        assert_eq!(
            target.calls[0],
            Call::Begin(RenderMode::Display, Viewport { width: 500, height: 500 })
        );
        assert_eq!(target.calls[1], Call::Camera);
        assert_eq!(target.count(&Call::Line), 3);
        assert_eq!(target.calls.last(), Some(&Call::Present));
        assert!(!target.calls.iter().any(|c| matches!(c, Call::Read(..) | Call::Lighting(_))));
    }

    #[test]
    fn select_frame_samples_once_and_never_presents() {
        let mut app = app();
        let green = IdColor::new(0, 255, 0);
        app.on_mouse_button(MouseButton::Left, ElementState::Pressed, 250, 260);

        let mut target = FakeTarget::showing(Some(green));
        app.on_display(&mut target).unwrap();

        assert_eq!(target.calls[1], Call::Lighting(false));
        assert_eq!(target.calls[2], Call::Camera);
        assert_eq!(target.count(&Call::Line), 0);
        assert!(target
            .calls
            .iter()
            .all(|c| !matches!(c, Call::Cube(Paint::Shaded(_)))));
        assert_eq!(
            &target.calls[target.calls.len() - 3..],
            &[Call::Lighting(true), Call::Read(250, 260), Call::Redraw]
        );
        assert_eq!(target.count(&Call::Present), 0);
        assert_eq!(app.scene().selected_index(), Some(1));
        assert_eq!(app.controller().state(), PickState::Dragging);

        let mut next = FakeTarget::showing(Some(green));
        app.on_display(&mut next).unwrap();
        assert_eq!(next.count(&Call::Read(250, 260)), 0);
        assert_eq!(next.calls.last(), Some(&Call::Present));
    }

    #[test]
    fn sampling_outside_the_window_deselects() {
        let mut app = app();
        app.on_mouse_button(MouseButton::Left, ElementState::Pressed, 1, 1);
        app.on_display(&mut FakeTarget::showing(Some(IdColor::new(255, 0, 0))))
            .unwrap();
        assert!(app.scene().any_selected());

        app.on_mouse_button(MouseButton::Left, ElementState::Released, 1, 1);
        app.on_mouse_button(MouseButton::Left, ElementState::Pressed, -5, 900);
        app.on_display(&mut FakeTarget::showing(None)).unwrap();
        assert!(!app.scene().any_selected());
    }

    #[test]
    fn frames_clear_and_fall_back_to_the_scene_background() {
        let black = IdColor::new(0, 0, 0);
        let config = AppConfig::default();
        assert_ne!(config.background, black);
        let mut app = App::new(&config, Scene::stacked_boxes(black).unwrap());

        let mut target = FakeTarget::showing(None);
        app.on_display(&mut target).unwrap();
        assert_eq!(target.clear, Some(black));

        // Select the red box, then miss the window: the fallback sample is
        // the scene's black background, which matches no box.
        app.on_mouse_button(MouseButton::Left, ElementState::Pressed, 1, 1);
        app.on_display(&mut FakeTarget::showing(Some(IdColor::new(255, 0, 0))))
            .unwrap();
        assert_eq!(app.scene().selected_index(), Some(0));

        app.on_mouse_button(MouseButton::Left, ElementState::Released, 1, 1);
        app.on_mouse_button(MouseButton::Left, ElementState::Pressed, 600, 600);
        let mut target = FakeTarget::showing(None);
        app.on_display(&mut target).unwrap();
        assert_eq!(target.clear, Some(black));
        assert!(!app.scene().any_selected());
    }

    #[test]
    fn click_drag_release_rotates_picked_box() {
        let mut app = app();
        assert_eq!(
            app.on_mouse_button(MouseButton::Left, ElementState::Pressed, 200, 200),
            Response::Redraw
        );
        app.on_display(&mut FakeTarget::showing(Some(IdColor::new(0, 0, 255))))
            .unwrap();

        assert_eq!(app.on_mouse_drag(210, 195), Response::Redraw);
        assert_eq!(
            app.on_mouse_button(MouseButton::Left, ElementState::Released, 210, 195),
            Response::Redraw
        );
        assert_eq!(app.on_mouse_drag(300, 300), Response::Ignored);

        let rotation = app.scene().rotation(2).unwrap();
        assert_relative_eq!(rotation.angle_x, 10.0);
        assert_relative_eq!(rotation.angle_y, -5.0);
        assert_eq!(app.controller().mode(), RenderMode::Display);
    }

    #[test]
    fn keys_toggle_axes_and_quit() {
        let mut app = app();
        assert_eq!(app.on_key(KeyCode::KeyA, 0, 0), Response::Redraw);
        assert!(!app.scene().axes_enabled());
        assert_eq!(app.on_key(KeyCode::KeyQ, 0, 0), Response::Ignored);
        assert_eq!(app.on_key(KeyCode::Escape, 0, 0), Response::Exit);
    }

    #[test]
    fn resize_only_updates_the_viewport() {
        let mut app = app();
        let camera = app.camera;
        assert_eq!(app.on_resize(800, 300), Response::Redraw);
        assert_eq!(app.viewport(), Viewport { width: 800, height: 300 });
        assert_eq!(app.camera, camera);

        let mut target = FakeTarget::showing(None);
        app.on_display(&mut target).unwrap();
        assert_eq!(
            target.calls[0],
            Call::Begin(RenderMode::Display, Viewport { width: 800, height: 300 })
        );
    }
}
