// Scene module for BoxPick-3D

use std::fmt;

use glam::{Mat4, Vec3};

use crate::error::SceneError;
use crate::math::Transform;

/// Which pass a frame is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Normal lit rendering shown to the user.
    #[default]
    Display,
    /// Flat id colors only, read back to resolve the object under the cursor.
    Select,
}

/// Flat 8-bit RGB triple identifying an object in the pick buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdColor(pub [u8; 3]);

impl IdColor {
    pub const WHITE: Self = Self([255, 255, 255]);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Normalized channels for upload to an 8-bit unorm target.
    pub fn to_rgb(self) -> [f32; 3] {
        self.0.map(|c| f32::from(c) / 255.0)
    }
}

impl fmt::Display for IdColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "({r}, {g}, {b})")
    }
}

/// How a primitive is colored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    /// Lit material with the given emission.
    Shaded([f32; 3]),
    /// Unlit flat id color for the pick buffer.
    Id(IdColor),
}

/// Sink for the handful of primitives the scene draws.
pub trait Canvas {
    /// Draws the unit cube centered on the origin, transformed by `model`.
    fn draw_cube(&mut self, model: Mat4, paint: Paint);

    /// Draws an unlit line segment.
    fn draw_line(&mut self, from: Vec3, to: Vec3, color: [f32; 3]);
}

const BODY_EMISSION: [f32; 3] = [0.0, 0.25, 0.0];
const LID_EMISSION: [f32; 3] = [0.0, 0.3, 0.0];
const SELECTED_EMISSION: [f32; 3] = [1.0, 1.0, 0.0];

const AXIS_LENGTH: f32 = 1000.0;

/// Id colors of the default stack, bottom to top.
const STACK_ID_COLORS: [IdColor; 3] = [
    IdColor::new(255, 0, 0),
    IdColor::new(0, 255, 0),
    IdColor::new(0, 0, 255),
];

/// A box that can be picked through its id color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickableBox {
    id_color: IdColor,
    selected: bool,
}

impl PickableBox {
    pub fn new(id_color: IdColor) -> Self {
        Self {
            id_color,
            selected: false,
        }
    }

    pub fn id_color(&self) -> IdColor {
        self.id_color
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Selects the box iff `candidate` is exactly its id color.
    pub fn mark_selected(&mut self, candidate: IdColor) {
        self.selected = candidate == self.id_color;
    }

    /// Draws the body and lid of the box under `placement`.
    pub fn render<C: Canvas + ?Sized>(&self, mode: RenderMode, placement: Mat4, canvas: &mut C) {
        let body = Transform::from_translation_scale(Vec3::ZERO, Vec3::new(1.1, 1.0, 2.0));
        let lid = Transform::from_translation_scale(Vec3::new(0.0, 0.4, 0.0), Vec3::new(1.15, 0.2, 2.05));

        canvas.draw_cube(placement * body.matrix(), self.paint(mode, BODY_EMISSION));
        canvas.draw_cube(placement * lid.matrix(), self.paint(mode, LID_EMISSION));
    }

    fn paint(&self, mode: RenderMode, emission: [f32; 3]) -> Paint {
        match mode {
            RenderMode::Select => Paint::Id(self.id_color),
            RenderMode::Display if self.selected => Paint::Shaded(SELECTED_EMISSION),
            RenderMode::Display => Paint::Shaded(emission),
        }
    }
}

/// Accumulated drag rotation of one object, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation {
    pub angle_x: f32,
    pub angle_y: f32,
}

/// The stack of boxes plus the per-box rotation table.
#[derive(Debug)]
pub struct Scene {
    objects: Vec<PickableBox>,
    rotations: Vec<Rotation>,
    any_selected: bool,
    axes: bool,
    background: IdColor,
}

impl Scene {
    /// Builds a scene, one box per id color, stacked bottom to top.
    ///
    /// Id colors must be pairwise distinct and differ from `background`,
    /// otherwise a pick could not tell the objects apart.
    pub fn new(
        id_colors: impl IntoIterator<Item = IdColor>,
        background: IdColor,
    ) -> Result<Self, SceneError> {
        let objects: Vec<PickableBox> = id_colors.into_iter().map(PickableBox::new).collect();

        for (index, object) in objects.iter().enumerate() {
            let color = object.id_color();
            if color == background {
                return Err(SceneError::IdColorIsBackground { color, index });
            }
            if let Some(first) = objects[..index].iter().position(|o| o.id_color() == color) {
                return Err(SceneError::DuplicateIdColor {
                    color,
                    first,
                    second: index,
                });
            }
        }

        let rotations = vec![Rotation::default(); objects.len()];
        Ok(Self {
            objects,
            rotations,
            any_selected: false,
            axes: true,
            background,
        })
    }

    /// Three boxes tagged red, green and blue.
    pub fn stacked_boxes(background: IdColor) -> Result<Self, SceneError> {
        Self::new(STACK_ID_COLORS, background)
    }

    pub fn objects(&self) -> &[PickableBox] {
        &self.objects
    }

    pub fn rotation(&self, index: usize) -> Option<Rotation> {
        self.rotations.get(index).copied()
    }

    pub fn background(&self) -> IdColor {
        self.background
    }

    pub fn any_selected(&self) -> bool {
        self.any_selected
    }

    /// Index of the first selected object, if any.
    pub fn selected_index(&self) -> Option<usize> {
        self.objects.iter().position(PickableBox::is_selected)
    }

    pub fn axes_enabled(&self) -> bool {
        self.axes
    }

    pub fn toggle_axes(&mut self) {
        self.axes = !self.axes;
    }

    /// Re-evaluates every object against the sampled pixel color.
    ///
    /// A color that matches nothing (the background included) clears the
    /// selection. Returns whether anything is selected afterwards.
    pub fn resolve_selection(&mut self, sampled: IdColor) -> bool {
        let mut any = false;
        for object in &mut self.objects {
            object.mark_selected(sampled);
            any |= object.is_selected();
        }
        self.any_selected = any;
        log::debug!("pick {sampled} -> selected {:?}", self.selected_index());
        any
    }

    /// Adds a mouse delta to the rotation of every selected object.
    pub fn apply_drag(&mut self, delta_x: i32, delta_y: i32) {
        for (object, rotation) in self.objects.iter().zip(self.rotations.iter_mut()) {
            if object.is_selected() {
                rotation.angle_x += delta_x as f32;
                rotation.angle_y += delta_y as f32;
            }
        }
    }

    pub fn render<C: Canvas + ?Sized>(&self, mode: RenderMode, canvas: &mut C) {
        if self.axes && mode == RenderMode::Display {
            draw_axes(canvas);
        }

        for (index, (object, rotation)) in self.objects.iter().zip(&self.rotations).enumerate() {
            let placement = Transform::from_yaw_pitch(
                Vec3::new(0.0, index as f32, 0.0),
                rotation.angle_x,
                rotation.angle_y,
            );
            object.render(mode, placement.matrix(), canvas);
        }
    }
}

fn draw_axes<C: Canvas + ?Sized>(canvas: &mut C) {
    canvas.draw_line(Vec3::X * AXIS_LENGTH, Vec3::X * -AXIS_LENGTH, [1.0, 0.0, 0.0]);
    canvas.draw_line(Vec3::Y * AXIS_LENGTH, Vec3::Y * -AXIS_LENGTH, [0.0, 1.0, 0.0]);
    canvas.draw_line(Vec3::Z * AXIS_LENGTH, Vec3::Z * -AXIS_LENGTH, [0.0, 0.0, 1.0]);
}
