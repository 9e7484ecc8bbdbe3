use serde::{Deserialize, Serialize};

use crate::geometry::Aabb;

/// Identifier of an image the frontend resolves to a texture.
pub type ImageKey = &'static str;

/// Fully opaque alpha.
pub const OPAQUE: u8 = 255;

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };
}

/// A single draw request, applied in submission order (later draws on top).
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Image {
        key: ImageKey,
        bounds: Aabb,
        alpha: u8,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        color: Color,
    },
}

/// Compositor the game draws into once per tick.
pub trait RenderSurface {
    fn draw(&mut self, command: DrawCommand);

    fn clear(&mut self, color: Color) {
        self.draw(DrawCommand::Clear(color));
    }

    fn image(&mut self, key: ImageKey, bounds: Aabb, alpha: u8) {
        self.draw(DrawCommand::Image { key, bounds, alpha });
    }

    fn text(&mut self, text: String, x: f32, y: f32, color: Color) {
        self.draw(DrawCommand::Text { text, x, y, color });
    }
}

/// Surface that records one frame of commands.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    commands: Vec<DrawCommand>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(32),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded frame, leaving the recorder empty for the next one.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// All image draws of `key`, in submission order.
    pub fn images_of(&self, key: ImageKey) -> Vec<(Aabb, u8)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Image {
                    key: k,
                    bounds,
                    alpha,
                } if *k == key => Some((*bounds, *alpha)),
                _ => None,
            })
            .collect()
    }

    /// Text lines drawn this frame.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl RenderSurface for FrameRecorder {
    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_keeps_submission_order() {
        let mut rec = FrameRecorder::new();
        rec.clear(Color::BLACK);
        rec.image("bg0", Aabb::new(0.0, 0.0, 10.0, 10.0), OPAQUE);
        rec.text("Score: 1".to_string(), 10.0, 10.0, Color::WHITE);

        assert_eq!(rec.commands().len(), 3);
        assert_eq!(rec.commands()[0], DrawCommand::Clear(Color::BLACK));
        assert_eq!(rec.texts(), vec!["Score: 1"]);
        assert_eq!(rec.images_of("bg0").len(), 1);
    }

    #[test]
    fn take_empties_recorder() {
        let mut rec = FrameRecorder::new();
        rec.clear(Color::BLACK);
        let frame = rec.take();
        assert_eq!(frame.len(), 1);
        assert!(rec.commands().is_empty());
    }
}
