use jumper_core::render::{DrawCommand, RenderSurface};

/// Headless render target: counts frames and draw commands and reports them
/// through `tracing` instead of a window.
#[derive(Debug)]
pub struct TraceSurface {
    frames: u64,
    commands_in_frame: usize,
    hud: Vec<String>,
    /// Emit the HUD line every this many frames.
    hud_every: u64,
}

impl TraceSurface {
    pub fn new(hud_every: u64) -> Self {
        Self {
            frames: 0,
            commands_in_frame: 0,
            hud: Vec::new(),
            hud_every: hud_every.max(1),
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Close out the frame in progress, if any.
    pub fn flush(&mut self) {
        if self.commands_in_frame == 0 {
            return;
        }
        self.frames += 1;
        tracing::trace!(
            frame = self.frames,
            commands = self.commands_in_frame,
            "Frame"
        );
        if self.frames % self.hud_every == 0 {
            tracing::info!(frame = self.frames, hud = %self.hud.join("  "), "HUD");
        }
        self.commands_in_frame = 0;
        self.hud.clear();
    }
}

impl RenderSurface for TraceSurface {
    fn draw(&mut self, command: DrawCommand) {
        match command {
            // A clear opens a new frame.
            DrawCommand::Clear(_) => self.flush(),
            DrawCommand::Text { text, .. } => self.hud.push(text),
            DrawCommand::Image { .. } => {},
        }
        self.commands_in_frame += 1;
    }
}
