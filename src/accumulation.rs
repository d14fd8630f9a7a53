use std::num::NonZeroU32;

use tracing::debug;

/// Logical size of the render output in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: NonZeroU32,
    pub height: NonZeroU32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Option<Viewport> {
        Some(Viewport {
            width: NonZeroU32::new(width)?,
            height: NonZeroU32::new(height)?,
        })
    }

    /// Render size for a client area scaled by `render_scale`, at least one pixel per side.
    pub fn from_client_size(width: f64, height: f64, render_scale: f64) -> Viewport {
        let scaled = |x: f64| {
            let pixels = (x * render_scale).floor();
            if pixels.is_finite() {
                // Float to int casts saturate
                (pixels as u32).max(1)
            } else {
                1
            }
        };
        Viewport {
            width: NonZeroU32::new(scaled(width)).unwrap_or(NonZeroU32::MIN),
            height: NonZeroU32::new(scaled(height)).unwrap_or(NonZeroU32::MIN),
        }
    }

    pub fn size(&self) -> [u32; 2] {
        [self.width.get(), self.height.get()]
    }

    pub fn pixel_count(&self) -> usize {
        self.width.get() as usize * self.height.get() as usize
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AccumulationState {
    /// Nothing accumulated, the next frame overwrites.
    Idle,
    Accumulating { frame_count: NonZeroU32 },
}

/// One of the two render targets used for accumulation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TargetSlot {
    A,
    B,
}

impl TargetSlot {
    pub fn other(self) -> TargetSlot {
        match self {
            TargetSlot::A => TargetSlot::B,
            TargetSlot::B => TargetSlot::A,
        }
    }

    pub fn index(self) -> usize {
        match self {
            TargetSlot::A => 0,
            TargetSlot::B => 1,
        }
    }
}

/// Frame counter for progressive rendering.
///
/// Each frame is blended into the previous result with weight `1 / (frame_count + 1)`, reading
/// one target and writing the other. The counter goes back to zero only when the camera pose or
/// the viewport changes.
#[derive(Clone, Debug)]
pub struct AccumulationController {
    frame_count: u32,
    viewport: Viewport,
    write_target: TargetSlot,
}

impl AccumulationController {
    pub fn new(viewport: Viewport) -> AccumulationController {
        AccumulationController {
            frame_count: 0,
            viewport,
            write_target: TargetSlot::A,
        }
    }

    pub fn state(&self) -> AccumulationState {
        match NonZeroU32::new(self.frame_count) {
            None => AccumulationState::Idle,
            Some(frame_count) => AccumulationState::Accumulating { frame_count },
        }
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn reset(&mut self) {
        if self.frame_count > 0 {
            debug!(frames = self.frame_count, "Accumulation reset");
        }
        self.frame_count = 0;
    }

    pub fn camera_moved(&mut self) {
        self.reset();
    }

    /// Returns true if the viewport changed, which also resets accumulation.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        if viewport == self.viewport {
            return false;
        }
        self.viewport = viewport;
        self.reset();
        true
    }

    /// Weight of the frame being rendered now.
    pub fn blend_weight(&self) -> f32 {
        1.0 / (self.frame_count as f32 + 1.0)
    }

    /// Target holding the accumulated result so far.
    pub fn read_target(&self) -> TargetSlot {
        self.write_target.other()
    }

    pub fn write_target(&self) -> TargetSlot {
        self.write_target
    }

    /// Marks the current frame as drawn.
    pub fn finish_frame(&mut self) {
        self.frame_count = self.frame_count.saturating_add(1);
        self.write_target = self.write_target.other();
    }
}
