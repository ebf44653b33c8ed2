/// Frame timing and ordering
///
/// Each frame runs three phases in order: input events are dispatched,
/// consumers read input and update, then late work runs. The loop hands out
/// the variable delta time used to scale look input.
use std::time::{Duration, Instant};

/// Longest frame time handed to gameplay (avoids huge look jumps after a stall)
pub const MAX_DELTA_TIME: f32 = 1.0 / 3.0;

/// FPS tracking window (average over last N frames)
const FPS_WINDOW_SIZE: usize = 60;

/// Where the current frame is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePhase {
    /// Between frames
    Idle,
    /// Input events are being dispatched
    Input,
    /// Consumers are reading input
    Update,
    /// After all reads for the frame
    Late,
}

/// Game loop timing state
pub struct GameLoop {
    /// Time of last frame
    last_frame_time: Instant,

    /// Time when game loop started
    start_time: Instant,

    phase: FramePhase,

    /// Frame timing history for FPS calculation
    frame_times: Vec<Duration>,

    /// Current frame number
    frame_count: u64,

    /// Current FPS (updated periodically)
    current_fps: f32,

    /// Clamped time since last frame in seconds
    delta_time: f32,
}

impl GameLoop {
    /// Create a new game loop
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame_time: now,
            start_time: now,
            phase: FramePhase::Idle,
            frame_times: Vec::with_capacity(FPS_WINDOW_SIZE),
            frame_count: 0,
            current_fps: 0.0,
            delta_time: 0.0,
        }
    }

    /// Begin a new frame and enter the input phase
    /// Returns the clamped delta time in seconds
    pub fn begin_frame(&mut self) -> f32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time);
        self.begin_frame_with(frame_time, now)
    }

    fn begin_frame_with(&mut self, frame_time: Duration, now: Instant) -> f32 {
        if self.phase != FramePhase::Idle {
            log::warn!("Frame {} began before the previous one ended", self.frame_count);
        }

        self.last_frame_time = now;
        self.frame_count += 1;
        self.phase = FramePhase::Input;

        // Store frame time for FPS calculation
        self.frame_times.push(frame_time);
        if self.frame_times.len() > FPS_WINDOW_SIZE {
            self.frame_times.remove(0);
        }

        // Update FPS counter every 10 frames
        if self.frame_count % 10 == 0 {
            self.update_fps();
        }

        self.delta_time = frame_time.as_secs_f32().min(MAX_DELTA_TIME);
        self.delta_time
    }

    /// Input dispatch for this frame is complete; consumers may read
    pub fn begin_update(&mut self) {
        if self.phase != FramePhase::Input {
            log::warn!(
                "Input read in phase {:?} of frame {}; events may be from the previous frame",
                self.phase,
                self.frame_count
            );
        }
        self.phase = FramePhase::Update;
    }

    /// All reads for this frame are done
    pub fn begin_late_update(&mut self) {
        if self.phase != FramePhase::Update {
            log::warn!("Late update of frame {} ran without an update", self.frame_count);
        }
        self.phase = FramePhase::Late;
    }

    /// Close the frame
    pub fn end_frame(&mut self) {
        self.phase = FramePhase::Idle;
    }

    #[allow(dead_code)]
    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    /// Get the delta time of the current frame (in seconds)
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get current FPS
    pub fn fps(&self) -> f32 {
        self.current_fps
    }

    /// Get total elapsed time since start
    pub fn elapsed(&self) -> Duration {
        Instant::now().duration_since(self.start_time)
    }

    /// Get total number of frames started
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Update FPS calculation
    fn update_fps(&mut self) {
        if self.frame_times.is_empty() {
            self.current_fps = 0.0;
            return;
        }

        // Calculate average frame time
        let total: Duration = self.frame_times.iter().sum();
        let avg_frame_time = total / self.frame_times.len() as u32;

        // Convert to FPS
        self.current_fps = if avg_frame_time.as_secs_f32() > 0.0 {
            1.0 / avg_frame_time.as_secs_f32()
        } else {
            0.0
        };
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}
