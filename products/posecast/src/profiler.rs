use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileMeans {
    pub detection: Duration,
    pub pose: Duration,
    pub post: Duration,
}

/// Accumulates per-phase timings of processed frames.
#[derive(Debug, Clone, Default)]
pub struct Profiler {
    frames: u32,
    detection: Duration,
    pose: Duration,
    post: Duration,
}

impl Profiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, detection: Duration, pose: Duration, post: Duration) {
        self.frames += 1;
        self.detection += detection;
        self.pose += pose;
        self.post += post;
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn means(&self) -> Option<ProfileMeans> {
        if self.frames == 0 {
            return None;
        }
        Some(ProfileMeans {
            detection: self.detection / self.frames,
            pose: self.pose / self.frames,
            post: self.post / self.frames,
        })
    }

    pub fn report(&self) {
        if let Some(means) = self.means() {
            log::info!(
                "profile over {} frames: det {:.1} ms, pose {:.1} ms, post {:.1} ms",
                self.frames,
                means.detection.as_secs_f64() * 1000.0,
                means.pose.as_secs_f64() * 1000.0,
                means.post.as_secs_f64() * 1000.0
            );
        }
    }
}
