use crate::constants::*;

/// Runtime settings for mounting the sketches on a page.
#[derive(Clone, Debug, PartialEq)]
pub struct PageConfig {
    pub container_selector: String,
    pub visibility_threshold: f64,
    pub frame_rate: f64,
    pub audio_src: String,
    pub audio_preload_delay_ms: i32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            container_selector: CONTAINER_SELECTOR.to_string(),
            visibility_threshold: VISIBILITY_THRESHOLD,
            frame_rate: FRAME_RATE,
            audio_src: AUDIO_DEFAULT_SRC.to_string(),
            audio_preload_delay_ms: AUDIO_PRELOAD_DELAY_MS,
        }
    }
}

impl PageConfig {
    /// Minimum spacing between ticks, with a little slack so a 60 Hz
    /// animation frame lands on every fourth refresh instead of every fifth.
    pub fn frame_interval_ms(&self) -> f64 {
        if self.frame_rate <= 0.0 {
            return 0.0;
        }
        (1000.0 / self.frame_rate - FRAME_INTERVAL_SLACK_MS).max(0.0)
    }

    /// Audio source for one container, honouring a `data-audio-src` override.
    pub fn audio_src_for<'a>(&'a self, data_audio_src: Option<&'a str>) -> &'a str {
        match data_audio_src {
            Some(src) if !src.trim().is_empty() => src.trim(),
            _ => &self.audio_src,
        }
    }
}
