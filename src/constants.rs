// Sketch tuning constants shared by the core state machines and the web layer.
//
// These constants express intended behavior (e.g., physics coefficients, hit
// radii, timing windows) and keep magic numbers out of the code. The file is
// standalone so host tests can `include!` it directly.

// Page wiring
pub const CONTAINER_SELECTOR: &str = ".preview-sketch";
pub const VISIBILITY_THRESHOLD: f64 = 0.1; // fraction of a card that must intersect the viewport
pub const FRAME_RATE: f64 = 15.0; // ticks per second while a loop is running
pub const FRAME_INTERVAL_SLACK_MS: f64 = 2.0; // tolerate RAF jitter when gating to FRAME_RATE

// Shared palette
pub const BACKGROUND_RGB: [u8; 3] = [250, 252, 255];
pub const BRAND_RGB: [u8; 3] = [49, 36, 178];

// Ball sketch
pub const BALL_GRAVITY: f32 = 0.6;
pub const BALL_BOUNCE: f32 = -0.75; // velocity multiplier on floor/ceiling contact
pub const BALL_RADIUS: f32 = 20.0;
pub const BALL_FLOOR_OFFSET: f32 = 10.0; // floor line sits this far above the bottom edge
pub const BALL_KICK_VELOCITY: f32 = -11.0; // upward impulse applied on a direct hit
pub const BALL_REST_THRESHOLD: f32 = 1.0; // |vy| below this on contact snaps to zero
pub const BALL_HIT_RADIUS_MULTIPLE: f32 = 2.5; // moving target, so be tolerant
pub const BALL_TRAIL_ALPHA: u8 = 150;
pub const BALL_FLOOR_GRAY: u8 = 220;

// Audio sketch
pub const AUDIO_DEFAULT_SRC: &str = "audio.ogg";
pub const AUDIO_PRELOAD_DELAY_MS: i32 = 1000; // defer decoding until the page has painted
pub const AUDIO_BUTTON_SIZE: f32 = 50.0;
pub const AUDIO_TAP_SCALE: f32 = 1.5; // enlarge the button hit area for fingers
pub const AUDIO_FFT_SIZE: u32 = 1024;
pub const AUDIO_FFT_SMOOTHING: f64 = 0.8;
pub const AUDIO_WAVEFORM_STRIDE: usize = 8;
pub const AUDIO_RING_BASE_RADIUS: f32 = 50.0;
pub const AUDIO_RING_LEVEL_GAIN: f32 = 40.0;
pub const AUDIO_RING_WAVE_GAIN: f32 = 35.0;
pub const AUDIO_PULSE_BASE_DIAMETER: f32 = 110.0;
pub const AUDIO_PULSE_LEVEL_GAIN: f32 = 80.0;
pub const AUDIO_SPINNER_RAD_PER_FRAME: f32 = 0.1;
pub const AUDIO_BUTTON_ALPHA_HOVER: u8 = 255;
pub const AUDIO_BUTTON_ALPHA_IDLE: u8 = 230;

// LED sketch
pub const LED_BLINK_DURATION_MS: f64 = 500.0;
pub const LED_BLINK_RATE: f64 = 0.04; // radians per elapsed millisecond
pub const LED_BODY_OFFSET_Y: f32 = 10.0; // LED drawn below the canvas centre
pub const LED_BULB_OFFSET_Y: f32 = -15.0; // visual bulb centre relative to the body origin
pub const LED_HIT_RADIUS: f32 = 40.0;
pub const LED_GLOW_RINGS: u32 = 12;
pub const LED_GLOW_ALPHA_MAX: f32 = 35.0;
pub const LED_DIM_ALPHA: u8 = 80;
pub const LED_INITIAL_RGB: [u8; 3] = [255, 0, 255];

pub const LED_PALETTE: [[u8; 3]; 6] = [
    [0, 255, 255], // cyan
    [255, 0, 255], // magenta
    [255, 255, 0], // yellow
    [0, 0, 255],   // blue
    [0, 255, 0],   // green
    [255, 0, 0],   // red
];
