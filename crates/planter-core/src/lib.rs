pub mod animate;
pub mod audio;
pub mod choreography;
pub mod color;
pub mod config;
pub mod easing;
pub mod envelope;
pub mod mood;
pub mod platform;
pub mod sample;
pub mod sensor;
pub mod strip;

pub use animate::{Breather, Cougher};
pub use audio::{AudioOutput, PlaybackHandle};
pub use color::Hsv;
pub use envelope::Envelope;
pub use mood::{MoodAction, MoodStateMachine};
pub use sample::{AirQualitySample, Baseline};
pub use sensor::AirQualitySensor;
pub use strip::{PixelStrip, NUM_PIXELS};
