//! Audio output capability.
//!
//! Playback is pull-based: `begin` starts an asynchronous stream that
//! requests frames on demand and returns a handle the cough animation
//! polls while it steps the lights. Dropping the handle stops and
//! releases the stream, which is what makes cleanup hold on every exit
//! path out of a cough.

pub trait AudioOutput: Send {
    /// Rewinds the clip and starts asynchronous playback.
    fn begin(&mut self) -> anyhow::Result<Box<dyn PlaybackHandle>>;
}

pub trait PlaybackHandle: Send {
    /// True while frames are still being played.
    fn is_active(&self) -> bool;
}
