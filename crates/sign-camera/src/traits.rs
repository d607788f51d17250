use sign_base::Frame;

/// Poll-style frame source the detection loop samples once per tick.
///
/// A source is ready only while the underlying device stream is in a
/// stable playable state (opened, streaming, non-zero dimensions). A
/// source that fails permanently reports not-ready from then on; it is
/// the caller's job not to poll faster than once per scheduling tick
/// while waiting.
pub trait FrameSource {
    /// Whether the device stream is currently delivering frames.
    fn is_ready(&self) -> bool;

    /// The newest frame, if one is available this tick.
    ///
    /// Frames produced between polls are dropped; the loop always sees
    /// the most recent sample, never a backlog.
    fn latest_frame(&mut self) -> Option<Frame>;
}
