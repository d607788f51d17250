use crate::{CameraConfig, CameraError, FrameSource};
use log::{debug, warn};
use sign_base::Frame;
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, Format, FourCC};

type FrameResult = Result<Frame, CameraError>;

/// V4L2 camera implementation.
///
/// Capture runs on a background thread that decodes MJPEG buffers and
/// pushes frames into a bounded channel; `latest_frame` drains the
/// channel so the loop always sees the newest sample. When the capture
/// thread dies the source reports not-ready permanently.
pub struct V4l2Camera {
    config: CameraConfig,
    receiver: Option<mpsc::Receiver<FrameResult>>,
    thread_handle: Option<JoinHandle<()>>,
    failed: bool,
}

impl std::fmt::Debug for V4l2Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("V4l2Camera")
            .field("config", &self.config)
            .field("receiver", &self.receiver.is_some())
            .field("thread_handle", &self.thread_handle.is_some())
            .field("failed", &self.failed)
            .finish()
    }
}

impl FrameSource for V4l2Camera {
    fn is_ready(&self) -> bool {
        !self.failed && self.receiver.is_some()
    }

    fn latest_frame(&mut self) -> Option<Frame> {
        // Drain everything queued since the last poll, newest wins.
        let mut newest = None;
        let mut disconnected = false;
        if let Some(receiver) = self.receiver.as_mut() {
            loop {
                match receiver.try_recv() {
                    Ok(Ok(frame)) => newest = Some(frame),
                    Ok(Err(e)) => {
                        // Per-frame decode trouble: skip the frame, keep polling.
                        warn!("dropping frame: {e}");
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        disconnected = true;
                        break;
                    }
                }
            }
        }
        if disconnected {
            warn!("capture thread gone, marking camera unavailable");
            self.failed = true;
            self.receiver = None;
        }
        newest
    }
}

impl Drop for V4l2Camera {
    fn drop(&mut self) {
        // Drop the receiver to signal the thread to stop
        drop(self.receiver.take());

        // Wait for the thread to finish
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl V4l2Camera {
    /// Open the device at `config.device()`, set MJPEG format at the
    /// requested resolution, and start the capture thread.
    ///
    /// # Errors
    ///
    /// Returns `CameraError::Device` if the device cannot be opened,
    /// MJPEG is not supported, or format/parameter setting fails.
    pub fn new(config: CameraConfig) -> Result<Self, CameraError> {
        let device = Device::with_path(config.device())?;

        let mut format = Format::new(config.width(), config.height(), FourCC::new(b"MJPG"));
        format = Capture::set_format(&device, &format)?;

        // The device may silently fall back to another format
        if format.fourcc != FourCC::new(b"MJPG") {
            return Err(CameraError::Device(
                "MJPEG format not supported by device".to_string(),
            ));
        }

        let params = v4l::video::capture::Parameters::with_fps(config.fps());
        v4l::video::Capture::set_params(&device, &params)?;

        let buffer_count = config.buffer_count() as usize;
        let (tx, rx) = mpsc::channel(buffer_count);

        let handle = thread::spawn(move || {
            if let Err(e) = Self::capture_loop(device, tx, buffer_count) {
                warn!("capture thread exited: {e}");
            }
        });

        debug!(
            "camera open: {} {}x{}@{}fps",
            config.device(),
            config.width(),
            config.height(),
            config.fps()
        );

        Ok(Self {
            config,
            receiver: Some(rx),
            thread_handle: Some(handle),
            failed: false,
        })
    }

    /// Background thread capture loop.
    ///
    /// Reads buffers from V4L2, decodes MJPEG to RGB frames, and sends
    /// them through the channel until the receiver is dropped.
    fn capture_loop(
        device: Device,
        tx: mpsc::Sender<FrameResult>,
        buffer_count: usize,
    ) -> Result<(), CameraError> {
        let mut stream = MmapStream::with_buffers(&device, Type::VideoCapture, buffer_count as u32)
            .map_err(|e| CameraError::Stream(e.to_string()))?;

        loop {
            let (buf, _metadata) =
                CaptureStream::next(&mut stream).map_err(|e| CameraError::Stream(e.to_string()))?;

            // The buffer is only valid until the next dequeue
            let result = decode_mjpeg(buf);

            if tx.blocking_send(result).is_err() {
                // Receiver dropped - exit thread
                break;
            }
        }

        Ok(())
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }
}

/// Decode one MJPEG buffer into an RGB8 frame.
pub fn decode_mjpeg(buf: &[u8]) -> Result<Frame, CameraError> {
    let decoded = image::load_from_memory_with_format(buf, image::ImageFormat::Jpeg)
        .map_err(|e| CameraError::Decode(e.to_string()))?;
    let rgb = decoded.to_rgb8();
    let (width, height) = (rgb.width(), rgb.height());
    Ok(Frame::new(width, height, rgb.into_raw())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A camera wired to a test-owned channel instead of a capture
    /// thread, so the drain path runs against scripted sends.
    fn camera_with(receiver: mpsc::Receiver<FrameResult>) -> V4l2Camera {
        V4l2Camera {
            config: CameraConfig::default(),
            receiver: Some(receiver),
            thread_handle: None,
            failed: false,
        }
    }

    fn gray(value: u8) -> Frame {
        Frame::new(2, 2, vec![value; 12]).unwrap()
    }

    #[tokio::test]
    async fn test_latest_frame_is_newest_wins() {
        let (tx, rx) = mpsc::channel(4);
        let mut camera = camera_with(rx);

        tx.send(Ok(gray(1))).await.unwrap();
        tx.send(Ok(gray(2))).await.unwrap();
        tx.send(Ok(gray(3))).await.unwrap();

        let frame = camera.latest_frame().unwrap();
        assert_eq!(frame.pixel(0, 0), [3, 3, 3]);

        // The backlog was dropped, not queued
        assert!(camera.latest_frame().is_none());
        assert!(camera.is_ready());
    }

    #[tokio::test]
    async fn test_decode_errors_are_skipped() {
        let (tx, rx) = mpsc::channel(4);
        let mut camera = camera_with(rx);

        tx.send(Ok(gray(1))).await.unwrap();
        tx.send(Err(CameraError::Decode("bad jpeg".to_string())))
            .await
            .unwrap();

        // The bad frame is skipped; the source stays usable
        let frame = camera.latest_frame().unwrap();
        assert_eq!(frame.pixel(0, 0), [1, 1, 1]);
        assert!(camera.is_ready());
    }

    #[tokio::test]
    async fn test_lost_capture_thread_is_permanent() {
        let (tx, rx) = mpsc::channel(4);
        let mut camera = camera_with(rx);

        tx.send(Ok(gray(5))).await.unwrap();
        drop(tx);

        // The poll that detects the loss still drains the queued frame
        assert_eq!(camera.latest_frame().unwrap().pixel(0, 0), [5, 5, 5]);
        assert!(!camera.is_ready());

        // Not-ready from then on
        assert!(camera.latest_frame().is_none());
        assert!(!camera.is_ready());
    }
}
