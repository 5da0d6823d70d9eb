use std::io::Write;

use thiserror::Error;

use crate::game::Frame;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write frame: {0}")]
    Io(#[from] std::io::Error),
}

/// Consumer of grid snapshots
pub trait FrameSink {
    fn emit_frame(&mut self, frame: &Frame) -> Result<(), SinkError>;
}

impl<F: FrameSink + ?Sized> FrameSink for &mut F {
    fn emit_frame(&mut self, frame: &Frame) -> Result<(), SinkError> {
        (**self).emit_frame(frame)
    }
}

/// Streams frames to a byte transport, each optionally preceded by a marker
#[derive(Debug)]
pub struct FramedWriter<W: Write> {
    writer: W,
    marker: Option<u8>,
    frames_written: u64,
}

impl<W: Write> FramedWriter<W> {
    pub fn new(writer: W, marker: Option<u8>) -> Self {
        Self {
            writer,
            marker,
            frames_written: 0,
        }
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> FrameSink for FramedWriter<W> {
    fn emit_frame(&mut self, frame: &Frame) -> Result<(), SinkError> {
        if let Some(marker) = self.marker {
            self.writer.write_all(&[marker])?;
        }
        self.writer.write_all(frame)?;
        self.writer.flush()?;

        self.frames_written += 1;
        Ok(())
    }
}

/// Keeps the latest frame in memory
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    latest: Option<Frame>,
    count: u64,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<&Frame> {
        self.latest.as_ref()
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

impl FrameSink for FrameRecorder {
    fn emit_frame(&mut self, frame: &Frame) -> Result<(), SinkError> {
        self.latest = Some(*frame);
        self.count += 1;
        Ok(())
    }
}
