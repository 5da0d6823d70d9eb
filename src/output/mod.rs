pub mod sink;

pub use sink::{FrameRecorder, FrameSink, FramedWriter, SinkError};
