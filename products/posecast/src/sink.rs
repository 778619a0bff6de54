use {
    crate::PoseResult,
    anyhow::Result,
    com::{ComError, Publisher},
    std::{
        fs::{File, OpenOptions},
        io::{BufWriter, Write},
        path::Path,
    },
};

/// Receiver of the world-space joint array, one call per frame with a person.
pub trait ResultSink {
    fn publish(&mut self, points: &[f32]);
}

impl ResultSink for Publisher<Vec<f32>> {
    fn publish(&mut self, points: &[f32]) {
        match Publisher::publish(self, &points.to_vec()) {
            Ok(()) => {}
            Err(ComError::Backpressure) => log::debug!("publisher busy, message dropped"),
            Err(e) => log::warn!("publish failed: {}", e),
        }
    }
}

/// Appends one JSON object per result.
pub struct ResultWriter {
    writer: BufWriter<File>,
}

impl ResultWriter {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    pub fn write(&mut self, result: &PoseResult) -> Result<()> {
        serde_json::to_writer(&mut self.writer, result)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
