use {
    crate::*,
    base::Vec2,
    std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    tokio::{
        sync::mpsc,
        task::{JoinHandle, spawn_blocking},
    },
};

// capacity of the video input channel, frames captured while it is full are dropped
const CHANNEL_CAPACITY: usize = 1;

#[derive(Debug, Clone)]
pub enum VideoInConfig {
    Still(still::StillConfig),
    #[cfg(feature = "realsense")]
    Realsense(realsense::RealsenseConfig),
}

pub(crate) trait VideoInDevice: Send {
    fn open(&mut self, config: &VideoInConfig) -> Result<VideoInConfig, VideoError>; // open the device, return config that was actually set
    fn close(&mut self); // close the device, if open
    fn blocking_capture(&mut self) -> Result<VideoFrame, VideoError>; // capture a frame
}

pub struct VideoIn {
    receiver: mpsc::Receiver<Result<VideoFrame, VideoError>>,
    cancel: Arc<AtomicBool>,
    size: Vec2<usize>,
    frame_rate: f32,
    join_handle: Option<JoinHandle<()>>,
}

impl VideoIn {
    fn create_device(config: &VideoInConfig) -> Box<dyn VideoInDevice> {
        match config {
            VideoInConfig::Still(_) => Box::new(still::Still::new()),
            #[cfg(feature = "realsense")]
            VideoInConfig::Realsense(_) => Box::new(realsense::Realsense::new()),
        }
    }

    async fn spawn_worker(
        sender: mpsc::Sender<Result<VideoFrame, VideoError>>,
        config: VideoInConfig,
        cancel: Arc<AtomicBool>,
    ) -> Result<(JoinHandle<()>, VideoInConfig), VideoError> {
        let mut device = Self::create_device(&config);

        // device.open() must run on the same OS thread as blocking_capture() because
        // some backends (e.g. librealsense2) have thread affinity requirements.
        let (init_tx, init_rx) = tokio::sync::oneshot::channel::<Result<VideoInConfig, VideoError>>();

        let join_handle = spawn_blocking(move || {
            match device.open(&config) {
                Ok(config) => {
                    let _ = init_tx.send(Ok(config));
                }
                Err(e) => {
                    let _ = init_tx.send(Err(e));
                    return;
                }
            }

            log::info!("video worker: starting capture loop");
            while !cancel.load(Ordering::Relaxed) {
                match device.blocking_capture() {
                    Ok(frame) => match sender.try_send(Ok(frame)) {
                        Ok(()) => {}
                        Err(mpsc::error::TrySendError::Full(_)) => {
                            log::debug!("video worker: consumer busy, frame dropped");
                        }
                        Err(mpsc::error::TrySendError::Closed(_)) => break,
                    },
                    Err(e) => {
                        // a broken stream ends the session, the consumer decides what to do
                        log::error!("video worker: capture failed: {}", e);
                        let _ = sender.blocking_send(Err(e));
                        break;
                    }
                }
            }
            device.close();
            log::info!("video worker: stopped");
        });

        let config = init_rx
            .await
            .map_err(|_| VideoError::Device("Worker thread died during init".to_string()))??;

        Ok((join_handle, config))
    }

    fn decode_config(config: &VideoInConfig) -> (Vec2<usize>, f32) {
        match config {
            VideoInConfig::Still(config) => (config.image.size, config.frame_rate),
            #[cfg(feature = "realsense")]
            VideoInConfig::Realsense(config) => (
                config.color.unwrap_or(realsense::DEFAULT_SIZE),
                config.frame_rate.unwrap_or(realsense::DEFAULT_FRAME_RATE),
            ),
        }
    }

    pub async fn open(config: VideoInConfig) -> Result<Self, VideoError> {
        // channel for receiving video frames
        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);

        // external cancelation flag
        let cancel = Arc::new(AtomicBool::new(false));

        let (join_handle, config) =
            Self::spawn_worker(sender, config, Arc::clone(&cancel)).await?;

        let (size, frame_rate) = Self::decode_config(&config);
        log::info!(
            "video input open: {}x{} at {} fps",
            size.x,
            size.y,
            frame_rate
        );

        Ok(Self {
            receiver,
            cancel,
            size,
            frame_rate,
            join_handle: Some(join_handle),
        })
    }

    pub fn size(&self) -> Vec2<usize> {
        self.size
    }

    pub fn frame_rate(&self) -> f32 {
        self.frame_rate
    }

    /// Wait for the next frame. An error means the stream is broken.
    pub async fn capture(&mut self) -> Result<VideoFrame, VideoError> {
        match self.receiver.recv().await {
            Some(result) => result,
            None => Err(VideoError::Stream("Video input channel closed".to_string())),
        }
    }
}

impl Drop for VideoIn {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        self.receiver.close();
        if let Some(join_handle) = self.join_handle.take() {
            join_handle.abort();
        }
    }
}

pub mod still;

#[cfg(feature = "realsense")]
pub mod realsense;
