use {
    com::Publisher,
    inference::Inference,
    posecast::*,
    std::time::Duration,
    tokio::time::{MissedTickBehavior, interval},
    video::VideoIn,
};

const DEFAULT_CONFIG_PATH: &str = "posecast.json";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&config_path)?;

    match &config.log_dir {
        Some(dir) => base::init_file_logger(dir)?,
        None => base::init_stdout_logger(),
    }
    log::info!("config loaded from {}", config_path);

    log::info!("initializing inference");
    let inference = Inference::new(config.device()?)?;

    log::info!("loading detector and pose models");
    let pipeline = Pipeline::load(&config, &inference)?;
    let tracker = Tracker::from_config(&config);
    #[cfg(feature = "preview")]
    let thresholds = pipeline.decoder().visibility_thresholds();
    let mut processor = FrameProcessor::new(pipeline, tracker);

    log::info!("opening video input");
    let mut videoin = VideoIn::open(config.video_config()?).await?;

    log::info!("publishing on {}", config.publish_addr);
    let mut publisher = Publisher::<Vec<f32>>::bind(config.publish_addr.as_str()).await?;

    let mut writer = match &config.results_path {
        Some(path) => Some(ResultWriter::create(path)?),
        None => None,
    };

    #[cfg(feature = "preview")]
    let mut preview = Preview::open(videoin.size())?;

    let mut ticker = interval(Duration::from_secs_f32(1.0 / config.publish_rate_hz));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut ctrl_c = std::pin::pin!(tokio::signal::ctrl_c());
    let mut frame_index: u64 = 0;

    loop {
        let frame = tokio::select! {
            _ = &mut ctrl_c => {
                log::info!("interrupted");
                break;
            }
            frame = videoin.capture() => frame?,
        };

        let name = format!("frame_{:06}", frame_index);
        frame_index += 1;

        let (returned, frame, outcome) = tokio::task::spawn_blocking(move || {
            let outcome = processor.process(&name, &frame);
            (processor, frame, outcome)
        })
        .await?;
        processor = returned;
        log::debug!("frame {} captured at {:.0} ms", frame_index - 1, frame.timestamp);

        match outcome {
            Ok(output) => {
                if let Some(points) = &output.points {
                    ResultSink::publish(&mut publisher, points);
                }
                if let Some(writer) = &mut writer {
                    if let Err(e) = writer.write(&output.result) {
                        log::warn!("failed to write result: {}", e);
                    }
                }
                #[cfg(feature = "preview")]
                {
                    let visible = output
                        .result
                        .best()
                        .map(|person| processor.tracker().selector().select_visible(person, &thresholds))
                        .unwrap_or_default();
                    preview.show(&frame.color, &visible)?;
                }
            }
            Err(e) => {
                log::error!("frame {} skipped: {}", frame_index - 1, e);
                #[cfg(feature = "preview")]
                preview.show(&frame.color, &[])?;
            }
        }
        #[cfg(feature = "preview")]
        if !preview.is_open() {
            log::info!("preview closed");
            break;
        }

        tokio::select! {
            _ = &mut ctrl_c => {
                log::info!("interrupted");
                break;
            }
            _ = ticker.tick() => {}
        }
    }

    if let Some(profiler) = processor.pipeline().profiler() {
        profiler.report();
    }
    drop(videoin);
    drop(publisher);
    log::info!("stopped after {} frames", frame_index);
    Ok(())
}
