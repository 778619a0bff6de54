use {
    super::VideoInDevice,
    crate::*,
    base::Vec2,
    image::{Image, PixelFormat},
    realsense_sys as sys,
    std::ptr::null_mut,
};

pub const DEFAULT_SIZE: Vec2<usize> = Vec2 { x: 640, y: 480 };
pub const DEFAULT_FRAME_RATE: f32 = 30.0;

const CAPTURE_TIMEOUT_MS: u32 = 5000;
const ALIGN_QUEUE_CAPACITY: i32 = 1;

fn check_rs2_error(err: *mut sys::rs2_error, context: &str) -> Result<(), VideoError> {
    if err.is_null() {
        return Ok(());
    }
    let msg = unsafe {
        let msg = std::ffi::CStr::from_ptr(sys::rs2_get_error_message(err))
            .to_string_lossy()
            .into_owned();
        sys::rs2_free_error(err);
        msg
    };
    Err(VideoError::Device(format!("{}: {}", context, msg)))
}

fn distortion_from_rs2(model: sys::rs2_distortion) -> Distortion {
    match model {
        sys::rs2_distortion_RS2_DISTORTION_MODIFIED_BROWN_CONRADY => {
            Distortion::ModifiedBrownConrady
        }
        sys::rs2_distortion_RS2_DISTORTION_INVERSE_BROWN_CONRADY => {
            Distortion::InverseBrownConrady
        }
        sys::rs2_distortion_RS2_DISTORTION_BROWN_CONRADY => Distortion::BrownConrady,
        sys::rs2_distortion_RS2_DISTORTION_KANNALA_BRANDT4 => Distortion::KannalaBrandt4,
        sys::rs2_distortion_RS2_DISTORTION_FTHETA => Distortion::FTheta,
        _ => Distortion::None,
    }
}

#[derive(Debug, Clone, Default)]
pub struct RealsenseConfig {
    pub color: Option<Vec2<usize>>,
    pub frame_rate: Option<f32>,
}

/// Color + Z16 depth, depth aligned to the color stream.
pub struct Realsense {
    context: *mut sys::rs2_context,
    pipeline: *mut sys::rs2_pipeline,
    align: *mut sys::rs2_processing_block,
    queue: *mut sys::rs2_frame_queue,
    depth_scale: f32,
}

// the handles are only touched from the worker thread that opened them
unsafe impl Send for Realsense {}

impl Realsense {
    pub fn new() -> Self {
        Self {
            context: null_mut(),
            pipeline: null_mut(),
            align: null_mut(),
            queue: null_mut(),
            depth_scale: 0.001,
        }
    }

    fn query_depth_scale(profile: *mut sys::rs2_pipeline_profile) -> Result<f32, VideoError> {
        let mut err = null_mut::<sys::rs2_error>();
        let device = unsafe { sys::rs2_pipeline_profile_get_device(profile, &mut err) };
        check_rs2_error(err, "failed to get device")?;
        let sensors = unsafe { sys::rs2_query_sensors(device, &mut err) };
        check_rs2_error(err, "failed to query sensors")?;
        let count = unsafe { sys::rs2_get_sensors_count(sensors, &mut err) };
        check_rs2_error(err, "failed to count sensors")?;
        let mut scale = None;
        for i in 0..count {
            let sensor = unsafe { sys::rs2_create_sensor(sensors, i, &mut err) };
            if check_rs2_error(err, "failed to create sensor").is_err() {
                err = null_mut();
                continue;
            }
            let is_depth = unsafe {
                sys::rs2_is_sensor_extendable_to(
                    sensor,
                    sys::rs2_extension_RS2_EXTENSION_DEPTH_SENSOR,
                    &mut err,
                )
            };
            if check_rs2_error(err, "failed to query sensor").is_ok() && is_depth != 0 {
                let value = unsafe { sys::rs2_get_depth_scale(sensor, &mut err) };
                if check_rs2_error(err, "failed to get depth scale").is_ok() {
                    scale = Some(value);
                }
            }
            err = null_mut();
            unsafe { sys::rs2_delete_sensor(sensor) };
            if scale.is_some() {
                break;
            }
        }
        unsafe { sys::rs2_delete_sensor_list(sensors) };
        unsafe { sys::rs2_delete_device(device) };
        scale.ok_or_else(|| VideoError::Device("no depth sensor found".to_string()))
    }

    fn read_intrinsics(frame: *const sys::rs2_frame) -> Result<Intrinsics, VideoError> {
        let mut err = null_mut::<sys::rs2_error>();
        let profile = unsafe { sys::rs2_get_frame_stream_profile(frame, &mut err) };
        check_rs2_error(err, "failed to get stream profile")?;
        let mut intr: sys::rs2_intrinsics = unsafe { std::mem::zeroed() };
        unsafe { sys::rs2_get_video_stream_intrinsics(profile, &mut intr, &mut err) };
        check_rs2_error(err, "failed to get intrinsics")?;
        Ok(Intrinsics {
            width: intr.width as usize,
            height: intr.height as usize,
            ppx: intr.ppx,
            ppy: intr.ppy,
            fx: intr.fx,
            fy: intr.fy,
            model: distortion_from_rs2(intr.model),
            coeffs: intr.coeffs,
        })
    }

    fn stream_of(frame: *const sys::rs2_frame) -> Result<sys::rs2_stream, VideoError> {
        let mut err = null_mut::<sys::rs2_error>();
        let profile = unsafe { sys::rs2_get_frame_stream_profile(frame, &mut err) };
        check_rs2_error(err, "failed to get stream profile")?;
        let mut stream: sys::rs2_stream = 0;
        let mut format: sys::rs2_format = 0;
        let mut index: i32 = 0;
        let mut uid: i32 = 0;
        let mut fps: i32 = 0;
        unsafe {
            sys::rs2_get_stream_profile_data(
                profile,
                &mut stream,
                &mut format,
                &mut index,
                &mut uid,
                &mut fps,
                &mut err,
            )
        };
        check_rs2_error(err, "failed to get stream profile data")?;
        Ok(stream)
    }

    fn frame_bytes(frame: *const sys::rs2_frame) -> Result<(Vec2<usize>, Vec<u8>), VideoError> {
        let mut err = null_mut::<sys::rs2_error>();
        let width = unsafe { sys::rs2_get_frame_width(frame, &mut err) } as usize;
        check_rs2_error(err, "failed to get frame width")?;
        let height = unsafe { sys::rs2_get_frame_height(frame, &mut err) } as usize;
        check_rs2_error(err, "failed to get frame height")?;
        let data_size = unsafe { sys::rs2_get_frame_data_size(frame, &mut err) } as usize;
        check_rs2_error(err, "failed to get frame size")?;
        let data_ptr = unsafe { sys::rs2_get_frame_data(frame, &mut err) } as *const u8;
        check_rs2_error(err, "failed to get frame data")?;
        let data = unsafe { std::slice::from_raw_parts(data_ptr, data_size).to_vec() };
        Ok((Vec2::new(width, height), data))
    }
}

impl Default for Realsense {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoInDevice for Realsense {
    fn open(&mut self, config: &VideoInConfig) -> Result<VideoInConfig, VideoError> {
        let VideoInConfig::Realsense(config) = config else {
            return Err(VideoError::Device("not a realsense config".to_string()));
        };
        let size = config.color.unwrap_or(DEFAULT_SIZE);
        let frame_rate = config.frame_rate.unwrap_or(DEFAULT_FRAME_RATE);

        let mut err = null_mut::<sys::rs2_error>();
        self.context = unsafe { sys::rs2_create_context(sys::RS2_API_VERSION as i32, &mut err) };
        check_rs2_error(err, "failed to create realsense context")?;
        self.pipeline = unsafe { sys::rs2_create_pipeline(self.context, &mut err) };
        check_rs2_error(err, "failed to create pipeline")?;
        let rs2_config = unsafe { sys::rs2_create_config(&mut err) };
        check_rs2_error(err, "failed to create config")?;

        for (stream, format) in [
            (sys::rs2_stream_RS2_STREAM_COLOR, sys::rs2_format_RS2_FORMAT_RGB8),
            (sys::rs2_stream_RS2_STREAM_DEPTH, sys::rs2_format_RS2_FORMAT_Z16),
        ] {
            unsafe {
                sys::rs2_config_enable_stream(
                    rs2_config,
                    stream,
                    -1,
                    size.x as i32,
                    size.y as i32,
                    format,
                    frame_rate as i32,
                    &mut err,
                )
            };
            if let Err(e) = check_rs2_error(err, "failed to enable stream") {
                unsafe { sys::rs2_delete_config(rs2_config) };
                return Err(e);
            }
        }

        let profile =
            unsafe { sys::rs2_pipeline_start_with_config(self.pipeline, rs2_config, &mut err) };
        unsafe { sys::rs2_delete_config(rs2_config) };
        check_rs2_error(err, "failed to start pipeline")?;
        let depth_scale = Self::query_depth_scale(profile);
        unsafe { sys::rs2_delete_pipeline_profile(profile) };
        self.depth_scale = depth_scale?;

        self.align =
            unsafe { sys::rs2_create_align(sys::rs2_stream_RS2_STREAM_COLOR, &mut err) };
        check_rs2_error(err, "failed to create align block")?;
        self.queue = unsafe { sys::rs2_create_frame_queue(ALIGN_QUEUE_CAPACITY, &mut err) };
        check_rs2_error(err, "failed to create frame queue")?;
        unsafe { sys::rs2_start_processing_queue(self.align, self.queue, &mut err) };
        check_rs2_error(err, "failed to start align block")?;

        log::info!(
            "realsense: {}x{} at {} fps, depth scale {}",
            size.x,
            size.y,
            frame_rate,
            self.depth_scale
        );
        Ok(VideoInConfig::Realsense(RealsenseConfig {
            color: Some(size),
            frame_rate: Some(frame_rate),
        }))
    }

    fn close(&mut self) {
        unsafe {
            if !self.pipeline.is_null() {
                let mut err = null_mut::<sys::rs2_error>();
                sys::rs2_pipeline_stop(self.pipeline, &mut err);
                if !err.is_null() {
                    sys::rs2_free_error(err);
                }
                sys::rs2_delete_pipeline(self.pipeline);
                self.pipeline = null_mut();
            }
            if !self.align.is_null() {
                sys::rs2_delete_processing_block(self.align);
                self.align = null_mut();
            }
            if !self.queue.is_null() {
                sys::rs2_delete_frame_queue(self.queue);
                self.queue = null_mut();
            }
            if !self.context.is_null() {
                sys::rs2_delete_context(self.context);
                self.context = null_mut();
            }
        }
    }

    fn blocking_capture(&mut self) -> Result<VideoFrame, VideoError> {
        if self.pipeline.is_null() {
            return Err(VideoError::Device("device not open".to_string()));
        }
        let mut err = null_mut::<sys::rs2_error>();
        let composite =
            unsafe { sys::rs2_pipeline_wait_for_frames(self.pipeline, CAPTURE_TIMEOUT_MS, &mut err) };
        check_rs2_error(err, "failed to wait for frames")
            .map_err(|e| VideoError::Stream(e.to_string()))?;

        // the align block takes ownership of the composite frame
        unsafe { sys::rs2_process_frame(self.align, composite, &mut err) };
        check_rs2_error(err, "failed to align frames")?;
        let aligned = unsafe { sys::rs2_wait_for_frame(self.queue, CAPTURE_TIMEOUT_MS, &mut err) };
        check_rs2_error(err, "failed to receive aligned frames")
            .map_err(|e| VideoError::Stream(e.to_string()))?;

        let result = self.unpack(aligned);
        unsafe { sys::rs2_release_frame(aligned) };
        result
    }
}

impl Realsense {
    fn unpack(&self, composite: *mut sys::rs2_frame) -> Result<VideoFrame, VideoError> {
        let mut err = null_mut::<sys::rs2_error>();
        let count = unsafe { sys::rs2_embedded_frames_count(composite, &mut err) };
        check_rs2_error(err, "failed to get embedded frame count")?;
        let timestamp = unsafe { sys::rs2_get_frame_timestamp(composite, &mut err) };
        check_rs2_error(err, "failed to get frame timestamp")?;

        let mut color = None;
        let mut depth = None;
        let mut intrinsics = None;
        for i in 0..count {
            let frame = unsafe { sys::rs2_extract_frame(composite, i, &mut err) };
            check_rs2_error(err, "failed to extract frame")?;
            let unpacked = (|| -> Result<(), VideoError> {
                let stream = Self::stream_of(frame)?;
                let (size, bytes) = Self::frame_bytes(frame)?;
                if stream == sys::rs2_stream_RS2_STREAM_COLOR {
                    color = Some(Image::new(size, bytes, PixelFormat::Rgb8));
                    intrinsics = Some(Self::read_intrinsics(frame)?);
                } else if stream == sys::rs2_stream_RS2_STREAM_DEPTH {
                    let data = bytes
                        .chunks_exact(2)
                        .map(|b| u16::from_ne_bytes([b[0], b[1]]))
                        .collect();
                    depth = Some(DepthImage::new(size, data, self.depth_scale));
                }
                Ok(())
            })();
            unsafe { sys::rs2_release_frame(frame) };
            unpacked?;
        }

        let color = color.ok_or_else(|| VideoError::Stream("frame set has no color".to_string()))?;
        let intrinsics = intrinsics
            .unwrap_or_else(|| Intrinsics::nominal(color.size.x, color.size.y));
        Ok(VideoFrame {
            color,
            depth,
            intrinsics,
            timestamp,
        })
    }
}
