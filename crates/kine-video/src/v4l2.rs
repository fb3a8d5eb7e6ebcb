use {
    crate::{convert::yuyv_to_rgb_into, Frame, FrameSource, VideoError},
    kine_base::Vec2,
    std::path::PathBuf,
    v4l::{
        buffer::Type, io::mmap::Stream as MmapStream, io::traits::CaptureStream,
        video::capture::Parameters, video::Capture, Device, Format, FourCC,
    },
};

// number of mmap buffers queued with the driver
const BUFFER_COUNT: u32 = 4;

/// Configuration for a V4L2 capture device.
#[derive(Debug, Clone)]
pub struct V4l2Config {
    path: Option<PathBuf>,
    size: Vec2<usize>,
    frame_rate: u32,
}

impl Default for V4l2Config {
    fn default() -> Self {
        Self {
            path: None,
            size: Vec2::new(640, 480),
            frame_rate: 30,
        }
    }
}

impl V4l2Config {
    /// Device node to open; the first video device when unset.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.size = Vec2::new(width, height);
        self
    }

    pub fn with_frame_rate(mut self, frame_rate: u32) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    pub fn size(&self) -> Vec2<usize> {
        self.size
    }

    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }
}

/// YUYV webcam capture through Video4Linux2, converted to RGB on capture.
pub struct V4l2Camera {
    stream: MmapStream<'static>,
    size: Vec2<usize>,
}

impl V4l2Camera {
    pub fn open(config: &V4l2Config) -> Result<Self, VideoError> {
        let device = match config.path() {
            Some(path) => Device::with_path(path)?,
            None => Device::new(0)?,
        };

        let requested = Format::new(
            config.size.x as u32,
            config.size.y as u32,
            FourCC::new(b"YUYV"),
        );
        let actual = Capture::set_format(&device, &requested)?;
        if &actual.fourcc.repr != b"YUYV" {
            return Err(VideoError::Format(format!(
                "device refused YUYV, offers {}",
                actual.fourcc
            )));
        }
        let size = Vec2::new(actual.width as usize, actual.height as usize);
        if size != config.size {
            log::warn!(
                "requested {}x{}, device delivers {}x{}",
                config.size.x,
                config.size.y,
                size.x,
                size.y
            );
        }

        let params = Capture::set_params(&device, &Parameters::with_fps(config.frame_rate))?;
        log::info!(
            "camera open: {}x{} YUYV at {} fps",
            size.x,
            size.y,
            params.interval.denominator as f32 / params.interval.numerator.max(1) as f32
        );

        let stream = MmapStream::with_buffers(&device, Type::VideoCapture, BUFFER_COUNT)
            .map_err(|e| VideoError::Stream(e.to_string()))?;

        Ok(Self { stream, size })
    }
}

impl FrameSource for V4l2Camera {
    fn size(&self) -> Vec2<usize> {
        self.size
    }

    fn capture(&mut self) -> Result<Frame, VideoError> {
        let (data, _metadata) = CaptureStream::next(&mut self.stream)
            .map_err(|e| VideoError::Stream(e.to_string()))?;

        let mut rgb = Vec::new();
        if !yuyv_to_rgb_into(data, self.size.x, self.size.y, &mut rgb) {
            return Err(VideoError::Format(format!(
                "short YUYV buffer: {} bytes for {}x{}",
                data.len(),
                self.size.x,
                self.size.y
            )));
        }
        Ok(Frame::new(rgb, self.size.x, self.size.y))
    }
}
