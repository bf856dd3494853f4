//! Microphone capture on top of cpal.

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use super::types::{AudioChunk, CaptureConstraints, CaptureError};
use super::{CaptureDevice, CaptureStream};

/// The system default input device.
#[derive(Debug, Default)]
pub struct CpalDevice;

impl CpalDevice {
    pub fn new() -> Self {
        Self
    }
}

impl CaptureDevice for CpalDevice {
    fn acquire(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<Box<dyn CaptureStream>, CaptureError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| CaptureError::AccessDenied("No input device found".to_string()))?;

        log::debug!("using input device: {:?}", device.name());

        let supported = device
            .default_input_config()
            .map_err(|e| CaptureError::AccessDenied(e.to_string()))?;

        let sample_format = supported.sample_format();
        let mut config: cpal::StreamConfig = supported.into();
        if let Some(rate) = constraints.sample_rate {
            config.sample_rate = cpal::SampleRate(rate);
        }

        let channels = config.channels as usize;
        let out_channels = if constraints.mono { 1 } else { channels };
        let samples = Arc::new(Mutex::new(Vec::<i16>::new()));
        let capturing = Arc::new(AtomicBool::new(false));

        let stream = match sample_format {
            cpal::SampleFormat::F32 => {
                let samples = Arc::clone(&samples);
                let capturing = Arc::clone(&capturing);
                device.build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        if capturing.load(Ordering::Relaxed) {
                            let converted = data.iter().map(|s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16);
                            append_frames(&samples, converted, channels, out_channels);
                        }
                    },
                    |err| log::error!("capture stream error: {err}"),
                    None,
                )
            }
            cpal::SampleFormat::I16 => {
                let samples = Arc::clone(&samples);
                let capturing = Arc::clone(&capturing);
                device.build_input_stream(
                    &config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        if capturing.load(Ordering::Relaxed) {
                            append_frames(&samples, data.iter().copied(), channels, out_channels);
                        }
                    },
                    |err| log::error!("capture stream error: {err}"),
                    None,
                )
            }
            other => {
                return Err(CaptureError::Unsupported(format!(
                    "sample format {other:?}"
                )));
            }
        }
        .map_err(|e| CaptureError::AccessDenied(e.to_string()))?;

        log::info!(
            "acquired input stream at {}Hz, {} channel(s)",
            config.sample_rate.0,
            channels
        );

        Ok(Box::new(CpalStream {
            stream: Some(stream),
            samples,
            capturing,
            sample_rate: config.sample_rate.0,
            channels: out_channels as u16,
        }))
    }
}

/// Append interleaved frames, averaging channels when downmixing.
fn append_frames(
    samples: &Mutex<Vec<i16>>,
    data: impl Iterator<Item = i16>,
    channels: usize,
    out_channels: usize,
) {
    let mut buffer = samples.lock().unwrap_or_else(|e| e.into_inner());

    if out_channels == 1 && channels > 1 {
        let data: Vec<i16> = data.collect();
        buffer.extend(data.chunks(channels).map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / frame.len() as i32) as i16
        }));
    } else {
        buffer.extend(data);
    }
}

/// A live cpal input stream.
///
/// Samples accumulate on the audio thread; the whole take is flushed as a
/// single WAV chunk when the stream stops. `poll_chunks` never yields
/// anything for this stream, since a WAV header needs the final length.
pub struct CpalStream {
    stream: Option<cpal::Stream>,
    samples: Arc<Mutex<Vec<i16>>>,
    capturing: Arc<AtomicBool>,
    sample_rate: u32,
    channels: u16,
}

impl CpalStream {
    fn encode_wav(&self, samples: &[i16]) -> Result<AudioChunk, CaptureError> {
        let spec = hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec)
                .map_err(|e| CaptureError::Encoding(e.to_string()))?;
            for &sample in samples {
                writer
                    .write_sample(sample)
                    .map_err(|e| CaptureError::Encoding(e.to_string()))?;
            }
            writer
                .finalize()
                .map_err(|e| CaptureError::Encoding(e.to_string()))?;
        }

        Ok(cursor.into_inner())
    }
}

impl CaptureStream for CpalStream {
    fn start(&mut self) -> Result<(), CaptureError> {
        let stream = self
            .stream
            .as_ref()
            .ok_or_else(|| CaptureError::Stream("Stream already released".to_string()))?;

        stream
            .play()
            .map_err(|e| CaptureError::Stream(e.to_string()))?;
        self.capturing.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn stop(&mut self) -> Result<Vec<AudioChunk>, CaptureError> {
        self.capturing.store(false, Ordering::Relaxed);
        if let Some(stream) = &self.stream
            && let Err(e) = stream.pause()
        {
            log::warn!("failed to pause capture stream: {e}");
        }

        let samples = std::mem::take(&mut *self.samples.lock().unwrap_or_else(|e| e.into_inner()));
        if samples.is_empty() {
            return Ok(Vec::new());
        }

        log::debug!("flushing {} captured samples", samples.len());
        Ok(vec![self.encode_wav(&samples)?])
    }

    fn release(&mut self) {
        self.capturing.store(false, Ordering::Relaxed);
        if self.stream.take().is_some() {
            log::debug!("released input device");
        }
    }

    fn mime_type(&self) -> &str {
        "audio/wav"
    }
}

impl Drop for CpalStream {
    fn drop(&mut self) {
        self.release();
    }
}
