use crate::{Result, VeraError};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::debug;

/// Number of input frames processed per resampler call
const CHUNK_SIZE: usize = 1024;

/// Streaming mono resampler for converting the capture rate to the
/// rate Whisper expects.
///
/// Input arrives in arbitrarily sized chunks from the audio callback;
/// samples are buffered internally until a full resampler chunk is
/// available. When input and output rates match, samples pass through
/// untouched.
pub struct StreamResampler {
    resampler: Option<SincFixedIn<f32>>,
    pending: Vec<f32>,
}

impl StreamResampler {
    pub fn new(input_rate: u32, output_rate: u32) -> Result<Self> {
        if input_rate == 0 || output_rate == 0 {
            return Err(VeraError::ConfigError(
                "Sample rates must be greater than 0".into(),
            ));
        }

        if input_rate == output_rate {
            return Ok(Self {
                resampler: None,
                pending: Vec::new(),
            });
        }

        let resample_ratio = output_rate as f64 / input_rate as f64;

        let params = SincInterpolationParameters {
            sinc_len: 256,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor: 256,
            window: WindowFunction::BlackmanHarris2,
        };

        let resampler = SincFixedIn::<f32>::new(resample_ratio, 2.0, params, CHUNK_SIZE, 1)
            .map_err(|e| {
                VeraError::AudioProcessingError(format!("Failed to create resampler: {}", e))
            })?;

        debug!("Created resampler: {} Hz -> {} Hz", input_rate, output_rate);

        Ok(Self {
            resampler: Some(resampler),
            pending: Vec::new(),
        })
    }

    /// Feed input samples, returning however many output samples became
    /// available. A trailing partial chunk stays buffered until more
    /// input arrives.
    pub fn process(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        let Some(resampler) = self.resampler.as_mut() else {
            return Ok(input.to_vec());
        };

        self.pending.extend_from_slice(input);

        let mut output = Vec::new();
        while self.pending.len() >= CHUNK_SIZE {
            let chunk: Vec<f32> = self.pending.drain(..CHUNK_SIZE).collect();
            let frames = resampler.process(&[chunk], None).map_err(|e| {
                VeraError::AudioProcessingError(format!("Resampling failed: {}", e))
            })?;
            output.extend_from_slice(&frames[0]);
        }

        Ok(output)
    }

    /// Drop any buffered partial chunk
    pub fn reset(&mut self) {
        self.pending.clear();
    }
}
