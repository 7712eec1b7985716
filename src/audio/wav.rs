use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use super::backend::CaptureError;

/// Write 16-bit PCM samples to a WAV file.
pub fn write_i16_wav(
    path: &Path,
    samples: &[i16],
    sample_rate: u32,
    channels: u16,
) -> Result<(), CaptureError> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Write floating-point samples to a WAV file as 16-bit PCM.
pub fn write_f32_wav(
    path: &Path,
    samples: &[f32],
    sample_rate: u32,
    channels: u16,
) -> Result<(), CaptureError> {
    let i16_samples: Vec<i16> = samples
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16)
        .collect();
    write_i16_wav(path, &i16_samples, sample_rate, channels)
}

/// Read a WAV file into floating-point samples, normalizing integer PCM.
///
/// Returns `(samples, sample_rate, channels)`.
pub fn read_f32_wav(path: &Path) -> Result<(Vec<f32>, u32, u16), CaptureError> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => reader
            .samples::<i16>()
            .map(|s| s.map(|v| f32::from(v) / 32768.0))
            .collect::<Result<_, _>>()?,
    };

    Ok((samples, spec.sample_rate, spec.channels))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn i16_round_trip_preserves_samples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probe.wav");
        let samples = [0i16, 1000, -1000, i16::MAX, i16::MIN];

        write_i16_wav(&path, &samples, 16000, 1).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.sample_rate, 16000);
        assert_eq!(spec.channels, 1);
        let read: Vec<i16> = reader.samples::<i16>().map(Result::unwrap).collect();
        assert_eq!(read, samples);
    }

    #[test]
    fn f32_write_clamps_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clamped.wav");

        write_f32_wav(&path, &[2.0, -2.0, 0.0], 24000, 1).unwrap();

        let (read, rate, channels) = read_f32_wav(&path).unwrap();
        assert_eq!(rate, 24000);
        assert_eq!(channels, 1);
        assert_eq!(read.len(), 3);
        assert!(read[0] > 0.99 && read[1] < -0.99);
        assert!(read[2].abs() < 1e-4);
    }
}
