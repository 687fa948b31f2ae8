// Stereo-to-mono conversion for recognizer input.
//
// The transport delivers interleaved 2-channel s16le PCM; the decoder wants
// mono at the same rate. We downmix by decimation — keep channel 0, drop
// channel 1 — matching the decoder's expectation of a continuous waveform
// from a single channel. Averaging the channels is NOT wanted here.

use crate::error::BridgeError;

/// Downmix an interleaved stereo s16le buffer to mono samples.
///
/// Output holds every other sample starting at index 0 (channel 0 only), so
/// a buffer of `4n` bytes yields `n` mono samples. A buffer whose length is
/// not a multiple of 4 is a caller error and fails with `MalformedAudio`;
/// the failure must reach the caller rather than being swallowed, since a
/// silently dropped frame desynchronizes the decoder's waveform position.
pub fn stereo_to_mono(pcm: &[u8]) -> Result<Vec<i16>, BridgeError> {
    if pcm.len() % 4 != 0 {
        return Err(BridgeError::MalformedAudio(format!(
            "buffer of {} bytes is not a whole number of stereo sample pairs",
            pcm.len()
        )));
    }

    let mut mono = Vec::with_capacity(pcm.len() / 4);

    // 4 bytes per stereo pair: [ch0 lo, ch0 hi, ch1 lo, ch1 hi]
    for pair in pcm.chunks_exact(4) {
        mono.push(i16::from_le_bytes([pair[0], pair[1]]));
    }

    Ok(mono)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Interleave two channels into s16le bytes
    fn stereo_bytes(ch0: &[i16], ch1: &[i16]) -> Vec<u8> {
        assert_eq!(ch0.len(), ch1.len());
        ch0.iter()
            .zip(ch1)
            .flat_map(|(&l, &r)| {
                let mut b = l.to_le_bytes().to_vec();
                b.extend_from_slice(&r.to_le_bytes());
                b
            })
            .collect()
    }

    #[test]
    fn test_keeps_channel_zero_only() {
        let pcm = stereo_bytes(&[100, 200, 300], &[-1, -2, -3]);

        let mono = stereo_to_mono(&pcm).unwrap();

        assert_eq!(mono, vec![100, 200, 300]);
    }

    #[test]
    fn test_output_is_half_the_samples() {
        // 4n input bytes -> n mono samples (2n input samples)
        let pcm = stereo_bytes(&[1, 2, 3, 4, 5, 6, 7, 8], &[0; 8]);

        let mono = stereo_to_mono(&pcm).unwrap();

        assert_eq!(pcm.len(), 32);
        assert_eq!(mono.len(), 8);
    }

    #[test]
    fn test_negative_samples_survive() {
        let pcm = stereo_bytes(&[i16::MIN, -42, i16::MAX], &[7, 7, 7]);

        let mono = stereo_to_mono(&pcm).unwrap();

        assert_eq!(mono, vec![i16::MIN, -42, i16::MAX]);
    }

    #[test]
    fn test_empty_buffer_is_valid() {
        assert_eq!(stereo_to_mono(&[]).unwrap(), Vec::<i16>::new());
    }

    #[test]
    fn test_misaligned_buffer_is_rejected() {
        // 6 bytes: one full stereo pair plus a dangling sample
        let err = stereo_to_mono(&[0, 0, 0, 0, 0, 0]).unwrap_err();

        assert!(matches!(err, BridgeError::MalformedAudio(_)));
    }

    #[test]
    fn test_odd_byte_count_is_rejected() {
        let err = stereo_to_mono(&[1, 2, 3]).unwrap_err();

        assert!(matches!(err, BridgeError::MalformedAudio(_)));
    }
}
