// Demo harness: run a WAV file through the full bridge path.
//
// A file-backed transport stands in for the realtime voice backend: it
// delivers 20 ms interleaved-stereo frames to the registered sink from a
// dedicated worker thread, the same contract a live transport's callback
// thread has. Recognized text lands on stdout.
//
// Usage: cargo run --features vosk -- --wav speech.wav
// (the WAV must match the configured sample rate; mono files are upmixed)

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::info;
use voxbridge::stt::vosk::load_recognizers;
use voxbridge::{
    AudioFrame, BridgeError, ChannelId, Config, FrameSink, GuildId, TextSink, VoiceBridge,
    VoiceConnection, VoiceTransport,
};

#[derive(Parser, Debug)]
#[command(name = "voxbridge", about = "Voice-channel transcription bridge")]
struct Cli {
    /// Config file (without extension, config-crate style)
    #[arg(long, default_value = "config/voxbridge")]
    config: String,

    /// WAV file to stream through the pipeline
    #[arg(long)]
    wav: Option<String>,

    /// Speaker label attached to the file's frames
    #[arg(long, default_value = "file")]
    speaker: String,
}

/// Prints transcripts and replies the way a text channel would receive them.
struct StdoutSink;

#[async_trait::async_trait]
impl TextSink for StdoutSink {
    async fn send(&self, text: &str) -> Result<()> {
        println!("{}", text);
        Ok(())
    }
}

/// File-backed voice connection: streams preloaded stereo PCM to the sink
/// in 20 ms frames from its own thread.
struct WavConnection {
    speaker: String,
    pcm: Vec<u8>,
    frame_bytes: usize,
    stopped: Arc<AtomicBool>,
    worker: Mutex<Option<std::thread::JoinHandle<()>>>,
}

#[async_trait::async_trait]
impl VoiceConnection for WavConnection {
    fn listen(&self, sink: Arc<dyn FrameSink>) {
        let speaker = self.speaker.clone();
        let pcm = self.pcm.clone();
        let frame_bytes = self.frame_bytes;
        let stopped = Arc::clone(&self.stopped);

        let handle = std::thread::spawn(move || {
            for frame in pcm.chunks(frame_bytes) {
                if stopped.load(Ordering::Acquire) {
                    break;
                }
                sink.write(AudioFrame {
                    speaker: speaker.clone(),
                    pcm: frame.to_vec(),
                });
                std::thread::sleep(Duration::from_millis(20));
            }
        });

        *self.worker.lock().unwrap() = Some(handle);
    }

    fn stop_listening(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    async fn disconnect(&self) {
        self.stop_listening();
        if let Some(handle) = self.worker.lock().unwrap().take() {
            let _ = handle.join();
        }
    }
}

struct WavTransport {
    speaker: String,
    pcm: Vec<u8>,
    sample_rate: u32,
}

#[async_trait::async_trait]
impl VoiceTransport for WavTransport {
    async fn connect(
        &self,
        _guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<Box<dyn VoiceConnection>, BridgeError> {
        info!("Opening file-backed voice connection to channel {}", channel_id);

        // 20 ms of interleaved stereo s16le
        let frame_bytes = (self.sample_rate as usize / 50) * 2 * 2;

        Ok(Box::new(WavConnection {
            speaker: self.speaker.clone(),
            pcm: self.pcm.clone(),
            frame_bytes,
            stopped: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
        }))
    }
}

/// Read a WAV file into the transport's wire format: interleaved stereo
/// s16le at the configured rate. Mono input is upmixed by duplication.
fn read_wav_as_stereo(path: &str, expected_rate: u32) -> Result<Vec<u8>> {
    let reader = hound::WavReader::open(path).context("Failed to open WAV file")?;
    let spec = reader.spec();

    if spec.sample_rate != expected_rate {
        bail!(
            "WAV sample rate {} does not match the configured {} Hz contract",
            spec.sample_rate,
            expected_rate
        );
    }

    let samples: Vec<i16> = reader
        .into_samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("Failed to read audio samples")?;

    let pcm: Vec<u8> = match spec.channels {
        1 => samples
            .iter()
            .flat_map(|&s| {
                let b = s.to_le_bytes();
                [b[0], b[1], b[0], b[1]]
            })
            .collect(),
        2 => samples.iter().flat_map(|&s| s.to_le_bytes()).collect(),
        n => bail!("Unsupported channel count {} (want mono or stereo)", n),
    };

    info!(
        "Loaded {}: {:.1}s, {} Hz, {} channel(s)",
        path,
        samples.len() as f64 / (spec.sample_rate as f64 * spec.channels as f64),
        spec.sample_rate,
        spec.channels
    );

    Ok(pcm)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;
    cfg.ensure_data_dir()?;

    info!("{} starting", cfg.service.name);
    info!(
        "Audio contract: {} Hz, {} channel(s)",
        cfg.voice.sample_rate, cfg.voice.channels
    );

    let recognizers = Arc::new(load_recognizers(&cfg.recognition, cfg.voice.sample_rate)?);

    let Some(wav) = cli.wav else {
        info!("No --wav given; models loaded OK, nothing to transcribe");
        return Ok(());
    };

    let pcm = read_wav_as_stereo(&wav, cfg.voice.sample_rate)?;
    let frame_count = pcm.len() / ((cfg.voice.sample_rate as usize / 50) * 4);

    let transport = Arc::new(WavTransport {
        speaker: cli.speaker,
        pcm,
        sample_rate: cfg.voice.sample_rate,
    });

    let bridge = VoiceBridge::new(
        transport,
        recognizers,
        cfg.recognition.default_language.clone(),
        cfg.voice.debug,
    );

    let guild = GuildId(0);
    bridge.join(guild, ChannelId(0), Arc::new(StdoutSink)).await?;

    // Let the worker thread play the file out in real time, then hang on a
    // moment for the tail of the dispatch queue
    tokio::time::sleep(Duration::from_millis(20 * frame_count as u64 + 500)).await;

    bridge.leave(guild).await?;

    info!("Done ({} frames)", frame_count);
    Ok(())
}
