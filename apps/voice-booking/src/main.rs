//! Voice Booking Demo Application
//!
//! Walks the train booking workflow through the voice controller:
//! field prompt → recognition session → transcript callback → form update →
//! spoken confirmation. Mock engines stand in for the microphone and the
//! speaker, so this runs on any host.

mod config;
mod flow;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use time::OffsetDateTime;
use tracing::{error, info};
use voice_controller::{
    MockRecognizer, MockSynthesizer, OverlapPolicy, RecognitionEngine, TracingNotifier,
    VoiceController,
};

use crate::flow::{parse_travel_date, BookingFlow, TranscriptSource};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Overlap {
    Reject,
    Supersede,
    Legacy,
}

impl From<Overlap> for OverlapPolicy {
    fn from(value: Overlap) -> Self {
        match value {
            Overlap::Reject => OverlapPolicy::Reject,
            Overlap::Supersede => OverlapPolicy::Supersede,
            Overlap::Legacy => OverlapPolicy::Legacy,
        }
    }
}

#[derive(Parser)]
#[command(name = "voice-booking")]
#[command(about = "Voice-driven train booking demo")]
struct Args {
    /// JSON voice config (locale, utterance parameters, overlap policy)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured overlap policy
    #[arg(long, value_enum)]
    overlap: Option<Overlap>,

    /// Simulate a platform without speech recognition
    #[arg(long)]
    no_recognizer: bool,

    /// Interactive mode (type what the microphone would hear)
    #[arg(long)]
    interactive: bool,

    /// Travel date as YYYY-MM-DD (defaults to today)
    #[arg(long)]
    date: Option<String>,

    /// Write the effective config to this path and exit
    #[arg(long)]
    write_config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();

    let args = Args::parse();

    let mut voice_config = match &args.config {
        Some(path) => config::load(path)?,
        None => voice_controller::VoiceConfig::default(),
    };
    if let Some(overlap) = args.overlap {
        voice_config.overlap_policy = overlap.into();
    }
    voice_config.validate()?;

    if let Some(path) = &args.write_config {
        config::save(&voice_config, path)?;
        info!("wrote voice config to {}", path.display());
        return Ok(());
    }

    let date = match &args.date {
        Some(raw) => parse_travel_date(raw)?,
        None => OffsetDateTime::now_utc().date(),
    };

    info!(
        locale = %voice_config.locale,
        overlap = ?voice_config.overlap_policy,
        "🎙️ Starting voice booking demo"
    );

    let recognizer = MockRecognizer::new();
    let engine: Option<Box<dyn RecognitionEngine>> = if args.no_recognizer {
        None
    } else {
        Some(Box::new(recognizer.clone()))
    };
    let controller = VoiceController::new(
        voice_config,
        engine,
        Box::new(MockSynthesizer::auto_complete()),
        Box::new(TracingNotifier),
    );

    let mut status = controller.subscribe();
    tokio::spawn(async move {
        while status.changed().await.is_ok() {
            let s = *status.borrow_and_update();
            info!(listening = s.listening, speaking = s.speaking, "voice status");
        }
    });

    let source = if args.interactive {
        TranscriptSource::Stdin
    } else {
        TranscriptSource::demo_script()
    };
    let mut booking = BookingFlow::new(controller, recognizer, source);

    match booking.run(date).await {
        Ok(true) => println!("✅ Booking completed"),
        Ok(false) => println!("⚠️  Booking not completed"),
        Err(e) => error!("booking flow failed: {e:#}"),
    }
    let s = booking.controller().status();
    println!(
        "🎤 listening={} 🔊 speaking={}",
        s.listening, s.speaking
    );
    Ok(())
}

fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
