//! The booking workflow driven through the voice controller.
//!
//! Each field opens a recognition session whose callback forwards the
//! transcript, tagged with its field, onto a channel. The flow applies it to
//! the form and speaks the confirmation, so callbacks never re-enter the
//! controller.

use anyhow::{anyhow, Context, Result};
use booking_form::{
    mock_trains, results_announcement, PassengerDetails, PassengerField, SearchField, SearchForm,
    BOOKING_CONFIRMED, BOOKING_PROCESSING,
};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use time::macros::format_description;
use time::Date;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use voice_controller::{
    MockRecognizer, Notification, NotificationSink, RecognitionErrorKind, ScriptedOutcome,
    TracingNotifier, TranscriptCallback, VoiceController,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FieldTarget {
    Search(SearchField),
    Passenger(PassengerField),
}

impl FieldTarget {
    fn prompt(&self) -> String {
        match self {
            FieldTarget::Search(SearchField::From) => "Say the departure station".into(),
            FieldTarget::Search(SearchField::To) => "Say the destination station".into(),
            FieldTarget::Search(SearchField::Passengers) => "Say the number of passengers".into(),
            FieldTarget::Passenger(field) => format!("Say the passenger {}", field.key()),
        }
    }
}

const SEARCH_FIELDS: [FieldTarget; 3] = [
    FieldTarget::Search(SearchField::From),
    FieldTarget::Search(SearchField::To),
    FieldTarget::Search(SearchField::Passengers),
];

#[derive(Debug)]
struct FieldInput {
    target: FieldTarget,
    text: String,
}

/// Stands in for the microphone: decides what each session "hears".
pub enum TranscriptSource {
    Scripted(VecDeque<String>),
    /// One line per field. Empty means silence, `!error` a failed session.
    Stdin,
}

impl TranscriptSource {
    pub fn demo_script() -> Self {
        Self::Scripted(
            [
                "New Delhi",
                "Mumbai",
                "fifty two",
                "Asha Rao",
                "thirty two",
                "female",
                "555 0100",
                "asha@example.com",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        )
    }

    fn next(&mut self, prompt: &str) -> Result<ScriptedOutcome> {
        match self {
            TranscriptSource::Scripted(lines) => Ok(lines
                .pop_front()
                .map_or(ScriptedOutcome::Silence, ScriptedOutcome::Transcript)),
            TranscriptSource::Stdin => {
                print!("🎤 {prompt}: ");
                io::stdout().flush()?;
                let mut line = String::new();
                io::stdin().lock().read_line(&mut line)?;
                let line = line.trim();
                Ok(match line {
                    "" => ScriptedOutcome::Silence,
                    "!error" => ScriptedOutcome::Error(RecognitionErrorKind::NoSpeech),
                    text => ScriptedOutcome::Transcript(text.to_string()),
                })
            }
        }
    }
}

pub struct BookingFlow {
    controller: VoiceController,
    recognizer: MockRecognizer,
    source: TranscriptSource,
    toasts: TracingNotifier,
    inputs_tx: mpsc::UnboundedSender<FieldInput>,
    inputs_rx: mpsc::UnboundedReceiver<FieldInput>,
    pub search: SearchForm,
    pub passenger: PassengerDetails,
}

impl BookingFlow {
    /// `recognizer` must be the engine (or a clone of it) the controller
    /// was built with; scripted outcomes are pushed into it per field.
    pub fn new(
        controller: VoiceController,
        recognizer: MockRecognizer,
        source: TranscriptSource,
    ) -> Self {
        let (inputs_tx, inputs_rx) = mpsc::unbounded_channel();
        Self {
            controller,
            recognizer,
            source,
            toasts: TracingNotifier,
            inputs_tx,
            inputs_rx,
            search: SearchForm::default(),
            passenger: PassengerDetails::default(),
        }
    }

    pub fn controller(&self) -> &VoiceController {
        &self.controller
    }

    pub async fn run(&mut self, date: Date) -> Result<bool> {
        for target in SEARCH_FIELDS {
            self.listen(target)?;
        }
        self.search.date = Some(date);

        let request = match self.search.validate() {
            Ok(request) => request,
            Err(e) => {
                warn!("search incomplete: {e}");
                self.say(e.to_string());
                return Ok(false);
            }
        };
        self.say(request.announcement());
        println!("🔎 {request:?}");

        let trains = mock_trains();
        self.say(results_announcement(trains.len()));
        let train = trains
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("no trains found"))?;
        self.say(train.booking_announcement());

        for field in PassengerField::ALL {
            self.listen(FieldTarget::Passenger(field))?;
        }
        if let Err(e) = self.passenger.validate() {
            warn!("passenger details incomplete: {e}");
            self.say(e.to_string());
            return Ok(false);
        }

        self.say(BOOKING_PROCESSING);
        tokio::time::sleep(tokio::time::Duration::from_millis(300)).await;
        self.say(BOOKING_CONFIRMED);
        self.toasts
            .notify(Notification::info("Booking Confirmed!", train.booked_description()));
        Ok(true)
    }

    /// Open one recognition session for `target` and apply what it hears.
    /// Returns false when no session could be started.
    pub fn listen(&mut self, target: FieldTarget) -> Result<bool> {
        let outcome = self
            .source
            .next(&target.prompt())
            .with_context(|| format!("reading input for {target:?}"))?;
        // the mock hears the outcome as soon as it starts, so queue it first
        self.recognizer.push(outcome.clone());

        let tx = self.inputs_tx.clone();
        let callback: TranscriptCallback = Box::new(move |text| {
            if tx.send(FieldInput { target, text }).is_err() {
                debug!("booking flow gone, transcript dropped");
            }
        });
        if self.controller.start_listening(Some(callback)).is_none() {
            let dropped = self.recognizer.clear_script();
            debug!(?target, dropped, "no session started, scripted outcome withdrawn");
            // voice unavailable or busy: take the line as typed input instead
            if let ScriptedOutcome::Transcript(text) = outcome {
                info!(?target, "voice unavailable, using typed input");
                self.apply(FieldInput { target, text });
                self.settle();
            }
            return Ok(false);
        }
        self.settle();
        Ok(true)
    }

    /// Deliver engine events and route transcripts until nothing is left.
    fn settle(&mut self) {
        loop {
            let mut progressed = self.controller.dispatch_pending() > 0;
            while let Ok(input) = self.inputs_rx.try_recv() {
                self.apply(input);
                progressed = true;
            }
            if !progressed {
                break;
            }
        }
        let status = self.controller.status();
        debug!(listening = status.listening, speaking = status.speaking, "settled");
    }

    fn apply(&mut self, input: FieldInput) {
        let confirmation = match input.target {
            FieldTarget::Search(field) => self.search.apply_voice_input(field, &input.text),
            FieldTarget::Passenger(field) => self.passenger.apply_voice_input(field, &input.text),
        };
        self.say(confirmation);
    }

    fn say(&mut self, text: impl Into<String>) {
        let text = text.into();
        println!("🔊 {text}");
        self.controller.speak(text);
        self.settle();
    }
}

/// Parse `YYYY-MM-DD`.
pub fn parse_travel_date(raw: &str) -> Result<Date> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
        .with_context(|| format!("invalid travel date {raw:?}, expected YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;
    use voice_controller::{MockSynthesizer, RecordingNotifier, VoiceConfig};

    fn flow(recognizer: Option<MockRecognizer>, lines: &[&str]) -> (BookingFlow, MockSynthesizer) {
        let synthesizer = MockSynthesizer::auto_complete();
        let engine = recognizer.clone().unwrap_or_default();
        let controller = VoiceController::new(
            VoiceConfig::default(),
            recognizer.map(|r| Box::new(r) as Box<dyn voice_controller::RecognitionEngine>),
            Box::new(synthesizer.clone()),
            Box::new(RecordingNotifier::new()),
        );
        let source = TranscriptSource::Scripted(lines.iter().map(|s| s.to_string()).collect());
        (BookingFlow::new(controller, engine, source), synthesizer)
    }

    #[test]
    fn test_field_transcripts_reach_their_own_fields() {
        let (mut flow, synthesizer) =
            flow(Some(MockRecognizer::new()), &["Pune", "Goa", "fifty two"]);
        for target in SEARCH_FIELDS {
            assert!(flow.listen(target).unwrap());
        }
        assert_eq!(flow.search.from, "pune");
        assert_eq!(flow.search.to, "goa");
        assert_eq!(flow.search.passengers, 52);
        assert_eq!(
            synthesizer.spoken(),
            vec![
                "from station set to pune".to_string(),
                "to station set to goa".to_string(),
                "Number of passengers set to 52".to_string(),
            ]
        );
        assert!(!flow.controller().is_listening());
        assert!(!flow.controller().is_speaking());
    }

    #[test]
    fn test_silence_leaves_field_untouched() {
        let (mut flow, synthesizer) = flow(Some(MockRecognizer::new()), &[]);
        assert!(flow.listen(FieldTarget::Search(SearchField::From)).unwrap());
        assert!(flow.search.from.is_empty());
        assert!(synthesizer.spoken().is_empty());
    }

    #[test]
    fn test_typed_fallback_without_recognizer() {
        let (mut flow, _) = flow(None, &["Chennai"]);
        assert!(!flow.listen(FieldTarget::Search(SearchField::To)).unwrap());
        assert_eq!(flow.search.to, "chennai");
    }

    #[test]
    fn test_rejected_start_does_not_leak_outcome_into_next_session() {
        let recognizer = MockRecognizer::new();
        let (mut flow, _) = flow(Some(recognizer.clone()), &["Agra", "Surat"]);

        // a session someone else left open makes the default policy reject ours
        assert!(flow.controller.start_listening(None).is_some());
        assert!(!flow.listen(FieldTarget::Search(SearchField::From)).unwrap());
        assert_eq!(flow.search.from, "agra");

        flow.controller.stop_listening();
        flow.settle();
        assert!(flow.listen(FieldTarget::Search(SearchField::To)).unwrap());
        assert_eq!(flow.search.to, "surat");
    }

    #[test]
    fn test_typed_fallback_leaves_no_queued_outcomes() {
        let (mut flow, _) = flow(None, &["Chennai", "Delhi"]);
        assert!(!flow.listen(FieldTarget::Search(SearchField::From)).unwrap());
        assert!(!flow.listen(FieldTarget::Search(SearchField::To)).unwrap());
        assert_eq!(flow.recognizer.clear_script(), 0);
    }

    #[tokio::test]
    async fn test_full_demo_books_a_ticket() {
        let synthesizer = MockSynthesizer::auto_complete();
        let recognizer = MockRecognizer::new();
        let controller = VoiceController::new(
            VoiceConfig::default(),
            Some(Box::new(recognizer.clone())),
            Box::new(synthesizer.clone()),
            Box::new(RecordingNotifier::new()),
        );
        let mut flow = BookingFlow::new(controller, recognizer, TranscriptSource::demo_script());
        let date = parse_travel_date("2026-10-20").unwrap();
        assert!(flow.run(date).await.unwrap());
        assert_eq!(flow.passenger.name, "Asha Rao");
        assert_eq!(
            synthesizer.spoken().last().map(String::as_str),
            Some(BOOKING_CONFIRMED)
        );
    }

    #[tokio::test]
    async fn test_incomplete_search_is_announced() {
        let (mut flow, synthesizer) = flow(Some(MockRecognizer::new()), &["Pune"]);
        let date = parse_travel_date("2026-10-20").unwrap();
        assert!(!flow.run(date).await.unwrap());
        assert_eq!(
            synthesizer.spoken().last().map(String::as_str),
            Some("Please fill in all required fields: departure station, destination station, and travel date")
        );
    }

    #[test]
    fn test_parse_travel_date() {
        let date = parse_travel_date("2026-10-20").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2026, Month::October, 20));
        assert!(parse_travel_date("2026-13-01").is_err());
        assert!(parse_travel_date("tomorrow").is_err());
        assert!(parse_travel_date("2026-02").is_err());
        assert!(parse_travel_date("2026-02-30").is_err());
        assert_eq!(parse_travel_date(" 2026-01-05 ").unwrap().day(), 5);
    }
}
