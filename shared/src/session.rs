//! The acquisition/prediction/export state machine.
//!
//! A [`Session`] owns the only mutable state of the client: the current
//! [`SessionState`], the held camera (if any), the current image and the
//! current prediction. Every change goes through one of its methods, which
//! check the transition against the state and against the single in-flight
//! operation before touching anything.
//!
//! Long-running steps are split in two so UI event loops never hold the
//! session across an await: `begin_*` validates and hands back what the
//! asynchronous part needs together with a ticket, and `complete_prediction`
//! / `finish_export` apply the outcome for that ticket. [`Session::capture`],
//! [`Session::upload`] and [`Session::download`] chain both halves for callers
//! that can.

use strum::{Display, EnumIter};

use crate::PredictionResult;
use crate::acquisition::{Acquisition, CameraGuard, CameraStream, RawUpload, Source};
use crate::codec::{Dimensions, EncodedImage};
use crate::error::{AcquireError, ExportError, PredictError, SessionError};
use crate::export::{self, Artifact, ArtifactSink};
use crate::predict::Predictor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum SessionState {
    Idle,
    CameraActive,
    AwaitingPrediction,
    Predicted,
}

/// User-triggerable actions; what the UI enables is `Session::allows`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum Action {
    #[strum(serialize = "start the camera")]
    StartCamera,
    #[strum(serialize = "stop the camera")]
    StopCamera,
    #[strum(serialize = "capture")]
    Capture,
    #[strum(serialize = "upload")]
    Upload,
    #[strum(serialize = "download")]
    Download,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Predict(Source),
    Export,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub ticket: u64,
    pub kind: OperationKind,
}

/// Image to submit for a prediction started by `begin_capture`/`begin_upload`.
#[derive(Debug, Clone)]
pub struct PendingPrediction {
    pub ticket: u64,
    pub image: EncodedImage,
}

/// Snapshot of what an export needs, detached from the session.
#[derive(Debug, Clone)]
pub struct ExportJob {
    pub ticket: u64,
    pub prediction: PredictionResult,
    pub acquisition: Acquisition,
}

impl ExportJob {
    pub fn build(&self) -> Result<Artifact, ExportError> {
        export::build_artifact(&self.prediction, &self.acquisition)
    }
}

#[derive(Debug)]
pub struct Session<S: CameraStream> {
    state: SessionState,
    camera: Option<CameraGuard<S>>,
    acquisition: Option<Acquisition>,
    prediction: Option<PredictionResult>,
    in_flight: Option<Operation>,
    next_ticket: u64,
}

impl<S: CameraStream> Default for Session<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CameraStream> Session<S> {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            camera: None,
            acquisition: None,
            prediction: None,
            in_flight: None,
            next_ticket: 1,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn prediction(&self) -> Option<&PredictionResult> {
        self.prediction.as_ref()
    }

    pub fn acquisition(&self) -> Option<&Acquisition> {
        self.acquisition.as_ref()
    }

    pub fn camera(&self) -> Option<&S> {
        self.camera.as_ref().and_then(CameraGuard::stream)
    }

    pub fn in_flight(&self) -> Option<Operation> {
        self.in_flight
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn allows(&self, action: Action) -> bool {
        if self.is_busy() {
            return false;
        }

        match action {
            Action::StartCamera => {
                matches!(self.state, SessionState::Idle | SessionState::Predicted)
            }
            Action::StopCamera | Action::Capture => self.state == SessionState::CameraActive,
            Action::Upload => matches!(
                self.state,
                SessionState::Idle | SessionState::CameraActive | SessionState::Predicted
            ),
            Action::Download => self.state == SessionState::Predicted,
        }
    }

    /// Takes ownership of a freshly opened camera stream, bare or already
    /// guarded. The stream is released immediately if the session cannot
    /// accept it.
    pub fn start_camera(&mut self, camera: impl Into<CameraGuard<S>>) -> Result<(), SessionError> {
        let guard = camera.into();
        self.check(Action::StartCamera)?;
        if !guard.is_held() {
            return Err(AcquireError::DeviceUnavailable("camera already released".into()).into());
        }

        self.acquisition = None;
        self.prediction = None;
        self.camera = Some(guard);
        self.transition(SessionState::CameraActive);
        Ok(())
    }

    pub fn stop_camera(&mut self) -> Result<(), SessionError> {
        self.check(Action::StopCamera)?;
        self.release_camera();
        self.transition(SessionState::Idle);
        Ok(())
    }

    /// Snapshots the camera and releases it. The frame is kept at full
    /// resolution for export.
    pub fn begin_capture(&mut self) -> Result<PendingPrediction, SessionError> {
        self.check(Action::Capture)?;

        let captured = match &self.camera {
            Some(guard) => guard.capture_frame(),
            None => Err(AcquireError::DeviceUnavailable("no camera held".into())),
        };
        self.release_camera();

        let frame = match captured {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("capture failed: {}", e);
                self.transition(SessionState::Idle);
                return Err(e.into());
            }
        };

        log::info!("captured {} frame ({} bytes)", frame.mime(), frame.len());
        self.prediction = None;
        self.acquisition = Some(Acquisition::Camera {
            frame: frame.clone(),
        });
        Ok(self.start_prediction(Source::Camera, frame))
    }

    /// Resizes the upload to `limits` and makes it the current image. A file
    /// that cannot be decoded leaves the session untouched.
    pub fn begin_upload(
        &mut self,
        upload: &RawUpload,
        limits: Dimensions,
    ) -> Result<PendingPrediction, SessionError> {
        self.check(Action::Upload)?;

        let acquisition = upload.normalize(limits)?;
        let image = acquisition.image().clone();
        log::info!(
            "uploaded {} resized to {} bytes",
            upload.file_name.as_deref().unwrap_or("image"),
            image.len()
        );

        self.release_camera();
        self.prediction = None;
        self.acquisition = Some(acquisition);
        Ok(self.start_prediction(Source::Upload, image))
    }

    /// Applies the outcome of the prediction identified by `ticket`. On
    /// failure the session falls back to `Idle`, keeping the image on display.
    pub fn complete_prediction(
        &mut self,
        ticket: u64,
        outcome: Result<PredictionResult, PredictError>,
    ) -> Result<&PredictionResult, SessionError> {
        let source = match self.in_flight {
            Some(Operation {
                ticket: current,
                kind: OperationKind::Predict(source),
            }) if current == ticket => source,
            _ => {
                log::warn!("ignoring result for superseded prediction {}", ticket);
                return Err(SessionError::StaleResult(ticket));
            }
        };
        self.in_flight = None;

        match outcome {
            Ok(result) => {
                log::info!(
                    "{} image predicted as {} ({}%)",
                    source,
                    result.class_name,
                    result.confidence_score
                );
                self.transition(SessionState::Predicted);
                Ok(self.prediction.insert(result))
            }
            Err(e) => {
                log::error!("prediction for {} image failed: {}", source, e);
                self.prediction = None;
                self.transition(SessionState::Idle);
                Err(e.into())
            }
        }
    }

    pub fn begin_export(&mut self) -> Result<ExportJob, SessionError> {
        self.check(Action::Download)?;

        let (prediction, acquisition) = match (&self.prediction, &self.acquisition) {
            (Some(prediction), Some(acquisition)) => (prediction.clone(), acquisition.clone()),
            _ => {
                return Err(SessionError::InvalidTransition {
                    action: Action::Download,
                    state: self.state,
                });
            }
        };

        let ticket = self.take_ticket();
        self.in_flight = Some(Operation {
            ticket,
            kind: OperationKind::Export,
        });

        Ok(ExportJob {
            ticket,
            prediction,
            acquisition,
        })
    }

    /// Clears the export started by `begin_export`. Session data is never
    /// changed by exporting.
    pub fn finish_export<T>(
        &mut self,
        ticket: u64,
        outcome: Result<T, ExportError>,
    ) -> Result<T, SessionError> {
        match self.in_flight {
            Some(Operation {
                ticket: current,
                kind: OperationKind::Export,
            }) if current == ticket => self.in_flight = None,
            _ => return Err(SessionError::StaleResult(ticket)),
        }

        outcome.map_err(|e| {
            log::error!("export failed: {}", e);
            e.into()
        })
    }

    pub async fn capture<P: Predictor>(
        &mut self,
        predictor: &P,
    ) -> Result<&PredictionResult, SessionError> {
        let pending = self.begin_capture()?;
        let outcome = predictor.predict(&pending.image).await;
        self.complete_prediction(pending.ticket, outcome)
    }

    pub async fn upload<P: Predictor>(
        &mut self,
        upload: &RawUpload,
        limits: Dimensions,
        predictor: &P,
    ) -> Result<&PredictionResult, SessionError> {
        let pending = self.begin_upload(upload, limits)?;
        let outcome = predictor.predict(&pending.image).await;
        self.complete_prediction(pending.ticket, outcome)
    }

    /// Builds the artifact for the current prediction and hands it to `sink`.
    pub fn download<K: ArtifactSink>(&mut self, sink: &mut K) -> Result<Artifact, SessionError> {
        let job = self.begin_export()?;
        let outcome = job
            .build()
            .and_then(|artifact| sink.save(&artifact).map(|()| artifact));
        self.finish_export(job.ticket, outcome)
    }

    /// Drops everything and returns to `Idle`. Results of operations still in
    /// flight will be rejected as stale.
    pub fn reset(&mut self) {
        self.release_camera();
        self.acquisition = None;
        self.prediction = None;
        self.in_flight = None;
        self.transition(SessionState::Idle);
    }

    fn check(&self, action: Action) -> Result<(), SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }
        if !self.allows(action) {
            return Err(SessionError::InvalidTransition {
                action,
                state: self.state,
            });
        }
        Ok(())
    }

    fn start_prediction(&mut self, source: Source, image: EncodedImage) -> PendingPrediction {
        let ticket = self.take_ticket();
        self.in_flight = Some(Operation {
            ticket,
            kind: OperationKind::Predict(source),
        });
        self.transition(SessionState::AwaitingPrediction);
        PendingPrediction { ticket, image }
    }

    fn release_camera(&mut self) {
        if let Some(mut guard) = self.camera.take() {
            guard.release();
        }
    }

    fn take_ticket(&mut self) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        ticket
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            log::debug!("session {} -> {}", self.state, next);
        }
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::tests::FakeCamera;
    use crate::codec::tests::jpeg_bytes;
    use futures::executor::block_on;
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::future::{Future, ready};
    use std::rc::Rc;
    use strum::IntoEnumIterator;

    const LIMITS: Dimensions = Dimensions {
        width: 320,
        height: 240,
    };

    struct StaticPredictor(Result<PredictionResult, PredictError>);

    impl Predictor for StaticPredictor {
        fn predict(
            &self,
            _image: &EncodedImage,
        ) -> impl Future<Output = Result<PredictionResult, PredictError>> {
            ready(self.0.clone())
        }
    }

    #[derive(Default)]
    struct MemorySink(Vec<Artifact>);

    impl ArtifactSink for MemorySink {
        fn save(&mut self, artifact: &Artifact) -> Result<(), ExportError> {
            self.0.push(artifact.clone());
            Ok(())
        }
    }

    struct FailingSink;

    impl ArtifactSink for FailingSink {
        fn save(&mut self, artifact: &Artifact) -> Result<(), ExportError> {
            Err(ExportError::Save {
                file_name: artifact.file_name.clone(),
                reason: "disk full".into(),
            })
        }
    }

    fn benign() -> PredictionResult {
        PredictionResult {
            class_name: "benign".into(),
            confidence_score: 92.5,
        }
    }

    fn ok() -> StaticPredictor {
        StaticPredictor(Ok(benign()))
    }

    fn server_error() -> StaticPredictor {
        StaticPredictor(Err(PredictError::Service {
            status: 500,
            body: "internal error".into(),
        }))
    }

    fn upload() -> RawUpload {
        RawUpload::new(
            Some("arm.jpg".into()),
            Some("image/jpeg".into()),
            jpeg_bytes(1000, 500),
        )
    }

    fn frame() -> EncodedImage {
        EncodedImage::new("image/jpeg", jpeg_bytes(64, 48))
    }

    fn fixture() -> (Session<FakeCamera>, Rc<Cell<i32>>) {
        (Session::new(), Rc::new(Cell::new(0)))
    }

    #[test]
    fn camera_can_be_started_and_stopped() {
        let (mut session, held) = fixture();

        session.start_camera(FakeCamera::open(&held, None)).unwrap();
        assert_eq!(session.state(), SessionState::CameraActive);
        assert!(session.camera().is_some());
        assert_eq!(held.get(), 1);

        session.stop_camera().unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.camera().is_none());
        assert_eq!(held.get(), 0);
    }

    #[test]
    fn capture_releases_camera_and_predicts() {
        let (mut session, held) = fixture();
        session
            .start_camera(FakeCamera::open(&held, Some(frame())))
            .unwrap();

        let result = block_on(session.capture(&ok())).unwrap().clone();

        assert_eq!(result, benign());
        assert_eq!(session.state(), SessionState::Predicted);
        assert_eq!(held.get(), 0);
        assert_eq!(session.acquisition().unwrap().source(), Source::Camera);
        assert_eq!(session.acquisition().unwrap().image(), &frame());
    }

    #[test]
    fn upload_download_exports_text() {
        let (mut session, _held) = fixture();
        block_on(session.upload(&upload(), LIMITS, &ok())).unwrap();

        let mut sink = MemorySink::default();
        let artifact = session.download(&mut sink).unwrap();

        assert_eq!(artifact.file_name, "results.txt");
        assert_eq!(
            artifact.bytes,
            b"Prediction: benign\nConfidence Score: 92.5%".to_vec()
        );
        assert_eq!(sink.0, vec![artifact]);
        assert_eq!(session.state(), SessionState::Predicted);
        assert!(!session.is_busy());
    }

    #[test]
    fn uploads_are_resized_before_prediction() {
        let (mut session, _held) = fixture();

        let pending = session.begin_upload(&upload(), LIMITS).unwrap();

        assert_eq!(pending.image.dimensions().unwrap(), Dimensions::new(320, 160));
        assert_eq!(session.state(), SessionState::AwaitingPrediction);
        assert!(session.prediction().is_none());
    }

    #[test]
    fn camera_download_bundles_the_frame() {
        let (mut session, held) = fixture();
        session
            .start_camera(FakeCamera::open(&held, Some(frame())))
            .unwrap();
        block_on(session.capture(&ok())).unwrap();

        let mut sink = MemorySink::default();
        let artifact = session.download(&mut sink).unwrap();

        assert_eq!(artifact.file_name, "results_and_image.zip");
        let mut archive =
            zip::ZipArchive::new(std::io::Cursor::new(artifact.bytes.clone())).unwrap();
        let mut image = Vec::new();
        std::io::Read::read_to_end(&mut archive.by_name("image.jpeg").unwrap(), &mut image)
            .unwrap();
        assert_eq!(image, frame().bytes());
    }

    #[test]
    fn downloads_are_repeatable() {
        let (mut session, _held) = fixture();
        block_on(session.upload(&upload(), LIMITS, &ok())).unwrap();

        let mut sink = MemorySink::default();
        session.download(&mut sink).unwrap();
        session.download(&mut sink).unwrap();

        assert_eq!(sink.0.len(), 2);
        assert_eq!(session.prediction(), Some(&benign()));
    }

    #[test]
    fn failed_save_leaves_session_predicted() {
        let (mut session, _held) = fixture();
        block_on(session.upload(&upload(), LIMITS, &ok())).unwrap();

        let err = session.download(&mut FailingSink).unwrap_err();

        assert!(matches!(err, SessionError::Export(ExportError::Save { .. })));
        assert_eq!(session.state(), SessionState::Predicted);
        assert!(session.allows(Action::Download));
    }

    #[test]
    fn server_error_rolls_back_and_reenables_upload() {
        let (mut session, _held) = fixture();

        let err = block_on(session.upload(&upload(), LIMITS, &server_error())).unwrap_err();

        assert!(matches!(
            err,
            SessionError::Prediction(PredictError::Service { status: 500, .. })
        ));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.prediction().is_none());
        assert!(!session.is_busy());
        assert!(session.allows(Action::Upload));
        assert!(session.allows(Action::StartCamera));
    }

    #[test]
    fn failed_capture_prediction_keeps_frame_but_not_camera() {
        let (mut session, held) = fixture();
        session
            .start_camera(FakeCamera::open(&held, Some(frame())))
            .unwrap();

        assert!(block_on(session.capture(&server_error())).is_err());

        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(held.get(), 0);
        assert!(session.prediction().is_none());
        assert_eq!(session.acquisition().unwrap().source(), Source::Camera);
    }

    #[test]
    fn failed_frame_grab_still_releases_camera() {
        let (mut session, held) = fixture();
        session.start_camera(FakeCamera::open(&held, None)).unwrap();

        let err = session.begin_capture().unwrap_err();

        assert!(matches!(err, SessionError::Acquire(AcquireError::Capture(_))));
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(held.get(), 0);
        assert!(!session.is_busy());
    }

    #[test]
    fn retake_clears_previous_result() {
        let (mut session, held) = fixture();
        block_on(session.upload(&upload(), LIMITS, &ok())).unwrap();

        session
            .start_camera(FakeCamera::open(&held, Some(frame())))
            .unwrap();

        assert_eq!(session.state(), SessionState::CameraActive);
        assert!(session.prediction().is_none());
        assert!(session.acquisition().is_none());
    }

    #[test]
    fn upload_while_camera_active_releases_it() {
        let (mut session, held) = fixture();
        session.start_camera(FakeCamera::open(&held, None)).unwrap();

        block_on(session.upload(&upload(), LIMITS, &ok())).unwrap();

        assert_eq!(held.get(), 0);
        assert_eq!(session.state(), SessionState::Predicted);
        assert_eq!(session.acquisition().unwrap().source(), Source::Upload);
    }

    #[test]
    fn undecodable_upload_leaves_state_unchanged() {
        let (mut session, _held) = fixture();
        block_on(session.upload(&upload(), LIMITS, &ok())).unwrap();

        let junk = RawUpload::new(None, None, b"plain text".to_vec());
        let err = session.begin_upload(&junk, LIMITS).unwrap_err();

        assert!(matches!(err, SessionError::Codec(_)));
        assert_eq!(session.state(), SessionState::Predicted);
        assert_eq!(session.prediction(), Some(&benign()));
    }

    #[test]
    fn camera_offered_while_busy_is_released() {
        let (mut session, held) = fixture();
        session.begin_upload(&upload(), LIMITS).unwrap();

        let err = session
            .start_camera(FakeCamera::open(&held, None))
            .unwrap_err();

        assert!(matches!(err, SessionError::Busy));
        assert_eq!(held.get(), 0);
        assert_eq!(session.state(), SessionState::AwaitingPrediction);
    }

    #[test]
    fn guarded_camera_is_adopted_as_is() {
        let (mut session, held) = fixture();
        let guard = CameraGuard::new(FakeCamera::open(&held, Some(frame())));

        session.start_camera(guard).unwrap();

        assert_eq!(session.state(), SessionState::CameraActive);
        assert_eq!(held.get(), 1);
        session.stop_camera().unwrap();
        assert_eq!(held.get(), 0);
    }

    #[test]
    fn guarded_camera_never_delivered_is_still_released() {
        let (mut session, held) = fixture();
        let pending: Vec<CameraGuard<FakeCamera>> =
            vec![CameraGuard::new(FakeCamera::open(&held, None))];
        assert_eq!(held.get(), 1);

        // The component went away before the stream arrived.
        session.reset();
        drop(pending);

        assert_eq!(held.get(), 0);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn released_guard_cannot_start_the_camera() {
        let (mut session, held) = fixture();
        let mut guard = CameraGuard::new(FakeCamera::open(&held, None));
        guard.release();

        let err = session.start_camera(guard).unwrap_err();

        assert!(matches!(
            err,
            SessionError::Acquire(AcquireError::DeviceUnavailable(_))
        ));
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(held.get(), 0);
    }

    #[test]
    fn nothing_is_allowed_while_a_prediction_is_in_flight() {
        let (mut session, _held) = fixture();
        session.begin_upload(&upload(), LIMITS).unwrap();

        for action in Action::iter() {
            assert!(!session.allows(action), "{action} allowed while busy");
        }
        assert!(matches!(
            session.begin_upload(&upload(), LIMITS),
            Err(SessionError::Busy)
        ));
    }

    #[test]
    fn invalid_transitions_are_rejected() {
        let (mut session, _held) = fixture();

        let err = session.begin_capture().unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidTransition {
                action: Action::Capture,
                state: SessionState::Idle
            }
        ));
        assert_eq!(err.to_string(), "cannot capture while idle");
        assert!(matches!(
            session.stop_camera(),
            Err(SessionError::InvalidTransition { .. })
        ));
        assert!(matches!(
            session.begin_export(),
            Err(SessionError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn results_after_reset_are_stale() {
        let (mut session, _held) = fixture();
        let pending = session.begin_upload(&upload(), LIMITS).unwrap();

        session.reset();
        let err = session
            .complete_prediction(pending.ticket, Ok(benign()))
            .unwrap_err();

        assert!(matches!(err, SessionError::StaleResult(_)));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.prediction().is_none());
        assert!(session.acquisition().is_none());
    }

    #[test]
    fn dropping_the_session_releases_the_camera() {
        let (mut session, held) = fixture();
        session.start_camera(FakeCamera::open(&held, None)).unwrap();

        drop(session);

        assert_eq!(held.get(), 0);
    }

    #[derive(Debug, Clone, Copy)]
    enum Event {
        StartCamera,
        StopCamera,
        Capture { frame_ok: bool, predict_ok: bool },
        Upload { predict_ok: bool },
        BeginUpload,
        Resolve { predict_ok: bool },
        Download,
        Reset,
    }

    fn event() -> impl Strategy<Value = Event> {
        prop_oneof![
            Just(Event::StartCamera),
            Just(Event::StopCamera),
            (any::<bool>(), any::<bool>()).prop_map(|(frame_ok, predict_ok)| Event::Capture {
                frame_ok,
                predict_ok
            }),
            any::<bool>().prop_map(|predict_ok| Event::Upload { predict_ok }),
            Just(Event::BeginUpload),
            any::<bool>().prop_map(|predict_ok| Event::Resolve { predict_ok }),
            Just(Event::Download),
            Just(Event::Reset),
        ]
    }

    fn predictor(predict_ok: bool) -> StaticPredictor {
        if predict_ok { ok() } else { server_error() }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn invariants_hold_for_any_event_sequence(events in prop::collection::vec(event(), 1..24)) {
            let (mut session, held) = fixture();
            let small = RawUpload::new(None, Some("image/jpeg".into()), jpeg_bytes(16, 8));
            let mut pending: Option<u64> = None;

            for event in events {
                // Rejected events are fine; only the invariants matter here.
                match event {
                    Event::StartCamera => {
                        let _ = session.start_camera(FakeCamera::open(&held, Some(frame())));
                    }
                    Event::StopCamera => {
                        let _ = session.stop_camera();
                    }
                    Event::Capture { frame_ok, predict_ok } => {
                        if frame_ok {
                            let _ = block_on(session.capture(&predictor(predict_ok)));
                        } else if session.allows(Action::Capture) {
                            session.reset();
                            let _ = session.start_camera(FakeCamera::open(&held, None));
                            let _ = session.begin_capture();
                        }
                    }
                    Event::Upload { predict_ok } => {
                        let _ = block_on(session.upload(&small, LIMITS, &predictor(predict_ok)));
                    }
                    Event::BeginUpload => {
                        if let Ok(started) = session.begin_upload(&small, LIMITS) {
                            pending = Some(started.ticket);
                        }
                    }
                    Event::Resolve { predict_ok } => {
                        if let Some(ticket) = pending.take() {
                            let _ = session.complete_prediction(ticket, predictor(predict_ok).0.clone());
                        }
                    }
                    Event::Download => {
                        let _ = session.download(&mut MemorySink::default());
                    }
                    Event::Reset => session.reset(),
                }

                let camera_active = session.state() == SessionState::CameraActive;
                prop_assert!(held.get() == 0 || held.get() == 1);
                prop_assert_eq!(held.get() == 1, camera_active);
                prop_assert_eq!(session.prediction().is_some(), session.state() == SessionState::Predicted);
                prop_assert_eq!(session.is_busy(), session.state() == SessionState::AwaitingPrediction);
            }

            drop(session);
            prop_assert_eq!(held.get(), 0);
        }
    }
}
