//! [`Capture`] workflow of attendance events.

use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, PoisonError,
    },
};

use common::{
    define_kind,
    operations::{By, Perform, Select},
    Coordinates, DateTime, Time,
};
use derive_more::{Display, Error as StdError, From};
use time::{macros::offset, UtcOffset};
use tracerr::Traced;
use tracing as log;

use crate::{
    command::{capture_attendance, CaptureAttendance, Command},
    domain::{
        attendance::{CaptureRequest, Kind, Photo},
        Record,
    },
    infra::{
        device::{
            self, Accuracy, Facing, Permission, Quality, RequestPermission,
            TakePhoto,
        },
        Device,
    },
    query::{self, attendance::Today, Query},
};

/// [`Capture`] workflow configuration.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// [`Quality`] of the captured photos.
    pub photo_quality: Quality,

    /// Offset the recorded times are presented at.
    pub display_offset: UtcOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            photo_quality: Quality::default(),
            display_offset: offset!(+7),
        }
    }
}

define_kind! {
    #[doc = "State of a [`Capture`] workflow."]
    enum State {
        #[doc = "Waiting for an attempt to be started."]
        Scanning = "scanning",

        #[doc = "Attempt is in progress."]
        Verifying = "verifying",

        #[doc = "Last attempt is verified."]
        Success = "success",

        #[doc = "Last attempt failed."]
        Failed = "failed",
    }
}

/// Front-end presenting the progress of a [`Capture`] workflow to the user.
pub trait Presenter {
    /// Presents the new [`State`] of the workflow.
    fn transitioned(&self, state: State);

    /// Presents the provided [`Alert`] to the user.
    fn alert(&self, alert: &Alert);
}

impl<P: Presenter + ?Sized> Presenter for &P {
    fn transitioned(&self, state: State) {
        (**self).transitioned(state);
    }

    fn alert(&self, alert: &Alert) {
        (**self).alert(alert);
    }
}

impl<P: Presenter + ?Sized> Presenter for Arc<P> {
    fn transitioned(&self, state: State) {
        (**self).transitioned(state);
    }

    fn alert(&self, alert: &Alert) {
        (**self).alert(alert);
    }
}

/// Message of a [`Capture`] workflow to the user.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum Alert {
    /// [`Permission`] is required to record attendance.
    #[display("Permission required: {_0} access is needed to record attendance")]
    PermissionRequired(Permission),

    /// Event is recorded and verified.
    #[display("{} recorded at {time}", Label(*kind))]
    Recorded {
        /// [`Kind`] of the recorded event.
        kind: Kind,

        /// [`Time`] the event is recorded at.
        time: Time,
    },

    /// Event is not verified.
    #[display(
        "Verification failed: {}",
        status.as_deref().unwrap_or("unknown status")
    )]
    NotVerified {
        /// Raw status reported by the backend.
        status: Option<String>,
    },

    /// Attempt failed.
    #[display("Failed to record attendance: {message}")]
    Failed {
        /// Description of the failure.
        message: String,
    },

    /// Both events of today are already recorded.
    #[display("Attendance for today is already completed")]
    DayCompleted,
}

/// Human-readable label of a [`Kind`].
struct Label(Kind);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self.0 {
            Kind::ClockIn => "Clock in",
            Kind::ClockOut => "Clock out",
        })
    }
}

/// Outcome of a [`Capture::capture()`] call.
#[derive(Clone, Debug)]
pub enum Outcome {
    /// Another attempt is in progress, so nothing has been done.
    Busy,

    /// Event is recorded and verified.
    Recorded(Record),

    /// User denied a required [`Permission`].
    PermissionDenied(Permission),

    /// Event is submitted, but not verified.
    Rejected {
        /// Raw status reported by the backend.
        status: Option<String>,
    },

    /// Attempt failed.
    Failed {
        /// Description of the failure.
        message: String,
    },
}

/// Status of today's attendance.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Day {
    /// More events may be recorded today.
    Open,

    /// Both events of today are recorded.
    Completed,
}

/// Workflow capturing a photo and a location of the employee and recording
/// them as an attendance event.
///
/// Only one attempt may be in progress at a time.
#[derive(Debug)]
pub struct Capture<Svc, Dv, P> {
    /// Configuration of this [`Capture`].
    config: Config,

    /// [`Service`] recording the events.
    ///
    /// [`Service`]: crate::Service
    service: Svc,

    /// [`Device`] capturing photos and locations.
    device: Dv,

    /// [`Presenter`] of this [`Capture`].
    presenter: P,

    /// Current [`State`].
    state: Mutex<State>,

    /// Indicator whether an attempt is in progress.
    processing: AtomicBool,
}

impl<Svc, Dv, P: Presenter> Capture<Svc, Dv, P> {
    /// Creates a new [`Capture`] workflow in the [`State::Scanning`].
    #[must_use]
    pub fn new(config: Config, service: Svc, device: Dv, presenter: P) -> Self {
        Self {
            config,
            service,
            device,
            presenter,
            state: Mutex::new(State::Scanning),
            processing: AtomicBool::new(false),
        }
    }

    /// Returns the current [`State`] of this [`Capture`].
    #[must_use]
    pub fn state(&self) -> State {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Indicates whether an attempt is in progress.
    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Moves this [`Capture`] into the provided [`State`] and presents it.
    fn transition(&self, state: State) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
        log::debug!("capture {state}");
        self.presenter.transitioned(state);
    }
}

impl<Svc, Dv, P> Capture<Svc, Dv, P>
where
    Svc: Query<Today, Ok = Option<Record>, Err = Traced<query::ExecutionError>>,
    P: Presenter,
{
    /// Checks whether more events may be recorded today.
    ///
    /// Failures of the check are logged and considered as [`Day::Open`], so
    /// the [`Backend`] decides on its own.
    ///
    /// [`Backend`]: crate::infra::Backend
    pub async fn ensure_day_open(&self) -> Day {
        match self.service.execute(Today::new()).await {
            Ok(Some(record)) if record.is_closed() => {
                self.presenter.alert(&Alert::DayCompleted);
                Day::Completed
            }
            Ok(Some(_) | None) => Day::Open,
            Err(e) => {
                log::warn!("failed to check today's attendance: {e}");
                Day::Open
            }
        }
    }
}

impl<Svc, Dv, P> Capture<Svc, Dv, P>
where
    Svc: Command<
        CaptureAttendance,
        Ok = Record,
        Err = Traced<capture_attendance::ExecutionError>,
    >,
    Dv: Device<
            Select<By<bool, Permission>>,
            Ok = bool,
            Err = Traced<device::Error>,
        > + Device<
            Perform<RequestPermission>,
            Ok = bool,
            Err = Traced<device::Error>,
        > + Device<
            Select<By<Coordinates, Accuracy>>,
            Ok = Coordinates,
            Err = Traced<device::Error>,
        > + Device<Perform<TakePhoto>, Ok = Photo, Err = Traced<device::Error>>,
    P: Presenter,
{
    /// Captures an attendance event of the provided [`Kind`].
    ///
    /// Never fails: every failure is presented and reported as an
    /// [`Outcome`]. Returns [`Outcome::Busy`] without doing anything if
    /// another attempt is in progress.
    pub async fn capture(&self, kind: Kind) -> Outcome {
        let Some(_processing) = Processing::acquire(&self.processing) else {
            log::debug!("{kind} ignored: another attempt is in progress");
            return Outcome::Busy;
        };

        self.transition(State::Verifying);
        match self.attempt(kind).await {
            Ok(record) => {
                let time = record
                    .recorded_at(kind)
                    .unwrap_or_else(DateTime::now)
                    .time_at(self.config.display_offset);
                self.transition(State::Success);
                self.presenter.alert(&Alert::Recorded { kind, time });
                Outcome::Recorded(record)
            }
            Err(e) => {
                log::warn!("{kind} failed: {e}");

                let (alert, outcome) = match e.into_inner() {
                    Error::PermissionDenied(p) => {
                        (Alert::PermissionRequired(p), Outcome::PermissionDenied(p))
                    }
                    Error::Capture(
                        capture_attendance::ExecutionError::NotVerified(e),
                    ) => (
                        Alert::NotVerified {
                            status: e.status.clone(),
                        },
                        Outcome::Rejected { status: e.status },
                    ),
                    e @ (Error::Device(_) | Error::Capture(_)) => {
                        let message = e.to_string();
                        (
                            Alert::Failed {
                                message: message.clone(),
                            },
                            Outcome::Failed { message },
                        )
                    }
                };

                self.transition(State::Failed);
                self.presenter.alert(&alert);
                self.transition(State::Scanning);
                outcome
            }
        }
    }

    /// Performs a single attempt of recording an event of the provided
    /// [`Kind`].
    async fn attempt(&self, kind: Kind) -> Result<Record, Traced<Error>> {
        for permission in [Permission::Camera, Permission::Location] {
            self.ensure_permission(permission)
                .await
                .map_err(tracerr::wrap!())?;
        }

        let coordinates = self
            .device
            .execute(Select(By::<Coordinates, _>::new(Accuracy::High)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> Error))?;
        let photo = self
            .device
            .execute(Perform(TakePhoto {
                facing: Facing::Front,
                quality: self.config.photo_quality,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> Error))?;

        self.service
            .execute(CaptureAttendance(CaptureRequest {
                kind,
                coordinates,
                photo,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> Error))
    }

    /// Ensures the provided [`Permission`] is granted, requesting it from the
    /// user if necessary.
    async fn ensure_permission(
        &self,
        permission: Permission,
    ) -> Result<(), Traced<Error>> {
        let granted = self
            .device
            .execute(Select(By::<bool, _>::new(permission)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> Error))?;
        if granted {
            return Ok(());
        }

        log::debug!("requesting {permission} permission");
        let granted = self
            .device
            .execute(Perform(RequestPermission(permission)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> Error))?;
        if granted {
            Ok(())
        } else {
            Err(tracerr::new!(Error::PermissionDenied(permission)))
        }
    }
}

/// Guard of an attempt being in progress.
struct Processing<'a>(&'a AtomicBool);

impl<'a> Processing<'a> {
    /// Marks an attempt as in progress, unless another one already is.
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for Processing<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Error of a single [`Capture`] attempt.
#[derive(Debug, Display, From, StdError)]
enum Error {
    /// User denied the [`Permission`].
    #[display("{_0} permission is denied")]
    #[from(ignore)]
    PermissionDenied(#[error(not(source))] Permission),

    /// [`Device`] error.
    #[display("{_0}")]
    Device(device::Error),

    /// [`CaptureAttendance`] error.
    #[display("{_0}")]
    Capture(capture_attendance::ExecutionError),
}

#[cfg(test)]
mod spec {
    use std::{
        cell::RefCell,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
    };

    use common::{
        operations::{By, Perform, Select, Submit},
        Coordinates, Handler, Time,
    };
    use tokio::sync::Notify;
    use tracerr::Traced;

    use super::{Alert, Capture, Config, Day, Outcome, Presenter, State};
    use crate::{
        domain::{
            attendance::{CaptureRequest, Kind, Photo},
            session::Token,
            Record, Session, User,
        },
        infra::{
            backend::{self, Authorized},
            device::{
                self, Accuracy, Permission, RequestPermission, TakePhoto,
            },
            store::Memory,
        },
        session::Manager,
        Service,
    };

    /// Backend answering with a configured [`Record`].
    #[derive(Clone, Debug, Default)]
    struct FakeBackend {
        /// Status of the submitted [`Record`]s, or [`None`] to fail.
        status: Option<&'static str>,

        /// Record of today.
        today: Option<Record>,

        /// Number of submissions.
        submits: Arc<AtomicUsize>,

        /// Gate holding submissions until notified.
        gate: Option<Arc<Notify>>,
    }

    impl Handler<Submit<Authorized<CaptureRequest>>> for FakeBackend {
        type Ok = Record;
        type Err = Traced<backend::Error>;

        async fn execute(
            &self,
            Submit(req): Submit<Authorized<CaptureRequest>>,
        ) -> Result<Self::Ok, Self::Err> {
            _ = self.submits.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            let Some(status) = self.status else {
                return Err(tracerr::new!(backend::Error::Status(500)));
            };
            Ok(record(serde_json::json!({
                "id": "a1",
                "date": "2023-11-23",
                "checkInTime": "2023-11-23T00:58:00",
                "checkOutTime": (req.inner.kind == Kind::ClockOut)
                    .then_some("2023-11-23 10:05:00"),
                "status": status,
            })))
        }
    }

    impl Handler<Select<By<Option<Record>, Authorized>>> for FakeBackend {
        type Ok = Option<Record>;
        type Err = Traced<backend::Error>;

        async fn execute(
            &self,
            _: Select<By<Option<Record>, Authorized>>,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(self.today.clone())
        }
    }

    /// Device with configurable permissions.
    #[derive(Debug, Default)]
    struct FakeDevice {
        /// Granted [`Permission`]s.
        granted: RefCell<Vec<Permission>>,

        /// Indicator whether requested [`Permission`]s are granted.
        grant_on_request: bool,
    }

    impl FakeDevice {
        fn granted() -> Self {
            Self {
                granted: RefCell::new(vec![Permission::Camera, Permission::Location]),
                grant_on_request: false,
            }
        }
    }

    impl Handler<Select<By<bool, Permission>>> for FakeDevice {
        type Ok = bool;
        type Err = Traced<device::Error>;

        async fn execute(
            &self,
            Select(by): Select<By<bool, Permission>>,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(self.granted.borrow().contains(by.inner()))
        }
    }

    impl Handler<Perform<RequestPermission>> for FakeDevice {
        type Ok = bool;
        type Err = Traced<device::Error>;

        async fn execute(
            &self,
            Perform(RequestPermission(p)): Perform<RequestPermission>,
        ) -> Result<Self::Ok, Self::Err> {
            if self.grant_on_request {
                self.granted.borrow_mut().push(p);
            }
            Ok(self.grant_on_request)
        }
    }

    impl Handler<Select<By<Coordinates, Accuracy>>> for FakeDevice {
        type Ok = Coordinates;
        type Err = Traced<device::Error>;

        async fn execute(
            &self,
            _: Select<By<Coordinates, Accuracy>>,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(Coordinates::new(-6.2, 106.816_666_6).unwrap())
        }
    }

    impl Handler<Perform<TakePhoto>> for FakeDevice {
        type Ok = Photo;
        type Err = Traced<device::Error>;

        async fn execute(
            &self,
            Perform(photo): Perform<TakePhoto>,
        ) -> Result<Self::Ok, Self::Err> {
            assert!((photo.quality.get() - 0.5).abs() < f32::EPSILON);
            Ok(Photo::from_uri("file:///cache/selfie.jpg", vec![0xFF, 0xD8]))
        }
    }

    /// Presenter recording everything presented.
    #[derive(Debug, Default)]
    struct Recorder {
        states: RefCell<Vec<State>>,
        alerts: RefCell<Vec<Alert>>,
    }

    impl Presenter for Recorder {
        fn transitioned(&self, state: State) {
            self.states.borrow_mut().push(state);
        }

        fn alert(&self, alert: &Alert) {
            self.alerts.borrow_mut().push(alert.clone());
        }
    }

    fn record(json: serde_json::Value) -> Record {
        serde_json::from_value(json).unwrap()
    }

    async fn service(backend: FakeBackend) -> Service<FakeBackend, Memory> {
        let sessions = Arc::new(Manager::new(Memory::default()));
        sessions
            .persist(Session {
                token: Token::new("mock-jwt-token").unwrap(),
                user: User {
                    name: "Akhmad Maariz".parse().unwrap(),
                    username: "superadmin".parse().unwrap(),
                },
            })
            .await
            .unwrap();
        Service::new(crate::Config::default(), backend, sessions)
    }

    fn verified() -> FakeBackend {
        FakeBackend {
            status: Some("VERIFIED"),
            ..FakeBackend::default()
        }
    }

    #[tokio::test]
    async fn records_verified_clock_in() {
        let svc = service(verified()).await;
        let (device, presenter) = (FakeDevice::granted(), Recorder::default());
        let wf = Capture::new(Config::default(), &svc, &device, &presenter);
        assert_eq!(wf.state(), State::Scanning);

        let outcome = wf.capture(Kind::ClockIn).await;

        assert!(matches!(outcome, Outcome::Recorded(r) if r.is_verified()));
        assert_eq!(wf.state(), State::Success);
        assert!(!wf.is_processing());
        assert_eq!(*presenter.states.borrow(), [State::Verifying, State::Success]);
        assert_eq!(
            *presenter.alerts.borrow(),
            [Alert::Recorded {
                kind: Kind::ClockIn,
                time: Time::from_hm(7, 58).unwrap(),
            }],
        );
    }

    #[tokio::test]
    async fn presents_check_out_time() {
        let svc = service(verified()).await;
        let (device, presenter) = (FakeDevice::granted(), Recorder::default());
        let wf = Capture::new(Config::default(), &svc, &device, &presenter);

        drop(wf.capture(Kind::ClockOut).await);

        assert_eq!(
            *presenter.alerts.borrow(),
            [Alert::Recorded {
                kind: Kind::ClockOut,
                time: Time::from_hm(17, 5).unwrap(),
            }],
        );
        assert_eq!(
            presenter.alerts.borrow()[0].to_string(),
            "Clock out recorded at 17:05",
        );
    }

    #[tokio::test]
    async fn fails_unverified_attempt() {
        let svc = service(FakeBackend {
            status: Some("PENDING"),
            ..FakeBackend::default()
        })
        .await;
        let (device, presenter) = (FakeDevice::granted(), Recorder::default());
        let wf = Capture::new(Config::default(), &svc, &device, &presenter);

        let outcome = wf.capture(Kind::ClockIn).await;

        assert!(matches!(
            outcome,
            Outcome::Rejected { status } if status.as_deref() == Some("PENDING"),
        ));
        assert_eq!(wf.state(), State::Scanning);
        assert_eq!(
            *presenter.states.borrow(),
            [State::Verifying, State::Failed, State::Scanning],
        );
        assert_eq!(
            *presenter.alerts.borrow(),
            [Alert::NotVerified {
                status: Some("PENDING".into()),
            }],
        );
    }

    #[tokio::test]
    async fn fails_on_backend_error() {
        let backend = FakeBackend::default();
        let svc = service(backend.clone()).await;
        let (device, presenter) = (FakeDevice::granted(), Recorder::default());
        let wf = Capture::new(Config::default(), &svc, &device, &presenter);

        let outcome = wf.capture(Kind::ClockIn).await;

        assert!(matches!(outcome, Outcome::Failed { .. }));
        assert_eq!(backend.submits.load(Ordering::SeqCst), 1);
        assert_eq!(wf.state(), State::Scanning);
        assert!(matches!(
            presenter.alerts.borrow().as_slice(),
            [Alert::Failed { message }] if message.contains("500"),
        ));
    }

    #[tokio::test]
    async fn fails_without_session() {
        let backend = verified();
        let svc = Service::new(
            crate::Config::default(),
            backend.clone(),
            Arc::new(Manager::new(Memory::default())),
        );
        let (device, presenter) = (FakeDevice::granted(), Recorder::default());
        let wf = Capture::new(Config::default(), &svc, &device, &presenter);

        let outcome = wf.capture(Kind::ClockIn).await;

        assert!(matches!(outcome, Outcome::Failed { .. }));
        assert_eq!(backend.submits.load(Ordering::SeqCst), 0);
        assert_eq!(wf.state(), State::Scanning);
    }

    #[tokio::test]
    async fn aborts_on_denied_permission() {
        let backend = verified();
        let svc = service(backend.clone()).await;
        let (device, presenter) = (FakeDevice::default(), Recorder::default());
        let wf = Capture::new(Config::default(), &svc, &device, &presenter);

        let outcome = wf.capture(Kind::ClockIn).await;

        assert!(matches!(
            outcome,
            Outcome::PermissionDenied(Permission::Camera),
        ));
        assert_eq!(backend.submits.load(Ordering::SeqCst), 0);
        assert_eq!(
            *presenter.states.borrow(),
            [State::Verifying, State::Failed, State::Scanning],
        );
        assert_eq!(
            *presenter.alerts.borrow(),
            [Alert::PermissionRequired(Permission::Camera)],
        );
    }

    #[tokio::test]
    async fn requests_missing_permissions() {
        let backend = verified();
        let svc = service(backend.clone()).await;
        let device = FakeDevice {
            grant_on_request: true,
            ..FakeDevice::default()
        };
        let presenter = Recorder::default();
        let wf = Capture::new(Config::default(), &svc, &device, &presenter);

        let outcome = wf.capture(Kind::ClockIn).await;

        assert!(matches!(outcome, Outcome::Recorded(_)));
        assert_eq!(
            *device.granted.borrow(),
            [Permission::Camera, Permission::Location],
        );
    }

    #[tokio::test]
    async fn ignores_capture_while_verifying() {
        let gate = Arc::new(Notify::new());
        let backend = FakeBackend {
            gate: Some(Arc::clone(&gate)),
            ..verified()
        };
        let svc = service(backend.clone()).await;
        let (device, presenter) = (FakeDevice::granted(), Recorder::default());
        let wf = Capture::new(Config::default(), &svc, &device, &presenter);

        let (first, second) = futures::join!(wf.capture(Kind::ClockIn), async {
            assert!(wf.is_processing());
            assert_eq!(wf.state(), State::Verifying);
            let outcome = wf.capture(Kind::ClockIn).await;
            gate.notify_one();
            outcome
        });

        assert!(matches!(first, Outcome::Recorded(_)));
        assert!(matches!(second, Outcome::Busy));
        assert_eq!(backend.submits.load(Ordering::SeqCst), 1);
        assert_eq!(*presenter.states.borrow(), [State::Verifying, State::Success]);
        assert!(!wf.is_processing());
    }

    #[tokio::test]
    async fn reports_completed_day() {
        let backend = FakeBackend {
            today: Some(record(serde_json::json!({
                "date": "2023-11-23",
                "checkInTime": "2023-11-23T00:58:00Z",
                "checkOutTime": "2023-11-23T10:05:00Z",
            }))),
            ..verified()
        };
        let svc = service(backend).await;
        let (device, presenter) = (FakeDevice::granted(), Recorder::default());
        let wf = Capture::new(Config::default(), &svc, &device, &presenter);

        assert_eq!(wf.ensure_day_open().await, Day::Completed);
        assert_eq!(*presenter.alerts.borrow(), [Alert::DayCompleted]);
    }

    #[tokio::test]
    async fn reports_open_day() {
        let backend = FakeBackend {
            today: Some(record(serde_json::json!({
                "date": "2023-11-23",
                "checkInTime": "2023-11-23T00:58:00Z",
            }))),
            ..verified()
        };
        let svc = service(backend).await;
        let (device, presenter) = (FakeDevice::granted(), Recorder::default());
        let wf = Capture::new(Config::default(), &svc, &device, &presenter);
        assert_eq!(wf.ensure_day_open().await, Day::Open);

        let svc = Service::new(
            crate::Config::default(),
            verified(),
            Arc::new(Manager::new(Memory::default())),
        );
        let wf = Capture::new(Config::default(), &svc, &device, &presenter);
        assert_eq!(wf.ensure_day_open().await, Day::Open);
        assert!(presenter.alerts.borrow().is_empty());
    }
}
