//! HTTP [`Backend`] implementation.

use std::{convert::Infallible, time::Duration};

use common::{
    operations::{By, Perform, Select, Submit},
    Handler,
};
use reqwest::{multipart, RequestBuilder, StatusCode};
use secrecy::ExposeSecret as _;
use serde::{de::DeserializeOwned, de::IgnoredAny, Deserialize, Serialize};
use smart_default::SmartDefault;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        attendance::{self, CaptureRequest, Period, Stats},
        leave,
        session::Token,
        Profile, Record, Session, User,
    },
    infra::{
        backend::{
            Authenticate, Authorized, Error, Revoke, SessionExpired,
        },
        Backend,
    },
};

/// [`Http`] backend configuration.
#[derive(Clone, Debug, SmartDefault)]
pub struct Config {
    /// Base URL all the endpoint paths are appended to.
    #[default("http://localhost:8080/api".into())]
    pub base_url: String,

    /// Timeout of a single request.
    ///
    /// No timeout is applied if [`None`].
    pub timeout: Option<Duration>,
}

/// [`Backend`] talking to a remote REST API.
///
/// Rejections of a [`Token`] are reported to the notifier `N` before the
/// failed call returns.
#[derive(Clone, Debug)]
pub struct Http<N> {
    /// HTTP client performing requests.
    client: reqwest::Client,

    /// Base URL without a trailing slash.
    base_url: String,

    /// Notifier [`Perform`]ing [`SessionExpired`].
    notifier: N,
}

impl<N> Http<N> {
    /// Creates a new [`Http`] backend.
    ///
    /// # Errors
    ///
    /// If the [`Config::base_url`] is not an HTTP(S) URL, or the HTTP client
    /// cannot be initialized.
    pub fn new(conf: &Config, notifier: N) -> Result<Self, Traced<Error>> {
        let url = reqwest::Url::parse(&conf.base_url)
            .map_err(|e| tracerr::new!(Error::InvalidBaseUrl(e.to_string())))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(tracerr::new!(Error::InvalidBaseUrl(format!(
                "unsupported scheme `{}`",
                url.scheme(),
            ))));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = conf.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(tracerr::from_and_wrap!(=> Error))?;

        Ok(Self {
            client,
            base_url: conf.base_url.trim_end_matches('/').to_owned(),
            notifier,
        })
    }

    /// Returns the full URL of the provided endpoint `path`.
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl<N> Http<N>
where
    N: Handler<Perform<SessionExpired>, Ok = (), Err = Infallible>,
{
    /// Sends the provided request authorized by the provided [`Token`], and
    /// decodes its response body.
    ///
    /// An empty body is decoded as `null`.
    async fn fetch<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        token: &Token,
    ) -> Result<T, Traced<Error>> {
        let resp = req
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            log::warn!("`{}` rejected the session token", resp.url().path());
            self.notifier
                .execute(Perform(SessionExpired))
                .await
                .unwrap_or_else(|e| match e {});
            return Err(tracerr::new!(Error::Unauthorized));
        }

        decode(resp).await.map_err(tracerr::wrap!())
    }
}

/// Checks the status of the provided response and decodes its body.
async fn decode<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, Traced<Error>> {
    let status = resp.status();
    if !status.is_success() {
        log::debug!("`{}` responded with {status}", resp.url().path());
        return Err(tracerr::new!(Error::Status(status.as_u16())));
    }

    let body = resp
        .bytes()
        .await
        .map_err(tracerr::from_and_wrap!(=> Error))?;
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        &body
    };
    serde_json::from_slice(body).map_err(tracerr::from_and_wrap!(=> Error))
}

/// Body of a sign in request.
#[derive(Serialize)]
struct Credentials<'a> {
    /// Username to sign in with.
    username: &'a str,

    /// Password to sign in with.
    password: &'a str,
}

/// Body of a successful sign in response.
#[derive(Deserialize)]
struct SignedIn {
    /// Issued [`Token`].
    token: Token,

    /// Authenticated [`User`].
    #[serde(flatten)]
    user: User,
}

impl<N> Backend<Perform<Authenticate>> for Http<N> {
    type Ok = Session;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Perform(auth): Perform<Authenticate>,
    ) -> Result<Self::Ok, Self::Err> {
        let resp = self
            .client
            .post(self.url("/auth/login"))
            .json(&Credentials {
                username: auth.username.as_ref(),
                password: auth.password.expose_secret().as_str(),
            })
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;

        if matches!(resp.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        {
            return Err(tracerr::new!(Error::WrongCredentials));
        }

        let SignedIn { token, user } =
            decode(resp).await.map_err(tracerr::wrap!())?;
        Ok(Session { token, user })
    }
}

impl<N> Backend<Perform<Authorized<Revoke>>> for Http<N>
where
    N: Handler<Perform<SessionExpired>, Ok = (), Err = Infallible>,
{
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Perform(auth): Perform<Authorized<Revoke>>,
    ) -> Result<Self::Ok, Self::Err> {
        let _: IgnoredAny = self
            .fetch(self.client.post(self.url("/auth/logout")), &auth.token)
            .await
            .map_err(tracerr::wrap!())?;
        Ok(())
    }
}

impl<N> Backend<Select<By<Option<Record>, Authorized>>> for Http<N>
where
    N: Handler<Perform<SessionExpired>, Ok = (), Err = Infallible>,
{
    type Ok = Option<Record>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Record>, Authorized>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.fetch(
            self.client.get(self.url("/attendance/today")),
            &by.into_inner().token,
        )
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<N> Backend<Select<By<Vec<Record>, Authorized<Period>>>> for Http<N>
where
    N: Handler<Perform<SessionExpired>, Ok = (), Err = Infallible>,
{
    type Ok = Vec<Record>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Record>, Authorized<Period>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Authorized {
            token,
            inner: period,
        } = by.into_inner();
        let records: Option<Vec<Record>> = self
            .fetch(
                self.client.get(self.url("/attendance/list")).query(&[
                    ("start", period.start().to_string()),
                    ("end", period.end().to_string()),
                ]),
                &token,
            )
            .await
            .map_err(tracerr::wrap!())?;
        Ok(records.unwrap_or_default())
    }
}

impl<N> Backend<Select<By<Stats, Authorized>>> for Http<N>
where
    N: Handler<Perform<SessionExpired>, Ok = (), Err = Infallible>,
{
    type Ok = Stats;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Stats, Authorized>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.fetch(
            self.client.get(self.url("/attendance/stats")),
            &by.into_inner().token,
        )
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<N> Backend<Select<By<Profile, Authorized>>> for Http<N>
where
    N: Handler<Perform<SessionExpired>, Ok = (), Err = Infallible>,
{
    type Ok = Profile;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Profile, Authorized>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.fetch(
            self.client.get(self.url("/profiles/detail")),
            &by.into_inner().token,
        )
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<N> Backend<Submit<Authorized<CaptureRequest>>> for Http<N>
where
    N: Handler<Perform<SessionExpired>, Ok = (), Err = Infallible>,
{
    type Ok = Record;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Submit(req): Submit<Authorized<CaptureRequest>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Authorized { token, inner: req } = req;

        let path = match req.kind {
            attendance::Kind::ClockIn => "/attendance/clock-in",
            attendance::Kind::ClockOut => "/attendance/clock-out",
        };
        let file = multipart::Part::bytes(req.photo.bytes.clone())
            .file_name(req.photo.file_name.clone())
            .mime_str(req.photo.mime)
            .map_err(tracerr::from_and_wrap!(=> Error))?;
        let form = req
            .fields()
            .into_iter()
            .fold(multipart::Form::new(), |form, (name, value)| {
                form.text(name, value)
            })
            .part("file", file);

        log::debug!(
            "submitting {} at {} ({}, {} bytes)",
            req.kind,
            req.coordinates,
            req.photo.file_name,
            req.photo.bytes.len(),
        );
        self.fetch(self.client.post(self.url(path)).multipart(form), &token)
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<N> Backend<Submit<Authorized<leave::Request>>> for Http<N>
where
    N: Handler<Perform<SessionExpired>, Ok = (), Err = Infallible>,
{
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Submit(req): Submit<Authorized<leave::Request>>,
    ) -> Result<Self::Ok, Self::Err> {
        let _: IgnoredAny = self
            .fetch(
                self.client.post(self.url("/leave/requests")).json(&req.inner),
                &req.token,
            )
            .await
            .map_err(tracerr::wrap!())?;
        Ok(())
    }
}

#[cfg(test)]
mod spec {
    use std::{
        convert::Infallible,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc, Mutex,
        },
    };

    use axum::{
        extract::{Multipart, Query},
        http::{HeaderMap, StatusCode},
        response::IntoResponse,
        routing::{get, post},
        Json, Router,
    };
    use common::{
        operations::{By, Perform, Select, Submit},
        Coordinates, Handler,
    };
    use secrecy::SecretBox;
    use serde_json::{json, Value};

    use super::{Config, Http};
    use crate::{
        domain::{
            attendance::{CaptureRequest, Kind, Period, Photo, Stats},
            session::Token,
            user::Password,
            Profile, Record,
        },
        infra::backend::{
            Authenticate, Authorized, Error, Revoke, SessionExpired,
        },
    };

    /// Notifier counting [`SessionExpired`] notifications.
    #[derive(Clone, Debug, Default)]
    struct Counter(Arc<AtomicUsize>);

    impl Counter {
        fn count(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    impl Handler<Perform<SessionExpired>> for Counter {
        type Ok = ();
        type Err = Infallible;

        async fn execute(
            &self,
            _: Perform<SessionExpired>,
        ) -> Result<Self::Ok, Self::Err> {
            _ = self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        drop(tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        }));
        format!("http://{addr}/api/")
    }

    async fn backend(router: Router) -> (Http<Counter>, Counter) {
        let counter = Counter::default();
        let conf = Config {
            base_url: serve(router).await,
            timeout: None,
        };
        (Http::new(&conf, counter.clone()).unwrap(), counter)
    }

    fn authorized<T>(inner: T) -> Authorized<T> {
        Authorized::new(Token::new("mock-jwt-token").unwrap(), inner)
    }

    fn bearer(headers: &HeaderMap) -> Option<&str> {
        headers.get("authorization")?.to_str().ok()
    }

    fn credentials(username: &str, password: &str) -> Authenticate {
        Authenticate {
            username: username.parse().unwrap(),
            password: SecretBox::new(Box::new(
                Password::new(password).unwrap(),
            )),
        }
    }

    #[test]
    fn rejects_invalid_base_url() {
        for url in ["", "not a url", "ftp://localhost/api"] {
            let conf = Config {
                base_url: url.into(),
                timeout: None,
            };
            assert!(Http::new(&conf, Counter::default()).is_err(), "{url}");
        }
    }

    #[tokio::test]
    async fn signs_in() {
        let router = Router::new().route(
            "/api/auth/login",
            post(|Json(body): Json<Value>| async move {
                if body == json!({"username": "superadmin", "password": "aA@123"})
                {
                    Json(json!({
                        "token": "mock-jwt-token",
                        "name": "Akhmad Maariz",
                        "username": "superadmin",
                    }))
                    .into_response()
                } else {
                    StatusCode::UNAUTHORIZED.into_response()
                }
            }),
        );
        let (http, counter) = backend(router).await;

        let session = http
            .execute(Perform(credentials("superadmin", "aA@123")))
            .await
            .unwrap();
        assert_eq!(session.token.expose(), "mock-jwt-token");
        assert_eq!(session.user.name.as_ref(), "Akhmad Maariz");

        let err = http
            .execute(Perform(credentials("superadmin", "wrong")))
            .await
            .unwrap_err();
        assert!(matches!(err.into_inner(), Error::WrongCredentials));
        assert_eq!(counter.count(), 0);
    }

    #[tokio::test]
    async fn reads_today_record() {
        let router = Router::new().route(
            "/api/attendance/today",
            get(|headers: HeaderMap| async move {
                if bearer(&headers) == Some("Bearer mock-jwt-token") {
                    Json(json!({
                        "id": "a1",
                        "date": "2023-11-23",
                        "checkInTime": "2023-11-23T00:58:00",
                        "status": "VERIFIED",
                    }))
                    .into_response()
                } else {
                    StatusCode::UNAUTHORIZED.into_response()
                }
            }),
        );
        let (http, _) = backend(router).await;

        let record = http
            .execute(Select(By::<Option<Record>, _>::new(authorized(()))))
            .await
            .unwrap();
        let record = record.unwrap();
        assert!(record.is_verified());
        assert!(!record.is_closed());
    }

    #[tokio::test]
    async fn reads_missing_today_record() {
        let router = Router::new()
            .route("/api/attendance/today", get(|| async { Json(Value::Null) }));
        let (http, _) = backend(router).await;

        let record = http
            .execute(Select(By::<Option<Record>, _>::new(authorized(()))))
            .await
            .unwrap();
        assert!(record.is_none());
    }

    #[tokio::test]
    async fn queries_history_by_period() {
        let router = Router::new().route(
            "/api/attendance/list",
            get(|Query(q): Query<std::collections::HashMap<String, String>>| async move {
                Json(json!([
                    {"id": 1, "date": q["start"]},
                    {"id": 2, "date": q["end"]},
                ]))
            }),
        );
        let (http, _) = backend(router).await;

        let period = Period::new(
            "2023-11-01".parse().unwrap(),
            "2023-11-30".parse().unwrap(),
        )
        .unwrap();
        let records = http
            .execute(Select(By::<Vec<Record>, _>::new(authorized(period))))
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date.to_string(), "2023-11-01");
        assert_eq!(records[1].date.to_string(), "2023-11-30");
    }

    #[tokio::test]
    async fn reads_stats_and_profile() {
        let router = Router::new()
            .route(
                "/api/attendance/stats",
                get(|| async {
                    Json(json!({
                        "daysPresent": 18,
                        "daysAbsent": 2,
                        "monthYear": "November 2023",
                    }))
                }),
            )
            .route(
                "/api/profiles/detail",
                get(|| async {
                    Json(json!({
                        "id": "u1",
                        "name": "Akhmad Maariz",
                        "username": "superadmin",
                        "employeeId": "EMP-001",
                        "jobPosition": "Security",
                    }))
                }),
            );
        let (http, _) = backend(router).await;

        let stats = http
            .execute(Select(By::<Stats, _>::new(authorized(()))))
            .await
            .unwrap();
        assert_eq!(stats.days_present, 18);
        assert_eq!(stats.month_year, "November 2023");

        let profile = http
            .execute(Select(By::<Profile, _>::new(authorized(()))))
            .await
            .unwrap();
        assert_eq!(profile.employee_id, "EMP-001");
        assert_eq!(profile.department, "");
    }

    #[tokio::test]
    async fn uploads_capture_as_multipart() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let router = Router::new().route(
            "/api/attendance/clock-out",
            post({
                let seen = Arc::clone(&seen);
                move |mut form: Multipart| {
                    let seen = Arc::clone(&seen);
                    async move {
                        while let Some(field) = form.next_field().await.unwrap() {
                            let name = field.name().unwrap_or_default().to_owned();
                            let meta = format!(
                                "{:?}|{:?}",
                                field.file_name(),
                                field.content_type(),
                            );
                            let data = field.bytes().await.unwrap();
                            seen.lock().unwrap().push((name, meta, data.to_vec()));
                        }
                        Json(json!({
                            "id": "a1",
                            "date": "2023-11-23",
                            "checkInTime": "2023-11-23T00:58:00Z",
                            "checkOutTime": "2023-11-23T10:01:00Z",
                            "status": "VERIFIED",
                        }))
                    }
                }
            }),
        );
        let (http, _) = backend(router).await;

        let req = CaptureRequest {
            kind: Kind::ClockOut,
            coordinates: Coordinates::new(-6.2, 106.816_666_6).unwrap(),
            photo: Photo::from_uri("file:///cache/IMG_01.png", vec![1, 2, 3]),
        };
        let record = http.execute(Submit(authorized(req))).await.unwrap();
        assert!(record.is_closed());

        let seen = seen.lock().unwrap().clone();
        assert_eq!(
            seen,
            [
                ("latitude".to_owned(), "None|None".to_owned(), b"-6.200000".to_vec()),
                ("longitude".to_owned(), "None|None".to_owned(), b"106.816667".to_vec()),
                (
                    "file".to_owned(),
                    r#"Some("IMG_01.png")|Some("image/png")"#.to_owned(),
                    vec![1, 2, 3],
                ),
            ],
        );
    }

    #[tokio::test]
    async fn notifies_once_on_rejected_token() {
        let router = Router::new()
            .route(
                "/api/attendance/stats",
                get(|| async { StatusCode::UNAUTHORIZED }),
            )
            .route(
                "/api/auth/logout",
                post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
            );
        let (http, counter) = backend(router).await;

        let err = http
            .execute(Select(By::<Stats, _>::new(authorized(()))))
            .await
            .unwrap_err();
        assert!(matches!(err.into_inner(), Error::Unauthorized));
        assert_eq!(counter.count(), 1);

        let err = http
            .execute(Perform(authorized(Revoke)))
            .await
            .unwrap_err();
        assert!(matches!(err.into_inner(), Error::Status(500)));
        assert_eq!(counter.count(), 1);
    }

    #[tokio::test]
    async fn reports_malformed_payload() {
        let router = Router::new().route(
            "/api/profiles/detail",
            get(|| async { "<html>oops</html>" }),
        );
        let (http, counter) = backend(router).await;

        let err = http
            .execute(Select(By::<Profile, _>::new(authorized(()))))
            .await
            .unwrap_err();
        assert!(matches!(err.into_inner(), Error::Decode(_)));
        assert_eq!(counter.count(), 0);
    }
}
