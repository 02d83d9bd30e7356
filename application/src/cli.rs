//! Execution of the command line [`Command`]s.

use std::fmt;

use common::Coordinates;
use itertools::Itertools as _;
use secrecy::SecretBox;
use service::{
    command::{
        Command as _, CreateSession, DeleteSession, SubmitLeaveRequest,
    },
    domain::{
        attendance::{Kind, Period},
        leave,
        user::{Password, Username},
        Record,
    },
    query::{
        attendance::{History, MonthlyStats, Today},
        holidays::UpcomingHolidays,
        profile,
        session::CurrentSession,
    },
    workflow::capture::{Capture, Day, Outcome},
};
use time::UtcOffset;
use tracing as log;

use crate::{
    args::{self, Command},
    define_error,
    device::Files,
    error::{InputError, SessionError},
    presenter::Terminal,
    AsError as _, Context, Error,
};

/// Runs the provided [`Command`] in the provided [`Context`].
///
/// # Errors
///
/// If the [`Command`] fails.
pub async fn run(ctx: &Context, command: Command) -> Result<(), Error> {
    if !matches!(command, Command::Login { .. } | Command::Holidays { .. }) {
        drop(ctx.restore_session().await?);
    }

    match command {
        Command::Login { username, password } => {
            login(ctx, &username, password).await
        }
        Command::Logout => {
            ctx.service()
                .execute(DeleteSession)
                .await
                .map_err(|e| e.as_error())?;
            println!("Signed out");
            Ok(())
        }
        Command::Whoami => whoami(ctx).await,
        Command::Today => today(ctx).await,
        Command::History { start, end } => {
            let period = match (start, end) {
                (Some(start), Some(end)) => {
                    Period::new(start, end).ok_or(InputError::Period)?
                }
                (None, _) | (_, None) => {
                    Period::month_of(ctx.service().today())
                }
            };
            history(ctx, period).await
        }
        Command::Stats => stats(ctx).await,
        Command::Profile => profile(ctx).await,
        Command::ClockIn(args) => capture(ctx, Kind::ClockIn, args).await,
        Command::ClockOut(args) => capture(ctx, Kind::ClockOut, args).await,
        Command::Leave {
            kind,
            start,
            end,
            reason,
        } => {
            let req = leave::Request::new(kind, start, end, reason)
                .map_err(|e| e.as_error())?;
            let days = req.days();
            ctx.service()
                .execute(SubmitLeaveRequest(req))
                .await
                .map_err(|e| e.as_error())?;
            println!("{kind} leave of {days} day(s) requested");
            Ok(())
        }
        Command::Holidays { from, limit } => {
            let from = from.unwrap_or_else(|| ctx.service().today());
            let holidays = ctx
                .service()
                .execute(UpcomingHolidays { from, limit })
                .await
                .map_err(|e| e.as_error())?;
            if holidays.is_empty() {
                println!("No upcoming holidays");
            }
            for h in holidays {
                println!("{}  {} ({})", h.date, h.name, h.kind);
            }
            Ok(())
        }
    }
}

/// Signs in with the provided credentials.
async fn login(
    ctx: &Context,
    username: &str,
    password: String,
) -> Result<(), Error> {
    let username = Username::new(username).ok_or(InputError::Username)?;
    let password = Password::new(password).ok_or(InputError::Password)?;

    let session = ctx
        .service()
        .execute(CreateSession {
            username,
            password: SecretBox::new(Box::new(password)),
        })
        .await
        .map_err(|e| e.as_error())?;
    println!("Signed in as {} ({})", session.user.name, session.user.username);
    Ok(())
}

/// Prints the signed in employee.
async fn whoami(ctx: &Context) -> Result<(), Error> {
    let session = ctx
        .service()
        .execute(CurrentSession)
        .await
        .map_err(|e| e.as_error())?
        .ok_or(SessionError::NotSignedIn)?;
    println!("{} ({})", session.user.name, session.user.username);
    Ok(())
}

/// Prints today's attendance.
async fn today(ctx: &Context) -> Result<(), Error> {
    let offset = ctx.service().config().utc_offset;
    match ctx
        .service()
        .execute(Today::new())
        .await
        .map_err(|e| e.as_error())?
    {
        Some(record) => println!("{}", Summary(&record, offset)),
        None => println!("No attendance recorded today"),
    }
    Ok(())
}

/// Prints attendance history within the provided [`Period`].
async fn history(ctx: &Context, period: Period) -> Result<(), Error> {
    let offset = ctx.service().config().utc_offset;
    let records = ctx
        .service()
        .execute(History::by(period))
        .await
        .map_err(|e| e.as_error())?;
    log::debug!(
        "{} record(s) within {}..={}",
        records.len(),
        period.start(),
        period.end(),
    );

    if records.is_empty() {
        println!("No attendance records");
    } else {
        println!(
            "{}",
            records.iter().map(|r| Summary(r, offset)).format("\n"),
        );
    }
    Ok(())
}

/// Prints attendance statistics of the current month.
async fn stats(ctx: &Context) -> Result<(), Error> {
    let stats = ctx
        .service()
        .execute(MonthlyStats::new())
        .await
        .map_err(|e| e.as_error())?;
    println!(
        "{}: {} day(s) present, {} day(s) absent",
        stats.month_year, stats.days_present, stats.days_absent,
    );
    Ok(())
}

/// Prints employment details.
async fn profile(ctx: &Context) -> Result<(), Error> {
    let p = ctx
        .service()
        .execute(profile::Current::new())
        .await
        .map_err(|e| e.as_error())?;
    println!(
        "{}",
        [
            ("Name", &p.name),
            ("Username", &p.username),
            ("Employee ID", &p.employee_id),
            ("Position", &p.job_position),
            ("Status", &p.status),
            ("Email", &p.email),
            ("Department", &p.department),
            ("Location", &p.location),
        ]
        .into_iter()
        .filter(|(_, v)| !v.is_empty())
        .format_with("\n", |(k, v), f| f(&format_args!("{k:<12} {v}"))),
    );
    Ok(())
}

/// Captures an attendance event of the provided [`Kind`].
async fn capture(
    ctx: &Context,
    kind: Kind,
    args: args::Capture,
) -> Result<(), Error> {
    define_error! {
        enum CaptureError {
            #[code = "PERMISSION_DENIED"]
            #[exit = 77]
            #[message = "Camera and location are required to record \
                         attendance"]
            PermissionDenied,

            #[code = "NOT_VERIFIED"]
            #[exit = 1]
            #[message = "Attendance is not verified"]
            NotVerified,

            #[code = "CAPTURE_FAILED"]
            #[exit = 1]
            #[message = "Attendance is not recorded"]
            Failed,
        }
    }

    let location = match (args.latitude, args.longitude) {
        (Some(lat), Some(lon)) => Some(
            Coordinates::new(lat, lon).map_err(|_| InputError::Coordinates)?,
        ),
        (None, _) | (_, None) => None,
    };
    let device = Files::new(args.photo, location);
    let workflow = Capture::new(ctx.capture(), ctx.service(), device, Terminal);

    if workflow.ensure_day_open().await == Day::Completed {
        return Ok(());
    }

    match workflow.capture(kind).await {
        Outcome::Recorded(record) => {
            log::debug!("recorded {kind} as `{}`", record.id);
            Ok(())
        }
        Outcome::PermissionDenied(_) => Err(CaptureError::PermissionDenied.into()),
        Outcome::Rejected { .. } => Err(CaptureError::NotVerified.into()),
        Outcome::Busy | Outcome::Failed { .. } => Err(CaptureError::Failed.into()),
    }
}

/// One-line summary of a [`Record`].
struct Summary<'r>(&'r Record, UtcOffset);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self(record, offset) = self;

        write!(f, "{}", record.date)?;
        for (label, kind) in [("in", Kind::ClockIn), ("out", Kind::ClockOut)] {
            match record.recorded_at(kind) {
                Some(at) => write!(f, "  {label} {}", at.time_at(*offset))?,
                None => write!(f, "  {label} --:--")?,
            }
        }
        if let Some(hours) = record.total_hours {
            write!(f, "  {hours:.1}h")?;
        }
        write!(f, "  {}", record.status.as_deref().unwrap_or("-"))
    }
}

#[cfg(test)]
mod spec {
    use service::domain::Record;
    use time::macros::offset;

    use super::Summary;

    #[test]
    fn summarizes_record() {
        let record: Record = serde_json::from_value(serde_json::json!({
            "date": "2023-11-23",
            "checkInTime": "2023-11-23T00:58:00Z",
            "totalHours": 8.5,
            "status": "VERIFIED",
        }))
        .unwrap();

        assert_eq!(
            Summary(&record, offset!(+7)).to_string(),
            "2023-11-23  in 07:58  out --:--  8.5h  VERIFIED",
        );
    }
}
