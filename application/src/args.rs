//! [`Args`] definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use common::Date;
use service::domain::leave;

/// Terminal client of the employee attendance system.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,

    /// [`Command`] to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

/// Command of the client.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Signs in and remembers the session.
    Login {
        /// Username to sign in with.
        username: String,

        /// Password to sign in with.
        #[arg(long, env = "ATTENDANCE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Signs out and forgets the session.
    Logout,

    /// Shows the signed in employee.
    Whoami,

    /// Shows today's attendance.
    Today,

    /// Shows attendance history, of the current month by default.
    History {
        /// First day to show, inclusive.
        #[arg(long, requires = "end")]
        start: Option<Date>,

        /// Last day to show, inclusive.
        #[arg(long, requires = "start")]
        end: Option<Date>,
    },

    /// Shows attendance statistics of the current month.
    Stats,

    /// Shows employment details.
    Profile,

    /// Records arrival at work.
    ClockIn(Capture),

    /// Records departure from work.
    ClockOut(Capture),

    /// Submits a leave request.
    Leave {
        /// Kind of the leave: `ANNUAL`, `SICK`, `UNPAID` or `OTHER`.
        #[arg(long, default_value = "ANNUAL")]
        kind: leave::Kind,

        /// First day of the leave.
        start: Date,

        /// Last day of the leave.
        end: Date,

        /// Reason of the leave.
        #[arg(long, default_value = "")]
        reason: String,
    },

    /// Lists upcoming company holidays.
    Holidays {
        /// Day to look from, today by default.
        #[arg(long)]
        from: Option<Date>,

        /// Number of holidays to list.
        #[arg(long, default_value_t = 3)]
        limit: usize,
    },
}

/// Inputs of a capture attempt.
#[derive(Clone, Debug, clap::Args)]
pub struct Capture {
    /// Path to the photo of the employee.
    #[arg(long)]
    pub photo: PathBuf,

    /// Latitude of the employee, in degrees.
    #[arg(long, allow_hyphen_values = true, requires = "longitude")]
    pub latitude: Option<f64>,

    /// Longitude of the employee, in degrees.
    #[arg(long, allow_hyphen_values = true, requires = "latitude")]
    pub longitude: Option<f64>,
}
