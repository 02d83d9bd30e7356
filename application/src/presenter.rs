//! [`Terminal`] presenter definitions.

use service::workflow::capture::{Alert, Presenter, State};
use tracing as log;

/// [`Presenter`] printing alerts to the standard output.
#[derive(Clone, Copy, Debug, Default)]
pub struct Terminal;

impl Presenter for Terminal {
    fn transitioned(&self, state: State) {
        log::info!("capture is {state}");
    }

    fn alert(&self, alert: &Alert) {
        match alert {
            Alert::Recorded { .. } | Alert::DayCompleted => println!("{alert}"),
            Alert::PermissionRequired(_)
            | Alert::NotVerified { .. }
            | Alert::Failed { .. } => eprintln!("{alert}"),
        }
    }
}
