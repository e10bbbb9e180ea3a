mod ics;
mod queries;
mod recurrence;
mod types;

pub use ics::build_ics;
pub use queries::*;
pub use recurrence::occurrence_dates;
pub use types::*;
