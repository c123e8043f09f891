// ABOUTME: Image retention engine using the type state pattern.
// ABOUTME: Lists a family of images, keeps the newest K, and deletes the rest.

mod classifier;
mod error;
mod events;
mod executor;
mod lister;
mod policy;
mod post_process;
mod run;
mod state;
mod transitions;

pub use classifier::{Classification, classify};
pub use error::{AuthenticationSnafu, RetentionError, RetentionErrorKind};
pub use events::{NullSink, StatusEvent, StatusSink};
pub use executor::{ExecutionReport, MutationFailure, MutationKind, execute};
pub use lister::list_images;
pub use policy::{FailurePolicy, RetentionPolicy, RetentionSettings, TieBreak};
pub use post_process::{PostProcessOutcome, plan, post_process, post_process_until};
pub use run::RetentionRun;
pub use state::{Classified, Completed, Initialized, Listed};
