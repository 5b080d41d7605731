//! Collaborators backed by external tools: `git` for fetching SDK copies and
//! querying the upstream repository, `flutter doctor` for bootstrapping.

mod command;
mod detection;
mod doctor;
mod refs;
mod source;

pub use detection::{GitDetection, detect_git};
pub use doctor::FlutterDoctor;
pub use refs::{parse_checked_out_ref, parse_remote_tags};
pub use source::{FLUTTER_REPOSITORY, GitSource};
