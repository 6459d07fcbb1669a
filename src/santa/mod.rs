pub mod types;
pub mod constraints;
pub mod derangement;
pub mod run;

pub use types::{Assignment, ForbiddenIndex};
pub use constraints::build_forbidden_index;
pub use derangement::{build_derangement, MAX_ATTEMPTS};
pub use run::{build_secret_santa, build_secret_santa_csv, generate_to_file, SecretSantaRun};
