//! Per-tool pipelines for pgmrun
//!
//! Each operation discovers its input files by naming convention and runs the
//! command templates of the detected tool once per file, through a
//! [`ProcessRunner`](pgmrun_runner::ProcessRunner). Batches keep going when a
//! single dataset fails; the outcome of every item is collected in a
//! [`BatchReport`].
//!
//! | Operation | Input | Runs tools |
//! |-----------|-------|------------|
//! | [`Driver::learn`] | `<in>/data/*.train` | yes |
//! | [`Driver::infer`] | `<in>/query/*.q` | yes (libra) |
//! | [`Driver::sample`] | `<in>/*.bif` | yes (libra) |
//! | [`hide`] | `<in>/*.bif` | no |
//! | [`append_latent`] | one data file | no |
//! | [`score`] | `<in>/query/*.infkey` | no |

mod algorithm;
mod append;
mod driver;
mod hide;
mod infer;
mod learn;
mod report;
mod sample;
mod score;

#[cfg(test)]
mod test_support;

pub use algorithm::{Algorithm, LibraMode};
pub use append::append_latent;
pub use driver::{Driver, Tools};
pub use hide::{HideRequest, hide};
pub use infer::InferRequest;
pub use learn::LearnRequest;
pub use report::BatchReport;
pub use sample::SampleRequest;
pub use score::{DEFAULT_SCORE_EXT, ScoreRequest, score};
