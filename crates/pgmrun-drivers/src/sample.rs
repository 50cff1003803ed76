use std::path::{Path, PathBuf};

use pgmrun_bif::BifNetwork;
use pgmrun_data::{write_header, write_schema};
use pgmrun_runner::{CommandSpec, ProcessRunner};
use pgmrun_utils::error::DriverError;
use pgmrun_utils::logging::dataset_span;
use pgmrun_utils::paths::{discover_files, ensure_dir_all, file_stem};
use rand::Rng;
use tracing::info;

use crate::BatchReport;
use crate::driver::{Deadline, Driver, tool_seed};

/// Arguments of a `sample` run: how many rows to draw for each split.
#[derive(Debug, Clone)]
pub struct SampleRequest {
    /// Directory holding the `*.bif` networks
    pub input_dir: PathBuf,
    pub train: u64,
    pub test: u64,
    pub valid: u64,
}

impl SampleRequest {
    fn splits(&self) -> [(&'static str, u64); 3] {
        [("train", self.train), ("test", self.test), ("valid", self.valid)]
    }
}

impl<R: ProcessRunner> Driver<R> {
    /// Draw train/test/valid datasets from every network in `<input>/*.bif`
    /// and score the test split against the generating network.
    ///
    /// # Errors
    ///
    /// Unlike the other batches, any step that does not succeed aborts the
    /// run with [`DriverError::StepFailed`]: the files of a network are only
    /// consistent when all of them were produced.
    pub fn sample<G: Rng + ?Sized>(
        &self,
        request: &SampleRequest,
        rng: &mut G,
    ) -> Result<BatchReport, DriverError> {
        let data_dir = request.input_dir.join("data");
        let model_dir = request.input_dir.join("model");
        ensure_dir_all(&data_dir)?;
        ensure_dir_all(&model_dir)?;

        let networks = discover_files(&request.input_dir, "*.bif")?;
        info!(
            input = %request.input_dir.display(),
            networks = networks.len(),
            libra = %self.tools().libra,
            "sampling datasets"
        );

        let mut report = BatchReport::default();
        for bif in &networks {
            let name = file_stem(bif);
            let _span = dataset_span(&name).entered();
            self.sample_network(request, bif, &name, &data_dir, &model_dir, rng)?;
            report.succeed(name);
        }

        report.log_summary("sample");
        Ok(report)
    }

    fn sample_network<G: Rng + ?Sized>(
        &self,
        request: &SampleRequest,
        bif: &Path,
        name: &str,
        data_dir: &Path,
        model_dir: &Path,
        rng: &mut G,
    ) -> Result<(), DriverError> {
        let network = BifNetwork::from_path(bif)?;
        let cardinalities = network.cardinalities();
        write_schema(&data_dir.join(format!("{name}.schema")), &cardinalities)?;
        write_header(&data_dir.join(format!("{name}.hdr")), &network.names(), &cardinalities)?;
        info!(variables = cardinalities.len(), "wrote schema and header");

        let libra = self.tools().libra.as_str();
        for (split, rows) in request.splits() {
            let command = CommandSpec::new(libra)
                .args(["bnsample", "-m"])
                .arg(bif)
                .arg("-o")
                .arg(data_dir.join(format!("{name}.{split}")))
                .arg("-n")
                .arg(rows.to_string())
                .arg("-seed")
                .arg(tool_seed(rng).to_string());
            self.require_success(&format!("bnsample {split}"), command)?;
        }

        let score = CommandSpec::new(libra)
            .args(["mscore", "-m"])
            .arg(bif)
            .arg("-i")
            .arg(data_dir.join(format!("{name}.test")))
            .arg("-log")
            .arg(model_dir.join(format!("{name}.score")));
        self.require_success("mscore", score)
    }

    fn require_success(&self, step: &str, command: CommandSpec) -> Result<(), DriverError> {
        let outcome = self.step(step, command, Deadline::Untimed);
        if outcome.status.is_success() {
            Ok(())
        } else {
            Err(DriverError::StepFailed {
                step: step.to_string(),
                status: outcome.status,
            })
        }
    }
}
