use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use pgmrun_data::{arff_header, copy_with_header, read_header_names, read_schema};
use pgmrun_runner::{CommandSpec, ProcessRunner};
use pgmrun_utils::error::DriverError;
use pgmrun_utils::logging::dataset_span;
use pgmrun_utils::paths::{discover_files, ensure_dir_all, file_stem, remove_if_exists};
use rand::Rng;
use tracing::{error, info};

use crate::driver::{Deadline, Driver, tool_seed, with_ext};
use crate::{Algorithm, BatchReport, LibraMode};

/// Arguments of a `learn` batch.
#[derive(Debug, Clone)]
pub struct LearnRequest {
    /// Directory with a `data/` folder of `<name>.train` files
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub executable: String,
    /// libra learner (`-s`)
    pub sub_mode: Option<String>,
    /// gobnilp settings file (`-p`)
    pub param_file: Option<PathBuf>,
}

/// Learner resolved and validated before the batch starts.
enum Learner<'a> {
    Libra(LibraMode),
    LearnSdd,
    Gobnilp { settings: &'a Path },
    Bi,
}

impl<'a> Learner<'a> {
    fn resolve(request: &'a LearnRequest) -> Result<Self, DriverError> {
        match Algorithm::detect(&request.executable)? {
            Algorithm::Libra => Ok(Self::Libra(LibraMode::require(
                request.sub_mode.as_deref(),
            )?)),
            Algorithm::LearnSdd => Ok(Self::LearnSdd),
            Algorithm::Gobnilp => {
                let settings = request.param_file.as_deref().ok_or_else(|| {
                    DriverError::MissingRequiredInput {
                        what: "gobnilp parameter file (-p)".to_string(),
                    }
                })?;
                if !settings.is_file() {
                    return Err(DriverError::InvalidArgument {
                        name: "-p".to_string(),
                        reason: format!("{} is not a readable file", settings.display()),
                    });
                }
                Ok(Self::Gobnilp { settings })
            }
            Algorithm::Bi => Ok(Self::Bi),
        }
    }
}

impl<R: ProcessRunner> Driver<R> {
    /// Learn one model per `<input>/data/*.train` dataset.
    ///
    /// A dataset whose learner fails or times out is recorded in the report and
    /// the batch moves on.
    ///
    /// # Errors
    ///
    /// Fails before running anything if the executable or sub-mode is not
    /// supported, a required input is missing, or the output directory cannot
    /// be created.
    pub fn learn<G: Rng + ?Sized>(
        &self,
        request: &LearnRequest,
        rng: &mut G,
    ) -> Result<BatchReport, DriverError> {
        let learner = Learner::resolve(request)?;
        ensure_dir_all(&request.output_dir)?;

        let datasets = discover_files(&request.input_dir.join("data"), "*.train")?;
        info!(
            input = %request.input_dir.display(),
            output = %request.output_dir.display(),
            executable = %request.executable,
            datasets = datasets.len(),
            "learning models"
        );

        let mut report = BatchReport::default();
        for dataset in &datasets {
            let name = file_stem(dataset);
            let _span = dataset_span(&name).entered();

            let data = request.input_dir.join("data").join(&name);
            let result = match &learner {
                Learner::Libra(mode) => self.learn_libra(request, *mode, &name, &data, rng),
                Learner::LearnSdd => self.learn_sdd(request, &name, &data),
                Learner::Gobnilp { settings } => {
                    self.learn_gobnilp(request, settings, &name, dataset)
                }
                Learner::Bi => self.learn_bi(request, &name, &data),
            };

            match result {
                Ok(None) => report.succeed(name),
                Ok(Some(reason)) => report.fail(name, reason),
                Err(err) => {
                    error!(%err, "dataset aborted");
                    report.fail(name, err.to_string());
                }
            }
        }

        report.log_summary("learn");
        Ok(report)
    }

    /// Returns `Some(reason)` when a step did not succeed.
    fn learn_libra<G: Rng + ?Sized>(
        &self,
        request: &LearnRequest,
        mode: LibraMode,
        name: &str,
        data: &Path,
        rng: &mut G,
    ) -> Result<Option<String>, DriverError> {
        let exe = request.executable.as_str();
        let out = request.output_dir.join(format!("{name}-{mode}"));
        let log = with_ext(&out, "out");
        let model = with_ext(&out, mode.model_ext());

        remove_if_exists(&log)?;
        remove_if_exists(&with_ext(&out, "score"))?;
        remove_if_exists(&model)?;

        let learned = if mode.learns_spn() {
            let spn = with_ext(&out, "spn");
            remove_if_exists(&spn)?;
            let learn = CommandSpec::new(exe)
                .arg(mode.as_str())
                .arg("-i")
                .arg(with_ext(data, "train"))
                .arg("-o")
                .arg(&spn)
                .arg("-seed")
                .arg(tool_seed(rng).to_string())
                .arg("-s")
                .arg(with_ext(data, "schema"))
                .arg("-log")
                .arg(&log);
            let outcome = self.step(mode.as_str(), learn, Deadline::Timed);
            if outcome.status.is_success() {
                let convert = CommandSpec::new(exe)
                    .args(["spn2ac", "-m"])
                    .arg(&spn)
                    .arg("-o")
                    .arg(&model);
                self.step("spn2ac", convert, Deadline::Untimed)
            } else {
                outcome
            }
        } else {
            let mut learn = CommandSpec::new(exe)
                .arg(mode.as_str())
                .arg("-i")
                .arg(with_ext(data, "train"))
                .arg("-o")
                .arg(&model);
            if mode.learns_network() {
                learn = learn.args(["-prior", "1"]);
            }
            let learn = learn
                .arg("-s")
                .arg(with_ext(data, "schema"))
                .arg("-log")
                .arg(&log);
            self.step(mode.as_str(), learn, Deadline::Timed)
        };

        if !learned.status.is_success() {
            return Ok(Some(format!("learning {}", learned.status)));
        }

        let score = CommandSpec::new(exe)
            .args(["mscore", "-m"])
            .arg(&model)
            .arg("-i")
            .arg(with_ext(data, "test"))
            .arg("-log")
            .arg(with_ext(&out, "score"));
        let scored = self.step("mscore", score, Deadline::Untimed);
        Ok((!scored.status.is_success()).then(|| format!("scoring {}", scored.status)))
    }

    fn learn_sdd(
        &self,
        request: &LearnRequest,
        name: &str,
        data: &Path,
    ) -> Result<Option<String>, DriverError> {
        let solution_dir = request.output_dir.join(name);
        ensure_dir_all(&solution_dir)?;

        let learn = CommandSpec::new(&self.tools().java)
            .arg("-jar")
            .arg(&request.executable)
            .arg("learn")
            .arg(with_ext(data, "train"))
            .arg(with_ext(data, "valid"))
            .arg(&solution_dir);
        let outcome = self.step("LearnSDD", learn, Deadline::Timed);
        Ok((!outcome.status.is_success()).then(|| format!("learning {}", outcome.status)))
    }

    fn learn_gobnilp(
        &self,
        request: &LearnRequest,
        settings: &Path,
        name: &str,
        train: &Path,
    ) -> Result<Option<String>, DriverError> {
        let settings_copy = write_gobnilp_settings(settings, &request.output_dir, name)?;

        let learn = CommandSpec::new(&request.executable)
            .arg(format!("-g={}", settings_copy.display()))
            .arg("-f=dat")
            .arg(train);
        let outcome = self.step("gobnilp", learn, Deadline::Timed);
        Ok((!outcome.status.is_success()).then(|| format!("learning {}", outcome.status)))
    }

    fn learn_bi(
        &self,
        request: &LearnRequest,
        name: &str,
        data: &Path,
    ) -> Result<Option<String>, DriverError> {
        let solution_dir = request.output_dir.join(name);
        ensure_dir_all(&solution_dir)?;

        let names = read_header_names(&with_ext(data, "hdr"))?;
        let cardinalities = read_schema(&with_ext(data, "schema"))?;
        let header = arff_header(&names, &cardinalities)?;

        let train_arff = arff_path(data, "train");
        let test_arff = arff_path(data, "test");
        copy_with_header(&with_ext(data, "train"), &train_arff, &header)?;
        copy_with_header(&with_ext(data, "test"), &test_arff, &header)?;

        let tools = self.tools();
        let learn = CommandSpec::new(&tools.java)
            .arg(format!("-Xmx{}", tools.java_heap))
            .arg("-cp")
            .arg(&request.executable)
            .arg("clustering/LearnAndTest")
            .arg(&train_arff)
            .arg(&test_arff)
            .arg(&solution_dir);
        let outcome = self.step("BI", learn, Deadline::Timed);
        Ok((!outcome.status.is_success()).then(|| format!("learning {}", outcome.status)))
    }
}

/// `data/alarm` -> `data/alarm-train.arff`
fn arff_path(data: &Path, split: &str) -> PathBuf {
    let mut name = data.as_os_str().to_os_string();
    name.push(format!("-{split}.arff"));
    PathBuf::from(name)
}

/// Copy the gobnilp settings file to `<output>/<name>.set` and point its
/// solution and timing outputs into `output`.
fn write_gobnilp_settings(
    settings: &Path,
    output_dir: &Path,
    name: &str,
) -> Result<PathBuf, DriverError> {
    let target = output_dir.join(format!("{name}.set"));
    fs::copy(settings, &target).map_err(DriverError::io(settings))?;

    let mut file = fs::OpenOptions::new()
        .append(true)
        .open(&target)
        .map_err(DriverError::io(&target))?;
    let output = output_dir.display();
    write!(
        file,
        "\ngobnilp/outputfile/solution = \"{output}/<probname>.solution\"\
         \ngobnilp/outputfile/scoreandtime = \"{output}/<probname>.times\"\n"
    )
    .map_err(DriverError::io(&target))?;

    Ok(target)
}
