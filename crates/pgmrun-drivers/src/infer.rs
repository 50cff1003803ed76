use std::fs;
use std::path::PathBuf;

use pgmrun_data::log_probability_lines;
use pgmrun_runner::{CommandSpec, ProcessRunner};
use pgmrun_utils::error::DriverError;
use pgmrun_utils::logging::dataset_span;
use pgmrun_utils::paths::{discover_files, file_stem};
use tracing::{info, warn};

use crate::driver::{Deadline, Driver, with_ext};
use crate::{Algorithm, BatchReport, LibraMode};

/// Arguments of an `infer` batch.
#[derive(Debug, Clone)]
pub struct InferRequest {
    /// Directory with a `query/` folder of `<name>.q` (and optional `.ev`) files
    pub input_dir: PathBuf,
    /// Directory holding the models written by `learn`
    pub output_dir: PathBuf,
    pub executable: String,
    pub sub_mode: Option<String>,
}

impl<R: ProcessRunner> Driver<R> {
    /// Answer `<input>/query/*.q` against the models learned for each query set.
    ///
    /// Only libra models can be queried; for other tools the batch is logged and
    /// skipped. Each answer file is written next to the model as `<model>.exact`,
    /// holding the numeric lines of the query output.
    pub fn infer(&self, request: &InferRequest) -> Result<BatchReport, DriverError> {
        let algorithm = Algorithm::detect(&request.executable)?;
        let mut report = BatchReport::default();
        if algorithm != Algorithm::Libra {
            warn!(%algorithm, "inference is not available for this tool, skipping");
            report.skip(algorithm.as_str(), "inference not available");
            return Ok(report);
        }
        let mode = LibraMode::require(request.sub_mode.as_deref())?;

        let query_dir = request.input_dir.join("query");
        let queries = discover_files(&query_dir, "*.q")?;
        info!(
            input = %request.input_dir.display(),
            models = %request.output_dir.display(),
            queries = queries.len(),
            "answering queries"
        );

        for query in &queries {
            let name = file_stem(query);
            let _span = dataset_span(&name).entered();
            let exe = request.executable.as_str();

            let base = request.output_dir.join(format!("{name}-{mode}"));
            let model = with_ext(&base, mode.model_ext());
            if !model.is_file() {
                warn!(model = %model.display(), "model not found, skipping");
                report.skip(name, format!("missing model {}", model.display()));
                continue;
            }

            let circuit = with_ext(&base, "ac");
            if mode.learns_network() {
                let compile = CommandSpec::new(exe)
                    .args(["acve", "-m"])
                    .arg(&model)
                    .arg("-o")
                    .arg(&circuit);
                let compiled = self.step("acve", compile, Deadline::Untimed);
                if !compiled.status.is_success() {
                    report.fail(name, format!("compilation {}", compiled.status));
                    continue;
                }
            }

            let mut answer = CommandSpec::new(exe)
                .args(["acquery", "-m"])
                .arg(&circuit)
                .arg("-q")
                .arg(query);
            let evidence = query_dir.join(format!("{name}.ev"));
            if evidence.is_file() {
                answer = answer.arg("-ev").arg(&evidence);
            }
            let answered = self.step("acquery", answer, Deadline::Timed);
            if !answered.status.is_success() {
                report.fail(name, format!("query {}", answered.status));
                continue;
            }

            let exact = with_ext(&base, "exact");
            match fs::write(&exact, log_probability_lines(&answered.output)) {
                Ok(()) => {
                    info!(answers = %exact.display(), "wrote query answers");
                    report.succeed(name);
                }
                Err(err) => {
                    let err = DriverError::io(&exact)(err);
                    warn!(%err, "could not write answers");
                    report.fail(name, err.to_string());
                }
            }
        }

        report.log_summary("infer");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tools;
    use crate::test_support::{RecordingRunner, sub_command};
    use pgmrun_runner::CommandOutcome;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::TempDir;

    fn setup(queries: &[&str], models: &[&str]) -> (TempDir, InferRequest) {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("in");
        let output = temp.path().join("out");
        fs::create_dir_all(input.join("query")).unwrap();
        fs::create_dir_all(&output).unwrap();
        for query in queries {
            fs::write(input.join("query").join(query), "0,*\n").unwrap();
        }
        for model in models {
            fs::write(output.join(model), "model").unwrap();
        }
        let request = InferRequest {
            input_dir: input,
            output_dir: output,
            executable: "libra".to_string(),
            sub_mode: Some("cl".to_string()),
        };
        (temp, request)
    }

    fn answering(output: &'static [u8]) -> RecordingRunner {
        RecordingRunner::with(move |_| {
            CommandOutcome::completed(output.to_vec(), Some(0), Duration::ZERO)
        })
    }

    #[test]
    fn test_network_model_is_compiled_then_queried() {
        let (_temp, request) = setup(&["alarm.q", "alarm.ev"], &["alarm-cl.bn"]);
        let runner = answering(b"-0.5\n-1.25\n");
        let driver = Driver::new(&runner, Tools::default()).with_timeout(Some(Duration::from_secs(9)));

        let report = driver.infer(&request).unwrap();

        assert_eq!(report.succeeded, ["alarm"]);
        let base = request.output_dir.join("alarm-cl");
        let query = request.input_dir.join("query");
        assert_eq!(
            runner.command_lines(),
            [
                format!("libra acve -m {}.bn -o {}.ac", base.display(), base.display()),
                format!(
                    "libra acquery -m {}.ac -q {} -ev {}",
                    base.display(),
                    query.join("alarm.q").display(),
                    query.join("alarm.ev").display()
                ),
            ]
        );
        let calls = runner.invocations();
        assert_eq!(calls[0].timeout, None);
        assert_eq!(calls[1].timeout, Some(Duration::from_secs(9)));
        assert_eq!(
            fs::read_to_string(request.output_dir.join("alarm-cl.exact")).unwrap(),
            "-0.5\n-1.25\n"
        );
    }

    #[test]
    fn test_answers_keep_only_numeric_lines() {
        let (_temp, request) = setup(&["alarm.q"], &["alarm-cl.bn"]);
        let runner = answering(b"Compiling circuit...\n-0.5\nwarning: evidence file not given\n-1.25\n");
        let driver = Driver::new(&runner, Tools::default());

        let report = driver.infer(&request).unwrap();

        assert_eq!(report.succeeded, ["alarm"]);
        assert_eq!(
            fs::read_to_string(request.output_dir.join("alarm-cl.exact")).unwrap(),
            "-0.5\n-1.25\n"
        );
    }

    #[test]
    fn test_circuit_model_is_queried_directly_without_evidence() {
        let (_temp, mut request) = setup(&["asia.q"], &["asia-acmn.ac"]);
        request.sub_mode = Some("acmn".to_string());
        let runner = answering(b"-2\n");
        let driver = Driver::new(&runner, Tools::default());

        driver.infer(&request).unwrap();

        let lines = runner.command_lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("libra acquery -m "));
        assert!(!lines[0].contains("-ev"));
    }

    #[test]
    fn test_missing_model_is_skipped() {
        let (_temp, request) = setup(&["alarm.q", "asia.q"], &["asia-cl.bn"]);
        let runner = answering(b"0\n");
        let driver = Driver::new(&runner, Tools::default());

        let report = driver.infer(&request).unwrap();

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].0, "alarm");
        assert_eq!(report.succeeded, ["asia"]);
    }

    #[test]
    fn test_timed_out_query_writes_nothing() {
        let (_temp, mut request) = setup(&["alarm.q"], &["alarm-idspn.ac"]);
        request.sub_mode = Some("idspn".to_string());
        let runner = RecordingRunner::with(|invocation| {
            assert_eq!(sub_command(invocation), "acquery");
            CommandOutcome::timed_out(b"-0.1\n".to_vec(), Duration::from_secs(1))
        });
        let driver = Driver::new(&runner, Tools::default());

        let report = driver.infer(&request).unwrap();

        assert_eq!(report.failed.len(), 1);
        assert!(!Path::new(&request.output_dir.join("alarm-idspn.exact")).exists());
    }

    #[test]
    fn test_other_tools_are_skipped() {
        let (_temp, mut request) = setup(&["alarm.q"], &[]);
        request.executable = "/opt/gobnilp/bin/gobnilp".to_string();
        request.sub_mode = None;
        let runner = answering(b"");
        let driver = Driver::new(&runner, Tools::default());

        let report = driver.infer(&request).unwrap();

        assert_eq!(report.skipped.len(), 1);
        assert!(runner.invocations().is_empty());
    }

    #[test]
    fn test_libra_requires_sub_mode() {
        let (_temp, mut request) = setup(&["alarm.q"], &[]);
        request.sub_mode = None;
        let runner = answering(b"");
        let driver = Driver::new(&runner, Tools::default());

        assert!(matches!(
            driver.infer(&request),
            Err(DriverError::MissingRequiredInput { .. })
        ));
    }
}
