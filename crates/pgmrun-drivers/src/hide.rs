use std::path::{Path, PathBuf};

use pgmrun_bif::BifNetwork;
use pgmrun_data::drop_columns;
use pgmrun_utils::error::DriverError;
use pgmrun_utils::logging::dataset_span;
use pgmrun_utils::paths::{discover_files, ensure_dir_all, file_stem};
use rand::Rng;
use rand::seq::index;
use tracing::{debug, info, warn};

use crate::BatchReport;

const DATA_EXTS: [&str; 5] = ["train", "test", "valid", "schema", "hdr"];
const QUERY_EXTS: [&str; 2] = ["q", "ev"];

/// Arguments of a `hide` run.
#[derive(Debug, Clone)]
pub struct HideRequest {
    /// Directory with the `*.bif` networks and their `data/` and `query/` folders
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Internal variables to hide per instance
    pub count: usize,
    /// Independent random selections per network
    pub instances: usize,
}

/// Write copies of each network's datasets and queries with randomly chosen
/// internal variables removed.
///
/// Instance `k` hiding `n` variables of network `name` produces files named
/// `<name>-X<n>I<k>.<ext>`. Networks without internal variables are skipped.
///
/// # Errors
///
/// `count` and `instances` must be positive; failing to read a network or to
/// write a cut file stops the run.
pub fn hide<G: Rng + ?Sized>(request: &HideRequest, rng: &mut G) -> Result<BatchReport, DriverError> {
    for (name, value) in [("-n", request.count), ("--instances", request.instances)] {
        if value == 0 {
            return Err(DriverError::InvalidArgument {
                name: name.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
    }

    let data_out = request.output_dir.join("data");
    let query_out = request.output_dir.join("query");
    ensure_dir_all(&data_out)?;
    ensure_dir_all(&query_out)?;

    let networks = discover_files(&request.input_dir, "*.bif")?;
    info!(
        input = %request.input_dir.display(),
        output = %request.output_dir.display(),
        networks = networks.len(),
        count = request.count,
        instances = request.instances,
        "hiding variables"
    );

    let mut report = BatchReport::default();
    for bif in &networks {
        let name = file_stem(bif);
        let _span = dataset_span(&name).entered();

        let network = BifNetwork::from_path(bif)?;
        let internals: Vec<usize> = network.internals().iter().map(|v| v.id).collect();
        if internals.is_empty() {
            warn!("network has no internal variables, skipping");
            report.skip(name, "no internal variables");
            continue;
        }
        let hidden = request.count.min(internals.len());
        if hidden < request.count {
            warn!(requested = request.count, hidden, "fewer internal variables than requested");
        }

        for instance in 1..=request.instances {
            let mut columns: Vec<usize> = index::sample(rng, internals.len(), hidden)
                .into_iter()
                .map(|i| internals[i])
                .collect();
            columns.sort_unstable();
            let hidden_names: Vec<&str> = columns
                .iter()
                .map(|&id| network.variables()[id].name.as_str())
                .collect();
            debug!(instance, hidden = ?hidden_names, "selected variables");

            let target = format!("{name}-X{hidden}I{instance}");
            let data_in = request.input_dir.join("data");
            let query_in = request.input_dir.join("query");
            cut_files(&data_in, &data_out, &name, &target, &DATA_EXTS, &columns)?;
            cut_files(&query_in, &query_out, &name, &target, &QUERY_EXTS, &columns)?;
        }
        report.succeed(name);
    }

    report.log_summary("hide");
    Ok(report)
}

fn cut_files(
    src_dir: &Path,
    dst_dir: &Path,
    name: &str,
    target: &str,
    exts: &[&str],
    columns: &[usize],
) -> Result<(), DriverError> {
    for ext in exts {
        let src = src_dir.join(format!("{name}.{ext}"));
        if !src.is_file() {
            warn!(file = %src.display(), "source file missing, not cut");
            continue;
        }
        let dst = dst_dir.join(format!("{target}.{ext}"));
        let rows = drop_columns(&src, &dst, columns)?;
        debug!(file = %dst.display(), rows, "wrote cut file");
    }
    Ok(())
}
