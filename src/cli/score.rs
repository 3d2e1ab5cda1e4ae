//! Score command handler.
//!
//! Implements the `score` subcommand: run the pipeline over a record file and
//! report every state's scores.

use super::{ensure_valid, load_repository, score_all};
use crate::blend::SiWeight;
use crate::config::AppConfig;
use crate::pipeline::{
    auto_detect_format, exit_codes, should_use_color, write_output, OutputTarget,
};
use crate::reports::{create_reporter_with_options, ReportConfig, ReportMetadata};
use anyhow::{anyhow, Result};

/// Run the score command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
#[allow(clippy::needless_pass_by_value)]
pub fn run_score(config: AppConfig) -> Result<i32> {
    ensure_valid(&config)?;
    let quiet = config.behavior.quiet;

    let repo = load_repository(&config)?;
    let output = score_all(&config, repo)?;

    if !quiet {
        tracing::info!(
            "Scored {} states over {}-{}",
            output.scores.len(),
            config.indicators.window_start,
            config.indicators.window_end
        );
    }

    let rank_weight = SiWeight::from_f64(config.output.rank_weight)
        .ok_or_else(|| anyhow!("invalid rank weight {}", config.output.rank_weight))?;
    let report_config = ReportConfig {
        rank_weight,
        top: config.output.top,
        include_tables: config.output.include_tables,
        metadata: ReportMetadata {
            data_file: config
                .store
                .data_file
                .as_ref()
                .map(|path| path.display().to_string()),
            ..ReportMetadata::new()
        },
    };

    let target = OutputTarget::from_option(config.output.file.clone());
    let format = auto_detect_format(config.output.format, &target);
    let colored = should_use_color(config.output.no_color) && target.is_terminal();
    let reporter = create_reporter_with_options(format, colored);
    let report = reporter.generate(&output, &report_config)?;
    write_output(&report, &target, quiet)?;

    Ok(determine_exit_code(&config, output.has_failures()))
}

/// Exit code for a completed run.
const fn determine_exit_code(config: &AppConfig, has_failures: bool) -> i32 {
    if config.behavior.fail_on_state_errors && has_failures {
        return exit_codes::STATE_FAILURES;
    }
    exit_codes::SUCCESS
}
