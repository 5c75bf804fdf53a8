//! Check command handler

use crate::cli::CheckArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::{CheckReport, Outcome, OutputWriter};
use modelguard_schemas::{
    load_model, load_value, validate_batch, BatchConfig, FailureMode, Model, TracingSink, ValidationError,
    Validator, Value, WarnSink,
};
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument};

/// Sink that logs warnings and keeps them for the report
#[derive(Default)]
struct ReportSink {
    warnings: Mutex<Vec<ValidationError>>,
}

impl ReportSink {
    fn take(&self) -> Vec<ValidationError> {
        match self.warnings.lock() {
            Ok(mut warnings) => std::mem::take(&mut *warnings),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl WarnSink for ReportSink {
    fn warn(&self, error: &ValidationError) {
        TracingSink.warn(error);
        if let Ok(mut warnings) = self.warnings.lock() {
            warnings.push(error.clone());
        }
    }
}

/// Handle the check command
#[instrument(skip_all, fields(value = %args.value_file.display(), model = %args.model.display()))]
pub fn handle_check(args: CheckArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let timer = Timer::with_details("check", &args.value_file.display().to_string());
    let mode = args.mode.map(FailureMode::from).unwrap_or(config.validation.mode);

    output.info(&format!(
        "Checking {} against {}",
        args.value_file.display(),
        args.model.display()
    ))?;

    if output.is_verbose() {
        output.info(&format!("Failure mode: {:?}", mode))?;
    }

    let model = load_model(&args.model)?;
    let value = load_value(&args.value_file)?;
    debug!(?mode, each = args.each, elapsed_ms = timer.elapsed().as_millis() as u64, "Loaded value and model");

    let sink = Arc::new(ReportSink::default());
    let validator = Validator::global()
        .clone()
        .with_shared_sink(sink.clone());

    let mut report = CheckReport {
        value_file: args.value_file.clone(),
        model_file: args.model.clone(),
        mode,
        outcome: Outcome::Passed,
        checked: 1,
        failed: 0,
        failures: Vec::new(),
    };

    if mode == FailureMode::Off {
        report.outcome = Outcome::Skipped;
    } else if args.each {
        let Value::Array(items) = &value else {
            return Err(Error::invalid_args(format!(
                "--each requires {} to hold an array, found {}",
                args.value_file.display(),
                value.type_name()
            )));
        };

        let batch = BatchConfig {
            fail_fast: args.fail_fast,
            max_errors: args.max_errors.unwrap_or(config.validation.max_errors),
        };
        report.checked = items.len();

        if let Err(errors) = validate_batch(&validator, items, &model, &batch) {
            report.failed = errors.len();
            match mode {
                FailureMode::Warn => {
                    for error in &errors.errors {
                        sink.warn(error);
                    }
                    report.outcome = Outcome::Warned;
                    report.failures = sink.take();
                }
                FailureMode::Bool => report.outcome = Outcome::Failed,
                _ => {
                    report.outcome = Outcome::Failed;
                    report.failures = errors.errors;
                }
            }
        }
    } else {
        check_single(&validator, &value, &model, mode, &sink, &mut report);
    }

    output.check_report(&report, config.output.show_violations)?;
    timer.finish();

    match (report.outcome, mode) {
        (Outcome::Failed, FailureMode::Bool) => Err(Error::Rejected),
        (Outcome::Failed, _) if args.each => Err(Error::Batch {
            failed: report.failed,
            total: report.checked,
        }),
        (Outcome::Failed, _) => match report.failures.into_iter().next() {
            Some(error) => Err(Error::Validation(error)),
            None => Err(Error::Rejected),
        },
        _ => Ok(()),
    }
}

/// Validate one value, recording the outcome the failure mode produced
fn check_single(
    validator: &Validator,
    value: &Value,
    model: &Model,
    mode: FailureMode,
    sink: &ReportSink,
    report: &mut CheckReport,
) {
    match validator.validate(value, model, mode) {
        Ok(Some(false)) => {
            report.outcome = Outcome::Failed;
            report.failed = 1;
        }
        Ok(_) => {
            let warnings = sink.take();
            if !warnings.is_empty() {
                report.outcome = Outcome::Warned;
                report.failed = warnings.len();
                report.failures = warnings;
            }
        }
        Err(error) => {
            report.outcome = Outcome::Failed;
            report.failed = 1;
            report.failures = vec![error];
        }
    }
}
