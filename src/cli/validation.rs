use crate::cli::args::CliArgs;
use crate::filter::GateFilter;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(raw) = args.gate.as_deref() {
        if GateFilter::parse(raw).is_none() {
            return Err(format!("invalid --gate '{raw}', expected all, pass, or fail"));
        }
    }
    if let Some(score) = args.min_score {
        if !score.is_finite() {
            return Err("invalid --min-score, expected a finite number".to_string());
        }
    }
    if let Some(raw) = args.upload_extensions.as_deref() {
        crate::utils::parse_extensions_csv(raw)
            .map_err(|e| format!("invalid --upload-extensions '{raw}': {e}"))?;
    }
    if let Some(raw) = args.output_format.as_deref() {
        if crate::output::OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --output-format '{raw}', expected text, json, or html"
            ));
        }
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid --timeout, expected a positive number of seconds".to_string());
        }
    }
    if let Some(workers) = args.workers {
        if workers == 0 {
            return Err("invalid --workers, expected a positive integer".to_string());
        }
    }
    if args.output_format.is_some() && !args.once {
        return Err("--output-format requires --once".to_string());
    }
    if args.output.is_some() && !args.once {
        return Err("--out requires --once".to_string());
    }
    Ok(())
}
