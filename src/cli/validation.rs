use crate::cli::args::CliArgs;
use crate::controller::PaginationMode;
use crate::output::OutputFormat;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(raw) = args.mode.as_deref() {
        if PaginationMode::parse(raw).is_none() {
            return Err(format!("invalid --mode '{raw}', expected cursor or client"));
        }
    }
    if let Some(raw) = args.output_format.as_deref() {
        if OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --output-format '{raw}', expected text or json"
            ));
        }
    }
    if let Some(raw) = args.endpoint.as_deref() {
        if reqwest::Url::parse(raw.trim()).is_err() {
            return Err(format!("invalid --endpoint '{raw}'"));
        }
    }
    if args.page_size == Some(0) {
        return Err("invalid page-size, expected positive integer".to_string());
    }
    if args.limit == Some(0) {
        return Err("invalid limit, expected positive integer".to_string());
    }
    if args.page == Some(0) {
        return Err("invalid page, pages start at 1".to_string());
    }
    if args.concurrency == Some(0) {
        return Err("invalid concurrency, expected positive integer".to_string());
    }
    if args.timeout == Some(0) {
        return Err("invalid timeout, expected positive integer".to_string());
    }
    Ok(())
}
