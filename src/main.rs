use batch_mt_adapter::{
    AdapterConfiguration, FsResourceStore, MockConnector, MockMode, MtAdapter, MtError,
    TranslationRequest,
};
use clap::{Arg, ArgAction, Command};
use regex::Regex;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn parse_mock_mode(mode: &str) -> Result<MockMode, MtError> {
    match mode.split_once(':') {
        None if mode == "echo" => Ok(MockMode::Echo),
        None if mode == "suffix" => Ok(MockMode::Suffix),
        Some(("drop", pattern)) => Regex::new(pattern)
            .map(MockMode::DropMatching)
            .map_err(|e| MtError::Configuration(format!("Invalid drop pattern: {}", e))),
        Some(("fail", message)) => Ok(MockMode::Error(message.to_string())),
        _ => Err(MtError::Configuration(format!(
            "Unknown mock mode '{}' (expected echo, suffix, drop:<regex> or fail:<message>)",
            mode
        ))),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("batch-mt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Submit a file of segments as one MT batch and print the reconciled results")
        .arg(
            Arg::new("input")
                .help("UTF-8 file with one segment per line")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("target-locale")
                .long("to")
                .short('t')
                .help("Target language code (e.g., fr, es_CO)")
                .required(true),
        )
        .arg(
            Arg::new("source-locale")
                .long("from")
                .short('s')
                .help("Source language code")
                .default_value("en"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("JSON adapter configuration file"),
        )
        .arg(
            Arg::new("locale-map")
                .long("locale-map")
                .help("Locale map resource path, relative to --resource-root"),
        )
        .arg(
            Arg::new("resource-root")
                .long("resource-root")
                .help("Directory host resources are resolved against")
                .default_value("."),
        )
        .arg(
            Arg::new("include-codes")
                .long("include-codes")
                .help("Emit inline formatting codes in results")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Mock provider behaviour: echo, suffix, drop:<regex>, fail:<message>")
                .default_value("suffix"),
        )
        .get_matches();

    let input = matches
        .get_one::<String>("input")
        .ok_or("missing input file")?;
    let target_locale = matches
        .get_one::<String>("target-locale")
        .ok_or("missing target locale")?;
    let source_locale = matches
        .get_one::<String>("source-locale")
        .ok_or("missing source locale")?;
    let resource_root = matches
        .get_one::<String>("resource-root")
        .ok_or("missing resource root")?;
    let mock = matches.get_one::<String>("mock").ok_or("missing mock mode")?;

    let mut configuration = match matches.get_one::<String>("config") {
        Some(path) => AdapterConfiguration::load_from_file(Path::new(path))?,
        None => AdapterConfiguration::default(),
    };
    if matches.get_flag("include-codes") {
        configuration.include_codes = true;
    }
    if let Some(path) = matches.get_one::<String>("locale-map") {
        configuration.locale_map_path = Some(path.clone());
    }

    let content = std::fs::read_to_string(input)?;
    let mut requests: Vec<TranslationRequest> =
        content.lines().map(TranslationRequest::new).collect();

    let adapter = MtAdapter::new(
        Arc::new(MockConnector::new(parse_mock_mode(mock)?)),
        Arc::new(FsResourceStore::new(resource_root)),
    )
    .with_configuration(configuration);

    let report = adapter
        .translate(&mut requests, source_locale, target_locale)
        .await?;

    let output = serde_json::json!({
        "report": report,
        "requests": requests,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mock_modes() {
        assert!(matches!(parse_mock_mode("echo"), Ok(MockMode::Echo)));
        assert!(matches!(parse_mock_mode("suffix"), Ok(MockMode::Suffix)));
        assert!(matches!(parse_mock_mode("drop:^Second"), Ok(MockMode::DropMatching(_))));
        assert!(matches!(parse_mock_mode("fail:quota"), Ok(MockMode::Error(msg)) if msg == "quota"));
    }

    #[test]
    fn test_parse_mock_mode_errors() {
        assert!(parse_mock_mode("loud").is_err());
        assert!(parse_mock_mode("drop:(").is_err());
    }
}
