use std::env;
use std::fs;
use std::process;

use vitrine_core::{
    normalize, resolve_static, synthesize, ComponentRecord, PreviewConfig, PreviewError,
    ThemeMode,
};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let mut files = Vec::new();
    let mut light = false;
    let mut frameworks = false;
    let mut config_path = None;
    let mut rest = args[1..].iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--light" => light = true,
            "--frameworks" => frameworks = true,
            "--config" => match rest.next() {
                Some(path) => config_path = Some(path.clone()),
                None => {
                    eprintln!("--config needs a file argument");
                    process::exit(1);
                }
            },
            _ => files.push(arg.clone()),
        }
    }

    let config = match config_path {
        Some(path) => match PreviewConfig::from_file(&path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("✗ {}: {}", path, e);
                process::exit(1);
            }
        },
        None => PreviewConfig::default(),
    };

    let mut options = config.synthesis_options();
    if light {
        options.theme = ThemeMode::Light;
    }
    if frameworks {
        options.include_utility_frameworks = true;
    }
    let placeholders = config.placeholder_map();

    let mut exit_code = 0;
    for path in files {
        match load_record(&path) {
            Ok(record) => {
                let content = normalize(&record);
                eprintln!(
                    "✓ {} id={:?} html={}B css={}B fallback={:?}",
                    path,
                    record.identifier,
                    content.html.len(),
                    content.css.len(),
                    resolve_static(&record, &placeholders)
                );
                println!("{}", synthesize(&content, &options.for_record(&record)));
            }
            Err(e) => {
                eprintln!("✗ {}: {}", path, e);
                exit_code = 1;
            }
        }
    }

    process::exit(exit_code);
}

/// Records themselves are parsed leniently; only unreadable files or
/// non-JSON text are reported.
fn load_record(path: &str) -> Result<ComponentRecord, PreviewError> {
    let content = fs::read_to_string(path).map_err(|e| PreviewError::Io {
        path: path.to_string(),
        message: e.to_string(),
    })?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    Ok(ComponentRecord::from_json(&value))
}

fn print_usage() {
    eprintln!("Usage: vitrine-synth <record.json>... [--light] [--frameworks] [--config preview.yaml]");
    eprintln!();
    eprintln!("Prints the synthesized preview document for each record to stdout.");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  vitrine-synth button.json > button.html");
    eprintln!("  vitrine-synth --light --config preview.yaml cards/*.json");
}
