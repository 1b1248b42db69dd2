use anyhow::{anyhow, bail, Context};
use clap::{Arg, ArgAction, Command};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use angular_linker::config::linker_config::LinkerConfig;
use angular_linker::linker::{link_source_with, LinkerSetup};
use angular_linker::ngtsc::logging::{LogLevel, TracingLogger};

fn main() {
    let matches = Command::new("ng-link")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Links the partial declarations of Angular libraries into full definitions")
        .arg(
            Arg::new("files")
                .value_name("FILE")
                .help("JavaScript files or glob patterns to link")
                .num_args(1..)
                .required(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Path to a linker config JSON file"),
        )
        .arg(
            Arg::new("out-dir")
                .short('o')
                .long("out-dir")
                .value_name("DIR")
                .help("Directory to write linked files to; linked code is printed when omitted"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("One of debug, info, warn or error"),
        )
        .arg(
            Arg::new("jit")
                .long("jit")
                .action(ArgAction::SetTrue)
                .help("Link NgModules for JIT compilation"),
        )
        .get_matches();

    let inputs: Vec<String> = matches
        .get_many::<String>("files")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let config_path = matches.get_one::<String>("config").map(PathBuf::from);
    let out_dir = matches.get_one::<String>("out-dir").map(PathBuf::from);
    let log_level = matches.get_one::<String>("log-level").cloned();
    let jit = matches.get_flag("jit");

    if let Err(error) = run(&inputs, config_path.as_deref(), out_dir.as_deref(), log_level, jit) {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

fn run(
    inputs: &[String],
    config_path: Option<&Path>,
    out_dir: Option<&Path>,
    log_level: Option<String>,
    jit: bool,
) -> anyhow::Result<()> {
    let mut config = match config_path {
        Some(path) => LinkerConfig::load(path)?,
        None => LinkerConfig::default(),
    };
    if jit {
        config.linker_options.linker_jit_mode = true;
    }
    let level = match log_level {
        Some(level) => level.parse::<LogLevel>().map_err(anyhow::Error::msg)?,
        None => config.log_level.unwrap_or_default(),
    };
    angular_linker::init_tracing(&format!("angular_linker={}", level));

    let files = expand_inputs(inputs)?;
    if files.is_empty() {
        bail!("No input files matched");
    }
    if let Some(out_dir) = out_dir {
        fs::create_dir_all(out_dir)
            .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    }

    let failures: Vec<String> = files
        .par_iter()
        .filter_map(|file| {
            link_file(file, &config, level, out_dir)
                .err()
                .map(|error| format!("{:#}", error))
        })
        .collect();

    for failure in &failures {
        eprintln!("{}", failure);
    }
    if !failures.is_empty() {
        bail!("{} of {} file(s) failed to link", failures.len(), files.len());
    }
    tracing::info!(target: "angular_linker", "linked {} file(s)", files.len());
    Ok(())
}

/// Plain paths are taken as they are; anything with glob characters is expanded.
fn expand_inputs(inputs: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if !input.contains(['*', '?', '[']) {
            files.push(PathBuf::from(input));
            continue;
        }
        for entry in glob::glob(input).with_context(|| format!("Invalid pattern {}", input))? {
            let path = entry?;
            if path.is_file() {
                files.push(path);
            }
        }
    }
    Ok(files)
}

fn link_file(
    file: &Path,
    config: &LinkerConfig,
    level: LogLevel,
    out_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let code = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let filename = file.to_string_lossy();
    let setup = LinkerSetup::new(config.linker_options.clone())
        .with_logger(Box::new(TracingLogger::new(level)));
    let linked =
        link_source_with(&filename, &code, setup).map_err(|error| anyhow!(error.render()))?;

    match out_dir {
        Some(out_dir) => {
            let name = file
                .file_name()
                .with_context(|| format!("{} is not a file", file.display()))?;
            let destination = out_dir.join(name);
            fs::write(&destination, linked)
                .with_context(|| format!("Failed to write {}", destination.display()))?;
        }
        None => println!("{}", linked),
    }
    Ok(())
}
