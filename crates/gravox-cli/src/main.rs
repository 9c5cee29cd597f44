use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use gravox_eval::{ConfigError, ConfigOverlay, Interpreter, InterpreterConfig};
use gravox_parser::parse_source;
use gravox_types::{CompileErrors, SourceFile};

/// gravox runs Gravox (`.gvx`) scripts.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a script.
    Run {
        /// Path to the `.gvx` file.
        file: PathBuf,

        /// Print lexical and syntax errors as JSON instead of text.
        #[arg(long)]
        json: bool,

        /// JSON interpreter config. Keys it sets override the script
        /// defaults; imports resolve next to the script otherwise.
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    match args.command {
        Command::Run { file, json, config } => run(file, json, config),
    }
}

fn run(file: PathBuf, json: bool, config: Option<PathBuf>) -> ExitCode {
    let source = match fs::read_to_string(&file) {
        Ok(source) => source,
        Err(_) => {
            eprintln!(
                "Failed to read the input file '{}'. Perhaps this file does not exist?",
                file.display()
            );
            return ExitCode::FAILURE;
        }
    };

    let settings = match load_settings(&file, config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let source_file = SourceFile::new(settings.file_name.clone(), source);
    let (program, lexed) = parse_source(&source_file);
    report(&lexed.errors, json);

    let program = match program {
        Ok(program) => program,
        Err(e) => {
            let mut errors = CompileErrors::empty();
            errors.push_error(e);
            report(&errors, json);
            return ExitCode::FAILURE;
        }
    };

    let mut interpreter = Interpreter::new(settings);
    interpreter.interpret(&program);
    if interpreter.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Script defaults with the `--config` file, if any, layered on top.
fn load_settings(file: &Path, config: Option<&Path>) -> Result<InterpreterConfig, ConfigError> {
    let mut settings = InterpreterConfig::for_script(file);
    if let Some(path) = config {
        ConfigOverlay::load(path)?.apply(&mut settings);
    }
    Ok(settings)
}

/// Print front-end errors on stderr, one per line or as a JSON document.
fn report(errors: &CompileErrors, json: bool) {
    if !errors.has_errors() {
        return;
    }
    if json {
        match serde_json::to_string(errors) {
            Ok(text) => eprintln!("{text}"),
            Err(e) => eprintln!("failed to serialise diagnostics: {e}"),
        }
    } else {
        for error in errors.iter() {
            eprintln!("{error}");
            if !error.source_line.is_empty() {
                eprintln!("    {}", error.source_line);
            }
            if let Some(suggestion) = &error.suggestion {
                eprintln!("    help: {suggestion}");
            }
        }
    }
}
