//! Algorithmic CLI - block pseudo-instruction transpiler

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use clap::{Parser as ClapParser, Subcommand};

use algorithmic::errors::print_error;
use algorithmic::{compile_source, file_extension, CompileError, Config, Target};

#[derive(ClapParser, Debug)]
#[command(name = "algorithmic")]
#[command(version)]
#[command(about = "Transpile block pseudo-instructions to algorithmic pseudocode or C++", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a source file
    Compile {
        input: PathBuf,

        /// Output language: algo (algorithmic) or cpp (c++)
        #[arg(short, long, value_parser = Target::from_str)]
        target: Target,

        /// Output file (defaults to the input name with the target's extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Check a source file against both backends without writing output
    Check {
        input: PathBuf,

        /// Configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>, verbose: bool) -> Result<Config, CompileError> {
    match path {
        Some(path) => {
            if verbose {
                println!(" Config: {}", path.display());
            }
            Config::load(path)
        }
        None => Ok(Config::default()),
    }
}

fn read_source(input: &Path, verbose: bool) -> Option<String> {
    match fs::read_to_string(input) {
        Ok(source) => {
            if verbose {
                println!(" Source: {} bytes, {} lines", source.len(), source.lines().count());
            }
            Some(source)
        }
        Err(e) => {
            eprintln!("Error reading file '{}': {}", input.display(), e);
            None
        }
    }
}

fn run_compile(
    input: &Path,
    target: Target,
    output: Option<&Path>,
    config: &Config,
    verbose: bool,
) -> bool {
    let Some(source) = read_source(input, verbose) else {
        return false;
    };
    let filename = input.display().to_string();

    if verbose {
        println!(" Compiling: {} -> {}", filename, target);
    }

    let code = match compile_source(&source, target, config) {
        Ok(code) => code,
        Err(e) => {
            print_error(&source, &filename, &e);
            return false;
        }
    };

    let output_path = output.map(Path::to_path_buf).unwrap_or_else(|| {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        PathBuf::from(format!("{}.{}", stem, file_extension(target)))
    });

    match fs::write(&output_path, &code) {
        Ok(_) => {
            println!("Generated: {} ({} bytes)", output_path.display(), code.len());
            true
        }
        Err(e) => {
            eprintln!("Error writing '{}': {}", output_path.display(), e);
            false
        }
    }
}

fn run_check(input: &Path, config: &Config, verbose: bool) -> bool {
    let Some(source) = read_source(input, verbose) else {
        return false;
    };
    let filename = input.display().to_string();

    let mut ok = true;
    for target in [Target::Algorithmic, Target::Cpp] {
        match compile_source(&source, target, config) {
            Ok(code) => {
                if verbose {
                    println!(" {}: {} bytes", target, code.len());
                }
            }
            Err(e) => {
                print_error(&source, &filename, &e);
                ok = false;
            }
        }
    }

    if ok {
        println!("OK: {} lines checked", source.lines().count());
    }
    ok
}

fn main() -> ExitCode {
    let args = Args::parse();

    let (input, succeeded) = match &args.command {
        Commands::Compile {
            input,
            target,
            output,
            config,
        } => {
            let config = match load_config(config.as_deref(), args.verbose) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            let succeeded = run_compile(
                input,
                *target,
                output.as_deref(),
                &config,
                args.verbose,
            );
            (input, succeeded)
        }
        Commands::Check { input, config } => {
            let config = match load_config(config.as_deref(), args.verbose) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            (input, run_check(input, &config, args.verbose))
        }
    };

    if succeeded {
        ExitCode::SUCCESS
    } else {
        if args.verbose {
            println!(" Failed: {}", input.display());
        }
        ExitCode::FAILURE
    }
}
