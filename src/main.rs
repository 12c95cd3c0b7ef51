use std::{path::PathBuf, process, thread};

use clap::Parser;
use cmsl::{
    config::Config,
    exec::{
        facade::{FacadeCall, RecordingFacade},
        source_executor::{FileSystemSources, SourceExecutor},
    },
};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "cmsl")]
#[command(about = "Run a cmake script and print the build-system calls it makes")]
struct Args {
    /// Script to run, relative to the source root
    #[arg(default_value = "CMakeLists.cmsl")]
    script: PathBuf,

    /// Directory scripts, imports and subdirectories are resolved against
    #[arg(long, default_value = ".")]
    source_root: PathBuf,

    /// Print the checked tree of the script instead of running it
    #[arg(long)]
    dump_sema: bool,

    /// Deepest script call chain; the interpreter thread's stack grows to fit
    #[arg(long)]
    max_call_depth: Option<usize>,

    /// Value of an `extern<>` variable, as NAME=VALUE
    #[arg(short = 'D', value_parser = parse_key_value)]
    defines: Vec<(String, String)>,

    /// Value of a `cmake::option`, as NAME=ON or NAME=OFF
    #[arg(short = 'O', long = "option", value_parser = parse_option)]
    options: Vec<(String, bool)>,
}

fn parse_key_value(arg: &str) -> Result<(String, String), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", arg))?;
    Ok((name.to_string(), value.to_string()))
}

fn parse_option(arg: &str) -> Result<(String, bool), String> {
    let (name, value) = parse_key_value(arg)?;
    match value.to_ascii_uppercase().as_str() {
        "ON" | "TRUE" | "YES" | "1" => Ok((name, true)),
        "OFF" | "FALSE" | "NO" | "0" => Ok((name, false)),
        _ => Err(format!("expected ON or OFF for '{}', got '{}'", name, value)),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,cmsl::script=info"));

    fmt().with_env_filter(filter).with_target(false).init();
}

fn describe(call: &FacadeCall) -> Option<String> {
    let line = match call {
        FacadeCall::Message(_) | FacadeCall::Warning(_) | FacadeCall::Error(_) => return None,
        FacadeCall::FatalError(what) => format!("fatal error: {}", what),
        FacadeCall::AddLibrary { name, sources } => {
            format!("add_library({} {})", name, sources.join(" "))
        }
        FacadeCall::AddExecutable { name, sources } => {
            format!("add_executable({} {})", name, sources.join(" "))
        }
        other => format!("{:?}", other),
    };
    Some(line)
}

fn main() {
    init_logging();

    let args = Args::parse();

    let mut config = Config::default().with_source_root(args.source_root.clone());
    if let Some(depth) = args.max_call_depth {
        config = config.with_max_call_depth(depth);
    }

    let worker = thread::Builder::new()
        .name(String::from("cmsl"))
        .stack_size(config.required_stack_size())
        .spawn(move || run(args, config));

    let code = match worker.map(|handle| handle.join()) {
        Ok(Ok(code)) => code,
        Ok(Err(_)) => {
            error!("interpreter thread panicked");
            1
        }
        Err(err) => {
            error!("could not start interpreter thread: {}", err);
            1
        }
    };
    process::exit(code);
}

fn run(args: Args, config: Config) -> i32 {
    let mut executor = SourceExecutor::new(config, Box::new(FileSystemSources));

    if args.dump_sema {
        match executor.compile_file(&args.script) {
            Some(program) => print!("{}", program.dump()),
            None => {
                eprint!("{}", executor.format_diagnostics());
                return 1;
            }
        }
        return 0;
    }

    let mut facade = RecordingFacade::new(&args.source_root.display().to_string());
    for (name, value) in &args.defines {
        facade = facade.with_define(name, value);
    }
    for (name, value) in &args.options {
        facade = facade.with_option(name, *value);
    }

    let result = executor.execute_file(&args.script, &mut facade);

    if executor.has_errors() {
        eprint!("{}", executor.format_diagnostics());
    }

    for line in facade.calls().iter().filter_map(describe) {
        println!("{}", line);
    }

    match result {
        Some(code) => {
            info!(code, "script finished");
            code as i32
        }
        None => {
            error!("script did not finish");
            1
        }
    }
}
