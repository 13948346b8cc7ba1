mod debug_report;

use std::io::{self, IsTerminal, Read};
use stratagem::{Options, parse_verbose_with};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "STRATAGEM_LOG";

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    init_tracing();

    let outcome = parse_verbose_with(&config.input, &config.options);
    debug_report::print_run(&outcome, config.show_rows, config.color);
}

struct CliConfig {
    input: String,
    options: Options,
    show_rows: bool,
    color: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).try_init();
}

fn parse_args() -> Result<CliConfig, String> {
    let mut path: Option<String> = None;
    let mut options = Options::default();
    let mut show_rows = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("stratagem {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--rows" => show_rows = true,
            "--chunk" => {
                let value = args.next().ok_or_else(|| "error: --chunk expects a value".to_string())?;
                options.yield_every_lines = parse_lines(&value)?;
            }
            _ if arg.starts_with("--chunk=") => {
                options.yield_every_lines = parse_lines(arg.trim_start_matches("--chunk="))?;
            }
            _ if arg.starts_with('-') && arg != "-" => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                if path.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                path = Some(arg);
            }
        }
    }

    let input = match path.as_deref() {
        None | Some("-") => read_stdin_input()?,
        Some(file) => {
            std::fs::read_to_string(file).map_err(|err| format!("error: failed to read '{file}': {err}"))?
        }
    };

    if input.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { input, options, show_rows, color })
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn parse_lines(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(lines) if lines > 0 => Ok(lines),
        _ => Err(format!("error: invalid --chunk '{value}' (expected a positive line count)")),
    }
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "stratagem {version}

Strategy document inspector.

Usage:
  stratagem [OPTIONS] [FILE]

Reads strategy text from FILE, or from stdin when FILE is omitted or '-'.

Options:
  --rows                     Print every indexed parameter row.
  --chunk <lines>            Lines per chunk for large inputs. Default: {chunk}
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  {log_env}              Log filter, e.g. 'debug' or 'stratagem=trace'.

Exit codes:
  0  Success.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        chunk = Options::default().yield_every_lines,
        log_env = LOG_ENV,
    )
}
