mod debug_report;

use chrono::Local;
use eloquence::{Conversation, DEFAULT_LOCALE, Features, Options, RandomSource, RngSource, Script, ScriptError};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "ELOQUENCE_LOG";

fn main() {
    init_logging();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let script = match load_script(&config) {
        Ok(script) => script,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    let result = match config.seed {
        Some(seed) => {
            let conversation = Conversation::with_rng(config.options.clone(), RngSource::seeded(seed));
            run(&config, conversation, script)
        }
        None => run(&config, Conversation::new(config.options.clone()), script),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

struct CliConfig {
    input: Option<String>,
    script: Option<PathBuf>,
    locale: String,
    options: Options,
    seed: Option<u64>,
    timestamps: bool,
    explain: bool,
    color: bool,
}

fn load_script(config: &CliConfig) -> Result<Script, ScriptError> {
    match &config.script {
        Some(path) => Script::from_path(path),
        None => Script::builtin(&config.locale),
    }
}

fn run<R: RandomSource>(config: &CliConfig, mut conversation: Conversation<R>, script: Script) -> io::Result<()> {
    conversation.load_script(script);

    if let Some(input) = &config.input {
        answer(config, &mut conversation, input);
        return Ok(());
    }

    let interactive = io::stdin().is_terminal();
    say(config, &conversation.greet());
    prompt(interactive)?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        answer(config, &mut conversation, &line);
        prompt(interactive)?;
    }
    if interactive {
        println!();
    }
    Ok(())
}

fn answer<R: RandomSource>(config: &CliConfig, conversation: &mut Conversation<R>, input: &str) {
    if config.explain {
        let (response, details) = conversation.respond_verbose(input);
        debug_report::print_turn(input, &response, details.as_ref(), config.color);
        say(config, &response.text);
    } else {
        let reply = conversation.respond(input);
        say(config, &reply);
    }
}

fn say(config: &CliConfig, text: &str) {
    if config.timestamps {
        println!("[{}] {}", Local::now().format("%H:%M"), text);
    } else {
        println!("{text}");
    }
}

fn prompt(interactive: bool) -> io::Result<()> {
    if interactive {
        let mut stdout = io::stdout().lock();
        write!(stdout, "> ")?;
        stdout.flush()?;
    }
    Ok(())
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut script: Option<PathBuf> = None;
    let mut locale = DEFAULT_LOCALE.to_string();
    let mut options = Options::default();
    let mut seed: Option<u64> = None;
    let mut timestamps = false;
    let mut explain = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("eloquence {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--timestamps" => timestamps = true,
            "--explain" => explain = true,
            "--no-memory" => options.features.remove(Features::REPETITION_DETECTION),
            "--apply-pre" => options.features.insert(Features::APPLY_PRE_TRANSFORM),
            "--script" => {
                let value = args.next().ok_or_else(|| "error: --script expects a path".to_string())?;
                script = Some(PathBuf::from(value));
            }
            "--locale" => {
                locale = args.next().ok_or_else(|| "error: --locale expects a value".to_string())?;
            }
            "--memory" => {
                let value = args.next().ok_or_else(|| "error: --memory expects a value".to_string())?;
                options.memory_capacity = parse_number(&value, "--memory")?;
            }
            "--seed" => {
                let value = args.next().ok_or_else(|| "error: --seed expects a value".to_string())?;
                seed = Some(parse_number(&value, "--seed")?);
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--script=") => {
                script = Some(PathBuf::from(arg.trim_start_matches("--script=")));
            }
            _ if arg.starts_with("--locale=") => {
                locale = arg.trim_start_matches("--locale=").to_string();
            }
            _ if arg.starts_with("--memory=") => {
                options.memory_capacity = parse_number(arg.trim_start_matches("--memory="), "--memory")?;
            }
            _ if arg.starts_with("--seed=") => {
                seed = Some(parse_number(arg.trim_start_matches("--seed="), "--seed")?);
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                input = Some(std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" "));
                break;
            }
        }
    }

    if script.is_some() && locale != DEFAULT_LOCALE {
        return Err("error: --script and --locale are mutually exclusive".to_string());
    }

    Ok(CliConfig { input, script, locale, options, seed, timestamps, explain, color })
}

fn parse_number<T: std::str::FromStr>(value: &str, flag: &str) -> Result<T, String> {
    value.parse().map_err(|_| format!("error: invalid {flag} '{value}' (expected a non-negative integer)"))
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "eloquence {version}

Keyword decomposition/reassembly chat bot.

Usage:
  eloquence [OPTIONS] [--] <input...>     Answer one input and exit.
  eloquence [OPTIONS]                     Greet, then answer stdin line by line.

Options:
  --script <path>            Load rules from a JSON script file.
  --locale <name>            Use a bundled script ({locales}).
                             Default: {default_locale}
  --memory <n>               Recent exchanges kept for repetition detection.
                             Default: 1
  --no-memory                Disable repetition detection.
  --apply-pre                Search the pre-transformed input.
  --seed <u64>               Seed the random choices (reproducible replies).
  --timestamps               Prefix replies with [HH:MM].
  --explain                  Print the rule search for every input.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  {log_env}             Log filter (e.g. eloquence=debug). Default: warn

Exit codes:
  0  Success.
  1  Script could not be loaded, or I/O failed.
  2  Invalid arguments.
",
        version = env!("CARGO_PKG_VERSION"),
        locales = eloquence::BUILTIN_LOCALES.join(", "),
        default_locale = DEFAULT_LOCALE,
        log_env = LOG_ENV,
    )
}
