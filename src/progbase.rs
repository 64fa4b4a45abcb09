include!(concat!(env!("OUT_DIR"), "/version.rs"));

use clap::Parser;
use log::LevelFilter;
use std::env;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Parser, Default, Debug)]
#[clap(about = "Flags samples that reach a multiple of their trailing median")]
pub struct Opts {
    #[clap(short, long, default_value = "def")]
    pub id: String,
    #[clap(short, long, default_value = "info")]
    pub log_level: String,
    #[clap(short = 'V', long)]
    pub version: bool,
    #[clap(short, long)]
    pub stdout: bool,
    /// Trailing window length, overrides the configuration file.
    #[clap(short, long)]
    pub window: Option<usize>,
    /// Notification multiplier, overrides the configuration file.
    #[clap(short, long)]
    pub factor: Option<u32>,
    /// Configuration file, defaults to <config dir>/<exe>/<id>/notifier.json
    #[clap(short, long)]
    pub config: Option<PathBuf>,
    #[clap(long)]
    pub print_schema: bool,
    /// Whitespace separated samples, stdin when omitted.
    pub input: Option<PathBuf>,
}

pub struct Options {
    pub exe: String,
    pub id: String,
    pub log_level: LevelFilter,
    pub stdout: bool,
}

impl Options {
    pub fn new(opts: &Opts) -> Self {
        let exe_name = env::current_exe()
            .ok()
            .and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
            .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());

        let log_level = match opts.log_level.as_str() {
            "off" => LevelFilter::Off,
            "error" => LevelFilter::Error,
            "warn" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            _ => LevelFilter::Info,
        };

        Options {
            exe: exe_name,
            id: opts.id.clone(),
            log_level,
            stdout: opts.stdout,
        }
    }
}

// Singleton for Options
lazy_static::lazy_static! {
    static ref OPTIONS: Arc<Mutex<Options>> = Arc::new(Mutex::new(Options {
        exe: String::new(),
        id: String::new(),
        log_level: LevelFilter::Info,
        stdout: false,
    }));
}

fn options() -> MutexGuard<'static, Options> {
    OPTIONS.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Parses the command line and stores the process wide options.
pub fn try_init() -> Result<Opts, clap::Error> {
    let opts = Opts::try_parse()?;
    *options() = Options::new(&opts);
    Ok(opts)
}

pub fn print_version() {
    println!("{}", GIT_REPO);
    println!("Build date: {}", BUILD_DATE);
    println!("Commit date: {}", GIT_COMMIT_DATE);
    println!("Branch: {}", GIT_BRANCH);
    println!("Hash: {}", GIT_HASH);
    println!("Tag: {} - {}", GIT_TAG, GIT_IS_DIRTY);
    println!("Author: {}", GIT_AUTHOR);
}

pub fn exe_name() -> String {
    options().exe.clone()
}

pub fn proc_name() -> String {
    options().id.clone()
}

pub fn log_lvl() -> LevelFilter {
    options().log_level
}

pub fn stdout() -> bool {
    options().stdout
}

pub fn config_directory() -> PathBuf {
    env::var("CONFIGURATION_DIRECTORY")
        .map_or_else(|_| PathBuf::from("/etc/rolling-median/"), PathBuf::from)
}

pub fn make_config_file_name(filename: &str, extension: &str) -> PathBuf {
    config_directory()
        .join(exe_name())
        .join(proc_name())
        .join(format!("{}.{}", filename, extension))
}
