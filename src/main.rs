// SPDX-License-Identifier: MPL-2.0
use env_logger::{Builder, Target};
use log::LevelFilter;
use smart_player::app::{self, Flags};
use smart_player::config::{self, paths};
use smart_player::media;
use std::ffi::OsString;
use std::path::PathBuf;

const HELP: &str = "\
Smart Media Player

USAGE:
  smart-player [OPTIONS] [FILE]

ARGS:
  FILE                   Media file to open on startup

OPTIONS:
  --config-dir DIR       Read settings.toml from DIR
  --software-render      Use the CPU renderer instead of the GPU
  -h, --help             Print this help
";

/// Parsed command line.
struct Args {
    file: Option<PathBuf>,
    config_dir: Option<PathBuf>,
    software_render: bool,
}

fn init_logger() {
    Builder::new()
        .target(Target::Stdout)
        .filter_level(LevelFilter::Warn)
        .filter_module("smart_player", LevelFilter::Debug)
        .init();
}

fn parse_args() -> Result<Option<Args>, String> {
    let mut args = pico_args::Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let config_dir: Option<PathBuf> = args
        .opt_value_from_os_str("--config-dir", |s| {
            Ok::<_, std::convert::Infallible>(PathBuf::from(s))
        })
        .map_err(|e| e.to_string())?;
    let software_render = args.contains("--software-render");

    let mut free = args.finish().into_iter();
    let file = free.next();
    if let Some(arg) = file.as_ref().filter(|a| looks_like_flag(a)) {
        return Err(format!("Unknown option: {}", arg.to_string_lossy()));
    }
    if let Some(extra) = free.next() {
        return Err(format!("Unexpected argument: {}", extra.to_string_lossy()));
    }

    Ok(Some(Args {
        file: file.map(PathBuf::from),
        config_dir,
        software_render,
    }))
}

fn looks_like_flag(arg: &OsString) -> bool {
    arg.to_str().is_some_and(|s| s.starts_with('-') && s.len() > 1)
}

/// Exports renderer hints unless the user already set them.
fn apply_backend_hints(render: &config::RenderConfig, force_software: bool) {
    for (name, value) in render.env_hints(force_software) {
        if std::env::var_os(name).is_some() {
            log::debug!("{name} already set, keeping it");
            continue;
        }
        log::debug!("Setting {name}={value}");
        std::env::set_var(name, value);
    }
}

fn main() -> iced::Result {
    if std::env::var("RUST_LOG").is_err() {
        init_logger();
    } else {
        env_logger::init();
    }

    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            print!("{HELP}");
            return Ok(());
        }
        Err(e) => {
            eprintln!("error: {e}\n\n{HELP}");
            std::process::exit(2);
        }
    };

    paths::init_cli_override(args.config_dir);
    let (config, warning) = config::load();
    if let Some(warning) = warning {
        log::warn!("{warning}");
    }

    apply_backend_hints(&config.render, args.software_render);

    if let Err(e) = media::init_ffmpeg() {
        log::error!("{e}");
    }

    log::info!("Starting Smart Media Player v{}", env!("CARGO_PKG_VERSION"));

    app::run(Flags {
        file: args.file,
        config,
    })
}
