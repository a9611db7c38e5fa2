use anyhow::{bail, Result};
use eframe::egui::{IconData, ViewportBuilder};
use std::path::PathBuf;
use studydesk::config::AppPaths;
use studydesk::core::backend::backend_for;
use studydesk::native::{AppContext, StudyDeskApp};

const USAGE: &str = "\
Usage: studydesk [--data-dir <path>]

Options:
  --data-dir <path>  Directory holding settings.json, config.json,
                     todo_list.json and exported essays (default: current directory)
  -h, --help         Print this help

Environment:
  COHERE_API_KEY     API key for online generation (overrides config.json)
  RUST_LOG           Log filter (default: info)";

struct Args {
    data_dir: Option<PathBuf>,
}

/// `None` when help was requested.
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<Args>> {
    let mut parsed = Args { data_dir: None };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--data-dir" => match args.next() {
                Some(dir) => parsed.data_dir = Some(PathBuf::from(dir)),
                None => bail!("--data-dir needs a path\n\n{USAGE}"),
            },
            other => bail!("unknown argument '{other}'\n\n{USAGE}"),
        }
    }
    Ok(Some(parsed))
}

fn load_icon() -> Option<IconData> {
    let bytes = std::fs::read("icon.png").ok()?;
    let image = image::load_from_memory(&bytes).ok()?.into_rgba8();
    let (width, height) = image.dimensions();
    Some(IconData {
        rgba: image.into_raw(),
        width,
        height,
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(args) = parse_args(std::env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };
    let paths = match args.data_dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir)?;
            AppPaths::new(dir)
        }
        None => AppPaths::from_cwd(),
    };

    let context = AppContext::load(paths);
    let backend = backend_for(context.api_key.as_deref());

    let mut viewport = ViewportBuilder::default()
        .with_inner_size([1100.0, 760.0])
        .with_min_inner_size([860.0, 600.0])
        .with_title("StudyDesk");
    if let Some(icon) = load_icon() {
        viewport = viewport.with_icon(icon);
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    log::info!("starting StudyDesk");
    eframe::run_native(
        "StudyDesk",
        options,
        Box::new(move |_cc| Ok(Box::new(StudyDeskApp::new(context, backend)))),
    )
    .map_err(|err| anyhow::anyhow!(err.to_string()))
}
