use std::path::PathBuf;

use anyhow::{anyhow, bail};
use eframe::egui;
use template_annotate::app::AnnotateApp;
use template_annotate::config::Config;

const USAGE: &str = "Usage: template-annotate <image.png|jpg> [fields.yaml] [--config <config.json>]";

#[derive(Debug, PartialEq)]
struct Args {
    image: PathBuf,
    document: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<Args> {
    let mut positional = Vec::new();
    let mut config = None;
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().ok_or_else(|| anyhow!("--config needs a path"))?;
                config = Some(PathBuf::from(path));
            }
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            _ => positional.push(PathBuf::from(arg)),
        }
    }
    let mut positional = positional.into_iter();
    let Some(image) = positional.next() else {
        bail!("missing image path");
    };
    let document = positional.next();
    if let Some(extra) = positional.next() {
        bail!("unexpected argument {}", extra.display());
    }
    Ok(Args {
        image,
        document,
        config,
    })
}

fn run() -> anyhow::Result<()> {
    let args = parse_args(std::env::args().skip(1))?;
    if !args.image.exists() {
        bail!("file not found: {}", args.image.display());
    }
    let config = Config::load(args.config.as_deref())?;

    let title = format!(
        "template-annotate - {}",
        args.image
            .file_name()
            .unwrap_or_default()
            .to_str()
            .unwrap_or("")
    );
    let app = AnnotateApp::new(args.image, args.document, config)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title(&title),
        ..Default::default()
    };

    eframe::run_native(&title, options, Box::new(move |_cc| Ok(Box::new(app))))
        .map_err(|err| anyhow!("running window: {err}"))
}

// ── Main ────────────────────────────────────────────────────────────────────

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        log::error!("{err:#}");
        eprintln!("{USAGE}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> anyhow::Result<Args> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn image_document_and_config() {
        assert_eq!(
            args(&["id.png", "--config", "c.json", "id.yaml"]).unwrap(),
            Args {
                image: "id.png".into(),
                document: Some("id.yaml".into()),
                config: Some("c.json".into()),
            }
        );
        assert_eq!(args(&["id.png"]).unwrap().document, None);
    }

    #[test]
    fn bad_arguments() {
        assert!(args(&[]).is_err());
        assert!(args(&["a.png", "b.yaml", "c"]).is_err());
        assert!(args(&["a.png", "--config"]).is_err());
        assert!(args(&["a.png", "--verbose"]).is_err());
    }
}
