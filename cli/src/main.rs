// Licensed under the Apache-2.0 license

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::LevelFilter;
use registers_model::RootNode;
use registers_pdf::{DefaultPages, ExportOptions, ExportSettings, PdfExporter, TemplateConfig};
use simple_logger::SimpleLogger;
use std::path::PathBuf;

fn existing_file(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.is_file() {
        Ok(path)
    } else {
        Err(format!("{s} is not a valid path"))
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "rdl-pdf",
    author,
    version,
    about = "Generate a PDF register description document from an elaborated SystemRDL model"
)]
struct Cli {
    /// Elaborated model (.json, .hjson or .toml)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output PDF file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Render instance names in uppercase (true, the default) or lowercase (false)
    #[arg(long, value_name = "BOOL")]
    use_uppercase_inst_name: Option<bool>,

    /// TOML file configuring the cover page and footer
    #[arg(long, value_name = "FILE", value_parser = existing_file)]
    template_path: Option<PathBuf>,

    /// TOML file with exporter options
    #[arg(long, value_name = "FILE", value_parser = existing_file)]
    options: Option<PathBuf>,

    /// Only export the top-level addrmap with this instance name
    #[arg(long, value_name = "NAME")]
    top: Option<String>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    fn export_options(&self) -> Result<ExportOptions> {
        let mut options = match &self.options {
            Some(path) => ExportOptions::from_settings(&ExportSettings::from_path(path)?),
            None => ExportOptions::default(),
        };
        if let Some(uppercase) = self.use_uppercase_inst_name {
            options = options.use_uppercase_inst_name(uppercase);
        }
        if let Some(path) = &self.template_path {
            options = options.page_template(DefaultPages::new(TemplateConfig::from_path(path)?)?);
        }
        Ok(options)
    }
}

fn run(cli: &Cli) -> Result<()> {
    let root = RootNode::from_path(&cli.input)?;
    let exporter = PdfExporter::new(cli.export_options()?);
    match &cli.top {
        Some(name) => {
            let map = root
                .find_top(name)
                .with_context(|| format!("no top-level addrmap named {name:?}"))?;
            exporter.export(map, &cli.output)
        }
        None => exporter.export(&root, &cli.output),
    }
}

fn main() {
    let cli = Cli::parse();

    let _ = SimpleLogger::new().with_level(cli.log_level()).init();

    if let Err(e) = run(&cli) {
        eprintln!("Failed to export {}: {e:#}", cli.input.display());
        std::process::exit(1);
    }
}
