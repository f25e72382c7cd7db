use anyhow::{anyhow, bail, Context};
use gumdrop::Options;
use scinotes::{
    codec,
    config::Config,
    extract,
    migrate::Version,
    telemetry::Outcome,
    Document, Note, Reporter, TelemetryPoint,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(gumdrop::Options, Debug)]
pub struct Args {
    #[options(help = "Show this message")]
    help: bool,

    #[options(help = "Print the version", short = "V")]
    pub version: bool,

    #[options(help = "Config file location")]
    pub config: Option<PathBuf>,

    #[options(help = "Print the default config file and exit", no_short)]
    pub print_default_config: bool,

    #[options(help = "Write a new document to the file")]
    pub new: bool,

    #[options(help = "Report the last stroke of every note in the file")]
    pub replay: bool,

    #[options(help = "Collector to report to instead of the configured one")]
    pub endpoint: Option<String>,

    #[options(free, help = "File to analyze")]
    pub file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse_args_default_or_exit();

    if args.version {
        println!(
            "SciNotes file util version {} (most recent drawing version {})",
            env!("CARGO_PKG_VERSION"),
            Version::CURRENT
        );
        return Ok(());
    }

    if args.print_default_config {
        let contents = Config::new()
            .to_ron_string()
            .map_err(|err| anyhow!(err.chain()))?;
        println!("{contents}");
        return Ok(());
    }

    let config_path = match args.config {
        Some(path) => path,
        None => Config::config_path().map_err(|err| anyhow!(err.chain()))?,
    };
    let mut config = Config::from_disk(&config_path);
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }

    let Some(file) = args.file else {
        println!("{}", Args::usage());
        return Ok(());
    };

    if args.new {
        if file.exists() {
            bail!("{} already exists", file.display());
        }

        let document = Document::new();
        document.write(&file).map_err(|err| anyhow!(err.chain()))?;
        println!("wrote {} ({})", file.display(), scinotes::DOCUMENT_TYPE);
        return Ok(());
    }

    let bytes = std::fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
    let notes =
        codec::decode(&bytes).map_err(|err| anyhow!("{}: {}", file.display(), err.chain()))?;

    if args.replay {
        return replay(&config, &notes);
    }

    let stored = codec::stored_versions(&bytes)
        .map_err(|err| anyhow!("{}: {}", file.display(), err.chain()))?;

    for (i, (note, stored)) in notes.iter().zip(stored).enumerate() {
        let version = match stored.version {
            Ok(Some(version)) => format!(
                "version {} ({:?})",
                version,
                Version::upgrade_type(version)
            ),
            Ok(None) => String::from("no drawing"),
            Err(err) => format!("unreadable drawing: {}", err.chain()),
        };

        println!(
            "{:>3}  {}  {:?}: {}, {} strokes, {} samples",
            i + 1,
            note.id(),
            note.title(),
            version,
            note.drawing().len(),
            note.drawing().num_samples(),
        );
    }

    Ok(())
}

fn replay(config: &Config, notes: &[Note]) -> anyhow::Result<()> {
    if !config.telemetry_enabled {
        bail!("telemetry is disabled in the config");
    }

    let runtime = tokio::runtime::Runtime::new()?;
    let reporter = Reporter::from_config(config, runtime.handle().clone())
        .map_err(|err| anyhow!(err.chain()))?;
    println!("reporting to {}", reporter.endpoint());

    let mut pending = Vec::new();
    for note in notes {
        let Some(stroke) = note.drawing().last() else {
            println!("{}: nothing drawn", note.id());
            continue;
        };

        let point = extract::extract(stroke, config.resample_interval)
            .map_err(|err| anyhow!("{}: {}", note.id(), err.chain()))?;

        if let Some(handle) = reporter.report(TelemetryPoint::new(point, note.id())) {
            pending.push((note.id(), point, handle));
        }
    }

    runtime.block_on(async {
        for (id, point, handle) in pending {
            match handle.await {
                Ok(Outcome::Delivered(status)) => println!("{id}: sent {point} ({status})"),
                Ok(Outcome::Rejected { status, body }) => {
                    println!("{id}: rejected with {status} {body}")
                }
                Ok(Outcome::Transport(err)) => println!("{id}: {err}"),
                Err(err) => println!("{id}: {err}"),
            }
        }
    });

    Ok(())
}
