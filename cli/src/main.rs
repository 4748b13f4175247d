mod camera;
mod config;
mod error;
mod predictor;
mod sink;
#[cfg(test)]
mod test_server;

use std::path::PathBuf;
use std::process::ExitCode;

use camera::SnapshotCamera;
use clap::{Parser, Subcommand};
use config::{Overrides, Settings};
use error::CliError;
use predictor::HttpPredictor;
use shared::export::results_text;
use shared::{RawUpload, Session};
use sink::DirectorySink;

#[derive(Debug, Parser)]
#[command(name = "skinscan", version, about = "Classify a skin photo and export the result")]
struct Cli {
    /// YAML file with `endpoint`, `max_width`, `max_height` and `output_dir`
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Prediction endpoint, e.g. http://localhost:5000/predict
    #[arg(long, global = true, env = "SKINSCAN_ENDPOINT")]
    endpoint: Option<String>,

    #[arg(long, global = true, env = "SKINSCAN_MAX_WIDTH")]
    max_width: Option<u32>,

    #[arg(long, global = true, env = "SKINSCAN_MAX_HEIGHT")]
    max_height: Option<u32>,

    /// Directory that receives results.txt / results_and_image.zip
    #[arg(long, global = true, env = "SKINSCAN_OUTPUT_DIR")]
    out: Option<PathBuf>,

    /// Print the prediction without saving anything
    #[arg(long, global = true)]
    no_export: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resize an image file and classify it
    Upload { file: PathBuf },
    /// Snapshot the camera and classify the full-resolution frame
    Capture {
        #[arg(long, env = "SKINSCAN_CAMERA")]
        device: PathBuf,
    },
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            endpoint: self.endpoint.clone(),
            max_width: self.max_width,
            max_height: self.max_height,
            output_dir: self.out.clone(),
            no_export: self.no_export,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let settings = Settings::load(cli.config.as_deref(), cli.overrides())?;
    let predictor = HttpPredictor::new(settings.client.endpoint.clone())?;
    let mut session: Session<SnapshotCamera> = Session::new();

    match cli.command {
        Command::Upload { file } => {
            let bytes = tokio::fs::read(&file)
                .await
                .map_err(|source| CliError::Read {
                    path: file.clone(),
                    source,
                })?;
            let file_name = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned());
            let upload = RawUpload::new(file_name, None, bytes);

            session
                .upload(&upload, settings.client.limits(), &predictor)
                .await?;
        }
        Command::Capture { device } => {
            session.start_camera(SnapshotCamera::open(device)?)?;
            session.capture(&predictor).await?;
        }
    }

    if let Some(result) = session.prediction() {
        println!("{}", results_text(result));
    }

    if settings.export {
        let mut sink = DirectorySink::new(&settings.output_dir);
        session.download(&mut sink)?;
        for path in sink.saved() {
            println!("Saved {}", path.display());
        }
    }

    Ok(())
}
