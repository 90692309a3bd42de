use anyhow::{Context, Result};
use backend::config::TurretConfig;
use backend::cv::ColorDetector;
use backend::device::open_serial;
use backend::{list_devices, Turret};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "turret", about = "Camera-aimed sentry turret controller")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, env = "TURRET_CONFIG")]
    config: Option<PathBuf>,

    /// Serial port override.
    #[arg(long)]
    port: Option<String>,

    /// Camera index override.
    #[arg(long)]
    camera: Option<i32>,

    /// List available serial ports and exit.
    #[arg(long)]
    list_ports: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if args.list_ports {
        for port in list_devices()? {
            println!("{}", port.display());
        }
        return Ok(());
    }

    let mut config = TurretConfig::load(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.serial.port = port;
    }
    if let Some(camera) = args.camera {
        config.camera.index = camera;
    }

    let port = open_serial(&config.serial)
        .with_context(|| format!("opening serial port {}", config.serial.port))?;
    log::info!(
        "serial link open on {} at {} baud",
        config.serial.port,
        config.serial.baud
    );

    let mut front = ColorDetector::open(config.clone())
        .with_context(|| format!("opening camera {}", config.camera.index))?;
    log::info!("camera {} open", config.camera.index);

    let result = Turret::new(config, port).run(&mut front);
    if let Err(e) = front.close() {
        log::warn!("failed to release the camera: {e}");
    }
    result.context("control loop failed")?;
    Ok(())
}
