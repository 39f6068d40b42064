//! Standalone web server binary
//!
//! Usage: cargo run -p handscope_web --bin handscope-web-server

use handscope_engine::AnalysisConfig;
use handscope_web::{LogFormat, ServerConfig, WebServer};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let mut host = "127.0.0.1".to_string();
    let mut port = 5000u16;
    let mut upload_dir = PathBuf::from("uploads");
    let mut config_path: Option<PathBuf> = None;
    let mut log_format = LogFormat::Text;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--host" | "-h" => {
                host = value_of(&args, i, "--host");
                i += 2;
            }
            "--port" | "-p" => {
                port = value_of(&args, i, "--port").parse().unwrap_or_else(|_| {
                    eprintln!("Error: invalid port number");
                    std::process::exit(1);
                });
                i += 2;
            }
            "--upload-dir" | "-u" => {
                upload_dir = PathBuf::from(value_of(&args, i, "--upload-dir"));
                i += 2;
            }
            "--config" | "-c" => {
                config_path = Some(PathBuf::from(value_of(&args, i, "--config")));
                i += 2;
            }
            "--log-json" => {
                log_format = LogFormat::Json;
                i += 1;
            }
            "--help" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    handscope_web::init_logging(log_format);

    let analysis = match &config_path {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };

    let config = ServerConfig::new(host, port, upload_dir).with_analysis(analysis);

    tracing::info!(
        host = config.host(),
        port = config.port(),
        upload_dir = %config.upload_dir().display(),
        config = ?config_path,
        "starting handscope web server"
    );

    let server = WebServer::new(config)?;
    let handle = server.start().await?;

    println!("Server running at http://{}", handle.address());
    println!("Press Ctrl+C to stop");

    tokio::signal::ctrl_c().await?;

    tracing::info!("shutting down server");
    handle.shutdown().await?;
    tracing::info!("server stopped cleanly");

    Ok(())
}

fn value_of(args: &[String], i: usize, flag: &str) -> String {
    match args.get(i + 1) {
        Some(value) => value.clone(),
        None => {
            eprintln!("Error: {flag} requires a value");
            std::process::exit(1);
        }
    }
}

fn print_help() {
    println!("Handscope Web Server");
    println!();
    println!("Usage: handscope-web-server [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --host, -h <HOST>           Host to bind to (default: 127.0.0.1)");
    println!("  --port, -p <PORT>           Port to bind to (default: 5000)");
    println!("  --upload-dir, -u <DIR>      Scratch directory for uploads (default: uploads)");
    println!("  --config, -c <FILE>         Analysis configuration (TOML)");
    println!("  --log-json                  Emit logs as JSON");
    println!("  --help                      Show this help message");
}
