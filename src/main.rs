use anyhow::Result;
use clap::{Parser, Subcommand};
use hairstyle_client::app::App;
use hairstyle_client::image::NoticeCallback;
use hairstyle_client::models::UploadedImage;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "hairstyle-client")]
#[command(about = "Client for the hairstyle recommendation backend")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze a face photo and print hairstyle recommendations
    Analyze {
        /// Path to the photo (JPEG, PNG, or BMP)
        image: PathBuf,
    },
    /// Apply a hairstyle to a face photo
    Transform {
        /// Path to the photo (JPEG or PNG)
        image: PathBuf,
        /// Hairstyle identifier, e.g. "buzz_cut"
        #[arg(long)]
        style: String,
        /// Hair color; empty keeps the original color
        #[arg(long, default_value = "")]
        color: String,
    },
    /// Search the hairstyle catalog (empty query lists everything)
    Search {
        #[arg(default_value = "")]
        query: String,
    },
    /// Show login status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hairstyle_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    match App::new() {
        Ok(app) => match run(&app, args.command).await {
            Ok(_) => Ok(()),
            Err(e) => {
                error!("Command failed: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run(app: &App, command: Command) -> hairstyle_client::Result<()> {
    let notice: &NoticeCallback = &|message: &str| println!("{}", message);

    match command {
        Command::Analyze { image } => {
            let file = UploadedImage::from_path(&image)?;
            info!("Analyzing {} ({:.2} MB)", file.name, file.size() as f64 / 1024.0 / 1024.0);

            let analysis = app.analyze(&file, Some(notice)).await?;

            println!("Face shape: {}", analysis.face_shape_kr);
            println!("Gender: {}", analysis.gender_kr);
            println!("Why: {}", analysis.reason);
            println!("Recommended styles:");
            for rec in &analysis.recommendations {
                println!("  - {} ({})", rec.name, rec.value);
            }
        }
        Command::Transform {
            image,
            style,
            color,
        } => {
            let file = UploadedImage::from_path(&image)?;
            info!("Transforming {} with style {}", file.name, style);

            let result = app.transform(&file, &style, &color, Some(notice)).await?;
            println!("Result image: {}", result.result_image_url);
        }
        Command::Search { query } => {
            let results = app.search(&query).await?;
            if results.results.is_empty() {
                println!("No hairstyles found.");
            } else {
                for entry in &results.results {
                    println!("{}", entry.name);
                    if let Some(description) = &entry.description {
                        println!("  {}", description);
                    }
                    if let Some(similar) = &entry.similar_styles_description {
                        println!("  Similar: {}", similar);
                    }
                }
            }
        }
        Command::Status => {
            let status = app.auth_status().await;
            if status.logged_in {
                let who = status
                    .user
                    .and_then(|u| u.name.or(u.email))
                    .unwrap_or_else(|| "unknown user".to_string());
                println!("Logged in as {}", who);
            } else {
                println!("Not logged in.");
            }
        }
    }

    Ok(())
}
