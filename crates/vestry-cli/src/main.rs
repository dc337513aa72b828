//! Vestry CLI: upload, resolve and configure parish-site images.
//!
//! Reads process configuration from the environment (or `.env`): SUPABASE_URL,
//! SUPABASE_KEY, STORAGE_BACKEND, SETTINGS_BACKEND and friends.

use anyhow::Context;
use clap::builder::BoolishValueParser;
use clap::{Parser, Subcommand};
use serde::Serialize;
use vestry_cli::{build_services, content_type_for, init_tracing, transform_options};
use vestry_core::{Config, FileUpload, MediaReference, MediaSettingsUpdate, UploadOutcome, UploadPolicy};
use vestry_media::FallbackPolicy;

#[derive(Parser)]
#[command(name = "vestry", about = "Parish site media CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload an image to the CDN or the fallback bucket
    Upload {
        /// Path to the image
        file: std::path::PathBuf,
        /// Destination folder label (e.g. albums, popups, site-assets)
        #[arg(long)]
        folder: String,
        /// Prefix for generated bucket object names (e.g. popup)
        #[arg(long)]
        prefix: Option<String>,
        /// Report a CDN failure instead of retrying on the bucket
        #[arg(long)]
        no_fallback: bool,
    },
    /// Print the delivery URL for a stored reference
    Resolve {
        /// CDN asset identifier
        #[arg(long)]
        public_id: Option<String>,
        /// Direct image URL
        #[arg(long)]
        url: Option<String>,
        /// Width in pixels
        #[arg(long)]
        width: Option<u32>,
        /// Height in pixels
        #[arg(long)]
        height: Option<u32>,
        /// Quality 1-100 or "auto"
        #[arg(long)]
        quality: Option<String>,
        /// Output format: auto, webp, avif, jpg, png, gif
        #[arg(long)]
        format: Option<String>,
        /// CDN transform string, e.g. "w_400,q_85"
        #[arg(long)]
        transform: Option<String>,
    },
    /// Media settings operations
    Settings {
        #[command(subcommand)]
        sub: SettingsCommands,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Show the current media configuration (credentials masked)
    Show,
    /// Save media settings; omitted options are left unchanged
    Save {
        #[arg(long)]
        cloud_name: Option<String>,
        #[arg(long)]
        api_key: Option<String>,
        #[arg(long)]
        api_secret: Option<String>,
        #[arg(long)]
        upload_preset: Option<String>,
        #[arg(long, value_parser = BoolishValueParser::new())]
        cdn_enabled: Option<bool>,
        #[arg(long, value_parser = BoolishValueParser::new())]
        storage_enabled: Option<bool>,
    },
    /// Check the CDN credentials against the CDN admin API
    Verify,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let services = build_services(&config).await?;

    match cli.command {
        Commands::Upload {
            file,
            folder,
            prefix,
            no_fallback,
        } => {
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .context("Upload path has no file name")?;
            let content_type = content_type_for(&file_name)
                .with_context(|| format!("Unsupported image type: {}", file_name))?;
            let data = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;

            let mut upload = FileUpload::new(file_name, content_type, data);
            if let Some(prefix) = prefix {
                upload = upload.with_prefix(prefix);
            }
            UploadPolicy::default().validate(&upload)?;

            let policy = if no_fallback {
                FallbackPolicy::Never
            } else {
                FallbackPolicy::OnCdnFailure
            };
            let outcome = services.router.upload(&upload, &folder, policy).await;
            print_json(&outcome)?;

            if let UploadOutcome::Failed(failure) = outcome {
                anyhow::bail!("Upload failed: {}", failure.reason);
            }
        }
        Commands::Resolve {
            public_id,
            url,
            width,
            height,
            quality,
            format,
            transform,
        } => {
            let reference = MediaReference {
                public_id: public_id.filter(|s| !s.trim().is_empty()),
                url: url.filter(|s| !s.trim().is_empty()),
            };
            let options = transform_options(
                transform.as_deref(),
                width,
                height,
                quality.as_deref(),
                format.as_deref(),
            )?;
            let resolved = services.resolver.resolve(&reference, &options).await;
            print_json(&serde_json::json!({ "url": resolved }))?;
        }
        Commands::Settings { sub } => match sub {
            SettingsCommands::Show => {
                let current = services.config.get().await;
                print_json(&current.redacted())?;
            }
            SettingsCommands::Save {
                cloud_name,
                api_key,
                api_secret,
                upload_preset,
                cdn_enabled,
                storage_enabled,
            } => {
                let update = MediaSettingsUpdate {
                    cloud_name,
                    api_key,
                    api_secret,
                    upload_preset,
                    cdn_enabled,
                    storage_enabled,
                };
                if update.is_empty() {
                    anyhow::bail!("Nothing to save: pass at least one setting");
                }
                services.config.save(&update).await?;
                let current = services.config.get().await;
                print_json(&current.redacted())?;
            }
            SettingsCommands::Verify => {
                let current = services.config.get().await;
                services
                    .cdn
                    .verify_credentials(&current)
                    .await
                    .context("CDN credential check failed")?;
                print_json(&serde_json::json!({ "success": true, "message": "CDN credentials accepted" }))?;
            }
        },
    }

    Ok(())
}
