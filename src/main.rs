use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use webscope::{Config, ExportFormat, Exporter, Investigator};

#[derive(Parser)]
#[command(name = "webscope")]
#[command(about = "Investigate a website's DNS, ownership and tech stack and export a report")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Investigate a target domain and export the report
    Investigate {
        /// Target domain or URL (https is assumed when no scheme is given)
        domain: String,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory for exported reports
        #[arg(short, long, default_value = "./webscope-output")]
        output: PathBuf,

        /// Export format
        #[arg(long, value_enum, default_value_t = FormatArg::All)]
        format: FormatArg,

        /// Skip the LLM-generated site description
        #[arg(long)]
        skip_narrative: bool,
    },
    /// Generate a default configuration file
    Config {
        /// Output path for the config file (defaults to ~/.webscope.toml)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(clap::ValueEnum, Clone, Copy)]
enum FormatArg {
    Json,
    Csv,
    Pdf,
    All,
}

impl FormatArg {
    fn formats(self) -> Vec<ExportFormat> {
        match self {
            FormatArg::Json => vec![ExportFormat::Json],
            FormatArg::Csv => vec![ExportFormat::Csv],
            FormatArg::Pdf => vec![ExportFormat::Pdf],
            FormatArg::All => vec![ExportFormat::Json, ExportFormat::Csv, ExportFormat::Pdf],
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Investigate {
            domain,
            config,
            output,
            format,
            skip_narrative,
        } => {
            investigate(domain, config, output, format, skip_narrative).await?;
        }
        Commands::Config { output } => {
            generate_config(output)?;
        }
    }

    Ok(())
}

async fn investigate(
    domain: String,
    config_path: Option<PathBuf>,
    output_path: PathBuf,
    format: FormatArg,
    skip_narrative: bool,
) -> anyhow::Result<()> {
    println!("🔎 Starting Website Investigation");
    println!("=================================");

    let start_time = Instant::now();

    let config = if let Some(config_path) = config_path {
        Config::from_file(&config_path)?
    } else {
        Config::load()?
    };

    println!("🎯 Target: {}", domain);
    println!("📤 Output directory: {}", output_path.display());
    if skip_narrative {
        println!("⚡ Skipping narrative generation");
    }

    let investigator = Investigator::with_defaults(&config)?;
    let investigation = investigator.run(&domain, !skip_narrative).await?;

    println!("\n📋 Step status ({}):", investigation.generated_at);
    for step in &investigation.steps {
        match &step.detail {
            None => println!("   ✅ {}", step.name),
            Some(detail) => println!("   ❌ {}: {}", step.name, detail),
        }
    }
    if let Some(ip) = &investigation.resolved_ip {
        println!("\n🌐 Resolved IP: {}", ip);
    }

    println!("\n📊 Exporting report...");
    let exporter = Exporter::new();
    let exported_files =
        exporter.export_report(&investigation.report, &output_path, &format.formats())?;

    let duration = start_time.elapsed();
    println!("\n✅ Investigation completed in {:.2}s", duration.as_secs_f64());
    println!("📁 Reports exported to:");
    for file in exported_files {
        println!("   - {}", file.display());
    }

    Ok(())
}

fn generate_config(output_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config_path = output_path.unwrap_or_else(|| {
        Config::default_config_path().unwrap_or_else(|_| PathBuf::from("webscope.toml"))
    });

    println!("📝 Generating configuration file: {}", config_path.display());

    let documented_config = Config::create_documented_config();
    std::fs::write(&config_path, documented_config)?;

    println!("✅ Configuration file created successfully!");
    println!("💡 Edit the file to customize timeouts, endpoints and credentials.");
    println!();
    println!("🔧 Key configuration areas:");
    println!("  • Narrative service model and API key (OPENAI_API_KEY)");
    println!("  • Traceroute API token (IPINFO_TOKEN)");
    println!("  • Collector timeout and User-Agent");

    Ok(())
}
