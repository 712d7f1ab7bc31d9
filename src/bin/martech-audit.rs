//! CLI tool for auditing a website's MarTech stack

use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use martech_audit::{
    analyze_website, calculate_scores, AuditConfig, AuditResult, HealthScores, Rating,
    VendorCategory,
};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "martech-audit")]
#[command(about = "Audit a website's MarTech stack: tracking setup, privacy compliance, and performance", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to custom configuration file (TOML)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Disable the local result cache
    #[arg(long)]
    no_cache: bool,

    /// PageSpeed Insights API key (overrides the PSI_API_KEY env variable)
    #[arg(long)]
    api_key: Option<String>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an audit and display a summary
    Scan {
        /// Website URL to analyze
        url: String,

        /// Display the third-party resource table
        #[arg(long)]
        detailed: bool,
    },

    /// Generate a full audit report
    Report {
        /// Website URL to analyze
        url: String,

        /// Output format
        #[arg(short = 'f', long, default_value = "markdown")]
        format: ReportFormat,

        /// Output file (default: stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Check audit scores against thresholds (exit code based)
    Check {
        /// Website URL to analyze
        url: String,

        /// Minimum acceptable tracking score (0-10)
        #[arg(long, default_value = "0")]
        min_tracking: u8,

        /// Minimum acceptable privacy score (0-10)
        #[arg(long, default_value = "0")]
        min_privacy: u8,

        /// Minimum acceptable performance score (0-10)
        #[arg(long, default_value = "0")]
        min_performance: u8,
    },
}

#[derive(Clone, Debug)]
enum ReportFormat {
    Json,
    Markdown,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // Load configuration
    let mut config = if let Some(config_path) = &cli.config {
        match load_config(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{} Failed to load config: {}", "Error:".red().bold(), e);
                process::exit(1);
            }
        }
    } else {
        AuditConfig::default()
    };

    if cli.no_cache {
        config.cache.enabled = false;
    }
    if let Some(key) = &cli.api_key {
        config.network.api_key = Some(key.clone());
    }

    let url = match &cli.command {
        Commands::Scan { url, .. } | Commands::Report { url, .. } | Commands::Check { url, .. } => {
            url.clone()
        }
    };

    // Run audit
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message("Analyzing website... this may take 15-30 seconds");
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let result = analyze_website(&url, &config).await;

    spinner.finish_and_clear();

    let result = match result {
        Ok(result) => result,
        Err(e) if e.is_rate_limited() => {
            eprintln!("{} {}", "Rate limited:".yellow().bold(), e);
            eprintln!(
                "The measurement API quota is temporarily exhausted. Try again in a few \
                 minutes, or request a manual audit."
            );
            process::exit(1);
        }
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    };

    let scores = calculate_scores(&result);

    // Handle subcommand
    match cli.command {
        Commands::Scan { detailed, .. } => {
            display_summary(&result, &scores);

            if detailed {
                println!();
                display_third_parties(&result);
            }
        }

        Commands::Report { format, output, .. } => {
            let content = match format {
                ReportFormat::Json => generate_json_report(&result, &scores),
                ReportFormat::Markdown => generate_markdown_report(&result, &scores),
            };

            if let Some(output_path) = output {
                match std::fs::write(&output_path, content) {
                    Ok(_) => println!("Report written to: {}", output_path.display()),
                    Err(e) => {
                        eprintln!("{} Failed to write report: {}", "Error:".red().bold(), e);
                        process::exit(1);
                    }
                }
            } else {
                println!("{}", content);
            }
        }

        Commands::Check {
            min_tracking,
            min_privacy,
            min_performance,
            ..
        } => {
            let mut failures = Vec::new();

            if scores.tracking < min_tracking {
                failures.push(format!(
                    "  - tracking score {} < {}",
                    scores.tracking, min_tracking
                ));
            }
            if scores.privacy < min_privacy {
                failures.push(format!(
                    "  - privacy score {} < {}",
                    scores.privacy, min_privacy
                ));
            }
            if scores.performance < min_performance {
                failures.push(format!(
                    "  - performance score {} < {}",
                    scores.performance, min_performance
                ));
            }

            if !failures.is_empty() {
                eprintln!(
                    "{} {} check failures for {}:",
                    "Failed:".red().bold(),
                    failures.len(),
                    result.url
                );
                for failure in failures {
                    eprintln!("{}", failure);
                }
                process::exit(1);
            } else {
                println!("{} All checks passed!", "Success:".green().bold());
            }
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_config(path: &PathBuf) -> Result<AuditConfig, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let config: AuditConfig = toml::from_str(&content)?;
    Ok(config)
}

fn score_colored(score: u8) -> ColoredString {
    let text = format!("{}/10", score);
    if score >= 7 {
        text.green()
    } else if score >= 4 {
        text.yellow()
    } else {
        text.red()
    }
}

fn rating_colored(text: String, rating: Rating) -> ColoredString {
    match rating {
        Rating::Good => text.green(),
        Rating::NeedsImprovement => text.yellow(),
        Rating::Poor => text.red(),
    }
}

fn display_summary(result: &AuditResult, scores: &HealthScores) {
    println!("\n{}", "=== MarTech Health Score ===".bold());
    println!("URL: {}", result.url.cyan());
    println!();
    println!("  Tracking Setup:       {}", score_colored(scores.tracking));
    println!("  Privacy & Compliance: {}", score_colored(scores.privacy));
    println!("  Performance:          {}", score_colored(scores.performance));

    for (title, category) in [
        ("Google Stack", VendorCategory::Google),
        ("Social & Advertising", VendorCategory::Social),
        ("Consent Management", VendorCategory::Consent),
        ("Analytics & UX Tools", VendorCategory::Analytics),
    ] {
        println!("\n{}", format!("=== {} ===", title).bold());
        for detection in result.martech.iter().filter(|m| m.category == category) {
            if detection.detected {
                println!("  {} {}", "✓".green(), detection.name);
                if let Some(rec) = &detection.recommendation {
                    println!("    {} {}", "!".yellow(), rec.yellow());
                }
            } else {
                println!("  {} {}", "✗".dimmed(), detection.name.dimmed());
            }
        }

        let none_detected = !result
            .martech
            .iter()
            .any(|m| m.detected && m.category == category);
        if category == VendorCategory::Consent && none_detected {
            println!(
                "  {}",
                "No consent management platform detected. This is required for GDPR compliance."
                    .red()
            );
        }
    }

    println!("\n{}", "=== Core Web Vitals ===".bold());
    println!(
        "  Largest Contentful Paint (LCP):  {}",
        rating_colored(
            format!("{:.1}s", result.performance.lcp.value / 1000.0),
            result.performance.lcp.rating
        )
    );
    println!(
        "  First Contentful Paint (FCP):    {}",
        rating_colored(
            format!("{:.1}s", result.performance.fcp.value / 1000.0),
            result.performance.fcp.rating
        )
    );
    println!(
        "  Max Potential FID:               {}",
        rating_colored(
            format!("{}ms", result.performance.fid.value),
            result.performance.fid.rating
        )
    );
    println!(
        "  Cumulative Layout Shift (CLS):   {}",
        rating_colored(
            format!("{}", result.performance.cls.value),
            result.performance.cls.rating
        )
    );
    println!(
        "  Third-party scripts detected: {}",
        result.third_party_count.to_string().bold()
    );

    if !result.recommendations.is_empty() {
        println!("\n{}", "=== Recommendations ===".bold());
        for (idx, rec) in result.recommendations.iter().enumerate() {
            println!("  {}. {}", idx + 1, rec);
        }
    }
}

fn display_third_parties(result: &AuditResult) {
    println!("{}", "=== Third Parties ===".bold());

    if result.third_parties.is_empty() {
        println!("  none reported");
        return;
    }

    for entry in &result.third_parties {
        println!(
            "  {:<30} {:>10}  {}",
            entry.name,
            format_bytes(entry.transfer_size),
            entry.url.dimmed()
        );
    }
}

fn format_bytes(bytes: u64) -> String {
    if bytes >= 1_048_576 {
        format!("{:.1} MiB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.1} KiB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

fn generate_json_report(result: &AuditResult, scores: &HealthScores) -> String {
    let report = serde_json::json!({
        "result": result,
        "scores": scores,
    });
    serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
        eprintln!("Failed to serialize report: {}", e);
        process::exit(1);
    })
}

fn generate_markdown_report(result: &AuditResult, scores: &HealthScores) -> String {
    let mut md = String::new();

    md.push_str(&format!("# MarTech Audit Report: {}\n\n", result.url));
    md.push_str(&format!("**Generated:** {}\n\n", result.timestamp));

    md.push_str("## Health Scores\n\n");
    md.push_str(&format!("- Tracking Setup: {}/10\n", scores.tracking));
    md.push_str(&format!("- Privacy & Compliance: {}/10\n", scores.privacy));
    md.push_str(&format!("- Performance: {}/10\n\n", scores.performance));

    md.push_str("## Detections\n\n");
    md.push_str("| Vendor | Category | Detected | Recommendation |\n");
    md.push_str("|--------|----------|----------|----------------|\n");
    for detection in &result.martech {
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            detection.name,
            detection.category,
            if detection.detected { "yes" } else { "no" },
            detection.recommendation.as_deref().unwrap_or("-")
        ));
    }

    md.push_str("\n## Core Web Vitals\n\n");
    md.push_str(&format!(
        "- Performance score: {}/100\n",
        result.performance.score
    ));
    md.push_str(&format!(
        "- LCP: {}ms ({})\n",
        result.performance.lcp.value, result.performance.lcp.rating
    ));
    md.push_str(&format!(
        "- FCP: {}ms ({})\n",
        result.performance.fcp.value, result.performance.fcp.rating
    ));
    md.push_str(&format!(
        "- Max Potential FID: {}ms ({})\n",
        result.performance.fid.value, result.performance.fid.rating
    ));
    md.push_str(&format!(
        "- CLS: {} ({})\n",
        result.performance.cls.value, result.performance.cls.rating
    ));
    md.push_str(&format!(
        "- Third parties: {}\n",
        result.third_party_count
    ));

    if !result.recommendations.is_empty() {
        md.push_str("\n## Recommendations\n\n");
        for (idx, rec) in result.recommendations.iter().enumerate() {
            md.push_str(&format!("{}. {}\n", idx + 1, rec));
        }
    }

    md
}
