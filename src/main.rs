//! resume-matcher: resume profile extraction and job ranking

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use resume_matcher::cli::{self, Cli, Commands, ConfigAction};
use resume_matcher::config::{Config, OutputFormat};
use resume_matcher::output::formatter::{save_report_to_file, suggest_filename};
use resume_matcher::output::{MatchReport, ProfileReport, ReportGenerator, ReportMetadata};
use resume_matcher::processing::insights::{career_summary, profile_insights};
use resume_matcher::processing::query::{generate_search_query, FileJobSource, JobSearchRequest, JobSource};
use resume_matcher::processing::text_processor::TextProcessor;
use resume_matcher::{Extraction, ExtractionChain, JobMatcher, ProfileExtractor, Result, ResumeMatcherError};
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

const RESUME_EXTENSIONS: &[&str] = &["pdf", "txt", "md", "markdown"];

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Extract { file } => {
            let extraction = extract_resume(&file, &config).await?;
            let words = TextProcessor::new().word_count(&extraction.text);
            println!("📄 {} ({} words, extracted with {})\n", file.display(), words, extraction.backend);
            println!("{}", extraction.text);
            Ok(())
        }

        Commands::Analyze { resume, output, detailed, save } => {
            let format = output_format(output.as_deref(), &config)?;
            let started = Instant::now();

            let extraction = extract_resume(&resume, &config).await?;
            let extractor = ProfileExtractor::new(&config.analysis)?;
            let profile = extractor.extract_profile(&extraction.text);
            info!(
                "Profile: {} skills, level {}, confidence {:.2}",
                profile.skills.len(),
                profile.experience_level,
                profile.confidence_score
            );

            let report = ProfileReport {
                skills_by_category: extractor.skill_matcher().categorize(&profile.skills),
                insights: profile_insights(&profile),
                profile,
                metadata: metadata_for(&resume, &extraction, started),
            };

            let generator = report_generator(&config, detailed, format);
            let rendered = generator.generate_profile(&report, format)?;
            emit(&rendered, save.as_deref(), format, &resume)
        }

        Commands::Match {
            resume,
            jobs,
            query,
            auto_query,
            location,
            page,
            per_page,
            limit,
            output,
            detailed,
            save,
        } => {
            let format = output_format(output.as_deref(), &config)?;
            let started = Instant::now();

            let extraction = extract_resume(&resume, &config).await?;
            let extractor = ProfileExtractor::new(&config.analysis)?;
            let profile = extractor.extract_profile(&extraction.text);

            let source = FileJobSource::from_path(&jobs)?;
            let request = if auto_query {
                JobSearchRequest::for_profile(&profile)
            } else {
                let text = query.filter(|q| !q.trim().is_empty()).unwrap_or_default();
                if text.is_empty() {
                    info!("Suggested search query: {}", generate_search_query(&profile));
                }
                JobSearchRequest::new(&text)
            };
            let request = request.with_location(location).with_page(page, per_page);
            let search_query = Some(request.text.clone()).filter(|t| !t.is_empty());
            let postings = source.search(&request)?;

            let mut scoring = config.scoring.clone();
            if let Some(limit) = limit {
                scoring.max_results = limit;
            }
            let matches = JobMatcher::new(&scoring).top_matches(&profile, &postings);
            info!("{} of {} postings passed the minimum score", matches.len(), postings.len());
            let career = career_summary(&profile, &matches, extractor.skill_matcher());

            let report = MatchReport {
                profile,
                search_query,
                jobs_considered: postings.len(),
                matches,
                career,
                metadata: metadata_for(&resume, &extraction, started),
            };

            let generator = report_generator(&config, detailed, format);
            let rendered = generator.generate_matches(&report, format)?;
            emit(&rendered, save.as_deref(), format, &resume)
        }

        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => {
                let content = toml::to_string_pretty(&config).map_err(|e| {
                    ResumeMatcherError::Configuration(format!("Failed to serialize config: {}", e))
                })?;
                println!("{}", content);
                Ok(())
            }
            ConfigAction::Reset => {
                Config::default().save_to(config_path)?;
                println!("✅ Configuration reset: {}", config_path.display());
                Ok(())
            }
            ConfigAction::Path => {
                println!("{}", config_path.display());
                Ok(())
            }
        },
    }
}

async fn extract_resume(path: &Path, config: &Config) -> Result<Extraction> {
    cli::validate_file_extension(path, RESUME_EXTENSIONS)
        .map_err(|e| ResumeMatcherError::InvalidInput(format!("Resume file: {}", e)))?;

    let chain = ExtractionChain::from_config(&config.extraction)?;

    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} {msg}")
        .map_err(|e| ResumeMatcherError::OutputFormatting(e.to_string()))?;
    spinner.set_style(style);
    spinner.set_message(format!("Extracting text from {}", path.display()));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = chain.extract_path(path).await;
    spinner.finish_and_clear();

    let extraction = result?;
    info!("Extracted {} characters with {}", extraction.text.len(), extraction.backend);
    Ok(extraction)
}

fn output_format(requested: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match requested {
        Some(format) => cli::parse_output_format(format).map_err(ResumeMatcherError::InvalidInput),
        None => Ok(config.output.format),
    }
}

fn report_generator(config: &Config, detailed: bool, format: OutputFormat) -> ReportGenerator {
    let use_colors = config.output.color_output && format == OutputFormat::Console;
    ReportGenerator::with_options(use_colors, detailed || config.output.detailed, true, true)
}

fn metadata_for(resume: &Path, extraction: &Extraction, started: Instant) -> ReportMetadata {
    ReportMetadata::new(
        &resume.to_string_lossy(),
        &extraction.backend,
        started.elapsed().as_millis() as u64,
    )
}

fn emit(rendered: &str, save: Option<&Path>, format: OutputFormat, resume: &Path) -> Result<()> {
    println!("{}", rendered);

    if let Some(target) = save {
        let target: PathBuf = if target.is_dir() {
            target.join(suggest_filename(format, &resume.to_string_lossy(), true))
        } else {
            target.to_path_buf()
        };
        save_report_to_file(rendered, &target)?;
        println!("💾 Saved to {}", target.display());
    }
    Ok(())
}
