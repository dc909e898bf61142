//! Resume insight: role prediction, skill gaps and resume Q&A from the command line

use clap::Parser;
use indicatif::ProgressBar;
use log::{error, info};
use resume_insight::classifier::store::ArtifactStore;
use resume_insight::cli::{self, ArtifactAction, ChatInput, Cli, Commands, ConfigAction};
use resume_insight::config::Config;
use resume_insight::error::{Result, ResumeInsightError};
use resume_insight::input::InputManager;
use resume_insight::llm::{ChatClient, ResumeChat};
use resume_insight::output::formatter::truncate_text;
use resume_insight::output::{save_report_to_file, suggest_filename, InsightReport, ReportGenerator};
use resume_insight::processing::RoleSkillTable;
use resume_insight::{InsightPipeline, ResumeSession};
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};

const RESUME_EXTENSIONS: [&str; 3] = ["pdf", "docx", "txt"];

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
        process::exit(if e.is_fatal() { 2 } else { 1 });
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            bundle,
            output,
            save,
            detailed,
        } => {
            let format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(ResumeInsightError::InvalidInput)?,
                None => config.output.format,
            };
            let detailed = detailed || config.output.detailed;

            let started = Instant::now();
            let pipeline = InsightPipeline::from_config(&config, bundle.as_deref())?;
            let resume_text = read_resume(&mut InputManager::new(), &resume).await?;

            info!("Analyzing {}", resume.display());
            let analysis = pipeline.analyze(&resume_text)?;

            let bundle_name = bundle.unwrap_or_else(|| config.artifacts.default_bundle.clone());
            let mut report = InsightReport::new(
                analysis,
                &resume.to_string_lossy(),
                &bundle_name,
                started.elapsed().as_millis() as u64,
            );
            if detailed {
                report = report.with_resume_preview(truncate_text(resume_text.trim(), 600));
            }

            let generator = ReportGenerator::with_options(config.output.color_output, detailed, true, true);
            let rendered = generator.generate_report(&report, &format)?;

            match save {
                Some(path) => {
                    let path = path.unwrap_or_else(|| {
                        PathBuf::from(suggest_filename(&format, &resume.to_string_lossy(), true))
                    });
                    let plain = ReportGenerator::with_options(false, detailed, true, true)
                        .generate_report(&report, &format)?;
                    save_report_to_file(&plain, &path)?;
                    println!("Report saved to {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Ask { resume, question } => {
            let resume_text = read_resume(&mut InputManager::new(), &resume).await?;
            let chat = ResumeChat::new(chat_client(&config)?);

            let spinner = start_spinner("Asking...");
            let answer = chat.ask(&resume_text, &question).await;
            spinner.finish_and_clear();

            println!("{}", answer);
        }

        Commands::Chat { resume, bundle } => {
            let pipeline = InsightPipeline::from_config(&config, bundle.as_deref())?;
            let chat = ResumeChat::new(chat_client(&config)?);

            let mut input_manager = InputManager::new();
            let mut session = ResumeSession::new();
            load_and_summarize(&mut session, &pipeline, &mut input_manager, &resume).await?;
            println!("Ask a question about the resume (\"load <path>\" to switch, \"exit\" to quit).");

            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                match cli::parse_chat_line(&line) {
                    ChatInput::Exit => break,
                    ChatInput::Load(path) => {
                        if let Err(e) = load_and_summarize(&mut session, &pipeline, &mut input_manager, &path).await {
                            error!("Could not load {}: {}", path.display(), e);
                        }
                    }
                    ChatInput::Question(question) => {
                        let spinner = start_spinner("Thinking...");
                        let answer = session.ask(&chat, &question).await;
                        spinner.finish_and_clear();

                        println!("{}\n", answer);
                    }
                }
            }
        }

        Commands::Roles { role } => {
            let table = match &config.skills.table_path {
                Some(path) => RoleSkillTable::from_toml_file(path)?,
                None => RoleSkillTable::builtin(),
            };

            match role {
                Some(name) if table.contains(&name) => {
                    println!("{}: {}", name, table.skills_for(&name).join(", "));
                }
                Some(name) => {
                    let hint = table
                        .closest_role(&name)
                        .filter(|(_, score)| *score >= 0.8)
                        .map(|(closest, _)| format!(" Did you mean '{}'?", closest))
                        .unwrap_or_default();
                    return Err(ResumeInsightError::InvalidInput(format!("Unknown role '{}'.{}", name, hint)));
                }
                None => {
                    println!("{} roles\n", table.len());
                    for entry in table.entries() {
                        println!("  {}: {}", entry.role, entry.skills.join(", "));
                    }
                }
            }
        }

        Commands::Artifacts { action } => {
            let mut store = ArtifactStore::new(config.models_dir().clone()).await?;

            match action {
                ArtifactAction::List => {
                    let bundles = store.list_bundles();
                    println!("Artifacts directory: {}\n", store.models_dir().display());
                    if bundles.is_empty() {
                        println!("No bundles installed.");
                        if let Some(repo) = &config.artifacts.hub_repo {
                            println!("Download one with: resume-insight artifacts download {}", repo);
                        }
                    }
                    for name in bundles {
                        let marker = if name == config.artifacts.default_bundle { " (default)" } else { "" };
                        println!("  {}{}", name, marker);
                    }
                }

                ArtifactAction::Info { name } => {
                    let info = store.info(&name).await?;
                    println!("Bundle: {}", info.name);
                    println!("Path: {}", info.path.display());
                    println!("Model type: {}", info.model_type);
                    println!("Vocabulary size: {}", info.vocabulary_size);
                    println!("Roles: {}", info.n_classes);
                    println!("Size: {:.1} KB", info.size_bytes as f64 / 1024.0);
                }

                ArtifactAction::Download { repo, name, force } => {
                    let name = name.unwrap_or_else(|| cli::bundle_name_from_repo(&repo));

                    let spinner = start_spinner(&format!("Downloading {}...", repo));
                    let result = store.download(&repo, &name, force).await;
                    spinner.finish_and_clear();

                    let path = result?;
                    println!("Bundle '{}' ready at {}", name, path.display());
                }
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("Configuration file: {}\n", config_path.display());
                println!("Artifacts directory: {}", config.models_dir().display());
                println!("Default bundle: {}", config.artifacts.default_bundle);
                if let Some(repo) = &config.artifacts.hub_repo {
                    println!("Hub repository: {}", repo);
                }
                println!("\nChat:");
                println!("  Endpoint: {}", config.chat.base_url);
                println!("  Model: {}", config.chat.model);
                println!("  Temperature: {}", config.chat.temperature);
                println!(
                    "  API key: ${} ({})",
                    config.chat.api_key_env,
                    if config.chat_api_key().is_some() { "set" } else { "not set" }
                );
                println!("\nRole table: {}", describe_table_path(config.skills.table_path.as_ref()));
                println!("Output format: {:?}", config.output.format);
            }

            Some(ConfigAction::Reset) => {
                Config::default().save_to(config_path)?;
                println!("Configuration reset: {}", config_path.display());
            }

            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
            }
        },
    }

    Ok(())
}

async fn read_resume(input_manager: &mut InputManager, path: &Path) -> Result<String> {
    cli::validate_file_extension(path, &RESUME_EXTENSIONS)
        .map_err(|e| ResumeInsightError::UnsupportedFormat(format!("{}: {}", path.display(), e)))?;

    input_manager.extract_text(path).await
}

/// Make `path` the session's resume, analyze it and print the headline results
async fn load_and_summarize(
    session: &mut ResumeSession,
    pipeline: &InsightPipeline,
    input_manager: &mut InputManager,
    path: &Path,
) -> Result<()> {
    let resume_text = read_resume(input_manager, path).await?;
    session.load_resume(resume_text, path.to_string_lossy());
    let analysis = session.analyze(pipeline)?;

    println!(
        "Predicted role: {} | Experience: {} | Missing skills: {}",
        analysis.predicted_role,
        analysis.experience,
        if analysis.missing.is_empty() {
            "none".to_string()
        } else {
            analysis.missing.join(", ")
        }
    );
    Ok(())
}

fn chat_client(config: &Config) -> Result<ChatClient> {
    let api_key = config.chat_api_key().ok_or_else(|| {
        ResumeInsightError::Configuration(format!(
            "Set the {} environment variable to use chat",
            config.chat.api_key_env
        ))
    })?;
    ChatClient::new(&config.chat, api_key)
}

fn start_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn describe_table_path(path: Option<&PathBuf>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "built-in".to_string(),
    }
}
