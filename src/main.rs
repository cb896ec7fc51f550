//! Resume coach: conversational resume review and mock interview assistant

mod chat;
mod cli;
mod compress;
mod config;
mod error;
mod input;
mod llm;

use chat::controller::ChatController;
use clap::Parser;
use cli::{Cli, Commands, ConfigAction, SlashCommand};
use colored::Colorize;
use compress::{ContextCompressor, ScaleDownClient};
use config::Config;
use error::{Result, ResumeCoachError};
use indicatif::ProgressBar;
use input::manager::InputManager;
use llm::client::{CompletionModel, GeminiClient};
use log::{error, info};
use std::io::Write as _;
use std::path::Path;
use std::process;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Chat { resume, job, mode } => {
            info!("Starting chat session");

            if let Some(resume) = &resume {
                cli::validate_file_extension(resume, &["pdf"])
                    .map_err(|e| ResumeCoachError::InvalidInput(format!("Resume file: {}", e)))?;
            }
            if let Some(job) = &job {
                cli::validate_file_extension(job, &["txt", "md"]).map_err(|e| {
                    ResumeCoachError::InvalidInput(format!("Job description file: {}", e))
                })?;
            }

            let model = GeminiClient::new(config.generation.clone(), config.generation_api_key());
            let compressor = ScaleDownClient::new(
                config.compression.clone(),
                config.compression_api_key(),
                config.generation.model.clone(),
            );

            let mut controller = ChatController::new(model, compressor);
            controller.set_mode(mode);

            if let Some(resume) = resume {
                controller.set_resume(resume);
            }
            if let Some(job) = job {
                let text = InputManager::new().extract_text(&job).await?;
                controller.set_job_description(text);
            }

            chat_loop(controller).await?;
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                println!("Generation model: {}", config.generation.model);
                println!("Generation API URL: {}", config.generation.api_url);
                println!(
                    "Generation credential ({}): {}",
                    config.generation.api_key_env,
                    if config.generation_api_key().is_some() {
                        "set"
                    } else {
                        "missing (required)"
                    }
                );
                println!("\nCompression endpoint: {}", config.compression.endpoint);
                println!(
                    "Compression credential ({}): {}",
                    config.compression.api_key_env,
                    if config.compression_api_key().is_some() {
                        "set"
                    } else {
                        "missing (compression disabled)"
                    }
                );
                println!("Compression target ratio: {:.2}", config.compression.target_ratio);
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                let default_config = Config::default();
                default_config.save()?;
                println!("✅ Configuration reset successfully!");
            }
        },
    }

    Ok(())
}

async fn chat_loop<M, C>(mut controller: ChatController<M, C>) -> Result<()>
where
    M: CompletionModel,
    C: ContextCompressor,
{
    println!("{}", "💼 Job Application Assistant".bold());
    println!("Mode: {}", controller.mode());
    print_readiness(controller.is_ready());
    println!("Commands: /resume <pdf>, /job <txt|md>, /mode <coach|interviewer>, /status, /quit\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{} ", "you:".cyan().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = cli::parse_slash_command(&line) {
            match command {
                Ok(SlashCommand::Resume(path)) => {
                    println!("📄 Resume set: {}", path.display());
                    controller.set_resume(path);
                    print_readiness(controller.is_ready());
                }
                Ok(SlashCommand::Job(path)) => {
                    match InputManager::new().extract_text(&path).await {
                        Ok(text) => {
                            println!("💼 Job description loaded: {}", path.display());
                            controller.set_job_description(text);
                            print_readiness(controller.is_ready());
                        }
                        Err(e) => println!("{} {}", "error:".red().bold(), e),
                    }
                }
                Ok(SlashCommand::Mode(mode)) => {
                    controller.set_mode(mode);
                    println!("🎭 Mode: {}", mode);
                }
                Ok(SlashCommand::Status) => {
                    println!("Mode: {}", controller.mode());
                    println!(
                        "Resume: {}",
                        controller
                            .resume_path()
                            .map(Path::display)
                            .map(|p| p.to_string())
                            .unwrap_or_else(|| "(none)".to_string())
                    );
                    println!("Messages this session: {}", controller.session().messages.len());
                    print_readiness(controller.is_ready());
                }
                Ok(SlashCommand::Quit) => break,
                Err(message) => println!("{}", message),
            }
            continue;
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_message("Analyzing...");
        spinner.enable_steady_tick(Duration::from_millis(100));

        let reply = controller.handle_turn(&line).await;

        spinner.finish_and_clear();
        println!("{} {}\n", "assistant:".green().bold(), reply);
    }

    println!("Session ended.");
    Ok(())
}

fn print_readiness(ready: bool) {
    if ready {
        println!("{}", "✅ System Ready".green());
    } else {
        println!(
            "{}",
            "⏳ Waiting for a resume and a job description".yellow()
        );
    }
}
