use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use url::Url;

use podpack::{
    PackagingWorkflow, ReqwestClient, SessionId, ShellCommand, ShellListener, WorkflowState,
    parse_command, publish_package, tokenize,
};

// Emoji with fallback for terminals without Unicode support
static MICROPHONE: Emoji<'_, '_> = Emoji("🎙️  ", "");
static ATTACH: Emoji<'_, '_> = Emoji("📎 ", "[+] ");
static PACKAGE: Emoji<'_, '_> = Emoji("📦 ", "[#] ");
static UPLOAD: Emoji<'_, '_> = Emoji("📤 ", "[^] ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");
static FAILURE: Emoji<'_, '_> = Emoji("❌ ", "[!] ");

/// Assemble podcast releases into distributable packages
#[derive(Parser, Debug)]
#[command(name = "podpack")]
#[command(about = "Interactively assemble podcast packages and publish them for processing")]
#[command(version)]
struct Args {
    /// Processing endpoint that published packages are uploaded to
    #[arg(long, env = "PODCAST_API_URL")]
    api_url: Option<Url>,

    /// Directory below which staging directories are created
    #[arg(long, env = "PODCAST_STAGING_DIR")]
    staging_dir: Option<PathBuf>,

    /// Quiet mode - suppress banner and upload spinner
    #[arg(short, long)]
    quiet: bool,
}

enum Flow {
    Continue,
    Exit,
}

struct Shell {
    workflow: PackagingWorkflow,
    listener: Arc<ShellListener>,
    session: SessionId,
    client: ReqwestClient,
    api_url: Option<Url>,
    quiet: bool,
}

impl Shell {
    async fn execute(&mut self, command: ShellCommand) -> Result<Flow> {
        command.availability(self.workflow.state(&self.session))?;

        match command {
            ShellCommand::NewPodcast { description } => {
                let podcast = self.workflow.start(&self.session, description)?;
                println!(
                    "{MICROPHONE}Started {} {}",
                    podcast.description().bold().green(),
                    format!("({})", podcast.id()).dimmed()
                );
            }

            ShellCommand::AddIntroductionMedia { media } => {
                self.workflow.attach_introduction(&self.session, &media)?;
                println!("{ATTACH}Introduction: {}", media.display().to_string().cyan());
            }

            ShellCommand::AddInterviewMedia { media } => {
                self.workflow.attach_interview(&self.session, &media)?;
                println!("{ATTACH}Interview: {}", media.display().to_string().cyan());
            }

            ShellCommand::Package => {
                let package = self.workflow.create_package(&self.session)?;
                println!(
                    "{PACKAGE}The podcast archive has been written to {}",
                    package.archive.display().to_string().cyan()
                );
            }

            ShellCommand::Publish => self.publish().await?,

            ShellCommand::Status => self.print_status(),

            ShellCommand::Exit => return Ok(Flow::Exit),
        }

        Ok(Flow::Continue)
    }

    async fn publish(&self) -> Result<()> {
        let url = self
            .api_url
            .as_ref()
            .context("no processing endpoint configured (use --api-url or PODCAST_API_URL)")?;
        let archive = self
            .listener
            .last_archive()
            .context("no package has been created yet")?;

        let spinner = if self.quiet {
            ProgressBar::hidden()
        } else {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::default_spinner().template("{spinner:.green} {wide_msg}")?,
            );
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner
        };
        spinner.set_message(format!("{UPLOAD}Uploading to {}", url.as_str().cyan()));

        let result = publish_package(&self.client, url, &archive).await;
        spinner.finish_and_clear();

        let receipt = result.context("Failed to publish package")?;
        println!(
            "{SUCCESS}Published {} {}",
            archive.display().to_string().cyan(),
            format!("(HTTP {}, {})", receipt.status, receipt.checksum).dimmed()
        );
        Ok(())
    }

    fn print_status(&self) {
        let state = self.workflow.state(&self.session);
        let Some(podcast) = self.workflow.podcast(&self.session) else {
            println!("{}", "No podcast started".dimmed());
            return;
        };

        let label = match state {
            WorkflowState::Idle => "idle",
            WorkflowState::Open => "open",
            WorkflowState::Packaged => "packaged",
        };
        println!("{} [{}]", podcast.description().bold(), label.yellow());
        println!("  id: {}", podcast.id());

        let pending = [
            ("introduction", self.workflow.pending_introduction(&self.session)),
            ("interview", self.workflow.pending_interview(&self.session)),
        ];
        for (role, file) in pending {
            let file = file.map_or_else(|| "-".dimmed().to_string(), |f| f.display().to_string());
            println!("  {role}: {file}");
        }

        if let Some(archive) = self.listener.last_archive() {
            println!("  last package: {}", archive.display().to_string().cyan());
        }
    }
}

fn print_prompt(listener: &ShellListener) -> Result<()> {
    print!("{} ", listener.prompt());
    std::io::stdout().flush().context("Failed to write prompt")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if !args.quiet {
        println!(
            "\n{}{} {}\n",
            MICROPHONE,
            "podpack".bold().magenta(),
            "- Podcast Packager (type 'help' for commands)".dimmed()
        );
    }

    let listener = Arc::new(ShellListener::new());
    let mut workflow =
        PackagingWorkflow::new(args.staging_dir.unwrap_or_else(std::env::temp_dir));
    workflow.subscribe(listener.clone());

    let mut shell = Shell {
        workflow,
        listener,
        session: SessionId::from("shell"),
        client: ReqwestClient::new(),
        api_url: args.api_url,
        quiet: args.quiet,
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print_prompt(&shell.listener)?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            println!();
            break;
        };

        let tokens = match tokenize(&line) {
            Ok(tokens) if tokens.is_empty() => continue,
            Ok(tokens) => tokens,
            Err(e) => {
                eprintln!("{FAILURE}{}", e.red());
                continue;
            }
        };

        let command = match parse_command(&tokens) {
            Ok(command) => command,
            Err(e) => {
                // Also covers `help`, which clap reports as an error
                e.print().context("Failed to write command help")?;
                continue;
            }
        };

        match shell.execute(command).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => break,
            Err(e) => eprintln!("{FAILURE}{}", format!("{e:#}").red()),
        }
    }

    Ok(())
}
