use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};

use artfund::config;
use artfund::submit;
use artfund::wizard::{Draft, Stage, StagedFile, Wizard, WizardError};

#[derive(Debug, Parser)]
#[command(author, version, about = "Walk a grant application through the wizard and submit it")]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// YAML file holding the application draft
    #[arg(long)]
    draft: PathBuf,

    /// Portfolio files to attach (images or PDF)
    #[arg(long = "file")]
    files: Vec<PathBuf>,

    /// Validate and print the review summary without submitting
    #[arg(long)]
    dry_run: bool,

    /// Extra attempts after a failed submission
    #[arg(long, default_value_t = 0)]
    retries: u32,
}

fn print_errors(stage: Stage, errors: &[artfund::wizard::FieldError]) {
    eprintln!("Step {} ({}) needs attention:", stage.number(), stage.name());
    for e in errors {
        eprintln!("  {}: {}", e.field, e.message);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = config::load(Some(&args.config))?;

    let raw = tokio::fs::read_to_string(&args.draft)
        .await
        .with_context(|| format!("failed to read draft {}", args.draft.display()))?;
    let draft: Draft = serde_yaml::from_str(&raw).context("invalid draft YAML")?;
    let mut wizard = Wizard::with_draft(draft);

    let mut staged = Vec::with_capacity(args.files.len());
    for path in &args.files {
        staged.push(StagedFile::from_path(path).await?);
    }
    for skipped in wizard.stage_files(staged)? {
        warn!(name = %skipped.name, "skipping unsupported file");
    }

    loop {
        match wizard.next() {
            Ok(Stage::Review) => break,
            Ok(stage) => info!(stage = stage.name(), "stage complete"),
            Err(WizardError::StageIncomplete { stage, errors }) => {
                print_errors(stage, &errors);
                return Err(anyhow!("application is incomplete"));
            }
            Err(err) => return Err(err.into()),
        }
    }

    println!("Application Summary");
    for (label, value) in wizard.draft().summary() {
        println!("  {:<20} {}", label, value);
    }
    for file in wizard.staged_files() {
        println!("  {:<20} {} - {}", "Attachment", file.name, file.display_size());
    }

    let review_errors = wizard.stage_errors(Stage::Review);
    if !review_errors.is_empty() {
        print_errors(Stage::Review, &review_errors);
        return Err(anyhow!("application is incomplete"));
    }
    if args.dry_run {
        println!("Ready to submit.");
        return Ok(());
    }

    let submitter = submit::submitter_from_config(&cfg)?;
    let timeout = cfg.submission.timeout();
    let mut attempt = 0;
    loop {
        attempt += 1;
        match wizard.submit(submitter.as_ref(), timeout).await {
            Ok(receipt) => {
                println!("Application Submitted Successfully!");
                println!("Reference: {}", receipt.reference);
                break;
            }
            Err(WizardError::SubmitFailed(message)) if attempt <= args.retries => {
                warn!(attempt, %message, "submission failed; retrying");
            }
            Err(err) => {
                error!(%err, "submission failed");
                return Err(err.into());
            }
        }
    }

    Ok(())
}
