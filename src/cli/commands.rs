//! Command implementations and output formatting

use anyhow::{Context, Result};
use serde_json::json;

use fiterior_catalog::{LOADING_STEPS, MODELS, THEMES};
use fiterior_client::TransformRequest;
use fiterior_config::Config;

use crate::result::ResultSummary;
use crate::session::{SessionEvent, TransformSession};

/// Arguments of the `transform` command
#[derive(Debug, Clone)]
pub struct TransformArgs {
    pub image: String,
    pub theme: Option<String>,
    pub model: Option<String>,
    pub retries: u32,
    pub json: bool,
}

/// Build the request from CLI values, falling back to config defaults.
pub(crate) fn build_request(args: &TransformArgs, config: &Config) -> TransformRequest {
    TransformRequest {
        image_reference: Some(args.image.clone()),
        theme_id: args.theme.clone().or_else(|| config.defaults.theme.clone()),
        model_id: args.model.clone().or_else(|| config.defaults.model.clone()),
    }
}

/// Execute the `transform` command
pub async fn execute_transform_command(args: TransformArgs, config: &Config) -> Result<()> {
    let request = build_request(&args, config);
    let session = TransformSession::from_config(config)?.with_max_retries(args.retries);

    let json = args.json;
    let summary = session
        .run(request, |event| {
            if !json {
                print_event(event);
            }
        })
        .await?;

    if json {
        println!("{}", emit_result_json(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_event(event: &SessionEvent) {
    match event {
        SessionEvent::AttemptStarted { attempt } if *attempt > 0 => {
            println!("↻ Retrying (attempt {})", attempt + 1);
        }
        SessionEvent::AttemptStarted { .. } => {}
        SessionEvent::Step {
            index,
            total,
            label,
        } => println!("[{}/{}] {}", index + 1, total, label),
        SessionEvent::AttemptFailed { message, .. } => println!("✗ {message}"),
    }
}

fn print_summary(summary: &ResultSummary) {
    println!();
    println!("✓ Transform complete");
    println!("  Job:    {}", summary.job_id);
    println!("  Theme:  {}", summary.theme.name);
    println!("  Model:  {}", summary.model.name);
    println!("  Before: {}", summary.original_image);
    println!("  After:  {}", summary.result_url);
    if let Some(reason) = &summary.fallback_reason {
        println!();
        println!("  Note: the backend was unavailable ({reason}); showing the original photo.");
    } else if !summary.has_distinct_result() {
        println!();
        println!("  Note: the backend returned the original photo unchanged.");
    }
}

/// Serialize a result summary for `--json` output
pub fn emit_result_json(summary: &ResultSummary) -> Result<String> {
    serde_json::to_string_pretty(summary).context("Failed to serialize result summary")
}

/// Execute the `themes` command
pub fn execute_themes_command(json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&THEMES).context("Failed to serialize themes")?
        );
        return Ok(());
    }

    println!("Themes:");
    for theme in &THEMES {
        println!("  {:<12} {:<12} {}", theme.id.as_ref(), theme.name, theme.description);
    }
    Ok(())
}

/// Execute the `models` command
pub fn execute_models_command(json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&MODELS).context("Failed to serialize models")?
        );
        return Ok(());
    }

    println!("Models:");
    for model in &MODELS {
        println!(
            "  {:<18} {:<18} {:<12} {}",
            model.id.as_ref(), model.name, model.estimated_time, model.cost
        );
    }
    Ok(())
}

/// Execute the `steps` command
pub fn execute_steps_command(json: bool, config: &Config) -> Result<()> {
    let interval = config.step_interval();

    if json {
        let output = json!({
            "interval_ms": u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
            "steps": LOADING_STEPS,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialize steps")?
        );
        return Ok(());
    }

    println!("Progress steps (every {} ms):", interval.as_millis());
    for (index, step) in LOADING_STEPS.iter().enumerate() {
        println!("  {}. {:<10} {}", index + 1, step.key, step.label);
    }
    Ok(())
}

/// Execute the `config` command
pub fn execute_config_command(json: bool, config: &Config) -> Result<()> {
    let effective = config.effective_config();

    if json {
        let output: serde_json::Map<String, serde_json::Value> = effective
            .into_iter()
            .map(|(key, (value, source))| (key, json!({ "value": value, "source": source })))
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialize configuration")?
        );
        return Ok(());
    }

    println!("Effective configuration:");
    for (key, (value, source)) in effective {
        println!("  {key:<18} = {value:<40} [{source}]");
    }
    Ok(())
}
