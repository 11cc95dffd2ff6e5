//! The `darkroom transform` command.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::Args;
use darkroom_core::{Config, ImagePipeline, ProcessOptions, RasterEngine, TempUpload};

/// Arguments for the `transform` command.
#[derive(Args, Debug)]
pub struct TransformArgs {
    /// Input image path
    pub input: PathBuf,

    /// Output image path
    pub output: PathBuf,

    /// JSON array of transformation steps
    #[arg(long, default_value = "[]", conflicts_with = "steps_file")]
    pub steps: String,

    /// Read the step list from a JSON file instead
    #[arg(long)]
    pub steps_file: Option<PathBuf>,

    /// Identity to attach to the usage record
    #[arg(long)]
    pub identity: Option<String>,
}

/// Execute the transform command.
pub async fn execute(args: TransformArgs, config: Config) -> anyhow::Result<()> {
    let steps = resolve_steps(&args).await?;

    let engine = Arc::new(RasterEngine::new(config.output.clone(), config.limits.clone()));
    let pipeline = ImagePipeline::new(&config, engine);
    let options = ProcessOptions {
        identity: args.identity.clone(),
    };

    // Spool the input into an ephemeral copy so the original survives the
    // pipeline's cleanup of its upload
    let upload = spool(&args.input).await?;
    let result = pipeline
        .process_upload(upload, &steps, &options)
        .await
        .map_err(|e| {
            if e.is_client_error() {
                anyhow::anyhow!("invalid request: {e}")
            } else {
                anyhow::anyhow!("processing failed: {e}")
            }
        })?;

    tokio::fs::write(&args.output, &result.buffer)
        .await
        .with_context(|| format!("cannot write {}", args.output.display()))?;

    tracing::info!(
        steps = result.steps_applied,
        bytes = result.buffer.len(),
        output = %args.output.display(),
        "transform complete"
    );
    println!(
        "Wrote {} ({} steps, {} bytes)",
        args.output.display(),
        result.steps_applied,
        result.buffer.len()
    );
    Ok(())
}

async fn resolve_steps(args: &TransformArgs) -> anyhow::Result<String> {
    match &args.steps_file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("cannot read steps file {}", path.display())),
        None => Ok(args.steps.clone()),
    }
}

/// Copy the input to a uniquely named temp file owned by the pipeline.
async fn spool(input: &Path) -> anyhow::Result<TempUpload> {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let name = format!("darkroom-upload-{}-{}.bin", std::process::id(), nanos);
    let path = std::env::temp_dir().join(name);
    tokio::fs::copy(input, &path)
        .await
        .with_context(|| format!("cannot read {}", input.display()))?;
    Ok(TempUpload::claim(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(steps: &str, steps_file: Option<PathBuf>) -> TransformArgs {
        TransformArgs {
            input: PathBuf::from("in.png"),
            output: PathBuf::from("out.png"),
            steps: steps.to_string(),
            steps_file,
            identity: None,
        }
    }

    #[tokio::test]
    async fn test_inline_steps_pass_through() {
        let steps = resolve_steps(&args(r#"[{"operation":"flip"}]"#, None))
            .await
            .unwrap();
        assert_eq!(steps, r#"[{"operation":"flip"}]"#);
    }

    #[tokio::test]
    async fn test_steps_file_wins_when_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("steps.json");
        std::fs::write(&path, r#"[{"operation":"trim"}]"#).unwrap();
        let steps = resolve_steps(&args("[]", Some(path))).await.unwrap();
        assert_eq!(steps, r#"[{"operation":"trim"}]"#);
    }

    #[tokio::test]
    async fn test_spool_copies_and_cleanup_removes() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        std::fs::write(&input, b"bytes").unwrap();

        let upload = spool(&input).await.unwrap();
        let spooled = upload.path().to_path_buf();
        assert!(spooled.exists());
        drop(upload);
        assert!(!spooled.exists());
        assert!(input.exists());
    }
}
