use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use anyhow::{Context as _, Result};
use clap::Args;
use contactnorm_core::{NormalizationResult, SkippedRow};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

const STDIO: &str = "-";

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    /// Input file, or `-` for stdin
    pub input: PathBuf,
    /// Output file, or `-` for stdout
    #[arg(long, conflicts_with = "out_dir")]
    pub out: Option<PathBuf>,
    /// Directory for the derived `normalized-*.csv` file
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
    /// Original filename used to derive the output name
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
struct NormalizeReport<'a> {
    output: Option<String>,
    #[serde(flatten)]
    result: &'a NormalizationResult,
}

pub fn normalize(ctx: &Context, args: NormalizeArgs) -> Result<()> {
    if ctx.json && args.out.as_deref().is_some_and(is_stdio) {
        return Err(invalid_input("--json cannot be combined with --out -"));
    }
    let from_stdin = is_stdio(&args.input);
    let original_name = args.name.clone().or_else(|| {
        (!from_stdin)
            .then(|| args.input.file_name())
            .flatten()
            .map(|name| name.to_string_lossy().into_owned())
    });

    let result = if from_stdin {
        ctx.service
            .process_reader(io::stdin().lock(), original_name.as_deref())
            .with_context(|| "normalize stdin")?
    } else {
        let payload = fs::read(&args.input)
            .with_context(|| format!("read input file {}", args.input.display()))?;
        ctx.service
            .process(&payload, original_name.as_deref())
            .with_context(|| format!("normalize {}", args.input.display()))?
    };

    let output = resolve_output(&args, from_stdin, &result.filename)?;
    match output.as_deref() {
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&result.content)?;
            stdout.flush()?;
        }
        Some(path) => {
            fs::write(path, &result.content)
                .with_context(|| format!("write output file {}", path.display()))?;
            debug!(path = %path.display(), bytes = result.content.len(), "output written");
        }
    }

    if ctx.json {
        let report = NormalizeReport {
            output: output.as_ref().map(|path| path.display().to_string()),
            result: &result,
        };
        return print_json(&report);
    }

    // Keep stdout clean when it carries the CSV itself.
    let mut summary: Box<dyn Write> = match output {
        Some(_) => Box::new(io::stdout().lock()),
        None => Box::new(io::stderr().lock()),
    };
    writeln!(
        summary,
        "Normalized contacts: processed {}, normalized {}, skipped {}",
        result.processed_rows, result.normalized_rows, result.skipped_rows
    )?;
    if let Some(path) = &output {
        writeln!(summary, "Written to {}", path.display())?;
    }
    write_skipped(&mut summary, &result.skipped)?;
    Ok(())
}

/// `None` means stdout.
fn resolve_output(
    args: &NormalizeArgs,
    from_stdin: bool,
    filename: &str,
) -> Result<Option<PathBuf>> {
    if let Some(out) = &args.out {
        if is_stdio(out) {
            return Ok(None);
        }
        ensure_not_input(args, from_stdin, out)?;
        return Ok(Some(out.clone()));
    }

    let dir = match &args.out_dir {
        Some(dir) => dir.clone(),
        None if from_stdin => PathBuf::from("."),
        None => args
            .input
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    let path = dir.join(filename);
    ensure_not_input(args, from_stdin, &path)?;
    Ok(Some(path))
}

fn ensure_not_input(args: &NormalizeArgs, from_stdin: bool, out: &Path) -> Result<()> {
    if from_stdin {
        return Ok(());
    }
    let same = match (fs::canonicalize(&args.input), fs::canonicalize(out)) {
        (Ok(input), Ok(output)) => input == output,
        _ => false,
    };
    if same {
        return Err(invalid_input(format!(
            "output path matches input file: {}",
            out.display()
        )));
    }
    Ok(())
}

fn write_skipped(out: &mut dyn Write, skipped: &[SkippedRow]) -> Result<()> {
    if skipped.is_empty() {
        return Ok(());
    }
    writeln!(out, "Skipped rows:")?;
    for row in skipped {
        writeln!(out, "- row {}: {}", row.row_number, row.reason)?;
    }
    Ok(())
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == STDIO
}
