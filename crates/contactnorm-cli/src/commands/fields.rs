use crate::commands::{print_json, Context};
use anyhow::{Context as _, Result};
use clap::Args;
use contactnorm_core::ContactNormalizer;
use serde::Serialize;

#[derive(Debug, Args)]
pub struct FieldArgs {
    pub value: String,
}

#[derive(Debug, Serialize)]
struct FieldReport<'a> {
    input: &'a str,
    value: String,
}

pub fn phone(ctx: &Context, args: FieldArgs) -> Result<()> {
    let value = ctx
        .service
        .normalizer()
        .normalize_phone(Some(&args.value))
        .with_context(|| format!("normalize phone {:?}", args.value))?;
    report(ctx, &args.value, value)
}

pub fn dob(ctx: &Context, args: FieldArgs) -> Result<()> {
    let value = ctx
        .service
        .normalizer()
        .normalize_date(Some(&args.value))
        .with_context(|| format!("normalize date of birth {:?}", args.value))?;
    report(ctx, &args.value, value)
}

fn report(ctx: &Context, input: &str, value: String) -> Result<()> {
    if ctx.json {
        return print_json(&FieldReport { input, value });
    }
    println!("{}", value);
    Ok(())
}
