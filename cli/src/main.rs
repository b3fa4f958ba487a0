//! Tiltguard CLI - run the validation pipeline over a JSON tag file.
//!
//! Reads an emotional data set (a JSON array of tag records, or any of the
//! degenerate shapes the engine tolerates) from a file or stdin, optionally a
//! trade statistics payload from a second file, runs the full pipeline, and
//! prints the outcome as pretty JSON. Exits non-zero when the overall result
//! is invalid, so the binary slots into shell pipelines and CI checks.

use std::io::Read;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use tracing_subscriber::EnvFilter;

use tiltguard_engine::{
    EmotionalDataSet, RawEmotionTag, TradeStatsPayload, ValidationConfig, ValidationContext,
    run_validation,
};

const USAGE: &str = "\
Usage: tiltguard [OPTIONS] [INPUT]

Validate an emotional tag set and its derived psychological metrics.

Arguments:
  INPUT                 Path to a JSON file with the tag array ('-' or absent: stdin)

Options:
  --payload <FILE>      Trade statistics payload to validate alongside the tags
  --user <ID>           Attach a user id to the validation context
  --strict              Escalate deviation and timing findings to errors
  --auto-correct        Attach a rebalanced metric pair when errors occur
  --no-log              Suppress the per-run structured log entry
  -h, --help            Print this help
";

struct Args {
    input: Option<String>,
    payload: Option<String>,
    user: Option<String>,
    config: ValidationConfig,
}

fn parse_args() -> Result<Option<Args>> {
    let mut args = Args {
        input: None,
        payload: None,
        user: None,
        config: ValidationConfig::default(),
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--strict" => args.config.strict_mode = true,
            "--auto-correct" => args.config.enable_auto_correction = true,
            "--no-log" => args.config.log_validation_failures = false,
            "--payload" => {
                args.payload = Some(iter.next().context("--payload requires a file path")?);
            }
            "--user" => {
                args.user = Some(iter.next().context("--user requires an id")?);
            }
            other if other.starts_with('-') && other != "-" => {
                bail!("unknown option {other}\n\n{USAGE}");
            }
            other => {
                if args.input.is_some() {
                    bail!("unexpected extra argument {other}\n\n{USAGE}");
                }
                args.input = Some(other.to_string());
            }
        }
    }
    Ok(Some(args))
}

fn read_source(path: Option<&str>) -> Result<String> {
    match path {
        None | Some("-") => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
        }
    }
}

/// Map arbitrary JSON onto the engine's tolerated input states instead of
/// failing on shape: null stays "missing", a non-array stays "not a
/// sequence", array entries that are not tag objects become empty records
/// the normalizer reports as malformed, and only genuinely unreadable bytes
/// are an error.
fn parse_data_set(raw: &str) -> Result<EmotionalDataSet> {
    let value: serde_json::Value =
        serde_json::from_str(raw).context("input is not valid JSON")?;
    Ok(match value {
        serde_json::Value::Null => EmotionalDataSet::Missing,
        serde_json::Value::Array(entries) => {
            let tags: Vec<RawEmotionTag> = entries
                .into_iter()
                .map(|entry| serde_json::from_value(entry).unwrap_or_default())
                .collect();
            EmotionalDataSet::Tags(tags)
        }
        other => EmotionalDataSet::NotASequence(json_type_name(&other).to_string()),
    })
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

fn run() -> Result<ExitCode> {
    let Some(args) = parse_args()? else {
        print!("{USAGE}");
        return Ok(ExitCode::SUCCESS);
    };

    let input = parse_data_set(&read_source(args.input.as_deref())?)?;

    let payload: Option<TradeStatsPayload> = match &args.payload {
        Some(path) => Some(
            serde_json::from_str(&read_source(Some(path))?)
                .with_context(|| format!("payload file {path} could not be decoded"))?,
        ),
        None => None,
    };

    let mut ctx = ValidationContext::new(args.config);
    if let Some(user) = args.user {
        ctx = ctx.with_user(user);
    }

    let outcome = run_validation(&input, payload.as_ref(), &mut ctx);

    let rendered =
        serde_json::to_string_pretty(&outcome).context("failed to serialize outcome")?;
    println!("{rendered}");

    if outcome.result.overall.is_valid {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_and_non_array_inputs_map_to_tolerated_states() {
        assert_eq!(parse_data_set("null").unwrap(), EmotionalDataSet::Missing);
        assert_eq!(
            parse_data_set(r#"{"subject":"TILT"}"#).unwrap(),
            EmotionalDataSet::NotASequence("object".to_string())
        );
    }

    #[test]
    fn non_object_array_entries_become_reportable_records() {
        let parsed = parse_data_set(r#"[42,{"subject":"TILT","value":30},"oops"]"#).unwrap();
        let EmotionalDataSet::Tags(tags) = parsed else {
            panic!("expected a tag sequence");
        };
        assert_eq!(tags.len(), 3);
        assert_eq!(tags[0], RawEmotionTag::default());
        assert_eq!(tags[1].subject_str(), Some("TILT"));
        assert_eq!(tags[2], RawEmotionTag::default());
    }

    #[test]
    fn wrong_typed_subjects_survive_decoding() {
        let parsed = parse_data_set(r#"[{"subject":42,"value":50}]"#).unwrap();
        let EmotionalDataSet::Tags(tags) = parsed else {
            panic!("expected a tag sequence");
        };
        assert_eq!(tags[0].subject_str(), None);
        assert!(tags[0].subject.is_some());
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(code) => code,
        Err(error) => {
            tracing::error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}
