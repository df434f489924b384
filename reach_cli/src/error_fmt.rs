//! Human-readable error descriptions and structured JSON error formatting.

use reach_core::TaskError;

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    if let Some(te) = err.downcast_ref::<TaskError>() {
        return match te {
            TaskError::Config(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML, or conflicting CLI overrides.\nHow to fix: Edit the config file (or the offending flag), then rerun. See README for a sample."
            ),
            TaskError::DecoderLoad { name, reason } => format!(
                "What happened: Decoder '{name}' could not be loaded ({reason}).\nLikely causes: decoders.dir is wrong, or the artifact file '{name}.json' is missing or malformed.\nHow to fix: Point decoders.dir at the artifact directory and check the artifact, or run with --decoder GT for a passthrough baseline."
            ),
            TaskError::Input(msg) => format!(
                "What happened: A malformed position reached the trial loop ({msg}).\nLikely causes: Tracker or decoder produced the wrong channel count or a non-finite value.\nHow to fix: Check task.channels against the tracker/decoder output; rerun with --log-level=debug for per-tick detail."
            ),
            TaskError::Cancelled => {
                "What happened: The run was cancelled.\nLikely causes: Ctrl-C.\nHow to fix: Nothing to fix; any recorded samples were flushed before exit.".to_string()
            }
        };
    }

    // Generic fallback
    let msg = err.to_string();
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Map TaskError (if present) to stable exit codes; other errors return 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if let Some(te) = err.downcast_ref::<TaskError>() {
        return match te {
            TaskError::Config(_) => 2,
            TaskError::DecoderLoad { .. } => 3,
            TaskError::Input(_) => 4,
            TaskError::Cancelled => 130,
        };
    }
    1
}

fn reason_name(err: &eyre::Report) -> &'static str {
    match err.downcast_ref::<TaskError>() {
        Some(TaskError::Config(_)) => "Config",
        Some(TaskError::DecoderLoad { .. }) => "DecoderLoad",
        Some(TaskError::Input(_)) => "Input",
        Some(TaskError::Cancelled) => "Cancelled",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    let obj = match err.downcast_ref::<TaskError>() {
        Some(TaskError::DecoderLoad { name, reason }) => json!({
            "reason": reason_name(err),
            "details": { "decoder": name, "cause": reason },
            "message": humanize(err),
        }),
        _ => json!({ "reason": reason_name(err), "message": humanize(err) }),
    };
    obj.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoder_load_gets_a_dedicated_exit_code() {
        let err = eyre::Report::new(TaskError::DecoderLoad {
            name: "handrnn".into(),
            reason: "no artifact".into(),
        });
        assert_eq!(exit_code_for_error(&err), 3);
        assert!(humanize(&err).contains("handrnn"));
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&err)).unwrap();
        assert_eq!(v["reason"], "DecoderLoad");
        assert_eq!(v["details"]["decoder"], "handrnn");
    }

    #[test]
    fn cancellation_maps_to_sigint_convention() {
        let err = eyre::Report::new(TaskError::Cancelled);
        assert_eq!(exit_code_for_error(&err), 130);
    }

    #[test]
    fn unknown_errors_fall_back_to_one() {
        let err = eyre::eyre!("boom");
        assert_eq!(exit_code_for_error(&err), 1);
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&err)).unwrap();
        assert_eq!(v["reason"], "Error");
    }
}
