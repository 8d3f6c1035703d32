//! Nephra CLI - Command-line interface for Nephra Core
//!
//! Commands:
//! - score: Assess an observation history into a KSLS report
//! - analyze: Estimate symptom levels from free journal text
//! - stage: Estimate eGFR and KDIGO stage from age, sex, and creatinine

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use nephra_core::egfr::{estimate_egfr, interpret_gfr};
use nephra_core::pipeline::{
    assess, dedupe_daily, parse_observations_json, parse_observations_ndjson,
};
use nephra_core::symptoms::{should_suggest_ksls, SymptomTextExtractor};
use nephra_core::types::{Sex, UserProfile};
use nephra_core::{CoreError, ReportEncoder, CORE_VERSION};

/// Nephra - kidney-health wellness scoring for daily observations
#[derive(Parser)]
#[command(name = "nephra")]
#[command(version = CORE_VERSION)]
#[command(about = "Score daily health observations into kidney stress signals", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess an observation history into a KSLS report
    Score {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// User profile JSON file (sex, age, height, weight)
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Emit the bare assessment instead of the versioned report envelope
        #[arg(long)]
        bare: bool,

        /// Instance id stamped into the report envelope
        #[arg(long)]
        instance_id: Option<String>,
    },

    /// Estimate symptom levels from free journal text
    Analyze {
        /// Text to analyze (reads --input or stdin when omitted)
        text: Option<String>,

        /// Read the text from a file instead
        #[arg(short, long, conflicts_with = "text")]
        input: Option<PathBuf>,
    },

    /// Estimate eGFR and KDIGO stage from age, sex, and creatinine
    Stage {
        /// Age in years
        #[arg(long)]
        age: f64,

        /// Biological sex (female/male, lenient parsing)
        #[arg(long, default_value = "male")]
        sex: String,

        /// Serum creatinine in mg/dL
        #[arg(long)]
        creatinine: f64,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one observation per line)
    Ndjson,
    /// JSON array of observations
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), NephraCliError> {
    match cli.command {
        Commands::Score {
            input,
            output,
            input_format,
            profile,
            bare,
            instance_id,
        } => cmd_score(
            &input,
            &output,
            input_format,
            profile.as_deref(),
            bare,
            instance_id,
        ),

        Commands::Analyze { text, input } => cmd_analyze(text, input.as_deref()),

        Commands::Stage {
            age,
            sex,
            creatinine,
        } => cmd_stage(age, &sex, creatinine),
    }
}

fn cmd_score(
    input: &PathBuf,
    output: &PathBuf,
    input_format: InputFormat,
    profile_path: Option<&std::path::Path>,
    bare: bool,
    instance_id: Option<String>,
) -> Result<(), NephraCliError> {
    let input_data = if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    let history = match input_format {
        InputFormat::Ndjson => parse_observations_ndjson(&input_data)?,
        InputFormat::Json => parse_observations_json(&input_data)?,
    };

    if history.is_empty() {
        return Err(NephraCliError::NoObservations);
    }

    let profile = match profile_path {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => UserProfile::new(history[0].user_id.clone()),
    };

    let daily = dedupe_daily(&history);
    let assessment = assess(&daily, &profile)?;

    let output_data = if bare {
        serde_json::to_string_pretty(&assessment)?
    } else {
        let encoder = match instance_id {
            Some(id) => ReportEncoder::with_instance_id(id),
            None => ReportEncoder::new(),
        };
        encoder.encode_to_json(assessment, &daily, &profile.user_id)?
    };

    if output.to_string_lossy() == "-" {
        println!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_analyze(
    text: Option<String>,
    input: Option<&std::path::Path>,
) -> Result<(), NephraCliError> {
    let text = match (text, input) {
        (Some(text), _) => text,
        (None, Some(path)) => fs::read_to_string(path)?,
        (None, None) => {
            if atty::is(atty::Stream::Stdin) {
                return Err(NephraCliError::NoText);
            }
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let estimate = SymptomTextExtractor::extract(&text);
    let suggestion = should_suggest_ksls(&estimate);

    let report = serde_json::json!({
        "estimate": estimate,
        "suggestion": suggestion,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn cmd_stage(age: f64, sex: &str, creatinine: f64) -> Result<(), NephraCliError> {
    let sex = Sex::parse_lenient(Some(sex));
    let egfr = estimate_egfr(Some(age), sex, Some(creatinine))
        .ok_or(NephraCliError::InvalidStageInputs)?;
    let interpretation = interpret_gfr(egfr);

    let report = serde_json::json!({
        "egfr": egfr,
        "stage": interpretation.stage,
        "description": interpretation.description,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

enum NephraCliError {
    Io(io::Error),
    Json(serde_json::Error),
    Core(CoreError),
    NoObservations,
    NoText,
    InvalidStageInputs,
}

impl From<io::Error> for NephraCliError {
    fn from(e: io::Error) -> Self {
        NephraCliError::Io(e)
    }
}

impl From<serde_json::Error> for NephraCliError {
    fn from(e: serde_json::Error) -> Self {
        NephraCliError::Json(e)
    }
}

impl From<CoreError> for NephraCliError {
    fn from(e: CoreError) -> Self {
        NephraCliError::Core(e)
    }
}

#[derive(Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<NephraCliError> for CliError {
    fn from(e: NephraCliError) -> Self {
        match e {
            NephraCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            NephraCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            NephraCliError::Core(e) => CliError {
                code: "CORE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check observation fields and ranges".to_string()),
            },
            NephraCliError::NoObservations => CliError {
                code: "NO_OBSERVATIONS".to_string(),
                message: "No observations found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            NephraCliError::NoText => CliError {
                code: "NO_TEXT".to_string(),
                message: "No text supplied and stdin is a TTY".to_string(),
                hint: Some("Pass text as an argument or pipe it on stdin".to_string()),
            },
            NephraCliError::InvalidStageInputs => CliError {
                code: "INVALID_STAGE_INPUTS".to_string(),
                message: "Age and creatinine must both be positive".to_string(),
                hint: Some("Check --age and --creatinine values".to_string()),
            },
        }
    }
}
