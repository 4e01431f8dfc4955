//! `dlid` - AAMVA driver's license barcode payloads from the command line.
//!
//! ## Commands
//!
//! - `encode`: build a transcript from element values
//! - `encode-form`: build a transcript from a generator form (JSON)
//! - `decode`: interpret scanned barcode text
//! - `catalog`: list known elements, or describe one

use std::{
    convert::Infallible,
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use dlid_barcodes::{
    aamva::{self, catalog, CustomField, FieldMap, LegacyForm, Transcript},
    barcode::{self, BarcodeDecoder, BarcodeEncoder, DecodeSource, SymbolOptions},
    telemetry, NaiveDate, Utc,
};

#[derive(Parser)]
#[command(name = "dlid")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build and read AAMVA driver's license barcode payloads", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a transcript from element values
    Encode {
        /// Six digit issuer identification number
        #[arg(long, env = "DLID_ISSUER_ID", default_value = "636045")]
        issuer_id: String,

        /// Catalog element value, as CODE=VALUE
        #[arg(short, long = "field", value_parser = parse_assignment)]
        fields: Vec<(String, String)>,

        /// Additional element value, as CODE=VALUE; wins over --field
        #[arg(short, long = "custom", value_parser = parse_assignment)]
        custom: Vec<(String, String)>,

        /// CSV file of additional elements with `code,value` headers
        #[arg(long)]
        fields_csv: Option<PathBuf>,

        /// Issue date used when DBD is not given (default: today, UTC)
        #[arg(long)]
        issue_date: Option<NaiveDate>,

        #[command(flatten)]
        symbol: SymbolArgs,

        /// Print the render request as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build a transcript from a generator form
    EncodeForm {
        /// JSON form file, or `-` for stdin
        #[arg(default_value = "-")]
        path: PathBuf,

        #[command(flatten)]
        symbol: SymbolArgs,

        /// Print the render request as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interpret scanned barcode text
    Decode {
        /// Text file, or `-` for stdin
        #[arg(default_value = "-")]
        path: PathBuf,

        /// Print the full decode result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List known elements, or describe one
    Catalog {
        /// Element code to describe
        code: Option<String>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

/// PDF417 rendering options forwarded to the image encoder.
#[derive(Args)]
struct SymbolArgs {
    /// Module width in pixels (1-12)
    #[arg(long, default_value_t = SymbolOptions::default().scale)]
    scale: u32,

    /// Row height in modules (3-40)
    #[arg(long, default_value_t = SymbolOptions::default().height)]
    height: u32,

    /// Quiet zone in pixels (0-30)
    #[arg(long, default_value_t = SymbolOptions::default().padding)]
    padding: u32,

    /// Number of data columns
    #[arg(long)]
    columns: Option<u32>,

    /// Number of rows
    #[arg(long)]
    rows: Option<u32>,

    /// Error correction level
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=8))]
    error_correction_level: Option<u8>,

    /// Use compact PDF417
    #[arg(long)]
    compact: bool,
}

impl From<SymbolArgs> for SymbolOptions {
    fn from(args: SymbolArgs) -> Self {
        Self {
            scale: args.scale,
            height: args.height,
            padding: args.padding,
            columns: args.columns,
            rows: args.rows,
            error_correction_level: args.error_correction_level,
            compact: args.compact,
        }
    }
}

/// What an image encoder receives.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderRequest {
    payload: String,
    symbol: SymbolOptions,
}

/// Stops at the render request; rendering happens downstream.
struct RenderRequestEncoder;

impl BarcodeEncoder for RenderRequestEncoder {
    type Image = RenderRequest;
    type Error = Infallible;

    fn encode(&self, payload: &str, options: &SymbolOptions) -> Result<RenderRequest, Infallible> {
        Ok(RenderRequest {
            payload: payload.to_owned(),
            symbol: *options,
        })
    }
}

/// Barcode text that was already decoded elsewhere.
struct DecodedText;

impl BarcodeDecoder<str> for DecodedText {
    type Error = Infallible;

    fn decode_text(&self, input: &str) -> Result<String, Infallible> {
        Ok(input.to_owned())
    }
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (code, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected CODE=VALUE, found `{s}`"))?;
    Ok((code.to_owned(), value.to_owned()))
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        Ok(buffer)
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.json_logs, telemetry::level_for(cli.verbose));

    match cli.command {
        Commands::Encode {
            issuer_id,
            fields,
            custom,
            fields_csv,
            issue_date,
            symbol,
            json,
        } => {
            let fields: FieldMap = fields.into_iter().collect();
            let mut custom_fields = match fields_csv {
                Some(path) => {
                    let file = fs::File::open(&path)
                        .with_context(|| format!("Failed to open {:?}", path))?;
                    aamva::read_custom_fields(file)
                        .with_context(|| format!("Invalid fields CSV {:?}", path))?
                }
                None => Vec::new(),
            };
            custom_fields.extend(custom.into_iter().map(|(c, v)| CustomField::new(c, v)));

            let today = issue_date.unwrap_or_else(|| Utc::now().date_naive());
            let transcript =
                aamva::build_from_fields_on(today, &issuer_id, &fields, &custom_fields)?;
            emit(transcript, symbol.into(), json)
        }
        Commands::EncodeForm { path, symbol, json } => {
            let input = read_input(&path)?;
            let form: LegacyForm = serde_json::from_str(&input)
                .with_context(|| format!("Invalid form JSON in {:?}", path))?;
            let transcript = aamva::build_from_legacy_form(&form)?;
            emit(transcript, symbol.into(), json)
        }
        Commands::Decode { path, json } => {
            let input = read_input(&path)?;
            let result = barcode::scan(&DecodedText, input.as_str(), DecodeSource::ImageUpload)?;

            if json {
                return print_json(&result);
            }

            let parsed = result.parsed.unwrap_or_default();
            println!("likely AAMVA: {}", parsed.is_likely_aamva);
            if let Some(version) = &parsed.version {
                println!("version: {version}");
            }
            for (key, value) in &parsed.fields {
                println!("{key}: {value}");
            }
            for warning in &parsed.warnings {
                println!("warning: {warning}");
            }
            Ok(())
        }
        Commands::Catalog { code, json } => match code {
            Some(code) => describe(&code, json),
            None if json => print_json(&catalog::definitions().collect::<Vec<_>>()),
            None => {
                for definition in catalog::definitions() {
                    let marker = if catalog::is_required(definition.code) {
                        "*"
                    } else {
                        " "
                    };
                    println!("{}{} {}", definition.code, marker, definition.label);
                }
                Ok(())
            }
        },
    }
}

fn emit(transcript: Transcript, options: SymbolOptions, json: bool) -> Result<()> {
    let request = barcode::generate(&RenderRequestEncoder, transcript.as_str(), &options)?;
    if json {
        print_json(&request)
    } else {
        print!("{}", request.payload);
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ElementDescription {
    #[serde(flatten)]
    definition: catalog::FieldDefinition,
    required: bool,
    date: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    help: Option<&'static catalog::FieldHelp>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    options: Vec<catalog::SelectOption>,
}

fn describe(code: &str, json: bool) -> Result<()> {
    let code = code.trim().to_ascii_uppercase();
    let definition =
        catalog::definition(&code).with_context(|| format!("Unknown element code `{code}`"))?;
    let description = ElementDescription {
        definition,
        required: catalog::is_required(&code),
        date: catalog::is_date_code(&code),
        help: catalog::help(&code),
        options: catalog::select_options(&code).to_vec(),
    };

    if json {
        return print_json(&description);
    }

    println!("{} {}", definition.code, definition.label);
    if let Some(label) = definition.jurisdiction_label {
        println!("  jurisdiction label: {label}");
    }
    println!("  required: {}", description.required);
    if description.date {
        println!("  format: YYYY-MM-DD or MMDDYYYY");
    }
    if let Some(help) = description.help {
        println!("  what: {}", help.what);
        println!("  use: {}", help.jurisdiction_use);
        println!("  example: {}", help.example);
    }
    for option in &description.options {
        println!("  {} = {}", option.value, option.label);
    }
    Ok(())
}
