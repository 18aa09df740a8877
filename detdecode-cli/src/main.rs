use clap::Parser;
use detdecode::{
    DecodeConfig, Decoder, DetectError, LabelMap, LabeledPrediction, Rect, SuppressionMode,
    TensorView,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Decode raw detector outputs into boxes (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum SuppressionConfig {
    ClassAgnostic,
    PerClass,
}

impl From<SuppressionConfig> for SuppressionMode {
    fn from(value: SuppressionConfig) -> Self {
        match value {
            SuppressionConfig::ClassAgnostic => SuppressionMode::ClassAgnostic,
            SuppressionConfig::PerClass => SuppressionMode::PerClass,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DecodeConfigJson {
    confidence_threshold: f32,
    nms_threshold: f32,
    suppression: SuppressionConfig,
    parallel: bool,
}

impl Default for DecodeConfigJson {
    fn default() -> Self {
        let cfg = DecodeConfig::default();
        Self {
            confidence_threshold: cfg.confidence_threshold,
            nms_threshold: cfg.nms_threshold,
            suppression: SuppressionConfig::ClassAgnostic,
            parallel: cfg.parallel,
        }
    }
}

impl From<DecodeConfigJson> for DecodeConfig {
    fn from(value: DecodeConfigJson) -> Self {
        Self {
            confidence_threshold: value.confidence_threshold,
            nms_threshold: value.nms_threshold,
            suppression: value.suppression.into(),
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FrameSize {
    width: f64,
    height: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    input_path: String,
    labels_path: Option<String>,
    output_path: Option<String>,
    frame: Option<FrameSize>,
    decode: DecodeConfigJson,
}

#[derive(Debug, Deserialize)]
struct TensorJson {
    shape: Vec<usize>,
    data: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct ModelOutputs {
    coordinates: Option<TensorJson>,
    confidence: Option<TensorJson>,
}

#[derive(Debug, Serialize)]
struct RectRecord {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl From<Rect> for RectRecord {
    fn from(value: Rect) -> Self {
        Self {
            x: value.x,
            y: value.y,
            width: value.width,
            height: value.height,
        }
    }
}

#[derive(Debug, Serialize)]
struct PredictionRecord {
    label_index: usize,
    label: Option<String>,
    confidence: f32,
    bbox: RectRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pixel_bbox: Option<RectRecord>,
}

impl PredictionRecord {
    fn new(value: &LabeledPrediction<'_>, frame: Option<&FrameSize>) -> Self {
        let bbox = value.prediction.bounding_box;
        Self {
            label_index: value.prediction.label_index,
            label: value.label.map(str::to_owned),
            confidence: value.prediction.confidence,
            bbox: bbox.into(),
            pixel_bbox: frame.map(|f| bbox.to_pixels(f.width, f.height).into()),
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    count: usize,
    predictions: Vec<PredictionRecord>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("detdecode=debug".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.input_path.is_empty() {
        return Err("input_path must be set in the config".into());
    }
    if let Some(frame) = &config.frame {
        if frame.width <= 0.0 || frame.height <= 0.0 {
            return Err("frame width and height must be positive".into());
        }
    }

    let mut decoder = Decoder::new().with_config(config.decode.into());
    if let Some(path) = &config.labels_path {
        let text = fs::read_to_string(path)?;
        decoder = decoder.with_labels(LabelMap::from_lines(&text));
    }

    let outputs: ModelOutputs = serde_json::from_str(&fs::read_to_string(&config.input_path)?)?;
    let coordinates = outputs.coordinates.ok_or(DetectError::MissingInput {
        tensor: "coordinates",
    })?;
    let confidence = outputs.confidence.ok_or(DetectError::MissingInput {
        tensor: "confidence",
    })?;
    let coord_view = TensorView::from_shape(&coordinates.data, &coordinates.shape, "coordinates")?;
    let conf_view = TensorView::from_shape(&confidence.data, &confidence.shape, "confidence")?;

    let predictions = decoder.decode_labeled(conf_view, coord_view)?;
    tracing::info!(count = predictions.len(), "decoded predictions");

    let records: Vec<PredictionRecord> = predictions
        .iter()
        .map(|p| PredictionRecord::new(p, config.frame.as_ref()))
        .collect();
    let output = Output {
        count: records.len(),
        predictions: records,
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
