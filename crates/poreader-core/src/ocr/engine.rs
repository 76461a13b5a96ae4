//! Image OCR backend using `pure-onnx-ocr`.
//!
//! The engine is not `Send`, so it lives on one dedicated worker thread and
//! requests reach it over a bounded channel.

use std::path::Path;
use std::thread;
use std::time::Instant;

use flume::Sender;
use image::{DynamicImage, GenericImageView};
use tracing::{debug, error, info, warn};

use super::{TextBox, join_text, sort_reading_order};
use crate::error::{ExtractionError, OcrError};
use crate::extract::TextExtractor;
use crate::models::config::{OcrConfig, PoReaderConfig};

/// Images waiting for the worker before senders block.
const QUEUE_DEPTH: usize = 16;

type Recognition = Result<Vec<TextBox>, OcrError>;

struct RecognizeJob {
    image: DynamicImage,
    resp: Sender<Recognition>,
}

enum EngineState {
    Ready(Sender<RecognizeJob>),
    Unavailable(String),
}

/// OCR extractor for scanned images.
///
/// Models are loaded once, on the worker thread. If they are missing the
/// extractor still exists and fails each request with [`OcrError::Unavailable`].
/// Dropping the extractor stops the worker.
pub struct OcrExtractor {
    state: EngineState,
    config: OcrConfig,
}

impl OcrExtractor {
    /// Load models from the configured model directory.
    pub fn from_config(config: &PoReaderConfig) -> Self {
        let det_path = config.model_path(&config.models.detection_model);
        let rec_path = config.model_path(&config.models.recognition_model);
        let dict_path = config.model_path(&config.models.dictionary);
        let model_dir = config.models.model_dir.clone();

        let extractor = Self::with_recognizer(
            move || {
                let engine = load_engine(&det_path, &rec_path, &dict_path)?;
                info!("Loaded OCR engine from {}", model_dir.display());
                Ok(move |image: &DynamicImage| run_engine(&engine, image))
            },
            config.ocr.clone(),
        );
        if let EngineState::Unavailable(reason) = &extractor.state {
            warn!("OCR disabled: {}", reason);
        }
        extractor
    }

    /// Create an extractor that rejects every image with `reason`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            state: EngineState::Unavailable(reason.into()),
            config: OcrConfig::default(),
        }
    }

    /// Start a worker that builds its recognizer with `load`.
    fn with_recognizer<F, R>(load: F, config: OcrConfig) -> Self
    where
        F: FnOnce() -> Result<R, String> + Send + 'static,
        R: FnMut(&DynamicImage) -> Recognition,
    {
        let state = match spawn_worker(load) {
            Ok(jobs) => EngineState::Ready(jobs),
            Err(reason) => EngineState::Unavailable(reason),
        };
        Self { state, config }
    }

    /// Check whether models were loaded.
    pub fn is_available(&self) -> bool {
        matches!(self.state, EngineState::Ready(_))
    }

    fn recognize(&self, data: &[u8]) -> Result<String, OcrError> {
        let jobs = match &self.state {
            EngineState::Ready(jobs) => jobs,
            EngineState::Unavailable(reason) => return Err(OcrError::Unavailable(reason.clone())),
        };

        let image =
            image::load_from_memory(data).map_err(|e| OcrError::InvalidImage(e.to_string()))?;
        let start = Instant::now();
        let (width, height) = image.dimensions();
        debug!("Running OCR on {}x{} image", width, height);

        let (resp_tx, resp_rx) = flume::bounded(1);
        jobs.send(RecognizeJob {
            image,
            resp: resp_tx,
        })
        .map_err(|_| worker_stopped())?;
        let mut boxes = resp_rx.recv().map_err(|_| worker_stopped())??;

        let recognized = boxes.len();
        boxes.retain(|b| b.confidence >= self.config.min_confidence);
        if boxes.len() < recognized {
            debug!(
                "Dropped {} boxes below confidence {}",
                recognized - boxes.len(),
                self.config.min_confidence
            );
        }
        if !self.config.keep_unk {
            for b in &mut boxes {
                b.text = b.text.replace("[UNK]", " ");
            }
        }

        sort_reading_order(&mut boxes, self.config.row_height);

        info!(
            "OCR complete: {} text boxes in {}ms",
            boxes.len(),
            start.elapsed().as_millis()
        );

        Ok(join_text(&boxes))
    }
}

impl TextExtractor for OcrExtractor {
    fn extract(&self, data: &[u8]) -> Result<String, ExtractionError> {
        Ok(self.recognize(data)?)
    }
}

fn worker_stopped() -> OcrError {
    OcrError::Recognition("OCR worker stopped".to_string())
}

/// Build the recognizer on a fresh thread and serve jobs until every sender is gone.
fn spawn_worker<F, R>(load: F) -> Result<Sender<RecognizeJob>, String>
where
    F: FnOnce() -> Result<R, String> + Send + 'static,
    R: FnMut(&DynamicImage) -> Recognition,
{
    let (tx, rx) = flume::bounded::<RecognizeJob>(QUEUE_DEPTH);
    let (ready_tx, ready_rx) = flume::bounded::<Result<(), String>>(1);

    thread::Builder::new()
        .name("ocr-engine".to_string())
        .spawn(move || {
            let mut recognize = match load() {
                Ok(recognize) => {
                    let _ = ready_tx.send(Ok(()));
                    recognize
                }
                Err(reason) => {
                    let _ = ready_tx.send(Err(reason));
                    return;
                }
            };
            while let Ok(job) = rx.recv() {
                let _ = job.resp.send(recognize(&job.image));
            }
            debug!("OCR worker stopped");
        })
        .map_err(|e| format!("failed to start OCR worker: {}", e))?;

    match ready_rx.recv() {
        Ok(Ok(())) => Ok(tx),
        Ok(Err(reason)) => Err(reason),
        Err(_) => {
            error!("OCR worker exited while loading models");
            Err("OCR worker exited while loading models".to_string())
        }
    }
}

fn run_engine(engine: &pure_onnx_ocr::engine::OcrEngine, image: &DynamicImage) -> Recognition {
    let results = engine
        .run_from_image(image)
        .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;
    Ok(results
        .into_iter()
        .map(|r| TextBox {
            bbox: polygon_to_bbox(&r.bounding_box),
            text: r.text,
            confidence: r.confidence,
        })
        .collect())
}

fn load_engine(
    det_path: &Path,
    rec_path: &Path,
    dict_path: &Path,
) -> Result<pure_onnx_ocr::engine::OcrEngine, String> {
    let missing: Vec<String> = [det_path, rec_path, dict_path]
        .iter()
        .filter(|p| !p.exists())
        .map(|p| p.display().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(format!("OCR models not found: {}", missing.join(", ")));
    }

    pure_onnx_ocr::engine::OcrEngineBuilder::new()
        .det_model_path(det_path)
        .rec_model_path(rec_path)
        .dictionary_path(dict_path)
        .build()
        .map_err(|e| format!("pure-onnx-ocr: {}", e))
}

/// Convert a `Polygon<f64>` to our `[f32; 8]` bbox format.
fn polygon_to_bbox(polygon: &pure_onnx_ocr::Polygon<f64>) -> [f32; 8] {
    let mut bbox = [0.0f32; 8];
    for (i, coord) in polygon.exterior().coords().take(4).enumerate() {
        bbox[i * 2] = coord.x as f32;
        bbox[i * 2 + 1] = coord.y as f32;
    }
    bbox
}
