use super::{BatchResult, TrimPlan};
use crate::codec::{Codec, TEMP_PREFIX};
use crate::core::AudioFormat;
use crate::error::{AudioError, AudioResult};
use log::{error, info, warn};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Subfolder of the input folder used when no output folder is given
pub const DEFAULT_OUTPUT_SUBFOLDER: &str = "trimmed";

/// Result of trimming a single file that did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum TrimOutcome {
    /// Trimmed copy written
    Processed {
        /// Written file
        output: PathBuf,
        /// Source duration in seconds
        duration_secs: f64,
        /// Duration of the written window in seconds
        trimmed_secs: f64,
    },
    /// Too short to trim; nothing written
    Skipped {
        /// Source duration in seconds
        duration_secs: f64,
    },
}

/// List the audio files directly inside `input_folder`, sorted by name
pub fn discover_assets(input_folder: &Path) -> AudioResult<Vec<PathBuf>> {
    if !input_folder.is_dir() {
        return Err(AudioError::NotFound {
            path: input_folder.to_path_buf(),
        });
    }

    let mut assets = Vec::new();
    for entry in fs::read_dir(input_folder)? {
        let path = entry?.path();
        let staged = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(TEMP_PREFIX));

        if !staged && path.is_file() && AudioFormat::from_path(&path).is_some() {
            assets.push(path);
        }
    }

    assets.sort();
    Ok(assets)
}

/// Output folder for a batch: the given one, or `<input>/trimmed`
pub fn resolve_output_folder(input_folder: &Path, output_folder: Option<&Path>) -> PathBuf {
    output_folder
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input_folder.join(DEFAULT_OUTPUT_SUBFOLDER))
}

/// Resolve the output folder and create it with any missing parents
pub fn ensure_output_folder(
    input_folder: &Path,
    output_folder: Option<&Path>,
) -> AudioResult<PathBuf> {
    let folder = resolve_output_folder(input_folder, output_folder);
    fs::create_dir_all(&folder).map_err(|source| AudioError::OutputFolder {
        path: folder.clone(),
        source,
    })?;
    Ok(folder)
}

/// Output path for `source`: same file name, extension swapped if the container changes
fn output_path(source: &Path, output_folder: &Path, input: AudioFormat, output: AudioFormat) -> PathBuf {
    let file_name = source.file_name().map(PathBuf::from).unwrap_or_default();
    let target = output_folder.join(file_name);
    if input == output {
        target
    } else {
        target.with_extension(output.extension())
    }
}

/// Sequential trimmer over one codec backend
#[derive(Debug, Clone)]
pub struct BatchTrimmer<C> {
    codec: C,
    plan: TrimPlan,
}

impl<C: Codec> BatchTrimmer<C> {
    /// Create a trimmer
    pub fn new(codec: C, plan: TrimPlan) -> Self {
        BatchTrimmer { codec, plan }
    }

    /// Trim one file into `output_folder`
    ///
    /// Open failures come back as [`AudioError::Open`], slice and write
    /// failures as [`AudioError::Export`]. The opened asset is dropped before
    /// returning on every path.
    pub fn trim_one(&self, source: &Path, output_folder: &Path) -> AudioResult<TrimOutcome> {
        self.trim_into(source, output_folder, &HashMap::new())
    }

    /// `trim_one`, refusing outputs already written for another source in `claimed`
    fn trim_into(
        &self,
        source: &Path,
        output_folder: &Path,
        claimed: &HashMap<PathBuf, PathBuf>,
    ) -> AudioResult<TrimOutcome> {
        let format = AudioFormat::from_path(source).ok_or_else(|| {
            AudioError::open(
                source,
                AudioError::UnsupportedFormat("unrecognised file extension".to_string()),
            )
        })?;

        let opened = self
            .codec
            .open(source, format)
            .map_err(|e| AudioError::open(source, e))?;
        let duration_secs = opened.duration_secs;

        let Some(window) = self.plan.window(duration_secs) else {
            warn!(
                "  {} is not longer than {:.2}s ({:.2}s), skipping",
                display_name(source),
                self.plan.min_duration_secs(),
                duration_secs
            );
            return Ok(TrimOutcome::Skipped { duration_secs });
        };

        let output_format = self.codec.output_format(format);
        let output = output_path(source, output_folder, format, output_format);
        if let Some(first) = claimed.get(&output) {
            return Err(AudioError::Export {
                reason: format!("output name collides with {}", display_name(first)),
                path: output,
            });
        }

        let clip = self
            .codec
            .slice(&opened.handle, &window)
            .map_err(|e| AudioError::export(&output, e))?;
        // Release the decoded source before writing
        drop(opened);

        self.codec
            .export(&clip, &output, output_format)
            .map_err(|e| AudioError::export(&output, e))?;

        Ok(TrimOutcome::Processed {
            output,
            duration_secs,
            trimmed_secs: window.len_secs(),
        })
    }

    /// Trim every audio file in `input_folder`, isolating per-file failures
    pub fn run(&self, input_folder: &Path, output_folder: Option<&Path>) -> AudioResult<BatchResult> {
        let assets = discover_assets(input_folder)?;

        if assets.is_empty() {
            info!("No audio files found in {}", input_folder.display());
            return Ok(BatchResult {
                output_folder: resolve_output_folder(input_folder, output_folder),
                ..Default::default()
            });
        }

        let output_folder = ensure_output_folder(input_folder, output_folder)?;
        info!(
            "Found {} audio files, trimming {:.2}s/{:.2}s with the {} backend",
            assets.len(),
            self.plan.start_offset_secs(),
            self.plan.end_offset_secs(),
            self.codec.name()
        );

        let mut result = BatchResult {
            output_folder,
            ..Default::default()
        };

        // output path -> source that produced it
        let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
        let total = assets.len();
        for (i, source) in assets.into_iter().enumerate() {
            info!("[{}/{}] {}", i + 1, total, display_name(&source));

            match self.trim_into(&source, &result.output_folder, &claimed) {
                Ok(TrimOutcome::Processed {
                    output,
                    duration_secs,
                    trimmed_secs,
                }) => {
                    info!(
                        "  saved {} ({:.2}s -> {:.2}s)",
                        display_name(&output),
                        duration_secs,
                        trimmed_secs
                    );
                    claimed.insert(output, source);
                    result.processed += 1;
                }
                Ok(TrimOutcome::Skipped { .. }) => result.skipped += 1,
                Err(e) => {
                    error!("  failed {}: {}", display_name(&source), e);
                    result.failed += 1;
                    result.failures.push((source, e));
                }
            }
        }

        info!(
            "Done: {} processed, {} skipped, {} failed. Output: {}",
            result.processed,
            result.skipped,
            result.failed,
            result.output_folder.display()
        );

        Ok(result)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
