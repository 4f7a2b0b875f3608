//! Three-stage batch conversion pipeline
//!
//! This module orchestrates the stages of a batch run:
//! 1. **Discovery**: Collect input files from the given paths
//! 2. **Conversion**: Track one conversion per input and run each independently
//! 3. **Export**: Write the resulting documents as XML or JSON

use crate::config::OutputFormat;
use crate::conversion::{
    output_file_name, process_conversion, Conversion, ConversionStatus, ConversionStore,
    StoreError,
};
use crate::document_model::Document;
use crate::error::ConversionError;
use crate::extraction::{PayloadExtractor, TextExtractor};
use crate::json_exporter::to_json;
use crate::xml_exporter::{to_xml_with_layout, XmlLayout};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Settings for a batch run
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Output document format
    pub format: OutputFormat,
    /// XML whitespace layout
    pub layout: XmlLayout,
    /// Directory to write results to; next to each input when `None`
    pub output_dir: Option<PathBuf>,
}

/// Result of one conversion in a batch
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    /// Input file
    pub input: PathBuf,
    /// Conversion record id
    pub conversion_id: String,
    /// Final status of the record
    pub status: ConversionStatus,
    /// Written output file, if the conversion and export succeeded
    pub output: Option<PathBuf>,
    /// Number of pages and sections of the converted document
    pub summary: Option<(usize, usize)>,
    /// Failure description
    pub error: Option<String>,
}

/// Stage 1: Discover input files
///
/// Files are taken as given. Directories are walked recursively for files
/// the payload extractor supports, in sorted order.
///
/// # Returns
/// * `Ok(Vec<PathBuf>)` - Input files in discovery order
/// * `Err(PipelineError)` - A path does not exist
pub fn discover_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>, PipelineError> {
    let mut inputs = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .follow_links(false)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.path().is_file() && PayloadExtractor::supports(e.path()))
                .map(|e| e.path().to_path_buf())
                .collect();
            found.sort();
            if found.is_empty() {
                log::warn!("No convertible files found in {}", path.display());
            }
            inputs.extend(found);
        } else if path.is_file() {
            inputs.push(path.clone());
        } else {
            return Err(PipelineError::MissingInput(path.clone()));
        }
    }

    Ok(inputs)
}

/// Stage 2 and 3: Convert every input and export the results
///
/// Each input gets its own conversion record. Conversions are independent;
/// one failing does not stop the others. Output paths are planned for the
/// whole batch first: an input whose output would land on another input, or
/// on the same file as another input's output, is converted but not written.
///
/// # Parameters
/// * `inputs` - Files returned by [`discover_inputs`]
/// * `store` - Where conversion records are kept
/// * `extractor` - Source of extracted text
/// * `options` - Output settings
///
/// # Returns
/// * `Ok(Vec<ConversionOutcome>)` - One outcome per input, in input order
/// * `Err(PipelineError)` - The conversion store failed
pub fn run<S, E>(
    inputs: &[PathBuf],
    store: &S,
    extractor: &E,
    options: &PipelineOptions,
) -> Result<Vec<ConversionOutcome>, PipelineError>
where
    S: ConversionStore,
    E: TextExtractor,
{
    let records: Vec<Conversion> = inputs
        .iter()
        .map(|input| store.create(&display_name(input), input))
        .collect::<Result<_, _>>()?;

    let planned = plan_outputs(inputs, options);

    #[cfg(feature = "parallel")]
    let outcomes: Vec<ConversionOutcome> = records
        .par_iter()
        .zip(planned.par_iter())
        .map(|(record, output)| run_one(record, output, store, extractor, options))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<ConversionOutcome> = records
        .iter()
        .zip(planned.iter())
        .map(|(record, output)| run_one(record, output, store, extractor, options))
        .collect();

    Ok(outcomes)
}

/// Run and export a single conversion
fn run_one<S, E>(
    record: &Conversion,
    output: &Result<PathBuf, ExportError>,
    store: &S,
    extractor: &E,
    options: &PipelineOptions,
) -> ConversionOutcome
where
    S: ConversionStore,
    E: TextExtractor,
{
    let mut outcome = ConversionOutcome {
        input: record.file_path.clone(),
        conversion_id: record.id.clone(),
        status: ConversionStatus::Failed,
        output: None,
        summary: None,
        error: None,
    };

    let doc = match process_conversion(store, extractor, &record.id, options.layout) {
        Ok(doc) => doc,
        Err(e) => {
            outcome.error = Some(e.to_string());
            return outcome;
        }
    };

    outcome.status = ConversionStatus::Completed;
    outcome.summary = Some((doc.pages.len(), doc.section_count()));

    let output_path = match output {
        Ok(path) => path,
        Err(e) => {
            log::error!("Not exporting {}: {}", record.original_file_name, e);
            outcome.error = Some(e.to_string());
            return outcome;
        }
    };
    match export::write_document(&doc, output_path, &record.file_path, options) {
        Ok(()) => outcome.output = Some(output_path.clone()),
        Err(e) => {
            log::error!("Failed to export {}: {}", record.original_file_name, e);
            outcome.error = Some(e.to_string());
        }
    }

    outcome
}

/// Where the result for `input` is written
pub fn output_path_for(input: &Path, options: &PipelineOptions) -> PathBuf {
    let name = output_file_name(&display_name(input), options.format.extension());
    let dir = match &options.output_dir {
        Some(dir) => dir.clone(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    dir.join(name)
}

/// Output path of every input, or why it must not be written
///
/// # Returns
/// One entry per input, in input order:
/// * `Ok(PathBuf)` - The output belongs to this input alone
/// * `Err(ExportError::WouldOverwriteInput)` - The output is one of the inputs
/// * `Err(ExportError::SharedOutput)` - Another input maps to the same output
pub fn plan_outputs(
    inputs: &[PathBuf],
    options: &PipelineOptions,
) -> Vec<Result<PathBuf, ExportError>> {
    let outputs: Vec<PathBuf> = inputs
        .iter()
        .map(|input| output_path_for(input, options))
        .collect();

    let sources: HashSet<&Path> = inputs.iter().map(PathBuf::as_path).collect();
    let mut claims: HashMap<&Path, Vec<&Path>> = HashMap::new();
    for (input, output) in inputs.iter().zip(&outputs) {
        claims.entry(output.as_path()).or_default().push(input);
    }

    outputs
        .iter()
        .map(|output| {
            let claimants = &claims[output.as_path()];
            if sources.contains(output.as_path()) {
                Err(ExportError::WouldOverwriteInput(output.clone()))
            } else if claimants.len() > 1 {
                Err(ExportError::SharedOutput {
                    path: output.clone(),
                    inputs: claimants.iter().map(|p| p.to_path_buf()).collect(),
                })
            } else {
                Ok(output.clone())
            }
        })
        .collect()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Export stage
pub mod export {
    use super::*;
    use std::fs;

    /// Serialize a document in the configured format and write it to `output_path`
    ///
    /// # Returns
    /// * `Ok(())` - Successfully written
    /// * `Err(ExportError)` - Serialization or IO failed, or the output would replace the input
    pub fn write_document(
        doc: &Document,
        output_path: &Path,
        input_path: &Path,
        options: &PipelineOptions,
    ) -> Result<(), ExportError> {
        if output_path == input_path {
            return Err(ExportError::WouldOverwriteInput(output_path.to_path_buf()));
        }

        let content = match options.format {
            OutputFormat::Xml => to_xml_with_layout(doc, options.layout)?,
            OutputFormat::Json => to_json(doc)?,
        };

        // Create parent directories if they don't exist
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| ExportError::IoError {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        fs::write(output_path, content).map_err(|source| ExportError::IoError {
            path: output_path.to_path_buf(),
            source,
        })?;

        log::info!("Wrote {}", output_path.display());
        Ok(())
    }
}

/// Pipeline errors
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Input not found: {path}", path = .0.display())]
    MissingInput(PathBuf),

    #[error("Conversion store error: {0}")]
    Store(#[from] StoreError),
}

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error writing {path}: {source}", path = .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Refusing to overwrite input file {path}", path = .0.display())]
    WouldOverwriteInput(PathBuf),

    #[error("Output {path} is shared by {count} inputs", path = .path.display(), count = .inputs.len())]
    SharedOutput { path: PathBuf, inputs: Vec<PathBuf> },

    #[error(transparent)]
    Serialization(#[from] ConversionError),
}
