//! File codecs for dataset save/load, import and export.
//!
//! # Responsibility
//! - Read and write whole-dataset JSON documents.
//! - Decode bare-array import files.
//! - Write rendered citation lists with per-dialect separators.
//!
//! # Invariants
//! - Load rejects unusable ids before anything reaches a store.
//! - Imported records always come back with `id = 0`.
//! - Log lines carry paths and counts only, never record content.

use super::dataset::Dataset;
use super::{CodecError, CodecResult};
use crate::format::citation::{render, CitationFormat};
use crate::model::reference::Reference;
use log::{error, info};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Writes the dataset as one pretty-printed JSON document.
///
/// # Errors
/// - `Io` when the file cannot be created or written.
pub fn save_to_file(path: impl AsRef<Path>, dataset: &Dataset) -> CodecResult<()> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!("event=dataset_save module=persist status=start");

    let result = serde_json::to_string_pretty(dataset)
        .map_err(|err| CodecError::Encode(err.to_string()))
        .and_then(|json| fs::write(path, json).map_err(|err| CodecError::io(path, err)));

    match &result {
        Ok(()) => info!(
            "event=dataset_save module=persist status=ok duration_ms={} references={} contexts={}",
            started_at.elapsed().as_millis(),
            dataset.references.len(),
            dataset.contexts.len()
        ),
        Err(err) => error!(
            "event=dataset_save module=persist status=error duration_ms={} error_code={} error={}",
            started_at.elapsed().as_millis(),
            err.code(),
            err
        ),
    }
    result
}

/// Reads a dataset document.
///
/// Missing top-level keys are tolerated. Counters lower than a stored id are
/// raised so later auto-assigned ids stay unique.
///
/// # Errors
/// - `Io` when the file cannot be read.
/// - `Parse` when the content is not JSON, the root is not an object, or a
///   stored id is missing, repeated within one collection or `i64::MAX`.
pub fn load_from_file(path: impl AsRef<Path>) -> CodecResult<Dataset> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!("event=dataset_load module=persist status=start");

    let result = decode_dataset(path);
    match &result {
        Ok(dataset) => info!(
            "event=dataset_load module=persist status=ok duration_ms={} references={} contexts={}",
            started_at.elapsed().as_millis(),
            dataset.references.len(),
            dataset.contexts.len()
        ),
        Err(err) => error!(
            "event=dataset_load module=persist status=error duration_ms={} error_code={} error={}",
            started_at.elapsed().as_millis(),
            err.code(),
            err
        ),
    }
    result
}

fn decode_dataset(path: &Path) -> CodecResult<Dataset> {
    let root = read_json(path)?;
    if !root.is_object() {
        return Err(CodecError::parse(path, "dataset root must be a JSON object"));
    }

    let mut dataset: Dataset =
        serde_json::from_value(root).map_err(|err| CodecError::parse(path, err.to_string()))?;
    dataset
        .reconcile()
        .map_err(|err| CodecError::parse(path, err.to_string()))?;
    Ok(dataset)
}

/// Reads a bare JSON array of reference objects.
///
/// Ids present in the file are discarded (set to `0`). Each element is
/// decoded field by field: missing, `null` or wrong-typed values take their
/// defaults, and elements that are not objects decode as default records.
///
/// # Errors
/// - `Io` when the file cannot be read.
/// - `Parse` when the content is not JSON or not an array.
pub fn import_references(path: impl AsRef<Path>) -> CodecResult<Vec<Reference>> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!("event=references_import module=persist status=start");

    let result = decode_import(path);
    match &result {
        Ok(items) => info!(
            "event=references_import module=persist status=ok duration_ms={} references={}",
            started_at.elapsed().as_millis(),
            items.len()
        ),
        Err(err) => error!(
            "event=references_import module=persist status=error duration_ms={} error_code={} error={}",
            started_at.elapsed().as_millis(),
            err.code(),
            err
        ),
    }
    result
}

fn decode_import(path: &Path) -> CodecResult<Vec<Reference>> {
    let Value::Array(items) = read_json(path)? else {
        return Err(CodecError::parse(path, "import file must contain a JSON array"));
    };
    Ok(items.iter().map(Reference::from_json_lenient).collect())
}

/// Renders references as one export document.
///
/// - BibTeX: each entry followed by an empty line.
/// - Harvard: entries separated by an empty line.
/// - DSTU: entries numbered from 1, separated by an empty line.
pub fn render_export<'a>(
    format: CitationFormat,
    references: impl IntoIterator<Item = &'a Reference>,
) -> String {
    let mut out = String::new();
    for (index, reference) in references.into_iter().enumerate() {
        let rendered = render(reference, format);
        match format {
            CitationFormat::BibTex => {
                out.push_str(&rendered);
                out.push('\n');
            }
            CitationFormat::Harvard => {
                out.push_str(&rendered);
                out.push_str("\n\n");
            }
            CitationFormat::Dstu => {
                out.push_str(&format!("{}. {rendered}\n\n", index + 1));
            }
        }
    }
    out
}

/// Writes rendered references to a text file in the given order.
///
/// Returns the number of exported references.
///
/// # Errors
/// - `Io` when the file cannot be created or written.
pub fn export_references<'a>(
    path: impl AsRef<Path>,
    format: CitationFormat,
    references: impl IntoIterator<Item = &'a Reference>,
) -> CodecResult<usize> {
    let path = path.as_ref();
    let started_at = Instant::now();
    let references: Vec<&Reference> = references.into_iter().collect();
    info!(
        "event=references_export module=persist status=start format={} references={}",
        format,
        references.len()
    );

    let document = render_export(format, references.iter().copied());
    match fs::write(path, document) {
        Ok(()) => {
            info!(
                "event=references_export module=persist status=ok format={} duration_ms={}",
                format,
                started_at.elapsed().as_millis()
            );
            Ok(references.len())
        }
        Err(err) => {
            let err = CodecError::io(path, err);
            error!(
                "event=references_export module=persist status=error format={} duration_ms={} error_code={} error={}",
                format,
                started_at.elapsed().as_millis(),
                err.code(),
                err
            );
            Err(err)
        }
    }
}

fn read_json(path: &Path) -> CodecResult<Value> {
    let raw = fs::read_to_string(path).map_err(|err| CodecError::io(path, err))?;
    serde_json::from_str(&raw).map_err(|err| CodecError::parse(path, err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::render_export;
    use crate::format::citation::CitationFormat;
    use crate::model::reference::{Reference, ReferenceType};

    fn sample(title: &str) -> Reference {
        Reference::new(ReferenceType::Article, title, "Ann Lee").with_year(2020)
    }

    #[test]
    fn dstu_export_numbers_entries_from_one() {
        let items = [sample("First"), sample("Second")];
        let text = render_export(CitationFormat::Dstu, &items);
        assert_eq!(text, "1. Ann Lee First, 2020.\n\n2. Ann Lee Second, 2020.\n\n");
    }

    #[test]
    fn empty_list_exports_empty_document() {
        let items: [Reference; 0] = [];
        assert!(render_export(CitationFormat::BibTex, &items).is_empty());
    }
}
