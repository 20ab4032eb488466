//! Eligible-text inspection: what a document *would* get localized.

use std::fs;

use anyhow::{Context, Result};
use serde::Serialize;

use pseudoloc::config::{FileConfig, LocalizeConfig};
use pseudoloc::dom::Document;
use pseudoloc::pipeline::text_nodes_under;

use super::ScanArgs;

/// Everything one activation pass would rewrite, in document order.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    /// Eligible text node values (raw, whitespace preserved).
    pub texts: Vec<String>,
    /// Values of the configured attributes, per element carrying one.
    pub attributes: Vec<AttributeHit>,
}

/// One attribute value the attribute pass would rewrite.
#[derive(Debug, Serialize)]
pub struct AttributeHit {
    pub attribute: String,
    pub value: String,
}

/// Run the `scan` command.
pub fn run_scan(args: &ScanArgs, config: &FileConfig) -> Result<()> {
    let html = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let doc = Document::parse(&html)?;

    let config = LocalizeConfig::new(config.clone().into_options());
    let report = scan_document(&doc, &config);

    if args.json || args.pretty {
        let formatted = if args.pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        println!("{formatted}");
    } else {
        for text in &report.texts {
            println!("{}", text.trim());
        }
        for hit in &report.attributes {
            println!("[{}] {}", hit.attribute, hit.value);
        }
    }
    Ok(())
}

/// Collect what the bulk pass and the attribute pass would touch, without
/// writing anything.
pub fn scan_document(doc: &Document, config: &LocalizeConfig) -> ScanReport {
    let root = doc.body().unwrap_or_else(|| doc.root());

    let texts = text_nodes_under(doc, root, config)
        .into_iter()
        .filter_map(|id| doc.text(id))
        .map(str::to_owned)
        .collect();

    let mut attributes = Vec::new();
    for name in &config.attributes {
        for id in doc.elements_with_attribute(name) {
            if let Some(value) = doc.attribute(id, name) {
                attributes.push(AttributeHit {
                    attribute: name.clone(),
                    value: value.to_owned(),
                });
            }
        }
    }

    ScanReport { texts, attributes }
}
