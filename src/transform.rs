//! Per-file transforms applied before sources are concatenated into the
//! readable bundle.
//!
//! Each file passes through, in order:
//!
//! 1. removal of a leading `/*! ... */` license header,
//! 2. removal of the namespace self-assignment (`var ns = ns || {};`),
//! 3. removal of inline `namespace:` comment markers,
//! 4. removal of `/** ... @module ... */` documentation blocks,
//! 5. whitespace trimming,
//! 6. a separator banner naming the file.

use regex::Regex;

use crate::error::Result;

const LICENSE_HEADER: &str = r"\A\s*/\*!(?s:.*?)\*/";
const NAMESPACE_MARKER: &str = r"/\*[ \t]*namespace:[^*]*\*/|//[ \t]*namespace:[^\r\n]*";
const MODULE_DOC: &str = r"/\*\*(?:[^*]|\*+[^*/])*@module(?:[^*]|\*+[^*/])*\*+/";

/// Compiled transform pipeline for one bundle build.
#[derive(Debug, Clone)]
pub struct ConcatTransform {
    license: Regex,
    namespace: Option<Regex>,
    marker: Regex,
    module_doc: Regex,
}

impl ConcatTransform {
    /// Build the pipeline. `namespace` names the global object whose
    /// self-assignment is stripped; `None` skips that step.
    pub fn new(namespace: Option<&str>) -> Result<Self> {
        let namespace = match namespace {
            Some(ns) => {
                let ns = regex::escape(ns);
                Some(Regex::new(&format!(
                    r"(?m)^[ \t]*(?:(?:var|let|const)[ \t]+)?{ns}[ \t]*=[ \t]*{ns}[ \t]*\|\|[ \t]*\{{[ \t]*\}}[ \t]*;?[ \t]*\r?\n?",
                    ns = ns
                ))?)
            }
            None => None,
        };

        Ok(Self {
            license: Regex::new(LICENSE_HEADER)?,
            namespace,
            marker: Regex::new(NAMESPACE_MARKER)?,
            module_doc: Regex::new(MODULE_DOC)?,
        })
    }

    /// Transform one source file. `file_name` is used in the banner.
    pub fn apply(&self, file_name: &str, source: &str) -> String {
        let body = self.license.replace(source, "");
        let body = match &self.namespace {
            Some(re) => re.replace_all(&body, "").into_owned(),
            None => body.into_owned(),
        };
        let body = self.marker.replace_all(&body, "");
        let body = self.module_doc.replace_all(&body, "");

        format!("{}{}", separator_banner(file_name), body.trim())
    }
}

/// Banner inserted ahead of every concatenated file.
pub fn separator_banner(file_name: &str) -> String {
    format!("\n\n/* ---------- {} ---------- */\n\n", file_name)
}
