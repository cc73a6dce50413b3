//! Step 3: Combined Build
//!
//! Produces the readable and minified bundles from the deduplicated,
//! priority-ordered source list.
//!
//! ## Process
//!
//! 1.  **Order**: collect every project's sources in priority order and keep
//!     only the first occurrence of each canonical key. If a project's
//!     manifest is missing the step aborts with
//!     [`Error::SourceDirectoryMissing`] after logging the missing path.
//! 2.  **Concatenate**: each file goes through [`ConcatTransform`] and the
//!     results are joined under the rendered license banner, written to
//!     `<output_dir>/<name>-<stamp>.js`.
//! 3.  **Minify**: the same ordered list is handed whole to the external
//!     minifier with the debug flag forced off, written to
//!     `<output_dir>/<name>-<stamp>.min.js`.

use std::path::PathBuf;

use log::{error, info, warn};

use super::CanonicalSourceSet;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::filesystem;
use crate::path::base_name;
use crate::project::{collect_sources, read_version};
use crate::tools::{MinifyRequest, Minifier};
use crate::transform::ConcatTransform;
use crate::version::BuildStamp;

/// Files written by the combined build.
#[derive(Debug, Clone)]
pub struct CombinedOutput {
    /// Concatenated, readable bundle.
    pub bundle: PathBuf,
    /// Minified bundle; `None` when no minifier was available.
    pub minified: Option<PathBuf>,
    /// Number of distinct sources bundled.
    pub sources: usize,
}

/// Deduplicated sources in first-occurrence order.
///
/// A missing manifest aborts with the number of distinct files gathered
/// before the missing project.
pub fn ordered_sources(config: &Config) -> Result<CanonicalSourceSet> {
    let collection = collect_sources(config)?;
    let set = CanonicalSourceSet::from_sources(&collection.files);

    if let Some((project, manifest)) = collection.missing {
        let dir = manifest.parent().map(PathBuf::from).unwrap_or(manifest);
        error!("{}: source directory missing: {}", project, dir.display());
        return Err(Error::SourceDirectoryMissing {
            path: dir,
            collected: set.len(),
        });
    }

    Ok(set)
}

/// Fill `{name}`, `{version}` and `{date}` in the banner template.
pub fn render_banner(template: &str, name: &str, version: &str, stamp: &BuildStamp) -> String {
    template
        .replace("{name}", name)
        .replace("{version}", version)
        .replace("{date}", stamp.as_str())
}

/// Concatenate `sources` through the transform pipeline under `banner`.
pub fn concatenate(
    sources: &CanonicalSourceSet,
    transform: &ConcatTransform,
    banner: &str,
) -> Result<String> {
    let mut bundle = String::from(banner);
    for source in sources.iter() {
        let bytes = filesystem::read(&source.path)?;
        let content = String::from_utf8_lossy(&bytes);
        bundle.push_str(&transform.apply(&base_name(&source.path), &content));
    }
    bundle.push('\n');
    Ok(bundle)
}

/// Run the combined build.
pub fn execute(
    config: &Config,
    minifier: Option<&dyn Minifier>,
    stamp: &BuildStamp,
) -> Result<CombinedOutput> {
    let sources = ordered_sources(config)?;
    let bundle_cfg = &config.bundle;

    // Version of the highest-priority project names the bundle.
    let version = match config.projects.first() {
        Some(project) => read_version(project, &config.manifest).unwrap_or_else(|e| {
            warn!("Bundle version unknown: {}", e);
            "unknown".to_string()
        }),
        None => "unknown".to_string(),
    };
    let banner = render_banner(&bundle_cfg.banner, &bundle_cfg.name, &version, stamp);

    let transform = ConcatTransform::new(bundle_cfg.namespace.as_deref())?;
    let combined = concatenate(&sources, &transform, &banner)?;

    let bundle = bundle_cfg
        .output_dir
        .join(format!("{}-{}.js", bundle_cfg.name, stamp));
    filesystem::write(&bundle, combined.as_bytes())?;
    info!(
        "Combined {} sources into {}",
        sources.len(),
        bundle.display()
    );

    let minified = match minifier {
        Some(minifier) => {
            let paths = sources.paths();
            let output = minifier.minify(&MinifyRequest {
                sources: &paths,
                flag: &bundle_cfg.debug_flag,
                banner: &banner,
            })?;
            let path = bundle_cfg
                .output_dir
                .join(format!("{}-{}.min.js", bundle_cfg.name, stamp));
            filesystem::write(&path, &output)?;
            info!("Minified bundle written to {}", path.display());
            Some(path)
        }
        None => {
            warn!("No minifier configured, skipping minified bundle");
            None
        }
    };

    Ok(CombinedOutput {
        bundle,
        minified,
        sources: sources.len(),
    })
}
