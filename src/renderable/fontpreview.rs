use std::path::PathBuf;

use anyhow::Context as _;
use regex::Regex;

use crate::action::Action;
use crate::foundation::error::{PassageError, PassageResult};
use crate::renderable::config::{DrawFn, RenderConfig};
use crate::renderable::{PassArgs, RenderPass, Renderable};

/// A font-preview sheet: one pass per discovered font file.
///
/// Discovery scans the configured directory once at construction, keeps paths
/// matching the pattern, truncates to `limit` in discovery order, then sorts the
/// retained set lexicographically.
pub struct FontPreview {
    cfg: RenderConfig,
    draw: DrawFn,
    matches: Vec<PathBuf>,
}

impl FontPreview {
    /// Create a font-preview descriptor over `font_dir`.
    pub fn new(
        cfg: RenderConfig,
        draw: DrawFn,
        font_dir: impl Into<PathBuf>,
        pattern: &str,
        limit: usize,
    ) -> PassageResult<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| PassageError::validation(format!("invalid font pattern: {e}")))?;
        let dir = font_dir.into();
        let mut found = Vec::new();
        let entries = std::fs::read_dir(&dir)
            .with_context(|| format!("failed to scan font directory '{}'", dir.display()))?;
        for entry in entries {
            let entry = entry
                .with_context(|| format!("failed to read font directory '{}'", dir.display()))?;
            found.push(entry.path());
        }
        let matches = retain_matches(found, &pattern, limit);
        tracing::debug!(dir = %dir.display(), count = matches.len(), "font preview discovery");
        Ok(Self { cfg, draw, matches })
    }

    /// Create a descriptor from an already-discovered file list, bypassing the
    /// filesystem scan. The retain/truncate/sort contract is identical.
    pub fn from_discovered(
        cfg: RenderConfig,
        draw: DrawFn,
        found: Vec<PathBuf>,
        pattern: &str,
        limit: usize,
    ) -> PassageResult<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| PassageError::validation(format!("invalid font pattern: {e}")))?;
        let matches = retain_matches(found, &pattern, limit);
        Ok(Self { cfg, draw, matches })
    }

    /// The retained font files, in emission order.
    pub fn matches(&self) -> &[PathBuf] {
        &self.matches
    }
}

impl Renderable for FontPreview {
    fn config(&self) -> &RenderConfig {
        &self.cfg
    }

    fn draw_fn(&self) -> &DrawFn {
        &self.draw
    }

    fn passes(&self, _action: Action, _layers: &[String], _indices: &[u32]) -> Vec<RenderPass<'_>> {
        self.matches
            .iter()
            .map(|font| {
                let suffix = font
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                RenderPass::new(
                    self,
                    suffix,
                    PassArgs::Font {
                        rect: self.cfg.rect,
                        font: font.clone(),
                    },
                )
            })
            .collect()
    }
}

/// Keep pattern matches in discovery order, truncate to `limit`, then sort the
/// retained set lexicographically.
///
/// Truncation happens before the sort: `limit` keeps the first matches discovered,
/// not the lexicographically-first matches.
pub fn retain_matches(
    found: impl IntoIterator<Item = PathBuf>,
    pattern: &Regex,
    limit: usize,
) -> Vec<PathBuf> {
    let mut kept = Vec::new();
    for path in found {
        if kept.len() >= limit {
            break;
        }
        if pattern.is_match(&path.to_string_lossy()) {
            kept.push(path);
        }
    }
    kept.sort();
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Rect;
    use crate::render::scene::Scene;
    use std::sync::Arc;

    fn noop_draw() -> DrawFn {
        Arc::new(|_args| Ok(Scene::new()))
    }

    #[test]
    fn truncation_applies_before_the_sort() {
        let found = vec![
            PathBuf::from("b.otf"),
            PathBuf::from("a.otf"),
            PathBuf::from("c.otf"),
        ];
        let pattern = Regex::new(r"\.otf$").unwrap();
        let kept = retain_matches(found, &pattern, 2);
        // "c.otf" was discovered after the limit filled; "a.otf" sorts first among
        // the retained pair.
        assert_eq!(kept, vec![PathBuf::from("a.otf"), PathBuf::from("b.otf")]);
    }

    #[test]
    fn non_matching_paths_do_not_consume_the_limit() {
        let found = vec![
            PathBuf::from("readme.txt"),
            PathBuf::from("b.otf"),
            PathBuf::from("a.otf"),
        ];
        let pattern = Regex::new(r"\.otf$").unwrap();
        let kept = retain_matches(found, &pattern, 2);
        assert_eq!(kept, vec![PathBuf::from("a.otf"), PathBuf::from("b.otf")]);
    }

    #[test]
    fn passes_emit_one_per_retained_font_with_filename_suffix() {
        let cfg = RenderConfig::new("sheet").with_rect(Rect::new(0.0, 0.0, 1200.0, 150.0));
        let fp = FontPreview::from_discovered(
            cfg,
            noop_draw(),
            vec![
                PathBuf::from("fonts/b.otf"),
                PathBuf::from("fonts/a.otf"),
                PathBuf::from("fonts/c.otf"),
            ],
            r"\.otf$",
            2,
        )
        .unwrap();
        let passes = fp.passes(Action::Initial, &[], &[]);
        assert_eq!(passes.len(), 2);
        assert_eq!(passes[0].suffix, "a.otf");
        assert_eq!(passes[1].suffix, "b.otf");
        assert!(matches!(passes[0].args, PassArgs::Font { .. }));
    }

    #[test]
    fn scan_constructor_reads_directory() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["z.otf", "y.otf", "skip.ttf"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let fp = FontPreview::new(
            RenderConfig::new("sheet"),
            noop_draw(),
            dir.path(),
            r"\.otf$",
            25,
        )
        .unwrap();
        assert_eq!(fp.matches().len(), 2);
        // Sorted regardless of discovery order.
        assert!(fp.matches()[0] < fp.matches()[1]);
    }

    #[test]
    fn invalid_pattern_is_a_validation_error() {
        let result = FontPreview::from_discovered(
            RenderConfig::new("sheet"),
            noop_draw(),
            vec![],
            r"(",
            25,
        );
        assert!(matches!(result, Err(PassageError::Validation(_))));
    }
}
