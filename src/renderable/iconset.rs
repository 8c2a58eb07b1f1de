use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Context as _;
use image::codecs::ico::{IcoEncoder, IcoFrame};
use image::imageops::FilterType;
use image::{ExtendedColorType, ImageFormat};

use crate::action::Action;
use crate::foundation::error::{PassageError, PassageResult};
use crate::renderable::config::{DrawFn, RenderConfig};
use crate::renderable::{PassArgs, RenderPass, Renderable};

/// The canonical icon sizes, ascending. `RenderAll` replaces the configured sizes
/// with this set wholesale.
pub const VALID_SIZES: [u32; 7] = [16, 32, 64, 128, 256, 512, 1024];

/// Default configured sizes for a new icon set.
pub const DEFAULT_SIZES: [u32; 2] = [128, 1024];

/// The ICO directory stores entry dimensions in a single byte.
const ICO_MAX_DIM: u32 = 256;

/// An icon set: one pass per size, plus a terminal packaging step that aggregates
/// the rendered sizes into composite icon containers.
pub struct IconSet {
    cfg: RenderConfig,
    draw: DrawFn,
    sizes: Vec<u32>,
}

impl IconSet {
    /// Create an icon set with the default sizes.
    pub fn new(cfg: RenderConfig, draw: DrawFn) -> Self {
        Self::with_sizes(cfg, draw, DEFAULT_SIZES.to_vec())
    }

    /// Create an icon set rendering `sizes`.
    pub fn with_sizes(cfg: RenderConfig, draw: DrawFn, sizes: Vec<u32>) -> Self {
        Self { cfg, draw, sizes }
    }

    /// The configured sizes.
    pub fn sizes(&self) -> &[u32] {
        &self.sizes
    }

    /// Build the platform `.iconset` staging directory and compile it into a `.icns`
    /// container via the external `sips`/`iconutil` tools.
    ///
    /// For every rendered size `d`, both `icon_{d}x{d}.png` and (except `d == 16`)
    /// `icon_{d/2}x{d/2}@2x.png` are resized into staging.
    fn package_icns(&self, output_folder: &Path) -> PassageResult<()> {
        let staging = container_path(output_folder, &format!("{}.iconset", self.name()));
        std::fs::create_dir_all(&staging).with_context(|| {
            format!("failed to create iconset staging '{}'", staging.display())
        })?;

        for png in rendered_pngs(output_folder)? {
            let Some(d) = size_from_stem(&png) else {
                continue;
            };
            sips_resize(d, &png, &staging.join(format!("icon_{d}x{d}.png")))?;
            if d != 16 {
                let half = d / 2;
                sips_resize(d, &png, &staging.join(format!("icon_{half}x{half}@2x.png")))?;
            }
        }

        let status = Command::new("iconutil")
            .args(["-c", "icns"])
            .arg(&staging)
            .status()
            .map_err(|e| PassageError::package(format!("failed to launch iconutil: {e}")))?;
        if !status.success() {
            return Err(PassageError::package(format!(
                "iconutil failed with status {status} for '{}'",
                staging.display()
            )));
        }
        Ok(())
    }

    /// Encode the generic multi-resolution `.ico` container from the rendered
    /// 1024-size source.
    fn package_ico(&self, output_folder: &Path) -> PassageResult<()> {
        let largest = rendered_pngs(output_folder)?
            .into_iter()
            .find(|p| size_from_stem(p) == Some(1024))
            .ok_or_else(|| {
                PassageError::package(format!(
                    "missing 1024-size source in '{}'",
                    output_folder.display()
                ))
            })?;
        let source = image::open(&largest)
            .map_err(|e| PassageError::package(format!("failed to open '{}': {e}", largest.display())))?;

        let mut frames = Vec::new();
        // The ICO directory caps entries at 256px; larger canonical sizes exist only
        // as rendered source PNGs.
        for &d in VALID_SIZES.iter().filter(|&&d| d <= ICO_MAX_DIM) {
            let resized = source.resize_exact(d, d, FilterType::Lanczos3);
            let mut png = Vec::new();
            resized
                .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
                .map_err(|e| PassageError::package(format!("failed to encode {d}px entry: {e}")))?;
            let color: ExtendedColorType = resized.color().into();
            let frame = IcoFrame::with_encoded(png, d, d, color)
                .map_err(|e| PassageError::package(format!("invalid {d}px ico entry: {e}")))?;
            frames.push(frame);
        }

        let out = container_path(output_folder, &format!("{}.ico", self.name()));
        let file = std::fs::File::create(&out)
            .with_context(|| format!("failed to create '{}'", out.display()))?;
        IcoEncoder::new(file)
            .encode_images(&frames)
            .map_err(|e| PassageError::package(format!("ico encode failed: {e}")))?;
        tracing::debug!(out = %out.display(), entries = frames.len(), "wrote icon container");
        Ok(())
    }
}

impl Renderable for IconSet {
    fn config(&self) -> &RenderConfig {
        &self.cfg
    }

    fn draw_fn(&self) -> &DrawFn {
        &self.draw
    }

    fn folder(&self) -> String {
        format!("{}_source", self.name())
    }

    fn passes(&self, action: Action, _layers: &[String], _indices: &[u32]) -> Vec<RenderPass<'_>> {
        let sizes: &[u32] = if action == Action::RenderAll {
            &VALID_SIZES
        } else {
            &self.sizes
        };
        sizes
            .iter()
            .map(|&size| {
                RenderPass::new(
                    self,
                    size.to_string(),
                    PassArgs::IconSize {
                        rect: self.cfg.rect,
                        size,
                    },
                )
            })
            .collect()
    }

    fn package(&self, output_folder: &Path) -> PassageResult<()> {
        if cfg!(target_os = "macos") {
            self.package_icns(output_folder)?;
        }
        self.package_ico(output_folder)
    }
}

/// The containers are written adjacent to the output folder.
fn container_path(output_folder: &Path, name: &str) -> PathBuf {
    output_folder
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(name)
}

/// The rendered per-size PNGs of the output folder, sorted by path.
fn rendered_pngs(output_folder: &Path) -> PassageResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(output_folder).with_context(|| {
        format!("failed to read output folder '{}'", output_folder.display())
    })?;
    let mut pngs = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("failed to read output folder '{}'", output_folder.display()))?
            .path();
        if path.extension().is_some_and(|ext| ext == "png") {
            pngs.push(path);
        }
    }
    pngs.sort();
    Ok(pngs)
}

/// Parse the size encoded in a rendered filename (`{prefix}{size}.png`).
fn size_from_stem(path: &Path) -> Option<u32> {
    let stem = path.file_stem()?.to_str()?;
    stem.rsplit('_').next()?.parse().ok()
}

/// Resize `src` to `d`×`d` into `dst` via the external `sips` tool.
fn sips_resize(d: u32, src: &Path, dst: &Path) -> PassageResult<()> {
    let status = Command::new("sips")
        .args(["-z", &d.to_string(), &d.to_string()])
        .arg(src)
        .arg("--out")
        .arg(dst)
        .status()
        .map_err(|e| {
            PassageError::package(format!("missing external resize tool (sips): {e}"))
        })?;
    if !status.success() {
        return Err(PassageError::package(format!(
            "sips failed with status {status} resizing '{}'",
            src.display()
        )));
    }
    Ok(())
}
