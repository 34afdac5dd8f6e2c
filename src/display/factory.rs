/*
 *  display/factory.rs
 *
 *  nightclock - a quiet clock for the nightstand
 *  (c) 2025-26 Stuart Hunter
 *
 *  Surface selection from configuration
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use log::info;
use std::path::PathBuf;

use crate::config::{SurfaceConfig, SurfaceKind};
use crate::constants::{DEFAULT_FB_DEVICE, DEFAULT_SURFACE_HEIGHT, DEFAULT_SURFACE_WIDTH};
use crate::display::error::SurfaceError;
use crate::display::surfaces::{FramebufferSurface, HeadlessSurface, SnapshotSurface};
use crate::display::traits::BoxedSurface;

const DEFAULT_SNAPSHOT_PATH: &str = "nightclock.ppm";

/// Factory for creating display surfaces from configuration
pub struct SurfaceFactory;

impl SurfaceFactory {
    /// Build the surface `config.kind` names (headless when unset)
    pub fn create_from_config(config: &SurfaceConfig) -> Result<BoxedSurface, SurfaceError> {
        let density = config.density.unwrap_or(1.0);
        if density <= 0.0 || !density.is_finite() {
            return Err(SurfaceError::InvalidConfiguration(format!("density {} must be > 0", density)));
        }
        let kind = config.kind.unwrap_or_default();

        match kind {
            SurfaceKind::Framebuffer => {
                let device = config.device.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_FB_DEVICE));
                let size = config.width.zip(config.height);
                info!("Creating framebuffer surface on {}", device.display());
                Ok(Box::new(FramebufferSurface::open(&device, size, density, config.backlight.clone())?))
            }
            SurfaceKind::Snapshot => {
                let path = config
                    .snapshot_path
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_PATH));
                let (width, height) = Self::canvas_size(config)?;
                info!("Creating {}x{} snapshot surface writing {}", width, height, path.display());
                let mut surface = SnapshotSurface::new(path, width, height, density);
                if let Some(dir) = config.backlight.clone() {
                    surface = surface.with_backlight(dir);
                }
                Ok(Box::new(surface))
            }
            SurfaceKind::Headless => {
                info!("Creating headless surface");
                Ok(Box::new(HeadlessSurface::new()))
            }
        }
    }

    fn canvas_size(config: &SurfaceConfig) -> Result<(u32, u32), SurfaceError> {
        let width = config.width.unwrap_or(DEFAULT_SURFACE_WIDTH);
        let height = config.height.unwrap_or(DEFAULT_SURFACE_HEIGHT);
        if width == 0 || height == 0 {
            return Err(SurfaceError::InvalidConfiguration("width/height must be > 0".to_string()));
        }
        Ok((width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::traits::DisplaySurface;

    #[test]
    fn test_headless_by_default() {
        let surface = SurfaceFactory::create_from_config(&SurfaceConfig::default()).unwrap();
        assert!(matches!(surface.system_brightness(), Err(SurfaceError::BrightnessUnavailable(_))));
    }

    #[test]
    fn test_snapshot_defaults_canvas() {
        let config = SurfaceConfig { kind: Some(SurfaceKind::Snapshot), ..Default::default() };
        assert_eq!(SurfaceFactory::canvas_size(&config).unwrap(), (800, 480));
        assert!(SurfaceFactory::create_from_config(&config).is_ok());
    }

    #[test]
    fn test_rejects_bad_geometry() {
        let config = SurfaceConfig { kind: Some(SurfaceKind::Snapshot), width: Some(0), ..Default::default() };
        assert!(matches!(
            SurfaceFactory::create_from_config(&config),
            Err(SurfaceError::InvalidConfiguration(_))
        ));
        let config = SurfaceConfig { density: Some(-1.0), ..Default::default() };
        assert!(SurfaceFactory::create_from_config(&config).is_err());
    }
}
