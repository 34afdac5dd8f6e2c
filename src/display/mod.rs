/*
 *  display/mod.rs
 *
 *  nightclock - a quiet clock for the nightstand
 *  (c) 2025-26 Stuart Hunter
 *
 *  Display surfaces, scene rendering and the presenter
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

// Core trait definitions
pub mod traits;
pub mod error;
pub mod color;

// Rendering
pub mod scene;
pub mod framebuffer;
pub mod backlight;

// Surfaces and their construction
pub mod surfaces;
pub mod factory;

pub mod presenter;

// Re-exports for convenience
pub use traits::{BoxedSurface, ClockLayout, DisplaySurface, Element};
pub use error::SurfaceError;
pub use color::{contrast_color, Palette};
pub use framebuffer::{FrameCanvas, PixelFormat};
pub use scene::Scene;
pub use surfaces::{FramebufferSurface, HeadlessSurface, SnapshotSurface};
pub use factory::SurfaceFactory;
pub use presenter::{BrightnessState, DisplayPresenter};
