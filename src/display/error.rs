/*
 *  display/error.rs
 *
 *  nightclock - a quiet clock for the nightstand
 *  (c) 2025-26 Stuart Hunter
 *
 *  Unified error type for display surfaces
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

use std::fmt;
use std::error::Error;

/// Unified error type for all surface operations
#[derive(Debug)]
pub enum SurfaceError {
    /// The system brightness could not be read
    BrightnessUnavailable(String),

    /// Device or file I/O failed
    Io(std::io::Error),

    /// Pixel format the surface cannot write
    UnsupportedFormat(String),

    /// Invalid configuration
    InvalidConfiguration(String),

    /// Presenting the frame failed
    PresentFailed(String),

    /// Generic error with message
    Other(String),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::BrightnessUnavailable(msg) =>
                write!(f, "System brightness unavailable: {}", msg),
            SurfaceError::Io(err) =>
                write!(f, "Surface I/O error: {}", err),
            SurfaceError::UnsupportedFormat(msg) =>
                write!(f, "Unsupported pixel format: {}", msg),
            SurfaceError::InvalidConfiguration(msg) =>
                write!(f, "Invalid surface configuration: {}", msg),
            SurfaceError::PresentFailed(msg) =>
                write!(f, "Present failed: {}", msg),
            SurfaceError::Other(msg) =>
                write!(f, "{}", msg),
        }
    }
}

impl Error for SurfaceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SurfaceError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SurfaceError {
    fn from(err: std::io::Error) -> Self {
        SurfaceError::Io(err)
    }
}
