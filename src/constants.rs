//! This module contains global constants used across the clock, display and settings modules.

/// Settings store key for the clock block position ("left" | "right").
pub const KEY_TIME_POSITION: &str = "time_position";
/// Settings store key for the packed 0xRRGGBB background color.
pub const KEY_BACKGROUND_COLOR: &str = "background_color";

/// Stored value for a clock placed on the start edge.
pub const POSITION_LEFT: &str = "left";
/// Stored value for a clock placed on the end edge.
pub const POSITION_RIGHT: &str = "right";

/// Surface-local brightness override applied while the clock is visible (10% of full scale).
pub const DIM_BRIGHTNESS: f32 = 0.1;

/// Margin between the clock block and the edge it is aligned to, in density-independent units.
pub const CLOCK_EDGE_MARGIN_DP: u32 = 32;

/// Time label format, always 24-hour.
pub const TIME_FORMAT: &str = "%H:%M";
/// Date label format, locale abbreviated weekday and month.
pub const DATE_FORMAT: &str = "%a, %b %-d";

// Fixed background palette
pub const PALETTE_BLACK: u32 = 0x000000;
pub const PALETTE_DARK_GRAY: u32 = 0x333333;
pub const PALETTE_DARK_BLUE: u32 = 0x001122;
pub const PALETTE_DARK_RED: u32 = 0x220011;

// Scene geometry
/// Integer scale applied to the time glyphs (FONT_10X20 based).
pub const TIME_GLYPH_SCALE: u32 = 4;
/// Vertical gap between the time and the date line.
pub const TIME_DATE_GAP: i32 = 8;
/// Size of the settings icon square, in density-independent units.
pub const SETTINGS_ICON_DP: u32 = 24;
/// Inset of the settings icon from the top/end corner, in density-independent units.
pub const SETTINGS_ICON_INSET_DP: u32 = 16;

/// Default canvas used by the snapshot and headless surfaces.
pub const DEFAULT_SURFACE_WIDTH: u32 = 800;
pub const DEFAULT_SURFACE_HEIGHT: u32 = 480;

/// Default Linux framebuffer device.
pub const DEFAULT_FB_DEVICE: &str = "/dev/fb0";
/// Root of the sysfs backlight class.
pub const SYSFS_BACKLIGHT: &str = "/sys/class/backlight";
/// Root of the sysfs graphics class.
pub const SYSFS_GRAPHICS: &str = "/sys/class/graphics";
