/*
 *  display/scene.rs
 *
 *  nightclock - a quiet clock for the nightstand
 *  (c) 2025-26 Stuart Hunter
 *
 *  Retained clock scene and its embedded-graphics rendering
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

use embedded_graphics::mono_font::{iso_8859_1::FONT_10X20, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use crate::constants::{
    CLOCK_EDGE_MARGIN_DP, SETTINGS_ICON_DP, SETTINGS_ICON_INSET_DP, TIME_DATE_GAP,
    TIME_GLYPH_SCALE,
};
use crate::display::traits::{ClockLayout, Element};
use crate::settings::ClockPosition;

const DATE_GLYPH_SCALE: u32 = 2;

/// Everything a surface needs to compose one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub background: Rgb888,
    pub time_text: String,
    pub date_text: String,
    pub time_color: Rgb888,
    pub date_color: Rgb888,
    pub icon_color: Rgb888,
    pub layout: ClockLayout,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            background: Rgb888::BLACK,
            time_text: String::new(),
            date_text: String::new(),
            time_color: Rgb888::WHITE,
            date_color: Rgb888::WHITE,
            icon_color: Rgb888::WHITE,
            layout: ClockLayout::aligned(ClockPosition::Start, CLOCK_EDGE_MARGIN_DP),
        }
    }
}

impl Scene {
    pub fn set_text(&mut self, element: Element, text: &str) {
        match element {
            Element::TimeText => self.time_text = text.to_string(),
            Element::DateText => self.date_text = text.to_string(),
            Element::SettingsIcon => {}
        }
    }

    pub fn set_color(&mut self, element: Element, color: Rgb888) {
        match element {
            Element::TimeText => self.time_color = color,
            Element::DateText => self.date_color = color,
            Element::SettingsIcon => self.icon_color = color,
        }
    }

    /// Compose the frame into `target`; `density` converts dp to pixels
    pub fn draw<D>(&self, target: &mut D, density: f32) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888> + OriginDimensions,
    {
        let size = target.size();
        let (w, h) = (size.width as i32, size.height as i32);
        let px = |dp: u32| (dp as f32 * density).round() as i32;

        target.clear(self.background)?;

        let glyph = FONT_10X20.character_size;
        let time_scale = scaled_for_width(TIME_GLYPH_SCALE, &self.time_text, glyph.width, size.width);
        let time_w = text_width(&self.time_text, glyph.width) * time_scale as i32;
        let time_h = glyph.height as i32 * time_scale as i32;
        let date_w = text_width(&self.date_text, glyph.width) * DATE_GLYPH_SCALE as i32;
        let date_h = glyph.height as i32 * DATE_GLYPH_SCALE as i32;

        let block_w = time_w.max(date_w);
        let block_h = time_h + TIME_DATE_GAP + date_h;
        let block_x = match self.layout.align {
            ClockPosition::Start => px(self.layout.margin_start_dp),
            ClockPosition::End => w - px(self.layout.margin_end_dp) - block_w,
        };
        let block_y = ((h - block_h) / 2).max(0);

        // text hugs the aligned edge inside the block
        let line_x = |line_w: i32| match self.layout.align {
            ClockPosition::Start => block_x,
            ClockPosition::End => block_x + block_w - line_w,
        };

        draw_scaled_text(
            target,
            &self.time_text,
            Point::new(line_x(time_w), block_y),
            time_scale,
            self.time_color,
        )?;
        draw_scaled_text(
            target,
            &self.date_text,
            Point::new(line_x(date_w), block_y + time_h + TIME_DATE_GAP),
            DATE_GLYPH_SCALE,
            self.date_color,
        )?;

        let icon = px(SETTINGS_ICON_DP).max(6);
        let inset = px(SETTINGS_ICON_INSET_DP);
        draw_settings_icon(target, Point::new(w - inset - icon, inset), icon as u32, self.icon_color)
    }
}

fn text_width(text: &str, glyph_width: u32) -> i32 {
    (text.chars().count() as u32 * glyph_width) as i32
}

/// Largest scale up to `wanted` at which `text` still fits `avail` pixels
fn scaled_for_width(wanted: u32, text: &str, glyph_width: u32, avail: u32) -> u32 {
    let unit = text.chars().count() as u32 * glyph_width;
    if unit == 0 {
        return wanted.max(1);
    }
    wanted.min(avail / unit).max(1)
}

fn draw_scaled_text<D>(target: &mut D, text: &str, at: Point, scale: u32, color: Rgb888) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let style = MonoTextStyle::new(&FONT_10X20, color);
    let mut scaled = Scaled { inner: target, origin: at, scale };
    Text::with_baseline(text, Point::zero(), style, Baseline::Top).draw(&mut scaled)?;
    Ok(())
}

/// A ring with four teeth, drawn in `color`
fn draw_settings_icon<D>(target: &mut D, top_left: Point, size: u32, color: Rgb888) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let stroke = (size / 8).max(1);
    let tooth = (size / 4).max(2);
    let ring = size - tooth;
    let ring_at = top_left + Point::new((tooth / 2) as i32, (tooth / 2) as i32);
    Circle::new(ring_at, ring)
        .into_styled(PrimitiveStyle::with_stroke(color, stroke))
        .draw(target)?;

    let centre = top_left + Point::new((size / 2) as i32, (size / 2) as i32);
    let half = (tooth / 2) as i32;
    let reach = (size / 2) as i32;
    for offset in [
        Point::new(0, -reach),
        Point::new(0, reach - tooth as i32),
        Point::new(-reach, 0),
        Point::new(reach - tooth as i32, 0),
    ] {
        let corner = centre + offset - Point::new(half * i32::from(offset.x == 0), half * i32::from(offset.y == 0));
        target.fill_solid(&Rectangle::new(corner, Size::new(tooth, tooth)), color)?;
    }
    Ok(())
}

/// Draw target adapter that blows every pixel up into a `scale` x `scale` block
struct Scaled<'a, D> {
    inner: &'a mut D,
    origin: Point,
    scale: u32,
}

impl<D: DrawTarget<Color = Rgb888>> OriginDimensions for Scaled<'_, D> {
    fn size(&self) -> Size {
        let outer = self.inner.bounding_box().size;
        Size::new(outer.width / self.scale, outer.height / self.scale)
    }
}

impl<D: DrawTarget<Color = Rgb888>> DrawTarget for Scaled<'_, D> {
    type Color = Rgb888;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let s = self.scale as i32;
        for Pixel(p, c) in pixels {
            let at = self.origin + Point::new(p.x * s, p.y * s);
            self.inner.fill_solid(&Rectangle::new(at, Size::new(self.scale, self.scale)), c)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vframebuf::VarFrameBuf;

    fn lit_columns(fb: &VarFrameBuf<Rgb888>, bg: Rgb888, rows: std::ops::Range<u32>) -> Option<(u32, u32)> {
        let mut min = None;
        let mut max = None;
        for y in rows {
            for x in 0..fb.width() as u32 {
                if fb.pixel(x, y) != Some(bg) {
                    min = Some(min.map_or(x, |m: u32| m.min(x)));
                    max = Some(max.map_or(x, |m: u32| m.max(x)));
                }
            }
        }
        min.zip(max)
    }

    fn scene(align: ClockPosition) -> Scene {
        Scene {
            time_text: "23:59".into(),
            date_text: "Sun, Mar 10".into(),
            layout: ClockLayout::aligned(align, CLOCK_EDGE_MARGIN_DP),
            ..Scene::default()
        }
    }

    #[test]
    fn test_start_alignment_uses_start_margin() {
        let mut fb = VarFrameBuf::new(800, 480, Rgb888::BLUE);
        scene(ClockPosition::Start).draw(&mut fb, 1.0).unwrap();
        // skip the icon rows at the top
        let (left, right) = lit_columns(&fb, Rgb888::BLACK, 100..480).unwrap();
        assert!(left >= 32 && left < 40, "left edge at {}", left);
        assert!(right < 400);
    }

    #[test]
    fn test_end_alignment_uses_end_margin() {
        let mut fb = VarFrameBuf::new(800, 480, Rgb888::BLUE);
        scene(ClockPosition::End).draw(&mut fb, 2.0).unwrap();
        let (left, right) = lit_columns(&fb, Rgb888::BLACK, 100..480).unwrap();
        // 32 dp at density 2.0
        assert!(right <= 800 - 64 && right > 800 - 64 - 10, "right edge at {}", right);
        assert!(left > 400);
    }

    #[test]
    fn test_background_and_colors() {
        let mut fb = VarFrameBuf::new(320, 240, Rgb888::BLACK);
        let s = Scene {
            background: Rgb888::WHITE,
            time_color: Rgb888::BLACK,
            date_color: Rgb888::BLACK,
            icon_color: Rgb888::BLACK,
            ..scene(ClockPosition::Start)
        };
        s.draw(&mut fb, 1.0).unwrap();
        assert_eq!(fb.pixel(0, 0), Some(Rgb888::WHITE));
        assert!(fb.as_slice().iter().all(|&p| p == Rgb888::WHITE || p == Rgb888::BLACK));
        assert!(fb.as_slice().iter().any(|&p| p == Rgb888::BLACK));
    }

    #[test]
    fn test_time_shrinks_to_fit_narrow_surface() {
        // 5 glyphs of 10px: scale 4 needs 200px, 120px only fits scale 2
        assert_eq!(scaled_for_width(4, "12:34", 10, 120), 2);
        assert_eq!(scaled_for_width(4, "12:34", 10, 800), 4);
        assert_eq!(scaled_for_width(4, "12:34", 10, 10), 1);
        assert_eq!(scaled_for_width(4, "", 10, 10), 4);
    }
}
