//! Immediate-mode draw list
//!
//! Games record a frame's worth of primitive commands; the runner tessellates
//! them for the GPU and renders text separately.

use glam::{Vec2, Vec3};

use super::camera::{Camera2D, Camera3D};
use super::vertex::Color;
use crate::sim::collision::Rect;

/// Width estimate for text of `size` pixels (0.6 em per character)
pub fn measure_text(text: &str, size: f32) -> f32 {
    (size * 0.6 * text.chars().count() as f32).round()
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear(Color),
    Rect {
        rect: Rect,
        color: Color,
    },
    RectLines {
        rect: Rect,
        thickness: f32,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    CircleLines {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        thickness: f32,
        color: Color,
    },
    Triangle {
        points: [Vec2; 3],
        color: Color,
    },
    /// Screen-space text, top-left anchored
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        color: Color,
    },
    Begin2D(Camera2D),
    End2D,
    Begin3D(Camera3D),
    End3D,
    Cube {
        center: Vec3,
        size: Vec3,
        /// Rotation about the vertical axis through the centre (radians)
        rotation_y: f32,
        color: Color,
    },
    CubeWires {
        center: Vec3,
        size: Vec3,
        rotation_y: f32,
        color: Color,
    },
    Sphere {
        center: Vec3,
        radius: f32,
        color: Color,
    },
    SphereWires {
        center: Vec3,
        radius: f32,
        rings: u32,
        slices: u32,
        color: Color,
    },
    Grid {
        slices: u32,
        spacing: f32,
    },
    Line3D {
        from: Vec3,
        to: Vec3,
        color: Color,
    },
    /// Horizontal quad at `center.y`
    Plane {
        center: Vec3,
        size: Vec2,
        color: Color,
    },
}

/// One frame of draw commands
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    cmds: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.cmds
    }

    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    pub fn reset(&mut self) {
        self.cmds.clear();
    }

    pub fn push(&mut self, cmd: DrawCmd) {
        self.cmds.push(cmd);
    }

    /// Last clear colour recorded this frame
    pub fn clear_color(&self) -> Option<Color> {
        self.cmds.iter().rev().find_map(|c| match c {
            DrawCmd::Clear(color) => Some(*color),
            _ => None,
        })
    }

    /// Text commands in draw order
    pub fn texts(&self) -> impl Iterator<Item = (&str, Vec2, f32, Color)> {
        self.cmds.iter().filter_map(|c| match c {
            DrawCmd::Text {
                text,
                pos,
                size,
                color,
            } => Some((text.as_str(), *pos, *size, *color)),
            _ => None,
        })
    }

    /// True if any text command contains `needle`
    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().any(|(t, ..)| t.contains(needle))
    }

    pub fn clear(&mut self, color: Color) {
        self.push(DrawCmd::Clear(color));
    }

    pub fn rect(&mut self, rect: Rect, color: Color) {
        self.push(DrawCmd::Rect { rect, color });
    }

    pub fn rect_lines(&mut self, rect: Rect, thickness: f32, color: Color) {
        self.push(DrawCmd::RectLines {
            rect,
            thickness,
            color,
        });
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.push(DrawCmd::Circle {
            center,
            radius,
            color,
        });
    }

    pub fn circle_lines(&mut self, center: Vec2, radius: f32, color: Color) {
        self.push(DrawCmd::CircleLines {
            center,
            radius,
            color,
        });
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color) {
        self.push(DrawCmd::Line {
            from,
            to,
            thickness,
            color,
        });
    }

    pub fn triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color) {
        self.push(DrawCmd::Triangle {
            points: [a, b, c],
            color,
        });
    }

    pub fn text(&mut self, text: impl Into<String>, x: f32, y: f32, size: f32, color: Color) {
        self.push(DrawCmd::Text {
            text: text.into(),
            pos: Vec2::new(x, y),
            size,
            color,
        });
    }

    /// Text horizontally centred on `cx`
    pub fn text_centered(&mut self, text: &str, cx: f32, y: f32, size: f32, color: Color) {
        let w = measure_text(text, size);
        self.text(text, cx - w / 2.0, y, size, color);
    }

    pub fn begin_2d(&mut self, camera: Camera2D) {
        self.push(DrawCmd::Begin2D(camera));
    }

    pub fn end_2d(&mut self) {
        self.push(DrawCmd::End2D);
    }

    pub fn begin_3d(&mut self, camera: Camera3D) {
        self.push(DrawCmd::Begin3D(camera));
    }

    pub fn end_3d(&mut self) {
        self.push(DrawCmd::End3D);
    }

    pub fn cube(&mut self, center: Vec3, size: Vec3, color: Color) {
        self.cube_rotated(center, size, 0.0, color);
    }

    pub fn cube_rotated(&mut self, center: Vec3, size: Vec3, rotation_y: f32, color: Color) {
        self.push(DrawCmd::Cube {
            center,
            size,
            rotation_y,
            color,
        });
    }

    pub fn cube_wires(&mut self, center: Vec3, size: Vec3, color: Color) {
        self.cube_wires_rotated(center, size, 0.0, color);
    }

    pub fn cube_wires_rotated(&mut self, center: Vec3, size: Vec3, rotation_y: f32, color: Color) {
        self.push(DrawCmd::CubeWires {
            center,
            size,
            rotation_y,
            color,
        });
    }

    pub fn sphere(&mut self, center: Vec3, radius: f32, color: Color) {
        self.push(DrawCmd::Sphere {
            center,
            radius,
            color,
        });
    }

    pub fn sphere_wires(&mut self, center: Vec3, radius: f32, rings: u32, slices: u32, color: Color) {
        self.push(DrawCmd::SphereWires {
            center,
            radius,
            rings,
            slices,
            color,
        });
    }

    pub fn grid(&mut self, slices: u32, spacing: f32) {
        self.push(DrawCmd::Grid { slices, spacing });
    }

    pub fn line_3d(&mut self, from: Vec3, to: Vec3, color: Color) {
        self.push(DrawCmd::Line3D { from, to, color });
    }

    pub fn plane(&mut self, center: Vec3, size: Vec2, color: Color) {
        self.push(DrawCmd::Plane {
            center,
            size,
            color,
        });
    }
}

/// Absolutely positioned HTML for every text command
///
/// `scale` and `offset` place the logical window inside the page (see
/// [`crate::renderer::pipeline::letterbox`]). Text is escaped.
pub fn text_overlay_html(list: &DrawList, scale: f32, offset: Vec2) -> String {
    let mut html = String::new();
    for (text, pos, size, color) in list.texts() {
        let p = offset + pos * scale;
        let [r, g, b, a] = color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        html.push_str(&format!(
            "<div style=\"position:absolute;left:{:.1}px;top:{:.1}px;font-size:{:.1}px;\
             line-height:1;white-space:pre;color:rgba({r},{g},{b},{:.3})\">",
            p.x,
            p.y,
            size * scale,
            a as f32 / 255.0,
        ));
        for ch in text.chars() {
            match ch {
                '&' => html.push_str("&amp;"),
                '<' => html.push_str("&lt;"),
                '>' => html.push_str("&gt;"),
                '"' => html.push_str("&quot;"),
                c => html.push(c),
            }
        }
        html.push_str("</div>");
    }
    html
}
