use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    #[must_use]
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Draw command for one line segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub color: Color,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64, color: Color) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_width,
            color,
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.x1.is_finite()
            || !self.y1.is_finite()
            || !self.x2.is_finite()
            || !self.y2.is_finite()
        {
            return Err(ChartError::InvalidData(
                "line coordinates must be finite".to_owned(),
            ));
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "line stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Per-side corner rounding of a rect. Split bars only round the ends that
/// open or close their phase.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CornerRadii {
    pub left: f64,
    pub right: f64,
}

impl CornerRadii {
    #[must_use]
    pub const fn uniform(radius: f64) -> Self {
        Self {
            left: radius,
            right: radius,
        }
    }
}

/// Draw command for one filled rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill_color: Color,
    pub corner_radii: CornerRadii,
}

impl RectPrimitive {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64, fill_color: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill_color,
            corner_radii: CornerRadii {
                left: 0.0,
                right: 0.0,
            },
        }
    }

    #[must_use]
    pub const fn with_corner_radii(mut self, corner_radii: CornerRadii) -> Self {
        self.corner_radii = corner_radii;
        self
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.x.is_finite()
            || !self.y.is_finite()
            || !self.width.is_finite()
            || !self.height.is_finite()
        {
            return Err(ChartError::InvalidData(
                "rect geometry must be finite".to_owned(),
            ));
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(ChartError::InvalidData(
                "rect size must be >= 0".to_owned(),
            ));
        }
        if !self.corner_radii.left.is_finite()
            || !self.corner_radii.right.is_finite()
            || self.corner_radii.left < 0.0
            || self.corner_radii.right < 0.0
        {
            return Err(ChartError::InvalidData(
                "rect corner radii must be finite and >= 0".to_owned(),
            ));
        }
        self.fill_color.validate()
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// Draw command for one label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub color: Color,
    pub h_align: TextHAlign,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            color,
            h_align,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.text.is_empty() {
            return Err(ChartError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(ChartError::InvalidData(
                "text coordinates must be finite".to_owned(),
            ));
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Children positioned relative to the group origin `(x, y)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupPrimitive {
    pub x: f64,
    pub y: f64,
    pub children: Vec<DrawInstruction>,
}

impl GroupPrimitive {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_child(mut self, child: DrawInstruction) -> Self {
        self.children.push(child);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(ChartError::InvalidData(
                "group origin must be finite".to_owned(),
            ));
        }
        for child in &self.children {
            child.validate()?;
        }
        Ok(())
    }
}

/// Backend-agnostic draw instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawInstruction {
    Rect(RectPrimitive),
    Line(LinePrimitive),
    Text(TextPrimitive),
    Group(GroupPrimitive),
}

impl DrawInstruction {
    pub fn validate(&self) -> ChartResult<()> {
        match self {
            Self::Rect(rect) => rect.validate(),
            Self::Line(line) => line.validate(),
            Self::Text(text) => text.validate(),
            Self::Group(group) => group.validate(),
        }
    }

    /// Number of leaf primitives, counting through groups.
    #[must_use]
    pub fn primitive_count(&self) -> usize {
        match self {
            Self::Group(group) => group
                .children
                .iter()
                .map(DrawInstruction::primitive_count)
                .sum(),
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Color, CornerRadii, DrawInstruction, GroupPrimitive, RectPrimitive, TextHAlign,
        TextPrimitive,
    };

    #[test]
    fn group_validation_reaches_children() {
        let group = GroupPrimitive::new(10.0, 10.0).with_child(DrawInstruction::Text(
            TextPrimitive::new("", 0.0, 0.0, 11.0, Color::rgb(0.0, 0.0, 0.0), TextHAlign::Left),
        ));
        assert!(DrawInstruction::Group(group).validate().is_err());
    }

    #[test]
    fn rect_rejects_negative_radius() {
        let rect = RectPrimitive::new(0.0, 0.0, 10.0, 10.0, Color::rgb(0.2, 0.4, 0.6))
            .with_corner_radii(CornerRadii {
                left: -1.0,
                right: 0.0,
            });
        assert!(rect.validate().is_err());
    }

    #[test]
    fn primitive_count_flattens_groups() {
        let rect = RectPrimitive::new(0.0, 0.0, 4.0, 4.0, Color::rgb(1.0, 1.0, 1.0));
        let group = GroupPrimitive::new(0.0, 0.0)
            .with_child(DrawInstruction::Rect(rect))
            .with_child(DrawInstruction::Group(
                GroupPrimitive::new(1.0, 1.0).with_child(DrawInstruction::Rect(rect)),
            ));
        assert_eq!(DrawInstruction::Group(group).primitive_count(), 2);
    }
}
