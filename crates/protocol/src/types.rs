use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }
}

/// The visible window a view renders into, in logical pixels.
///
/// `y` is the vertical scroll offset: views skip rows that fall entirely
/// outside `[y, y + height]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Device pixel ratio.
    pub dpr: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
            dpr: 1.0,
        }
    }

    /// Whether a band `[top, top + h]` intersects the visible range.
    pub fn shows(&self, top: f64, h: f64) -> bool {
        top + h >= self.y && top <= self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_visibility() {
        let vp = Viewport {
            y: 100.0,
            ..Viewport::new(800.0, 200.0)
        };
        assert!(!vp.shows(0.0, 20.0));
        assert!(vp.shows(90.0, 20.0));
        assert!(vp.shows(250.0, 20.0));
        assert!(!vp.shows(301.0, 20.0));
    }

    #[test]
    fn rect_bottom() {
        assert!((Rect::new(0.0, 10.0, 5.0, 20.0).bottom() - 30.0).abs() < f64::EPSILON);
    }
}
