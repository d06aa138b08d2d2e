//! Screen geometry, control categories, and label placement.

use config::Placement;

/// A point in screen or overlay coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Point {
    /// Convenience constructor.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in screen coordinates. `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Right edge.
    pub right: i32,
    /// Bottom edge.
    pub bottom: i32,
}

impl Rect {
    /// Convenience constructor.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Width; negative for inverted rectangles.
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Height; negative for inverted rectangles.
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// True when the two rectangles share any area.
    pub fn intersects(&self, other: &Self) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }
}

/// An opaque 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Convenience constructor.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Control type of a scanned element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Category {
    Button,
    Edit,
    Hyperlink,
    ListItem,
    MenuItem,
    CheckBox,
    RadioButton,
    ComboBox,
    TabItem,
    TreeItem,
    Pane,
    Group,
    Text,
    Custom,
    Document,
    Other,
}

impl Category {
    /// Background color for labels over this kind of control.
    pub fn color(self) -> Rgb {
        match self {
            Self::Button => Rgb::new(255, 220, 220),
            Self::Edit => Rgb::new(220, 255, 220),
            Self::Hyperlink => Rgb::new(220, 220, 255),
            Self::ListItem => Rgb::new(255, 255, 200),
            Self::MenuItem => Rgb::new(240, 200, 255),
            _ => Rgb::new(200, 200, 200),
        }
    }
}

/// Where the overlay sits on the virtual screen, and its DPI scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Display {
    /// Top-left corner of the virtual screen.
    pub origin: Point,
    /// DPI scale factor (1.0 at 96 DPI).
    pub scale: f32,
}

impl Default for Display {
    fn default() -> Self {
        Self {
            origin: Point::default(),
            scale: 1.0,
        }
    }
}

/// Overlay-space top-left corner of the label box for `rect`.
///
/// The box sits `gap` (scaled) above the target's top edge. If that would put
/// it above `flip_margin` on screen it is drawn just inside the target instead.
pub fn label_origin(placement: &Placement, rect: &Rect, display: &Display) -> Point {
    let gap = (placement.gap as f32 * display.scale).round() as i32;
    let x = rect.left - display.origin.x + placement.x_offset;
    let y = if rect.top - gap < placement.flip_margin {
        rect.top - display.origin.y + gap - 2
    } else {
        rect.top - display.origin.y - gap
    };
    Point::new(x, y)
}

/// Heuristics for deciding which scanned elements deserve a label.
///
/// Scan collaborators run raw candidates through [`ScanFilter::accepts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFilter {
    /// Foreground window bounds; elements must overlap it.
    pub window: Rect,
    /// Width and height must be strictly greater than this.
    pub min_size: i32,
    /// Width and height must be strictly less than this.
    pub max_size: i32,
    /// Categories that are never labeled.
    pub skip: Vec<Category>,
}

impl ScanFilter {
    /// Filter for elements of the window at `window`, with the usual limits.
    pub fn new(window: Rect) -> Self {
        Self {
            window,
            min_size: 5,
            max_size: 1000,
            skip: vec![
                Category::Pane,
                Category::Group,
                Category::Text,
                Category::Custom,
                Category::Document,
                Category::ListItem,
            ],
        }
    }

    /// True when an element with these bounds and category should be labeled.
    pub fn accepts(&self, rect: &Rect, category: Category) -> bool {
        let (w, h) = (rect.width(), rect.height());
        rect.intersects(&self.window)
            && w > self.min_size
            && h > self.min_size
            && w < self.max_size
            && h < self.max_size
            && !self.skip.contains(&category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_intersection_is_strict() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.intersects(&Rect::new(5, 5, 20, 20)));
        assert!(!a.intersects(&Rect::new(10, 0, 20, 10)));
        assert!(!a.intersects(&Rect::new(0, 10, 10, 20)));
    }

    #[test]
    fn every_category_has_a_color() {
        assert_eq!(Category::Button.color(), Rgb::new(255, 220, 220));
        assert_eq!(Category::MenuItem.color(), Rgb::new(240, 200, 255));
        assert_eq!(Category::TreeItem.color(), Rgb::new(200, 200, 200));
    }

    #[test]
    fn label_sits_above_target() {
        let p = Placement::default();
        let d = Display {
            origin: Point::new(-1920, 0),
            scale: 1.5,
        };
        let o = label_origin(&p, &Rect::new(100, 200, 180, 230), &d);
        assert_eq!(o, Point::new(100 + 1920 + 8, 200 - 9));
    }

    #[test]
    fn label_flips_below_near_top_edge() {
        let p = Placement::default();
        let d = Display::default();
        let o = label_origin(&p, &Rect::new(10, 3, 50, 30), &d);
        assert_eq!(o, Point::new(18, 3 + 6 - 2));
        let p = Placement {
            flip_margin: 40,
            ..Placement::default()
        };
        let o = label_origin(&p, &Rect::new(10, 40, 50, 60), &d);
        assert_eq!(o.y, 40 + 6 - 2);
    }

    #[test]
    fn scan_filter_heuristics() {
        let f = ScanFilter::new(Rect::new(0, 0, 800, 600));
        assert!(f.accepts(&Rect::new(10, 10, 60, 30), Category::Button));
        // too small
        assert!(!f.accepts(&Rect::new(10, 10, 15, 30), Category::Button));
        // too large
        assert!(!f.accepts(&Rect::new(0, 0, 1000, 30), Category::Button));
        // outside the window
        assert!(!f.accepts(&Rect::new(900, 10, 950, 30), Category::Button));
        // skipped category
        assert!(!f.accepts(&Rect::new(10, 10, 60, 30), Category::Pane));
        assert!(!f.accepts(&Rect::new(10, 10, 60, 30), Category::ListItem));
    }
}
