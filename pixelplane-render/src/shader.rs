/// An opaque-or-not RGBA color, one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Backdrop shown before the first frame is computed.
    pub const BACKDROP: Self = Self::rgb(10, 10, 10);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A per-pixel coloring function over world coordinates.
///
/// Implementations must be pure: the engine evaluates rows in parallel and
/// may evaluate the same point any number of times.
///
/// The engine is generic over `S: Shader` so the call inlines into the fill
/// loop; prefer static dispatch over `dyn Shader`.
pub trait Shader: Send + Sync {
    fn color(&self, x: f64, y: f64) -> Rgba;
}

impl<F> Shader for F
where
    F: Fn(f64, f64) -> Rgba + Send + Sync,
{
    #[inline]
    fn color(&self, x: f64, y: f64) -> Rgba {
        self(x, y)
    }
}

/// Uniform color everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solid(pub Rgba);

impl Shader for Solid {
    #[inline]
    fn color(&self, _x: f64, _y: f64) -> Rgba {
        self.0
    }
}

/// Alternating square cells of side `cell` world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Checkerboard {
    pub cell: f64,
    pub even: Rgba,
    pub odd: Rgba,
}

impl Default for Checkerboard {
    fn default() -> Self {
        Self {
            cell: 1.0,
            even: Rgba::rgb(24, 26, 32),
            odd: Rgba::rgb(44, 48, 58),
        }
    }
}

impl Shader for Checkerboard {
    #[inline]
    fn color(&self, x: f64, y: f64) -> Rgba {
        let cx = (x / self.cell).floor() as i64;
        let cy = (y / self.cell).floor() as i64;
        // Parity of cx + cy without the overflow for far-away cells.
        if (cx ^ cy) & 1 == 0 {
            self.even
        } else {
            self.odd
        }
    }
}

/// Concentric bands around the origin, `spacing` world units apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rings {
    pub spacing: f64,
}

impl Default for Rings {
    fn default() -> Self {
        Self { spacing: 0.5 }
    }
}

impl Shader for Rings {
    #[inline]
    fn color(&self, x: f64, y: f64) -> Rgba {
        let r = (x * x + y * y).sqrt() / self.spacing;
        // Smooth 0..1 wave so neighbouring bands blend instead of aliasing.
        let t = 0.5 + 0.5 * (r * std::f64::consts::TAU).cos();
        let shade = |lo: f64, hi: f64| (lo + t * (hi - lo)).round() as u8;
        Rgba::rgb(shade(16.0, 40.0), shade(20.0, 110.0), shade(40.0, 170.0))
    }
}

/// The coloring functions selectable from the preferences file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinShader {
    Solid,
    #[default]
    Checkerboard,
    Rings,
}

impl BuiltinShader {
    pub fn label(self) -> &'static str {
        match self {
            Self::Solid => "Solid",
            Self::Checkerboard => "Checkerboard",
            Self::Rings => "Rings",
        }
    }
}

impl Shader for BuiltinShader {
    #[inline]
    fn color(&self, x: f64, y: f64) -> Rgba {
        match self {
            Self::Solid => Solid(Rgba::BACKDROP).color(x, y),
            Self::Checkerboard => Checkerboard::default().color(x, y),
            Self::Rings => Rings::default().color(x, y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_shaders() {
        let gradient = |x: f64, _y: f64| Rgba::rgb((x * 255.0) as u8, 0, 0);
        assert_eq!(gradient.color(1.0, 0.0), Rgba::rgb(255, 0, 0));
    }

    #[test]
    fn checkerboard_alternates_across_origin() {
        let board = Checkerboard::default();
        assert_eq!(board.color(0.5, 0.5), board.even);
        assert_eq!(board.color(-0.5, 0.5), board.odd);
        assert_eq!(board.color(-0.5, -0.5), board.even);
        assert_eq!(board.color(1.5, 0.5), board.odd);
    }

    #[test]
    fn checkerboard_survives_huge_coordinates() {
        let board = Checkerboard::default();
        // Both cell indices saturate to i64::MAX: same parity, even cell.
        assert_eq!(board.color(1e300, 1e300), board.even);
        assert_eq!(board.color(1e300, 0.5), board.odd);
        assert_eq!(board.color(-1e300, -1e300), board.even);
    }

    #[test]
    fn rings_are_radially_symmetric() {
        let rings = Rings::default();
        assert_eq!(rings.color(0.3, 0.4), rings.color(-0.5, 0.0));
        assert_eq!(rings.color(0.0, 0.0).a, 255);
    }

    #[test]
    fn builtin_shader_round_trips_through_json() {
        let json = serde_json::to_string(&BuiltinShader::Rings).unwrap();
        assert_eq!(json, "\"rings\"");
        let back: BuiltinShader = serde_json::from_str(&json).unwrap();
        assert_eq!(back, BuiltinShader::Rings);
    }
}
