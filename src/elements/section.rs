//! Section properties for frame elements

use serde::{Deserialize, Serialize};

/// Semantic cross-section shape, used to disambiguate axis conventions in
/// design checks (the canonical convention here: `iy`/`zy` is the strong,
/// in-plane bending axis for a wide-flange shape; `iz`/`zz` the weak axis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionType {
    WideFlange,
    Rectangular,
    Circular,
    Pipe,
    Box,
    Other,
}

/// Cross-section properties for frame elements.
///
/// Section moduli (`zy`, `zz`) are `Option` on purpose: the design-check
/// subsystem requires them explicitly rather than deriving them from `depth`
/// and `width`, since that derivation silently assumes a solid rectangular
/// or wide-flange shape and is wrong for arbitrary sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub a: f64,
    /// Moment of inertia about local y-axis in m⁴ (strong axis for wide flange)
    pub iy: f64,
    /// Moment of inertia about local z-axis in m⁴ (weak axis for wide flange)
    pub iz: f64,
    /// Torsional constant in m⁴
    pub j: f64,
    /// Elastic/plastic section modulus about y-axis in m³
    pub zy: Option<f64>,
    /// Elastic/plastic section modulus about z-axis in m³
    pub zz: Option<f64>,
    pub depth: Option<f64>,
    pub width: Option<f64>,
    pub section_type: SectionType,
}

impl Section {
    pub fn new(a: f64, iy: f64, iz: f64, j: f64) -> Self {
        Self {
            a,
            iy,
            iz,
            j,
            zy: None,
            zz: None,
            depth: None,
            width: None,
            section_type: SectionType::Other,
        }
    }

    pub fn rectangular(width: f64, depth: f64) -> Self {
        let a = width * depth;
        let iy = width * depth.powi(3) / 12.0;
        let iz = depth * width.powi(3) / 12.0;

        let (a_dim, b_dim) = if width > depth { (width, depth) } else { (depth, width) };
        let j = a_dim * b_dim.powi(3) / 3.0 * (1.0 - 0.63 * b_dim / a_dim);

        Self {
            a,
            iy,
            iz,
            j,
            zy: Some(width * depth.powi(2) / 4.0),
            zz: Some(depth * width.powi(2) / 4.0),
            depth: Some(depth),
            width: Some(width),
            section_type: SectionType::Rectangular,
        }
    }

    pub fn circular(diameter: f64) -> Self {
        let r = diameter / 2.0;
        let a = std::f64::consts::PI * r.powi(2);
        let i = std::f64::consts::PI * r.powi(4) / 4.0;
        let j = std::f64::consts::PI * r.powi(4) / 2.0;
        let z = std::f64::consts::PI * r.powi(3) / 4.0 * 4.0 / 3.0;

        Self {
            a,
            iy: i,
            iz: i,
            j,
            zy: Some(z),
            zz: Some(z),
            depth: Some(diameter),
            width: Some(diameter),
            section_type: SectionType::Circular,
        }
    }

    pub fn pipe(outer_diameter: f64, wall_thickness: f64) -> Self {
        let r_o = outer_diameter / 2.0;
        let r_i = r_o - wall_thickness;

        let a = std::f64::consts::PI * (r_o.powi(2) - r_i.powi(2));
        let i = std::f64::consts::PI * (r_o.powi(4) - r_i.powi(4)) / 4.0;
        let j = std::f64::consts::PI * (r_o.powi(4) - r_i.powi(4)) / 2.0;

        Self {
            a,
            iy: i,
            iz: i,
            j,
            zy: None,
            zz: None,
            depth: Some(outer_diameter),
            width: Some(outer_diameter),
            section_type: SectionType::Pipe,
        }
    }

    /// Wide-flange (I-beam) section. `iy` is the strong axis (bending about
    /// the axis perpendicular to the web), `iz` the weak axis — the
    /// canonical convention for this crate's stiffness kernel and design
    /// checks alike.
    pub fn wide_flange(
        depth: f64,
        flange_width: f64,
        flange_thickness: f64,
        web_thickness: f64,
    ) -> Self {
        let bf = flange_width;
        let tf = flange_thickness;
        let tw = web_thickness;
        let d = depth;
        let hw = d - 2.0 * tf;

        let a = 2.0 * bf * tf + hw * tw;
        let iy = (bf * d.powi(3) - (bf - tw) * hw.powi(3)) / 12.0;
        let iz = (2.0 * tf * bf.powi(3) + hw * tw.powi(3)) / 12.0;
        let j = (2.0 * bf * tf.powi(3) + hw * tw.powi(3)) / 3.0;

        let zy = bf * tf * (d - tf) + tw * hw.powi(2) / 4.0;
        let zz = tf * bf.powi(2) / 2.0 + hw * tw.powi(2) / 4.0;

        Self {
            a,
            iy,
            iz,
            j,
            zy: Some(zy),
            zz: Some(zz),
            depth: Some(d),
            width: Some(bf),
            section_type: SectionType::WideFlange,
        }
    }

    pub fn box_section(width: f64, depth: f64, wall_thickness: f64) -> Self {
        let t = wall_thickness;
        let b = width;
        let d = depth;
        let bi = b - 2.0 * t;
        let di = d - 2.0 * t;

        let a = b * d - bi * di;
        let iy = (b * d.powi(3) - bi * di.powi(3)) / 12.0;
        let iz = (d * b.powi(3) - di * bi.powi(3)) / 12.0;

        let am = (b - t) * (d - t);
        let s = 2.0 * (b + d) - 4.0 * t;
        let j = 4.0 * am.powi(2) * t / s;

        Self {
            a,
            iy,
            iz,
            j,
            zy: None,
            zz: None,
            depth: Some(d),
            width: Some(b),
            section_type: SectionType::Box,
        }
    }

    pub fn ry(&self) -> f64 {
        (self.iy / self.a).sqrt()
    }

    pub fn rz(&self) -> f64 {
        (self.iz / self.a).sqrt()
    }

    pub fn ip(&self) -> f64 {
        self.iy + self.iz
    }
}

impl Default for Section {
    fn default() -> Self {
        Self::rectangular(0.2, 0.2)
    }
}
