use std::fmt;

use crate::{grid::direction::Direction, CatalogError};

/// Index of a [`Template`] in a [`super::catalog::TemplateCatalog`]
pub type TemplateIndex = usize;

/// Kind of border found on one edge of a [`Template`].
///
/// Two templates can be placed next to each other if the facing edges have the exact same [`BorderKind`]. There is no ordering between kinds.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct BorderKind(u32);

impl BorderKind {
    /// Nothing on this edge, used by the boundary template
    pub const VOID: BorderKind = BorderKind(0);
    /// A wall crosses this edge
    pub const BORDER: BorderKind = BorderKind(1);
    /// Vegetation crosses this edge
    pub const GREEN: BorderKind = BorderKind(2);

    /// Creates a custom [`BorderKind`]. Values `0`, `1` and `2` are the predefined [`BorderKind::VOID`], [`BorderKind::BORDER`] and [`BorderKind::GREEN`].
    pub const fn new(id: u32) -> BorderKind {
        BorderKind(id)
    }

    /// Returns the raw identifier of this kind
    pub fn id(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for BorderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            BorderKind::VOID => write!(f, "void"),
            BorderKind::BORDER => write!(f, "border"),
            BorderKind::GREEN => write!(f, "green"),
            BorderKind(id) => write!(f, "kind#{}", id),
        }
    }
}

/// Quarter turns applied to a base [`Template`], clockwise.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum TemplateRotation {
    /// Rotation of 0°
    #[default]
    Rot0,
    /// Rotation of 90°
    Rot90,
    /// Rotation of 180°
    Rot180,
    /// Rotation of 270°
    Rot270,
}

impl TemplateRotation {
    /// Returns the value of the rotation in °(degrees).
    pub fn value(&self) -> u32 {
        match *self {
            TemplateRotation::Rot0 => 0,
            TemplateRotation::Rot90 => 90,
            TemplateRotation::Rot180 => 180,
            TemplateRotation::Rot270 => 270,
        }
    }

    /// Returns the number of quarter turns of this rotation.
    pub fn index(&self) -> u8 {
        match *self {
            TemplateRotation::Rot0 => 0,
            TemplateRotation::Rot90 => 1,
            TemplateRotation::Rot180 => 2,
            TemplateRotation::Rot270 => 3,
        }
    }

    /// Returns a new [`TemplateRotation`] equal to this rotation rotated by `rotation`
    ///
    /// ### Example
    /// ```
    /// use tilemap_wfc::generator::template::TemplateRotation;
    ///
    /// let rot_90 = TemplateRotation::Rot90;
    /// assert_eq!(rot_90.rotated(TemplateRotation::Rot270), TemplateRotation::Rot0);
    /// ```
    #[inline]
    pub fn rotated(&self, rotation: TemplateRotation) -> TemplateRotation {
        ALL_TEMPLATE_ROTATIONS[(self.index() as usize + rotation.index() as usize)
            % ALL_TEMPLATE_ROTATIONS.len()]
    }
}

impl TryFrom<u8> for TemplateRotation {
    type Error = CatalogError;

    fn try_from(ticks: u8) -> Result<Self, Self::Error> {
        match ticks {
            0 => Ok(TemplateRotation::Rot0),
            1 => Ok(TemplateRotation::Rot90),
            2 => Ok(TemplateRotation::Rot180),
            3 => Ok(TemplateRotation::Rot270),
            _ => Err(CatalogError::InvalidRotation(ticks)),
        }
    }
}

/// All the possible rotations for a [`Template`], in expansion order
pub const ALL_TEMPLATE_ROTATIONS: &'static [TemplateRotation] = &[
    TemplateRotation::Rot0,
    TemplateRotation::Rot90,
    TemplateRotation::Rot180,
    TemplateRotation::Rot270,
];

/// A tile definition: one [`BorderKind`] per edge, the sprite to draw and how to rotate it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Template {
    pub top: BorderKind,
    pub right: BorderKind,
    pub bottom: BorderKind,
    pub left: BorderKind,
    /// Sprite identifier, shared by every rotation of the same base template
    pub id: u32,
    /// Rotation applied to the base template to obtain this one
    pub rotation: TemplateRotation,
    /// Relative probability of this template being picked during a collapse. Always `> 0`.
    pub weight: u32,
}

impl Template {
    /// Creates a base [`Template`], not rotated and with a weight of 1.
    pub fn new(
        id: u32,
        top: BorderKind,
        right: BorderKind,
        bottom: BorderKind,
        left: BorderKind,
    ) -> Template {
        Self {
            top,
            right,
            bottom,
            left,
            id,
            rotation: TemplateRotation::Rot0,
            weight: 1,
        }
    }

    /// Creates a base [`Template`] with the same [`BorderKind`] on every edge.
    pub fn uniform(id: u32, border: BorderKind) -> Template {
        Self::new(id, border, border, border, border)
    }

    /// Specify this [`Template`] weight. The value should be strictly superior to `0`, it is checked when the catalog is built.
    ///
    /// All the rotations of this [`Template`] share the same weight.
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    /// Returns the [`BorderKind`] on the edge facing `direction`
    #[inline]
    pub fn edge(&self, direction: Direction) -> BorderKind {
        match direction {
            Direction::Top => self.top,
            Direction::Right => self.right,
            Direction::Bottom => self.bottom,
            Direction::Left => self.left,
        }
    }

    /// Returns the edges in the `[top, right, bottom, left]` order
    pub fn edges(&self) -> [BorderKind; 4] {
        [self.top, self.right, self.bottom, self.left]
    }

    /// Returns a copy of this template turned clockwise by `rotation`, with its `rotation` field set to `rotation`.
    ///
    /// Meant to be applied to base templates: `id` and `weight` are kept as is.
    pub fn rotated(&self, rotation: TemplateRotation) -> Template {
        let mut edges = self.edges();
        // One quarter turn: the left edge becomes the top one, the top edge becomes the right one, ...
        edges.rotate_right(rotation.index() as usize);
        let [top, right, bottom, left] = edges;
        Template {
            top,
            right,
            bottom,
            left,
            rotation,
            ..*self
        }
    }

    /// Returns `true` if both templates have the same edges and sprite id. The rotation and weight are ignored.
    pub fn same_signature(&self, other: &Template) -> bool {
        self.edges() == other.edges() && self.id == other.id
    }

    /// Returns the data a renderer needs to draw this template.
    pub fn to_instance(&self) -> TileInstance {
        TileInstance {
            id: self.id,
            rotation: self.rotation,
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} rotation {} ({} {} {} {})]",
            self.id,
            self.rotation.value(),
            self.top,
            self.right,
            self.bottom,
            self.left
        )
    }
}

/// Rotates `template` by `ticks` quarter turns.
///
/// Fails with [`CatalogError::InvalidRotation`] if `ticks` is not in `0..=3`.
///
/// ### Example
/// ```
/// use tilemap_wfc::generator::template::{rotate, BorderKind, Template};
///
/// let corner = Template::new(1, BorderKind::BORDER, BorderKind::BORDER, BorderKind::VOID, BorderKind::VOID);
/// let rotated = rotate(&corner, 1).unwrap();
/// assert_eq!(rotated.top, BorderKind::VOID);
/// assert_eq!(rotated.right, BorderKind::BORDER);
/// assert!(rotate(&corner, 4).is_err());
/// ```
pub fn rotate(template: &Template, ticks: u8) -> Result<Template, CatalogError> {
    let rotation = TemplateRotation::try_from(ticks)?;
    Ok(template.rotated(rotation))
}

/// Identifies what to draw on a cell: the sprite and its rotation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct TileInstance {
    /// Sprite identifier
    pub id: u32,
    /// Rotation of the sprite
    pub rotation: TemplateRotation,
}

#[cfg(test)]
mod tests {
    use crate::{grid::direction::Direction, CatalogError};

    use super::{rotate, BorderKind, Template, TemplateRotation};

    fn corner() -> Template {
        Template::new(
            1,
            BorderKind::BORDER,
            BorderKind::GREEN,
            BorderKind::VOID,
            BorderKind::new(7),
        )
        .with_weight(3)
    }

    #[test]
    fn rotation_edge_mapping() {
        let t = corner();

        let r1 = rotate(&t, 1).unwrap();
        assert_eq!(r1.edges(), [t.left, t.top, t.right, t.bottom]);
        assert_eq!(r1.rotation, TemplateRotation::Rot90);

        let r2 = rotate(&t, 2).unwrap();
        assert_eq!(r2.edges(), [t.bottom, t.left, t.top, t.right]);
        assert_eq!(r2.rotation, TemplateRotation::Rot180);

        let r3 = rotate(&t, 3).unwrap();
        assert_eq!(r3.edges(), [t.right, t.bottom, t.left, t.top]);
        assert_eq!(r3.rotation, TemplateRotation::Rot270);

        let r0 = rotate(&t, 0).unwrap();
        assert_eq!(r0, t);
    }

    #[test]
    fn rotation_keeps_id_and_weight() {
        let t = corner();
        for ticks in 0..4 {
            let r = rotate(&t, ticks).unwrap();
            assert_eq!(r.id, t.id);
            assert_eq!(r.weight, t.weight);
            assert_eq!(r.rotation.index(), ticks);
        }
    }

    #[test]
    fn four_quarter_turns_are_identity() {
        let t = corner();
        let mut r = t;
        for _ in 0..4 {
            r = rotate(&r, 1).unwrap();
        }
        assert_eq!(r.edges(), t.edges());
    }

    #[test]
    fn invalid_rotation_fails() {
        assert_eq!(rotate(&corner(), 4), Err(CatalogError::InvalidRotation(4)));
        assert_eq!(
            TemplateRotation::try_from(200),
            Err(CatalogError::InvalidRotation(200))
        );
    }

    #[test]
    fn edge_lookup() {
        let t = corner();
        assert_eq!(t.edge(Direction::Top), BorderKind::BORDER);
        assert_eq!(t.edge(Direction::Right), BorderKind::GREEN);
        assert_eq!(t.edge(Direction::Bottom), BorderKind::VOID);
        assert_eq!(t.edge(Direction::Left), BorderKind::new(7));
    }

    #[test]
    fn rotations_compose() {
        assert_eq!(
            TemplateRotation::Rot180.rotated(TemplateRotation::Rot270),
            TemplateRotation::Rot90
        );
        assert_eq!(TemplateRotation::Rot270.value(), 270);
    }
}
