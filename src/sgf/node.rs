//! Game tree nodes

use slotmap::new_key_type;

use super::property::{Category, Property, SgfType, SgfValue};
use crate::board::{BoardChanges, BoardPositionList, Color, Move};

new_key_type! {
    /// Handle of a node inside a [`NodeStore`](super::NodeStore)
    pub struct NodeId;
}

/// What kind of node this is, as far as the board is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MoveColor {
    /// No move and no setup
    #[default]
    Empty,
    Black,
    White,
    /// Setup properties (`AB`, `AW`, `AE`, `AA`) without a move
    Setup,
}

impl MoveColor {
    #[inline]
    pub fn color(self) -> Option<Color> {
        match self {
            MoveColor::Black => Some(Color::Black),
            MoveColor::White => Some(Color::White),
            _ => None,
        }
    }
}

impl From<Color> for MoveColor {
    fn from(color: Color) -> Self {
        match color {
            Color::Black => MoveColor::Black,
            Color::White => MoveColor::White,
        }
    }
}

/// One node of a game tree.
///
/// Children form a singly linked sibling chain starting at `child`.
/// `current_variation` remembers which child the cursor last went through.
/// Properties are kept in [`SgfType`] order; unknown properties go last.
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) child: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
    pub(crate) current_variation: Option<NodeId>,
    pub(crate) move_color: MoveColor,
    pub(crate) mv: Move,
    pub(crate) to_play: Option<Color>,
    pub(crate) is_collapsed: bool,
    pub(crate) properties: Vec<Property>,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    /// A node playing `mv` for `color`
    pub fn with_move(color: Color, mv: Move) -> Self {
        Self { move_color: color.into(), mv, ..Self::default() }
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn child(&self) -> Option<NodeId> {
        self.child
    }

    #[inline]
    pub fn next(&self) -> Option<NodeId> {
        self.next
    }

    #[inline]
    pub fn current_variation(&self) -> Option<NodeId> {
        self.current_variation
    }

    #[inline]
    pub fn move_color(&self) -> MoveColor {
        self.move_color
    }

    /// Color and move, if this is a move node
    pub fn move_data(&self) -> Option<(Color, Move)> {
        self.move_color.color().map(|color| (color, self.mv))
    }

    /// Explicit `PL` value
    #[inline]
    pub fn to_play(&self) -> Option<Color> {
        self.to_play
    }

    #[inline]
    pub fn is_collapsed(&self) -> bool {
        self.is_collapsed
    }

    #[inline]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Index of `ty` in the property list, or the index where it would be
    /// inserted to keep the list ordered.
    pub fn find_property(&self, ty: SgfType) -> Result<usize, usize> {
        for (index, property) in self.properties.iter().enumerate() {
            if property.ty == ty {
                return Ok(index);
            }
            if property.ty > ty {
                return Err(index);
            }
        }
        Err(self.properties.len())
    }

    pub fn property(&self, ty: SgfType) -> Option<&Property> {
        self.find_property(ty).ok().map(|index| &self.properties[index])
    }

    pub fn value(&self, ty: SgfType) -> Option<&SgfValue> {
        self.property(ty).map(|property| &property.value)
    }

    #[inline]
    pub fn has_property(&self, ty: SgfType) -> bool {
        self.find_property(ty).is_ok()
    }

    pub fn number(&self, ty: SgfType) -> Option<i32> {
        match self.value(ty)? {
            SgfValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn real(&self, ty: SgfType) -> Option<f64> {
        match self.value(ty)? {
            SgfValue::Real(value) => Some(*value),
            _ => None,
        }
    }

    /// Simple text or text value
    pub fn text(&self, ty: SgfType) -> Option<&str> {
        match self.value(ty)? {
            SgfValue::SimpleText(text) | SgfValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn points(&self, ty: SgfType) -> Option<&BoardPositionList> {
        match self.value(ty)? {
            SgfValue::Points(list) => Some(list),
            _ => None,
        }
    }

    /// Whether any property of the given category is present
    pub fn has_category(&self, category: Category) -> bool {
        self.properties.iter().any(|property| property.ty.category() == category)
    }

    #[inline]
    pub fn has_game_info(&self) -> bool {
        self.has_category(Category::GameInfo)
    }

    /// Setup node: explicitly marked or carrying setup properties
    pub fn is_setup(&self) -> bool {
        self.move_color == MoveColor::Setup || self.has_category(Category::Setup)
    }

    /// Board changes described by the setup properties
    pub fn setup_changes(&self) -> BoardChanges {
        let list = |ty| self.points(ty).cloned().unwrap_or_default();
        BoardChanges {
            black: list(SgfType::AddBlack),
            white: list(SgfType::AddWhite),
            empty: list(SgfType::AddEmpty),
            arrows: list(SgfType::AddArrows),
        }
    }

    // Raw mutators below bypass undo histories. They are meant for building
    // nodes before they are linked, and for custom undo operations.

    pub fn set_move(&mut self, color: Color, mv: Move) {
        self.move_color = color.into();
        self.mv = mv;
    }

    pub fn set_setup(&mut self) {
        self.move_color = MoveColor::Setup;
        self.mv = Move::Pass;
    }

    pub fn set_to_play(&mut self, color: Option<Color>) {
        self.to_play = color;
    }

    /// Add or overwrite a known property, returning the previous value.
    pub fn set_property(&mut self, ty: SgfType, value: SgfValue) -> Option<SgfValue> {
        assert_ne!(ty, SgfType::Unknown, "unknown properties are added by id");
        let property = Property::new(ty, value);
        match self.find_property(ty) {
            Ok(index) => Some(std::mem::replace(&mut self.properties[index].value, property.value)),
            Err(index) => {
                self.properties.insert(index, property);
                None
            }
        }
    }

    /// Append an unrecognized property. Unknown properties are never merged.
    pub fn add_unknown_property(&mut self, id: impl Into<String>, values: Vec<String>) {
        self.properties.push(Property {
            ty: SgfType::Unknown,
            value: SgfValue::Unknown { id: id.into(), values },
        });
    }

    pub fn remove_property(&mut self, ty: SgfType) -> Option<Property> {
        self.find_property(ty).ok().map(|index| self.properties.remove(index))
    }

    /// Insert a property known to be absent
    pub(crate) fn insert_property(&mut self, property: Property) {
        match self.find_property(property.ty) {
            Ok(_) => panic!("property {:?} already present", property.ty),
            Err(index) => self.properties.insert(index, property),
        }
    }

    pub(crate) fn value_mut(&mut self, ty: SgfType) -> Option<&mut SgfValue> {
        let index = self.find_property(ty).ok()?;
        Some(&mut self.properties[index].value)
    }

    /// Copy of the payload, detached from any tree
    pub fn duplicate(&self) -> Node {
        Node {
            parent: None,
            child: None,
            next: None,
            current_variation: None,
            move_color: self.move_color,
            mv: self.mv,
            to_play: self.to_play,
            is_collapsed: self.is_collapsed,
            properties: self.properties.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Point;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_properties_stay_ordered() {
        let mut node = Node::new();
        node.set_property(SgfType::Comment, SgfValue::Text("hi".into()));
        node.add_unknown_property("XX", vec!["1".into()]);
        node.set_property(SgfType::GameType, SgfValue::Number(1));
        node.set_property(SgfType::AddBlack, SgfValue::Points(BoardPositionList::new()));

        let types: Vec<SgfType> = node.properties().iter().map(|p| p.ty).collect();
        assert_eq!(
            types,
            vec![SgfType::GameType, SgfType::AddBlack, SgfType::Comment, SgfType::Unknown]
        );
        assert_eq!(node.find_property(SgfType::FileFormat), Err(0));
        assert_eq!(node.find_property(SgfType::AddBlack), Ok(1));
    }

    #[test]
    fn test_set_property_overwrites() {
        let mut node = Node::new();
        assert_eq!(node.set_property(SgfType::NodeName, SgfValue::SimpleText("a".into())), None);
        assert_eq!(
            node.set_property(SgfType::NodeName, SgfValue::SimpleText("b".into())),
            Some(SgfValue::SimpleText("a".into()))
        );
        assert_eq!(node.text(SgfType::NodeName), Some("b"));
        assert_eq!(node.properties().len(), 1);
    }

    #[test]
    fn test_setup_detection() {
        let mut node = Node::with_move(Color::Black, Move::Play(Point::new(2, 2)));
        assert!(!node.is_setup());
        assert_eq!(node.move_data(), Some((Color::Black, Move::Play(Point::new(2, 2)))));

        let mut setup = Node::new();
        setup.set_property(
            SgfType::AddWhite,
            SgfValue::Points(BoardPositionList::from_points([Point::new(1, 1)])),
        );
        assert!(setup.is_setup());
        assert_eq!(setup.setup_changes().white.len(), 1);

        node.remove_property(SgfType::AddWhite);
        node.set_setup();
        assert!(node.is_setup());
        assert_eq!(node.move_data(), None);
    }
}
