//! SGF properties and their values

use crate::board::{BoardPositionList, Point};

/// Semantic value type of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Flag properties without a value (`KO`, `IT`, `DO`)
    None,
    Number,
    Real,
    SimpleText,
    Text,
    PointList,
    VectorList,
    LabelList,
    Figure,
    Unknown,
}

/// Property groups relevant to node splitting and board-state caching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Root,
    GameInfo,
    Setup,
    NodeName,
    Move,
    NodeAnnotation,
    Markup,
    Unknown,
}

macro_rules! sgf_types {
    ($($variant:ident => ($id:literal, $kind:ident, $category:ident),)*) => {
        /// Known SGF property identifiers.
        ///
        /// Declaration order is the canonical order of properties inside a
        /// node. `B`/`W` moves and `PL` are stored inline on the node.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum SgfType {
            $($variant,)*
            Unknown,
        }

        impl SgfType {
            pub const KNOWN: &'static [SgfType] = &[$(SgfType::$variant,)*];

            /// Identifier as written in SGF files
            pub fn id(self) -> &'static str {
                match self {
                    $(SgfType::$variant => $id,)*
                    SgfType::Unknown => "",
                }
            }

            pub fn value_kind(self) -> ValueKind {
                match self {
                    $(SgfType::$variant => ValueKind::$kind,)*
                    SgfType::Unknown => ValueKind::Unknown,
                }
            }

            pub fn category(self) -> Category {
                match self {
                    $(SgfType::$variant => Category::$category,)*
                    SgfType::Unknown => Category::Unknown,
                }
            }
        }
    };
}

sgf_types! {
    FileFormat => ("FF", Number, Root),
    GameType => ("GM", Number, Root),
    Application => ("AP", SimpleText, Root),
    Charset => ("CA", SimpleText, Root),
    Style => ("ST", Number, Root),

    Annotator => ("AN", SimpleText, GameInfo),
    BlackRank => ("BR", SimpleText, GameInfo),
    BlackTeam => ("BT", SimpleText, GameInfo),
    Copyright => ("CP", SimpleText, GameInfo),
    Date => ("DT", SimpleText, GameInfo),
    Event => ("EV", SimpleText, GameInfo),
    GameName => ("GN", SimpleText, GameInfo),
    GameComment => ("GC", Text, GameInfo),
    Opening => ("ON", SimpleText, GameInfo),
    Overtime => ("OT", SimpleText, GameInfo),
    BlackPlayer => ("PB", SimpleText, GameInfo),
    Place => ("PC", SimpleText, GameInfo),
    WhitePlayer => ("PW", SimpleText, GameInfo),
    Result => ("RE", SimpleText, GameInfo),
    Round => ("RO", SimpleText, GameInfo),
    Rules => ("RU", SimpleText, GameInfo),
    Source => ("SO", SimpleText, GameInfo),
    TimeLimit => ("TM", Real, GameInfo),
    User => ("US", SimpleText, GameInfo),
    WhiteRank => ("WR", SimpleText, GameInfo),
    WhiteTeam => ("WT", SimpleText, GameInfo),
    Handicap => ("HA", SimpleText, GameInfo),
    Komi => ("KM", SimpleText, GameInfo),

    AddBlack => ("AB", PointList, Setup),
    AddWhite => ("AW", PointList, Setup),
    AddEmpty => ("AE", PointList, Setup),
    AddArrows => ("AA", PointList, Setup),

    NodeName => ("N", SimpleText, NodeName),

    BlackTimeLeft => ("BL", Real, Move),
    WhiteTimeLeft => ("WL", Real, Move),
    BlackMovesLeft => ("OB", Number, Move),
    WhiteMovesLeft => ("OW", Number, Move),
    MoveNumber => ("MN", Number, Move),
    Ko => ("KO", None, Move),
    BadMove => ("BM", Number, Move),
    Doubtful => ("DO", None, Move),
    Interesting => ("IT", None, Move),
    Tesuji => ("TE", Number, Move),

    Comment => ("C", Text, NodeAnnotation),
    EvenPosition => ("DM", Number, NodeAnnotation),
    GoodForBlack => ("GB", Number, NodeAnnotation),
    GoodForWhite => ("GW", Number, NodeAnnotation),
    Hotspot => ("HO", Number, NodeAnnotation),
    Unclear => ("UC", Number, NodeAnnotation),
    Value => ("V", Real, NodeAnnotation),

    Arrow => ("AR", VectorList, Markup),
    Line => ("LN", VectorList, Markup),
    Circle => ("CR", PointList, Markup),
    Mark => ("MA", PointList, Markup),
    Selected => ("SL", PointList, Markup),
    Square => ("SQ", PointList, Markup),
    Triangle => ("TR", PointList, Markup),
    Dimmed => ("DD", PointList, Markup),
    Label => ("LB", LabelList, Markup),
    BlackTerritory => ("TB", PointList, Markup),
    WhiteTerritory => ("TW", PointList, Markup),
    Figure => ("FG", Figure, Markup),
    PrintMoveMode => ("PM", Number, Markup),
    View => ("VW", PointList, Markup),
}

impl SgfType {
    /// Look up a known property by its SGF identifier
    pub fn from_id(id: &str) -> Option<SgfType> {
        SgfType::KNOWN.iter().copied().find(|ty| ty.id() == id)
    }

    /// Properties kept on a node by [`split`](super::NodeStore::split)
    pub fn stays_on_split(self) -> bool {
        matches!(
            self.category(),
            Category::Root | Category::GameInfo | Category::Setup | Category::NodeName
        )
    }
}

/// Text label placed on a point (`LB`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label {
    pub point: Point,
    pub text: String,
}

/// Figure description (`FG`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FigureDescription {
    pub flags: i32,
    pub name: String,
}

/// Property value, tagged by its semantic type
#[derive(Debug, Clone, PartialEq)]
pub enum SgfValue {
    None,
    Number(i32),
    Real(f64),
    SimpleText(String),
    Text(String),
    Points(BoardPositionList),
    Vectors(Vec<(Point, Point)>),
    Labels(Vec<Label>),
    /// `FG[]` without a description is valid
    Figure(Option<FigureDescription>),
    /// Unrecognized property, preserved verbatim
    Unknown { id: String, values: Vec<String> },
}

impl SgfValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            SgfValue::None => ValueKind::None,
            SgfValue::Number(_) => ValueKind::Number,
            SgfValue::Real(_) => ValueKind::Real,
            SgfValue::SimpleText(_) => ValueKind::SimpleText,
            SgfValue::Text(_) => ValueKind::Text,
            SgfValue::Points(_) => ValueKind::PointList,
            SgfValue::Vectors(_) => ValueKind::VectorList,
            SgfValue::Labels(_) => ValueKind::LabelList,
            SgfValue::Figure(_) => ValueKind::Figure,
            SgfValue::Unknown { .. } => ValueKind::Unknown,
        }
    }
}

/// A single property attached to a node
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub ty: SgfType,
    pub value: SgfValue,
}

impl Property {
    /// # Panics
    /// If the value does not match the property's semantic type.
    pub fn new(ty: SgfType, value: SgfValue) -> Self {
        assert_eq!(
            ty.value_kind(),
            value.kind(),
            "value of the wrong kind for property {ty:?}"
        );
        Self { ty, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_lookup() {
        assert_eq!(SgfType::from_id("AB"), Some(SgfType::AddBlack));
        assert_eq!(SgfType::from_id("KM"), Some(SgfType::Komi));
        assert_eq!(SgfType::from_id("ZZ"), None);
        for &ty in SgfType::KNOWN {
            assert_eq!(SgfType::from_id(ty.id()), Some(ty));
        }
    }

    #[test]
    fn test_split_categories() {
        assert!(SgfType::GameType.stays_on_split());
        assert!(SgfType::BlackPlayer.stays_on_split());
        assert!(SgfType::AddWhite.stays_on_split());
        assert!(SgfType::NodeName.stays_on_split());
        assert!(!SgfType::Comment.stays_on_split());
        assert!(!SgfType::BlackTimeLeft.stays_on_split());
    }

    #[test]
    #[should_panic(expected = "wrong kind")]
    fn test_property_kind_mismatch() {
        Property::new(SgfType::Comment, SgfValue::Number(3));
    }
}
