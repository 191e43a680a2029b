//! Typed access to game-information properties stored as text.
//!
//! `HA`, `KM` and `RE` are kept as simple text so malformed values survive
//! a load/save cycle untouched; they are only interpreted on read.

use std::fmt;

use super::node::{Node, NodeId};
use super::property::{SgfType, SgfValue};
use super::tree::GameTree;
use crate::board::Color;

/// How a game was won
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WinBy {
    Score(f64),
    Resignation,
    Time,
    Forfeit,
    /// `B+` / `W+` without details
    Unspecified,
}

/// Parsed `RE` value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameResult {
    NotSet,
    /// Present but unparseable
    Invalid,
    Draw,
    Void,
    /// `RE[?]`
    Unknown,
    Win { winner: Color, by: WinBy },
}

impl GameResult {
    pub fn parse(text: &str) -> GameResult {
        let text = text.trim();
        match text {
            "0" | "Draw" | "draw" => return GameResult::Draw,
            "Void" | "void" => return GameResult::Void,
            "?" => return GameResult::Unknown,
            _ => {}
        }

        let Some((winner, how)) = text.split_once('+') else {
            return GameResult::Invalid;
        };
        let winner = match winner {
            "B" | "b" => Color::Black,
            "W" | "w" => Color::White,
            _ => return GameResult::Invalid,
        };
        let by = match how {
            "" => WinBy::Unspecified,
            "R" | "Resign" => WinBy::Resignation,
            "T" | "Time" => WinBy::Time,
            "F" | "Forfeit" => WinBy::Forfeit,
            score => match score.parse::<f64>() {
                Ok(score) if score > 0.0 && score.is_finite() => WinBy::Score(score),
                _ => return GameResult::Invalid,
            },
        };

        GameResult::Win { winner, by }
    }

    #[inline]
    pub fn winner(&self) -> Option<Color> {
        match *self {
            GameResult::Win { winner, .. } => Some(winner),
            _ => None,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::NotSet | GameResult::Invalid => Ok(()),
            GameResult::Draw => f.write_str("0"),
            GameResult::Void => f.write_str("Void"),
            GameResult::Unknown => f.write_str("?"),
            GameResult::Win { winner, by } => {
                let color = if *winner == Color::Black { 'B' } else { 'W' };
                match by {
                    WinBy::Score(score) => write!(f, "{color}+{score}"),
                    WinBy::Resignation => write!(f, "{color}+R"),
                    WinBy::Time => write!(f, "{color}+T"),
                    WinBy::Forfeit => write!(f, "{color}+F"),
                    WinBy::Unspecified => write!(f, "{color}+"),
                }
            }
        }
    }
}

impl Node {
    /// `HA` value, `-1` if missing or malformed
    pub fn handicap(&self) -> i32 {
        self.text(SgfType::Handicap)
            .and_then(|text| text.trim().parse::<i32>().ok())
            .filter(|&handicap| handicap >= 0)
            .unwrap_or(-1)
    }

    /// `KM` value, `None` if missing or malformed
    pub fn komi(&self) -> Option<f64> {
        self.text(SgfType::Komi)
            .and_then(|text| text.trim().parse::<f64>().ok())
            .filter(|komi| komi.is_finite())
    }

    pub fn result(&self) -> GameResult {
        match self.text(SgfType::Result) {
            Some(text) => GameResult::parse(text),
            None => GameResult::NotSet,
        }
    }
}

impl GameTree {
    pub fn set_handicap(&mut self, node: NodeId, handicap: u32) {
        self.set_property(node, SgfType::Handicap, SgfValue::SimpleText(handicap.to_string()));
    }

    pub fn set_komi(&mut self, node: NodeId, komi: f64) {
        self.set_property(node, SgfType::Komi, SgfValue::SimpleText(komi.to_string()));
    }

    /// Set `RE`; [`GameResult::NotSet`] deletes it.
    ///
    /// # Panics
    /// On [`GameResult::Invalid`].
    pub fn set_result(&mut self, node: NodeId, result: GameResult) {
        assert_ne!(result, GameResult::Invalid, "cannot store an invalid result");
        if result == GameResult::NotSet {
            self.delete_property(node, SgfType::Result);
        } else {
            self.set_property(node, SgfType::Result, SgfValue::SimpleText(result.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn node_with(ty: SgfType, text: &str) -> Node {
        let mut node = Node::new();
        node.set_property(ty, SgfValue::SimpleText(text.to_string()));
        node
    }

    #[test]
    fn test_handicap_sentinels() {
        assert_eq!(Node::new().handicap(), -1);
        assert_eq!(node_with(SgfType::Handicap, "3").handicap(), 3);
        assert_eq!(node_with(SgfType::Handicap, " 0 ").handicap(), 0);
        assert_eq!(node_with(SgfType::Handicap, "two").handicap(), -1);
        assert_eq!(node_with(SgfType::Handicap, "-2").handicap(), -1);
    }

    #[test]
    fn test_komi() {
        assert_eq!(node_with(SgfType::Komi, "6.5").komi(), Some(6.5));
        assert_eq!(node_with(SgfType::Komi, "abc").komi(), None);
        assert_eq!(Node::new().komi(), None);
    }

    #[test]
    fn test_result_parsing() {
        assert_eq!(Node::new().result(), GameResult::NotSet);
        assert_eq!(
            node_with(SgfType::Result, "B+R").result(),
            GameResult::Win { winner: Color::Black, by: WinBy::Resignation }
        );
        assert_eq!(
            node_with(SgfType::Result, "W+3.5").result(),
            GameResult::Win { winner: Color::White, by: WinBy::Score(3.5) }
        );
        assert_eq!(node_with(SgfType::Result, "0").result(), GameResult::Draw);
        assert_eq!(node_with(SgfType::Result, "X+1").result(), GameResult::Invalid);
        assert_eq!(node_with(SgfType::Result, "B+-4").result(), GameResult::Invalid);
    }

    #[test]
    fn test_result_display() {
        for text in ["B+R", "W+T", "B+F", "W+", "B+0.5", "0", "Void", "?"] {
            assert_eq!(GameResult::parse(text).to_string(), text);
        }
    }
}
