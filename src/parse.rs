use crate::Bond;
use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res, opt, value},
    error::{convert_error, VerboseError},
    multi::separated_list1,
    sequence::{delimited, pair, preceded, separated_pair, tuple},
    IResult,
};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// The error type we will use.
pub type Error<'a> = VerboseError<&'a str>;

/// A convenient alias for our IResult with that error type.
pub type Res<'a, T> = IResult<&'a str, T, Error<'a>>;

/// A parsed signature string: the root color, the height marker, and one
/// subtree per bond out of the root. A bare color parses as a leaf with
/// height 0 and no children.
///
/// Ring bonds make atoms reappear, so the tree can hold more nodes than the
/// molecule has atoms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigTree {
    pub color: String,
    pub height: usize,
    pub children: Vec<(Bond, SigTree)>,
}

impl SigTree {
    /// Total nodes in the tree, revisited atoms included.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|(_, child)| child.node_count())
            .sum::<usize>()
    }

    /// Structural depth: 0 for a leaf.
    pub fn max_depth(&self) -> usize {
        self.children
            .iter()
            .map(|(_, child)| 1 + child.max_depth())
            .max()
            .unwrap_or(0)
    }
}

impl Display for SigTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if self.children.is_empty() {
            return write!(f, "{}", self.color);
        }
        write!(f, "{}~{}(", self.color, self.height)?;
        for (i, (bond, child)) in self.children.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}{}", bond.symbol(), child)?;
        }
        write!(f, ")")
    }
}

impl FromStr for SigTree {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_signature(s)
    }
}

/// A color runs until a structural delimiter.
fn parse_color(input: &str) -> Res<&str> {
    take_while1(|c: char| !matches!(c, '~' | '(' | ')' | ',' | '.' | '*'))(input)
}

fn parse_count(input: &str) -> Res<usize> {
    map_res(digit1, |digits: &str| digits.parse::<usize>())(input)
}

fn parse_bond(input: &str) -> Res<Bond> {
    alt((
        value(Bond::Single, char('-')),
        value(Bond::Double, char('=')),
        value(Bond::Triple, char('#')),
        value(Bond::Aromatic, char(':')),
    ))(input)
}

fn parse_child(input: &str) -> Res<(Bond, SigTree)> {
    pair(parse_bond, parse_tree)(input)
}

fn parse_tree(input: &str) -> Res<SigTree> {
    let (input, color) = parse_color(input)?;
    let (input, tail) = opt(tuple((
        preceded(char('~'), parse_count),
        delimited(char('('), separated_list1(char(','), parse_child), char(')')),
    )))(input)?;
    let tree = match tail {
        Some((height, children)) => SigTree {
            color: color.to_string(),
            height,
            children,
        },
        None => SigTree {
            color: color.to_string(),
            height: 0,
            children: Vec::new(),
        },
    };
    Ok((input, tree))
}

fn parse_entry(input: &str) -> Res<(usize, SigTree)> {
    separated_pair(parse_count, char('*'), parse_tree)(input)
}

/// Parses one atom signature back into its tree form.
pub fn parse_signature(input: &str) -> Result<SigTree, String> {
    match all_consuming(parse_tree)(input.trim()) {
        Ok((_, tree)) => Ok(tree),
        Err(e) => match e {
            nom::Err::Error(e) | nom::Err::Failure(e) => Err(convert_error(input, e)),
            nom::Err::Incomplete(_) => Err("incomplete signature".to_string()),
        },
    }
}

/// Parses a whole-molecule signature into `(count, tree)` entries. The empty
/// string is the signature of the empty molecule and parses to no entries.
pub fn parse_molecule_signature(input: &str) -> Result<Vec<(usize, SigTree)>, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    match all_consuming(separated_list1(char('.'), parse_entry))(trimmed) {
        Ok((_, entries)) => Ok(entries),
        Err(e) => match e {
            nom::Err::Error(e) | nom::Err::Failure(e) => Err(convert_error(input, e)),
            nom::Err::Incomplete(_) => Err("incomplete signature".to_string()),
        },
    }
}
