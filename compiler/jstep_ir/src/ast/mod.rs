//! Statement and expression tree.
//!
//! The parser splits the source into *units* (one per statement, block header
//! or closing brace) and classifies each one into a [`Stmt`]. Block structure
//! is not nested in the tree: headers and [`Stmt::BlockEnd`] are separate
//! units linked by the parser's block index, which is what lets the evaluator
//! step through them one at a time.

mod operators;

use std::fmt;

pub use operators::{BinaryOp, DeclKind, IncDecOp, LogicalOp, UnaryOp};

/// Expression tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Str(String),
    Template(Vec<TemplateSegment>),
    Bool(bool),
    Null,
    Undefined,
    Ident(String),
    Array(Vec<ListItem>),
    /// Object literal; keys in source order.
    Object(Vec<(String, Expr)>),
    Member {
        object: Box<Expr>,
        property: String,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<ListItem>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
}

impl Expr {
    /// Convert an lvalue-shaped expression into a [`Place`].
    ///
    /// Returns `None` unless the expression is an identifier followed by any
    /// chain of `.name` / `[index]` accesses.
    pub fn as_place(&self) -> Option<Place> {
        match self {
            Expr::Ident(name) => Some(Place::Var(name.clone())),
            Expr::Member { object, property } => Some(Place::Member {
                object: Box::new(object.as_place()?),
                property: property.clone(),
            }),
            Expr::Index { object, index } => Some(Place::Index {
                object: Box::new(object.as_place()?),
                index: index.clone(),
            }),
            _ => None,
        }
    }
}

/// Element of an array literal or argument list.
#[derive(Clone, Debug, PartialEq)]
pub enum ListItem {
    Item(Expr),
    Spread(Expr),
}

/// Piece of a template literal.
#[derive(Clone, Debug, PartialEq)]
pub enum TemplateSegment {
    Text(String),
    Interpolation(Expr),
}

/// Assignable location: a variable with an optional access path.
#[derive(Clone, Debug, PartialEq)]
pub enum Place {
    Var(String),
    Member {
        object: Box<Place>,
        property: String,
    },
    Index {
        object: Box<Place>,
        index: Box<Expr>,
    },
}

impl Place {
    /// The variable this place is rooted at.
    pub fn root(&self) -> &str {
        match self {
            Place::Var(name) => name,
            Place::Member { object, .. } | Place::Index { object, .. } => object.root(),
        }
    }
}

/// Left side of a declarator.
#[derive(Clone, Debug, PartialEq)]
pub enum Binding {
    Name(String),
    /// `[a, , b]`; holes are `None`.
    Array(Vec<Option<String>>),
}

impl Binding {
    /// Declared names in source order.
    pub fn names(&self) -> Vec<&str> {
        match self {
            Binding::Name(name) => vec![name.as_str()],
            Binding::Array(names) => names.iter().flatten().map(String::as_str).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Declarator {
    pub binding: Binding,
    pub init: Option<Expr>,
}

/// Element of a destructuring assignment target (`[a, b[i]] = ...`).
#[derive(Clone, Debug, PartialEq)]
pub enum AssignTarget {
    Place(Place),
    Hole,
}

/// One classified unit.
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Declaration {
        kind: DeclKind,
        declarators: Vec<Declarator>,
    },
    Assign {
        target: Place,
        value: Expr,
    },
    CompoundAssign {
        target: Place,
        op: BinaryOp,
        value: Expr,
    },
    IncDec {
        target: Place,
        op: IncDecOp,
        prefix: bool,
    },
    /// `[a, b] = [b, a]`, including the element-swap form.
    Destructure {
        targets: Vec<AssignTarget>,
        value: Expr,
    },
    ForHeader {
        init: Option<Box<Stmt>>,
        condition: Option<Expr>,
        update: Option<Box<Stmt>>,
    },
    WhileHeader {
        condition: Expr,
    },
    IfHeader {
        condition: Expr,
    },
    /// `else` or `else if (condition)`.
    Else {
        condition: Option<Expr>,
    },
    FunctionDecl {
        name: String,
        params: Vec<String>,
    },
    Return(Option<Expr>),
    Break,
    Continue,
    /// Expression statement, usually a call.
    Expr(Expr),
    BlockEnd,
}

impl Stmt {
    /// Whether this unit opens a block closed by a later [`Stmt::BlockEnd`].
    pub fn opens_block(&self) -> bool {
        matches!(
            self,
            Stmt::ForHeader { .. }
                | Stmt::WhileHeader { .. }
                | Stmt::IfHeader { .. }
                | Stmt::Else { .. }
                | Stmt::FunctionDecl { .. }
        )
    }
}

// Display renders a compact JavaScript-like form, used in diagnostics and by
// the CLI's `parse` command.

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{n}"),
            Expr::Str(s) => write!(f, "{s:?}"),
            Expr::Template(parts) => {
                f.write_str("`")?;
                for part in parts {
                    match part {
                        TemplateSegment::Text(text) => f.write_str(text)?,
                        TemplateSegment::Interpolation(expr) => write!(f, "${{{expr}}}")?,
                    }
                }
                f.write_str("`")
            }
            Expr::Bool(b) => write!(f, "{b}"),
            Expr::Null => f.write_str("null"),
            Expr::Undefined => f.write_str("undefined"),
            Expr::Ident(name) => f.write_str(name),
            Expr::Array(items) => {
                f.write_str("[")?;
                write_list(f, items)?;
                f.write_str("]")
            }
            Expr::Object(fields) => {
                f.write_str("{")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Expr::Member { object, property } => write!(f, "{object}.{property}"),
            Expr::Index { object, index } => write!(f, "{object}[{index}]"),
            Expr::Call { callee, args } => {
                write!(f, "{callee}(")?;
                write_list(f, args)?;
                f.write_str(")")
            }
            Expr::Unary { op, operand } => write!(f, "{}{operand}", op.as_symbol()),
            Expr::Binary { op, left, right } => {
                write!(f, "({left} {} {right})", op.as_symbol())
            }
            Expr::Logical { op, left, right } => {
                write!(f, "({left} {} {right})", op.as_symbol())
            }
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => write!(f, "({test} ? {consequent} : {alternate})"),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[ListItem]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        match item {
            ListItem::Item(expr) => write!(f, "{expr}")?,
            ListItem::Spread(expr) => write!(f, "...{expr}")?,
        }
    }
    Ok(())
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Place::Var(name) => f.write_str(name),
            Place::Member { object, property } => write!(f, "{object}.{property}"),
            Place::Index { object, index } => write!(f, "{object}[{index}]"),
        }
    }
}

#[cfg(test)]
mod tests;
