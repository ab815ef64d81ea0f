//! Operator precedence and parenthesization
//!
//! Every value-producing rule reports the `Order` its code binds at, and
//! every caller substituting a child into a larger expression says which
//! `Order` the slot requires. Lower ranks bind tighter.
//!
//! Ranks are stored multiplied by ten so that sub-ranks such as MEMBER (2.1)
//! and FUNCTION_CALL (2.2) stay integral. The *class* of an order is its
//! whole-number part; wrapping decisions compare classes, and the override
//! table lists exact pairs that are safe to leave bare.

use std::collections::HashSet;
use std::fmt;

/// Precedence rank of an expression or of an expression slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Order(u16);

impl Order {
    /// `0`, `""`, `NA`, identifiers
    pub const ATOMIC: Order = Order(0);
    /// `list(...)`, vectors
    pub const COLLECTION: Order = Order(10);
    pub const STRING_CONVERSION: Order = Order(10);
    /// `x$y`, `x[[i]]`
    pub const MEMBER: Order = Order(21);
    /// `f(x)`
    pub const FUNCTION_CALL: Order = Order(22);
    /// `**`
    pub const EXPONENTIATION: Order = Order(30);
    /// unary `+` and `-`
    pub const UNARY_SIGN: Order = Order(40);
    pub const BITWISE_NOT: Order = Order(40);
    /// class of `* / %%`
    pub const MULTIPLICATIVE: Order = Order(50);
    pub const MULTIPLICATION: Order = Order(51);
    pub const DIVISION: Order = Order(52);
    pub const MODULUS: Order = Order(53);
    /// class of `+ -`
    pub const ADDITIVE: Order = Order(60);
    pub const SUBTRACTION: Order = Order(61);
    pub const ADDITION: Order = Order(62);
    pub const BITWISE_SHIFT: Order = Order(70);
    pub const BITWISE_AND: Order = Order(80);
    pub const BITWISE_XOR: Order = Order(90);
    pub const BITWISE_OR: Order = Order(100);
    /// `%in% < <= > >= != ==`
    pub const RELATIONAL: Order = Order(110);
    pub const LOGICAL_NOT: Order = Order(120);
    pub const LOGICAL_AND: Order = Order(130);
    pub const LOGICAL_OR: Order = Order(140);
    /// `if (c) a else b`
    pub const CONDITIONAL: Order = Order(150);
    /// No constraint: the slot is already delimited (argument list, condition)
    pub const NONE: Order = Order(990);

    /// Whole-number precedence class
    pub const fn class(self) -> u16 {
        self.0 / 10
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 % 10 {
            0 => write!(f, "{}", self.0 / 10),
            sub => write!(f, "{}.{}", self.0 / 10, sub),
        }
    }
}

/// Code for one value-producing block together with the order it binds at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    pub code: String,
    pub order: Order,
}

impl Expr {
    pub fn new(code: impl Into<String>, order: Order) -> Self {
        Self {
            code: code.into(),
            order,
        }
    }
}

/// Override table plus the wrapping decision
#[derive(Debug, Clone, Default)]
pub struct PrecedenceTable {
    overrides: HashSet<(Order, Order)>,
}

impl PrecedenceTable {
    /// Table with the given `(outer, inner)` pairs that never need grouping
    pub fn new(overrides: impl IntoIterator<Item = (Order, Order)>) -> Self {
        Self {
            overrides: overrides.into_iter().collect(),
        }
    }

    /// Overrides for R
    pub fn r() -> Self {
        Self::new([
            // (foo()).bar() -> foo().bar()
            // (foo())[0] -> foo()[0]
            (Order::MEMBER, Order::FUNCTION_CALL),
            // (foo[[1]])[[2]] -> foo[[1]][[2]]
            (Order::MEMBER, Order::MEMBER),
            // !(!foo) -> !!foo
            (Order::LOGICAL_NOT, Order::LOGICAL_NOT),
            // a * (b * c) -> a * b * c
            (Order::MULTIPLICATION, Order::MULTIPLICATION),
            // a + (b + c) -> a + b + c
            (Order::ADDITION, Order::ADDITION),
            // a && (b && c) -> a && b && c
            (Order::LOGICAL_AND, Order::LOGICAL_AND),
            // a || (b || c) -> a || b || c
            (Order::LOGICAL_OR, Order::LOGICAL_OR),
        ])
    }

    pub fn is_override(&self, outer: Order, inner: Order) -> bool {
        self.overrides.contains(&(outer, inner))
    }

    pub fn overrides(&self) -> impl Iterator<Item = &(Order, Order)> {
        self.overrides.iter()
    }

    /// Whether `inner` code must be grouped when placed in an `outer` slot
    pub fn needs_parens(&self, outer: Order, inner: Order) -> bool {
        let (outer_class, inner_class) = (outer.class(), inner.class());
        if outer_class > inner_class {
            return false;
        }
        if outer_class == inner_class
            && (outer_class == Order::ATOMIC.class() || outer_class == Order::NONE.class())
        {
            return false;
        }
        !self.is_override(outer, inner)
    }

    /// Final text of `expr` when substituted into an `outer` slot
    pub fn parenthesize(&self, outer: Order, expr: Expr) -> String {
        if self.needs_parens(outer, expr.order) {
            format!("({})", expr.code)
        } else {
            expr.code
        }
    }
}
