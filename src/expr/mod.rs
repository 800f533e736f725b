//! The expression language gating prompt visibility and file inclusion.
//!
//! Deliberately minimal: bare variable references, membership tests over
//! multi-choice answers, string equality against a literal, and
//! `&&`/`||` chains with explicit grouping. No negation, no arithmetic.
//! Expressions are parsed and name-checked once at manifest load;
//! evaluation is total and pure — a well-formed expression can always be
//! reduced to a boolean against any answer set.

mod parser;

pub use parser::ParseError;

use crate::answers::Answers;

/// Parsed expression tree.
///
/// `And`/`Or` hold whole chains (`a && b && c`) rather than binary pairs;
/// the parser rejects mixed chains, so precedence never arises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Bare reference to a prompt's answer, reduced by truthiness.
    Var(String),
    /// True iff `member` appears in the list answer named `set`.
    MemberOf { set: String, member: String },
    /// True iff the answer named `var` resolves to exactly `literal`.
    Equals { var: String, literal: String },
    And(Vec<Expr>),
    Or(Vec<Expr>),
}

impl Expr {
    /// Parse an expression from its manifest source text. The caller
    /// (the manifest loader) wraps syntax errors with the offending
    /// rule or prompt before surfacing them.
    pub fn parse(input: &str) -> Result<Expr, ParseError> {
        parser::parse(input)
    }

    /// Evaluate against a (possibly partial) answer set.
    ///
    /// Answers absent from `answers` — for example a prompt skipped
    /// because its own visibility was false — evaluate as falsy, and any
    /// positive test against them fails. Unknown names never reach this
    /// point: they are rejected when the manifest loads.
    pub fn evaluate(&self, answers: &Answers) -> bool {
        match self {
            Expr::Var(name) => answers.truthy(name),
            Expr::MemberOf { set, member } => answers.member_of(set, member),
            Expr::Equals { var, literal } => {
                answers.get(var).and_then(|v| v.as_text()) == Some(literal.as_str())
            }
            Expr::And(parts) => parts.iter().all(|p| p.evaluate(answers)),
            Expr::Or(parts) => parts.iter().any(|p| p.evaluate(answers)),
        }
    }

    /// Every prompt name the expression references, in source order.
    /// Used by the loader to reject unknown and forward references.
    pub fn names(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_names(&mut out);
        out
    }

    fn collect_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Var(name) => out.push(name),
            Expr::MemberOf { set, .. } => out.push(set),
            Expr::Equals { var, .. } => out.push(var),
            Expr::And(parts) | Expr::Or(parts) => {
                for part in parts {
                    part.collect_names(out);
                }
            }
        }
    }
}
