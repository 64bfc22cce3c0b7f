//! AST node definitions for tag management and procedure calls
//!
//! Every node that maps onto source text carries a [`Span`] so the executor
//! can point back at the statement when it rejects something.

pub use crate::parser::lexer::Span;

/// A complete extension statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Call(CallStatement),
    ShowTags(ShowTagsStatement),
    CreateOrReplaceTag(CreateOrReplaceTagStatement),
    DeleteTag(DeleteTagStatement),
    RenameTag(RenameTagStatement),
}

impl Statement {
    /// Source span of the whole statement, excluding trailing semicolons
    pub fn span(&self) -> Span {
        match self {
            Statement::Call(s) => s.span,
            Statement::ShowTags(s) => s.span,
            Statement::CreateOrReplaceTag(s) => s.span,
            Statement::DeleteTag(s) => s.span,
            Statement::RenameTag(s) => s.span,
        }
    }

    /// Stable label for the statement form
    pub fn kind_name(&self) -> &'static str {
        match self {
            Statement::Call(_) => "call",
            Statement::ShowTags(_) => "show_tags",
            Statement::CreateOrReplaceTag(_) => "create_or_replace_tag",
            Statement::DeleteTag(_) => "delete_tag",
            Statement::RenameTag(_) => "rename_tag",
        }
    }

    /// The table or procedure name the statement targets
    pub fn target(&self) -> &MultipartIdentifier {
        match self {
            Statement::Call(s) => &s.procedure,
            Statement::ShowTags(s) => &s.table,
            Statement::CreateOrReplaceTag(s) => &s.table,
            Statement::DeleteTag(s) => &s.table,
            Statement::RenameTag(s) => &s.table,
        }
    }
}

/// CALL procedure(args...)
#[derive(Debug, Clone, PartialEq)]
pub struct CallStatement {
    pub procedure: MultipartIdentifier,
    pub args: Vec<CallArgument>,
    pub span: Span,
}

/// SHOW TAGS table
#[derive(Debug, Clone, PartialEq)]
pub struct ShowTagsStatement {
    pub table: MultipartIdentifier,
    pub span: Span,
}

/// ALTER TABLE table [CREATE [OR REPLACE] | REPLACE] TAG ...
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOrReplaceTagStatement {
    pub table: MultipartIdentifier,
    pub clause: TagClause,
    pub span: Span,
}

/// ALTER TABLE table DELETE TAG [IF EXISTS] name
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteTagStatement {
    pub table: MultipartIdentifier,
    pub if_exists: bool,
    pub tag_name: Identifier,
    pub span: Span,
}

/// ALTER TABLE table RENAME TAG from TO to
#[derive(Debug, Clone, PartialEq)]
pub struct RenameTagStatement {
    pub table: MultipartIdentifier,
    pub from: Identifier,
    pub to: Identifier,
    pub span: Span,
}

/// An argument in a CALL argument list
#[derive(Debug, Clone, PartialEq)]
pub enum CallArgument {
    Positional(Expression),
    /// `name => value`
    Named { name: Identifier, value: Expression },
}

impl CallArgument {
    pub fn value(&self) -> &Expression {
        match self {
            CallArgument::Positional(value) | CallArgument::Named { value, .. } => value,
        }
    }

    pub fn name(&self) -> Option<&Identifier> {
        match self {
            CallArgument::Positional(_) => None,
            CallArgument::Named { name, .. } => Some(name),
        }
    }
}

/// The CREATE / REPLACE part of a tag statement
#[derive(Debug, Clone, PartialEq)]
pub enum TagClause {
    /// `CREATE TAG [IF NOT EXISTS] name`
    Create {
        if_not_exists: bool,
        name: Identifier,
        options: TagOptions,
    },
    /// `[CREATE OR] REPLACE TAG name`
    Replace {
        create_if_missing: bool,
        name: Identifier,
        options: TagOptions,
    },
}

impl TagClause {
    pub fn name(&self) -> &Identifier {
        match self {
            TagClause::Create { name, .. } | TagClause::Replace { name, .. } => name,
        }
    }

    pub fn options(&self) -> &TagOptions {
        match self {
            TagClause::Create { options, .. } | TagClause::Replace { options, .. } => options,
        }
    }
}

/// `[AS OF VERSION n] [RETAIN n unit]`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TagOptions {
    pub snapshot_id: Option<Number>,
    pub retain: Option<TimeRetain>,
}

/// `RETAIN amount unit`
#[derive(Debug, Clone, PartialEq)]
pub struct TimeRetain {
    pub amount: Number,
    pub unit: TimeUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Days,
    Hours,
    Minutes,
}

impl TimeUnit {
    pub fn keyword(&self) -> &'static str {
        match self {
            TimeUnit::Days => "DAYS",
            TimeUnit::Hours => "HOURS",
            TimeUnit::Minutes => "MINUTES",
        }
    }
}

/// A call argument value
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Constant(Constant),
    /// `MAP(c1, c2, ...)`
    StringMap { entries: Vec<Constant>, span: Span },
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::Constant(c) => c.span(),
            Expression::StringMap { span, .. } => *span,
        }
    }
}

/// Literal values
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Number(Number),
    Boolean { value: bool, span: Span },
    /// One or more adjacent quoted strings, unescaped and concatenated
    StringLiteral { value: String, span: Span },
    /// Typed literal such as `DATE '2024-01-01'`
    TypeConstructor {
        type_name: Identifier,
        value: String,
        span: Span,
    },
}

impl Constant {
    pub fn span(&self) -> Span {
        match self {
            Constant::Number(n) => n.span,
            Constant::Boolean { span, .. }
            | Constant::StringLiteral { span, .. }
            | Constant::TypeConstructor { span, .. } => *span,
        }
    }
}

/// A numeric literal, classified by its lexical shape only
#[derive(Debug, Clone, PartialEq)]
pub struct Number {
    pub kind: NumberKind,
    /// Literal text as written, suffix included, sign excluded
    pub text: String,
    pub negative: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    Exponent,
    Decimal,
    Integer,
    BigInt,
    SmallInt,
    TinyInt,
    Double,
    Float,
    BigDecimal,
}

/// A single name part
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    /// Name with back-quotes removed and doubled back-ticks collapsed
    pub value: String,
    pub quoted: bool,
    pub span: Span,
}

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

/// Dotted name such as `db.tbl`; never empty
#[derive(Debug, Clone, PartialEq)]
pub struct MultipartIdentifier {
    pub parts: Vec<Identifier>,
    pub span: Span,
}

impl MultipartIdentifier {
    pub fn parts(&self) -> &[Identifier] {
        &self.parts
    }

    pub fn names(&self) -> Vec<&str> {
        self.parts.iter().map(Identifier::as_str).collect()
    }
}
