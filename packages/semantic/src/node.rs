//! The resolved L-src semantic tree.
//!
//! This is the external contract the transformer consumes (§3, §6): a
//! front-end not implemented here parses, binds and type-checks L-src and
//! hands back a tree in this shape, with a `Symbol` (see [`crate::symbol`])
//! and a [`crate::types::TypeRef`] attached to every expression and
//! declaration. The transformer never constructs or mutates these nodes —
//! it only reads them while building the output AST.

use crate::span::ParseSourceSpan;
use crate::symbol::Symbol;
use crate::types::{ConstantValue, TypeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BinaryOp {
    Add, Sub, Mul, Div, Mod,
    Eq, NotEq, Lt, Gt, Le, Ge,
    And, Or,
    BitAnd, BitOr, BitXor, Shl, Shr,
    NullCoalesce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum UnaryOp {
    Neg, Plus, Not, BitNot, PreInc, PreDec, PostInc, PostDec,
}

/// A single interpolated-string segment: either literal text or a `{expr}`
/// hole (§4.D "String interpolation").
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum InterpolationPart {
    Text(String),
    Hole(Box<Expr>),
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ExprNode<T> {
    pub kind: T,
    pub ty: TypeRef,
    /// Resolved symbol for identifier/member/invocation expressions;
    /// `None` for pure literals and compound expressions with no symbol of
    /// their own.
    pub symbol: Option<Symbol>,
    pub span: ParseSourceSpan,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum ExprKind {
    /// A bare identifier reference: local, parameter, or `this`.
    Identifier(String),
    This,
    Base,
    Literal(Literal),
    Binary { op: BinaryOp, left: Box<Expr>, right: Box<Expr> },
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// `receiver.member` or `receiver.Method(args)`; `is_invocation`
    /// distinguishes reads from calls, since both resolve through the same
    /// member symbol.
    MemberAccess {
        receiver: Box<Expr>,
        member: String,
        is_invocation: bool,
        arguments: Vec<Expr>,
    },
    /// `a?.b` / `a?.Method()` — one link of a conditional-access chain.
    ConditionalMemberAccess {
        receiver: Box<Expr>,
        member: String,
        is_invocation: bool,
        arguments: Vec<Expr>,
    },
    Invocation { callee: Box<Expr>, arguments: Vec<Expr> },
    /// `new T(args)` or `new T { initializers }`.
    ObjectCreation {
        ty: TypeRef,
        constructor: Option<Symbol>,
        arguments: Vec<Expr>,
        initializer: Vec<InitializerEntry>,
    },
    /// Array/collection initializer shorthand: `new[] { a, b }`.
    ArrayCreation { element_type: TypeRef, rank_sizes: Vec<Option<Expr>>, elements: Vec<Expr> },
    TupleLiteral(Vec<Expr>),
    Conditional { condition: Box<Expr>, when_true: Box<Expr>, when_false: Box<Expr> },
    Assign { target: Box<Expr>, value: Box<Expr> },
    CompoundAssign { op: BinaryOp, target: Box<Expr>, value: Box<Expr> },
    Lambda { parameters: Vec<String>, body: LambdaBody },
    StringInterpolation(Vec<InterpolationPart>),
    TypeOf(TypeRef),
    SizeOf(TypeRef),
    Default(TypeRef),
    Cast { target_type: TypeRef, operand: Box<Expr> },
    /// `subject is T pattern`, optionally binding `pattern`.
    IsPattern { subject: Box<Expr>, target_type: TypeRef, binding: Option<String> },
    Parenthesized(Box<Expr>),
}

pub type Expr = ExprNode<ExprKind>;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum LambdaBody {
    Expr(Box<Expr>),
    Block(Block),
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum InitializerEntry {
    /// `{ X = v }` — field/property assignment.
    Member { name: String, value: Expr },
    /// `{ [k] = v }` — indexer assignment.
    Index { index: Expr, value: Expr },
    /// `{ v }` — collection-initializer `Add` call.
    Element(Expr),
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum Literal {
    Null,
    Bool(bool),
    Char(char),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Verbatim(String),
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub span: ParseSourceSpan,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CatchClause {
    pub exception_type: Option<TypeRef>,
    pub binding: Option<String>,
    pub filter: Option<Expr>,
    pub body: Block,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SwitchSection {
    /// `None` marks the `default:` section.
    pub labels: Vec<Option<ConstantValue>>,
    pub body: Vec<Stmt>,
    /// Explicit `goto case X;` / `goto default;` targets at the end of
    /// this section, if control falls through rather than breaking.
    pub goto_case: Option<GotoCaseTarget>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum GotoCaseTarget {
    Case(ConstantValue),
    Default,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum StmtKind {
    Expr(Expr),
    LocalDecl {
        names: Vec<String>,
        ty: TypeRef,
        /// Multiple names with one initializer models a deconstructing
        /// declaration, e.g. `var (a, b) = t;`.
        initializer: Option<Expr>,
    },
    If { condition: Expr, then_branch: Block, else_branch: Option<Box<Stmt>> },
    While { condition: Expr, body: Block },
    DoWhile { condition: Expr, body: Block },
    For { init: Vec<Stmt>, condition: Option<Expr>, step: Vec<Expr>, body: Block },
    Foreach { variable: String, variable_type: TypeRef, source: Expr, body: Block },
    Block(Block),
    Break,
    Continue,
    Return(Option<Expr>),
    Throw(Option<Expr>),
    Try { body: Block, catches: Vec<CatchClause>, finally: Option<Block> },
    Using { resources: Vec<Stmt>, body: Block },
    Lock { guard: Expr, body: Block },
    Unsafe(Block),
    Fixed { declaration: Box<Stmt>, body: Block },
    Switch { subject: Expr, sections: Vec<SwitchSection> },
    Goto(String),
    Labeled { label: String, statement: Box<Stmt> },
    LocalFunction { symbol: Symbol, parameters: Vec<crate::symbol::ParameterInfo>, body: Block },
    Empty,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: ParseSourceSpan,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MethodDecl {
    pub symbol: Symbol,
    pub body: Option<Block>,
    /// Explicit `: base(args)` / `: this(args)` constructor initializer;
    /// `None` on a constructor means the implicit base call applies.
    pub initializer: Option<ConstructorInitializer>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ConstructorInitializer {
    pub target: ConstructorInitializerTarget,
    pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ConstructorInitializerTarget {
    Base,
    This,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum PropertyAccessor {
    /// No explicit get/set bodies: compiles to a plain field (§4.F).
    FieldLike,
    Accessors { getter: Option<Block>, setter: Option<Block> },
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PropertyDecl {
    pub symbol: Symbol,
    pub accessor: PropertyAccessor,
    /// `@CSharpLua.NoField` forces accessor emission even when the shape
    /// would otherwise qualify as field-like.
    pub no_field_attribute: bool,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EventDecl {
    pub symbol: Symbol,
    pub accessor: PropertyAccessor,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FieldDecl {
    pub symbol: Symbol,
    pub initializer: Option<Expr>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TypeDecl {
    pub symbol: Symbol,
    pub type_parameters: Vec<String>,
    pub base_type: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
    pub constructors: Vec<MethodDecl>,
    pub static_constructor: Option<MethodDecl>,
    pub properties: Vec<PropertyDecl>,
    pub events: Vec<EventDecl>,
    pub nested_types: Vec<TypeDecl>,
    /// `@CSharpLua.Ignore` — excluded entirely from the emitted output.
    pub ignored: bool,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CompilationUnit {
    pub source_file: crate::span::ParseSourceFile,
    pub namespace: Option<String>,
    pub types: Vec<TypeDecl>,
}
