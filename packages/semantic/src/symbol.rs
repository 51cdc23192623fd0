//! Symbol model attached to every expression/declaration/member-reference
//! node in the resolved semantic tree (§3: "For every node the transformer
//! needs... an attached symbol").
//!
//! The teacher's `ts::type_checker` hand-rolls flag constants on a newtype
//! wrapping `u32` (`TypeFlags`, `SymbolFlags`). We use the `bitflags!` macro
//! instead, which is the crate already in the workspace dependency set and
//! the more idiomatic way to express the same thing.

use crate::types::TypeRef;
use bitflags::bitflags;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SymbolKind {
    Method,
    Property,
    Event,
    Field,
    Parameter,
    Local,
    Type,
    Namespace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Accessibility {
    Public,
    Protected,
    Internal,
    ProtectedInternal,
    PrivateProtected,
    Private,
}

bitflags! {
    /// `ref`/`out`/`params`/default-value modifiers on a single parameter.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    pub struct ParameterModifier: u8 {
        const NONE   = 0;
        const REF    = 1 << 0;
        const OUT    = 1 << 1;
        const PARAMS = 1 << 2;
        const THIS   = 1 << 3; // extension-method receiver
    }
}

bitflags! {
    /// Flags distinguishing the various special roles a method symbol can
    /// play, per §3: "whether it is an extension, constructor, operator,
    /// explicit-interface implementation, or main entry point."
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    pub struct MethodFlags: u16 {
        const NONE                      = 0;
        const EXTENSION                 = 1 << 0;
        const CONSTRUCTOR                = 1 << 1;
        const STATIC_CONSTRUCTOR         = 1 << 2;
        const OPERATOR                  = 1 << 3;
        const EXPLICIT_INTERFACE_IMPL   = 1 << 4;
        const MAIN_ENTRY_POINT          = 1 << 5;
        const OVERRIDE                  = 1 << 6;
        const ABSTRACT                  = 1 << 7;
        const VIRTUAL                   = 1 << 8;
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ParameterInfo {
    pub name: String,
    pub ty: TypeRef,
    pub modifier: ParameterModifier,
    pub default_value: Option<crate::types::ConstantValue>,
}

impl ParameterInfo {
    pub fn is_ref(&self) -> bool {
        self.modifier.contains(ParameterModifier::REF)
    }

    pub fn is_out(&self) -> bool {
        self.modifier.contains(ParameterModifier::OUT)
    }

    pub fn is_params(&self) -> bool {
        self.modifier.contains(ParameterModifier::PARAMS)
    }

    pub fn has_default(&self) -> bool {
        self.default_value.is_some()
    }
}

/// The operator overload kind, when `MethodFlags::OPERATOR` is set. Used to
/// derive the stable runtime method name (`op_Addition`, ...) per §4.F.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum OperatorKind {
    Addition,
    Subtraction,
    Multiply,
    Division,
    Modulus,
    UnaryNegation,
    UnaryPlus,
    LogicalNot,
    OnesComplement,
    Equality,
    Inequality,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
    Implicit,
    Explicit,
    BitwiseAnd,
    BitwiseOr,
    ExclusiveOr,
    LeftShift,
    RightShift,
}

impl OperatorKind {
    /// The runtime-fixed method name the declaration transformer emits.
    pub fn runtime_name(self) -> &'static str {
        match self {
            OperatorKind::Addition => "op_Addition",
            OperatorKind::Subtraction => "op_Subtraction",
            OperatorKind::Multiply => "op_Multiply",
            OperatorKind::Division => "op_Division",
            OperatorKind::Modulus => "op_Modulus",
            OperatorKind::UnaryNegation => "op_UnaryNegation",
            OperatorKind::UnaryPlus => "op_UnaryPlus",
            OperatorKind::LogicalNot => "op_LogicalNot",
            OperatorKind::OnesComplement => "op_OnesComplement",
            OperatorKind::Equality => "op_Equality",
            OperatorKind::Inequality => "op_Inequality",
            OperatorKind::LessThan => "op_LessThan",
            OperatorKind::GreaterThan => "op_GreaterThan",
            OperatorKind::LessThanOrEqual => "op_LessThanOrEqual",
            OperatorKind::GreaterThanOrEqual => "op_GreaterThanOrEqual",
            OperatorKind::Implicit => "op_Implicit",
            OperatorKind::Explicit => "op_Explicit",
            OperatorKind::BitwiseAnd => "op_BitwiseAnd",
            OperatorKind::BitwiseOr => "op_BitwiseOr",
            OperatorKind::ExclusiveOr => "op_ExclusiveOr",
            OperatorKind::LeftShift => "op_LeftShift",
            OperatorKind::RightShift => "op_RightShift",
        }
    }
}

/// The symbol attached to a node: "kind, containing type, accessibility,
/// static-ness, override chain, parameter list ..., type arguments, whether
/// it originated in user code or in a referenced binary" (§3).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub containing_type: Option<TypeRef>,
    pub accessibility: Accessibility,
    pub is_static: bool,
    /// The symbol this one overrides, if any (walking toward the root
    /// declares the override chain).
    pub overrides: Option<Box<Symbol>>,
    pub parameters: Vec<ParameterInfo>,
    pub type_arguments: Vec<TypeRef>,
    pub is_from_metadata: bool,
    pub method_flags: MethodFlags,
    pub operator_kind: Option<OperatorKind>,
    /// 1-based overload index among sibling constructors/methods of the
    /// same name, fixed by the front-end's overload resolution.
    pub overload_index: Option<u32>,
}

impl Symbol {
    pub fn is_constructor(&self) -> bool {
        self.method_flags.contains(MethodFlags::CONSTRUCTOR)
    }

    pub fn is_static_constructor(&self) -> bool {
        self.method_flags.contains(MethodFlags::STATIC_CONSTRUCTOR)
    }

    pub fn is_extension(&self) -> bool {
        self.method_flags.contains(MethodFlags::EXTENSION)
    }

    pub fn is_operator(&self) -> bool {
        self.method_flags.contains(MethodFlags::OPERATOR)
    }

    pub fn is_main_entry_point(&self) -> bool {
        self.method_flags.contains(MethodFlags::MAIN_ENTRY_POINT)
    }

    pub fn is_explicit_interface_impl(&self) -> bool {
        self.method_flags.contains(MethodFlags::EXPLICIT_INTERFACE_IMPL)
    }
}
