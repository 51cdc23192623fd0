//! The combined expression/statement/declaration transformer (§4.D/E/F).
//!
//! D/E/F share one visitor walking the semantic tree once; this module
//! owns the shared [`TransformContext`] (§4.E "State machines": function
//! stack, block stack, conditional-temp stack, method-info stack) and the
//! top-level entry points. `expr`/`stmt`/`decl` hold the per-construct
//! lowering rules.
//!
//! Stack discipline is expressed with `with_*_scope` helpers rather than a
//! `Drop`-guard struct: each helper pushes, invokes its closure, then pops
//! unconditionally before returning the closure's result, so a `?`-borne
//! error from inside the closure still unwinds through a clean pop at
//! every nesting level (§9 "stack-based traversal state... RAII-style...
//! scopes ensuring every push has a matching pop").

pub mod decl;
pub mod expr;
pub mod stmt;

use crate::config::EmitConfig;
use crate::logging::Logger;
use crate::naming::NamingService;
use semantic::{MetadataOracle, Symbol, SymbolOracle};

#[derive(Default)]
pub struct FunctionFrame {
    /// Locals synthesized by adapter expressions (try/using/constructor)
    /// that belong in this function's top-level scope rather than the
    /// innermost block (e.g. the `local ok, v` pair around a `System.try`
    /// call nested inside an `if`).
    pub hoisted_locals: Vec<String>,
}

#[derive(Default)]
pub struct BlockFrame {
    /// Statements the transformer inserts ahead of the statement currently
    /// being lowered (temporaries, guard `if`s).
    pub prelude: Vec<crate::output::ast::Stmt>,
}

pub struct MethodInfo {
    pub symbol: Symbol,
    pub ref_out_params: Vec<String>,
    pub has_return: bool,
}

pub struct TransformContext<'a> {
    pub config: &'a EmitConfig,
    pub logger: &'a dyn Logger,
    pub symbols: &'a dyn SymbolOracle,
    pub metadata: &'a dyn MetadataOracle,
    pub naming: NamingService,
    function_stack: Vec<FunctionFrame>,
    block_stack: Vec<BlockFrame>,
    conditional_temp_stack: Vec<String>,
    method_info_stack: Vec<MethodInfo>,
    /// Whether the innermost try/using body being lowered right now needs
    /// its `return`s rewritten to carry the `(true, value)` handled-marker
    /// pair (§4.E "Try/catch/finally", §8 "Return propagation"). Pushed
    /// `false` on entry to any nested lambda/local-function body so an
    /// inner closure's own returns are never rewritten.
    return_wrap_stack: Vec<bool>,
    /// The bound exception-local name of the innermost catch clause, for
    /// lowering a bare `throw;` rethrow (§4.E "throw expr").
    catch_var_stack: Vec<String>,
    /// Whether the innermost loop being lowered uses the `__continue__`
    /// flag convention (§4.E "continue"); `Break`/`Continue` statements
    /// consult the top of this stack to decide how to lower.
    loop_continue_stack: Vec<bool>,
    temp_counter: u32,
}

impl<'a> TransformContext<'a> {
    pub fn new(
        config: &'a EmitConfig,
        logger: &'a dyn Logger,
        symbols: &'a dyn SymbolOracle,
        metadata: &'a dyn MetadataOracle,
    ) -> Self {
        TransformContext {
            config,
            logger,
            symbols,
            metadata,
            naming: NamingService::new(),
            function_stack: Vec::new(),
            block_stack: Vec::new(),
            conditional_temp_stack: Vec::new(),
            method_info_stack: Vec::new(),
            return_wrap_stack: Vec::new(),
            catch_var_stack: Vec::new(),
            loop_continue_stack: Vec::new(),
            temp_counter: 0,
        }
    }

    pub fn fresh_temp(&mut self) -> String {
        self.temp_counter += 1;
        format!("__t{}", self.temp_counter)
    }

    pub fn with_function_scope<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.function_stack.push(FunctionFrame::default());
        let result = f(self);
        self.function_stack.pop();
        result
    }

    pub fn with_block_scope<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.block_stack.push(BlockFrame::default());
        let result = f(self);
        self.block_stack.pop();
        result
    }

    /// Runs `f` with `name` as the active root `?.`-chain temporary (§4.C
    /// "Conditional-temp").
    pub fn with_conditional_temp<R>(&mut self, name: String, f: impl FnOnce(&mut Self) -> R) -> R {
        self.conditional_temp_stack.push(name);
        let result = f(self);
        self.conditional_temp_stack.pop();
        result
    }

    pub fn current_conditional_temp(&self) -> Option<&str> {
        self.conditional_temp_stack.last().map(|s| s.as_str())
    }

    pub fn with_method_info<R>(&mut self, info: MethodInfo, f: impl FnOnce(&mut Self) -> R) -> R {
        self.method_info_stack.push(info);
        let result = f(self);
        self.method_info_stack.pop();
        result
    }

    pub fn current_method(&self) -> Option<&MethodInfo> {
        self.method_info_stack.last()
    }

    pub fn current_function(&mut self) -> &mut FunctionFrame {
        self.function_stack.last_mut().expect("not inside a function scope")
    }

    pub fn current_block(&mut self) -> &mut BlockFrame {
        self.block_stack.last_mut().expect("not inside a block scope")
    }

    pub fn with_return_wrap<R>(&mut self, wraps: bool, f: impl FnOnce(&mut Self) -> R) -> R {
        self.return_wrap_stack.push(wraps);
        let result = f(self);
        self.return_wrap_stack.pop();
        result
    }

    pub fn in_return_wrap(&self) -> bool {
        self.return_wrap_stack.last().copied().unwrap_or(false)
    }

    pub fn with_catch_var<R>(&mut self, name: String, f: impl FnOnce(&mut Self) -> R) -> R {
        self.catch_var_stack.push(name);
        let result = f(self);
        self.catch_var_stack.pop();
        result
    }

    pub fn current_catch_var(&self) -> Option<&str> {
        self.catch_var_stack.last().map(|s| s.as_str())
    }

    pub fn with_loop_continue<R>(&mut self, uses_flag: bool, f: impl FnOnce(&mut Self) -> R) -> R {
        self.loop_continue_stack.push(uses_flag);
        let result = f(self);
        self.loop_continue_stack.pop();
        result
    }

    pub fn loop_uses_continue_flag(&self) -> bool {
        self.loop_continue_stack.last().copied().unwrap_or(false)
    }
}
