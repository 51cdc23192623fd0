//! The L-dst renderer (§4.B): a single-pass, indent-aware pretty-printer.
//!
//! Grounded on the shape of the teacher's `abstract_emitter.rs`
//! (`EmitterVisitorContext`: a line buffer plus an indent counter, `print`/
//! `println`/`inc_indent`/`dec_indent`/`to_source`), generalized from JS
//! token emission to Lua token emission and from the teacher's
//! `BINARY_OPERATORS` lookup table to [`crate::output::reserved`].
//!
//! Rendering is pure: the same `Module`/`Block` and the same `EmitConfig`
//! always produce byte-identical text (§4.B, §8 property 1). The renderer
//! never invents or rewrites identifiers — every name it prints already
//! passed through the naming service.

use crate::config::EmitConfig;
use crate::output::ast::*;
use crate::output::reserved::{binary_op_token, classic_runtime_call, unary_op_token};

/// One rendered line: indent level plus accumulated text parts. Kept
/// separate from a flat string (as the teacher's `EmittedLine` is) so
/// blank-line coalescing and indent computation stay simple.
struct Line {
    indent: usize,
    parts: Vec<String>,
}

pub struct Renderer<'a> {
    config: &'a EmitConfig,
    lines: Vec<Line>,
    indent: usize,
}

impl<'a> Renderer<'a> {
    pub fn new(config: &'a EmitConfig) -> Self {
        Renderer {
            config,
            lines: vec![Line { indent: 0, parts: Vec::new() }],
            indent: 0,
        }
    }

    pub fn render_module(config: &EmitConfig, module: &Module) -> String {
        let mut r = Renderer::new(config);
        for decl in &module.declarations {
            r.render_decl(decl);
        }
        for stmt in &module.top_level {
            r.render_stmt(stmt);
        }
        r.finish()
    }

    fn finish(mut self) -> String {
        if self.current_line_is_empty() {
            self.lines.pop();
        }
        let indent_unit = " ".repeat(self.config.indent_width);
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&indent_unit.repeat(line.indent));
            out.push_str(&line.parts.join(""));
            out.push('\n');
        }
        out
    }

    fn current_line_is_empty(&self) -> bool {
        self.lines.last().map(|l| l.parts.is_empty()).unwrap_or(true)
    }

    fn write(&mut self, text: &str) {
        self.lines.last_mut().unwrap().parts.push(text.to_string());
    }

    fn newline(&mut self) {
        self.lines.push(Line { indent: self.indent, parts: Vec::new() });
    }

    fn inc_indent(&mut self) {
        self.indent += 1;
    }

    fn dec_indent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    fn semi(&mut self) {
        if self.config.semicolons {
            self.write(";");
        }
    }

    // --- Declarations ---

    fn render_decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Type(ty) => self.render_type_declaration(ty),
            Decl::LocalFunction { name, parameters, body } => {
                self.write("local function ");
                self.write(name);
                self.write("(");
                self.write(&parameters.join(", "));
                self.write(")");
                self.newline();
                self.inc_indent();
                self.render_block(body);
                self.dec_indent();
                self.write("end");
                self.newline();
            }
        }
    }

    fn render_type_declaration(&mut self, ty: &TypeDeclaration) {
        self.write(&format!("-- type {}", ty.name));
        self.newline();
        self.write(&format!("System.define(\"{}\", function()", ty.name));
        self.newline();
        self.inc_indent();
        self.write("return {");
        self.newline();
        self.inc_indent();
        if let Some(base) = &ty.base_type {
            self.write(&format!("base = {},", base));
            self.newline();
        }
        if !ty.interfaces.is_empty() {
            self.write(&format!("interfaces = {{{}}},", ty.interfaces.join(", ")));
            self.newline();
        }
        if let Some(cctor) = &ty.static_constructor {
            self.write("__cctor__ = function()");
            self.newline();
            self.inc_indent();
            self.render_block(cctor);
            self.dec_indent();
            self.write("end,");
            self.newline();
        }
        if !ty.constructors.is_empty() {
            self.write("__ctor__ = ");
            if ty.constructors.len() == 1 {
                self.render_ctor_value(&ty.constructors[0]);
            } else {
                self.write("{");
                self.newline();
                self.inc_indent();
                for ctor in &ty.constructors {
                    self.render_ctor_value(ctor);
                    self.write(",");
                    self.newline();
                }
                self.dec_indent();
                self.write("}");
            }
            self.write(",");
            self.newline();
        }
        for field in &ty.fields {
            self.write(&field.name);
            self.write(" = ");
            match &field.initializer {
                Some(e) => self.render_expr(e),
                None => self.write("nil"),
            }
            self.write(",");
            self.newline();
        }
        for method in &ty.methods {
            self.write(&method.name);
            self.write(" = function(");
            self.write(&method.parameters.join(", "));
            self.write(")");
            self.newline();
            self.inc_indent();
            self.render_block(&method.body);
            self.dec_indent();
            self.write("end,");
            self.newline();
        }
        for prop in ty.properties.iter().chain(ty.events.iter()) {
            if let Some(getter) = &prop.getter {
                self.write(&format!("get_{} = function(this)", prop.name));
                self.newline();
                self.inc_indent();
                self.render_block(getter);
                self.dec_indent();
                self.write("end,");
                self.newline();
            }
            if let Some(setter) = &prop.setter {
                self.write(&format!("set_{} = function(this, value)", prop.name));
                self.newline();
                self.inc_indent();
                self.render_block(setter);
                self.dec_indent();
                self.write("end,");
                self.newline();
            }
        }
        self.dec_indent();
        self.write("}");
        self.newline();
        self.dec_indent();
        self.write("end)");
        self.newline();
        for nested in &ty.nested_types {
            self.render_type_declaration(nested);
        }
    }

    fn render_ctor_value(&mut self, ctor: &Stmt) {
        match ctor {
            Stmt::ConstructorAdapter { parameters, base_call, body, .. } => {
                self.write("function(");
                self.write(&parameters.join(", "));
                self.write(")");
                self.newline();
                self.inc_indent();
                if let Some(base) = base_call {
                    self.render_expr(base);
                    self.semi();
                    self.newline();
                }
                self.render_block(body);
                self.dec_indent();
                self.write("end");
            }
            other => self.render_stmt(other),
        }
    }

    // --- Statements ---

    fn render_block(&mut self, block: &Block) {
        for stmt in &block.statements {
            self.render_stmt(stmt);
        }
    }

    fn render_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::ExprStmt(e) => {
                self.render_expr(e);
                self.semi();
                self.newline();
            }
            Stmt::Assignment { targets, values } => {
                if let [Expr::PropertyAdapter { receiver, name, field_like: false }] = targets.as_slice() {
                    self.render_expr(receiver);
                    self.write(&format!(":set_{}(", name));
                    self.render_expr_list(values);
                    self.write(")");
                    self.semi();
                    self.newline();
                    return;
                }
                self.render_expr_list(targets);
                self.write(" = ");
                self.render_expr_list(values);
                self.semi();
                self.newline();
            }
            Stmt::LocalVarDecl { names, values } => {
                self.write("local ");
                self.write(&names.join(", "));
                if !values.is_empty() {
                    self.write(" = ");
                    self.render_expr_list(values);
                }
                self.semi();
                self.newline();
            }
            Stmt::If { arms, else_block } => {
                for (i, arm) in arms.iter().enumerate() {
                    if i == 0 {
                        self.write("if ");
                    } else {
                        self.write("elseif ");
                    }
                    self.render_expr(&arm.condition);
                    self.write(" then");
                    self.newline();
                    self.inc_indent();
                    self.render_block(&arm.body);
                    self.dec_indent();
                }
                if let Some(else_block) = else_block {
                    self.write("else");
                    self.newline();
                    self.inc_indent();
                    self.render_block(else_block);
                    self.dec_indent();
                }
                self.write("end");
                self.newline();
            }
            Stmt::While { condition, body } => {
                self.write("while ");
                self.render_expr(condition);
                self.write(" do");
                self.newline();
                self.inc_indent();
                self.render_block(body);
                self.dec_indent();
                self.write("end");
                self.newline();
            }
            Stmt::RepeatUntil { body, condition } => {
                self.write("repeat");
                self.newline();
                self.inc_indent();
                self.render_block(body);
                self.dec_indent();
                self.write("until ");
                self.render_expr(condition);
                self.newline();
            }
            Stmt::NumericFor { var, start, stop, step, body } => {
                self.write(&format!("for {} = ", var));
                self.render_expr(start);
                self.write(", ");
                self.render_expr(stop);
                if let Some(step) = step {
                    self.write(", ");
                    self.render_expr(step);
                }
                self.write(" do");
                self.newline();
                self.inc_indent();
                self.render_block(body);
                self.dec_indent();
                self.write("end");
                self.newline();
            }
            Stmt::GenericFor { vars, exprs, body } => {
                self.write("for ");
                self.write(&vars.join(", "));
                self.write(" in ");
                self.render_expr_list(exprs);
                self.write(" do");
                self.newline();
                self.inc_indent();
                self.render_block(body);
                self.dec_indent();
                self.write("end");
                self.newline();
            }
            Stmt::Do(body) => {
                self.write("do");
                self.newline();
                self.inc_indent();
                self.render_block(body);
                self.dec_indent();
                self.write("end");
                self.newline();
            }
            Stmt::Break => {
                self.write("break");
                self.semi();
                self.newline();
            }
            Stmt::Goto(label) => {
                self.write(&format!("goto {}", label));
                self.newline();
            }
            Stmt::Labeled(label) => {
                self.write(&format!("::{}::", label));
                self.newline();
            }
            Stmt::Return(values) => {
                self.write("return");
                if !values.is_empty() {
                    self.write(" ");
                    self.render_expr_list(values);
                }
                self.semi();
                self.newline();
            }
            Stmt::BlankLines(n) => {
                for _ in 0..*n {
                    self.newline();
                }
            }
            Stmt::ShortComment(text) => {
                self.write(&format!("-- {}", text.trim_start_matches('/').trim()));
                self.newline();
            }
            Stmt::LongCommentExpr(text) => {
                self.write(&format!("--[[ {} ]]", text));
                self.newline();
            }
            Stmt::DocSummary(text) => {
                self.write(&format!("--- {}", text));
                self.newline();
            }
            Stmt::DocLine(text) => {
                self.write(&format!("-- {}", text));
                self.newline();
            }
            Stmt::TryAdapter { try_fn, catch_fn, finally_fn, result_var } => {
                self.render_try_adapter(try_fn, catch_fn.as_deref(), finally_fn.as_deref(), result_var.as_deref());
            }
            Stmt::UsingAdapter { resources, body_fn, result_var } => {
                self.render_using_adapter(resources, body_fn, result_var.as_deref());
            }
            Stmt::ConstructorAdapter { .. } => {
                // Only meaningful nested under a type's __ctor__ table;
                // render_ctor_value handles that context.
                self.render_ctor_value(stmt);
                self.newline();
            }
            Stmt::ContinueAdapter => {
                self.write("__continue__ = true; break");
                self.newline();
            }
            Stmt::GotoCaseAdapter { flag_name, label } => {
                self.write(&format!("{} = true; goto {}", flag_name, label));
                self.newline();
            }
        }
    }

    fn render_try_adapter(
        &mut self,
        try_fn: &FunctionBody,
        catch_fn: Option<&FunctionBody>,
        finally_fn: Option<&FunctionBody>,
        result_var: Option<&str>,
    ) {
        if let Some(rv) = result_var {
            self.write(&format!("local ok, {} = System.try(", rv));
        } else {
            self.write("System.try(");
        }
        self.newline();
        self.inc_indent();
        self.render_function_literal_inline(try_fn);
        self.write(",");
        self.newline();
        match catch_fn {
            Some(f) => self.render_function_literal_inline(f),
            None => self.write("nil"),
        }
        self.write(",");
        self.newline();
        match finally_fn {
            Some(f) => self.render_function_literal_inline(f),
            None => self.write("nil"),
        }
        self.dec_indent();
        self.newline();
        self.write(")");
        self.semi();
        self.newline();
        if let Some(rv) = result_var {
            self.write(&format!("if ok then return {} end", rv));
            self.newline();
        }
    }

    fn render_using_adapter(&mut self, resources: &[Expr], body_fn: &FunctionBody, result_var: Option<&str>) {
        let helper = if resources.len() <= 1 { "System.using" } else { "System.usingX" };
        if let Some(rv) = result_var {
            self.write(&format!("local ok, {} = {}(", rv, helper));
        } else {
            self.write(&format!("{}(", helper));
        }
        if resources.len() <= 1 {
            if let Some(r) = resources.first() {
                self.render_expr(r);
                self.write(", ");
            }
            self.render_function_literal_inline(body_fn);
        } else {
            self.render_function_literal_inline(body_fn);
            for r in resources {
                self.write(", ");
                self.render_expr(r);
            }
        }
        self.write(")");
        self.semi();
        self.newline();
        if let Some(rv) = result_var {
            self.write(&format!("if ok then return {} end", rv));
            self.newline();
        }
    }

    fn render_function_literal_inline(&mut self, f: &FunctionBody) {
        self.write("function(");
        self.write(&f.parameters.join(", "));
        self.write(")");
        self.newline();
        self.inc_indent();
        self.render_block(&f.body);
        self.dec_indent();
        self.write("end");
    }

    // --- Expressions ---

    fn render_expr_list(&mut self, exprs: &[Expr]) {
        for (i, e) in exprs.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.render_expr(e);
        }
    }

    fn render_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Identifier(name) => self.write(name),
            Expr::Literal(lit) => self.render_literal(lit),
            Expr::Binary { op, left, right, .. } => {
                if self.config.classic_dialect {
                    if let Some(call) = classic_runtime_call(*op) {
                        self.write(call);
                        self.write("(");
                        self.render_expr(left);
                        self.write(", ");
                        self.render_expr(right);
                        self.write(")");
                        return;
                    }
                }
                self.render_expr(left);
                self.write(" ");
                self.write(binary_op_token(*op));
                self.write(" ");
                self.render_expr(right);
            }
            Expr::Unary { op, operand, .. } => {
                self.write(unary_op_token(*op));
                self.render_expr(operand);
            }
            Expr::MemberAccess { receiver, member, is_colon_call } => {
                self.render_expr(receiver);
                self.write(if *is_colon_call { ":" } else { "." });
                self.write(member);
            }
            Expr::TableIndex { receiver, index } => {
                self.render_expr(receiver);
                self.write("[");
                self.render_expr(index);
                self.write("]");
            }
            Expr::Invocation { callee, arguments, .. } => {
                self.render_expr(callee);
                self.write("(");
                self.render_expr_list(arguments);
                self.write(")");
            }
            Expr::FunctionLiteral(f) => self.render_function_literal_inline(f),
            Expr::Parenthesized(inner) => {
                self.write("(");
                self.render_expr(inner);
                self.write(")");
            }
            Expr::TableInitializer(items) => {
                self.write("{");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    match item {
                        TableItem::Single(e) => self.render_expr(e),
                        TableItem::KeyValue(k, v) => {
                            self.write("[");
                            self.render_expr(k);
                            self.write("] = ");
                            self.render_expr(v);
                        }
                        TableItem::StringKey(name, v) => {
                            self.write(name);
                            self.write(" = ");
                            self.render_expr(v);
                        }
                    }
                }
                self.write("}");
            }
            Expr::SequenceList(items) => self.render_expr_list(items),
            Expr::PropertyAdapter { receiver, name, field_like } => {
                if *field_like {
                    self.render_expr(receiver);
                    self.write(".");
                    self.write(name);
                } else {
                    self.render_expr(receiver);
                    self.write(&format!(":get_{}()", name));
                }
            }
            Expr::ArrayTypeAdapter { element_type, rank, sizes } => {
                let helper = if *rank <= 1 { "System.Array" } else { "System.MultiArray" };
                self.write(helper);
                self.write("(");
                self.render_expr(element_type);
                self.write(")(");
                self.render_expr_list(sizes);
                self.write(")");
            }
        }
    }

    fn render_literal(&mut self, lit: &Literal) {
        match lit {
            Literal::String(s) => self.write(&lua_quote(s)),
            Literal::Char(s) => self.write(&lua_quote(s)),
            Literal::Number(n) => self.write(n),
            Literal::Bool(b) => self.write(if *b { "true" } else { "false" }),
            Literal::Nil => self.write("nil"),
            Literal::Verbatim(text) => self.write(text),
        }
    }
}

/// Quote a string the way the teacher's single-quote-escape regex does for
/// JS strings, adapted to Lua's escape set.
fn lua_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
