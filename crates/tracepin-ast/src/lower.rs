//! Lowering of the swc AST into [`SourceNode`] trees
//!
//! Only the shapes the insertion pipeline reasons about get dedicated
//! layouts; everything else becomes an `Other` leaf that still carries its
//! range. Names and literal text are sliced from the source so the lowered
//! tree never depends on how swc interns strings.

use crate::lines::LineIndex;
use crate::node::{NodeId, NodeKind, SourceLocation, SourceNode};
use std::borrow::Cow;
use swc_common::{Span, Spanned};
use swc_ecma_ast::*;

pub(crate) struct Lowerer<'a> {
    source: &'a str,
    /// Position of the source file inside the swc source map
    base: u32,
    index: LineIndex<'a>,
    next_id: u32,
}

impl<'a> Lowerer<'a> {
    pub(crate) fn new(source: &'a str, base: u32) -> Self {
        Self {
            source,
            base,
            index: LineIndex::new(source),
            next_id: 0,
        }
    }

    fn offset(&self, pos: u32) -> usize {
        (pos.saturating_sub(self.base) as usize).min(self.source.len())
    }

    fn slice(&self, span: Span) -> &'a str {
        let (start, end) = (self.offset(span.lo.0), self.offset(span.hi.0));
        self.source.get(start..end).unwrap_or("")
    }

    /// Allocates a node over byte range `start..end`. Ids are handed out
    /// before children are lowered, so they follow pre-order.
    fn at(&mut self, kind: NodeKind, start: usize, end: usize) -> SourceNode {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        let loc = SourceLocation {
            start: self.index.position(start),
            end: self.index.position(end),
        };
        SourceNode::new(id, kind, start, end).with_loc(loc)
    }

    fn node(&mut self, kind: NodeKind, span: Span) -> SourceNode {
        let (start, end) = (self.offset(span.lo.0), self.offset(span.hi.0));
        self.at(kind, start, end)
    }

    fn other(&mut self, name: &'static str, span: Span) -> SourceNode {
        self.node(NodeKind::Other(name), span)
    }

    fn ident(&mut self, ident: &Ident) -> SourceNode {
        let mut node = self.node(NodeKind::Identifier, ident.span);
        node.push_str("name", ident.sym.to_string());
        node
    }

    fn ident_name(&mut self, ident: &IdentName) -> SourceNode {
        let mut node = self.node(NodeKind::Identifier, ident.span);
        node.push_str("name", ident.sym.to_string());
        node
    }

    fn private_name(&mut self, name: &PrivateName) -> SourceNode {
        let mut node = self.node(NodeKind::PrivateName, name.span);
        let text = self.slice(name.span);
        node.push_str("name", text);
        node
    }

    fn string_literal(&mut self, span: Span) -> SourceNode {
        let raw = self.slice(span);
        let mut node = self.node(NodeKind::StringLiteral, span);
        node.push_str("value", string_value(raw));
        node
    }

    // ---- Program and statements ------------------------------------------

    pub(crate) fn program(&mut self, module: &Module) -> SourceNode {
        let mut program = self.at(NodeKind::Program, 0, self.source.len());
        let body = module
            .body
            .iter()
            .map(|item| match item {
                ModuleItem::Stmt(stmt) => self.stmt(stmt),
                ModuleItem::ModuleDecl(decl) => self.module_decl(decl),
            })
            .collect();
        program.push_nodes("body", body);
        program
    }

    fn module_decl(&mut self, decl: &ModuleDecl) -> SourceNode {
        match decl {
            ModuleDecl::Import(import) => {
                let mut node = self.node(NodeKind::ImportDeclaration, import.span);
                let specifiers = import
                    .specifiers
                    .iter()
                    .map(|spec| {
                        let (kind, span, local) = match spec {
                            ImportSpecifier::Named(s) => (NodeKind::ImportSpecifier, s.span, &s.local),
                            ImportSpecifier::Default(s) => {
                                (NodeKind::ImportDefaultSpecifier, s.span, &s.local)
                            }
                            ImportSpecifier::Namespace(s) => {
                                (NodeKind::ImportNamespaceSpecifier, s.span, &s.local)
                            }
                        };
                        let mut node = self.node(kind, span);
                        node.push_node("local", Some(self.ident(local)));
                        node
                    })
                    .collect();
                node.push_nodes("specifiers", specifiers);
                node.push_node("source", Some(self.string_literal(import.src.span)));
                node
            }
            ModuleDecl::ExportDecl(export) => {
                let mut node = self.node(NodeKind::ExportNamedDeclaration, export.span);
                node.push_node("declaration", Some(self.decl(&export.decl)));
                node
            }
            ModuleDecl::ExportDefaultDecl(export) => {
                let mut node = self.node(NodeKind::ExportDefaultDeclaration, export.span);
                let declaration = match &export.decl {
                    DefaultDecl::Class(class) => {
                        self.class(NodeKind::ClassDeclaration, class.ident.as_ref(), &class.class)
                    }
                    DefaultDecl::Fn(function) => self.function(
                        NodeKind::FunctionDeclaration,
                        function.ident.as_ref(),
                        &function.function,
                    ),
                    DefaultDecl::TsInterfaceDecl(iface) => {
                        self.node(NodeKind::TSInterfaceDeclaration, iface.span)
                    }
                };
                node.push_node("declaration", Some(declaration));
                node
            }
            ModuleDecl::ExportDefaultExpr(export) => {
                let mut node = self.node(NodeKind::ExportDefaultDeclaration, export.span);
                node.push_node("declaration", Some(self.expr(&export.expr)));
                node
            }
            other => self.other("ModuleDeclaration", other.span()),
        }
    }

    fn stmt(&mut self, stmt: &Stmt) -> SourceNode {
        match stmt {
            Stmt::Block(block) => self.block(block),
            Stmt::Empty(empty) => self.node(NodeKind::EmptyStatement, empty.span),
            Stmt::Debugger(debugger) => self.node(NodeKind::DebuggerStatement, debugger.span),
            Stmt::With(with) => {
                let mut node = self.node(NodeKind::WithStatement, with.span);
                node.push_node("object", Some(self.expr(&with.obj)));
                node.push_node("body", Some(self.stmt(&with.body)));
                node
            }
            Stmt::Return(ret) => {
                let mut node = self.node(NodeKind::ReturnStatement, ret.span);
                node.push_node("argument", ret.arg.as_deref().map(|arg| self.expr(arg)));
                node
            }
            Stmt::Labeled(labeled) => {
                let mut node = self.node(NodeKind::LabeledStatement, labeled.span);
                node.push_node("label", Some(self.ident(&labeled.label)));
                node.push_node("body", Some(self.stmt(&labeled.body)));
                node
            }
            Stmt::Break(brk) => self.node(NodeKind::BreakStatement, brk.span),
            Stmt::Continue(cont) => self.node(NodeKind::ContinueStatement, cont.span),
            Stmt::If(if_stmt) => {
                let mut node = self.node(NodeKind::IfStatement, if_stmt.span);
                node.push_node("test", Some(self.expr(&if_stmt.test)));
                node.push_node("consequent", Some(self.stmt(&if_stmt.cons)));
                node.push_node("alternate", if_stmt.alt.as_deref().map(|alt| self.stmt(alt)));
                node
            }
            Stmt::Switch(switch) => {
                let mut node = self.node(NodeKind::SwitchStatement, switch.span);
                node.push_node("discriminant", Some(self.expr(&switch.discriminant)));
                let cases = switch
                    .cases
                    .iter()
                    .map(|case| {
                        let mut case_node = self.node(NodeKind::SwitchCase, case.span);
                        case_node.push_node("test", case.test.as_deref().map(|t| self.expr(t)));
                        let consequent = case.cons.iter().map(|s| self.stmt(s)).collect();
                        case_node.push_nodes("consequent", consequent);
                        case_node
                    })
                    .collect();
                node.push_nodes("cases", cases);
                node
            }
            Stmt::Throw(throw) => {
                let mut node = self.node(NodeKind::ThrowStatement, throw.span);
                node.push_node("argument", Some(self.expr(&throw.arg)));
                node
            }
            Stmt::Try(try_stmt) => {
                let mut node = self.node(NodeKind::TryStatement, try_stmt.span);
                node.push_node("block", Some(self.block(&try_stmt.block)));
                let handler = try_stmt.handler.as_ref().map(|handler| {
                    let mut clause = self.node(NodeKind::CatchClause, handler.span);
                    clause.push_node("param", handler.param.as_ref().map(|p| self.pat(p)));
                    clause.push_node("body", Some(self.block(&handler.body)));
                    clause
                });
                node.push_node("handler", handler);
                node.push_node("finalizer", try_stmt.finalizer.as_ref().map(|f| self.block(f)));
                node
            }
            Stmt::While(while_stmt) => {
                let mut node = self.node(NodeKind::WhileStatement, while_stmt.span);
                node.push_node("test", Some(self.expr(&while_stmt.test)));
                node.push_node("body", Some(self.stmt(&while_stmt.body)));
                node
            }
            Stmt::DoWhile(do_while) => {
                let mut node = self.node(NodeKind::DoWhileStatement, do_while.span);
                node.push_node("body", Some(self.stmt(&do_while.body)));
                node.push_node("test", Some(self.expr(&do_while.test)));
                node
            }
            Stmt::For(for_stmt) => {
                let mut node = self.node(NodeKind::ForStatement, for_stmt.span);
                let init = for_stmt.init.as_ref().map(|init| match init {
                    VarDeclOrExpr::VarDecl(var) => self.var_decl(var),
                    VarDeclOrExpr::Expr(expr) => self.expr(expr),
                });
                node.push_node("init", init);
                node.push_node("test", for_stmt.test.as_deref().map(|t| self.expr(t)));
                node.push_node("update", for_stmt.update.as_deref().map(|u| self.expr(u)));
                node.push_node("body", Some(self.stmt(&for_stmt.body)));
                node
            }
            Stmt::ForIn(for_in) => {
                let mut node = self.node(NodeKind::ForInStatement, for_in.span);
                node.push_node("left", Some(self.for_head(&for_in.left)));
                node.push_node("right", Some(self.expr(&for_in.right)));
                node.push_node("body", Some(self.stmt(&for_in.body)));
                node
            }
            Stmt::ForOf(for_of) => {
                let mut node = self.node(NodeKind::ForOfStatement, for_of.span);
                node.push_node("left", Some(self.for_head(&for_of.left)));
                node.push_node("right", Some(self.expr(&for_of.right)));
                node.push_node("body", Some(self.stmt(&for_of.body)));
                node.push_bool("await", for_of.is_await);
                node
            }
            Stmt::Decl(decl) => self.decl(decl),
            Stmt::Expr(expr_stmt) => {
                let mut node = self.node(NodeKind::ExpressionStatement, expr_stmt.span);
                node.push_node("expression", Some(self.expr(&expr_stmt.expr)));
                node
            }
            #[allow(unreachable_patterns)]
            other => self.other("Statement", other.span()),
        }
    }

    fn for_head(&mut self, head: &ForHead) -> SourceNode {
        match head {
            ForHead::VarDecl(var) => self.var_decl(var),
            ForHead::Pat(pat) => self.pat(pat),
            ForHead::UsingDecl(using) => self.other("UsingDeclaration", using.span),
        }
    }

    fn block(&mut self, block: &BlockStmt) -> SourceNode {
        let mut node = self.node(NodeKind::BlockStatement, block.span);
        let body = block.stmts.iter().map(|s| self.stmt(s)).collect();
        node.push_nodes("body", body);
        node
    }

    fn decl(&mut self, decl: &Decl) -> SourceNode {
        match decl {
            Decl::Class(class) => {
                self.class(NodeKind::ClassDeclaration, Some(&class.ident), &class.class)
            }
            Decl::Fn(function) => self.function(
                NodeKind::FunctionDeclaration,
                Some(&function.ident),
                &function.function,
            ),
            Decl::Var(var) => self.var_decl(var),
            Decl::TsInterface(iface) => self.node(NodeKind::TSInterfaceDeclaration, iface.span),
            Decl::TsTypeAlias(alias) => self.node(NodeKind::TSTypeAliasDeclaration, alias.span),
            Decl::TsEnum(ts_enum) => self.node(NodeKind::TSEnumDeclaration, ts_enum.span),
            Decl::TsModule(module) => self.node(NodeKind::TSModuleDeclaration, module.span),
            Decl::Using(using) => self.other("UsingDeclaration", using.span),
        }
    }

    fn var_decl(&mut self, var: &VarDecl) -> SourceNode {
        let mut node = self.node(NodeKind::VariableDeclaration, var.span);
        node.push_str(
            "kind",
            match var.kind {
                VarDeclKind::Var => "var",
                VarDeclKind::Let => "let",
                VarDeclKind::Const => "const",
            },
        );
        let declarations = var
            .decls
            .iter()
            .map(|declarator| {
                let mut decl_node = self.node(NodeKind::VariableDeclarator, declarator.span);
                decl_node.push_node("id", Some(self.pat(&declarator.name)));
                decl_node.push_node("init", declarator.init.as_deref().map(|e| self.expr(e)));
                decl_node
            })
            .collect();
        node.push_nodes("declarations", declarations);
        node
    }

    // ---- Functions and classes -------------------------------------------

    fn function(&mut self, kind: NodeKind, ident: Option<&Ident>, function: &Function) -> SourceNode {
        let mut node = self.node(kind, function.span);
        node.push_node("id", ident.map(|i| self.ident(i)));
        let params = function.params.iter().map(|p| self.pat(&p.pat)).collect();
        node.push_nodes("params", params);
        node.push_node("body", function.body.as_ref().map(|b| self.block(b)));
        node.push_bool("async", function.is_async);
        node.push_bool("generator", function.is_generator);
        node
    }

    fn arrow(&mut self, arrow: &ArrowExpr) -> SourceNode {
        let mut node = self.node(NodeKind::ArrowFunctionExpression, arrow.span);
        let params = arrow.params.iter().map(|p| self.pat(p)).collect();
        node.push_nodes("params", params);
        let (body, is_expression) = match &*arrow.body {
            BlockStmtOrExpr::BlockStmt(block) => (self.block(block), false),
            BlockStmtOrExpr::Expr(expr) => (self.expr(expr), true),
        };
        node.push_node("body", Some(body));
        node.push_bool("expression", is_expression);
        node.push_bool("async", arrow.is_async);
        node
    }

    fn class(&mut self, kind: NodeKind, ident: Option<&Ident>, class: &Class) -> SourceNode {
        let mut node = self.node(kind, class.span);
        node.push_node("id", ident.map(|i| self.ident(i)));
        node.push_node("superClass", class.super_class.as_deref().map(|s| self.expr(s)));

        // swc keeps no span for the body; it starts at the first `{` after
        // the header.
        let header_end = class
            .super_class
            .as_ref()
            .map(|s| s.span().hi.0)
            .or_else(|| ident.map(|i| i.span.hi.0))
            .unwrap_or(class.span.lo.0);
        let search_from = self.offset(header_end);
        let class_end = self.offset(class.span.hi.0);
        let body_start = self
            .source
            .get(search_from..class_end)
            .and_then(|header| header.find('{'))
            .map(|rel| search_from + rel)
            .unwrap_or(search_from);

        let mut body = self.at(NodeKind::ClassBody, body_start, class_end);
        let members = class
            .body
            .iter()
            .filter_map(|member| self.class_member(member))
            .collect();
        body.push_nodes("body", members);
        node.push_node("body", Some(body));
        node
    }

    fn class_member(&mut self, member: &ClassMember) -> Option<SourceNode> {
        let node = match member {
            ClassMember::Constructor(ctor) => {
                let mut node = self.node(NodeKind::ClassMethod, ctor.span);
                node.push_str("kind", "constructor");
                node.push_node("key", Some(self.prop_name(&ctor.key)));
                let params = ctor
                    .params
                    .iter()
                    .map(|param| match param {
                        ParamOrTsParamProp::Param(p) => self.pat(&p.pat),
                        ParamOrTsParamProp::TsParamProp(prop) => {
                            let mut node = self.node(NodeKind::TSParameterProperty, prop.span);
                            let parameter = match &prop.param {
                                TsParamPropParam::Ident(binding) => self.binding_ident(binding),
                                TsParamPropParam::Assign(assign) => self.assign_pat(assign),
                            };
                            node.push_node("parameter", Some(parameter));
                            node
                        }
                    })
                    .collect();
                node.push_nodes("params", params);
                node.push_node("body", ctor.body.as_ref().map(|b| self.block(b)));
                node
            }
            ClassMember::Method(method) => {
                let mut node = self.node(NodeKind::ClassMethod, method.span);
                node.push_str("kind", method_kind(method.kind));
                node.push_bool("computed", matches!(method.key, PropName::Computed(_)));
                node.push_node("key", Some(self.prop_name(&method.key)));
                self.method_function(&mut node, &method.function);
                node.push_bool("static", method.is_static);
                node
            }
            ClassMember::PrivateMethod(method) => {
                let mut node = self.node(NodeKind::ClassMethod, method.span);
                node.push_str("kind", method_kind(method.kind));
                node.push_node("key", Some(self.private_name(&method.key)));
                self.method_function(&mut node, &method.function);
                node.push_bool("static", method.is_static);
                node
            }
            ClassMember::ClassProp(prop) => {
                let mut node = self.node(NodeKind::ClassProperty, prop.span);
                node.push_bool("computed", matches!(prop.key, PropName::Computed(_)));
                node.push_node("key", Some(self.prop_name(&prop.key)));
                node.push_node("value", prop.value.as_deref().map(|v| self.expr(v)));
                node.push_bool("static", prop.is_static);
                node
            }
            ClassMember::PrivateProp(prop) => {
                let mut node = self.node(NodeKind::ClassProperty, prop.span);
                node.push_node("key", Some(self.private_name(&prop.key)));
                node.push_node("value", prop.value.as_deref().map(|v| self.expr(v)));
                node.push_bool("static", prop.is_static);
                node
            }
            ClassMember::StaticBlock(block) => {
                let mut node = self.node(NodeKind::StaticBlock, block.span);
                let body = block.body.stmts.iter().map(|s| self.stmt(s)).collect();
                node.push_nodes("body", body);
                node
            }
            ClassMember::Empty(_) => return None,
            other => self.other("ClassMember", other.span()),
        };
        Some(node)
    }

    /// Parameters and body of a method, attached to its member node.
    fn method_function(&mut self, node: &mut SourceNode, function: &Function) {
        let params = function.params.iter().map(|p| self.pat(&p.pat)).collect();
        node.push_nodes("params", params);
        node.push_node("body", function.body.as_ref().map(|b| self.block(b)));
        node.push_bool("async", function.is_async);
    }

    fn prop_name(&mut self, key: &PropName) -> SourceNode {
        match key {
            PropName::Ident(ident) => self.ident_name(ident),
            PropName::Str(s) => self.string_literal(s.span),
            PropName::Num(num) => {
                let mut node = self.node(NodeKind::NumericLiteral, num.span);
                node.push_num("value", num.value);
                node
            }
            PropName::Computed(computed) => self.expr(&computed.expr),
            PropName::BigInt(big) => self.node(NodeKind::BigIntLiteral, big.span),
        }
    }

    // ---- Patterns ---------------------------------------------------------

    fn binding_ident(&mut self, binding: &BindingIdent) -> SourceNode {
        self.ident(&binding.id)
    }

    fn assign_pat(&mut self, assign: &AssignPat) -> SourceNode {
        let mut node = self.node(NodeKind::AssignmentPattern, assign.span);
        node.push_node("left", Some(self.pat(&assign.left)));
        node.push_node("right", Some(self.expr(&assign.right)));
        node
    }

    fn pat(&mut self, pat: &Pat) -> SourceNode {
        match pat {
            Pat::Ident(binding) => self.binding_ident(binding),
            Pat::Array(array) => self.array_pat(array),
            Pat::Rest(rest) => {
                let mut node = self.node(NodeKind::RestElement, rest.span);
                node.push_node("argument", Some(self.pat(&rest.arg)));
                node
            }
            Pat::Object(object) => self.object_pat(object),
            Pat::Assign(assign) => self.assign_pat(assign),
            Pat::Expr(expr) => self.expr(expr),
            other => self.other("Pattern", other.span()),
        }
    }

    fn array_pat(&mut self, array: &ArrayPat) -> SourceNode {
        let mut node = self.node(NodeKind::ArrayPattern, array.span);
        let elements = array.elems.iter().flatten().map(|p| self.pat(p)).collect();
        node.push_nodes("elements", elements);
        node
    }

    fn object_pat(&mut self, object: &ObjectPat) -> SourceNode {
        let mut node = self.node(NodeKind::ObjectPattern, object.span);
        let properties = object
            .props
            .iter()
            .map(|prop| match prop {
                ObjectPatProp::KeyValue(kv) => {
                    let start = kv.key.span().lo.0;
                    let end = kv.value.span().hi.0;
                    let (start, end) = (self.offset(start), self.offset(end));
                    let mut node = self.at(NodeKind::ObjectProperty, start, end);
                    node.push_bool("computed", matches!(kv.key, PropName::Computed(_)));
                    node.push_node("key", Some(self.prop_name(&kv.key)));
                    node.push_node("value", Some(self.pat(&kv.value)));
                    node.push_bool("shorthand", false);
                    node
                }
                ObjectPatProp::Assign(assign) => {
                    // `{ a }` or `{ a = 1 }`: key and value are the same name
                    let mut node = self.node(NodeKind::ObjectProperty, assign.span);
                    node.push_node("key", Some(self.binding_ident(&assign.key)));
                    let value = match assign.value.as_deref() {
                        Some(default) => {
                            let mut pattern =
                                self.node(NodeKind::AssignmentPattern, assign.span);
                            pattern.push_node("left", Some(self.binding_ident(&assign.key)));
                            pattern.push_node("right", Some(self.expr(default)));
                            pattern
                        }
                        None => self.binding_ident(&assign.key),
                    };
                    node.push_node("value", Some(value));
                    node.push_bool("shorthand", true);
                    node
                }
                ObjectPatProp::Rest(rest) => {
                    let mut node = self.node(NodeKind::RestElement, rest.span);
                    node.push_node("argument", Some(self.pat(&rest.arg)));
                    node
                }
            })
            .collect();
        node.push_nodes("properties", properties);
        node
    }

    fn assign_target(&mut self, target: &AssignTarget) -> SourceNode {
        match target {
            AssignTarget::Simple(SimpleAssignTarget::Ident(binding)) => self.binding_ident(binding),
            AssignTarget::Simple(SimpleAssignTarget::Member(member)) => self.member(member),
            AssignTarget::Simple(SimpleAssignTarget::Paren(paren)) => self.expr(&paren.expr),
            AssignTarget::Simple(SimpleAssignTarget::OptChain(chain)) => self.opt_chain(chain),
            AssignTarget::Pat(AssignTargetPat::Array(array)) => self.array_pat(array),
            AssignTarget::Pat(AssignTargetPat::Object(object)) => self.object_pat(object),
            other => self.other("AssignTarget", other.span()),
        }
    }

    // ---- Expressions ------------------------------------------------------

    fn args(&mut self, args: &[ExprOrSpread]) -> Vec<SourceNode> {
        args.iter().map(|arg| self.expr_or_spread(arg)).collect()
    }

    fn expr_or_spread(&mut self, arg: &ExprOrSpread) -> SourceNode {
        match arg.spread {
            Some(dots) => {
                let start = self.offset(dots.lo.0);
                let end = self.offset(arg.expr.span().hi.0);
                let mut node = self.at(NodeKind::SpreadElement, start, end);
                node.push_node("argument", Some(self.expr(&arg.expr)));
                node
            }
            None => self.expr(&arg.expr),
        }
    }

    fn member(&mut self, member: &MemberExpr) -> SourceNode {
        self.member_with(member, member.span, false)
    }

    fn member_with(&mut self, member: &MemberExpr, span: Span, optional: bool) -> SourceNode {
        let mut node = self.node(NodeKind::MemberExpression, span);
        node.push_node("object", Some(self.expr(&member.obj)));
        let (property, computed) = match &member.prop {
            MemberProp::Ident(ident) => (self.ident_name(ident), false),
            MemberProp::PrivateName(name) => (self.private_name(name), false),
            MemberProp::Computed(computed) => (self.expr(&computed.expr), true),
        };
        node.push_node("property", Some(property));
        node.push_bool("computed", computed);
        node.push_bool("optional", optional);
        node
    }

    fn opt_chain(&mut self, chain: &OptChainExpr) -> SourceNode {
        match &*chain.base {
            OptChainBase::Member(member) => self.member_with(member, chain.span, chain.optional),
            OptChainBase::Call(call) => {
                let mut node = self.node(NodeKind::CallExpression, chain.span);
                node.push_node("callee", Some(self.expr(&call.callee)));
                let arguments = self.args(&call.args);
                node.push_nodes("arguments", arguments);
                node.push_bool("optional", chain.optional);
                node
            }
        }
    }

    fn template(&mut self, tpl: &Tpl) -> SourceNode {
        let mut node = self.node(NodeKind::TemplateLiteral, tpl.span);
        let quasis = tpl
            .quasis
            .iter()
            .map(|quasi| {
                let mut element = self.node(NodeKind::TemplateElement, quasi.span);
                element.push_str("raw", quasi.raw.to_string());
                element.push_bool("tail", quasi.tail);
                element
            })
            .collect();
        node.push_nodes("quasis", quasis);
        let expressions = tpl.exprs.iter().map(|e| self.expr(e)).collect();
        node.push_nodes("expressions", expressions);
        node
    }

    fn expr(&mut self, expr: &Expr) -> SourceNode {
        match expr {
            Expr::This(this) => self.node(NodeKind::ThisExpression, this.span),
            Expr::Array(array) => {
                let mut node = self.node(NodeKind::ArrayExpression, array.span);
                let elements = array
                    .elems
                    .iter()
                    .flatten()
                    .map(|e| self.expr_or_spread(e))
                    .collect();
                node.push_nodes("elements", elements);
                node
            }
            Expr::Object(object) => {
                let mut node = self.node(NodeKind::ObjectExpression, object.span);
                let properties = object.props.iter().map(|p| self.prop_or_spread(p)).collect();
                node.push_nodes("properties", properties);
                node
            }
            Expr::Fn(function) => self.function(
                NodeKind::FunctionExpression,
                function.ident.as_ref(),
                &function.function,
            ),
            Expr::Unary(unary) => {
                let mut node = self.node(NodeKind::UnaryExpression, unary.span);
                node.push_str("operator", unary.op.as_str());
                node.push_node("argument", Some(self.expr(&unary.arg)));
                node
            }
            Expr::Update(update) => {
                let mut node = self.node(NodeKind::UpdateExpression, update.span);
                node.push_str("operator", update.op.as_str());
                node.push_bool("prefix", update.prefix);
                node.push_node("argument", Some(self.expr(&update.arg)));
                node
            }
            Expr::Bin(bin) => {
                let kind = match bin.op {
                    BinaryOp::LogicalOr | BinaryOp::LogicalAnd | BinaryOp::NullishCoalescing => {
                        NodeKind::LogicalExpression
                    }
                    _ => NodeKind::BinaryExpression,
                };
                let mut node = self.node(kind, bin.span);
                node.push_str("operator", bin.op.as_str());
                node.push_node("left", Some(self.expr(&bin.left)));
                node.push_node("right", Some(self.expr(&bin.right)));
                node
            }
            Expr::Assign(assign) => {
                let mut node = self.node(NodeKind::AssignmentExpression, assign.span);
                node.push_str("operator", assign.op.as_str());
                node.push_node("left", Some(self.assign_target(&assign.left)));
                node.push_node("right", Some(self.expr(&assign.right)));
                node
            }
            Expr::Member(member) => self.member(member),
            Expr::SuperProp(super_prop) => {
                let mut node = self.node(NodeKind::MemberExpression, super_prop.span);
                node.push_node("object", Some(self.node(NodeKind::Super, super_prop.obj.span)));
                let (property, computed) = match &super_prop.prop {
                    SuperProp::Ident(ident) => (self.ident_name(ident), false),
                    SuperProp::Computed(computed) => (self.expr(&computed.expr), true),
                };
                node.push_node("property", Some(property));
                node.push_bool("computed", computed);
                node.push_bool("optional", false);
                node
            }
            Expr::Cond(cond) => {
                let mut node = self.node(NodeKind::ConditionalExpression, cond.span);
                node.push_node("test", Some(self.expr(&cond.test)));
                node.push_node("consequent", Some(self.expr(&cond.cons)));
                node.push_node("alternate", Some(self.expr(&cond.alt)));
                node
            }
            Expr::Call(call) => {
                let mut node = self.node(NodeKind::CallExpression, call.span);
                let callee = match &call.callee {
                    Callee::Expr(callee) => self.expr(callee),
                    Callee::Super(sup) => self.node(NodeKind::Super, sup.span),
                    Callee::Import(import) => self.node(NodeKind::Import, import.span),
                };
                node.push_node("callee", Some(callee));
                let arguments = self.args(&call.args);
                node.push_nodes("arguments", arguments);
                node.push_bool("optional", false);
                node
            }
            Expr::New(new) => {
                let mut node = self.node(NodeKind::NewExpression, new.span);
                node.push_node("callee", Some(self.expr(&new.callee)));
                let arguments = new.args.as_deref().map(|a| self.args(a)).unwrap_or_default();
                node.push_nodes("arguments", arguments);
                node
            }
            Expr::Seq(seq) => {
                let mut node = self.node(NodeKind::SequenceExpression, seq.span);
                let expressions = seq.exprs.iter().map(|e| self.expr(e)).collect();
                node.push_nodes("expressions", expressions);
                node
            }
            Expr::Ident(ident) => self.ident(ident),
            Expr::Lit(lit) => self.lit(lit),
            Expr::Tpl(tpl) => self.template(tpl),
            Expr::TaggedTpl(tagged) => {
                let mut node = self.node(NodeKind::TaggedTemplateExpression, tagged.span);
                node.push_node("tag", Some(self.expr(&tagged.tag)));
                node.push_node("quasi", Some(self.template(&tagged.tpl)));
                node
            }
            Expr::Arrow(arrow) => self.arrow(arrow),
            Expr::Class(class) => {
                self.class(NodeKind::ClassExpression, class.ident.as_ref(), &class.class)
            }
            Expr::Yield(yield_expr) => {
                let mut node = self.node(NodeKind::YieldExpression, yield_expr.span);
                node.push_node("argument", yield_expr.arg.as_deref().map(|a| self.expr(a)));
                node.push_bool("delegate", yield_expr.delegate);
                node
            }
            Expr::MetaProp(meta) => self.node(NodeKind::MetaProperty, meta.span),
            Expr::Await(await_expr) => {
                let mut node = self.node(NodeKind::AwaitExpression, await_expr.span);
                node.push_node("argument", Some(self.expr(&await_expr.arg)));
                node
            }
            // Parentheses are transparent
            Expr::Paren(paren) => self.expr(&paren.expr),
            Expr::JSXElement(element) => self.jsx_element(element),
            Expr::JSXFragment(fragment) => self.jsx_fragment(fragment),
            Expr::TsTypeAssertion(assertion) => {
                self.ts_wrapper(NodeKind::TSTypeAssertion, assertion.span, &assertion.expr)
            }
            Expr::TsConstAssertion(assertion) => {
                self.ts_wrapper(NodeKind::TSAsExpression, assertion.span, &assertion.expr)
            }
            Expr::TsNonNull(non_null) => {
                self.ts_wrapper(NodeKind::TSNonNullExpression, non_null.span, &non_null.expr)
            }
            Expr::TsAs(as_expr) => self.ts_wrapper(NodeKind::TSAsExpression, as_expr.span, &as_expr.expr),
            Expr::TsSatisfies(satisfies) => {
                self.ts_wrapper(NodeKind::TSSatisfiesExpression, satisfies.span, &satisfies.expr)
            }
            Expr::TsInstantiation(instantiation) => self.expr(&instantiation.expr),
            Expr::PrivateName(name) => self.private_name(name),
            Expr::OptChain(chain) => self.opt_chain(chain),
            other => self.other("Expression", other.span()),
        }
    }

    fn ts_wrapper(&mut self, kind: NodeKind, span: Span, inner: &Expr) -> SourceNode {
        let mut node = self.node(kind, span);
        node.push_node("expression", Some(self.expr(inner)));
        node
    }

    fn lit(&mut self, lit: &Lit) -> SourceNode {
        match lit {
            Lit::Str(s) => self.string_literal(s.span),
            Lit::Bool(b) => {
                let mut node = self.node(NodeKind::BooleanLiteral, b.span);
                node.push_bool("value", b.value);
                node
            }
            Lit::Null(null) => self.node(NodeKind::NullLiteral, null.span),
            Lit::Num(num) => {
                let mut node = self.node(NodeKind::NumericLiteral, num.span);
                node.push_num("value", num.value);
                node
            }
            Lit::BigInt(big) => self.node(NodeKind::BigIntLiteral, big.span),
            Lit::Regex(regex) => self.node(NodeKind::RegExpLiteral, regex.span),
            other => self.other("Literal", other.span()),
        }
    }

    fn prop_or_spread(&mut self, prop: &PropOrSpread) -> SourceNode {
        match prop {
            PropOrSpread::Spread(spread) => {
                let start = self.offset(spread.dot3_token.lo.0);
                let end = self.offset(spread.expr.span().hi.0);
                let mut node = self.at(NodeKind::SpreadElement, start, end);
                node.push_node("argument", Some(self.expr(&spread.expr)));
                node
            }
            PropOrSpread::Prop(prop) => self.prop(prop),
        }
    }

    fn prop(&mut self, prop: &Prop) -> SourceNode {
        match prop {
            Prop::Shorthand(ident) => {
                let mut node = self.node(NodeKind::ObjectProperty, ident.span);
                node.push_node("key", Some(self.ident(ident)));
                node.push_node("value", Some(self.ident(ident)));
                node.push_bool("computed", false);
                node.push_bool("shorthand", true);
                node
            }
            Prop::KeyValue(kv) => {
                let start = self.offset(kv.key.span().lo.0);
                let end = self.offset(kv.value.span().hi.0);
                let mut node = self.at(NodeKind::ObjectProperty, start, end);
                node.push_bool("computed", matches!(kv.key, PropName::Computed(_)));
                node.push_node("key", Some(self.prop_name(&kv.key)));
                node.push_node("value", Some(self.expr(&kv.value)));
                node.push_bool("shorthand", false);
                node
            }
            Prop::Assign(assign) => {
                let mut node = self.node(NodeKind::ObjectProperty, assign.span);
                node.push_node("key", Some(self.ident(&assign.key)));
                node.push_node("value", Some(self.expr(&assign.value)));
                node.push_bool("shorthand", true);
                node
            }
            Prop::Getter(getter) => {
                let mut node = self.node(NodeKind::ObjectMethod, getter.span);
                node.push_str("kind", "get");
                node.push_node("key", Some(self.prop_name(&getter.key)));
                node.push_nodes("params", Vec::new());
                node.push_node("body", getter.body.as_ref().map(|b| self.block(b)));
                node
            }
            Prop::Setter(setter) => {
                let mut node = self.node(NodeKind::ObjectMethod, setter.span);
                node.push_str("kind", "set");
                node.push_node("key", Some(self.prop_name(&setter.key)));
                let param = self.pat(&setter.param);
                node.push_nodes("params", vec![param]);
                node.push_node("body", setter.body.as_ref().map(|b| self.block(b)));
                node
            }
            Prop::Method(method) => {
                let start = self.offset(method.key.span().lo.0);
                let end = self.offset(method.function.span.hi.0);
                let mut node = self.at(NodeKind::ObjectMethod, start, end);
                node.push_str("kind", "method");
                node.push_bool("computed", matches!(method.key, PropName::Computed(_)));
                node.push_node("key", Some(self.prop_name(&method.key)));
                self.method_function(&mut node, &method.function);
                node
            }
        }
    }

    // ---- JSX --------------------------------------------------------------

    fn jsx_element(&mut self, element: &JSXElement) -> SourceNode {
        let mut node = self.node(NodeKind::JSXElement, element.span);
        let opening = &element.opening;
        let mut opening_node = self.node(NodeKind::JSXOpeningElement, opening.span);
        opening_node.push_str("name", self.slice(opening.name.span()));
        let attributes = opening
            .attrs
            .iter()
            .map(|attr| match attr {
                JSXAttrOrSpread::JSXAttr(attr) => {
                    let mut attr_node = self.node(NodeKind::JSXAttribute, attr.span);
                    attr_node.push_str("name", self.slice(attr.name.span()));
                    let value = attr.value.as_ref().and_then(|value| match value {
                        JSXAttrValue::JSXExprContainer(container) => {
                            Some(self.jsx_container(container))
                        }
                        JSXAttrValue::JSXElement(element) => Some(self.jsx_element(element)),
                        JSXAttrValue::JSXFragment(fragment) => Some(self.jsx_fragment(fragment)),
                        _ => None,
                    });
                    attr_node.push_node("value", value);
                    attr_node
                }
                JSXAttrOrSpread::SpreadElement(spread) => {
                    let start = self.offset(spread.dot3_token.lo.0);
                    let end = self.offset(spread.expr.span().hi.0);
                    let mut spread_node = self.at(NodeKind::JSXSpreadAttribute, start, end);
                    spread_node.push_node("argument", Some(self.expr(&spread.expr)));
                    spread_node
                }
            })
            .collect();
        opening_node.push_nodes("attributes", attributes);
        node.push_node("openingElement", Some(opening_node));
        let children = self.jsx_children(&element.children);
        node.push_nodes("children", children);
        node
    }

    fn jsx_fragment(&mut self, fragment: &JSXFragment) -> SourceNode {
        let mut node = self.node(NodeKind::JSXFragment, fragment.span);
        let children = self.jsx_children(&fragment.children);
        node.push_nodes("children", children);
        node
    }

    fn jsx_children(&mut self, children: &[JSXElementChild]) -> Vec<SourceNode> {
        children
            .iter()
            .filter_map(|child| match child {
                JSXElementChild::JSXExprContainer(container) => Some(self.jsx_container(container)),
                JSXElementChild::JSXElement(element) => Some(self.jsx_element(element)),
                JSXElementChild::JSXFragment(fragment) => Some(self.jsx_fragment(fragment)),
                _ => None,
            })
            .collect()
    }

    fn jsx_container(&mut self, container: &JSXExprContainer) -> SourceNode {
        let mut node = self.node(NodeKind::JSXExpressionContainer, container.span);
        let expression = match &container.expr {
            JSXExpr::Expr(expr) => Some(self.expr(expr)),
            JSXExpr::JSXEmptyExpr(_) => None,
        };
        node.push_node("expression", expression);
        node
    }
}

fn method_kind(kind: MethodKind) -> &'static str {
    match kind {
        MethodKind::Method => "method",
        MethodKind::Getter => "get",
        MethodKind::Setter => "set",
    }
}

/// Strips the surrounding quotes of a string literal's source text.
fn unquote(raw: &str) -> &str {
    let mut chars = raw.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open), Some(close)) if open == close && matches!(open, '"' | '\'' | '`') => {
            &raw[1..raw.len() - 1]
        }
        _ => raw,
    }
}

/// The value a string literal denotes: quotes removed, escapes decoded.
fn string_value(raw: &str) -> Cow<'_, str> {
    let body = unquote(raw);
    if !body.contains('\\') {
        return Cow::Borrowed(body);
    }

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escaped) = chars.next() else {
            out.push('\\');
            break;
        };
        match escaped {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' if !chars.peek().is_some_and(char::is_ascii_digit) => out.push('\0'),
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                push_code_point(&mut out, &hex, "\\x");
            }
            'u' if chars.peek() == Some(&'{') => {
                chars.next();
                let hex: String = chars.by_ref().take_while(|&h| h != '}').collect();
                push_code_point(&mut out, &hex, "\\u");
            }
            'u' => {
                let hex: String = chars.by_ref().take(4).collect();
                push_code_point(&mut out, &hex, "\\u");
            }
            // Line continuation
            '\n' => {}
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

/// Decodes `hex`, keeping the escape as written when it is malformed.
fn push_code_point(out: &mut String, hex: &str, escape: &str) {
    match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
        Some(c) => out.push(c),
        None => {
            out.push_str(escape);
            out.push_str(hex);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{string_value, unquote};

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'a b'"), "a b");
        assert_eq!(unquote("\"x\""), "x");
        assert_eq!(unquote("'"), "'");
        assert_eq!(unquote("plain"), "plain");
    }

    #[test]
    fn test_string_value_decodes_escapes() {
        assert_eq!(string_value(r"'it\'s'"), "it's");
        assert_eq!(string_value(r#""a\"b""#), "a\"b");
        assert_eq!(string_value(r"'tab\there'"), "tab\there");
        assert_eq!(string_value(r"'\x41\u0042\u{1F680}'"), "AB🚀");
        assert_eq!(string_value(r"'back\\slash'"), "back\\slash");
        assert_eq!(string_value("'line\\\ncontinued'"), "linecontinued");
        assert_eq!(string_value(r"'bad\xZZ'"), r"bad\xZZ");
    }
}
