use ttcn3_syn::ast::*;
use ttcn3_syn::{SynTag, SyntaxNode, SyntaxToken, Tree};

use crate::error::NotADeclaration;
use crate::Scope;

/// Build the scope of `node`.
///
/// Returns `None` if `node` does not introduce a declarative region.
///
/// # Panics
///
/// Panics if a module definition holds something that is neither a
/// declaration nor an error recovery node.
pub fn build_scope(node: &SyntaxNode, tree: &Tree) -> Option<Scope> {
    let scope_node = ScopeNode::cast(node.clone())?;
    let mut builder = ScopeBuilder {
        scope: Scope::new(node.clone(), tree.clone()),
    };

    match scope_node {
        ScopeNode::Module(module) => builder.add_module(&module),
        ScopeNode::Group(group) => {
            for def in group.defs() {
                builder.add_module_def(&def);
            }
        }
        ScopeNode::Func(func) => {
            builder.add_type_pars(func.type_pars());
            builder.add_formal_pars(func.pars());
        }
        ScopeNode::Template(template) => {
            builder.add_type_pars(template.type_pars());
            builder.add_formal_pars(template.pars());
        }
        ScopeNode::Signature(sig) => {
            builder.add_type_pars(sig.type_pars());
            builder.add_formal_pars(sig.pars());
        }
        ScopeNode::BehaviourType(ty) => {
            builder.add_type_pars(ty.type_pars());
            builder.add_formal_pars(ty.pars());
        }
        ScopeNode::BehaviourSpec(spec) => builder.add_formal_pars(spec.pars()),
        ScopeNode::SubType(ty) => {
            if let Some(field) = ty.field() {
                builder.add_field_members(&field);
            }
        }
        ScopeNode::Field(field) => builder.add_field_members(&field),
        ScopeNode::StructType(ty) => {
            builder.add_type_pars(ty.type_pars());
            for field in ty.fields() {
                builder.add_field(&field);
            }
        }
        ScopeNode::StructSpec(spec) => {
            for field in spec.fields() {
                builder.add_field(&field);
            }
        }
        ScopeNode::EnumType(ty) => {
            builder.add_type_pars(ty.type_pars());
            builder.add_enumerators(ty.node(), ty.enumerators());
        }
        ScopeNode::EnumSpec(spec) => builder.add_enumerators(spec.node(), spec.enumerators()),
        ScopeNode::ComponentType(ty) => {
            builder.add_type_pars(ty.type_pars());
            if let Some(body) = ty.body() {
                builder.add_block(&body);
            }
        }
        ScopeNode::PortType(ty) => builder.add_type_pars(ty.type_pars()),
        ScopeNode::PortMap(attr) => builder.add_formal_pars(attr.pars()),
        ScopeNode::FormalPars(pars) => builder.add_formal_pars(Some(pars)),
        ScopeNode::TypePars(pars) => builder.add_type_pars(Some(pars)),
        ScopeNode::Block(block) => builder.add_block(&block),
        ScopeNode::For(stmt) => {
            if let Some(init) = stmt.init_decl() {
                builder.add_decl_stmt(&init);
            }
        }
        ScopeNode::If(stmt) => builder.add_if(&stmt),
        ScopeNode::Alt(_) => {}
    }

    tracing::trace!(kind = ?node.kind(), names = builder.scope.len(), "built scope");
    Some(builder.scope)
}

struct ScopeBuilder {
    scope: Scope,
}

impl ScopeBuilder {
    fn insert(&mut self, owner: &SyntaxNode, ident: Option<SyntaxToken>) {
        if let Some(ident) = ident {
            self.scope.insert(owner, ident);
        }
    }

    fn insert_name(&mut self, owner: &SyntaxNode, name: Option<Name>) {
        self.insert(owner, name.map(|name| name.ident()))
    }

    /// Walk the whole module. Every module level declaration is added, and so
    /// is every enumerator found anywhere below the module.
    fn add_module(&mut self, module: &Module) {
        for node in module.node().descendants() {
            match node.kind() {
                SynTag::ModuleDef => {
                    if let Some(def) = ModuleDef::cast(node) {
                        self.add_module_level_def(&def);
                    }
                }
                SynTag::EnumTypeDecl => {
                    if let Some(ty) = EnumTypeDecl::cast(node) {
                        self.add_enumerators(ty.node(), ty.enumerators());
                    }
                }
                SynTag::EnumSpec => {
                    if let Some(spec) = EnumSpec::cast(node) {
                        self.add_enumerators(spec.node(), spec.enumerators());
                    }
                }
                _ => {}
            }
        }
    }

    /// Like [`Self::add_module_def`], but groups are skipped. Their members
    /// are module definitions themselves and get visited by the walk.
    fn add_module_level_def(&mut self, def: &ModuleDef) {
        if matches!(def.decl(), Some(Declaration::Group(_))) {
            return;
        }
        self.add_module_def(def);
    }

    fn add_module_def(&mut self, def: &ModuleDef) {
        for node in def.decl_candidates() {
            if node.kind() == SynTag::ErrorNode {
                continue;
            }
            if let Err(e) = self.add(&node) {
                panic!("malformed module definition: {}", e);
            }
        }
    }

    /// Add the names declared by `node`.
    fn add(&mut self, node: &SyntaxNode) -> Result<(), NotADeclaration> {
        if let Some(decl) = Declaration::cast(node.clone()) {
            self.add_declaration(decl);
            return Ok(());
        }
        match node.kind() {
            SynTag::ModuleDef => {
                if let Some(def) = ModuleDef::cast(node.clone()) {
                    self.add_module_def(&def);
                }
            }
            SynTag::DeclStmt => {
                if let Some(stmt) = DeclStmt::cast(node.clone()) {
                    self.add_decl_stmt(&stmt);
                }
            }
            SynTag::Field => {
                if let Some(field) = Field::cast(node.clone()) {
                    self.add_field(&field);
                }
            }
            SynTag::FormalPar => {
                if let Some(par) = FormalPar::cast(node.clone()) {
                    self.insert_name(par.node(), par.name());
                }
            }
            SynTag::BranchStmt => match BranchStmt::cast(node.clone()) {
                Some(stmt) if stmt.kind() == BranchKind::Label => {
                    self.insert_name(stmt.node(), stmt.label())
                }
                _ => return Err(NotADeclaration { kind: node.kind() }),
            },
            kind => return Err(NotADeclaration { kind }),
        }
        Ok(())
    }

    fn add_declaration(&mut self, decl: Declaration) {
        match decl {
            Declaration::Import(import) => {
                self.insert_name(import.node(), import.module_name())
            }
            Declaration::Group(group) => {
                for def in group.defs() {
                    self.add_module_def(&def);
                }
            }
            Declaration::SubType(ty) => {
                if let Some(field) = ty.field() {
                    self.add_field(&field);
                }
            }
            Declaration::StructType(ty) => self.insert_name(ty.node(), ty.name()),
            Declaration::EnumType(ty) => self.insert_name(ty.node(), ty.name()),
            Declaration::ComponentType(ty) => self.insert_name(ty.node(), ty.name()),
            Declaration::PortType(ty) => self.insert_name(ty.node(), ty.name()),
            Declaration::BehaviourType(ty) => self.insert_name(ty.node(), ty.name()),
            Declaration::Func(func) => self.insert_name(func.node(), func.name()),
            Declaration::Signature(sig) => self.insert_name(sig.node(), sig.name()),
            Declaration::Template(template) => {
                self.insert_name(template.node(), template.name())
            }
            Declaration::Value(value) => {
                for declarator in value.declarators() {
                    self.insert_name(value.node(), declarator.name());
                }
            }
            Declaration::Control(control) => {
                self.insert(control.node(), Some(control.keyword()))
            }
        }
    }

    fn add_decl_stmt(&mut self, stmt: &DeclStmt) {
        if let Some(decl) = stmt.decl() {
            self.add_declaration(decl);
        }
    }

    fn add_field(&mut self, field: &Field) {
        self.insert_name(field.node(), field.name());
    }

    /// The names a field makes visible to itself: members of an inline
    /// struct and its type parameters.
    fn add_field_members(&mut self, field: &Field) {
        if let Some(TypeSpec::Struct(spec)) = field.type_spec() {
            for member in spec.fields() {
                self.add_field(&member);
            }
        }
        self.add_type_pars(field.type_pars());
    }

    fn add_type_pars(&mut self, pars: Option<TypePars>) {
        for par in pars.iter().flat_map(|pars| pars.pars()) {
            self.insert_name(par.node(), par.name());
        }
    }

    fn add_formal_pars(&mut self, pars: Option<FormalPars>) {
        for par in pars.iter().flat_map(|pars| pars.pars()) {
            self.insert_name(par.node(), par.name());
        }
    }

    fn add_enumerators(&mut self, owner: &SyntaxNode, enums: impl Iterator<Item = Expr>) {
        for e in enums {
            match e {
                Expr::Ident(ident) => self.insert(owner, Some(ident.ident())),
                Expr::Call(call) => match call.callee() {
                    Some(Expr::Ident(ident)) => self.insert(owner, Some(ident.ident())),
                    callee => tracing::debug!(?callee, "unknown enumerator syntax"),
                },
                other => tracing::debug!(kind = ?other.node().kind(), "unknown enumerator syntax"),
            }
        }
    }

    /// Statements that are not declarations are skipped.
    fn add_block(&mut self, block: &BlockStmt) {
        for stmt in block.stmts() {
            let _ = self.add(stmt.node());
        }
    }

    fn add_if(&mut self, stmt: &IfStmt) {
        if let Some(then) = stmt.then_block() {
            self.add_block(&then);
        }
        if let Some(els) = stmt.else_block() {
            self.add_block(&els);
        }
        if let Some(else_if) = stmt.else_if() {
            self.add_if(&else_if);
        }
    }
}
